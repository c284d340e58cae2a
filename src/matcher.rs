//! Edit-distance matching used to surface near-miss catalog names.

/// Default tolerance for [`filter_near`]: up to three single-character edits.
pub const DEFAULT_MAX_DISTANCE: usize = 3;

/// Case-insensitive Levenshtein distance between `a` and `b`.
///
/// Insertions, deletions and substitutions each cost 1. Only one row of
/// `len(b) + 1` cells is kept alive.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        // `diag` holds the previous row's value at column j.
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag
            } else {
                diag.min(above).min(row[j]) + 1
            };
            diag = above;
        }
    }
    row[b.len()]
}

/// Keeps the candidates within `max_distance` edits of `query`, in input order.
pub fn filter_near<I, S>(query: &str, candidates: I, max_distance: usize) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|candidate| distance(query, candidate.as_ref()) <= max_distance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_distances() {
        assert_eq!(distance("kitten", "sitting"), 3);
        assert_eq!(distance("Mojto", "Mojito"), 1);
        assert_eq!(distance("", "abc"), 3);
        assert_eq!(distance("abc", ""), 3);
        assert_eq!(distance("", ""), 0);
        assert_eq!(distance("flaw", "lawn"), 2);
    }

    #[test]
    fn ignores_case() {
        assert_eq!(distance("MOJITO", "mojito"), 0);
        assert_eq!(distance("Margarita", "mARGARITA"), 0);
    }

    #[test]
    fn identity_and_symmetry() {
        let words = [
            "",
            "a",
            "Mojito",
            "Moscow Mule",
            "Piña Colada",
            "Old Fashioned",
            "Negroni",
            "gin",
        ];
        for a in words {
            assert_eq!(distance(a, a), 0, "distance({a:?}, {a:?})");
            for b in words {
                assert_eq!(distance(a, b), distance(b, a), "symmetry for {a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn counts_unicode_scalars_not_bytes() {
        assert_eq!(distance("Piña", "Pina"), 1);
    }

    #[test]
    fn filter_keeps_order_and_boundary() {
        let candidates = vec!["Mojito", "Moscow Mule", "Mojto", "Negroni"];
        let near = filter_near("Mojto", candidates.clone(), DEFAULT_MAX_DISTANCE);
        assert_eq!(near, vec!["Mojito", "Mojto"]);

        // "abcd" -> "wxyz" is exactly four substitutions.
        assert_eq!(filter_near("abcd", ["wxyz"], 4), vec!["wxyz"]);
        assert!(filter_near("abcd", ["wxyz"], 3).is_empty());
    }

    #[test]
    fn filter_empty_candidates() {
        let empty: Vec<String> = Vec::new();
        assert!(filter_near("anything", empty, DEFAULT_MAX_DISTANCE).is_empty());
    }

    #[test]
    fn filter_owned_strings() {
        let cache = vec!["Mojito".to_string(), "Moscow Mule".to_string()];
        let near = filter_near("mojto", cache.iter(), DEFAULT_MAX_DISTANCE);
        assert_eq!(near, vec![&"Mojito".to_string()]);
    }
}
