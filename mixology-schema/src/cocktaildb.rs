use serde::{Deserialize, Serialize};

/// Response envelope shared by the `search.php` and `list.php` endpoints.
///
/// The upstream answers "no results" with `"drinks": null` (or omits the
/// field entirely), so both decode to `None`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct DrinksEnvelope {
    #[serde(default)]
    pub drinks: Option<Vec<DrinkName>>,
}

/// A single drink entry. Only the display name is consumed; every other
/// upstream field is ignored during decoding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DrinkName {
    #[serde(rename = "strDrink")]
    pub name: String,
}

impl DrinksEnvelope {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let drinks = names
            .into_iter()
            .map(|name| DrinkName { name: name.into() })
            .collect();
        Self {
            drinks: Some(drinks),
        }
    }

    /// Flattens the envelope into drink names, preserving upstream order.
    pub fn into_names(self) -> Vec<String> {
        self.drinks
            .unwrap_or_default()
            .into_iter()
            .map(|drink| drink.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_drinks_is_empty() {
        let env: DrinksEnvelope = serde_json::from_str(r#"{"drinks": null}"#).unwrap();
        assert_eq!(env.drinks, None);
        assert!(env.into_names().is_empty());
    }

    #[test]
    fn missing_drinks_is_empty() {
        let env: DrinksEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.into_names().is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{
            "drinks": [
                {"strDrink": "Mojito", "idDrink": "11000", "strCategory": "Cocktail"},
                {"strDrink": "Moscow Mule", "strAlcoholic": "Alcoholic"}
            ]
        }"#;
        let env: DrinksEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.into_names(), vec!["Mojito", "Moscow Mule"]);
    }

    #[test]
    fn entry_without_name_fails_to_decode() {
        let res = serde_json::from_str::<DrinksEnvelope>(r#"{"drinks": [{"idDrink": "1"}]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn from_names_serializes_upstream_shape() {
        let env = DrinksEnvelope::from_names(["Negroni"]);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value, serde_json::json!({"drinks": [{"strDrink": "Negroni"}]}));
    }
}
