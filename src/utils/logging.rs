use serde::Serialize;

/// Longest slice of a raw upstream body echoed into logs.
pub(crate) const BODY_PREVIEW_CHARS: usize = 256;

/// Runs `log_action` with a pretty-printed copy of `value`, only when DEBUG is enabled.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(pretty_json.as_str());
}

/// Lossy UTF-8 view of `bytes`, cut to `BODY_PREVIEW_CHARS` characters.
pub(crate) fn body_preview(bytes: &[u8]) -> String {
    let raw_body = String::from_utf8_lossy(bytes);
    format!("{:.len$}", raw_body, len = BODY_PREVIEW_CHARS)
}
