//! Cookie string parsing

/// Split a `Cookie`-style string (`"a=1; b=2"`) into name/value pairs
///
/// Parts without `=` are skipped, as are parts whose name is empty. Each part
/// is trimmed and split at its first `=`, so values may contain `=`.
pub fn parse_cookie_string(cookie_string: &str) -> Vec<(String, String)> {
    cookie_string
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
