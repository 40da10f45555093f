//! URL path handling.

/// Split a URL path into segments.
///
/// The leading separator is dropped and the rest split on `/`, so a trailing
/// separator survives as a final empty segment:
/// `/shop/item/` → `["shop", "item", ""]`, `/` → `[""]`, and an empty path gives no segments.
pub fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed.split('/').map(str::to_owned).collect()
}

/// Canonical (separator-terminated) form of `path`, keeping the query.
pub fn canonical_location(path: &str, query: Option<&str>) -> String {
    let mut location = String::with_capacity(path.len() + 1);
    location.push_str(path);
    if !location.ends_with('/') {
        location.push('/');
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}
