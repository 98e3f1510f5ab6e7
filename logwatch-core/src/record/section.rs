/// Section label for paths that sit directly under the site root.
pub const ROOT_SECTION: &str = "root";

/// Buckets a request path into its traffic section.
///
/// The path is split into slash-delimited segments after the leading slash
/// (query string and fragment removed first):
///
/// - one segment (`/`, `/index.html`) yields [`ROOT_SECTION`]
/// - two or more segments (`/icons/blank.gif`, `/a/b/c`) yield the first
///   segment, however deep the rest of the path goes
///
/// The first segment is kept as is, so `//x` yields an empty section.
pub fn derive_section(path: &str) -> String {
    let path = path
        .split_once(['?', '#'])
        .map_or(path, |(before, _)| before);

    let body = path.strip_prefix('/').unwrap_or(path);

    match body.split_once('/') {
        Some((first, _)) => first.to_string(),
        None => ROOT_SECTION.to_string(),
    }
}
