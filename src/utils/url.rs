//! Joining the backend base URL with agent routes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use novahub::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:8000"), "http://127.0.0.1:8000");
/// assert_eq!(normalize_base_url("http://127.0.0.1:8000/"), "http://127.0.0.1:8000");
/// assert_eq!(normalize_base_url("https://agents.example.com/api///"), "https://agents.example.com/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and a route
///
/// This function normalizes the base URL and safely appends the route,
/// ensuring there are no double slashes in the result.
///
/// # Examples
///
/// ```
/// use novahub::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:8000", "/chat"),
///     "http://127.0.0.1:8000/chat"
/// );
/// assert_eq!(
///     construct_api_url("https://agents.example.com/api/", "sladocs"),
///     "https://agents.example.com/api/sladocs"
/// );
/// // The root route keeps its slash.
/// assert_eq!(construct_api_url("http://127.0.0.1:8000/", "/"), "http://127.0.0.1:8000/");
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}
