//! Endpoint URL helpers.

/// Join a provider base URL and an endpoint path with exactly one slash.
///
/// ```
/// use analista::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://generativelanguage.googleapis.com/v1beta/openai/", "/chat/completions"),
///     "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
