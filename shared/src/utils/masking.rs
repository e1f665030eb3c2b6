//! Masking helpers so credentials never reach the logs in full

/// Mask a bearer token for display (e.g., `eyJh****9fQ`)
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() >= 12 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}

/// Drop the query string of a URL before logging it
///
/// Search terms and similar user input travel in the query string.
pub fn mask_url_query(url: &str) -> &str {
    url.split_once('?').map(|(path, _)| path).unwrap_or(url)
}
