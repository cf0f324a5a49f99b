//! Utility functions

const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 12;
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Mask an API key for logging
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Reduce an upstream error to something safe to show a writer
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("apikey")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "AI provider authentication error".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "AI provider rate limit exceeded. Please try again later.".to_string();
    }

    if error.chars().count() > 300 {
        let truncated: String = error.chars().take(300).collect();
        format!("{truncated}...(truncated)")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("sk-abcdefghijklmnop"), "sk-a...mnop");
    }

    #[test]
    fn test_sanitize_hides_key_details() {
        let msg = sanitize_api_error("Incorrect API key provided: sk-1234");
        assert!(!msg.contains("sk-1234"));
        assert_eq!(sanitize_api_error("model overloaded"), "model overloaded");
    }
}
