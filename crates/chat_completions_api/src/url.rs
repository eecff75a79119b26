/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Normalize a base URL to a chat-completions endpoint.
///
/// Normalization rules:
/// 1) blank input uses [`DEFAULT_ENDPOINT`]
/// 2) keep `/chat/completions` unchanged
/// 3) append `/chat/completions` otherwise (for example to a `/v1` base)
pub fn normalize_endpoint(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_ENDPOINT
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(COMPLETIONS_PATH) {
        return trimmed.to_string();
    }
    format!("{trimmed}{COMPLETIONS_PATH}")
}
