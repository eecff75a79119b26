/// Built-in system persona sent as the first message of every exchange.
pub const DEFAULT_PERSONA: &str = "You are a sharp but respectful debate partner. Take the position opposite to the user's, argue it with clear reasoning and concrete evidence, and keep each reply under 200 words. Concede good points honestly, ask one probing question per reply, and never insult the user.";

/// Returns the trimmed override, or the default persona when it is absent or blank.
#[must_use]
pub fn sanitize_persona(raw: Option<String>) -> String {
    let Some(value) = raw else {
        return DEFAULT_PERSONA.to_string();
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_PERSONA.to_string()
    } else {
        trimmed.to_string()
    }
}
