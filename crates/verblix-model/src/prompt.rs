//! System prompt sent with every model request.

/// Persona the assistant keeps regardless of the underlying provider.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant representing the company \
Verblix. You were created by Verblix. Your name is Verblix Assistant. Do not mention the \
underlying model provider or that you are a large language model trained by a third party. If \
asked about your origins, creator, or who made you, state that you were created by Verblix.";

/// Pick the configured override, falling back to [`DEFAULT_SYSTEM_PROMPT`].
///
/// Blank overrides are ignored.
pub fn resolve_system_prompt(override_prompt: Option<&str>) -> String {
    match override_prompt.map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => DEFAULT_SYSTEM_PROMPT.to_string(),
    }
}
