use std::env;
use std::net::IpAddr;

use jiff::SignedDuration;

use verblix_model::bedrock::DEFAULT_MODEL_ID;
use verblix_model::prompt::resolve_system_prompt;

pub const DEFAULT_PORT: u16 = 3001;

/// Session lifetime (one day).
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(24);

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Browser origin allowed to call the relay with credentials.
    pub allowed_origin: String,
    pub model_id: String,
    pub aws_region: String,
    pub system_prompt: String,
    /// Mark the session cookie `Secure` (requires HTTPS).
    pub secure_cookies: bool,
    pub session_ttl: SignedDuration,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| eyre::eyre!("invalid PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        let bind_addr = match lookup("VERBLIX_BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|e| eyre::eyre!("invalid VERBLIX_BIND_ADDR {raw:?}: {e}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let allowed_origin = lookup("VERBLIX_ALLOWED_ORIGIN")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let model_id = lookup("VERBLIX_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let aws_region = lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string());
        let system_prompt = resolve_system_prompt(lookup("VERBLIX_SYSTEM_PROMPT").as_deref());
        let secure_cookies = lookup("VERBLIX_SECURE_COOKIES")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            bind_addr,
            port,
            allowed_origin,
            model_id,
            aws_region,
            system_prompt,
            secure_cookies,
            session_ttl: DEFAULT_SESSION_TTL,
        })
    }
}
