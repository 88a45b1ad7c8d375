use std::env;

/// Source of the caller's session token.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads `SESSION_TOKEN` on every call so a later login is picked up.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn credential(&self) -> Option<String> {
        env::var("SESSION_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}
