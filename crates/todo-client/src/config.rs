//! Client Configuration

/// Local storage key holding the raw bearer token
pub const DEFAULT_STORAGE_KEY: &str = "jwt_token";

/// Where the API lives and where the credential is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL joined with endpoint paths (no trailing slash needed)
    pub base_url: String,
    /// Key of the credential slot in persistent storage
    pub storage_key: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
