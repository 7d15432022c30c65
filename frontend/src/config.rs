/// Backend the admin dashboard talks to unless overridden at build time
pub const DEFAULT_API_BASE_URL: &str = "https://local-grocery-back-end.vercel.app";

/// Local storage key holding the signed-in admin
pub const DEFAULT_SESSION_KEY: &str = "user";

/// Client-side settings, resolved once at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_storage_key: String,
    /// How long form success banners stay visible
    pub success_message_ms: u32,
}

impl ClientConfig {
    /// Defaults, with `GROCERY_API_BASE_URL` baked in at compile time when set.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = option_env!("GROCERY_API_BASE_URL") {
            config.api_base_url = base_url.to_string();
        }
        config.normalized()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_storage_key: DEFAULT_SESSION_KEY.to_string(),
            success_message_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.session_storage_key, "user");
        assert_eq!(config.success_message_ms, 3000);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::with_base_url("http://localhost:5000/ ");
        assert_eq!(config.api_base_url, "http://localhost:5000");
    }

    #[test]
    fn test_blank_base_url_falls_back_to_default() {
        let config = ClientConfig::with_base_url("   ");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
