//! Process configuration from environment variables.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} is invalid: {1}")]
    InvalidVar(&'static str, String),
}

/// Bot/transport configuration.
///
/// Required: `BOT_TOKEN`, `WEBHOOK_HOST` (public https base URL without a
/// trailing slash). Optional: `PORT` (default 10000).
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub webhook_host: String,
    pub port: u16,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = require("BOT_TOKEN")?;
        let webhook_host = require("WEBHOOK_HOST")?
            .trim_end_matches('/')
            .to_string();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar("PORT", e.to_string()))?,
            Err(_) => 10000,
        };

        Ok(Self {
            token,
            webhook_host,
            port,
        })
    }

    /// Webhook route path; contains the bot token so only Telegram can
    /// guess it.
    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.token)
    }

    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.webhook_host, self.webhook_path())
    }

    /// Keep-alive target: the public host itself
    pub fn ping_url(&self) -> String {
        self.webhook_host.clone()
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for var in ["BOT_TOKEN", "WEBHOOK_HOST", "PORT"] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token_and_host() {
        clear_env();
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingVar("BOT_TOKEN"))
        ));

        std::env::set_var("BOT_TOKEN", "123:abc");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingVar("WEBHOOK_HOST"))
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_and_urls() {
        clear_env();
        std::env::set_var("BOT_TOKEN", "123:abc");
        std::env::set_var("WEBHOOK_HOST", "https://bot.example.com/");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.webhook_path(), "/webhook/123:abc");
        assert_eq!(
            config.webhook_url(),
            "https://bot.example.com/webhook/123:abc"
        );
        assert_eq!(config.ping_url(), "https://bot.example.com");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        clear_env();
        std::env::set_var("BOT_TOKEN", "123:abc");
        std::env::set_var("WEBHOOK_HOST", "https://bot.example.com");
        std::env::set_var("PORT", "not-a-port");

        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::InvalidVar("PORT", _))
        ));
        clear_env();
    }
}
