//! Environment-backed configuration for the assistant binary.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub elevenlabs_api_key: String,
    pub github_token: String,
    pub vercel_token: String,
    /// Enables post-deployment snapshots of the live site when set.
    pub browser_api_key: Option<String>,
    pub chat_model: String,
    pub voice_id: String,
    pub project_dir: PathBuf,
    pub repo_name: String,
    pub log_level: Level,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let openai_api_key = required("OPENAI_API_KEY")?;
        let elevenlabs_api_key = required("ELEVENLABS_API_KEY")?;
        let github_token = required("GITHUB_TOKEN")?;
        let vercel_token = required("VERCEL_TOKEN")?;
        let browser_api_key = std::env::var("BROWSER_API_KEY").ok();

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let voice_id = std::env::var("VOICE_ID")
            .unwrap_or_else(|_| cadenza_speech::synthesis::DEFAULT_VOICE_ID.to_string());

        let project_dir = match std::env::var("PROJECT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .map(|home| home.join("cadenza-ui"))
                .ok_or_else(|| {
                    ConfigError::MissingVar(
                        "PROJECT_DIR must be set when no home directory exists".to_string(),
                    )
                })?,
        };

        let repo_name =
            std::env::var("REPO_NAME").unwrap_or_else(|_| "cadenza-generated-ui".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            openai_api_key,
            elevenlabs_api_key,
            github_token,
            vercel_token,
            browser_api_key,
            chat_model,
            voice_id,
            project_dir,
            repo_name,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("ELEVENLABS_API_KEY");
            env::remove_var("GITHUB_TOKEN");
            env::remove_var("VERCEL_TOKEN");
            env::remove_var("BROWSER_API_KEY");
            env::remove_var("CHAT_MODEL");
            env::remove_var("VOICE_ID");
            env::remove_var("PROJECT_DIR");
            env::remove_var("REPO_NAME");
            env::remove_var("RUST_LOG");
        }
    }

    fn set_minimal_env() {
        unsafe {
            env::set_var("OPENAI_API_KEY", "test-openai-key");
            env::set_var("ELEVENLABS_API_KEY", "test-elevenlabs-key");
            env::set_var("GITHUB_TOKEN", "test-github-token");
            env::set_var("VERCEL_TOKEN", "test-vercel-token");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        set_minimal_env();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.openai_api_key, "test-openai-key");
        assert_eq!(config.elevenlabs_api_key, "test-elevenlabs-key");
        assert_eq!(config.github_token, "test-github-token");
        assert_eq!(config.vercel_token, "test-vercel-token");
        assert_eq!(config.browser_api_key, None);
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(
            config.voice_id,
            cadenza_speech::synthesis::DEFAULT_VOICE_ID
        );
        assert_eq!(config.repo_name, "cadenza-generated-ui");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("BROWSER_API_KEY", "test-browser-key");
            env::set_var("CHAT_MODEL", "gpt-4o-mini");
            env::set_var("VOICE_ID", "custom-voice");
            env::set_var("PROJECT_DIR", "/tmp/cadenza-project");
            env::set_var("REPO_NAME", "my-generated-app");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.browser_api_key, Some("test-browser-key".to_string()));
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.voice_id, "custom-voice");
        assert_eq!(config.project_dir, PathBuf::from("/tmp/cadenza-project"));
        assert_eq!(config.repo_name, "my-generated-app");
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_missing_required_key() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::remove_var("ELEVENLABS_API_KEY");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(name) => assert_eq!(name, "ELEVENLABS_API_KEY"),
            _ => panic!("Expected MissingVar for ELEVENLABS_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }
}
