use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::logging::LogConfig;
use crate::tracker::Policy;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_file: String,
    pub seed_baseline: bool,
    pub policy: Policy,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            db_file: "vocabulary.db".to_string(),
            seed_baseline: true,
            policy: Policy::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Apply a `.env` file from the working directory (if any), then read the environment
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Failed to read .env file");
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            data_dir: PathBuf::from(env_or("MASTERY_DATA_DIR", "./data")),
            db_file: env_or("MASTERY_DB_FILE", &defaults.db_file),
            seed_baseline: env_or_bool("MASTERY_SEED_BASELINE", defaults.seed_baseline),
            policy: Policy {
                correct_reward: env_or_parse("MASTERY_CORRECT_REWARD", defaults.policy.correct_reward),
                difficult_threshold: env_or_parse(
                    "MASTERY_DIFFICULT_THRESHOLD",
                    defaults.policy.difficult_threshold,
                ),
                ..defaults.policy
            },
            log: LogConfig {
                log_level: env_or("RUST_LOG", &defaults.log.log_level),
                enable_file_logs: env_or_bool("MASTERY_FILE_LOGS", defaults.log.enable_file_logs),
                log_dir: env_or("MASTERY_LOG_DIR", &defaults.log.log_dir),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
