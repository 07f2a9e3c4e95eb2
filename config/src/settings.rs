//! Typed settings read from the process environment after [`crate::load_and_apply`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Base URL used with `GROQ_API_KEY` when `OPENAI_BASE_URL` is unset.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("missing required setting: {0}")]
    Missing(String),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Everything the binary needs to build a travel agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub decide_temperature: f32,
    pub recommend_temperature: f32,
    /// Tool-execution turns allowed before the recommendation is forced.
    pub max_turns: u32,
    pub llm_timeout: Duration,
    pub tool_timeout: Duration,
    /// `None` makes the weather tool answer with a credential error.
    pub openweather_api_key: Option<String>,
    /// Parent of the `repo/` directory the download tool extracts into.
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (api_key, default_base) = match (get("GROQ_API_KEY"), get("OPENAI_API_KEY")) {
            (Some(key), _) => (key, GROQ_BASE_URL),
            (None, Some(key)) => (key, OPENAI_BASE_URL),
            (None, None) => {
                return Err(SettingsError::Missing(
                    "GROQ_API_KEY or OPENAI_API_KEY".into(),
                ))
            }
        };

        let decide_temperature = parse_or(&get, "WAYFARER_DECIDE_TEMPERATURE", 0.7_f32)?;
        let recommend_temperature = parse_or(&get, "WAYFARER_RECOMMEND_TEMPERATURE", 0.3_f32)?;
        for (key, t) in [
            ("WAYFARER_DECIDE_TEMPERATURE", decide_temperature),
            ("WAYFARER_RECOMMEND_TEMPERATURE", recommend_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(SettingsError::Invalid {
                    key: key.into(),
                    value: t.to_string(),
                });
            }
        }
        // The two model calls must not share a sampling temperature.
        if decide_temperature == recommend_temperature {
            return Err(SettingsError::Invalid {
                key: "WAYFARER_RECOMMEND_TEMPERATURE".into(),
                value: format!("{recommend_temperature} (equals WAYFARER_DECIDE_TEMPERATURE)"),
            });
        }

        Ok(Self {
            api_key,
            api_base: get("OPENAI_BASE_URL").unwrap_or_else(|| default_base.to_string()),
            model: get("WAYFARER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            decide_temperature,
            recommend_temperature,
            max_turns: parse_or(&get, "WAYFARER_MAX_TURNS", 8)?,
            llm_timeout: secs(&get, "WAYFARER_LLM_TIMEOUT_SECS", 60)?,
            tool_timeout: secs(&get, "WAYFARER_TOOL_TIMEOUT_SECS", 30)?,
            openweather_api_key: get("OPENWEATHER_API_KEY"),
            data_dir: get("WAYFARER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| SettingsError::Invalid {
            key: key.into(),
            value: raw,
        }),
    }
}

/// Whole seconds; zero is rejected since every call would time out.
fn secs<G>(get: &G, key: &str, default: u64) -> Result<Duration, SettingsError>
where
    G: Fn(&str) -> Option<String>,
{
    match parse_or(get, key, default)? {
        0 => Err(SettingsError::Invalid {
            key: key.into(),
            value: "0".into(),
        }),
        n => Ok(Duration::from_secs(n)),
    }
}
