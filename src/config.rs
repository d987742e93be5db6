use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_DIR: &str = "server/data";
const DEFAULT_DB_PATH: &str = "server/data/complaints.db";
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Csv { data_dir: PathBuf },
    Rocks { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: String,
    pub ping_message: String,
    pub store: StoreConfig,
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Read configuration from the environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = var("CIVICBOT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        // Only an unset message falls back; an empty one is served as is.
        let ping_message = lookup("PING_MESSAGE").unwrap_or_else(|| "ping".to_string());

        let backend = var("CIVICBOT_STORE").unwrap_or_else(|| "csv".to_string());
        let store = match backend.trim().to_ascii_lowercase().as_str() {
            "csv" => StoreConfig::Csv {
                data_dir: var("CIVICBOT_DATA_DIR")
                    .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                    .into(),
            },
            "rocksdb" | "rocks" => StoreConfig::Rocks {
                path: var("CIVICBOT_DB_PATH")
                    .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                    .into(),
            },
            other => return Err(anyhow!("unsupported CIVICBOT_STORE `{other}`")),
        };

        let remote = match var("CLASSIFIER_REMOTE_URL") {
            Some(url) => {
                let timeout_ms = match var("CLASSIFIER_REMOTE_TIMEOUT_MS") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("invalid CLASSIFIER_REMOTE_TIMEOUT_MS `{raw}`"))?,
                    None => DEFAULT_REMOTE_TIMEOUT_MS,
                };
                Some(RemoteConfig {
                    url,
                    token: var("CLASSIFIER_REMOTE_TOKEN"),
                    timeout_ms,
                })
            }
            None => None,
        };

        Ok(Self {
            addr,
            ping_message,
            store,
            remote,
        })
    }
}
