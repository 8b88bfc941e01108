//! Configuration loaded from environment variables and an optional `.env`

use crate::browser::DEFAULT_OPERATION_TIMEOUT;
use crate::providers::memory::MemoryStore;
use crate::providers::s3::{S3Store, S3StoreConfig};
use crate::providers::ObjectStore;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_REGION: &str = "oss-cn-shenzhen";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub operation_timeout: Duration,
    pub default_upload_folder: String,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory { bucket: String },
    S3(S3StoreConfig),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Process environment, falling back to `.env` in the working directory.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_file(Path::new(".env"))
    }

    /// Process environment first, then the dotenv file at `path`. A missing
    /// file is not an error.
    pub fn from_env_file(path: &Path) -> anyhow::Result<Self> {
        let file_vars: HashMap<String, String> = match dotenvy::from_path_iter(path) {
            Ok(iter) => {
                info!("config: reading {}", path.display());
                iter.collect::<Result<HashMap<String, String>, _>>()
                    .map_err(|e| anyhow::anyhow!("Invalid {}: {}", path.display(), e))?
            }
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => anyhow::bail!("Failed to read {}: {}", path.display(), e),
        };

        Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// Build from any variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| anyhow::anyhow!("{} must be set when STORE_MODE=s3", name))
        };

        let store_mode = var("STORE_MODE").unwrap_or_else(|| "s3".to_string());
        let store = match store_mode.as_str() {
            "memory" => StoreConfig::Memory {
                bucket: var("OSS_BUCKET").unwrap_or_else(|| "local".to_string()),
            },
            "s3" => StoreConfig::S3(S3StoreConfig {
                bucket: required("OSS_BUCKET")?,
                region: var("OSS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key_id: required("OSS_ACCESS_KEY_ID")?,
                secret_access_key: required("OSS_ACCESS_KEY_SECRET")?,
                endpoint: var("OSS_ENDPOINT"),
                force_path_style: var("OSS_FORCE_PATH_STYLE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            }),
            _ => anyhow::bail!("Unknown store mode: {}", store_mode),
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
        };

        let operation_timeout = Duration::from_secs(parse_or(
            var("OPERATION_TIMEOUT_SECS"),
            "OPERATION_TIMEOUT_SECS",
            DEFAULT_OPERATION_TIMEOUT.as_secs(),
        )?);

        Ok(Self {
            store,
            server,
            operation_timeout,
            default_upload_folder: var("DEFAULT_UPLOAD_FOLDER")
                .unwrap_or_else(|| "uploads".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", name, raw, e)),
        None => Ok(default),
    }
}

impl StoreConfig {
    /// Build the one store client the process shares.
    pub fn create_store(&self) -> Arc<dyn ObjectStore> {
        match self {
            StoreConfig::Memory { bucket } => Arc::new(MemoryStore::new(bucket)),
            StoreConfig::S3(config) => Arc::new(S3Store::new(config.clone())),
        }
    }

    pub fn bucket(&self) -> &str {
        match self {
            StoreConfig::Memory { bucket } => bucket,
            StoreConfig::S3(config) => &config.bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn s3_mode_reads_credentials_and_defaults_region() {
        let config = load(&[
            ("OSS_BUCKET", "photos"),
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "secret"),
            ("OSS_ENDPOINT", "oss-cn-shenzhen.aliyuncs.com"),
        ])
        .unwrap();

        match &config.store {
            StoreConfig::S3(s3) => {
                assert_eq!(s3.bucket, "photos");
                assert_eq!(s3.region, DEFAULT_REGION);
                assert_eq!(s3.endpoint.as_deref(), Some("oss-cn-shenzhen.aliyuncs.com"));
                assert!(!s3.force_path_style);
            }
            other => panic!("expected s3 store, got {:?}", other),
        }
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.operation_timeout, DEFAULT_OPERATION_TIMEOUT);
        assert_eq!(config.default_upload_folder, "uploads");
    }

    #[test]
    fn s3_mode_without_endpoint_addresses_aliyun_oss() {
        let config = load(&[
            ("OSS_BUCKET", "everyusb-usky"),
            ("OSS_ACCESS_KEY_ID", "id"),
            ("OSS_ACCESS_KEY_SECRET", "secret"),
        ])
        .unwrap();

        match &config.store {
            StoreConfig::S3(s3) => {
                assert_eq!(s3.endpoint_url(), "https://oss-cn-shenzhen.aliyuncs.com");
                assert_eq!(
                    s3.object_url("docs/a.txt"),
                    "https://everyusb-usky.oss-cn-shenzhen.aliyuncs.com/docs/a.txt"
                );
            }
            other => panic!("expected s3 store, got {:?}", other),
        }
    }

    #[test]
    fn dotenv_file_supplies_missing_variables() {
        let path = std::env::temp_dir().join(format!("bucket-browser-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "# local settings\nSTORE_MODE=memory\nOSS_BUCKET=from-dotenv\nDEFAULT_UPLOAD_FOLDER=\"dotenv-inbox\"\n",
        )
        .unwrap();

        let config = AppConfig::from_env_file(&path);
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert!(matches!(config.store, StoreConfig::Memory { .. }));
        assert_eq!(config.store.bucket(), "from-dotenv");
        assert_eq!(config.default_upload_folder, "dotenv-inbox");
    }

    #[test]
    fn s3_mode_without_bucket_fails() {
        let err = load(&[("OSS_ACCESS_KEY_ID", "id")]).unwrap_err();
        assert!(err.to_string().contains("OSS_BUCKET"));
    }

    #[test]
    fn memory_mode_needs_no_credentials() {
        let config = load(&[("STORE_MODE", "memory"), ("PORT", "8080")]).unwrap();
        assert!(matches!(config.store, StoreConfig::Memory { .. }));
        assert_eq!(config.store.bucket(), "local");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn unknown_mode_and_bad_numbers_are_rejected() {
        assert!(load(&[("STORE_MODE", "ftp")]).is_err());
        assert!(load(&[("STORE_MODE", "memory"), ("PORT", "http")]).is_err());
    }
}
