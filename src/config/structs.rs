use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortledgerError};

/// Handler names a deployment may enable
pub const HANDLER_SHORTEN: &str = "shorten";
pub const HANDLER_REDIRECT: &str = "redirect";
pub const HANDLER_METRICS: &str = "metrics";

const KNOWN_HANDLERS: &[&str] = &[HANDLER_SHORTEN, HANDLER_REDIRECT, HANDLER_METRICS];
const KNOWN_BACKENDS: &[&str] = &["memory", "file", "s3"];

/// 启动配置，来源依次为默认值、config.toml、`SLG__*` 环境变量
///
/// 每个 section 都带 `#[serde(default)]`，文件里缺的字段取 `Default` 的值。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Read `path` (default `config.toml`, optional) and layer the environment on top
    ///
    /// e.g. `SLG__STORAGE__BUCKET=links`, `SLG__SERVER__HANDLERS=shorten,redirect`.
    /// A config that fails to parse is reported on stderr and replaced by the defaults.
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or("config.toml");
        match Self::read_layers(path) {
            Ok(loaded) => {
                if std::path::Path::new(path).is_file() {
                    eprintln!("[INFO] Loaded ledger config from {}", path);
                }
                loaded
            }
            Err(e) => {
                eprintln!("[ERROR] Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }

    fn read_layers(path: &str) -> std::result::Result<Self, config::ConfigError> {
        let env = config::Environment::with_prefix("SLG")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.handlers");

        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !KNOWN_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(ShortledgerError::config(format!(
                "Unknown storage backend '{}'. Valid: {}",
                self.storage.backend,
                KNOWN_BACKENDS.join(", ")
            )));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(ShortledgerError::config("storage.bucket cannot be empty"));
        }
        if self.storage.key.trim().is_empty() {
            return Err(ShortledgerError::config("storage.key cannot be empty"));
        }
        if let Some(unknown) = self
            .server
            .handlers
            .iter()
            .find(|h| !KNOWN_HANDLERS.contains(&h.as_str()))
        {
            return Err(ShortledgerError::config(format!(
                "Unknown handler '{}'. Valid: {}",
                unknown,
                KNOWN_HANDLERS.join(", ")
            )));
        }
        Ok(())
    }

    /// Defaults rendered as TOML, used by `config-gen`
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# cannot render sample config: {}", e))
    }

    /// Write this config as TOML, creating missing parent directories
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
            _ => {}
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// 监听地址与启用的 handler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// actix worker 数，启动时限制在 1..=32
    pub cpu_count: usize,
    /// Handlers served by this deployment
    pub handlers: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            cpu_count: num_cpus::get(),
            handlers: KNOWN_HANDLERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn handler_enabled(&self, name: &str) -> bool {
        self.handlers.iter().any(|h| h == name)
    }
}

/// 账本对象的位置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// memory | file | s3
    pub backend: String,
    pub bucket: String,
    pub key: String,
    /// file 后端：bucket 目录所在的根目录
    pub data_dir: String,
    pub region: String,
    /// S3 兼容服务的自定义 endpoint
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".into(),
            bucket: "url-shortener-ledger".into(),
            key: "urls.json".into(),
            data_dir: "data".into(),
            region: "ap-south-1".into(),
            endpoint: None,
        }
    }
}

/// Ledger write strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LedgerWriteMode {
    /// Conditional write against the version that was read
    #[default]
    Optimistic,
    /// Last writer wins
    Overwrite,
}

impl std::fmt::Display for LedgerWriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Optimistic => "optimistic",
            Self::Overwrite => "overwrite",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub write_mode: LedgerWriteMode,
    /// optimistic 模式下冲突后的重试次数
    pub max_conflict_retries: u32,
    pub reject_code_collisions: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            write_mode: LedgerWriteMode::Optimistic,
            max_conflict_retries: 3,
            reject_code_collisions: false,
        }
    }
}

/// 日志输出
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `shortledger=debug`
    pub level: String,
    /// text | json
    pub format: String,
    /// 为空时输出到 stdout
    pub file: Option<String>,
    pub max_backups: u32,
    pub enable_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
            file: None,
            max_backups: 5,
            enable_rotation: true,
        }
    }
}
