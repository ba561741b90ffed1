use serde::{Deserialize, Serialize};

use crate::errors::{GeoIpError, Result};
use crate::services::geoip::{DEFAULT_PLACEHOLDER_PREFIX, HeaderNames};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：GEOIP__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "GEOIP";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - logging: 日志配置
/// - geoip: 地址库与输出配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
}

impl StaticConfig {
    /// 从指定路径加载，失败时回退到默认值
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                Self::default()
            }
        }
    }

    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：GEOIP，分隔符：__
    pub fn load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GeoIpError::config(format!("Failed to build config: {}", e)))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| GeoIpError::config(format!("Failed to deserialize config: {}", e)))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GeoIpError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// GeoIP 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// MaxMindDB 文件路径 (GeoLite2-City.mmdb)
    #[serde(default)]
    pub database_path: Option<String>,

    /// 前缀表文件路径（未配置 database_path 时使用）
    #[serde(default)]
    pub prefix_table_path: Option<String>,

    /// 是否信任转发头中最左侧的地址
    ///
    /// 开启后客户端可伪造来源地址，仅应在可信反向代理之后开启。
    #[serde(default)]
    pub trust_forwarded_header: bool,

    /// 转发头名称
    #[serde(default = "default_forwarded_header")]
    pub forwarded_header: String,

    /// 占位符前缀
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,

    /// 请求头名称
    #[serde(default)]
    pub headers: HeaderNames,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_forwarded_header() -> String {
    "X-Forwarded-For".to_string()
}

fn default_placeholder_prefix() -> String {
    DEFAULT_PLACEHOLDER_PREFIX.to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            prefix_table_path: None,
            trust_forwarded_header: false,
            forwarded_header: default_forwarded_header(),
            placeholder_prefix: default_placeholder_prefix(),
            headers: HeaderNames::default(),
        }
    }
}
