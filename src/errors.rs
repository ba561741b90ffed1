use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoIpError {
    AddressParse(String),
    DatabaseOpen(String),
    DatabaseLookup(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl GeoIpError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoIpError::AddressParse(_) => "E001",
            GeoIpError::DatabaseOpen(_) => "E002",
            GeoIpError::DatabaseLookup(_) => "E003",
            GeoIpError::Config(_) => "E004",
            GeoIpError::FileOperation(_) => "E005",
            GeoIpError::Serialization(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoIpError::AddressParse(_) => "Address Parse Error",
            GeoIpError::DatabaseOpen(_) => "Database Open Error",
            GeoIpError::DatabaseLookup(_) => "Database Lookup Error",
            GeoIpError::Config(_) => "Configuration Error",
            GeoIpError::FileOperation(_) => "File Operation Error",
            GeoIpError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoIpError::AddressParse(msg) => msg,
            GeoIpError::DatabaseOpen(msg) => msg,
            GeoIpError::DatabaseLookup(msg) => msg,
            GeoIpError::Config(msg) => msg,
            GeoIpError::FileOperation(msg) => msg,
            GeoIpError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server / CLI 启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为地址解析错误（调用方据此决定跳过富化）
    pub fn is_address_parse(&self) -> bool {
        matches!(self, GeoIpError::AddressParse(_))
    }
}

impl fmt::Display for GeoIpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoIpError {}

// 便捷的构造函数
impl GeoIpError {
    pub fn address_parse<T: Into<String>>(msg: T) -> Self {
        GeoIpError::AddressParse(msg.into())
    }

    pub fn database_open<T: Into<String>>(msg: T) -> Self {
        GeoIpError::DatabaseOpen(msg.into())
    }

    pub fn database_lookup<T: Into<String>>(msg: T) -> Self {
        GeoIpError::DatabaseLookup(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoIpError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoIpError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeoIpError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for GeoIpError {
    fn from(err: std::io::Error) -> Self {
        GeoIpError::FileOperation(err.to_string())
    }
}

impl From<maxminddb::MaxMindDbError> for GeoIpError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        GeoIpError::DatabaseLookup(err.to_string())
    }
}

impl From<toml::de::Error> for GeoIpError {
    fn from(err: toml::de::Error) -> Self {
        GeoIpError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for GeoIpError {
    fn from(err: serde_json::Error) -> Self {
        GeoIpError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoIpError>;
