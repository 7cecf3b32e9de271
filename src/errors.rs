use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortledgerError {
    InvalidInput(String),
    NotFound(String),
    StoreFailure(String),
    Serialization(String),
    Conflict(String),
    Config(String),
}

impl ShortledgerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortledgerError::InvalidInput(_) => "E001",
            ShortledgerError::NotFound(_) => "E002",
            ShortledgerError::StoreFailure(_) => "E003",
            ShortledgerError::Serialization(_) => "E004",
            ShortledgerError::Conflict(_) => "E005",
            ShortledgerError::Config(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortledgerError::InvalidInput(_) => "Invalid Input",
            ShortledgerError::NotFound(_) => "Resource Not Found",
            ShortledgerError::StoreFailure(_) => "Store Failure",
            ShortledgerError::Serialization(_) => "Serialization Error",
            ShortledgerError::Conflict(_) => "Write Conflict",
            ShortledgerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortledgerError::InvalidInput(msg) => msg,
            ShortledgerError::NotFound(msg) => msg,
            ShortledgerError::StoreFailure(msg) => msg,
            ShortledgerError::Serialization(msg) => msg,
            ShortledgerError::Conflict(msg) => msg,
            ShortledgerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// HTTP 状态码：所有错误统一为 400，客户端靠 message 区分
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::BAD_REQUEST
    }
}

impl fmt::Display for ShortledgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortledgerError {}

// 便捷的构造函数
impl ShortledgerError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::InvalidInput(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::NotFound(msg.into())
    }

    pub fn store_failure<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::StoreFailure(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::Serialization(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::Conflict(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortledgerError::Config(msg.into())
    }
}

impl From<std::io::Error> for ShortledgerError {
    fn from(err: std::io::Error) -> Self {
        ShortledgerError::StoreFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ShortledgerError {
    fn from(err: serde_json::Error) -> Self {
        ShortledgerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortledgerError>;
