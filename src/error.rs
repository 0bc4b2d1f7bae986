use thiserror::Error;

/// 被动数据源请求失败，只在数据源内部使用，最终折叠为空列表
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("非成功状态码: {0}")]
    Status(u16),
    #[error("响应格式错误: {0}")]
    Malformed(String),
}

/// 单次DoH查询失败，即“无结果”，不等同于空应答
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("DoH请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DoH非成功状态码: {0}")]
    Status(u16),
    #[error("DNS响应码: {0}")]
    Rcode(i64),
    #[error("DoH响应格式错误: {0}")]
    Malformed(String),
}

/// 调用方可见的错误
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("目标域名为空")]
    InvalidDomain,
    #[error("配置错误: {0}")]
    InvalidConfig(String),
    #[error("HTTP客户端初始化失败: {0}")]
    Client(#[from] reqwest::Error),
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}
