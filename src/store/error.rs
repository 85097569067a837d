//! 题库存储错误类型定义
//!
//! 本模块定义存储层操作的错误类型和结果类型别名。
//! 处理器按端点自行决定 HTTP 状态码，这里只描述"发生了什么"。

use thiserror::Error;

/// 存储层操作结果类型别名
pub type StoreResult<T> = Result<T, StoreError>;

/// 存储层错误类型
#[derive(Debug, Error)]
pub enum StoreError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(String),

    /// 连接池错误
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    /// 无效参数
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: String, reason: String },

    /// IO 错误（数据库目录创建等）
    #[error("IO error: {0}")]
    Io(String),
}

impl StoreError {
    pub fn not_found(resource_type: &str, id: impl ToString) -> Self {
        StoreError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(format!("{:#}", err))
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Pool(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
