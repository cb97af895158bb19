// ==========================================
// 便利店智能补货系统 - API 层错误
// ==========================================

use crate::engine::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),

    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("配置加载失败: {0}")]
    Config(String),

    #[error("数据库连接失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("导出失败: {0}")]
    Export(#[from] csv::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
