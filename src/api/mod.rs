// ==========================================
// 便利店智能补货系统 - API 层
// ==========================================

pub mod error;
pub mod order_api;

pub use error::{ApiError, ApiResult};
pub use order_api::{BatchRunResult, OrderApi};
