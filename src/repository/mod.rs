// ==========================================
// 便利店智能补货系统 - 数据仓储层
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART D 引擎铁律
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod external_factor_repo;
pub mod inventory_repo;
pub mod prediction_log_repo;
pub mod product_repo;
pub mod promotion_repo;
pub mod sales_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use external_factor_repo::{
    ExternalFactorRepository, HolidayContext, HolidayInfo, HolidayPosition,
};
pub use inventory_repo::{InventoryRepository, WasteStats};
pub use prediction_log_repo::{OrderDiffRecord, PredictionLogRepository, ReadingPair};
pub use product_repo::ProductRepository;
pub use promotion_repo::PromotionRepository;
pub use sales_repo::SalesHistoryRepository;
