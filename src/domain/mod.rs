// ==========================================
// 便利店智能补货系统 - 领域层
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART C 数据与状态体系
// 红线: 领域实体不含数据访问,每次预测调用前新鲜构造
// ==========================================

pub mod inventory;
pub mod prediction;
pub mod product;
pub mod sales;
pub mod types;

// 重导出核心实体
pub use inventory::{InventoryState, LiveInventory, PromotionPeriod};
pub use prediction::{CategoryPattern, CoefficientTrace, PredictionResult, QualityFlags};
pub use product::ProductInfo;
pub use sales::{DailySalesRow, TobaccoEventStats, WeekdayStats};
