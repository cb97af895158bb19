// ==========================================
// 便利店智能补货系统 - 引擎层
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART B 决策流水线
// ==========================================
// 分层: 库存裁决 → 需求估计 → 系数管线 → 品类策略
//       → 订货量求解;融合/反馈为显式可选能力;
//       差异诊断为离线旁路
// ==========================================

pub mod category;
pub mod coefficient;
pub mod demand_estimator;
pub mod discrepancy;
pub mod ensemble;
pub mod features;
pub mod feedback;
pub mod inventory_resolver;
pub mod order_solver;
pub mod outlier;
pub mod predictor;

pub use category::CategoryPolicyRouter;
pub use coefficient::CoefficientPipeline;
pub use demand_estimator::DemandEstimator;
pub use discrepancy::StockDiscrepancyDiagnoser;
pub use ensemble::EnsembleBlender;
pub use feedback::FeedbackAdjuster;
pub use inventory_resolver::InventoryResolver;
pub use order_solver::OrderQuantitySolver;
pub use predictor::{BatchContext, BatchPredictionOutcome, OrderPredictor};

use crate::repository::error::RepositoryError;
use thiserror::Error;

// ==========================================
// EngineError - 引擎层错误
// ==========================================
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}
