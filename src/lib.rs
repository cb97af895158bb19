// ==========================================
// 便利店智能补货系统 - 核心库
// ==========================================
// 依据: AutoOrder_Master_Spec.md - 系统宪法
// 技术栈: Rust + SQLite
// 系统定位: 每日每店单品订货量决策引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预测与订货规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 批次入口与导出
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CategoryGroup, ConfidenceLevel, DiscrepancySeverity, DiscrepancyType, ModelType,
    PendingSource, PromotionPhase, ShelfLifeGroup, SkipReason, StockSource,
};

// 领域实体
pub use domain::{
    CategoryPattern, DailySalesRow, InventoryState, LiveInventory, PredictionResult,
    ProductInfo, PromotionPeriod,
};

// 引擎
pub use engine::{
    CategoryPolicyRouter, CoefficientPipeline, DemandEstimator, EnsembleBlender,
    FeedbackAdjuster, InventoryResolver, OrderPredictor, OrderQuantitySolver,
    StockDiscrepancyDiagnoser,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// API
pub use api::{BatchRunResult, OrderApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "便利店智能补货系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
