// ==========================================
// 便利店智能补货系统 - 配置层
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 11. 配置项全集
// ==========================================
// 职责: 显式、带版本号的引擎配置;构造时注入,运行期只读
// 存储: config_kv 表（覆写）+ 代码内默认值
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置类型
pub use config_manager::ConfigManager;
pub use engine_config::{
    CategoryPolicyConfig, CoefficientConfig, DemandConfig, DiscrepancyConfig, EngineConfig,
    EnsembleConfig, FeedbackConfig, InventoryConfig, SolverConfig,
};
