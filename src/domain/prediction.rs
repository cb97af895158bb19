// ==========================================
// 便利店智能补货系统 - 预测决策记录
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART C 数据与状态体系
// 依据: Prediction_Engine_Specs_v1.2.md - 7. 决策记录全字段
// 红线: 决策记录是输出单位也是测试断言单位,字段不可省略
// ==========================================

use crate::domain::types::{
    CategoryGroup, ConfidenceLevel, ModelType, PendingSource, PromotionPhase, ShelfLifeGroup,
    SkipReason, StockSource,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// QualityFlags - 数据质量标志
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub imputed_days: i32,        // 断货插补天数
    pub absent_days: i32,         // 无记录天数
    pub outliers_removed: i32,    // 离群剔除点数
    pub feature_blended: bool,    // 是否融合滚动/滞后特征
    pub intermittent: bool,       // 间歇性需求
    pub highly_intermittent: bool, // 高度间歇性需求
}

// ==========================================
// CoefficientTrace - 系数应用轨迹
// ==========================================
// 固定应用顺序: 节假日 → 绝对气温 → 气温差 → 食品温度交叉
//              → 星期 → 季节 → 关联提升 → 趋势 → 复合下限钳制
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTrace {
    pub holiday: f64,
    pub temperature_abs: f64,
    pub temperature_delta: f64,
    pub food_temperature_cross: f64,
    pub weekday: f64,
    pub weekday_learned: bool, // 星期系数是否来自 DB 学习值
    pub season: f64,
    pub association: f64,      // 关联提升（≥1.0）
    pub trend: f64,
    pub floor_clamped: bool,   // 是否触发 15% 复合下限
}

impl Default for CoefficientTrace {
    fn default() -> Self {
        Self {
            holiday: 1.0,
            temperature_abs: 1.0,
            temperature_delta: 1.0,
            food_temperature_cross: 1.0,
            weekday: 1.0,
            weekday_learned: false,
            season: 1.0,
            association: 1.0,
            trend: 1.0,
            floor_clamped: false,
        }
    }
}

// ==========================================
// CategoryPattern - 品类策略结果（标签联合）
// ==========================================
// 红线: 每次预测恰好一个变体生效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryPattern {
    Tobacco {
        carton_buffer: f64,        // 整条购买缓冲
        sellout_multiplier: f64,   // 售罄频率乘数
        max_stock: f64,            // 硬性库存上限
        available_space: f64,      // 可用空间 = 上限 - 库存 - 预定
    },
    Food {
        shelf_life_group: ShelfLifeGroup,
        safety_days: f64,
        disuse_coefficient: f64,   // 动态学习的废弃系数
        gap_consumption: f64,      // 配送间隔消耗量
        data_source: String,       // 废弃系数来源（LEARNED / DEFAULT）
    },
    Beer {
        weekday_coefficient: f64,  // 策略内重算的星期系数
        safety_days: f64,
        max_stock: f64,
    },
    Soju {
        weekday_coefficient: f64,
        safety_days: f64,
        max_stock: f64,
    },
    Ramen {
        safety_days: f64,
        bundle_aware: bool,        // 按捆销售修正
    },
    Beverage {
        safety_days: f64,
        temperature_sensitive: bool,
    },
    Frozen {
        safety_days: f64,
        max_stock: f64,
    },
    InstantMeal {
        safety_days: f64,
        meal_time_weighted: bool,
    },
    Dessert {
        safety_days: f64,
        weekend_boost: f64,
    },
    Snack {
        safety_days: f64,
    },
    GeneralAlcohol {
        safety_days: f64,
        slow_mover: bool,
    },
    DailyNecessity {
        safety_days: f64,
        turnover_level: i32,
    },
    GeneralMerchandise {
        safety_days: f64,
        turnover_level: i32,
    },
    Default {
        shelf_life_group: ShelfLifeGroup,
        safety_days: f64,
        turnover_multiplier: f64,
    },
    None,
}

impl CategoryPattern {
    /// 所属品类组（用于决策记录展示）
    pub fn group(&self) -> CategoryGroup {
        match self {
            CategoryPattern::Tobacco { .. } => CategoryGroup::Tobacco,
            CategoryPattern::Food { .. } => CategoryGroup::Food,
            CategoryPattern::Beer { .. } => CategoryGroup::Beer,
            CategoryPattern::Soju { .. } => CategoryGroup::Soju,
            CategoryPattern::Ramen { .. } => CategoryGroup::Ramen,
            CategoryPattern::Beverage { .. } => CategoryGroup::Beverage,
            CategoryPattern::Frozen { .. } => CategoryGroup::Frozen,
            CategoryPattern::InstantMeal { .. } => CategoryGroup::InstantMeal,
            CategoryPattern::Dessert { .. } => CategoryGroup::Dessert,
            CategoryPattern::Snack { .. } => CategoryGroup::Snack,
            CategoryPattern::GeneralAlcohol { .. } => CategoryGroup::GeneralAlcohol,
            CategoryPattern::DailyNecessity { .. } => CategoryGroup::DailyNecessity,
            CategoryPattern::GeneralMerchandise { .. } => CategoryGroup::GeneralMerchandise,
            CategoryPattern::Default { .. } | CategoryPattern::None => CategoryGroup::Default,
        }
    }
}

// ==========================================
// PredictionResult - 单品订货决策记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    // ===== 标识 =====
    pub prediction_id: String,     // UUID
    pub store_id: String,
    pub item_code: String,
    pub item_name: String,
    pub category_code: i64,
    pub category_group: CategoryGroup,
    pub target_date: NaiveDate,

    // ===== 需求估计 =====
    pub raw_predicted_qty: f64,    // 系数前点估计
    pub adjusted_qty: f64,         // 系数后需求
    pub data_days: i32,
    pub confidence: ConfidenceLevel,
    pub quality: QualityFlags,
    pub coefficients: CoefficientTrace,

    // ===== 库存状态 =====
    pub current_stock: f64,
    pub pending_qty: f64,
    pub stock_source: StockSource,
    pub pending_source: PendingSource,
    pub stock_is_stale: bool,

    // ===== 策略结果 =====
    pub safety_stock: f64,
    pub stock_cap: Option<f64>,
    pub category_pattern: CategoryPattern,
    pub skip_reason: Option<SkipReason>,

    // ===== 最终决策 =====
    pub promotion_phase: PromotionPhase,
    pub model_type: ModelType,
    pub order_qty: i64,            // 最终订货量（≥0,订货倍数的整数倍）

    // ===== 审计 =====
    pub created_at: DateTime<Utc>,
}

impl PredictionResult {
    /// 是否产生实际订货
    pub fn has_order(&self) -> bool {
        self.order_qty > 0
    }
}
