// ==========================================
// 便利店智能补货系统 - 领域类型定义
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART C 数据与状态体系
// 依据: Prediction_Engine_Specs_v1.2.md - 0.2 库存来源体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存来源 (Stock Source)
// ==========================================
// 红线: 来源标签必须保留到最终决策记录,用于审计与差异诊断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSource {
    ExplicitCache,    // 批次显式缓存（采集层注入）
    LiveFresh,        // 实时快照（TTL 内）
    LiveStaleHistory, // 实时快照过期,历史库存更小者胜出
    LiveStaleLive,    // 实时快照过期,但仍小于历史值
    HistoryOnly,      // 仅历史库存
    None,             // 无任何来源
}

impl fmt::Display for StockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockSource::ExplicitCache => write!(f, "EXPLICIT_CACHE"),
            StockSource::LiveFresh => write!(f, "LIVE_FRESH"),
            StockSource::LiveStaleHistory => write!(f, "LIVE_STALE_HISTORY"),
            StockSource::LiveStaleLive => write!(f, "LIVE_STALE_LIVE"),
            StockSource::HistoryOnly => write!(f, "HISTORY_ONLY"),
            StockSource::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 入库预定来源 (Pending Source)
// ==========================================
// 过期的实时入库预定视为已全部到货,强制归零
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingSource {
    ExplicitCache,  // 批次显式缓存
    LiveFresh,      // 实时快照（TTL 内）
    LiveStaleZeroed, // 实时快照过期 → 归零
    None,           // 无任何来源
}

impl fmt::Display for PendingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingSource::ExplicitCache => write!(f, "EXPLICIT_CACHE"),
            PendingSource::LiveFresh => write!(f, "LIVE_FRESH"),
            PendingSource::LiveStaleZeroed => write!(f, "LIVE_STALE_ZEROED"),
            PendingSource::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 品类组 (Category Group)
// ==========================================
// 依据: Prediction_Engine_Specs 4. 品类策略路由
// 红线: 每个单品恰好命中一个品类组,判定顺序固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryGroup {
    Ramen,              // 方便面
    Tobacco,            // 香烟
    Beer,               // 啤酒
    Soju,               // 烧酒
    Food,               // 即食鲜食（饭团/便当/三明治）
    Perishable,         // 日配（乳品/豆腐等短保）
    Beverage,           // 饮料
    Frozen,             // 冷冻食品
    InstantMeal,        // 速食/加热即食
    Dessert,            // 甜品
    Snack,              // 休闲零食
    GeneralAlcohol,     // 其他酒类（洋酒/葡萄酒）
    DailyNecessity,     // 日用必需品
    GeneralMerchandise, // 一般百货
    Default,            // 默认策略
}

impl CategoryGroup {
    /// 品类组判定优先顺序（命中即停）
    pub const PRIORITY_ORDER: [CategoryGroup; 14] = [
        CategoryGroup::Ramen,
        CategoryGroup::Tobacco,
        CategoryGroup::Beer,
        CategoryGroup::Soju,
        CategoryGroup::Food,
        CategoryGroup::Perishable,
        CategoryGroup::Beverage,
        CategoryGroup::Frozen,
        CategoryGroup::InstantMeal,
        CategoryGroup::Dessert,
        CategoryGroup::Snack,
        CategoryGroup::GeneralAlcohol,
        CategoryGroup::DailyNecessity,
        CategoryGroup::GeneralMerchandise,
    ];

    /// 是否属于食品温度交叉系数的适用范围
    pub fn is_food_like(&self) -> bool {
        matches!(
            self,
            CategoryGroup::Food
                | CategoryGroup::Perishable
                | CategoryGroup::InstantMeal
                | CategoryGroup::Dessert
        )
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryGroup::Ramen => write!(f, "RAMEN"),
            CategoryGroup::Tobacco => write!(f, "TOBACCO"),
            CategoryGroup::Beer => write!(f, "BEER"),
            CategoryGroup::Soju => write!(f, "SOJU"),
            CategoryGroup::Food => write!(f, "FOOD"),
            CategoryGroup::Perishable => write!(f, "PERISHABLE"),
            CategoryGroup::Beverage => write!(f, "BEVERAGE"),
            CategoryGroup::Frozen => write!(f, "FROZEN"),
            CategoryGroup::InstantMeal => write!(f, "INSTANT_MEAL"),
            CategoryGroup::Dessert => write!(f, "DESSERT"),
            CategoryGroup::Snack => write!(f, "SNACK"),
            CategoryGroup::GeneralAlcohol => write!(f, "GENERAL_ALCOHOL"),
            CategoryGroup::DailyNecessity => write!(f, "DAILY_NECESSITY"),
            CategoryGroup::GeneralMerchandise => write!(f, "GENERAL_MERCHANDISE"),
            CategoryGroup::Default => write!(f, "DEFAULT"),
        }
    }
}

// ==========================================
// 保质期分组 (Shelf Life Group)
// ==========================================
// 依据: Prediction_Engine_Specs 4.5 食品保质期分桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShelfLifeGroup {
    UltraShort, // ≤1天
    Short,      // 2~3天
    Medium,     // 4~7天
    Long,       // 8~30天
    VeryLong,   // >30天
}

impl ShelfLifeGroup {
    /// 由保质期天数分桶
    pub fn from_days(days: i32) -> Self {
        match days {
            d if d <= 1 => ShelfLifeGroup::UltraShort,
            d if d <= 3 => ShelfLifeGroup::Short,
            d if d <= 7 => ShelfLifeGroup::Medium,
            d if d <= 30 => ShelfLifeGroup::Long,
            _ => ShelfLifeGroup::VeryLong,
        }
    }
}

impl fmt::Display for ShelfLifeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShelfLifeGroup::UltraShort => write!(f, "ULTRA_SHORT"),
            ShelfLifeGroup::Short => write!(f, "SHORT"),
            ShelfLifeGroup::Medium => write!(f, "MEDIUM"),
            ShelfLifeGroup::Long => write!(f, "LONG"),
            ShelfLifeGroup::VeryLong => write!(f, "VERY_LONG"),
        }
    }
}

// ==========================================
// 置信等级 (Confidence Level)
// ==========================================
// 由有效数据天数派生: ≥21 高, ≥7 中, 其余低
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_data_days(data_days: i32) -> Self {
        match data_days {
            d if d >= 21 => ConfidenceLevel::High,
            d if d >= 7 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "LOW"),
            ConfidenceLevel::Medium => write!(f, "MEDIUM"),
            ConfidenceLevel::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 模型类型 (Model Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    RuleOnly, // 纯规则
    Blended,  // 规则 + 统计模型融合
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::RuleOnly => write!(f, "RULE_ONLY"),
            ModelType::Blended => write!(f, "BLENDED"),
        }
    }
}

// ==========================================
// 跳过订货原因 (Skip Reason)
// ==========================================
// 红线: 跳过信号一旦置位,最终订货量必须为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    NotOrderableWeekday, // 当日不可订货
    StockCapExceeded,    // 库存上限已满
    CutItem,             // 停售/切品
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotOrderableWeekday => write!(f, "NOT_ORDERABLE_WEEKDAY"),
            SkipReason::StockCapExceeded => write!(f, "STOCK_CAP_EXCEEDED"),
            SkipReason::CutItem => write!(f, "CUT_ITEM"),
        }
    }
}

// ==========================================
// 促销阶段 (Promotion Phase)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionPhase {
    None,    // 非促销期
    RampIn,  // 促销起始段（前2天）
    Steady,  // 促销稳定段
    RampOut, // 促销收尾段（后2天）
}

impl fmt::Display for PromotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionPhase::None => write!(f, "NONE"),
            PromotionPhase::RampIn => write!(f, "RAMP_IN"),
            PromotionPhase::Steady => write!(f, "STEADY"),
            PromotionPhase::RampOut => write!(f, "RAMP_OUT"),
        }
    }
}

// ==========================================
// 库存差异类型 (Discrepancy Type)
// ==========================================
// 依据: Prediction_Engine_Specs 9. 库存差异诊断
// 判定顺序固定: GHOST → STALE → PENDING → OVER → UNDER → NONE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyType {
    GhostStock,      // 幽灵库存（预测时有,执行时无）
    StaleFallback,   // 过期快照回退导致的偏差
    PendingMismatch, // 入库预定不一致
    OverOrder,       // 过量订货
    UnderOrder,      // 订货不足
    None,            // 无显著差异
}

impl fmt::Display for DiscrepancyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscrepancyType::GhostStock => write!(f, "GHOST_STOCK"),
            DiscrepancyType::StaleFallback => write!(f, "STALE_FALLBACK"),
            DiscrepancyType::PendingMismatch => write!(f, "PENDING_MISMATCH"),
            DiscrepancyType::OverOrder => write!(f, "OVER_ORDER"),
            DiscrepancyType::UnderOrder => write!(f, "UNDER_ORDER"),
            DiscrepancyType::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 差异严重度 (Discrepancy Severity)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancySeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for DiscrepancySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscrepancySeverity::Low => write!(f, "LOW"),
            DiscrepancySeverity::Medium => write!(f, "MEDIUM"),
            DiscrepancySeverity::High => write!(f, "HIGH"),
        }
    }
}
