// ==========================================
// 便利店智能补货系统 - 引擎配置结构
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 11. 配置项全集
// 红线: 配置在构造时注入引擎,运行期只读;
//       禁止模块级可变全局状态,保证可测试与可复现
// ==========================================

use crate::domain::types::{CategoryGroup, ShelfLifeGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// EngineConfig - 引擎配置全集
// ==========================================
// 构造路径: EngineConfig::default() → ConfigManager 套用 config_kv 覆写
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 配置版本号（随决策记录快照留存）
    pub config_version: String,

    pub demand: DemandConfig,
    pub coefficient: CoefficientConfig,
    pub inventory: InventoryConfig,
    pub category: CategoryPolicyConfig,
    pub solver: SolverConfig,
    pub ensemble: EnsembleConfig,
    pub feedback: FeedbackConfig,
    pub discrepancy: DiscrepancyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: "v1.2-default".to_string(),
            demand: DemandConfig::default(),
            coefficient: CoefficientConfig::default(),
            inventory: InventoryConfig::default(),
            category: CategoryPolicyConfig::default(),
            solver: SolverConfig::default(),
            ensemble: EnsembleConfig::default(),
            feedback: FeedbackConfig::default(),
            discrepancy: DiscrepancyConfig::default(),
        }
    }
}

// ==========================================
// DemandConfig - 需求估计参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandConfig {
    /// 日历完整窗口天数
    pub window_days: i32,
    /// 离群清洗最少样本数
    pub min_points_for_outlier: i32,
    /// 最近 1~3 天权重
    pub recent_weights: [f64; 3],
    /// 第 4~7 天线性衰减起点权重（衰减到 base_weight）
    pub fade_start_weight: f64,
    /// 第 8 天及更早的基础权重
    pub base_weight: f64,
    /// 节假日期间样本降权
    pub holiday_day_weight: f64,
    /// 促销期间样本降权
    pub promo_day_weight: f64,
    /// 特征融合所需最少真实数据天数
    pub feature_min_days: i32,
    /// 特征融合权重下限/上限（按特征质量线性插值）
    pub feature_blend_min: f64,
    pub feature_blend_max: f64,
    /// 达到融合权重上限所需数据天数
    pub feature_full_quality_days: i32,
    /// 指数加权均值跨度
    pub ewm_span: f64,
    /// 间歇性需求阈值（售出日占比）
    pub intermittent_low_ratio: f64,
    pub intermittent_very_low_ratio: f64,
    /// 间歇性衰减系数与下限
    pub intermittent_attenuation: f64,
    pub intermittent_floor: f64,
    pub very_low_floor: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            min_points_for_outlier: 5,
            recent_weights: [3.0, 2.5, 2.0],
            fade_start_weight: 2.0,
            base_weight: 1.0,
            holiday_day_weight: 0.5,
            promo_day_weight: 0.6,
            feature_min_days: 7,
            feature_blend_min: 0.10,
            feature_blend_max: 0.40,
            feature_full_quality_days: 21,
            ewm_span: 7.0,
            intermittent_low_ratio: 0.25,
            intermittent_very_low_ratio: 0.10,
            intermittent_attenuation: 0.7,
            intermittent_floor: 0.10,
            very_low_floor: 0.05,
        }
    }
}

// ==========================================
// CoefficientConfig - 乘数管线参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientConfig {
    /// 复合下限（系数后结果不得低于系数前的该比例）
    pub compound_floor_ratio: f64,

    // ===== 节假日 =====
    /// 假期长度 → 基础系数（1天/2天/3天及以上）
    pub holiday_length_coefs: [f64; 3],
    /// 假期位置修正（前日/当日/翌日）
    pub holiday_position_before: f64,
    pub holiday_position_during: f64,
    pub holiday_position_after: f64,
    /// 品类敏感度（0=不敏感,1=全额生效）
    pub holiday_sensitivity: HashMap<CategoryGroup, f64>,

    // ===== 气温 =====
    pub temp_hot_threshold: f64,
    pub temp_extreme_hot_threshold: f64,
    pub temp_cold_threshold: f64,
    /// 高温敏感品类（饮料/冷冻/甜品/啤酒）的系数
    pub temp_hot_coef: f64,
    pub temp_extreme_hot_coef: f64,
    /// 低温敏感品类（速食/方便面）的系数
    pub temp_cold_coef: f64,
    /// 日间温差阈值与系数
    pub temp_delta_threshold: f64,
    pub temp_delta_coef: f64,
    /// 食品温度交叉: 高温日鲜食折减
    pub food_cross_hot_threshold: f64,
    pub food_cross_hot_coef: f64,

    // ===== 星期 =====
    /// 品类默认星期系数表（index 0=周一 ... 6=周日）
    pub weekday_tables: HashMap<CategoryGroup, [f64; 7]>,
    /// DB 学习星期系数的最少样本天数（仅食品类启用学习值）
    pub weekday_learned_min_days: i32,
    /// 学习系数钳制范围
    pub weekday_learned_min: f64,
    pub weekday_learned_max: f64,

    // ===== 季节 =====
    /// 品类月度系数表（index 0=1月 ... 11=12月）
    pub season_tables: HashMap<CategoryGroup, [f64; 12]>,

    // ===== 关联与趋势 =====
    /// 关联提升上限（提升只增不减,≥1.0）
    pub association_cap: f64,
    /// 趋势斜率阈值与方向系数
    pub trend_slope_threshold: f64,
    pub trend_up_coef: f64,
    pub trend_down_coef: f64,
}

impl Default for CoefficientConfig {
    fn default() -> Self {
        let mut holiday_sensitivity = HashMap::new();
        holiday_sensitivity.insert(CategoryGroup::Beer, 1.0);
        holiday_sensitivity.insert(CategoryGroup::Soju, 1.0);
        holiday_sensitivity.insert(CategoryGroup::Snack, 0.8);
        holiday_sensitivity.insert(CategoryGroup::Beverage, 0.8);
        holiday_sensitivity.insert(CategoryGroup::Food, 0.6);
        holiday_sensitivity.insert(CategoryGroup::InstantMeal, 0.6);
        holiday_sensitivity.insert(CategoryGroup::Dessert, 0.7);
        holiday_sensitivity.insert(CategoryGroup::Tobacco, 0.3);
        holiday_sensitivity.insert(CategoryGroup::DailyNecessity, 0.2);

        let mut weekday_tables = HashMap::new();
        // 酒类周末前高峰
        weekday_tables.insert(
            CategoryGroup::Beer,
            [0.90, 0.90, 0.95, 1.00, 1.30, 1.40, 1.10],
        );
        weekday_tables.insert(
            CategoryGroup::Soju,
            [0.95, 0.95, 1.00, 1.05, 1.25, 1.30, 1.05],
        );
        // 鲜食工作日午餐高峰
        weekday_tables.insert(
            CategoryGroup::Food,
            [1.10, 1.10, 1.10, 1.10, 1.05, 0.85, 0.80],
        );
        weekday_tables.insert(
            CategoryGroup::InstantMeal,
            [1.05, 1.05, 1.05, 1.05, 1.05, 0.95, 0.90],
        );
        // 甜品周末高峰
        weekday_tables.insert(
            CategoryGroup::Dessert,
            [0.95, 0.95, 0.95, 1.00, 1.10, 1.25, 1.20],
        );
        weekday_tables.insert(
            CategoryGroup::Snack,
            [0.95, 0.95, 1.00, 1.00, 1.15, 1.20, 1.10],
        );

        let mut season_tables = HashMap::new();
        // 饮料/冷冻/甜品/啤酒夏季高峰
        season_tables.insert(
            CategoryGroup::Beverage,
            [0.85, 0.85, 0.95, 1.00, 1.10, 1.20, 1.30, 1.30, 1.10, 1.00, 0.90, 0.85],
        );
        season_tables.insert(
            CategoryGroup::Frozen,
            [0.90, 0.90, 0.95, 1.00, 1.10, 1.20, 1.25, 1.25, 1.10, 1.00, 0.95, 0.90],
        );
        season_tables.insert(
            CategoryGroup::Dessert,
            [0.95, 0.95, 1.00, 1.05, 1.10, 1.15, 1.20, 1.20, 1.05, 1.00, 0.95, 1.00],
        );
        season_tables.insert(
            CategoryGroup::Beer,
            [0.90, 0.90, 0.95, 1.00, 1.10, 1.20, 1.30, 1.30, 1.10, 1.00, 0.95, 1.00],
        );
        // 方便面/速食冬季高峰
        season_tables.insert(
            CategoryGroup::Ramen,
            [1.20, 1.15, 1.05, 1.00, 0.95, 0.90, 0.85, 0.85, 0.95, 1.05, 1.15, 1.20],
        );
        season_tables.insert(
            CategoryGroup::InstantMeal,
            [1.15, 1.10, 1.05, 1.00, 0.95, 0.90, 0.90, 0.90, 0.95, 1.05, 1.10, 1.15],
        );

        Self {
            compound_floor_ratio: 0.15,
            holiday_length_coefs: [1.10, 1.20, 1.30],
            holiday_position_before: 1.15,
            holiday_position_during: 1.00,
            holiday_position_after: 0.90,
            holiday_sensitivity,
            temp_hot_threshold: 28.0,
            temp_extreme_hot_threshold: 32.0,
            temp_cold_threshold: 5.0,
            temp_hot_coef: 1.15,
            temp_extreme_hot_coef: 1.30,
            temp_cold_coef: 1.12,
            temp_delta_threshold: 5.0,
            temp_delta_coef: 1.08,
            food_cross_hot_threshold: 30.0,
            food_cross_hot_coef: 0.92,
            weekday_tables,
            weekday_learned_min_days: 3,
            weekday_learned_min: 0.5,
            weekday_learned_max: 2.0,
            season_tables,
            association_cap: 1.30,
            trend_slope_threshold: 0.05,
            trend_up_coef: 1.05,
            trend_down_coef: 0.95,
        }
    }
}

impl CoefficientConfig {
    /// 品类默认星期系数（无表项返回 1.0）
    pub fn weekday_default(&self, group: CategoryGroup, weekday_index: usize) -> f64 {
        self.weekday_tables
            .get(&group)
            .map(|t| t[weekday_index.min(6)])
            .unwrap_or(1.0)
    }

    /// 品类月度季节系数（month 1~12,无表项返回 1.0）
    pub fn season_coef(&self, group: CategoryGroup, month: u32) -> f64 {
        let idx = (month.clamp(1, 12) - 1) as usize;
        self.season_tables.get(&group).map(|t| t[idx]).unwrap_or(1.0)
    }

    /// 品类节假日敏感度（无表项返回 0.5）
    pub fn holiday_sensitivity_of(&self, group: CategoryGroup) -> f64 {
        self.holiday_sensitivity.get(&group).copied().unwrap_or(0.5)
    }
}

// ==========================================
// InventoryConfig - 库存解析参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// 实时快照信任窗口（保质期分档,小时）
    /// (保质期上限天数, TTL 小时) 升序表
    pub ttl_tiers: Vec<(i32, i64)>,
    /// 超出所有分档时的默认 TTL（小时）
    pub default_ttl_hours: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            ttl_tiers: vec![(3, 6), (7, 12), (30, 24)],
            default_ttl_hours: 48,
        }
    }
}

impl InventoryConfig {
    /// 按保质期取实时快照 TTL（小时）
    pub fn ttl_hours_for_shelf_life(&self, shelf_life_days: i32) -> i64 {
        for &(max_days, hours) in &self.ttl_tiers {
            if shelf_life_days <= max_days {
                return hours;
            }
        }
        self.default_ttl_hours
    }
}

// ==========================================
// CategoryPolicyConfig - 品类策略参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPolicyConfig {
    /// 品类组 → 中分类代码集合（判定顺序见 CategoryGroup::PRIORITY_ORDER）
    pub code_sets: HashMap<CategoryGroup, Vec<i64>>,

    // ===== 香烟 =====
    pub tobacco_max_stock: f64,
    /// 单日销量达到该值视为整条购买
    pub tobacco_carton_threshold: f64,
    /// 整条购买日占比 → 缓冲条数的步进
    pub tobacco_carton_buffer_step: f64,
    /// 售罄日占比 → 安全库存乘数上限
    pub tobacco_sellout_multiplier_max: f64,
    pub tobacco_base_safety_days: f64,

    // ===== 食品/日配 =====
    /// 保质期分组 → 安全天数
    pub food_safety_days: HashMap<ShelfLifeGroup, f64>,
    /// 废弃系数默认值与钳制范围
    pub food_disuse_default: f64,
    pub food_disuse_min: f64,
    pub food_disuse_max: f64,
    /// 配送间隔（天）,配送间隔消耗项 = 日需求 × 间隔
    pub food_delivery_gap_days: f64,
    /// 库存上限天数上限（min(保质期+1, 该值)）
    pub food_cap_days_max: f64,
    /// 零库存零预定时保底一单位订货的日需求阈值
    pub food_min_unit_demand_threshold: f64,

    // ===== 啤酒/烧酒 =====
    pub beer_safety_days_base: f64,
    pub beer_safety_days_peak: f64,
    pub beer_max_stock_days: f64,
    pub soju_safety_days_base: f64,
    pub soju_safety_days_peak: f64,
    pub soju_max_stock_days: f64,
    /// 策略内星期系数视为高峰的阈值
    pub alcohol_peak_coefficient: f64,

    // ===== 其他品类安全天数 =====
    pub ramen_safety_days: f64,
    pub beverage_safety_days: f64,
    pub frozen_safety_days: f64,
    pub frozen_max_stock_days: f64,
    pub instant_meal_safety_days: f64,
    pub dessert_safety_days: f64,
    pub dessert_weekend_boost: f64,
    pub snack_safety_days: f64,
    pub general_alcohol_safety_days: f64,
    /// 慢销判定: 日需求低于该值的其他酒类减半安全库存
    pub general_alcohol_slow_threshold: f64,
    pub daily_necessity_safety_days: f64,
    pub general_merchandise_safety_days: f64,

    // ===== 默认策略 =====
    /// 保质期分组 → 默认安全天数
    pub default_safety_days: HashMap<ShelfLifeGroup, f64>,
    /// 周转等级阈值（日需求）: [高周转下限, 中周转下限]
    pub turnover_thresholds: [f64; 2],
    /// 周转等级乘数: [高, 中, 低]
    pub turnover_multipliers: [f64; 3],

    // ===== 品类最大订货量 =====
    /// 品类组 → 单次最大订货量（无表项不设上限）
    pub max_order_qty: HashMap<CategoryGroup, i64>,
}

impl Default for CategoryPolicyConfig {
    fn default() -> Self {
        let mut code_sets = HashMap::new();
        code_sets.insert(CategoryGroup::Ramen, vec![140, 141]);
        code_sets.insert(CategoryGroup::Tobacco, vec![900, 901]);
        code_sets.insert(CategoryGroup::Beer, vec![510]);
        code_sets.insert(CategoryGroup::Soju, vec![511]);
        code_sets.insert(CategoryGroup::Food, vec![100, 101, 102]);
        code_sets.insert(CategoryGroup::Perishable, vec![110, 111]);
        code_sets.insert(CategoryGroup::Beverage, vec![520, 521]);
        code_sets.insert(CategoryGroup::Frozen, vec![130]);
        code_sets.insert(CategoryGroup::InstantMeal, vec![120]);
        code_sets.insert(CategoryGroup::Dessert, vec![150]);
        code_sets.insert(CategoryGroup::Snack, vec![160, 161]);
        code_sets.insert(CategoryGroup::GeneralAlcohol, vec![512, 513]);
        code_sets.insert(CategoryGroup::DailyNecessity, vec![700, 701]);
        code_sets.insert(CategoryGroup::GeneralMerchandise, vec![710, 711, 720]);

        let mut food_safety_days = HashMap::new();
        food_safety_days.insert(ShelfLifeGroup::UltraShort, 0.3);
        food_safety_days.insert(ShelfLifeGroup::Short, 0.5);
        food_safety_days.insert(ShelfLifeGroup::Medium, 1.0);
        food_safety_days.insert(ShelfLifeGroup::Long, 1.5);
        food_safety_days.insert(ShelfLifeGroup::VeryLong, 2.0);

        let mut default_safety_days = HashMap::new();
        default_safety_days.insert(ShelfLifeGroup::UltraShort, 0.5);
        default_safety_days.insert(ShelfLifeGroup::Short, 1.0);
        default_safety_days.insert(ShelfLifeGroup::Medium, 1.5);
        default_safety_days.insert(ShelfLifeGroup::Long, 2.0);
        default_safety_days.insert(ShelfLifeGroup::VeryLong, 2.5);

        let mut max_order_qty = HashMap::new();
        max_order_qty.insert(CategoryGroup::Tobacco, 30);
        max_order_qty.insert(CategoryGroup::Food, 20);
        max_order_qty.insert(CategoryGroup::Perishable, 20);
        max_order_qty.insert(CategoryGroup::Beer, 48);
        max_order_qty.insert(CategoryGroup::Soju, 40);
        max_order_qty.insert(CategoryGroup::Frozen, 24);

        Self {
            code_sets,
            tobacco_max_stock: 30.0,
            tobacco_carton_threshold: 10.0,
            tobacco_carton_buffer_step: 10.0,
            tobacco_sellout_multiplier_max: 2.0,
            tobacco_base_safety_days: 1.5,
            food_safety_days,
            food_disuse_default: 1.0,
            food_disuse_min: 0.6,
            food_disuse_max: 1.2,
            food_delivery_gap_days: 0.5,
            food_cap_days_max: 7.0,
            food_min_unit_demand_threshold: 0.3,
            beer_safety_days_base: 1.0,
            beer_safety_days_peak: 2.0,
            beer_max_stock_days: 5.0,
            soju_safety_days_base: 1.0,
            soju_safety_days_peak: 1.8,
            soju_max_stock_days: 6.0,
            alcohol_peak_coefficient: 1.2,
            ramen_safety_days: 1.5,
            beverage_safety_days: 1.2,
            frozen_safety_days: 1.5,
            frozen_max_stock_days: 10.0,
            instant_meal_safety_days: 1.0,
            dessert_safety_days: 0.8,
            dessert_weekend_boost: 1.2,
            snack_safety_days: 1.5,
            general_alcohol_safety_days: 1.0,
            general_alcohol_slow_threshold: 0.2,
            daily_necessity_safety_days: 2.0,
            general_merchandise_safety_days: 2.0,
            default_safety_days,
            turnover_thresholds: [5.0, 1.0],
            turnover_multipliers: [1.3, 1.0, 0.8],
            max_order_qty,
        }
    }
}

impl CategoryPolicyConfig {
    /// 食品安全天数（无表项退回 1.0）
    pub fn food_safety_days_of(&self, group: ShelfLifeGroup) -> f64 {
        self.food_safety_days.get(&group).copied().unwrap_or(1.0)
    }

    /// 默认策略安全天数（无表项退回 1.5）
    pub fn default_safety_days_of(&self, group: ShelfLifeGroup) -> f64 {
        self.default_safety_days.get(&group).copied().unwrap_or(1.5)
    }

    /// 周转等级: 0=高 1=中 2=低
    pub fn turnover_level(&self, daily_demand: f64) -> usize {
        if daily_demand >= self.turnover_thresholds[0] {
            0
        } else if daily_demand >= self.turnover_thresholds[1] {
            1
        } else {
            2
        }
    }
}

// ==========================================
// SolverConfig - 订货量求解参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 库存完全枯竭时需求上限倍数（抑制噪声估计的灾难性订货）
    pub depleted_cap_multiple: f64,
    /// 周五增量系数（品类策略置位时生效）
    pub friday_boost_coef: f64,
    /// 短保废弃缩减: 保质期 ≤ 该天数时缩减
    pub waste_shrink_shelf_days: i32,
    pub waste_shrink_factor: f64,
    /// 过量库存抑制: (库存+预定)/日需求 超过该天数时归零
    pub overstock_days_supply: f64,
    /// 最小订货阈值: 低于该值归零,低于 1 取 1
    pub min_order_threshold: f64,
    /// ROP: 间歇品强制最小订货的库存水位
    pub rop_stock_level: f64,
    /// 促销阶段系数
    pub promo_ramp_in_coef: f64,
    pub promo_steady_coef: f64,
    pub promo_ramp_out_coef: f64,
    /// 促销期最小订货单位数（订货倍数的份数,RampIn/Steady 生效）
    pub promo_min_units: i32,
    /// 促销起始/收尾段天数
    pub promo_edge_days: i64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            depleted_cap_multiple: 3.0,
            friday_boost_coef: 1.2,
            waste_shrink_shelf_days: 3,
            waste_shrink_factor: 0.85,
            overstock_days_supply: 14.0,
            min_order_threshold: 0.3,
            rop_stock_level: 1.0,
            promo_ramp_in_coef: 1.3,
            promo_steady_coef: 1.15,
            promo_ramp_out_coef: 0.6,
            promo_min_units: 2,
            promo_edge_days: 2,
        }
    }
}

// ==========================================
// EnsembleConfig - 统计模型融合参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    pub enabled: bool,
    /// 融合所需最少真实数据天数
    pub min_data_days: i32,
    /// 统计估计的融合权重
    pub blend_weight: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_data_days: 14,
            blend_weight: 0.3,
        }
    }
}

// ==========================================
// FeedbackConfig - 反馈修正参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub enabled: bool,
    /// 差异反馈回看天数
    pub diff_window_days: i32,
    /// 系统性过量订货的最大惩罚（乘数最低 1-该值）
    pub over_order_penalty_max: f64,
    /// 系统性订货不足的最大提升
    pub under_order_boost_max: f64,
    /// 判定系统性偏差所需最少记录数
    pub min_records: i32,
    /// 废弃率阈值与最大缩减
    pub waste_rate_threshold: f64,
    pub waste_shrink_max: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            diff_window_days: 14,
            over_order_penalty_max: 0.20,
            under_order_boost_max: 0.15,
            min_records: 5,
            waste_rate_threshold: 0.10,
            waste_shrink_max: 0.25,
        }
    }
}

// ==========================================
// DiscrepancyConfig - 库存差异诊断阈值
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscrepancyConfig {
    /// 幽灵库存: 预测时库存至少为该值而执行时为 0
    pub ghost_min_stock: f64,
    /// 过期回退差异的最小偏差
    pub stale_min_delta: f64,
    /// 入库预定不一致阈值
    pub pending_mismatch_threshold: f64,
    /// 过量/不足订货阈值
    pub over_order_threshold: f64,
    pub under_order_threshold: f64,
    /// 严重度分档（较大偏差的绝对值）
    pub severity_medium: f64,
    pub severity_high: f64,
}

impl Default for DiscrepancyConfig {
    fn default() -> Self {
        Self {
            ghost_min_stock: 3.0,
            stale_min_delta: 1.0,
            pending_mismatch_threshold: 2.0,
            over_order_threshold: 5.0,
            under_order_threshold: 5.0,
            severity_medium: 5.0,
            severity_high: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_tiers() {
        let cfg = InventoryConfig::default();
        assert_eq!(cfg.ttl_hours_for_shelf_life(1), 6);
        assert_eq!(cfg.ttl_hours_for_shelf_life(3), 6);
        assert_eq!(cfg.ttl_hours_for_shelf_life(5), 12);
        assert_eq!(cfg.ttl_hours_for_shelf_life(30), 24);
        assert_eq!(cfg.ttl_hours_for_shelf_life(365), 48);
    }

    #[test]
    fn test_turnover_level() {
        let cfg = CategoryPolicyConfig::default();
        assert_eq!(cfg.turnover_level(8.0), 0);
        assert_eq!(cfg.turnover_level(2.0), 1);
        assert_eq!(cfg.turnover_level(0.5), 2);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.config_version, cfg.config_version);
        assert_eq!(back.solver.overstock_days_supply, cfg.solver.overstock_days_supply);
    }
}
