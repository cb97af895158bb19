// ==========================================
// 便利店智能补货系统 - 品类策略路由
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4. 品类策略
// ==========================================
// 职责: 按中分类代码把单品路由到恰好一个品类策略,
//       策略输出安全库存/库存上限/跳过信号/品类模式
// 红线: 判定顺序固定（CategoryGroup::PRIORITY_ORDER）,命中即停;
//       未命中任何集合时落入默认策略,绝不报错
// ==========================================

pub mod alcohol;
pub mod beverage;
pub mod daily;
pub mod default_policy;
pub mod dessert;
pub mod food;
pub mod frozen;
pub mod instant_meal;
pub mod ramen;
pub mod snack;
pub mod tobacco;

use crate::config::engine_config::CategoryPolicyConfig;
use crate::domain::inventory::InventoryState;
use crate::domain::prediction::CategoryPattern;
use crate::domain::product::ProductInfo;
use crate::domain::sales::{TobaccoEventStats, WeekdayStats};
use crate::domain::types::{CategoryGroup, SkipReason};
use crate::repository::inventory_repo::WasteStats;
use chrono::NaiveDate;

// ==========================================
// StrategyContext - 策略输入上下文
// ==========================================
pub struct StrategyContext<'a> {
    pub product: &'a ProductInfo,
    pub group: CategoryGroup,
    /// 系数管线后的日需求
    pub adjusted_demand: f64,
    pub inventory: &'a InventoryState,
    pub target_date: NaiveDate,
    /// 管线已应用的星期系数（酒类策略内重算时需要先除回）
    pub pipeline_weekday_coef: f64,
    pub weekday_stats: &'a WeekdayStats,
    pub tobacco_stats: Option<&'a TobaccoEventStats>,
    pub waste_stats: Option<&'a WasteStats>,
    pub config: &'a CategoryPolicyConfig,
}

// ==========================================
// StrategyOutcome - 策略输出
// ==========================================
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub safety_stock: f64,
    /// 硬性库存上限（库存+预定+订货不得超过）
    pub stock_cap: Option<f64>,
    pub skip_reason: Option<SkipReason>,
    /// 策略内重算星期系数后的需求覆写（酒类）
    pub demand_override: Option<f64>,
    /// 配送间隔消耗附加需求（食品）
    pub extra_demand: f64,
    /// 零库存零预定时保底一单位订货
    pub min_one_unit: bool,
    /// 求解器周五加成开关
    pub friday_boost: bool,
    pub pattern: CategoryPattern,
}

impl StrategyOutcome {
    /// 中性结果（安全库存 0,无上限,无跳过）
    pub fn neutral(pattern: CategoryPattern) -> Self {
        Self {
            safety_stock: 0.0,
            stock_cap: None,
            skip_reason: None,
            demand_override: None,
            extra_demand: 0.0,
            min_one_unit: false,
            friday_boost: false,
            pattern,
        }
    }
}

// ==========================================
// CategoryPolicyRouter - 品类策略路由器
// ==========================================
pub struct CategoryPolicyRouter {
    config: CategoryPolicyConfig,
}

impl CategoryPolicyRouter {
    pub fn new(config: CategoryPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CategoryPolicyConfig {
        &self.config
    }

    /// 中分类代码 → 品类组（固定优先顺序,命中即停）
    pub fn classify(&self, category_code: i64) -> CategoryGroup {
        for group in CategoryGroup::PRIORITY_ORDER {
            if let Some(codes) = self.config.code_sets.get(&group) {
                if codes.contains(&category_code) {
                    return group;
                }
            }
        }
        CategoryGroup::Default
    }

    /// 执行品类策略（恰好一个）
    ///
    /// # 说明
    /// - 不可订货日检查为全策略共通,在策略结果上统一置位
    pub fn evaluate(&self, ctx: &StrategyContext<'_>) -> StrategyOutcome {
        let mut outcome = match ctx.group {
            CategoryGroup::Ramen => ramen::evaluate(ctx),
            CategoryGroup::Tobacco => tobacco::evaluate(ctx),
            CategoryGroup::Beer => alcohol::evaluate_beer(ctx),
            CategoryGroup::Soju => alcohol::evaluate_soju(ctx),
            CategoryGroup::Food | CategoryGroup::Perishable => food::evaluate(ctx),
            CategoryGroup::Beverage => beverage::evaluate(ctx),
            CategoryGroup::Frozen => frozen::evaluate(ctx),
            CategoryGroup::InstantMeal => instant_meal::evaluate(ctx),
            CategoryGroup::Dessert => dessert::evaluate(ctx),
            CategoryGroup::Snack => snack::evaluate(ctx),
            CategoryGroup::GeneralAlcohol => alcohol::evaluate_general(ctx),
            CategoryGroup::DailyNecessity | CategoryGroup::GeneralMerchandise => {
                daily::evaluate(ctx)
            }
            CategoryGroup::Default => default_policy::evaluate(ctx),
        };

        // 共通: 当日不可订货 → 跳过（不覆盖策略已给出的更具体原因）
        if outcome.skip_reason.is_none() && !ctx.product.is_orderable_on(ctx.target_date) {
            outcome.skip_reason = Some(SkipReason::NotOrderableWeekday);
        }

        outcome
    }
}

// ==========================================
// 测试辅助（各策略单测共用）
// ==========================================
#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::domain::types::{PendingSource, StockSource};

    /// 策略测试夹具: 持有上下文全部被借用的对象
    pub struct Fixture {
        pub product: ProductInfo,
        pub group: CategoryGroup,
        pub demand: f64,
        pub inventory: InventoryState,
        pub weekday_stats: WeekdayStats,
        pub config: CategoryPolicyConfig,
        pub target_date: NaiveDate,
        pub pipeline_weekday_coef: f64,
    }

    impl Fixture {
        pub fn ctx(&self) -> StrategyContext<'_> {
            StrategyContext {
                product: &self.product,
                group: self.group,
                adjusted_demand: self.demand,
                inventory: &self.inventory,
                target_date: self.target_date,
                pipeline_weekday_coef: self.pipeline_weekday_coef,
                weekday_stats: &self.weekday_stats,
                tobacco_stats: None,
                waste_stats: None,
                config: &self.config,
            }
        }

        pub fn ctx_with_tobacco<'a>(
            &'a self,
            stats: &'a TobaccoEventStats,
        ) -> StrategyContext<'a> {
            let mut ctx = self.ctx();
            ctx.tobacco_stats = Some(stats);
            ctx
        }

        pub fn ctx_with_waste<'a>(&'a self, stats: &'a WasteStats) -> StrategyContext<'a> {
            let mut ctx = self.ctx();
            ctx.waste_stats = Some(stats);
            ctx
        }
    }

    pub fn product_with(category_code: i64, shelf_life_days: i32, order_unit: i32) -> ProductInfo {
        ProductInfo {
            item_code: "ITEM1".to_string(),
            item_name: "测试商品".to_string(),
            category_code,
            shelf_life_days,
            order_unit,
            lead_time_days: 1,
            orderable_weekdays: 0b0111_1111,
            sell_price: 1500.0,
            margin_rate: 0.3,
        }
    }

    pub fn context(product: &ProductInfo, group: CategoryGroup, demand: f64) -> Fixture {
        Fixture {
            product: product.clone(),
            group,
            demand,
            inventory: InventoryState {
                stock: 0.0,
                pending: 0.0,
                stock_source: StockSource::HistoryOnly,
                pending_source: PendingSource::None,
                is_stale: false,
            },
            weekday_stats: WeekdayStats::default(),
            config: CategoryPolicyConfig::default(),
            // 2024-06-05 是周三
            target_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            pipeline_weekday_coef: 1.0,
        }
    }

    pub fn stats_tobacco(window: i32, carton: i32, sellout: i32) -> TobaccoEventStats {
        TobaccoEventStats {
            window_days: window,
            carton_days: carton,
            sellout_days: sellout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_codes() {
        let router = CategoryPolicyRouter::new(CategoryPolicyConfig::default());
        assert_eq!(router.classify(140), CategoryGroup::Ramen);
        assert_eq!(router.classify(900), CategoryGroup::Tobacco);
        assert_eq!(router.classify(510), CategoryGroup::Beer);
        assert_eq!(router.classify(511), CategoryGroup::Soju);
        assert_eq!(router.classify(101), CategoryGroup::Food);
        assert_eq!(router.classify(110), CategoryGroup::Perishable);
        assert_eq!(router.classify(520), CategoryGroup::Beverage);
    }

    #[test]
    fn test_unknown_code_falls_to_default() {
        let router = CategoryPolicyRouter::new(CategoryPolicyConfig::default());
        assert_eq!(router.classify(99999), CategoryGroup::Default);
    }

    #[test]
    fn test_priority_order_resolves_overlap() {
        // 人工构造重叠配置: 代码 140 同时在 Ramen 与 Snack 集合
        let mut cfg = CategoryPolicyConfig::default();
        cfg.code_sets
            .get_mut(&CategoryGroup::Snack)
            .unwrap()
            .push(140);
        let router = CategoryPolicyRouter::new(cfg);
        // Ramen 在优先顺序中靠前,胜出
        assert_eq!(router.classify(140), CategoryGroup::Ramen);
    }
}
