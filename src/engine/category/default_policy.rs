// ==========================================
// 便利店智能补货系统 - 默认策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.13 默认策略
// ==========================================
// 规则: 未命中任何品类集合的单品走通用规则,
//       安全天数 = 保质期分组默认值 × 周转等级乘数
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use crate::domain::types::ShelfLifeGroup;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;
    let shelf_life_group = ShelfLifeGroup::from_days(ctx.product.shelf_life_days);

    let base_days = cfg.default_safety_days_of(shelf_life_group);
    let level = cfg.turnover_level(demand);
    let turnover_multiplier = cfg.turnover_multipliers[level];
    let safety_days = base_days * turnover_multiplier;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Default {
        shelf_life_group,
        safety_days,
        turnover_multiplier,
    });
    outcome.safety_stock = demand * safety_days;
    outcome
}
