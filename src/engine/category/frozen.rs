// ==========================================
// 便利店智能补货系统 - 冷冻食品策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.8 冷冻食品
// ==========================================
// 规则: 冷柜空间有限,库存上限 = 需求 × 上限天数
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;
    let safety_days = cfg.frozen_safety_days;
    let max_stock = demand * cfg.frozen_max_stock_days;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Frozen {
        safety_days,
        max_stock,
    });
    outcome.safety_stock = demand * safety_days;
    outcome.stock_cap = if max_stock > 0.0 { Some(max_stock) } else { None };
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;

    #[test]
    fn test_cap_from_max_stock_days() {
        let product = product_with(130, 365, 1);
        let fixture = context(&product, CategoryGroup::Frozen, 3.0);
        let outcome = evaluate(&fixture.ctx());
        assert_eq!(outcome.stock_cap, Some(30.0)); // 3.0 × 10 天
        assert!((outcome.safety_stock - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_demand_has_no_cap() {
        let product = product_with(130, 365, 1);
        let fixture = context(&product, CategoryGroup::Frozen, 0.0);
        let outcome = evaluate(&fixture.ctx());
        assert!(outcome.stock_cap.is_none());
    }
}
