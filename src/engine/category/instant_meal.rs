// ==========================================
// 便利店智能补货系统 - 即食餐策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.9 即食餐
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;

/// 即食餐: 短安全天数,正餐时段权重在需求侧（星期/系数管线）体现
pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let safety_days = cfg.instant_meal_safety_days;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::InstantMeal {
        safety_days,
        meal_time_weighted: true,
    });
    outcome.safety_stock = ctx.adjusted_demand * safety_days;
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;

    #[test]
    fn test_short_safety_days() {
        let product = product_with(120, 3, 1);
        let fixture = context(&product, CategoryGroup::InstantMeal, 5.0);
        let outcome = evaluate(&fixture.ctx());
        assert!((outcome.safety_stock - 5.0).abs() < 1e-9); // 5.0 × 1.0
    }
}
