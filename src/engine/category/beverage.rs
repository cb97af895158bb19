// ==========================================
// 便利店智能补货系统 - 饮料策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.7 饮料
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;

/// 饮料: 固定安全天数,温度弹性由系数管线承担
pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let safety_days = cfg.beverage_safety_days;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Beverage {
        safety_days,
        temperature_sensitive: true,
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
    fn test_safety_stock_scales_with_demand() {
        let product = product_with(520, 180, 1);
        let low = evaluate(&context(&product, CategoryGroup::Beverage, 2.0).ctx());
        let high = evaluate(&context(&product, CategoryGroup::Beverage, 8.0).ctx());
        assert!((low.safety_stock - 2.4).abs() < 1e-9); // 2.0 × 1.2
        assert!(high.safety_stock > low.safety_stock);
    }
}
