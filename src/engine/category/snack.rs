// ==========================================
// 便利店智能补货系统 - 零食策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.11 零食
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let safety_days = cfg.snack_safety_days;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Snack { safety_days });
    outcome.safety_stock = ctx.adjusted_demand * safety_days;
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;

    #[test]
    fn test_fixed_safety_days() {
        let product = product_with(160, 120, 1);
        let fixture = context(&product, CategoryGroup::Snack, 2.0);
        let outcome = evaluate(&fixture.ctx());
        assert!((outcome.safety_stock - 3.0).abs() < 1e-9); // 2.0 × 1.5
    }
}
