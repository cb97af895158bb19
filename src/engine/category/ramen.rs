// ==========================================
// 便利店智能补货系统 - 方便面策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.6 方便面
// ==========================================
// 规则: 固定安全天数;订货单位 ≥ 4 视为整袋装,
//       求解器取整时按整袋规格进位
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let safety_days = cfg.ramen_safety_days;
    let bundle_aware = ctx.product.order_unit >= 4;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Ramen {
        safety_days,
        bundle_aware,
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
    fn test_safety_stock_from_fixed_days() {
        let product = product_with(140, 180, 1);
        let fixture = context(&product, CategoryGroup::Ramen, 4.0);
        let outcome = evaluate(&fixture.ctx());
        assert!((outcome.safety_stock - 6.0).abs() < 1e-9); // 4.0 × 1.5
        assert!(outcome.stock_cap.is_none());
    }

    #[test]
    fn test_bundle_flag_follows_order_unit() {
        let single = product_with(140, 180, 1);
        let bundle = product_with(141, 180, 5);

        let o_single = evaluate(&context(&single, CategoryGroup::Ramen, 2.0).ctx());
        let o_bundle = evaluate(&context(&bundle, CategoryGroup::Ramen, 2.0).ctx());

        match (o_single.pattern, o_bundle.pattern) {
            (
                CategoryPattern::Ramen {
                    bundle_aware: a, ..
                },
                CategoryPattern::Ramen {
                    bundle_aware: b, ..
                },
            ) => {
                assert!(!a);
                assert!(b);
            }
            _ => panic!("期望 Ramen 模式"),
        }
    }
}
