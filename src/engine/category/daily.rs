// ==========================================
// 便利店智能补货系统 - 日用品/百货策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.12 日用品与百货
// ==========================================
// 规则: 长保质期慢周转品,安全天数按周转等级缩放
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use crate::domain::types::CategoryGroup;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;

    let base_days = if ctx.group == CategoryGroup::DailyNecessity {
        cfg.daily_necessity_safety_days
    } else {
        cfg.general_merchandise_safety_days
    };

    let level = cfg.turnover_level(demand);
    let safety_days = base_days * cfg.turnover_multipliers[level];

    let mut outcome = StrategyOutcome::neutral(match ctx.group {
        CategoryGroup::DailyNecessity => CategoryPattern::DailyNecessity {
            safety_days,
            turnover_level: level as i32,
        },
        _ => CategoryPattern::GeneralMerchandise {
            safety_days,
            turnover_level: level as i32,
        },
    });
    outcome.safety_stock = demand * safety_days;
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;

    #[test]
    fn test_turnover_level_scales_safety_days() {
        let product = product_with(700, 720, 1);

        // 高周转（≥5）→ ×1.3,低周转（<1）→ ×0.8
        let fast = evaluate(&context(&product, CategoryGroup::DailyNecessity, 6.0).ctx());
        let slow = evaluate(&context(&product, CategoryGroup::DailyNecessity, 0.5).ctx());

        match (fast.pattern, slow.pattern) {
            (
                CategoryPattern::DailyNecessity {
                    safety_days: sd_fast,
                    turnover_level: 0,
                },
                CategoryPattern::DailyNecessity {
                    safety_days: sd_slow,
                    turnover_level: 2,
                },
            ) => {
                assert!((sd_fast - 2.6).abs() < 1e-9); // 2.0 × 1.3
                assert!((sd_slow - 1.6).abs() < 1e-9); // 2.0 × 0.8
            }
            _ => panic!("期望 DailyNecessity 模式与周转等级"),
        }
    }

    #[test]
    fn test_general_merchandise_uses_own_base() {
        let product = product_with(710, 720, 1);
        let fixture = context(&product, CategoryGroup::GeneralMerchandise, 2.0);
        let outcome = evaluate(&fixture.ctx());
        match outcome.pattern {
            CategoryPattern::GeneralMerchandise { .. } => {}
            _ => panic!("期望 GeneralMerchandise 模式"),
        }
        // 中周转 ×1.0
        assert!((outcome.safety_stock - 4.0).abs() < 1e-9);
    }
}
