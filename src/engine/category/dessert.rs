// ==========================================
// 便利店智能补货系统 - 甜品策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.10 甜品
// ==========================================
// 规则: 周末（周五至周日）安全库存加成
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use chrono::{Datelike, Weekday};

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;
    let mut safety_days = cfg.dessert_safety_days;

    let weekend = matches!(
        ctx.target_date.weekday(),
        Weekday::Fri | Weekday::Sat | Weekday::Sun
    );
    let weekend_boost = if weekend { cfg.dessert_weekend_boost } else { 1.0 };
    safety_days *= weekend_boost;

    let mut outcome = StrategyOutcome::neutral(CategoryPattern::Dessert {
        safety_days,
        weekend_boost,
    });
    outcome.safety_stock = demand * safety_days;
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;
    use chrono::NaiveDate;

    #[test]
    fn test_weekend_boost_applied() {
        let product = product_with(150, 4, 1);
        let mut fixture = context(&product, CategoryGroup::Dessert, 3.0);

        // 周三
        fixture.target_date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let weekday = evaluate(&fixture.ctx());

        // 周六
        fixture.target_date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let weekend = evaluate(&fixture.ctx());

        assert!(weekend.safety_stock > weekday.safety_stock);
        assert!((weekday.safety_stock - 2.4).abs() < 1e-9); // 3.0 × 0.8
        assert!((weekend.safety_stock - 2.88).abs() < 1e-9); // 3.0 × 0.8 × 1.2
    }
}
