// ==========================================
// 便利店智能补货系统 - 鲜食/日配策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.5 鲜食与日配
// ==========================================
// 规则: 安全库存随保质期分组缩放,乘以动态学习的废弃系数;
//       附加配送间隔消耗项;库存上限 = 需求 × min(保质期+1, 7) 天;
//       零库存零预定且日需求超过阈值时保底一单位订货
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use crate::domain::types::ShelfLifeGroup;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;
    let shelf_life_group = ShelfLifeGroup::from_days(ctx.product.shelf_life_days);
    let safety_days = cfg.food_safety_days_of(shelf_life_group);

    // 废弃系数: 废弃率越高,安全库存越收缩
    let (disuse_coefficient, data_source) = match ctx.waste_stats {
        Some(ws) => {
            let coef = (cfg.food_disuse_default - ws.waste_rate())
                .clamp(cfg.food_disuse_min, cfg.food_disuse_max);
            (coef, "LEARNED".to_string())
        }
        None => (cfg.food_disuse_default, "DEFAULT".to_string()),
    };

    let safety_stock = demand * safety_days * disuse_coefficient;

    // 配送间隔消耗: 两次配送窗口之间的期望需求
    let gap_consumption = demand * cfg.food_delivery_gap_days;

    // 库存上限: 需求 × min(保质期+1, 上限天数)
    let cap_days = ((ctx.product.shelf_life_days + 1) as f64).min(cfg.food_cap_days_max);
    let stock_cap = demand * cap_days;

    // 保底一单位: 货架不能空
    let min_one_unit = ctx.inventory.stock <= 0.0
        && ctx.inventory.pending <= 0.0
        && demand > cfg.food_min_unit_demand_threshold;

    StrategyOutcome {
        safety_stock,
        stock_cap: if stock_cap > 0.0 { Some(stock_cap) } else { None },
        skip_reason: None,
        demand_override: None,
        extra_demand: gap_consumption,
        min_one_unit,
        friday_boost: false,
        pattern: CategoryPattern::Food {
            shelf_life_group,
            safety_days,
            disuse_coefficient,
            gap_consumption,
            data_source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;
    use crate::repository::inventory_repo::WasteStats;

    #[test]
    fn test_shelf_life_group_scales_safety_days() {
        let ultra = product_with(100, 1, 1);
        let long = product_with(100, 20, 1);

        let f_ultra = context(&ultra, CategoryGroup::Food, 4.0);
        let f_long = context(&long, CategoryGroup::Food, 4.0);

        let o_ultra = evaluate(&f_ultra.ctx());
        let o_long = evaluate(&f_long.ctx());
        assert!(o_ultra.safety_stock < o_long.safety_stock);
    }

    #[test]
    fn test_high_waste_rate_shrinks_safety_stock() {
        let product = product_with(100, 2, 1);
        let fixture = context(&product, CategoryGroup::Food, 4.0);

        let no_waste = WasteStats {
            received_total: 100.0,
            wasted_total: 0.0,
        };
        let heavy_waste = WasteStats {
            received_total: 100.0,
            wasted_total: 30.0,
        };

        let base = evaluate(&fixture.ctx_with_waste(&no_waste));
        let shrunk = evaluate(&fixture.ctx_with_waste(&heavy_waste));
        assert!(shrunk.safety_stock < base.safety_stock);

        match shrunk.pattern {
            CategoryPattern::Food {
                disuse_coefficient,
                ref data_source,
                ..
            } => {
                assert!((disuse_coefficient - 0.7).abs() < 1e-9);
                assert_eq!(data_source, "LEARNED");
            }
            _ => panic!("期望 Food 模式"),
        }
    }

    #[test]
    fn test_cap_bounded_by_seven_days() {
        let product = product_with(100, 30, 1);
        let fixture = context(&product, CategoryGroup::Food, 4.0);
        let outcome = evaluate(&fixture.ctx());
        // min(30+1, 7) = 7 天
        assert_eq!(outcome.stock_cap, Some(28.0));
    }

    #[test]
    fn test_min_one_unit_when_empty_shelf() {
        let product = product_with(100, 2, 1);
        let mut fixture = context(&product, CategoryGroup::Food, 1.0);
        fixture.inventory.stock = 0.0;
        fixture.inventory.pending = 0.0;
        assert!(evaluate(&fixture.ctx()).min_one_unit);

        // 需求低于阈值则不保底
        fixture.demand = 0.1;
        assert!(!evaluate(&fixture.ctx()).min_one_unit);

        // 有预定在途则不保底
        fixture.demand = 1.0;
        fixture.inventory.pending = 3.0;
        assert!(!evaluate(&fixture.ctx()).min_one_unit);
    }

    #[test]
    fn test_gap_consumption_added_as_extra_demand() {
        let product = product_with(110, 3, 1);
        let fixture = context(&product, CategoryGroup::Perishable, 4.0);
        let outcome = evaluate(&fixture.ctx());
        assert!((outcome.extra_demand - 2.0).abs() < 1e-9); // 4.0 × 0.5
    }
}
