// ==========================================
// 便利店智能补货系统 - 酒类策略（啤酒/烧酒/其他酒类）
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.3 酒类
// ==========================================
// 规则: 啤酒/烧酒在策略内按历史星期统计重算星期系数
//       （覆盖管线通用值）,反映周五/周六需求高峰;
//       安全天数与库存上限随该系数切换;
//       其他酒类为慢销品,安全库存减半
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use chrono::Datelike;

/// 学习星期系数所需的最少样本天数
const LEARNED_MIN_DAYS: i32 = 2;

/// 啤酒策略内置星期系数回退表（周一..周日）
const BEER_WEEKDAY_FALLBACK: [f64; 7] = [0.90, 0.90, 0.95, 1.00, 1.30, 1.40, 1.10];

/// 烧酒策略内置星期系数回退表
const SOJU_WEEKDAY_FALLBACK: [f64; 7] = [0.95, 0.95, 1.00, 1.05, 1.25, 1.30, 1.05];

pub fn evaluate_beer(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    evaluate_weekday_driven(
        ctx,
        &BEER_WEEKDAY_FALLBACK,
        cfg.beer_safety_days_base,
        cfg.beer_safety_days_peak,
        cfg.beer_max_stock_days,
        true,
    )
}

pub fn evaluate_soju(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    evaluate_weekday_driven(
        ctx,
        &SOJU_WEEKDAY_FALLBACK,
        cfg.soju_safety_days_base,
        cfg.soju_safety_days_peak,
        cfg.soju_max_stock_days,
        false,
    )
}

/// 啤酒/烧酒共通: 策略内重算星期系数并覆写需求
fn evaluate_weekday_driven(
    ctx: &StrategyContext<'_>,
    fallback: &[f64; 7],
    safety_days_base: f64,
    safety_days_peak: f64,
    max_stock_days: f64,
    is_beer: bool,
) -> StrategyOutcome {
    let cfg = ctx.config;
    let weekday_index = ctx.target_date.weekday().num_days_from_monday() as usize;

    // 历史星期统计优先,样本不足回退内置表
    let weekday_coefficient = ctx
        .weekday_stats
        .learned_coefficient(weekday_index, LEARNED_MIN_DAYS)
        .unwrap_or(fallback[weekday_index]);

    // 需求覆写: 先除回管线星期系数,再乘策略重算值
    let pipeline_coef = if ctx.pipeline_weekday_coef > f64::EPSILON {
        ctx.pipeline_weekday_coef
    } else {
        1.0
    };
    let effective_demand = ctx.adjusted_demand / pipeline_coef * weekday_coefficient;

    let safety_days = if weekday_coefficient >= cfg.alcohol_peak_coefficient {
        safety_days_peak
    } else {
        safety_days_base
    };
    let safety_stock = effective_demand * safety_days;
    let max_stock = effective_demand * max_stock_days;

    let pattern = if is_beer {
        CategoryPattern::Beer {
            weekday_coefficient,
            safety_days,
            max_stock,
        }
    } else {
        CategoryPattern::Soju {
            weekday_coefficient,
            safety_days,
            max_stock,
        }
    };

    StrategyOutcome {
        safety_stock,
        stock_cap: if max_stock > 0.0 { Some(max_stock) } else { None },
        skip_reason: None,
        demand_override: Some(effective_demand),
        extra_demand: 0.0,
        min_one_unit: false,
        friday_boost: true,
        pattern,
    }
}

/// 其他酒类（洋酒/葡萄酒）: 慢销品安全库存减半
pub fn evaluate_general(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;
    let slow_mover = demand < cfg.general_alcohol_slow_threshold;

    let mut safety_days = cfg.general_alcohol_safety_days;
    if slow_mover {
        safety_days *= 0.5;
    }

    StrategyOutcome {
        safety_stock: demand * safety_days,
        stock_cap: None,
        skip_reason: None,
        demand_override: None,
        extra_demand: 0.0,
        min_one_unit: false,
        friday_boost: false,
        pattern: CategoryPattern::GeneralAlcohol {
            safety_days,
            slow_mover,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, product_with};
    use super::*;
    use crate::domain::types::CategoryGroup;
    use chrono::NaiveDate;

    #[test]
    fn test_friday_peak_raises_safety_days() {
        let product = product_with(510, 180, 4);
        let mut fixture = context(&product, CategoryGroup::Beer, 6.0);
        // 2024-06-07 是周五
        fixture.target_date = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();

        let outcome = evaluate_beer(&fixture.ctx());
        match outcome.pattern {
            CategoryPattern::Beer {
                weekday_coefficient,
                safety_days,
                ..
            } => {
                assert_eq!(weekday_coefficient, 1.30); // 回退表周五
                assert_eq!(safety_days, 2.0); // 峰值安全天数
            }
            _ => panic!("期望 Beer 模式"),
        }
        // 需求被上调覆写
        assert!(outcome.demand_override.unwrap() > 6.0);
        assert!(outcome.friday_boost);
    }

    #[test]
    fn test_learned_weekday_overrides_fallback() {
        let product = product_with(510, 180, 4);
        let mut fixture = context(&product, CategoryGroup::Beer, 6.0);
        fixture.target_date = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(); // 周五
        fixture.weekday_stats.overall_avg = 4.0;
        fixture.weekday_stats.avg_by_weekday[4] = 8.0;
        fixture.weekday_stats.days_by_weekday[4] = 4;

        let outcome = evaluate_beer(&fixture.ctx());
        match outcome.pattern {
            CategoryPattern::Beer {
                weekday_coefficient, ..
            } => assert_eq!(weekday_coefficient, 2.0),
            _ => panic!("期望 Beer 模式"),
        }
    }

    #[test]
    fn test_pipeline_weekday_divided_out() {
        let product = product_with(511, 365, 1);
        let mut fixture = context(&product, CategoryGroup::Soju, 5.0);
        fixture.target_date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(); // 周三
        fixture.pipeline_weekday_coef = 1.0;

        let o1 = evaluate_soju(&fixture.ctx());
        // 管线已乘 2.0 → 策略除回后与管线系数无关
        fixture.pipeline_weekday_coef = 2.0;
        fixture.demand = 10.0;
        let o2 = evaluate_soju(&fixture.ctx());
        assert!((o1.demand_override.unwrap() - o2.demand_override.unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_slow_mover_halves_safety_days() {
        let product = product_with(512, 720, 1);
        let fixture_fast = context(&product, CategoryGroup::GeneralAlcohol, 1.0);
        let fixture_slow = context(&product, CategoryGroup::GeneralAlcohol, 0.1);

        let fast = evaluate_general(&fixture_fast.ctx());
        let slow = evaluate_general(&fixture_slow.ctx());

        match (fast.pattern, slow.pattern) {
            (
                CategoryPattern::GeneralAlcohol {
                    safety_days: sd_fast,
                    slow_mover: sm_fast,
                },
                CategoryPattern::GeneralAlcohol {
                    safety_days: sd_slow,
                    slow_mover: sm_slow,
                },
            ) => {
                assert!(!sm_fast);
                assert!(sm_slow);
                assert_eq!(sd_slow, sd_fast * 0.5);
            }
            _ => panic!("期望 GeneralAlcohol 模式"),
        }
    }
}
