// ==========================================
// 便利店智能补货系统 - 香烟策略
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 4.2 香烟
// ==========================================
// 规则: 安全库存由整条购买与完全售罄事件频率派生;
//       硬性库存上限（默认 30）,可用空间 = 上限 - 库存 - 预定,
//       空间耗尽时直接跳过订货
// ==========================================

use super::{StrategyContext, StrategyOutcome};
use crate::domain::prediction::CategoryPattern;
use crate::domain::types::SkipReason;

pub fn evaluate(ctx: &StrategyContext<'_>) -> StrategyOutcome {
    let cfg = ctx.config;
    let demand = ctx.adjusted_demand;

    // 事件频率（无统计时按 0 处理,退化为纯基础安全天数）
    let (carton_ratio, sellout_ratio) = match ctx.tobacco_stats {
        Some(s) if s.window_days > 0 => (
            s.carton_days as f64 / s.window_days as f64,
            s.sellout_days as f64 / s.window_days as f64,
        ),
        _ => (0.0, 0.0),
    };

    // 整条购买缓冲: 频率 × 步进条数
    let carton_buffer = carton_ratio * cfg.tobacco_carton_buffer_step;

    // 售罄乘数: 频率线性抬升到上限
    let sellout_multiplier =
        1.0 + sellout_ratio * (cfg.tobacco_sellout_multiplier_max - 1.0);

    let safety_stock =
        (demand * cfg.tobacco_base_safety_days + carton_buffer) * sellout_multiplier;

    // 可用空间既约束也可完全抑制订货
    let max_stock = cfg.tobacco_max_stock;
    let available_space = max_stock - ctx.inventory.effective_on_hand();
    let skip_reason = if available_space <= 0.0 {
        Some(SkipReason::StockCapExceeded)
    } else {
        None
    };

    StrategyOutcome {
        safety_stock,
        stock_cap: Some(max_stock),
        skip_reason,
        demand_override: None,
        extra_demand: 0.0,
        min_one_unit: false,
        friday_boost: false,
        pattern: CategoryPattern::Tobacco {
            carton_buffer,
            sellout_multiplier,
            max_stock,
            available_space: available_space.max(0.0),
        },
    }
}
