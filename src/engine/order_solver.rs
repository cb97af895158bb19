// ==========================================
// 便利店智能补货系统 - 订货量求解器
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 5. 订货量求解
// ==========================================
// 职责: 把日需求/安全库存/库存状态折算为最终整数订货量
// 红线: 调整步骤顺序固定,最小库存短路判定必须先于
//       过量库存抑制;输出订货量恒 ≥ 0
// ==========================================

use crate::config::engine_config::{CategoryPolicyConfig, SolverConfig};
use crate::domain::inventory::{InventoryState, PromotionPeriod};
use crate::domain::prediction::QualityFlags;
use crate::domain::product::ProductInfo;
use crate::domain::types::{CategoryGroup, PromotionPhase, SkipReason};
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

// ==========================================
// SolverInputs - 求解输入
// ==========================================
pub struct SolverInputs<'a> {
    pub product: &'a ProductInfo,
    pub group: CategoryGroup,
    /// 系数管线与品类策略处理后的日需求
    pub daily_demand: f64,
    pub inventory: &'a InventoryState,
    pub target_date: NaiveDate,
    pub safety_stock: f64,
    pub stock_cap: Option<f64>,
    pub skip_reason: Option<SkipReason>,
    /// 配送间隔消耗等附加需求
    pub extra_demand: f64,
    pub min_one_unit: bool,
    pub friday_boost: bool,
    pub quality: &'a QualityFlags,
    pub promotion_phase: PromotionPhase,
    /// 统计模型的订货量估计（融合启用且数据充分时）
    pub ensemble_order_estimate: Option<f64>,
    /// 差异反馈乘数（未启用时 1.0）
    pub feedback_multiplier: f64,
}

// ==========================================
// SolverDecision - 求解结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SolverDecision {
    pub order_qty: i64,
    /// 取整前的原始需要量（诊断用）
    pub raw_need: f64,
    pub skip_reason: Option<SkipReason>,
    /// 是否发生了统计模型融合
    pub blended: bool,
}

impl SolverDecision {
    fn zero(skip_reason: Option<SkipReason>) -> Self {
        Self {
            order_qty: 0,
            raw_need: 0.0,
            skip_reason,
            blended: false,
        }
    }
}

// ==========================================
// OrderQuantitySolver - 订货量求解器
// ==========================================
pub struct OrderQuantitySolver {
    config: SolverConfig,
    ensemble_weight: f64,
}

impl OrderQuantitySolver {
    pub fn new(config: SolverConfig, ensemble_weight: f64) -> Self {
        Self {
            config,
            ensemble_weight,
        }
    }

    /// 判定目标日所处的促销阶段
    ///
    /// # 说明
    /// - 起始段/收尾段各取促销期前后 promo_edge_days 天
    /// - 促销期短于两段之和时起始段优先
    pub fn promotion_phase(&self, period: Option<&PromotionPeriod>, date: NaiveDate) -> PromotionPhase {
        let Some(p) = period else {
            return PromotionPhase::None;
        };
        if !p.contains(date) {
            return PromotionPhase::None;
        }
        let edge = self.config.promo_edge_days;
        if (date - p.start_date).num_days() < edge {
            PromotionPhase::RampIn
        } else if (p.end_date - date).num_days() < edge {
            PromotionPhase::RampOut
        } else {
            PromotionPhase::Steady
        }
    }

    /// 求解最终订货量（调整步骤顺序固定）
    pub fn solve(&self, inputs: &SolverInputs<'_>, category_cfg: &CategoryPolicyConfig) -> SolverDecision {
        let cfg = &self.config;
        let demand = inputs.daily_demand.max(0.0);
        let stock = inputs.inventory.stock;
        let on_hand = inputs.inventory.effective_on_hand();

        // 1. 覆盖需要量: 需求 ×（下次可订货间隔 + 前置期）+ 安全库存 + 附加需求
        let coverage_days =
            (inputs.product.days_until_next_orderable(inputs.target_date)
                + inputs.product.lead_time_days.max(0)) as f64;
        let gross_requirement =
            demand * coverage_days.max(1.0) + inputs.safety_stock + inputs.extra_demand;

        // 2. 最小库存短路: 在手量已覆盖需要量则不订货
        //    （必须先于过量库存抑制,保证判定口径一致）
        if on_hand >= gross_requirement && !inputs.min_one_unit {
            return SolverDecision::zero(None);
        }
        let mut need = gross_requirement - on_hand;

        // 3. 枯竭上限: 零库存时需求估计噪声大,限制为日需求的固定倍数
        if stock <= 0.0 && demand > 0.0 {
            need = need.min(demand * cfg.depleted_cap_multiple);
        }

        // 4. 跳过信号: 不可订货日 / 超上限 / 截单品 → 归零
        if let Some(reason) = inputs.skip_reason {
            return SolverDecision::zero(Some(reason));
        }

        // 5. 周五增量（品类策略置位时）
        if inputs.friday_boost && inputs.target_date.weekday() == Weekday::Fri {
            need *= cfg.friday_boost_coef;
        }

        // 6. 短保废弃缩减
        if inputs.product.shelf_life_days <= cfg.waste_shrink_shelf_days {
            need *= cfg.waste_shrink_factor;
        }

        // 7. 过量库存抑制: 在手供给天数超限则归零
        if demand > 0.0 && on_hand / demand > cfg.overstock_days_supply {
            debug!(
                item_code = %inputs.product.item_code,
                days_supply = on_hand / demand,
                "过量库存,抑制订货"
            );
            need = 0.0;
        }

        // 8. ROP 强制订货: 高间歇品在手量跌破水位时至少补一单位
        let rop_forced = inputs.quality.intermittent
            && on_hand <= cfg.rop_stock_level
            && need < cfg.min_order_threshold;
        if rop_forced {
            need = 1.0;
        }

        // 9. 最小订货阈值
        if need < cfg.min_order_threshold {
            need = 0.0;
        } else if need < 1.0 {
            need = 1.0;
        }

        // 10. 保底一单位（鲜食空货架）
        if inputs.min_one_unit && need < 1.0 {
            need = 1.0;
        }

        // 11. 促销阶段调整
        let unit = inputs.product.safe_order_unit() as f64;
        match inputs.promotion_phase {
            PromotionPhase::RampIn => {
                need *= cfg.promo_ramp_in_coef;
                need = need.max(cfg.promo_min_units as f64 * unit);
            }
            PromotionPhase::Steady => {
                need *= cfg.promo_steady_coef;
                need = need.max(cfg.promo_min_units as f64 * unit);
            }
            PromotionPhase::RampOut => need *= cfg.promo_ramp_out_coef,
            PromotionPhase::None => {}
        }

        // 12. 统计模型融合（订货量层面,加权平均）
        let mut blended = false;
        if let Some(est) = inputs.ensemble_order_estimate {
            if need > 0.0 && est >= 0.0 {
                need = need * (1.0 - self.ensemble_weight) + est * self.ensemble_weight;
                blended = true;
            }
        }

        // 13. 差异反馈乘数
        need *= inputs.feedback_multiplier;

        // 14. 上限收口: 硬性库存上限 + 品类最大订货量
        let mut ceiling = f64::MAX;
        if let Some(cap) = inputs.stock_cap {
            ceiling = ceiling.min((cap - on_hand).max(0.0));
        }
        if let Some(max_qty) = category_cfg.max_order_qty.get(&inputs.group) {
            ceiling = ceiling.min(*max_qty as f64);
        }
        need = need.min(ceiling);

        // 15. 订货倍数取整: 向上取整,越过上限则退为向下
        let order_qty = round_to_unit(need, unit, ceiling);

        SolverDecision {
            order_qty,
            raw_need: need,
            skip_reason: None,
            blended,
        }
    }
}

/// 按订货倍数取整
///
/// # 说明
/// - 默认向上进位到倍数;进位越过上限时退为向下取整;
///   向下取整仍越限或为零则不订货
fn round_to_unit(need: f64, unit: f64, ceiling: f64) -> i64 {
    if need <= 0.0 {
        return 0;
    }
    let unit = unit.max(1.0);
    let up = (need / unit).ceil() * unit;
    let qty = if up <= ceiling {
        up
    } else {
        (need / unit).floor() * unit
    };
    if qty <= 0.0 || qty > ceiling {
        return 0;
    }
    qty.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PendingSource, StockSource};

    fn test_product(order_unit: i32) -> ProductInfo {
        ProductInfo {
            item_code: "ITEM1".to_string(),
            item_name: "测试商品".to_string(),
            category_code: 520,
            shelf_life_days: 180,
            order_unit,
            lead_time_days: 1,
            orderable_weekdays: 0b0111_1111,
            sell_price: 1500.0,
            margin_rate: 0.3,
        }
    }

    fn inventory(stock: f64, pending: f64) -> InventoryState {
        InventoryState {
            stock,
            pending,
            stock_source: StockSource::LiveFresh,
            pending_source: PendingSource::LiveFresh,
            is_stale: false,
        }
    }

    struct Scenario {
        product: ProductInfo,
        inventory: InventoryState,
        quality: QualityFlags,
        demand: f64,
        safety_stock: f64,
        stock_cap: Option<f64>,
        skip_reason: Option<SkipReason>,
        min_one_unit: bool,
        friday_boost: bool,
        promotion_phase: PromotionPhase,
        ensemble: Option<f64>,
        feedback: f64,
    }

    impl Scenario {
        fn new(demand: f64, stock: f64, pending: f64) -> Self {
            Self {
                product: test_product(1),
                inventory: inventory(stock, pending),
                quality: QualityFlags::default(),
                demand,
                safety_stock: demand,
                stock_cap: None,
                skip_reason: None,
                min_one_unit: false,
                friday_boost: false,
                promotion_phase: PromotionPhase::None,
                ensemble: None,
                feedback: 1.0,
            }
        }

        fn solve(&self) -> SolverDecision {
            let solver = OrderQuantitySolver::new(SolverConfig::default(), 0.3);
            let inputs = SolverInputs {
                product: &self.product,
                group: CategoryGroup::Beverage,
                daily_demand: self.demand,
                inventory: &self.inventory,
                // 2024-06-05 是周三
                target_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
                safety_stock: self.safety_stock,
                stock_cap: self.stock_cap,
                skip_reason: self.skip_reason,
                extra_demand: 0.0,
                min_one_unit: self.min_one_unit,
                friday_boost: self.friday_boost,
                quality: &self.quality,
                promotion_phase: self.promotion_phase,
                ensemble_order_estimate: self.ensemble,
                feedback_multiplier: self.feedback,
            };
            solver.solve(&inputs, &CategoryPolicyConfig::default())
        }
    }

    #[test]
    fn test_steady_seller_orders_positive_quantity() {
        // 日销 5,库存 3,预定 0 → 必须订货
        let decision = Scenario::new(5.0, 3.0, 0.0).solve();
        assert!(decision.order_qty > 0);
    }

    #[test]
    fn test_massive_overstock_orders_zero() {
        // 库存 100,日销 2 → 短路归零
        let decision = Scenario::new(2.0, 100.0, 0.0).solve();
        assert_eq!(decision.order_qty, 0);
    }

    #[test]
    fn test_order_qty_never_negative() {
        for (demand, stock, pending) in
            [(0.0, 0.0, 0.0), (1.0, 50.0, 50.0), (0.2, 0.0, 0.0), (10.0, 0.0, 0.0)]
        {
            let decision = Scenario::new(demand, stock, pending).solve();
            assert!(decision.order_qty >= 0);
        }
    }

    #[test]
    fn test_depleted_stock_capped_at_multiple_of_demand() {
        // 零库存 + 高安全库存: 需要量被压到日需求 × 3
        let mut scenario = Scenario::new(2.0, 0.0, 0.0);
        scenario.safety_stock = 50.0;
        let decision = scenario.solve();
        assert!(decision.order_qty <= 6);
        assert!(decision.order_qty > 0);
    }

    #[test]
    fn test_skip_reason_zeroes_order() {
        let mut scenario = Scenario::new(5.0, 0.0, 0.0);
        scenario.skip_reason = Some(SkipReason::CutItem);
        let decision = scenario.solve();
        assert_eq!(decision.order_qty, 0);
        assert_eq!(decision.skip_reason, Some(SkipReason::CutItem));
    }

    #[test]
    fn test_pending_counts_toward_on_hand() {
        let without_pending = Scenario::new(4.0, 2.0, 0.0).solve();
        let with_pending = Scenario::new(4.0, 2.0, 10.0).solve();
        assert!(with_pending.order_qty < without_pending.order_qty);
    }

    #[test]
    fn test_rop_forces_minimal_order_for_intermittent_item() {
        let mut scenario = Scenario::new(0.05, 0.0, 0.0);
        scenario.quality.intermittent = true;
        scenario.safety_stock = 0.0;
        let decision = scenario.solve();
        assert_eq!(decision.order_qty, 1);
    }

    #[test]
    fn test_below_threshold_without_rop_orders_zero() {
        let mut scenario = Scenario::new(0.05, 0.0, 0.0);
        scenario.safety_stock = 0.0;
        let decision = scenario.solve();
        assert_eq!(decision.order_qty, 0);
    }

    #[test]
    fn test_rounding_to_order_unit() {
        let mut scenario = Scenario::new(5.0, 0.0, 0.0);
        scenario.product = test_product(6);
        let decision = scenario.solve();
        assert_eq!(decision.order_qty % 6, 0);
        assert!(decision.order_qty > 0);
    }

    #[test]
    fn test_ceiling_prevents_round_up_overshoot() {
        // 上限 5,倍数 4: 进位到 8 越限 → 退为 4
        let mut scenario = Scenario::new(3.0, 0.0, 0.0);
        scenario.product = test_product(4);
        scenario.stock_cap = Some(5.0);
        let decision = scenario.solve();
        assert_eq!(decision.order_qty, 4);
    }

    #[test]
    fn test_category_max_order_qty_caps() {
        // Beverage 无上限表项,改走库存上限路径验证收口
        let mut scenario = Scenario::new(20.0, 0.0, 0.0);
        scenario.stock_cap = Some(10.0);
        let decision = scenario.solve();
        assert!(decision.order_qty <= 10);
    }

    #[test]
    fn test_promo_ramp_in_enforces_min_units() {
        let mut scenario = Scenario::new(0.5, 0.0, 0.0);
        scenario.safety_stock = 0.5;
        scenario.promotion_phase = PromotionPhase::RampIn;
        let decision = scenario.solve();
        assert!(decision.order_qty >= 2);
    }

    #[test]
    fn test_promo_ramp_out_shrinks_order() {
        let base = Scenario::new(10.0, 0.0, 0.0).solve();
        let mut scenario = Scenario::new(10.0, 0.0, 0.0);
        scenario.promotion_phase = PromotionPhase::RampOut;
        let ramp_out = scenario.solve();
        assert!(ramp_out.order_qty < base.order_qty);
    }

    #[test]
    fn test_ensemble_blend_marks_decision() {
        let mut scenario = Scenario::new(5.0, 0.0, 0.0);
        scenario.ensemble = Some(20.0);
        let blended = scenario.solve();
        assert!(blended.blended);

        let plain = Scenario::new(5.0, 0.0, 0.0).solve();
        assert!(!plain.blended);
        assert!(blended.order_qty > plain.order_qty);
    }

    #[test]
    fn test_feedback_multiplier_shrinks_order() {
        let base = Scenario::new(10.0, 0.0, 0.0).solve();
        let mut scenario = Scenario::new(10.0, 0.0, 0.0);
        scenario.feedback = 0.8;
        let penalized = scenario.solve();
        assert!(penalized.order_qty <= base.order_qty);
    }

    #[test]
    fn test_rounding_monotonic_in_need() {
        // 需求递增时订货量不减
        let mut prev = 0;
        for demand in [1.0, 2.0, 3.0, 5.0, 8.0] {
            let qty = Scenario::new(demand, 0.0, 0.0).solve().order_qty;
            assert!(qty >= prev);
            prev = qty;
        }
    }

    #[test]
    fn test_promotion_phase_classification() {
        let solver = OrderQuantitySolver::new(SolverConfig::default(), 0.3);
        let period = PromotionPeriod {
            item_code: "ITEM1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            promo_type: "SALE".to_string(),
        };

        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        assert_eq!(solver.promotion_phase(Some(&period), day(1)), PromotionPhase::RampIn);
        assert_eq!(solver.promotion_phase(Some(&period), day(2)), PromotionPhase::RampIn);
        assert_eq!(solver.promotion_phase(Some(&period), day(5)), PromotionPhase::Steady);
        assert_eq!(solver.promotion_phase(Some(&period), day(9)), PromotionPhase::RampOut);
        assert_eq!(solver.promotion_phase(Some(&period), day(10)), PromotionPhase::RampOut);
        assert_eq!(solver.promotion_phase(Some(&period), day(11)), PromotionPhase::None);
        assert_eq!(solver.promotion_phase(None, day(5)), PromotionPhase::None);
    }
}
