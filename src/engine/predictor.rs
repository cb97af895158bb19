// ==========================================
// 便利店智能补货系统 - 订货预测编排器
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART B 决策流水线
// 依据: Prediction_Engine_Specs_v1.2.md - 2. 整体流程
// ==========================================
// 职责: 串联 库存裁决 → 需求估计 → 系数管线 → 品类策略
//       → 订货量求解,产出全字段决策记录
// 红线: 批次内单品失败只记录不中断;未知单品返回 Ok(None);
//       同输入重复执行产出相同订货量（幂等,仅 UUID/时刻不同）
// ==========================================

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::engine_config::EngineConfig;
use crate::domain::inventory::{LiveInventory, PromotionPeriod};
use crate::domain::prediction::PredictionResult;
use crate::domain::types::{CategoryGroup, ConfidenceLevel, ModelType, SkipReason};
use crate::engine::category::{CategoryPolicyRouter, StrategyContext};
use crate::engine::coefficient::{CoefficientInputs, CoefficientPipeline};
use crate::engine::demand_estimator::DemandEstimator;
use crate::engine::ensemble::EnsembleBlender;
use crate::engine::feedback::FeedbackAdjuster;
use crate::engine::inventory_resolver::InventoryResolver;
use crate::engine::order_solver::{OrderQuantitySolver, SolverInputs};
use crate::engine::EngineError;
use crate::repository::external_factor_repo::{ExternalFactorRepository, HolidayContext};
use crate::repository::inventory_repo::{InventoryRepository, WasteStats};
use crate::repository::prediction_log_repo::PredictionLogRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::promotion_repo::PromotionRepository;
use crate::repository::sales_repo::SalesHistoryRepository;

// ==========================================
// BatchContext - 批次上下文
// ==========================================
// 批次开始时一次性装载的共享数据,预测过程只读,
// 杜绝逐单品查询与跨单品状态泄漏
pub struct BatchContext {
    /// 调用方显式注入的库存缓存（最高优先）
    pub stock_overrides: HashMap<String, f64>,
    pub pending_overrides: HashMap<String, f64>,
    /// 门店实时库存快照
    pub live_inventory: HashMap<String, LiveInventory>,
    /// 覆盖需求窗口与目标日的促销期
    pub promotions: HashMap<String, Vec<PromotionPeriod>>,
    /// 共购关联分数
    pub association_scores: HashMap<String, f64>,
    /// 进货/废弃统计（废弃系数与反馈收缩）
    pub waste_stats: HashMap<String, WasteStats>,
    /// 需求窗口内节假日集合（样本降权）
    pub holiday_dates: HashSet<NaiveDate>,
    /// 目标日节假日上下文
    pub holiday_context: Option<HolidayContext>,
    pub temperature: Option<f64>,
    pub prev_temperature: Option<f64>,
    /// 库存快照年龄判定基准时刻
    pub now: DateTime<Utc>,
}

// ==========================================
// BatchPredictionOutcome - 批次预测结果
// ==========================================
pub struct BatchPredictionOutcome {
    pub results: Vec<PredictionResult>,
    /// (单品代码, 错误描述)
    pub failed_items: Vec<(String, String)>,
}

// ==========================================
// OrderPredictor - 编排器
// ==========================================
pub struct OrderPredictor {
    store_id: String,
    target_date: NaiveDate,
    config: EngineConfig,

    product_repo: ProductRepository,
    sales_repo: SalesHistoryRepository,
    inventory_repo: InventoryRepository,
    promotion_repo: PromotionRepository,
    external_repo: ExternalFactorRepository,
    log_repo: PredictionLogRepository,

    inventory_resolver: InventoryResolver,
    demand_estimator: DemandEstimator,
    coefficient_pipeline: CoefficientPipeline,
    category_router: CategoryPolicyRouter,
    solver: OrderQuantitySolver,
    ensemble: EnsembleBlender,
    feedback: FeedbackAdjuster,
}

impl OrderPredictor {
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        store_id: &str,
        target_date: NaiveDate,
        config: EngineConfig,
    ) -> Self {
        let inventory_resolver = InventoryResolver::new(config.inventory.clone());
        let demand_estimator = DemandEstimator::new(config.demand.clone());
        let coefficient_pipeline = CoefficientPipeline::new(config.coefficient.clone());
        let category_router = CategoryPolicyRouter::new(config.category.clone());
        let solver =
            OrderQuantitySolver::new(config.solver.clone(), config.ensemble.blend_weight);
        let ensemble = EnsembleBlender::new(config.ensemble.clone());
        let feedback = FeedbackAdjuster::new(config.feedback.clone());

        Self {
            store_id: store_id.to_string(),
            target_date,
            config,
            product_repo: ProductRepository::from_connection(Arc::clone(&conn)),
            sales_repo: SalesHistoryRepository::from_connection(Arc::clone(&conn)),
            inventory_repo: InventoryRepository::from_connection(Arc::clone(&conn)),
            promotion_repo: PromotionRepository::from_connection(Arc::clone(&conn)),
            external_repo: ExternalFactorRepository::from_connection(Arc::clone(&conn)),
            log_repo: PredictionLogRepository::from_connection(conn),
            inventory_resolver,
            demand_estimator,
            coefficient_pipeline,
            category_router,
            solver,
            ensemble,
            feedback,
        }
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// 需求窗口终点（目标日前一天,目标日当天销量尚未发生）
    fn window_end(&self) -> NaiveDate {
        self.target_date - Duration::days(1)
    }

    // ==========================================
    // 批次上下文装载
    // ==========================================

    /// 一次性装载批次共享数据
    pub fn build_context(
        &self,
        stock_overrides: HashMap<String, f64>,
        pending_overrides: HashMap<String, f64>,
    ) -> Result<BatchContext, EngineError> {
        let window_days = self.config.demand.window_days;
        let window_start = self.window_end() - Duration::days((window_days - 1) as i64);

        let live_inventory = self.inventory_repo.load_all_live(&self.store_id)?;
        let promotions = self.promotion_repo.load_periods_overlapping(
            &self.store_id,
            window_start,
            self.target_date,
        )?;
        let association_scores = self.sales_repo.load_association_scores(&self.store_id)?;
        let waste_stats = self.inventory_repo.load_waste_stats(
            &self.store_id,
            self.window_end(),
            window_days,
        )?;
        let holiday_dates = self
            .external_repo
            .holidays_in_range(window_start, self.target_date)?
            .into_keys()
            .collect();
        let holiday_context = self.external_repo.holiday_context(self.target_date)?;
        let temperature = self.external_repo.temperature_on(self.target_date)?;
        let prev_temperature = self
            .external_repo
            .temperature_on(self.target_date - Duration::days(1))?;

        Ok(BatchContext {
            stock_overrides,
            pending_overrides,
            live_inventory,
            promotions,
            association_scores,
            waste_stats,
            holiday_dates,
            holiday_context,
            temperature,
            prev_temperature,
            now: Utc::now(),
        })
    }

    // ==========================================
    // 单品预测
    // ==========================================

    /// 单品预测便捷入口（内部自建上下文）
    pub fn predict(&self, item_code: &str) -> Result<Option<PredictionResult>, EngineError> {
        let ctx = self.build_context(HashMap::new(), HashMap::new())?;
        self.predict_item(item_code, &ctx)
    }

    /// 单品预测
    ///
    /// # 返回
    /// - 商品主数据不存在时 `Ok(None)`
    pub fn predict_item(
        &self,
        item_code: &str,
        ctx: &BatchContext,
    ) -> Result<Option<PredictionResult>, EngineError> {
        let Some(product) = self.product_repo.find(&self.store_id, item_code)? else {
            return Ok(None);
        };

        let group = self.category_router.classify(product.category_code);
        let live = ctx.live_inventory.get(item_code);

        // 1. 库存裁决
        let history_stock =
            self.sales_repo
                .latest_stock(&self.store_id, item_code, self.window_end())?;
        let inventory = self.inventory_resolver.resolve(
            &product,
            ctx.stock_overrides.get(item_code).copied(),
            ctx.pending_overrides.get(item_code).copied(),
            live,
            history_stock,
            ctx.now,
        );

        // 2. 需求估计
        let window = self.sales_repo.fetch_calendar_window(
            &self.store_id,
            item_code,
            self.window_end(),
            self.config.demand.window_days,
        )?;
        let promo_dates = promo_dates_of(ctx.promotions.get(item_code), &window);
        let estimate =
            self.demand_estimator
                .estimate(&window, group, &ctx.holiday_dates, &promo_dates);

        // 3. 系数管线
        let weekday_stats = self.sales_repo.weekday_stats(
            &self.store_id,
            item_code,
            self.window_end(),
            self.config.demand.window_days,
        )?;
        let weekday_index = self.target_date.weekday().num_days_from_monday() as usize;
        let learned_weekday = if group.is_food_like() {
            weekday_stats
                .learned_coefficient(weekday_index, self.config.coefficient.weekday_learned_min_days)
        } else {
            None
        };
        let coefficient_inputs = CoefficientInputs {
            holiday: ctx.holiday_context.clone(),
            temperature: ctx.temperature,
            prev_temperature: ctx.prev_temperature,
            weekday_index,
            learned_weekday,
            month: self.target_date.month(),
            association_score: ctx.association_scores.get(item_code).copied(),
            trend_slope: estimate.features.as_ref().map(|f| f.trend_slope),
        };
        let (adjusted_qty, trace) =
            self.coefficient_pipeline
                .apply(estimate.point, group, &coefficient_inputs);

        // 4. 品类策略
        let tobacco_stats = if group == CategoryGroup::Tobacco {
            Some(self.sales_repo.tobacco_event_stats(
                &self.store_id,
                item_code,
                self.window_end(),
                self.config.demand.window_days,
                self.config.category.tobacco_carton_threshold,
            )?)
        } else {
            None
        };
        let waste_stats = ctx.waste_stats.get(item_code);

        let strategy_ctx = StrategyContext {
            product: &product,
            group,
            adjusted_demand: adjusted_qty,
            inventory: &inventory,
            target_date: self.target_date,
            pipeline_weekday_coef: trace.weekday,
            weekday_stats: &weekday_stats,
            tobacco_stats: tobacco_stats.as_ref(),
            waste_stats,
            config: self.category_router.config(),
        };
        let mut outcome = self.category_router.evaluate(&strategy_ctx);

        // 截单品: 覆盖策略结论,直接跳过
        if live.map(|l| l.is_cut_item).unwrap_or(false) {
            outcome.skip_reason = Some(SkipReason::CutItem);
        }

        let effective_demand = outcome.demand_override.unwrap_or(adjusted_qty);

        // 5. 促销阶段
        let active_period = ctx
            .promotions
            .get(item_code)
            .and_then(|ps| ps.iter().find(|p| p.contains(self.target_date)));
        let promotion_phase = self.solver.promotion_phase(active_period, self.target_date);

        // 6. 统计融合估计与差异反馈乘数
        let coverage_days = (product.days_until_next_orderable(self.target_date)
            + product.lead_time_days.max(0)) as f64;
        let ensemble_order_estimate = estimate.features.as_ref().and_then(|f| {
            self.ensemble.order_estimate(
                f,
                &weekday_stats,
                self.target_date,
                estimate.data_days,
                coverage_days,
            )
        });
        let feedback_multiplier = if self.feedback.is_enabled() {
            let diffs = self.log_repo.recent_order_diffs(
                &self.store_id,
                item_code,
                self.window_end(),
                self.feedback.diff_window_days(),
            )?;
            self.feedback.multiplier(&diffs, waste_stats)
        } else {
            1.0
        };

        // 7. 订货量求解
        let solver_inputs = SolverInputs {
            product: &product,
            group,
            daily_demand: effective_demand,
            inventory: &inventory,
            target_date: self.target_date,
            safety_stock: outcome.safety_stock,
            stock_cap: outcome.stock_cap,
            skip_reason: outcome.skip_reason,
            extra_demand: outcome.extra_demand,
            min_one_unit: outcome.min_one_unit,
            friday_boost: outcome.friday_boost,
            quality: &estimate.quality,
            promotion_phase,
            ensemble_order_estimate,
            feedback_multiplier,
        };
        let decision = self.solver.solve(&solver_inputs, self.category_router.config());

        let model_type = if decision.blended {
            ModelType::Blended
        } else {
            ModelType::RuleOnly
        };

        Ok(Some(PredictionResult {
            prediction_id: Uuid::new_v4().to_string(),
            store_id: self.store_id.clone(),
            item_code: product.item_code.clone(),
            item_name: product.item_name.clone(),
            category_code: product.category_code,
            category_group: group,
            target_date: self.target_date,
            raw_predicted_qty: estimate.point,
            adjusted_qty: effective_demand,
            data_days: estimate.data_days,
            confidence: ConfidenceLevel::from_data_days(estimate.data_days),
            quality: estimate.quality,
            coefficients: trace,
            current_stock: inventory.stock,
            pending_qty: inventory.pending,
            stock_source: inventory.stock_source,
            pending_source: inventory.pending_source,
            stock_is_stale: inventory.is_stale,
            safety_stock: outcome.safety_stock,
            stock_cap: outcome.stock_cap,
            category_pattern: outcome.pattern,
            skip_reason: decision.skip_reason.or(outcome.skip_reason),
            promotion_phase,
            model_type,
            order_qty: decision.order_qty,
            created_at: Utc::now(),
        }))
    }

    // ==========================================
    // 批次预测
    // ==========================================

    /// 全店批次预测
    ///
    /// # 参数
    /// - `item_codes`: 指定单品清单;`None` 时取门店全部单品
    ///
    /// # 说明
    /// - 单品失败记入 failed_items 并继续,绝不中断批次
    #[instrument(skip_all, fields(store_id = %self.store_id, target_date = %self.target_date))]
    pub fn predict_batch(
        &self,
        item_codes: Option<Vec<String>>,
        stock_overrides: HashMap<String, f64>,
        pending_overrides: HashMap<String, f64>,
    ) -> Result<BatchPredictionOutcome, EngineError> {
        let items = match item_codes {
            Some(codes) => codes,
            None => self.product_repo.list_item_codes(&self.store_id)?,
        };
        info!(
            store_id = %self.store_id,
            target_date = %self.target_date,
            item_count = items.len(),
            "批次预测开始"
        );

        let ctx = self.build_context(stock_overrides, pending_overrides)?;

        let mut results = Vec::with_capacity(items.len());
        let mut failed_items = Vec::new();
        for item_code in &items {
            match self.predict_item(item_code, &ctx) {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {
                    warn!(item_code = %item_code, "商品主数据缺失,跳过");
                }
                Err(e) => {
                    warn!(item_code = %item_code, error = %e, "单品预测失败,跳过");
                    failed_items.push((item_code.clone(), e.to_string()));
                }
            }
        }

        info!(
            succeeded = results.len(),
            failed = failed_items.len(),
            order_lines = results.iter().filter(|r| r.has_order()).count(),
            "批次预测完成"
        );
        Ok(BatchPredictionOutcome {
            results,
            failed_items,
        })
    }

    /// 决策记录落库
    pub fn persist(&self, results: &[PredictionResult]) -> Result<usize, EngineError> {
        Ok(self.log_repo.insert_batch(results)?)
    }
}

/// 促销期与需求窗口的交集日期集合
fn promo_dates_of(
    periods: Option<&Vec<PromotionPeriod>>,
    window: &[crate::domain::sales::DailySalesRow],
) -> HashSet<NaiveDate> {
    let mut dates = HashSet::new();
    let Some(periods) = periods else {
        return dates;
    };
    for row in window {
        if periods.iter().any(|p| p.contains(row.sale_date)) {
            dates.insert(row.sale_date);
        }
    }
    dates
}
