// ==========================================
// 便利店智能补货系统 - 订货 API
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART D 外部接口
// ==========================================
// 职责: 批次入口（装配配置与编排器,落库决策记录）,
//       订货单 CSV 导出,库存差异诊断入口,
//       执行读数/实销回填透传
// 红线: 批次内单品失败不中断,失败清单随摘要返回
// ==========================================

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db;
use crate::domain::prediction::PredictionResult;
use crate::engine::discrepancy::{DiscrepancyFinding, StockDiscrepancyDiagnoser};
use crate::engine::OrderPredictor;
use crate::repository::prediction_log_repo::PredictionLogRepository;

// ==========================================
// BatchRunResult - 批次执行摘要
// ==========================================
#[derive(Debug, Clone)]
pub struct BatchRunResult {
    pub store_id: String,
    pub target_date: NaiveDate,
    pub config_version: String,
    /// 参与预测的单品数
    pub total_items: usize,
    /// 产出决策记录数
    pub predicted: usize,
    /// 实际产生订货的行数
    pub order_lines: usize,
    /// 订货总量
    pub total_order_qty: i64,
    /// 落库记录数
    pub persisted: usize,
    /// (单品代码, 错误描述)
    pub failed_items: Vec<(String, String)>,
}

// ==========================================
// OrderApi - 外部入口
// ==========================================
pub struct OrderApi {
    conn: Arc<Mutex<Connection>>,
    store_id: String,
}

impl OrderApi {
    pub fn new(db_path: &str, store_id: &str) -> ApiResult<Self> {
        let conn = db::open_sqlite_connection(db_path)?;
        if let Ok(Some(version)) = db::read_schema_version(&conn) {
            if version != db::CURRENT_SCHEMA_VERSION {
                warn!(
                    found = version,
                    expected = db::CURRENT_SCHEMA_VERSION,
                    "schema_version 与代码期望不一致"
                );
            }
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            store_id: store_id.to_string(),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, store_id: &str) -> Self {
        Self {
            conn,
            store_id: store_id.to_string(),
        }
    }

    // ==========================================
    // 批次入口
    // ==========================================

    /// 执行一次全店订货批次并落库
    ///
    /// # 参数
    /// - `item_codes`: 指定单品清单;`None` 时取门店全部单品
    /// - `stock_overrides`/`pending_overrides`: 调用方显式注入的库存缓存
    #[instrument(skip_all, fields(store_id = %self.store_id, target_date = %target_date))]
    pub fn run_batch(
        &self,
        target_date: NaiveDate,
        item_codes: Option<Vec<String>>,
        stock_overrides: HashMap<String, f64>,
        pending_overrides: HashMap<String, f64>,
    ) -> ApiResult<(BatchRunResult, Vec<PredictionResult>)> {
        let config_manager = ConfigManager::from_connection(Arc::clone(&self.conn))
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let config = config_manager
            .load_engine_config()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let config_version = config.config_version.clone();

        let predictor = OrderPredictor::new(
            Arc::clone(&self.conn),
            &self.store_id,
            target_date,
            config,
        );

        let requested = item_codes.as_ref().map(|codes| codes.len());
        let outcome = predictor.predict_batch(item_codes, stock_overrides, pending_overrides)?;
        let total_items =
            requested.unwrap_or(outcome.results.len() + outcome.failed_items.len());

        let persisted = predictor.persist(&outcome.results)?;

        let summary = BatchRunResult {
            store_id: self.store_id.clone(),
            target_date,
            config_version,
            total_items,
            predicted: outcome.results.len(),
            order_lines: outcome.results.iter().filter(|r| r.has_order()).count(),
            total_order_qty: outcome.results.iter().map(|r| r.order_qty).sum(),
            persisted,
            failed_items: outcome.failed_items,
        };
        info!(
            store_id = %summary.store_id,
            target_date = %summary.target_date,
            predicted = summary.predicted,
            order_lines = summary.order_lines,
            total_order_qty = summary.total_order_qty,
            "批次执行完成"
        );
        Ok((summary, outcome.results))
    }

    // ==========================================
    // 订货单导出
    // ==========================================

    /// 导出订货单 CSV（仅订货量 > 0 的行）
    ///
    /// # 返回
    /// 写出的订货行数
    pub fn export_order_sheet(
        &self,
        results: &[PredictionResult],
        path: &Path,
    ) -> ApiResult<usize> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "store_id",
            "target_date",
            "item_code",
            "item_name",
            "category_group",
            "order_qty",
            "confidence",
            "model_type",
        ])?;

        let mut lines = 0;
        for r in results.iter().filter(|r| r.has_order()) {
            writer.write_record([
                r.store_id.as_str(),
                &r.target_date.to_string(),
                r.item_code.as_str(),
                r.item_name.as_str(),
                &r.category_group.to_string(),
                &r.order_qty.to_string(),
                &r.confidence.to_string(),
                &r.model_type.to_string(),
            ])?;
            lines += 1;
        }
        writer.flush()?;
        info!(path = %path.display(), lines, "订货单导出完成");
        Ok(lines)
    }

    // ==========================================
    // 差异诊断与回填
    // ==========================================

    /// 指定日期的库存差异诊断（要求执行读数已回填）
    pub fn diagnose_discrepancies(
        &self,
        target_date: NaiveDate,
    ) -> ApiResult<Vec<DiscrepancyFinding>> {
        let config_manager = ConfigManager::from_connection(Arc::clone(&self.conn))
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let config = config_manager
            .load_engine_config()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let log_repo = PredictionLogRepository::from_connection(Arc::clone(&self.conn));
        let pairs = log_repo.reading_pairs_on(&self.store_id, target_date)?;
        let diagnoser = StockDiscrepancyDiagnoser::new(config.discrepancy);
        Ok(diagnoser.diagnose_all(&pairs))
    }

    /// 回填执行时库存读数
    pub fn record_execution_reading(
        &self,
        prediction_id: &str,
        exec_stock: f64,
        exec_pending: f64,
    ) -> ApiResult<usize> {
        let log_repo = PredictionLogRepository::from_connection(Arc::clone(&self.conn));
        Ok(log_repo.record_execution_reading(prediction_id, exec_stock, exec_pending)?)
    }

    /// 回填实际销量（准确率评估作业调用）
    pub fn record_actual_sale(
        &self,
        prediction_id: &str,
        actual_sale_qty: f64,
    ) -> ApiResult<usize> {
        let log_repo = PredictionLogRepository::from_connection(Arc::clone(&self.conn));
        Ok(log_repo.record_actual_sale(prediction_id, actual_sale_qty)?)
    }
}
