// ==========================================
// 便利店智能补货系统 - 预测日志仓储
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 7. 决策记录持久化
// 职责: 决策记录写入 + 差异反馈查询 + 执行时点读数回填
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::prediction::PredictionResult;
use crate::domain::types::StockSource;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// OrderDiffRecord - 订货与实际销量的差异记录
// ==========================================
#[derive(Debug, Clone)]
pub struct OrderDiffRecord {
    pub target_date: NaiveDate,
    pub order_qty: f64,
    pub actual_sale_qty: f64,
}

// ==========================================
// ReadingPair - 预测时点与执行时点的库存读数对
// ==========================================
// 用途: 离线库存差异诊断
#[derive(Debug, Clone)]
pub struct ReadingPair {
    pub item_code: String,
    pub target_date: NaiveDate,
    pub pred_stock: f64,
    pub pred_pending: f64,
    pub exec_stock: f64,
    pub exec_pending: f64,
    pub stock_source: StockSource,
    pub is_stale: bool,
}

pub struct PredictionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PredictionLogRepository {
    /// 创建新的 PredictionLogRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入决策记录（事务）
    ///
    /// # 说明
    /// - payload_json 保留全字段,结构化列只抽取反馈/诊断所需
    pub fn insert_batch(&self, results: &[PredictionResult]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for r in results {
            let payload = serde_json::to_string(r)
                .map_err(|e| RepositoryError::InternalError(format!("决策记录序列化失败: {}", e)))?;
            tx.execute(
                r#"
                INSERT OR REPLACE INTO prediction_log (
                    prediction_id, store_id, item_code, target_date,
                    raw_predicted_qty, adjusted_qty, current_stock, pending_qty,
                    safety_stock, order_qty, confidence, data_days,
                    stock_source, pending_source, stock_is_stale,
                    model_type, category_group, skip_reason,
                    payload_json, created_at
                ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20)
                "#,
                params![
                    r.prediction_id,
                    r.store_id,
                    r.item_code,
                    r.target_date,
                    r.raw_predicted_qty,
                    r.adjusted_qty,
                    r.current_stock,
                    r.pending_qty,
                    r.safety_stock,
                    r.order_qty,
                    r.confidence.to_string(),
                    r.data_days,
                    r.stock_source.to_string(),
                    r.pending_source.to_string(),
                    r.stock_is_stale as i64,
                    r.model_type.to_string(),
                    r.category_group.to_string(),
                    r.skip_reason.as_ref().map(|s| s.to_string()),
                    payload,
                    r.created_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 近期订货量与实际销量的差异记录（差异反馈输入）
    ///
    /// # 说明
    /// - actual_sale_qty 由评估作业回填;未回填的行不参与反馈
    pub fn recent_order_diffs(
        &self,
        store_id: &str,
        item_code: &str,
        end_date: NaiveDate,
        window_days: i32,
    ) -> RepositoryResult<Vec<OrderDiffRecord>> {
        let start_date = end_date - Duration::days(window_days as i64);
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT target_date, order_qty, actual_sale_qty
            FROM prediction_log
            WHERE store_id = ?1 AND item_code = ?2
              AND target_date >= ?3 AND target_date < ?4
              AND actual_sale_qty IS NOT NULL
            ORDER BY target_date
            "#,
        )?;
        let rows = stmt.query_map(
            params![store_id, item_code, start_date, end_date],
            |row| {
                Ok(OrderDiffRecord {
                    target_date: row.get(0)?,
                    order_qty: row.get(1)?,
                    actual_sale_qty: row.get(2)?,
                })
            },
        )?;

        let mut diffs = Vec::new();
        for row in rows {
            diffs.push(row?);
        }
        Ok(diffs)
    }

    /// 回填执行时点的库存读数（订货执行作业调用）
    pub fn record_execution_reading(
        &self,
        prediction_id: &str,
        exec_stock: f64,
        exec_pending: f64,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE prediction_log SET exec_stock = ?2, exec_pending = ?3 WHERE prediction_id = ?1",
            params![prediction_id, exec_stock, exec_pending],
        )?;
        Ok(updated)
    }

    /// 回填实际销量（准确率评估作业调用）
    pub fn record_actual_sale(
        &self,
        prediction_id: &str,
        actual_sale_qty: f64,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE prediction_log SET actual_sale_qty = ?2 WHERE prediction_id = ?1",
            params![prediction_id, actual_sale_qty],
        )?;
        Ok(updated)
    }

    /// 指定日期已回填执行读数的记录对（差异诊断输入）
    pub fn reading_pairs_on(
        &self,
        store_id: &str,
        target_date: NaiveDate,
    ) -> RepositoryResult<Vec<ReadingPair>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, target_date, current_stock, pending_qty,
                   exec_stock, exec_pending, stock_source, stock_is_stale
            FROM prediction_log
            WHERE store_id = ?1 AND target_date = ?2
              AND exec_stock IS NOT NULL AND exec_pending IS NOT NULL
            ORDER BY item_code
            "#,
        )?;
        let rows = stmt.query_map(params![store_id, target_date], |row| {
            let source_str: String = row.get(6)?;
            Ok(ReadingPair {
                item_code: row.get(0)?,
                target_date: row.get(1)?,
                pred_stock: row.get(2)?,
                pred_pending: row.get(3)?,
                exec_stock: row.get(4)?,
                exec_pending: row.get(5)?,
                stock_source: parse_stock_source(&source_str),
                is_stale: row.get::<_, i64>(7)? != 0,
            })
        })?;

        let mut pairs = Vec::new();
        for row in rows {
            pairs.push(row?);
        }
        Ok(pairs)
    }
}

/// 字符串 → StockSource（未知值按 NONE 处理,不报错）
fn parse_stock_source(s: &str) -> StockSource {
    match s {
        "EXPLICIT_CACHE" => StockSource::ExplicitCache,
        "LIVE_FRESH" => StockSource::LiveFresh,
        "LIVE_STALE_HISTORY" => StockSource::LiveStaleHistory,
        "LIVE_STALE_LIVE" => StockSource::LiveStaleLive,
        "HISTORY_ONLY" => StockSource::HistoryOnly,
        _ => StockSource::None,
    }
}
