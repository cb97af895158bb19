// ==========================================
// 便利店智能补货系统 - 促销仓储
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 6. 促销阶段调整
// 职责: 促销期间读取,批次级缓存构建
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::PromotionPeriod;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct PromotionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PromotionRepository {
    /// 创建新的 PromotionRepository 实例
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

    /// 批量加载与区间 [range_start, range_end] 有交集的促销期间
    ///
    /// # 用途
    /// - 批次级促销缓存: 既覆盖目标日（阶段判定）,
    ///   也覆盖历史窗口（估计器对促销日降权）
    pub fn load_periods_overlapping(
        &self,
        store_id: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> RepositoryResult<HashMap<String, Vec<PromotionPeriod>>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, start_date, end_date, promo_type
            FROM promotion
            WHERE store_id = ?1 AND end_date >= ?2 AND start_date <= ?3
            ORDER BY item_code, start_date
            "#,
        )?;
        let rows = stmt.query_map(params![store_id, range_start, range_end], |row| {
            Ok(PromotionPeriod {
                item_code: row.get(0)?,
                start_date: row.get(1)?,
                end_date: row.get(2)?,
                promo_type: row.get(3)?,
            })
        })?;

        let mut map: HashMap<String, Vec<PromotionPeriod>> = HashMap::new();
        for row in rows {
            let p = row?;
            map.entry(p.item_code.clone()).or_default().push(p);
        }
        Ok(map)
    }
}
