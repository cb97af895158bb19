// ==========================================
// 便利店智能补货系统 - 实时库存仓储
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 1. 库存解析
// 职责: live_inventory 快照读取 + inventory_batch 废弃归因聚合
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::LiveInventory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// WasteStats - 废弃归因聚合
// ==========================================
// 来源: inventory_batch 表（按入库批次跟踪消耗/废弃）
#[derive(Debug, Clone, Default)]
pub struct WasteStats {
    pub received_total: f64,
    pub wasted_total: f64,
}

impl WasteStats {
    /// 废弃率（无入库时为 0）
    pub fn waste_rate(&self) -> f64 {
        if self.received_total <= 0.0 {
            0.0
        } else {
            (self.wasted_total / self.received_total).clamp(0.0, 1.0)
        }
    }
}

pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    /// 创建新的 InventoryRepository 实例
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

    /// 单品实时库存快照
    pub fn find_live(
        &self,
        store_id: &str,
        item_code: &str,
    ) -> RepositoryResult<Option<LiveInventory>> {
        let conn = self.get_conn()?;

        let live = conn
            .query_row(
                r#"
                SELECT item_code, stock_qty, pending_qty, queried_at,
                       is_available, is_cut_item
                FROM live_inventory
                WHERE store_id = ?1 AND item_code = ?2
                "#,
                params![store_id, item_code],
                Self::map_live_row,
            )
            .optional()?;

        Ok(live)
    }

    /// 批量加载门店实时库存快照（批次级,避免 O(items) 查询）
    pub fn load_all_live(
        &self,
        store_id: &str,
    ) -> RepositoryResult<HashMap<String, LiveInventory>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, stock_qty, pending_qty, queried_at,
                   is_available, is_cut_item
            FROM live_inventory
            WHERE store_id = ?1
            "#,
        )?;
        let rows = stmt.query_map(params![store_id], Self::map_live_row)?;

        let mut map = HashMap::new();
        for row in rows {
            let live = row?;
            map.insert(live.item_code.clone(), live);
        }
        Ok(map)
    }

    /// 批量加载废弃归因统计（批次级缓存）
    ///
    /// # 参数
    /// - end_date / window_days: 聚合窗口
    ///
    /// # 说明
    /// - inventory_batch 表不存在时返回空表,废弃反馈退化为不生效
    pub fn load_waste_stats(
        &self,
        store_id: &str,
        end_date: NaiveDate,
        window_days: i32,
    ) -> RepositoryResult<HashMap<String, WasteStats>> {
        let conn = self.get_conn()?;

        let has_table: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='inventory_batch' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !has_table {
            return Ok(HashMap::new());
        }

        let start_date = end_date - Duration::days(window_days as i64);
        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, SUM(received_qty), SUM(wasted_qty)
            FROM inventory_batch
            WHERE store_id = ?1 AND received_date >= ?2 AND received_date <= ?3
            GROUP BY item_code
            "#,
        )?;
        let rows = stmt.query_map(params![store_id, start_date, end_date], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            ))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (code, received, wasted) = row?;
            map.insert(
                code,
                WasteStats {
                    received_total: received,
                    wasted_total: wasted,
                },
            );
        }
        Ok(map)
    }

    fn map_live_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LiveInventory> {
        Ok(LiveInventory {
            item_code: row.get(0)?,
            stock_qty: row.get(1)?,
            pending_qty: row.get(2)?,
            queried_at: row.get(3)?,
            is_available: row.get::<_, i64>(4)? != 0,
            is_cut_item: row.get::<_, i64>(5)? != 0,
        })
    }
}
