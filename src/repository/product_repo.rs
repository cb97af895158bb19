// ==========================================
// 便利店智能补货系统 - 商品主数据仓储
// ==========================================
// 依据: Field_Mapping_Spec_v1.2.md - product 表
// 红线: Repository 不含业务逻辑,只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::ProductInfo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例
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

    /// 按单品代码查询商品主数据
    ///
    /// # 返回
    /// - Ok(Some(ProductInfo)): 找到记录
    /// - Ok(None): 单品不存在（预测应返回"无结果",不是错误）
    pub fn find(&self, store_id: &str, item_code: &str) -> RepositoryResult<Option<ProductInfo>> {
        let conn = self.get_conn()?;

        let product = conn
            .query_row(
                r#"
                SELECT item_code, item_name, category_code, shelf_life_days,
                       order_unit, lead_time_days, orderable_weekdays,
                       sell_price, margin_rate
                FROM product
                WHERE store_id = ?1 AND item_code = ?2
                "#,
                params![store_id, item_code],
                |row| {
                    Ok(ProductInfo {
                        item_code: row.get(0)?,
                        item_name: row.get(1)?,
                        category_code: row.get(2)?,
                        shelf_life_days: row.get(3)?,
                        order_unit: row.get(4)?,
                        lead_time_days: row.get(5)?,
                        orderable_weekdays: row.get::<_, i64>(6)? as u8,
                        sell_price: row.get(7)?,
                        margin_rate: row.get(8)?,
                    })
                },
            )
            .optional()?;

        Ok(product)
    }

    /// 查询门店全部可订货单品代码（批次默认输入）
    pub fn list_item_codes(&self, store_id: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT item_code FROM product WHERE store_id = ?1 ORDER BY item_code",
        )?;
        let rows = stmt.query_map(params![store_id], |row| row.get::<_, String>(0))?;

        let mut codes = Vec::new();
        for row in rows {
            codes.push(row?);
        }
        Ok(codes)
    }
}
