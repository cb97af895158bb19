// ==========================================
// 便利店智能补货系统 - 销售历史仓储
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 2. 需求估计输入
// 红线: 窗口必须日历完整;无记录日补 sale=0 / stock=NULL,
//       与确认断货（stock=0 且有记录）严格区分
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::sales::{DailySalesRow, TobaccoEventStats, WeekdayStats};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct SalesHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalesHistoryRepository {
    /// 创建新的 SalesHistoryRepository 实例
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

    /// 取日历完整的销售窗口（按日期升序,长度恰好 window_days）
    ///
    /// # 参数
    /// - end_date: 窗口末日（含,通常为预测目标日前一天）
    /// - window_days: 窗口天数
    ///
    /// # 说明
    /// - 数据库缺失的日期补占位行（sale=0, stock=NULL, has_record=false）
    pub fn fetch_calendar_window(
        &self,
        store_id: &str,
        item_code: &str,
        end_date: NaiveDate,
        window_days: i32,
    ) -> RepositoryResult<Vec<DailySalesRow>> {
        let start_date = end_date - Duration::days((window_days - 1) as i64);

        let mut by_date: HashMap<NaiveDate, DailySalesRow> = HashMap::new();
        {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                r#"
                SELECT sale_date, sale_qty, stock_qty, order_qty, received_qty, waste_qty
                FROM daily_sales
                WHERE store_id = ?1 AND item_code = ?2
                  AND sale_date >= ?3 AND sale_date <= ?4
                "#,
            )?;

            let rows = stmt.query_map(
                params![store_id, item_code, start_date, end_date],
                |row| {
                    Ok(DailySalesRow {
                        sale_date: row.get(0)?,
                        sale_qty: row.get(1)?,
                        stock_qty: row.get(2)?,
                        has_record: true,
                        order_qty: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                        received_qty: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                        waste_qty: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
                    })
                },
            )?;

            for row in rows {
                let r = row?;
                by_date.insert(r.sale_date, r);
            }
        }

        // 日历补全
        let mut window = Vec::with_capacity(window_days as usize);
        let mut d = start_date;
        while d <= end_date {
            let row = by_date
                .remove(&d)
                .unwrap_or_else(|| DailySalesRow::absent(d));
            window.push(row);
            d += Duration::days(1);
        }

        Ok(window)
    }

    /// 最近一条历史日末库存（end_date 当日或之前）
    pub fn latest_stock(
        &self,
        store_id: &str,
        item_code: &str,
        end_date: NaiveDate,
    ) -> RepositoryResult<Option<f64>> {
        let conn = self.get_conn()?;

        let stock = conn
            .query_row(
                r#"
                SELECT stock_qty FROM daily_sales
                WHERE store_id = ?1 AND item_code = ?2
                  AND sale_date <= ?3 AND stock_qty IS NOT NULL
                ORDER BY sale_date DESC
                LIMIT 1
                "#,
                params![store_id, item_code, end_date],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;

        Ok(stock)
    }

    /// 按星期聚合的销售统计（食品类星期系数学习 / 酒类策略内重算）
    pub fn weekday_stats(
        &self,
        store_id: &str,
        item_code: &str,
        end_date: NaiveDate,
        window_days: i32,
    ) -> RepositoryResult<WeekdayStats> {
        let window = self.fetch_calendar_window(store_id, item_code, end_date, window_days)?;

        let mut sum_by_weekday = [0.0_f64; 7];
        let mut days_by_weekday = [0_i32; 7];
        let mut total = 0.0;
        let mut total_days = 0;

        for row in &window {
            if !row.has_record {
                continue;
            }
            let idx = row.sale_date.weekday().num_days_from_monday() as usize;
            sum_by_weekday[idx] += row.sale_qty;
            days_by_weekday[idx] += 1;
            total += row.sale_qty;
            total_days += 1;
        }

        let mut avg_by_weekday = [0.0_f64; 7];
        for i in 0..7 {
            if days_by_weekday[i] > 0 {
                avg_by_weekday[i] = sum_by_weekday[i] / days_by_weekday[i] as f64;
            }
        }

        Ok(WeekdayStats {
            avg_by_weekday,
            days_by_weekday,
            overall_avg: if total_days > 0 {
                total / total_days as f64
            } else {
                0.0
            },
        })
    }

    /// 香烟事件统计: 整条购买日数与完全售罄日数
    ///
    /// # 参数
    /// - carton_threshold: 单日销量达到该值视为整条购买
    pub fn tobacco_event_stats(
        &self,
        store_id: &str,
        item_code: &str,
        end_date: NaiveDate,
        window_days: i32,
        carton_threshold: f64,
    ) -> RepositoryResult<TobaccoEventStats> {
        let window = self.fetch_calendar_window(store_id, item_code, end_date, window_days)?;

        let mut carton_days = 0;
        let mut sellout_days = 0;
        for row in &window {
            if !row.has_record {
                continue;
            }
            if row.sale_qty >= carton_threshold {
                carton_days += 1;
            }
            if row.is_confirmed_stockout() && row.sale_qty > 0.0 {
                sellout_days += 1;
            }
        }

        Ok(TobaccoEventStats {
            window_days,
            carton_days,
            sellout_days,
        })
    }

    /// 批量加载单品关联提升分数（共购分析的输入模式统计,批次级缓存）
    ///
    /// # 说明
    /// - 表不存在或为空时返回空表,关联提升退化为 1.0
    pub fn load_association_scores(
        &self,
        store_id: &str,
    ) -> RepositoryResult<HashMap<String, f64>> {
        let conn = self.get_conn()?;

        let has_table: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='association_score' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !has_table {
            return Ok(HashMap::new());
        }

        let mut stmt = conn.prepare(
            "SELECT item_code, score FROM association_score WHERE store_id = ?1",
        )?;
        let rows = stmt.query_map(params![store_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut scores = HashMap::new();
        for row in rows {
            let (code, score) = row?;
            scores.insert(code, score);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> SalesHistoryRepository {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE daily_sales (
                store_id TEXT NOT NULL,
                item_code TEXT NOT NULL,
                sale_date DATE NOT NULL,
                sale_qty REAL NOT NULL DEFAULT 0,
                stock_qty REAL,
                order_qty REAL,
                received_qty REAL,
                waste_qty REAL,
                PRIMARY KEY (store_id, item_code, sale_date)
            );
            "#,
        )
        .unwrap();
        SalesHistoryRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn insert_day(repo: &SalesHistoryRepository, date: &str, sale: f64, stock: Option<f64>) {
        let conn = repo.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO daily_sales (store_id, item_code, sale_date, sale_qty, stock_qty)
             VALUES ('S001', 'ITEM1', ?1, ?2, ?3)",
            params![date, sale, stock],
        )
        .unwrap();
    }

    #[test]
    fn test_calendar_window_fills_absent_days() {
        let repo = setup_repo();
        insert_day(&repo, "2024-06-01", 3.0, Some(10.0));
        insert_day(&repo, "2024-06-03", 5.0, Some(5.0));

        let end = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let window = repo
            .fetch_calendar_window("S001", "ITEM1", end, 3)
            .unwrap();

        assert_eq!(window.len(), 3);
        assert!(window[0].has_record);
        // 6月2日无记录: sale=0, stock=None
        assert!(!window[1].has_record);
        assert_eq!(window[1].sale_qty, 0.0);
        assert!(window[1].stock_qty.is_none());
        assert!(window[2].has_record);
    }

    #[test]
    fn test_latest_stock_skips_null() {
        let repo = setup_repo();
        insert_day(&repo, "2024-06-01", 3.0, Some(7.0));
        insert_day(&repo, "2024-06-02", 2.0, None);

        let end = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let stock = repo.latest_stock("S001", "ITEM1", end).unwrap();
        assert_eq!(stock, Some(7.0));
    }

    #[test]
    fn test_tobacco_event_stats() {
        let repo = setup_repo();
        insert_day(&repo, "2024-06-01", 12.0, Some(8.0)); // 整条购买
        insert_day(&repo, "2024-06-02", 4.0, Some(0.0)); // 售罄
        insert_day(&repo, "2024-06-03", 1.0, Some(6.0));

        let end = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let stats = repo
            .tobacco_event_stats("S001", "ITEM1", end, 3, 10.0)
            .unwrap();
        assert_eq!(stats.carton_days, 1);
        assert_eq!(stats.sellout_days, 1);
    }
}
