// ==========================================
// 便利店智能补货系统 - 外部因素仓储
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 3. 系数管线输入
// 职责: 节假日/气温条目读取与节假日上下文派生
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// HolidayInfo - 节假日条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayInfo {
    pub date: NaiveDate,
    pub name: String,
    pub length_days: i32, // 连休长度
}

// ==========================================
// HolidayContext - 目标日相对节假日的位置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayPosition {
    Before, // 节前日
    During, // 节中
    After,  // 节后日
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayContext {
    pub position: HolidayPosition,
    pub length_days: i32,
    pub name: String,
}

pub struct ExternalFactorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExternalFactorRepository {
    /// 创建新的 ExternalFactorRepository 实例
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

    /// 指定日期的节假日条目
    pub fn holiday_on(&self, date: NaiveDate) -> RepositoryResult<Option<HolidayInfo>> {
        let conn = self.get_conn()?;

        let info = conn
            .query_row(
                r#"
                SELECT factor_date, holiday_name, holiday_length
                FROM external_factor
                WHERE factor_date = ?1 AND factor_type = 'HOLIDAY'
                "#,
                params![date],
                |row| {
                    Ok(HolidayInfo {
                        date: row.get(0)?,
                        name: row.get(1)?,
                        length_days: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(info)
    }

    /// 目标日的节假日上下文（节前/节中/节后,无则 None）
    ///
    /// 判定顺序: 节中 → 节前 → 节后（命中即停）
    pub fn holiday_context(&self, date: NaiveDate) -> RepositoryResult<Option<HolidayContext>> {
        if let Some(h) = self.holiday_on(date)? {
            return Ok(Some(HolidayContext {
                position: HolidayPosition::During,
                length_days: h.length_days,
                name: h.name,
            }));
        }
        if let Some(h) = self.holiday_on(date + Duration::days(1))? {
            return Ok(Some(HolidayContext {
                position: HolidayPosition::Before,
                length_days: h.length_days,
                name: h.name,
            }));
        }
        if let Some(h) = self.holiday_on(date - Duration::days(1))? {
            return Ok(Some(HolidayContext {
                position: HolidayPosition::After,
                length_days: h.length_days,
                name: h.name,
            }));
        }
        Ok(None)
    }

    /// 区间内的节假日日期集合（估计器对假期样本降权）
    pub fn holidays_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<HashMap<NaiveDate, HolidayInfo>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT factor_date, holiday_name, holiday_length
            FROM external_factor
            WHERE factor_type = 'HOLIDAY' AND factor_date >= ?1 AND factor_date <= ?2
            "#,
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok(HolidayInfo {
                date: row.get(0)?,
                name: row.get(1)?,
                length_days: row.get(2)?,
            })
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let h = row?;
            map.insert(h.date, h);
        }
        Ok(map)
    }

    /// 指定日期的气温（摄氏度,无条目返回 None）
    pub fn temperature_on(&self, date: NaiveDate) -> RepositoryResult<Option<f64>> {
        let conn = self.get_conn()?;

        let temp = conn
            .query_row(
                r#"
                SELECT temperature FROM external_factor
                WHERE factor_date = ?1 AND factor_type = 'WEATHER'
                "#,
                params![date],
                |row| row.get::<_, Option<f64>>(0),
            )
            .optional()?;

        Ok(temp.flatten())
    }
}
