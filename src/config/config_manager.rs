// ==========================================
// 便利店智能补货系统 - 配置管理器
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 11. 配置项全集
// ==========================================
// 职责: 在代码内默认值之上套用 config_kv 表覆写,产出冻结的 EngineConfig
// 红线: 引擎运行期不回读 config_kv,配置随批次构造一次
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// config_kv 中整份配置覆写的键
pub const FULL_CONFIG_KEY: &str = "engine_config/json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致,会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 加载引擎配置: 默认值 → 整份 JSON 覆写 → 标量键覆写
    ///
    /// # 说明
    /// - config_kv 表不存在时直接返回默认配置（新库可零配置启动）
    /// - 无法解析的覆写值告警后忽略,不中断批次
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let mut config = EngineConfig::default();

        if !self.has_config_table()? {
            return Ok(config);
        }

        // 1. 整份 JSON 覆写
        if let Some(raw) = self.get_config_value(FULL_CONFIG_KEY)? {
            match serde_json::from_str::<EngineConfig>(&raw) {
                Ok(full) => config = full,
                Err(e) => warn!("engine_config/json 解析失败,忽略整份覆写: {}", e),
            }
        }

        // 2. 标量键覆写（高频调参键）
        self.apply_scalar_override(&mut config.demand.window_days, "demand/window_days")?;
        self.apply_scalar_override(
            &mut config.coefficient.compound_floor_ratio,
            "coefficient/compound_floor_ratio",
        )?;
        self.apply_scalar_override(
            &mut config.category.tobacco_max_stock,
            "category/tobacco_max_stock",
        )?;
        self.apply_scalar_override(
            &mut config.solver.overstock_days_supply,
            "solver/overstock_days_supply",
        )?;
        self.apply_scalar_override(&mut config.ensemble.blend_weight, "ensemble/blend_weight")?;
        self.apply_bool_override(&mut config.ensemble.enabled, "ensemble/enabled")?;
        self.apply_bool_override(&mut config.feedback.enabled, "feedback/enabled")?;

        if let Some(v) = self.get_config_value("config_version")? {
            config.config_version = v;
        }

        Ok(config)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随预测批次留存,保证决策可复现
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        if !self.has_config_table()? {
            return Ok("{}".to_string());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (k, v) = row?;
            config_map.insert(k, v);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn has_config_table(&self) -> Result<bool, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='config_kv' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .unwrap_or(false);
        Ok(exists)
    }

    fn apply_scalar_override<T: std::str::FromStr>(
        &self,
        target: &mut T,
        key: &str,
    ) -> Result<(), Box<dyn Error>> {
        if let Some(raw) = self.get_config_value(key)? {
            match raw.parse::<T>() {
                Ok(v) => *target = v,
                Err(_) => warn!("配置键 {} 的值 '{}' 无法解析,保留默认", key, raw),
            }
        }
        Ok(())
    }

    fn apply_bool_override(&self, target: &mut bool, key: &str) -> Result<(), Box<dyn Error>> {
        if let Some(raw) = self.get_config_value(key)? {
            match raw.trim() {
                "1" | "true" | "TRUE" => *target = true,
                "0" | "false" | "FALSE" => *target = false,
                other => warn!("配置键 {} 的值 '{}' 无法解析为布尔,保留默认", key, other),
            }
        }
        Ok(())
    }
}
