// ==========================================
// 便利店智能补货系统 - 库存领域模型
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 1. 库存解析
// 红线: 负库存一律钳制为 0,只告警不报错
// ==========================================

use crate::domain::types::{PendingSource, StockSource};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LiveInventory - 实时库存快照
// ==========================================
// 用途: 采集层写入 live_inventory 表,引擎层只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveInventory {
    pub item_code: String,
    pub stock_qty: f64,               // 实时库存
    pub pending_qty: f64,             // 入库预定量
    pub queried_at: DateTime<Utc>,    // 快照采集时间
    pub is_available: bool,           // 可售标志
    pub is_cut_item: bool,            // 切品/停售标志
}

// ==========================================
// InventoryState - 解析后的库存状态
// ==========================================
// 来源标签与陈旧标志保留到 PredictionResult,用于审计与差异诊断
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryState {
    pub stock: f64,                   // 当前库存（≥0）
    pub pending: f64,                 // 入库预定量（≥0）
    pub stock_source: StockSource,
    pub pending_source: PendingSource,
    pub is_stale: bool,               // 实时快照是否已过期
}

impl InventoryState {
    /// 无任何来源时的空状态
    pub fn empty() -> Self {
        Self {
            stock: 0.0,
            pending: 0.0,
            stock_source: StockSource::None,
            pending_source: PendingSource::None,
            is_stale: false,
        }
    }

    /// 有效在手量（库存 + 入库预定）
    pub fn effective_on_hand(&self) -> f64 {
        self.stock + self.pending
    }
}

// ==========================================
// PromotionPeriod - 促销期间
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionPeriod {
    pub item_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub promo_type: String, // 促销类型代码（1+1 / 2+1 / 折扣等）
}

impl PromotionPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
