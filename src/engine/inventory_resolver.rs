// ==========================================
// 便利店智能补货系统 - 库存解析器
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 1. 库存解析
// ==========================================
// 职责: 在显式缓存 / 实时快照 / 历史库存之间裁决当前库存与入库预定
// 红线: 过期实时库存取与历史值中更小者（保守）;
//       过期入库预定视为已全部到货,强制归零;
//       负值一律钳制为 0,只告警不报错
// ==========================================

use crate::config::engine_config::InventoryConfig;
use crate::domain::inventory::{InventoryState, LiveInventory};
use crate::domain::product::ProductInfo;
use crate::domain::types::{PendingSource, StockSource};
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

// ==========================================
// InventoryResolver - 库存解析器
// ==========================================
pub struct InventoryResolver {
    config: InventoryConfig,
}

impl InventoryResolver {
    pub fn new(config: InventoryConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 解析单品库存状态
    ///
    /// # 参数
    /// - stock_override / pending_override: 批次显式缓存（采集层注入）
    /// - live: 实时库存快照
    /// - history_stock: 最近历史日末库存
    /// - now: 判定快照年龄的基准时刻
    ///
    /// # 裁决顺序（库存）
    /// 1. 显式缓存
    /// 2. 实时快照: TTL 内直接采用;过期则与历史值取更小者并打标
    /// 3. 历史库存
    pub fn resolve(
        &self,
        product: &ProductInfo,
        stock_override: Option<f64>,
        pending_override: Option<f64>,
        live: Option<&LiveInventory>,
        history_stock: Option<f64>,
        now: DateTime<Utc>,
    ) -> InventoryState {
        let ttl_hours = self.config.ttl_hours_for_shelf_life(product.shelf_life_days);
        let live_is_fresh = live
            .map(|l| now - l.queried_at <= Duration::hours(ttl_hours))
            .unwrap_or(false);

        let (stock, stock_source, is_stale) = self.resolve_stock(
            &product.item_code,
            stock_override,
            live,
            live_is_fresh,
            history_stock,
        );

        let (pending, pending_source) =
            self.resolve_pending(&product.item_code, pending_override, live, live_is_fresh);

        InventoryState {
            stock,
            pending,
            stock_source,
            pending_source,
            is_stale,
        }
    }

    // ==========================================
    // 库存裁决
    // ==========================================

    fn resolve_stock(
        &self,
        item_code: &str,
        stock_override: Option<f64>,
        live: Option<&LiveInventory>,
        live_is_fresh: bool,
        history_stock: Option<f64>,
    ) -> (f64, StockSource, bool) {
        // 1. 显式缓存
        if let Some(v) = stock_override {
            return (
                self.clamp_non_negative(item_code, "stock_override", v),
                StockSource::ExplicitCache,
                false,
            );
        }

        // 2. 实时快照
        if let Some(l) = live {
            let live_stock = self.clamp_non_negative(item_code, "live_stock", l.stock_qty);
            if live_is_fresh {
                return (live_stock, StockSource::LiveFresh, false);
            }

            // 过期: 与历史值取更小者（保守）,打标胜出来源
            return match history_stock {
                Some(h) => {
                    let hist = self.clamp_non_negative(item_code, "history_stock", h);
                    if hist <= live_stock {
                        (hist, StockSource::LiveStaleHistory, true)
                    } else {
                        (live_stock, StockSource::LiveStaleLive, true)
                    }
                }
                None => (live_stock, StockSource::LiveStaleLive, true),
            };
        }

        // 3. 历史库存
        match history_stock {
            Some(h) => (
                self.clamp_non_negative(item_code, "history_stock", h),
                StockSource::HistoryOnly,
                false,
            ),
            None => (0.0, StockSource::None, false),
        }
    }

    // ==========================================
    // 入库预定裁决
    // ==========================================
    // 与库存的区别: 过期实时读数不做比较,直接归零

    fn resolve_pending(
        &self,
        item_code: &str,
        pending_override: Option<f64>,
        live: Option<&LiveInventory>,
        live_is_fresh: bool,
    ) -> (f64, PendingSource) {
        if let Some(v) = pending_override {
            return (
                self.clamp_non_negative(item_code, "pending_override", v),
                PendingSource::ExplicitCache,
            );
        }

        if let Some(l) = live {
            if live_is_fresh {
                return (
                    self.clamp_non_negative(item_code, "live_pending", l.pending_qty),
                    PendingSource::LiveFresh,
                );
            }
            return (0.0, PendingSource::LiveStaleZeroed);
        }

        (0.0, PendingSource::None)
    }

    /// 负值钳制 + 告警（防御性异常,不向上传播）
    fn clamp_non_negative(&self, item_code: &str, field: &str, value: f64) -> f64 {
        if value < 0.0 {
            warn!(
                item_code = item_code,
                field = field,
                value = value,
                "检测到负库存值,钳制为 0"
            );
            0.0
        } else {
            value
        }
    }
}
