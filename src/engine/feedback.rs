// ==========================================
// 便利店智能补货系统 - 差异反馈调整
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 7. 差异反馈
// ==========================================
// 职责: 比对近期订货量与实际销量,给出订货乘数:
//       持续过订 → 惩罚下调,持续欠订 → 适度上调,
//       高废弃率 → 追加收缩
// 红线: 显式能力开关;记录数不足最小值时乘数恒为 1.0
// ==========================================

use crate::config::engine_config::FeedbackConfig;
use crate::repository::inventory_repo::WasteStats;
use crate::repository::prediction_log_repo::OrderDiffRecord;
use tracing::debug;

pub struct FeedbackAdjuster {
    config: FeedbackConfig,
}

impl FeedbackAdjuster {
    pub fn new(config: FeedbackConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn diff_window_days(&self) -> i32 {
        self.config.diff_window_days
    }

    /// 订货乘数
    ///
    /// # 说明
    /// - 过订比 = (Σ订货 - Σ实销) / Σ订货,线性映射到惩罚上限
    /// - 欠订比 = (Σ实销 - Σ订货) / Σ实销,线性映射到加成上限
    /// - 废弃率超阈值时追加收缩（与过订惩罚叠乘）
    pub fn multiplier(&self, diffs: &[OrderDiffRecord], waste: Option<&WasteStats>) -> f64 {
        if !self.config.enabled {
            return 1.0;
        }

        let mut multiplier = 1.0;

        if diffs.len() >= self.config.min_records as usize {
            let total_order: f64 = diffs.iter().map(|d| d.order_qty).sum();
            let total_sale: f64 = diffs.iter().map(|d| d.actual_sale_qty).sum();

            if total_order > total_sale && total_order > 0.0 {
                let over_ratio = (total_order - total_sale) / total_order;
                multiplier *= 1.0 - over_ratio.min(1.0) * self.config.over_order_penalty_max;
                debug!(over_ratio, multiplier, "过订惩罚");
            } else if total_sale > total_order && total_sale > 0.0 {
                let under_ratio = (total_sale - total_order) / total_sale;
                multiplier *= 1.0 + under_ratio.min(1.0) * self.config.under_order_boost_max;
                debug!(under_ratio, multiplier, "欠订加成");
            }
        }

        if let Some(ws) = waste {
            let waste_rate = ws.waste_rate();
            if waste_rate > self.config.waste_rate_threshold {
                let shrink = waste_rate.min(self.config.waste_shrink_max);
                multiplier *= 1.0 - shrink;
                debug!(waste_rate, shrink, "废弃收缩");
            }
        }

        multiplier
    }
}
