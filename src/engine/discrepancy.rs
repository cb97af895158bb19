// ==========================================
// 便利店智能补货系统 - 库存差异诊断
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 8. 库存差异诊断
// ==========================================
// 职责: 离线比对决策时库存读数与执行时库存读数,
//       按固定顺序归类差异原因并定级
// 红线: 判定顺序固定: 幽灵库存 → 陈旧回退 → 预定不符
//       → 过订 → 欠订 → 无差异,命中即停;纯函数,不触库
// ==========================================

use crate::config::engine_config::DiscrepancyConfig;
use crate::domain::types::{DiscrepancySeverity, DiscrepancyType};
use crate::repository::prediction_log_repo::ReadingPair;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DiscrepancyFinding - 诊断结论
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscrepancyFinding {
    pub item_code: String,
    pub target_date: NaiveDate,
    pub discrepancy_type: DiscrepancyType,
    pub severity: DiscrepancySeverity,
    /// 执行读数 - 决策读数
    pub stock_delta: f64,
    pub pending_delta: f64,
}

// ==========================================
// StockDiscrepancyDiagnoser - 诊断器
// ==========================================
pub struct StockDiscrepancyDiagnoser {
    config: DiscrepancyConfig,
}

impl StockDiscrepancyDiagnoser {
    pub fn new(config: DiscrepancyConfig) -> Self {
        Self { config }
    }

    /// 单条读数对诊断
    pub fn diagnose(&self, pair: &ReadingPair) -> DiscrepancyFinding {
        let cfg = &self.config;
        let stock_delta = pair.exec_stock - pair.pred_stock;
        let pending_delta = pair.exec_pending - pair.pred_pending;

        let discrepancy_type = if pair.pred_stock >= cfg.ghost_min_stock && pair.exec_stock <= 0.0 {
            // 决策时相信有货,执行时货架为空
            DiscrepancyType::GhostStock
        } else if pair.is_stale && stock_delta.abs() >= cfg.stale_min_delta {
            DiscrepancyType::StaleFallback
        } else if pending_delta.abs() >= cfg.pending_mismatch_threshold {
            DiscrepancyType::PendingMismatch
        } else if stock_delta >= cfg.over_order_threshold {
            DiscrepancyType::OverOrder
        } else if -stock_delta >= cfg.under_order_threshold {
            DiscrepancyType::UnderOrder
        } else {
            DiscrepancyType::None
        };

        let magnitude = stock_delta.abs().max(pending_delta.abs());
        let severity = if magnitude >= cfg.severity_high {
            DiscrepancySeverity::High
        } else if magnitude >= cfg.severity_medium {
            DiscrepancySeverity::Medium
        } else {
            DiscrepancySeverity::Low
        };

        DiscrepancyFinding {
            item_code: pair.item_code.clone(),
            target_date: pair.target_date,
            discrepancy_type,
            severity,
            stock_delta,
            pending_delta,
        }
    }

    /// 批量诊断,仅保留有差异的结论
    pub fn diagnose_all(&self, pairs: &[ReadingPair]) -> Vec<DiscrepancyFinding> {
        pairs
            .iter()
            .map(|p| self.diagnose(p))
            .filter(|f| f.discrepancy_type != DiscrepancyType::None)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockSource;

    fn pair(pred_stock: f64, exec_stock: f64, pred_pending: f64, exec_pending: f64) -> ReadingPair {
        ReadingPair {
            item_code: "ITEM1".to_string(),
            target_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            pred_stock,
            pred_pending,
            exec_stock,
            exec_pending,
            stock_source: StockSource::LiveFresh,
            is_stale: false,
        }
    }

    fn diagnoser() -> StockDiscrepancyDiagnoser {
        StockDiscrepancyDiagnoser::new(DiscrepancyConfig::default())
    }

    #[test]
    fn test_ghost_stock_detected_first() {
        // 决策时库存 12,执行时 0 → 幽灵库存,即便同时满足欠订条件
        let finding = diagnoser().diagnose(&pair(12.0, 0.0, 0.0, 0.0));
        assert_eq!(finding.discrepancy_type, DiscrepancyType::GhostStock);
        assert_eq!(finding.severity, DiscrepancySeverity::High);
    }

    #[test]
    fn test_stale_fallback_requires_stale_flag() {
        let mut p = pair(5.0, 2.0, 0.0, 0.0);
        p.is_stale = true;
        let finding = diagnoser().diagnose(&p);
        assert_eq!(finding.discrepancy_type, DiscrepancyType::StaleFallback);

        // 同样差值但读数新鲜 → 不按陈旧回退归类
        let fresh = diagnoser().diagnose(&pair(5.0, 2.0, 0.0, 0.0));
        assert_ne!(fresh.discrepancy_type, DiscrepancyType::StaleFallback);
    }

    #[test]
    fn test_pending_mismatch() {
        let finding = diagnoser().diagnose(&pair(5.0, 5.0, 6.0, 1.0));
        assert_eq!(finding.discrepancy_type, DiscrepancyType::PendingMismatch);
        assert_eq!(finding.pending_delta, -5.0);
        assert_eq!(finding.severity, DiscrepancySeverity::Medium);
    }

    #[test]
    fn test_over_and_under_order() {
        let over = diagnoser().diagnose(&pair(2.0, 9.0, 0.0, 0.0));
        assert_eq!(over.discrepancy_type, DiscrepancyType::OverOrder);

        let under = diagnoser().diagnose(&pair(1.0, -5.0, 0.0, 0.0));
        assert_eq!(under.discrepancy_type, DiscrepancyType::UnderOrder);
    }

    #[test]
    fn test_small_delta_is_none_and_filtered() {
        let findings = diagnoser().diagnose_all(&[
            pair(5.0, 4.0, 0.0, 0.0),  // 差 1,无差异
            pair(2.0, 9.0, 0.0, 0.0),  // 过订
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].discrepancy_type, DiscrepancyType::OverOrder);
    }
}
