// ==========================================
// 便利店智能补货系统 - 统计模型融合
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 6. 统计模型融合
// ==========================================
// 职责: 由 EWM 趋势估计 × 星期画像给出独立的订货量估计,
//       供求解器在订货量层面加权融合
// 红线: 显式能力开关;数据天数不足最小值时返回 None,
//       绝不静默退化为规则值
// ==========================================

use crate::config::engine_config::EnsembleConfig;
use crate::domain::sales::WeekdayStats;
use crate::engine::features::SeriesFeatures;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// 星期画像系数学习所需的最少样本天数
const PROFILE_MIN_DAYS: i32 = 2;

pub struct EnsembleBlender {
    config: EnsembleConfig,
}

impl EnsembleBlender {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn blend_weight(&self) -> f64 {
        self.config.blend_weight
    }

    /// 统计订货量估计
    ///
    /// # 参数
    /// - `data_days`: 实际销售记录天数（非日历天数）
    /// - `coverage_days`: 本次订货需覆盖的天数
    ///
    /// # 返回
    /// - 能力关闭或数据不足时 `None`,调用方保持纯规则输出
    pub fn order_estimate(
        &self,
        features: &SeriesFeatures,
        weekday_stats: &WeekdayStats,
        target_date: NaiveDate,
        data_days: i32,
        coverage_days: f64,
    ) -> Option<f64> {
        if !self.config.enabled {
            return None;
        }
        if data_days < self.config.min_data_days {
            debug!(data_days, min = self.config.min_data_days, "数据不足,跳过融合");
            return None;
        }
        if !features.is_usable(self.config.min_data_days) {
            return None;
        }

        // EWM 趋势估计 × 星期画像
        let weekday_index = target_date.weekday().num_days_from_monday() as usize;
        let profile = weekday_stats
            .learned_coefficient(weekday_index, PROFILE_MIN_DAYS)
            .unwrap_or(1.0);
        let daily = features.trend_informed_estimate() * profile;

        Some((daily * coverage_days.max(1.0)).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::features::compute_features;

    fn features_of(series: &[f64]) -> SeriesFeatures {
        compute_features(series, 7.0)
    }

    #[test]
    fn test_disabled_returns_none() {
        let config = EnsembleConfig {
            enabled: false,
            ..EnsembleConfig::default()
        };
        let blender = EnsembleBlender::new(config);
        let series = vec![5.0; 20];
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert!(blender
            .order_estimate(&features_of(&series), &WeekdayStats::default(), date, 20, 2.0)
            .is_none());
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let blender = EnsembleBlender::new(EnsembleConfig::default());
        let series = vec![5.0; 10];
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert!(blender
            .order_estimate(&features_of(&series), &WeekdayStats::default(), date, 10, 2.0)
            .is_none());
    }

    #[test]
    fn test_steady_series_estimates_demand_times_coverage() {
        let blender = EnsembleBlender::new(EnsembleConfig::default());
        let series = vec![5.0; 20];
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let est = blender
            .order_estimate(&features_of(&series), &WeekdayStats::default(), date, 20, 2.0)
            .unwrap();
        // 恒定序列: EWM ≈ 5,无趋势,画像回退 1.0 → 约 10
        assert!((est - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_weekday_profile_scales_estimate() {
        let blender = EnsembleBlender::new(EnsembleConfig::default());
        let series = vec![4.0; 20];
        // 2024-06-07 是周五
        let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();

        let mut stats = WeekdayStats::default();
        stats.overall_avg = 4.0;
        stats.avg_by_weekday[4] = 8.0;
        stats.days_by_weekday[4] = 4;

        let flat = blender
            .order_estimate(&features_of(&series), &WeekdayStats::default(), friday, 20, 1.0)
            .unwrap();
        let peaked = blender
            .order_estimate(&features_of(&series), &stats, friday, 20, 1.0)
            .unwrap();
        assert!((peaked - flat * 2.0).abs() < 1e-6);
    }
}
