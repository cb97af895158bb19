// ==========================================
// 便利店智能补货系统 - 需求估计器
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 2. 需求估计
// ==========================================
// 职责: 从日历完整窗口计算平滑日需求点估计
// 步骤: 断货插补 → 离群清洗 → 近期加权平均 → 特征融合 → 间歇性修正
// 红线: 确认断货日（stock=0 且有记录）才插补;
//       无记录日保持 sale=0,视为无需求信号而非供给失败
// ==========================================

use crate::config::engine_config::DemandConfig;
use crate::domain::prediction::QualityFlags;
use crate::domain::sales::DailySalesRow;
use crate::domain::types::CategoryGroup;
use crate::engine::features::{compute_features, SeriesFeatures};
use crate::engine::outlier::{clean_series, method_for_category};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// DemandEstimate - 需求估计输出
// ==========================================
#[derive(Debug, Clone)]
pub struct DemandEstimate {
    pub point: f64,                        // 日需求点估计
    pub data_days: i32,                    // 有记录天数
    pub quality: QualityFlags,
    pub features: Option<SeriesFeatures>,  // 趋势系数复用
}

// ==========================================
// DemandEstimator - 需求估计器
// ==========================================
pub struct DemandEstimator {
    config: DemandConfig,
}

impl DemandEstimator {
    pub fn new(config: DemandConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算日需求点估计
    ///
    /// # 参数
    /// - window: 日历完整窗口（升序,最旧在前）
    /// - group: 品类组（离群清洗方法选择）
    /// - holiday_dates: 窗口内节假日集合（样本降权）
    /// - promo_dates: 窗口内促销日集合（样本降权）
    pub fn estimate(
        &self,
        window: &[DailySalesRow],
        group: CategoryGroup,
        holiday_dates: &HashSet<NaiveDate>,
        promo_dates: &HashSet<NaiveDate>,
    ) -> DemandEstimate {
        let mut quality = QualityFlags::default();

        let data_days = window.iter().filter(|r| r.has_record).count() as i32;
        quality.absent_days = window.len() as i32 - data_days;

        if window.is_empty() || data_days == 0 {
            return DemandEstimate {
                point: 0.0,
                data_days,
                quality,
                features: None,
            };
        }

        // 1. 断货插补: 确认断货日的销量替换为非断货日均值
        let mut series = self.impute_stockouts(window, &mut quality);

        // 2. 离群清洗（品类感知,样本不足不动作）
        if data_days >= self.config.min_points_for_outlier {
            quality.outliers_removed = clean_series(
                &mut series,
                method_for_category(group),
                self.config.min_points_for_outlier as usize,
            );
        }

        // 3. 近期加权平均（节假日/促销日降权）
        let weighted_avg = self.weighted_average(window, &series, holiday_dates, promo_dates);

        // 4. 特征融合（≥7 真实数据天时按特征质量加权 10%~40%）
        let (mut point, features) = self.blend_features(weighted_avg, data_days, &series, &mut quality);

        // 5. 间歇性需求修正
        point = self.apply_intermittency(point, window, &mut quality);

        debug!(
            data_days = data_days,
            point = point,
            imputed = quality.imputed_days,
            outliers = quality.outliers_removed,
            "需求估计完成"
        );

        DemandEstimate {
            point: point.max(0.0),
            data_days,
            quality,
            features,
        }
    }

    // ==========================================
    // 断货插补 (依据 Prediction_Engine_Specs 2.2)
    // ==========================================

    /// 构建插补后的销量序列
    ///
    /// - 确认断货日 → 非断货有记录日的销量均值
    /// - 无记录日 → 保持 0
    fn impute_stockouts(&self, window: &[DailySalesRow], quality: &mut QualityFlags) -> Vec<f64> {
        let normal_days: Vec<f64> = window
            .iter()
            .filter(|r| r.has_record && !r.is_confirmed_stockout())
            .map(|r| r.sale_qty)
            .collect();
        let normal_mean = if normal_days.is_empty() {
            0.0
        } else {
            normal_days.iter().sum::<f64>() / normal_days.len() as f64
        };

        window
            .iter()
            .map(|r| {
                if r.is_confirmed_stockout() {
                    quality.imputed_days += 1;
                    normal_mean
                } else {
                    r.sale_qty
                }
            })
            .collect()
    }

    // ==========================================
    // 近期加权平均 (依据 Prediction_Engine_Specs 2.3)
    // ==========================================

    /// 日龄权重: 1~3 天重权,4~7 天线性衰减,其后基础权重
    fn weight_for_days_ago(&self, days_ago: i64) -> f64 {
        match days_ago {
            1..=3 => self.config.recent_weights[(days_ago - 1) as usize],
            4..=7 => {
                // 4 天处从 fade_start_weight 线性衰减到 7 天处 base_weight
                let t = (days_ago - 4) as f64 / 3.0;
                self.config.fade_start_weight
                    + t * (self.config.base_weight - self.config.fade_start_weight)
            }
            _ => self.config.base_weight,
        }
    }

    fn weighted_average(
        &self,
        window: &[DailySalesRow],
        series: &[f64],
        holiday_dates: &HashSet<NaiveDate>,
        promo_dates: &HashSet<NaiveDate>,
    ) -> f64 {
        let n = window.len();
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for (i, row) in window.iter().enumerate() {
            let days_ago = (n - i) as i64;
            let mut w = self.weight_for_days_ago(days_ago);

            // 假期/促销样本降权,防止峰值抬高稳态估计
            if holiday_dates.contains(&row.sale_date) {
                w *= self.config.holiday_day_weight;
            }
            if promo_dates.contains(&row.sale_date) {
                w *= self.config.promo_day_weight;
            }

            weighted_sum += w * series[i];
            weight_sum += w;
        }

        if weight_sum <= f64::EPSILON {
            0.0
        } else {
            weighted_sum / weight_sum
        }
    }

    // ==========================================
    // 特征融合 (依据 Prediction_Engine_Specs 2.4)
    // ==========================================

    fn blend_features(
        &self,
        weighted_avg: f64,
        data_days: i32,
        series: &[f64],
        quality: &mut QualityFlags,
    ) -> (f64, Option<SeriesFeatures>) {
        if data_days < self.config.feature_min_days {
            return (weighted_avg, None);
        }

        let features = compute_features(series, self.config.ewm_span);
        if !features.is_usable(self.config.feature_min_days) {
            return (weighted_avg, Some(features));
        }

        // 融合权重按数据质量线性插值
        let span =
            (self.config.feature_full_quality_days - self.config.feature_min_days).max(1) as f64;
        let t = ((data_days - self.config.feature_min_days) as f64 / span).clamp(0.0, 1.0);
        let w = self.config.feature_blend_min
            + t * (self.config.feature_blend_max - self.config.feature_blend_min);

        quality.feature_blended = true;
        let blended = (1.0 - w) * weighted_avg + w * features.trend_informed_estimate();
        (blended, Some(features))
    }

    // ==========================================
    // 间歇性修正 (依据 Prediction_Engine_Specs 2.5)
    // ==========================================

    /// 售出日占比 = 有库存且有销量的天数 / 有库存的天数
    fn apply_intermittency(
        &self,
        point: f64,
        window: &[DailySalesRow],
        quality: &mut QualityFlags,
    ) -> f64 {
        let available_days = window.iter().filter(|r| r.had_stock_available()).count();
        if available_days == 0 {
            return point;
        }
        let sale_days = window
            .iter()
            .filter(|r| r.had_stock_available() && r.sale_qty > 0.0)
            .count();
        let ratio = sale_days as f64 / available_days as f64;

        let mut result = point;
        if ratio < self.config.intermittent_low_ratio {
            quality.intermittent = true;
            result = (result * self.config.intermittent_attenuation)
                .max(self.config.intermittent_floor);
        }
        if ratio < self.config.intermittent_very_low_ratio {
            quality.highly_intermittent = true;
            result = (result * 0.5).max(self.config.very_low_floor);
        }
        result
    }
}
