// ==========================================
// 便利店智能补货系统 - 滚动/滞后/趋势特征
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 2.4 特征融合
// 职责: 从清洗后的销量序列计算指数加权均值、滚动均值、
//       滞后值与趋势斜率,供估计器融合与趋势系数使用
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SeriesFeatures - 序列特征集
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesFeatures {
    pub ewm_mean: f64,       // 指数加权均值（近期重）
    pub rolling_mean_7: f64, // 近 7 天滚动均值
    pub lag_1: f64,          // 昨日销量
    pub lag_7: f64,          // 上周同日销量
    pub trend_slope: f64,    // 线性趋势斜率（每日增量,按均值归一）
    pub data_points: i32,    // 参与计算的点数
}

impl SeriesFeatures {
    /// 特征是否足以参与融合
    pub fn is_usable(&self, min_points: i32) -> bool {
        self.data_points >= min_points && self.ewm_mean.is_finite()
    }

    /// 趋势感知的特征预测值
    ///
    /// ewm 均值叠加半个趋势步长,避免斜率噪声被全额放大
    pub fn trend_informed_estimate(&self) -> f64 {
        let raw = self.ewm_mean * (1.0 + 0.5 * self.trend_slope);
        raw.max(0.0)
    }
}

/// 从销量序列（升序,最旧在前）计算特征
///
/// # 参数
/// - series: 清洗后的销量序列
/// - ewm_span: 指数加权跨度（alpha = 2/(span+1)）
pub fn compute_features(series: &[f64], ewm_span: f64) -> SeriesFeatures {
    let n = series.len();
    if n == 0 {
        return SeriesFeatures::default();
    }

    let alpha = 2.0 / (ewm_span.max(1.0) + 1.0);

    // 指数加权均值
    let mut ewm = series[0];
    for &v in &series[1..] {
        ewm = alpha * v + (1.0 - alpha) * ewm;
    }

    // 近 7 天滚动均值
    let tail = &series[n.saturating_sub(7)..];
    let rolling_mean_7 = tail.iter().sum::<f64>() / tail.len() as f64;

    let lag_1 = series[n - 1];
    let lag_7 = if n >= 7 { series[n - 7] } else { 0.0 };

    SeriesFeatures {
        ewm_mean: ewm,
        rolling_mean_7,
        lag_1,
        lag_7,
        trend_slope: normalized_slope(series),
        data_points: n as i32,
    }
}

/// 最小二乘斜率,按序列均值归一（均值为 0 时返回 0）
///
/// 返回值语义: 每天相对于平均水平的增减比例
fn normalized_slope(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 3 {
        return 0.0;
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / nf;
    if mean_y <= f64::EPSILON {
        return 0.0;
    }

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    if den <= f64::EPSILON {
        return 0.0;
    }

    (num / den) / mean_y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        let f = compute_features(&[], 7.0);
        assert_eq!(f.data_points, 0);
        assert!(!f.is_usable(1));
    }

    #[test]
    fn test_constant_series_zero_slope() {
        let f = compute_features(&[4.0; 14], 7.0);
        assert!((f.ewm_mean - 4.0).abs() < 1e-9);
        assert!((f.rolling_mean_7 - 4.0).abs() < 1e-9);
        assert!(f.trend_slope.abs() < 1e-9);
        assert_eq!(f.lag_1, 4.0);
        assert_eq!(f.lag_7, 4.0);
    }

    #[test]
    fn test_rising_series_positive_slope() {
        let series: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let f = compute_features(&series, 7.0);
        assert!(f.trend_slope > 0.0);
        // 上升序列的 EWM 偏向近期,高于整体均值
        assert!(f.ewm_mean > 5.5);
        assert!(f.trend_informed_estimate() > f.ewm_mean);
    }

    #[test]
    fn test_trend_estimate_never_negative() {
        let series = vec![10.0, 8.0, 6.0, 4.0, 2.0, 1.0, 0.5, 0.2];
        let f = compute_features(&series, 7.0);
        assert!(f.trend_slope < 0.0);
        assert!(f.trend_informed_estimate() >= 0.0);
    }
}
