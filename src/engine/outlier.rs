// ==========================================
// 便利店智能补货系统 - 离群值清洗
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 2.3 离群清洗
// 红线: 样本不足 5 点时不清洗;清洗采用钳制（winsorize）,
//       保持日历对齐,不删除样本
// ==========================================

use crate::domain::types::CategoryGroup;
use serde::{Deserialize, Serialize};

// ==========================================
// OutlierMethod - 清洗方法
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutlierMethod {
    Iqr,    // 四分位距围栏
    ZScore, // Z 分数围栏
}

/// 品类感知的方法选择
///
/// 鲜食/日配销量天然尖峰多（节假日/团购）,IQR 围栏过紧,改用 Z 分数;
/// 其余品类用 IQR。
pub fn method_for_category(group: CategoryGroup) -> OutlierMethod {
    if group.is_food_like() {
        OutlierMethod::ZScore
    } else {
        OutlierMethod::Iqr
    }
}

/// 清洗销量序列,返回钳制点数
///
/// # 参数
/// - series: 销量序列（原地钳制）
/// - method: 清洗方法
/// - min_points: 最少样本数,不足时不动作
pub fn clean_series(series: &mut [f64], method: OutlierMethod, min_points: usize) -> i32 {
    if series.len() < min_points {
        return 0;
    }

    match method {
        OutlierMethod::Iqr => clean_iqr(series),
        OutlierMethod::ZScore => clean_zscore(series),
    }
}

/// IQR 围栏钳制（k=1.5）
fn clean_iqr(series: &mut [f64]) -> i32 {
    let mut sorted: Vec<f64> = series.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    if iqr <= 0.0 {
        return 0;
    }

    let lower = (q1 - 1.5 * iqr).max(0.0);
    let upper = q3 + 1.5 * iqr;

    clamp_to_fence(series, lower, upper)
}

/// Z 分数围栏钳制（|z| > 2.5）
fn clean_zscore(series: &mut [f64]) -> i32 {
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let var = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std <= f64::EPSILON {
        return 0;
    }

    let lower = (mean - 2.5 * std).max(0.0);
    let upper = mean + 2.5 * std;

    clamp_to_fence(series, lower, upper)
}

fn clamp_to_fence(series: &mut [f64], lower: f64, upper: f64) -> i32 {
    let mut clamped = 0;
    for v in series.iter_mut() {
        if *v > upper {
            *v = upper;
            clamped += 1;
        } else if *v < lower {
            *v = lower;
            clamped += 1;
        }
    }
    clamped
}

/// 线性插值分位数（sorted 必须升序非空）
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}
