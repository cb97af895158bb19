// ==========================================
// 便利店智能补货系统 - 销售领域模型
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART C 数据与状态体系
// 依据: Prediction_Engine_Specs_v1.2.md - 2. 需求估计输入
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailySalesRow - 日历完整窗口中的一天
// ==========================================
// 红线: stock_qty 的 None（当日无采集记录）与 Some(0)（确认断货）
//       语义不同,插补只对后者生效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySalesRow {
    pub sale_date: NaiveDate,
    pub sale_qty: f64,            // 销量（无记录日补 0）
    pub stock_qty: Option<f64>,   // 日末库存; None=当日无记录
    pub has_record: bool,         // 数据库中是否存在当日行
    pub order_qty: f64,           // 当日订货量
    pub received_qty: f64,        // 当日到货量
    pub waste_qty: f64,           // 当日废弃量
}

impl DailySalesRow {
    /// 无记录日的占位行
    pub fn absent(date: NaiveDate) -> Self {
        Self {
            sale_date: date,
            sale_qty: 0.0,
            stock_qty: None,
            has_record: false,
            order_qty: 0.0,
            received_qty: 0.0,
            waste_qty: 0.0,
        }
    }

    /// 是否为确认断货日（有记录且日末库存为 0）
    pub fn is_confirmed_stockout(&self) -> bool {
        self.has_record && matches!(self.stock_qty, Some(s) if s <= 0.0)
    }

    /// 当日是否可认为"有库存可卖"
    ///
    /// 无记录日语义模糊,按"有库存"处理,避免对慢销品过度衰减
    pub fn had_stock_available(&self) -> bool {
        match self.stock_qty {
            Some(s) => s > 0.0 || self.sale_qty > 0.0,
            None => true,
        }
    }
}

// ==========================================
// WeekdayStats - 按星期聚合的销售统计
// ==========================================
// 用途: 食品类 DB 学习星期系数 / 酒类策略内重算星期系数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekdayStats {
    /// 各星期平均销量（index 0=周一 ... 6=周日）
    pub avg_by_weekday: [f64; 7],
    /// 各星期样本天数
    pub days_by_weekday: [i32; 7],
    /// 全窗口平均销量
    pub overall_avg: f64,
}

impl WeekdayStats {
    /// 指定星期的学习系数（样本不足返回 None）
    ///
    /// # 参数
    /// - weekday_index: 0=周一 ... 6=周日
    /// - min_days: 该星期最少样本天数
    pub fn learned_coefficient(&self, weekday_index: usize, min_days: i32) -> Option<f64> {
        if weekday_index >= 7 {
            return None;
        }
        if self.days_by_weekday[weekday_index] < min_days || self.overall_avg <= 0.0 {
            return None;
        }
        Some(self.avg_by_weekday[weekday_index] / self.overall_avg)
    }
}

// ==========================================
// TobaccoEventStats - 香烟事件统计
// ==========================================
// 整条购买（单日大额销量）与完全售罄事件频率,驱动香烟安全库存
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TobaccoEventStats {
    pub window_days: i32,      // 统计窗口天数
    pub carton_days: i32,      // 整条购买日数（单日销量 ≥ 整条阈值）
    pub sellout_days: i32,     // 完全售罄日数（日末库存=0 且有销量）
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_stockout_vs_absent() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let stockout = DailySalesRow {
            sale_date: d,
            sale_qty: 0.0,
            stock_qty: Some(0.0),
            has_record: true,
            order_qty: 0.0,
            received_qty: 0.0,
            waste_qty: 0.0,
        };
        let absent = DailySalesRow::absent(d);

        assert!(stockout.is_confirmed_stockout());
        assert!(!absent.is_confirmed_stockout());
        // 无记录日按"有库存"处理
        assert!(absent.had_stock_available());
        assert!(!stockout.had_stock_available());
    }

    #[test]
    fn test_learned_coefficient_requires_samples() {
        let mut stats = WeekdayStats::default();
        stats.overall_avg = 10.0;
        stats.avg_by_weekday[4] = 15.0;
        stats.days_by_weekday[4] = 2;

        assert!(stats.learned_coefficient(4, 3).is_none());
        stats.days_by_weekday[4] = 3;
        assert_eq!(stats.learned_coefficient(4, 3), Some(1.5));
    }
}
