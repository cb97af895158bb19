// ==========================================
// 便利店智能补货系统 - 商品领域模型
// ==========================================
// 依据: AutoOrder_Master_Spec.md - PART C 数据与状态体系
// 依据: Field_Mapping_Spec_v1.2.md - product 表字段映射
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductInfo - 商品主数据
// ==========================================
// 用途: 采集层写入,引擎层只读
// 红线: 预测过程中不可变,每次 predict 调用前新鲜加载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    // ===== 主键 =====
    pub item_code: String, // 单品唯一标识（商品条码/内码）

    // ===== 基础信息 =====
    pub item_name: String,      // 商品名称
    pub category_code: i64,     // 中分类代码（品类策略路由依据）

    // ===== 订货约束 =====
    pub shelf_life_days: i32,   // 保质期（天）
    pub order_unit: i32,        // 订货倍数（最小订货单位的入数）
    pub lead_time_days: i32,    // 到货提前期（天）
    pub orderable_weekdays: u8, // 可订货星期掩码（bit0=周一 ... bit6=周日）

    // ===== 价格信息 =====
    pub sell_price: f64,        // 售价
    pub margin_rate: f64,       // 毛利率（0.0~1.0）
}

impl ProductInfo {
    /// 指定日期是否可订货
    pub fn is_orderable_on(&self, date: NaiveDate) -> bool {
        let bit = match date.weekday() {
            Weekday::Mon => 0,
            Weekday::Tue => 1,
            Weekday::Wed => 2,
            Weekday::Thu => 3,
            Weekday::Fri => 4,
            Weekday::Sat => 5,
            Weekday::Sun => 6,
        };
        (self.orderable_weekdays >> bit) & 1 == 1
    }

    /// 自 target_date 起,到下一个可订货日的天数（含当日则为 0）
    ///
    /// # 说明
    /// - 掩码全 0 视为每日可订（防御:采集缺失时不应让单品永久断货）
    /// - 最多前探 7 天,必有命中
    pub fn days_until_next_orderable(&self, target_date: NaiveDate) -> i32 {
        if self.orderable_weekdays == 0 {
            return 1;
        }
        for offset in 1..=7 {
            let d = target_date + chrono::Duration::days(offset);
            if self.is_orderable_on(d) {
                return offset as i32;
            }
        }
        7
    }

    /// 订货倍数,防御 0/负值
    pub fn safe_order_unit(&self) -> i32 {
        if self.order_unit <= 0 {
            1
        } else {
            self.order_unit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_mask(mask: u8) -> ProductInfo {
        ProductInfo {
            item_code: "8801234567890".to_string(),
            item_name: "测试商品".to_string(),
            category_code: 160,
            shelf_life_days: 30,
            order_unit: 6,
            lead_time_days: 1,
            orderable_weekdays: mask,
            sell_price: 1500.0,
            margin_rate: 0.3,
        }
    }

    #[test]
    fn test_orderable_weekday_mask() {
        // 仅周一/周四可订货
        let p = product_with_mask(0b0000_1001);
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(p.is_orderable_on(monday));
        assert!(!p.is_orderable_on(tuesday));
        // 周一的下一个可订货日是周四（3天后）
        assert_eq!(p.days_until_next_orderable(monday), 3);
    }

    #[test]
    fn test_zero_mask_defaults_to_daily() {
        let p = product_with_mask(0);
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(p.days_until_next_orderable(monday), 1);
    }

    #[test]
    fn test_safe_order_unit() {
        let mut p = product_with_mask(0b0111_1111);
        p.order_unit = 0;
        assert_eq!(p.safe_order_unit(), 1);
    }
}
