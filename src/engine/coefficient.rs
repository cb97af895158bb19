// ==========================================
// 便利店智能补货系统 - 系数管线
// ==========================================
// 依据: Prediction_Engine_Specs_v1.2.md - 3. 系数管线
// ==========================================
// 职责: 按固定顺序对需求点估计施加乘数
// 顺序: 节假日 → 绝对气温 → 气温差 → 食品温度交叉
//       → 星期 → 季节 → 关联提升 → 趋势 → 复合下限钳制
// 红线: 顺序不可调换;复合结果低于系数前 15% 时钳制到下限,
//       防止多个小折扣级联把需求压成 0
// ==========================================

use crate::config::engine_config::CoefficientConfig;
use crate::domain::prediction::CoefficientTrace;
use crate::domain::types::CategoryGroup;
use crate::repository::external_factor_repo::{HolidayContext, HolidayPosition};

// ==========================================
// CoefficientInputs - 单次应用的外部输入
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CoefficientInputs {
    pub holiday: Option<HolidayContext>,
    pub temperature: Option<f64>,       // 目标日气温
    pub prev_temperature: Option<f64>,  // 前一日气温
    pub weekday_index: usize,           // 0=周一 ... 6=周日
    pub learned_weekday: Option<f64>,   // DB 学习星期系数（食品类）
    pub month: u32,                     // 1~12
    pub association_score: Option<f64>, // 共购关联分数
    pub trend_slope: Option<f64>,       // 滚动特征趋势斜率
}

// ==========================================
// CoefficientPipeline - 系数管线
// ==========================================
pub struct CoefficientPipeline {
    config: CoefficientConfig,
}

impl CoefficientPipeline {
    pub fn new(config: CoefficientConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对点估计按固定顺序施加全部乘数
    ///
    /// # 返回
    /// (调整后需求, 系数轨迹)
    pub fn apply(
        &self,
        base: f64,
        group: CategoryGroup,
        inputs: &CoefficientInputs,
    ) -> (f64, CoefficientTrace) {
        let mut trace = CoefficientTrace::default();

        // 1. 节假日上下文
        trace.holiday = self.holiday_coef(group, inputs.holiday.as_ref());

        // 2. 绝对气温
        trace.temperature_abs = self.temperature_abs_coef(group, inputs.temperature);

        // 3. 气温差（日间变化）
        trace.temperature_delta =
            self.temperature_delta_coef(group, inputs.temperature, inputs.prev_temperature);

        // 4. 食品温度交叉（仅食品类）
        trace.food_temperature_cross = self.food_cross_coef(group, inputs.temperature);

        // 5. 星期系数（食品类优先 DB 学习值）
        let (weekday, learned) = self.weekday_coef(group, inputs);
        trace.weekday = weekday;
        trace.weekday_learned = learned;

        // 6. 季节（月度）
        trace.season = self.config.season_coef(group, inputs.month);

        // 7. 关联提升（只增不减）
        trace.association = inputs
            .association_score
            .map(|s| s.clamp(1.0, self.config.association_cap))
            .unwrap_or(1.0);

        // 8. 趋势方向
        trace.trend = self.trend_coef(inputs.trend_slope);

        let mut adjusted = base
            * trace.holiday
            * trace.temperature_abs
            * trace.temperature_delta
            * trace.food_temperature_cross
            * trace.weekday
            * trace.season
            * trace.association
            * trace.trend;

        // 9. 复合下限钳制
        let floor = base * self.config.compound_floor_ratio;
        if base > 0.0 && adjusted < floor {
            adjusted = floor;
            trace.floor_clamped = true;
        }

        (adjusted, trace)
    }

    // ==========================================
    // 节假日系数 (依据 Prediction_Engine_Specs 3.1)
    // ==========================================

    /// 假期长度 × 位置 × 品类敏感度
    fn holiday_coef(&self, group: CategoryGroup, ctx: Option<&HolidayContext>) -> f64 {
        let Some(ctx) = ctx else {
            return 1.0;
        };

        let length_idx = (ctx.length_days.clamp(1, 3) - 1) as usize;
        let length_coef = self.config.holiday_length_coefs[length_idx];
        let position_coef = match ctx.position {
            HolidayPosition::Before => self.config.holiday_position_before,
            HolidayPosition::During => self.config.holiday_position_during,
            HolidayPosition::After => self.config.holiday_position_after,
        };

        let combined = length_coef * position_coef;
        let sensitivity = self.config.holiday_sensitivity_of(group);
        1.0 + (combined - 1.0) * sensitivity
    }

    // ==========================================
    // 气温系数 (依据 Prediction_Engine_Specs 3.2)
    // ==========================================

    fn is_hot_sensitive(group: CategoryGroup) -> bool {
        matches!(
            group,
            CategoryGroup::Beverage
                | CategoryGroup::Frozen
                | CategoryGroup::Dessert
                | CategoryGroup::Beer
        )
    }

    fn is_cold_sensitive(group: CategoryGroup) -> bool {
        matches!(group, CategoryGroup::Ramen | CategoryGroup::InstantMeal)
    }

    fn temperature_abs_coef(&self, group: CategoryGroup, temp: Option<f64>) -> f64 {
        let Some(t) = temp else {
            return 1.0;
        };

        if Self::is_hot_sensitive(group) {
            if t >= self.config.temp_extreme_hot_threshold {
                return self.config.temp_extreme_hot_coef;
            }
            if t >= self.config.temp_hot_threshold {
                return self.config.temp_hot_coef;
            }
        }
        if Self::is_cold_sensitive(group) && t <= self.config.temp_cold_threshold {
            return self.config.temp_cold_coef;
        }
        1.0
    }

    /// 日间温差: 与品类敏感方向一致时加成
    fn temperature_delta_coef(
        &self,
        group: CategoryGroup,
        temp: Option<f64>,
        prev_temp: Option<f64>,
    ) -> f64 {
        let (Some(t), Some(p)) = (temp, prev_temp) else {
            return 1.0;
        };
        let delta = t - p;
        if delta.abs() < self.config.temp_delta_threshold {
            return 1.0;
        }

        let warming = delta > 0.0;
        if (warming && Self::is_hot_sensitive(group))
            || (!warming && Self::is_cold_sensitive(group))
        {
            self.config.temp_delta_coef
        } else {
            1.0
        }
    }

    /// 食品温度交叉: 高温日鲜食折减（高温抑制鲜食购买意愿）
    fn food_cross_coef(&self, group: CategoryGroup, temp: Option<f64>) -> f64 {
        let Some(t) = temp else {
            return 1.0;
        };
        if group.is_food_like() && t >= self.config.food_cross_hot_threshold {
            self.config.food_cross_hot_coef
        } else {
            1.0
        }
    }

    // ==========================================
    // 星期系数 (依据 Prediction_Engine_Specs 3.3)
    // ==========================================

    /// 食品类优先使用 DB 学习值（钳制到配置范围）,其余用默认表
    fn weekday_coef(&self, group: CategoryGroup, inputs: &CoefficientInputs) -> (f64, bool) {
        if group.is_food_like() {
            if let Some(learned) = inputs.learned_weekday {
                let clamped = learned.clamp(
                    self.config.weekday_learned_min,
                    self.config.weekday_learned_max,
                );
                return (clamped, true);
            }
        }
        (
            self.config.weekday_default(group, inputs.weekday_index),
            false,
        )
    }

    // ==========================================
    // 趋势系数 (依据 Prediction_Engine_Specs 3.5)
    // ==========================================

    fn trend_coef(&self, slope: Option<f64>) -> f64 {
        let Some(s) = slope else {
            return 1.0;
        };
        if s >= self.config.trend_slope_threshold {
            self.config.trend_up_coef
        } else if s <= -self.config.trend_slope_threshold {
            self.config.trend_down_coef
        } else {
            1.0
        }
    }
}
