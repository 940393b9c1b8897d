// ==========================================
// 服装生产排产系统 - 爬坡效率曲线
// ==========================================
// 用途: 建模产线换款后日产出从低效爬升到稳定效率的过程
// 约束: 曲线非空, day 从 1 起且为正, 构造时按 day 升序排序
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// EfficiencyPoint - 曲线上的一个点
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub day: u32,        // 生产日序号 (1-based)
    pub efficiency: f64, // 效率百分比 (0, 100]
}

// ==========================================
// RampUpPlan - 爬坡计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampUpPlan {
    pub efficiencies: Vec<EfficiencyPoint>, // 按 day 升序
    pub final_efficiency: f64,              // 稳定期效率, 超出曲线后生效
}

impl RampUpPlan {
    /// 构造爬坡计划
    ///
    /// # 参数
    /// - `points`: 曲线点, 构造时排序, 不要求调用方预排序
    /// - `final_efficiency`: 稳定期效率
    ///
    /// # 错误
    /// - 曲线为空 / day 为 0 / 效率不在 (0, 100] -> InvalidOrderData
    pub fn new(mut points: Vec<EfficiencyPoint>, final_efficiency: f64) -> EngineResult<Self> {
        if points.is_empty() {
            return Err(EngineError::InvalidOrderData(
                "爬坡曲线不能为空 (ramp-up curve is empty)".to_string(),
            ));
        }
        for p in &points {
            if p.day == 0 {
                return Err(EngineError::InvalidOrderData(
                    "爬坡曲线 day 必须从 1 起 (day must be >= 1)".to_string(),
                ));
            }
            if p.efficiency <= 0.0 || p.efficiency > 100.0 {
                return Err(EngineError::InvalidOrderData(format!(
                    "爬坡效率超出 (0, 100]: day={}, efficiency={}",
                    p.day, p.efficiency
                )));
            }
        }
        if final_efficiency <= 0.0 || final_efficiency > 100.0 {
            return Err(EngineError::InvalidOrderData(format!(
                "稳定期效率超出 (0, 100]: {}",
                final_efficiency
            )));
        }

        points.sort_by_key(|p| p.day);
        Ok(Self {
            efficiencies: points,
            final_efficiency,
        })
    }

    /// 恒定效率计划 (无爬坡)
    pub fn constant(efficiency: f64) -> EngineResult<Self> {
        Self::new(vec![EfficiencyPoint { day: 1, efficiency }], efficiency)
    }

    /// 曲线覆盖的最后一个生产日
    pub fn last_curve_day(&self) -> u32 {
        self.efficiencies.last().map(|p| p.day).unwrap_or(0)
    }
}
