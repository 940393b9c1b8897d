// ==========================================
// 服装生产排产系统 - 日产能计算引擎
// ==========================================
// 单位约定: ProductionLine.capacity 为 100% 效率下的日产件数,
//           SMV 仅作输入校验与展示, 不参与件数换算
// 红线: 件数向下取整, 不产出小数件
// ==========================================

use crate::domain::line::ProductionLine;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// CapacityCalculator - 日产能计算引擎
// ==========================================
pub struct CapacityCalculator {
    // 无状态引擎
}

impl CapacityCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算某订单某日在该产线上的可产出件数
    ///
    /// # 参数
    /// - `line`: 产线 (capacity 为 100% 效率基准件数)
    /// - `smv`: 标准工时 (分钟/件), 必须为正
    /// - `efficiency_pct`: 当日效率百分比
    ///
    /// # 返回
    /// 当日可产出件数 (向下取整, 非负)
    ///
    /// # 错误
    /// - smv <= 0 或产线 capacity <= 0 -> InvalidOrderData
    pub fn daily_output(
        &self,
        line: &ProductionLine,
        smv: f64,
        efficiency_pct: f64,
    ) -> EngineResult<i64> {
        if !smv.is_finite() || smv <= 0.0 {
            return Err(EngineError::InvalidOrderData(format!(
                "SMV 必须为正: smv={}",
                smv
            )));
        }
        if line.capacity <= 0 {
            return Err(EngineError::InvalidOrderData(format!(
                "产线日产能必须为正: line_id={}, capacity={}",
                line.line_id, line.capacity
            )));
        }

        let pct = efficiency_pct.max(0.0);
        let output = (line.capacity as f64 * pct / 100.0).floor() as i64;
        Ok(output.max(0))
    }
}

impl Default for CapacityCalculator {
    fn default() -> Self {
        Self::new()
    }
}
