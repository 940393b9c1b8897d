// ==========================================
// 服装生产排产系统 - 爬坡效率解析引擎
// ==========================================
// 职责: 给定爬坡曲线与生产日序号, 解析当日适用效率
// 规则: 取曲线中 day <= day_offset 的最大项;
//       低于曲线范围 -> 取第一项效率 (统一取齐规则);
//       超出曲线范围 -> 取 final_efficiency
// ==========================================

use crate::domain::rampup::RampUpPlan;

// ==========================================
// EfficiencyResolver - 效率解析引擎
// ==========================================
pub struct EfficiencyResolver {
    // 无状态引擎
}

impl EfficiencyResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析第 day_offset 个生产日的效率百分比
    ///
    /// # 参数
    /// - `plan`: 爬坡计划 (构造时已保证非空且按 day 升序)
    /// - `day_offset`: 生产日序号 (1-based, 假日不计入)
    ///
    /// # 返回
    /// 效率百分比 (0, 100]
    pub fn resolve(&self, plan: &RampUpPlan, day_offset: u32) -> f64 {
        debug_assert!(day_offset >= 1, "day_offset 为 1-based 生产日序号");

        // 超出曲线末端: 稳定期效率
        if day_offset > plan.last_curve_day() {
            return plan.final_efficiency;
        }

        // 二分查找 day <= day_offset 的最大项
        match plan
            .efficiencies
            .binary_search_by_key(&day_offset, |p| p.day)
        {
            Ok(idx) => plan.efficiencies[idx].efficiency,
            // 插入点为 0 说明 day_offset 小于曲线首日 (曲线留空), 取第一项
            Err(0) => plan.efficiencies[0].efficiency,
            Err(idx) => plan.efficiencies[idx - 1].efficiency,
        }
    }
}

impl Default for EfficiencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
