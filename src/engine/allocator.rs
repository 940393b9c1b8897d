// ==========================================
// 服装生产排产系统 - 日产能分配引擎
// ==========================================
// 职责: 沿产线日历逐日推进, 把订单剩余件数填入每日剩余产能
// 红线: 单日 (产线, 日期) 的合计件数不得超过 100% 效率日产能;
//       要么产出完整分配序列, 要么返回错误, 不留半截结果
// 规则:
// - 假日消耗日历日, 不消耗生产日序号
// - 当日无剩余产能 (单元格已满) 同样不消耗生产日序号
// - 先落位的订单先占产能, 新订单只吃余量
// ==========================================

use crate::domain::allocation::AllocationRecord;
use crate::domain::calendar::HolidayCalendar;
use crate::domain::line::ProductionLine;
use crate::domain::order::Order;
use crate::domain::rampup::RampUpPlan;
use crate::engine::capacity::CapacityCalculator;
use crate::engine::efficiency::EfficiencyResolver;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// 默认时间视野 (日历日): 防止零产能产线导致死循环
pub const DEFAULT_MAX_HORIZON_DAYS: u32 = 3650;

// ==========================================
// AllocatorConfig - 分配引擎配置
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    pub max_horizon_days: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_horizon_days: DEFAULT_MAX_HORIZON_DAYS,
        }
    }
}

// ==========================================
// AllocationEngine - 分配引擎
// ==========================================
pub struct AllocationEngine {
    resolver: EfficiencyResolver,
    calculator: CapacityCalculator,
    config: AllocatorConfig,
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self::with_config(AllocatorConfig::default())
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        Self {
            resolver: EfficiencyResolver::new(),
            calculator: CapacityCalculator::new(),
            config,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 从 start_date 起为订单逐日分配, 直到剩余件数归零
    ///
    /// # 参数
    /// - `line`: 目标产线
    /// - `order`: 待分配订单 (整单数量重新分配)
    /// - `plan`: 爬坡计划
    /// - `start_date`: 起始日历日
    /// - `existing`: 当前全部分配记录 (本订单自身的记录会被忽略)
    /// - `holidays`: 假日日历
    ///
    /// # 返回
    /// 完整的按日分配记录序列 (升序)
    ///
    /// # 错误
    /// - 订单件数非正 -> InvalidOrderData
    /// - 超出 max_horizon_days 仍未分配完 -> SchedulingHorizonExceeded
    #[instrument(skip(self, line, order, plan, existing, holidays), fields(
        line_id = %line.line_id,
        order_id = %order.order_id,
        order_quantity = order.order_quantity,
    ))]
    pub fn allocate(
        &self,
        line: &ProductionLine,
        order: &Order,
        plan: &RampUpPlan,
        start_date: NaiveDate,
        existing: &[AllocationRecord],
        holidays: &HolidayCalendar,
    ) -> EngineResult<Vec<AllocationRecord>> {
        if order.order_quantity <= 0 {
            return Err(EngineError::InvalidOrderData(format!(
                "订单件数必须为正: order_id={}, order_quantity={}",
                order.order_id, order.order_quantity
            )));
        }

        // 该产线每日已占用件数 (先落位订单优先, 本订单自身记录不计)
        let mut consumed: HashMap<NaiveDate, i64> = HashMap::new();
        for r in existing {
            if r.line_id == line.line_id && r.order_id != order.order_id {
                *consumed.entry(r.date).or_insert(0) += r.quantity;
            }
        }

        let mut records = Vec::new();
        let mut remaining = order.order_quantity;
        let mut date = start_date;
        let mut production_day: u32 = 0;

        for _calendar_day in 0..self.config.max_horizon_days {
            if remaining == 0 {
                break;
            }

            // 假日: 消耗日历日, 不消耗生产日序号
            if holidays.is_holiday(date) {
                date = next_day(date)?;
                continue;
            }

            // 以下一个生产日序号解析效率; 当日未产出则序号不前进
            let efficiency = self.resolver.resolve(plan, production_day + 1);
            let output = self.calculator.daily_output(line, order.smv, efficiency)?;
            let used = consumed.get(&date).copied().unwrap_or(0);
            let available = (output - used).max(0);

            if available > 0 {
                let quantity = remaining.min(available);
                records.push(AllocationRecord::new(
                    &order.order_id,
                    &line.line_id,
                    date,
                    quantity,
                ));
                remaining -= quantity;
                production_day += 1;

                debug!(
                    date = %date,
                    production_day,
                    efficiency,
                    quantity,
                    remaining,
                    "单日分配完成"
                );
            }

            date = next_day(date)?;
        }

        if remaining > 0 {
            return Err(EngineError::SchedulingHorizonExceeded {
                line_id: line.line_id.clone(),
                horizon_days: self.config.max_horizon_days,
                remaining,
            });
        }

        Ok(records)
    }

    /// 订单在某产线上的最后排产日 (用于 "接排" 落位)
    pub fn last_scheduled_date(
        records: &[AllocationRecord],
        order_id: &str,
        line_id: &str,
    ) -> Option<NaiveDate> {
        records
            .iter()
            .filter(|r| r.order_id == order_id && r.line_id == line_id)
            .map(|r| r.date)
            .max()
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 日历日 +1 (溢出视为超出视野, 实际不可达)
fn next_day(date: NaiveDate) -> EngineResult<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| EngineError::InvalidOrderData(format!("日期溢出: {}", date)))
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rampup::EfficiencyPoint;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn line100() -> ProductionLine {
        ProductionLine::new("L1", "1号线", 100, 1)
    }

    fn order(quantity: i64) -> Order {
        Order::new_pending("PO100", quantity, 12.0)
    }

    fn ramp_plan() -> RampUpPlan {
        RampUpPlan::new(
            vec![
                EfficiencyPoint { day: 1, efficiency: 50.0 },
                EfficiencyPoint { day: 2, efficiency: 70.0 },
                EfficiencyPoint { day: 3, efficiency: 85.0 },
            ],
            90.0,
        )
        .unwrap()
    }

    fn quantities(records: &[AllocationRecord]) -> Vec<(NaiveDate, i64)> {
        records.iter().map(|r| (r.date, r.quantity)).collect()
    }

    #[test]
    fn test_simple_allocation_no_ramp() {
        // 产能 100/天, 恒定 100%, 订单 250 -> 100/100/50
        let engine = AllocationEngine::new();
        let plan = RampUpPlan::constant(100.0).unwrap();

        let records = engine
            .allocate(&line100(), &order(250), &plan, d(2), &[], &HolidayCalendar::new())
            .unwrap();

        assert_eq!(
            quantities(&records),
            vec![(d(2), 100), (d(3), 100), (d(4), 50)]
        );
    }

    #[test]
    fn test_ramp_up_allocation() {
        // 爬坡 {1:50%, 2:70%, 3:85%, final 90%}, 订单 250 -> 50/70/85/45
        let engine = AllocationEngine::new();

        let records = engine
            .allocate(&line100(), &order(250), &ramp_plan(), d(2), &[], &HolidayCalendar::new())
            .unwrap();

        assert_eq!(
            quantities(&records),
            vec![(d(2), 50), (d(3), 70), (d(4), 85), (d(5), 45)]
        );
    }

    #[test]
    fn test_holiday_skips_calendar_day_not_production_day() {
        // 第二个日历日为假日: 生产日序号跳过该日, 效率曲线不耗天
        let engine = AllocationEngine::new();
        let holidays = HolidayCalendar::from_dates([d(3)]);

        let records = engine
            .allocate(&line100(), &order(250), &ramp_plan(), d(2), &[], &holidays)
            .unwrap();

        // 3/2=生产日1(50%), 3/3假日, 3/4=生产日2(70%), 3/5=生产日3(85%), 3/6=剩余45
        assert_eq!(
            quantities(&records),
            vec![(d(2), 50), (d(4), 70), (d(5), 85), (d(6), 45)]
        );
    }

    #[test]
    fn test_capacity_sharing_fills_leftover_only() {
        // 先落位订单已占 60 件, 新订单当日只能吃 40 件余量
        let engine = AllocationEngine::new();
        let plan = RampUpPlan::constant(100.0).unwrap();
        let existing = vec![AllocationRecord::new("OTHER", "L1", d(2), 60)];

        let records = engine
            .allocate(&line100(), &order(100), &plan, d(2), &existing, &HolidayCalendar::new())
            .unwrap();

        assert_eq!(quantities(&records), vec![(d(2), 40), (d(3), 60)]);
    }

    #[test]
    fn test_full_day_does_not_consume_production_day() {
        // 首日被其他订单占满: 单元格 Full, 爬坡从首个实际生产日起算
        let engine = AllocationEngine::new();
        let existing = vec![AllocationRecord::new("OTHER", "L1", d(2), 100)];

        let records = engine
            .allocate(&line100(), &order(120), &ramp_plan(), d(2), &existing, &HolidayCalendar::new())
            .unwrap();

        // 3/3 为该订单的生产日1 (50%), 3/4 为生产日2 (70%)
        assert_eq!(quantities(&records), vec![(d(3), 50), (d(4), 70)]);
    }

    #[test]
    fn test_own_records_ignored_in_consumption() {
        // 重排同一订单时, 自身历史记录不挤占产能
        let engine = AllocationEngine::new();
        let plan = RampUpPlan::constant(100.0).unwrap();
        let o = order(100);
        let existing = vec![AllocationRecord::new(&o.order_id, "L1", d(2), 100)];

        let records = engine
            .allocate(&line100(), &o, &plan, d(2), &existing, &HolidayCalendar::new())
            .unwrap();

        assert_eq!(quantities(&records), vec![(d(2), 100)]);
    }

    #[test]
    fn test_conservation_invariant() {
        let engine = AllocationEngine::new();
        let records = engine
            .allocate(&line100(), &order(733), &ramp_plan(), d(2), &[], &HolidayCalendar::new())
            .unwrap();

        let total: i64 = records.iter().map(|r| r.quantity).sum();
        assert_eq!(total, 733);
        // 单日不超过 100% 日产能
        assert!(records.iter().all(|r| r.quantity <= 100));
    }

    #[test]
    fn test_horizon_exceeded_on_zero_capacity_days() {
        // 视野收紧到 5 天, 余量吃不完 -> SchedulingHorizonExceeded
        let engine = AllocationEngine::with_config(AllocatorConfig { max_horizon_days: 5 });
        let plan = RampUpPlan::constant(100.0).unwrap();

        let result = engine.allocate(
            &line100(),
            &order(1000),
            &plan,
            d(2),
            &[],
            &HolidayCalendar::new(),
        );

        assert!(matches!(
            result,
            Err(EngineError::SchedulingHorizonExceeded { remaining: 500, .. })
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let engine = AllocationEngine::new();
        let plan = RampUpPlan::constant(100.0).unwrap();

        let result = engine.allocate(
            &line100(),
            &order(0),
            &plan,
            d(2),
            &[],
            &HolidayCalendar::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidOrderData(_))));
    }
}
