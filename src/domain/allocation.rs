// ==========================================
// 服装生产排产系统 - 分配记录领域模型
// ==========================================
// 红线: allocation_record 是排产结果的唯一权威表示,
//       订单上的 actual_production 只是按日期的反范式视图
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AllocationRecord - 单日分配记录
// ==========================================
// 一个订单每个生产日一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub order_id: String,  // 订单ID
    pub line_id: String,   // 产线ID
    pub date: NaiveDate,   // 生产日期
    pub quantity: i64,     // 当日件数
}

impl AllocationRecord {
    pub fn new(order_id: &str, line_id: &str, date: NaiveDate, quantity: i64) -> Self {
        Self {
            order_id: order_id.to_string(),
            line_id: line_id.to_string(),
            date,
            quantity,
        }
    }
}

/// 将一个订单的分配记录折叠为 日期 -> 件数 视图
pub fn daily_view(records: &[AllocationRecord]) -> BTreeMap<NaiveDate, i64> {
    let mut daily = BTreeMap::new();
    for r in records {
        *daily.entry(r.date).or_insert(0) += r.quantity;
    }
    daily
}

/// 统计某产线某日已被占用的件数 (跨所有订单)
pub fn consumed_on(records: &[AllocationRecord], line_id: &str, date: NaiveDate) -> i64 {
    records
        .iter()
        .filter(|r| r.line_id == line_id && r.date == date)
        .map(|r| r.quantity)
        .sum()
}
