// ==========================================
// 服装生产排产系统 - 订单领域模型
// ==========================================
// 红线: actual_production 是 allocation_record 的派生视图,
//       计划起止日期由分配记录重算, 不信任存量字段
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Order - 生产订单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // ===== 标识 =====
    pub order_id: String,              // 订单ID (uuid)
    pub po_number: String,             // PO号 (拆分件带 " Split N" 后缀)
    pub base_po_number: String,        // 原始PO号 (拆分件回溯用)
    pub style_name: Option<String>,    // 款号/款名

    // ===== 数量 =====
    pub order_quantity: i64,           // 订单件数
    pub cut_quantity: i64,             // 已裁剪件数 (展示用, 默认0)
    pub issue_quantity: i64,           // 已发料件数 (展示用, 默认0)

    // ===== 工作量 =====
    pub smv: f64,                      // 标准工时 (分钟/件)
    pub mo_count: i32,                 // 制造单数量 (展示用)

    // ===== 排产状态 =====
    pub status: OrderStatus,           // PENDING / SCHEDULED
    pub assigned_line_id: Option<String>, // 已分配产线
    pub plan_start_date: Option<NaiveDate>, // 派生: 分配记录最早日期
    pub plan_end_date: Option<NaiveDate>,   // 派生: 分配记录最晚日期
    pub actual_production: BTreeMap<NaiveDate, i64>, // 派生: 日期 -> 当日分配件数

    // ===== 审计 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 创建待排订单
    pub fn new_pending(po_number: &str, order_quantity: i64, smv: f64) -> Self {
        let now = Utc::now();
        Self {
            order_id: uuid::Uuid::new_v4().to_string(),
            po_number: po_number.to_string(),
            base_po_number: po_number.to_string(),
            style_name: None,
            order_quantity,
            cut_quantity: 0,
            issue_quantity: 0,
            smv,
            mo_count: 0,
            status: OrderStatus::Pending,
            assigned_line_id: None,
            plan_start_date: None,
            plan_end_date: None,
            actual_production: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 已分配件数合计
    ///
    /// # 不变式
    /// 合计永远不超过 order_quantity
    pub fn allocated_quantity(&self) -> i64 {
        self.actual_production.values().sum()
    }

    /// 是否已排产
    pub fn is_scheduled(&self) -> bool {
        self.status == OrderStatus::Scheduled
    }

    /// 清空分配信息, 回到待排池
    ///
    /// 分配记录本身由调用方 (Board) 负责删除
    pub fn clear_allocation(&mut self) {
        self.status = OrderStatus::Pending;
        self.assigned_line_id = None;
        self.plan_start_date = None;
        self.plan_end_date = None;
        self.actual_production.clear();
        self.updated_at = Utc::now();
    }

    /// 按日分配结果写入订单 (覆盖), 并重算派生的计划起止日期
    ///
    /// # 参数
    /// - `line_id`: 分配产线
    /// - `daily`: 日期 -> 当日件数
    pub fn apply_allocation(&mut self, line_id: &str, daily: BTreeMap<NaiveDate, i64>) {
        self.plan_start_date = daily.keys().next().copied();
        self.plan_end_date = daily.keys().next_back().copied();
        self.actual_production = daily;
        self.assigned_line_id = Some(line_id.to_string());
        self.status = OrderStatus::Scheduled;
        self.updated_at = Utc::now();
    }
}
