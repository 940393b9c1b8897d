// ==========================================
// 服装生产排产系统 - 排产持久化协作方
// ==========================================
// 职责: 看板与存储之间的可等待 CRUD 接缝
// 约定: 写操作返回完整的最新实体或类型化错误;
//       替换分配记录必须整组成功或整组失败
// ==========================================

use crate::domain::allocation::AllocationRecord;
use crate::domain::calendar::HolidayCalendar;
use crate::domain::line::ProductionLine;
use crate::domain::order::Order;
use crate::domain::types::OrderStatus;
use crate::repository::{
    AllocationRepository, HolidayRepository, OrderRepository, ProductionLineRepository,
    RepositoryResult,
};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// SchedulePersistence - 持久化协作方接口
// ==========================================
#[async_trait]
pub trait SchedulePersistence: Send + Sync {
    /// 保存订单, 返回落库后的完整实体
    async fn save_order(&self, order: &Order) -> RepositoryResult<Order>;

    /// 删除订单
    async fn delete_order(&self, order_id: &str) -> RepositoryResult<()>;

    /// 复读订单当前状态 (提交排产前的冲突检查)
    async fn fetch_order_status(&self, order_id: &str) -> RepositoryResult<Option<OrderStatus>>;

    /// 保存产线
    async fn save_line(&self, line: &ProductionLine) -> RepositoryResult<ProductionLine>;

    /// 事务内替换订单的全部分配记录 (records 为空即清除)
    async fn replace_allocations(
        &self,
        order_id: &str,
        records: &[AllocationRecord],
    ) -> RepositoryResult<()>;

    /// 载入全部订单 (不含 actual_production, 由看板重建)
    async fn load_orders(&self) -> RepositoryResult<Vec<Order>>;

    /// 载入全部产线 (按展示顺序)
    async fn load_lines(&self) -> RepositoryResult<Vec<ProductionLine>>;

    /// 载入全部分配记录
    async fn load_allocations(&self) -> RepositoryResult<Vec<AllocationRecord>>;

    /// 载入假日日历
    async fn load_holidays(&self) -> RepositoryResult<HolidayCalendar>;
}

// ==========================================
// SqlitePersistence - SQLite 实现
// ==========================================
pub struct SqlitePersistence {
    order_repo: OrderRepository,
    line_repo: ProductionLineRepository,
    allocation_repo: AllocationRepository,
    holiday_repo: HolidayRepository,
}

impl SqlitePersistence {
    /// 从共享连接创建 (各仓储复用同一连接)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            order_repo: OrderRepository::from_connection(conn.clone()),
            line_repo: ProductionLineRepository::from_connection(conn.clone()),
            allocation_repo: AllocationRepository::from_connection(conn.clone()),
            holiday_repo: HolidayRepository::from_connection(conn),
        }
    }

    /// 假日维护入口 (看板层不直接改假日, 留给配置界面)
    pub fn holiday_repo(&self) -> &HolidayRepository {
        &self.holiday_repo
    }
}

#[async_trait]
impl SchedulePersistence for SqlitePersistence {
    async fn save_order(&self, order: &Order) -> RepositoryResult<Order> {
        self.order_repo.upsert(order)?;
        Ok(order.clone())
    }

    async fn delete_order(&self, order_id: &str) -> RepositoryResult<()> {
        self.allocation_repo.delete_for_order(order_id)?;
        self.order_repo.delete(order_id)
    }

    async fn fetch_order_status(&self, order_id: &str) -> RepositoryResult<Option<OrderStatus>> {
        self.order_repo.fetch_status(order_id)
    }

    async fn save_line(&self, line: &ProductionLine) -> RepositoryResult<ProductionLine> {
        self.line_repo.upsert(line)?;
        Ok(line.clone())
    }

    async fn replace_allocations(
        &self,
        order_id: &str,
        records: &[AllocationRecord],
    ) -> RepositoryResult<()> {
        self.allocation_repo.replace_for_order(order_id, records)
    }

    async fn load_orders(&self) -> RepositoryResult<Vec<Order>> {
        self.order_repo.find_all()
    }

    async fn load_lines(&self) -> RepositoryResult<Vec<ProductionLine>> {
        self.line_repo.find_all()
    }

    async fn load_allocations(&self) -> RepositoryResult<Vec<AllocationRecord>> {
        self.allocation_repo.find_all()
    }

    async fn load_holidays(&self) -> RepositoryResult<HolidayCalendar> {
        self.holiday_repo.load_calendar()
    }
}
