// ==========================================
// 服装生产排产系统 - 订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: actual_production 不落在 order_master 上,
//       由调用方用 allocation_record 重建
// ==========================================

use crate::domain::order::Order;
use crate::domain::types::OrderStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新订单
    pub fn upsert(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO order_master (
                order_id, po_number, base_po_number, style_name,
                order_quantity, cut_quantity, issue_quantity, smv, mo_count,
                status, assigned_line_id, plan_start_date, plan_end_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                order.order_id,
                order.po_number,
                order.base_po_number,
                order.style_name,
                order.order_quantity,
                order.cut_quantity,
                order.issue_quantity,
                order.smv,
                order.mo_count,
                order.status.to_string(),
                order.assigned_line_id,
                order.plan_start_date.map(|d| d.format("%Y-%m-%d").to_string()),
                order.plan_end_date.map(|d| d.format("%Y-%m-%d").to_string()),
                order.created_at.to_rfc3339(),
                order.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// 按订单ID查询
    pub fn find_by_id(&self, order_id: &str) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE order_id = ?1",
            SELECT_ORDER
        ))?;

        let order = stmt
            .query_row(params![order_id], map_order_row)
            .optional()?;
        Ok(order)
    }

    /// 查询全部订单 (按 PO 号稳定排序)
    pub fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY po_number, order_id",
            SELECT_ORDER
        ))?;

        let orders = stmt
            .query_map([], map_order_row)?
            .collect::<SqliteResult<Vec<Order>>>()?;
        Ok(orders)
    }

    /// 查询待排池订单
    pub fn find_pending(&self) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE status = 'PENDING' ORDER BY po_number, order_id",
            SELECT_ORDER
        ))?;

        let orders = stmt
            .query_map([], map_order_row)?
            .collect::<SqliteResult<Vec<Order>>>()?;
        Ok(orders)
    }

    /// 只读取订单当前状态 (排产提交前的冲突检查用)
    pub fn fetch_status(&self, order_id: &str) -> RepositoryResult<Option<OrderStatus>> {
        let conn = self.get_conn()?;
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM order_master WHERE order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(status.and_then(|s| OrderStatus::parse(&s)))
    }

    /// 删除订单
    pub fn delete(&self, order_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM order_master WHERE order_id = ?1",
            params![order_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            });
        }
        Ok(())
    }
}

const SELECT_ORDER: &str = r#"
    SELECT
        order_id, po_number, base_po_number, style_name,
        order_quantity, cut_quantity, issue_quantity, smv, mo_count,
        status, assigned_line_id, plan_start_date, plan_end_date,
        created_at, updated_at
    FROM order_master
"#;

/// 行映射: order_master -> Order (actual_production 留空, 由调用方重建)
fn map_order_row(row: &Row<'_>) -> SqliteResult<Order> {
    let status_str: String = row.get(9)?;
    Ok(Order {
        order_id: row.get(0)?,
        po_number: row.get(1)?,
        base_po_number: row.get(2)?,
        style_name: row.get(3)?,
        order_quantity: row.get(4)?,
        cut_quantity: row.get(5)?,
        issue_quantity: row.get(6)?,
        smv: row.get(7)?,
        mo_count: row.get(8)?,
        status: OrderStatus::parse(&status_str).unwrap_or(OrderStatus::Pending),
        assigned_line_id: row.get(10)?,
        plan_start_date: parse_opt_date(row.get::<_, Option<String>>(11)?),
        plan_end_date: parse_opt_date(row.get::<_, Option<String>>(12)?),
        actual_production: BTreeMap::new(),
        created_at: parse_datetime(row.get::<_, String>(13)?),
        updated_at: parse_datetime(row.get::<_, String>(14)?),
    })
}

fn parse_opt_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn parse_datetime(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
