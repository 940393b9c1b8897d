// ==========================================
// 服装生产排产系统 - 分配记录数据仓储
// ==========================================
// 红线: 分配记录是排产结果的唯一权威表示;
//       替换一个订单的记录必须在同一事务内完成 (先删后插),
//       不允许出现半截分配落库
// ==========================================

use crate::domain::allocation::AllocationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationRepository - 分配记录仓储
// ==========================================
pub struct AllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AllocationRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 事务内替换一个订单的全部分配记录
    ///
    /// # 参数
    /// - `order_id`: 订单ID
    /// - `records`: 新记录 (可为空, 即只清除)
    pub fn replace_for_order(
        &self,
        order_id: &str,
        records: &[AllocationRecord],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM allocation_record WHERE order_id = ?1",
            params![order_id],
        )?;

        for r in records {
            tx.execute(
                r#"
                INSERT INTO allocation_record (order_id, line_id, plan_date, quantity)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    r.order_id,
                    r.line_id,
                    r.date.format("%Y-%m-%d").to_string(),
                    r.quantity,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 删除一个订单的全部分配记录
    pub fn delete_for_order(&self, order_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM allocation_record WHERE order_id = ?1",
            params![order_id],
        )?;
        Ok(affected)
    }

    /// 查询一个订单的分配记录 (按日期升序)
    pub fn find_by_order(&self, order_id: &str) -> RepositoryResult<Vec<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, line_id, plan_date, quantity
            FROM allocation_record
            WHERE order_id = ?1
            ORDER BY plan_date
            "#,
        )?;
        let records = stmt
            .query_map(params![order_id], map_record_row)?
            .collect::<SqliteResult<Vec<AllocationRecord>>>()?;
        Ok(records)
    }

    /// 查询一条产线的分配记录 (按日期升序)
    pub fn find_by_line(&self, line_id: &str) -> RepositoryResult<Vec<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, line_id, plan_date, quantity
            FROM allocation_record
            WHERE line_id = ?1
            ORDER BY plan_date, order_id
            "#,
        )?;
        let records = stmt
            .query_map(params![line_id], map_record_row)?
            .collect::<SqliteResult<Vec<AllocationRecord>>>()?;
        Ok(records)
    }

    /// 查询全部分配记录
    pub fn find_all(&self) -> RepositoryResult<Vec<AllocationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, line_id, plan_date, quantity
            FROM allocation_record
            ORDER BY line_id, plan_date, order_id
            "#,
        )?;
        let records = stmt
            .query_map([], map_record_row)?
            .collect::<SqliteResult<Vec<AllocationRecord>>>()?;
        Ok(records)
    }
}

fn map_record_row(row: &Row<'_>) -> SqliteResult<AllocationRecord> {
    Ok(AllocationRecord {
        order_id: row.get(0)?,
        line_id: row.get(1)?,
        date: NaiveDate::parse_from_str(&row.get::<_, String>(2)?, "%Y-%m-%d")
            .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
        quantity: row.get(3)?,
    })
}
