// ==========================================
// 服装生产排产系统 - 产线数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::line::ProductionLine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductionLineRepository - 产线仓储
// ==========================================
pub struct ProductionLineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionLineRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新产线
    pub fn upsert(&self, line: &ProductionLine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO production_line (line_id, name, capacity, group_id, seq_no)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                line.line_id,
                line.name,
                line.capacity,
                line.group_id,
                line.seq_no,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询产线
    pub fn find_by_id(&self, line_id: &str) -> RepositoryResult<Option<ProductionLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT line_id, name, capacity, group_id, seq_no FROM production_line WHERE line_id = ?1",
        )?;
        let line = stmt.query_row(params![line_id], map_line_row).optional()?;
        Ok(line)
    }

    /// 查询全部产线 (按展示顺序)
    pub fn find_all(&self) -> RepositoryResult<Vec<ProductionLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT line_id, name, capacity, group_id, seq_no FROM production_line ORDER BY seq_no, line_id",
        )?;
        let lines = stmt
            .query_map([], map_line_row)?
            .collect::<SqliteResult<Vec<ProductionLine>>>()?;
        Ok(lines)
    }

    /// 删除产线
    pub fn delete(&self, line_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM production_line WHERE line_id = ?1",
            params![line_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionLine".to_string(),
                id: line_id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_line_row(row: &Row<'_>) -> SqliteResult<ProductionLine> {
    Ok(ProductionLine {
        line_id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        group_id: row.get(3)?,
        seq_no: row.get(4)?,
    })
}
