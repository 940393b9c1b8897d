// ==========================================
// 服装生产排产系统 - 假日数据仓储
// ==========================================
// 假日全局生效, 只读消费方为分配引擎
// ==========================================

use crate::domain::calendar::HolidayCalendar;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// HolidayRepository - 假日仓储
// ==========================================
pub struct HolidayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HolidayRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增假日 (重复日期忽略)
    pub fn add(&self, date: NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO holiday (holiday_date) VALUES (?1)",
            params![date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }

    /// 删除假日
    pub fn remove(&self, date: NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM holiday WHERE holiday_date = ?1",
            params![date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }

    /// 读取完整假日日历
    pub fn load_calendar(&self) -> RepositoryResult<HolidayCalendar> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT holiday_date FROM holiday ORDER BY holiday_date")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<String>>>()?;

        let parsed = dates
            .into_iter()
            .filter_map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
        Ok(HolidayCalendar::from_dates(parsed))
    }
}
