// ==========================================
// 服装生产排产系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少并发写入时的偶发 busy 错误
// - 提供内聚的建表入口, 供应用启动与测试共用
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout (毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要每个连接单独开启
/// - busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化排产核心 schema (幂等)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS order_master (
            order_id        TEXT PRIMARY KEY,
            po_number       TEXT NOT NULL,
            base_po_number  TEXT NOT NULL,
            style_name      TEXT,
            order_quantity  INTEGER NOT NULL,
            cut_quantity    INTEGER NOT NULL DEFAULT 0,
            issue_quantity  INTEGER NOT NULL DEFAULT 0,
            smv             REAL NOT NULL,
            mo_count        INTEGER NOT NULL DEFAULT 0,
            status          TEXT NOT NULL,
            assigned_line_id TEXT,
            plan_start_date TEXT,
            plan_end_date   TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS production_line (
            line_id   TEXT PRIMARY KEY,
            name      TEXT NOT NULL,
            capacity  INTEGER NOT NULL,
            group_id  TEXT,
            seq_no    INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS allocation_record (
            order_id  TEXT NOT NULL,
            line_id   TEXT NOT NULL,
            plan_date TEXT NOT NULL,
            quantity  INTEGER NOT NULL,
            PRIMARY KEY (order_id, plan_date)
        );

        CREATE INDEX IF NOT EXISTS idx_allocation_line_date
            ON allocation_record (line_id, plan_date);

        CREATE TABLE IF NOT EXISTS holiday (
            holiday_date TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // 重复执行不报错

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN \
                 ('order_master','production_line','allocation_record','holiday','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }
}
