// ==========================================
// 电商数据入库 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为（外键 / busy_timeout）
// - 提供表存在性查询，供 schema 准备与测试复用
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// 连接选项
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub enforce_foreign_keys: bool,
    pub busy_timeout_ms: u64,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: true,
            busy_timeout_ms: crate::config::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// 配置 SQLite 连接的统一 PRAGMA
///
/// foreign_keys 与 busy_timeout 都需要"每个连接"单独设置
pub fn configure_sqlite_connection(
    conn: &Connection,
    options: &ConnectionOptions,
) -> rusqlite::Result<()> {
    let fk = if options.enforce_foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {};", fk))?;
    conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection<P: AsRef<Path>>(
    db_path: P,
    options: &ConnectionOptions,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn, options)?;
    Ok(conn)
}

/// 表是否存在
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |_row| Ok(true),
        )
        .optional()?;
    Ok(found.unwrap_or(false))
}

/// 表行数
pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn, &ConnectionOptions::default()).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_configure_can_disable_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        let options = ConnectionOptions {
            enforce_foreign_keys: false,
            ..ConnectionOptions::default()
        };
        configure_sqlite_connection(&conn, &options).unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 0);
    }

    #[test]
    fn test_table_exists_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "t").unwrap());
        conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1), (2);")
            .unwrap();
        assert!(table_exists(&conn, "t").unwrap());
        assert_eq!(count_rows(&conn, "t").unwrap(), 2);
    }
}
