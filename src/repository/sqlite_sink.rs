// ==========================================
// 电商数据入库 - SQLite Sink 实现
// ==========================================
// 职责: 建表 + 事务化批量插入（使用 rusqlite）
// 红线: 只做写入，不做去重 / upsert / 校验
// ==========================================

use crate::config::IngestConfig;
use crate::db::{open_sqlite_connection, ConnectionOptions};
use crate::domain::{EntitySchema, FieldValue, Record};
use crate::repository::error::{SinkError, SinkResult};
use crate::repository::sink::{Sink, SinkTransaction};
use rusqlite::{params_from_iter, Connection, Transaction};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// SqliteSink
// ==========================================
pub struct SqliteSink {
    conn: Option<Connection>,
    target: String,
}

impl SqliteSink {
    /// 打开（或创建）数据库文件
    pub fn open<P: AsRef<Path>>(db_path: P, options: &ConnectionOptions) -> SinkResult<Self> {
        let path = db_path.as_ref();
        let target = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SinkError::ConnectionError(format!("无法创建目录 {}: {}", parent.display(), e))
            })?;
        }

        let mut conn = open_sqlite_connection(path, options)
            .map_err(|e| SinkError::ConnectionError(format!("{}: {}", target, e)))?;
        crate::perf::install_sqlite_tracing(&mut conn);

        info!(target_db = %target, "数据库连接已建立");
        Ok(Self {
            conn: Some(conn),
            target,
        })
    }

    /// 按运行配置打开
    pub fn from_config(config: &IngestConfig) -> SinkResult<Self> {
        let options = ConnectionOptions {
            enforce_foreign_keys: config.enforce_foreign_keys,
            busy_timeout_ms: config.busy_timeout_ms,
        };
        Self::open(&config.database_path, &options)
    }

    /// 包装已有连接（调用方负责 PRAGMA 配置）
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            target: "<connection>".to_string(),
        }
    }

    /// 当前连接（已关闭时为 None）
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn conn_mut(&mut self) -> SinkResult<&mut Connection> {
        self.conn.as_mut().ok_or(SinkError::Closed)
    }
}

impl Sink for SqliteSink {
    fn ensure_schema(&mut self, entities: &[&'static EntitySchema]) -> SinkResult<()> {
        let conn = self.conn_mut()?;
        let tx = conn
            .transaction()
            .map_err(|e| SinkError::TransactionError(e.to_string()))?;

        for entity in entities {
            tx.execute_batch(&entity.create_table_sql())
                .map_err(|e| SinkError::SchemaError {
                    table: entity.table.to_string(),
                    message: e.to_string(),
                })?;
            debug!(table = entity.table, "表已就绪");
        }

        tx.commit().map_err(|e| SinkError::SchemaError {
            table: "*".to_string(),
            message: e.to_string(),
        })
    }

    fn begin_transaction(&mut self) -> SinkResult<Box<dyn SinkTransaction + '_>> {
        let tx = self
            .conn_mut()?
            .transaction()
            .map_err(|e| SinkError::TransactionError(e.to_string()))?;
        Ok(Box::new(SqliteTransaction { tx }))
    }

    fn close(&mut self) -> SinkResult<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.close()
                    .map_err(|(_, e)| SinkError::ConnectionError(e.to_string()))?;
                info!(target_db = %self.target, "数据库连接已关闭");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

// ==========================================
// SqliteTransaction
// ==========================================
// rusqlite::Transaction 默认 drop 时回滚
struct SqliteTransaction<'c> {
    tx: Transaction<'c>,
}

impl SinkTransaction for SqliteTransaction<'_> {
    fn bulk_insert(&mut self, entity: &EntitySchema, records: &[Record]) -> SinkResult<usize> {
        let mut stmt = self.tx.prepare_cached(&entity.insert_sql())?;

        let mut count = 0;
        for record in records {
            let values = entity
                .fields
                .iter()
                .map(|f| record.get(f.name).unwrap_or(&FieldValue::Null));
            stmt.execute(params_from_iter(values))?;
            count += 1;
        }

        Ok(count)
    }

    fn commit(self: Box<Self>) -> SinkResult<()> {
        self.tx
            .commit()
            .map_err(|e| SinkError::TransactionError(e.to_string()))
    }

    fn rollback(self: Box<Self>) -> SinkResult<()> {
        self.tx
            .rollback()
            .map_err(|e| SinkError::TransactionError(e.to_string()))
    }
}
