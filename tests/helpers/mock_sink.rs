// ==========================================
// Mock Sink 实现 - 用于编排层集成测试
// ==========================================
// 记录所有调用（建表 / 事务 / 插入 / 提交 / 回滚 / 关闭）
// 支持按 (表名, 第 n 次插入) 注入失败
// ==========================================

use ecommerce_ingest::domain::{EntitySchema, Record};
use ecommerce_ingest::repository::{Sink, SinkError, SinkResult, SinkTransaction};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Sink 调用事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    EnsureSchema(Vec<&'static str>),
    Begin,
    Insert { table: String, rows: usize },
    Commit,
    Rollback,
    Close,
}

#[derive(Debug, Default)]
struct Shared {
    events: Vec<SinkEvent>,
    inserts_per_table: HashMap<String, usize>,
    begins: usize,
    /// 已提交的记录（按表）
    committed: HashMap<String, Vec<Record>>,
}

/// 记录型 Mock Sink
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    shared: Rc<RefCell<Shared>>,
    /// (表名, 第 n 次插入，1 起) → 该次插入失败
    failures: Vec<(String, usize)>,
    fail_schema: bool,
    /// 前 n 次 begin_transaction 成功，之后连接丢失
    connection_lost_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定表的第 nth 次 bulk_insert 失败
    pub fn fail_insert(mut self, table: &str, nth: usize) -> Self {
        self.failures.push((table.to_string(), nth));
        self
    }

    /// 建表失败
    pub fn fail_schema(mut self) -> Self {
        self.fail_schema = true;
        self
    }

    /// 前 n 次事务正常，之后 begin_transaction 返回连接错误
    pub fn lose_connection_after(mut self, n: usize) -> Self {
        self.connection_lost_after = Some(n);
        self
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.shared.borrow().events.clone()
    }

    pub fn count(&self, event: &SinkEvent) -> usize {
        self.shared
            .borrow()
            .events
            .iter()
            .filter(|e| *e == event)
            .count()
    }

    pub fn close_count(&self) -> usize {
        self.count(&SinkEvent::Close)
    }

    /// 按插入顺序列出涉及的表（去除相邻重复）
    pub fn insert_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for event in self.shared.borrow().events.iter() {
            if let SinkEvent::Insert { table, .. } = event {
                if order.last() != Some(table) {
                    order.push(table.clone());
                }
            }
        }
        order
    }

    pub fn insert_count(&self) -> usize {
        self.shared
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Insert { .. }))
            .count()
    }

    pub fn committed(&self, table: &str) -> Vec<Record> {
        self.shared
            .borrow()
            .committed
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl Sink for RecordingSink {
    fn ensure_schema(&mut self, entities: &[&'static EntitySchema]) -> SinkResult<()> {
        self.shared
            .borrow_mut()
            .events
            .push(SinkEvent::EnsureSchema(entities.iter().map(|e| e.table).collect()));
        if self.fail_schema {
            return Err(SinkError::SchemaError {
                table: "*".to_string(),
                message: "injected".to_string(),
            });
        }
        Ok(())
    }

    fn begin_transaction(&mut self) -> SinkResult<Box<dyn SinkTransaction + '_>> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.events.push(SinkEvent::Begin);
            shared.begins += 1;
            if matches!(self.connection_lost_after, Some(n) if shared.begins > n) {
                return Err(SinkError::ConnectionError("server went away".to_string()));
            }
        }
        Ok(Box::new(RecordingTransaction {
            shared: Rc::clone(&self.shared),
            failures: &self.failures,
            pending: Vec::new(),
        }))
    }

    fn close(&mut self) -> SinkResult<()> {
        self.shared.borrow_mut().events.push(SinkEvent::Close);
        Ok(())
    }
}

struct RecordingTransaction<'a> {
    shared: Rc<RefCell<Shared>>,
    failures: &'a [(String, usize)],
    pending: Vec<(String, Vec<Record>)>,
}

impl SinkTransaction for RecordingTransaction<'_> {
    fn bulk_insert(&mut self, entity: &EntitySchema, records: &[Record]) -> SinkResult<usize> {
        let mut shared = self.shared.borrow_mut();
        shared.events.push(SinkEvent::Insert {
            table: entity.table.to_string(),
            rows: records.len(),
        });

        let counter = shared
            .inserts_per_table
            .entry(entity.table.to_string())
            .or_insert(0);
        *counter += 1;
        let nth = *counter;

        if self
            .failures
            .iter()
            .any(|(table, n)| table == entity.table && *n == nth)
        {
            return Err(SinkError::UniqueConstraintViolation(format!(
                "injected failure: {} #{}",
                entity.table, nth
            )));
        }

        self.pending
            .push((entity.table.to_string(), records.to_vec()));
        Ok(records.len())
    }

    fn commit(self: Box<Self>) -> SinkResult<()> {
        let this = *self;
        let mut shared = this.shared.borrow_mut();
        shared.events.push(SinkEvent::Commit);
        for (table, records) in this.pending {
            shared.committed.entry(table).or_default().extend(records);
        }
        Ok(())
    }

    fn rollback(self: Box<Self>) -> SinkResult<()> {
        self.shared.borrow_mut().events.push(SinkEvent::Rollback);
        Ok(())
    }
}
