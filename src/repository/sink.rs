// ==========================================
// 电商数据入库 - Sink 接口
// ==========================================
// 用途: 事务化的批量写入目标（外部协作者）
// 实现者: SqliteSink（生产）/ 测试中的记录型 Mock
// ==========================================

use crate::domain::{EntitySchema, Record};
use crate::repository::error::SinkResult;

/// 写入目标
pub trait Sink {
    /// 确保所有实体的表存在（失败为致命错误）
    fn ensure_schema(&mut self, entities: &[&'static EntitySchema]) -> SinkResult<()>;

    /// 开启一个作用域事务
    ///
    /// 返回的事务在未提交时被 drop 必须回滚
    fn begin_transaction(&mut self) -> SinkResult<Box<dyn SinkTransaction + '_>>;

    /// 释放连接（幂等）
    fn close(&mut self) -> SinkResult<()>;
}

/// 作用域事务
pub trait SinkTransaction {
    /// 批量插入一批记录，返回写入行数
    ///
    /// - 未声明的列忽略
    /// - 缺失的列写 NULL
    fn bulk_insert(&mut self, entity: &EntitySchema, records: &[Record]) -> SinkResult<usize>;

    fn commit(self: Box<Self>) -> SinkResult<()>;

    fn rollback(self: Box<Self>) -> SinkResult<()>;
}
