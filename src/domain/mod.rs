// ==========================================
// 电商数据入库 - 领域层
// ==========================================
// 职责: 实体 Schema（纯数据）与字段值类型
// ==========================================

pub mod entities;
pub mod schema;
pub mod value;

// 重导出核心类型
pub use entities::{
    ALL_ENTITIES, DISTRIBUTION_CENTER, INVENTORY_ITEM, ORDER, ORDER_ITEM, PRODUCT, USER,
};
pub use schema::{dependency_order, EntitySchema, FieldDef, FieldType, ForeignKeyDef, SchemaError};
pub use value::{FieldValue, Record};
