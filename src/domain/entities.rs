// ==========================================
// 电商数据入库 - 六个实体声明
// ==========================================
// 依赖关系:
//   distribution_centers ← products ← inventory_items ← order_items
//   users ← orders ← order_items
// ==========================================

use crate::domain::schema::{EntitySchema, FieldDef, FieldType, ForeignKeyDef};

use FieldType::{Integer, Real, Text, Timestamp};

// ===== 独立实体（无外键） =====

pub static DISTRIBUTION_CENTER: EntitySchema = EntitySchema {
    name: "DistributionCenter",
    table: "distribution_centers",
    source_file: "distribution_centers.csv",
    fields: &[
        FieldDef::primary_key("id"),
        FieldDef::new("name", Text),
        FieldDef::new("latitude", Real),
        FieldDef::new("longitude", Real),
    ],
    foreign_keys: &[],
};

pub static USER: EntitySchema = EntitySchema {
    name: "User",
    table: "users",
    source_file: "users.csv",
    fields: &[
        FieldDef::primary_key("id"),
        FieldDef::new("first_name", Text),
        FieldDef::new("last_name", Text),
        FieldDef::new("email", Text).unique(),
        FieldDef::new("age", Integer),
        FieldDef::new("gender", Text),
        FieldDef::new("state", Text),
        FieldDef::new("street_address", Text),
        FieldDef::new("postal_code", Text),
        FieldDef::new("city", Text),
        FieldDef::new("country", Text),
        FieldDef::new("latitude", Real),
        FieldDef::new("longitude", Real),
        FieldDef::new("traffic_source", Text),
        FieldDef::new("created_at", Timestamp),
    ],
    foreign_keys: &[],
};

// ===== 依赖实体 =====

pub static PRODUCT: EntitySchema = EntitySchema {
    name: "Product",
    table: "products",
    source_file: "products.csv",
    fields: &[
        FieldDef::primary_key("id"),
        FieldDef::new("cost", Real),
        FieldDef::new("category", Text),
        FieldDef::new("name", Text),
        FieldDef::new("brand", Text),
        FieldDef::new("retail_price", Real),
        FieldDef::new("department", Text),
        FieldDef::new("sku", Text),
        FieldDef::new("distribution_center_id", Integer),
    ],
    foreign_keys: &[ForeignKeyDef::new(
        "distribution_center_id",
        "distribution_centers",
        "id",
    )],
};

pub static ORDER: EntitySchema = EntitySchema {
    name: "Order",
    table: "orders",
    source_file: "orders.csv",
    fields: &[
        FieldDef::primary_key("order_id"),
        FieldDef::new("user_id", Integer),
        FieldDef::new("status", Text),
        FieldDef::new("gender", Text),
        FieldDef::new("created_at", Timestamp),
        FieldDef::new("returned_at", Timestamp),
        FieldDef::new("shipped_at", Timestamp),
        FieldDef::new("delivered_at", Timestamp),
        FieldDef::new("num_of_item", Integer),
    ],
    foreign_keys: &[ForeignKeyDef::new("user_id", "users", "id")],
};

pub static INVENTORY_ITEM: EntitySchema = EntitySchema {
    name: "InventoryItem",
    table: "inventory_items",
    source_file: "inventory_items.csv",
    fields: &[
        FieldDef::primary_key("id"),
        FieldDef::new("product_id", Integer),
        FieldDef::new("created_at", Timestamp),
        FieldDef::new("sold_at", Timestamp),
        FieldDef::new("cost", Real),
        FieldDef::new("product_category", Text),
        FieldDef::new("product_name", Text),
        FieldDef::new("product_brand", Text),
        FieldDef::new("product_retail_price", Real),
        FieldDef::new("product_department", Text),
        FieldDef::new("product_sku", Text),
        FieldDef::new("product_distribution_center_id", Integer),
    ],
    foreign_keys: &[
        ForeignKeyDef::new("product_id", "products", "id"),
        ForeignKeyDef::new(
            "product_distribution_center_id",
            "distribution_centers",
            "id",
        ),
    ],
};

pub static ORDER_ITEM: EntitySchema = EntitySchema {
    name: "OrderItem",
    table: "order_items",
    source_file: "order_items.csv",
    fields: &[
        FieldDef::primary_key("id"),
        FieldDef::new("order_id", Integer),
        FieldDef::new("user_id", Integer),
        FieldDef::new("product_id", Integer),
        FieldDef::new("inventory_item_id", Integer),
        FieldDef::new("status", Text),
        FieldDef::new("created_at", Timestamp),
        FieldDef::new("shipped_at", Timestamp),
        FieldDef::new("delivered_at", Timestamp),
        FieldDef::new("returned_at", Timestamp),
        FieldDef::new("sale_price", Real),
    ],
    foreign_keys: &[
        ForeignKeyDef::new("order_id", "orders", "order_id"),
        ForeignKeyDef::new("user_id", "users", "id"),
        ForeignKeyDef::new("product_id", "products", "id"),
        ForeignKeyDef::new("inventory_item_id", "inventory_items", "id"),
    ],
};

/// 全部实体（声明顺序即默认加载顺序）
pub static ALL_ENTITIES: [&EntitySchema; 6] = [
    &DISTRIBUTION_CENTER,
    &USER,
    &PRODUCT,
    &ORDER,
    &INVENTORY_ITEM,
    &ORDER_ITEM,
];
