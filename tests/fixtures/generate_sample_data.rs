// ==========================================
// 样例数据生成器
// ==========================================
// 用途: 生成六个实体的一致性 CSV（外键全部可解析）
// 用法: generate_sample_data [输出目录] [每实体规模]
// 默认: tests/fixtures/datasets, 规模 100
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::Writer;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const STATUSES: &[&str] = &["Processing", "Shipped", "Complete", "Returned", "Cancelled"];
const CATEGORIES: &[&str] = &["Jeans", "Tops & Tees", "Outerwear & Coats", "Swim", "Socks"];
const BRANDS: &[&str] = &["Levi's", "Carhartt", "Columbia", "Speedo", "Hanes"];
const CITIES: &[(&str, &str, f64, f64)] = &[
    ("Memphis TN", "Tennessee", 35.1174, -89.9711),
    ("Chicago IL", "Illinois", 41.8369, -87.6847),
    ("Houston TX", "Texas", 29.7604, -95.3698),
    ("Los Angeles CA", "California", 34.0500, -118.2500),
];

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default()
}

fn ts(t: NaiveDateTime) -> String {
    format!("{} UTC", t.format("%Y-%m-%d %H:%M:%S"))
}

fn writer(dir: &Path, file: &str) -> Result<Writer<fs::File>, Box<dyn Error>> {
    Ok(Writer::from_path(dir.join(file))?)
}

fn write_distribution_centers(dir: &Path) -> Result<usize, Box<dyn Error>> {
    let mut w = writer(dir, "distribution_centers.csv")?;
    w.write_record(["id", "name", "latitude", "longitude"])?;
    for (i, (name, _, lat, lon)) in CITIES.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            name.to_string(),
            lat.to_string(),
            lon.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(CITIES.len())
}

fn write_users(dir: &Path, n: usize) -> Result<(), Box<dyn Error>> {
    let mut w = writer(dir, "users.csv")?;
    w.write_record([
        "id", "first_name", "last_name", "email", "age", "gender", "state",
        "street_address", "postal_code", "city", "country", "latitude", "longitude",
        "traffic_source", "created_at",
    ])?;
    for id in 1..=n {
        let (city, state, lat, lon) = CITIES[id % CITIES.len()];
        let created = base_time() + Duration::hours(id as i64);
        w.write_record([
            id.to_string(),
            format!("User{}", id),
            "Sample".to_string(),
            format!("user{}@example.com", id),
            (18 + id % 50).to_string(),
            if id % 2 == 0 { "F" } else { "M" }.to_string(),
            state.to_string(),
            format!("{} Main St", id),
            format!("{:05}", 10000 + id),
            city.to_string(),
            "United States".to_string(),
            lat.to_string(),
            lon.to_string(),
            "Search".to_string(),
            ts(created),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_products(dir: &Path, n: usize, centers: usize) -> Result<(), Box<dyn Error>> {
    let mut w = writer(dir, "products.csv")?;
    w.write_record([
        "id", "cost", "category", "name", "brand", "retail_price", "department", "sku",
        "distribution_center_id",
    ])?;
    for id in 1..=n {
        let price = 20.0 + (id % 80) as f64;
        w.write_record([
            id.to_string(),
            format!("{:.2}", price * 0.45),
            CATEGORIES[id % CATEGORIES.len()].to_string(),
            format!("Product {}", id),
            BRANDS[id % BRANDS.len()].to_string(),
            format!("{:.2}", price),
            if id % 3 == 0 { "Women" } else { "Men" }.to_string(),
            format!("SKU{:08X}", id * 7919),
            (id % centers + 1).to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// 订单、库存、订单明细一并生成（明细引用同编号的订单与库存）
fn write_orders_and_items(dir: &Path, n: usize, centers: usize) -> Result<(), Box<dyn Error>> {
    let mut orders = writer(dir, "orders.csv")?;
    orders.write_record([
        "order_id", "user_id", "status", "gender", "created_at", "returned_at",
        "shipped_at", "delivered_at", "num_of_item",
    ])?;

    let mut inventory = writer(dir, "inventory_items.csv")?;
    inventory.write_record([
        "id", "product_id", "created_at", "sold_at", "cost", "product_category",
        "product_name", "product_brand", "product_retail_price", "product_department",
        "product_sku", "product_distribution_center_id",
    ])?;

    let mut items = writer(dir, "order_items.csv")?;
    items.write_record([
        "id", "order_id", "user_id", "product_id", "inventory_item_id", "status",
        "created_at", "shipped_at", "delivered_at", "returned_at", "sale_price",
    ])?;

    for id in 1..=n {
        let user_id = id;
        let product_id = id;
        let status = STATUSES[id % STATUSES.len()];
        let created = base_time() + Duration::days(id as i64);
        let shipped = created + Duration::days(1);
        let delivered = created + Duration::days(4);
        let returned = if status == "Returned" {
            ts(created + Duration::days(10))
        } else {
            String::new()
        };
        let price = 20.0 + (id % 80) as f64;

        orders.write_record([
            id.to_string(),
            user_id.to_string(),
            status.to_string(),
            if id % 2 == 0 { "F" } else { "M" }.to_string(),
            ts(created),
            returned.clone(),
            ts(shipped),
            ts(delivered),
            "1".to_string(),
        ])?;

        inventory.write_record([
            id.to_string(),
            product_id.to_string(),
            ts(created - Duration::days(30)),
            ts(created),
            format!("{:.2}", price * 0.45),
            CATEGORIES[id % CATEGORIES.len()].to_string(),
            format!("Product {}", id),
            BRANDS[id % BRANDS.len()].to_string(),
            format!("{:.2}", price),
            if id % 3 == 0 { "Women" } else { "Men" }.to_string(),
            format!("SKU{:08X}", id * 7919),
            (id % centers + 1).to_string(),
        ])?;

        items.write_record([
            id.to_string(),
            id.to_string(),
            user_id.to_string(),
            product_id.to_string(),
            id.to_string(),
            status.to_string(),
            ts(created),
            ts(shipped),
            ts(delivered),
            returned,
            format!("{:.2}", price),
        ])?;
    }

    orders.flush()?;
    inventory.flush()?;
    items.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    let size: usize = match args.next() {
        Some(v) => v.parse()?,
        None => 100,
    };

    fs::create_dir_all(&out_dir)?;

    println!("生成样例数据 → {} (规模 {})", out_dir.display(), size);
    let centers = write_distribution_centers(&out_dir)?;
    write_users(&out_dir, size)?;
    write_products(&out_dir, size, centers)?;
    write_orders_and_items(&out_dir, size, centers)?;
    println!("完成: 6 个文件");

    Ok(())
}
