use crate::schema::{Attribute, Family, FamilyRegistry, StorageType, SERIALIZER_OPTIONS};
use crate::store::{DataRecord, InMemoryStore, RecordValue};
use chrono::NaiveDate;
use serde_json::json;

pub const PRODUCT_CLASS: &str = "App\\Entity\\Product";
pub const BRAND_CLASS: &str = "App\\Entity\\Brand";
pub const MAKER_CLASS: &str = "App\\Entity\\Maker";

/// A small catalog: products with a brand relation, and a `seller` relation
/// that may point at two families and therefore cannot be traversed.
pub fn catalog_registry() -> FamilyRegistry {
    let product = Family::builder("Product", PRODUCT_CLASS)
        .attribute(Attribute::new("name", StorageType::ShortText))
        .attribute(Attribute::new("sku", StorageType::ShortText).required())
        .attribute(
            Attribute::new("price", StorageType::Decimal).option("description", json!("Unit price")),
        )
        .attribute(Attribute::new("stock", StorageType::Integer))
        .attribute(Attribute::new("active", StorageType::Boolean))
        .attribute(Attribute::new("released", StorageType::Date))
        .attribute(Attribute::new("description", StorageType::LongText))
        .attribute(
            Attribute::new("brand", StorageType::EntityReference)
                .relation(["Brand"])
                .option(SERIALIZER_OPTIONS, json!({ "max_depth": 1 })),
        )
        .attribute(Attribute::new("seller", StorageType::EntityReference).relation(["Brand", "Maker"]))
        .attribute(Attribute::new("legacy_location", StorageType::from("geo-point")))
        .label("name")
        .identifier("sku")
        .build()
        .expect("product family");

    let brand = Family::builder("Brand", BRAND_CLASS)
        .attribute(Attribute::new("name", StorageType::ShortText))
        .attribute(Attribute::new("country", StorageType::ShortText))
        .label("name")
        .build()
        .expect("brand family");

    let maker = Family::builder("Maker", MAKER_CLASS)
        .attribute(Attribute::new("name", StorageType::ShortText))
        .label("name")
        .build()
        .expect("maker family");

    FamilyRegistry::new([product, brand, maker]).expect("catalog registry")
}

/// Three products over three brands, two of them French:
///
/// | name | sku | price | brand (country) |
/// |------|-----|-------|-----------------|
/// | Running shoe | SHOE-1 | 19.99 | Acme (FR) |
/// | Leather boot | BOOT-1 | 89.5 | Bottier (FR) |
/// | Sun hat | HAT-1 | 12.0 | Sunny (US) |
pub fn catalog_store() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    let brand = |name: &str, country: &str| {
        DataRecord::new("Brand")
            .with("name", RecordValue::text(name))
            .with("country", RecordValue::text(country))
    };
    let acme = store.insert(brand("Acme", "FR"));
    let bottier = store.insert(brand("Bottier", "FR"));
    let sunny = store.insert(brand("Sunny", "US"));

    let released = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).map(RecordValue::Date);
    let products = [
        ("Running shoe", "SHOE-1", 19.99, 12, true, released(2024, 3, 1), acme),
        ("Leather boot", "BOOT-1", 89.5, 0, false, released(2023, 10, 15), bottier),
        ("Sun hat", "HAT-1", 12.0, 40, true, None, sunny),
    ];
    for (name, sku, price, stock, active, released, brand) in products {
        let mut record = DataRecord::new("Product")
            .with("name", RecordValue::text(name))
            .with("sku", RecordValue::text(sku))
            .with("price", RecordValue::Decimal(price))
            .with("stock", RecordValue::Int(stock))
            .with("active", RecordValue::Bool(active))
            .with("brand", RecordValue::Ref(brand));
        if let Some(released) = released {
            record = record.with("released", released);
        }
        store.insert(record);
    }
    store
}
