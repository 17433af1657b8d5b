use eavapi::config::EavConfig;
use eavapi::query::memory::{MemoryAttribute, MemoryQuery, Predicate};
use eavapi::query::{FilterValue, OrderDirection};
use eavapi::request::RequestContext;
use eavapi::schema::SemanticType;
use eavapi::store::{DataRecord, InMemoryStore, RecordValue};
use eavapi::{EavApi, EavError, ErrorClass};
use std::fs;
use tempfile::TempDir;

const PRODUCT: &str = "App\\Entity\\Product";

const SCHEMA: &str = r#"
[families.Product]
data_class = 'App\Entity\Product'
label = "name"
identifier = "sku"

[families.Product.attributes.name]
type = "short-text"

[families.Product.attributes.sku]
type = "short-text"
required = true

[families.Product.attributes.price]
type = "decimal"

[families.Product.attributes.brand]
type = "entity-reference"
relation = true
options = { allowed_families = ["Brand"] }

[families.Brand]
data_class = 'App\Entity\Brand'
label = "name"

[families.Brand.attributes.name]
type = "short-text"

[families.Brand.attributes.country]
type = "short-text"
"#;

const CONFIG: &str = r#"
schema = "schema.toml"

[filters.price]
kind = "numeric"
properties = ["price"]

[filters.country]
kind = "numeric"
supported_types = ["string"]
properties = ["brand.country"]

[filters.search]
kind = "search"
properties = { name = "", sku = "start" }

[filters.order]
kind = "order"
properties = { price = "", name = "asc" }

[filters.everything]
kind = "numeric"
"#;

fn setup() -> (TempDir, EavApi) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.toml"), SCHEMA).unwrap();
    let config_path = dir.path().join("eavapi.toml");
    fs::write(&config_path, CONFIG).unwrap();

    let config = EavConfig::load(&config_path).unwrap();
    let api = EavApi::from_config(&config).unwrap();
    (dir, api)
}

fn store() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    let acme = store.insert(
        DataRecord::new("Brand")
            .with("name", RecordValue::text("Acme"))
            .with("country", RecordValue::text("FR")),
    );
    let sunny = store.insert(
        DataRecord::new("Brand")
            .with("name", RecordValue::text("Sunny"))
            .with("country", RecordValue::text("US")),
    );
    for (name, sku, price, brand) in [
        ("Running shoe", "SHOE-1", 19.99, acme),
        ("shoe", "SHOE-2", 9.5, sunny),
        ("Sun hat", "HAT-1", 12.0, sunny),
    ] {
        store.insert(
            DataRecord::new("Product")
                .with("name", RecordValue::text(name))
                .with("sku", RecordValue::text(sku))
                .with("price", RecordValue::Decimal(price))
                .with("brand", RecordValue::Ref(brand)),
        );
    }
    store
}

fn names(query: &MemoryQuery<'_>) -> Vec<String> {
    query
        .execute()
        .into_iter()
        .filter_map(|r| r.get("name").and_then(RecordValue::as_text))
        .map(str::to_string)
        .collect()
}

fn attribute(hops: &[&str], family: &str, code: &str) -> MemoryAttribute {
    MemoryAttribute {
        hops: hops.iter().map(|h| h.to_string()).collect(),
        family: family.to_string(),
        attribute: code.to_string(),
    }
}

#[test]
fn test_numeric_equality_on_price() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("?price=19.99");

    api.apply(Some(&request), &mut query, PRODUCT, &["price"], None)
        .unwrap();

    assert_eq!(
        query.conditions(),
        &[Predicate::And(vec![Predicate::Equals {
            target: attribute(&[], "Product", "price"),
            value: FilterValue::Text("19.99".into()),
        }])]
    );
    assert_eq!(names(&query), vec!["Running shoe"]);
}

#[test]
fn test_dotted_path_filters_on_related_family() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("brand.country=FR");

    api.apply(Some(&request), &mut query, PRODUCT, &["country"], None)
        .unwrap();

    assert_eq!(
        query.conditions(),
        &[Predicate::And(vec![Predicate::Equals {
            target: attribute(&["brand"], "Brand", "country"),
            value: FilterValue::Text("FR".into()),
        }])]
    );
    assert_eq!(names(&query), vec!["Running shoe"]);
}

#[test]
fn test_search_exact_strips_wildcards() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("name=%25shoe%25");

    api.apply(Some(&request), &mut query, PRODUCT, &["search"], None)
        .unwrap();

    assert_eq!(
        query.conditions(),
        &[Predicate::And(vec![Predicate::Like {
            target: attribute(&[], "Product", "name"),
            pattern: "shoe".into(),
        }])]
    );
    // Exact: only the product named exactly "shoe".
    assert_eq!(names(&query), vec!["shoe"]);
}

#[test]
fn test_search_start_strategy() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("sku=SHOE");

    api.apply(Some(&request), &mut query, PRODUCT, &["search"], None)
        .unwrap();

    assert_eq!(names(&query), vec!["Running shoe", "shoe"]);
}

#[test]
fn test_order_produces_clause_and_no_conditions() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("order[price]=desc");

    api.apply(Some(&request), &mut query, PRODUCT, &["order"], None)
        .unwrap();

    assert_eq!(query.conditions(), &[Predicate::True]);
    assert_eq!(
        query.ordering(),
        &[(attribute(&[], "Product", "price"), OrderDirection::Desc)]
    );
    assert_eq!(names(&query), vec!["Running shoe", "Sun hat", "shoe"]);
}

#[test]
fn test_order_default_direction_and_unknown_tokens() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("order[name]=&order[price]=sideways");

    api.apply(Some(&request), &mut query, PRODUCT, &["order"], None)
        .unwrap();

    assert_eq!(
        query.ordering(),
        &[(attribute(&[], "Product", "name"), OrderDirection::Asc)]
    );
    assert_eq!(names(&query), vec!["Running shoe", "Sun hat", "shoe"]);
}

#[test]
fn test_filters_combine_under_and() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("sku=SHOE&brand.country=US&order[price]=asc");

    api.apply(
        Some(&request),
        &mut query,
        PRODUCT,
        &["search", "country", "order"],
        Some("get_collection"),
    )
    .unwrap();

    assert_eq!(query.conditions().len(), 3);
    assert_eq!(names(&query), vec!["shoe"]);
}

#[test]
fn test_unknown_property_is_a_client_error() {
    let (_dir, api) = setup();
    let store = store();
    let mut query = api.query(&store, PRODUCT).unwrap();
    let request = RequestContext::from_query_string("colour=red");

    let err = api
        .apply(Some(&request), &mut query, PRODUCT, &["everything"], None)
        .unwrap_err();
    assert!(matches!(err, EavError::UnknownAttribute { .. }));
    assert_eq!(err.class(), ErrorClass::Client);
}

#[test]
fn test_describe_advertises_parameters() {
    let (_dir, api) = setup();
    let description = api
        .describe(PRODUCT, &["price", "country", "search", "order"])
        .unwrap();

    let keys: Vec<_> = description.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "price",
            "price[]",
            "brand.country",
            "brand.country[]",
            "name",
            "name[]",
            "sku",
            "order[price]",
            "order[name]",
        ]
    );
    assert_eq!(description["price"].semantic_type, SemanticType::Float);
    assert_eq!(description["sku"].strategy.as_deref(), Some("start"));
    assert_eq!(description["order[price]"].strategy, None);
    assert_eq!(description["order[name]"].strategy.as_deref(), Some("asc"));

    let json = serde_json::to_value(&description).unwrap();
    assert_eq!(json["price"]["type"], "float");
    assert_eq!(json["price"]["required"], false);
}

#[test]
fn test_find_item_by_identifier_or_id() {
    let (_dir, api) = setup();
    let store = store();

    let item = api.find_item(&store, PRODUCT, "HAT-1").unwrap().unwrap();
    assert_eq!(item.get("name").and_then(RecordValue::as_text), Some("Sun hat"));

    let by_id = api
        .find_item(&store, PRODUCT, &item.id.to_string())
        .unwrap()
        .unwrap();
    assert_eq!(by_id.id, item.id);
}
