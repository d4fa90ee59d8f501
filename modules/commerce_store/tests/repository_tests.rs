//! Integration tests for the generic repository: reads, list queries,
//! optimistic concurrency and schema status

mod common;

use chrono::{Duration, Utc};
use commerce_store::contract::{
    Coupon, CouponFilter, Order, OrderFilter, OrderStatus, Product, ProductFilter, ProductSortKey,
    User, UserRole,
};
use commerce_store::{ConcurrencyPolicy, ListQuery, Repository, SortDirection, StoreError};
use common::{memory_config, memory_store, memory_store_with, memory_store_with_policy, TestTenants};
use uuid::Uuid;

async fn seed_products(store: &commerce_store::Store, products: &[Product]) {
    let unit = store.begin();
    let repo = unit.repository::<Product>();
    for product in products {
        repo.add(product.clone()).unwrap();
    }
    unit.commit().await.unwrap();
}

fn catalog(tenant_id: Uuid) -> Vec<Product> {
    vec![
        Product::new(tenant_id, "MUG-001", "enamel mug", 1450, "EUR"),
        Product::new(tenant_id, "TEA-010", "green tea", 690, "EUR"),
        Product::new(tenant_id, "MUG-002", "travel mug", 2200, "EUR"),
        Product::new(tenant_id, "POT-001", "tea pot", 3900, "EUR"),
    ]
}

#[tokio::test]
async fn get_missing_entity_reports_kind_and_id() {
    let store = memory_store().await;
    let unit = store.begin();
    let missing = Uuid::new_v4();

    match unit.repository::<Product>().get(&missing).await {
        Err(StoreError::NotFound { entity, id }) => {
            assert_eq!(entity, "product");
            assert_eq!(id, missing.to_string());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_committed_then_disposed() {
    let store = memory_store().await;
    let tenants = TestTenants::new();
    let first = Product::new(tenants.acme, "SKU-1", "first", 100, "USD");
    let second = Product::new(tenants.acme, "SKU-2", "second", 200, "USD");

    let u1 = store.begin();
    u1.repository::<Product>().add(first.clone()).unwrap();
    u1.commit().await.unwrap();
    u1.dispose();

    let u2 = store.begin();
    u2.repository::<Product>().add(second.clone()).unwrap();
    u2.dispose();

    let u3 = store.begin();
    let products = u3.repository::<Product>();
    assert_eq!(products.get(&first.id).await.unwrap(), first);
    assert!(matches!(
        products.get(&second.id).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_filters_by_tenant_and_name() {
    let store = memory_store().await;
    let tenants = TestTenants::new();
    let mut all = catalog(tenants.acme);
    all.push(Product::new(tenants.globex, "MUG-001", "globex mug", 999, "USD"));
    seed_products(&store, &all).await;

    let unit = store.begin();
    let products = unit.repository::<Product>();

    let acme_mugs = products
        .list(&ListQuery::new(ProductFilter {
            tenant_id: Some(tenants.acme),
            name_contains: Some("mug".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(acme_mugs.len(), 2);
    assert!(acme_mugs.iter().all(|p| p.tenant_id == tenants.acme));

    let globex = ProductFilter {
        tenant_id: Some(tenants.globex),
        ..Default::default()
    };
    assert_eq!(products.count(&globex).await.unwrap(), 1);
    assert_eq!(products.count(&ProductFilter::default()).await.unwrap(), 5);
}

#[tokio::test]
async fn list_sorts_and_pages() {
    let store = memory_store().await;
    let tenant = Uuid::new_v4();
    seed_products(&store, &catalog(tenant)).await;

    let unit = store.begin();
    let products = unit.repository::<Product>();

    let by_price = ListQuery::new(ProductFilter::default())
        .sorted_by(ProductSortKey::Price, SortDirection::Desc)
        .paged(2, 0);
    let first_page = products.list(&by_price).await.unwrap();
    let prices: Vec<i64> = first_page.iter().map(|p| p.price_cents).collect();
    assert_eq!(prices, vec![3900, 2200]);

    let second_page = products
        .list(&by_price.clone().paged(2, 2))
        .await
        .unwrap();
    let prices: Vec<i64> = second_page.iter().map(|p| p.price_cents).collect();
    assert_eq!(prices, vec![1450, 690]);

    let by_sku = ListQuery::new(ProductFilter {
        min_price_cents: Some(1000),
        ..Default::default()
    })
    .sorted_by(ProductSortKey::Sku, SortDirection::Asc);
    let skus: Vec<String> = products
        .list(&by_sku)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.sku)
        .collect();
    assert_eq!(skus, vec!["MUG-001", "MUG-002", "POT-001"]);
}

#[tokio::test]
async fn list_caps_limit_at_max_page_size() {
    let mut config = memory_config();
    config.max_page_size = 3;
    let store = memory_store_with(config).await;
    seed_products(&store, &catalog(Uuid::new_v4())).await;

    let unit = store.begin();
    let products = unit.repository::<Product>();

    let capped = products
        .list(&ListQuery::new(ProductFilter::default()).paged(50, 0))
        .await
        .unwrap();
    assert_eq!(capped.len(), 3);

    let empty = products
        .list(&ListQuery::new(ProductFilter::default()).paged(0, 0))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn stale_update_is_a_concurrency_conflict() {
    let store = memory_store().await;
    let product = Product::new(Uuid::new_v4(), "MUG-001", "enamel mug", 1450, "EUR");
    seed_products(&store, std::slice::from_ref(&product)).await;

    let u1 = store.begin();
    let u2 = store.begin();
    let mut renamed = u1.repository::<Product>().get(&product.id).await.unwrap();
    let mut repriced = u2.repository::<Product>().get(&product.id).await.unwrap();

    renamed.name = "speckled mug".to_string();
    u1.repository::<Product>().update(renamed).unwrap();
    u1.commit().await.unwrap();

    repriced.price_cents = 1200;
    u2.repository::<Product>().update(repriced).unwrap();
    match u2.commit().await {
        Err(StoreError::ConcurrencyConflict {
            entity,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(entity, "product");
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }

    let check = store.begin();
    let stored = check.repository::<Product>().get(&product.id).await.unwrap();
    assert_eq!(stored.name, "speckled mug");
    assert_eq!(stored.price_cents, 1450);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn ignore_policy_lets_last_writer_win() {
    let store = memory_store_with_policy(ConcurrencyPolicy::Ignore).await;
    let product = Product::new(Uuid::new_v4(), "MUG-001", "enamel mug", 1450, "EUR");
    seed_products(&store, std::slice::from_ref(&product)).await;

    let mut first = product.clone();
    first.name = "speckled mug".to_string();
    let u1 = store.begin();
    u1.repository::<Product>().update(first).unwrap();
    u1.commit().await.unwrap();

    let mut stale = product.clone();
    stale.price_cents = 1200;
    let u2 = store.begin();
    u2.repository::<Product>().update(stale).unwrap();
    u2.commit().await.unwrap();

    let check = store.begin();
    let stored = check.repository::<Product>().get(&product.id).await.unwrap();
    assert_eq!(stored.name, "enamel mug");
    assert_eq!(stored.price_cents, 1200);
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn update_stamps_updated_at() {
    let store = memory_store().await;
    let product = Product::new(Uuid::new_v4(), "MUG-001", "enamel mug", 1450, "EUR");
    seed_products(&store, std::slice::from_ref(&product)).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let mut changed = product.clone();
    changed.name = "speckled mug".to_string();
    // Caller-supplied timestamps are not trusted.
    changed.updated_at = product.created_at - Duration::days(365);

    let unit = store.begin();
    unit.repository::<Product>().update(changed).unwrap();
    unit.commit().await.unwrap();

    let check = store.begin();
    let stored = check.repository::<Product>().get(&product.id).await.unwrap();
    assert!(stored.updated_at > product.updated_at);
    assert_eq!(stored.created_at, product.created_at);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn update_of_missing_entity_is_not_found() {
    let store = memory_store().await;
    let ghost = Product::new(Uuid::new_v4(), "GHOST-1", "ghost", 100, "EUR");

    let unit = store.begin();
    unit.repository::<Product>().update(ghost).unwrap();
    assert!(matches!(
        unit.commit().await,
        Err(StoreError::NotFound { entity: "product", .. })
    ));
}

#[tokio::test]
async fn order_lifecycle_across_units() {
    let store = memory_store().await;
    let tenants = TestTenants::new();
    let customer = User::new(tenants.acme, "grace@example.com", "Grace", UserRole::Customer);
    let mut order = Order::new(tenants.acme, customer.id, 4350, "EUR");
    order.coupon_code = Some("SPRING-10".to_string());

    let checkout = store.begin();
    checkout.repository::<User>().add(customer.clone()).unwrap();
    checkout.repository::<Order>().add(order.clone()).unwrap();
    checkout.commit().await.unwrap();

    let payment = store.begin();
    let orders = payment.repository::<Order>();
    let mut paid = orders.get(&order.id).await.unwrap();
    assert_eq!(paid.status, OrderStatus::Pending);
    paid.status = OrderStatus::Paid;
    orders.update(paid).unwrap();
    payment.commit().await.unwrap();

    let reporting = store.begin();
    let orders = reporting.repository::<Order>();
    let filter = OrderFilter {
        user_id: Some(customer.id),
        status: Some(OrderStatus::Paid),
        ..Default::default()
    };
    let paid_orders = orders.list(&ListQuery::new(filter)).await.unwrap();
    assert_eq!(paid_orders.len(), 1);
    assert_eq!(paid_orders[0].version, 1);
    assert_eq!(paid_orders[0].coupon_code.as_deref(), Some("SPRING-10"));
}

#[tokio::test]
async fn expired_coupons_are_filtered_by_valid_at() {
    let store = memory_store().await;
    let tenant = Uuid::new_v4();
    let evergreen = Coupon::new(tenant, "WELCOME", 10);
    let mut expired = Coupon::new(tenant, "SPRING-10", 10);
    expired.expires_at = Some(Utc::now() - Duration::days(1));
    let mut upcoming = Coupon::new(tenant, "SUMMER-20", 20);
    upcoming.expires_at = Some(Utc::now() + Duration::days(30));

    let unit = store.begin();
    let coupons = unit.repository::<Coupon>();
    for coupon in [&evergreen, &expired, &upcoming] {
        coupons.add(coupon.clone()).unwrap();
    }
    unit.commit().await.unwrap();

    let check = store.begin();
    let valid = check
        .repository::<Coupon>()
        .count(&CouponFilter {
            tenant_id: Some(tenant),
            valid_at: Some(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(valid, 2);
}

#[tokio::test]
async fn invalid_coupon_is_rejected_before_staging() {
    let store = memory_store().await;
    let unit = store.begin();
    let coupon = Coupon::new(Uuid::new_v4(), "HALF-OFF", 150);

    let err = unit.repository::<Coupon>().add(coupon).unwrap_err();
    match err {
        StoreError::Validation { entity, message } => {
            assert_eq!(entity, "coupon");
            assert!(message.contains("percent_off"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn fresh_store_has_no_pending_migrations() {
    let store = memory_store().await;
    let status = store.migration_status().await.unwrap();

    assert_eq!(
        status.applied,
        vec![
            "m20250301_000001_create_catalog",
            "m20250301_000002_create_orders",
            "m20250301_000003_create_inventory_transactions",
        ]
    );
    assert!(status.pending.is_empty());
    assert!(store.ping().await.is_ok());
}
