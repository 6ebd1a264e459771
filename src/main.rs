//! Flamemart demo - exercises the storefront core end to end against the
//! in-memory gateway.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flamemart::admin::{AdminContext, InventoryEditor};
use flamemart::catalog::seed_demo_data;
use flamemart::fallback::SiteConfig;
use flamemart::{place_order, Cart, CatalogStore, CheckoutDetails, MemoryGateway, Route};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let admin_email =
        std::env::var("FLAMEMART_ADMIN_EMAIL").unwrap_or_else(|_| "admin@flamemart.example".into());
    let admin_password =
        std::env::var("FLAMEMART_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".into());

    let gateway = MemoryGateway::new();
    gateway.add_account(&admin_email, &admin_password).await;
    seed_demo_data(&gateway).await;

    let site = SiteConfig::default();
    tracing::info!(
        banners = site.hero_banner.len(),
        marquee_speed = site.hot_deals_speed,
        "site chrome configured"
    );

    let mut catalog = CatalogStore::new();
    catalog.refresh(&gateway).await;
    tracing::info!(
        products = catalog.products().len(),
        categories = catalog.categories().len(),
        "catalog loaded"
    );

    for deal in catalog.hot_deals() {
        tracing::info!(
            product = %deal.name,
            title = %deal.hot_deal_title,
            from = %deal.first_price(),
            "hot deal"
        );
    }

    // a shopper browses to a product and fills a cart
    let route = Route::parse("#product-101").resolve(&catalog);
    tracing::info!(?route, "navigated");
    let chatgpt = catalog
        .product(101)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("demo product missing"))?;

    let mut cart = Cart::new();
    cart.add(&chatgpt, 0)?;
    cart.add(&chatgpt, 0)?;
    tracing::info!(count = cart.count(), total = %cart.total(), "cart ready");

    let order = place_order(
        &gateway,
        &mut catalog,
        &mut cart,
        &CheckoutDetails {
            customer_name: "Demo Customer".into(),
            customer_phone: "01700-000000".into(),
            customer_email: "customer@example.com".into(),
            payment_method: "bKash".into(),
            transaction_id: "TXN-DEMO-1".into(),
        },
    )
    .await?;
    tracing::info!(order = %order.id, total = %order.total, "order placed");

    // the admin exhausts a tier and the storefront reflects it
    let admin = AdminContext::sign_in(&gateway, &admin_email, &admin_password).await?;
    let mut inventory = InventoryEditor::new();
    inventory.set_stock(&catalog, 102, 0, 0);
    inventory.save(&admin, &gateway, &mut catalog, 102).await?;
    tracing::info!(
        stock_out = catalog.product(102).map(|p| p.stock_out).unwrap_or_default(),
        "midjourney after sell-out"
    );
    admin.sign_out(&gateway).await?;

    Ok(())
}
