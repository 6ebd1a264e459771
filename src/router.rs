//! Fragment router
//!
//! Navigation state is a URL fragment. Parsing is infallible; anything
//! unrecognized lands on Home, and a product route whose id no longer
//! exists in the catalog resolves to Home too.

use crate::catalog::CatalogStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Shop,
    Details(u32),
    Cart,
    Checkout,
    Orders,
    Admin,
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim_start_matches('#');
        match fragment {
            "" | "home" => Self::Home,
            "shop" => Self::Shop,
            "cart" => Self::Cart,
            "checkout" => Self::Checkout,
            "orders" => Self::Orders,
            "admin" => Self::Admin,
            other => other
                .strip_prefix("product-")
                .and_then(|id| id.parse().ok())
                .map_or(Self::Home, Self::Details),
        }
    }

    pub fn fragment(self) -> String {
        match self {
            Self::Home => "#home".to_string(),
            Self::Shop => "#shop".to_string(),
            Self::Details(id) => format!("#product-{id}"),
            Self::Cart => "#cart".to_string(),
            Self::Checkout => "#checkout".to_string(),
            Self::Orders => "#orders".to_string(),
            Self::Admin => "#admin".to_string(),
        }
    }

    /// Product routes must point at a product the catalog actually has.
    pub fn resolve(self, catalog: &CatalogStore) -> Self {
        match self {
            Self::Details(id) if catalog.product(id).is_none() => Self::Home,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    #[test]
    fn parses_known_fragments() {
        assert_eq!(Route::parse("#home"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("shop"), Route::Shop);
        assert_eq!(Route::parse("#product-101"), Route::Details(101));
        assert_eq!(Route::parse("#admin"), Route::Admin);
    }

    #[test]
    fn garbage_falls_back_to_home() {
        assert_eq!(Route::parse("#does-not-exist"), Route::Home);
        assert_eq!(Route::parse("#product-abc"), Route::Home);
        assert_eq!(Route::parse("#product-"), Route::Home);
    }

    #[test]
    fn fragments_round_trip() {
        for route in [
            Route::Home,
            Route::Shop,
            Route::Details(42),
            Route::Cart,
            Route::Checkout,
            Route::Orders,
            Route::Admin,
        ] {
            assert_eq!(Route::parse(&route.fragment()), route);
        }
    }

    #[tokio::test]
    async fn stale_product_ids_resolve_to_home() {
        let gw = MemoryGateway::new();
        crate::catalog::seed_demo_data(&gw).await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;

        assert_eq!(Route::Details(101).resolve(&catalog), Route::Details(101));
        assert_eq!(Route::Details(999).resolve(&catalog), Route::Home);
        assert_eq!(Route::Cart.resolve(&catalog), Route::Cart);
    }
}
