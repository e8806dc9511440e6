//! Application state - shared across all handlers.

use std::sync::Arc;

use order_core::ports::{
    Cache, CartStore, CustomerRepository, OrderRepository, PasswordService, ProductRepository,
    RateLimiter, TokenService,
};
use order_core::services::CartService;
use order_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use order_infra::cache::InMemoryCache;
use order_infra::memory::{
    InMemoryCartStore, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryProductRepository,
};
use order_infra::rate_limit::{ClientWindowStore, FixedWindowRateLimiter, RateLimitConfig};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use order_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresCartStore, PostgresCustomerRepository,
    PostgresOrderRepository, PostgresProductRepository,
};

/// Persistence adapters, either all PostgreSQL or all in-memory.
struct Stores {
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartStore>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepository::new()),
            products: Arc::new(InMemoryProductRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
            carts: Arc::new(InMemoryCartStore::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            customers: Arc::new(PostgresCustomerRepository::new(db.clone())),
            products: Arc::new(PostgresProductRepository::new(db.clone())),
            orders: Arc::new(PostgresOrderRepository::new(db.clone())),
            carts: Arc::new(PostgresCartStore::new(db.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub carts: Arc<CartService>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Owned here so the server can start and stop eviction around its run.
    pub client_windows: Arc<ClientWindowStore>,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, stores) = match &config.database {
            Some(db_config) => match connect(db_config, config.run_migrations).await {
                Ok(connections) => {
                    let stores = Stores::postgres(&connections);
                    (Some(connections), stores)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to initialize database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Stores::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Stores::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::info!("Running without postgres feature - using in-memory stores");
            Stores::in_memory()
        };

        let state = Self::assemble(stores, config.rate_limit.clone(), config.jwt.clone());

        tracing::info!(
            requests_per_minute = config.rate_limit.requests_per_minute,
            "Application state initialized"
        );

        #[cfg(feature = "postgres")]
        let state = Self { db, ..state };

        state
    }

    /// State backed entirely by in-memory stores.
    #[cfg(test)]
    pub fn in_memory(rate_limit: RateLimitConfig, jwt: JwtConfig) -> Self {
        Self::assemble(Stores::in_memory(), rate_limit, jwt)
    }

    fn assemble(stores: Stores, rate_limit: RateLimitConfig, jwt: JwtConfig) -> Self {
        let client_windows = Arc::new(ClientWindowStore::default());
        let rate_limiter = Arc::new(FixedWindowRateLimiter::new(
            Arc::clone(&client_windows),
            rate_limit,
        ));
        let carts = Arc::new(CartService::new(stores.carts, Arc::clone(&stores.products)));

        Self {
            customers: stores.customers,
            products: stores.products,
            orders: stores.orders,
            carts,
            cache: Arc::new(InMemoryCache::new()),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter,
            client_windows,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect(
    config: &DatabaseConfig,
    run_migrations: bool,
) -> Result<DatabaseConnections, migration::DbErr> {
    use migration::{Migrator, MigratorTrait};

    let connections = DatabaseConnections::init(config).await?;
    if run_migrations {
        Migrator::up(&connections.main, None).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(connections)
}
