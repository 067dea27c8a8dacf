//! Shared application state.

use std::sync::Arc;

use document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
use domain::{
    Brand, BrandChange, BrandMessage, BrandService, EventPublisher, Product, ProductChange,
    ProductService, Variant, VariantChange, VariantService,
};
use sqlx::PgPool;
use tokio::sync::mpsc;

pub type ProductStore = Arc<dyn DocumentStore<Product>>;
pub type VariantStore = Arc<dyn DocumentStore<Variant>>;
pub type BrandStore = Arc<dyn DocumentStore<Brand>>;
pub type Publisher<C> = Arc<dyn EventPublisher<C>>;

pub type Products = ProductService<ProductStore, BrandStore, Publisher<ProductChange>>;
pub type Variants = VariantService<VariantStore, ProductStore, Publisher<VariantChange>>;
pub type Brands = BrandService<BrandStore, Publisher<BrandChange>>;

/// The three document collections.
#[derive(Clone)]
pub struct Stores {
    pub products: ProductStore,
    pub variants: VariantStore,
    pub brands: BrandStore,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryDocumentStore::<Product>::new()),
            variants: Arc::new(InMemoryDocumentStore::<Variant>::new()),
            brands: Arc::new(InMemoryDocumentStore::<Brand>::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            products: Arc::new(PostgresDocumentStore::<Product>::new(pool.clone())),
            variants: Arc::new(PostgresDocumentStore::<Variant>::new(pool.clone())),
            brands: Arc::new(PostgresDocumentStore::<Brand>::new(pool)),
        }
    }
}

/// Outbound event publishers, one per aggregate topic.
#[derive(Clone)]
pub struct Publishers {
    pub products: Publisher<ProductChange>,
    pub variants: Publisher<VariantChange>,
    pub brands: Publisher<BrandChange>,
}

/// Application state shared across all request handlers.
pub struct AppState {
    pub products: Products,
    pub variants: Variants,
    pub brands: Arc<Brands>,
    /// Inbound brand message queue drained by the brand worker.
    pub brand_messages: mpsc::Sender<BrandMessage>,
}

impl AppState {
    pub fn new(
        stores: Stores,
        publishers: Publishers,
        brand_messages: mpsc::Sender<BrandMessage>,
    ) -> Self {
        Self {
            products: ProductService::new(
                stores.products.clone(),
                stores.brands.clone(),
                publishers.products,
            ),
            variants: VariantService::new(stores.variants, stores.products, publishers.variants),
            brands: Arc::new(BrandService::new(stores.brands, publishers.brands)),
            brand_messages,
        }
    }
}
