//! The operations a storefront front end calls: admin product edits, review
//! submission, catalog search and first-run seeding, over one injected store.

use log::info;

use crate::app_response::AppResponse;
use crate::collection_repository::{CollectionRepository, Products, Reviews};
use crate::id_generator::IdGenerator;
use crate::key_value_store::KeyValueStore;
use crate::local_db_model::{Product, ProductDraft, Review, ReviewDraft};
use crate::local_db_state::AppDbState;
use crate::query_view;
use crate::seed_initializer;
use crate::store_config::StoreConfig;

/// Number of products on the landing page.
pub const FEATURED_COUNT: usize = 3;

pub struct Storefront<S> {
    store: S,
    ids: IdGenerator,
}

impl<S: KeyValueStore> Storefront<S> {
    pub fn new(store: S) -> Self {
        Self::with_id_generator(store, IdGenerator::new())
    }

    pub fn with_id_generator(store: S, ids: IdGenerator) -> Self {
        Self { store, ids }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    pub fn products(&self) -> Products<'_, S> {
        CollectionRepository::new(&self.store)
    }

    pub fn reviews(&self) -> Reviews<'_, S> {
        CollectionRepository::new(&self.store)
    }

    pub fn seed(&self) -> Result<bool, AppResponse> {
        seed_initializer::seed_demo_data(&self.store, &self.ids)
    }

    /// Creates or fully replaces a product from admin form input.
    pub fn submit_product(&self, draft: ProductDraft) -> Result<Product, AppResponse> {
        let product = draft.into_product(|| self.ids.next_id())?;
        self.products().upsert(product)
    }

    pub fn delete_product(&self, id: &str) -> Result<bool, AppResponse> {
        self.products().remove(id)
    }

    /// Stores a new review under a freshly generated id.
    pub fn submit_review(&self, draft: ReviewDraft) -> Result<Review, AppResponse> {
        let review = draft.into_review(self.ids.next_id())?;
        self.reviews().append(review)
    }

    pub fn delete_review(&self, id: &str) -> Result<bool, AppResponse> {
        self.reviews().remove(id)
    }

    pub fn search(&self, query: &str, category: &str) -> Result<Vec<Product>, AppResponse> {
        Ok(query_view::search(&self.products().list()?, query, category))
    }

    pub fn categories(&self) -> Result<Vec<String>, AppResponse> {
        Ok(query_view::categories(&self.products().list()?))
    }

    pub fn featured(&self) -> Result<Vec<Product>, AppResponse> {
        Ok(query_view::featured(&self.products().list()?, FEATURED_COUNT))
    }

    pub fn recent_reviews(&self) -> Result<Vec<Review>, AppResponse> {
        Ok(query_view::recent_reviews(&self.reviews().list()?))
    }
}

impl Storefront<AppDbState> {
    /// Opens the on-disk store and, if configured, seeds it on first run.
    pub fn open(config: &StoreConfig) -> Result<Self, AppResponse> {
        let storefront = Self::new(AppDbState::open(config)?);
        if config.seed_on_open && storefront.seed()? {
            info!("Initialized demo data for '{}'", config.name);
        }
        Ok(storefront)
    }

    pub fn close(self) -> Result<(), AppResponse> {
        self.store.close_database()
    }
}
