//! First-run demo data.
//!
//! The `seeded` flag only ever moves from unset to `true`; once set, seeding
//! is a no-op and stored data is left alone.

use log::{debug, info};

use crate::app_response::AppResponse;
use crate::id_generator::IdGenerator;
use crate::key_value_store::{JsonStoreExt, KeyValueStore};
use crate::local_db_model::{Product, Review, PRODUCTS_KEY, REVIEWS_KEY, SEEDED_KEY};

pub fn is_seeded<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool, AppResponse> {
    store.get(SEEDED_KEY, false)
}

/// Writes the demo catalog and reviews unless the store is already seeded.
/// Returns whether anything was written. If the flag cannot be read nothing
/// is written.
pub fn seed_demo_data<S: KeyValueStore + ?Sized>(
    store: &S,
    ids: &IdGenerator,
) -> Result<bool, AppResponse> {
    if is_seeded(store)? {
        debug!("Store already seeded; skipping demo data");
        return Ok(false);
    }

    let products = demo_products(ids);
    let reviews = demo_reviews(ids);
    store.set(PRODUCTS_KEY, &products)?;
    store.set(REVIEWS_KEY, &reviews)?;
    store.set(SEEDED_KEY, &true)?;

    info!(
        "Seeded {} demo products and {} demo reviews",
        products.len(),
        reviews.len()
    );
    Ok(true)
}

fn demo_products(ids: &IdGenerator) -> Vec<Product> {
    [
        (
            "Détergent Vaisselle",
            "Cuisine",
            350.0,
            "Nettoyage puissant et doux pour les mains.",
        ),
        (
            "Lessive Liquide",
            "Linge",
            1200.0,
            "Efficace dès 30°C, senteur fraîche.",
        ),
        (
            "Nettoyant Sol",
            "Maison",
            800.0,
            "Brillance et hygiène pour tous types de sols.",
        ),
    ]
    .into_iter()
    .map(|(name, category, price, description)| Product {
        id: ids.next_id(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        description: description.to_string(),
        image: String::new(),
    })
    .collect()
}

fn demo_reviews(ids: &IdGenerator) -> Vec<Review> {
    [
        ("Nadia", 5, "Produits de très bonne qualité !"),
        ("Amine", 4, "Bon rapport qualité/prix."),
    ]
    .into_iter()
    .map(|(name, rating, text)| Review {
        id: ids.next_id(),
        name: name.to_string(),
        rating,
        text: text.to_string(),
        product_id: String::new(),
    })
    .collect()
}
