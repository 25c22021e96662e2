//! Read-only views over a snapshot of the collections.
//!
//! Nothing here touches storage: callers pass the slice they got from
//! [`CollectionRepository::list`](crate::collection_repository::CollectionRepository::list).

use std::collections::BTreeSet;

use crate::local_db_model::{Product, Review, MAX_RATING};

/// Products whose name or description contains `query` (case-insensitive)
/// and whose category equals `category` exactly. Empty arguments match
/// everything; relative order is kept.
///
/// ```rust
/// use storefront_core::local_db_model::Product;
/// use storefront_core::query_view::search;
///
/// let product = |id: &str, name: &str| Product {
///     id: id.to_string(),
///     name: name.to_string(),
///     category: "Kitchen".to_string(),
///     price: 0.0,
///     description: String::new(),
///     image: String::new(),
/// };
/// let products = vec![product("1", "Dish Soap"), product("2", "Mop")];
///
/// let hits = search(&products, "SOAP", "");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "Dish Soap");
/// ```
pub fn search(products: &[Product], query: &str, category: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .filter(|p| category.is_empty() || p.category == category)
        .cloned()
        .collect()
}

/// Distinct categories, sorted.
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Five-glyph rating, e.g. `★★★★☆` for 4. Out-of-range ratings are clamped.
pub fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// The first `count` products, as shown on the landing page.
pub fn featured(products: &[Product], count: usize) -> Vec<Product> {
    products.iter().take(count).cloned().collect()
}

/// Newest first; reviews are stored in submission order.
pub fn recent_reviews(reviews: &[Review]) -> Vec<Review> {
    reviews.iter().rev().cloned().collect()
}

/// The product a review is about. `None` for company-wide reviews and for
/// reviews whose product has since been deleted.
pub fn review_subject<'a>(review: &Review, products: &'a [Product]) -> Option<&'a Product> {
    if review.is_company_wide() {
        return None;
    }
    products.iter().find(|p| p.id == review.product_id)
}
