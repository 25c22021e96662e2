//! Record types for the two stored collections.
//!
//! Both collections are JSON arrays under a single key ([`PRODUCTS_KEY`] and
//! [`REVIEWS_KEY`]). String fields missing from stored JSON decode as empty
//! strings and a missing or `null` price as 0. Fields that cannot be coerced
//! (a review without a rating, a negative price) fail [`Record::validate`]
//! and never reach callers.

use serde::{Deserialize, Deserializer, Serialize};

use crate::app_response::AppResponse;

pub const PRODUCTS_KEY: &str = "products";
pub const REVIEWS_KEY: &str = "reviews";
pub const SEEDED_KEY: &str = "seeded";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A record stored in a [`CollectionRepository`](crate::collection_repository::CollectionRepository).
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone {
    /// Storage key of the collection this record belongs to.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Checks the invariants that serde alone cannot express.
    fn validate(&self) -> Result<(), AppResponse>;
}

/// A catalog entry.
///
/// ```rust
/// use storefront_core::local_db_model::{Product, Record};
///
/// let product: Product = serde_json::from_str(r#"{"id":"a","name":"Soap","price":350}"#)?;
/// assert_eq!(product.category, "");
/// assert!(product.validate().is_ok());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Absent or `null` prices (a blank price field stores `null`) read as 0.
    #[serde(default, deserialize_with = "price_or_zero")]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    /// Image URL, empty when the product has no picture.
    #[serde(default)]
    pub image: String,
}

impl Record for Product {
    const COLLECTION: &'static str = PRODUCTS_KEY;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppResponse> {
        validate_id(&self.id, "Product")?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppResponse::ValidationError(format!(
                "Product '{}' has invalid price {}",
                self.id, self.price
            )));
        }
        Ok(())
    }
}

/// A customer review. An empty `product_id` marks a company-wide review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "productId", default)]
    pub product_id: String,
}

impl Review {
    pub fn is_company_wide(&self) -> bool {
        self.product_id.is_empty()
    }
}

impl Record for Review {
    const COLLECTION: &'static str = REVIEWS_KEY;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), AppResponse> {
        validate_id(&self.id, "Review")?;
        validate_rating(self.rating)
    }
}

fn price_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn validate_id(id: &str, kind: &str) -> Result<(), AppResponse> {
    if id.trim().is_empty() {
        return Err(AppResponse::ValidationError(format!("{kind} id cannot be empty")));
    }
    Ok(())
}

fn validate_rating(rating: u8) -> Result<(), AppResponse> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppResponse::ValidationError(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Admin form input for creating or editing a product.
///
/// An absent or blank `id` means "new product"; a fresh id is assigned on
/// submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "price_or_zero")]
    pub price: f64,
    pub description: String,
    pub image: String,
}

impl ProductDraft {
    /// Trims every text field and resolves the id, calling `new_id` only when
    /// the draft has none.
    pub fn into_product(self, new_id: impl FnOnce() -> String) -> Result<Product, AppResponse> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_id(),
        };
        let product = Product {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
        };
        product.validate()?;
        Ok(product)
    }
}

/// Public form input for posting a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDraft {
    pub name: String,
    pub rating: u8,
    pub text: String,
    #[serde(rename = "productId")]
    pub product_id: String,
}

impl ReviewDraft {
    /// Rejects drafts with a blank name or text, or a rating outside 1..=5.
    pub fn into_review(self, id: String) -> Result<Review, AppResponse> {
        let name = self.name.trim();
        let text = self.text.trim();
        if name.is_empty() {
            return Err(AppResponse::ValidationError("Reviewer name is required".to_string()));
        }
        if text.is_empty() {
            return Err(AppResponse::ValidationError("Review text is required".to_string()));
        }
        validate_rating(self.rating)?;

        let review = Review {
            id,
            name: name.to_string(),
            rating: self.rating,
            text: text.to_string(),
            product_id: self.product_id.trim().to_string(),
        };
        review.validate()?;
        Ok(review)
    }
}
