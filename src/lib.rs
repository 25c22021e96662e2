//! # Storefront Core
//!
//! Local persistence for a small storefront: a product catalog, a review
//! board and the admin operations over them. Everything lives in a handful of
//! JSON values under string keys, stored in LMDB on disk or in memory.
//!
//! ## Layout
//!
//! - [`key_value_store`] - raw text backends plus typed `get`/`try_get`/`set`
//! - [`local_db_state`] - the LMDB backend
//! - [`collection_repository`] - list/save/upsert/append/remove over one collection
//! - [`id_generator`] - opaque random record ids
//! - [`query_view`] - search, category list, star ratings
//! - [`seed_initializer`] - first-run demo data
//! - [`storefront`] - form submissions wired to the pieces above
//!
//! ## Quick Start
//!
//! ```rust
//! use storefront_core::key_value_store::MemoryStore;
//! use storefront_core::local_db_model::ProductDraft;
//! use storefront_core::storefront::Storefront;
//!
//! let shop = Storefront::new(MemoryStore::new());
//! shop.submit_product(ProductDraft {
//!     name: "Dish Soap".to_string(),
//!     category: "Kitchen".to_string(),
//!     price: 350.0,
//!     ..ProductDraft::default()
//! })?;
//!
//! assert_eq!(shop.search("soap", "")?.len(), 1);
//! assert_eq!(shop.categories()?, vec!["Kitchen".to_string()]);
//! # Ok::<(), storefront_core::app_response::AppResponse>(())
//! ```
//!
//! ## FFI Functions
//!
//! Every function below returns a heap-allocated C string holding a
//! serialized [`AppResponse`], e.g. `{"Ok":"[...]"}` or
//! `{"NotFound":"..."}`. Release it with [`free_response`].
//!
//! - [`create_db`] / [`create_db_with_config`] - open a store handle
//! - [`get_products`], [`get_product`], [`search_products`], [`get_categories`],
//!   [`get_featured_products`]
//! - [`upsert_product`], [`delete_product`]
//! - [`get_reviews`], [`get_recent_reviews`], [`post_review`], [`delete_review`]
//! - [`seed_demo_data`], [`generate_id`]
//! - [`close_database`] - flush and release the handle

pub mod app_response;
pub mod collection_repository;
pub mod id_generator;
pub mod key_value_store;
pub mod local_db_model;
pub mod local_db_state;
pub mod query_view;
pub mod seed_initializer;
pub mod store_config;
pub mod storefront;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::id_generator::IdGenerator;
use crate::local_db_model::{ProductDraft, ReviewDraft};
use crate::local_db_state::AppDbState;
use crate::store_config::StoreConfig;
use crate::storefront::Storefront;

/// Opaque handle passed across the FFI boundary.
pub type StoreHandle = Storefront<AppDbState>;

/// Opens (or creates) the store `<name>.lmdb` with default settings and
/// seeds demo data on first run.
///
/// Returns a null pointer if `name` is null, not UTF-8, or the store cannot
/// be opened. A non-null handle must eventually be passed to
/// [`close_database`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db(name: *const c_char) -> *mut StoreHandle {
    if name.is_null() {
        warn!("Null name pointer passed to create_db");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_handle(&StoreConfig::new(name_str))
}

/// Opens a store from a JSON [`StoreConfig`], e.g.
/// `{"name":"shop","map_size":1048576,"seed_on_open":false}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db_with_config(config_ptr: *const c_char) -> *mut StoreHandle {
    if config_ptr.is_null() {
        warn!("Null config pointer passed to create_db_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_ptr).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match StoreConfig::from_json(json) {
        Ok(config) => open_handle(&config),
        Err(e) => {
            warn!("Rejected store configuration: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_handle(config: &StoreConfig) -> *mut StoreHandle {
    info!("Attempting to open store at: {}", config.lmdb_dir());
    match Storefront::open(config) {
        Ok(storefront) => {
            info!("✅ Store initialized successfully");
            Box::into_raw(Box::new(storefront))
        }
        Err(e) => {
            warn!("❌ Failed to initialize store: {e}");
            warn!("Attempted path: {}", config.lmdb_dir());
            std::ptr::null_mut()
        }
    }
}

/// Returns every product, in stored order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_products(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "get_products") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.products().list())
}

/// Returns one product, or `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_product(state: *mut StoreHandle, id: *const c_char) -> *const c_char {
    let state = match borrow_state(state, "get_product") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    match state.products().find(&id_str) {
        Ok(Some(product)) => json_response(Ok(product)),
        Err(e) => response_to_c_string(&e),
        Ok(None) => response_to_c_string(&AppResponse::NotFound(format!(
            "No product found with id: {id_str}"
        ))),
    }
}

/// Filters products by a case-insensitive text query and an exact category.
/// Either string may be empty to disable that filter.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn search_products(
    state: *mut StoreHandle,
    query: *const c_char,
    category: *const c_char,
) -> *const c_char {
    let state = match borrow_state(state, "search_products") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let query = match c_ptr_to_string(query, "query") {
        Ok(q) => q,
        Err(error_ptr) => return error_ptr,
    };
    let category = match c_ptr_to_string(category, "category") {
        Ok(c) => c,
        Err(error_ptr) => return error_ptr,
    };

    json_response(state.search(&query, &category))
}

/// Returns the sorted, distinct product categories.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_categories(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "get_categories") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.categories())
}

/// Returns the first few products for the landing page.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_featured_products(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "get_featured_products") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.featured())
}

/// Creates or replaces a product from a JSON [`ProductDraft`].
///
/// ```json
/// { "id": "optional", "name": "Dish Soap", "category": "Kitchen",
///   "price": 350, "description": "", "image": "" }
/// ```
///
/// Omitting `id` (or sending an empty one) creates a new product. The
/// stored product, with its id, is returned.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn upsert_product(state: *mut StoreHandle, json_ptr: *const c_char) -> *const c_char {
    let state = match borrow_state(state, "upsert_product") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let draft: ProductDraft = match serde_json::from_str(&json_str) {
        Ok(d) => d,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    json_response(state.submit_product(draft))
}

/// Deletes a product. Deleting an unknown id yields `NotFound` and leaves the
/// catalog untouched.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_product(state: *mut StoreHandle, id: *const c_char) -> *const c_char {
    let state = match borrow_state(state, "delete_product") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    deletion_response(state.delete_product(&id_str), "product", &id_str)
}

/// Returns every review, in submission order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_reviews(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "get_reviews") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.reviews().list())
}

/// Returns every review, newest first.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_recent_reviews(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "get_recent_reviews") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.recent_reviews())
}

/// Stores a review from a JSON [`ReviewDraft`]:
/// `{"name":"Nadia","rating":5,"text":"...","productId":""}`.
///
/// Blank names or texts and ratings outside 1..=5 yield `ValidationError`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn post_review(state: *mut StoreHandle, json_ptr: *const c_char) -> *const c_char {
    let state = match borrow_state(state, "post_review") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let draft: ReviewDraft = match serde_json::from_str(&json_str) {
        Ok(d) => d,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    json_response(state.submit_review(draft))
}

/// Deletes a review. Unknown ids yield `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_review(state: *mut StoreHandle, id: *const c_char) -> *const c_char {
    let state = match borrow_state(state, "delete_review") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(error_ptr) => return error_ptr,
    };

    deletion_response(state.delete_review(&id_str), "review", &id_str)
}

/// Seeds demo data if the store has never been seeded. The payload is
/// `true` when data was written and `false` when seeding was skipped.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn seed_demo_data(state: *mut StoreHandle) -> *const c_char {
    let state = match borrow_state(state, "seed_demo_data") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    json_response(state.seed())
}

/// Returns a fresh opaque id as the `Ok` payload.
#[no_mangle]
pub extern "C" fn generate_id() -> *const c_char {
    response_to_c_string(&AppResponse::Ok(IdGenerator::new().next_id()))
}

/// Flushes and releases a handle returned by [`create_db`]. The pointer must
/// not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_database(state: *mut StoreHandle) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_database".to_string());
        return response_to_c_string(&error);
    }

    let storefront = unsafe { Box::from_raw(state) };
    match storefront.close() {
        Ok(()) => {
            let success = AppResponse::Ok("Database connection closed successfully".to_string());
            response_to_c_string(&success)
        }
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function in this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr as *mut c_char));
    }
}

fn borrow_state<'a>(state: *mut StoreHandle, caller: &str) -> Result<&'a StoreHandle, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(s) => Ok(s),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Serializes a successful payload into `AppResponse::Ok`, or passes the
/// error through.
fn json_response<T: Serialize>(result: Result<T, AppResponse>) -> *const c_char {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
            Err(e) => {
                let error = AppResponse::SerializationError(format!("Failed to serialize result: {e}"));
                response_to_c_string(&error)
            }
        },
        Err(e) => response_to_c_string(&e),
    }
}

fn deletion_response(result: Result<bool, AppResponse>, kind: &str, id: &str) -> *const c_char {
    match result {
        Ok(true) => response_to_c_string(&AppResponse::Ok(format!("Deleted {kind} {id}"))),
        Ok(false) => response_to_c_string(&AppResponse::NotFound(format!(
            "No {kind} found with id: {id}"
        ))),
        Err(e) => response_to_c_string(&e),
    }
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String, reporting null pointers and
/// invalid UTF-8 as a ready-made `BadRequest` response.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
