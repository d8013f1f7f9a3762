//! # FlipShelf Core
//!
//! Native storage core for the FlipShelf used-book marketplace app. Book
//! listings are kept as one JSON array under a single key of on-device
//! storage (LMDB), and the mobile shell drives the store through a small
//! C-compatible interface.
//!
//! ## Features
//!
//! - **Single-key persistence**: the whole listing collection is one JSON value,
//!   readable by any shell that knows the `BookRecord` shape
//! - **Single-writer queue**: overlapping uploads and deletes never lose a listing
//! - **Loud corruption**: damaged stored data is reported, never read as "no books"
//! - **Legacy tolerant**: rows written by older app revisions still load
//!
//! ## Quick Start
//!
//! ```no_run
//! use flipshelf_core::{append_book, create_store, free_response, load_books};
//! use std::ffi::CString;
//!
//! let name = CString::new("flipshelf").unwrap();
//! let store = create_store(name.as_ptr());
//!
//! let json = CString::new(r#"{
//!     "university": "Aarhus Universitet",
//!     "fieldOfStudy": "Datalogi",
//!     "bookTitle": "Introduction to Algorithms",
//!     "year": "2009",
//!     "publisher": "MIT Press",
//!     "price": "350"
//! }"#).unwrap();
//! let response = append_book(store, json.as_ptr());
//! free_response(response);
//!
//! let all = load_books(store);
//! free_response(all);
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_store`] - Open the on-device store by name
//! - [`create_store_with_config`] - Open the store from a JSON [`StoreConfig`]
//! - [`load_books`] - Read every listing
//! - [`append_book`] - Add a listing
//! - [`remove_books`] - Remove every listing with a given title
//! - [`close_store`] - Close the store and release the handle
//! - [`free_response`] - Release a response string
//!
//! `load_books`, `append_book`, `remove_books` and `close_store` return a JSON
//! [`AppResponse`] string owned by the caller.

pub mod book_record;
pub mod book_store;
pub mod listing_form;
pub mod storage;
pub mod store_config;
pub mod store_error;
mod app_response;

pub use crate::app_response::AppResponse;
pub use crate::book_record::BookRecord;
pub use crate::book_store::BookStore;
pub use crate::store_config::{StoreConfig, ValidationMode};
pub use crate::store_error::{BookStoreError, StorageFault};

use log::{info, warn};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Opens the on-device book store with the given name.
///
/// The LMDB environment lives in the directory `<name>.lmdb`, which is
/// created if missing. Listings are stored under the `"books"` key with
/// strict validation.
///
/// # Returns
///
/// A pointer to the store, or null on failure. Release it with
/// [`close_store`].
///
/// # Errors
///
/// Returns null pointer if:
/// - Input name pointer is null
/// - Input string contains invalid UTF-8
/// - The environment can't be opened
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store(name: *const c_char) -> *mut BookStore {
    if name.is_null() {
        warn!("Null name pointer passed to create_store");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_store(&StoreConfig::new(name_str))
}

/// Opens the book store from a JSON-encoded [`StoreConfig`].
///
/// ```json
/// { "name": "flipshelf", "storage_key": "books", "validation": "lenient" }
/// ```
///
/// Returns null on a null pointer, invalid UTF-8, malformed JSON or an
/// environment that can't be opened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store_with_config(config_ptr: *const c_char) -> *mut BookStore {
    if config_ptr.is_null() {
        warn!("Null config pointer passed to create_store_with_config");
        return std::ptr::null_mut();
    }

    let config_str = match unsafe { CStr::from_ptr(config_ptr).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match serde_json::from_str::<StoreConfig>(config_str) {
        Ok(config) => open_store(&config),
        Err(e) => {
            warn!("Invalid store config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_store(config: &StoreConfig) -> *mut BookStore {
    info!("Attempting to open book store at: {}", config.lmdb_dir().display());

    match BookStore::open(config) {
        Ok(store) => {
            info!("Book store opened, key '{}'", store.storage_key());
            Box::into_raw(Box::new(store))
        }
        Err(e) => {
            warn!("Failed to open book store: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Reads every listing.
///
/// On success the response is `{"Ok": "<JSON array of books>"}`; a store with
/// no listings yet answers with an empty array. Damaged stored data answers
/// with `DataCorruptionError`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn load_books(state: *mut BookStore) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to load_books".to_string());
            return response_to_c_string(&error);
        }
    };

    books_response(store.load())
}

/// Adds a listing and answers with the full updated list.
///
/// `json_ptr` holds one book in the camelCase JSON shape of [`BookRecord`].
/// Records with empty required fields are answered with `ValidationError`
/// unless the store was opened in lenient mode.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn append_book(state: *mut BookStore, json_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to append_book".to_string());
            return response_to_c_string(&error);
        }
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(error_ptr) => return error_ptr,
    };

    let record: BookRecord = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => return response_to_c_string(&AppResponse::from(e)),
    };

    books_response(store.append(record))
}

/// Removes every listing titled exactly `title_ptr` and answers with the
/// remaining list. A title that matches nothing is not an error.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn remove_books(state: *mut BookStore, title_ptr: *const c_char) -> *const c_char {
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to remove_books".to_string());
            return response_to_c_string(&error);
        }
    };

    let title = match c_ptr_to_string(title_ptr, "title") {
        Ok(title) => title,
        Err(error_ptr) => return error_ptr,
    };

    books_response(store.remove(&title))
}

/// Closes the store and frees the handle.
///
/// The pointer must not be used afterwards. Useful before a hot restart so
/// the LMDB environment is released before it is reopened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_store(state: *mut BookStore) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_store".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(state) });
    info!("Book store closed");

    response_to_c_string(&AppResponse::success("Store closed successfully"))
}

/// Frees a string returned by any function of this library. Null is ignored.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

fn books_response(result: Result<Vec<BookRecord>, BookStoreError>) -> *const c_char {
    let response = match result {
        Ok(books) => match serde_json::to_string(&books) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::BadRequest(format!("Failed to serialize books: {e}")),
        },
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Serializes `response` to JSON and hands ownership to the caller as a C
/// string. Returns null if serialization fails.
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

/// Converts a C string pointer to a Rust String.
///
/// On a null pointer or invalid UTF-8 the error side carries a ready-made
/// `BadRequest` response naming `field_name`.
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
