//! Sell-screen form state.
//!
//! [`BookDraft`] mirrors the fields a user fills in before uploading a
//! listing. The photo comes from an [`ImagePicker`] supplied by the platform
//! shell. A draft turns into a [`BookRecord`] only once every required field
//! is filled, and it is cleared only after the store accepted the record.

use std::fmt;

use log::{info, warn};
use thiserror::Error;

use crate::book_record::BookRecord;
use crate::book_store::BookStore;
use crate::storage::KeyValueStorage;
use crate::store_error::{BookStoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Library,
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Camera => write!(f, "camera"),
            ImageSource::Library => write!(f, "photo library"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("access to the {0} is required")]
    PermissionDenied(ImageSource),
}

/// Platform capability that lets the user take or choose a photo.
pub trait ImagePicker {
    /// Yields at most one local URI, or `None` if the user cancelled.
    fn pick(&self, source: ImageSource) -> std::result::Result<Option<String>, PickError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub university: String,
    pub field_of_study: String,
    pub book_title: String,
    pub year: String,
    pub publisher: String,
    pub price: String,
    pub image_uri: Option<String>,

    pub category: String,
    pub subcategory: String,
    pub author: String,
    pub location: String,
    pub postal_code: String,
    pub city: String,
}

impl BookDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks `picker` for a photo and stores its URI on the draft.
    ///
    /// Returns `Ok(true)` if a photo was attached and `Ok(false)` if the user
    /// cancelled. On cancel or denial the current `image_uri` is kept.
    ///
    /// # Errors
    ///
    /// [`BookStoreError::ImagePermissionDenied`] when the platform refused
    /// access; the shell should show the message in an alert.
    pub fn attach_image(&mut self, picker: &dyn ImagePicker, source: ImageSource) -> Result<bool> {
        match picker.pick(source) {
            Ok(Some(uri)) => {
                info!("Attached image from {source}");
                self.image_uri = Some(uri);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                warn!("Image selection failed: {e}");
                Err(BookStoreError::ImagePermissionDenied(e.to_string()))
            }
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.build().missing_fields()
    }

    /// Builds the record this draft describes.
    ///
    /// # Errors
    ///
    /// [`BookStoreError::Validation`] naming every empty required field.
    pub fn to_record(&self) -> Result<BookRecord> {
        let record = self.build();
        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(BookStoreError::Validation(format!(
                "Please fill in all fields: {}",
                missing.join(", ")
            )));
        }
        Ok(record)
    }

    /// Uploads the draft to `store` and clears it on success.
    ///
    /// On any error the draft is left as it was so the user can retry.
    pub fn submit<S: KeyValueStorage>(&mut self, store: &BookStore<S>) -> Result<Vec<BookRecord>> {
        let record = self.to_record()?;
        let books = store.append(record)?;
        self.reset();
        Ok(books)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn build(&self) -> BookRecord {
        BookRecord {
            university: self.university.clone(),
            field_of_study: self.field_of_study.clone(),
            book_title: self.book_title.clone(),
            year: self.year.clone(),
            publisher: self.publisher.clone(),
            price: self.price.clone(),
            image_uri: self.image_uri.clone(),
            category: optional(&self.category),
            subcategory: optional(&self.subcategory),
            author: optional(&self.author),
            location: optional(&self.location),
            postal_code: optional(&self.postal_code),
            city: optional(&self.city),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
