//! Book listing model.
//!
//! [`BookRecord`] is the single entity persisted by the store. Its JSON shape
//! uses camelCase field names so the mobile shell can read and write the same
//! blob. Records written by earlier app revisions carry extra descriptive
//! fields (`category`, `author`, `city`, ...); they are kept as optional
//! fields and written back untouched.

use serde::{Deserialize, Serialize};

/// Categories offered by the older sell screen. Not validated.
pub const LEGACY_CATEGORIES: &[&str] = &[
    "Studiebøger",
    "Fantasy",
    "Romantisk",
    "Thriller",
    "Scifi",
    "Romcom",
    "Krimi",
    "Biografier",
    "Sundhed",
    "Mad og Drikke",
    "Økonomi",
    "Erhverv og ledelse",
];

/// One user-submitted book listing.
///
/// `book_title` identifies a record for deletion but is not unique: two
/// listings may share a title, and removing that title removes both.
///
/// # Examples
///
/// ```rust
/// use flipshelf_core::book_record::BookRecord;
///
/// let record = BookRecord::new(
///     "Aarhus Universitet",
///     "Datalogi",
///     "Introduction to Algorithms",
///     "2009",
///     "MIT Press",
///     "350",
/// );
/// assert!(record.missing_fields().is_empty());
///
/// let json = serde_json::to_string(&record)?;
/// assert!(json.contains("\"bookTitle\":\"Introduction to Algorithms\""));
/// assert!(!json.contains("imageUri"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Missing in rows written before the university picker existed.
    #[serde(default)]
    pub university: String,

    #[serde(default)]
    pub field_of_study: String,

    pub book_title: String,
    pub year: String,
    pub publisher: String,
    pub price: String,

    /// Local device URI of the selected photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl BookRecord {
    /// Builds a record with the canonical required fields and nothing else.
    pub fn new(
        university: impl Into<String>,
        field_of_study: impl Into<String>,
        book_title: impl Into<String>,
        year: impl Into<String>,
        publisher: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            university: university.into(),
            field_of_study: field_of_study.into(),
            book_title: book_title.into(),
            year: year.into(),
            publisher: publisher.into(),
            price: price.into(),
            image_uri: None,
            category: None,
            subcategory: None,
            author: None,
            location: None,
            postal_code: None,
            city: None,
        }
    }

    pub fn with_image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    /// JSON names of the required fields that are empty, in form order.
    ///
    /// Whitespace-only values count as empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("university", &self.university),
            ("fieldOfStudy", &self.field_of_study),
            ("bookTitle", &self.book_title),
            ("year", &self.year),
            ("publisher", &self.publisher),
            ("price", &self.price),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether `university` is one of `allowed`. An empty list allows any.
    pub fn university_allowed(&self, allowed: &[String]) -> bool {
        allowed.is_empty() || allowed.iter().any(|u| *u == self.university)
    }
}
