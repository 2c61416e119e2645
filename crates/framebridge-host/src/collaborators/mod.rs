//! Backend collaborator contracts consumed by the action registrar.
//!
//! The bridge never talks to backends directly; the registrar composes
//! these capabilities into handlers. Production wires REST-backed
//! implementations, the harness and tests use the dummies.

pub mod dummy;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use framebridge_core::Result;

/// One image in the hosted media library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub name: String,
    pub url: String,
    pub thumbnail: String,
}

/// Gallery request: free-text search plus a page cursor.
///
/// Deserialized straight from the request payload, so unknown envelope
/// fields (`action`, `requestId`) must be tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryQuery {
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

/// One page of gallery results.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryPage {
    pub images: Vec<GalleryImage>,
    /// Cursor for the next page; absent on the last one.
    #[serde(rename = "nextPage", skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

/// Typed merge field the editor can insert into campaign content.
#[derive(Debug, Clone, Serialize)]
pub struct MergeField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// Result of a media-library selection.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedImage {
    pub url: String,
}

/// Paginated image gallery lookup.
#[async_trait]
pub trait ImageGallery: Send + Sync {
    async fn fetch_page(&self, query: GalleryQuery, page_size: u32) -> Result<GalleryPage>;
}

/// Source of typed custom-field definitions.
#[async_trait]
pub trait MergeFieldSource: Send + Sync {
    async fn fetch_fields(&self) -> Result<Vec<MergeField>>;
}

/// Presents a media-library UI and resolves with the user's choice.
#[async_trait]
pub trait MediaPicker: Send + Sync {
    async fn pick(&self) -> Result<SelectedImage>;
}
