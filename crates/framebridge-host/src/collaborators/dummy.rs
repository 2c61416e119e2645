//! Dummy collaborators for the harness and tests.

use async_trait::async_trait;

use framebridge_core::Result;

use super::{
    FieldKind, GalleryImage, GalleryPage, GalleryQuery, ImageGallery, MediaPicker, MergeField,
    MergeFieldSource, SelectedImage,
};

/// Static in-memory gallery with substring search and pagination.
pub struct DummyImageGallery {
    images: Vec<GalleryImage>,
}

impl DummyImageGallery {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self { images }
    }
}

impl Default for DummyImageGallery {
    fn default() -> Self {
        let seed = [
            ("header-wave", "header-wave.png"),
            ("header-plain", "header-plain.png"),
            ("footer-social", "footer-social.png"),
            ("divider-dots", "divider-dots.png"),
            ("logo-square", "logo-square.png"),
        ];
        Self::new(
            seed.iter()
                .map(|(name, file)| GalleryImage {
                    name: (*name).to_string(),
                    url: format!("https://cdn.example/img/{file}"),
                    thumbnail: format!("https://cdn.example/thumb/{file}"),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ImageGallery for DummyImageGallery {
    async fn fetch_page(&self, query: GalleryQuery, page_size: u32) -> Result<GalleryPage> {
        let needle = query.search_term.unwrap_or_default().to_lowercase();
        let matched: Vec<GalleryImage> = self
            .images
            .iter()
            .filter(|img| needle.is_empty() || img.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let page = query.page.unwrap_or(0) as usize;
        let size = page_size.max(1) as usize;
        let start = page.saturating_mul(size);
        let images: Vec<GalleryImage> = matched.iter().skip(start).take(size).cloned().collect();
        let next_page = if start + images.len() < matched.len() {
            Some(page as u32 + 1)
        } else {
            None
        };

        Ok(GalleryPage { images, next_page })
    }
}

/// Fixed campaign merge fields.
#[derive(Default)]
pub struct DummyMergeFieldSource;

#[async_trait]
impl MergeFieldSource for DummyMergeFieldSource {
    async fn fetch_fields(&self) -> Result<Vec<MergeField>> {
        Ok(vec![
            MergeField {
                key: "first_name".into(),
                label: "First name".into(),
                kind: FieldKind::Text,
            },
            MergeField {
                key: "last_name".into(),
                label: "Last name".into(),
                kind: FieldKind::Text,
            },
            MergeField {
                key: "email".into(),
                label: "Email address".into(),
                kind: FieldKind::Text,
            },
            MergeField {
                key: "signup_date".into(),
                label: "Signup date".into(),
                kind: FieldKind::Date,
            },
        ])
    }
}

/// Picker that resolves immediately with a fixed selection, no UI.
pub struct DummyMediaPicker {
    selection: SelectedImage,
}

impl DummyMediaPicker {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            selection: SelectedImage { url: url.into() },
        }
    }
}

impl Default for DummyMediaPicker {
    fn default() -> Self {
        Self::new("https://cdn.example/img/header-wave.png")
    }
}

#[async_trait]
impl MediaPicker for DummyMediaPicker {
    async fn pick(&self) -> Result<SelectedImage> {
        Ok(self.selection.clone())
    }
}
