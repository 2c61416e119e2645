//! Action bindings for the embedded editor.
//!
//! Pure composition: each supported action is registered on the bridge with
//! a handler that delegates to the matching collaborator. No protocol logic
//! lives here. Re-registering and tearing down are the caller's concern;
//! [`ListenerSet`] only bundles the handles produced by one registration
//! pass.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use framebridge_core::{BridgeError, Result};

use crate::bridge::{ExtensionsBridge, ListenerRegistration};
use crate::collaborators::{
    dummy::{DummyImageGallery, DummyMediaPicker, DummyMergeFieldSource},
    GalleryQuery, ImageGallery, MediaPicker, MergeFieldSource,
};

/// Editor asks the host to open the media library and pick an image.
pub const ACTION_SELECT_IMAGE: &str = "selectImage";
/// Editor asks for the typed merge-field definitions.
pub const ACTION_GET_FIELDS: &str = "getFields";
/// Editor asks for one page of the image gallery.
pub const ACTION_GET_GALLERY: &str = "getGallery";

/// Collaborator wiring for the editor extension actions.
pub struct Extensions {
    gallery: Arc<dyn ImageGallery>,
    fields: Arc<dyn MergeFieldSource>,
    picker: Arc<dyn MediaPicker>,
    gallery_page_size: u32,
}

impl Extensions {
    pub fn new(
        gallery: Arc<dyn ImageGallery>,
        fields: Arc<dyn MergeFieldSource>,
        picker: Arc<dyn MediaPicker>,
        gallery_page_size: u32,
    ) -> Self {
        Self {
            gallery,
            fields,
            picker,
            gallery_page_size,
        }
    }

    /// Dummy-backed wiring for the harness and tests.
    pub fn with_dummies(gallery_page_size: u32) -> Self {
        Self::new(
            Arc::new(DummyImageGallery::default()),
            Arc::new(DummyMergeFieldSource),
            Arc::new(DummyMediaPicker::default()),
            gallery_page_size,
        )
    }

    /// Bind every supported action on `bridge`.
    pub fn register_listeners(&self, bridge: &ExtensionsBridge) -> ListenerSet {
        let mut set = ListenerSet::default();

        let picker = Arc::clone(&self.picker);
        set.push(bridge.register_promise_listener(
            ACTION_SELECT_IMAGE,
            Arc::new(move |_params| {
                let picker = Arc::clone(&picker);
                Box::pin(async move {
                    let image = picker.pick().await?;
                    encode(&image)
                })
            }),
        ));

        let fields = Arc::clone(&self.fields);
        set.push(bridge.register_promise_listener(
            ACTION_GET_FIELDS,
            Arc::new(move |_params| {
                let fields = Arc::clone(&fields);
                Box::pin(async move {
                    let defs = fields.fetch_fields().await?;
                    encode(&defs)
                })
            }),
        ));

        let gallery = Arc::clone(&self.gallery);
        let page_size = self.gallery_page_size;
        set.push(bridge.register_promise_listener(
            ACTION_GET_GALLERY,
            Arc::new(move |params| {
                let gallery = Arc::clone(&gallery);
                Box::pin(async move {
                    let query = parse_query(&params)?;
                    let page = gallery.fetch_page(query, page_size).await?;
                    encode(&page)
                })
            }),
        ));

        set
    }
}

fn parse_query(params: &Value) -> Result<GalleryQuery> {
    GalleryQuery::deserialize(params)
        .map_err(|e| BridgeError::BadEnvelope(format!("invalid gallery parameters: {e}")))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| BridgeError::Internal(format!("encode result: {e}")))
}

/// Registrations made as one batch, destroyable as a unit.
///
/// Convenience aggregator only: the bridge itself has no group
/// unregistration, each handle still detaches individually.
#[derive(Default)]
pub struct ListenerSet {
    regs: Vec<ListenerRegistration>,
}

impl ListenerSet {
    pub fn push(&mut self, reg: ListenerRegistration) {
        self.regs.push(reg);
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Action names bound in this set.
    pub fn actions(&self) -> Vec<&str> {
        self.regs.iter().map(|r| r.action()).collect()
    }

    /// Destroy every registration in the set.
    pub fn destroy_all(self) {
        for reg in self.regs {
            reg.destroy();
        }
    }
}
