use serde::Deserialize;

use framebridge_core::protocol::origin::TrustedOrigin;
use framebridge_core::{BridgeError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    pub version: u32,

    #[serde(default)]
    pub editor: EditorSection,

    #[serde(default)]
    pub gallery: GallerySection,
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BridgeError::Config("unsupported config version".into()));
        }
        self.editor.validate()?;
        self.gallery.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorSection {
    /// Origin of the embedded editor; the only sender the bridge trusts.
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

impl EditorSection {
    pub fn validate(&self) -> Result<()> {
        TrustedOrigin::new(&self.origin).map(|_| ())
    }

    /// Compiled trust rule for this section.
    pub fn trusted_origin(&self) -> Result<TrustedOrigin> {
        TrustedOrigin::new(&self.origin)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GallerySection {
    /// Images per gallery page handed to the editor.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl GallerySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.page_size) {
            return Err(BridgeError::Config(
                "gallery.page_size must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}

fn default_origin() -> String {
    "https://editor.unlayer.com".into()
}
fn default_page_size() -> u32 {
    20
}
