//! Site configuration: everything binding one sheet to one set of pages.

use std::path::PathBuf;

use sheetpage_core::GroupEncoding;

use crate::source::SourceFormat;
use crate::types::FetchSettings;

/// Deployment-level settings for the pipeline. One value of this drives
/// every operation; nothing else is read from the environment.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Published sheet endpoint, CSV export or gviz JSON.
    pub sheet_url: String,
    pub source_format: SourceFormat,
    /// Directory pages, assets and the manifest are written into.
    pub output_dir: PathBuf,
    /// id of the element page content mounts under.
    pub mount_id: String,
    /// Origin relative CTA targets are joined against, e.g.
    /// `https://shop.example.com`.
    pub base_origin: Option<String>,
    /// CTA target used when the sheet value is empty or unusable.
    pub cta_fallback_url: String,
    /// Stylesheet link injected into every page head.
    pub stylesheet_url: Option<String>,
    /// How repeated groups are encoded in this sheet.
    pub group_encoding: GroupEncoding,
    pub fetch: FetchSettings,
}

impl SiteConfig {
    pub fn new(sheet_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            source_format: SourceFormat::default(),
            output_dir: output_dir.into(),
            mount_id: "product-root".to_string(),
            base_origin: None,
            cta_fallback_url: String::new(),
            stylesheet_url: None,
            group_encoding: GroupEncoding::default(),
            fetch: FetchSettings::default(),
        }
    }
}
