//! RON site-config loading for the sheetpage binary.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use sheetpage_core::GroupEncoding;
use sheetpage_engine::{SiteConfig, SourceFormat};

/// On-disk shape of the site config. Kept separate from the engine's
/// [`SiteConfig`] so serde and file concerns stay in the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sheet_url: String,
    output_dir: String,
    #[serde(default)]
    source_format: SourceFormatSetting,
    #[serde(default)]
    mount_id: Option<String>,
    #[serde(default)]
    base_origin: Option<String>,
    #[serde(default)]
    cta_fallback_url: Option<String>,
    #[serde(default)]
    stylesheet_url: Option<String>,
    #[serde(default)]
    group_encoding: GroupEncodingSetting,
    #[serde(default)]
    cache_bust: bool,
    #[serde(default)]
    max_fetch_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
enum SourceFormatSetting {
    #[default]
    Csv,
    GvizJson,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
enum GroupEncodingSetting {
    #[default]
    RowPerEntry,
    PackedCell,
}

/// Load and validate a RON site config.
pub fn load(path: &Path) -> anyhow::Result<SiteConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: ConfigFile = ron::from_str(&text).context("parsing RON site config")?;
    if file.sheet_url.trim().is_empty() {
        bail!("sheet_url must not be empty");
    }

    let mut config = SiteConfig::new(file.sheet_url, file.output_dir);
    config.source_format = match file.source_format {
        SourceFormatSetting::Csv => SourceFormat::Csv,
        SourceFormatSetting::GvizJson => SourceFormat::GvizJson,
    };
    if let Some(mount_id) = file.mount_id {
        config.mount_id = mount_id;
    }
    config.base_origin = file.base_origin;
    if let Some(fallback) = file.cta_fallback_url {
        config.cta_fallback_url = fallback;
    }
    config.stylesheet_url = file.stylesheet_url;
    config.group_encoding = match file.group_encoding {
        GroupEncodingSetting::RowPerEntry => GroupEncoding::RowPerEntry,
        GroupEncodingSetting::PackedCell => GroupEncoding::PackedCell,
    };
    config.fetch.cache_bust = file.cache_bust;
    if let Some(max_bytes) = file.max_fetch_bytes {
        config.fetch.max_bytes = max_bytes;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"(
    sheet_url: "https://docs.google.com/spreadsheets/d/e/KEY/pub?output=csv",
    output_dir: "site",
    mount_id: Some("product-root"),
    base_origin: Some("https://shop.example.com"),
    cta_fallback_url: Some("https://shop.example.com/order"),
    stylesheet_url: Some("product-page.css"),
    group_encoding: PackedCell,
    cache_bust: true,
    max_fetch_bytes: Some(1048576),
)"#;

    #[test]
    fn sample_config_loads_and_maps_onto_the_engine() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.output_dir, std::path::PathBuf::from("site"));
        assert_eq!(config.base_origin.as_deref(), Some("https://shop.example.com"));
        assert_eq!(config.group_encoding, GroupEncoding::PackedCell);
        assert!(config.fetch.cache_bust);
        assert_eq!(config.fetch.max_bytes, 1_048_576);
        // Omitted fields keep engine defaults.
        assert_eq!(config.source_format, SourceFormat::Csv);
    }

    #[test]
    fn empty_sheet_url_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"(sheet_url: \" \", output_dir: \"site\")").unwrap();
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load(Path::new("/nonexistent/sheetpage.ron")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/sheetpage.ron"));
    }
}
