//! The pipeline: fetch, decode, bind, render, persist.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use page_logging::{page_error, page_info, page_warn};
use serde_json::json;
use thiserror::Error;
use url::Url;

use sheetpage_core::{
    extract_record, matching_rows, render_error_page, render_not_found, render_product,
    slug_from_path, normalize_key, Column, CtaPolicy, ProductRecord, RenderOptions, Schema,
    SchemaError, Sheet,
};

use crate::assets::{script_href, PAGE_SCRIPT, SCRIPT_FILENAME};
use crate::config::SiteConfig;
use crate::decode::{decode_sheet_text, DecodeError};
use crate::fetch::{Fetcher, SheetFetcher};
use crate::persist::{page_filename, AtomicFileWriter, PersistError};
use crate::source::{parse_source, SourceError};
use crate::types::{
    BuildSummary, BuiltLocation, BuiltPage, FetchError, PageOutcome, ProductStat, RenderedPage,
    SheetReport,
};

/// Error document written during every site build, for the web server to
/// serve when pages themselves are broken or missing.
pub const ERROR_PAGE_FILENAME: &str = "error.html";

/// Machine-readable record of what a build wrote.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Errors that stop an operation. A fetch failure is terminal for the
/// run; the next scheduled build is the retry.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid site configuration: {0}")]
    Config(String),
    #[error("fetching sheet failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A fetched and schema-resolved sheet, ready for any number of pure
/// binding passes.
pub struct LoadedSheet {
    pub sheet: Sheet,
    pub schema: Schema,
    pub source_url: String,
}

/// Binds one configured sheet to rendered pages. Construction validates
/// the config; each operation fetches the sheet once and works from that
/// snapshot.
pub struct SiteBuilder {
    config: SiteConfig,
    fetcher: Arc<dyn Fetcher>,
    cta: CtaPolicy,
    render: RenderOptions,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig) -> Result<Self, BuildError> {
        let fetcher = Arc::new(SheetFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Transport seam for tests and alternative fetchers.
    pub fn with_fetcher(config: SiteConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, BuildError> {
        let base_origin = match &config.base_origin {
            Some(raw) => Some(Url::parse(raw).map_err(|err| {
                BuildError::Config(format!("base_origin {raw:?} is not a valid URL: {err}"))
            })?),
            None => None,
        };
        if config.sheet_url.trim().is_empty() {
            return Err(BuildError::Config("sheet_url is empty".into()));
        }
        let cta = CtaPolicy {
            base_origin,
            fallback_url: config.cta_fallback_url.clone(),
        };
        let render = RenderOptions {
            mount_id: config.mount_id.clone(),
            stylesheet_url: config.stylesheet_url.clone(),
            script_url: Some(script_href()),
        };
        Ok(Self { config, fetcher, cta, render })
    }

    /// Fetch, decode and schema-resolve the sheet. The single IO-in point
    /// of the pipeline; everything downstream of the returned value is
    /// pure.
    pub async fn load_sheet(&self) -> Result<LoadedSheet, BuildError> {
        let output = match self.fetcher.fetch(&self.config.sheet_url).await {
            Ok(output) => output,
            Err(err) => {
                page_error!("sheet fetch failed: {err}");
                return Err(err.into());
            }
        };
        let decoded = decode_sheet_text(&output.bytes, output.metadata.content_type.as_deref())?;
        let rows = parse_source(&decoded.text, self.config.source_format)?;
        let sheet = Sheet::from_rows(rows);
        let schema = Schema::from_headers(sheet.headers())?;
        page_info!(
            "sheet loaded: {} data rows, {} columns, {} bytes as {}",
            sheet.rows().len(),
            sheet.headers().len(),
            output.metadata.byte_len,
            decoded.encoding_label
        );
        Ok(LoadedSheet {
            sheet,
            schema,
            source_url: output.metadata.final_url,
        })
    }

    fn bind(&self, loaded: &LoadedSheet, slug: &str) -> Option<ProductRecord> {
        let rows = matching_rows(&loaded.sheet, &loaded.schema, slug);
        extract_record(&loaded.schema, &rows, slug, self.config.group_encoding, &self.cta)
    }

    fn render_slug(&self, loaded: &LoadedSheet, slug: &str) -> PageOutcome {
        match self.bind(loaded, slug) {
            Some(record) => {
                let html = render_product(&record, &self.render);
                PageOutcome::Rendered(RenderedPage {
                    slug: record.slug,
                    title: record.hero_title,
                    html,
                })
            }
            None => {
                page_warn!("no sheet rows match slug {slug:?}");
                PageOutcome::NotFound {
                    slug: slug.to_string(),
                    html: render_not_found(slug, &self.render),
                }
            }
        }
    }

    /// Render the page for one location path without writing anything.
    /// `NotFound` is an outcome, not an error: the returned document says
    /// so visibly.
    pub async fn render_location(&self, path: &str) -> Result<PageOutcome, BuildError> {
        let loaded = self.load_sheet().await?;
        let slug = slug_from_path(path);
        Ok(self.render_slug(&loaded, &slug))
    }

    /// Render one location and persist the result, together with the
    /// interaction script so the page works standalone.
    pub async fn build_location(&self, path: &str) -> Result<BuiltLocation, BuildError> {
        let outcome = self.render_location(path).await?;
        let writer = AtomicFileWriter::new(self.config.output_dir.clone());
        writer.write(SCRIPT_FILENAME, PAGE_SCRIPT)?;
        let (slug, html) = match &outcome {
            PageOutcome::Rendered(page) => (&page.slug, &page.html),
            PageOutcome::NotFound { slug, html } => (slug, html),
        };
        let path = writer.write(&page_filename(slug), html)?;
        Ok(BuiltLocation { outcome, path })
    }

    /// Build the whole site: one page per distinct slug in the sheet, in
    /// first-appearance order, plus the interaction script, the error
    /// document and a build manifest.
    pub async fn build_site(&self) -> Result<BuildSummary, BuildError> {
        let loaded = self.load_sheet().await?;
        let writer = AtomicFileWriter::new(self.config.output_dir.clone());

        let mut pages = Vec::new();
        for slug in distinct_slugs(&loaded) {
            let Some(record) = self.bind(&loaded, &slug) else {
                continue;
            };
            let html = render_product(&record, &self.render);
            let filename = page_filename(&record.slug);
            writer.write(&filename, &html)?;
            page_info!("built {filename} ({} bytes)", html.len());
            pages.push(BuiltPage {
                slug: record.slug,
                filename,
                title: record.hero_title,
                bytes: html.len() as u64,
            });
        }
        if pages.is_empty() {
            page_warn!("sheet has no usable product rows; only assets were written");
        }

        writer.write(SCRIPT_FILENAME, PAGE_SCRIPT)?;
        writer.write(ERROR_PAGE_FILENAME, &render_error_page(&self.render))?;

        let summary = BuildSummary {
            pages,
            assets: vec![SCRIPT_FILENAME.to_string(), ERROR_PAGE_FILENAME.to_string()],
            output_dir: self.config.output_dir.clone(),
            built_utc: Utc::now().to_rfc3339(),
        };
        writer.write(MANIFEST_FILENAME, &manifest_json(&summary))?;
        page_info!("site build complete: {} pages", summary.pages.len());
        Ok(summary)
    }

    /// Fetch the sheet and report schema and content statistics without
    /// writing anything.
    pub async fn inspect(&self) -> Result<SheetReport, BuildError> {
        let loaded = self.load_sheet().await?;
        let mut products = Vec::new();
        for slug in distinct_slugs(&loaded) {
            let rows = matching_rows(&loaded.sheet, &loaded.schema, &slug);
            let row_count = rows.len();
            let Some(record) =
                extract_record(&loaded.schema, &rows, &slug, self.config.group_encoding, &self.cta)
            else {
                continue;
            };
            products.push(ProductStat {
                slug: record.slug,
                rows: row_count,
                benefits: record.benefits.len(),
                steps: record.steps.len(),
                for_whom: record.for_whom.len(),
                not_for: record.not_for.len(),
                faq: record.faq.len(),
            });
        }
        Ok(SheetReport {
            source_url: loaded.source_url,
            data_rows: loaded.sheet.rows().len(),
            columns: loaded.sheet.headers().len(),
            products,
        })
    }
}

/// Distinct normalized slugs in first-appearance order. Rows with an
/// empty slug cell are filler and never become pages.
fn distinct_slugs(loaded: &LoadedSheet) -> Vec<String> {
    let Some(idx) = loaded.schema.column(Column::Slug) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut slugs = Vec::new();
    for row in loaded.sheet.rows() {
        let key = normalize_key(row.get(idx).map(String::as_str).unwrap_or(""));
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        slugs.push(key);
    }
    slugs
}

fn manifest_json(summary: &BuildSummary) -> String {
    let manifest = json!({
        "generator": "sheetpage",
        "built_utc": summary.built_utc,
        "page_count": summary.pages.len(),
        "pages": summary.pages.iter().map(|page| json!({
            "slug": page.slug,
            "filename": page.filename,
            "title": page.title,
            "bytes": page.bytes,
        })).collect::<Vec<_>>(),
        "assets": summary.assets,
    });
    let mut text = serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| manifest.to_string());
    text.push('\n');
    text
}
