use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sheetpage_core::GroupEncoding;
use sheetpage_engine::{
    BuildError, FetchError, FetchMetadata, FetchOutput, Fetcher, PageOutcome, SiteBuilder,
    SiteConfig, SourceFormat, PAGE_SCRIPT,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves one canned payload, no HTTP involved.
struct StaticFetcher {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl StaticFetcher {
    fn csv(text: &str) -> Arc<Self> {
        Arc::new(Self {
            bytes: text.as_bytes().to_vec(),
            content_type: "text/csv; charset=utf-8",
        })
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        Ok(FetchOutput {
            bytes: self.bytes.clone(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some(self.content_type.to_string()),
                byte_len: self.bytes.len() as u64,
            },
        })
    }
}

const SHEET: &str = "\u{feff}Slug,Hero Title,Hero Subtitle,CTA Label,CTA URL,Intro,Benefit Title,Benefit Body,FAQ Question,FAQ Answer\n\
sermorelin,Sermorelin,Growth support,Order now,/order,\"First.\n\nSecond.\",Sleep,Deeper sleep,Is it safe?,Yes.\n\
sermorelin,,,,,,Recovery,Faster recovery,,\n\
bpc-157,BPC-157,,,,,Healing,Gut healing,,\n";

fn config_for(dir: &std::path::Path) -> SiteConfig {
    let mut config = SiteConfig::new("https://sheets.example.com/pub?output=csv", dir);
    config.base_origin = Some("https://shop.example.com".to_string());
    config.cta_fallback_url = "https://shop.example.com/order".to_string();
    config.stylesheet_url = Some("site.css".to_string());
    config
}

#[tokio::test]
async fn build_site_writes_pages_assets_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder =
        SiteBuilder::with_fetcher(config_for(dir.path()), StaticFetcher::csv(SHEET)).expect("builder");

    let summary = builder.build_site().await.expect("build ok");

    let slugs: Vec<&str> = summary.pages.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["sermorelin", "bpc-157"]);

    let sermorelin = fs::read_to_string(dir.path().join("sermorelin.html")).expect("page written");
    assert!(sermorelin.contains("Deeper sleep"));
    // The second matching row feeds the same page.
    assert!(sermorelin.contains("Faster recovery"));
    assert!(sermorelin.contains("href=\"https://shop.example.com/order\""));
    assert!(sermorelin.contains("src=\"product-page.js?v="));
    assert!(sermorelin.contains("<link rel=\"stylesheet\" href=\"site.css\">"));

    assert!(dir.path().join("bpc-157.html").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("product-page.js")).expect("script written"),
        PAGE_SCRIPT
    );
    assert!(fs::read_to_string(dir.path().join("error.html"))
        .expect("error page written")
        .contains("Error loading product content."));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("manifest.json")).expect("manifest"))
            .expect("valid json");
    assert_eq!(manifest["page_count"], 2);
    assert_eq!(manifest["pages"][0]["filename"], "sermorelin.html");
    assert_eq!(manifest["pages"][1]["slug"], "bpc-157");
}

#[tokio::test]
async fn render_location_reports_missing_slugs_as_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder =
        SiteBuilder::with_fetcher(config_for(dir.path()), StaticFetcher::csv(SHEET)).expect("builder");

    let outcome = builder.render_location("/vanished/").await.expect("render ok");
    match outcome {
        PageOutcome::NotFound { slug, html } => {
            assert_eq!(slug, "vanished");
            assert!(html.contains("No product data found for: vanished"));
        }
        PageOutcome::Rendered(page) => panic!("unexpected page for {}", page.slug),
    }
}

#[tokio::test]
async fn build_location_persists_one_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder =
        SiteBuilder::with_fetcher(config_for(dir.path()), StaticFetcher::csv(SHEET)).expect("builder");

    let built = builder.build_location("/Sermorelin/").await.expect("build ok");
    assert!(matches!(built.outcome, PageOutcome::Rendered(_)));
    assert!(built.path.ends_with("sermorelin.html"));
    assert!(built.path.exists());
    assert!(dir.path().join("product-page.js").exists());
}

#[tokio::test]
async fn packed_cells_flow_through_the_pipeline() {
    let text = "Slug,Hero Title,FAQ\nsermorelin,Sermorelin,\"~Is it safe?: Yes.\n~How long?: Weeks.\"\n";
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_for(dir.path());
    config.group_encoding = GroupEncoding::PackedCell;
    let builder = SiteBuilder::with_fetcher(config, StaticFetcher::csv(text)).expect("builder");

    let outcome = builder.render_location("/sermorelin").await.expect("render ok");
    let PageOutcome::Rendered(page) = outcome else {
        panic!("expected a rendered page");
    };
    assert!(page.html.contains("Is it safe?"));
    assert!(page.html.contains("How long?"));
}

#[tokio::test]
async fn missing_slug_column_fails_the_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder = SiteBuilder::with_fetcher(
        config_for(dir.path()),
        StaticFetcher::csv("Hero Title,Intro\nSermorelin,About\n"),
    )
    .expect("builder");

    let err = builder.build_site().await.unwrap_err();
    assert!(matches!(err, BuildError::Schema(_)));
}

#[tokio::test]
async fn inspect_counts_rows_and_sections_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder =
        SiteBuilder::with_fetcher(config_for(dir.path()), StaticFetcher::csv(SHEET)).expect("builder");

    let report = builder.inspect().await.expect("inspect ok");
    assert_eq!(report.data_rows, 3);
    assert_eq!(report.products.len(), 2);
    assert_eq!(report.products[0].slug, "sermorelin");
    assert_eq!(report.products[0].rows, 2);
    assert_eq!(report.products[0].benefits, 2);
    assert_eq!(report.products[0].faq, 1);

    assert!(!dir.path().join("sermorelin.html").exists());
}

#[tokio::test]
async fn gviz_payload_builds_over_http() {
    let body = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"table\":{\"cols\":[{\"id\":\"A\",\"label\":\"Slug\"},{\"id\":\"B\",\"label\":\"Hero Title\"}],\"rows\":[{\"c\":[{\"v\":\"sermorelin\"},{\"v\":\"Sermorelin\"}]}]}});";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tq"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json; charset=utf-8"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = SiteConfig::new(format!("{}/tq", server.uri()), dir.path());
    config.source_format = SourceFormat::GvizJson;
    let builder = SiteBuilder::new(config).expect("builder");

    let summary = builder.build_site().await.expect("build ok");
    assert_eq!(summary.pages.len(), 1);
    assert!(dir.path().join("sermorelin.html").exists());
}
