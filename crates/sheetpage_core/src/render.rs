//! Fixed-shape HTML rendering for product pages.
//!
//! The template is deliberately rigid: sections appear in a fixed order,
//! each renders only when its backing data is non-empty, and the class
//! names and the `stickyCta` id are the hooks the interaction script and
//! the deployment stylesheet attach to. Content influences text and
//! attribute values, never structure.

use std::fmt::Write;

use crate::record::{ListItem, ProductRecord};
use crate::text::{escape_html, reflow_html};

/// Document-level knobs the templates need besides the record itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// id of the element the page content mounts under.
    pub mount_id: String,
    /// Stylesheet link injected into the head, if the deployment has one.
    pub stylesheet_url: Option<String>,
    /// URL of the interaction script (FAQ accordion and sticky CTA bar).
    pub script_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mount_id: "product-root".to_string(),
            stylesheet_url: None,
            script_url: None,
        }
    }
}

/// Render the content fragment for one product. The hero always renders;
/// every other section is omitted entirely when it has nothing to show.
pub fn render_fragment(record: &ProductRecord) -> String {
    let mut out = String::new();

    out.push_str("<section class=\"product-hero\">\n");
    if !record.hero_image.is_empty() {
        let _ = writeln!(
            out,
            "  <div class=\"product-hero-image\"><img src=\"{}\" alt=\"{}\"></div>",
            escape_html(&record.hero_image),
            escape_html(&record.hero_title),
        );
    }
    out.push_str("  <div class=\"product-hero-text\">\n");
    let _ = writeln!(out, "    <h2>{}</h2>", escape_html(&record.hero_title));
    if !record.hero_subtitle.is_empty() {
        let _ = writeln!(out, "    {}", reflow_html(&record.hero_subtitle));
    }
    if !record.cta_label.is_empty() {
        let _ = writeln!(
            out,
            "    <div class=\"product-cta\"><a href=\"{}\">{}</a></div>",
            escape_html(&record.cta_url),
            escape_html(&record.cta_label),
        );
    }
    out.push_str("  </div>\n</section>\n");

    if !record.intro.is_empty() {
        out.push_str("<section class=\"product-intro\">\n");
        out.push_str("  <h2>What is it?</h2>\n");
        out.push_str("  <div class=\"product-intro-divider\"></div>\n");
        let _ = writeln!(out, "  {}", reflow_html(&record.intro));
        out.push_str("</section>\n");
    }

    if !record.benefits.is_empty() {
        out.push_str("<section class=\"product-benefits\">\n");
        out.push_str("  <div class=\"product-benefits-overlay\">\n");
        out.push_str("    <h2>Key Benefits</h2>\n");
        out.push_str("    <div class=\"product-benefits-grid\">\n");
        for item in &record.benefits {
            out.push_str("      <div class=\"product-benefit-card\">\n");
            let _ = writeln!(out, "        <h4>{}</h4>", escape_html(&item.title));
            if !item.body.is_empty() {
                let _ = writeln!(out, "        {}", reflow_html(&item.body));
            }
            out.push_str("      </div>\n");
        }
        out.push_str("    </div>\n  </div>\n</section>\n");
    }

    list_section(&mut out, "product-steps", "How It Works", "product-step", &record.steps);
    list_section(&mut out, "product-for", "Who It's For", "product-for-item", &record.for_whom);
    list_section(
        &mut out,
        "product-not-for",
        "Who It's Not For",
        "product-not-for-item",
        &record.not_for,
    );

    if !record.faq.is_empty() {
        out.push_str("<section class=\"product-faq\">\n");
        out.push_str("  <h2>Frequently Asked Questions</h2>\n");
        for item in &record.faq {
            out.push_str("  <div class=\"product-faq-item\">\n");
            let _ = writeln!(
                out,
                "    <div class=\"product-faq-question\" tabindex=\"0\">{}</div>",
                escape_html(&item.title),
            );
            let _ = writeln!(
                out,
                "    <div class=\"product-faq-answer\">{}</div>",
                reflow_html(&item.body),
            );
            out.push_str("  </div>\n");
        }
        out.push_str("</section>\n");
    }

    if !record.cta_label.is_empty() {
        let _ = writeln!(
            out,
            "<div class=\"product-sticky-cta\" id=\"stickyCta\" style=\"display:none\"><a href=\"{}\">{}</a></div>",
            escape_html(&record.cta_url),
            escape_html(&record.cta_label),
        );
    }

    out
}

fn list_section(out: &mut String, section: &str, heading: &str, item_class: &str, items: &[ListItem]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "<section class=\"{section}\">");
    let _ = writeln!(out, "  <h2>{heading}</h2>");
    for item in items {
        let _ = writeln!(out, "  <div class=\"{item_class}\">");
        let _ = writeln!(out, "    <h4>{}</h4>", escape_html(&item.title));
        if !item.body.is_empty() {
            let _ = writeln!(out, "    {}", reflow_html(&item.body));
        }
        out.push_str("  </div>\n");
    }
    out.push_str("</section>\n");
}

/// Render the full standalone document for one product.
pub fn render_product(record: &ProductRecord, opts: &RenderOptions) -> String {
    document(&record.hero_title, &render_fragment(record), opts)
}

/// Document shown when no sheet row matches the requested slug. Not an
/// error page: the sheet simply has nothing to say about this location.
pub fn render_not_found(slug: &str, opts: &RenderOptions) -> String {
    let body = format!(
        "<p class=\"product-not-found\" style=\"color:red;text-align:center;\">No product data found for: {}</p>\n",
        escape_html(slug),
    );
    document("Not found", &body, opts)
}

/// Document deployed as the error fallback for when the sheet itself
/// cannot be fetched or read.
pub fn render_error_page(opts: &RenderOptions) -> String {
    let body = "<p class=\"product-error\" style=\"text-align:center;\">Error loading product content.</p>\n";
    document("Error", body, opts)
}

fn document(title: &str, fragment: &str, opts: &RenderOptions) -> String {
    let mut head = String::new();
    head.push_str("  <meta charset=\"utf-8\">\n");
    head.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(head, "  <title>{}</title>", escape_html(title));
    if let Some(href) = &opts.stylesheet_url {
        let _ = writeln!(head, "  <link rel=\"stylesheet\" href=\"{}\">", escape_html(href));
    }
    let script = match &opts.script_url {
        Some(src) => format!("<script defer src=\"{}\"></script>\n", escape_html(src)),
        None => String::new(),
    };
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n{head}</head>\n<body>\n\
         <main id=\"{mount}\">\n{fragment}</main>\n{script}</body>\n</html>\n",
        head = head,
        mount = escape_html(&opts.mount_id),
        fragment = fragment,
        script = script,
    )
}
