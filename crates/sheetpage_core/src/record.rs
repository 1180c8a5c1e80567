//! Row matching and field extraction: sheet cells to a `ProductRecord`.

use url::Url;

use crate::csv::Sheet;
use crate::schema::{Column, GroupKind, Schema};
use crate::slug::normalize_key;

/// One entry of a repeated group (a benefit, a step, an FAQ item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub body: String,
}

/// How repeated groups are encoded in the sheet. A deployment picks one
/// shape for the whole sheet; the two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupEncoding {
    /// One sheet row per entry, read from the group's title and body
    /// columns across every matching row.
    #[default]
    RowPerEntry,
    /// One cell per group on the first matching row, holding `~Title: Body`
    /// lines. See [`decode_packed_cell`].
    PackedCell,
}

/// The logical entity behind one product page. Scalar fields come from
/// the first matching row; the group vectors hold zero or more entries
/// and an empty vector means the section is left off the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductRecord {
    pub slug: String,
    pub hero_image: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub cta_label: String,
    /// Final href, already resolved through [`CtaPolicy`].
    pub cta_url: String,
    pub intro: String,
    pub benefits: Vec<ListItem>,
    pub steps: Vec<ListItem>,
    pub for_whom: Vec<ListItem>,
    pub not_for: Vec<ListItem>,
    pub faq: Vec<ListItem>,
}

impl ProductRecord {
    pub fn group(&self, kind: GroupKind) -> &[ListItem] {
        match kind {
            GroupKind::Benefits => &self.benefits,
            GroupKind::Steps => &self.steps,
            GroupKind::ForWhom => &self.for_whom,
            GroupKind::NotFor => &self.not_for,
            GroupKind::Faq => &self.faq,
        }
    }

    fn group_mut(&mut self, kind: GroupKind) -> &mut Vec<ListItem> {
        match kind {
            GroupKind::Benefits => &mut self.benefits,
            GroupKind::Steps => &mut self.steps,
            GroupKind::ForWhom => &mut self.for_whom,
            GroupKind::NotFor => &mut self.not_for,
            GroupKind::Faq => &mut self.faq,
        }
    }
}

/// How call-to-action targets are resolved before they reach the page.
#[derive(Debug, Clone, Default)]
pub struct CtaPolicy {
    /// Origin relative targets are joined against, e.g. the storefront
    /// the pages are deployed next to.
    pub base_origin: Option<Url>,
    /// Target used when the sheet value is empty or carries a scheme the
    /// page must not link to.
    pub fallback_url: String,
}

impl CtaPolicy {
    /// Resolve a raw CTA cell to the href the page will carry. Absolute
    /// http, https, mailto and tel targets pass through; anything else
    /// with a scheme falls back; scheme-less values are joined against
    /// the base origin, or kept as-is when no origin is configured.
    pub fn resolve(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.fallback_url.clone();
        }
        if let Ok(url) = Url::parse(trimmed) {
            if matches!(url.scheme(), "http" | "https" | "mailto" | "tel") {
                return url.into();
            }
            return self.fallback_url.clone();
        }
        match &self.base_origin {
            Some(base) => match base.join(trimmed) {
                Ok(url) => url.into(),
                Err(_) => self.fallback_url.clone(),
            },
            None => trimmed.to_string(),
        }
    }
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// All data rows whose slug cell matches `slug`, both sides normalized
/// with [`normalize_key`]. An empty slug matches nothing, so filler rows
/// with a blank slug cell never become pages.
pub fn matching_rows<'a>(sheet: &'a Sheet, schema: &Schema, slug: &str) -> Vec<&'a [String]> {
    let key = normalize_key(slug);
    if key.is_empty() {
        return Vec::new();
    }
    let slug_col = schema.column(Column::Slug);
    sheet
        .rows()
        .iter()
        .map(|row| row.as_slice())
        .filter(|row| normalize_key(cell(row, slug_col)) == key)
        .collect()
}

/// Extract the record for `slug` from its matching rows. Scalars come
/// from the first row; repeated groups come from every row or from the
/// first row's packed cells, per `encoding`. Returns `None` when no rows
/// match.
pub fn extract_record(
    schema: &Schema,
    rows: &[&[String]],
    slug: &str,
    encoding: GroupEncoding,
    cta: &CtaPolicy,
) -> Option<ProductRecord> {
    let first: &[String] = rows.first().copied()?;
    let scalar = |column: Column| cell(first, schema.column(column)).trim().to_string();

    let mut record = ProductRecord {
        slug: normalize_key(slug),
        hero_image: scalar(Column::HeroImage),
        hero_title: scalar(Column::HeroTitle),
        hero_subtitle: scalar(Column::HeroSubtitle),
        cta_label: scalar(Column::CtaLabel),
        cta_url: cta.resolve(cell(first, schema.column(Column::CtaUrl))),
        intro: scalar(Column::Intro),
        ..ProductRecord::default()
    };

    for group in GroupKind::ALL {
        let items = match encoding {
            GroupEncoding::RowPerEntry => collect_row_entries(schema, rows, group),
            GroupEncoding::PackedCell => {
                decode_packed_cell(cell(first, schema.column(group.packed_column())))
            }
        };
        *record.group_mut(group) = items;
    }

    Some(record)
}

/// Row-per-entry collection: one entry per matching row with a non-empty
/// title cell. Rows whose title cell is blank contribute nothing to this
/// group, which is what lets a sheet carry four benefits but two FAQs.
fn collect_row_entries(schema: &Schema, rows: &[&[String]], group: GroupKind) -> Vec<ListItem> {
    let title_col = schema.column(group.title_column());
    if title_col.is_none() {
        return Vec::new();
    }
    let body_col = schema.column(group.body_column());
    rows.iter()
        .filter_map(|row| {
            let title = cell(row, title_col).trim();
            if title.is_empty() {
                return None;
            }
            Some(ListItem {
                title: title.to_string(),
                body: cell(row, body_col).trim().to_string(),
            })
        })
        .collect()
}

/// Decode a packed group cell. Each line starting with `~` opens an entry;
/// the text before the first colon is the title and the rest the body. A
/// marker line with no colon is a title-only entry. Lines without the
/// marker continue the previous entry's body. Entries that end up with an
/// empty title are dropped.
pub fn decode_packed_cell(cell: &str) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    for line in cell.lines() {
        if let Some(entry) = line.trim_start().strip_prefix('~') {
            let (title, body) = match entry.split_once(':') {
                Some((title, body)) => (title.trim(), body.trim()),
                None => (entry.trim(), ""),
            };
            items.push(ListItem {
                title: title.to_string(),
                body: body.to_string(),
            });
        } else if let Some(open) = items.last_mut() {
            if open.body.is_empty() {
                open.body = line.trim().to_string();
            } else {
                open.body.push('\n');
                open.body.push_str(line.trim());
            }
        }
    }
    items.retain(|item| !item.title.is_empty());
    items
}
