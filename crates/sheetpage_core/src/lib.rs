//! Pure content binding: published sheet cells to product-page markup.

mod csv;
mod record;
mod render;
mod schema;
mod slug;
mod text;

pub use csv::{parse_rows, rows_to_string, write_row, Sheet};
pub use record::{
    decode_packed_cell, extract_record, matching_rows, CtaPolicy, GroupEncoding, ListItem,
    ProductRecord,
};
pub use render::{
    render_error_page, render_fragment, render_not_found, render_product, RenderOptions,
};
pub use schema::{normalize_header, Column, GroupKind, Schema, SchemaError};
pub use slug::{normalize_key, slug_from_path};
pub use text::{escape_html, reflow_html};
