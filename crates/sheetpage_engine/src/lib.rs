//! IO pipeline: published sheet in, product pages on disk out.

mod assets;
mod config;
mod decode;
mod fetch;
mod persist;
mod pipeline;
mod source;
mod types;

pub use assets::{asset_version, script_href, PAGE_SCRIPT, SCRIPT_FILENAME};
pub use config::SiteConfig;
pub use decode::{decode_sheet_text, DecodeError, DecodedText};
pub use fetch::{Fetcher, SheetFetcher};
pub use persist::{ensure_output_dir, page_filename, AtomicFileWriter, PersistError};
pub use pipeline::{
    BuildError, LoadedSheet, SiteBuilder, ERROR_PAGE_FILENAME, MANIFEST_FILENAME,
};
pub use source::{parse_source, SourceError, SourceFormat};
pub use types::{
    BuildSummary, BuiltLocation, BuiltPage, FailureKind, FetchError, FetchMetadata, FetchOutput,
    FetchSettings, PageOutcome, ProductStat, RenderedPage, SheetReport,
};
