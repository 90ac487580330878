//! # logseq-export-core
//!
//! Core library for exporting public logseq pages as blog-ready markdown.
//!
//! A page goes through a fixed pipeline: its `key:: value` attributes are
//! split from the body, the outliner bullets of the body are flattened into
//! paragraphs, an export file name and slug are derived, relative image
//! references are pointed at the published asset folder, and finally the
//! attributes are rendered as front matter above the body.

pub mod assets;
pub mod attributes;
pub mod config;
pub mod exporter;
pub mod frontmatter;
pub mod markdown;
pub mod models;
pub mod page;
pub mod slug;

pub use assets::{parse_assets, rewrite_asset_references, AssetRewrite};
pub use attributes::{parse_attributes, split_attributes, strip_attributes};
pub use config::{ConfigError, ExportConfig, ExportSettings};
pub use exporter::{find_public_pages, ExportError, ExportSummary, Exporter};
pub use frontmatter::FrontmatterRenderer;
pub use markdown::{rewrite_body, BodyRewriter};
pub use models::{AttributeMap, LinkIndex, ParsedContent, ParsedPage, RawPage};
pub use page::{parse_page, render, PageError, PageParser, ParseOptions};
pub use slug::{derive_export_filename, sanitize_name};
