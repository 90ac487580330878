//! Relative image references: extraction and rewriting to published URLs.

use crate::models::AttributeMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

/// `![alt](./x)` or `![alt](../x)`; group 2 is the reference
static ASSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!\[[^\]]*\]\()(\.\.?/.+?)\)").unwrap());

const IMAGE_ATTRIBUTE: &str = "image";

/// Result of rewriting a page's asset references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRewrite {
    pub body: String,

    /// Original references, body first, then the `image` attribute
    pub assets: Vec<String>,

    pub attributes: AttributeMap,
}

/// Find all relative image references in `text`
///
/// `![img](../assets/img.jpg)` yields `../assets/img.jpg`; absolute and
/// external images are ignored.
///
/// ```
/// use logseq_export_core::assets::parse_assets;
///
/// let text = "![a](../assets/a.png) ![b](https://example.com/b.png)";
/// assert_eq!(parse_assets(text), vec!["../assets/a.png"]);
/// ```
pub fn parse_assets(text: &str) -> Vec<String> {
    ASSET_RE
        .captures_iter(text)
        .map(|caps| caps[2].to_string())
        .collect()
}

/// Point relative image references in the body and the `image` attribute at
/// `asset_url_prefix`
pub fn rewrite_asset_references(
    body: &str,
    attributes: &AttributeMap,
    asset_url_prefix: &str,
) -> AssetRewrite {
    let mut assets = Vec::new();

    let body = ASSET_RE
        .replace_all(body, |caps: &Captures| {
            let reference = &caps[2];
            assets.push(reference.to_string());
            format!("{}{})", &caps[1], published_url(asset_url_prefix, reference))
        })
        .into_owned();

    let mut attributes = attributes.clone();
    if let Some(image) = attributes.get_mut(IMAGE_ATTRIBUTE) {
        if is_relative_reference(image) {
            assets.push(image.clone());
            *image = published_url(asset_url_prefix, image);
        }
    }

    AssetRewrite {
        body,
        assets,
        attributes,
    }
}

/// Whether a reference uses a relative path marker (`./` or `../`)
pub fn is_relative_reference(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../")
}

/// Published URL for a reference: `prefix/basename`
pub fn published_url(asset_url_prefix: &str, reference: &str) -> String {
    format!(
        "{}/{}",
        asset_url_prefix.trim_end_matches('/'),
        asset_file_name(reference)
    )
}

/// Last path component of a reference
pub fn asset_file_name(reference: &str) -> &str {
    Path::new(reference)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(reference)
}
