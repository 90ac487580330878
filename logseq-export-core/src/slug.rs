//! Export file name, slug and title derivation.

use crate::models::AttributeMap;
use crate::page::PageError;
use percent_encoding::percent_decode_str;
use std::path::Path;

const SLUG: &str = "slug";
const DATE: &str = "date";
const FOLDER: &str = "folder";
const TITLE: &str = "title";

/// Replace spaces with hyphens, leaving every other character alone
///
/// ```
/// use logseq_export_core::slug::sanitize_name;
///
/// assert_eq!(sanitize_name("Blog idea: hello.md"), "Blog-idea:-hello.md");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "-")
}

/// Compute the output file name of a page
///
/// Rules:
/// - `slug` and `date` present: `<date>-<slug>.md`
/// - only `slug` present: `<slug>.md`
/// - no `slug`: the sanitized base name of `original_path`, extension kept
///
/// A `folder` attribute places the file in that sub-folder (`/` separated).
///
/// `slug` and `date` must be single path components and `folder` must not
/// climb with `..`, otherwise [`PageError::UnsafeName`] is returned.
pub fn derive_export_filename(
    original_path: &str,
    attributes: &AttributeMap,
) -> Result<String, PageError> {
    let name = match non_blank(attributes, SLUG) {
        Some(slug) => {
            let slug = single_component(SLUG, slug)?;
            match non_blank(attributes, DATE) {
                Some(date) => format!("{}-{}.md", single_component(DATE, date)?, slug),
                None => format!("{}.md", slug),
            }
        }
        None => sanitize_name(base_name(original_path)?),
    };

    match non_blank(attributes, FOLDER) {
        Some(folder) => Ok(format!("{}/{}", relative_folder(folder)?, name)),
        None => Ok(name),
    }
}

/// Set `slug` from the export file name unless the page already has one
pub fn ensure_slug(attributes: &mut AttributeMap, export_filename: &str) {
    if non_blank(attributes, SLUG).is_some() {
        return;
    }
    let file_name = export_filename.rsplit('/').next().unwrap_or(export_filename);
    attributes.insert(SLUG.to_string(), file_stem(file_name).to_string());
}

/// Set `title` from the source file name unless the page already has one
///
/// With `decode` the file name is percent-decoded first, so
/// `Blog idea%3A hello.md` becomes `Blog idea: hello`.
pub fn ensure_title(
    attributes: &mut AttributeMap,
    original_path: &str,
    decode: bool,
) -> Result<(), PageError> {
    if attributes.contains_key(TITLE) {
        return Ok(());
    }
    let stem = file_stem(base_name(original_path)?);
    let title = if decode {
        percent_decode_str(stem).decode_utf8_lossy().into_owned()
    } else {
        stem.to_string()
    };
    attributes.insert(TITLE.to_string(), title);
    Ok(())
}

fn base_name(original_path: &str) -> Result<&str, PageError> {
    Path::new(original_path)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PageError::MissingFileName(original_path.to_string()))
}

fn single_component<'a>(key: &str, value: &'a str) -> Result<&'a str, PageError> {
    if value.contains(&['/', '\\'][..]) || value.contains("..") {
        return Err(unsafe_name(key, value));
    }
    Ok(value)
}

fn relative_folder(folder: &str) -> Result<&str, PageError> {
    if folder.contains('\\') || folder.split('/').any(|part| part.trim() == "..") {
        return Err(unsafe_name(FOLDER, folder));
    }
    Ok(folder.trim_matches('/'))
}

fn unsafe_name(key: &str, value: &str) -> PageError {
    PageError::UnsafeName {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

fn non_blank<'a>(attributes: &'a AttributeMap, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
