//! Export run - finds public pages, renders them and copies their assets.

use crate::assets::asset_file_name;
use crate::config::{ExportConfig, CONFIG_FILENAME};
use crate::frontmatter::FrontmatterRenderer;
use crate::models::{LinkIndex, ParsedPage, RawPage};
use crate::page::{render, PageError, PageParser};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Logseq keeps its settings, backups and recycle bin here
const LOGSEQ_SETTINGS_DIR: &str = "logseq";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk the logseq folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Pages {first:?} and {second:?} would both be exported as {filename:?}")]
    DuplicateFilename {
        filename: String,
        first: String,
        second: String,
    },

    #[error("Assets {first:?} and {second:?} would both be published as {name:?}")]
    AssetCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Refusing to write {0:?} outside the pages folder")]
    UnsafeDestination(String),
}

/// What an export run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Rendered page files
    pub pages: usize,

    /// Copied asset files
    pub assets: usize,

    /// Referenced assets that were not found next to their page
    pub missing_assets: Vec<String>,
}

/// Asset files to copy, resolved before anything is written
#[derive(Debug, Default)]
struct AssetPlan {
    /// Destination file to canonical source file
    copies: HashMap<PathBuf, PathBuf>,
    missing: Vec<String>,
}

/// Runs a complete export for one configuration
pub struct Exporter {
    config: ExportConfig,
    parser: PageParser,
    renderer: FrontmatterRenderer,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        let parser = PageParser::new(config.parse_options());
        let renderer = config.renderer();
        Self {
            config,
            parser,
            renderer,
        }
    }

    /// Export every public page of the logseq folder
    pub fn run(&self) -> Result<ExportSummary, ExportError> {
        let raw_pages =
            find_public_pages(&self.config.logseq_folder, &self.config.settings.public_marker)?;
        tracing::info!("Found {} public pages", raw_pages.len());

        // First pass: parse everything so links can be resolved across pages
        let mut pages = self.parse_pages(&raw_pages)?;
        let index = LinkIndex::from_pages(&pages);
        tracing::debug!("Link index holds {} titles", index.len());
        let plan = self.plan_assets(&pages)?;

        // Second pass: render and write
        let pages_dir = self.config.pages_dir();
        fs::create_dir_all(&pages_dir)?;
        for page in &mut pages {
            page.resolve_links(&index, &self.config.settings.page_url_prefix);
            self.write_page(&pages_dir, page)?;
        }

        let assets = self.copy_assets(&plan)?;

        let summary = ExportSummary {
            pages: pages.len(),
            assets,
            missing_assets: plan.missing,
        };
        tracing::info!(
            "Exported {} pages and {} assets to {:?}",
            summary.pages,
            summary.assets,
            self.config.output_folder
        );
        Ok(summary)
    }

    fn parse_pages(&self, raw_pages: &[RawPage]) -> Result<Vec<ParsedPage>, ExportError> {
        let mut pages = Vec::with_capacity(raw_pages.len());
        let mut filenames: HashMap<String, String> = HashMap::new();

        for raw in raw_pages {
            let page = self.parser.parse(raw)?;
            if let Some(first) = filenames.get(&page.export_filename) {
                return Err(ExportError::DuplicateFilename {
                    filename: page.export_filename.clone(),
                    first: first.clone(),
                    second: page.original_path.clone(),
                });
            }
            filenames.insert(page.export_filename.clone(), page.original_path.clone());
            pages.push(page);
        }

        Ok(pages)
    }

    fn write_page(&self, pages_dir: &Path, page: &ParsedPage) -> Result<(), ExportError> {
        if !is_contained(Path::new(&page.export_filename)) {
            return Err(ExportError::UnsafeDestination(page.export_filename.clone()));
        }
        let dest = pages_dir.join(&page.export_filename);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!("Writing {:?} to {:?}", page.original_path, dest);
        fs::write(&dest, render(page, &self.renderer))?;
        Ok(())
    }

    /// Resolve every referenced asset to its source file, once per destination
    ///
    /// Two different files sharing a name would be published under the same
    /// URL, so that is an error.
    fn plan_assets(&self, pages: &[ParsedPage]) -> Result<AssetPlan, ExportError> {
        let assets_dir = self.config.assets_dir();
        let mut plan = AssetPlan::default();

        for page in pages {
            let page_dir = Path::new(&page.original_path)
                .parent()
                .unwrap_or_else(|| Path::new(""));

            for reference in &page.content.assets {
                let source = page_dir.join(reference);
                if !source.is_file() {
                    tracing::warn!(
                        "Asset {:?} referenced by {:?} does not exist",
                        source,
                        page.original_path
                    );
                    plan.missing.push(source.to_string_lossy().into_owned());
                    continue;
                }

                let source = fs::canonicalize(&source)?;
                let name = asset_file_name(reference);
                let dest = assets_dir.join(name);
                match plan.copies.get(&dest) {
                    Some(first) if *first == source => {}
                    Some(first) => {
                        return Err(ExportError::AssetCollision {
                            name: name.to_string(),
                            first: first.clone(),
                            second: source,
                        });
                    }
                    None => {
                        plan.copies.insert(dest, source);
                    }
                }
            }
        }

        Ok(plan)
    }

    fn copy_assets(&self, plan: &AssetPlan) -> Result<usize, ExportError> {
        if plan.copies.is_empty() {
            return Ok(0);
        }
        fs::create_dir_all(self.config.assets_dir())?;
        for (dest, source) in &plan.copies {
            tracing::debug!("Copying {:?} to {:?}", source, dest);
            fs::copy(source, dest)?;
        }
        Ok(plan.copies.len())
    }
}

/// Whether a relative path stays below the folder it is joined to
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Read every file under `root` that contains `marker` on some line
///
/// Hidden entries, the top-level `logseq/` folder and the settings file are
/// skipped, as are files that are not valid UTF-8. Results are ordered by path.
pub fn find_public_pages(root: &Path, marker: &str) -> Result<Vec<RawPage>, ExportError> {
    let mut pages = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let bytes = fs::read(entry.path())?;
        let Ok(content) = String::from_utf8(bytes) else {
            tracing::debug!("Skipping non-text file {:?}", entry.path());
            continue;
        };

        if content.lines().any(|line| line.contains(marker)) {
            tracing::debug!("Found public page {:?}", entry.path());
            pages.push(RawPage::new(entry.path().to_string_lossy(), &content));
        }
    }

    Ok(pages)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    if entry.depth() != 1 {
        return false;
    }
    if entry.file_type().is_dir() {
        name == LOGSEQ_SETTINGS_DIR
    } else {
        name == CONFIG_FILENAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportSettings;
    use tempfile::tempdir;

    fn write(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(root: &Path, output: &Path) -> ExportConfig {
        ExportConfig {
            logseq_folder: root.to_path_buf(),
            output_folder: output.to_path_buf(),
            settings: ExportSettings {
                unquoted_properties: vec!["public".to_string()],
                ..ExportSettings::default()
            },
        }
    }

    #[test]
    fn test_finds_files_with_public_marker() {
        let dir = tempdir().unwrap();
        let src = dir.path();
        write(&src.join("pages/b"), b"public:: true\r\n- a bullet point");
        write(&src.join("logseq/a"), b"public:: true");
        write(&src.join("pages/c"), b"non public file");
        write(&src.join(".hidden/d.md"), b"public:: true");
        write(&src.join("assets/e.png"), &[0xff, 0xfe, 0x00, 0x81]);

        let pages = find_public_pages(src, "public::").unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0].path,
            src.join("pages").join("b").to_string_lossy()
        );
        assert_eq!(pages[0].content, "public:: true\n- a bullet point");
    }

    #[test]
    fn test_nested_logseq_folder_is_not_skipped() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("pages/logseq/x.md"), b"public:: true\n");

        let pages = find_public_pages(dir.path(), "public::").unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_settings_file_is_not_a_page() {
        let dir = tempdir().unwrap();
        write(&dir.path().join(CONFIG_FILENAME), b"publicMarker: \"public::\"\n");
        write(&dir.path().join("pages/export.yaml"), b"public:: true\n");
        write(&dir.path().join("pages/a.md"), b"public:: true\n");

        let pages = find_public_pages(dir.path(), "public::").unwrap();
        let paths: Vec<String> = pages.into_iter().map(|page| page.path).collect();
        assert_eq!(
            paths,
            vec![
                dir.path().join("pages/a.md").to_string_lossy().into_owned(),
                dir.path().join("pages/export.yaml").to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let result = find_public_pages(&dir.path().join("nope"), "public::");
        assert!(matches!(result, Err(ExportError::Walk(_))));
    }

    #[test]
    fn test_run_writes_pages_and_assets() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        let out = dir.path().join("out");
        write(
            &src.join("pages/first page.md"),
            b"public:: true\n\n- Links to [[Second]]\n- ![pic](../assets/pic.png)\n",
        );
        write(
            &src.join("pages/second.md"),
            b"public:: true\ntitle:: Second\nslug:: second-post\n\n- ![pic](../assets/pic.png) ![gone](../assets/gone.png)\n",
        );
        write(&src.join("pages/private.md"), b"- [[Second]]\n");
        write(&src.join("assets/pic.png"), b"png");

        let summary = Exporter::new(config(&src, &out)).run().unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.assets, 1);
        assert_eq!(summary.missing_assets.len(), 1);
        assert!(summary.missing_assets[0].ends_with("gone.png"));

        let first = fs::read_to_string(out.join("logseq-pages/first-page.md")).unwrap();
        assert_eq!(
            first,
            "---
public: true
slug: \"first-page\"
title: \"first page\"
---

Links to [Second](/second-post)

![pic](/logseq-assets/pic.png)
"
        );
        assert!(out.join("logseq-pages/second-post.md").is_file());
        assert!(!out.join("logseq-pages/private.md").exists());
        assert_eq!(fs::read(out.join("logseq-assets/pic.png")).unwrap(), b"png");
    }

    #[test]
    fn test_run_uses_folder_attribute() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        let out = dir.path().join("out");
        write(
            &src.join("pages/post.md"),
            b"public:: true\nfolder:: content/posts\n\n- hi\n",
        );

        Exporter::new(config(&src, &out)).run().unwrap();
        assert!(out.join("logseq-pages/content/posts/post.md").is_file());
    }

    #[test]
    fn test_run_rejects_slug_outside_pages_folder() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        let out = dir.path().join("out");
        write(&src.join("pages/a.md"), b"public:: true\nslug:: ../../escaped\n");

        let result = Exporter::new(config(&src, &out)).run();
        assert!(matches!(
            result,
            Err(ExportError::Page(PageError::UnsafeName { .. }))
        ));
        assert!(!dir.path().join("escaped.md").exists());
        assert!(!out.join("escaped.md").exists());
    }

    #[test]
    fn test_write_page_stays_in_pages_folder() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let exporter = Exporter::new(config(&dir.path().join("graph"), &out));
        let pages_dir = exporter.config.pages_dir();
        let mut page = crate::page::parse_page(&RawPage::new("/a.md", "- hi\n")).unwrap();

        for name in ["../escaped.md", "/tmp/escaped.md", "posts/../../escaped.md"] {
            page.export_filename = name.to_string();
            match exporter.write_page(&pages_dir, &page) {
                Err(ExportError::UnsafeDestination(dest)) => assert_eq!(dest, name),
                other => panic!("Expected UnsafeDestination for {}, got {:?}", name, other),
            }
        }
        assert!(!out.join("escaped.md").exists());

        page.export_filename = "posts/./a.md".to_string();
        exporter.write_page(&pages_dir, &page).unwrap();
        assert!(pages_dir.join("posts/a.md").is_file());
    }

    #[test]
    fn test_run_rejects_assets_sharing_a_name() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        let out = dir.path().join("out");
        write(
            &src.join("pages/a.md"),
            b"public:: true\n\n- ![x](../assets/x/img.png)\n- ![y](../assets/y/img.png)\n",
        );
        write(&src.join("assets/x/img.png"), b"X");
        write(&src.join("assets/y/img.png"), b"Y");

        let result = Exporter::new(config(&src, &out)).run();
        match result {
            Err(ExportError::AssetCollision { name, first, second }) => {
                assert_eq!(name, "img.png");
                assert!(first.ends_with("x/img.png"));
                assert!(second.ends_with("y/img.png"));
            }
            other => panic!("Expected AssetCollision error, got {:?}", other),
        }
        assert!(!out.join("logseq-pages/a.md").exists());
        assert!(!out.join("logseq-assets/img.png").exists());
    }

    #[test]
    fn test_same_asset_from_different_folders_is_copied_once() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        let out = dir.path().join("out");
        write(&src.join("pages/a.md"), b"public:: true\n\n- ![p](../assets/pic.png)\n");
        write(
            &src.join("journals/2023_07_29.md"),
            b"public:: true\n\n- ![p](../assets/pic.png)\n",
        );
        write(&src.join("assets/pic.png"), b"png");

        let summary = Exporter::new(config(&src, &out)).run().unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.assets, 1);
        assert!(summary.missing_assets.is_empty());
        assert_eq!(fs::read(out.join("logseq-assets/pic.png")).unwrap(), b"png");
    }

    #[test]
    fn test_run_rejects_duplicate_filenames() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("graph");
        write(&src.join("pages/a.md"), b"public:: true\nslug:: same\n");
        write(&src.join("pages/b.md"), b"public:: true\nslug:: same\n");

        let result = Exporter::new(config(&src, &dir.path().join("out"))).run();
        match result {
            Err(ExportError::DuplicateFilename { filename, .. }) => assert_eq!(filename, "same.md"),
            other => panic!("Expected DuplicateFilename error, got {:?}", other),
        }
    }
}
