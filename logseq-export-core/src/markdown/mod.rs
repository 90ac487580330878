//! Outliner-to-markdown body rewriting.
//!
//! The body of an outliner page is a tree of `-` bullets indented with tabs.
//! Blog posts want flat paragraphs instead, so the body goes through a fixed
//! chain of text rewrites. Order matters: empty bullets are dropped before
//! anything is promoted, and multi-line blocks are unindented before bullet
//! markers are turned into paragraph breaks.

pub mod bullets;
pub mod links;

pub use links::{detect_page_links, rewrite_page_links, PageLinkRewriter};

/// A single named text rewrite
#[derive(Clone, Copy)]
pub struct RewriteStep {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for RewriteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteStep").field("name", &self.name).finish()
    }
}

/// The body rewrites, in the order they must run
pub const DEFAULT_STEPS: [RewriteStep; 5] = [
    RewriteStep {
        name: "drop-empty-bullets",
        apply: bullets::drop_empty_bullets,
    },
    RewriteStep {
        name: "unindent-multiline-blocks",
        apply: bullets::unindent_multiline_blocks,
    },
    RewriteStep {
        name: "top-level-bullets-to-paragraphs",
        apply: bullets::top_level_bullets_to_paragraphs,
    },
    RewriteStep {
        name: "promote-second-level-bullets",
        apply: bullets::promote_second_level_bullets,
    },
    RewriteStep {
        name: "deindent-nested-bullets",
        apply: bullets::deindent_nested_bullets,
    },
];

/// Applies an ordered list of rewrite steps to a page body
#[derive(Debug, Clone)]
pub struct BodyRewriter {
    steps: Vec<RewriteStep>,
}

impl BodyRewriter {
    pub fn new() -> Self {
        Self::with_steps(DEFAULT_STEPS.to_vec())
    }

    pub fn with_steps(steps: Vec<RewriteStep>) -> Self {
        Self { steps }
    }

    /// Names of the configured steps, in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name).collect()
    }

    pub fn rewrite(&self, body: &str) -> String {
        self.steps.iter().fold(body.to_string(), |text, step| {
            let rewritten = (step.apply)(&text);
            if rewritten != text {
                tracing::trace!("Rewrite step '{}' changed the body", step.name);
            }
            rewritten
        })
    }
}

impl Default for BodyRewriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite an outliner body into flat markdown using the default steps
///
/// ```
/// use logseq_export_core::markdown::rewrite_body;
///
/// assert_eq!(rewrite_body("- first\n- second\n"), "\nfirst\n\nsecond\n");
/// ```
pub fn rewrite_body(body: &str) -> String {
    BodyRewriter::new().rewrite(body)
}
