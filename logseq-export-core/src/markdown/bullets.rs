//! Bullet rewrites used by [`super::BodyRewriter`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMPTY_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]*$").unwrap());

/// A top-level bullet followed by lines indented with two spaces
static MULTILINE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- (.*)((?:\n  .*)+)").unwrap());

static TOP_LEVEL_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- ").unwrap());

static SECOND_LEVEL_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\t-").unwrap());

static NESTED_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\t(\t+-)").unwrap());

const CONTINUATION_INDENT: &str = "\n  ";

/// Remove bullets that carry no text, keeping their line breaks
pub fn drop_empty_bullets(text: &str) -> String {
    EMPTY_BULLET_RE.replace_all(text, "").into_owned()
}

/// Lift multi-line bullets (code fences, wrapped paragraphs) out of the list
///
/// The bullet marker and the two-space continuation indent are removed and
/// the block is separated from the previous line by a blank line, unless
/// that line is already blank.
pub fn unindent_multiline_blocks(text: &str) -> String {
    MULTILINE_BLOCK_RE
        .replace_all(text, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            let separator = if follows_blank_line(&text[..start]) {
                ""
            } else {
                "\n"
            };
            let continuation = caps[2].replace(CONTINUATION_INDENT, "\n");
            format!("{}{}{}", separator, &caps[1], continuation)
        })
        .into_owned()
}

/// `- text` at column zero becomes a paragraph
pub fn top_level_bullets_to_paragraphs(text: &str) -> String {
    TOP_LEVEL_BULLET_RE.replace_all(text, "\n").into_owned()
}

/// `\t- text` becomes a top-level bullet preceded by a line break
pub fn promote_second_level_bullets(text: &str) -> String {
    SECOND_LEVEL_BULLET_RE.replace_all(text, "\n-").into_owned()
}

/// Bullets nested two or more levels deep lose one tab
pub fn deindent_nested_bullets(text: &str) -> String {
    NESTED_BULLET_RE.replace_all(text, "${1}").into_owned()
}

fn follows_blank_line(before: &str) -> bool {
    before == "\n" || before.ends_with("\n\n")
}
