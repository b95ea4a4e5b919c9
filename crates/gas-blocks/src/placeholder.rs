//! Pure text transforms between inline script blocks and placeholder tags.
//!
//! The placeholder tag format is byte-exact so hand-edited files keep
//! working:
//!
//! ```text
//! <script data-placeholder="{basename}_JS.js"></script>
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Opening delimiter of an inline script block.
pub const SCRIPT_OPEN: &str = "<script>";
/// Closing delimiter of an inline script block.
pub const SCRIPT_CLOSE: &str = "</script>";
/// Suffix of extracted script files.
pub const PLACEHOLDER_SUFFIX: &str = "_JS.js";

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script data-placeholder="([^"]+)"></script>"#)
        .expect("Invalid placeholder regex")
});

/// Result of [`split_script_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// The markup text with the block replaced by a placeholder tag
    pub rewritten: String,
    /// Everything that was between the delimiters, or `None` if no block was found
    pub script: Option<String>,
}

/// Name of the sibling script file for a markup file `basename`.
///
/// ```
/// assert_eq!(gas_blocks::placeholder_file_name("Index"), "Index_JS.js");
/// ```
pub fn placeholder_file_name(basename: &str) -> String {
    format!("{}{}", basename, PLACEHOLDER_SUFFIX)
}

/// The full placeholder tag for a markup file `basename`.
///
/// ```
/// assert_eq!(
///     gas_blocks::placeholder_tag("Index"),
///     r#"<script data-placeholder="Index_JS.js"></script>"#
/// );
/// ```
pub fn placeholder_tag(basename: &str) -> String {
    format!(
        "<script data-placeholder=\"{}\">{}",
        placeholder_file_name(basename),
        SCRIPT_CLOSE
    )
}

/// Whether `file_name` is an extracted script file.
///
/// Such files are consumed while inlining their markup file and are never
/// uploaded as entries of their own.
pub fn is_placeholder_script(file_name: &str) -> bool {
    file_name.ends_with(PLACEHOLDER_SUFFIX)
}

/// Move the first inline script block of `text` out behind a placeholder.
///
/// Finds the first `<script>` and the first `</script>` after it. Only that
/// block is considered; anything after its closing delimiter, including
/// further blocks, is kept verbatim. Without both delimiters the text is
/// returned unchanged and nothing is extracted.
pub fn split_script_block(basename: &str, text: &str) -> Split {
    let Some(open) = text.find(SCRIPT_OPEN) else {
        return unchanged(text);
    };
    let body_start = open + SCRIPT_OPEN.len();
    let Some(close_rel) = text[body_start..].find(SCRIPT_CLOSE) else {
        return unchanged(text);
    };
    let body_end = body_start + close_rel;
    let after = body_end + SCRIPT_CLOSE.len();

    let mut rewritten = String::with_capacity(text.len());
    rewritten.push_str(&text[..open]);
    rewritten.push_str(&placeholder_tag(basename));
    rewritten.push_str(&text[after..]);

    Split {
        rewritten,
        script: Some(text[body_start..body_end].to_string()),
    }
}

/// Replace the placeholder tag for `basename` with an inline block.
///
/// `script` is the content of the sibling file. When it is `None` the
/// placeholder stays in place and the text is returned unchanged.
pub fn inline_placeholder(basename: &str, text: &str, script: Option<&str>) -> String {
    let tag = placeholder_tag(basename);
    let Some(index) = text.find(&tag) else {
        return text.to_string();
    };
    let Some(script) = script else {
        return text.to_string();
    };

    let mut inlined = String::with_capacity(text.len() + script.len());
    inlined.push_str(&text[..index]);
    inlined.push_str(SCRIPT_OPEN);
    inlined.push_str(script);
    inlined.push_str(SCRIPT_CLOSE);
    inlined.push_str(&text[index + tag.len()..]);
    inlined
}

/// Every file referenced by a placeholder tag in `text`, in order.
pub fn placeholder_references(text: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn unchanged(text: &str) -> Split {
    Split {
        rewritten: text.to_string(),
        script: None,
    }
}
