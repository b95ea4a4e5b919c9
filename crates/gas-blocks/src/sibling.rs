//! File-level split and inline, using a sibling `{basename}_JS.js` file
//! in the same folder as the markup file.

use crate::placeholder::{
    inline_placeholder, placeholder_file_name, placeholder_tag, split_script_block,
};
use crate::{Error, Result};
use gas_fs::io;
use std::path::{Path, PathBuf};

fn basename(markup_path: &Path) -> Result<&str> {
    markup_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::NoFileName {
            path: markup_path.to_path_buf(),
        })
}

/// Path of the sibling script file for `markup_path`.
pub fn sibling_path(markup_path: &Path) -> Result<PathBuf> {
    let name = placeholder_file_name(basename(markup_path)?);
    Ok(match markup_path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    })
}

/// Split the first script block of `text` into the sibling file.
///
/// Writes the sibling when a block is found and returns the markup text to
/// store at `markup_path`. Without a block, `text` is returned as is.
pub fn extract_to_sibling(markup_path: &Path, text: &str) -> Result<String> {
    let split = split_script_block(basename(markup_path)?, text);
    if let Some(script) = split.script {
        let target = sibling_path(markup_path)?;
        tracing::debug!(
            markup = %markup_path.display(),
            script = %target.display(),
            "Detected inner <script> tag, moving contents"
        );
        io::write_text(&target, &script)?;
    }
    Ok(split.rewritten)
}

/// Replace the placeholder in `text` with the sibling file's contents.
///
/// A missing sibling leaves the placeholder in place; the markup is then
/// uploaded with a literal placeholder tag.
pub fn inline_from_sibling(markup_path: &Path, text: &str) -> Result<String> {
    let basename = basename(markup_path)?;
    if !text.contains(&placeholder_tag(basename)) {
        return Ok(text.to_string());
    }

    let target = sibling_path(markup_path)?;
    if !target.is_file() {
        tracing::warn!(
            markup = %markup_path.display(),
            missing = %target.display(),
            "Placeholder found but its script file is missing; uploading placeholder as is"
        );
        return Ok(text.to_string());
    }

    let script = io::read_text(&target)?;
    tracing::debug!(script = %target.display(), "Substituted placeholder from file");
    Ok(inline_placeholder(basename, text, Some(&script)))
}
