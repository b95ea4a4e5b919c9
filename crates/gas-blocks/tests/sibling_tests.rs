//! Tests for file-level extraction and inlining

use gas_blocks::{extract_to_sibling, inline_from_sibling, placeholder_tag, sibling_path};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_sibling_path_is_next_to_markup() {
    let path = sibling_path(std::path::Path::new("/p/SourceCode/HTML/Index.html")).unwrap();
    assert_eq!(path, std::path::PathBuf::from("/p/SourceCode/HTML/Index_JS.js"));
}

#[test]
fn test_extract_writes_sibling_and_returns_placeholder_markup() {
    let temp = TempDir::new().unwrap();
    let markup = temp.path().join("Index.html");

    let rewritten = extract_to_sibling(&markup, "<b>x</b><script>go();</script>").unwrap();

    assert_eq!(rewritten, format!("<b>x</b>{}", placeholder_tag("Index")));
    assert_eq!(fs::read_to_string(temp.path().join("Index_JS.js")).unwrap(), "go();");
}

#[test]
fn test_extract_without_block_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let markup = temp.path().join("Index.html");

    let rewritten = extract_to_sibling(&markup, "<b>x</b>").unwrap();

    assert_eq!(rewritten, "<b>x</b>");
    assert!(!temp.path().join("Index_JS.js").exists());
}

#[test]
fn test_file_round_trip() {
    let temp = TempDir::new().unwrap();
    let markup = temp.path().join("Index.html");
    let original = "<html><script>\nlet n = 1;\n</script></html>";

    let rewritten = extract_to_sibling(&markup, original).unwrap();
    fs::write(&markup, &rewritten).unwrap();

    let restored = inline_from_sibling(&markup, &rewritten).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_inline_picks_up_local_edits() {
    let temp = TempDir::new().unwrap();
    let markup = temp.path().join("Index.html");
    fs::write(temp.path().join("Index_JS.js"), "edited();").unwrap();

    let text = format!("<body>{}</body>", placeholder_tag("Index"));
    let restored = inline_from_sibling(&markup, &text).unwrap();

    assert_eq!(restored, "<body><script>edited();</script></body>");
}

#[test]
fn test_inline_missing_sibling_is_silent_no_op() {
    let temp = TempDir::new().unwrap();
    let markup = temp.path().join("Index.html");
    let text = format!("<body>{}</body>", placeholder_tag("Index"));

    let restored = inline_from_sibling(&markup, &text).unwrap();

    assert_eq!(restored, text);
}
