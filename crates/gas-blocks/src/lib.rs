//! Script block extraction and inlining for markup files.
//!
//! Apps Script serves client JavaScript from inside `.html` files. To keep
//! that code editable as a real `.js` file, the first inline block of a
//! markup file is moved into a sibling file and replaced by a placeholder:
//!
//! ```text
//! Index.html                      Index.html
//! <script>                        <script data-placeholder="Index_JS.js"></script>
//!   run();              ==>
//! </script>                       Index_JS.js
//!                                   run();
//! ```
//!
//! On upload the placeholder is replaced by the sibling's contents again, so
//! the remote project only ever sees plain inline scripts.
//!
//! - [`placeholder`] holds the pure text transforms.
//! - [`sibling`] applies them to files on disk.

pub mod error;
pub mod placeholder;
pub mod sibling;

pub use error::{Error, Result};
pub use placeholder::{
    Split, inline_placeholder, is_placeholder_script, placeholder_file_name,
    placeholder_references, placeholder_tag, split_script_block,
};
pub use sibling::{extract_to_sibling, inline_from_sibling, sibling_path};
