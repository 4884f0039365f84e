//! Template envelope detection.
//!
//! A config document is treated as a template envelope only when its
//! filename ends in `.yml` and its text starts with a `kind: template`
//! line. The filename check runs first since it is far cheaper than the
//! content scan.

use std::sync::LazyLock;

use regex::Regex;

/// Extension a config file must carry to be considered an envelope.
pub const ENVELOPE_EXTENSION: &str = ".yml";

/// Matches a document whose first line declares `kind: template`.
pub static TEMPLATE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^kind:\s+template+\n").expect("TEMPLATE_FILE_RE must compile")
});

/// Whether the filename is a candidate envelope.
pub fn has_envelope_extension(filename: &str) -> bool {
    filename.ends_with(ENVELOPE_EXTENSION)
}

/// Whether the document text starts with the template marker.
pub fn has_template_marker(data: &str) -> bool {
    TEMPLATE_FILE_RE.is_match(data)
}

/// Whether a config document is a template envelope.
pub fn is_template_envelope(filename: &str, data: &str) -> bool {
    has_envelope_extension(filename) && has_template_marker(data)
}
