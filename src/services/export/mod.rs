//! Catalog emitters
//!
//! Everything downstream of the assembler: the JSON catalog, the static
//! browsing page, M3U playlists with their README and the XMLTV guide. All files are written
//! through [`crate::services::output::AtomicFileWriter`].

pub mod epg;
pub mod html;
pub mod json;
pub mod m3u;

pub use epg::{write_epg, EpgOptions};
pub use html::write_html;
pub use json::{write_catalog_json, write_report_json};
pub use m3u::{write_playlists, write_readme, EPG_FILE};

/// Public URL of a logical poster path under `base_url`.
///
/// Absolute http(s) URLs pass through untouched.
pub fn public_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
