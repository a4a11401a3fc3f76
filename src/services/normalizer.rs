use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Returned by `slugify` when nothing usable is left
pub const UNKNOWN_SLUG: &str = "unknown";

lazy_static! {
    /// Trailing playlist extension (.m3u / .m3u8)
    static ref PLAYLIST_EXT: Regex = Regex::new(r"(?i)\.m3u8?$").unwrap();
    /// Runs of separators collapse into one underscore
    static ref SEPARATOR_RUN: Regex = Regex::new(r"[\s_\-]+").unwrap();
}

/// Build a stable identifier: accents stripped, ASCII only, lowercase,
/// separators collapsed to `_`. Only `[a-z0-9_]` survives.
pub fn slugify(text: &str) -> String {
    let ascii: String = text
        .nfd()
        .filter(|c| c.is_ascii())
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase();

    let slug = SEPARATOR_RUN.replace_all(&ascii, "_");
    let slug = slug.trim_matches(|c: char| c == '_' || c == '-');

    if slug.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Strip a playlist extension (.m3u / .m3u8, any case)
pub fn strip_playlist_ext(name: &str) -> &str {
    match PLAYLIST_EXT.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Turn a file or folder name into a display title.
///
/// A lone all-caps word is kept as-is (acronyms like `CSI`),
/// anything else is capitalized word by word.
pub fn clean_name(filename: &str) -> String {
    let name = strip_playlist_ext(filename).replace('_', " ");
    let words: Vec<&str> = name.split_whitespace().collect();

    if let [word] = words.as_slice() {
        if is_all_caps(word) {
            return word.to_string();
        }
    }

    words
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the word has at least one cased letter and none are lowercase
fn is_all_caps(word: &str) -> bool {
    word.chars().any(|c| c.is_uppercase()) && !word.chars().any(|c| c.is_lowercase())
}

/// First character uppercased, the rest lowercased
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
