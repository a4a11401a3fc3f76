//! Season and episode number inference from file names and entry titles.
//!
//! Both extractors run an ordered list of tagged rules; the first rule that
//! matches decides. Season markers beat a bare trailing number because a bare
//! number is just as likely to be a part number.

use lazy_static::lazy_static;
use regex::Regex;

use crate::services::normalizer::{clean_name, strip_playlist_ext};

/// Season used when a file name carries no season information
pub const DEFAULT_SEASON: u32 = 1;

/// A named pattern whose first capture group holds the number
struct NumberRule {
    tag: &'static str,
    pattern: Regex,
}

impl NumberRule {
    fn new(tag: &'static str, pattern: &str) -> Self {
        Self {
            tag,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    fn capture(&self, text: &str) -> Option<u32> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Evaluate rules in order, first match wins
fn first_match(rules: &[NumberRule], text: &str) -> Option<(&'static str, u32)> {
    rules
        .iter()
        .find_map(|rule| rule.capture(text).map(|n| (rule.tag, n)))
}

lazy_static! {
    static ref SEASON_RULES: Vec<NumberRule> = vec![
        // Show_T2, Show_S02, Show_Season3, Show_Temporada4
        NumberRule::new("marker", r"(?i)(?:_T|_S|_Season|_Temporada)(\d+)"),
        // Show_2
        NumberRule::new("trailing", r"_(\d+)$"),
    ];

    static ref EPISODE_RULES: Vec<NumberRule> = vec![
        NumberRule::new("ep", r"(?i)\bep\.?\s*(\d+)"),
        // S01E05, E05
        NumberRule::new("e", r"(?i)(?:^|[^\p{L}])e(\d+)"),
        NumberRule::new("episodio", r"(?i)\bepis[oó]d(?:io|e)\s*\.?\s*(\d+)"),
        NumberRule::new("capitulo", r"(?i)\bcap[ií]tulo\s*\.?\s*(\d+)"),
        NumberRule::new("hash", r"#\s*(\d+)"),
        // "05 - Pilot"
        NumberRule::new("leading", r"^\s*(\d+)\s*-\s"),
        NumberRule::new("digits_only", r"^\s*(\d+)\s*$"),
    ];

    static ref ANY_NUMBER: Regex = Regex::new(r"\d+").unwrap();

    /// Stray part number left at the end of a series file name
    static ref TRAILING_NUMBER: Regex = Regex::new(r"\s+\d+$").unwrap();
}

/// Series title from a root-level file name, so `Show_2.m3u` groups with `Show.m3u`
pub fn extract_series_name(filename: &str) -> String {
    let name = clean_name(filename);
    TRAILING_NUMBER.replace(&name, "").into_owned()
}

/// Season number of a playlist file name, `DEFAULT_SEASON` when none is found
pub fn extract_season_number(filename: &str) -> u32 {
    let stem = strip_playlist_ext(filename);
    match first_match(&SEASON_RULES, stem) {
        Some((tag, season)) => {
            tracing::trace!(filename, rule = tag, season, "season rule matched");
            season
        }
        None => DEFAULT_SEASON,
    }
}

/// Episode number of a playlist entry title.
///
/// Falls back to the last number anywhere in the title. `None` means the
/// title has no digits at all and the caller must number it.
pub fn extract_episode_number(raw_title: &str) -> Option<u32> {
    if let Some((tag, episode)) = first_match(&EPISODE_RULES, raw_title) {
        tracing::trace!(title = raw_title, rule = tag, episode, "episode rule matched");
        return Some(episode);
    }

    ANY_NUMBER
        .find_iter(raw_title)
        .filter_map(|m| m.as_str().parse().ok())
        .last()
}
