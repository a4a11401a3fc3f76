use chrono::Duration;
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

const DEFAULT_EPG_SLOT_MINUTES: i64 = 1;
const DEFAULT_EPG_PROGRAMME_MINUTES: i64 = 120;

/// Up to one day between slots
const EPG_SLOT_RANGE: RangeInclusive<i64> = 0..=24 * 60;
/// Up to one week per programme
const EPG_PROGRAMME_RANGE: RangeInclusive<i64> = 1..=7 * 24 * 60;

/// Build configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Input
    pub input_dir: PathBuf,

    // Posters
    pub poster_dir: PathBuf,
    pub poster_prefix: String,
    pub default_poster: String,

    // Output
    pub web_dir: PathBuf,
    pub playlist_dir: PathBuf,
    pub base_url: String,
    /// Where the playlist directory is published, used by its README links
    pub playlist_base_url: String,
    pub site_title: String,

    // EPG
    pub epg_slot_minutes: i64,
    pub epg_programme_minutes: i64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Numeric minutes variable clamped into `range`
fn minutes_or(name: &str, default: i64, range: RangeInclusive<i64>) -> i64 {
    parsed_or(name, default).clamp(*range.start(), *range.end())
}

fn minutes_or_default(minutes: i64, default: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or_else(|| Duration::minutes(default))
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Input
            input_dir: PathBuf::from(var_or("INPUT_DIR", "input")),

            // Posters
            poster_dir: PathBuf::from(var_or("POSTER_DIR", "assets/Capas")),
            poster_prefix: var_or("POSTER_PREFIX", "assets/Capas"),
            default_poster: var_or("DEFAULT_POSTER", "default.jpg"),

            // Output
            web_dir: PathBuf::from(var_or("WEB_DIR", "web")),
            playlist_dir: PathBuf::from(var_or("PLAYLIST_DIR", "iptv_playlists")),
            // e.g. "/Pirataflix" when served from a project-pages subpath
            base_url: var_or("BASE_URL", ""),
            playlist_base_url: var_or("PLAYLIST_BASE_URL", ""),
            site_title: var_or("SITE_TITLE", "VOD Catalog"),

            // EPG
            epg_slot_minutes: minutes_or("EPG_SLOT_MINUTES", DEFAULT_EPG_SLOT_MINUTES, EPG_SLOT_RANGE),
            epg_programme_minutes: minutes_or(
                "EPG_PROGRAMME_MINUTES",
                DEFAULT_EPG_PROGRAMME_MINUTES,
                EPG_PROGRAMME_RANGE,
            ),
        }
    }

    /// Gap between EPG slots
    pub fn epg_slot(&self) -> Duration {
        minutes_or_default(self.epg_slot_minutes, DEFAULT_EPG_SLOT_MINUTES)
    }

    /// Length of each EPG programme
    pub fn epg_programme_length(&self) -> Duration {
        minutes_or_default(self.epg_programme_minutes, DEFAULT_EPG_PROGRAMME_MINUTES)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_or_falls_back() {
        env::set_var("VOD_CATALOG_TEST_BAD_NUMBER", "abc");
        env::set_var("VOD_CATALOG_TEST_GOOD_NUMBER", " 15 ");

        assert_eq!(parsed_or("VOD_CATALOG_TEST_BAD_NUMBER", 3i64), 3);
        assert_eq!(parsed_or("VOD_CATALOG_TEST_GOOD_NUMBER", 3i64), 15);
        assert_eq!(parsed_or("VOD_CATALOG_TEST_UNSET_NUMBER", 7i64), 7);
    }

    #[test]
    fn test_epg_minutes_are_clamped() {
        env::set_var("VOD_CATALOG_TEST_HUGE_MINUTES", "999999999999999");
        env::set_var("VOD_CATALOG_TEST_NEGATIVE_MINUTES", "-5");

        assert_eq!(
            minutes_or("VOD_CATALOG_TEST_HUGE_MINUTES", 120, EPG_PROGRAMME_RANGE),
            7 * 24 * 60
        );
        assert_eq!(minutes_or("VOD_CATALOG_TEST_NEGATIVE_MINUTES", 1, EPG_SLOT_RANGE), 0);
        assert_eq!(minutes_or("VOD_CATALOG_TEST_UNSET_MINUTES", 120, EPG_PROGRAMME_RANGE), 120);
    }

    #[test]
    fn test_epg_durations_fall_back_when_out_of_range() {
        let mut config = Config::from_env();
        config.epg_slot_minutes = i64::MAX;
        config.epg_programme_minutes = i64::MIN;

        assert_eq!(config.epg_slot(), Duration::minutes(DEFAULT_EPG_SLOT_MINUTES));
        assert_eq!(
            config.epg_programme_length(),
            Duration::minutes(DEFAULT_EPG_PROGRAMME_MINUTES)
        );

        config.epg_slot_minutes = 5;
        assert_eq!(config.epg_slot(), Duration::minutes(5));
    }
}
