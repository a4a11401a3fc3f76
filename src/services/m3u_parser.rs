use std::fs;
use std::path::Path;

use crate::error::SkipReason;
use crate::models::Entry;
use crate::services::extractor::extract_episode_number;

const EXTINF_PREFIX: &str = "#EXTINF:";

/// Title part of an EXTINF line (text after the first comma).
/// Format: #EXTINF:duration [attributes],Title
fn parse_extinf_title(line: &str) -> Option<Option<&str>> {
    let content = line.strip_prefix(EXTINF_PREFIX)?;
    Some(content.split_once(',').map(|(_, title)| title.trim()))
}

/// Decode playlist bytes as UTF-8, dropping anything that isn't
fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Parse playlist text into entries, in file order.
///
/// Every `#EXTINF:` line immediately followed by a non-comment line yields
/// one entry; anything else is ignored. Entries without a number in their
/// title are numbered by position.
pub fn parse_content(content: &str) -> Vec<Entry> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim().trim_start_matches('\u{feff}'))
        .filter(|l| !l.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut position = 1u32;

    for (i, line) in lines.iter().enumerate() {
        let Some(title) = parse_extinf_title(line) else {
            continue;
        };
        let Some(url) = lines.get(i + 1).filter(|next| !next.starts_with('#')) else {
            tracing::debug!(line = %line, "EXTINF without stream url, skipped");
            continue;
        };

        let title = match title {
            Some(t) => t.to_string(),
            None => format!("Episode {}", position),
        };
        let episode = extract_episode_number(&title).unwrap_or(position);

        entries.push(Entry {
            title,
            url: url.to_string(),
            episode: Some(episode),
        });
        position += 1;
    }

    entries
}

/// Read and parse one playlist file.
///
/// Never panics on bad input: unreadable files and files without any
/// playable entry come back as a skip reason for the caller to record.
pub fn parse_playlist(path: &Path) -> Result<Vec<Entry>, SkipReason> {
    let bytes = fs::read(path).map_err(|source| SkipReason::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_content(&decode_lossy(&bytes));
    if entries.is_empty() {
        return Err(SkipReason::NoEntries {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "playlist parsed");
    Ok(entries)
}

/// True for `.m3u` / `.m3u8` files (any case)
pub fn is_playlist_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("m3u") || ext.eq_ignore_ascii_case("m3u8"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_extinf_title() {
        let line = r#"#EXTINF:-1 tvg-logo="http://logo.com/a.png" group-title="TV",Globo HD"#;
        assert_eq!(parse_extinf_title(line), Some(Some("Globo HD")));
        assert_eq!(parse_extinf_title("#EXTINF:-1,Canal, Teste"), Some(Some("Canal, Teste")));
        assert_eq!(parse_extinf_title("#EXTINF:-1"), Some(None));
        assert_eq!(parse_extinf_title("http://example.com"), None);
    }

    #[test]
    fn test_parse_content_in_file_order() {
        let content = "#EXTM3U\n\
            #EXTINF:-1,Ep 02 - Segundo\n\
            http://cdn.example/2.mp4\n\
            \n\
            #EXTINF:-1,Ep 01 - Primeiro\n\
            http://cdn.example/1.mp4\n\
            #EXTINF:-1,Ep 03 - Terceiro\n\
            http://cdn.example/3.mp4\n";

        let entries = parse_content(content);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "Ep 02 - Segundo");
        assert_eq!(entries[0].url, "http://cdn.example/2.mp4");
        assert_eq!(entries[0].episode, Some(2));
        assert_eq!(entries[1].episode, Some(1));
        assert_eq!(entries[2].url, "http://cdn.example/3.mp4");
    }

    #[test]
    fn test_parse_content_skips_header_without_url() {
        let content = "#EXTM3U\n\
            #EXTINF:-1,Orphan\n\
            #EXTINF:-1,Kept\n\
            http://cdn.example/kept.mp4\n\
            #EXTINF:-1,Trailing\n";

        let entries = parse_content(content);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Kept");
    }

    #[test]
    fn test_parse_content_placeholder_and_sequential_numbers() {
        let content = "#EXTINF:-1,Abertura\n\
            http://cdn.example/a.mp4\n\
            #EXTINF:-1\n\
            http://cdn.example/b.mp4\n";

        let entries = parse_content(content);
        assert_eq!(entries[0].title, "Abertura");
        assert_eq!(entries[0].episode, Some(1));
        assert_eq!(entries[1].title, "Episode 2");
        assert_eq!(entries[1].episode, Some(2));
    }

    #[test]
    fn test_parse_content_crlf() {
        let entries = parse_content("#EXTINF:-1,Filme\r\nhttp://cdn.example/f.mp4\r\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "http://cdn.example/f.mp4");
    }

    #[test]
    fn test_parse_playlist_drops_invalid_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#EXTINF:-1,Cap\xff\xfe\xc3\xadtulo 4\nhttp://cdn.example/4.mp4\n")
            .unwrap();

        let entries = parse_playlist(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Capítulo 4");
        assert_eq!(entries[0].episode, Some(4));
    }

    #[test]
    fn test_parse_playlist_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_playlist(&dir.path().join("nope.m3u"));
        assert!(matches!(result, Err(SkipReason::UnreadableFile { .. })));
    }

    #[test]
    fn test_parse_playlist_without_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#EXTM3U\n# just a comment\n").unwrap();

        let result = parse_playlist(file.path());
        assert!(matches!(result, Err(SkipReason::NoEntries { .. })));
    }

    #[test]
    fn test_is_playlist_file() {
        assert!(is_playlist_file(Path::new("a/Show_T1.m3u")));
        assert!(is_playlist_file(Path::new("Show.M3U8")));
        assert!(!is_playlist_file(Path::new("poster.jpg")));
        assert!(!is_playlist_file(Path::new("m3u")));
    }
}
