use anyhow::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::models::{Catalog, CatalogItem, Category};
use crate::services::export::public_url;
use crate::services::output::write_atomic;

/// File name of the playlist holding the whole catalog
pub const COMPLETE_PLAYLIST: &str = "vod.m3u";

/// Guide written next to the playlists
pub const EPG_FILE: &str = "epg.xml";

const README_FILE: &str = "README.md";

/// File name of one category's playlist
pub fn category_playlist(category: Category) -> String {
    format!("vod_{}.m3u", category.key())
}

/// Attribute values are double-quoted, so quotes and line breaks must go
fn attr_value(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Append the EXTINF/url pairs of one catalog item
fn push_item(out: &mut String, category: Category, item: &CatalogItem, base_url: &str) {
    let logo = public_url(base_url, item.poster());
    for (_, entry) in item.entries() {
        let title = match item {
            CatalogItem::Movie(m) => m.title.clone(),
            CatalogItem::Series(s) => format!("{} - {}", s.title, entry.title),
        };
        let _ = writeln!(
            out,
            "#EXTINF:-1 tvg-id=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}",
            attr_value(item.id()),
            attr_value(&logo),
            attr_value(category.label()),
            single_line(&title)
        );
        let _ = writeln!(out, "{}", entry.url);
        out.push('\n');
    }
}

/// Render an M3U playlist for the given categories
pub fn render_playlist(catalog: &Catalog, categories: &[Category], name: &str, base_url: &str) -> String {
    let mut out = String::from("#EXTM3U\n");
    let _ = writeln!(out, "#PLAYLIST:{}", single_line(name));
    out.push('\n');

    for &category in categories {
        for item in catalog.items(category) {
            push_item(&mut out, category, item, base_url);
        }
    }
    out
}

/// Write the complete playlist plus one `vod_<category>.m3u` per non-empty category.
/// Returns the written paths.
pub fn write_playlists(catalog: &Catalog, dir: &Path, site_title: &str, base_url: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let complete = render_playlist(
        catalog,
        &Category::ALL,
        &format!("{} - Catálogo Completo", site_title),
        base_url,
    );
    let path = dir.join(COMPLETE_PLAYLIST);
    write_atomic(&path, complete.as_bytes())?;
    written.push(path);

    for (category, items) in catalog.sections() {
        let playlist = render_playlist(
            catalog,
            &[category],
            &format!("{} - {}", site_title, category.label()),
            base_url,
        );
        let path = dir.join(category_playlist(category));
        write_atomic(&path, playlist.as_bytes())?;
        tracing::info!("Playlist {} ({} item(s))", path.display(), items.len());
        written.push(path);
    }

    Ok(written)
}

/// Link to a file of the playlist directory, relative when no base is set
fn playlist_link(playlist_base_url: &str, file: &str) -> String {
    if playlist_base_url.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", playlist_base_url.trim_end_matches('/'), file)
    }
}

fn push_link(out: &mut String, heading: &str, link: &str) {
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "```\n{}\n```\n", link);
}

/// Render the README listing the complete and per-category playlists
pub fn render_readme(catalog: &Catalog, site_title: &str, playlist_base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# 📡 {} - IPTV\n", single_line(site_title));
    let _ = writeln!(out, "**Total de canais:** {}\n", catalog.stats().episodes);

    out.push_str("## 🔗 Links\n\n");
    push_link(
        &mut out,
        "### Playlist Completa",
        &playlist_link(playlist_base_url, COMPLETE_PLAYLIST),
    );

    out.push_str("### Por Categoria\n");
    for (category, _) in catalog.sections() {
        push_link(
            &mut out,
            &format!("#### {}", category.label()),
            &playlist_link(playlist_base_url, &category_playlist(category)),
        );
    }

    push_link(&mut out, "### Guia (EPG)", &playlist_link(playlist_base_url, EPG_FILE));

    out.push_str("## 📱 Como usar\n\n");
    out.push_str("1. **TiviMate:** Settings → Playlists → Add Playlist → URL\n");
    out.push_str("2. **IPTV Smarters:** Add Playlist → Enter URL\n");
    out.push_str("3. **OTT Navigator:** Import → From URL\n");
    out.push_str("4. **VLC Media Player:** Media → Open Network Stream\n");
    out
}

/// Write `README.md` into the playlist directory
pub fn write_readme(catalog: &Catalog, dir: &Path, site_title: &str, playlist_base_url: &str) -> Result<PathBuf> {
    let path = dir.join(README_FILE);
    write_atomic(&path, render_readme(catalog, site_title, playlist_base_url).as_bytes())?;
    Ok(path)
}
