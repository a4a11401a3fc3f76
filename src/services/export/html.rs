use anyhow::Result;
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::path::Path;

use crate::models::{Catalog, CatalogItem};
use crate::services::export::public_url;
use crate::services::output::write_atomic;

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, sans-serif; background: #141414; color: #fff; line-height: 1.4; }
header { padding: 20px 50px; }
header h1 { font-size: 2.5rem; color: #e50914; }
section { margin-bottom: 40px; padding: 0 50px; }
section h2 { font-size: 1.4rem; margin-bottom: 15px; }
.grid { display: flex; flex-wrap: wrap; gap: 10px; }
.card { width: 220px; background: #181818; border-radius: 4px; overflow: hidden; }
.card img { width: 100%; height: 320px; object-fit: cover; display: block; }
.card .meta { padding: 10px; font-size: 0.85rem; color: #b3b3b3; }
.card h3 { font-size: 1.1rem; color: #fff; margin-bottom: 5px; }
details { margin-top: 8px; }
details h4 { margin: 6px 0 2px; color: #fff; }
details a { display: block; color: #e5e5e5; text-decoration: none; padding: 2px 0; }
details a:hover { color: #e50914; }
"#;

fn esc(text: &str) -> String {
    escape(text).into_owned()
}

fn item_meta(item: &CatalogItem) -> String {
    match item {
        CatalogItem::Movie(m) => format!("Filme • {} link(s)", m.episodes.len()),
        CatalogItem::Series(s) if s.seasons.len() > 1 => {
            format!("{} temporadas • {} episódios", s.seasons.len(), s.episode_count())
        }
        CatalogItem::Series(s) => format!("{} episódios", s.episode_count()),
    }
}

fn push_card(out: &mut String, item: &CatalogItem, base_url: &str) {
    let poster = public_url(base_url, item.poster());
    let _ = writeln!(out, r#"<article class="card" id="{}">"#, esc(item.id()));
    let _ = writeln!(
        out,
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        esc(&poster),
        esc(item.title())
    );
    let _ = writeln!(out, r#"<div class="meta"><h3>{}</h3>{}"#, esc(item.title()), esc(&item_meta(item)));
    out.push_str("<details><summary>Assistir</summary>\n");

    match item {
        CatalogItem::Movie(m) => {
            for entry in &m.episodes {
                let _ = writeln!(out, r#"<a href="{}">{}</a>"#, esc(&entry.url), esc(&entry.title));
            }
        }
        CatalogItem::Series(s) => {
            for season in &s.seasons {
                if s.seasons.len() > 1 {
                    let _ = writeln!(out, "<h4>Temporada {}</h4>", season.season);
                }
                for entry in &season.episodes {
                    let _ = writeln!(out, r#"<a href="{}">{}</a>"#, esc(&entry.url), esc(&entry.title));
                }
            }
        }
    }

    out.push_str("</details></div>\n</article>\n");
}

/// Render the static browsing page
pub fn render_html(catalog: &Catalog, site_title: &str, base_url: &str) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, r#"<html lang="pt-BR">"#);
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, r#"<meta charset="UTF-8">"#);
    let _ = writeln!(out, r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#);
    let _ = writeln!(out, "<title>{}</title>", esc(site_title));
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<header><h1>{}</h1></header>", esc(site_title));
    let _ = writeln!(out, "<main>");

    for (category, items) in catalog.sections() {
        let _ = writeln!(out, r#"<section id="{}">"#, category.key());
        let _ = writeln!(out, "<h2>{}</h2>", esc(category.label()));
        out.push_str(r#"<div class="grid">"#);
        out.push('\n');
        for item in items {
            push_card(&mut out, item, base_url);
        }
        out.push_str("</div>\n</section>\n");
    }

    let _ = writeln!(out, "</main>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

/// Write `index.html`
pub fn write_html(catalog: &Catalog, path: &Path, site_title: &str, base_url: &str) -> Result<usize> {
    let html = render_html(catalog, site_title, base_url);
    write_atomic(path, html.as_bytes())
}
