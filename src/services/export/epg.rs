//! XMLTV guide with placeholder slots.
//!
//! VOD has no real schedule. Every entry gets a programme starting one slot
//! after the previous one so IPTV players have something to show.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::path::Path;

use crate::models::{Catalog, CatalogItem};
use crate::services::export::public_url;
use crate::services::output::write_atomic;

const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S +0000";

#[derive(Debug, Clone)]
pub struct EpgOptions {
    pub generator_name: String,
    pub base_url: String,
    /// First slot
    pub start: DateTime<Utc>,
    /// Gap between consecutive slots
    pub slot: Duration,
    /// Length of each programme
    pub programme_length: Duration,
}

fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_channel<W: std::io::Write>(writer: &mut Writer<W>, item: &CatalogItem, base_url: &str) -> Result<()> {
    let mut channel = BytesStart::new("channel");
    channel.push_attribute(("id", item.id()));
    writer.write_event(Event::Start(channel))?;

    text_element(writer, "display-name", item.title())?;

    let logo = public_url(base_url, item.poster());
    let mut icon = BytesStart::new("icon");
    icon.push_attribute(("src", logo.as_str()));
    writer.write_event(Event::Empty(icon))?;

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    Ok(())
}

/// Render the guide. Channel ids are catalog item ids; duplicate ids share one channel.
pub fn render_epg(catalog: &Catalog, options: &EpgOptions) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut tv = BytesStart::new("tv");
    tv.push_attribute(("generator-info-name", options.generator_name.as_str()));
    writer.write_event(Event::Start(tv))?;

    let mut seen = HashSet::new();
    for (_, items) in catalog.sections() {
        for item in items {
            if seen.insert(item.id()) {
                write_channel(&mut writer, item, &options.base_url)?;
            }
        }
    }

    let mut start = options.start;
    for (_, items) in catalog.sections() {
        for item in items {
            for (season, entry) in item.entries() {
                let stop = start + options.programme_length;
                let start_str = start.format(XMLTV_TIME_FORMAT).to_string();
                let stop_str = stop.format(XMLTV_TIME_FORMAT).to_string();

                let mut programme = BytesStart::new("programme");
                programme.push_attribute(("channel", item.id()));
                programme.push_attribute(("start", start_str.as_str()));
                programme.push_attribute(("stop", stop_str.as_str()));
                writer.write_event(Event::Start(programme))?;

                text_element(&mut writer, "title", item.title())?;
                let desc = match season {
                    Some(season) => format!("T{} - {}", season, entry.title),
                    None => entry.title.clone(),
                };
                text_element(&mut writer, "desc", &desc)?;
                if let (Some(season), Some(episode)) = (season, entry.episode) {
                    let mut num = BytesStart::new("episode-num");
                    num.push_attribute(("system", "onscreen"));
                    writer.write_event(Event::Start(num))?;
                    writer.write_event(Event::Text(BytesText::new(&format!(
                        "S{:02}E{:02}",
                        season, episode
                    ))))?;
                    writer.write_event(Event::End(BytesEnd::new("episode-num")))?;
                }

                writer.write_event(Event::End(BytesEnd::new("programme")))?;
                start += options.slot;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new("tv")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// Write `epg.xml`
pub fn write_epg(catalog: &Catalog, path: &Path, options: &EpgOptions) -> Result<usize> {
    let xml = render_epg(catalog, options)?;
    write_atomic(path, xml.as_bytes())
}
