mod config;
mod error;
mod models;
mod services;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    assembler::CatalogAssembler,
    export::{
        write_catalog_json, write_epg, write_html, write_playlists, write_readme, write_report_json, EpgOptions,
        EPG_FILE,
    },
    poster::PosterResolver,
};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vod_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();

    tracing::info!("Starting VOD catalog build v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Input: {}", config.input_dir.display());

    // Build catalog
    let posters = PosterResolver::new(&config.poster_dir, &config.poster_prefix, &config.default_poster);
    let assembler = CatalogAssembler::new(&config.input_dir, posters);
    let (catalog, report) = assembler.build();
    report.log_summary();

    // Web outputs
    let data_path = config.web_dir.join("data.json");
    write_catalog_json(&catalog, &data_path).context("Failed to write catalog JSON")?;
    tracing::info!("Catalog saved: {}", data_path.display());

    let report_path = config.web_dir.join("build_report.json");
    write_report_json(&report.summary(), &report_path).context("Failed to write build report")?;

    let html_path = config.web_dir.join("index.html");
    write_html(&catalog, &html_path, &config.site_title, &config.base_url)
        .context("Failed to write index.html")?;
    tracing::info!("Page saved: {}", html_path.display());

    // IPTV outputs
    let playlists = write_playlists(&catalog, &config.playlist_dir, &config.site_title, &config.base_url)
        .context("Failed to write M3U playlists")?;
    tracing::info!("{} playlist(s) saved to {}", playlists.len(), config.playlist_dir.display());

    let epg_path = config.playlist_dir.join(EPG_FILE);
    let epg_options = EpgOptions {
        generator_name: config.site_title.clone(),
        base_url: config.base_url.clone(),
        start: Utc::now(),
        slot: config.epg_slot(),
        programme_length: config.epg_programme_length(),
    };
    write_epg(&catalog, &epg_path, &epg_options).context("Failed to write EPG")?;
    tracing::info!("EPG saved: {}", epg_path.display());

    let readme_path = write_readme(&catalog, &config.playlist_dir, &config.site_title, &config.playlist_base_url)
        .context("Failed to write playlist README")?;
    tracing::info!("Playlist README saved: {}", readme_path.display());

    Ok(())
}
