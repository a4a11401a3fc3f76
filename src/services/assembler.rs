//! Catalog assembly
//!
//! Walks the input tree one category folder at a time:
//!
//! - **Movies**: every playlist file in the folder is one movie.
//! - **Everything else**: playlist files in the folder root are grouped by
//!   series name (one file = one season, several files = one season each),
//!   and every subfolder is one series whose files are its seasons.
//!
//! Nothing here aborts a build. Each unusable file or folder is recorded as a
//! [`SkipReason`] in the [`BuildReport`] and the walk continues.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SkipReason;
use crate::models::{Catalog, CatalogItem, CatalogStats, Category, Movie, Season, Series};
use crate::services::extractor::{extract_season_number, extract_series_name, DEFAULT_SEASON};
use crate::services::m3u_parser::{is_playlist_file, parse_playlist};
use crate::services::normalizer::{clean_name, slugify};
use crate::services::poster::PosterResolver;

/// What happened during a build besides the catalog itself
#[derive(Debug, Default)]
pub struct BuildReport {
    pub stats: CatalogStats,
    pub skipped: Vec<SkipReason>,
}

impl BuildReport {
    fn skip(&mut self, reason: SkipReason) {
        tracing::warn!("Skipped: {}", reason);
        self.skipped.push(reason);
    }

    /// Summary suitable for logs or a JSON report
    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            stats: self.stats,
            skipped: self.skipped.iter().map(ToString::to_string).collect(),
        }
    }

    /// Number of skips per kind, ordered by kind
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for reason in &self.skipped {
            *counts.entry(reason.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn log_summary(&self) {
        tracing::info!(
            items = self.stats.items,
            movies = self.stats.movies,
            series = self.stats.series,
            seasons = self.stats.seasons,
            episodes = self.stats.episodes,
            skipped = self.skipped.len(),
            "Catalog built"
        );
        for (kind, count) in self.skip_counts() {
            tracing::warn!(kind, count, "Skipped during build");
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub stats: CatalogStats,
    pub skipped: Vec<String>,
}

/// Playlist files and subfolders directly inside a folder, sorted by name
#[derive(Debug, Default)]
struct FolderListing {
    playlists: Vec<PathBuf>,
    subfolders: Vec<PathBuf>,
}

fn list_folder(path: &Path) -> Result<FolderListing, SkipReason> {
    let entries = fs::read_dir(path).map_err(|source| SkipReason::UnreadableDir {
        path: path.to_path_buf(),
        source,
    })?;

    let mut listing = FolderListing::default();
    for entry in entries {
        let entry_path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Cannot read entry in {}: {}", path.display(), e);
                continue;
            }
        };
        if entry_path.is_dir() {
            listing.subfolders.push(entry_path);
        } else if is_playlist_file(&entry_path) {
            listing.playlists.push(entry_path);
        }
    }
    listing.playlists.sort();
    listing.subfolders.sort();
    Ok(listing)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builds a [`Catalog`] from a category folder tree
pub struct CatalogAssembler {
    input_dir: PathBuf,
    posters: PosterResolver,
}

impl CatalogAssembler {
    pub fn new(input_dir: impl Into<PathBuf>, posters: PosterResolver) -> Self {
        Self {
            input_dir: input_dir.into(),
            posters,
        }
    }

    /// Build the whole catalog from scratch
    pub fn build(&self) -> (Catalog, BuildReport) {
        let mut catalog = Catalog::default();
        let mut report = BuildReport::default();

        for category in Category::ALL {
            let Some(dir) = self.category_dir(category) else {
                report.skip(SkipReason::MissingCategory {
                    category: category.key().to_string(),
                    root: self.input_dir.clone(),
                });
                continue;
            };

            tracing::info!("Processing {} from {}", category, dir.display());
            let items = catalog.items_mut(category);
            if category.is_movies() {
                self.process_movies(&dir, items, &mut report);
            } else {
                self.process_series_category(category, &dir, items, &mut report);
            }
            tracing::info!("{}: {} item(s)", category, items.len());
        }

        report.stats = catalog.stats();
        (catalog, report)
    }

    fn category_dir(&self, category: Category) -> Option<PathBuf> {
        category
            .folder_names()
            .iter()
            .map(|name| self.input_dir.join(name))
            .find(|path| path.is_dir())
    }

    fn process_movies(&self, dir: &Path, items: &mut Vec<CatalogItem>, report: &mut BuildReport) {
        let listing = match list_folder(dir) {
            Ok(listing) => listing,
            Err(reason) => return report.skip(reason),
        };

        for path in &listing.playlists {
            let episodes = match parse_playlist(path) {
                Ok(episodes) => episodes,
                Err(reason) => {
                    report.skip(reason);
                    continue;
                }
            };

            let title = clean_name(&file_name(path));
            let movie = Movie {
                id: slugify(&title),
                poster: self.posters.resolve(&title, Category::Movies.key()),
                title,
                episodes,
            };
            tracing::info!("Movie {}: {} link(s) (id: {})", movie.title, movie.episodes.len(), movie.id);
            items.push(CatalogItem::Movie(movie));
        }
    }

    fn process_series_category(
        &self,
        category: Category,
        dir: &Path,
        items: &mut Vec<CatalogItem>,
        report: &mut BuildReport,
    ) {
        let listing = match list_folder(dir) {
            Ok(listing) => listing,
            Err(reason) => return report.skip(reason),
        };

        self.process_root_files(category, &listing.playlists, items, report);

        for folder in &listing.subfolders {
            self.process_series_folder(category, folder, items, report);
        }
    }

    /// Group root-level files by series name, keeping first-seen order
    fn process_root_files(
        &self,
        category: Category,
        files: &[PathBuf],
        items: &mut Vec<CatalogItem>,
        report: &mut BuildReport,
    ) {
        let mut groups: Vec<(String, Vec<PathBuf>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for path in files {
            let name = extract_series_name(&file_name(path));
            match index.get(&name) {
                Some(&i) => groups[i].1.push(path.clone()),
                None => {
                    index.insert(name.clone(), groups.len());
                    groups.push((name, vec![path.clone()]));
                }
            }
        }

        for (title, files) in groups {
            if let Some(series) = self.build_series(category, title, &files, report) {
                items.push(CatalogItem::Series(series));
            }
        }
    }

    /// One subfolder is one series
    fn process_series_folder(
        &self,
        category: Category,
        folder: &Path,
        items: &mut Vec<CatalogItem>,
        report: &mut BuildReport,
    ) {
        let listing = match list_folder(folder) {
            Ok(listing) => listing,
            Err(reason) => return report.skip(reason),
        };

        if listing.playlists.is_empty() {
            return report.skip(SkipReason::EmptyFolder {
                path: folder.to_path_buf(),
            });
        }

        let title = clean_name(&file_name(folder));
        if let Some(series) = self.build_series(category, title, &listing.playlists, report) {
            items.push(CatalogItem::Series(series));
        }
    }

    /// A single file is season 1; several files give one season each
    fn build_series(
        &self,
        category: Category,
        title: String,
        files: &[PathBuf],
        report: &mut BuildReport,
    ) -> Option<Series> {
        let single = files.len() == 1;
        let mut seasons = Vec::with_capacity(files.len());

        for path in files {
            let season = if single {
                DEFAULT_SEASON
            } else {
                extract_season_number(&file_name(path))
            };
            match parse_playlist(path) {
                Ok(episodes) => seasons.push(Season { season, episodes }),
                Err(reason) => report.skip(reason),
            }
        }

        // A lone empty file was already reported by the parser
        if single && seasons.is_empty() {
            return None;
        }

        let id = slugify(&title);
        let poster = self.posters.resolve(&title, category.key());
        match Series::from_seasons(id, title.clone(), poster, category, seasons) {
            Some(series) => {
                tracing::info!(
                    "Series {}: {} season(s), {} episode(s) (id: {})",
                    series.title,
                    series.seasons.len(),
                    series.episode_count(),
                    series.id
                );
                Some(series)
            }
            None => {
                report.skip(SkipReason::NoSeasons { title });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(count: usize, prefix: &str) -> String {
        let mut content = String::from("#EXTM3U\n");
        for i in 1..=count {
            content.push_str(&format!(
                "#EXTINF:-1,{} Ep {}\nhttp://cdn.example/{}/{}.mp4\n",
                prefix, i, prefix, i
            ));
        }
        content
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn assembler(root: &Path) -> CatalogAssembler {
        CatalogAssembler::new(
            root.join("input"),
            PosterResolver::new(root.join("posters"), "assets/Capas", "default.jpg"),
        )
    }

    fn series(item: &CatalogItem) -> &Series {
        match item {
            CatalogItem::Series(s) => s,
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_season_folder() {
        let root = tempfile::tempdir().unwrap();
        let show = root.path().join("input/Series/Show");
        write(&show.join("Show_T1.m3u"), &playlist(2, "a"));
        write(&show.join("Show_T2.m3u"), &playlist(2, "b"));
        write(&show.join("Show_T10.m3u"), &playlist(2, "c"));

        let (catalog, _) = assembler(root.path()).build();

        assert_eq!(catalog.series.len(), 1);
        let show = series(&catalog.series[0]);
        assert_eq!(show.title, "Show");
        assert_eq!(show.id, "show");
        assert_eq!(show.category, Category::Series);
        let numbers: Vec<u32> = show.seasons.iter().map(|s| s.season).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(show.episode_count(), 6);
        assert!(show.episodes.is_none());
        assert_eq!(show.seasons[2].episodes[0].url, "http://cdn.example/c/1.mp4");
    }

    #[test]
    fn test_single_root_file_series() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("input/Novelas/Show.m3u"), &playlist(5, "s"));

        let (catalog, _) = assembler(root.path()).build();

        assert_eq!(catalog.soap_operas.len(), 1);
        let show = series(&catalog.soap_operas[0]);
        assert_eq!(show.seasons.len(), 1);
        assert_eq!(show.seasons[0].season, 1);
        assert_eq!(show.seasons[0].episodes.len(), 5);
        assert_eq!(show.episodes.as_ref(), Some(&show.seasons[0].episodes));
        assert_eq!(show.poster, "assets/Capas/default.jpg");
    }

    #[test]
    fn test_root_files_grouped_by_series_name() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("input/Novelas");
        write(&dir.join("maria_do_bairro.m3u"), &playlist(3, "m1"));
        write(&dir.join("maria_do_bairro_2.m3u"), &playlist(2, "m2"));
        write(&dir.join("tres_gracas.m3u"), &playlist(1, "t"));

        let (catalog, _) = assembler(root.path()).build();

        assert_eq!(catalog.soap_operas.len(), 2);
        let maria = series(&catalog.soap_operas[0]);
        assert_eq!(maria.title, "Maria Do Bairro");
        let numbers: Vec<u32> = maria.seasons.iter().map(|s| s.season).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(series(&catalog.soap_operas[1]).title, "Tres Gracas");
    }

    #[test]
    fn test_movies() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("input/Filmes");
        write(&dir.join("matrix.m3u"), &playlist(1, "matrix"));
        write(&dir.join("vazio.m3u"), "#EXTM3U\n");
        write(&dir.join("avatar_2.M3U8"), &playlist(2, "avatar"));
        fs::create_dir_all(root.path().join("posters")).unwrap();
        fs::write(root.path().join("posters/matrix.jpg"), b"img").unwrap();

        let (catalog, report) = assembler(root.path()).build();

        let titles: Vec<&str> = catalog.movies.iter().map(|m| m.title()).collect();
        assert_eq!(titles, vec!["Avatar 2", "Matrix"]);
        assert_eq!(catalog.movies[1].poster(), "assets/Capas/matrix.jpg");
        assert!(matches!(catalog.movies[0], CatalogItem::Movie(ref m) if m.episodes.len() == 2));
        assert!(report
            .skipped
            .iter()
            .any(|r| matches!(r, SkipReason::NoEntries { path } if path.ends_with("vazio.m3u"))));
    }

    #[test]
    fn test_english_folder_alias() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("input/Kids/Bluey.m3u"), &playlist(1, "b"));

        let (catalog, _) = assembler(root.path()).build();
        assert_eq!(catalog.kids.len(), 1);
    }

    #[test]
    fn test_missing_categories_are_reported() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("input/Animes/Naruto.m3u"), &playlist(1, "n"));

        let (catalog, report) = assembler(root.path()).build();

        assert_eq!(catalog.anime.len(), 1);
        let missing = report
            .skipped
            .iter()
            .filter(|r| matches!(r, SkipReason::MissingCategory { .. }))
            .count();
        assert_eq!(missing, 4);
        assert_eq!(report.skip_counts().get("missing_category"), Some(&4));
        assert_eq!(report.stats.items, 1);
    }

    #[test]
    fn test_series_without_content_is_dropped() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("input/Series");
        write(&dir.join("Empty/Empty_T1.m3u"), "#EXTM3U\n");
        write(&dir.join("Empty/Empty_T2.m3u"), "#EXTINF:-1,no url\n");
        fs::create_dir_all(dir.join("NoFiles")).unwrap();
        write(&dir.join("Partial/Partial_T1.m3u"), "#EXTM3U\n");
        write(&dir.join("Partial/Partial_T2.m3u"), &playlist(3, "p"));

        let (catalog, report) = assembler(root.path()).build();

        assert_eq!(catalog.series.len(), 1);
        let partial = series(&catalog.series[0]);
        assert_eq!(partial.title, "Partial");
        assert_eq!(partial.seasons.len(), 1);
        assert_eq!(partial.seasons[0].season, 2);
        assert_eq!(partial.episodes.as_ref().map(Vec::len), Some(3));

        assert!(report
            .skipped
            .iter()
            .any(|r| matches!(r, SkipReason::NoSeasons { title } if title == "Empty")));
        assert!(report
            .skipped
            .iter()
            .any(|r| matches!(r, SkipReason::EmptyFolder { path } if path.ends_with("NoFiles"))));
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("input/Series");
        write(&dir.join("Dark.m3u"), &playlist(1, "root"));
        write(&dir.join("dark/Dark_S1.m3u"), &playlist(1, "folder"));

        let (catalog, _) = assembler(root.path()).build();

        assert_eq!(catalog.series.len(), 2);
        assert_eq!(catalog.series[0].id(), "dark");
        assert_eq!(catalog.series[1].id(), "dark");
    }

    #[test]
    fn test_series_category_matches_its_list() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("input");
        write(&input.join("Series/Dark.m3u"), &playlist(1, "d"));
        write(&input.join("Novelas/Avenida/Avenida_T1.m3u"), &playlist(1, "a"));
        write(&input.join("Animes/Naruto.m3u"), &playlist(1, "n"));
        write(&input.join("Infantil/Bluey.m3u"), &playlist(1, "b"));

        let (catalog, _) = assembler(root.path()).build();

        for (category, items) in catalog.sections() {
            assert_eq!(items.len(), 1, "{}", category);
            assert_eq!(series(&items[0]).category, category);
        }
        assert_eq!(catalog.sections().count(), 4);
    }

    #[test]
    fn test_unreadable_folder_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("input/Series/Gone");
        let assembler = assembler(root.path());
        let mut items = Vec::new();
        let mut report = BuildReport::default();

        assembler.process_series_folder(Category::Series, &gone, &mut items, &mut report);

        assert!(items.is_empty());
        assert!(matches!(
            report.skipped.as_slice(),
            [SkipReason::UnreadableDir { path, .. }] if path == &gone
        ));
        assert_eq!(report.skip_counts().get("unreadable_dir"), Some(&1));
    }

    #[cfg(unix)]
    #[test]
    fn test_locked_folder_does_not_stop_the_build() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("input/Series");
        write(&dir.join("Locked/Locked_T1.m3u"), &playlist(1, "l"));
        write(&dir.join("Open/Open_T1.m3u"), &playlist(2, "o"));
        let locked = dir.join("Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // root ignores directory permissions
        let enforced = fs::read_dir(&locked).is_err();

        let (catalog, report) = assembler(root.path()).build();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let titles: Vec<&str> = catalog.series.iter().map(|s| s.title()).collect();
        if enforced {
            assert_eq!(titles, vec!["Open"]);
            assert!(report
                .skipped
                .iter()
                .any(|r| matches!(r, SkipReason::UnreadableDir { path, .. } if path == &locked)));
        } else {
            assert_eq!(titles, vec!["Locked", "Open"]);
        }
    }

    #[test]
    fn test_rebuild_is_identical() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("input/Series/Show/Show_S2.m3u"), &playlist(2, "x"));
        write(&root.path().join("input/Series/Show/Show_S1.m3u"), &playlist(2, "y"));
        write(&root.path().join("input/Filmes/Flow.m3u"), &playlist(1, "f"));

        let assembler = assembler(root.path());
        let (first, _) = assembler.build();
        let (second, _) = assembler.build();
        assert_eq!(first, second);
    }
}
