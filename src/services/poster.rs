use std::fs;
use std::path::{Path, PathBuf};

use crate::services::normalizer::slugify;

/// Image extensions considered posters, in lookup order
const POSTER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Maps display names to poster files in a flat image directory.
///
/// Resolved paths are logical: `{prefix}/{file name}`. Turning them into
/// URLs is up to whoever renders them.
#[derive(Debug, Clone)]
pub struct PosterResolver {
    poster_dir: PathBuf,
    prefix: String,
    default_poster: String,
}

impl PosterResolver {
    pub fn new(poster_dir: impl Into<PathBuf>, prefix: &str, default_poster: &str) -> Self {
        Self {
            poster_dir: poster_dir.into(),
            prefix: prefix.trim_end_matches('/').to_string(),
            default_poster: default_poster.to_string(),
        }
    }

    /// Path returned when nothing matches
    pub fn default_path(&self) -> String {
        self.logical_path(&self.default_poster)
    }

    fn logical_path(&self, file_name: &str) -> String {
        if self.prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.prefix, file_name)
        }
    }

    /// Exact file names tried before the fuzzy scan
    fn candidates(name_slug: &str, category: &str) -> Vec<String> {
        let category_slug = (!category.trim().is_empty()).then(|| slugify(category));
        let mut candidates = Vec::with_capacity(POSTER_EXTENSIONS.len() * 2);
        for ext in POSTER_EXTENSIONS {
            candidates.push(format!("{}.{}", name_slug, ext));
            if let Some(cat) = &category_slug {
                candidates.push(format!("{}_{}.{}", name_slug, cat, ext));
            }
        }
        candidates
    }

    /// Resolve the poster for a title.
    ///
    /// Order: exact `{slug}.{ext}` / `{slug}_{category}.{ext}`, then the first
    /// image (by file name) whose slug contains the title slug or is
    /// contained in it, then the default poster.
    pub fn resolve(&self, display_name: &str, category: &str) -> String {
        if !self.poster_dir.is_dir() {
            return self.default_path();
        }

        let name_slug = slugify(display_name);

        for candidate in Self::candidates(&name_slug, category) {
            if self.poster_dir.join(&candidate).is_file() {
                return self.logical_path(&candidate);
            }
        }

        if let Some(file_name) = self.fuzzy_match(&name_slug) {
            tracing::debug!(title = display_name, poster = %file_name, "poster matched by similarity");
            return self.logical_path(&file_name);
        }

        tracing::debug!(title = display_name, "no poster found, using default");
        self.default_path()
    }

    fn fuzzy_match(&self, name_slug: &str) -> Option<String> {
        let entries = match fs::read_dir(&self.poster_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list poster directory {}: {}", self.poster_dir.display(), e);
                return None;
            }
        };

        let mut images: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image(path))
            .collect();
        images.sort();

        images.into_iter().find_map(|path| {
            let stem = path.file_stem()?.to_string_lossy();
            let file_slug = slugify(&stem);
            if file_slug.contains(name_slug) || name_slug.contains(file_slug.as_str()) {
                path.file_name().map(|n| n.to_string_lossy().into_owned())
            } else {
                None
            }
        })
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| POSTER_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
