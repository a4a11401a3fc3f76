use serde::{Deserialize, Serialize};

/// Fixed set of catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Movies,
    Series,
    SoapOperas,
    Anime,
    Kids,
}

impl Category {
    /// All categories in output order
    pub const ALL: [Category; 5] = [
        Category::Movies,
        Category::Series,
        Category::SoapOperas,
        Category::Anime,
        Category::Kids,
    ];

    /// Stable key used in JSON and output file names
    pub fn key(self) -> &'static str {
        match self {
            Category::Movies => "movies",
            Category::Series => "series",
            Category::SoapOperas => "soap-operas",
            Category::Anime => "anime",
            Category::Kids => "kids",
        }
    }

    /// Folder names looked up under the input root, first existing one wins
    pub fn folder_names(self) -> &'static [&'static str] {
        match self {
            Category::Movies => &["Filmes", "Movies"],
            Category::Series => &["Series", "Séries"],
            Category::SoapOperas => &["Novelas", "Soap Operas"],
            Category::Anime => &["Animes", "Anime"],
            Category::Kids => &["Infantil", "Kids"],
        }
    }

    /// Label used for M3U group-title and HTML section headings
    pub fn label(self) -> &'static str {
        match self {
            Category::Movies => "🎬 Filmes",
            Category::Series => "📺 Séries",
            Category::SoapOperas => "💖 Novelas",
            Category::Anime => "👻 Animes",
            Category::Kids => "🧸 Infantil",
        }
    }

    /// Movies are flat files, everything else is grouped into series
    pub fn is_movies(self) -> bool {
        self == Category::Movies
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One playable link from a playlist file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub url: String,
    /// Inferred from the title, or the entry's position in its file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

/// Episodes from one playlist file of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season: u32,
    pub episodes: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub episodes: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub title: String,
    pub poster: String,
    pub category: Category,
    /// Sorted ascending by season number
    pub seasons: Vec<Season>,
    /// Flat copy of the only season's episodes, present only for single-season series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<Entry>>,
}

impl Series {
    /// Build a series from collected seasons.
    ///
    /// Returns `None` when there is no season left to show. Seasons are
    /// sorted with a stable sort, so duplicate numbers keep file order.
    pub fn from_seasons(
        id: String,
        title: String,
        poster: String,
        category: Category,
        mut seasons: Vec<Season>,
    ) -> Option<Self> {
        seasons.retain(|s| !s.episodes.is_empty());
        if seasons.is_empty() {
            return None;
        }
        seasons.sort_by_key(|s| s.season);

        let episodes = match seasons.as_slice() {
            [only] => Some(only.episodes.clone()),
            _ => None,
        };

        Some(Self {
            id,
            title,
            poster,
            category,
            seasons,
            episodes,
        })
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

/// A movie or a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogItem {
    Movie(Movie),
    Series(Series),
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.id,
            CatalogItem::Series(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.title,
            CatalogItem::Series(s) => &s.title,
        }
    }

    pub fn poster(&self) -> &str {
        match self {
            CatalogItem::Movie(m) => &m.poster,
            CatalogItem::Series(s) => &s.poster,
        }
    }

    /// Every playable entry with the season it belongs to (movies have none)
    pub fn entries(&self) -> Vec<(Option<u32>, &Entry)> {
        match self {
            CatalogItem::Movie(m) => m.episodes.iter().map(|e| (None, e)).collect(),
            CatalogItem::Series(s) => s
                .seasons
                .iter()
                .flat_map(|season| season.episodes.iter().map(move |e| (Some(season.season), e)))
                .collect(),
        }
    }
}

/// The assembled catalog, keyed by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub movies: Vec<CatalogItem>,
    #[serde(default)]
    pub series: Vec<CatalogItem>,
    #[serde(default, rename = "soap-operas")]
    pub soap_operas: Vec<CatalogItem>,
    #[serde(default)]
    pub anime: Vec<CatalogItem>,
    #[serde(default)]
    pub kids: Vec<CatalogItem>,
}

impl Catalog {
    pub fn items(&self, category: Category) -> &[CatalogItem] {
        match category {
            Category::Movies => &self.movies,
            Category::Series => &self.series,
            Category::SoapOperas => &self.soap_operas,
            Category::Anime => &self.anime,
            Category::Kids => &self.kids,
        }
    }

    /// Mutable handle to one category's items
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<CatalogItem> {
        match category {
            Category::Movies => &mut self.movies,
            Category::Series => &mut self.series,
            Category::SoapOperas => &mut self.soap_operas,
            Category::Anime => &mut self.anime,
            Category::Kids => &mut self.kids,
        }
    }

    /// Non-empty categories in output order
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[CatalogItem])> {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.items(c)))
            .filter(|(_, items)| !items.is_empty())
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for (_, items) in self.sections() {
            for item in items {
                stats.items += 1;
                match item {
                    CatalogItem::Movie(m) => {
                        stats.movies += 1;
                        stats.episodes += m.episodes.len();
                    }
                    CatalogItem::Series(s) => {
                        stats.series += 1;
                        stats.seasons += s.seasons.len();
                        stats.episodes += s.episode_count();
                    }
                }
            }
        }
        stats
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub items: usize,
    pub movies: usize,
    pub series: usize,
    pub seasons: usize,
    pub episodes: usize,
}
