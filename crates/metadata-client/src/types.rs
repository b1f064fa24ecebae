use serde::{Deserialize, Serialize};

/// Text shown for any field the provider did not supply
pub const NOT_AVAILABLE: &str = "N/A";

/// Metadata as reported by the provider; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub poster: Option<String>,
}

impl MovieMetadata {
    /// Fill every gap so the result can be displayed without checks
    pub fn normalize(self) -> DisplayMetadata {
        let text = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        DisplayMetadata {
            poster: self
                .poster
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty() && p != NOT_AVAILABLE),
            title: text(self.title),
            year: text(self.year),
            rating: text(self.rating),
            genre: text(self.genre),
            director: text(self.director),
            actors: text(self.actors),
            plot: text(self.plot),
        }
    }
}

/// Metadata ready for display: text fields always set, poster only when a
/// usable URL exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetadata {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
    pub plot: String,
    pub poster: Option<String>,
}

impl DisplayMetadata {
    /// Record used when enrichment is unavailable
    pub fn placeholder() -> Self {
        MovieMetadata::default().normalize()
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl Default for DisplayMetadata {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// `?t=` lookup response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TitleResponse {
    pub response: String,
    pub error: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub poster: Option<String>,
}

impl TitleResponse {
    pub fn found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

impl From<TitleResponse> for MovieMetadata {
    fn from(r: TitleResponse) -> Self {
        MovieMetadata {
            title: r.title,
            year: r.year,
            rating: r.imdb_rating,
            genre: r.genre,
            director: r.director,
            actors: r.actors,
            plot: r.plot,
            poster: r.poster,
        }
    }
}

/// `?s=` search response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchResponse {
    pub response: String,
    pub error: Option<String>,
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchHit {
    pub title: String,
}
