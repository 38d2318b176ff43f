use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// The record kept in the saved list and returned by catalog listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
}

/// Full catalog record for one movie. Serializes to the same flat shape
/// TMDB sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub vote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    W200,
    W500,
    Original,
}

impl PosterSize {
    fn as_path(&self) -> &'static str {
        match self {
            PosterSize::W200 => "w200",
            PosterSize::W500 => "w500",
            PosterSize::Original => "original",
        }
    }
}

impl MovieSummary {
    /// Four-digit year of `release_date`, if there is one.
    pub fn release_year(&self) -> Option<String> {
        let date = self.release_date.trim();
        if date.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) => Some(d.year().to_string()),
            Err(_) => extract_year(date),
        }
    }

    pub fn rating_label(&self) -> String {
        format!("{}/10", self.vote_average.round() as i64)
    }

    pub fn poster_url(&self, size: PosterSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| poster_url(p, size))
    }
}

impl MovieDetail {
    /// Projection stored when the movie is saved.
    pub fn summary(&self) -> MovieSummary {
        self.summary.clone()
    }

    pub fn id(&self) -> i64 {
        self.summary.id
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }

    pub fn company_names(&self) -> Vec<String> {
        self.production_companies
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

pub fn poster_url(path: &str, size: PosterSize) -> String {
    format!("{IMAGE_BASE}/{}{path}", size.as_path())
}

/// `$N million` for large amounts, plain dollars otherwise. Zero means
/// TMDB has no figure.
pub fn format_money(amount: u64) -> Option<String> {
    match amount {
        0 => None,
        a if a >= 1_000_000 => Some(format!("${} million", a / 1_000_000)),
        a => Some(format!("${a}")),
    }
}

fn extract_year(date: &str) -> Option<String> {
    date.split('-')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_json() -> serde_json::Value {
        json!({
            "id": 603,
            "title": "The Matrix",
            "poster_path": "/matrix.jpg",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "vote_count": 25000,
            "runtime": 136,
            "overview": "A hacker learns the truth.",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "budget": 63000000,
            "revenue": 463517383,
            "production_companies": [{"id": 79, "name": "Village Roadshow", "logo_path": null}],
            "tagline": "Welcome to the Real World.",
            "adult": false
        })
    }

    #[test]
    fn detail_decodes_tmdb_shape_and_ignores_extra_fields() {
        let detail: MovieDetail = serde_json::from_value(detail_json()).unwrap();
        assert_eq!(detail.id(), 603);
        assert_eq!(detail.title(), "The Matrix");
        assert_eq!(detail.runtime, Some(136));
        assert_eq!(detail.genre_names(), vec!["Action", "Science Fiction"]);
        assert_eq!(detail.company_names(), vec!["Village Roadshow"]);
        assert_eq!(detail.vote_count, 25000);
    }

    #[test]
    fn summary_projection_keeps_only_summary_fields() {
        let detail: MovieDetail = serde_json::from_value(detail_json()).unwrap();
        let value = serde_json::to_value(detail.summary()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 603,
                "title": "The Matrix",
                "poster_path": "/matrix.jpg",
                "release_date": "1999-03-30",
                "vote_average": 8.2
            })
        );
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = serde_json::from_value::<MovieSummary>(json!({ "title": "No id" }));
        assert!(err.is_err());
    }

    #[test]
    fn null_release_date_and_overview_become_empty() {
        let detail: MovieDetail = serde_json::from_value(json!({
            "id": 1,
            "title": "Untitled",
            "release_date": null,
            "overview": null,
            "poster_path": null
        }))
        .unwrap();
        assert_eq!(detail.summary.release_date, "");
        assert_eq!(detail.overview, "");
        assert!(detail.summary.poster_path.is_none());
        assert!(detail.summary.release_year().is_none());
    }

    #[test]
    fn release_year_handles_partial_dates() {
        let mut movie = MovieSummary {
            id: 1,
            title: "X".to_string(),
            poster_path: None,
            release_date: "2024-01-05".to_string(),
            vote_average: 6.5,
        };
        assert_eq!(movie.release_year().as_deref(), Some("2024"));
        movie.release_date = "2031".to_string();
        assert_eq!(movie.release_year().as_deref(), Some("2031"));
        assert_eq!(movie.rating_label(), "7/10");
    }

    #[test]
    fn poster_urls_use_requested_size() {
        assert_eq!(
            poster_url("/a.jpg", PosterSize::W200),
            "https://image.tmdb.org/t/p/w200/a.jpg"
        );
        assert_eq!(
            poster_url("/a.jpg", PosterSize::Original),
            "https://image.tmdb.org/t/p/original/a.jpg"
        );
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(0), None);
        assert_eq!(format_money(63_000_000).as_deref(), Some("$63 million"));
        assert_eq!(format_money(950).as_deref(), Some("$950"));
    }
}
