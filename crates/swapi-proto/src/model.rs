use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Paged envelope returned by every SWAPI collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapiPage<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A film record as served by `/films/`. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    #[serde(default)]
    pub episode_id: u32,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub planets: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    pub url: String,
}

impl Film {
    /// Year part of `release_date` (`YYYY-MM-DD`), if it parses.
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

/// Minimal projection of a person, starship or vehicle. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub url: String,
}

/// The three searchable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Starship,
    Vehicle,
}

impl EntityKind {
    /// Display order of the search fields.
    pub const ALL: [EntityKind; 3] = [EntityKind::Starship, EntityKind::Person, EntityKind::Vehicle];

    /// Word used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Starship => "starship",
            EntityKind::Vehicle => "vehicle",
        }
    }

    /// Path segment of the remote collection.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Person => "people",
            EntityKind::Starship => "starships",
            EntityKind::Vehicle => "vehicles",
        }
    }

    /// The film's reference list that holds urls of this kind.
    pub fn film_refs(self, film: &Film) -> &[String] {
        match self {
            EntityKind::Person => &film.characters,
            EntityKind::Starship => &film.starships,
            EntityKind::Vehicle => &film.vehicles,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
