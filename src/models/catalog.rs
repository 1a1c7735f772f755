use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single movie in the catalog
///
/// Field names on the wire follow the IMDB Top 1000 dataset. Text fields are
/// optional at the parsing level so that a missing value reaches the document
/// composer as an explicit absence instead of being coerced to an empty string.
/// A missing or null title parses as an empty title, which the composer rejects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Positional index in the catalog, assigned on load
    #[serde(skip)]
    pub id: usize,
    #[serde(
        rename = "Series_Title",
        default,
        deserialize_with = "deserialize_nullable_text"
    )]
    pub title: String,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Overview", default)]
    pub overview: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Star1", default)]
    pub star1: Option<String>,
    #[serde(rename = "Star2", default)]
    pub star2: Option<String>,
    #[serde(rename = "Star3", default)]
    pub star3: Option<String>,
    #[serde(rename = "Star4", default)]
    pub star4: Option<String>,
    #[serde(rename = "IMDB_Rating", default)]
    pub rating: f64,
    #[serde(
        rename = "Released_Year",
        default,
        deserialize_with = "deserialize_lenient_year"
    )]
    pub released_year: Option<i32>,
}

impl CatalogItem {
    /// Creates an item with only a title; the remaining fields are absent
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            genre: None,
            overview: None,
            director: None,
            star1: None,
            star2: None,
            star3: None,
            star4: None,
            rating: 0.0,
            released_year: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }

    /// Sets the principal cast in billing order. Names past the fourth are ignored.
    pub fn with_cast<S: AsRef<str>>(mut self, cast: &[S]) -> Self {
        let mut names = cast.iter().map(|name| Some(name.as_ref().to_string()));
        self.star1 = names.next().flatten();
        self.star2 = names.next().flatten();
        self.star3 = names.next().flatten();
        self.star4 = names.next().flatten();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_released_year(mut self, year: i32) -> Self {
        self.released_year = Some(year);
        self
    }

    /// Principal cast slots in billing order
    pub fn cast(&self) -> [Option<&str>; 4] {
        [
            self.star1.as_deref(),
            self.star2.as_deref(),
            self.star3.as_deref(),
            self.star4.as_deref(),
        ]
    }
}

/// Reads `null` as an empty string
fn deserialize_nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a year as a number, a numeric string, or anything else as unknown.
///
/// The dataset carries values like `"PG"` in the year column for a handful of rows.
fn deserialize_lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let year = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|year| i32::try_from(year).ok())
            .or_else(|| number.as_f64().map(|year| year.trunc() as i32)),
        Some(Value::String(text)) => text.trim().parse::<i32>().ok(),
        _ => None,
    };
    Ok(year)
}
