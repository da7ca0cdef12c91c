//! Artwork domain model.
//!
//! Artworks are read-only projections of backend data. The only local
//! annotations are favorite membership and ratings, both kept outside the
//! artwork itself by the application state.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend identifier of an artwork.
///
/// Collection ids arrive as JSON numbers and locally imported ids as strings;
/// both are normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtworkId(String);

impl ArtworkId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArtworkId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        let id = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        if id.trim().is_empty() {
            return Err(serde::de::Error::custom("artwork id is empty"));
        }
        Ok(Self(id))
    }
}

/// An artwork from the collection.
///
/// Only `id` and `title` are required; every descriptive field is optional
/// because the backend omits what the museum record does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "objectURL")]
    pub object_url: Option<String>,
    #[serde(default, rename = "creditLine")]
    pub credit_line: Option<String>,
    #[serde(default, rename = "artistDisplayBio")]
    pub artist_bio: Option<String>,
    #[serde(default, rename = "artistNationality")]
    pub artist_nationality: Option<String>,
}

impl Artwork {
    /// Creates an artwork with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ArtworkId::new(id),
            title: title.into(),
            artist: None,
            date: None,
            medium: None,
            dimensions: None,
            department: None,
            culture: None,
            image: None,
            object_url: None,
            credit_line: None,
            artist_bio: None,
            artist_nationality: None,
        }
    }

    /// Artist name for list display, `"Unknown artist"` when absent or blank.
    #[must_use]
    pub fn artist_or_unknown(&self) -> &str {
        self.artist
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or("Unknown artist")
    }

    /// Descriptive `(label, value)` pairs for the detail panel, skipping empty fields.
    #[must_use]
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        [
            ("Artist", self.artist.as_deref()),
            ("Bio", self.artist_bio.as_deref()),
            ("Nationality", self.artist_nationality.as_deref()),
            ("Date", self.date.as_deref()),
            ("Medium", self.medium.as_deref()),
            ("Dimensions", self.dimensions.as_deref()),
            ("Department", self.department.as_deref()),
            ("Culture", self.culture.as_deref()),
            ("Credit", self.credit_line.as_deref()),
            ("Link", self.object_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value.filter(|v| !v.trim().is_empty()).map(|v| (label, v))
        })
        .collect()
    }
}

/// A museum department, as listed by `GET /api/departments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Named numeric counters from `GET /api/stats`, in key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionStats {
    pub counters: Vec<(String, f64)>,
}

impl CollectionStats {
    /// Looks up a counter by its backend key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.counters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let a: Artwork = serde_json::from_str(r#"{"id": 436535, "title": "Wheat Field"}"#).unwrap();
        let b: Artwork = serde_json::from_str(r#"{"id": "local-7", "title": "Study"}"#).unwrap();
        assert_eq!(a.id.as_str(), "436535");
        assert_eq!(b.id.as_str(), "local-7");
    }

    #[test]
    fn empty_id_is_rejected() {
        let result: std::result::Result<Artwork, _> =
            serde_json::from_str(r#"{"id": " ", "title": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn camel_case_fields_map_to_snake_case() {
        let art: Artwork = serde_json::from_str(
            r#"{"id":1,"title":"Bridge","objectURL":"https://example.org/1","artistDisplayBio":"French, 1840-1926"}"#,
        )
        .unwrap();
        assert_eq!(art.object_url.as_deref(), Some("https://example.org/1"));
        let details = art.details();
        assert_eq!(details, vec![("Bio", "French, 1840-1926"), ("Link", "https://example.org/1")]);
    }

    #[test]
    fn missing_artist_reads_unknown() {
        let mut art = Artwork::new("1", "Untitled");
        assert_eq!(art.artist_or_unknown(), "Unknown artist");
        art.artist = Some("Claude Monet".into());
        assert_eq!(art.artist_or_unknown(), "Claude Monet");
    }
}
