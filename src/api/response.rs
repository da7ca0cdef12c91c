//! Response decoding at the API boundary.
//!
//! Every response body is decoded into a typed shape here. A success body that
//! does not match its shape becomes [`GalleryError::MalformedResponse`]; a
//! non-success status becomes [`GalleryError::Backend`] carrying the backend's
//! own message when it sent one.

use crate::domain::artwork::{Artwork, ArtworkId, CollectionStats, Department};
use crate::domain::error::{GalleryError, Result};
use crate::domain::pagination::{PaginationState, WirePagination};
use crate::domain::rating::Rating;
use crate::domain::user::{Session, UserProfile};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Whether `status` is a 2xx code.
#[must_use]
pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Whether `status` means the bearer token was refused.
#[must_use]
pub const fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the backend's error message from a response body, if any.
#[must_use]
pub fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
}

/// Error for a non-success response.
///
/// Status 0 means the host never got a response and maps to a network error.
#[must_use]
pub fn status_error(status: u16, body: &[u8]) -> GalleryError {
    if status == 0 {
        let detail = String::from_utf8_lossy(body).trim().to_string();
        return GalleryError::Network(if detail.is_empty() {
            "no response from server".to_string()
        } else {
            detail
        });
    }
    GalleryError::Backend {
        status,
        message: error_message(body).unwrap_or_else(|| format!("request failed with status {status}")),
    }
}

/// Decodes a success body into `T`.
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] if the body does not match `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| GalleryError::MalformedResponse(e.to_string()))
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkPage {
    pub artworks: Vec<Artwork>,
    pub pagination: PaginationState,
    /// Ratings embedded in rated-artwork rows, keyed by artwork.
    pub ratings: Vec<(ArtworkId, Rating)>,
}

#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(flatten)]
    artwork: Artwork,
    #[serde(flatten)]
    rating: Rating,
}

#[derive(Debug, Deserialize)]
struct WirePage {
    artworks: Vec<WireRow>,
    #[serde(default)]
    pagination: Option<WirePagination>,
}

/// Decodes a list response for the page that was requested.
///
/// A missing pagination block makes the page final. Rows that carry no
/// rating fields contribute nothing to [`ArtworkPage::ratings`].
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] if `artworks` is missing or any
/// row lacks an id or title.
pub fn decode_artwork_page(body: &[u8], requested_page: u32, limit: u32) -> Result<ArtworkPage> {
    let _span = tracing::debug_span!("decode_artwork_page", requested_page, bytes = body.len()).entered();

    let wire: WirePage = decode(body)?;
    let count = wire.artworks.len();
    let pagination = wire.pagination.map_or_else(
        || PaginationState::single_page(requested_page, limit, count),
        |p| p.resolve(requested_page, limit, count),
    );

    let mut artworks = Vec::with_capacity(count);
    let mut ratings = Vec::new();
    for row in wire.artworks {
        if !row.rating.is_unrated() {
            ratings.push((row.artwork.id.clone(), row.rating));
        }
        artworks.push(row.artwork);
    }

    tracing::debug!(count, page = pagination.page, total_pages = pagination.total_pages, "decoded page");
    Ok(ArtworkPage {
        artworks,
        pagination,
        ratings,
    })
}

#[derive(Debug, Deserialize)]
struct WireAuth {
    token: String,
    user: UserProfile,
}

/// Decodes a login/register success body.
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] if `token` or `user` is missing
/// or the token is empty.
pub fn decode_session(body: &[u8]) -> Result<Session> {
    let wire: WireAuth = decode(body)?;
    if wire.token.trim().is_empty() {
        return Err(GalleryError::MalformedResponse("empty token".to_string()));
    }
    Ok(Session::new(wire.token, wire.user))
}

/// Decodes a `GET /api/ratings/:id` body. An empty or `null` body means unrated.
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] for non-object bodies.
pub fn decode_rating(body: &[u8]) -> Result<Rating> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Rating::default());
    }
    let rating: Option<Rating> = decode(body)?;
    Ok(rating.unwrap_or_default())
}

/// Decodes the department list, bare or wrapped in `departments`.
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] for any other shape.
pub fn decode_departments(body: &[u8]) -> Result<Vec<Department>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Full(Department),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Bare(Vec<Entry>),
        Wrapped { departments: Vec<Entry> },
    }

    let entries = match decode::<Wire>(body)? {
        Wire::Bare(entries) | Wire::Wrapped { departments: entries } => entries,
    };
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Name(name) => Department { name, count: None },
            Entry::Full(department) => department,
        })
        .filter(|d| !d.name.trim().is_empty())
        .collect())
}

/// Decodes `GET /api/stats`, keeping only numeric top-level counters.
///
/// # Errors
///
/// Returns [`GalleryError::MalformedResponse`] if the body is not an object.
pub fn decode_stats(body: &[u8]) -> Result<CollectionStats> {
    let map: serde_json::Map<String, serde_json::Value> = decode(body)?;
    let mut counters: Vec<(String, f64)> = map
        .into_iter()
        .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
        .collect();
    counters.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(CollectionStats { counters })
}

/// Decodes the human-readable `message` of an account operation, if present.
#[must_use]
pub fn decode_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct Wire {
        message: Option<String>,
    }
    serde_json::from_slice::<Wire>(body).ok()?.message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_with_pagination_derives_has_next() {
        let body = br#"{"artworks":[{"id":1,"title":"A"},{"id":2,"title":"B"}],
            "pagination":{"page":1,"limit":2,"total":6,"pages":3,"hasNext":false}}"#;
        let page = decode_artwork_page(body, 1, 2).unwrap();
        assert_eq!(page.artworks.len(), 2);
        assert!(page.pagination.has_next);
        assert!(page.ratings.is_empty());
    }

    #[test]
    fn page_without_pagination_is_final() {
        let page = decode_artwork_page(br#"{"artworks":[{"id":1,"title":"A"}]}"#, 1, 20).unwrap();
        assert!(!page.pagination.has_next);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn missing_artworks_is_malformed() {
        let err = decode_artwork_page(br#"{"items":[]}"#, 1, 20).unwrap_err();
        assert!(matches!(err, GalleryError::MalformedResponse(_)));
    }

    #[test]
    fn rated_rows_yield_ratings() {
        let body = br#"{"artworks":[{"id":5,"title":"Iris","overall_rating":"4.5","emotion_rating":5}]}"#;
        let page = decode_artwork_page(body, 1, 20).unwrap();
        assert_eq!(page.ratings, vec![(ArtworkId::new("5"), Rating::new(4.5, 0.0, 0.0, 5.0))]);
    }

    #[test]
    fn session_requires_token_and_user() {
        assert!(decode_session(br#"{"token":"t"}"#).is_err());
        assert!(decode_session(br#"{"token":"","user":{"id":1,"username":"a","email":"a@b"}}"#).is_err());
        let session =
            decode_session(br#"{"token":"t","user":{"id":1,"username":"a","email":"a@b"}}"#).unwrap();
        assert_eq!(session.user.username, "a");
    }

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(error_message(br#"{"error":"Email taken","message":"x"}"#).as_deref(), Some("Email taken"));
        assert_eq!(error_message(br#"{"message":"Nope"}"#).as_deref(), Some("Nope"));
        assert_eq!(error_message(b"<html>"), None);
    }

    #[test]
    fn status_zero_is_network_error() {
        assert!(matches!(status_error(0, b""), GalleryError::Network(_)));
        match status_error(500, br#"{"error":"boom"}"#) {
            GalleryError::Backend { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_or_null_rating_is_unrated() {
        assert!(decode_rating(b"").unwrap().is_unrated());
        assert!(decode_rating(b"null").unwrap().is_unrated());
        assert_eq!(decode_rating(br#"{"overall_rating":3}"#).unwrap().overall, 3.0);
        assert!(decode_rating(br#""four stars""#).is_err());
    }

    #[test]
    fn departments_accept_both_shapes() {
        let bare = decode_departments(br#"["Paintings",{"name":"Arms","count":4}]"#).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1].count, Some(4));
        let wrapped = decode_departments(br#"{"departments":["Asian Art",""]}"#).unwrap();
        assert_eq!(wrapped, vec![Department { name: "Asian Art".into(), count: None }]);
    }

    #[test]
    fn stats_keep_numeric_counters() {
        let stats = decode_stats(br#"{"totalArtworks":120,"label":"x","departments":7}"#).unwrap();
        assert_eq!(stats.get("totalArtworks"), Some(120.0));
        assert_eq!(stats.get("label"), None);
        assert_eq!(stats.counters.len(), 2);
    }
}
