//! Backend endpoint catalogue and request construction.
//!
//! Every backend operation is one [`Endpoint`] variant. [`ApiClient`] turns an
//! endpoint into an [`HttpRequest`] against the configured base URL, with path
//! segments and query values percent-encoded by the `url` crate.

use crate::api::request::{HttpMethod, HttpRequest};
use crate::domain::artwork::ArtworkId;
use crate::domain::error::{GalleryError, Result};
use crate::domain::rating::Rating;
use serde_json::json;
use std::collections::BTreeMap;
use url::Url;

/// Which artwork field a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Title,
    Artist,
}

impl SearchFilter {
    /// Value of the `filterBy` query parameter, `None` for unrestricted search.
    #[must_use]
    pub const fn as_query(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Title => Some("title"),
            Self::Artist => Some("artist"),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all fields",
            Self::Title => "title",
            Self::Artist => "artist",
        }
    }

    /// Cycles all → title → artist → all.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Title,
            Self::Title => Self::Artist,
            Self::Artist => Self::All,
        }
    }
}

/// A backend operation with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    ListArtworks { page: u32, limit: u32 },
    Search { query: String, filter: SearchFilter, page: u32, limit: u32 },
    ByDepartment { name: String, page: u32, limit: u32 },
    Departments,
    Stats,
    Favorites { page: u32, limit: u32 },
    AddFavorite(ArtworkId),
    RemoveFavorite(ArtworkId),
    RatedArtworks { page: u32, limit: u32 },
    GetRating(ArtworkId),
    SetRating(ArtworkId, Rating),
    Register { username: String, email: String, password: String },
    Login { email: String, password: String },
    ChangePassword { current_password: String, new_password: String },
    DeleteAccount { password: String },
    ForgotPassword { email: String },
    ResetPassword { token: String, new_password: String },
}

impl Endpoint {
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::AddFavorite(_)
            | Self::SetRating(..)
            | Self::Register { .. }
            | Self::Login { .. }
            | Self::ChangePassword { .. }
            | Self::ForgotPassword { .. }
            | Self::ResetPassword { .. } => HttpMethod::Post,
            Self::RemoveFavorite(_) | Self::DeleteAccount { .. } => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    /// Whether the backend rejects this call without a bearer token.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Favorites { .. }
                | Self::AddFavorite(_)
                | Self::RemoveFavorite(_)
                | Self::RatedArtworks { .. }
                | Self::GetRating(_)
                | Self::SetRating(..)
                | Self::ChangePassword { .. }
                | Self::DeleteAccount { .. }
        )
    }

    /// Short name used in logs and spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListArtworks { .. } => "list_artworks",
            Self::Search { .. } => "search",
            Self::ByDepartment { .. } => "by_department",
            Self::Departments => "departments",
            Self::Stats => "stats",
            Self::Favorites { .. } => "favorites",
            Self::AddFavorite(_) => "add_favorite",
            Self::RemoveFavorite(_) => "remove_favorite",
            Self::RatedArtworks { .. } => "rated_artworks",
            Self::GetRating(_) => "get_rating",
            Self::SetRating(..) => "set_rating",
            Self::Register { .. } => "register",
            Self::Login { .. } => "login",
            Self::ChangePassword { .. } => "change_password",
            Self::DeleteAccount { .. } => "delete_account",
            Self::ForgotPassword { .. } => "forgot_password",
            Self::ResetPassword { .. } => "reset_password",
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Self::ListArtworks { .. } => vec!["api", "artworks"],
            Self::Search { .. } => vec!["api", "search"],
            Self::ByDepartment { name, .. } => vec!["api", "artworks", "by-department", name],
            Self::Departments => vec!["api", "departments"],
            Self::Stats => vec!["api", "stats"],
            Self::Favorites { .. } => vec!["api", "favorites"],
            Self::AddFavorite(id) | Self::RemoveFavorite(id) => vec!["api", "favorites", id.as_str()],
            Self::RatedArtworks { .. } => vec!["api", "user", "rated-artworks"],
            Self::GetRating(id) | Self::SetRating(id, _) => vec!["api", "ratings", id.as_str()],
            Self::Register { .. } => vec!["api", "auth", "register"],
            Self::Login { .. } => vec!["api", "auth", "login"],
            Self::ChangePassword { .. } => vec!["api", "auth", "change-password"],
            Self::DeleteAccount { .. } => vec!["api", "auth", "delete-account"],
            Self::ForgotPassword { .. } => vec!["api", "auth", "forgot-password"],
            Self::ResetPassword { .. } => vec!["api", "auth", "reset-password"],
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let paged = |page: u32, limit: u32| vec![("page", page.to_string()), ("limit", limit.to_string())];
        match self {
            Self::ListArtworks { page, limit }
            | Self::ByDepartment { page, limit, .. }
            | Self::Favorites { page, limit }
            | Self::RatedArtworks { page, limit } => paged(*page, *limit),
            Self::Search { query, filter, page, limit } => {
                let mut pairs = vec![("q", query.clone())];
                pairs.extend(paged(*page, *limit));
                if let Some(filter) = filter.as_query() {
                    pairs.push(("filterBy", filter.to_string()));
                }
                pairs
            }
            _ => Vec::new(),
        }
    }

    fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::SetRating(_, rating) => Some(rating.to_request_body()),
            Self::Register { username, email, password } => {
                Some(json!({ "username": username, "email": email, "password": password }))
            }
            Self::Login { email, password } => Some(json!({ "email": email, "password": password })),
            Self::ChangePassword { current_password, new_password } => Some(json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            })),
            Self::DeleteAccount { password } => Some(json!({ "password": password })),
            Self::ForgotPassword { email } => Some(json!({ "email": email })),
            Self::ResetPassword { token, new_password } => {
                Some(json!({ "token": token, "newPassword": new_password }))
            }
            _ => None,
        }
    }
}

/// Builds requests against one backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base: Url,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] if the URL does not parse or cannot
    /// carry a path (e.g. `mailto:`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| GalleryError::Config(format!("invalid api_url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GalleryError::Config(format!("api_url {base_url:?} cannot carry a path")));
        }
        Ok(Self { base })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Absolute URL for `endpoint`, with encoded path and query.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(endpoint.segments());
        }
        let query = endpoint.query();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(query);
        }
        url.into()
    }

    /// Builds the request for `endpoint`, attaching `token` as a bearer credential.
    #[must_use]
    pub fn build(&self, request_id: u64, endpoint: &Endpoint, token: Option<&str>) -> HttpRequest {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let body = endpoint
            .body()
            .map(|value| value.to_string().into_bytes())
            .unwrap_or_default();

        HttpRequest {
            request_id,
            method: endpoint.method(),
            url: self.url_for(endpoint),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000").unwrap()
    }

    #[test]
    fn list_url_carries_page_and_limit() {
        let url = client().url_for(&Endpoint::ListArtworks { page: 2, limit: 20 });
        assert_eq!(url, "http://localhost:3000/api/artworks?page=2&limit=20");
    }

    #[test]
    fn search_query_is_encoded_and_filter_optional() {
        let all = client().url_for(&Endpoint::Search {
            query: "café & co".into(),
            filter: SearchFilter::All,
            page: 1,
            limit: 20,
        });
        assert_eq!(all, "http://localhost:3000/api/search?q=caf%C3%A9+%26+co&page=1&limit=20");

        let by_artist = client().url_for(&Endpoint::Search {
            query: "Monet".into(),
            filter: SearchFilter::Artist,
            page: 1,
            limit: 20,
        });
        assert!(by_artist.ends_with("&filterBy=artist"));
    }

    #[test]
    fn department_name_is_a_single_encoded_segment() {
        let url = client().url_for(&Endpoint::ByDepartment {
            name: "Arms/Armor".into(),
            page: 1,
            limit: 20,
        });
        assert_eq!(url, "http://localhost:3000/api/artworks/by-department/Arms%2FArmor?page=1&limit=20");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = ApiClient::new("https://example.org/gallery/").unwrap();
        assert_eq!(client.url_for(&Endpoint::Stats), "https://example.org/gallery/api/stats");
    }

    #[test]
    fn authorized_request_has_bearer_and_json_body() {
        let request = client().build(
            9,
            &Endpoint::SetRating(ArtworkId::new("12"), Rating::new(4.5, 3.0, 5.0, 2.0)),
            Some("tok"),
        );
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.get("Authorization").map(String::as_str), Some("Bearer tok"));
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["originality"], 5.0);
        assert!(request.url.ends_with("/api/ratings/12"));
    }

    #[test]
    fn change_password_uses_camel_case_body() {
        let request = client().build(
            1,
            &Endpoint::ChangePassword {
                current_password: "old-secret".into(),
                new_password: "new-secret".into(),
            },
            Some("tok"),
        );
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["currentPassword"], "old-secret");
        assert_eq!(body["newPassword"], "new-secret");
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        assert!(matches!(ApiClient::new("not a url"), Err(GalleryError::Config(_))));
        assert!(matches!(ApiClient::new("mailto:a@b.c"), Err(GalleryError::Config(_))));
    }

    #[test]
    fn auth_requirements() {
        assert!(Endpoint::Favorites { page: 1, limit: 20 }.requires_auth());
        assert!(!Endpoint::Login { email: String::new(), password: String::new() }.requires_auth());
        assert_eq!(Endpoint::RemoveFavorite(ArtworkId::new("1")).method(), HttpMethod::Delete);
    }
}
