//! Domain layer for the Galleria plugin.
//!
//! Core types shared by every other layer, independent of Zellij APIs and of
//! the HTTP wire format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`artwork`]: Artworks, departments and collection statistics
//! - [`rating`]: Four-criterion ratings on a half-step scale
//! - [`user`]: User profile and authenticated session
//! - [`pagination`]: Pagination cursor for list endpoints

pub mod artwork;
pub mod error;
pub mod pagination;
pub mod rating;
pub mod user;

pub use artwork::{Artwork, ArtworkId, CollectionStats, Department};
pub use error::{GalleryError, Result};
pub use pagination::{PaginationState, DEFAULT_PAGE_SIZE};
pub use rating::{Criterion, Rating};
pub use user::{Session, UserProfile};
