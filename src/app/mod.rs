//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin runtime (main.rs) and the
//! domain/api/auth/storage layers. It implements the event-driven architecture
//! that powers the interactive UI.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → HTTP
//!                           ↑                                         ↓
//!                           └────────────── HttpResponse ─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`feed`]: Paginated fetch/merge controller for the active view mode
//! - [`forms`]: Account form state and local validation
//! - [`modes`]: Input, screen and view mode types
//! - [`responses`]: Interpretation of HTTP responses
//! - [`state`]: Central application state container
//! - `present`: View model computation

pub mod actions;
pub mod feed;
pub mod forms;
pub mod handler;
pub mod modes;
mod present;
pub mod responses;
pub mod state;

pub use actions::Action;
pub use feed::{Feed, FeedUpdate, PageTicket};
pub use forms::{FormKind, FormState};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Screen, SearchFocus, ViewMode};
pub use state::{AppState, Banner, BannerKind, DetailState};
