//! Authentication: request building, response interpretation and the
//! session store.

pub mod service;
pub mod store;

pub use service::AuthService;
pub use store::{SessionChange, SessionStore};
