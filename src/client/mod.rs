//! Translator view controller and its collaborators.
//!
//! The controller owns the view state and talks to the proxy through a
//! [`TranslationService`]; clipboard and toast access are supplied by the
//! embedding UI.

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod service;
pub mod state;

pub use collaborators::*;
pub use controller::*;
pub use error::*;
pub use service::*;
pub use state::*;
