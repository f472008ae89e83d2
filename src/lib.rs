//! The headless core of the Yaaldug Somali e-learning platform: the data
//! model, content-block dispatch, progress and access rules, the mock
//! mobile-money checkout, the AI tutor client, and the root application
//! store the screens drive.
//!
//! The crate holds no pixels and owns no runtime. An embedding shell
//! constructs an [`AppStore`](store::AppStore) over a
//! [`KeyValueStore`](prefs::KeyValueStore), calls the store's action
//! methods in response to user events, and re-reads the accessors to
//! render.

pub mod access;
pub mod catalog;
pub mod content;
pub mod error;
pub mod prefs;
pub mod progress;
pub mod seed;
pub mod store;
pub mod tutor;
pub mod types;

pub use error::{Error, Result};
pub use store::AppStore;
pub use types::*;
