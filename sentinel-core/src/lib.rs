//! Sentinel Core
//!
//! Domain types, the crate-wide error taxonomy and the repository
//! contracts shared by every other crate in the workspace: `sentinel-db`
//! implements `repo`'s traits against Postgres, `sentinel-monitor` and
//! `sentinel-notifier` depend only on these traits, never on `sentinel-db`
//! directly.

pub mod domain;
pub mod error;
pub mod repo;

pub use error::{Error, Result};
