#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finscore/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Local statement stores for `finscore`.
//!
//! This crate provides implementations of the [`FactStore`] trait from `finscore-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`InMemoryStore`] - Simple in-memory store
//!
//! [`StoreFactSource`] turns any store into a [`FactSource`](finscore_core::FactSource).

/// In-memory store implementation.
pub mod memory;
/// Store-backed fact source.
pub mod source;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use finscore_core::FactStore;

pub use memory::InMemoryStore;
pub use source::StoreFactSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
