//! Domain layer for the shared note board.
//!
//! Holds the note model, the static author and priority catalogs, payload
//! validation and the filter/sort engine. Nothing in here performs I/O.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod note;
pub mod types;
