//! Row structs for the `notes` table.

pub mod note;
