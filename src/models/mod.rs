//! Core data models for the file hub.
//!
//! A stored file has no record of its own beyond the directory entry; these
//! types carry the metadata read back from filesystem attributes and the
//! volume statistics shown on the pages.

pub mod disk_usage;
pub mod stored_file;
