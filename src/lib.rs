//! filehub — a minimal file storage web service.
//!
//! Upload files (multipart or by remote-URL fetch), list them, download
//! them. Everything is backed by one flat directory; all metadata is read
//! from filesystem attributes at request time.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
