//! File I/O for list documents.
//!
//! This module loads markup documents from disk or stdin (optionally
//! gzip-compressed) and saves them back with atomic writes and optional
//! backups.

pub mod loader;
pub mod saver;
