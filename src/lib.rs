//! Shelf: a personal book-tracking service.
//!
//! The `books` module carries the record contract: schema validation,
//! SQLite persistence and the CRUD endpoints under `/api/books`.

pub mod bootstrap;
pub mod modules;
