//! SQLite backend for the payment record store.
pub mod db;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;
