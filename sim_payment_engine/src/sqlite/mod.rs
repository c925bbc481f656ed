//! SQLite backend for the payment gateway core.
mod sqlite_impl;

pub mod db;

pub use sqlite_impl::SqliteDatabase;

/// Embedded schema migrations, applied by [`SqliteDatabase::migrate`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
