//! Database module.
//!
//! Async PostgreSQL connection pooling using diesel_async with bb8, plus the
//! embedded schema migrations.

mod migrations;
mod pool;

pub use migrations::{MIGRATIONS, run_pending_migrations};
pub(crate) use pool::pool_error;
pub use pool::{AsyncDbPool, establish_async_connection_pool};
