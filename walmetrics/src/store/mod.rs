//! Store access: identifier sanitization, scoped SQLite connections, and the
//! table materializer (existence check, idempotent create, parameterized
//! bulk insert).

mod materializer;
mod sanitize;
mod sqlite;

pub use materializer::{create_table, fill_table, table_exists};
pub use sanitize::check_entity_name;
pub use sqlite::{connect_durable, connect_ephemeral};
