//! Deparsing of foreign table operations into Firebird SQL.
//!
//! Firebird has no schemas and no stable row identifier usable from the
//! local side other than the `rdb$db_key` pseudo-column, so every UPDATE
//! and DELETE is correlated on that value and executed one row at a time.
//! This also keeps `RETURNING` usable, since Firebird rejects it for
//! statements affecting more than one row.

pub mod attrs;
pub mod errors;
pub mod names;
pub mod quote;
pub mod relation;
pub mod statement;
pub mod target_list;

pub use attrs::AttributeSet;
pub use errors::{DeparseError, Result};
pub use names::{resolve_column_name, resolve_relation_name};
pub use quote::quote_identifier;
pub use relation::{RemoteColumn, RemoteRelation};
pub use statement::{DeparsedStatement, build_delete, build_insert, build_select, build_update};
pub use target_list::{TargetList, build_target_list};

/// Local attribute number. User columns are numbered from 1.
pub type AttrNumber = i16;

/// Attribute number standing for "all columns of the row".
pub const WHOLE_ROW_ATTNUM: AttrNumber = 0;

/// Attribute number standing for the remote row identity.
pub const ROW_IDENTITY_ATTNUM: AttrNumber = -1;

/// Remote pseudo-column identifying a row within a table.
pub const ROW_IDENTITY_COLUMN: &str = "rdb$db_key";
