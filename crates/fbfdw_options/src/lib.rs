//! Options accepted by the Firebird foreign data wrapper.
//!
//! Options arrive from the host catalog as plain key/value pairs attached to
//! a server, a user mapping, a foreign table or a single column. This crate
//! validates those lists and turns them into typed structs the deparser and
//! the connection cache consume.

pub mod errors;
pub mod typed;
pub mod validate;

pub use errors::{OptionsError, Result};
pub use typed::{ColumnOptions, ServerOptions, TableOptions, UserOptions, is_updatable};
pub use validate::{OptionContext, valid_options, validate_options};

/// Port the remote engine listens on when none is configured.
pub const FIREBIRD_DEFAULT_PORT: u16 = 3050;

/// A single option as stored in the host catalog.
pub type OptionPair = (String, String);
