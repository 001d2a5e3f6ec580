//! Typed views over validated option lists.

use std::fmt;

use crate::errors::{OptionsError, Result};
use crate::validate::{OptionContext, validate_options};
use crate::{FIREBIRD_DEFAULT_PORT, OptionPair};

pub(crate) fn parse_bool(name: &'static str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" | "t" | "y" => Ok(true),
        "false" | "off" | "no" | "0" | "f" | "n" => Ok(false),
        _ => Err(OptionsError::InvalidBoolean {
            name,
            value: value.to_string(),
        }),
    }
}

pub(crate) fn parse_integer(name: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| OptionsError::InvalidInteger {
            name,
            value: value.to_string(),
        })
}

pub(crate) fn parse_port(value: &str) -> Result<u16> {
    let port = parse_integer("port", value)?;
    if !(1..=65535).contains(&port) {
        return Err(OptionsError::PortOutOfRange);
    }
    Ok(port as u16)
}

pub(crate) fn parse_batch_size(value: &str) -> Result<u32> {
    let size = parse_integer("batch_size", value)?;
    if size < 1 {
        return Err(OptionsError::BatchSizeTooSmall);
    }
    u32::try_from(size).map_err(|_| OptionsError::InvalidInteger {
        name: "batch_size",
        value: value.to_string(),
    })
}

/// Options attached to a foreign server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub address: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub disable_pushdowns: bool,
    pub updatable: Option<bool>,
    pub quote_identifiers: bool,
    pub implicit_bool_type: bool,
    pub batch_size: Option<u32>,
    pub truncatable: Option<bool>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            address: None,
            port: FIREBIRD_DEFAULT_PORT,
            database: None,
            disable_pushdowns: false,
            updatable: None,
            quote_identifiers: false,
            implicit_bool_type: false,
            batch_size: None,
            truncatable: None,
        }
    }
}

impl ServerOptions {
    pub fn try_from_options(options: &[OptionPair]) -> Result<Self> {
        validate_options(OptionContext::Server, options)?;

        let mut server = ServerOptions::default();
        for (name, value) in options {
            match name.as_str() {
                "address" => server.address = Some(value.clone()),
                "port" => server.port = parse_port(value)?,
                "database" => server.database = Some(value.clone()),
                "disable_pushdowns" => {
                    server.disable_pushdowns = parse_bool("disable_pushdowns", value)?
                }
                "updatable" => server.updatable = Some(parse_bool("updatable", value)?),
                "quote_identifiers" => {
                    server.quote_identifiers = parse_bool("quote_identifiers", value)?
                }
                "implicit_bool_type" => {
                    server.implicit_bool_type = parse_bool("implicit_bool_type", value)?
                }
                "batch_size" => server.batch_size = Some(parse_batch_size(value)?),
                "truncatable" => server.truncatable = Some(parse_bool("truncatable", value)?),
                _ => (),
            }
        }

        Ok(server)
    }
}

/// Credentials from a user mapping.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserOptions {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserOptions {
    pub fn try_from_options(options: &[OptionPair]) -> Result<Self> {
        validate_options(OptionContext::UserMapping, options)?;

        let mut user = UserOptions::default();
        for (name, value) in options {
            match name.as_str() {
                "username" => user.username = Some(value.clone()),
                "password" => user.password = Some(value.clone()),
                _ => (),
            }
        }

        Ok(user)
    }
}

impl fmt::Debug for UserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserOptions")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Options attached to a foreign table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Remote query the table is defined as. Excludes `table_name`.
    pub query: Option<String>,
    /// Remote table name, when it differs from the local one.
    pub table_name: Option<String>,
    pub updatable: Option<bool>,
    pub estimated_row_count: Option<i64>,
    pub quote_identifier: Option<bool>,
    pub batch_size: Option<u32>,
    pub truncatable: Option<bool>,
}

impl TableOptions {
    pub fn try_from_options(options: &[OptionPair]) -> Result<Self> {
        validate_options(OptionContext::Table, options)?;

        let mut table = TableOptions::default();
        for (name, value) in options {
            match name.as_str() {
                "query" => table.query = Some(value.clone()),
                "table_name" => table.table_name = Some(value.clone()),
                "updatable" => table.updatable = Some(parse_bool("updatable", value)?),
                "estimated_row_count" => {
                    table.estimated_row_count =
                        Some(parse_integer("estimated_row_count", value)?)
                }
                "quote_identifier" => {
                    table.quote_identifier = Some(parse_bool("quote_identifier", value)?)
                }
                "batch_size" => table.batch_size = Some(parse_batch_size(value)?),
                "truncatable" => table.truncatable = Some(parse_bool("truncatable", value)?),
                _ => (),
            }
        }

        Ok(table)
    }
}

/// Options attached to a single column of a foreign table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    pub column_name: Option<String>,
    pub quote_identifier: Option<bool>,
    pub implicit_bool_type: bool,
}

impl ColumnOptions {
    pub fn try_from_options(options: &[OptionPair]) -> Result<Self> {
        validate_options(OptionContext::Column, options)?;

        let mut column = ColumnOptions::default();
        for (name, value) in options {
            match name.as_str() {
                "column_name" => column.column_name = Some(value.clone()),
                "quote_identifier" => {
                    column.quote_identifier = Some(parse_bool("quote_identifier", value)?)
                }
                "implicit_bool_type" => {
                    column.implicit_bool_type = parse_bool("implicit_bool_type", value)?
                }
                _ => (),
            }
        }

        Ok(column)
    }
}

/// Whether INSERT/UPDATE/DELETE may target the table.
///
/// The table level setting wins over the server level one, and tables
/// defined by a query are never updatable.
pub fn is_updatable(server: &ServerOptions, table: &TableOptions) -> bool {
    if table.query.is_some() {
        return false;
    }
    table.updatable.or(server.updatable).unwrap_or(true)
}
