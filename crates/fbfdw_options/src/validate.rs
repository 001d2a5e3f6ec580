use std::fmt;

use tracing::trace;

use crate::errors::{OptionsError, Result};
use crate::{OptionPair, typed};

/// Catalog object an option list is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionContext {
    Server,
    UserMapping,
    Table,
    Column,
}

impl fmt::Display for OptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::UserMapping => write!(f, "user mapping"),
            Self::Table => write!(f, "foreign table"),
            Self::Column => write!(f, "column"),
        }
    }
}

const VALID_OPTIONS: &[(&str, OptionContext)] = &[
    // Connection
    ("address", OptionContext::Server),
    ("port", OptionContext::Server),
    ("database", OptionContext::Server),
    ("disable_pushdowns", OptionContext::Server),
    ("updatable", OptionContext::Server),
    ("quote_identifiers", OptionContext::Server),
    ("implicit_bool_type", OptionContext::Server),
    ("batch_size", OptionContext::Server),
    ("truncatable", OptionContext::Server),
    // User
    ("username", OptionContext::UserMapping),
    ("password", OptionContext::UserMapping),
    // Table
    ("query", OptionContext::Table),
    ("table_name", OptionContext::Table),
    ("updatable", OptionContext::Table),
    ("estimated_row_count", OptionContext::Table),
    ("quote_identifier", OptionContext::Table),
    ("batch_size", OptionContext::Table),
    ("truncatable", OptionContext::Table),
    // Column
    ("column_name", OptionContext::Column),
    ("quote_identifier", OptionContext::Column),
    ("implicit_bool_type", OptionContext::Column),
];

/// Option names accepted for `context`, in catalogue order.
pub fn valid_options(context: OptionContext) -> impl Iterator<Item = &'static str> {
    VALID_OPTIONS
        .iter()
        .filter(move |(_, ctx)| *ctx == context)
        .map(|(name, _)| *name)
}

fn is_valid_option(name: &str, context: OptionContext) -> bool {
    valid_options(context).any(|valid| valid == name)
}

/// Validate an option list as given in a `CREATE`/`ALTER` command.
///
/// Nothing is stored, the typed views in [`typed`] re-read the list when
/// they are needed.
pub fn validate_options(context: OptionContext, options: &[OptionPair]) -> Result<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(options.len());
    let mut has_query = false;
    let mut has_table_name = false;
    let mut updatable = None;

    for (name, value) in options {
        trace!(%context, %name, "validating option");

        if !is_valid_option(name, context) {
            let valid: Vec<_> = valid_options(context).collect();
            return Err(OptionsError::InvalidOption {
                name: name.clone(),
                valid: if valid.is_empty() {
                    "<none>".to_string()
                } else {
                    valid.join(", ")
                },
            });
        }

        if seen.contains(&name.as_str()) {
            // Secrets never end up in the message.
            let shown = if name == "password" {
                name.clone()
            } else {
                format!("{name} ({value})")
            };
            return Err(OptionsError::Redundant(shown));
        }
        seen.push(name);

        match name.as_str() {
            "port" => {
                typed::parse_port(value)?;
            }
            "batch_size" => {
                typed::parse_batch_size(value)?;
            }
            "estimated_row_count" => {
                typed::parse_integer("estimated_row_count", value)?;
            }
            "query" => {
                if has_table_name {
                    return Err(OptionsError::QueryWithTableName);
                }
                has_query = true;
            }
            "table_name" => {
                if has_query {
                    return Err(OptionsError::QueryWithTableName);
                }
                has_table_name = true;
            }
            "updatable" => {
                updatable = Some(typed::parse_bool("updatable", value)?);
            }
            "disable_pushdowns" => {
                typed::parse_bool("disable_pushdowns", value)?;
            }
            "quote_identifiers" => {
                typed::parse_bool("quote_identifiers", value)?;
            }
            "quote_identifier" => {
                typed::parse_bool("quote_identifier", value)?;
            }
            "implicit_bool_type" => {
                typed::parse_bool("implicit_bool_type", value)?;
            }
            "truncatable" => {
                typed::parse_bool("truncatable", value)?;
            }
            _ => (),
        }
    }

    // Order independent, "updatable" may precede "query".
    if has_query && updatable == Some(true) {
        return Err(OptionsError::UpdatableQuery);
    }

    Ok(())
}
