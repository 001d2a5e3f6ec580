//! Resolution of local names to their remote counterparts.

use std::fmt::Write;

use crate::AttrNumber;
use crate::errors::{DeparseError, Result};
use crate::quote::quote_identifier;
use crate::relation::{RemoteColumn, RemoteRelation};

/// Remote name of the column with attribute number `attnum`.
///
/// A `column_name` override wins over the local attribute name. The name is
/// returned unquoted.
pub fn resolve_column_name(relation: &RemoteRelation, attnum: AttrNumber) -> Result<&str> {
    Ok(live_column(relation, attnum)?.name())
}

/// Remote name of the relation, unquoted.
///
/// Firebird has no schemas, so this is only ever the bare table name.
pub fn resolve_relation_name(relation: &RemoteRelation) -> &str {
    relation.remote_name().unwrap_or(relation.local_name())
}

fn live_column(relation: &RemoteRelation, attnum: AttrNumber) -> Result<&RemoteColumn> {
    let column = relation
        .column(attnum)
        .ok_or_else(|| DeparseError::MissingAttribute {
            relation: relation.local_name().to_string(),
            attnum,
        })?;

    if column.is_dropped {
        return Err(DeparseError::DroppedAttribute {
            relation: relation.local_name().to_string(),
            attnum,
        });
    }

    Ok(column)
}

/// Append the quoted remote name of `column`.
pub(crate) fn write_column(
    buf: &mut String,
    relation: &RemoteRelation,
    column: &RemoteColumn,
) -> Result<()> {
    let quoted = quote_identifier(column.name(), relation.force_quote(column));
    write!(buf, "{quoted}")?;
    Ok(())
}

/// Append the quoted remote name of the column `attnum`.
pub(crate) fn write_column_ref(
    buf: &mut String,
    relation: &RemoteRelation,
    attnum: AttrNumber,
) -> Result<()> {
    let column = live_column(relation, attnum)?;
    write_column(buf, relation, column)
}

/// Append the quoted remote table name, the target of a modification.
pub(crate) fn write_relation(buf: &mut String, relation: &RemoteRelation) -> Result<()> {
    if relation.query().is_some() {
        return Err(DeparseError::QueryRelation(
            relation.local_name().to_string(),
        ));
    }

    let quoted = quote_identifier(resolve_relation_name(relation), relation.quote_identifiers());
    write!(buf, "{quoted}")?;
    Ok(())
}

/// Append the FROM item for a scan of the relation.
///
/// Query-defined relations are scanned as a derived table.
pub(crate) fn write_from_item(buf: &mut String, relation: &RemoteRelation) -> Result<()> {
    match relation.query() {
        Some(query) => {
            write!(buf, "( {query} )")?;
            Ok(())
        }
        None => write_relation(buf, relation),
    }
}
