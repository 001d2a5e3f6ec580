//! INSERT, UPDATE, DELETE and SELECT statement generation.
//!
//! Parameters are positional `?` markers. For INSERT and UPDATE the i-th
//! marker binds the i-th target attribute, UPDATE and DELETE bind the row
//! identity value last.

use tracing::debug;

use crate::attrs::AttributeSet;
use crate::errors::{DeparseError, Result};
use crate::names::{write_column_ref, write_from_item, write_relation};
use crate::relation::RemoteRelation;
use crate::target_list::write_target_list;
use crate::{AttrNumber, ROW_IDENTITY_ATTNUM, ROW_IDENTITY_COLUMN};

/// Generated SQL along with the attributes its result rows carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeparsedStatement {
    pub sql: String,
    /// Local attribute numbers of the returned columns, in output order. Empty
    /// for modifications without RETURNING.
    pub retrieved_attrs: Vec<AttrNumber>,
}

impl DeparsedStatement {
    /// Whether the result rows carry the remote row identity.
    pub fn uses_row_identity(&self) -> bool {
        self.retrieved_attrs.contains(&ROW_IDENTITY_ATTNUM)
    }
}

/// `INSERT INTO <rel> (<cols>) VALUES (?, ...) [RETURNING ...]`
///
/// An empty target list inserts a row of defaults.
pub fn build_insert(
    relation: &RemoteRelation,
    target_attrs: &[AttrNumber],
    returning: Option<&AttributeSet>,
) -> Result<DeparsedStatement> {
    let mut sql = String::from("INSERT INTO ");
    write_relation(&mut sql, relation)?;

    if target_attrs.is_empty() {
        sql.push_str(" DEFAULT VALUES");
    } else {
        sql.push_str(" (");
        for (idx, attnum) in target_attrs.iter().enumerate() {
            if idx > 0 {
                sql.push_str(", ");
            }
            write_column_ref(&mut sql, relation, *attnum)?;
        }

        sql.push_str(") VALUES (");
        for idx in 0..target_attrs.len() {
            if idx > 0 {
                sql.push_str(", ");
            }
            sql.push('?');
        }
        sql.push(')');
    }

    let retrieved_attrs = write_returning(&mut sql, relation, returning)?;
    debug!(%sql, "deparsed INSERT");

    Ok(DeparsedStatement {
        sql,
        retrieved_attrs,
    })
}

/// `UPDATE <rel> SET <col> = ?, ... WHERE rdb$db_key = ? [RETURNING ...]`
pub fn build_update(
    relation: &RemoteRelation,
    target_attrs: &[AttrNumber],
    returning: Option<&AttributeSet>,
) -> Result<DeparsedStatement> {
    if target_attrs.is_empty() {
        return Err(DeparseError::EmptyUpdate(relation.local_name().to_string()));
    }

    let mut sql = String::from("UPDATE ");
    write_relation(&mut sql, relation)?;
    sql.push_str(" SET ");

    for (idx, attnum) in target_attrs.iter().enumerate() {
        if idx > 0 {
            sql.push_str(", ");
        }
        write_column_ref(&mut sql, relation, *attnum)?;
        sql.push_str(" = ?");
    }
    write_row_identity_filter(&mut sql);

    let retrieved_attrs = write_returning(&mut sql, relation, returning)?;
    debug!(%sql, "deparsed UPDATE");

    Ok(DeparsedStatement {
        sql,
        retrieved_attrs,
    })
}

/// `DELETE FROM <rel> WHERE rdb$db_key = ? [RETURNING ...]`
pub fn build_delete(
    relation: &RemoteRelation,
    returning: Option<&AttributeSet>,
) -> Result<DeparsedStatement> {
    let mut sql = String::from("DELETE FROM ");
    write_relation(&mut sql, relation)?;
    write_row_identity_filter(&mut sql);

    let retrieved_attrs = write_returning(&mut sql, relation, returning)?;
    debug!(%sql, "deparsed DELETE");

    Ok(DeparsedStatement {
        sql,
        retrieved_attrs,
    })
}

/// `SELECT <target list> FROM <rel>`
///
/// Filters are evaluated locally.
pub fn build_select(relation: &RemoteRelation, attrs: &AttributeSet) -> Result<DeparsedStatement> {
    let mut sql = String::from("SELECT ");
    let retrieved_attrs = write_target_list(&mut sql, relation, attrs)?;
    sql.push_str(" FROM ");
    write_from_item(&mut sql, relation)?;

    debug!(%sql, "deparsed SELECT");

    Ok(DeparsedStatement {
        sql,
        retrieved_attrs,
    })
}

fn write_row_identity_filter(sql: &mut String) {
    sql.push_str(" WHERE ");
    sql.push_str(ROW_IDENTITY_COLUMN);
    sql.push_str(" = ?");
}

fn write_returning(
    sql: &mut String,
    relation: &RemoteRelation,
    returning: Option<&AttributeSet>,
) -> Result<Vec<AttrNumber>> {
    match returning {
        Some(attrs) if !attrs.is_empty() => {
            sql.push_str(" RETURNING ");
            write_target_list(sql, relation, attrs)
        }
        _ => Ok(Vec::new()),
    }
}
