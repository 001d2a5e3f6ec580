use fbfdw_options::{ColumnOptions, ServerOptions, TableOptions};

use crate::AttrNumber;
use crate::errors::{DeparseError, Result};

/// A column of a foreign table as seen by the deparser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteColumn {
    pub attnum: AttrNumber,
    pub local_name: String,
    /// Name of the column on the remote side, from the `column_name` option.
    pub remote_name: Option<String>,
    pub type_oid: u32,
    pub type_modifier: i32,
    pub is_dropped: bool,
    /// Column level override of the relation's quoting policy.
    pub quote_identifier: Option<bool>,
}

impl RemoteColumn {
    pub fn new(attnum: AttrNumber, local_name: impl Into<String>) -> Self {
        RemoteColumn {
            attnum,
            local_name: local_name.into(),
            remote_name: None,
            type_oid: 0,
            type_modifier: -1,
            is_dropped: false,
            quote_identifier: None,
        }
    }

    pub fn with_type(mut self, type_oid: u32, type_modifier: i32) -> Self {
        self.type_oid = type_oid;
        self.type_modifier = type_modifier;
        self
    }

    pub fn with_remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: &ColumnOptions) -> Self {
        if let Some(name) = &options.column_name {
            self.remote_name = Some(name.clone());
        }
        if options.quote_identifier.is_some() {
            self.quote_identifier = options.quote_identifier;
        }
        self
    }

    pub fn dropped(mut self) -> Self {
        self.is_dropped = true;
        self
    }

    /// Name to use on the remote side, the override winning over the local
    /// name.
    pub fn name(&self) -> &str {
        self.remote_name.as_deref().unwrap_or(&self.local_name)
    }
}

/// Foreign table metadata handed to the deparser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRelation {
    local_name: String,
    remote_name: Option<String>,
    query: Option<String>,
    quote_identifiers: bool,
    /// Ordered by attribute number.
    columns: Vec<RemoteColumn>,
}

impl RemoteRelation {
    /// Create a relation from its columns.
    ///
    /// Columns may be given in any order, but attribute numbers must be
    /// positive and unique.
    pub fn try_new(local_name: impl Into<String>, mut columns: Vec<RemoteColumn>) -> Result<Self> {
        let local_name = local_name.into();

        columns.sort_by_key(|col| col.attnum);
        if let Some(col) = columns.iter().find(|col| col.attnum <= 0) {
            return Err(DeparseError::InvalidColumnList {
                relation: local_name,
                reason: format!("column \"{}\" has attribute number {}", col.local_name, col.attnum),
            });
        }
        if let Some(pair) = columns.windows(2).find(|w| w[0].attnum == w[1].attnum) {
            return Err(DeparseError::InvalidColumnList {
                relation: local_name,
                reason: format!("attribute number {} used more than once", pair[0].attnum),
            });
        }

        Ok(RemoteRelation {
            local_name,
            remote_name: None,
            query: None,
            quote_identifiers: false,
            columns,
        })
    }

    /// Apply server and table options.
    ///
    /// The table's `quote_identifier` takes precedence over the server's
    /// `quote_identifiers`.
    pub fn with_options(mut self, server: &ServerOptions, table: &TableOptions) -> Self {
        self.quote_identifiers = table.quote_identifier.unwrap_or(server.quote_identifiers);
        self.remote_name = table.table_name.clone();
        self.query = table.query.clone();
        self
    }

    pub fn with_remote_name(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn remote_name(&self) -> Option<&str> {
        self.remote_name.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn quote_identifiers(&self) -> bool {
        self.quote_identifiers
    }

    pub fn columns(&self) -> &[RemoteColumn] {
        &self.columns
    }

    /// Look up a column by attribute number, dropped columns included.
    pub fn column(&self, attnum: AttrNumber) -> Option<&RemoteColumn> {
        self.columns
            .binary_search_by_key(&attnum, |col| col.attnum)
            .ok()
            .map(|idx| &self.columns[idx])
    }

    /// Whether `column` should always be quoted.
    pub(crate) fn force_quote(&self, column: &RemoteColumn) -> bool {
        column.quote_identifier.unwrap_or(self.quote_identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_sorted_by_attnum() {
        let rel = RemoteRelation::try_new(
            "t",
            vec![RemoteColumn::new(2, "b"), RemoteColumn::new(1, "a")],
        )
        .unwrap();

        let names: Vec<_> = rel.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(rel.column(2).unwrap().local_name, "b");
        assert!(rel.column(3).is_none());
    }

    #[test]
    fn duplicate_attnum_rejected() {
        let err = RemoteRelation::try_new(
            "t",
            vec![RemoteColumn::new(1, "a"), RemoteColumn::new(1, "b")],
        )
        .unwrap_err();
        assert!(matches!(err, DeparseError::InvalidColumnList { .. }));
    }

    #[test]
    fn non_positive_attnum_rejected() {
        let err = RemoteRelation::try_new("t", vec![RemoteColumn::new(0, "a")]).unwrap_err();
        assert!(matches!(err, DeparseError::InvalidColumnList { .. }));
    }

    #[test]
    fn quoting_precedence() {
        let server = ServerOptions {
            quote_identifiers: true,
            ..Default::default()
        };
        let table = TableOptions {
            quote_identifier: Some(false),
            table_name: Some("CUSTOMER".to_string()),
            ..Default::default()
        };

        let rel = RemoteRelation::try_new(
            "customer",
            vec![
                RemoteColumn::new(1, "id"),
                RemoteColumn::new(2, "name").with_options(&ColumnOptions {
                    quote_identifier: Some(true),
                    ..Default::default()
                }),
            ],
        )
        .unwrap()
        .with_options(&server, &table);

        assert_eq!(rel.remote_name(), Some("CUSTOMER"));
        assert!(!rel.force_quote(rel.column(1).unwrap()));
        assert!(rel.force_quote(rel.column(2).unwrap()));

        let rel = rel.with_options(&server, &TableOptions::default());
        assert!(rel.force_quote(rel.column(1).unwrap()));
    }
}
