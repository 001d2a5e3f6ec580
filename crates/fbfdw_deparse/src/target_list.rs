use tracing::trace;

use crate::attrs::AttributeSet;
use crate::errors::{DeparseError, Result};
use crate::names::write_column;
use crate::relation::RemoteRelation;
use crate::{AttrNumber, ROW_IDENTITY_ATTNUM, ROW_IDENTITY_COLUMN};

/// A deparsed target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList {
    pub sql: String,
    /// Local attribute numbers, parallel to the expressions in `sql`.
    pub retrieved_attrs: Vec<AttrNumber>,
}

/// Build the list of remote columns to fetch for `attrs`.
///
/// Shared between SELECT lists and RETURNING clauses.
pub fn build_target_list(relation: &RemoteRelation, attrs: &AttributeSet) -> Result<TargetList> {
    let mut sql = String::new();
    let retrieved_attrs = write_target_list(&mut sql, relation, attrs)?;
    Ok(TargetList {
        sql,
        retrieved_attrs,
    })
}

/// Append the target list to `buf`, returning the retrieved attributes.
pub(crate) fn write_target_list(
    buf: &mut String,
    relation: &RemoteRelation,
    attrs: &AttributeSet,
) -> Result<Vec<AttrNumber>> {
    check_attrs(relation, attrs)?;

    let have_wholerow = attrs.has_whole_row();
    let mut retrieved_attrs = Vec::new();

    for column in relation.columns() {
        if column.is_dropped {
            continue;
        }
        if !have_wholerow && !attrs.contains(column.attnum) {
            continue;
        }

        if !retrieved_attrs.is_empty() {
            buf.push_str(", ");
        }
        write_column(buf, relation, column)?;
        retrieved_attrs.push(column.attnum);
    }

    if attrs.has_row_identity() {
        if !retrieved_attrs.is_empty() {
            buf.push_str(", ");
        }
        buf.push_str(ROW_IDENTITY_COLUMN);
        retrieved_attrs.push(ROW_IDENTITY_ATTNUM);
    }

    // Keep the statement valid when nothing is fetched.
    if retrieved_attrs.is_empty() {
        buf.push_str("NULL");
    }

    trace!(relation = %relation.local_name(), ?retrieved_attrs, "built target list");

    Ok(retrieved_attrs)
}

fn check_attrs(relation: &RemoteRelation, attrs: &AttributeSet) -> Result<()> {
    for attnum in attrs.iter() {
        if attnum < ROW_IDENTITY_ATTNUM {
            return Err(DeparseError::UnsupportedSystemAttribute(attnum));
        }
        if attnum > 0 && relation.column(attnum).is_none() {
            return Err(DeparseError::MissingAttribute {
                relation: relation.local_name().to_string(),
                attnum,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::relation::RemoteColumn;

    fn relation() -> RemoteRelation {
        RemoteRelation::try_new(
            "customer",
            vec![
                RemoteColumn::new(1, "cust_no"),
                RemoteColumn::new(2, "old_name").dropped(),
                RemoteColumn::new(3, "customer").with_remote_name("CUSTOMER"),
                RemoteColumn::new(4, "city"),
            ],
        )
        .unwrap()
    }

    #[rstest]
    #[case(AttributeSet::whole_row(), "cust_no, \"CUSTOMER\", city", vec![1, 3, 4])]
    #[case(AttributeSet::from_iter([4, 1]), "cust_no, city", vec![1, 4])]
    #[case(AttributeSet::from_iter([3]).with_row_identity(), "\"CUSTOMER\", rdb$db_key", vec![3, -1])]
    #[case(AttributeSet::new().with_row_identity(), "rdb$db_key", vec![-1])]
    #[case(AttributeSet::whole_row().with_row_identity(), "cust_no, \"CUSTOMER\", city, rdb$db_key", vec![1, 3, 4, -1])]
    fn target_lists(
        #[case] attrs: AttributeSet,
        #[case] expected_sql: &str,
        #[case] expected_attrs: Vec<AttrNumber>,
    ) {
        let list = build_target_list(&relation(), &attrs).unwrap();
        assert_eq!(list.sql, expected_sql);
        assert_eq!(list.retrieved_attrs, expected_attrs);
    }

    #[test]
    fn expression_count_matches_retrieved_attrs() {
        let rel = relation();
        for attrs in [
            AttributeSet::whole_row(),
            AttributeSet::from_iter([1]),
            AttributeSet::from_iter([1, 3, 4]),
            AttributeSet::from_iter([1, 4]).with_row_identity(),
        ] {
            let list = build_target_list(&rel, &attrs).unwrap();
            assert_eq!(
                list.sql.matches(", ").count() + 1,
                list.retrieved_attrs.len(),
                "{}",
                list.sql
            );
        }
    }

    #[test]
    fn nothing_selected_emits_null() {
        let list = build_target_list(&relation(), &AttributeSet::new()).unwrap();
        assert_eq!(list.sql, "NULL");
        assert!(list.retrieved_attrs.is_empty());
    }

    #[test]
    fn dropped_columns_never_emitted() {
        let list = build_target_list(&relation(), &AttributeSet::from_iter([2])).unwrap();
        assert_eq!(list.sql, "NULL");
        assert!(list.retrieved_attrs.is_empty());

        let list = build_target_list(&relation(), &AttributeSet::from_iter([1, 2])).unwrap();
        assert_eq!(list.sql, "cust_no");
        assert_eq!(list.retrieved_attrs, vec![1]);
    }

    #[test]
    fn all_columns_dropped_whole_row() {
        let rel = RemoteRelation::try_new("gone", vec![RemoteColumn::new(1, "a").dropped()]).unwrap();
        let list = build_target_list(&rel, &AttributeSet::whole_row()).unwrap();
        assert_eq!(list.sql, "NULL");
        assert!(list.retrieved_attrs.is_empty());
    }

    #[test]
    fn forced_quoting_applies_to_every_column() {
        let rel = relation().with_quote_identifiers(true);
        let list = build_target_list(&rel, &AttributeSet::from_iter([1, 4])).unwrap();
        assert_eq!(list.sql, "\"cust_no\", \"city\"");
    }

    #[test]
    fn unknown_attribute_is_an_error() {
        let err = build_target_list(&relation(), &AttributeSet::from_iter([1, 7])).unwrap_err();
        assert!(matches!(err, DeparseError::MissingAttribute { attnum: 7, .. }));
        assert_eq!(err.sqlstate(), "XX000");
    }

    #[test]
    fn other_system_attributes_rejected() {
        let err = build_target_list(&relation(), &AttributeSet::from_iter([-3])).unwrap_err();
        assert!(matches!(err, DeparseError::UnsupportedSystemAttribute(-3)));
    }
}
