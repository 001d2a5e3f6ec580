use crate::AttrNumber;

/// Deparse failures.
///
/// All of these mean the relation metadata handed in by the host is
/// inconsistent with the request. They are internal faults and retrying the
/// same call cannot succeed.
#[derive(Debug, thiserror::Error)]
pub enum DeparseError {
    #[error("attribute number {attnum} does not exist in relation \"{relation}\"")]
    MissingAttribute {
        relation: String,
        attnum: AttrNumber,
    },

    #[error("attribute number {attnum} of relation \"{relation}\" is a dropped column")]
    DroppedAttribute {
        relation: String,
        attnum: AttrNumber,
    },

    #[error("unsupported system attribute number {0}")]
    UnsupportedSystemAttribute(AttrNumber),

    #[error("invalid column list for relation \"{relation}\": {reason}")]
    InvalidColumnList { relation: String, reason: String },

    #[error("relation \"{0}\" is defined by a query and cannot be modified")]
    QueryRelation(String),

    #[error("UPDATE of relation \"{0}\" has no target columns")]
    EmptyUpdate(String),

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

impl DeparseError {
    /// SQLSTATE the host should report this error with.
    pub fn sqlstate(&self) -> &'static str {
        // internal_error
        "XX000"
    }
}

pub type Result<T, E = DeparseError> = std::result::Result<T, E>;
