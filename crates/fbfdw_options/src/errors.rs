#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid option \"{name}\", valid options in this context are: {valid}")]
    InvalidOption { name: String, valid: String },

    #[error("conflicting or redundant options: {0}")]
    Redundant(String),

    #[error("conflicting options: \"query\" cannot be used with \"table_name\"")]
    QueryWithTableName,

    #[error("foreign tables defined with the \"query\" option cannot be set as \"updatable\"")]
    UpdatableQuery,

    #[error("an error was encountered when parsing the provided \"{name}\" value: {value}")]
    InvalidInteger { name: &'static str, value: String },

    #[error("\"{name}\" requires a Boolean value, got \"{value}\"")]
    InvalidBoolean { name: &'static str, value: String },

    #[error("\"port\" must have a value between 1 and 65535")]
    PortOutOfRange,

    #[error("\"batch_size\" must have a value of 1 or greater")]
    BatchSizeTooSmall,

    #[error("missing required option \"{0}\"")]
    Missing(&'static str),
}

impl OptionsError {
    /// SQLSTATE the host should report this error with.
    pub fn sqlstate(&self) -> &'static str {
        match self {
            Self::InvalidOption { .. } => "HV00D",
            Self::Missing(_) => "HV000",
            _ => "42601",
        }
    }
}

pub type Result<T, E = OptionsError> = std::result::Result<T, E>;
