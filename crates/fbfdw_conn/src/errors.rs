pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    #[error("Unable to connect to foreign server \"{db_path}\": {message}")]
    Establish { db_path: String, message: String },

    #[error("Session for \"{0}\" has been closed")]
    SessionClosed(String),

    #[error("Session for \"{0}\" is already borrowed by this operation")]
    SessionBusy(String),

    #[error("Session for foreign server \"{0}\" is being established by this operation")]
    EstablishInProgress(String),

    #[error(transparent)]
    Options(#[from] fbfdw_options::OptionsError),
}

impl ConnError {
    /// SQLSTATE the host should report this error with.
    pub fn sqlstate(&self) -> &'static str {
        match self {
            Self::Establish { .. } => "HV00N",
            Self::SessionClosed(_) => "08003",
            Self::SessionBusy(_) | Self::EstablishInProgress(_) => "55006",
            Self::Options(e) => e.sqlstate(),
        }
    }
}

pub type Result<T, E = ConnError> = std::result::Result<T, E>;
