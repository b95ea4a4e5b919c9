//! Error types for gas-core

use std::path::PathBuf;

/// Result type for gas-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing a project.
///
/// Named kinds carry the message shown to the user as is. Wrapped lower-layer
/// errors are unexpected faults; see [`Error::is_domain`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The authorization flow did not finish before the deadline
    #[error("User Authorization Failed due to taking too long!")]
    AuthTimeout,

    /// The authorization flow finished without a credential
    #[error("Credentials failed!")]
    AuthDenied,

    /// The project id could not be validated against the remote service
    #[error(
        "Script ID Validation Failed! Please Try Again. Ensure that the ID is correct and you have permission!"
    )]
    ScriptIdValidation { script_id: String },

    /// A source or backup folder could not be created
    #[error(
        "Directory creation failed at {path}! Please ensure your program files are not in a protected directory!"
    )]
    DirectoryCreation { path: PathBuf },

    /// A requested version number does not exist
    #[error(
        "Unable to find a version to retrieve project content from. Please ensure your version number corresponds to a version and is > 0."
    )]
    UnknownVersion { version: u32 },

    #[error("Invalid description!")]
    InvalidDescription,

    #[error("Invalid Project Name!")]
    InvalidProjectName,

    /// A file name given by the user cannot be used
    #[error("Invalid file name {name:?}: {reason}")]
    InvalidFileName { name: String, reason: String },

    /// No deployment carries the web-app description
    #[error("No web-app deployment found for this project!")]
    NoWebAppDeployment,

    /// Missing project id or client
    #[error("Please initialize the library first, and then provide a GAS Script ID!")]
    NotReady,

    /// The remote snapshot has no manifest
    #[error("No manifest (appsscript.json) found in the remote project!")]
    ManifestMissing,

    /// Remote call failed
    #[error(transparent)]
    Remote(#[from] gas_api::Error),

    /// Filesystem error from gas-fs
    #[error(transparent)]
    Fs(gas_fs::Error),

    /// Split/inline error from gas-blocks
    #[error(transparent)]
    Blocks(gas_blocks::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a named failure whose message is meant for the user.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Error::Remote(_) | Error::Fs(_) | Error::Blocks(_) | Error::Io(_)
        )
    }
}

impl From<gas_fs::Error> for Error {
    fn from(err: gas_fs::Error) -> Self {
        match err {
            gas_fs::Error::DirectoryCreation { path, .. } => Error::DirectoryCreation { path },
            gas_fs::Error::InvalidFileName { name, reason } => {
                Error::InvalidFileName { name, reason }
            }
            other => Error::Fs(other),
        }
    }
}

impl From<gas_blocks::Error> for Error {
    fn from(err: gas_blocks::Error) -> Self {
        match err {
            gas_blocks::Error::Fs(fs) => fs.into(),
            other => Error::Blocks(other),
        }
    }
}
