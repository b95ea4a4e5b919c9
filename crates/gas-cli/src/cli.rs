//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gas_fs::FileType;

/// Apps Script Sync - Keep a local source tree in step with an Apps Script project
#[derive(Parser, Debug)]
#[command(name = "gas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding SourceCode/ and .gas/
    #[arg(short, long, global = true, env = "GAS_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Authorize and create the local source folders
    Init,

    /// Show the active project, its URLs and versions
    Info,

    /// Set the active Script ID
    ///
    /// The id is checked against the remote project and remembered in
    /// .gas/script_id.txt once valid.
    SetId {
        /// Script ID of an existing project
        id: String,
    },

    /// Download the project sources, backing up local files first
    Download {
        /// Version to download instead of the current head
        #[arg(long)]
        version: Option<u32>,
    },

    /// Replace the remote project content with the local sources
    Upload {
        /// Create an autosaved version before uploading
        #[arg(long)]
        autosave: bool,
    },

    /// Create a new standalone project and make it active
    CreateProject {
        /// Project title
        name: String,
    },

    /// Create a local source file from a stub
    ///
    /// Examples:
    ///   gas add-file Util                 # JAVASCRIPT/Util.js
    ///   gas add-file Index --type html    # HTML/Index.html
    ///   gas add-file Util --sync          # Create, then upload
    AddFile {
        /// File name without extension
        name: String,

        /// Kind of source file
        #[arg(short = 't', long = "type", value_enum, default_value_t = SourceKind::Server)]
        kind: SourceKind,

        /// Upload after creating the file
        #[arg(long)]
        sync: bool,
    },

    /// Write the remote manifest (appsscript.json) locally
    RestoreManifest,

    /// List the project versions
    Versions,

    /// List the project deployments
    Deployments,

    /// Create a new immutable version
    CreateVersion {
        /// Version description
        description: String,
    },

    /// Point the web-app deployment at a version
    Deploy {
        /// Version number; 0 leaves the deployment unchanged
        version: u32,
    },

    /// Create a version and deploy it as the web app
    Release {
        /// Version description
        description: String,
    },

    /// List the backups taken before each download
    Backups,

    /// Upload whenever a local source file changes
    Watch {
        /// Quiet period before uploading, in milliseconds
        #[arg(long, default_value_t = 500)]
        debounce_ms: u64,
    },

    /// Forget the stored credential and the remembered Script ID
    Logout,
}

/// Source file kinds accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Server-side script (.js)
    Server,
    /// Client markup (.html)
    Html,
    /// Manifest (.json); only restorable from the remote project
    Json,
}

impl From<SourceKind> for FileType {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Server => FileType::ServerJs,
            SourceKind::Html => FileType::Html,
            SourceKind::Json => FileType::Json,
        }
    }
}
