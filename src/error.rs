// ============================================================================
// src/error.rs – Failure taxonomy for the GRUB install pipeline
// ============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an external program run through a [`crate::cmd::Runner`].
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command '{0}' not in allowlist")]
    NotAllowed(String),

    #[error("spawn {program} failed: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with status {status}: {output}")]
    Exit {
        program: String,
        status: i32,
        output: String,
    },
}

/// Stage-level failure. The pipeline stops at the first one.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("console query failed: {0}")]
    Probe(#[source] CommandError),

    #[error("create target directory {}: {source}", .dir.display())]
    Bootstrap {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bootloader installer failed: {0}")]
    Install(#[source] CommandError),

    #[error(transparent)]
    ConfigResolution(#[from] ConfigResolutionError),
}

#[derive(Debug, Error)]
pub enum ConfigResolutionError {
    #[error("no grub config directory (grub or grub2) under {}", .0.display())]
    MissingConfigDir(PathBuf),

    #[error("read grub config template {}: {source}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("create {}: {source}", .path.display())]
    CreateTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write {}: {source}", .path.display())]
    WriteTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
