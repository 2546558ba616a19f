// ============================================================================
// src/grub/mod.rs – GRUB install pipeline (probe → bootstrap → install → cfg)
// ============================================================================

pub mod bootstrap;
pub mod cfg;
pub mod installer;
pub mod probe;

use crate::cmd::Runner;
use crate::error::InstallError;
use crate::fs::FileSystem;
use self::cfg::WrittenConfig;
use self::probe::{Arch, DetectedEnvironment};
use std::path::PathBuf;

/// Everything one install needs. Built once, never mutated during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    pub target_root: PathBuf,
    /// Passed as both `--root-directory` and `--boot-directory`.
    pub state_dir: PathBuf,
    pub device: String,
    pub grub_config_template: PathBuf,
    /// `None` (or empty) means ask `tty`.
    pub tty: Option<String>,
    pub force_efi: bool,
    pub installer: String,
}

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub env: DetectedEnvironment,
    pub created_dirs: Vec<PathBuf>,
    pub installer_args: Vec<String>,
    pub config: WrittenConfig,
}

pub fn run_install(
    ctx: &InstallContext,
    fs: &dyn FileSystem,
    runner: &dyn Runner,
) -> Result<InstallReport, InstallError> {
    run_install_for_arch(ctx, Arch::host(), fs, runner)
}

/// The full pipeline for a given architecture. Stops at the first failing
/// stage and leaves earlier effects in place.
pub fn run_install_for_arch(
    ctx: &InstallContext,
    arch: Arch,
    fs: &dyn FileSystem,
    runner: &dyn Runner,
) -> Result<InstallReport, InstallError> {
    tracing::info!("Installing GRUB..");

    let env = probe::probe(arch, ctx.tty.as_deref(), fs, runner)?;
    let created_dirs = bootstrap::ensure_target_dirs(fs, &ctx.target_root)?;
    let installer_args = installer::install(ctx, &env, runner)?;
    let config = cfg::write_config(fs, ctx, &env.tty)?;

    tracing::info!("Grub install to device {} complete", ctx.device);
    Ok(InstallReport {
        env,
        created_dirs,
        installer_args,
        config,
    })
}
