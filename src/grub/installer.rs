// ============================================================================
// src/grub/installer.rs – grub2-install argument assembly and invocation
// ============================================================================

use super::probe::{Arch, DetectedEnvironment};
use super::InstallContext;
use crate::cmd::Runner;
use crate::error::InstallError;

pub const DEFAULT_INSTALLER: &str = "grub2-install";

pub fn efi_mode(force_efi: bool, efi_present: bool) -> bool {
    force_efi || efi_present
}

/// Installer arguments in a fixed order. Legacy BIOS mode is implied by
/// leaving out the EFI pair.
pub fn installer_args(ctx: &InstallContext, arch: Arch, efi: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(5);
    if efi {
        args.push(format!("--target={arch}-efi"));
        args.push(format!(
            "--efi-directory={}/boot/efi",
            ctx.target_root.display()
        ));
    }
    args.push(format!("--root-directory={}", ctx.state_dir.display()));
    args.push(format!("--boot-directory={}", ctx.state_dir.display()));
    args.push(format!("--removable={}", ctx.device));
    args
}

/// Run the installer. Errors come back exactly as the runner reported them.
pub fn install(
    ctx: &InstallContext,
    env: &DetectedEnvironment,
    runner: &dyn Runner,
) -> Result<Vec<String>, InstallError> {
    let efi = efi_mode(ctx.force_efi, env.efi_present);
    if efi {
        tracing::info!("Installing grub efi for arch {}", env.arch);
    }

    let args = installer_args(ctx, env.arch, efi);
    tracing::debug!("Running grub with the following args: {:?}", args);
    runner
        .run(&ctx.installer, &args)
        .map_err(InstallError::Install)?;
    Ok(args)
}
