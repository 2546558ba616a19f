// ============================================================================
// src/grub/probe.rs – Architecture, console and firmware detection
// ============================================================================

use crate::cmd::Runner;
use crate::error::InstallError;
use crate::fs::FileSystem;
use std::fmt;
use std::path::Path;

/// Present only when the running system booted through EFI firmware.
pub const EFI_MARKER: &str = "/sys/firmware/efi";
/// Console query; prints the terminal attached to stdin.
pub const CONSOLE_QUERY: &str = "tty";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Arm64,
    X86_64,
}

impl Arch {
    /// 64-bit ARM maps to `arm64`; everything else is treated as `x86_64`.
    pub fn from_target(arch: &str) -> Self {
        match arch {
            "aarch64" | "arm64" => Arch::Arm64,
            _ => Arch::X86_64,
        }
    }

    pub fn host() -> Self {
        Self::from_target(std::env::consts::ARCH)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEnvironment {
    pub arch: Arch,
    /// Console name without the `/dev/` prefix.
    pub tty: String,
    pub efi_present: bool,
}

/// Explicit tty wins verbatim; an absent or empty one is asked of `tty`.
pub fn resolve_tty(explicit: Option<&str>, runner: &dyn Runner) -> Result<String, InstallError> {
    if let Some(tty) = explicit.filter(|t| !t.is_empty()) {
        return Ok(tty.to_string());
    }

    let out = runner
        .run(CONSOLE_QUERY, &[])
        .map_err(InstallError::Probe)?;
    let trimmed = out.stdout.trim();
    Ok(trimmed.strip_prefix("/dev/").unwrap_or(trimmed).to_string())
}

pub fn efi_present(fs: &dyn FileSystem) -> bool {
    fs.exists(Path::new(EFI_MARKER))
}

pub fn probe(
    arch: Arch,
    explicit_tty: Option<&str>,
    fs: &dyn FileSystem,
    runner: &dyn Runner,
) -> Result<DetectedEnvironment, InstallError> {
    let tty = resolve_tty(explicit_tty, runner)?;
    let efi_present = efi_present(fs);
    tracing::debug!(%arch, tty = %tty, efi_present, "probed environment");
    Ok(DetectedEnvironment {
        arch,
        tty,
        efi_present,
    })
}
