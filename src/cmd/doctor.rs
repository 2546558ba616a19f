// ============================================================================
// src/cmd/doctor.rs – Preflight report: can this host install GRUB?
// ============================================================================

use crate::cmd::SystemRunner;
use crate::config::{Config, Overrides};
use crate::error::CommandError;
use crate::fs::{FileSystem, OsFs};
use crate::grub::cfg::wants_extra_console;
use crate::grub::probe::{self, Arch};
use crate::ui::UX;
use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Pass => "[PASS]",
            Status::Warn => "[WARN]",
            Status::Fail => "[FAIL]",
        }
    }
}

struct ReportEntry {
    name: &'static str,
    status: Status,
    detail: String,
}

pub fn run_doctor(ui: &UX, cfg: &Config, overrides: &Overrides) -> Result<()> {
    ui.banner();
    ui.phase("Preflight // Bootloader Readiness");

    let mut report = Vec::new();
    let installer = overrides
        .installer
        .clone()
        .unwrap_or_else(|| cfg.install.installer.clone());

    let (status, detail) = match find_binary(&installer) {
        Ok(path) => (Status::Pass, format!("found at {}", path.display())),
        Err(err) => (Status::Fail, err),
    };
    report.push(ReportEntry {
        name: "Installer",
        status,
        detail,
    });

    report.push(ReportEntry {
        name: "Architecture",
        status: Status::Pass,
        detail: format!("{} (grub target {}-efi)", env::consts::ARCH, Arch::host()),
    });

    let ctx = cfg.context(overrides);
    let force_efi = ctx.as_ref().map(|c| c.force_efi).unwrap_or(overrides.force_efi);
    let (status, detail) = firmware_status(probe::efi_present(&OsFs), force_efi);
    report.push(ReportEntry {
        name: "Firmware",
        status,
        detail,
    });

    match ctx {
        Err(err) => report.push(ReportEntry {
            name: "Install inputs",
            status: Status::Warn,
            detail: err.to_string(),
        }),
        Ok(ctx) => {
            let (status, detail) =
                match probe::resolve_tty(ctx.tty.as_deref(), &SystemRunner::new()) {
                    Ok(tty) => console_status(&OsFs, &tty),
                    Err(err) => (
                        Status::Warn,
                        format!("{err}; pass --tty when running without a terminal"),
                    ),
                };
            report.push(ReportEntry {
                name: "Console",
                status,
                detail,
            });

            let (status, detail) = match OsFs.read(&ctx.grub_config_template) {
                Ok(bytes) => template_status(&bytes),
                Err(err) => (
                    Status::Fail,
                    format!("{}: {err}", ctx.grub_config_template.display()),
                ),
            };
            report.push(ReportEntry {
                name: "grub.cfg template",
                status,
                detail,
            });

            let status = if OsFs.is_dir(&ctx.target_root) {
                Status::Pass
            } else {
                Status::Warn
            };
            report.push(ReportEntry {
                name: "Target root",
                status,
                detail: ctx.target_root.display().to_string(),
            });
        }
    }

    summarize(&report, ui)
}

fn firmware_status(efi_present: bool, force_efi: bool) -> (Status, String) {
    match (efi_present, force_efi) {
        (true, _) => (Status::Pass, "EFI firmware detected".to_string()),
        (false, true) => (
            Status::Warn,
            "no EFI firmware detected but --force-efi set; EFI install forced".to_string(),
        ),
        (false, false) => (Status::Pass, "legacy BIOS install".to_string()),
    }
}

fn console_status(fs: &dyn FileSystem, tty: &str) -> (Status, String) {
    if wants_extra_console(fs, tty) {
        (
            Status::Pass,
            format!("{tty}; console={tty} will be added next to console=tty1"),
        )
    } else if tty.is_empty() {
        (Status::Warn, "no console name detected".to_string())
    } else {
        (Status::Pass, format!("{tty}; grub.cfg copied unmodified"))
    }
}

fn template_status(bytes: &[u8]) -> (Status, String) {
    let text = String::from_utf8_lossy(bytes);
    if text.contains("console=tty1") {
        (Status::Pass, format!("{} bytes, console=tty1 present", bytes.len()))
    } else {
        (
            Status::Warn,
            format!(
                "{} bytes, no console=tty1; extra console cannot be added",
                bytes.len()
            ),
        )
    }
}

/// Same lookup the runner performs, so PASS here means `install` can spawn it.
fn find_binary(program: &str) -> Result<PathBuf, String> {
    match SystemRunner::resolve(program) {
        Ok(path) if path.is_file() => Ok(path),
        Ok(path) => Err(format!(
            "{} not found; install the grub2 tools package",
            path.display()
        )),
        Err(CommandError::NotAllowed(_)) => Err(format!(
            "{program} is not an allowlisted installer location"
        )),
        Err(_) => Err(format!(
            "{program} not found; install the grub2 tools package"
        )),
    }
}

fn summarize(report: &[ReportEntry], ui: &UX) -> Result<()> {
    ui.phase("Report");
    for entry in report {
        let line = format!("{} {:<18} {}", entry.status.label(), entry.name, entry.detail);
        match entry.status {
            Status::Pass => ui.info(&line),
            Status::Warn => ui.warn(&line),
            Status::Fail => ui.error(&line),
        }
    }

    let failures = report.iter().filter(|e| e.status == Status::Fail).count();
    if failures > 0 {
        return Err(anyhow!("{failures} preflight check(s) failed"));
    }
    ui.success("Host ready for GRUB install.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memfs::MemFs;
    use tempfile::TempDir;

    #[test]
    fn forced_efi_without_firmware_warns() {
        assert_eq!(firmware_status(false, true).0, Status::Warn);
        assert_eq!(firmware_status(true, false).0, Status::Pass);
        assert_eq!(firmware_status(false, false).1, "legacy BIOS install");
    }

    #[test]
    fn console_report_matches_patch_decision() {
        let fs = MemFs::new();
        fs.add_file("/dev/ttyS0", b"");

        let (status, detail) = console_status(&fs, "ttyS0");
        assert_eq!(status, Status::Pass);
        assert!(detail.contains("console=ttyS0 will be added"));

        let (_, detail) = console_status(&fs, "tty1");
        assert!(detail.contains("unmodified"));
        assert_eq!(console_status(&fs, "").0, Status::Warn);
    }

    #[test]
    fn template_without_default_console_warns() {
        assert_eq!(template_status(b"linux /vmlinuz console=tty1").0, Status::Pass);
        assert_eq!(template_status(b"linux /vmlinuz quiet").0, Status::Warn);
    }

    #[test]
    fn binary_outside_allowlist_fails_even_when_present() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("grub2-install");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();

        let err = find_binary(bin.to_str().unwrap()).unwrap_err();
        assert!(err.contains("not an allowlisted"));
    }

    #[test]
    fn binary_lookup_agrees_with_runner() {
        for program in ["grub2-install", "grub-install", "/usr/sbin/grub2-install"] {
            let found = find_binary(program);
            let spawnable = SystemRunner::resolve(program).is_ok_and(|p| p.is_file());
            assert_eq!(found.is_ok(), spawnable, "{program}");
        }
    }

    #[test]
    fn failures_fail_the_summary() {
        let ui = UX::new(true);
        let report = vec![
            ReportEntry {
                name: "Installer",
                status: Status::Fail,
                detail: "missing".to_string(),
            },
            ReportEntry {
                name: "Firmware",
                status: Status::Warn,
                detail: "forced".to_string(),
            },
        ];
        assert!(summarize(&report, &ui).is_err());
        assert!(summarize(&report[1..], &ui).is_ok());
    }
}
