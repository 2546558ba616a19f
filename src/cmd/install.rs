// ============================================================================
// src/cmd/install.rs – `grubsmith install`: run the pipeline against the host
// ============================================================================

use crate::cmd::SystemRunner;
use crate::config::{Config, Overrides};
use crate::fs::OsFs;
use crate::grub::{self, InstallContext, InstallReport};
use crate::ui::{flag_label, UX};
use crate::util::audit::{audit_log, sha256_hex};
use anyhow::{Context, Result};
use dialoguer::Confirm;

pub fn run_install(ui: &UX, cfg: &Config, overrides: &Overrides, assume_yes: bool) -> Result<()> {
    ui.banner();
    let ctx = cfg.context(overrides)?;

    ui.phase("Install Ledger");
    show_context(ui, &ctx);

    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Install GRUB to {}? Boot records on the device will be rewritten.",
                ctx.device
            ))
            .default(false)
            .interact()
            .context("confirmation prompt failed; pass --yes when running unattended")?;
        if !proceed {
            ui.warn("Install aborted; the device was not touched.");
            return Ok(());
        }
    }

    let audit = |event: &str, detail: &str| {
        if cfg.audit.enabled {
            audit_log(&cfg.audit.log_path, event, detail);
        }
    };

    ui.phase("Bootloader Install");
    audit(
        "GRUB_INSTALL_START",
        &format!("device={} state_dir={}", ctx.device, ctx.state_dir.display()),
    );

    let runner = SystemRunner::new();
    match grub::run_install(&ctx, &OsFs, &runner) {
        Ok(report) => {
            audit(
                "GRUB_INSTALL_OK",
                &format!(
                    "device={} cfg={} sha256={}",
                    ctx.device,
                    report.config.path.display(),
                    sha256_hex(&report.config.content)
                ),
            );
            show_report(ui, &report);
            ui.success(&format!("GRUB installed to {}.", ctx.device));
            Ok(())
        }
        Err(err) => {
            audit(
                "GRUB_INSTALL_FAIL",
                &format!("device={} error={}", ctx.device, err),
            );
            ui.error(&err.to_string());
            ui.note("Nothing was rolled back; created directories and installer effects remain.");
            Err(anyhow::Error::new(err).context(format!("install grub to {}", ctx.device)))
        }
    }
}

pub(crate) fn show_context(ui: &UX, ctx: &InstallContext) {
    ui.data_panel(
        "Inputs",
        &[
            ("Target root", ctx.target_root.display().to_string()),
            ("State dir", ctx.state_dir.display().to_string()),
            ("Device", ctx.device.clone()),
            ("grub.cfg template", ctx.grub_config_template.display().to_string()),
            (
                "Console",
                ctx.tty.clone().unwrap_or_else(|| "(detect)".to_string()),
            ),
            ("Force EFI", flag_label(ctx.force_efi)),
            ("Installer", ctx.installer.clone()),
        ],
    );
}

pub(crate) fn show_report(ui: &UX, report: &InstallReport) {
    ui.data_panel(
        "Result",
        &[
            ("Architecture", report.env.arch.to_string()),
            ("EFI firmware", flag_label(report.env.efi_present)),
            ("Console", report.env.tty.clone()),
            ("Dirs created", report.created_dirs.len().to_string()),
            ("Installer args", report.installer_args.join(" ")),
            ("grub.cfg", report.config.path.display().to_string()),
            (
                "Extra console",
                report
                    .config
                    .extra_console
                    .clone()
                    .unwrap_or_else(|| "none".to_string()),
            ),
        ],
    );
}
