// ============================================================================
// src/cmd/simulate.rs – Dry run inside a throwaway rooted tree
// ============================================================================

use crate::cmd::install::{show_context, show_report};
use crate::cmd::{RecordingRunner, SystemRunner};
use crate::config::{Config, Overrides};
use crate::fs::RootedFs;
use crate::grub::cfg::{console_node, LEGACY_CONFIG_DIR, MODERN_CONFIG_DIR};
use crate::grub::probe::{self, EFI_MARKER};
use crate::grub::{self, InstallContext};
use crate::ui::UX;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn run_simulate(ui: &UX, cfg: &Config, overrides: &Overrides) -> Result<()> {
    ui.banner();
    ui.phase("Dry Run // Rooted Sandbox");

    let mut ctx = cfg.context(overrides)?;
    let host = SystemRunner::new();
    let tty = probe::resolve_tty(ctx.tty.as_deref(), &host).context("resolve console")?;
    if !tty.is_empty() {
        ctx.tty = Some(tty.clone());
    }
    show_context(ui, &ctx);

    let sandbox = Sandbox::stage(&ctx, &tty)?;
    ui.note(&format!(
        "Sandbox root {}; the installer is recorded, not run.",
        sandbox.fs.root().display()
    ));

    let runner = RecordingRunner::intercepting(host, &[ctx.installer.as_str()]);
    let report = grub::run_install(&ctx, &sandbox.fs, &runner).context("simulated install")?;

    ui.phase("Recorded Invocation");
    for call in runner.calls() {
        ui.info(&call.to_string());
    }
    show_report(ui, &report);

    ui.phase("Rendered grub.cfg");
    ui.block(&String::from_utf8_lossy(&report.config.content));
    ui.success("Dry run complete; host untouched.");
    Ok(())
}

/// Temporary tree mirroring just enough of the host for the pipeline to run:
/// target root, the grub dir the installer would create, the template, and
/// the EFI marker / console node when the host has them.
pub struct Sandbox {
    _dir: TempDir,
    pub fs: RootedFs,
}

impl Sandbox {
    pub fn stage(ctx: &InstallContext, tty: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("grubsmith-sim-")
            .tempdir()
            .context("create sandbox directory")?;
        let rooted = RootedFs::new(dir.path());

        let target = rooted.resolve(&ctx.target_root);
        fs::create_dir_all(&target)
            .with_context(|| format!("create {}", target.display()))?;
        let grub_dir = rooted.resolve(&ctx.state_dir.join(config_dir_for(&ctx.installer)));
        fs::create_dir_all(&grub_dir)
            .with_context(|| format!("create {}", grub_dir.display()))?;

        let template = fs::read(&ctx.grub_config_template).with_context(|| {
            format!("read grub config template {}", ctx.grub_config_template.display())
        })?;
        write_mirrored(&rooted, &ctx.grub_config_template, &template)?;

        if Path::new(EFI_MARKER).exists() {
            fs::create_dir_all(rooted.resolve(Path::new(EFI_MARKER)))
                .context("mirror EFI marker")?;
        }
        if let Some(node) = console_node(tty).filter(|n| n.exists()) {
            write_mirrored(&rooted, &node, b"")?;
        }

        Ok(Self {
            _dir: dir,
            fs: rooted,
        })
    }
}

/// `grub-install` lays down `grub/`; `grub2-install` lays down `grub2/`.
pub fn config_dir_for(installer: &str) -> &'static str {
    match Path::new(installer).file_name().and_then(|n| n.to_str()) {
        Some("grub-install") => LEGACY_CONFIG_DIR,
        _ => MODERN_CONFIG_DIR,
    }
}

fn write_mirrored(rooted: &RootedFs, host_path: &Path, contents: &[u8]) -> Result<()> {
    let path = rooted.resolve(host_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ScriptedRunner;
    use crate::grub::installer::DEFAULT_INSTALLER;
    use crate::grub::probe::Arch;

    fn ctx(template: &Path, installer: &str) -> InstallContext {
        InstallContext {
            target_root: "/mnt/target".into(),
            state_dir: "/mnt/target/boot".into(),
            device: "/dev/sda".to_string(),
            grub_config_template: template.to_path_buf(),
            tty: Some("tty1".to_string()),
            force_efi: false,
            installer: installer.to_string(),
        }
    }

    fn template_file() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grub.cfg");
        fs::write(&path, "linux /vmlinuz console=tty1\n").unwrap();
        (dir, path)
    }

    #[test]
    fn installer_name_picks_config_dir() {
        assert_eq!(config_dir_for("grub2-install"), "grub2");
        assert_eq!(config_dir_for("/usr/sbin/grub-install"), "grub");
    }

    #[test]
    fn sandbox_mirrors_template_and_grub_dir() {
        let (_keep, template) = template_file();
        let sandbox = Sandbox::stage(&ctx(&template, "grub-install"), "").unwrap();

        let root = sandbox.fs.root();
        assert!(root.join("mnt/target").is_dir());
        assert!(root.join("mnt/target/boot/grub").is_dir());
        assert_eq!(
            fs::read_to_string(sandbox.fs.resolve(&template)).unwrap(),
            "linux /vmlinuz console=tty1\n"
        );
    }

    #[test]
    fn sandboxed_pipeline_records_installer() {
        let (_keep, template) = template_file();
        let ctx = ctx(&template, DEFAULT_INSTALLER);
        let sandbox = Sandbox::stage(&ctx, "tty1").unwrap();
        let runner = RecordingRunner::intercepting(ScriptedRunner::new(), &[DEFAULT_INSTALLER]);

        let report = grub::run_install_for_arch(&ctx, Arch::X86_64, &sandbox.fs, &runner).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args.last().unwrap(), "--removable=/dev/sda");
        assert_eq!(report.config.content, b"linux /vmlinuz console=tty1\n");
        assert!(sandbox
            .fs
            .root()
            .join("mnt/target/boot/grub2/grub.cfg")
            .is_file());
    }

    #[test]
    fn missing_template_fails_staging() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.cfg");
        assert!(Sandbox::stage(&ctx(&absent, DEFAULT_INSTALLER), "").is_err());
    }
}
