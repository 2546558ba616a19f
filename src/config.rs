// ============================================================================
// src/config.rs – strict config loader + CLI overrides → InstallContext
// ============================================================================

use crate::grub::installer::DEFAULT_INSTALLER;
use crate::grub::InstallContext;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/grubsmith.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct InstallCfg {
    #[serde(default)]
    pub target: Option<PathBuf>,
    /// Defaults to `<target>/boot`.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub grub_conf: Option<PathBuf>,
    #[serde(default)]
    pub tty: Option<String>,
    #[serde(default)]
    pub force_efi: bool,
    #[serde(default = "default_installer")]
    pub installer: String,
}

fn default_installer() -> String {
    DEFAULT_INSTALLER.to_string()
}

impl Default for InstallCfg {
    fn default() -> Self {
        Self {
            target: None,
            state_dir: None,
            device: None,
            grub_conf: None,
            tty: None,
            force_efi: false,
            installer: default_installer(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Audit {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_audit_path")]
    pub log_path: PathBuf,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("/var/log/grubsmith.log")
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub install: InstallCfg,
    #[serde(default)]
    pub audit: Audit,
}

/// Command-line values; any field set here beats the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Overrides {
    /// Root of the target filesystem being provisioned
    #[arg(long)]
    pub target: Option<PathBuf>,
    /// Root and boot directory handed to the installer (default: <target>/boot)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
    /// Block device to make bootable
    #[arg(long)]
    pub device: Option<String>,
    /// grub.cfg template copied into the installed grub directory
    #[arg(long)]
    pub grub_conf: Option<PathBuf>,
    /// Console to add next to tty1 (default: current terminal)
    #[arg(long)]
    pub tty: Option<String>,
    /// Install for EFI even when no EFI firmware is detected
    #[arg(long)]
    pub force_efi: bool,
    /// Installer program (grub2-install or grub-install)
    #[arg(long)]
    pub installer: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = fs::read_to_string(&p)
            .with_context(|| format!("read config: {}", p.as_ref().display()))?;
        let cfg: Self = match p.as_ref().extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&s).context("yaml parse")?,
            _ => toml::from_str(&s).context("toml parse")?,
        };
        Ok(cfg)
    }

    /// An explicit path must exist; the default path is optional.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn context(&self, o: &Overrides) -> Result<InstallContext> {
        let file = &self.install;

        let target_root = o
            .target
            .clone()
            .or_else(|| file.target.clone())
            .ok_or_else(|| anyhow!("target root not set; pass --target or set install.target"))?;
        let state_dir = o
            .state_dir
            .clone()
            .or_else(|| file.state_dir.clone())
            .unwrap_or_else(|| target_root.join("boot"));
        let device = o
            .device
            .clone()
            .or_else(|| file.device.clone())
            .ok_or_else(|| anyhow!("device not set; pass --device or set install.device"))?;
        let grub_config_template = o
            .grub_conf
            .clone()
            .or_else(|| file.grub_conf.clone())
            .ok_or_else(|| {
                anyhow!("grub.cfg template not set; pass --grub-conf or set install.grub_conf")
            })?;
        let tty = o
            .tty
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| file.tty.clone())
            .filter(|t| !t.is_empty());
        let installer = o
            .installer
            .clone()
            .unwrap_or_else(|| file.installer.clone());

        Ok(InstallContext {
            target_root,
            state_dir,
            device,
            grub_config_template,
            tty,
            force_efi: o.force_efi || file.force_efi,
            installer,
        })
    }
}
