// ============================================================================
// src/grub/cfg.rs – Locate the installed grub dir and write grub.cfg into it
// ============================================================================

use super::InstallContext;
use crate::error::ConfigResolutionError;
use crate::fs::FileSystem;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub const LEGACY_CONFIG_DIR: &str = "grub";
pub const MODERN_CONFIG_DIR: &str = "grub2";
pub const CONFIG_FILE: &str = "grub.cfg";

const PRIMARY_CONSOLE: &str = "console=tty1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenConfig {
    pub path: PathBuf,
    /// Console appended next to `console=tty1`, if any.
    pub extra_console: Option<String>,
    pub content: Vec<u8>,
}

/// Checks `grub` then `grub2` under `state_dir`. When both exist the later
/// check wins, so `grub2` is returned.
pub fn resolve_config_dir(fs: &dyn FileSystem, state_dir: &Path) -> Option<PathBuf> {
    let mut found = None;
    for name in [LEGACY_CONFIG_DIR, MODERN_CONFIG_DIR] {
        let candidate = state_dir.join(name);
        if fs.is_dir(&candidate) {
            found = Some(candidate);
        }
    }
    found
}

/// `/dev/<tty>`, or `None` when `tty` is empty, absolute or climbs out of
/// `/dev`.
pub fn console_node(tty: &str) -> Option<PathBuf> {
    let name = Path::new(tty);
    let mut parts = name.components().peekable();
    parts.peek()?;
    if !parts.all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(Path::new("/dev").join(name))
}

/// A second console is only worth adding for a real device node that is not
/// already the default console.
pub fn wants_extra_console(fs: &dyn FileSystem, tty: &str) -> bool {
    tty != "console"
        && tty != "tty1"
        && console_node(tty).is_some_and(|node| fs.exists(&node))
}

/// Rewrite every `console=tty1` into `console=tty1 console=<tty>`.
pub fn add_console(template: &[u8], tty: &str) -> Vec<u8> {
    let replacement = format!("{PRIMARY_CONSOLE} console={tty}");
    replace_all(template, PRIMARY_CONSOLE.as_bytes(), replacement.as_bytes())
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// Resolve the config dir, read the template, patch it for `tty` when
/// warranted and write `<dir>/grub.cfg`. Every step fails fast; nothing is
/// created once the template read has failed.
pub fn write_config(
    fs: &dyn FileSystem,
    ctx: &InstallContext,
    tty: &str,
) -> Result<WrittenConfig, ConfigResolutionError> {
    let dir = resolve_config_dir(fs, &ctx.state_dir)
        .ok_or_else(|| ConfigResolutionError::MissingConfigDir(ctx.state_dir.clone()))?;
    tracing::info!("Found grub config dir {}", dir.display());

    let template = fs
        .read(&ctx.grub_config_template)
        .map_err(|source| ConfigResolutionError::ReadTemplate {
            path: ctx.grub_config_template.clone(),
            source,
        })?;

    let path = dir.join(CONFIG_FILE);
    let mut target = fs
        .create(&path)
        .map_err(|source| ConfigResolutionError::CreateTarget {
            path: path.clone(),
            source,
        })?;

    let (content, extra_console) = if wants_extra_console(fs, tty) {
        tracing::info!("Adding extra tty ({}) to grub.cfg", tty);
        (add_console(&template, tty), Some(tty.to_string()))
    } else {
        (template, None)
    };

    tracing::info!(
        "Copying grub contents from {} to {}",
        ctx.grub_config_template.display(),
        path.display()
    );
    target
        .write_all(&content)
        .and_then(|_| target.flush())
        .map_err(|source| ConfigResolutionError::WriteTarget {
            path: path.clone(),
            source,
        })?;

    Ok(WrittenConfig {
        path,
        extra_console,
        content,
    })
}
