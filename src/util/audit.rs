// ============================================================================
// src/util/audit.rs – Minimal append-only audit trail
// ============================================================================

use chrono::Local;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Append a timestamped event to the audit log (0600 permissions).
/// Silent failure if log is unwritable – avoids blocking main logic.
pub fn audit_log(path: &Path, event: &str, detail: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
    {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{ts}] {event}: {detail}");
    } else {
        tracing::debug!(path = %path.display(), "audit log not writable");
    }
}

/// Hex SHA-256 used to fingerprint written grub.cfg contents.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
