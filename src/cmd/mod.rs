// ============================================================================
// src/cmd/mod.rs – command subsystem root
// ============================================================================
pub mod base; // process capability (Runner, SystemRunner, RecordingRunner)
pub mod doctor; // grubsmith doctor
pub mod install; // grubsmith install
pub mod simulate; // grubsmith simulate

// Re-export common types for convenience:
pub use base::{RecordingRunner, Runner, SystemRunner};

#[cfg(test)]
pub use base::ScriptedRunner;
