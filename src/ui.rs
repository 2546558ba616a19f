// ============================================================================
// src/ui.rs – Operator-facing console output (separate from tracing logs)
// ============================================================================

use console::Style;

pub const BANNER_BODY_WIDTH: usize = 60;

/// Styled status lines for the person running the install. Quiet mode drops
/// everything except errors.
#[derive(Debug, Clone)]
pub struct UX {
    pub quiet: bool,
}

impl UX {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        let frame = Style::new().color256(202).bold();
        let span = "═".repeat(BANNER_BODY_WIDTH + 2);
        println!("{}", frame.apply_to(format!("╔{span}╗")));
        println!(
            "{}",
            frame.apply_to(format!(
                "║{:^width$}║",
                "GRUBSMITH // bootloader forge",
                width = BANNER_BODY_WIDTH + 2
            ))
        );
        println!("{}", frame.apply_to(format!("╚{span}╝")));
    }

    pub fn phase(&self, title: &str) {
        if self.quiet {
            return;
        }
        println!("\n{}", Style::new().color256(208).bold().apply_to(format!("▸ {title}")));
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", Style::new().white().apply_to(msg));
        }
    }

    pub fn note(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", Style::new().dim().italic().apply_to(msg));
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", Style::new().green().bold().apply_to(format!("✔ {msg}")));
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", Style::new().yellow().bold().apply_to(format!("! {msg}")));
        }
    }

    pub fn error(&self, msg: &str) {
        eprintln!("  {}", Style::new().red().bold().apply_to(format!("✘ {msg}")));
    }

    /// Two-column key/value panel.
    pub fn data_panel(&self, title: &str, rows: &[(&str, String)]) {
        if self.quiet {
            return;
        }
        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let key_style = Style::new().color256(208);
        println!("  {}", Style::new().bold().underlined().apply_to(title));
        for (key, value) in rows {
            println!(
                "    {}  {}",
                key_style.apply_to(format!("{key:<key_width$}")),
                value
            );
        }
    }

    /// Print a block of text verbatim (e.g. a rendered grub.cfg).
    pub fn block(&self, text: &str) {
        if self.quiet {
            return;
        }
        let gutter = Style::new().dim();
        for line in text.lines() {
            println!("    {} {}", gutter.apply_to("│"), line);
        }
    }
}

pub fn flag_label(flag: bool) -> String {
    let label = if flag { "yes" } else { "no" };
    label.to_string()
}
