use anyhow::Context;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output configuration derived from CLI flags.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output file path. When set, output is saved as JSON instead of printed.
    pub output: Option<PathBuf>,
}

impl OutputConfig {
    /// Emit output: if `-o` is set, save `json_value` to that path; otherwise
    /// print `human_text` to stdout.
    pub fn emit(&self, human_text: &str, json_value: &serde_json::Value) -> anyhow::Result<()> {
        if let Some(ref path) = self.output {
            let content = serde_json::to_string_pretty(json_value).context("failed to serialize JSON")?;
            std::fs::write(path, &content).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        } else {
            println!("{human_text}");
        }
        Ok(())
    }
}

/// Whether colored output should be used (TTY + not NO_COLOR).
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Format a section header (cyan when color is enabled).
pub fn fmt_section(text: &str) -> String {
    if use_color() {
        format!("{}", text.cyan())
    } else {
        text.to_string()
    }
}

/// Format a warning label (yellow when color is enabled).
pub fn fmt_warning(text: &str) -> String {
    if use_color() {
        format!("{}", text.yellow())
    } else {
        text.to_string()
    }
}

/// Format an error label (red when color is enabled).
pub fn fmt_error(text: &str) -> String {
    if use_color() {
        format!("{}", text.red())
    } else {
        text.to_string()
    }
}
