use std::path::PathBuf;

use serde::Serialize;

/// Summary of one `pack` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackReport {
    pub output: PathBuf,
    pub bundle_bytes: u64,
    pub script_bytes: u64,
    /// Whether the `main.js` marker was found and replaced.
    pub substituted: bool,
    pub asset_copied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
    /// Set when `max_bytes` is configured and the bundle exceeds it.
    pub over_budget: bool,
}

impl PackReport {
    pub fn exceeds(bundle_bytes: u64, max_bytes: Option<u64>) -> bool {
        max_bytes.is_some_and(|budget| bundle_bytes > budget)
    }

    /// One-line confirmation for the terminal.
    pub fn summary(&self) -> String {
        let mut line = if self.substituted {
            format!(
                "packed {} ({} bytes, {} bytes of script inlined)",
                self.output.display(),
                self.bundle_bytes,
                self.script_bytes
            )
        } else {
            format!(
                "wrote {} ({} bytes): no main.js marker found, template copied unchanged",
                self.output.display(),
                self.bundle_bytes
            )
        };
        if let Some(budget) = self.max_bytes {
            if self.over_budget {
                line.push_str(&format!(", OVER {budget} byte budget"));
            } else {
                line.push_str(&format!(", {} bytes under budget", budget - self.bundle_bytes));
            }
        }
        if self.asset_copied {
            line.push_str(", favicon copied");
        }
        line
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
