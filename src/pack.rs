//! The bundler: read script and template, inline, write, copy the favicon.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::BundleConfig;
use crate::error::{BundleError, Result};
use crate::marker;
use crate::report::PackReport;

/// Produce the self-contained page described by `config`.
///
/// Both inputs are read before anything is written, so a missing script or
/// template leaves any previous bundle untouched. The output directory must
/// already exist.
pub fn pack(config: &BundleConfig) -> Result<PackReport> {
    let script_path = config.script_path();
    let template_path = config.template_path();
    let output_path = config.output_path();

    let script = read_text(&script_path)?;
    let template = read_text(&template_path)?;

    let sub = marker::inline_script(&template, &script);
    if !sub.matched {
        if config.strict {
            return Err(BundleError::MissingMarker {
                template: template_path,
            });
        }
        warn!(
            "no <script src=\"{}\"> marker in {}; bundle is the template unchanged",
            marker::SCRIPT_FILENAME,
            template_path.display()
        );
    }

    let bundle_bytes = sub.html.len() as u64;
    let over_budget = PackReport::exceeds(bundle_bytes, config.max_bytes);
    if let (true, Some(budget)) = (over_budget, config.max_bytes) {
        if config.strict {
            return Err(BundleError::OverBudget {
                size: bundle_bytes,
                budget,
            });
        }
        warn!("bundle is {bundle_bytes} bytes, over the {budget} byte budget");
    }

    fs::write(&output_path, &sub.html).map_err(|e| BundleError::write(&output_path, e))?;
    info!("wrote {} ({bundle_bytes} bytes)", output_path.display());

    let asset_copied = match config.asset_path() {
        Some(asset) => copy_asset(&asset, &config.asset_output_path())?,
        None => false,
    };

    Ok(PackReport {
        output: output_path,
        bundle_bytes,
        script_bytes: script.len() as u64,
        substituted: sub.matched,
        asset_copied,
        max_bytes: config.max_bytes,
        over_budget,
    })
}

fn read_text(path: &Path) -> Result<String> {
    debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|e| BundleError::read(path, e))
}

/// Copy the auxiliary asset if it exists. Returns whether a copy happened.
fn copy_asset(from: &Path, to: &Path) -> Result<bool> {
    if !from.exists() {
        debug!("no auxiliary asset at {}, skipping", from.display());
        return Ok(false);
    }
    let bytes = fs::copy(from, to).map_err(|e| BundleError::copy(from, to, e))?;
    debug!("copied {} -> {} ({bytes} bytes)", from.display(), to.display());
    Ok(true)
}
