//! Packs The Cat & the Luminid into one self-contained HTML page: the
//! compiled game script is inlined into `index.html` in place of its
//! `<script src="main.js">` reference, and the favicon is copied alongside.

pub mod config;
pub mod error;
pub mod marker;
pub mod pack;
pub mod report;
pub mod watch;

pub use config::BundleConfig;
pub use error::{BundleError, Result};
pub use marker::{inline_script, Substitution};
pub use pack::pack;
pub use report::PackReport;
pub use watch::watch;
