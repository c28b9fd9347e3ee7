//! The one substitution rule of the bundler: swap the external
//! `<script src="main.js"></script>` reference in a page for an inline
//! `<script>` block holding the compiled program.

use std::sync::OnceLock;

use regex::Regex;

/// Filename the template's script marker must reference.
pub const SCRIPT_FILENAME: &str = "main.js";

/// Result of applying the marker rule to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub html: String,
    /// False when the template had no marker and `html` is the template unchanged.
    pub matched: bool,
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        // Quotes around the filename are optional but must pair up.
        Regex::new(r#"<script\s+src=(?:"main\.js"|'main\.js'|main\.js)\s*>\s*</script>"#)
            .expect("marker pattern is valid")
    })
}

/// Replace the first script marker in `template` with `script` inlined.
///
/// The script text is inserted as-is: no escaping and no `$` group
/// expansion. Callers must make sure it contains no literal `</script>`.
pub fn inline_script(template: &str, script: &str) -> Substitution {
    let Some(m) = marker_regex().find(template) else {
        return Substitution {
            html: template.to_string(),
            matched: false,
        };
    };

    let inline_len = "<script>".len() + script.len() + "</script>".len();
    let mut html = String::with_capacity(template.len() - m.len() + inline_len);
    html.push_str(&template[..m.start()]);
    html.push_str("<script>");
    html.push_str(script);
    html.push_str("</script>");
    html.push_str(&template[m.end()..]);

    Substitution {
        html,
        matched: true,
    }
}

/// Count marker occurrences in a page.
pub fn count_markers(html: &str) -> usize {
    marker_regex().find_iter(html).count()
}
