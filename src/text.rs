use serde::Deserialize;

/// Normalize one paragraph of extracted text into a line.
///
/// Non-breaking spaces become plain spaces, any run of whitespace collapses
/// to a single space and the result is trimmed. May return an empty string.
pub fn clean_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_ws = false;
    for ch in raw.chars() {
        let ch = if ch == '\u{00a0}' { ' ' } else { ch };
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out.trim().to_string()
}

/// Clean every paragraph and drop the ones that end up empty.
pub fn clean_lines<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|p| clean_line(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

/// A literal correction for one specific source document.
///
/// These patch known defects in a given file and are configured next to the
/// section that needs them. They are not meant as general cleanup rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextFix {
    /// Replace every occurrence of `from` with `to` in every line.
    Replace { from: String, to: String },
    /// If the first line starts with `starts_with` (ASCII case-insensitive)
    /// and contains `marker`, drop everything before the first `marker`.
    LeadIn { starts_with: String, marker: String },
}

impl TextFix {
    fn apply(&self, lines: &mut [String]) {
        match self {
            TextFix::Replace { from, to } => {
                if from.is_empty() {
                    return;
                }
                for line in lines.iter_mut() {
                    if line.contains(from.as_str()) {
                        *line = line.replace(from.as_str(), to);
                    }
                }
            }
            TextFix::LeadIn {
                starts_with,
                marker,
            } => {
                let Some(first) = lines.first_mut() else {
                    return;
                };
                if marker.is_empty() || !starts_with_ignore_ascii_case(first, starts_with) {
                    return;
                }
                if let Some(pos) = first.find(marker.as_str()) {
                    *first = first[pos..].to_string();
                }
            }
        }
    }
}

/// Apply fixes in order. Lines are not re-cleaned afterwards.
pub fn apply_fixes(lines: &mut [String], fixes: &[TextFix]) {
    for fix in fixes {
        fix.apply(lines);
    }
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}
