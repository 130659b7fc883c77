use serde::Deserialize;

/// Longest line, in characters, that can still be a heading.
pub const DEFAULT_MAX_HEADER_LEN: usize = 80;

/// Role titles that open a profile in the biography documents.
pub const DEFAULT_HEADER_PREFIXES: &[&str] =
    &["Evangelist", "Elder", "Rev.", "Reverend", "Minister", "Pastor"];

/// Decides which lines are headings: short lines starting with a known
/// prefix. Prefix matching is anchored and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderRule {
    pub prefixes: Vec<String>,
    pub max_len: usize,
}

impl Default for HeaderRule {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_PREFIXES)
    }
}

impl HeaderRule {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self {
            prefixes: prefixes.iter().map(|p| p.as_ref().to_string()).collect(),
            max_len: DEFAULT_MAX_HEADER_LEN,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn matches(&self, line: &str) -> bool {
        line.chars().count() <= self.max_len
            && self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }

    /// Every heading line with its index, in input order.
    pub fn find<S: AsRef<str>>(&self, lines: &[S]) -> Vec<HeaderMatch> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, l)| self.matches(l.as_ref()))
            .map(|(index, l)| HeaderMatch {
                index,
                line: l.as_ref().to_string(),
            })
            .collect()
    }

    /// Split `lines` into one section per heading.
    ///
    /// A section's body runs from the line after its heading up to (not
    /// including) the next heading, or to the end of input. Lines before the
    /// first heading belong to no section. No headings, no sections.
    pub fn chunk<S: AsRef<str>>(&self, lines: &[S]) -> Vec<HeaderSection> {
        let headers = self.find(lines);

        let mut sections = Vec::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            let end = headers.get(i + 1).map_or(lines.len(), |next| next.index);
            sections.push(HeaderSection {
                header: h.line.clone(),
                body: lines[h.index + 1..end]
                    .iter()
                    .map(|l| l.as_ref().to_string())
                    .collect(),
            });
        }
        sections
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub index: usize,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSection {
    pub header: String,
    pub body: Vec<String>,
}

/// Header-delimited chunking with the default length gate.
pub fn chunk_by_header<S: AsRef<str>, P: AsRef<str>>(
    lines: &[S],
    header_prefixes: &[P],
) -> Vec<HeaderSection> {
    HeaderRule::new(header_prefixes).chunk(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn section(header: &str, body: &[&str]) -> HeaderSection {
        HeaderSection {
            header: header.to_string(),
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn splits_on_each_header() {
        let lines = ["Elder Smith", "Bio one", "Bio two", "Pastor Jones", "Bio three"];
        let sections = chunk_by_header(&lines, &["Elder", "Pastor"]);
        assert_eq!(
            sections,
            vec![
                section("Elder Smith", &["Bio one", "Bio two"]),
                section("Pastor Jones", &["Bio three"]),
            ]
        );
    }

    #[test]
    fn no_headers_means_no_sections() {
        let lines = ["Welcome", "Some text", "elder lowercase"];
        assert!(chunk_by_header(&lines, &["Elder", "Pastor"]).is_empty());
        assert!(chunk_by_header(&lines, DEFAULT_HEADER_PREFIXES).is_empty());
        let none: [&str; 0] = [];
        assert!(chunk_by_header(&lines, &none).is_empty());
    }

    #[test]
    fn partition_is_lossless_when_input_starts_with_header() {
        let lines = [
            "Rev. A",
            "a1",
            "Rev. B",
            "Minister C",
            "c1",
            "c2",
            "Evangelist D",
        ];
        let sections = chunk_by_header(&lines, DEFAULT_HEADER_PREFIXES);
        assert_eq!(sections.len(), 4);
        assert!(sections[1].body.is_empty());
        assert!(sections[3].body.is_empty());

        let rebuilt: Vec<String> = sections
            .into_iter()
            .flat_map(|s| std::iter::once(s.header).chain(s.body))
            .collect();
        assert_eq!(rebuilt, lines);
    }

    #[test]
    fn lines_before_first_header_are_skipped() {
        let lines = ["Ministries", "Intro text", "Pastor X", "x1"];
        let sections = chunk_by_header(&lines, &["Pastor"]);
        assert_eq!(sections, vec![section("Pastor X", &["x1"])]);
    }

    #[test]
    fn length_gate_at_eighty_characters() {
        let rule = HeaderRule::new(&["Elder"]);
        let at_limit = format!("Elder {}", "x".repeat(74));
        let over_limit = format!("Elder {}", "x".repeat(75));
        assert_eq!(at_limit.chars().count(), 80);
        assert_eq!(over_limit.chars().count(), 81);

        assert!(rule.matches(&at_limit));
        assert!(!rule.matches(&over_limit));
    }

    #[test]
    fn long_bio_line_does_not_open_a_section() {
        let bio = format!("Elder Smith has served {}", "faithfully ".repeat(10));
        let lines = vec!["Elder Smith".to_string(), bio.clone(), "Pastor Jones".to_string()];
        let sections = chunk_by_header(&lines, &["Elder", "Pastor"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, vec![bio]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = HeaderRule::new(&["Rev."]);
        let line = format!("Rev. {}", "é".repeat(75));
        assert!(line.len() > 80);
        assert!(rule.matches(&line));
    }

    #[test]
    fn matching_is_case_sensitive_and_anchored() {
        let rule = HeaderRule::default();
        assert!(!rule.matches("pastor Jones"));
        assert!(!rule.matches("Our Pastor Jones"));
        assert!(rule.matches("Reverend Dr. Brown"));
    }

    #[test]
    fn find_reports_indices() {
        let lines = ["x", "Elder A", "y", "Elder B"];
        let found = HeaderRule::new(&["Elder"]).find(&lines);
        let indices: Vec<usize> = found.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(found[1].line, "Elder B");
    }

    fn any_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,10}".prop_map(|n| format!("Elder {n}")),
            "[a-z ]{0,20}",
        ]
    }

    proptest! {
        #[test]
        fn partition_is_lossless_for_generated_input(
            first in "[a-z]{1,10}",
            rest in prop::collection::vec(any_line(), 0..30),
        ) {
            let mut lines = vec![format!("Elder {first}")];
            lines.extend(rest);
            let headers = lines.iter().filter(|l| l.starts_with("Elder ")).count();

            let sections = chunk_by_header(&lines, DEFAULT_HEADER_PREFIXES);
            prop_assert_eq!(sections.len(), headers);

            let rebuilt: Vec<String> = sections
                .into_iter()
                .flat_map(|s| std::iter::once(s.header).chain(s.body))
                .collect();
            prop_assert_eq!(rebuilt, lines);
        }
    }
}
