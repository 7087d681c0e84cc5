//! Regex-based privacy pattern scanning.
//!
//! Detectors are an ordered list of (label, pattern, code) values applied
//! to every validated string value. New detectors slot into the list
//! without touching the analyzer's control flow.

use regex::Regex;

/// A single privacy detector.
#[derive(Debug)]
pub struct PrivacyPattern {
    /// Human-readable label used in issue messages
    pub label: &'static str,
    /// Machine-readable issue code, e.g. `privacy.email`
    pub code: &'static str,
    regex: Regex,
}

impl PrivacyPattern {
    /// Creates a detector from a compiled regex.
    pub fn new(label: &'static str, code: &'static str, regex: Regex) -> Self {
        Self { label, code, regex }
    }
}

/// One detector's result for a scanned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyFinding {
    /// Label of the matching detector
    pub label: &'static str,
    /// Issue code of the matching detector
    pub code: &'static str,
    /// Number of matches inside the value
    pub matches: u64,
    /// First matched fragment, for the issue message
    pub fragment: String,
}

/// Ordered privacy detector list.
#[derive(Debug)]
pub struct PrivacyScanner {
    patterns: Vec<PrivacyPattern>,
}

impl PrivacyScanner {
    /// Creates a scanner with the default detectors: email addresses,
    /// phone-number-shaped sequences, and a broad national-id heuristic
    /// (six or more consecutive digits).
    ///
    /// The national-id pattern deliberately over-matches; long numeric
    /// identifiers will be flagged. Callers that need a narrower net build
    /// their own list with [`Self::with_patterns`].
    pub fn new() -> Self {
        Self {
            patterns: vec![
                PrivacyPattern {
                    label: "Email address",
                    code: "privacy.email",
                    regex: Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}")
                        .expect("Invalid email pattern"),
                },
                PrivacyPattern {
                    label: "Phone number",
                    code: "privacy.phone",
                    regex: Regex::new(
                        r"\b(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{2,3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}\b",
                    )
                    .expect("Invalid phone pattern"),
                },
                PrivacyPattern {
                    label: "National id",
                    code: "privacy.national_id",
                    regex: Regex::new(r"\b\d{6,}\b").expect("Invalid national id pattern"),
                },
            ],
        }
    }

    /// Creates a scanner with a caller-supplied detector list.
    ///
    /// Detectors run in the given order; the defaults are not consulted.
    pub fn with_patterns(patterns: Vec<PrivacyPattern>) -> Self {
        Self { patterns }
    }

    /// Scans a value against every detector, in order.
    ///
    /// Returns one finding per matching detector, carrying the total match
    /// count and the first matched fragment.
    pub fn scan(&self, value: &str) -> Vec<PrivacyFinding> {
        let mut findings = Vec::new();
        for pattern in &self.patterns {
            let mut matches = pattern.regex.find_iter(value);
            if let Some(first) = matches.next() {
                let count = 1 + matches.count() as u64;
                findings.push(PrivacyFinding {
                    label: pattern.label,
                    code: pattern.code,
                    matches: count,
                    fragment: first.as_str().to_string(),
                });
            }
        }
        findings
    }
}

impl Default for PrivacyScanner {
    fn default() -> Self {
        Self::new()
    }
}
