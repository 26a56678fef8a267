//! Broker detection from the header line of an export.
//!
//! Detection is advisory: callers that already know the broker pass it
//! explicitly and skip this module.

use serde::Serialize;

use crate::brokers::{all_mappings, BrokerId};

/// Minimum similarity for a detection to be accepted (exclusive).
pub const DETECTION_THRESHOLD: f64 = 0.7;

/// Best table entry for a header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub broker: BrokerId,
    pub similarity: f64,
}

/// Edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, left) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// `(maxLen - distance) / maxLen`, in `[0, 1]`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Strips the BOM, trailing whitespace and double quotes from a header line.
pub fn normalize_header(header: &str) -> String {
    header
        .strip_prefix('\u{feff}')
        .unwrap_or(header)
        .trim_end()
        .replace('"', "")
}

/// Signature table matcher.
#[derive(Debug, Clone)]
pub struct FormatDetector {
    table: Vec<(BrokerId, &'static str)>,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDetector {
    /// Builds the table from every registered mapping, in registry order.
    pub fn new() -> Self {
        let table = all_mappings()
            .flat_map(|mapping| {
                mapping
                    .signatures
                    .iter()
                    .map(move |signature| (mapping.broker, *signature))
            })
            .collect();
        Self { table }
    }

    pub fn with_table(table: Vec<(BrokerId, &'static str)>) -> Self {
        Self { table }
    }

    pub fn signatures(&self) -> &[(BrokerId, &'static str)] {
        &self.table
    }

    /// Best-scoring entry above the threshold, ties resolved by table order.
    pub fn classify(&self, header: &str) -> Option<Detection> {
        let header = normalize_header(header);
        if header.is_empty() {
            return None;
        }

        let mut best: Option<Detection> = None;
        for (broker, signature) in &self.table {
            let score = similarity(&header, signature);
            if best.map_or(true, |current| score > current.similarity) {
                best = Some(Detection {
                    broker: *broker,
                    similarity: score,
                });
            }
        }

        best.filter(|detection| detection.similarity > DETECTION_THRESHOLD)
    }

    pub fn detect(&self, header: &str) -> Option<BrokerId> {
        self.classify(header).map(|detection| detection.broker)
    }

    /// Classifies whole file text by its first line.
    pub fn detect_text(&self, text: &str) -> Option<Detection> {
        self.classify(text.lines().next().unwrap_or_default())
    }
}

/// Post-detection remap of superseded formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatRedirects {
    pub degiro_force_v3: bool,
}

impl FormatRedirects {
    pub fn remap(&self, broker: BrokerId) -> BrokerId {
        match broker {
            BrokerId::Degiro if self.degiro_force_v3 => BrokerId::DegiroV3,
            other => other,
        }
    }
}
