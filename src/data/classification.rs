//! Classification results and posture categorisation.
//!
//! The external classifier emits arbitrary class names. Posture quality is
//! derived from them by case-insensitive substring matching against a
//! configurable [`Vocabulary`].

use serde::{Deserialize, Serialize};

/// Default labels that indicate good posture.
pub const DEFAULT_GOOD_LABELS: &[&str] = &["healthy", "good", "proper", "correct"];

/// Default labels that indicate poor posture.
pub const DEFAULT_POOR_LABELS: &[&str] =
    &["unhealthy", "bad", "poor", "slouch", "hunched", "incorrect"];

/// A single class prediction from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Class name as emitted by the model (e.g. "Slouching").
    #[serde(rename = "className", alias = "class_name", alias = "label")]
    pub class_name: String,
    /// Probability in `[0, 1]`.
    pub probability: f32,
}

impl Prediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// One inference output: every class with its probability for a single tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResult(Vec<Prediction>);

impl ClassificationResult {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self(predictions)
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The prediction with the highest probability (first one wins ties).
    pub fn top(&self) -> Option<&Prediction> {
        self.0.iter().fold(None, |best: Option<&Prediction>, p| match best {
            Some(b) if b.probability >= p.probability => Some(b),
            _ => Some(p),
        })
    }
}

impl From<Vec<Prediction>> for ClassificationResult {
    fn from(predictions: Vec<Prediction>) -> Self {
        Self(predictions)
    }
}

impl FromIterator<Prediction> for ClassificationResult {
    fn from_iter<I: IntoIterator<Item = Prediction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Posture quality derived from a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostureCategory {
    Good,
    Neutral,
    Poor,
}

impl PostureCategory {
    /// Short label used in the history chart.
    pub fn label(&self) -> &'static str {
        match self {
            PostureCategory::Good => "Good",
            PostureCategory::Neutral => "Fair",
            PostureCategory::Poor => "Poor",
        }
    }

    /// Chart bar height as a percentage of the full bar.
    pub fn bar_height(&self) -> u8 {
        match self {
            PostureCategory::Good => 80,
            PostureCategory::Neutral => 50,
            PostureCategory::Poor => 20,
        }
    }
}

/// Confidence band used to colour prediction bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// 80% and above.
    High,
    /// 60% up to 80%.
    Medium,
    /// Below 60%.
    Low,
}

impl ConfidenceBand {
    pub fn of(probability: f32) -> Self {
        if probability >= 0.8 {
            ConfidenceBand::High
        } else if probability >= 0.6 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Label vocabularies used to recognise good and poor posture classes.
///
/// Entries are stored lowercased; matching is a substring test on the
/// lowercased class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    good: Vec<String>,
    poor: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_GOOD_LABELS.iter().copied(),
            DEFAULT_POOR_LABELS.iter().copied(),
        )
    }
}

impl Vocabulary {
    /// Build a vocabulary. Blank entries are dropped.
    pub fn new<G, P>(good: G, poor: P) -> Self
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        fn normalize<I>(labels: I) -> Vec<String>
        where
            I: IntoIterator,
            I::Item: AsRef<str>,
        {
            labels
                .into_iter()
                .map(|l| l.as_ref().trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect()
        }

        Self {
            good: normalize(good),
            poor: normalize(poor),
        }
    }

    pub fn good_labels(&self) -> &[String] {
        &self.good
    }

    pub fn poor_labels(&self) -> &[String] {
        &self.poor
    }

    pub fn matches_good(&self, class_name: &str) -> bool {
        let name = class_name.to_lowercase();
        self.good.iter().any(|l| name.contains(l.as_str()))
    }

    pub fn matches_poor(&self, class_name: &str) -> bool {
        let name = class_name.to_lowercase();
        self.poor.iter().any(|l| name.contains(l.as_str()))
    }

    /// Highest probability among poor-matching predictions strictly above
    /// `threshold`, or `None` when no such prediction exists.
    pub fn poor_confidence(&self, result: &ClassificationResult, threshold: f32) -> Option<f32> {
        result
            .predictions()
            .iter()
            .filter(|p| p.probability > threshold && self.matches_poor(&p.class_name))
            .map(|p| p.probability)
            .fold(None, |max, p| Some(max.map_or(p, |m: f32| m.max(p))))
    }

    /// Categorise a result.
    ///
    /// Poor wins whenever any poor-matching entry clears `threshold`, even if a
    /// good entry has a higher probability. Otherwise the top prediction
    /// decides between Good and Neutral. A label matching both lists (e.g.
    /// "unhealthy" contains "healthy") never counts as Good.
    pub fn categorize(&self, result: &ClassificationResult, threshold: f32) -> PostureCategory {
        if self.poor_confidence(result, threshold).is_some() {
            return PostureCategory::Poor;
        }

        match result.top() {
            Some(top)
                if self.matches_good(&top.class_name) && !self.matches_poor(&top.class_name) =>
            {
                PostureCategory::Good
            }
            _ => PostureCategory::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(entries: &[(&str, f32)]) -> ClassificationResult {
        entries.iter().map(|(l, p)| Prediction::new(*l, *p)).collect()
    }

    #[test]
    fn test_poor_match_is_case_insensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.matches_poor("SLOUCHING"));
        assert!(vocab.matches_poor("Bad Posture"));
        assert!(!vocab.matches_poor("Sitting Upright"));
    }

    #[test]
    fn test_poor_wins_over_higher_good() {
        // Probabilities need not sum to one; any poor entry above threshold counts.
        let vocab = Vocabulary::default();
        let r = result(&[("Good posture", 0.95), ("Slouch", 0.6)]);
        assert_eq!(vocab.categorize(&r, 0.5), PostureCategory::Poor);
        assert_eq!(vocab.poor_confidence(&r, 0.5), Some(0.6));
    }

    #[test]
    fn test_threshold_is_strict() {
        let vocab = Vocabulary::default();
        let r = result(&[("Bad", 0.5), ("Other", 0.5)]);
        assert_eq!(vocab.poor_confidence(&r, 0.5), None);
        assert_eq!(vocab.categorize(&r, 0.5), PostureCategory::Neutral);
    }

    #[test]
    fn test_poor_confidence_takes_maximum() {
        let vocab = Vocabulary::default();
        let r = result(&[("Hunched", 0.7), ("Slouching", 0.9), ("Good", 0.1)]);
        assert_eq!(vocab.poor_confidence(&r, 0.5), Some(0.9));
    }

    #[test]
    fn test_unhealthy_is_not_good() {
        let vocab = Vocabulary::default();
        let r = result(&[("Unhealthy", 0.45), ("Healthy", 0.4)]);
        assert_eq!(vocab.categorize(&r, 0.5), PostureCategory::Neutral);

        let r = result(&[("Healthy", 0.9), ("Unhealthy", 0.1)]);
        assert_eq!(vocab.categorize(&r, 0.5), PostureCategory::Good);
    }

    #[test]
    fn test_unknown_labels_are_neutral() {
        let vocab = Vocabulary::default();
        let r = result(&[("Empty chair", 0.99)]);
        assert_eq!(vocab.categorize(&r, 0.5), PostureCategory::Neutral);
    }

    #[test]
    fn test_custom_vocabulary_normalizes() {
        let vocab = Vocabulary::new(["  Upright "], ["LEANING", ""]);
        assert_eq!(vocab.good_labels(), ["upright"]);
        assert_eq!(vocab.poor_labels(), ["leaning"]);
        assert!(vocab.matches_poor("leaning forward"));
        assert!(!vocab.matches_poor("slouch"));
    }

    #[test]
    fn test_top_prediction() {
        let r = result(&[("A", 0.2), ("B", 0.7), ("C", 0.7)]);
        assert_eq!(r.top().unwrap().class_name, "B");
        assert!(ClassificationResult::default().top().is_none());
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::of(0.85), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(0.65), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(0.2), ConfidenceBand::Low);
    }

    #[test]
    fn test_deserialize_prediction_aliases() {
        let json = r#"[{"className":"Good","probability":0.8},{"label":"Bad","probability":0.2}]"#;
        let r: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.predictions()[1].class_name, "Bad");
    }
}
