//! Analysis result types

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Name of a reported metric
///
/// The variant order is the order metrics are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricName {
    /// Mean of all non-zero peak-picking pitch estimates (Hz)
    AveragePitch,
    /// Number of MFCC frames
    NumberOfMfccs,
    /// Sum of squared samples
    Energy,
    /// Mean per-frame zero-crossing rate
    ZeroCrossingRate,
    /// Mean spectral centroid (Hz)
    SpectralCentroid,
    /// Mean pYIN fundamental frequency over voiced frames (Hz)
    AverageF0,
    /// Mean chromagram value
    AverageChroma,
    /// Mean spectral contrast (dB)
    AverageSpectralContrast,
}

impl MetricName {
    /// All metrics, in reporting order
    pub const ALL: [MetricName; 8] = [
        MetricName::AveragePitch,
        MetricName::NumberOfMfccs,
        MetricName::Energy,
        MetricName::ZeroCrossingRate,
        MetricName::SpectralCentroid,
        MetricName::AverageF0,
        MetricName::AverageChroma,
        MetricName::AverageSpectralContrast,
    ];

    /// Display label, used as the key in serialized output
    ///
    /// # Example
    ///
    /// ```
    /// use speech_scope::analysis::result::MetricName;
    ///
    /// assert_eq!(MetricName::AverageF0.as_str(), "Average F0 (YIN)");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::AveragePitch => "Average Pitch",
            MetricName::NumberOfMfccs => "Number of MFCCs",
            MetricName::Energy => "Energy",
            MetricName::ZeroCrossingRate => "Zero Crossing Rate",
            MetricName::SpectralCentroid => "Spectral Centroid",
            MetricName::AverageF0 => "Average F0 (YIN)",
            MetricName::AverageChroma => "Average Chroma",
            MetricName::AverageSpectralContrast => "Average Spectral Contrast",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered metric name → value mapping
///
/// Keeps insertion order; inserting an existing name replaces its value in
/// place. A metric that was not computed is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    entries: Vec<(MetricName, f64)>,
}

impl MetricSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric
    pub fn insert(&mut self, name: MetricName, value: f64) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of a metric, if present
    pub fn get(&self, name: MetricName) -> Option<f64> {
        self.entries.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }

    /// True if the metric is present
    pub fn contains(&self, name: MetricName) -> bool {
        self.get(name).is_some()
    }

    /// Number of metrics present
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no metric is present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Metrics in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Metric names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = MetricName> + '_ {
        self.entries.iter().map(|&(n, _)| n)
    }

    /// Append all metrics of `other`
    pub fn extend(&mut self, other: MetricSet) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

/// Reference to the spectrogram image handed to the caller
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Rendered PNG; the caller owns the file
    File(PathBuf),
    /// Fixed placeholder reference used when there was no audio
    Placeholder(String),
}

impl ImageRef {
    /// True for the placeholder reference
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageRef::Placeholder(_))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::File(path) => write!(f, "{}", path.display()),
            ImageRef::Placeholder(name) => f.write_str(name),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisOutput {
    /// Computed metrics (empty when there was no audio)
    pub metrics: MetricSet,

    /// Spectrogram image or placeholder
    pub image: ImageRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_set_preserves_order() {
        let mut set = MetricSet::new();
        set.insert(MetricName::Energy, 1.0);
        set.insert(MetricName::AveragePitch, 2.0);
        set.insert(MetricName::Energy, 3.0);

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.keys().collect::<Vec<_>>(),
            vec![MetricName::Energy, MetricName::AveragePitch]
        );
        assert_eq!(set.get(MetricName::Energy), Some(3.0));
        assert!(!set.contains(MetricName::AverageF0));
    }

    #[test]
    fn test_metric_labels_unique() {
        let mut labels: Vec<&str> = MetricName::ALL.iter().map(|m| m.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MetricName::ALL.len());
    }

    #[test]
    fn test_image_ref_display() {
        assert_eq!(ImageRef::Placeholder("placeholder.png".into()).to_string(), "placeholder.png");
        assert!(ImageRef::Placeholder("x".into()).is_placeholder());
        assert!(!ImageRef::File(PathBuf::from("/tmp/a.png")).is_placeholder());
    }
}
