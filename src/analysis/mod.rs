//! Analysis and result aggregation modules
//!
//! Reduces frame-level features to the reported metrics:
//! - Metric computation (basic + advanced)
//! - Result types

pub mod metrics;
pub mod result;

pub use metrics::{advanced_metrics, basic_metrics, extract_metrics};
pub use result::{AnalysisOutput, ImageRef, MetricName, MetricSet};
