//! Display rendering for prediction results

use serde::Serialize;

use super::result::PredictionResult;
use crate::constants::LOAD_UNIT;

/// One labeled value, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Info,
}

/// What the display surface shows for one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub tone: Tone,
    pub headline: String,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn metric(label: &str, value: f64) -> Metric {
    Metric {
        label: format!("{} ({})", label, LOAD_UNIT),
        value: format!("{:.2}", value),
    }
}

pub fn render(result: &PredictionResult) -> Presentation {
    match result {
        PredictionResult::DualLoad { heating, cooling } => Presentation {
            tone: Tone::Success,
            headline: "Prediction Successful!".to_string(),
            metrics: vec![
                metric("Predicted Heating Load", *heating),
                metric("Predicted Cooling Load", *cooling),
            ],
            message: None,
        },
        PredictionResult::SingleLoad { value } => Presentation {
            tone: Tone::Success,
            headline: "Prediction Successful!".to_string(),
            metrics: vec![metric("Predicted Energy Load", *value)],
            message: None,
        },
        PredictionResult::Unrecognized { raw } => Presentation {
            tone: Tone::Info,
            headline: "Prediction returned an unexpected output shape".to_string(),
            metrics: Vec::new(),
            message: Some(format!("Raw model output: {}", raw)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::RawOutput;

    #[test]
    fn test_dual_load_metrics() {
        let p = render(&PredictionResult::DualLoad { heating: 21.34, cooling: 24.58 });
        assert_eq!(p.tone, Tone::Success);
        assert_eq!(
            p.metrics,
            vec![
                Metric { label: "Predicted Heating Load (kW/h)".into(), value: "21.34".into() },
                Metric { label: "Predicted Cooling Load (kW/h)".into(), value: "24.58".into() },
            ]
        );
        assert!(p.message.is_none());
    }

    #[test]
    fn test_single_load_two_decimals() {
        let p = render(&PredictionResult::SingleLoad { value: 18.9 });
        assert_eq!(p.metrics.len(), 1);
        assert_eq!(p.metrics[0].value, "18.90");
        assert_eq!(p.metrics[0].label, "Predicted Energy Load (kW/h)");
    }

    #[test]
    fn test_rounding() {
        let p = render(&PredictionResult::SingleLoad { value: 15.556 });
        assert_eq!(p.metrics[0].value, "15.56");
    }

    #[test]
    fn test_unrecognized_shows_raw() {
        let p = render(&PredictionResult::Unrecognized {
            raw: RawOutput::Sequence(vec![1.0, 2.0, 3.0]),
        });
        assert_eq!(p.tone, Tone::Info);
        assert!(p.metrics.is_empty());
        assert_eq!(p.message.as_deref(), Some("Raw model output: [1.0, 2.0, 3.0]"));
    }
}
