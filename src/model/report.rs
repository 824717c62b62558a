use serde::{Deserialize, Serialize};

use crate::prompts::Gender;

/// One batch submission: a free-text activity list per day slot.
///
/// `inputs[i]` belongs to `days[i]`; an empty input means the day has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub inputs: Vec<String>,
    pub gender: Gender,
    pub days: Vec<String>,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.len() != self.days.len() {
            return Err(format!(
                "inputs and days must have the same length (got {} inputs, {} days)",
                self.inputs.len(),
                self.days.len()
            ));
        }
        Ok(())
    }

    /// Number of day slots that will hit the provider.
    pub fn active_days(&self) -> usize {
        self.inputs.iter().filter(|i| !is_blank(i)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResult {
    pub day: String,
    pub text: Option<String>,
}

impl DayResult {
    pub fn skipped(day: &str) -> Self {
        Self {
            day: day.to_string(),
            text: None,
        }
    }

    pub fn generated(day: &str, text: String) -> Self {
        Self {
            day: day.to_string(),
            text: Some(text),
        }
    }

    /// Soft failure: the error is carried as the report text.
    pub fn failed(day: &str, cause: &str) -> Self {
        Self {
            day: day.to_string(),
            text: Some(format!("Fehler bei der Generierung für {day}: {cause}")),
        }
    }
}

pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_fail_validation() {
        let req = GenerateRequest {
            inputs: vec!["- Meeting".into()],
            gender: Gender::Male,
            days: vec!["Montag".into(), "Dienstag".into()],
        };
        let err = req.validate().unwrap_err();
        assert!(err.contains("1 inputs"));
        assert!(err.contains("2 days"));
    }

    #[test]
    fn skipped_day_serializes_null_text() {
        let json = serde_json::to_value(DayResult::skipped("Dienstag")).unwrap();
        assert_eq!(json, serde_json::json!({ "day": "Dienstag", "text": null }));
    }

    #[test]
    fn request_parses_wire_format() {
        let raw = r#"{"inputs":["- Meeting",""],"gender":"female","days":["Montag","Dienstag"]}"#;
        let req: GenerateRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.gender, Gender::Female);
        assert_eq!(req.active_days(), 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let raw = r#"{"inputs":[""],"gender":"divers","days":["Montag"]}"#;
        assert!(serde_json::from_str::<GenerateRequest>(raw).is_err());
    }

    #[test]
    fn failure_text_names_day_and_cause() {
        let result = DayResult::failed("Mittwoch", "API error with status 500");
        assert_eq!(
            result.text.as_deref(),
            Some("Fehler bei der Generierung für Mittwoch: API error with status 500")
        );
    }
}
