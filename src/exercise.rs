use std::collections::BTreeMap;

/// Reflection answers must be longer than this once trimmed.
pub const MIN_REFLECTION_LENGTH: usize = 10;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Checklist,
    Quiz,
    Reflection,
    Practice,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Checklist => "checklist",
            ExerciseKind::Quiz => "quiz",
            ExerciseKind::Reflection => "reflection",
            ExerciseKind::Practice => "practice",
        }
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExerciseKind {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "checklist" => Ok(Self::Checklist),
            "quiz" => Ok(Self::Quiz),
            "reflection" => Ok(Self::Reflection),
            "practice" => Ok(Self::Practice),
            other => Err(format!("{} is not a supported exercise type.", other)),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckedItems {
    #[serde(default)]
    pub checked_items: BTreeMap<u32, bool>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionAnswers {
    #[serde(default)]
    pub responses: BTreeMap<u32, String>,
}

/// A saved answer to an exercise. The stored payload is the inner value;
/// the variant travels separately as the row's `exercise_type`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ExerciseData {
    Checklist(CheckedItems),
    Quiz(serde_json::Value),
    Reflection(ReflectionAnswers),
    Practice(CheckedItems),
}

impl ExerciseData {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseData::Checklist(_) => ExerciseKind::Checklist,
            ExerciseData::Quiz(_) => ExerciseKind::Quiz,
            ExerciseData::Reflection(_) => ExerciseKind::Reflection,
            ExerciseData::Practice(_) => ExerciseKind::Practice,
        }
    }

    pub fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            ExerciseData::Checklist(items) | ExerciseData::Practice(items) => {
                serde_json::to_value(items)
            }
            ExerciseData::Reflection(answers) => serde_json::to_value(answers),
            ExerciseData::Quiz(value) => Ok(value.clone()),
        }
    }

    pub fn from_payload(
        kind: ExerciseKind,
        payload: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ExerciseKind::Checklist => ExerciseData::Checklist(serde_json::from_value(payload)?),
            ExerciseKind::Quiz => ExerciseData::Quiz(payload),
            ExerciseKind::Reflection => ExerciseData::Reflection(serde_json::from_value(payload)?),
            ExerciseKind::Practice => ExerciseData::Practice(serde_json::from_value(payload)?),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data: ExerciseContent,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("Exercise expects a {expected} response, got {actual}")]
    KindMismatch {
        expected: ExerciseKind,
        actual: ExerciseKind,
    },
    #[error("Step {0} is not checked")]
    UncheckedStep(usize),
    #[error("Question {0} needs an answer longer than {MIN_REFLECTION_LENGTH} characters")]
    ShortAnswer(usize),
    #[error("Practice has no recorded items")]
    EmptyPractice,
}

impl Exercise {
    /// Checks that a response is complete enough to be saved for this exercise.
    pub fn validate_response(&self, response: &ExerciseData) -> Result<(), ExerciseError> {
        if response.kind() != self.kind {
            return Err(ExerciseError::KindMismatch {
                expected: self.kind,
                actual: response.kind(),
            });
        }

        match response {
            ExerciseData::Checklist(items) => {
                for index in 0..self.data.steps.len() {
                    let checked = items
                        .checked_items
                        .get(&(index as u32))
                        .copied()
                        .unwrap_or(false);
                    if !checked {
                        return Err(ExerciseError::UncheckedStep(index));
                    }
                }
                Ok(())
            }
            ExerciseData::Reflection(answers) => {
                for index in 0..self.data.questions.len() {
                    let length = answers
                        .responses
                        .get(&(index as u32))
                        // Counted in UTF-16 units, as the web client measures it.
                        .map(|a| a.trim().encode_utf16().count())
                        .unwrap_or(0);
                    if length <= MIN_REFLECTION_LENGTH {
                        return Err(ExerciseError::ShortAnswer(index));
                    }
                }
                Ok(())
            }
            ExerciseData::Practice(items) => {
                if items.checked_items.is_empty() {
                    return Err(ExerciseError::EmptyPractice);
                }
                Ok(())
            }
            ExerciseData::Quiz(_) => Ok(()),
        }
    }
}
