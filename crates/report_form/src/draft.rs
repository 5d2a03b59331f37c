use serde::{Deserialize, Serialize};
use shared::domain::{DayEvaluation, FieldName};

/// Raw, possibly invalid form input. An empty `day_evaluation` means nothing
/// was picked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub name: String,
    pub day_evaluation: String,
    pub materials_produced: String,
    pub plan_for_tomorrow: String,
    pub observations: String,
}

impl Draft {
    /// State after a successful submission.
    pub fn cleared() -> Self {
        Self {
            day_evaluation: DayEvaluation::Neutral.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::DayEvaluation => &self.day_evaluation,
            FieldName::MaterialsProduced => &self.materials_produced,
            FieldName::PlanForTomorrow => &self.plan_for_tomorrow,
            FieldName::Observations => &self.observations,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        match field {
            FieldName::Name => self.name = value,
            FieldName::DayEvaluation => self.day_evaluation = value,
            FieldName::MaterialsProduced => self.materials_produced = value,
            FieldName::PlanForTomorrow => self.plan_for_tomorrow = value,
            FieldName::Observations => self.observations = value,
        }
    }
}
