use serde::{Deserialize, Serialize};
use shared::{
    domain::{DayEvaluation, FieldName, ReportSubmission},
    error::ValidationError,
};

use crate::draft::Draft;

pub const REQUIRED_MESSAGE: &str = "Obrigatorio";
pub const INVALID_CHOICE_MESSAGE: &str = "Opção inválida";
pub const UNKNOWN_FIELD_MESSAGE: &str = "Campo não faz parte deste formulário";

const MIN_NAME_CHARS: usize = 2;
const MIN_MATERIALS_CHARS: usize = 1;
const MIN_PLAN_CHARS: usize = 2;

/// What the form does once the sheet accepted a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessPolicy {
    /// Clear the fields and keep the form open for another report.
    ResetDraft,
    /// Swap the form for a thank-you page; the instance accepts no more submits.
    ReplaceView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    Daily,
    DailyWithPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub includes_plan: bool,
    pub success_policy: SuccessPolicy,
}

impl FormSchema {
    pub fn daily_report() -> Self {
        Self {
            includes_plan: false,
            success_policy: SuccessPolicy::ReplaceView,
        }
    }

    pub fn daily_report_with_plan() -> Self {
        Self {
            includes_plan: true,
            success_policy: SuccessPolicy::ResetDraft,
        }
    }

    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::Daily => Self::daily_report(),
            FormVariant::DailyWithPlan => Self::daily_report_with_plan(),
        }
    }

    pub fn with_success_policy(mut self, success_policy: SuccessPolicy) -> Self {
        self.success_policy = success_policy;
        self
    }

    pub fn includes(&self, field: FieldName) -> bool {
        field != FieldName::PlanForTomorrow || self.includes_plan
    }

    /// Fields rendered by this form, in column order.
    pub fn fields(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|field| self.includes(*field))
            .collect()
    }

    pub fn validate_field(&self, field: FieldName, value: &str) -> Result<(), ValidationError> {
        if !self.includes(field) {
            return Err(ValidationError::new(field, UNKNOWN_FIELD_MESSAGE));
        }

        match field {
            FieldName::Name => min_chars(field, value, MIN_NAME_CHARS),
            FieldName::DayEvaluation => {
                if value.is_empty() {
                    return Err(ValidationError::new(field, REQUIRED_MESSAGE));
                }
                value
                    .parse::<DayEvaluation>()
                    .map(|_| ())
                    .map_err(|_| ValidationError::new(field, INVALID_CHOICE_MESSAGE))
            }
            FieldName::MaterialsProduced => min_chars(field, value, MIN_MATERIALS_CHARS),
            FieldName::PlanForTomorrow => min_chars(field, value, MIN_PLAN_CHARS),
            FieldName::Observations => Ok(()),
        }
    }

    /// Checks every field of the form and builds the submission when all pass.
    pub fn validate(&self, draft: &Draft) -> Result<ReportSubmission, Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .fields()
            .into_iter()
            .filter_map(|field| self.validate_field(field, draft.get(field)).err())
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }

        let day_evaluation = draft.day_evaluation.parse::<DayEvaluation>().map_err(|_| {
            vec![ValidationError::new(
                FieldName::DayEvaluation,
                INVALID_CHOICE_MESSAGE,
            )]
        })?;

        Ok(ReportSubmission {
            name: draft.name.clone(),
            day_evaluation,
            materials_produced: draft.materials_produced.clone(),
            plan_for_tomorrow: self
                .includes_plan
                .then(|| draft.plan_for_tomorrow.clone()),
            observations: Some(draft.observations.clone()).filter(|text| !text.is_empty()),
        })
    }
}

fn min_chars(field: FieldName, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::new(field, REQUIRED_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
