use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub Uuid);

impl FormId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FormId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// How the reporter rates their day. Serialized with the literals written to
/// the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayEvaluation {
    #[serde(rename = "Produtivo")]
    Productive,
    #[serde(rename = "Neutro")]
    Neutral,
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day evaluation '{0}'")]
pub struct UnknownDayEvaluation(pub String);

impl DayEvaluation {
    pub const ALL: [DayEvaluation; 3] = [
        DayEvaluation::Productive,
        DayEvaluation::Neutral,
        DayEvaluation::Unproductive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayEvaluation::Productive => "Produtivo",
            DayEvaluation::Neutral => "Neutro",
            DayEvaluation::Unproductive => "Improdutivo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayEvaluation::Productive => "Produtivo",
            DayEvaluation::Neutral => "Neutro",
            DayEvaluation::Unproductive => "Não produzi como gostaria",
        }
    }
}

impl fmt::Display for DayEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayEvaluation {
    type Err = UnknownDayEvaluation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayEvaluation::ALL
            .into_iter()
            .find(|evaluation| evaluation.as_str() == s)
            .ok_or_else(|| UnknownDayEvaluation(s.to_string()))
    }
}

/// Report fields in sheet column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    DayEvaluation,
    MaterialsProduced,
    PlanForTomorrow,
    Observations,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Name,
        FieldName::DayEvaluation,
        FieldName::MaterialsProduced,
        FieldName::PlanForTomorrow,
        FieldName::Observations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::DayEvaluation => "dayEvaluation",
            FieldName::MaterialsProduced => "materialsProduced",
            FieldName::PlanForTomorrow => "planForTomorrow",
            FieldName::Observations => "observations",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A validated daily report, ready to be appended as one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub name: String,
    pub day_evaluation: DayEvaluation,
    pub materials_produced: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_for_tomorrow: Option<String>,
    #[serde(default)]
    pub observations: Option<String>,
}

impl ReportSubmission {
    /// Cell values in column order. The plan column only exists for reports
    /// that carry a plan; a missing observation becomes an empty cell.
    pub fn row_values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(FieldName::ALL.len());
        values.push(self.name.clone());
        values.push(self.day_evaluation.as_str().to_string());
        values.push(self.materials_produced.clone());
        if let Some(plan) = &self.plan_for_tomorrow {
            values.push(plan.clone());
        }
        values.push(self.observations.clone().unwrap_or_default());
        values
    }
}
