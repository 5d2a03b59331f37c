use std::{collections::BTreeMap, error::Error as _, sync::Arc};

use sheets::{GatewayError, SubmissionGateway};
use shared::{
    domain::{FieldName, FormId},
    error::ValidationError,
    protocol::AppendOutcome,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    draft::Draft,
    notification::Notification,
    schema::{FormSchema, SuccessPolicy},
};

/// `Idle → Submitting → {Succeeded, Failed}`. `Failed` stays editable and
/// can submit again; `Succeeded` is only held under `ReplaceView`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub enum SubmissionFailure {
    /// The sheet answered with a non-200 status.
    Rejected(AppendOutcome),
    /// The call never produced an answer.
    Gateway(GatewayError),
    /// The append task panicked before settling the form.
    Interrupted,
}

impl SubmissionFailure {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SubmissionFailure::Rejected(outcome) => Some(outcome.status_code),
            SubmissionFailure::Gateway(_) | SubmissionFailure::Interrupted => None,
        }
    }

    pub fn cause_kind(&self) -> &'static str {
        match self {
            SubmissionFailure::Rejected(_) => "rejected",
            SubmissionFailure::Gateway(error) => error.kind(),
            SubmissionFailure::Interrupted => "interrupted",
        }
    }
}

#[derive(Debug)]
pub enum SubmitResult {
    Blocked(Vec<ValidationError>),
    InFlight,
    Closed,
    Succeeded(AppendOutcome),
    Failed(SubmissionFailure),
}

#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub phase: FormPhase,
    pub draft: Draft,
    pub errors: BTreeMap<FieldName, String>,
}

impl FormSnapshot {
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn is_closed(&self) -> bool {
        self.phase == FormPhase::Succeeded
    }
}

struct FormState {
    phase: FormPhase,
    draft: Draft,
    errors: BTreeMap<FieldName, String>,
    notifications: Vec<Notification>,
}

/// One form instance. At most one gateway call is outstanding at a time.
pub struct FormController {
    id: FormId,
    schema: FormSchema,
    gateway: Arc<dyn SubmissionGateway>,
    state: Arc<Mutex<FormState>>,
}

impl FormController {
    pub fn new(id: FormId, schema: FormSchema, gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            id,
            schema,
            gateway,
            state: Arc::new(Mutex::new(FormState {
                phase: FormPhase::Idle,
                draft: Draft::default(),
                errors: BTreeMap::new(),
                notifications: Vec::new(),
            })),
        }
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        FormSnapshot {
            phase: state.phase,
            draft: state.draft.clone(),
            errors: state.errors.clone(),
        }
    }

    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().await.notifications)
    }

    pub async fn set_field(&self, field: FieldName, value: impl Into<String>) {
        self.state.lock().await.draft.set(field, value);
    }

    pub async fn replace_draft(&self, draft: Draft) {
        self.state.lock().await.draft = draft;
    }

    /// Stores the value and validates the field, as on focus loss.
    pub async fn blur(&self, field: FieldName, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        let result = self.schema.validate_field(field, &value);

        let mut state = self.state.lock().await;
        if self.schema.includes(field) {
            state.draft.set(field, value);
        }
        match &result {
            Ok(()) => {
                state.errors.remove(&field);
            }
            Err(err) => {
                state.errors.insert(field, err.message.clone());
            }
        }
        result
    }

    pub async fn submit(&self) -> SubmitResult {
        let report = {
            let mut state = self.state.lock().await;
            match state.phase {
                FormPhase::Submitting => {
                    debug!(form_id = %self.id, "submission already in flight");
                    return SubmitResult::InFlight;
                }
                FormPhase::Succeeded => return SubmitResult::Closed,
                FormPhase::Idle | FormPhase::Failed => {}
            }

            match self.schema.validate(&state.draft) {
                Ok(report) => {
                    state.errors.clear();
                    state.phase = FormPhase::Submitting;
                    report
                }
                Err(errors) => {
                    state.errors = errors
                        .iter()
                        .map(|err| (err.field, err.message.clone()))
                        .collect();
                    info!(
                        form_id = %self.id,
                        invalid_fields = errors.len(),
                        "submission blocked by validation"
                    );
                    return SubmitResult::Blocked(errors);
                }
            }
        };

        // Settles on its own task, even if the caller is dropped.
        let completion = tokio::spawn({
            let gateway = self.gateway.clone();
            let state = self.state.clone();
            let schema = self.schema.clone();
            let id = self.id;
            async move {
                let result = gateway.append_row(&report).await;
                settle(id, &schema, &state, result).await
            }
        });

        match completion.await {
            Ok(result) => result,
            Err(err) => {
                let mut state = self.state.lock().await;
                state.phase = FormPhase::Failed;
                state.notifications.push(Notification::submission_failed());
                error!(form_id = %self.id, error = %err, "submission task did not finish");
                SubmitResult::Failed(SubmissionFailure::Interrupted)
            }
        }
    }
}

async fn settle(
    id: FormId,
    schema: &FormSchema,
    state: &Mutex<FormState>,
    result: Result<AppendOutcome, GatewayError>,
) -> SubmitResult {
    let mut state = state.lock().await;
    match result {
        Ok(outcome) if outcome.is_success() => {
            state.notifications.push(Notification::submitted());
            match schema.success_policy {
                SuccessPolicy::ResetDraft => {
                    state.draft = Draft::cleared();
                    state.phase = FormPhase::Idle;
                }
                SuccessPolicy::ReplaceView => state.phase = FormPhase::Succeeded,
            }
            info!(
                form_id = %id,
                status_code = outcome.status_code,
                policy = ?schema.success_policy,
                "report submitted"
            );
            SubmitResult::Succeeded(outcome)
        }
        Ok(outcome) => {
            state.phase = FormPhase::Failed;
            state.notifications.push(Notification::submission_failed());
            warn!(
                form_id = %id,
                status_code = outcome.status_code,
                data = %outcome.data,
                "sheet rejected report"
            );
            SubmitResult::Failed(SubmissionFailure::Rejected(outcome))
        }
        Err(err) => {
            state.phase = FormPhase::Failed;
            state.notifications.push(Notification::submission_failed());
            error!(
                form_id = %id,
                cause = err.kind(),
                error = %err,
                source = ?err.source(),
                "report submission failed"
            );
            SubmitResult::Failed(SubmissionFailure::Gateway(err))
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
