use std::{
    collections::HashMap,
    error::Error as _,
    sync::Arc,
    time::{Duration, Instant},
};

use report_form::{Draft, FormController, FormSchema};
use sheets::SubmissionGateway;
use shared::{
    domain::{FieldName, FormId},
    error::{ApiError, ErrorCode},
    protocol::{AppendOutcome, FieldValidationResponse},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const FORM_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
const MAX_OPEN_FORMS: usize = 1024;

#[derive(Clone)]
pub struct ApiContext {
    pub schema: FormSchema,
    pub gateway: Arc<dyn SubmissionGateway>,
    pub forms: Arc<FormRegistry>,
}

impl ApiContext {
    pub fn new(schema: FormSchema, gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            schema,
            gateway,
            forms: Arc::new(FormRegistry::default()),
        }
    }
}

struct FormEntry {
    controller: Arc<FormController>,
    last_seen: Instant,
}

/// Live form instances, one per page load. Bounded by `capacity`; the least
/// recently seen form goes first.
pub struct FormRegistry {
    forms: Mutex<HashMap<FormId, FormEntry>>,
    capacity: usize,
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_OPEN_FORMS)
    }
}

impl FormRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forms: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, controller: Arc<FormController>) {
        let mut forms = self.forms.lock().await;
        let before = forms.len();
        forms.retain(|_, entry| entry.last_seen.elapsed() < FORM_IDLE_TTL);
        if forms.len() < before {
            debug!(pruned = before - forms.len(), "dropped idle forms");
        }
        while forms.len() >= self.capacity {
            let Some(oldest) = forms
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            forms.remove(&oldest);
            debug!(form_id = %oldest, capacity = self.capacity, "evicted least recently seen form");
        }
        forms.insert(
            controller.id(),
            FormEntry {
                controller,
                last_seen: Instant::now(),
            },
        );
    }

    pub async fn get(&self, id: FormId) -> Option<Arc<FormController>> {
        let mut forms = self.forms.lock().await;
        let entry = forms.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.controller.clone())
    }

    pub async fn open_count(&self) -> usize {
        self.forms.lock().await.len()
    }
}

pub async fn open_form(ctx: &ApiContext) -> Arc<FormController> {
    let controller = Arc::new(FormController::new(
        FormId::new(),
        ctx.schema.clone(),
        ctx.gateway.clone(),
    ));
    ctx.forms.insert(controller.clone()).await;
    let open_forms = ctx.forms.open_count().await;
    info!(
        form_id = %controller.id(),
        open_forms,
        "opened form"
    );
    controller
}

pub async fn find_form(ctx: &ApiContext, raw_id: &str) -> Result<Arc<FormController>, ApiError> {
    let id = raw_id
        .parse::<FormId>()
        .map_err(|_| ApiError::new(ErrorCode::NotFound, "form not found"))?;
    ctx.forms
        .get(id)
        .await
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "form not found"))
}

pub async fn validate_field(
    ctx: &ApiContext,
    raw_id: &str,
    raw_field: &str,
    value: String,
) -> Result<FieldValidationResponse, ApiError> {
    let form = find_form(ctx, raw_id).await?;
    let field = raw_field
        .parse::<FieldName>()
        .map_err(|e| ApiError::new(ErrorCode::Validation, e.to_string()))?;

    let result = form.blur(field, value).await;
    Ok(FieldValidationResponse {
        field,
        valid: result.is_ok(),
        message: result.err().map(|err| err.message),
    })
}

/// Validates a draft and appends it in one request, without a form instance.
pub async fn submit_report(ctx: &ApiContext, draft: &Draft) -> Result<AppendOutcome, ApiError> {
    let report = ctx.schema.validate(draft).map_err(ApiError::validation)?;

    ctx.gateway.append_row(&report).await.map_err(|err| {
        error!(
            cause = err.kind(),
            error = %err,
            source = ?err.source(),
            "report submission failed"
        );
        ApiError::new(ErrorCode::Upstream, "failed to append report to sheet")
    })
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
