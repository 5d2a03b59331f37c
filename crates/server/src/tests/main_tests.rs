use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use report_form::FormSchema;
use serde_json::json;
use sheets::{GatewayError, SubmissionGateway};
use shared::domain::ReportSubmission;
use tokio::sync::{Mutex, Notify};
use tower::ServiceExt;

enum Answer {
    Status(u16),
    Broken,
}

struct FakeSheets {
    answer: Answer,
    calls: AtomicUsize,
    rows: Mutex<Vec<Vec<String>>>,
    entered: Notify,
    release: Option<Arc<Notify>>,
}

impl FakeSheets {
    fn new(answer: Answer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            rows: Mutex::new(Vec::new()),
            entered: Notify::new(),
            release: None,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionGateway for FakeSheets {
    async fn append_row(&self, report: &ReportSubmission) -> Result<AppendOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().await.push(report.row_values());
        self.entered.notify_one();
        if let Some(release) = &self.release {
            release.notified().await;
        }
        match self.answer {
            Answer::Status(200) => Ok(AppendOutcome::success(
                200,
                json!({ "updates": { "updatedData": { "values": [report.row_values()] } } }),
            )),
            Answer::Status(status) => Ok(AppendOutcome::error(status, json!({ "error": status }))),
            Answer::Broken => Err(GatewayError::MissingCredential("PRIVATE_KEY")),
        }
    }
}

fn test_app(schema: FormSchema, sheets: Arc<FakeSheets>) -> Router {
    build_router(Arc::new(AppState {
        api: ApiContext::new(schema, sheets),
    }))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

async fn open(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    let start = html.find("data-form-id=\"").expect("form id") + "data-form-id=\"".len();
    let end = start + html[start..].find('"').expect("closing quote");
    html[start..end].to_string()
}

fn post_form(form_id: &str, body: &str) -> Request<Body> {
    Request::post(format!("/forms/{form_id}"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

const BOB: &str = "name=Bob&dayEvaluation=Produtivo&materialsProduced=3+reports";

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(200))),
    );
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn landing_page_renders_empty_form() {
    let app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(200))),
    );
    let form_id = open(&app).await;

    let response = app
        .oneshot(
            Request::get(format!("/forms/{form_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"materialsProduced\""));
    assert!(html.contains(">Enviar</button>"));
}

#[tokio::test]
async fn unknown_form_renders_not_found() {
    let app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(200))),
    );
    let response = app
        .oneshot(
            Request::get("/forms/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_submit_shows_field_errors_and_skips_sheet() {
    let sheets = Arc::new(FakeSheets::new(Answer::Status(200)));
    let app = test_app(FormSchema::daily_report(), sheets.clone());
    let form_id = open(&app).await;

    let response = app
        .oneshot(post_form(&form_id, "name=B&dayEvaluation=&materialsProduced="))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("data-error-for=\"name\">Obrigatorio</p>"));
    assert!(html.contains("data-error-for=\"materialsProduced\">Obrigatorio</p>"));
    assert!(html.contains("value=\"B\""));
    assert_eq!(sheets.calls(), 0);
}

#[tokio::test]
async fn successful_submit_replaces_view_with_thank_you() {
    let sheets = Arc::new(FakeSheets::new(Answer::Status(200)));
    let app = test_app(FormSchema::daily_report(), sheets.clone());
    let form_id = open(&app).await;

    let response = app
        .clone()
        .oneshot(post_form(&form_id, BOB))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Obrigado por enviar seu formulário"));
    assert!(html.contains("Formulário enviado com sucesso"));
    assert_eq!(
        sheets.rows.lock().await.clone(),
        vec![vec!["Bob", "Produtivo", "3 reports", ""]]
    );

    let again = app
        .oneshot(post_form(&form_id, BOB))
        .await
        .expect("response");
    assert!(body_text(again).await.contains("Obrigado por enviar"));
    assert_eq!(sheets.calls(), 1);
}

#[tokio::test]
async fn successful_submit_with_reset_policy_clears_fields() {
    let sheets = Arc::new(FakeSheets::new(Answer::Status(200)));
    let app = test_app(FormSchema::daily_report_with_plan(), sheets.clone());
    let form_id = open(&app).await;

    let response = app
        .oneshot(post_form(
            &form_id,
            "name=Bob&dayEvaluation=Produtivo&materialsProduced=3+reports&planForTomorrow=ship+it&observations=ok",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Formulário enviado com sucesso"));
    assert!(html.contains("value=\"\""));
    assert!(html.contains("<option value=\"Neutro\" selected>"));
    assert_eq!(
        sheets.rows.lock().await.clone(),
        vec![vec!["Bob", "Produtivo", "3 reports", "ship it", "ok"]]
    );
}

#[tokio::test]
async fn failed_submit_keeps_values_and_shows_destructive_toast() {
    let sheets = Arc::new(FakeSheets::new(Answer::Broken));
    let app = test_app(FormSchema::daily_report(), sheets.clone());
    let form_id = open(&app).await;

    let response = app
        .oneshot(post_form(&form_id, BOB))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("toast-destructive"));
    assert!(html.contains("Tente novamente mais tarde"));
    assert!(html.contains("value=\"Bob\""));
    assert!(html.contains("3 reports</textarea>"));
    assert!(!html.contains("PRIVATE_KEY"));
}

#[tokio::test]
async fn concurrent_submit_on_same_form_is_rejected() {
    let release = Arc::new(Notify::new());
    let mut fake = FakeSheets::new(Answer::Status(200));
    fake.release = Some(release.clone());
    let sheets = Arc::new(fake);
    let app = test_app(FormSchema::daily_report_with_plan(), sheets.clone());
    let form_id = open(&app).await;
    let body = "name=Bob&dayEvaluation=Neutro&materialsProduced=x&planForTomorrow=more";

    let first = tokio::spawn({
        let app = app.clone();
        let request = post_form(&form_id, body);
        async move { app.oneshot(request).await.expect("response").status() }
    });
    sheets.entered.notified().await;

    let second = app
        .oneshot(post_form(&form_id, body))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(body_text(second).await.contains("disabled>Enviando...</button>"));

    release.notify_one();
    assert_eq!(first.await.expect("join"), StatusCode::OK);
    assert_eq!(sheets.calls(), 1);
}

#[tokio::test]
async fn field_validation_endpoint_returns_message() {
    let app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(200))),
    );
    let form_id = open(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/forms/{form_id}/fields/dayEvaluation"))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "value": "Excelente" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let dto: FieldValidationResponse =
        serde_json::from_str(&body_text(response).await).expect("json");
    assert!(!dto.valid);
    assert_eq!(dto.message.as_deref(), Some("Opção inválida"));

    let unknown = app
        .oneshot(
            Request::post(format!("/forms/{form_id}/fields/email"))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "value": "x" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn json_report_endpoint_maps_outcomes_to_status_codes() {
    let ok_app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(200))),
    );
    let request = || {
        Request::post("/api/reports")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "name": "Bob",
                    "dayEvaluation": "Produtivo",
                    "materialsProduced": "3 reports",
                })
                .to_string(),
            ))
            .expect("request")
    };

    let response = ok_app.oneshot(request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: AppendOutcome = serde_json::from_str(&body_text(response).await).expect("json");
    assert!(outcome.is_success());

    let rejected_app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Status(403))),
    );
    let response = rejected_app.oneshot(request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let outcome: AppendOutcome = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(outcome.status_code, 403);

    let broken_app = test_app(
        FormSchema::daily_report(),
        Arc::new(FakeSheets::new(Answer::Broken)),
    );
    let response = broken_app.oneshot(request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let err: ApiError = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(err.code, ErrorCode::Upstream);
}

#[tokio::test]
async fn json_report_endpoint_rejects_invalid_drafts() {
    let sheets = Arc::new(FakeSheets::new(Answer::Status(200)));
    let app = test_app(FormSchema::daily_report(), sheets.clone());
    let response = app
        .oneshot(
            Request::post("/api/reports")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "name": "B", "dayEvaluation": "Neutro", "materialsProduced": "x" })
                        .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: ApiError = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(err.fields.len(), 1);
    assert_eq!(sheets.calls(), 0);
}
