use report_form::{FormSchema, FormSnapshot, Notification, NotificationVariant};
use shared::domain::{DayEvaluation, FieldName, FormId};

const PAGE_TEMPLATE: &str = include_str!("../static/page.html");
const PAGE_TITLE: &str = "Relatório diário";

fn label(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Nome",
        FieldName::DayEvaluation => "Como foi seu dia hoje?",
        FieldName::MaterialsProduced => "Escreva aqui quais materiais você produziu",
        FieldName::PlanForTomorrow => "O que você planeja fazer amanhã?",
        FieldName::Observations => "Observações",
    }
}

fn placeholder(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Bob Jamaica",
        _ => "...",
    }
}

pub fn form_page(
    id: FormId,
    schema: &FormSchema,
    snapshot: &FormSnapshot,
    notifications: &[Notification],
) -> String {
    let mut content = format!(
        "<form method=\"post\" action=\"/forms/{id}\" data-form-id=\"{id}\" class=\"report-form\">\n"
    );
    for field in schema.fields() {
        let value = snapshot.draft.get(field);
        let error = snapshot.errors.get(&field).map(String::as_str).unwrap_or("");
        content.push_str(&field_html(field, value, error));
    }

    let (disabled, caption) = if snapshot.is_submitting() {
        (" disabled", "Enviando...")
    } else {
        ("", "Enviar")
    };
    content.push_str(&format!(
        "<button type=\"submit\"{disabled}>{caption}</button>\n</form>"
    ));

    page(&content, notifications)
}

pub fn thank_you_page(notifications: &[Notification]) -> String {
    page(
        "<div class=\"thank-you\">\n\
         <h1>Obrigado por enviar seu formulário</h1>\n\
         <p>Seu formulário foi enviado com sucesso</p>\n\
         </div>",
        notifications,
    )
}

pub fn not_found_page() -> String {
    page(
        "<div class=\"thank-you\">\n\
         <h1>Formulário não encontrado</h1>\n\
         <p><a href=\"/\">Abrir um novo formulário</a></p>\n\
         </div>",
        &[],
    )
}

fn page(content: &str, notifications: &[Notification]) -> String {
    let toasts: String = notifications.iter().map(toast_html).collect();
    PAGE_TEMPLATE
        .replace("{{title}}", PAGE_TITLE)
        .replace("{{toasts}}", &toasts)
        .replace("{{content}}", content)
}

fn field_html(field: FieldName, value: &str, error: &str) -> String {
    let name = field.as_str();
    let optional = if field == FieldName::Observations {
        " <span class=\"optional\">(opcional)</span>"
    } else {
        ""
    };
    let control = match field {
        FieldName::Name => format!(
            "<input id=\"{name}\" name=\"{name}\" data-field=\"{name}\" placeholder=\"{placeholder}\" value=\"{value}\">",
            placeholder = placeholder(field),
            value = html_escape(value),
        ),
        FieldName::DayEvaluation => select_html(value),
        _ => format!(
            "<textarea id=\"{name}\" name=\"{name}\" data-field=\"{name}\" placeholder=\"{placeholder}\">{value}</textarea>",
            placeholder = placeholder(field),
            value = html_escape(value),
        ),
    };

    format!(
        "<div class=\"field\">\n\
         <label for=\"{name}\">{label}{optional}</label>\n\
         {control}\n\
         <p class=\"field-error\" data-error-for=\"{name}\">{error}</p>\n\
         </div>\n",
        label = label(field),
        error = html_escape(error),
    )
}

fn select_html(selected: &str) -> String {
    let name = FieldName::DayEvaluation.as_str();
    let mut html = format!("<select id=\"{name}\" name=\"{name}\" data-field=\"{name}\">\n");
    let placeholder_selected = if selected.is_empty() { " selected" } else { "" };
    html.push_str(&format!(
        "<option value=\"\"{placeholder_selected}>Selecione</option>\n"
    ));
    for evaluation in DayEvaluation::ALL {
        let is_selected = if evaluation.as_str() == selected {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{value}\"{is_selected}>{label}</option>\n",
            value = evaluation.as_str(),
            label = html_escape(evaluation.label()),
        ));
    }
    html.push_str("</select>");
    html
}

fn toast_html(notification: &Notification) -> String {
    let class = match notification.variant {
        NotificationVariant::Default => "toast",
        NotificationVariant::Destructive => "toast toast-destructive",
    };
    let description = notification
        .description
        .as_deref()
        .map(|text| format!("<p>{}</p>", html_escape(text)))
        .unwrap_or_default();
    format!(
        "<div class=\"{class}\" role=\"status\" data-duration-ms=\"{duration}\"><strong>{title}</strong>{description}</div>\n",
        duration = notification.duration_ms(),
        title = html_escape(&notification.title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
