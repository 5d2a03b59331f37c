use std::{collections::HashMap, fs};

use report_form::{FormSchema, FormVariant, SuccessPolicy};
use sheets::SheetsConfig;
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    pub form_variant: FormVariant,
    pub success_policy: Option<SuccessPolicy>,
    pub sheets: SheetsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            form_variant: FormVariant::Daily,
            success_policy: None,
            sheets: SheetsConfig::default(),
        }
    }
}

impl Settings {
    /// The variant's preset, with the success policy overridden when set.
    pub fn form_schema(&self) -> FormSchema {
        let schema = FormSchema::for_variant(self.form_variant);
        match self.success_policy {
            Some(policy) => schema.with_success_policy(policy),
            None => schema,
        }
    }
}

/// Defaults, then `server.toml`, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_file_config(&mut settings, &file_cfg),
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_file_config(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    let get = |key: &str| file_cfg.get(key).cloned();

    if let Some(v) = get("bind_addr") {
        settings.server_bind = v;
    }
    if let Some(v) = get("form_variant") {
        set_variant(settings, &v);
    }
    if let Some(v) = get("success_policy") {
        set_policy(settings, &v);
    }
    if let Some(v) = get("token_uri") {
        settings.sheets.token_uri = v;
    }
    if let Some(v) = get("sheets_api_base") {
        settings.sheets.api_base_url = Some(v);
    }

    let sheets = &mut settings.sheets;
    for (key, slot) in [
        ("account_type", &mut sheets.account_type),
        ("project_id", &mut sheets.project_id),
        ("private_key_id", &mut sheets.private_key_id),
        ("private_key", &mut sheets.private_key),
        ("client_email", &mut sheets.client_email),
        ("client_id", &mut sheets.client_id),
        ("universe_domain", &mut sheets.universe_domain),
        ("spreadsheet_id", &mut sheets.spreadsheet_id),
    ] {
        if let Some(v) = get(key) {
            *slot = Some(v);
        }
    }
}

/// Bare names first, `APP__` names win.
pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |bare: &str, prefixed: &str| lookup(prefixed).or_else(|| lookup(bare));

    if let Some(v) = var("SERVER_BIND", "APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = var("FORM_VARIANT", "APP__FORM_VARIANT") {
        set_variant(settings, &v);
    }
    if let Some(v) = var("SUCCESS_POLICY", "APP__SUCCESS_POLICY") {
        set_policy(settings, &v);
    }
    if let Some(v) = var("TOKEN_URI", "APP__TOKEN_URI") {
        settings.sheets.token_uri = v;
    }
    if let Some(v) = var("SHEETS_API_BASE", "APP__SHEETS_API_BASE") {
        settings.sheets.api_base_url = Some(v);
    }

    let sheets = &mut settings.sheets;
    for (bare, prefixed, slot) in [
        ("TYPE", "APP__TYPE", &mut sheets.account_type),
        ("PROJECT_ID", "APP__PROJECT_ID", &mut sheets.project_id),
        ("PRIVATE_KEY_ID", "APP__PRIVATE_KEY_ID", &mut sheets.private_key_id),
        ("PRIVATE_KEY", "APP__PRIVATE_KEY", &mut sheets.private_key),
        ("CLIENT_EMAIL", "APP__CLIENT_EMAIL", &mut sheets.client_email),
        ("CLIENT_ID", "APP__CLIENT_ID", &mut sheets.client_id),
        ("UNIVERSE_DOMAIN", "APP__UNIVERSE_DOMAIN", &mut sheets.universe_domain),
        ("SPREADSHEET_ID", "APP__SPREADSHEET_ID", &mut sheets.spreadsheet_id),
    ] {
        if let Some(v) = var(bare, prefixed) {
            *slot = Some(v);
        }
    }
}

fn set_variant(settings: &mut Settings, raw: &str) {
    match parse_variant(raw) {
        Some(variant) => settings.form_variant = variant,
        None => warn!(value = raw, "unknown form variant; keeping {:?}", settings.form_variant),
    }
}

fn set_policy(settings: &mut Settings, raw: &str) {
    match parse_policy(raw) {
        Some(policy) => settings.success_policy = Some(policy),
        None => warn!(value = raw, "unknown success policy; keeping variant default"),
    }
}

pub(crate) fn parse_variant(raw: &str) -> Option<FormVariant> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "daily" => Some(FormVariant::Daily),
        "daily_with_plan" | "with_plan" => Some(FormVariant::DailyWithPlan),
        _ => None,
    }
}

pub(crate) fn parse_policy(raw: &str) -> Option<SuccessPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "reset_draft" | "reset" => Some(SuccessPolicy::ResetDraft),
        "replace_view" | "thank_you" => Some(SuccessPolicy::ReplaceView),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
