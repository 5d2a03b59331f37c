use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A toast shown once and dismissed after `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: NotificationVariant,
    pub duration: Duration,
}

impl Notification {
    pub fn submitted() -> Self {
        Self {
            title: "Formulário enviado com sucesso".to_string(),
            description: None,
            variant: NotificationVariant::Default,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn submission_failed() -> Self {
        Self {
            title: "Erro ao enviar formulário".to_string(),
            description: Some("Tente novamente mais tarde".to_string()),
            variant: NotificationVariant::Destructive,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}
