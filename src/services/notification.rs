//! Outbound notifications about new applications.
//!
//! Delivery is fire-and-forget: [`dispatch`] runs the send on a background
//! task, and a failed send is logged and dropped. The caller's response never
//! waits on or reflects the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::clients::TelegramClient;
use crate::db::{Application, Course};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> anyhow::Result<()>;
}

pub struct TelegramNotifier {
    client: Option<TelegramClient>,
}

impl TelegramNotifier {
    #[must_use]
    pub const fn new(client: Option<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        let Some(client) = &self.client else {
            warn!("Telegram: bot token/chat id not configured, message not sent");
            return Ok(());
        };
        client.send_message(text).await
    }
}

/// Sends `text` on a detached task. Never retried.
pub fn dispatch(notifier: Arc<dyn Notifier>, text: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&text).await {
            error!("Failed to deliver application notification: {e:#}");
        }
    });
}

/// Renders the admin-facing message for a newly recorded application.
///
/// User-supplied values are HTML-escaped since the message is sent in HTML mode.
#[must_use]
pub fn application_message(application: &Application, course: Option<&Course>) -> String {
    let esc = |s: &str| html_escape::encode_text(s).to_string();
    let or_dash = |s: Option<&String>| s.map_or_else(|| "-".to_string(), |v| esc(v.as_str()));

    let mut lines = vec![
        "<b>New application</b>".to_string(),
        format!("Name: {}", esc(&application.name)),
        format!("Phone: {}", esc(&application.phone)),
        format!("Telegram: {}", esc(&application.tg_username)),
        format!(
            "Course: {}",
            application
                .course_title
                .as_deref()
                .map_or_else(|| "Not specified".to_string(), esc)
        ),
    ];

    if let Some(course) = course {
        lines.push(format!("Duration: {}", or_dash(course.duration.as_ref())));
        lines.push(format!("Level: {}", or_dash(course.level.as_ref())));
        lines.push(format!("Language: {}", esc(&course.language)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(course_title: Option<&str>) -> Application {
        Application {
            id: 1,
            name: "Ali <Vali>".to_string(),
            phone: "+998901234567".to_string(),
            tg_username: "@ali_v".to_string(),
            course_id: None,
            course_title: course_title.map(String::from),
            status: "new".to_string(),
            created_at: "2025-03-01T12:00:00+00:00".to_string(),
        }
    }

    fn course() -> Course {
        Course {
            id: 3,
            name: "Japanese N5".to_string(),
            language: "Japanese".to_string(),
            level: Some("Beginner".to_string()),
            price: None,
            discount: None,
            duration: None,
            advantages: None,
            is_active: true,
            slug: "japanese-n5".to_string(),
            description: None,
            locale: "ru".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_message_without_course() {
        let text = application_message(&application(None), None);

        assert!(text.contains("Name: Ali &lt;Vali&gt;"));
        assert!(text.contains("Telegram: @ali_v"));
        assert!(text.ends_with("Course: Not specified"));
        assert!(!text.contains("Duration"));
    }

    #[test]
    fn test_message_with_course_details() {
        let text = application_message(&application(Some("Japanese N5")), Some(&course()));

        assert!(text.contains("Course: Japanese N5"));
        assert!(text.contains("Duration: -"));
        assert!(text.contains("Level: Beginner"));
        assert!(text.ends_with("Language: Japanese"));
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_skips_silently() {
        let notifier = TelegramNotifier::new(None);
        assert!(notifier.notify("hello").await.is_ok());
    }
}
