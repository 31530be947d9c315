//! HTTP mail relay notifier.
//!
//! Implements `NotificationDispatcher` by POSTing a rendered HTML review
//! request to the mail relay endpoint (`{"to", "subject", "body"}`). The
//! relay owns SMTP; this side owns presentation: template substitution and
//! capping long skill lists to a five-item preview.

use std::time::Duration;

use serde_json::json;

use skillmatrix_core::notify::NotificationDispatcher;
use skillmatrix_types::config::AppConfig;
use skillmatrix_types::error::NotifyError;

/// How many skills are listed by name before the "+N more" suffix.
const VISIBLE_SKILLS: usize = 5;

const DEFAULT_TEMPLATE: &str = "\
<p>Hi,</p>
<p><strong>{{requestee_name}}</strong> has requested expert-level review for the \
following skills:</p>
<ul>{{requested_skills}}</ul>
<p>Please review the pending requests in the \
<a href=\"{{skill_matrix_url}}\">skill matrix</a>.</p>";

/// Mail relay client used for review-request emails.
pub struct HttpNotificationDispatcher {
    client: reqwest::Client,
    send_mail_url: String,
    app_url: String,
    template: String,
}

impl HttpNotificationDispatcher {
    /// Build a dispatcher from configuration. An empty `send_mail_url`
    /// yields a dispatcher that reports `NotifyError::Disabled` on every
    /// send.
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            send_mail_url: config.send_mail_url.clone(),
            app_url: config.app_url.clone(),
            template: config
                .email_template
                .clone()
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        }
    }
}

/// Render the `<li>` list for the email, capped at [`VISIBLE_SKILLS`]
/// entries with a "+N more" suffix beyond that.
fn format_skill_list(skill_names: &[String]) -> String {
    let mut html = String::new();
    for name in skill_names.iter().take(VISIBLE_SKILLS) {
        html.push_str(&format!("<li>{name}</li>"));
    }
    if skill_names.len() > VISIBLE_SKILLS {
        let hidden = skill_names.len() - VISIBLE_SKILLS;
        html.push_str(&format!("<li><em>+{hidden} more</em></li>"));
    }
    html
}

/// Substitute the template placeholders.
fn render_body(template: &str, requestee_name: &str, skills_html: &str, app_url: &str) -> String {
    template
        .replace("{{requestee_name}}", requestee_name)
        .replace("{{requested_skills}}", skills_html)
        .replace("{{skill_matrix_url}}", app_url)
}

impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn send_pending_review_email(
        &self,
        to: &str,
        employee_name: &str,
        skill_names: &[String],
    ) -> Result<(), NotifyError> {
        if self.send_mail_url.is_empty() {
            return Err(NotifyError::Disabled);
        }

        let body = render_body(
            &self.template,
            employee_name,
            &format_skill_list(skill_names),
            &self.app_url,
        );
        let payload = json!({
            "to": to,
            "subject": format!("Skill Review Request from {employee_name}"),
            "body": body,
        });

        tracing::info!(to = %to, skills = skill_names.len(), "sending review request email");

        let response = self
            .client
            .post(&self.send_mail_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::RelayStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Skill {i}")).collect()
    }

    #[test]
    fn test_short_list_is_rendered_in_full() {
        let html = format_skill_list(&names(3));
        assert_eq!(html, "<li>Skill 1</li><li>Skill 2</li><li>Skill 3</li>");
    }

    #[test]
    fn test_long_list_is_capped_with_suffix() {
        let html = format_skill_list(&names(8));
        assert_eq!(html.matches("<li>").count(), 6);
        assert!(html.contains("<li><em>+3 more</em></li>"));
        assert!(!html.contains("Skill 6"));
    }

    #[test]
    fn test_exactly_five_has_no_suffix() {
        let html = format_skill_list(&names(5));
        assert!(html.contains("Skill 5"));
        assert!(!html.contains("more"));
    }

    #[test]
    fn test_render_body_substitutes_placeholders() {
        let body = render_body(DEFAULT_TEMPLATE, "Alice", "<li>Rust</li>", "https://skills.corp");
        assert!(body.contains("<strong>Alice</strong>"));
        assert!(body.contains("<ul><li>Rust</li></ul>"));
        assert!(body.contains("href=\"https://skills.corp\""));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn test_unconfigured_relay_reports_disabled() {
        let dispatcher = HttpNotificationDispatcher::new(&AppConfig::default());
        let err = dispatcher
            .send_pending_review_email("m@corp.com", "Alice", &names(1))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Disabled));
    }
}
