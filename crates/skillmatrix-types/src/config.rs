use serde::{Deserialize, Serialize};

/// Service configuration, read from `{data_dir}/config.toml`.
///
/// Every field has a default so a missing or partial file still yields a
/// working (if silent) service: an empty `send_mail_url` disables review
/// notifications entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP mail relay endpoint review-request emails are POSTed to.
    #[serde(default)]
    pub send_mail_url: String,
    /// Frontend URL substituted into the email template.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Optional HTML template override. Placeholders: `{{requestee_name}}`,
    /// `{{requested_skills}}`, `{{skill_matrix_url}}`.
    #[serde(default)]
    pub email_template: Option<String>,
}

fn default_app_url() -> String {
    "#".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            send_mail_url: String::new(),
            app_url: default_app_url(),
            email_template: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.send_mail_url.is_empty());
        assert_eq!(config.app_url, "#");
        assert!(config.email_template.is_none());
    }
}
