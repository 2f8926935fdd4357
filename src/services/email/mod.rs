// Email Service Module
// Main orchestration module that coordinates builders and sender

pub mod builders;
pub mod sender;
pub mod types;

use self::types::EmailBuilder;
use crate::app_config::EmailConfig;
use anyhow::Result;
use builders::{MagicLinkEmailBuilder, WelcomeEmailBuilder};
use handlebars::Handlebars;
use sender::EmailSender;
use std::sync::Arc;
use tracing::{info, instrument};

/// Email service for sending various types of emails
#[derive(Clone)]
pub struct EmailService {
    sender: EmailSender,
    config: EmailConfig,
    templates: Arc<Handlebars<'static>>,
}

impl EmailService {
    /// Create a new email service instance
    pub fn new(config: EmailConfig) -> Result<Self> {
        let mut templates = Handlebars::new();

        Self::register_templates(&mut templates)?;

        let sender =
            EmailSender::new_resend(config.resend_api_key.clone(), config.resend_api_url.clone())
                .with_max_retries(3)
                .with_retry_delay(std::time::Duration::from_secs(1));

        Ok(Self {
            sender,
            config,
            templates: Arc::new(templates),
        })
    }

    /// Register all email templates
    fn register_templates(templates: &mut Handlebars) -> Result<(), types::EmailError> {
        let magic_link_template = include_str!("../../../templates/email/magic_link.html");
        templates
            .register_template_string("magic_link", magic_link_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        let welcome_template = include_str!("../../../templates/email/welcome.html");
        templates
            .register_template_string("welcome", welcome_template)
            .map_err(|e| types::EmailError::TemplateError(e.to_string()))?;

        Ok(())
    }

    /// Send a magic-link sign-in email
    #[instrument(skip(self, signin_token))]
    pub async fn send_magic_link_email(
        &self,
        to_email: &str,
        signin_token: &str,
    ) -> Result<(), types::EmailError> {
        info!("Sending magic-link email to {}", to_email);

        let builder =
            MagicLinkEmailBuilder::new(to_email, signin_token, &self.config, &self.templates);

        let message = builder.build()?;
        self.sender.send_with_retry(message).await
    }

    /// Send the first-sign-in welcome email
    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str) -> Result<(), types::EmailError> {
        info!("Sending welcome email to {}", to_email);

        let builder = WelcomeEmailBuilder::new(to_email, &self.config, &self.templates);

        let message = builder.build()?;
        // Welcome mail is best-effort; a single attempt is enough
        self.sender.send(message).await
    }

    /// Perform a health check on the email service
    pub async fn health_check(&self) -> Result<(), EmailError> {
        self.sender.health_check().await
    }
}

// Re-export commonly used types for convenience
pub use types::{EmailError, EmailMessage};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::EmailProvider;

    fn create_test_config() -> EmailConfig {
        EmailConfig {
            provider: EmailProvider::Resend,
            resend_api_key: "test_key".to_string(),
            resend_api_url: "https://api.resend.com/emails".to_string(),
            from_email: "noreply@test.com".to_string(),
            from_name: "Test App".to_string(),
            support_email: "support@test.com".to_string(),
            frontend_url: "https://app.test.com".to_string(),
            magic_link_ttl: 900,
            resend_limit: 5,
            resend_window: 86400,
            min_resend_cooldown: 60,
        }
    }

    #[test]
    fn test_email_service_creation() {
        let config = create_test_config();
        let service = EmailService::new(config);
        assert!(service.is_ok());
    }
}
