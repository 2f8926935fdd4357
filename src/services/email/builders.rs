// Email Builders - Builders for different types of emails
// Each builder knows how to construct its specific email type

use super::types::{
    EmailBuilder, EmailError, EmailMessage, MagicLinkEmailData, WelcomeEmailData,
};
use crate::app_config::EmailConfig;
use handlebars::Handlebars;
use tracing::instrument;

/// Builder for magic-link sign-in emails
pub struct MagicLinkEmailBuilder<'a> {
    to_email: &'a str,
    signin_token: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> MagicLinkEmailBuilder<'a> {
    pub fn new(
        to_email: &'a str,
        signin_token: &'a str,
        config: &'a EmailConfig,
        templates: &'a Handlebars<'a>,
    ) -> Self {
        Self {
            to_email,
            signin_token,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for MagicLinkEmailBuilder<'a> {
    #[instrument(skip(self))]
    fn build(&self) -> Result<EmailMessage, EmailError> {
        // Construct sign-in URL
        let magic_link_url = format!(
            "{}/auth/verify?token={}",
            self.config.frontend_url, self.signin_token
        );

        let data = MagicLinkEmailData {
            magic_link_url: magic_link_url.clone(),
            app_name: self.config.from_name.clone(),
            app_url: self.config.frontend_url.clone(),
            support_email: self.config.support_email.clone(),
            expiry_minutes: (self.config.magic_link_ttl / 60) as u32,
        };

        let html = self
            .templates
            .render("magic_link", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        // Plain text version
        let text = format!(
            "Sign in to {}\n\n\
            Open this link to sign in (valid for {} minutes, single use):\n\
            {}\n\n\
            If you didn't request this email, you can safely ignore it.\n\n\
            The {} Team",
            self.config.from_name, data.expiry_minutes, magic_link_url, self.config.from_name
        );

        Ok(EmailMessage::new(
            format!("{} <{}>", self.config.from_name, self.config.from_email),
            vec![self.to_email.to_string()],
            format!("Sign in to {}", self.config.from_name),
            html,
        )
        .with_text(text))
    }
}

/// Builder for the first-sign-in welcome email
pub struct WelcomeEmailBuilder<'a> {
    to_email: &'a str,
    config: &'a EmailConfig,
    templates: &'a Handlebars<'a>,
}

impl<'a> WelcomeEmailBuilder<'a> {
    pub fn new(to_email: &'a str, config: &'a EmailConfig, templates: &'a Handlebars<'a>) -> Self {
        Self {
            to_email,
            config,
            templates,
        }
    }
}

impl<'a> EmailBuilder for WelcomeEmailBuilder<'a> {
    #[instrument(skip(self))]
    fn build(&self) -> Result<EmailMessage, EmailError> {
        let data = WelcomeEmailData {
            app_name: self.config.from_name.clone(),
            app_url: self.config.frontend_url.clone(),
            support_email: self.config.support_email.clone(),
        };

        let html = self
            .templates
            .render("welcome", &data)
            .map_err(|e| EmailError::TemplateError(e.to_string()))?;

        let text = format!(
            "Welcome to {}!\n\n\
            Your account is ready, and everything you logged before signing in \
            has been carried over.\n\n\
            Open the app: {}\n\n\
            The {} Team",
            self.config.from_name, self.config.frontend_url, self.config.from_name
        );

        Ok(EmailMessage::new(
            format!("{} <{}>", self.config.from_name, self.config.from_email),
            vec![self.to_email.to_string()],
            format!("Welcome to {}", self.config.from_name),
            html,
        )
        .with_text(text))
    }
}
