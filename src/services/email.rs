//! Email service for maintenance alert notifications

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::EquipmentStatus,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn alert_recipients(&self) -> &[String] {
        &self.config.alert_recipients
    }

    /// Notify every alert recipient about equipment that just became overdue
    pub async fn send_overdue_alert(&self, equipment: &[EquipmentStatus]) -> AppResult<()> {
        if equipment.is_empty() {
            return Ok(());
        }
        if self.config.alert_recipients.is_empty() {
            tracing::info!(
                "No alert recipients configured, skipping overdue notification for {} equipment",
                equipment.len()
            );
            return Ok(());
        }

        let subject = if equipment.len() == 1 {
            "Mantenimiento vencido: 1 equipo".to_string()
        } else {
            format!("Mantenimiento vencido: {} equipos", equipment.len())
        };
        let body = overdue_alert_body(equipment);

        for to in &self.config.alert_recipients {
            self.send_email(to, &subject, &body).await?;
        }
        Ok(())
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("IPS Progresando");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SMTP transport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}

fn overdue_alert_body(equipment: &[EquipmentStatus]) -> String {
    let mut body = String::from("Los siguientes equipos tienen mantenimientos vencidos:\n\n");
    for e in equipment {
        let name = e.name.as_deref().unwrap_or("(sin nombre)");
        body.push_str(&format!("- {} (#{})\n", name, e.equipment_id));
        for cause in &e.causes {
            let label = cause
                .label
                .clone()
                .unwrap_or_else(|| format!("Tipo {}", cause.maintenance_type_id));
            match cause.next_due_date {
                Some(date) => body.push_str(&format!(
                    "    {}: vencido desde {} ({} dias)\n",
                    label, date, cause.days_overdue
                )),
                None => body.push_str(&format!("    {}\n", label)),
            }
        }
    }
    body
}
