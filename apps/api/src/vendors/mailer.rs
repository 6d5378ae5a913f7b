use std::path::PathBuf;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Could not read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A report email: plain-text body plus PDF files read from disk.
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, report: &OutgoingReport) -> Result<(), MailError>;
}

/// SMTP mailer. Sends from the authenticated account to one fixed recipient.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, user: &str, pass: &str, to: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            transport,
            from: user.parse()?,
            to: to.parse()?,
        })
    }

    /// Assembles the report email, reading every attachment from disk.
    async fn build_message(&self, report: &OutgoingReport) -> Result<Message, MailError> {
        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(report.body.clone()));

        for path in &report.attachments {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| MailError::Attachment {
                    path: path.clone(),
                    source,
                })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "report.pdf".to_string());
            parts = parts.singlepart(Attachment::new(filename).body(bytes, pdf_content_type()));
        }

        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(report.subject.clone())
            .multipart(parts)?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, report: &OutgoingReport) -> Result<(), MailError> {
        let message = self.build_message(report).await?;
        self.transport.send(message).await?;
        info!(
            subject = %report.subject,
            attachments = report.attachments.len(),
            "Report email sent"
        );
        Ok(())
    }
}

fn pdf_content_type() -> ContentType {
    ContentType::parse("application/pdf").unwrap_or(ContentType::TEXT_PLAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_bad_recipient() {
        let result = SmtpMailer::new("smtp.example.com", "hr@example.com", "pw", "not-an-address");
        assert!(matches!(result, Err(MailError::Address(_))));
    }

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(
            "smtp.example.com",
            "reports@example.com",
            "pw",
            "hiring@example.com",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_message_attaches_pdf_under_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript_x.pdf");
        tokio::fs::write(&path, b"%PDF-1.3 test").await.unwrap();

        let report = OutgoingReport {
            subject: "Interview Report: Maria Lopez".to_string(),
            body: "Attached.".to_string(),
            attachments: vec![path],
        };
        let message = mailer().build_message(&report).await.unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("Subject: Interview Report: Maria Lopez"));
        assert!(raw.contains("From: reports@example.com"));
        assert!(raw.contains("To: hiring@example.com"));
        assert!(raw.contains("Content-Type: application/pdf"));
        assert!(raw.contains("filename=\"transcript_x.pdf\""));
        assert!(raw.contains("Attached."));
    }

    #[tokio::test]
    async fn test_build_message_missing_attachment_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");
        let report = OutgoingReport {
            subject: "Interview Report: Maria Lopez".to_string(),
            body: String::new(),
            attachments: vec![missing.clone()],
        };

        match mailer().build_message(&report).await {
            Err(MailError::Attachment { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected attachment error, got {other:?}"),
        }
    }
}
