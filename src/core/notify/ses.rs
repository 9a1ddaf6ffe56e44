use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use tracing::{debug, error, info};

use super::{EmailMessage, NotifyError, NotifyResult, Notifier};

const CHARSET: &str = "UTF-8";

/// [`Notifier`] sending through Amazon SES (v2 API).
pub struct SesNotifier {
    client: SesClient,
}

impl SesNotifier {
    pub fn new(client: SesClient) -> Self {
        Self { client }
    }
}

fn content(data: &str) -> NotifyResult<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| NotifyError::InvalidMessage(e.to_string()))
}

fn build_content(message: &EmailMessage) -> NotifyResult<EmailContent> {
    let body = Body::builder()
        .html(content(&message.html_body)?)
        .text(content(&message.text_body)?)
        .build();

    let simple = Message::builder()
        .subject(content(&message.subject)?)
        .body(body)
        .build();

    Ok(EmailContent::builder().simple(simple).build())
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send_email(
        &self,
        source: &str,
        destination: &str,
        message: &EmailMessage,
    ) -> NotifyResult<()> {
        let email_content = build_content(message)?;

        debug!(to = %destination, subject = %message.subject, "Sending email via SES");

        let output = self
            .client
            .send_email()
            .from_email_address(source)
            .destination(Destination::builder().to_addresses(destination).build())
            .content(email_content)
            .send()
            .await
            .map_err(|e| {
                error!(to = %destination, error = %e, "SES send failed");
                NotifyError::DeliveryFailed(e.to_string())
            })?;

        info!(
            to = %destination,
            message_id = output.message_id().unwrap_or_default(),
            "Email sent"
        );
        Ok(())
    }
}
