//! Completion notifications.
//!
//! Once an audio artifact is stored, the uploader receives an email with a
//! time-limited link to it. Delivery goes through the [`Notifier`] trait;
//! [`SesNotifier`] sends through Amazon SES.

mod ses;

use async_trait::async_trait;
use thiserror::Error;

pub use ses::SesNotifier;

/// Subject line of the audio-ready notification.
pub const AUDIO_READY_SUBJECT: &str = "🎧 Your Audio is Ready!";

/// Result type for notification delivery
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised while sending a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid email message: {0}")]
    InvalidMessage(String),

    #[error("Email delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A rendered email with HTML and plain-text alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Delivers email notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(
        &self,
        source: &str,
        destination: &str,
        message: &EmailMessage,
    ) -> NotifyResult<()>;
}

/// Render the notification pointing the recipient at their audio.
pub fn audio_ready_message(audio_url: &str) -> EmailMessage {
    let href = escape_html(audio_url);
    let html_body = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; background-color: #f7f7f7; padding: 20px;">
  <div style="max-width: 600px; margin: auto; background: white; border-radius: 8px; padding: 30px;">
    <h2 style="color: #333;">{AUDIO_READY_SUBJECT}</h2>
    <p>Hi there,</p>
    <p>Your document has been converted to audio.</p>
    <p>
      <a href="{href}" style="display: inline-block; padding: 12px 20px; margin-top: 20px; font-size: 16px; color: white; background-color: #007bff; border-radius: 5px; text-decoration: none;">
        ▶️ Listen or Download Audio
      </a>
    </p>
    <p style="margin-top: 40px; font-size: 14px; color: #666;">
      Thank you for using <strong>Text-to-Audio</strong>!<br/>
      This link will expire in 1 hour.
    </p>
  </div>
</body>
</html>"#
    );

    EmailMessage {
        subject: AUDIO_READY_SUBJECT.to_string(),
        html_body,
        text_body: format!("Your audio is ready: {audio_url}"),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
