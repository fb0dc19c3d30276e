use reqwest::header::CONTENT_TYPE;

use crate::email::Message;
use crate::error::Error;

pub mod api;

/// Adapter configuration. These three fields are everything the
/// adapter needs; nothing is read from files or the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Sender used when a message carries no explicit `from`.
    pub default_from_address: String,
    pub default_from_name: String,
}

/// SendGrid mail-send client. Cheap to clone and safe to share;
/// concurrent sends are independent and never coordinate.
#[derive(Clone)]
pub struct Client {
    config: Config,
    client: reqwest::Client,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Sends one message as a single atomic attempt, no retries.
    ///
    /// Malformed attachments fail with [`Error::Validation`] before
    /// any request is made. A 202 response is success and the body is
    /// ignored; any other status is decoded into an error report and
    /// surfaced as [`Error::Api`]. Transport failures propagate
    /// through the [`From`] conversions on [`Error`].
    pub async fn send(&self, message: &Message) -> Result<(), Error> {
        let payload = api::MailSendRequest::from_message(message, &self.config)?;

        log::debug!(
            "Sending mail from {} to {} recipients",
            payload.from.email,
            payload.personalizations[0].to.len()
        );

        let resp = self
            .client
            .post(reqwest::Url::parse(api::SENDGRID_SEND_URL)?)
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();

        if api::is_accepted(status) {
            log::debug!("Mail accepted by SendGrid");
            return Ok(());
        }

        let err = api::decode_failure(status, &resp.bytes().await?);

        log::error!("{}", err);

        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Attachment;

    fn get_client() -> Client {
        let _ = env_logger::builder().is_test(true).try_init();

        Client::new(Config {
            api_key: "test-api-key".to_string(),
            default_from_address: "default@example.com".to_string(),
            default_from_name: "Default Sender".to_string(),
        })
    }

    #[tokio::test]
    async fn test_invalid_attachment_fails_before_any_request() {
        let client = get_client();

        let mut attachment = Attachment::new("report.txt", "contents");
        attachment.content = None;

        let message = Message::new()
            .to("someone@example.com")
            .subject("hello")
            .attachment(attachment);

        // Fails during assembly; the bogus API key is never used.
        let err = client.send(&message).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_concurrent_sends_do_not_interfere() {
        let client = get_client();

        let bad = |name: &str| {
            let mut attachment = Attachment::new(name, "x");
            attachment.filename = None;
            Message::new().to("someone@example.com").attachment(attachment)
        };

        let (first, second) = (bad("a"), bad("b"));
        let (a, b) = tokio::join!(client.send(&first), client.send(&second));

        assert!(matches!(a, Err(Error::Validation(_))));
        assert!(matches!(b, Err(Error::Validation(_))));
    }
}
