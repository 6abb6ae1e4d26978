use super::IMailer;
use crate::config::SmtpSettings;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, warn};

/// Submission port where TLS starts right away instead of through STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

/// Sends emails through an SMTP relay over TLS.
///
/// Without configured credentials every send fails.
pub struct SmtpMailer {
    client: Option<SmtpClient>,
}

impl SmtpMailer {
    pub fn new(settings: Option<&SmtpSettings>) -> Self {
        let settings = match settings {
            Some(settings) => settings,
            None => return Self { client: None },
        };

        let from = match settings.from.parse::<Mailbox>() {
            Ok(from) => from,
            Err(e) => {
                error!(
                    "The sender address: {} is not valid, emails will not be sent. Error: {:?}",
                    settings.from, e
                );
                return Self { client: None };
            }
        };

        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        };
        let builder = match builder {
            Ok(builder) => builder,
            Err(e) => {
                error!(
                    "Unable to set up TLS for the SMTP relay: {}, emails will not be sent. Error: {:?}",
                    settings.host, e
                );
                return Self { client: None };
            }
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        info!(
            "Emails will be sent through {}:{} as {}",
            settings.host, settings.port, settings.from
        );

        Self {
            client: Some(SmtpClient { transport, from }),
        }
    }
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let client = match &self.client {
            Some(client) => client,
            None => {
                warn!(
                    "Unable to send email to {}: mail credentials are not configured",
                    to
                );
                return false;
            }
        };

        let recipient = match to.parse::<Mailbox>() {
            Ok(recipient) => recipient,
            Err(e) => {
                error!("Invalid recipient address: {}. Error: {:?}", to, e);
                return false;
            }
        };

        let message = match Message::builder()
            .from(client.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
        {
            Ok(message) => message,
            Err(e) => {
                error!("Unable to build email to {}. Error: {:?}", to, e);
                return false;
            }
        };

        match client.transport.send(message).await {
            Ok(_) => true,
            Err(e) => {
                error!("SMTP provider rejected email to {}. Error: {:?}", to, e);
                false
            }
        }
    }
}
