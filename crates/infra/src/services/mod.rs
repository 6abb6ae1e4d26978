mod mailer;

pub use mailer::{IMailer, InMemoryMailer, SentMail, SmtpMailer};
