//! Email composition and SMTP delivery.
//!
//! Two operations: [`compose_message`] validates the sender and receiver
//! addresses and builds an immutable plain-text envelope, and
//! [`send_message`] opens one TLS-wrapped SMTP connection, authenticates,
//! transmits, and closes. No HTML bodies, no attachments, no CC/BCC, single
//! recipient only. Failures are never retried.

use crate::error::MailError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, instrument};

/// Default SMTP host (Gmail).
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Default SMTP port: implicit TLS on the submissions port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// RFC-lite address pattern: local part, `@`, domain with a dot, TLD of at
/// least two letters. Deliberately narrower than the RFC grammar.
static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid address regex")
});

/// Check an email address against the RFC-lite pattern.
///
/// # Errors
///
/// [`MailError::InvalidAddress`] carrying the offending address.
pub fn validate_address(address: &str) -> Result<(), MailError> {
    if ADDRESS_PATTERN.is_match(address) {
        Ok(())
    } else {
        error!(%address, "Email address failed validation");
        Err(MailError::InvalidAddress(address.to_string()))
    }
}

/// Build a plain-text message envelope ready for transmission.
///
/// Both addresses are validated before the envelope is built; an invalid
/// address is a precondition violation surfaced as
/// [`MailError::InvalidAddress`], not a transport error.
#[instrument(level = "info", skip_all, fields(%sender, %receiver))]
pub fn compose_message(
    subject: &str,
    sender: &str,
    receiver: &str,
    body: &str,
) -> Result<Message, MailError> {
    validate_address(sender)?;
    validate_address(receiver)?;

    info!("Creating email message");
    let from: Mailbox = sender
        .parse()
        .map_err(|_| MailError::InvalidAddress(sender.to_string()))?;
    let to: Mailbox = receiver
        .parse()
        .map_err(|_| MailError::InvalidAddress(receiver.to_string()))?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?;
    debug!(bytes = body.len(), "Created email message");

    Ok(message)
}

/// Transmit a prepared message over a single authenticated SMTP session.
///
/// The connection is wrapped in TLS from the first byte (implicit TLS, the
/// submissions-port convention) and torn down on every exit path by the
/// transport. The username doubles as the envelope sender and is validated
/// with the same pattern as [`compose_message`].
///
/// # Errors
///
/// * [`MailError::Tls`] when the TLS parameters cannot be set up
/// * [`MailError::Auth`] when the server rejects the credentials
/// * [`MailError::Connect`] when the server cannot be reached
/// * [`MailError::Smtp`] for any other SMTP failure
#[instrument(level = "info", skip(username, password, message))]
pub async fn send_message(
    username: &str,
    password: &str,
    message: Message,
    host: &str,
    port: u16,
) -> Result<(), MailError> {
    validate_address(username)?;

    info!("Setting up TLS for SMTP connection");
    let mailer: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| {
                error!(error = %e, "TLS setup for SMTP transport failed");
                MailError::Tls(e)
            })?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

    info!("Sending email over SMTP");
    match mailer.send(message).await {
        Ok(_) => {
            info!("Email sent");
            Ok(())
        }
        Err(e) => {
            let err = classify_smtp_error(e);
            error!(error = %err, "SMTP send failed");
            Err(err)
        }
    }
}

/// Sort an SMTP transport failure into the taxonomy. A permanent negative
/// response on this single-send session means the server refused us, which
/// in practice is the credential path; anything that is neither a server
/// response nor a client-side error is a network-level connection failure.
fn classify_smtp_error(e: SmtpError) -> MailError {
    if e.is_tls() {
        MailError::Tls(e)
    } else if e.is_permanent() {
        MailError::Auth(e)
    } else if e.is_timeout() || !(e.is_response() || e.is_client()) {
        MailError::Connect(e)
    } else {
        MailError::Smtp(e)
    }
}
