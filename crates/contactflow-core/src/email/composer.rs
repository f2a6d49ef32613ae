/// Message composition with lettre
use crate::error::IntakeError;
use crate::models::OutgoingMail;
use lettre::message::{Mailbox, Message, MultiPart, SinglePart};
use std::str::FromStr;

fn to_mailbox(address: &str) -> Result<Mailbox, IntakeError> {
    Ok(Mailbox::from_str(address)?)
}

/// Builds the MIME message for an outgoing mail.
///
/// With a text alternative the body is `multipart/alternative`, otherwise a
/// single HTML part.
pub fn compose(mail: &OutgoingMail) -> Result<Message, IntakeError> {
    let mut builder = Message::builder()
        .from(to_mailbox(&mail.from)?)
        .to(to_mailbox(&mail.to)?)
        .subject(&mail.subject);

    // A malformed submitter address must not block the notification
    if let Some(reply_to) = &mail.reply_to {
        match to_mailbox(reply_to) {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => tracing::debug!(error = %e, "Skipping unparsable Reply-To"),
        }
    }

    let message = match &mail.text {
        Some(text) => builder.multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text.clone()))
                .singlepart(SinglePart::html(mail.html.clone())),
        )?,
        None => builder.singlepart(SinglePart::html(mail.html.clone()))?,
    };

    Ok(message)
}
