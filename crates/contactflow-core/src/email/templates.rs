/// Notification templates
use crate::models::{NotificationSettings, OutgoingMail, Submission};
use ammonia::clean_text;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Escapes user text for HTML, keeping line breaks
fn escape_multiline(text: &str) -> String {
    text.lines().map(clean_text).collect::<Vec<_>>().join("<br>")
}

/// Escapes a URL for use inside a quoted attribute.
///
/// `clean_text` also escapes `/` and spaces, which breaks links.
fn escape_attribute(url: &str) -> String {
    url.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Notification sent to the site owner for every accepted submission
pub fn owner_notification(submission: &Submission, from: &str, to: &str) -> OutgoingMail {
    let received = submission.received_at.format(TIMESTAMP_FORMAT).to_string();

    let html = format!(
        r#"
<h2>New contact message</h2>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Message:</strong></p>
<p>{message}</p>
<p><strong>Date:</strong> {received}</p>
"#,
        name = clean_text(&submission.name),
        email = clean_text(&submission.email),
        message = escape_multiline(&submission.message),
        received = received,
    );

    let text = format!(
        "Name: {}\nEmail: {}\nMessage: {}\nDate: {}",
        submission.name, submission.email, submission.message, received
    );

    OutgoingMail::builder()
        .from(from)
        .to(to)
        .reply_to(submission.email.as_str())
        .subject(format!("New contact message from {}", submission.name))
        .text(text)
        .html(html)
        .build()
}

/// Confirmation sent back to the submitter
pub fn confirmation(
    submission: &Submission,
    from: &str,
    settings: &NotificationSettings,
) -> OutgoingMail {
    let site_link = settings
        .site_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<p>In the meantime you can keep browsing at <a href="{url}">{url}</a>.</p>"#,
                url = escape_attribute(url)
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"
<h2>Thanks for getting in touch, {name}!</h2>
<p>Your message has been received and I will answer as soon as possible.</p>
<p><strong>Your message:</strong></p>
<blockquote>{message}</blockquote>
{site_link}
<p>Best regards,<br>{signature}</p>
"#,
        name = clean_text(&submission.name),
        message = escape_multiline(&submission.message),
        site_link = site_link,
        signature = clean_text(&settings.signature_name),
    );

    let text = format!(
        "Thanks for getting in touch, {}!\n\nYour message has been received:\n\n{}\n\nBest regards,\n{}",
        submission.name, submission.message, settings.signature_name
    );

    OutgoingMail::builder()
        .from(from)
        .to(submission.email.as_str())
        .subject("Thanks for your message")
        .text(text)
        .html(html)
        .build()
}
