//! Builds the owner notification and the submitter acknowledgment.

use ammonia::clean_text;
use lettre::message::Mailbox;

use super::Submission;
use crate::mail::OutboundMessage;

pub const SUBJECT_PREFIX: &str = "Portfolio Contact: ";
pub const ACKNOWLEDGMENT_SUBJECT: &str = "Thank you for contacting me!";

/// Notification sent to the site owner.
///
/// `reply_to` is the submitter's mailbox when their address parses as one;
/// the address is always shown in the body either way.
pub fn notification(
    submission: &Submission,
    from: &Mailbox,
    to: &Mailbox,
    reply_to: Option<&Mailbox>,
) -> OutboundMessage {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #6366f1;">New Contact Form Submission</h2>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Subject:</strong> {subject}</p>
    <p><strong>Message:</strong></p>
    <p style="white-space: pre-wrap;">{message}</p>
  </div>
  <p style="color: #666; font-size: 12px;">This message was sent from your portfolio contact form.</p>
</div>"#,
        name = clean_text(&submission.name),
        email = clean_text(&submission.email),
        subject = clean_text(&submission.subject),
        message = clean_text(&submission.message),
    );

    let text_body = format!(
        "New Contact Form Submission\n\nName: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n",
        submission.name, submission.email, submission.subject, submission.message,
    );

    OutboundMessage {
        from: from.clone(),
        to: to.clone(),
        reply_to: reply_to.cloned(),
        subject: format!("{}{}", SUBJECT_PREFIX, submission.subject),
        html_body,
        text_body,
    }
}

/// Thank-you message sent back to the submitter at `to`.
pub fn acknowledgment(
    submission: &Submission,
    from: &Mailbox,
    to: &Mailbox,
    owner_name: Option<&str>,
) -> OutboundMessage {
    let html_signature = match owner_name {
        Some(owner) => format!("Best regards,<br>{}", clean_text(owner)),
        None => "Best regards".to_string(),
    };
    let text_signature = match owner_name {
        Some(owner) => format!("Best regards,\n{}", owner),
        None => "Best regards".to_string(),
    };

    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #6366f1;">Thank you for reaching out!</h2>
  <p>Hi {name},</p>
  <p>I've received your message and will get back to you as soon as possible.</p>
  <p>{signature}</p>
</div>"#,
        name = clean_text(&submission.name),
        signature = html_signature,
    );

    let text_body = format!(
        "Hi {},\n\nI've received your message and will get back to you as soon as possible.\n\n{}\n",
        submission.name, text_signature,
    );

    OutboundMessage {
        from: from.clone(),
        to: to.clone(),
        reply_to: None,
        subject: ACKNOWLEDGMENT_SUBJECT.to_string(),
        html_body,
        text_body,
    }
}
