use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

const MAX_NAME: usize = 100;
const MAX_EMAIL: usize = 254;
const MAX_SUBJECT: usize = 200;
const MAX_MESSAGE: usize = 5000;

/// What the visitor is writing about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    General,
    Bug,
    Feature,
    Feedback,
    Support,
}

/// Body of `POST /api/v1/contact`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: ContactKind,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub received: bool,
    pub ticket: Uuid,
}

fn check_field(label: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{label} is required")));
    }
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!("{label} exceeds {max} chars")));
    }
    Ok(())
}

/// Shape check only: one '@', non-empty local part, dotted domain.
fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn validate_form(form: &ContactForm) -> Result<(), AppError> {
    check_field("name", &form.name, MAX_NAME)?;
    check_field("email", &form.email, MAX_EMAIL)?;
    check_field("subject", &form.subject, MAX_SUBJECT)?;
    check_field("message", &form.message, MAX_MESSAGE)?;
    if !plausible_email(form.email.trim()) {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    Ok(())
}

/// POST /api/v1/contact: accept a contact message. Logged, not stored.
pub async fn post_contact(
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    validate_form(&form)?;
    let ticket = Uuid::new_v4();
    tracing::info!(
        %ticket,
        kind = ?form.kind,
        subject = %form.subject,
        message_len = form.message.len(),
        "contact message received"
    );
    Ok((
        StatusCode::ACCEPTED,
        Json(ContactResponse {
            received: true,
            ticket,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hello".into(),
            message: "Love the river game".into(),
            kind: ContactKind::Feedback,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_form(&form()).is_ok());
    }

    #[test]
    fn blank_fields_rejected() {
        let mut f = form();
        f.subject = "   ".into();
        assert!(validate_form(&f).is_err());
        let mut f = form();
        f.message.clear();
        assert!(validate_form(&f).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(plausible_email("a@b.co"));
        assert!(!plausible_email("ada.example.com"));
        assert!(!plausible_email("@example.com"));
        assert!(!plausible_email("ada@localhost"));
        assert!(!plausible_email("ada@@example.com"));
        assert!(!plausible_email("ada @example.com"));
    }

    #[test]
    fn kind_defaults_to_general() {
        let f: ContactForm = serde_json::from_str(
            r#"{"name":"a","email":"a@b.co","subject":"s","message":"m"}"#,
        )
        .unwrap();
        assert_eq!(f.kind, ContactKind::General);
        let f: ContactForm = serde_json::from_str(
            r#"{"name":"a","email":"a@b.co","subject":"s","message":"m","type":"bug"}"#,
        )
        .unwrap();
        assert_eq!(f.kind, ContactKind::Bug);
    }
}
