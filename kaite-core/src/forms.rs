//! Field rules for every form the website submits.

use crate::validation::{FieldRule, FormSchema};

pub fn contact_form() -> FormSchema {
    FormSchema::new()
        .field("firstName", "First name", vec![FieldRule::Required, FieldRule::MaxLength(80)])
        .field("lastName", "Last name", vec![FieldRule::Required, FieldRule::MaxLength(80)])
        .field("email", "Email", vec![FieldRule::Required, FieldRule::Email])
        .field("phone", "Phone", vec![FieldRule::Phone])
        .field("subject", "Subject", vec![FieldRule::MaxLength(120)])
        .field("message", "Message", vec![FieldRule::Required, FieldRule::MinLength(10), FieldRule::MaxLength(5000)])
}

pub fn lead_capture() -> FormSchema {
    FormSchema::new()
        .field("email", "Email", vec![FieldRule::Required, FieldRule::Email])
        .field("source", "Source", vec![FieldRule::MaxLength(64)])
}

/// One guest on the party step; checked once per name
pub fn booking_guest() -> FormSchema {
    FormSchema::new().field("name", "Guest name", vec![FieldRule::Required, FieldRule::MaxLength(80)])
}

/// Lead guest contact step of the booking funnel
pub fn booking_contact() -> FormSchema {
    FormSchema::new()
        .field("lead_email", "Email", vec![FieldRule::Required, FieldRule::Email])
        .field("lead_phone", "Phone", vec![FieldRule::Required, FieldRule::Phone])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_form_rules() {
        let ok = json!({
            "firstName": "Marta",
            "lastName": "Rossi",
            "email": "marta@example.com",
            "message": "Is the June trip suitable for beginners?"
        });
        assert!(contact_form().check(&ok).is_ok());

        let errors = contact_form().validate(&json!({ "firstName": "Marta", "email": "nope", "message": "Hi" }));
        assert!(errors.get("lastName").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(errors.get("message").unwrap(), ["Message must be at least 10 characters"]);
    }

    #[test]
    fn test_lead_and_booking_contact() {
        assert!(lead_capture().check(&json!({ "email": "a@b.co" })).is_ok());
        assert!(lead_capture().check(&json!({ "email": "" })).is_err());

        assert!(booking_guest().check(&json!({ "name": "Ana" })).is_ok());
        assert_eq!(
            booking_guest().validate(&json!({ "name": "x".repeat(81) })).get("name").unwrap(),
            ["Guest name must be at most 80 characters"]
        );

        let errors = booking_contact().validate(&json!({ "lead_email": "a@b.co" }));
        assert_eq!(errors.get("lead_phone").unwrap(), ["Phone is required"]);
    }
}
