use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9\s\-().]{5,19}$").expect("phone pattern compiles"));

/// A single declarative check on a form field.
///
/// Everything except `Required` passes on an empty value, so optional fields
/// only get checked when the user filled them in.
#[derive(Debug, Clone)]
pub enum FieldRule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Phone,
    Pattern { regex: Regex, message: String },
}

impl FieldRule {
    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        FieldRule::Pattern { regex, message: message.into() }
    }

    fn check(&self, label: &str, value: &str) -> Option<String> {
        let value = value.trim();

        if value.is_empty() {
            return match self {
                FieldRule::Required => Some(format!("{} is required", label)),
                _ => None,
            };
        }

        match self {
            FieldRule::Required => None,
            FieldRule::MinLength(min) if value.chars().count() < *min => {
                Some(format!("{} must be at least {} characters", label, min))
            }
            FieldRule::MaxLength(max) if value.chars().count() > *max => {
                Some(format!("{} must be at most {} characters", label, max))
            }
            FieldRule::Email if !EMAIL.is_match(value) => Some(format!("{} must be a valid email address", label)),
            FieldRule::Phone if !PHONE.is_match(value) => Some(format!("{} must be a valid phone number", label)),
            FieldRule::Pattern { regex, message } if !regex.is_match(value) => Some(message.clone()),
            _ => None,
        }
    }
}

/// Read access to submitted form values by field name
pub trait FormValues {
    fn value(&self, field: &str) -> Option<&str>;
}

impl FormValues for HashMap<String, String> {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl FormValues for BTreeMap<String, String> {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl FormValues for serde_json::Value {
    fn value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    label: String,
    rules: Vec<FieldRule>,
}

/// Ordered set of fields and their rules, shared by every instance of a form
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, label: &str, rules: Vec<FieldRule>) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            label: label.to_string(),
            rules,
        });
        self
    }

    /// Run every rule and collect all failures per field. Never short-circuits
    /// across fields; within a field every failing rule is reported.
    pub fn validate<V: FormValues + ?Sized>(&self, values: &V) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            let value = values.value(&field.name).unwrap_or("");
            for rule in &field.rules {
                if let Some(message) = rule.check(&field.label, value) {
                    errors.add(&field.name, message);
                }
            }
        }

        errors
    }

    pub fn check<V: FormValues + ?Sized>(&self, values: &V) -> Result<(), ValidationErrors> {
        self.validate(values).into_result()
    }
}

/// Per-field error messages, in schema order within a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields().collect();
        write!(f, "Validation failed for: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_required_and_optional_fields() {
        let schema = FormSchema::new()
            .field("name", "Name", vec![FieldRule::Required, FieldRule::MinLength(2)])
            .field("company", "Company", vec![FieldRule::MinLength(2)]);

        let errors = schema.validate(&values(&[("name", "   ")]));
        assert_eq!(errors.get("name").unwrap(), ["Name is required"]);
        assert!(errors.get("company").is_none());

        let errors = schema.validate(&values(&[("name", "A"), ("company", "B")]));
        assert_eq!(errors.get("name").unwrap(), ["Name must be at least 2 characters"]);
        assert_eq!(errors.fields().count(), 2);

        assert!(schema.check(&values(&[("name", "Ana")])).is_ok());
    }

    #[test]
    fn test_email_and_phone() {
        let schema = FormSchema::new()
            .field("email", "Email", vec![FieldRule::Required, FieldRule::Email])
            .field("phone", "Phone", vec![FieldRule::Phone]);

        assert!(schema.check(&values(&[("email", "rider@kite.example"), ("phone", "+39 (070) 123-4567")])).is_ok());

        let errors = schema.validate(&values(&[("email", "rider@kite"), ("phone", "call me")]));
        assert_eq!(errors.get("email").unwrap(), ["Email must be a valid email address"]);
        assert_eq!(errors.get("phone").unwrap(), ["Phone must be a valid phone number"]);
    }

    #[test]
    fn test_pattern_and_length_count_chars() {
        let schema = FormSchema::new()
            .field("code", "Code", vec![FieldRule::pattern(Regex::new(r"^[A-Z]{3}$").unwrap(), "Use a 3-letter code")])
            .field("note", "Note", vec![FieldRule::MaxLength(3)]);

        let errors = schema.validate(&values(&[("code", "cag"), ("note", "äöü")]));
        assert_eq!(errors.get("code").unwrap(), ["Use a 3-letter code"]);
        assert!(errors.get("note").is_none());
    }

    #[test]
    fn test_json_values_and_merge() {
        let schema = FormSchema::new().field("email", "Email", vec![FieldRule::Required]);
        let mut errors = schema.validate(&serde_json::json!({ "email": 42 }));
        assert!(!errors.is_empty());

        let mut other = ValidationErrors::new();
        other.add("guests", "Add a name for every guest");
        errors.merge(other);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["guests"][0], "Add a name for every guest");
        assert_eq!(errors.to_string(), "Validation failed for: email, guests");
    }
}
