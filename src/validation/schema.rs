//! Structural validation of course records.
//!
//! Checks presence and primitive types of individual fields only. Cross-field
//! business rules live in [`super::readiness`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::course::{CourseType, HomePageOption, fields, iso_date};

/// Expected shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    NonEmptyText,
    Flag,
    OneOf(&'static [&'static str]),
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    /// Only enforced in [`Mode::Record`].
    pub required: bool,
}

impl FieldRule {
    const fn optional(field: &'static str, kind: FieldKind) -> Self {
        Self { field, kind, required: false }
    }

    const fn required(field: &'static str, kind: FieldKind) -> Self {
        Self { field, kind, required: true }
    }
}

/// Whether a candidate is a whole record or a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Record,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub struct Schema {
    rules: &'static [FieldRule],
}

const COURSE_TYPES: &[&str] = &[
    CourseType::Certificate.as_str(),
    CourseType::NoCertificate.as_str(),
];

const HOME_PAGE_OPTIONS: &[&str] = &[
    HomePageOption::HomePageFile.as_str(),
    HomePageOption::AboutFile.as_str(),
    HomePageOption::AboutLink.as_str(),
];

const COURSE_RULES: &[FieldRule] = &[
    FieldRule::required(fields::NAME, FieldKind::NonEmptyText),
    FieldRule::optional(fields::TYPE, FieldKind::OneOf(COURSE_TYPES)),
    FieldRule::optional(fields::NAME_CHANGE_REQUIRED, FieldKind::Flag),
    FieldRule::optional(fields::NEW_NAME, FieldKind::Text),
    FieldRule::optional(fields::HOME_PAGE_OPTION, FieldKind::OneOf(HOME_PAGE_OPTIONS)),
    FieldRule::optional(fields::HOME_PAGE_FILE, FieldKind::Text),
    FieldRule::optional(fields::ABOUT_FILE, FieldKind::Text),
    FieldRule::optional(fields::ABOUT_PAGE_LINK, FieldKind::Text),
    FieldRule::optional(fields::SYLLABUS_REQUIRED, FieldKind::Flag),
    FieldRule::optional(fields::LEARNING_HOURS, FieldKind::Text),
    FieldRule::optional(fields::SYLLABUS_FILE, FieldKind::Text),
    FieldRule::optional(fields::SURVEYS_ADDED, FieldKind::Flag),
    FieldRule::optional(fields::GRADING_PERCENTAGES, FieldKind::Text),
    FieldRule::optional(fields::GRADING_FILE, FieldKind::Text),
    FieldRule::optional(fields::MARKETING_IMAGES_AVAILABLE, FieldKind::Flag),
    FieldRule::optional(fields::MARKETING_IMAGES_LINK, FieldKind::Text),
    FieldRule::optional(fields::CLIENT_LOGO_REQUIRED, FieldKind::Flag),
    FieldRule::optional(fields::CLIENT_LOGO, FieldKind::Text),
    FieldRule::optional(fields::SIGNER_ROLE, FieldKind::Text),
    FieldRule::optional(fields::SIGNER_NAME, FieldKind::Text),
    FieldRule::optional(fields::CERTIFICATE_SIGNATURE, FieldKind::Text),
    FieldRule::optional(fields::SUPPORT_CONTACT, FieldKind::Text),
    FieldRule::optional(fields::COURSE_LAUNCH_DATE, FieldKind::Date),
    FieldRule::optional(fields::ADDITIONAL_NOTES, FieldKind::Text),
];

/// Schema for course records and course patches.
pub const COURSE_SCHEMA: Schema = Schema::new(COURSE_RULES);

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Validate a candidate record. A non-object candidate is treated as an
    /// object with no fields. Errors follow rule declaration order.
    pub fn validate(&self, candidate: &Value, mode: Mode) -> Result<(), Vec<FieldError>> {
        let empty = Map::new();
        let record = candidate.as_object().unwrap_or(&empty);

        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|rule| {
                check_rule(rule, record.get(rule.field), mode).map(|message| FieldError {
                    field: rule.field.to_string(),
                    message,
                })
            })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_rule(rule: &FieldRule, value: Option<&Value>, mode: Mode) -> Option<String> {
    let value = match value {
        None | Some(Value::Null) => {
            return (rule.required && mode == Mode::Record).then(|| "is required".to_string());
        }
        Some(v) => v,
    };

    match rule.kind {
        FieldKind::Text => (!value.is_string()).then(|| "expected a string".to_string()),
        FieldKind::NonEmptyText => match value.as_str() {
            Some("") => Some("must not be empty".to_string()),
            Some(_) => None,
            None => Some("expected a string".to_string()),
        },
        FieldKind::Flag => (!value.is_boolean()).then(|| "expected a boolean".to_string()),
        FieldKind::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => None,
            _ => Some(format!("must be one of: {}", allowed.join(", "))),
        },
        FieldKind::Date => match value.as_str() {
            Some("") => None,
            Some(s) if iso_date::parse(s).is_some() => None,
            _ => Some("expected an ISO-8601 date".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields_of(result: Result<(), Vec<FieldError>>) -> Vec<String> {
        result
            .err()
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn accepts_minimal_record() {
        let record = json!({ "name": "Intro to X" });
        assert!(COURSE_SCHEMA.validate(&record, Mode::Record).is_ok());
    }

    #[test]
    fn name_required_only_for_whole_records() {
        let record = json!({ "surveysAdded": true });
        assert_eq!(fields_of(COURSE_SCHEMA.validate(&record, Mode::Record)), vec!["name"]);
        assert!(COURSE_SCHEMA.validate(&record, Mode::Patch).is_ok());
    }

    #[test]
    fn empty_name_rejected_in_both_modes() {
        let record = json!({ "name": "" });
        assert!(COURSE_SCHEMA.validate(&record, Mode::Record).is_err());
        assert!(COURSE_SCHEMA.validate(&record, Mode::Patch).is_err());
    }

    #[test]
    fn reports_type_errors_in_declaration_order() {
        let record = json!({
            "surveysAdded": "yes",
            "name": 42,
            "type": "premium",
            "supportContact": 5,
        });
        let errors = COURSE_SCHEMA.validate(&record, Mode::Record).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "type", "surveysAdded", "supportContact"]);
        assert_eq!(errors[1].message, "must be one of: certificate, no_certificate");
        assert_eq!(errors[2].message, "expected a boolean");
    }

    #[test]
    fn null_counts_as_absent() {
        let record = json!({ "name": "A", "newName": null, "syllabusRequired": null });
        assert!(COURSE_SCHEMA.validate(&record, Mode::Record).is_ok());
    }

    #[test]
    fn validates_dates_and_home_page_option() {
        let record = json!({
            "name": "A",
            "courseLaunchDate": "next tuesday",
            "homePageOption": "landing",
        });
        assert_eq!(
            fields_of(COURSE_SCHEMA.validate(&record, Mode::Record)),
            vec!["homePageOption", "courseLaunchDate"]
        );

        let record = json!({ "name": "A", "courseLaunchDate": "2025-03-01" });
        assert!(COURSE_SCHEMA.validate(&record, Mode::Record).is_ok());
    }

    #[test]
    fn non_object_is_treated_as_empty() {
        assert_eq!(fields_of(COURSE_SCHEMA.validate(&json!([1, 2]), Mode::Record)), vec!["name"]);
        assert!(COURSE_SCHEMA.validate(&json!("x"), Mode::Patch).is_ok());
    }
}
