//! Launch readiness rules.
//!
//! Every check runs on every call; a record can miss several requirements at
//! once and they are reported in a fixed order. The evaluator is a pure
//! function of the record and never fails: absent, null or mistyped fields
//! simply count as not filled in.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{CourseType, HomePageOption, fields};

use super::labels::labels_for;
use super::schema::{COURSE_SCHEMA, Mode};

/// One unmet launch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A structurally invalid field, carried as its display label.
    Field(&'static str),
    NewName,
    GradingModel,
    ClientLogo,
    SignerRole,
    SignerName,
    CertificateSignature,
    SyllabusDetails,
    HomePageSelection,
    HomePageEvidence(HomePageOption),
    MarketingImages,
    SupportContact,
    Surveys,
}

impl Requirement {
    pub fn label(&self) -> &'static str {
        match self {
            Requirement::Field(label) => *label,
            Requirement::NewName => "New name (required when a name change is requested)",
            Requirement::GradingModel => "Grading model (required for certificate courses)",
            Requirement::ClientLogo => "Client logo (required for certificate courses)",
            Requirement::SignerRole => "Signer role (required for certificate courses)",
            Requirement::SignerName => "Signer name (required for certificate courses)",
            Requirement::CertificateSignature => {
                "Certificate signature (required for certificate courses)"
            }
            Requirement::SyllabusDetails => {
                "Syllabus details (required when a syllabus is required)"
            }
            Requirement::HomePageSelection => "Home page selection (choose one of the options)",
            Requirement::HomePageEvidence(HomePageOption::HomePageFile) => {
                "Home page details file (required for the selected option)"
            }
            Requirement::HomePageEvidence(HomePageOption::AboutFile) => {
                "About page file (required for the selected option)"
            }
            Requirement::HomePageEvidence(HomePageOption::AboutLink) => {
                "About page link (required for the selected option)"
            }
            Requirement::MarketingImages => "Marketing images (must be checked)",
            Requirement::SupportContact => "Support contact (must be filled in)",
            Requirement::Surveys => "Feedback surveys (must be checked)",
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub ready: bool,
    pub missing_fields: Vec<String>,
}

/// Read-only, truthiness-style access to a loosely typed record.
struct RecordView<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RecordView<'a> {
    fn new(record: &'a Value) -> Self {
        Self { fields: record.as_object() }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.and_then(|map| map.get(field))
    }

    /// The field holds a non-empty string.
    fn is_filled(&self, field: &str) -> bool {
        matches!(self.get(field), Some(Value::String(s)) if !s.is_empty())
    }

    /// The field holds the boolean `true`.
    fn is_checked(&self, field: &str) -> bool {
        matches!(self.get(field), Some(Value::Bool(true)))
    }

    fn is_certificate(&self) -> bool {
        self.get(fields::TYPE).and_then(Value::as_str) == Some(CourseType::Certificate.as_str())
    }

    fn home_page_option(&self) -> Option<HomePageOption> {
        self.get(fields::HOME_PAGE_OPTION)
            .and_then(Value::as_str)
            .and_then(HomePageOption::parse)
    }
}

pub fn missing_requirements(record: &Value) -> Vec<Requirement> {
    let view = RecordView::new(record);
    let mut missing = Vec::new();

    if let Err(errors) = COURSE_SCHEMA.validate(record, Mode::Record) {
        missing.extend(labels_for(&errors).into_iter().map(Requirement::Field));
    }

    if view.is_checked(fields::NAME_CHANGE_REQUIRED) && !view.is_filled(fields::NEW_NAME) {
        missing.push(Requirement::NewName);
    }

    if view.is_certificate() {
        if !view.is_filled(fields::GRADING_PERCENTAGES) && !view.is_filled(fields::GRADING_FILE) {
            missing.push(Requirement::GradingModel);
        }
        if view.is_checked(fields::CLIENT_LOGO_REQUIRED) && !view.is_filled(fields::CLIENT_LOGO) {
            missing.push(Requirement::ClientLogo);
        }
        if !view.is_filled(fields::SIGNER_ROLE) {
            missing.push(Requirement::SignerRole);
        }
        if !view.is_filled(fields::SIGNER_NAME) {
            missing.push(Requirement::SignerName);
        }
        if !view.is_filled(fields::CERTIFICATE_SIGNATURE) {
            missing.push(Requirement::CertificateSignature);
        }
    }

    if view.is_checked(fields::SYLLABUS_REQUIRED)
        && !view.is_filled(fields::LEARNING_HOURS)
        && !view.is_filled(fields::SYLLABUS_FILE)
    {
        missing.push(Requirement::SyllabusDetails);
    }

    match view.home_page_option() {
        None => missing.push(Requirement::HomePageSelection),
        Some(option) if !view.is_filled(option.evidence_field()) => {
            missing.push(Requirement::HomePageEvidence(option));
        }
        Some(_) => {}
    }

    if !view.is_checked(fields::MARKETING_IMAGES_AVAILABLE) {
        missing.push(Requirement::MarketingImages);
    }
    if !view.is_filled(fields::SUPPORT_CONTACT) {
        missing.push(Requirement::SupportContact);
    }
    if !view.is_checked(fields::SURVEYS_ADDED) {
        missing.push(Requirement::Surveys);
    }

    missing
}

/// Labels of every unmet launch condition, in check order.
pub fn compute_missing_fields(record: &Value) -> Vec<String> {
    missing_requirements(record)
        .iter()
        .map(|req| req.label().to_string())
        .collect()
}

pub fn is_ready_for_launch(record: &Value) -> bool {
    missing_requirements(record).is_empty()
}

pub fn evaluate(record: &Value) -> Readiness {
    let missing_fields = compute_missing_fields(record);
    Readiness {
        ready: missing_fields.is_empty(),
        missing_fields,
    }
}
