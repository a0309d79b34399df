//! Display labels for structurally-invalid fields.

use crate::models::fields;

use super::schema::FieldError;

const FIELD_LABELS: &[(&str, &str)] = &[
    (fields::NAME, "Course name"),
    (fields::TYPE, "Course type"),
    (fields::NAME_CHANGE_REQUIRED, "Name change required"),
    (fields::NEW_NAME, "New name"),
    (fields::ABOUT_FILE, "About file"),
    (fields::SYLLABUS_REQUIRED, "Syllabus required"),
    (fields::LEARNING_HOURS, "Learning hours"),
    (fields::SYLLABUS_FILE, "Syllabus file"),
    (fields::SURVEYS_ADDED, "Surveys added"),
    (fields::GRADING_PERCENTAGES, "Grading percentages"),
    (fields::GRADING_FILE, "Grading model file"),
    (fields::MARKETING_IMAGES_AVAILABLE, "Marketing images available"),
    (fields::MARKETING_IMAGES_LINK, "Marketing images link"),
    (fields::CLIENT_LOGO_REQUIRED, "Client logo required"),
    (fields::CLIENT_LOGO, "Client logo"),
    (fields::SIGNER_ROLE, "Signer role"),
    (fields::SIGNER_NAME, "Signer name"),
    (fields::CERTIFICATE_SIGNATURE, "Certificate signature"),
    (fields::SUPPORT_CONTACT, "Support contact"),
];

pub fn field_label(field: &str) -> Option<&'static str> {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
}

/// Labels for the given errors, in order. Errors on fields without a label
/// (e.g. `homePageOption`, `courseLaunchDate`) are dropped.
pub fn labels_for(errors: &[FieldError]) -> Vec<&'static str> {
    errors
        .iter()
        .filter_map(|err| field_label(&err.field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(field: &str) -> FieldError {
        FieldError {
            field: field.to_string(),
            message: "expected a string".to_string(),
        }
    }

    #[test]
    fn unmapped_fields_are_dropped() {
        let errors = vec![err("name"), err("homePageOption"), err("supportContact"), err("bogus")];
        assert_eq!(labels_for(&errors), vec!["Course name", "Support contact"]);
    }

    #[test]
    fn home_page_evidence_fields_have_no_label() {
        assert_eq!(field_label("homePageFile"), None);
        assert_eq!(field_label("aboutPageLink"), None);
        assert_eq!(field_label("aboutFile"), Some("About file"));
    }
}
