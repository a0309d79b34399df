use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::Readiness;

pub type CourseId = i64;

/// Wire names of every course attribute.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const NAME_CHANGE_REQUIRED: &str = "nameChangeRequired";
    pub const NEW_NAME: &str = "newName";
    pub const HOME_PAGE_OPTION: &str = "homePageOption";
    pub const HOME_PAGE_FILE: &str = "homePageFile";
    pub const ABOUT_FILE: &str = "aboutFile";
    pub const ABOUT_PAGE_LINK: &str = "aboutPageLink";
    pub const SYLLABUS_REQUIRED: &str = "syllabusRequired";
    pub const LEARNING_HOURS: &str = "learningHours";
    pub const SYLLABUS_FILE: &str = "syllabusFile";
    pub const SURVEYS_ADDED: &str = "surveysAdded";
    pub const GRADING_PERCENTAGES: &str = "gradingPercentages";
    pub const GRADING_FILE: &str = "gradingFile";
    pub const MARKETING_IMAGES_AVAILABLE: &str = "marketingImagesAvailable";
    pub const MARKETING_IMAGES_LINK: &str = "marketingImagesLink";
    pub const CLIENT_LOGO_REQUIRED: &str = "clientLogoRequired";
    pub const CLIENT_LOGO: &str = "clientLogo";
    pub const SIGNER_ROLE: &str = "signerRole";
    pub const SIGNER_NAME: &str = "signerName";
    pub const CERTIFICATE_SIGNATURE: &str = "certificateSignature";
    pub const SUPPORT_CONTACT: &str = "supportContact";
    pub const COURSE_LAUNCH_DATE: &str = "courseLaunchDate";
    pub const ADDITIONAL_NOTES: &str = "additionalNotes";
    pub const CREATED_AT: &str = "createdAt";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Certificate,
    #[default]
    NoCertificate,
}

impl CourseType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CourseType::Certificate => "certificate",
            CourseType::NoCertificate => "no_certificate",
        }
    }
}

/// How the course home page content is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HomePageOption {
    HomePageFile,
    AboutFile,
    AboutLink,
}

impl HomePageOption {
    pub const ALL: [HomePageOption; 3] = [
        HomePageOption::HomePageFile,
        HomePageOption::AboutFile,
        HomePageOption::AboutLink,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            HomePageOption::HomePageFile => "homePageFile",
            HomePageOption::AboutFile => "aboutFile",
            HomePageOption::AboutLink => "aboutLink",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.as_str() == value)
    }

    /// The field whose value proves this option has been fulfilled.
    pub fn evidence_field(&self) -> &'static str {
        match self {
            HomePageOption::HomePageFile => fields::HOME_PAGE_FILE,
            HomePageOption::AboutFile => fields::ABOUT_FILE,
            HomePageOption::AboutLink => fields::ABOUT_PAGE_LINK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::deserialize")]
    pub course_type: CourseType,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub name_change_required: bool,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub home_page_option: Option<HomePageOption>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub home_page_file: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub about_file: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub about_page_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub syllabus_required: bool,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub learning_hours: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub syllabus_file: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub surveys_added: bool,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub grading_percentages: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub grading_file: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub marketing_images_available: bool,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub marketing_images_link: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_logo_required: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_logo: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub signer_role: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub signer_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_signature: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub support_contact: Option<String>,
    #[serde(default, with = "iso_date", skip_serializing_if = "Option::is_none")]
    pub course_launch_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_notes: Option<String>,
    #[serde(default, with = "iso_date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Attributes accepted when creating a course. `id` and `createdAt` are
/// assigned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub course_type: CourseType,
    #[serde(default)]
    pub name_change_required: bool,
    pub new_name: Option<String>,
    pub home_page_option: Option<HomePageOption>,
    pub home_page_file: Option<String>,
    pub about_file: Option<String>,
    pub about_page_link: Option<String>,
    #[serde(default)]
    pub syllabus_required: bool,
    pub learning_hours: Option<String>,
    pub syllabus_file: Option<String>,
    #[serde(default)]
    pub surveys_added: bool,
    pub grading_percentages: Option<String>,
    pub grading_file: Option<String>,
    #[serde(default)]
    pub marketing_images_available: bool,
    pub marketing_images_link: Option<String>,
    pub client_logo_required: Option<bool>,
    pub client_logo: Option<String>,
    pub signer_role: Option<String>,
    pub signer_name: Option<String>,
    pub certificate_signature: Option<String>,
    pub support_contact: Option<String>,
    #[serde(default, with = "iso_date")]
    pub course_launch_date: Option<DateTime<Utc>>,
    pub additional_notes: Option<String>,
}

/// A partial update. Absent (or null) attributes are left untouched; an
/// empty string clears a text attribute. `homePageOption`,
/// `clientLogoRequired` and `courseLaunchDate` cannot be cleared, only
/// replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<CourseType>,
    pub name_change_required: Option<bool>,
    pub new_name: Option<String>,
    pub home_page_option: Option<HomePageOption>,
    pub home_page_file: Option<String>,
    pub about_file: Option<String>,
    pub about_page_link: Option<String>,
    pub syllabus_required: Option<bool>,
    pub learning_hours: Option<String>,
    pub syllabus_file: Option<String>,
    pub surveys_added: Option<bool>,
    pub grading_percentages: Option<String>,
    pub grading_file: Option<String>,
    pub marketing_images_available: Option<bool>,
    pub marketing_images_link: Option<String>,
    pub client_logo_required: Option<bool>,
    pub client_logo: Option<String>,
    pub signer_role: Option<String>,
    pub signer_name: Option<String>,
    pub certificate_signature: Option<String>,
    pub support_contact: Option<String>,
    #[serde(default, with = "iso_date")]
    pub course_launch_date: Option<DateTime<Utc>>,
    pub additional_notes: Option<String>,
}

impl Course {
    pub fn from_request(id: CourseId, created_at: DateTime<Utc>, req: NewCourseRequest) -> Self {
        Self {
            id,
            name: req.name,
            course_type: req.course_type,
            name_change_required: req.name_change_required,
            new_name: req.new_name,
            home_page_option: req.home_page_option,
            home_page_file: req.home_page_file,
            about_file: req.about_file,
            about_page_link: req.about_page_link,
            syllabus_required: req.syllabus_required,
            learning_hours: req.learning_hours,
            syllabus_file: req.syllabus_file,
            surveys_added: req.surveys_added,
            grading_percentages: req.grading_percentages,
            grading_file: req.grading_file,
            marketing_images_available: req.marketing_images_available,
            marketing_images_link: req.marketing_images_link,
            client_logo_required: req.client_logo_required,
            client_logo: req.client_logo,
            signer_role: req.signer_role,
            signer_name: req.signer_name,
            certificate_signature: req.certificate_signature,
            support_contact: req.support_contact,
            course_launch_date: req.course_launch_date,
            additional_notes: req.additional_notes,
            created_at: Some(created_at),
        }
    }

    /// Merge a partial update. `id` and `created_at` never change.
    pub fn apply(&mut self, req: UpdateCourseRequest) {
        if let Some(name) = req.name {
            self.name = name;
        }
        if let Some(course_type) = req.course_type {
            self.course_type = course_type;
        }
        if let Some(flag) = req.name_change_required {
            self.name_change_required = flag;
        }
        if let Some(flag) = req.syllabus_required {
            self.syllabus_required = flag;
        }
        if let Some(flag) = req.surveys_added {
            self.surveys_added = flag;
        }
        if let Some(flag) = req.marketing_images_available {
            self.marketing_images_available = flag;
        }
        if req.client_logo_required.is_some() {
            self.client_logo_required = req.client_logo_required;
        }
        if req.home_page_option.is_some() {
            self.home_page_option = req.home_page_option;
        }
        if req.course_launch_date.is_some() {
            self.course_launch_date = req.course_launch_date;
        }

        let text_updates = [
            (&mut self.new_name, req.new_name),
            (&mut self.home_page_file, req.home_page_file),
            (&mut self.about_file, req.about_file),
            (&mut self.about_page_link, req.about_page_link),
            (&mut self.learning_hours, req.learning_hours),
            (&mut self.syllabus_file, req.syllabus_file),
            (&mut self.grading_percentages, req.grading_percentages),
            (&mut self.grading_file, req.grading_file),
            (&mut self.marketing_images_link, req.marketing_images_link),
            (&mut self.client_logo, req.client_logo),
            (&mut self.signer_role, req.signer_role),
            (&mut self.signer_name, req.signer_name),
            (&mut self.certificate_signature, req.certificate_signature),
            (&mut self.support_contact, req.support_contact),
            (&mut self.additional_notes, req.additional_notes),
        ];
        for (slot, update) in text_updates {
            if update.is_some() {
                *slot = update;
            }
        }
    }

    pub fn readiness(&self) -> Result<Readiness, serde_json::Error> {
        let record = serde_json::to_value(self)?;
        Ok(crate::validation::evaluate(&record))
    }
}

/// A course together with its derived launch readiness.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub readiness: Readiness,
}

impl CourseSummary {
    pub fn from_course(course: Course) -> Result<Self, serde_json::Error> {
        let readiness = course.readiness()?;
        Ok(Self { course, readiness })
    }
}

/// ISO-8601 date handling for optional date attributes.
///
/// Accepts full RFC 3339 timestamps as well as bare `YYYY-MM-DD` dates
/// (midnight UTC) and always writes RFC 3339 with millisecond precision.
/// Anything that does not parse as a date reads as absent.
pub mod iso_date {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(Value::as_str).and_then(parse))
    }
}

/// Stored attributes of the wrong shape read as their default rather than
/// failing the whole course list. Requests are checked against the schema
/// before they get this far.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
