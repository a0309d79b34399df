pub mod labels;
pub mod readiness;
pub mod schema;

pub use readiness::{
    Readiness, Requirement, compute_missing_fields, evaluate, is_ready_for_launch,
    missing_requirements,
};
pub use schema::{COURSE_SCHEMA, FieldError, Mode};
