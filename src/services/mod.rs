pub mod course_service;
pub mod dashboard;
pub mod id_generator;
pub mod scheduler;

pub use course_service::CourseService;
pub use dashboard::{ListQuery, SortKey};
pub use id_generator::IdGenerator;
pub use scheduler::RefreshScheduler;
