pub mod course;

pub use course::{
    Course, CourseId, CourseSummary, CourseType, HomePageOption, NewCourseRequest,
    UpdateCourseRequest, fields,
};
