pub mod courses;
pub mod enroll;
mod error;
pub mod ledger;
pub mod roster;
pub mod schedule;
mod types;
pub mod view;

pub use error::StoreError;
pub use types::{
    AttendanceRecord, Caller, CourseSummary, EnrollmentRequest, MarkStatus, Month, Student,
};

/// Hard cap on students per course roster.
pub const MAX_ROSTER_SIZE: usize = 25;
/// Hard cap on lesson dates per attendance month.
pub const MAX_LESSON_DATES: usize = 13;
