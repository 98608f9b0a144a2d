pub mod attendance;
pub mod backup;
pub mod core;
pub mod courses;
pub mod enroll;
pub mod months;
pub mod roster;
