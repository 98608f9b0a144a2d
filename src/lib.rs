//! Attendance back office for a course academy: per-course rosters, monthly
//! lesson schedules, tri-state attendance marks, and the enrollment request
//! queue, all in one SQLite file per workspace. Embed the store directly or
//! drive the `academyd` binary over line-delimited JSON on stdin/stdout.

pub mod backup;
pub mod db;
pub mod ipc;
pub mod logging;
pub mod store;
