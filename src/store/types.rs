use serde::{Deserialize, Serialize};

/// Identity of whoever is driving a call. The surrounding application owns
/// authentication and authorization; this layer only records who acted.
#[derive(Debug, Clone, Deserialize)]
pub struct Caller {
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Tri-state attendance mark. `Unset` is the state of a missing row; rows
/// never rest in the table with this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkStatus {
    Unset,
    Present,
    Absent,
}

impl MarkStatus {
    /// One step of the toggle cycle: Unset -> Present -> Absent -> Unset.
    pub fn advanced(self) -> MarkStatus {
        match self {
            MarkStatus::Unset => MarkStatus::Present,
            MarkStatus::Present => MarkStatus::Absent,
            MarkStatus::Absent => MarkStatus::Unset,
        }
    }

    pub fn as_db(self) -> &'static str {
        match self {
            MarkStatus::Unset => "unset",
            MarkStatus::Present => "present",
            MarkStatus::Absent => "absent",
        }
    }

    pub fn from_db(raw: &str) -> Option<MarkStatus> {
        match raw {
            "unset" => Some(MarkStatus::Unset),
            "present" => Some(MarkStatus::Present),
            "absent" => Some(MarkStatus::Absent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub course_id: String,
    pub full_name: String,
    pub phone: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    pub id: String,
    pub course_id: String,
    pub label: String,
    pub lesson_dates: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub month_id: String,
    pub student_id: String,
    pub lesson_index: i64,
    pub status: MarkStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub id: String,
    pub course_id: String,
    pub user_id: Option<String>,
    pub full_name: String,
    pub age: Option<i64>,
    pub experience: Option<String>,
    pub phone: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub student_count: i64,
    pub month_count: i64,
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_ts() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::MarkStatus;

    #[test]
    fn toggle_cycle_wraps() {
        assert_eq!(MarkStatus::Unset.advanced(), MarkStatus::Present);
        assert_eq!(MarkStatus::Present.advanced(), MarkStatus::Absent);
        assert_eq!(MarkStatus::Absent.advanced(), MarkStatus::Unset);
    }

    #[test]
    fn legacy_sigils_are_not_status_words() {
        assert_eq!(MarkStatus::from_db("+"), None);
        assert_eq!(MarkStatus::from_db("-"), None);
        assert_eq!(MarkStatus::from_db("present"), Some(MarkStatus::Present));
    }
}
