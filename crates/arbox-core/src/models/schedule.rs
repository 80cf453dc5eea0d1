use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A class slot in the box schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLesson {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub max_users: Option<i64>,
    #[serde(default)]
    pub registered: Option<i64>,
    #[serde(default)]
    pub coach_fk: Option<i64>,
    #[serde(default)]
    pub box_category_fk: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleLesson {
    /// Free spots, when the server reports both capacity and registrations.
    pub fn spots_left(&self) -> Option<i64> {
        match (self.max_users, self.registered) {
            (Some(max), Some(registered)) => Some((max - registered).max(0)),
            _ => None,
        }
    }
}

/// Someone booked into a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonMember {
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub checked_in: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A lesson a lead attended or is booked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSchedule {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub schedule_fk: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub checked_in: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
