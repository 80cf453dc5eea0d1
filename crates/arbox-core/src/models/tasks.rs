use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp format the tasks endpoints expect (minute precision, UTC)
const TASK_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:00.000Z";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub done: Option<i64>,
    #[serde(default, rename = "reminderTime", alias = "reminder_time")]
    pub reminder_time: Option<String>,
    #[serde(default, rename = "targetableId", alias = "targetable_id")]
    pub targetable_id: Option<i64>,
    #[serde(default, rename = "targetableType", alias = "targetable_type")]
    pub targetable_type: Option<String>,
    #[serde(default, rename = "taskType", alias = "task_type")]
    pub task_type: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(0) != 0
    }
}

/// One page of the tasks-between-dates listing, or all pages merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPage {
    #[serde(rename = "allTasks", default)]
    pub all_tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskTarget {
    #[default]
    User,
    Lead,
}

/// A follow-up task to create.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub target: TaskTarget,
    pub target_id: i64,
    pub description: String,
    /// Task type object as returned by the box's task-type list
    pub task_type: Value,
    pub reminder: DateTime<Utc>,
    /// Staff user owning the task; unset lets the server pick the caller
    pub owner_user_id: Option<i64>,
    pub system_user: Option<Value>,
}

impl NewTask {
    pub fn for_user(
        user_id: i64,
        description: impl Into<String>,
        task_type: Value,
        reminder: DateTime<Utc>,
    ) -> Self {
        Self {
            target: TaskTarget::User,
            target_id: user_id,
            description: description.into(),
            task_type,
            reminder,
            owner_user_id: None,
            system_user: None,
        }
    }

    pub fn owner(mut self, owner_user_id: i64) -> Self {
        self.owner_user_id = Some(owner_user_id);
        self
    }

    /// Wire body for `POST tasks`.
    pub fn to_body(&self, box_id: i64, now: DateTime<Utc>) -> TaskBody<'_> {
        let reminder_time = self.reminder.format(TASK_TIME_FORMAT).to_string();
        TaskBody {
            system_user: self.system_user.as_ref(),
            box_fk: box_id,
            description: &self.description,
            done: 0,
            done_time: None,
            is_notified: 0,
            reminder_date: now.format(TASK_TIME_FORMAT).to_string(),
            reminder: Reminder {
                reminder_date: reminder_time.clone(),
            },
            targetable_id: self.target_id,
            targetable_type: self.target,
            task_type: &self.task_type,
            reminder_time,
            task_owner_user_fk: self.owner_user_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_user: Option<&'a Value>,
    box_fk: i64,
    description: &'a str,
    done: u8,
    done_time: Option<String>,
    is_notified: u8,
    reminder_date: String,
    reminder: Reminder,
    targetable_id: i64,
    targetable_type: TaskTarget,
    task_type: &'a Value,
    reminder_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_owner_user_fk: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminder {
    reminder_date: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_task_body() {
        let reminder = Utc.with_ymd_and_hms(2021, 10, 5, 9, 45, 12).unwrap();
        let now = Utc.with_ymd_and_hms(2021, 10, 1, 8, 3, 59).unwrap();
        let task = NewTask::for_user(42, "Call about renewal", json!({"id": 3}), reminder).owner(56841);

        let body = serde_json::to_value(task.to_body(226, now)).unwrap();
        assert_eq!(body["boxFk"], 226);
        assert_eq!(body["targetableId"], 42);
        assert_eq!(body["targetableType"], "user");
        assert_eq!(body["done"], 0);
        assert_eq!(body["doneTime"], Value::Null);
        assert_eq!(body["reminderDate"], "2021-10-01T08:03:00.000Z");
        assert_eq!(body["reminderTime"], "2021-10-05T09:45:00.000Z");
        assert_eq!(body["reminder"]["reminderDate"], "2021-10-05T09:45:00.000Z");
        assert_eq!(body["taskOwnerUserFk"], 56841);
        assert!(body.get("systemUser").is_none());
    }

    #[test]
    fn test_parse_task_page() {
        let page: TaskPage = serde_json::from_value(json!({
            "allTasks": [
                {"id": 1, "description": "Follow up", "done": 0, "targetableType": "user"},
                {"id": 2, "done": 1}
            ]
        }))
        .unwrap();
        assert_eq!(page.all_tasks.len(), 2);
        assert!(!page.all_tasks[0].is_done());
        assert!(page.all_tasks[1].is_done());

        let empty: TaskPage = serde_json::from_value(json!({})).unwrap();
        assert!(empty.all_tasks.is_empty());
    }
}
