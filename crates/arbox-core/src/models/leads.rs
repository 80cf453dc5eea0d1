use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lead status assigned to newly created leads
pub const DEFAULT_LEAD_STATUS: i64 = 1623;

/// Lead source assigned to newly created leads
pub const DEFAULT_LEAD_SOURCE: i64 = 1145;

/// Status a lead is moved to when none is given
pub const DEFAULT_UPDATED_STATUS: &str = "1629";

const PLACEHOLDER_EMAIL: &str = "none@none.com";

/// A lead as listed by the open-leads endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status_fk: Option<i64>,
    #[serde(default)]
    pub source_fk: Option<i64>,
    #[serde(default)]
    pub location_box_fk: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// A single lead with its status and source names resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDetails {
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
}

/// A lead that became a member within the queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedLead {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub converted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating a lead.
#[derive(Debug, Clone, Serialize)]
pub struct NewLead {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub comment: String,
    pub status: i64,
    pub source: i64,
    /// Location the lead belongs to; the client fills in the box id when unset
    #[serde(rename = "locationBoxFk")]
    pub location_box_fk: Option<i64>,
    pub allow_mailing_list: String,
    pub allow_sms: String,
}

impl NewLead {
    /// A lead with the defaults the web panel uses for manual entry.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: PLACEHOLDER_EMAIL.to_string(),
            comment: format!("created at {}", Local::now().to_rfc3339()),
            status: DEFAULT_LEAD_STATUS,
            source: DEFAULT_LEAD_SOURCE,
            location_box_fk: None,
            allow_mailing_list: "unknown".to_string(),
            allow_sms: "unknown".to_string(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    pub fn source(mut self, source: i64) -> Self {
        self.source = source;
        self
    }

    pub fn location(mut self, location_box_fk: i64) -> Self {
        self.location_box_fk = Some(location_box_fk);
        self
    }
}
