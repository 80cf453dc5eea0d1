use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row of the active-members detailed report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveMember {
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub membership_type: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A customer together with their current membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCustomer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub membership_user: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A membership that ended within the queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndedMembership {
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub membership_type: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Custom fields attached to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerExtraData {
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Birthday {
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hit from the member search box. Matches both members and leads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn is_lead(&self) -> bool {
        self.kind.as_deref() == Some("lead")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_search_results() {
        let results: Vec<SearchResult> = serde_json::from_value(json!([
            {"id": 1, "first_name": "Avi", "last_name": "Levi", "type": "user"},
            {"id": 2, "first_name": "Noa", "type": "lead", "phone": "050"}
        ]))
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(!results[0].is_lead());
        assert!(results[1].is_lead());
        assert_eq!(results[1].phone.as_deref(), Some("050"));
    }

    #[test]
    fn test_extra_data_collects_all_fields() {
        let row: CustomerExtraData = serde_json::from_value(json!({
            "user_fk": 55,
            "shirt_size": "M",
            "referred_by": null
        }))
        .unwrap();
        assert_eq!(row.user_fk, Some(55));
        assert_eq!(row.fields.len(), 2);
    }
}
