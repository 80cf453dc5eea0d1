use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row of the global transactions report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-member checkbox properties (waiver, medical certificate, ...).
/// Flags arrive as 0/1 integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProperties {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub medical_cert: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub allow_sms: Option<String>,
    #[serde(default)]
    pub allow_mailing_list: Option<String>,
    #[serde(default)]
    pub has_waiver: Option<i64>,
    #[serde(default)]
    pub restricted: Option<i64>,
    #[serde(default)]
    pub has_insurance: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub epidemic_statement: Option<i64>,
    #[serde(default, rename = "membershipId")]
    pub membership_id: Option<i64>,
    #[serde(default)]
    pub membership_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemberProperties {
    pub fn has_waiver(&self) -> bool {
        self.has_waiver.unwrap_or(0) != 0
    }

    pub fn has_medical_cert(&self) -> bool {
        self.medical_cert.unwrap_or(0) != 0
    }
}

/// A membership on hold during the queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendedUser {
    pub id: i64,
    #[serde(default)]
    pub membership_user_fk: Option<i64>,
    #[serde(default)]
    pub user_fk: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub total_days: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_box_fk: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Membership type name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub start_membership: Option<String>,
    #[serde(default)]
    pub end_membership: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_per_day: Option<f64>,
    #[serde(default)]
    pub price_per_month: Option<f64>,
    #[serde(default)]
    pub hold_value: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub active_plan_members_count: i64,
    pub debt_count: i64,
}

/// Shape of the active-plan-members history endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ActivePlanMembersHistory {
    pub recent: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_member_properties() {
        let json = json!({
            "id": 1, "email": "a@b.c", "first_name": "Avi", "last_name": "Levi",
            "user_fk": 77, "medical_cert": 1, "phone": "050", "allow_sms": "yes",
            "allow_mailing_list": "no", "has_waiver": 0, "restricted": 0,
            "has_basics_workshop": 1, "has_nutrition_counseling": 0,
            "has_professional_meeting": 0, "has_insurance": 1, "location": "Main",
            "epidemic_statement": 0, "membershipId": 900, "membership_type": "Monthly"
        });
        let props: MemberProperties = serde_json::from_value(json).unwrap();
        assert!(props.has_medical_cert());
        assert!(!props.has_waiver());
        assert_eq!(props.membership_id, Some(900));
        assert_eq!(props.extra["has_basics_workshop"], 1);
    }

    #[test]
    fn test_parse_suspended_user() {
        let json = json!({
            "id": 5, "membership_user_fk": 6, "box_fk": 226, "user_fk": 7,
            "start_date": "2021-10-01", "end_date": "2021-10-15", "total_days": 14,
            "status": "active", "suspend_reason_fk": null, "comment": "",
            "created_at": "2021-09-30 10:00:00", "updated_at": "2021-09-30 10:00:00",
            "deleted_at": null, "location": "Main", "location_box_fk": 282,
            "first_name": "Noa", "last_name": "Bar", "address": null, "phone": "050",
            "rivhit_customer_id": "", "type": "plan", "name": "Unlimited",
            "mt_price": 450, "period_time_unit": "month", "period_amount": 1,
            "is_recurring_payment": 1, "start_membership": "2021-01-01",
            "end_membership": "2021-12-31", "price": 450, "suspend_reason": null,
            "amount": 1, "membership_days": 365, "price_per_day": 1.23,
            "price_per_month": 450, "hold_value": 17.2
        });
        let user: SuspendedUser = serde_json::from_value(json).unwrap();
        assert_eq!(user.total_days, Some(14));
        assert_eq!(user.kind.as_deref(), Some("plan"));
        assert!((user.price_per_day.unwrap() - 1.23).abs() < f64::EPSILON);
        assert_eq!(user.extra["box_fk"], 226);
        assert_eq!(user.extra["mt_price"], 450);
    }

    #[test]
    fn test_sparse_report_rows_parse() {
        let props: MemberProperties = serde_json::from_value(json!({
            "id": 2, "first_name": null, "phone": null, "has_waiver": 1
        }))
        .unwrap();
        assert!(props.has_waiver());
        assert!(!props.has_medical_cert());
        assert_eq!(props.first_name, None);

        let user: SuspendedUser =
            serde_json::from_value(json!({"id": 3, "first_name": null, "price": null})).unwrap();
        assert_eq!(user.first_name, None);
        assert_eq!(user.price, None);
    }
}
