//! Every remote endpoint the client talks to, as data.
//!
//! Paths are relative to the API base URL. Query strings are appended by
//! the caller since they carry per-call values.

use chrono::NaiveDate;
use reqwest::Method;

use crate::models::format_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Cheap authenticated call used to probe the session
    Notifications { page: u32 },
    Login { email: String },
    UsersAndLeads,
    ActiveMembers,
    ActiveUsersWithMembership,
    EndingMemberships,
    CustomersExtraData,
    OpenLeads,
    ConvertedLeads,
    Transactions,
    BoxSales,
    AddLead,
    Lead { id: i64 },
    LeadTasks { id: i64 },
    LeadSchedules { id: i64 },
    UpdateLeadStatus { id: i64 },
    AddTask,
    TasksBetweenDates,
    Birthdays,
    RangeSchedule,
    LessonMembers { id: i64 },
    SearchMember { query: String },
    MembersProperties,
    SuspendedUsers { from: NaiveDate, to: NaiveDate },
    MembersDebts,
    ActivePlanMembersHistory,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        use Endpoint::*;
        match self {
            Notifications { .. }
            | UsersAndLeads
            | ActiveMembers
            | ActiveUsersWithMembership
            | OpenLeads
            | Lead { .. }
            | LeadTasks { .. }
            | RangeSchedule
            | LessonMembers { .. }
            | SearchMember { .. }
            | SuspendedUsers { .. }
            | MembersDebts
            | ActivePlanMembersHistory => Method::GET,

            Login { .. }
            | EndingMemberships
            | CustomersExtraData
            | ConvertedLeads
            | Transactions
            | BoxSales
            | AddLead
            | LeadSchedules { .. }
            | UpdateLeadStatus { .. }
            | AddTask
            | TasksBetweenDates
            | Birthdays
            | MembersProperties => Method::POST,
        }
    }

    /// Path relative to the API base, filled in for `box_id`.
    pub fn path(&self, box_id: i64) -> String {
        use Endpoint::*;
        match self {
            Notifications { page } => format!("notifications/byBox/{}?page={}", box_id, page),
            Login { email } => format!("user/{}/session", urlencoding::encode(email)),
            UsersAndLeads => format!("box/{}/getUsersAndLeadsJson", box_id),
            ActiveMembers => format!("box/{}/activeMembers/detailedReport/null", box_id),
            ActiveUsersWithMembership => format!("box/{}/getActiveUsersWithMembership", box_id),
            EndingMemberships => format!("user/getEndingMembership/{}", box_id),
            CustomersExtraData => format!("user/{}/extraData/", box_id),
            OpenLeads => format!("box/{}/openLeads/null", box_id),
            ConvertedLeads => format!("lead/getLeadConverted/{}", box_id),
            Transactions => "reports/global/transactions".to_string(),
            BoxSales => "reports/getBoxSales".to_string(),
            AddLead => format!("lead/{}", box_id),
            Lead { id } => format!("lead/getById/{}", id),
            LeadTasks { id } => format!("tasks/{}/lead/{}", box_id, id),
            LeadSchedules { id } => format!("lead/{}/schedules", id),
            UpdateLeadStatus { id } => format!("lead/updateStatus/{}", id),
            AddTask => "tasks".to_string(),
            TasksBetweenDates => format!("tasks/{}/betweenDates/1", box_id),
            Birthdays => format!("user/GetTodayBirthdays/{}", box_id),
            RangeSchedule => format!("rangeSchedule/{}", box_id),
            LessonMembers { id } => format!("schedule/{}/members", id),
            SearchMember { query } => format!("searchForMember/{}", urlencoding::encode(query)),
            MembersProperties => format!("box/{}/checkboxesUserBox", box_id),
            SuspendedUsers { from, to } => format!(
                "user/getSuspendedUsers/{}/{}/{}/null",
                box_id,
                format_date(*from),
                format_date(*to)
            ),
            MembersDebts => format!("box/{}/dashboard/getStats/getMembersDebtsByBox", box_id),
            ActivePlanMembersHistory => format!(
                "box/{}/dashboard/getStats/getActivePlanMembers/history",
                box_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_and_login_paths() {
        assert_eq!(
            Endpoint::Notifications { page: 1 }.path(226),
            "notifications/byBox/226?page=1"
        );
        assert_eq!(Endpoint::Notifications { page: 1 }.method(), Method::GET);

        let login = Endpoint::Login { email: "owner@example.com".into() };
        assert_eq!(login.path(226), "user/owner%40example.com/session");
        assert_eq!(login.method(), Method::POST);

        let login = Endpoint::Login { email: "a/b c@example.com".into() };
        assert_eq!(login.path(226), "user/a%2Fb%20c%40example.com/session");
    }

    #[test]
    fn test_box_scoped_paths() {
        assert_eq!(Endpoint::OpenLeads.path(42), "box/42/openLeads/null");
        assert_eq!(Endpoint::LeadTasks { id: 7 }.path(42), "tasks/42/lead/7");
        assert_eq!(Endpoint::TasksBetweenDates.path(42), "tasks/42/betweenDates/1");
        assert_eq!(Endpoint::Transactions.path(42), "reports/global/transactions");
        assert_eq!(Endpoint::LeadSchedules { id: 9 }.method(), Method::POST);
        assert_eq!(Endpoint::Lead { id: 9 }.method(), Method::GET);
    }

    #[test]
    fn test_search_query_is_encoded() {
        let endpoint = Endpoint::SearchMember { query: "דנה כהן/1".into() };
        let path = endpoint.path(1);
        assert!(path.starts_with("searchForMember/"));
        assert!(!path["searchForMember/".len()..].contains('/'));
        assert!(!path.contains(' '));
    }

    #[test]
    fn test_suspended_users_path() {
        let endpoint = Endpoint::SuspendedUsers {
            from: NaiveDate::from_ymd_opt(2021, 10, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2021, 10, 31).unwrap(),
        };
        assert_eq!(
            endpoint.path(226),
            "user/getSuspendedUsers/226/2021-10-01/2021-10-31/null"
        );
    }
}
