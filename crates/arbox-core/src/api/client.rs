//! Typed client for the Arbox REST API.
//!
//! Every public operation first makes sure the session is usable (probe,
//! then log in again if needed) and then issues its own request through the
//! shared transport. Errors from the data call itself propagate unchanged.

use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::{Credential, SessionManager};
use crate::config::{ClientOptions, ConnectionConfig};
use crate::error::{Result, TransportError};
use crate::models::reports::ActivePlanMembersHistory;
use crate::models::{
    leads::DEFAULT_UPDATED_STATUS, ActiveMember, Birthday, BoxStats, ConvertedLead,
    CustomerExtraData, DateRange, EndedMembership, Lead, LeadDetails, LeadSchedule, LessonMember,
    MemberCustomer, MemberProperties, NewLead, NewTask, ScheduleLesson, SearchResult,
    SuspendedUser, Task, TaskPage, Transaction,
};

use super::endpoints::Endpoint;
use super::transport::{RequestDescriptor, Transport};

/// Report flavour requested from the box sales endpoint by default
pub const DEFAULT_SALES_REPORT: &str = "detailedReport";

/// How far back the active-plan-members history looks
const STATS_HISTORY_MONTHS: u32 = 6;

/// Upper bound on the task page walk
const MAX_TASK_PAGES: u32 = 200;

/// API client for a single Arbox box.
/// Clone is cheap, and clones share the session: a login performed through
/// one clone is seen by all of them.
#[derive(Clone)]
pub struct ArboxClient {
    transport: Arc<Transport>,
    session: Arc<SessionManager>,
}

impl ArboxClient {
    /// Create a client. No network I/O happens until the first operation.
    pub fn new(config: ConnectionConfig, options: ClientOptions) -> Result<Self> {
        let credential = Credential::new(config.token.clone());
        let transport = Arc::new(Transport::new(Arc::new(config), options, credential)?);
        let session = Arc::new(SessionManager::new(Arc::clone(&transport)));

        Ok(Self { transport, session })
    }

    /// Build a client from `ACCOUNT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ConnectionConfig::from_env()?, ClientOptions::from_env())
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.transport.config()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Current session token (empty when none has been obtained yet)
    pub fn token(&self) -> String {
        self.session.token()
    }

    pub async fn is_connected(&self) -> bool {
        self.session.is_connected().await
    }

    /// Probe the session and log in again if the token no longer works.
    pub async fn ensure_connection(&self) -> Result<()> {
        self.session.ensure_connection().await?;
        Ok(())
    }

    /// Send an arbitrary request with a verified session.
    pub async fn request(&self, request: RequestDescriptor) -> Result<Value> {
        self.ensure_connection().await?;
        Ok(self.transport.request(request).await?)
    }

    fn descriptor(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<RequestDescriptor, TransportError> {
        let mut url = self.transport.url(&endpoint.path(self.config().box_id));
        if !query.is_empty() {
            url = Url::parse_with_params(&url, query)
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", url, e)))?
                .to_string();
        }
        Ok(RequestDescriptor {
            url,
            method: endpoint.method(),
            body,
        })
    }

    /// Issue one request without touching the session.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T> {
        let request = self.descriptor(&endpoint, query, body)?;
        Ok(self.transport.request_as(request).await?)
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint, body: Option<Value>) -> Result<T> {
        self.ensure_connection().await?;
        self.fetch(endpoint, &[], body).await
    }

    fn to_body<B: Serialize>(body: &B) -> Result<Value> {
        Ok(serde_json::to_value(body).map_err(TransportError::Encode)?)
    }

    fn range_body(range: DateRange) -> Value {
        json!({
            "fromDate": range.from_param(),
            "toDate": range.to_param(),
        })
    }

    // ===== Members =====

    /// Every user and lead of the box, as the server's raw JSON.
    pub async fn get_all_customers(&self) -> Result<Value> {
        self.call(Endpoint::UsersAndLeads, None).await
    }

    pub async fn get_all_active_customers(&self) -> Result<Vec<ActiveMember>> {
        self.call(Endpoint::ActiveMembers, None).await
    }

    pub async fn get_active_users_with_membership(&self) -> Result<Vec<MemberCustomer>> {
        self.call(Endpoint::ActiveUsersWithMembership, None).await
    }

    pub async fn get_ending_memberships(&self, range: DateRange) -> Result<Vec<EndedMembership>> {
        let body = json!({
            "fromDate": range.from_param(),
            "toDate": range.to_param(),
            "ended": true,
        });
        self.call(Endpoint::EndingMemberships, Some(body)).await
    }

    pub async fn get_customers_extra_data(&self) -> Result<Vec<CustomerExtraData>> {
        self.call(Endpoint::CustomersExtraData, None).await
    }

    pub async fn get_birthdays(&self, range: DateRange) -> Result<Vec<Birthday>> {
        self.call(Endpoint::Birthdays, Some(Self::range_body(range))).await
    }

    pub async fn search_by_name(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.call(
            Endpoint::SearchMember {
                query: query.to_string(),
            },
            None,
        )
        .await
    }

    pub async fn get_members_properties(&self) -> Result<Vec<MemberProperties>> {
        self.call(Endpoint::MembersProperties, None).await
    }

    pub async fn get_suspended_users(&self, range: DateRange) -> Result<Vec<SuspendedUser>> {
        self.call(
            Endpoint::SuspendedUsers {
                from: range.from,
                to: range.to,
            },
            None,
        )
        .await
    }

    // ===== Leads =====

    pub async fn get_open_leads(&self) -> Result<Vec<Lead>> {
        self.call(Endpoint::OpenLeads, None).await
    }

    pub async fn get_converted_leads(&self, range: DateRange) -> Result<Vec<ConvertedLead>> {
        self.call(Endpoint::ConvertedLeads, Some(Self::range_body(range)))
            .await
    }

    pub async fn get_lead(&self, lead_id: i64) -> Result<LeadDetails> {
        self.call(Endpoint::Lead { id: lead_id }, None).await
    }

    /// Create a lead. An unset location defaults to the box itself.
    pub async fn add_lead(&self, lead: NewLead) -> Result<Value> {
        let box_id = self.config().box_id;
        let lead = NewLead {
            location_box_fk: lead.location_box_fk.or(Some(box_id)),
            ..lead
        };
        let body = Self::to_body(&lead)?;
        self.call(Endpoint::AddLead, Some(body)).await
    }

    /// Move a lead to another status. `None` uses the panel's default status.
    pub async fn update_lead_status(
        &self,
        lead_id: i64,
        comment: &str,
        new_status: Option<&str>,
    ) -> Result<Lead> {
        let body = json!({
            "boxId": self.config().box_id,
            "comment": comment,
            "leadId": lead_id,
            "newStatus": new_status.unwrap_or(DEFAULT_UPDATED_STATUS),
        });
        self.call(Endpoint::UpdateLeadStatus { id: lead_id }, Some(body))
            .await
    }

    pub async fn get_lead_tasks(&self, lead_id: i64) -> Result<Vec<Task>> {
        self.call(Endpoint::LeadTasks { id: lead_id }, None).await
    }

    /// Lessons the lead attended or is booked into.
    pub async fn get_lead_schedule(&self, lead_id: i64) -> Result<Vec<LeadSchedule>> {
        self.call(Endpoint::LeadSchedules { id: lead_id }, None).await
    }

    // ===== Tasks =====

    pub async fn add_user_task(&self, task: &NewTask) -> Result<Value> {
        let body = Self::to_body(&task.to_body(self.config().box_id, Utc::now()))?;
        self.call(Endpoint::AddTask, Some(body)).await
    }

    /// All tasks in the range, walking pages until the server returns an empty one.
    pub async fn get_all_tasks(&self, range: DateRange) -> Result<TaskPage> {
        self.ensure_connection().await?;

        let body = json!({
            "fromDate": range.from_param(),
            "toDate": range.to_param(),
            "tabType": "allTasks",
            "filterByTask": null,
            "filterByLocationBox": null,
        });

        let mut all = TaskPage::default();
        let mut previous_ids: Vec<i64> = Vec::new();
        for page in 1..=MAX_TASK_PAGES {
            let results: TaskPage = self
                .fetch(
                    Endpoint::TasksBetweenDates,
                    &[("page", page.to_string())],
                    Some(body.clone()),
                )
                .await?;
            if results.all_tasks.is_empty() {
                return Ok(all);
            }

            let ids: Vec<i64> = results.all_tasks.iter().map(|t| t.id).collect();
            if ids == previous_ids {
                warn!(page, "Task page repeats the previous one, stopping");
                return Ok(all);
            }
            debug!(page, count = ids.len(), "Fetched task page");
            all.all_tasks.extend(results.all_tasks);
            previous_ids = ids;
        }
        Err(TransportError::TooManyPages(MAX_TASK_PAGES).into())
    }

    // ===== Schedule =====

    /// Lessons scheduled at the configured location within the range.
    pub async fn get_schedule(&self, range: DateRange) -> Result<Vec<ScheduleLesson>> {
        self.ensure_connection().await?;
        let query = [
            ("fromDate", range.from_param()),
            ("toDate", range.to_param()),
            ("location", self.config().location_id.to_string()),
        ];
        self.fetch(Endpoint::RangeSchedule, &query, None).await
    }

    pub async fn get_lesson_members(&self, lesson_id: i64) -> Result<Vec<LessonMember>> {
        self.call(Endpoint::LessonMembers { id: lesson_id }, None).await
    }

    // ===== Reports =====

    pub async fn get_transactions(&self, range: DateRange) -> Result<Vec<Transaction>> {
        self.call(Endpoint::Transactions, Some(Self::range_body(range)))
            .await
    }

    /// Sales report in the requested flavour (see [`DEFAULT_SALES_REPORT`]).
    pub async fn get_box_sales(&self, range: DateRange, report_type: &str) -> Result<Value> {
        let body = json!({
            "from_date": range.from_param(),
            "to_date": range.to_param(),
            "report_type": report_type,
        });
        self.call(Endpoint::BoxSales, Some(body)).await
    }

    /// Members in debt and active-plan members, fetched concurrently.
    pub async fn get_stats(&self) -> Result<BoxStats> {
        self.ensure_connection().await?;

        let history = DateRange::last_months(STATS_HISTORY_MONTHS);
        let history_query = [
            ("to_date", history.to_param()),
            ("from_date", history.from_param()),
        ];

        let (debt_count, active): (i64, ActivePlanMembersHistory) = futures::try_join!(
            self.fetch(Endpoint::MembersDebts, &[], None),
            self.fetch(Endpoint::ActivePlanMembersHistory, &history_query, None),
        )?;

        Ok(BoxStats {
            active_plan_members_count: active.recent,
            debt_count,
        })
    }
}
