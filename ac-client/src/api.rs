//! Backend gateway
//!
//! Every backend call the desk makes. [`Gateway`] is the seam the desk
//! shell depends on; [`GatewayClient`] is the HTTP implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use shared::client::{LoginRequest, LoginResponse, PasswordUpdate, RegisterRequest};
use shared::models::{
    AccessGroup, NewReport, Report, ReportFilter, ReportSolutionUpdate, ReportStatus,
    ReportStatusUpdate, User,
};
use shared::response::ResponseStatus;
use shared::types::{ReportId, UserId};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{NetworkHttpClient, accept, accept_data};
use crate::session::SharedSession;
use crate::token::decode_claims;

/// Partial-update body: field name → new value (`null` clears)
pub type PatchBody = Map<String, Value>;

/// What a successful login established
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: String,
    pub groups: Vec<String>,
}

/// Backend operations used by the desk
#[async_trait]
pub trait Gateway: Send + Sync {
    /// The session this gateway authenticates with
    fn session(&self) -> &SharedSession;

    // ========== Auth ==========
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome>;
    async fn register(&self, username: &str, password: &str) -> ClientResult<()>;
    async fn update_password(&self, user_id: UserId, new_password: &str) -> ClientResult<()>;

    /// Local only: the backend keeps no session state.
    fn logout(&self) {
        self.session().logout();
        tracing::info!("Logged out");
    }

    // ========== Reports ==========
    async fn list_reports(&self) -> ClientResult<Vec<Report>>;
    async fn create_report(&self, report: &NewReport) -> ClientResult<()>;
    async fn filter_reports(&self, filter: &ReportFilter) -> ClientResult<Vec<Report>>;
    async fn get_report(&self, id: ReportId) -> ClientResult<Report>;
    async fn update_report(&self, id: ReportId, changes: &PatchBody) -> ClientResult<()>;
    async fn set_report_status(&self, id: ReportId, status: ReportStatus) -> ClientResult<()>;
    async fn save_report_solution(&self, id: ReportId, solution: &str) -> ClientResult<()>;
    async fn assign_report(&self, id: ReportId, agent_id: UserId) -> ClientResult<()>;

    // ========== Users ==========
    async fn list_users(&self) -> ClientResult<Vec<User>>;
    async fn list_agents(&self) -> ClientResult<Vec<User>>;
    async fn update_user(&self, id: UserId, changes: &PatchBody) -> ClientResult<()>;
    async fn delete_user(&self, id: UserId) -> ClientResult<()>;

    // ========== Access groups ==========
    async fn list_access_groups(&self) -> ClientResult<Vec<AccessGroup>>;
}

/// HTTP implementation of [`Gateway`]
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: NetworkHttpClient,
}

impl GatewayClient {
    pub fn new(config: &ClientConfig, session: SharedSession) -> ClientResult<Self> {
        Ok(Self {
            http: NetworkHttpClient::new(config, session)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn get_list<T: serde::de::DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let request = self.http.authorized(Method::GET, path)?;
        let envelope = self.http.fetch::<Vec<T>>(request).await?;
        accept_data(envelope, &[ResponseStatus::Ok], path)
    }

    async fn put_report(&self, id: ReportId, body: &impl serde::Serialize) -> ClientResult<()> {
        let request = self
            .http
            .authorized(Method::PUT, &format!("/api/reports/{}", id))?
            .json(body);
        let envelope = self.http.fetch::<Value>(request).await?;
        accept(envelope, &[ResponseStatus::Ok]).map(|_| ())
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    fn session(&self) -> &SharedSession {
        self.http.session()
    }

    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.http.public(Method::POST, "/api/auth/login").json(&body);
        let envelope = self.http.fetch::<LoginResponse>(request).await?;
        let data = accept_data(envelope, &[ResponseStatus::Ok], "login")?;

        let claims = decode_claims(&data.token)?;
        let outcome = LoginOutcome {
            username: claims.sub.clone(),
            groups: claims.group_names(),
        };
        self.http
            .session()
            .login(data.token, claims.sub, outcome.groups.clone());

        tracing::info!(username = %outcome.username, groups = ?outcome.groups, "Logged in");
        Ok(outcome)
    }

    async fn register(&self, username: &str, password: &str) -> ClientResult<()> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self
            .http
            .authorized(Method::POST, "/api/auth/register")?
            .json(&body);
        self.http.execute(request).await?;
        tracing::info!(username, "User registered");
        Ok(())
    }

    async fn update_password(&self, user_id: UserId, new_password: &str) -> ClientResult<()> {
        let body = PasswordUpdate {
            new_password: new_password.to_string(),
        };
        let request = self
            .http
            .authorized(Method::PUT, &format!("/api/auth/update-password/{}", user_id))?
            .json(&body);
        self.http.execute(request).await?;
        tracing::info!(user_id, "Password updated");
        Ok(())
    }

    async fn list_reports(&self) -> ClientResult<Vec<Report>> {
        self.get_list("/api/reports").await
    }

    async fn create_report(&self, report: &NewReport) -> ClientResult<()> {
        let request = self.http.authorized(Method::POST, "/api/reports")?.json(report);
        let envelope = self.http.fetch::<Value>(request).await?;
        accept(envelope, &[ResponseStatus::Created])?;
        tracing::info!(incident_date = %report.incident_date, "Report submitted");
        Ok(())
    }

    async fn filter_reports(&self, filter: &ReportFilter) -> ClientResult<Vec<Report>> {
        let request = self
            .http
            .authorized(Method::GET, "/api/reports/filter")?
            .query(&filter.to_query_pairs());
        let envelope = self.http.fetch::<Vec<Report>>(request).await?;
        accept_data(envelope, &[ResponseStatus::Ok], "filtered reports")
    }

    async fn get_report(&self, id: ReportId) -> ClientResult<Report> {
        let request = self
            .http
            .authorized(Method::GET, &format!("/api/reports/{}", id))?;
        let envelope = self.http.fetch::<Report>(request).await?;
        accept_data(envelope, &[ResponseStatus::Ok], "report")
    }

    async fn update_report(&self, id: ReportId, changes: &PatchBody) -> ClientResult<()> {
        if changes.is_empty() {
            return Err(ClientError::EmptyUpdate);
        }
        self.put_report(id, changes).await
    }

    async fn set_report_status(&self, id: ReportId, status: ReportStatus) -> ClientResult<()> {
        tracing::info!(report_id = id, %status, "Updating report status");
        self.put_report(id, &ReportStatusUpdate { status }).await
    }

    async fn save_report_solution(&self, id: ReportId, solution: &str) -> ClientResult<()> {
        tracing::info!(report_id = id, "Saving report solution");
        self.put_report(
            id,
            &ReportSolutionUpdate {
                solution: solution.to_string(),
            },
        )
        .await
    }

    async fn assign_report(&self, id: ReportId, agent_id: UserId) -> ClientResult<()> {
        let request = self
            .http
            .authorized(Method::PATCH, &format!("/api/reports/{}/assign", id))?
            .query(&[("assignedTo", agent_id)]);
        let envelope = self.http.fetch::<Value>(request).await?;
        accept(envelope, &[ResponseStatus::Ok])?;
        tracing::info!(report_id = id, agent_id, "Agent assigned");
        Ok(())
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get_list("/api/users").await
    }

    async fn list_agents(&self) -> ClientResult<Vec<User>> {
        self.get_list("/api/users/get-agents").await
    }

    async fn update_user(&self, id: UserId, changes: &PatchBody) -> ClientResult<()> {
        if changes.is_empty() {
            return Err(ClientError::EmptyUpdate);
        }
        let request = self
            .http
            .authorized(Method::PUT, &format!("/api/users/update/{}", id))?
            .json(changes);
        self.http.execute(request).await?;
        tracing::info!(user_id = id, fields = ?changes.keys().collect::<Vec<_>>(), "User updated");
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        let request = self
            .http
            .authorized(Method::DELETE, &format!("/api/users/delete/{}", id))?;
        self.http.execute(request).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn list_access_groups(&self) -> ClientResult<Vec<AccessGroup>> {
        self.get_list("/api/access-groups").await
    }
}
