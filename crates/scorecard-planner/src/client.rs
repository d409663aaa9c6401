//! HTTP client for the planner REST API.
//!
//! [`ApiClient`] covers every route. The editor only needs the three
//! operations of [`ScheduleService`], which tests replace with an in-memory
//! implementation.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, trace};

use scorecard_models::{
    BulkSchedulePatch, InitiativeId, InitiativeUpdate, InitiativeView, NewInitiative, NewTeam,
    PerspectiveId, PerspectiveView, Schedule, ScheduleId, ScheduleInput, SchedulePatch,
    ScheduleView, Team, TeamId, TeamUpdate, TeamView,
};

use crate::error::{PlannerError, Result};

/// Environment variable naming the API base URL.
pub const API_URL_ENV: &str = "SCORECARD_API_URL";

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// The persistence operations the timeline editor depends on.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Perspectives with nested initiatives, schedules and teams.
    async fn fetch_gantt_data(&self) -> Result<Vec<PerspectiveView>>;

    /// Creates or replaces the schedule of `initiative_id`.
    async fn upsert_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: &ScheduleInput,
    ) -> Result<Schedule>;

    async fn delete_schedule(&self, schedule_id: &ScheduleId) -> Result<()>;
}

/// Health check payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct CreateScheduleBody<'a> {
    initiative_id: &'a InitiativeId,
    #[serde(flatten)]
    input: &'a ScheduleInput,
}

/// Client for the planner REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url`, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client from `SCORECARD_API_URL`, falling back to the
    /// local default.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        trace!(%method, %url, "api request");
        self.client.request(method, url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        debug!(status = status.as_u16(), %message, "api error");
        Err(PlannerError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<Health> {
        self.send(self.request(Method::GET, "/health")).await
    }

    pub async fn gantt_data(&self) -> Result<Vec<PerspectiveView>> {
        self.send(self.request(Method::GET, "/gantt-data")).await
    }

    pub async fn list_perspectives(&self) -> Result<Vec<PerspectiveView>> {
        self.send(self.request(Method::GET, "/perspectives")).await
    }

    pub async fn get_perspective(&self, id: &PerspectiveId) -> Result<PerspectiveView> {
        self.send(self.request(Method::GET, &format!("/perspectives/{}", id)))
            .await
    }

    pub async fn list_initiatives(&self) -> Result<Vec<InitiativeView>> {
        self.send(self.request(Method::GET, "/initiatives")).await
    }

    pub async fn get_initiative(&self, id: &InitiativeId) -> Result<InitiativeView> {
        self.send(self.request(Method::GET, &format!("/initiatives/{}", id)))
            .await
    }

    pub async fn create_initiative(&self, new: &NewInitiative) -> Result<InitiativeView> {
        self.send(self.request(Method::POST, "/initiatives").json(new))
            .await
    }

    pub async fn update_initiative(
        &self,
        id: &InitiativeId,
        update: &InitiativeUpdate,
    ) -> Result<InitiativeView> {
        self.send(
            self.request(Method::PUT, &format!("/initiatives/{}", id))
                .json(update),
        )
        .await
    }

    pub async fn delete_initiative(&self, id: &InitiativeId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/initiatives/{}", id)))
            .await
    }

    pub async fn upsert_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: &ScheduleInput,
    ) -> Result<Schedule> {
        self.send(
            self.request(
                Method::PATCH,
                &format!("/initiatives/{}/schedule", initiative_id),
            )
            .json(input),
        )
        .await
    }

    pub async fn list_schedules(&self) -> Result<Vec<ScheduleView>> {
        self.send(self.request(Method::GET, "/schedules")).await
    }

    pub async fn get_schedule(&self, id: &ScheduleId) -> Result<ScheduleView> {
        self.send(self.request(Method::GET, &format!("/schedules/{}", id)))
            .await
    }

    pub async fn create_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: &ScheduleInput,
    ) -> Result<ScheduleView> {
        let body = CreateScheduleBody {
            initiative_id,
            input,
        };
        self.send(self.request(Method::POST, "/schedules").json(&body))
            .await
    }

    pub async fn update_schedule(
        &self,
        id: &ScheduleId,
        patch: &SchedulePatch,
    ) -> Result<ScheduleView> {
        self.send(
            self.request(Method::PUT, &format!("/schedules/{}", id))
                .json(patch),
        )
        .await
    }

    pub async fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/schedules/{}", id)))
            .await
    }

    /// Applies every patch or none.
    pub async fn bulk_update_schedules(
        &self,
        patches: &[BulkSchedulePatch],
    ) -> Result<Vec<Schedule>> {
        self.send(
            self.request(Method::PUT, "/schedules/bulk")
                .json(&json!({ "schedules": patches })),
        )
        .await
    }

    pub async fn list_teams(&self) -> Result<Vec<TeamView>> {
        self.send(self.request(Method::GET, "/teams")).await
    }

    pub async fn get_team(&self, id: &TeamId) -> Result<TeamView> {
        self.send(self.request(Method::GET, &format!("/teams/{}", id)))
            .await
    }

    pub async fn create_team(&self, new: &NewTeam) -> Result<Team> {
        self.send(self.request(Method::POST, "/teams").json(new))
            .await
    }

    pub async fn update_team(&self, id: &TeamId, update: &TeamUpdate) -> Result<Team> {
        self.send(
            self.request(Method::PUT, &format!("/teams/{}", id))
                .json(update),
        )
        .await
    }

    pub async fn delete_team(&self, id: &TeamId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/teams/{}", id)))
            .await
    }
}

#[async_trait]
impl ScheduleService for ApiClient {
    async fn fetch_gantt_data(&self) -> Result<Vec<PerspectiveView>> {
        self.gantt_data().await
    }

    async fn upsert_schedule(
        &self,
        initiative_id: &InitiativeId,
        input: &ScheduleInput,
    ) -> Result<Schedule> {
        ApiClient::upsert_schedule(self, initiative_id, input).await
    }

    async fn delete_schedule(&self, schedule_id: &ScheduleId) -> Result<()> {
        ApiClient::delete_schedule(self, schedule_id).await
    }
}
