// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP client for the daystreak REST API.

use async_trait::async_trait;
use chrono::NaiveDate;
use daystreak_core::model::{
    DayRange, DaysResponse, NewBlock, NewReminder, NewTask, OkResponse, RemindersResponse,
    RenameBlock, TaskPatch, date_key,
};
use daystreak_core::{Day, DayMap, Reminder, Stats, StatsPeriod};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::api::TrackerApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Header carrying the caller's identity.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" when the server is up.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Client for one user of a daystreak server.
pub struct DaystreakClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl DaystreakClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check server health. Needs no identity.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http
            .get(format!("{}/health", self.config.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/api{}", self.config.base_url, path))
            .header(USER_ID_HEADER, &self.config.user_id)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        Self::decode(response).await
    }

    async fn send_ok(&self, builder: RequestBuilder) -> Result<()> {
        let _: OkResponse = self.send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl TrackerApi for DaystreakClient {
    #[instrument(skip(self))]
    async fn get_day(&self, date: NaiveDate) -> Result<Day> {
        debug!("Fetching day");
        self.send(self.request(Method::GET, &format!("/days/{}", date_key(date))))
            .await
    }

    #[instrument(skip(self))]
    async fn list_days(&self, range: DayRange) -> Result<DayMap> {
        let response: DaysResponse = self
            .send(self.request(Method::GET, "/days").query(&range))
            .await?;
        debug!(count = response.days.len(), "Fetched days");
        Ok(response.days)
    }

    #[instrument(skip(self, block), fields(block_id = %block.id))]
    async fn add_block(&self, date: NaiveDate, block: &NewBlock) -> Result<()> {
        self.send_ok(
            self.request(Method::POST, &format!("/days/{}/blocks", date_key(date)))
                .json(block),
        )
        .await
    }

    #[instrument(skip(self, name))]
    async fn rename_block(&self, date: NaiveDate, block_id: &str, name: &str) -> Result<()> {
        self.send_ok(
            self.request(
                Method::PATCH,
                &format!("/days/{}/blocks/{}", date_key(date), block_id),
            )
            .json(&RenameBlock {
                name: name.to_string(),
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_block(&self, date: NaiveDate, block_id: &str) -> Result<()> {
        self.send_ok(self.request(
            Method::DELETE,
            &format!("/days/{}/blocks/{}", date_key(date), block_id),
        ))
        .await
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn add_task(&self, date: NaiveDate, block_id: &str, task: &NewTask) -> Result<()> {
        self.send_ok(
            self.request(
                Method::POST,
                &format!("/days/{}/blocks/{}/tasks", date_key(date), block_id),
            )
            .json(task),
        )
        .await
    }

    #[instrument(skip(self, patch))]
    async fn update_task(&self, date: NaiveDate, task_id: &str, patch: &TaskPatch) -> Result<()> {
        self.send_ok(
            self.request(
                Method::PATCH,
                &format!("/days/{}/tasks/{}", date_key(date), task_id),
            )
            .json(patch),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, date: NaiveDate, task_id: &str) -> Result<()> {
        self.send_ok(self.request(
            Method::DELETE,
            &format!("/days/{}/tasks/{}", date_key(date), task_id),
        ))
        .await
    }

    #[instrument(skip(self))]
    async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let response: RemindersResponse =
            self.send(self.request(Method::GET, "/reminders")).await?;
        Ok(response.reminders)
    }

    #[instrument(skip(self, reminder), fields(reminder_id = %reminder.id))]
    async fn add_reminder(&self, reminder: &NewReminder) -> Result<()> {
        self.send_ok(self.request(Method::POST, "/reminders").json(reminder))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_reminder(&self, reminder_id: &str) -> Result<()> {
        self.send_ok(self.request(Method::DELETE, &format!("/reminders/{}", reminder_id)))
            .await
    }

    #[instrument(skip(self))]
    async fn stats(&self, period: StatsPeriod) -> Result<Stats> {
        self.send(
            self.request(Method::GET, "/stats")
                .query(&[("period", period.to_string())]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DaystreakClient {
        DaystreakClient::new(ClientConfig::new("alice").with_base_url(server.uri())).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_get_day_sends_identity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/days/2024-01-05"))
            .and(header("x-user-id", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "date": "2024-01-05",
                "blocks": [{
                    "id": "b1",
                    "name": "Morning",
                    "position": 0,
                    "tasks": [{
                        "id": "t1",
                        "text": "Run",
                        "completed": true,
                        "createdAt": "2024-01-05T06:00:00Z",
                        "position": 0
                    }]
                }],
                "hasMedal": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let day = client(&mock_server).get_day(date(5)).await.unwrap();
        assert_eq!(day.date, date(5));
        assert!(day.has_medal);
        assert_eq!(day.blocks[0].tasks[0].text, "Run");
    }

    #[tokio::test]
    async fn test_list_days_passes_range() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/days"))
            .and(query_param("from", "2024-01-01"))
            .and(query_param("to", "2024-01-07"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "days": {
                    "2024-01-02": {"date": "2024-01-02", "blocks": [], "hasMedal": false}
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let days = client(&mock_server)
            .list_days(DayRange::between(date(1), date(7)))
            .await
            .unwrap();
        assert_eq!(days.keys().copied().collect::<Vec<_>>(), vec![date(2)]);
    }

    #[tokio::test]
    async fn test_add_task_posts_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/days/2024-01-05/blocks/b1/tasks"))
            .and(body_json(serde_json::json!({
                "id": "t1",
                "text": "Run",
                "createdAt": "2024-01-05T06:00:00Z"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let task = NewTask {
            id: "t1".to_string(),
            text: "Run".to_string(),
            created_at: Some("2024-01-05T06:00:00Z".parse().unwrap()),
        };
        client(&mock_server)
            .add_task(date(5), "b1", &task)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_task_sends_only_supplied_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/days/2024-01-05/tasks/t1"))
            .and(body_json(serde_json::json!({"completed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        client(&mock_server)
            .update_task(date(5), "t1", &TaskPatch::completed(true))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stats_period_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .and(query_param("period", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "period": "week",
                "completed": 3,
                "total": 4,
                "medals": ["2024-01-04"],
                "streak": 1,
                "longestStreak": 2
            })))
            .mount(&mock_server)
            .await;

        let stats = client(&mock_server).stats(StatsPeriod::Week).await.unwrap();
        assert_eq!(stats.period, StatsPeriod::Week);
        assert_eq!(stats.medals, vec![date(4)]);
        assert_eq!(stats.longest_streak, 2);
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/reminders"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"error": "User not allowed"})),
            )
            .mount(&mock_server)
            .await;

        let err = client(&mock_server).list_reminders().await.unwrap_err();
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "User not allowed");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .delete_reminder("r1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
