//! HTTP client for the persistence service.
//!
//! JSON over the REST layout:
//!
//! ```text
//! /api/walls/                      POST create, GET list (?skip&limit)
//! /api/walls/{id}                  GET, PUT, DELETE
//! /api/obstacles/?wall_id={id}     POST create
//! /api/obstacles/wall/{id}         GET list
//! /api/obstacles/{id}              GET, DELETE
//! /api/trajectories/plan?name=     POST plan
//! /api/trajectories/wall/{id}      GET list (?skip&limit)
//! /api/trajectories/{id}           GET, DELETE
//! /api/health                      GET
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};
use wallkit_core::{Obstacle, RemoteError, Wall};

use crate::records::{
    HealthStatus, ObstacleRecord, Page, PlanRequest, PlanResponse, TrajectoryRecord, WallRecord,
};
use crate::service::PersistenceService;

/// Connection settings for [`HttpPersistenceClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Service root, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`PersistenceService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPersistenceClient {
    client: Client,
    base_url: String,
}

impl HttpPersistenceClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "persistence request failed");
            transport(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "persistence response");
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown");
        let body = response.text().await.unwrap_or_default();
        let err = RemoteError::from_response(status.as_u16(), reason, &body);
        error!(status = status.as_u16(), error = %err, "persistence call rejected");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            reason: e.to_string(),
        })
    }

    async fn empty(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        let response = self.send(request).await?;
        if response.status() != StatusCode::NO_CONTENT {
            debug!(status = response.status().as_u16(), "ignoring response body");
        }
        Ok(())
    }

    fn with_body<B: Serialize + ?Sized>(request: RequestBuilder, body: &B) -> RequestBuilder {
        request.json(body)
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport {
        reason: e.to_string(),
    }
}

#[async_trait]
impl PersistenceService for HttpPersistenceClient {
    async fn create_wall(&self, wall: &Wall) -> Result<WallRecord, RemoteError> {
        let request = Self::with_body(self.request(Method::POST, "/api/walls/"), wall);
        self.json(request).await
    }

    async fn list_walls(&self, page: Page) -> Result<Vec<WallRecord>, RemoteError> {
        let request = self.request(Method::GET, "/api/walls/").query(&page);
        self.json(request).await
    }

    async fn get_wall(&self, id: u64) -> Result<WallRecord, RemoteError> {
        self.json(self.request(Method::GET, &format!("/api/walls/{}", id)))
            .await
    }

    async fn update_wall(&self, id: u64, wall: &Wall) -> Result<WallRecord, RemoteError> {
        let request = Self::with_body(
            self.request(Method::PUT, &format!("/api/walls/{}", id)),
            wall,
        );
        self.json(request).await
    }

    async fn delete_wall(&self, id: u64) -> Result<(), RemoteError> {
        self.empty(self.request(Method::DELETE, &format!("/api/walls/{}", id)))
            .await
    }

    async fn create_obstacle(
        &self,
        wall_id: u64,
        obstacle: &Obstacle,
    ) -> Result<ObstacleRecord, RemoteError> {
        let request = self
            .request(Method::POST, "/api/obstacles/")
            .query(&[("wall_id", wall_id)]);
        self.json(Self::with_body(request, obstacle)).await
    }

    async fn list_obstacles(&self, wall_id: u64) -> Result<Vec<ObstacleRecord>, RemoteError> {
        self.json(self.request(Method::GET, &format!("/api/obstacles/wall/{}", wall_id)))
            .await
    }

    async fn get_obstacle(&self, id: u64) -> Result<ObstacleRecord, RemoteError> {
        self.json(self.request(Method::GET, &format!("/api/obstacles/{}", id)))
            .await
    }

    async fn delete_obstacle(&self, id: u64) -> Result<(), RemoteError> {
        self.empty(self.request(Method::DELETE, &format!("/api/obstacles/{}", id)))
            .await
    }

    async fn plan_trajectory(
        &self,
        request: &PlanRequest,
        name: &str,
    ) -> Result<PlanResponse, RemoteError> {
        let builder = self
            .request(Method::POST, "/api/trajectories/plan")
            .query(&[("name", name)]);
        self.json(Self::with_body(builder, request)).await
    }

    async fn list_trajectories(
        &self,
        wall_id: u64,
        page: Page,
    ) -> Result<Vec<TrajectoryRecord>, RemoteError> {
        let request = self
            .request(Method::GET, &format!("/api/trajectories/wall/{}", wall_id))
            .query(&page);
        self.json(request).await
    }

    async fn get_trajectory(&self, id: u64) -> Result<TrajectoryRecord, RemoteError> {
        self.json(self.request(Method::GET, &format!("/api/trajectories/{}", id)))
            .await
    }

    async fn delete_trajectory(&self, id: u64) -> Result<(), RemoteError> {
        self.empty(self.request(Method::DELETE, &format!("/api/trajectories/{}", id)))
            .await
    }

    async fn health(&self) -> Result<HealthStatus, RemoteError> {
        self.json(self.request(Method::GET, "/api/health")).await
    }
}
