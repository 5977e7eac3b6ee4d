//! Typed HTTP client for the fleet API.

use std::time::Duration;

use fleet_engine::{
    CrewMember, CrewMemberId, CrewMemberPatch, Mutation, NewCrewMember, NewShip, Page, Ship,
    ShipId, ShipPatch, ShipQuery,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of responses that carry no record.
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub storage: String,
}

/// Client for one fleet server.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    base_url: String,
}

impl FleetClient {
    /// Client for the server at `base_url`, e.g. `http://localhost:3030`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn with_body<B: Serialize>(&self, method: Method, path: &str, body: &B) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        send(self.request(Method::GET, "/health")).await
    }

    // --- ships ---

    /// One page of ships and the size of the filtered set.
    pub async fn list_ships(&self, query: &ShipQuery) -> Result<Page<Ship>> {
        send(self.request(Method::GET, "/ships").query(&query.to_params())).await
    }

    pub async fn get_ship(&self, ship_id: ShipId) -> Result<Ship> {
        send(self.request(Method::GET, &format!("/ship/{ship_id}"))).await
    }

    pub async fn create_ship(&self, ship: &NewShip) -> Result<Ship> {
        send(self.with_body(Method::POST, "/ships", ship)).await
    }

    pub async fn update_ship(&self, ship_id: ShipId, patch: &ShipPatch) -> Result<Ship> {
        send(self.with_body(Method::PUT, &format!("/ships/{ship_id}"), patch)).await
    }

    /// Delete a ship and its crew.
    pub async fn delete_ship(&self, ship_id: ShipId) -> Result<()> {
        send_for_message(self.request(Method::DELETE, &format!("/ships/{ship_id}"))).await
    }

    /// Wipe the fleet. The server answers 404 unless reset is enabled.
    pub async fn reset(&self) -> Result<()> {
        send_for_message(self.request(Method::GET, "/sync")).await
    }

    // --- crew ---

    pub async fn list_crew(&self, ship_id: ShipId) -> Result<Vec<CrewMember>> {
        send(self.request(Method::GET, &crew_path(ship_id))).await
    }

    pub async fn get_crew_member(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Result<CrewMember> {
        send(self.request(Method::GET, &crew_member_path(ship_id, crew_member_id))).await
    }

    pub async fn create_crew_member(
        &self,
        ship_id: ShipId,
        member: &NewCrewMember,
    ) -> Result<CrewMember> {
        send(self.with_body(Method::POST, &crew_path(ship_id), member)).await
    }

    pub async fn update_crew_member(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
        patch: &CrewMemberPatch,
    ) -> Result<CrewMember> {
        let path = crew_member_path(ship_id, crew_member_id);
        send(self.with_body(Method::PUT, &path, patch)).await
    }

    pub async fn delete_crew_member(
        &self,
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    ) -> Result<()> {
        let path = crew_member_path(ship_id, crew_member_id);
        send_for_message(self.request(Method::DELETE, &path)).await
    }

    /// Perform a mutation produced by a list view.
    pub async fn apply(&self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::CreateShip(ship) => self.create_ship(ship).await.map(drop),
            Mutation::UpdateShip(id, patch) => self.update_ship(*id, patch).await.map(drop),
            Mutation::DeleteShip(id) => self.delete_ship(*id).await,
            Mutation::CreateCrewMember(ship_id, member) => {
                self.create_crew_member(*ship_id, member).await.map(drop)
            }
            Mutation::UpdateCrewMember(ship_id, id, patch) => self
                .update_crew_member(*ship_id, *id, patch)
                .await
                .map(drop),
            Mutation::DeleteCrewMember(ship_id, id) => {
                self.delete_crew_member(*ship_id, *id).await
            }
        }
    }
}

fn crew_path(ship_id: ShipId) -> String {
    format!("/ships/{ship_id}/crewmembers")
}

fn crew_member_path(ship_id: ShipId, crew_member_id: CrewMemberId) -> String {
    format!("/ships/{ship_id}/crewmembers/{crew_member_id}")
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = checked(request.send().await?).await?;
    Ok(response.json().await?)
}

async fn send_for_message(request: RequestBuilder) -> Result<()> {
    let response = checked(request.send().await?).await?;
    let body: MessageBody = response.json().await?;
    tracing::debug!(message = %body.message, "Server acknowledged");
    Ok(())
}

/// Turn an error status into [`ClientError::Api`] carrying the server's message.
async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<MessageBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                text
            }
        });

    tracing::warn!(%status, %message, "Request failed");
    Err(ClientError::Api { status, message })
}
