use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::PlanError;
use crate::models::{NutritionPlan, Profile};

/// REST client for the plan/profile store.
///
/// Rows live under `{base}/rest/v1/`; profiles are keyed by id and plans
/// by owning user id. Filter queries return arrays, with an empty array
/// signalling not-found.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(self.client.get(self.url(path)))
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> RequestBuilder {
        self.request(self.client.post(self.url(path))).json(body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn request(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }

    async fn fail(path: &str, resp: Response) -> PlanError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(path, %status, "store request failed");
        PlanError::Store { status, body }
    }

    /// Inserts or updates a profile row.
    pub async fn save_profile(&self, profile: &Profile) -> Result<(), PlanError> {
        let resp = self
            .post("profiles", profile)
            .header("Prefer", "resolution=merge-duplicates")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::fail("profiles", resp).await);
        }
        Ok(())
    }

    /// Fetches a profile by id; `None` when no row matches.
    pub async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>, PlanError> {
        let path = format!("profiles?id=eq.{id}");
        let resp = self.get(&path).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(Self::fail(&path, resp).await);
        }

        let mut rows: Vec<Profile> = resp.json().await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Persists a plan as a new row. Expects 201 Created.
    pub async fn save_plan(&self, plan: &NutritionPlan) -> Result<(), PlanError> {
        let resp = self.post("nutrition_plans", plan).send().await?;

        if resp.status() != StatusCode::CREATED {
            return Err(Self::fail("nutrition_plans", resp).await);
        }
        Ok(())
    }

    /// All plans generated for one profile.
    pub async fn fetch_plans(&self, user_id: Uuid) -> Result<Vec<NutritionPlan>, PlanError> {
        let path = format!("nutrition_plans?user_id=eq.{user_id}");
        let resp = self.get(&path).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(Self::fail(&path, resp).await);
        }

        Ok(resp.json().await?)
    }

    /// Probes whether the store is reachable with the configured key.
    ///
    /// 401 still means the endpoint answered, just with a key that cannot
    /// read the table.
    pub async fn check_connection(&self) -> Result<bool, PlanError> {
        let resp = self.get("profiles").send().await?;
        let status = resp.status();
        Ok(status == StatusCode::OK || status == StatusCode::UNAUTHORIZED)
    }
}
