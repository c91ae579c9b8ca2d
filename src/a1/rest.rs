//! REST binding of the A1 seam.
//!
//! Talks the flat `a1-p` surface the RICs expose:
//! `GET /a1-p/policies`, `GET /a1-p/policytypes`,
//! `GET /a1-p/policytypes/{type}`,
//! `PUT /a1-p/policytypes/{type}/policies/{id}` and
//! `DELETE /a1-p/policies`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::A1Error;
use crate::repository::{Policy, PolicyType, Ric};

use super::{A1Client, A1ClientFactory};

/// Builds REST clients on top of one shared connection pool.
pub struct RestClientFactory {
    http: reqwest::Client,
}

impl RestClientFactory {
    /// `request_timeout` bounds every A1 call end to end, so a stalled
    /// RIC costs one check at most one timeout per request.
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl A1ClientFactory for RestClientFactory {
    async fn create_client(&self, ric: &Ric) -> Result<Arc<dyn A1Client>, A1Error> {
        let base_url = normalize_base_url(&ric.base_url).ok_or_else(|| {
            A1Error::connect(
                ric.name.as_str(),
                format!("invalid base url '{}'", ric.base_url),
            )
        })?;
        Ok(Arc::new(RestA1Client {
            http: self.http.clone(),
            ric_name: ric.name.clone(),
            base_url,
        }))
    }
}

/// Accepts http/https urls and strips any trailing slash.
fn normalize_base_url(raw: &str) -> Option<String> {
    let url = reqwest::Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" => Some(raw.trim_end_matches('/').to_string()),
        _ => None,
    }
}

struct RestA1Client {
    http: reqwest::Client,
    ric_name: String,
    base_url: String,
}

impl RestA1Client {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn remote_err(&self, reason: impl ToString) -> A1Error {
        A1Error::remote(self.ric_name.as_str(), reason)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, A1Error> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.remote_err(e))?
            .error_for_status()
            .map_err(|e| self.remote_err(e))?;
        response.json().await.map_err(|e| self.remote_err(e))
    }
}

#[async_trait]
impl A1Client for RestA1Client {
    async fn policy_identities(&self) -> Result<HashSet<String>, A1Error> {
        let ids: Vec<String> = self.get_json("/a1-p/policies").await?;
        Ok(ids.into_iter().collect())
    }

    async fn policy_type_identities(&self) -> Result<HashSet<String>, A1Error> {
        let ids: Vec<String> = self.get_json("/a1-p/policytypes").await?;
        Ok(ids.into_iter().collect())
    }

    async fn policy_type(&self, type_id: &str) -> Result<PolicyType, A1Error> {
        let schema: Value = self.get_json(&format!("/a1-p/policytypes/{type_id}")).await?;
        Ok(PolicyType::new(type_id, schema))
    }

    async fn put_policy(&self, policy: &Policy) -> Result<(), A1Error> {
        let url = self.url(&format!(
            "/a1-p/policytypes/{}/policies/{}",
            policy.type_id, policy.id
        ));
        self.http
            .put(&url)
            .json(&policy.json)
            .send()
            .await
            .map_err(|e| self.remote_err(e))?
            .error_for_status()
            .map_err(|e| self.remote_err(e))?;
        Ok(())
    }

    async fn delete_all_policies(&self) -> Result<(), A1Error> {
        let url = self.url("/a1-p/policies");
        self.http
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.remote_err(e))?
            .error_for_status()
            .map_err(|e| self.remote_err(e))?;
        Ok(())
    }
}
