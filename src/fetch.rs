//! Concurrent plan execution
//!
//! Runs every query plan for a request in parallel and waits for all of
//! them to settle. A plan that fails — network error, timeout, non-2xx
//! status, unreadable body — settles as a failed outcome and never
//! aborts its siblings; there is no retry and no mid-flight cancellation
//! of the group. Outcome order mirrors plan order, not completion order,
//! so downstream aggregation is deterministic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ConfigError;
use crate::types::{FetchFailure, FetchOutcome, QueryPlan};

/// Executes a batch of query plans, one outcome per plan.
///
/// The seam the engine tests through: production uses `HttpFetcher`,
/// tests substitute counting or canned-response fakes.
#[async_trait]
pub trait PlanFetcher: Send + Sync {
    async fn fetch_all(&self, plans: Vec<QueryPlan>) -> Vec<FetchOutcome>;
}

/// Production fetcher over a shared `reqwest` client.
///
/// The client carries no global timeout; each plan owns its own, applied
/// per request, so one slow service only delays its own outcome.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PlanFetcher for HttpFetcher {
    async fn fetch_all(&self, plans: Vec<QueryPlan>) -> Vec<FetchOutcome> {
        // One spawned task per plan. Spawned tasks run to completion even
        // if this future is dropped, so started plans always settle.
        let mut handles = Vec::with_capacity(plans.len());
        for plan in plans {
            let client = self.client.clone();
            let service = plan.service.clone();
            let handle = tokio::spawn(async move { execute_plan(&client, plan).await });
            handles.push((service, handle));
        }

        // Await in plan order; completion order is irrelevant.
        let mut outcomes = Vec::with_capacity(handles.len());
        for (service, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::warn!(service = %service, error = %error, "fetch task did not complete");
                    FetchOutcome::failure(service, FetchFailure::TaskJoin(error.to_string()))
                }
            };
            if let Some(failure) = &outcome.failure {
                tracing::warn!(
                    service = %outcome.service,
                    failure = %failure,
                    "vocabulary fetch settled as failure"
                );
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Run one plan to a terminal outcome. Never returns an error; every
/// failure mode is folded into the outcome.
async fn execute_plan(client: &Client, plan: QueryPlan) -> FetchOutcome {
    let service = plan.service;

    let mut request = client
        .request(plan.method, plan.url)
        .timeout(plan.timeout);
    for (name, value) in &plan.headers {
        request = request.header(name, value);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(error) if error.is_timeout() => {
            return FetchOutcome::failure(service, FetchFailure::Timeout(plan.timeout));
        }
        Err(error) => {
            return FetchOutcome::failure(service, FetchFailure::Transport(error.to_string()));
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::failure(service, FetchFailure::Status(status.as_u16()));
    }

    match response.text().await {
        Ok(body) => FetchOutcome::success(service, status.as_u16(), body),
        Err(error) if error.is_timeout() => {
            FetchOutcome::failure(service, FetchFailure::Timeout(plan.timeout))
        }
        Err(error) => FetchOutcome::failure(service, FetchFailure::Body(error.to_string())),
    }
}
