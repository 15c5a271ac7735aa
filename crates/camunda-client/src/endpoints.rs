//! Typed helpers for the engine endpoints the collectors read.
//!
//! Paths are relative to the REST prefix; query values and path
//! segments are percent-encoded.

use camunda_core::{
    ActivityStatistics, EngineMetric, HistoryActivityStatistics, MetricCount,
    ProcessDefinitionStatistics,
};

use crate::client::EngineClient;
use crate::error::ClientResult;

impl EngineClient {
    /// `GET history/incident/count?{status}=true`
    pub async fn history_incident_count(&self, status: &str) -> ClientResult<i64> {
        let path = format!("history/incident/count?{}=true", encode_query(status));
        let count: MetricCount = self.fetch_json(&path).await?;
        Ok(count.count)
    }

    /// `GET metrics?maxResults=N[&startDate=...]`
    pub async fn metrics(
        &self,
        max_results: usize,
        start_date: Option<&str>,
    ) -> ClientResult<Vec<EngineMetric>> {
        let mut path = format!("metrics?maxResults={max_results}");
        if let Some(start) = start_date {
            path.push_str("&startDate=");
            path.push_str(&encode_query(start));
        }
        self.fetch_json(&path).await
    }

    /// `GET process-definition/statistics?failedJobs=true`
    pub async fn process_definition_statistics(
        &self,
    ) -> ClientResult<Vec<ProcessDefinitionStatistics>> {
        self.fetch_json("process-definition/statistics?failedJobs=true")
            .await
    }

    /// `GET process-definition/{id}/statistics?failedJobs=true`
    pub async fn activity_statistics(
        &self,
        definition_id: &str,
    ) -> ClientResult<Vec<ActivityStatistics>> {
        let path = format!(
            "process-definition/{}/statistics?failedJobs=true",
            encode_segment(definition_id)
        );
        self.fetch_json(&path).await
    }

    /// `GET history/process-definition/{id}/statistics?canceled=true&finished=true&completeScope=true`
    pub async fn history_activity_statistics(
        &self,
        definition_id: &str,
    ) -> ClientResult<Vec<HistoryActivityStatistics>> {
        let path = format!(
            "history/process-definition/{}/statistics?canceled=true&finished=true&completeScope=true",
            encode_segment(definition_id)
        );
        self.fetch_json(&path).await
    }

    /// `GET history/activity-instance/count?activityId=...`
    pub async fn activity_instance_count(&self, activity_id: &str) -> ClientResult<i64> {
        let path = format!(
            "history/activity-instance/count?activityId={}",
            encode_query(activity_id)
        );
        let count: MetricCount = self.fetch_json(&path).await?;
        Ok(count.count)
    }
}

fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn encode_segment(value: &str) -> String {
    // form encoding turns spaces into '+', which a path does not decode.
    encode_query(value).replace('+', "%20")
}
