//! Wire Data Model
//!
//! Typed request/response bodies for the InsightAI REST API. The server is
//! JavaScript, so everything is camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Platform user
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Role label, e.g. `admin` or `analyst`
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Organization a user belongs to
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Uploaded dataset
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub row_count: u64,
    pub size_bytes: u64,
    /// Ingestion status, e.g. `ready` or `processing`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Tabular query result, used for dataset previews
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Dataset with its preview, body of `GET /datasets/:id`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDetail {
    pub dataset: Dataset,
    pub preview: QueryResult,
}

/// Saved dashboard
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    /// Widget layout, opaque to the client
    pub widgets: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial dashboard payload for create/update calls
///
/// Unset fields are omitted from the body entirely, so a PATCH only touches
/// what the caller filled in.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Value>,
}

/// Analysis job over a dataset
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJob {
    pub id: String,
    pub dataset_id: String,
    /// Job status, e.g. `queued`, `running`, `completed`, `failed`
    pub status: String,
    pub result: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /analyses`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStarted {
    pub job_id: String,
}

/// Admin audit log entry
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub actor: String,
    pub action: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
}

/// Partial user payload for admin create/update calls
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Body of `POST /upload`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub dataset_id: String,
    pub preview: QueryResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_omits_unset_fields() {
        let draft = DashboardDraft {
            name: Some("Q3 revenue".into()),
            widgets: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"name":"Q3 revenue"}"#);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let body = r#"{
            "dataset": {
                "id": "abc123",
                "name": "sales.csv",
                "rowCount": 1200,
                "sizeBytes": 48211,
                "status": "ready",
                "createdAt": "2025-06-01T12:00:00Z"
            },
            "preview": { "columns": ["region"], "rows": [["emea"]] }
        }"#;
        let detail: DatasetDetail = serde_json::from_str(body).unwrap();
        assert_eq!(detail.dataset.row_count, 1200);
        assert_eq!(detail.preview.columns, vec!["region"]);
    }

    #[test]
    fn test_analysis_started_field_name() {
        let started: AnalysisStarted = serde_json::from_str(r#"{"jobId":"j-9"}"#).unwrap();
        assert_eq!(started.job_id, "j-9");
    }
}
