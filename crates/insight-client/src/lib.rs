//! # insight-client
//!
//! Typed async REST client for the InsightAI analytics platform.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      InsightClient                           │
//! │  ┌──────────────┐  ┌───────────────┐  ┌──────────────────┐  │
//! │  │ generic call │  │ upload path   │  │  TokenProvider   │  │
//! │  │ (JSON/HTTP)  │  │ (progress +   │  │  (Strategy)      │  │
//! │  │              │  │  cancellation)│  │                  │  │
//! │  └──────────────┘  └───────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client is constructed once at application start and passed by
//! reference to consumers. Every call resolves a bearer token from the
//! injected [`TokenProvider`], so production and test credential backends
//! are interchangeable. The upload path is a separate operation from the
//! generic call path: only it exposes progress events and an abort contract.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use insight_client::{ClientConfig, InsightClient, NullTokenProvider};
//!
//! let client = InsightClient::new(
//!     ClientConfig::new("https://api.insight.example"),
//!     Arc::new(NullTokenProvider),
//! );
//!
//! let detail = client.get_dataset("abc123").await?;
//! println!("{} rows", detail.dataset.row_count);
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod upload;

pub use auth::{NullTokenProvider, StaticTokenProvider, TokenProvider};
pub use client::{CallOptions, InsightClient};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use model::{
    AnalysisJob, AnalysisStarted, AuditLog, Dashboard, DashboardDraft, Dataset, DatasetDetail,
    Organization, QueryResult, UploadOutcome, User, UserDraft,
};
pub use upload::{
    cancel_pair, CancelHandle, CancelToken, ProgressCallback, UploadFile, UploadOptions,
    UploadProgress,
};

// Re-exported so callers can build `CallOptions` without importing reqwest.
pub use reqwest::header::HeaderMap;
pub use reqwest::Method;
