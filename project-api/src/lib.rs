//! Client for the group-project REST API: workgroups, reviews, submissions, grades and
//! completions.

pub mod client;
pub mod config;
pub mod course;
pub mod error;
pub mod group;
pub mod reconcile;
pub mod review;
pub mod submission;
pub mod transport;
pub mod types;
pub mod user;
pub mod workgroup;

mod urls;

pub use client::{ProjectApi, client};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use reconcile::{DesiredAnswers, SyncReport};
pub use transport::{ApiRequest, RawResponse, Transport};
