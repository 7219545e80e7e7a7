//! HTTP surface of the CredSetu prediction service: data model and the
//! bounded-timeout client.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    DefaultOnFile, HomeOwnership, LoanApplication, LoanGrade, LoanIntent, PredictionOutcome,
    PredictionResult,
};
