//! Rule engines behind the jubilee watch service.
//!
//! `conditions` turns an environmental reading into a 0-100 condition score.
//! `community` turns a window of user reports into an alert level and owns the
//! reputation rules that feed trust back into later evaluations.

pub mod community;
pub mod conditions;
pub mod config;
pub mod error;
pub mod telemetry;
