//! Data orchestration and classification core of the air-quality dashboard.

pub mod alerts;
pub mod classifier;
pub mod config;
pub mod orchestrator;
pub mod provider;
pub mod session;
pub mod state;
pub mod views;

pub use alerts::{aggregate, AlertDigest, AlertEmphasis};
pub use classifier::{classify, AqiCategory, Classification};
pub use config::{load_settings, ProviderConfig, Settings};
pub use orchestrator::{FetchBundle, FetchOrchestrator, Slot};
pub use provider::{AirQualityProvider, HttpProvider, MissingProvider};
pub use session::{DashboardSession, SessionEvent, SessionOptions};
pub use state::{DashboardSnapshot, LoadState, ViewState};
pub use views::ViewModel;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
