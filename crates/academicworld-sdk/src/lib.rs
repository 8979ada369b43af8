//! AcademicWorld SDK: client library for the AcademicWorld Explorer dashboard
//!
//! Provides two client implementations:
//!
//! - **`EmbeddedClient`**: in-process, no network. Calls a [`Dashboard`]
//!   directly. Ideal for tests and scripting against the sample dataset.
//!
//! - **`RemoteClient`**: connects to a running dashboard server via HTTP.
//!
//! Both implement the `DashboardClient` trait for a unified API.
//!
//! # Quick Start
//!
//! ```rust
//! use academicworld_sdk::{DashboardClient, EmbeddedClient, YearRange};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EmbeddedClient::with_sample_data().await;
//!
//!     let table = client.top_keywords(YearRange::full()).await.unwrap();
//!     println!("Found {} keywords", table.len());
//!
//!     client.add_favorite("databases").await.unwrap();
//!     let panel = client.favorites().await.unwrap();
//!     assert_eq!(panel.favorites, vec!["databases"]);
//! }
//! ```

pub mod client;
pub mod embedded;
pub mod error;
pub mod models;
pub mod remote;

pub use client::DashboardClient;
pub use embedded::EmbeddedClient;
pub use error::{SdkError, SdkResult};
pub use models::{
    DashboardOptions, FavoritesSnapshot, NoOpReason, PieChart, RecommendationEntry, ServerStatus,
    TableView, Transition, TransitionKind, YearRange,
};
pub use remote::RemoteClient;

pub use academicworld::{Dashboard, MemoryStore, VERSION};
