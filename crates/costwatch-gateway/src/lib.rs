//! Cost API client for costwatch
//!
//! This crate fetches cost summaries, unused resources and reports from the
//! cost API, applying the fallback substitution policy, and provides the
//! view scope used to discard results that arrive after a view is gone.

pub mod gateway;
pub mod scope;
pub mod transport;

pub use gateway::{CostDataGateway, DataSource, Dashboard, Fetched};
pub use scope::ViewScope;
pub use transport::{HttpTransport, Transport};
