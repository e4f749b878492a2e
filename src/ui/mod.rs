//! Page controller for the recommendation front end.
//!
//! The controller talks to the API through [`ApiClient`](crate::client::ApiClient)
//! and to the document through [`Page`] and [`ChartBackend`], so it can be
//! driven headless or under test.

pub mod charts;
pub mod controller;
pub mod page;
pub mod render;

pub use charts::{ChartBackend, ChartConfig, ChartHandle, ChartRegistry, ChartSlot, MemoryChartBackend};
pub use controller::{parse_top_k, UiController};
pub use page::{HtmlPage, Page, SubmitState};
