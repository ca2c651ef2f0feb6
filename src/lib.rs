//! Launchdeck Library
//!
//! Paginated SpaceX launch aggregation, successful-launch filtering and an
//! in-memory patch image cache. The binary in `main.rs` is a thin consumer of
//! these modules.

pub mod aggregator;
pub mod cache;
pub mod cli;
pub mod data;
pub mod display;
pub mod filter;
pub mod presenter;

pub use aggregator::{FetchOutcome, LaunchAggregator};
pub use cache::ImageCache;
pub use data::{FilterDirection, Launch, LaunchError, LaunchFetcher, LaunchPage};
pub use filter::filter_launches;
pub use presenter::{ChannelPresenter, Presenter, ProjectionUpdate};
