//! Core data models for Launchdeck
//!
//! This module contains the launch record types shared by the fetchers, the
//! aggregator and the filter, together with the remote clients that produce
//! them.

pub mod company;
pub mod error;
pub mod images;
pub mod launches;

pub use company::CompanyClient;
pub use error::LaunchError;
pub use images::{HttpImageSource, ImageSource};
pub use launches::{LaunchClient, LaunchFetcher};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default root of the SpaceX v4 REST API
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4/";

/// One launch record, immutable once decoded
///
/// Identity is the upstream record id, so the same launch fetched twice
/// compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launch {
    /// Upstream record identifier
    pub id: String,
    /// Mission name
    pub name: String,
    /// Rocket identifier
    pub rocket: String,
    /// Launch outcome; `None` when unknown or upcoming
    pub success: Option<bool>,
    /// Raw ISO-8601 launch time, e.g. "2020-01-07T02:19:21.000Z"
    pub launch_date_utc: String,
    /// Launch time as epoch seconds
    pub launch_date_unix: i64,
    /// Small mission patch image
    pub patch_image_url: Option<String>,
    /// Wikipedia article for the mission
    pub wikipedia_url: Option<String>,
}

/// One batch of launches returned by a single page fetch, in upstream order
pub type LaunchPage = Vec<Launch>;

/// Sort direction for the successful-launch projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterDirection {
    /// Oldest first
    #[value(alias = "asc")]
    Ascending,
    /// Newest first
    #[value(alias = "desc")]
    Descending,
}

/// Company summary shown above the launch list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub founder: String,
    pub founded: i32,
    pub employees: u32,
    pub launch_sites: u32,
    pub valuation: u64,
}

/// Query response envelope from `launches/query`
#[derive(Debug, Deserialize)]
pub(crate) struct LaunchDocs {
    pub docs: Vec<LaunchRecord>,
}

/// A single launch as it appears on the wire
#[derive(Debug, Deserialize)]
pub(crate) struct LaunchRecord {
    id: String,
    name: String,
    rocket: String,
    success: Option<bool>,
    date_utc: String,
    date_unix: i64,
    #[serde(default)]
    links: LaunchLinks,
}

#[derive(Debug, Default, Deserialize)]
struct LaunchLinks {
    #[serde(default)]
    patch: Option<LaunchPatch>,
    #[serde(default)]
    wikipedia: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LaunchPatch {
    #[serde(default)]
    small: Option<String>,
}

impl LaunchRecord {
    /// Flattens the wire record into the immutable `Launch` model
    pub(crate) fn into_launch(self) -> Launch {
        Launch {
            id: self.id,
            name: self.name,
            rocket: self.rocket,
            success: self.success,
            launch_date_utc: self.date_utc,
            launch_date_unix: self.date_unix,
            patch_image_url: self.links.patch.and_then(|p| p.small),
            wikipedia_url: self.links.wikipedia,
        }
    }
}
