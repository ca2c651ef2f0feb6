//! Cache module for downloaded launch imagery
//!
//! Images are held in memory for the life of the process; nothing is written
//! to disk. The cache coalesces overlapping requests for the same URL into a
//! single upstream fetch.

mod images;

pub use images::ImageCache;
