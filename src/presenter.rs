//! Projection change notifications
//!
//! The aggregator reports every change of the visible projection through the
//! `Presenter` trait. `ChannelPresenter` forwards those changes over a tokio
//! channel so the consumer can apply them on its own task.

use tokio::sync::mpsc;
use tracing::debug;

use crate::data::{FilterDirection, Launch};

/// Receives the visible launch sequence whenever it changes
pub trait Presenter: Send + Sync {
    fn projection_changed(&self, launches: &[Launch], filter: Option<FilterDirection>);
}

/// Message delivered to the consumer side of a `ChannelPresenter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionUpdate {
    /// Visible launches, in display order
    pub launches: Vec<Launch>,
    /// Filter in effect when the projection was computed
    pub filter: Option<FilterDirection>,
}

/// Presenter that queues projection updates on an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    sender: mpsc::UnboundedSender<ProjectionUpdate>,
}

impl ChannelPresenter {
    /// Creates a presenter and the receiver its updates arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProjectionUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Presenter for ChannelPresenter {
    fn projection_changed(&self, launches: &[Launch], filter: Option<FilterDirection>) {
        let update = ProjectionUpdate {
            launches: launches.to_vec(),
            filter,
        };
        if self.sender.send(update).is_err() {
            debug!("projection receiver closed, dropping update");
        }
    }
}

/// Drains every pending update without blocking and returns the newest one
pub fn latest_update(
    receiver: &mut mpsc::UnboundedReceiver<ProjectionUpdate>,
) -> Option<ProjectionUpdate> {
    let mut latest = None;
    while let Ok(update) = receiver.try_recv() {
        latest = Some(update);
    }
    latest
}
