//! Paginated launch aggregation
//!
//! `LaunchAggregator` is the single source of truth for fetched launches. It
//! owns the cumulative launch list, the next page to request, the in-flight
//! guard and the active filter, and pushes the visible projection to a
//! presenter whenever any of those change.
//!
//! All methods take `&self`. State sits behind a mutex that is never held
//! across an `.await`, so the aggregator can be shared through an `Arc` while
//! a page fetch is outstanding.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info, warn};

use crate::data::{FilterDirection, Launch, LaunchError, LaunchFetcher};
use crate::filter::filter_launches;
use crate::presenter::Presenter;

/// First page number of a session
const FIRST_PAGE: u32 = 1;

/// Result of a `fetch_next_page` call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page arrived and was appended
    Appended {
        /// Page number that was fetched
        page: u32,
        /// Number of launches the page contained
        count: usize,
    },
    /// Another fetch was already in flight; nothing was requested
    Skipped,
    /// The page arrived after a `reset()` and was thrown away
    Discarded,
}

/// Pagination and filter state owned by the aggregator
#[derive(Debug)]
struct AggregateState {
    /// Every launch fetched this session, in fetch order
    all_launches: Vec<Launch>,
    /// Next page to request
    current_page: u32,
    /// Whether a page fetch is outstanding
    is_fetching: bool,
    /// Active filter; `None` shows the raw aggregate
    filter: Option<FilterDirection>,
    /// Bumped by `reset()` so late results from an older session are dropped
    generation: u64,
    /// Ticket of the most recently admitted fetch; survives `reset()`
    fetch_ticket: u64,
}

impl AggregateState {
    fn new() -> Self {
        Self {
            all_launches: Vec::new(),
            current_page: FIRST_PAGE,
            is_fetching: false,
            filter: None,
            generation: 0,
            fetch_ticket: 0,
        }
    }

    fn projection(&self) -> Vec<Launch> {
        match self.filter {
            Some(direction) => filter_launches(&self.all_launches, direction),
            None => self.all_launches.clone(),
        }
    }
}

/// Clears the in-flight flag when a fetch ends, including when its future is
/// dropped before completion
///
/// Only the fetch holding the current ticket may clear the flag, so a fetch
/// that has already finished can never release a later one.
struct InFlightGuard<'a> {
    state: &'a Mutex<AggregateState>,
    ticket: u64,
}

impl InFlightGuard<'_> {
    fn release(state: &mut AggregateState, ticket: u64) {
        if state.fetch_ticket == ticket {
            state.is_fetching = false;
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Self::release(&mut state, self.ticket);
    }
}

/// Aggregates paginated launch fetches into one growing collection
pub struct LaunchAggregator {
    fetcher: Arc<dyn LaunchFetcher>,
    state: Mutex<AggregateState>,
    presenter: Option<Weak<dyn Presenter>>,
}

impl LaunchAggregator {
    /// Creates an empty aggregator that will request pages from `fetcher`
    pub fn new(fetcher: Arc<dyn LaunchFetcher>) -> Self {
        Self {
            fetcher,
            state: Mutex::new(AggregateState::new()),
            presenter: None,
        }
    }

    /// Attaches a presenter
    ///
    /// Only a weak reference is kept. Once the presenter is dropped, updates
    /// are skipped.
    pub fn with_presenter<P: Presenter + 'static>(mut self, presenter: &Arc<P>) -> Self {
        let presenter: Arc<dyn Presenter> = Arc::clone(presenter) as Arc<dyn Presenter>;
        self.presenter = Some(Arc::downgrade(&presenter));
        self
    }

    fn state(&self) -> MutexGuard<'_, AggregateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests the next page and appends it to the aggregate
    ///
    /// Returns `Skipped` without contacting upstream when a fetch is already
    /// outstanding. On success the page counter advances by one. On failure
    /// the aggregate and page counter are left as they were and the error is
    /// returned unchanged; there is no retry.
    pub async fn fetch_next_page(&self) -> Result<FetchOutcome, LaunchError> {
        let (page, generation, ticket) = {
            let mut state = self.state();
            if state.is_fetching {
                debug!(page = state.current_page, "fetch already in flight, skipping");
                return Ok(FetchOutcome::Skipped);
            }
            state.is_fetching = true;
            state.fetch_ticket = state.fetch_ticket.wrapping_add(1);
            (state.current_page, state.generation, state.fetch_ticket)
        };
        let _in_flight = InFlightGuard {
            state: &self.state,
            ticket,
        };

        info!(page, "fetching launch page");
        let result = self.fetcher.fetch_page(page).await;

        let (count, projection, filter) = {
            let mut state = self.state();
            if state.generation != generation {
                debug!(page, "discarding page fetched before reset");
                return Ok(FetchOutcome::Discarded);
            }
            InFlightGuard::release(&mut state, ticket);

            let launches = match result {
                Ok(launches) => launches,
                Err(err) => {
                    warn!(page, error = %err, "launch page fetch failed");
                    return Err(err);
                }
            };

            let count = launches.len();
            state.all_launches.extend(launches);
            state.current_page += 1;
            debug!(page, count, total = state.all_launches.len(), "appended launch page");
            (count, state.projection(), state.filter)
        };

        self.publish(&projection, filter);
        Ok(FetchOutcome::Appended { page, count })
    }

    /// Sets or clears the filter and publishes the new projection
    ///
    /// Works on the launches already fetched; never triggers a fetch.
    pub fn set_filter(&self, filter: Option<FilterDirection>) {
        let projection = {
            let mut state = self.state();
            state.filter = filter;
            state.projection()
        };
        debug!(?filter, visible = projection.len(), "filter changed");
        self.publish(&projection, filter);
    }

    /// Snapshot of the visible launches: filtered when a filter is active,
    /// otherwise every fetched launch
    pub fn current_projection(&self) -> Vec<Launch> {
        self.state().projection()
    }

    /// Drops all fetched launches and starts over from the first page
    ///
    /// A fetch still outstanding from before the reset will have its result
    /// discarded when it lands.
    pub fn reset(&self) {
        {
            let mut state = self.state();
            let generation = state.generation.wrapping_add(1);
            let fetch_ticket = state.fetch_ticket;
            *state = AggregateState {
                generation,
                fetch_ticket,
                ..AggregateState::new()
            };
        }
        info!("launch aggregate reset");
        self.publish(&[], None);
    }

    /// Snapshot of every launch fetched so far, in fetch order
    pub fn all_launches(&self) -> Vec<Launch> {
        self.state().all_launches.clone()
    }

    /// Number of launches fetched so far
    pub fn launch_count(&self) -> usize {
        self.state().all_launches.len()
    }

    /// Next page that `fetch_next_page` will request
    pub fn current_page(&self) -> u32 {
        self.state().current_page
    }

    /// Whether a page fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.state().is_fetching
    }

    /// Whether the projection is the filtered view
    pub fn is_filter_active(&self) -> bool {
        self.state().filter.is_some()
    }

    /// Filter currently applied to the projection, if any
    pub fn active_filter(&self) -> Option<FilterDirection> {
        self.state().filter
    }

    fn publish(&self, launches: &[Launch], filter: Option<FilterDirection>) {
        let Some(weak) = &self.presenter else {
            return;
        };
        match weak.upgrade() {
            Some(presenter) => presenter.projection_changed(launches, filter),
            None => debug!("presenter dropped, skipping projection update"),
        }
    }
}

impl std::fmt::Debug for LaunchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchAggregator")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}
