//! Working-list state machine for a browse session.
//!
//! A listing starts from the list fetched for the current section. Remote
//! search (appearance text or photo similarity) replaces the visible list
//! wholesale; while remote results are active, local filtering is fully
//! suppressed — the server ranking already encodes relevance that a second
//! substring pass would corrupt. `reset` restores the fetched list and
//! re-enables local filtering.

use crate::{
  filter::{FilterCriteria, apply_filters},
  record::Record,
};

/// The record list a browse view renders from.
///
/// Two states: idle (local filtering over the fetched list) and
/// remote-results-active (server results shown verbatim).
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
  fetched: Vec<Record>,
  remote:  Option<Vec<Record>>,
}

impl Listing {
  pub fn new(fetched: Vec<Record>) -> Self {
    Self {
      fetched,
      remote: None,
    }
  }

  /// Replace the fetched baseline, e.g. after a refetch following a
  /// mutation. Any active remote results are discarded — they were ranked
  /// against the old list.
  pub fn replace_fetched(&mut self, records: Vec<Record>) {
    self.fetched = records;
    self.remote = None;
  }

  /// Enter the remote-results state with a server-ranked result set.
  pub fn apply_remote(&mut self, results: Vec<Record>) {
    self.remote = Some(results);
  }

  /// Leave the remote-results state, restoring the fetched list exactly.
  pub fn reset(&mut self) {
    self.remote = None;
  }

  pub fn remote_active(&self) -> bool {
    self.remote.is_some()
  }

  /// The originally fetched list, regardless of state.
  pub fn fetched(&self) -> &[Record] {
    &self.fetched
  }

  /// The records the view should render: remote results verbatim while
  /// active, otherwise the fetched list through the local filter engine.
  pub fn visible(&self, criteria: &FilterCriteria, query: &str) -> Vec<Record> {
    match &self.remote {
      Some(results) => results.clone(),
      None => apply_filters(&self.fetched, criteria, query),
    }
  }
}
