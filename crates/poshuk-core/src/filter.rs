//! Local filter engine over fetched record lists.
//!
//! Filtering is a pure function: the same inputs always produce the same
//! output, surviving records keep their relative order, and applying the
//! same criteria twice is a no-op. A record stays in the result only if it
//! satisfies every active criterion.

use chrono::NaiveDate;

use crate::record::{PersonType, Record, Status};

/// One browse session's worth of filter state. `Default` matches
/// everything; empty strings count as inactive criteria, mirroring the
/// empty inputs of the search form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
  pub person_type:   Option<PersonType>,
  pub status:        Option<Status>,
  pub region:        Option<String>,
  pub brigade:       Option<String>,
  pub circumstances: Option<String>,
  pub appearance:    Option<String>,
  /// Inclusive lower bound on `date_of_birth`.
  pub born_after:    Option<NaiveDate>,
  /// Inclusive upper bound on `date_of_birth`.
  pub born_before:   Option<NaiveDate>,
}

impl FilterCriteria {
  /// Whether `record` satisfies every active criterion plus the free-text
  /// name query. Substring matches are case-insensitive; a record with an
  /// absent field fails any non-empty criterion on that field.
  pub fn matches(&self, record: &Record, query: &str) -> bool {
    if !query.is_empty()
      && !record.name.as_deref().is_some_and(|n| contains_ci(n, query))
    {
      return false;
    }

    if self.person_type.is_some_and(|t| t != record.person_type) {
      return false;
    }
    if self.status.is_some_and(|s| s != record.status) {
      return false;
    }

    if !field_matches(record.region.as_deref(), self.region.as_deref()) {
      return false;
    }
    if !field_matches(record.brigade.as_deref(), self.brigade.as_deref()) {
      return false;
    }
    if !field_matches(
      record.circumstances.as_deref(),
      self.circumstances.as_deref(),
    ) {
      return false;
    }
    if !field_matches(record.appearance.as_deref(), self.appearance.as_deref())
    {
      return false;
    }

    self.date_matches(record.date_of_birth)
  }

  fn date_matches(&self, date_of_birth: Option<NaiveDate>) -> bool {
    if self.born_after.is_none() && self.born_before.is_none() {
      return true;
    }
    // An active date range excludes records with no recorded birth date.
    let Some(date) = date_of_birth else {
      return false;
    };
    if self.born_after.is_some_and(|start| date < start) {
      return false;
    }
    !self.born_before.is_some_and(|end| date > end)
  }
}

/// Stable filter: keeps the input's relative order, never sorts.
pub fn apply_filters(
  records: &[Record],
  criteria: &FilterCriteria,
  query: &str,
) -> Vec<Record> {
  records
    .iter()
    .filter(|record| criteria.matches(record, query))
    .cloned()
    .collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn field_matches(field: Option<&str>, criterion: Option<&str>) -> bool {
  match criterion {
    None => true,
    Some(c) if c.is_empty() => true,
    Some(c) => field.is_some_and(|f| contains_ci(f, c)),
  }
}
