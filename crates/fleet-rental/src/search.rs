//! # Rental Search
//!
//! Multi-criterion search. Each criterion runs as its own store query and the
//! results are intersected by rental id.
//!
//! ```text
//!   client_name ──► rentals_by_client_name ──┐
//!   date_from/to ─► rentals_in_range ────────┼──► intersect_by_id ──► results
//!   car_brand ────► rentals_by_car_brand ────┘
//!
//!   no criteria ──► rentals (everything)
//! ```
//!
//! Blank text criteria are ignored. Swapped date bounds are put back in
//! order, and a single bound is opened up with a far past or far future
//! sentinel.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fleet_core::validation::validate_search_term;
use fleet_core::{DateRange, RecordStore, Rental};

use crate::error::RentalResult;

/// Lower bound used when only `date_to` is given.
fn far_past() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Upper bound used when only `date_from` is given.
fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Substring of the client's username or full name.
    pub client_name: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Substring of the car brand.
    pub car_brand: Option<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn date_from(mut self, from: NaiveDate) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn date_to(mut self, to: NaiveDate) -> Self {
        self.date_to = Some(to);
        self
    }

    pub fn car_brand(mut self, brand: impl Into<String>) -> Self {
        self.car_brand = Some(brand.into());
        self
    }

    /// The date criterion as a closed range, if either bound is set.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.date_from, self.date_to) {
            (None, None) => None,
            // an open side never reaches back past the given bound
            (Some(from), None) => Some(DateRange::spanning(from, far_future().max(from))),
            (None, Some(to)) => Some(DateRange::spanning(far_past().min(to), to)),
            (Some(from), Some(to)) => Some(DateRange::spanning(from, to)),
        }
    }
}

pub struct RentalSearchEngine<S> {
    store: Arc<S>,
}

impl<S: RecordStore> RentalSearchEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        RentalSearchEngine { store }
    }

    /// Positional form of [`search`](Self::search).
    pub async fn search_rentals(
        &self,
        client_name: Option<&str>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        car_brand: Option<&str>,
    ) -> RentalResult<Vec<Rental>> {
        let criteria = SearchCriteria {
            client_name: client_name.map(str::to_string),
            date_from,
            date_to,
            car_brand: car_brand.map(str::to_string),
        };
        self.search(&criteria).await
    }

    /// Rentals matching every criterion that is set.
    ///
    /// Results follow the order of the first criterion's query (client name,
    /// then dates, then brand).
    pub async fn search(&self, criteria: &SearchCriteria) -> RentalResult<Vec<Rental>> {
        let client_name = match criteria.client_name.as_deref() {
            Some(term) => validate_search_term("client_name", term)?,
            None => None,
        };
        let car_brand = match criteria.car_brand.as_deref() {
            Some(term) => validate_search_term("car_brand", term)?,
            None => None,
        };
        let range = criteria.date_range();

        let mut sets = Vec::new();

        if let Some(name) = &client_name {
            sets.push(self.store.rentals_by_client_name(name).await?);
        }
        if let Some(range) = range {
            sets.push(self.store.rentals_in_range(range).await?);
        }
        if let Some(brand) = &car_brand {
            sets.push(self.store.rentals_by_car_brand(brand).await?);
        }

        if sets.is_empty() {
            debug!("Search without criteria, returning all rentals");
            return Ok(self.store.rentals().await?);
        }

        let criteria_used = sets.len();
        let results = intersect_by_id(sets);

        debug!(
            client_name = ?client_name,
            range = ?range.map(|r| r.to_string()),
            car_brand = ?car_brand,
            criteria_used,
            results = results.len(),
            "Rental search"
        );

        Ok(results)
    }
}

/// Keeps the rentals of the first set whose id appears in every other set.
pub fn intersect_by_id(sets: Vec<Vec<Rental>>) -> Vec<Rental> {
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return Vec::new();
    };

    let others: Vec<HashSet<_>> = sets
        .map(|set| set.iter().map(|r| r.id).collect())
        .collect();

    first
        .into_iter()
        .filter(|r| others.iter().all(|ids| ids.contains(&r.id)))
        .collect()
}
