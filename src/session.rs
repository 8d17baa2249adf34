//! The owner of the current transaction set and view state.
//!
//! Every piece of state is an immutable snapshot replaced wholesale, so the
//! aggregation and flattening passes only ever see consistent values.

use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::error::Result;
use crate::flatten::{flatten, toggle, ExpandedSet, RenderRow};
use crate::importer::{decode_csv, AmountPolicy};
use crate::models::{Category, DateRange, Filters, KindFilter, Transaction};

/// Identifies one file load. Only the most recently issued ticket may apply
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was started (or the session cleared) before this one
    /// finished; its result was discarded.
    Stale,
}

pub struct Session {
    transactions: Arc<[Transaction]>,
    expanded: Arc<ExpandedSet>,
    filters: Filters,
    default_kind: KindFilter,
    policy: AmountPolicy,
    latest: u64,
    source: Option<String>,
}

impl Session {
    pub fn new(policy: AmountPolicy, default_kind: KindFilter) -> Self {
        Self {
            transactions: Arc::from(Vec::new()),
            expanded: Arc::new(ExpandedSet::new()),
            filters: Filters {
                range: DateRange::default(),
                kind: default_kind,
            },
            default_kind,
            policy,
            latest: 0,
            source: None,
        }
    }

    /// Start from an already-validated set, e.g. one read back from the store.
    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = Arc::from(transactions);
        self
    }

    pub fn transactions(&self) -> Arc<[Transaction]> {
        Arc::clone(&self.transactions)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    /// Clear the date range and go back to the default kind.
    pub fn reset_filters(&mut self) {
        self.filters = Filters {
            range: DateRange::default(),
            kind: self.default_kind,
        };
    }

    pub fn expanded(&self) -> Arc<ExpandedSet> {
        Arc::clone(&self.expanded)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    /// Apply the outcome of reading `source`. A stale ticket is ignored.
    /// On a read or decode failure the current set is kept and the error
    /// returned.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        source: &str,
        content: Result<String>,
    ) -> Result<LoadOutcome> {
        if ticket.0 != self.latest {
            warn!(source, ticket = ticket.0, latest = self.latest, "discarding stale load");
            return Ok(LoadOutcome::Stale);
        }
        let text = content?;
        let decoded = decode_csv(&text, self.policy)?;
        let count = decoded.len();
        self.transactions = Arc::from(decoded);
        self.source = Some(source.to_string());
        info!(source, count, "replaced transaction set");
        Ok(LoadOutcome::Applied { count })
    }

    /// Drop the current set. Pending loads become stale.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.transactions = Arc::from(Vec::new());
        self.expanded = Arc::new(ExpandedSet::new());
        self.source = None;
    }

    pub fn categories(&self) -> Vec<Category> {
        aggregate(&self.transactions, &self.filters)
    }

    pub fn rows(&self) -> Vec<RenderRow> {
        flatten(&self.categories(), &self.expanded)
    }

    /// Expand or collapse the category behind `row`.
    pub fn toggle(&mut self, row: &RenderRow) {
        let next = toggle(&self.categories(), &self.expanded, row);
        self.expanded = Arc::new(next);
    }
}
