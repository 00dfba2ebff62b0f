use tracing::warn;

use crate::errors::CoreError;
use crate::models::portfolio::{PortfolioAggregate, PortfolioEntry};
use crate::storage::{self, slot::PortfolioSlot};

/// The portfolio store: a unique-by-id mapping of tracked holdings, the
/// derived cost/change aggregate, and synchronization with the persistence
/// slot.
///
/// Mutations are synchronous and atomic with respect to each other; there is
/// no parallelism in this component. Side-effect discipline:
/// - every mutation recomputes the aggregate, then writes the full entry set
///   to the slot (best-effort, write failures are logged and swallowed);
/// - `bulk_set` is the read path (rehydration) and never writes back.
pub struct PortfolioStore {
    /// Insertion-ordered entries, at most one per id.
    entries: Vec<PortfolioEntry>,
    aggregate: PortfolioAggregate,
    slot: Box<dyn PortfolioSlot>,
}

impl PortfolioStore {
    /// Create an empty store around an injected persistence slot.
    /// Call `rehydrate()` once, before any other operation, to load the
    /// previous session's portfolio.
    pub fn new(slot: Box<dyn PortfolioSlot>) -> Self {
        Self {
            entries: Vec::new(),
            aggregate: PortfolioAggregate::default(),
            slot,
        }
    }

    /// Load the persisted portfolio from the slot, replacing the current
    /// entry set.
    ///
    /// Fails soft: an unreadable slot or a malformed payload yields an empty
    /// portfolio (with a warning), never an error — the application must
    /// start regardless of what a previous session left behind.
    pub fn rehydrate(&mut self) {
        let payload = match self.slot.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read persisted portfolio, starting empty: {e}");
                return;
            }
        };
        match storage::decode_entries(&payload) {
            Ok(entries) => self.bulk_set(entries),
            Err(e) => {
                warn!("Persisted portfolio is malformed, starting empty: {e}");
            }
        }
    }

    /// Insert the entry, or replace the existing entry with the same id.
    ///
    /// Replacement is wholesale — amounts are never summed, fields are never
    /// merged. Rejects entries violating the input contract (empty id,
    /// amount < 1) without touching the mapping.
    pub fn add_or_update(&mut self, entry: PortfolioEntry) -> Result<(), CoreError> {
        entry.validate()?;
        match self.entries.iter().position(|e| e.id == entry.id) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
        self.aggregate = self.compute_aggregate();
        self.persist();
        Ok(())
    }

    /// Remove an entry by id. Returns the removed entry, or `None` if the
    /// id was not tracked (no persistence write happens in that case).
    pub fn remove(&mut self, id: &str) -> Option<PortfolioEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(idx);
        self.aggregate = self.compute_aggregate();
        self.persist();
        Some(removed)
    }

    /// Replace the entire entry set at once, deduplicating by id — the last
    /// occurrence of a duplicated id wins.
    ///
    /// This is the rehydration path: it does NOT write to the slot. Input is
    /// taken as-is (persisted data is not re-validated), so a portfolio
    /// saved by an older build always loads.
    pub fn bulk_set(&mut self, entries: Vec<PortfolioEntry>) {
        let mut deduped: Vec<PortfolioEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.iter().position(|e| e.id == entry.id) {
                Some(idx) => deduped[idx] = entry,
                None => deduped.push(entry),
            }
        }
        self.entries = deduped;
        self.aggregate = self.compute_aggregate();
    }

    /// Re-derive the aggregate from the current entry set. Pure — no side
    /// effects, safe to call at any time.
    #[must_use]
    pub fn compute_aggregate(&self) -> PortfolioAggregate {
        let mut total_cost = 0.0;
        let mut total_change = 0.0;
        for entry in &self.entries {
            total_cost += entry.cost();
            total_change += entry.change();
        }
        PortfolioAggregate {
            total_cost,
            total_change,
        }
    }

    /// The aggregate as of the last mutation.
    #[must_use]
    pub fn aggregate(&self) -> PortfolioAggregate {
        self.aggregate
    }

    /// All tracked entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    /// Look up one entry by asset id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PortfolioEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the full entry set to the slot. Failures are non-fatal: the
    /// in-memory mapping remains correct regardless, so we log and continue.
    fn persist(&self) {
        let payload = match storage::encode_entries(&self.entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize portfolio for persistence: {e}");
                return;
            }
        };
        if let Err(e) = self.slot.write(&payload) {
            warn!("Failed to persist portfolio: {e}");
        }
    }
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore")
            .field("entries", &self.entries.len())
            .field("aggregate", &self.aggregate)
            .finish()
    }
}
