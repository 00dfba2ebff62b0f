// ═══════════════════════════════════════════════════════════════════
// PortfolioStore — merge semantics, aggregate derivation, and
// persistence synchronization
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crypto_dashboard_core::errors::CoreError;
use crypto_dashboard_core::models::portfolio::PortfolioEntry;
use crypto_dashboard_core::storage::slot::{MemorySlot, PortfolioSlot};
use crypto_dashboard_core::storage;
use crypto_dashboard_core::stores::portfolio_store::PortfolioStore;

fn entry(id: &str, price: f64, amount: f64, change: Option<f64>) -> PortfolioEntry {
    PortfolioEntry {
        id: id.into(),
        name: id.to_uppercase(),
        symbol: id[..3.min(id.len())].to_uppercase(),
        price,
        amount,
        change_percent_24hr: change,
    }
}

fn empty_store() -> PortfolioStore {
    PortfolioStore::new(Box::new(MemorySlot::new()))
}

/// Slot whose writes always fail, for testing the log-and-continue path.
struct BrokenSlot;

impl PortfolioSlot for BrokenSlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        Ok(None)
    }

    fn write(&self, _payload: &str) -> Result<(), CoreError> {
        Err(CoreError::Storage("disk on fire".into()))
    }
}

/// Slot counting writes, shared with the test via Arc.
#[derive(Default)]
struct CountingSlot {
    writes: AtomicUsize,
}

impl PortfolioSlot for CountingSlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        Ok(None)
    }

    fn write(&self, _payload: &str) -> Result<(), CoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════
//  add_or_update
// ═══════════════════════════════════════════════════════════════════

mod add_or_update {
    use super::*;

    #[test]
    fn inserts_new_entry() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bitcoin").unwrap().amount, 2.0);
    }

    #[test]
    fn same_id_is_replaced_wholesale_last_write_wins() {
        let mut store = empty_store();
        let e1 = entry("bitcoin", 50000.0, 2.0, Some(5.0));
        let mut e2 = entry("bitcoin", 48000.0, 3.0, Some(-1.0));
        e2.name = "Bitcoin (renamed)".into();
        store.add_or_update(e1).unwrap();
        store.add_or_update(e2.clone()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bitcoin").unwrap(), &e2);
    }

    #[test]
    fn amounts_are_not_summed() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        store.add_or_update(entry("bitcoin", 50000.0, 1.0, Some(5.0))).unwrap();
        assert_eq!(store.get("bitcoin").unwrap().amount, 1.0); // not 3
    }

    #[test]
    fn rejects_empty_id_without_touching_mapping() {
        let mut store = empty_store();
        let err = store.add_or_update(entry("", 1.0, 1.0, None)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_amount_below_one() {
        let mut store = empty_store();
        assert!(store.add_or_update(entry("bitcoin", 1.0, 0.0, None)).is_err());
        assert!(store.add_or_update(entry("bitcoin", 1.0, 0.99, None)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn all_amounts_stay_at_least_one_after_valid_sequences() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, None)).unwrap();
        store.add_or_update(entry("ethereum", 3000.0, 5.0, None)).unwrap();
        store.add_or_update(entry("bitcoin", 50000.0, 1.0, None)).unwrap();
        let _ = store.add_or_update(entry("tether", 1.0, 0.2, None));
        assert!(store.entries().iter().all(|e| e.amount >= 1.0));
    }

    #[test]
    fn distinct_ids_accumulate_in_insertion_order() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 1.0, 1.0, None)).unwrap();
        store.add_or_update(entry("ethereum", 1.0, 1.0, None)).unwrap();
        store.add_or_update(entry("tether", 1.0, 1.0, None)).unwrap();
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["bitcoin", "ethereum", "tether"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  remove
// ═══════════════════════════════════════════════════════════════════

mod remove {
    use super::*;

    #[test]
    fn removes_and_returns_entry() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        let removed = store.remove("bitcoin").unwrap();
        assert_eq!(removed.id, "bitcoin");
        assert!(store.is_empty());
        assert_eq!(store.aggregate().total_cost, 0.0);
    }

    #[test]
    fn unknown_id_returns_none() {
        let mut store = empty_store();
        assert!(store.remove("dogecoin").is_none());
    }

    #[test]
    fn removing_unknown_id_does_not_persist() {
        let slot = Arc::new(CountingSlot::default());
        let mut store = PortfolioStore::new(Box::new(Arc::clone(&slot)));
        store.add_or_update(entry("bitcoin", 1.0, 1.0, None)).unwrap();
        let writes_before = slot.writes.load(Ordering::SeqCst);
        store.remove("dogecoin");
        assert_eq!(slot.writes.load(Ordering::SeqCst), writes_before);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  bulk_set
// ═══════════════════════════════════════════════════════════════════

mod bulk_set {
    use super::*;

    #[test]
    fn replaces_mapping_wholesale() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 1.0, 1.0, None)).unwrap();
        store.bulk_set(vec![
            entry("ethereum", 3000.0, 2.0, None),
            entry("tether", 1.0, 100.0, None),
        ]);
        assert!(store.get("bitcoin").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn duplicate_ids_dedup_last_occurrence_wins() {
        let mut store = empty_store();
        store.bulk_set(vec![
            entry("bitcoin", 50000.0, 2.0, None),
            entry("ethereum", 3000.0, 1.0, None),
            entry("bitcoin", 48000.0, 7.0, None),
        ]);
        assert_eq!(store.len(), 2);
        let btc = store.get("bitcoin").unwrap();
        assert_eq!(btc.price, 48000.0);
        assert_eq!(btc.amount, 7.0);
    }

    #[test]
    fn does_not_write_to_the_slot() {
        let slot = Arc::new(CountingSlot::default());
        let mut store = PortfolioStore::new(Box::new(Arc::clone(&slot)));
        store.bulk_set(vec![entry("bitcoin", 1.0, 1.0, None)]);
        assert_eq!(slot.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn refreshes_the_aggregate() {
        let mut store = empty_store();
        store.bulk_set(vec![entry("bitcoin", 50000.0, 2.0, Some(5.0))]);
        assert_eq!(store.aggregate().total_cost, 100000.0);
        assert_eq!(store.aggregate().total_change, 5000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  compute_aggregate
// ═══════════════════════════════════════════════════════════════════

mod compute_aggregate {
    use super::*;

    #[test]
    fn empty_mapping_yields_zeros() {
        let store = empty_store();
        let agg = store.compute_aggregate();
        assert_eq!(agg.total_cost, 0.0);
        assert_eq!(agg.total_change, 0.0);
    }

    #[test]
    fn bitcoin_scenario() {
        // 2 BTC @ 50000, +5% over 24h → cost 100000, change 5000
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        let agg = store.compute_aggregate();
        assert_eq!(agg.total_cost, 100000.0);
        assert_eq!(agg.total_change, 5000.0);
    }

    #[test]
    fn missing_change_counts_as_zero() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, None)).unwrap();
        store.add_or_update(entry("ethereum", 3000.0, 10.0, Some(-2.0))).unwrap();
        let agg = store.compute_aggregate();
        assert_eq!(agg.total_cost, 130000.0);
        assert_eq!(agg.total_change, -600.0);
    }

    #[test]
    fn is_pure_two_calls_agree() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        store.add_or_update(entry("ethereum", 3000.0, 4.0, Some(1.5))).unwrap();
        assert_eq!(store.compute_aggregate(), store.compute_aggregate());
    }

    #[test]
    fn cached_aggregate_tracks_every_mutation() {
        let mut store = empty_store();
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        assert_eq!(store.aggregate(), store.compute_aggregate());
        store.add_or_update(entry("bitcoin", 50000.0, 1.0, Some(5.0))).unwrap();
        assert_eq!(store.aggregate(), store.compute_aggregate());
        store.remove("bitcoin");
        assert_eq!(store.aggregate(), store.compute_aggregate());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Persistence synchronization
// ═══════════════════════════════════════════════════════════════════

mod persistence {
    use super::*;

    #[test]
    fn every_mutation_writes_the_full_mapping() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = PortfolioStore::new(Box::new(Arc::clone(&slot)));

        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        let decoded = storage::decode_entries(&slot.contents().unwrap()).unwrap();
        assert_eq!(decoded, store.entries());

        store.add_or_update(entry("ethereum", 3000.0, 1.0, None)).unwrap();
        let decoded = storage::decode_entries(&slot.contents().unwrap()).unwrap();
        assert_eq!(decoded, store.entries());
        assert_eq!(decoded.len(), 2);

        store.remove("bitcoin");
        let decoded = storage::decode_entries(&slot.contents().unwrap()).unwrap();
        assert_eq!(decoded, store.entries());
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn rehydrate_restores_previous_session() {
        let payload = storage::encode_entries(&[
            entry("bitcoin", 50000.0, 2.0, Some(5.0)),
            entry("ethereum", 3000.0, 4.0, None),
        ])
        .unwrap();
        let mut store = PortfolioStore::new(Box::new(MemorySlot::with_payload(payload)));
        store.rehydrate();

        assert_eq!(store.len(), 2);
        assert_eq!(store.aggregate().total_cost, 112000.0);
    }

    #[test]
    fn rehydrate_from_empty_slot_yields_empty_portfolio() {
        let mut store = PortfolioStore::new(Box::new(MemorySlot::new()));
        store.rehydrate();
        assert!(store.is_empty());
    }

    #[test]
    fn rehydrate_from_corrupt_payload_fails_soft() {
        for garbage in ["not json at all", "{\"id\":", "42", "{\"a\":1}"] {
            let mut store = PortfolioStore::new(Box::new(MemorySlot::with_payload(garbage)));
            store.rehydrate();
            assert!(store.is_empty(), "payload {garbage:?} should yield empty");
            assert_eq!(store.aggregate().total_cost, 0.0);
        }
    }

    #[test]
    fn rehydrate_dedups_duplicate_ids_last_wins() {
        // A malformed persisted payload may contain duplicate ids; the JSON
        // round-trip alone does not dedup them.
        let payload = storage::encode_entries(&[
            entry("bitcoin", 50000.0, 2.0, None),
            entry("bitcoin", 48000.0, 1.0, None),
        ])
        .unwrap();
        let mut store = PortfolioStore::new(Box::new(MemorySlot::with_payload(payload)));
        store.rehydrate();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bitcoin").unwrap().price, 48000.0);
    }

    #[test]
    fn slot_write_failure_is_non_fatal() {
        let mut store = PortfolioStore::new(Box::new(BrokenSlot));
        store.add_or_update(entry("bitcoin", 50000.0, 2.0, Some(5.0))).unwrap();
        // Mapping and aggregate stay correct in memory.
        assert_eq!(store.len(), 1);
        assert_eq!(store.aggregate().total_cost, 100000.0);
    }
}
