// Property tests for AlertStateStore
//
// Random sequences of load / mark-read / mark-all / delete must keep the
// cached unread counter equal to a full recount.
//
// Run with: cargo test -p sentinelx-core --test store_properties_test

use proptest::prelude::*;
use sentinelx_core::{AlertId, AlertRecord, AlertStateStore, Badge, Severity};

#[derive(Debug, Clone)]
enum Op {
    Load(Vec<(u8, bool)>),
    MarkRead(u8),
    MarkAllRead,
    Delete(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec((0u8..16, any::<bool>()), 0..12).prop_map(Op::Load),
        (0u8..20).prop_map(Op::MarkRead),
        Just(Op::MarkAllRead),
        (0u8..20).prop_map(Op::Delete),
    ]
}

fn record(id: u8, is_read: bool) -> AlertRecord {
    let record = AlertRecord::new(AlertId::from(id.to_string()), Severity::Medium, "leak");
    if is_read {
        record.read()
    } else {
        record
    }
}

fn recount(store: &AlertStateStore) -> usize {
    store.records().iter().filter(|r| !r.is_read).count()
}

proptest! {
    #[test]
    fn unread_counter_matches_recount(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut store = AlertStateStore::new();

        for op in ops {
            match op {
                Op::Load(items) => {
                    store.load(items.into_iter().map(|(id, read)| record(id, read)).collect());
                }
                Op::MarkRead(id) => {
                    store.mark_read(&AlertId::from(id.to_string()));
                }
                Op::MarkAllRead => {
                    store.mark_all_read();
                }
                Op::Delete(id) => {
                    store.delete(&AlertId::from(id.to_string()));
                }
            }

            prop_assert_eq!(store.unread_count(), recount(&store));
            prop_assert!(store.unread_count() <= store.len());
        }
    }

    #[test]
    fn ids_stay_unique_after_load(items in prop::collection::vec((0u8..8, any::<bool>()), 0..20)) {
        let mut store = AlertStateStore::new();
        store.load(items.into_iter().map(|(id, read)| record(id, read)).collect());

        let mut ids: Vec<&AlertId> = store.records().iter().map(|r| &r.id).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    #[test]
    fn badge_label_respects_cap(count in 0usize..500, cap in 1usize..200) {
        let badge = Badge::from_count(count, cap);
        prop_assert_eq!(badge.visible, count > 0);
        if count > cap {
            prop_assert_eq!(badge.label, format!("{}+", cap));
        } else {
            prop_assert_eq!(badge.label, count.to_string());
        }
    }
}
