//! Idempotency integration tests: at-most-one-effect behavior across a
//! fresh reserve, a matching replay, a conflicting replay, and a failed
//! outcome also being replayed verbatim rather than retried.

use lottery_engine_core::idempotency::{self, IdempotencyError, Reservation};
use lottery_engine_core::models::IdempotencyStatus;
use lottery_engine_core::store::InProcessStore;
use serde_json::json;

#[test]
fn fresh_key_then_commit_then_replay_is_byte_identical() {
    let mut store = InProcessStore::new();
    let request = json!({"user_id": 1, "draw_count": 5});

    let reservation = idempotency::reserve(&mut store, "draw-1", "execute_draw", &request, 0).unwrap();
    assert!(matches!(reservation, Reservation::Fresh));

    let response = json!({"success": true, "code": "OK", "data": {"draw_count": 5}});
    idempotency::commit(&mut store, "draw-1", IdempotencyStatus::Completed, response.clone(), 1);

    let replay = idempotency::reserve(&mut store, "draw-1", "execute_draw", &request, 2).unwrap();
    match replay {
        Reservation::Replayed(body) => assert_eq!(body, response),
        Reservation::Fresh => panic!("a settled key must replay, not re-process"),
    }
}

#[test]
fn failed_outcomes_replay_too_rather_than_retrying() {
    let mut store = InProcessStore::new();
    let request = json!({"user_id": 1, "draw_count": 5});

    idempotency::reserve(&mut store, "draw-1", "execute_draw", &request, 0).unwrap();
    let failure = json!({"success": false, "code": "INSUFFICIENT_POINTS"});
    idempotency::commit(&mut store, "draw-1", IdempotencyStatus::Failed, failure.clone(), 1);

    let replay = idempotency::reserve(&mut store, "draw-1", "execute_draw", &request, 2).unwrap();
    match replay {
        Reservation::Replayed(body) => assert_eq!(body, failure),
        Reservation::Fresh => panic!("a failed-and-settled key must still replay"),
    }
}

#[test]
fn mismatched_parameters_under_the_same_key_is_a_conflict() {
    let mut store = InProcessStore::new();
    idempotency::reserve(&mut store, "draw-1", "execute_draw", &json!({"draw_count": 1}), 0).unwrap();
    idempotency::commit(&mut store, "draw-1", IdempotencyStatus::Completed, json!({"ok": true}), 1);

    let err = idempotency::reserve(&mut store, "draw-1", "execute_draw", &json!({"draw_count": 10}), 2).unwrap_err();
    assert_eq!(err, IdempotencyError::Conflict("draw-1".to_string()));
}

#[test]
fn mismatched_canonical_op_under_the_same_key_is_a_conflict() {
    let mut store = InProcessStore::new();
    idempotency::reserve(&mut store, "key-1", "execute_draw", &json!({"a": 1}), 0).unwrap();
    idempotency::commit(&mut store, "key-1", IdempotencyStatus::Completed, json!({"ok": true}), 1);

    let err = idempotency::reserve(&mut store, "key-1", "convert_asset", &json!({"a": 1}), 2).unwrap_err();
    assert_eq!(err, IdempotencyError::Conflict("key-1".to_string()));
}

#[test]
fn reserving_the_same_key_twice_while_processing_stays_fresh() {
    let mut store = InProcessStore::new();
    let request = json!({"a": 1});
    idempotency::reserve(&mut store, "key-1", "execute_draw", &request, 0).unwrap();
    let second = idempotency::reserve(&mut store, "key-1", "execute_draw", &request, 1).unwrap();
    assert!(matches!(second, Reservation::Fresh));
}

#[test]
fn sweep_promotes_a_stale_processing_row_to_failed() {
    let mut store = InProcessStore::new();
    let request = json!({"a": 1});
    idempotency::reserve(&mut store, "stuck-1", "execute_draw", &request, 0).unwrap();

    // Still within the processing timeout: nothing to do yet.
    let touched = idempotency::sweep(&mut store, 30);
    assert!(touched.is_empty());
    let still_fresh = idempotency::reserve(&mut store, "stuck-1", "execute_draw", &request, 31).unwrap();
    assert!(matches!(still_fresh, Reservation::Fresh));

    // Past the processing timeout: the row is promoted to failed and replays.
    let touched = idempotency::sweep(&mut store, 61);
    assert_eq!(touched, vec!["stuck-1".to_string()]);
    let replay = idempotency::reserve(&mut store, "stuck-1", "execute_draw", &request, 62).unwrap();
    match replay {
        Reservation::Replayed(body) => assert_eq!(body, json!(null)),
        Reservation::Fresh => panic!("a swept processing row must replay as failed, not re-process"),
    }
}

#[test]
fn sweep_deletes_an_expired_completed_row() {
    let mut store = InProcessStore::new();
    let request = json!({"a": 1});
    idempotency::reserve(&mut store, "done-1", "execute_draw", &request, 0).unwrap();
    idempotency::commit(&mut store, "done-1", IdempotencyStatus::Completed, json!({"ok": true}), 1);

    let touched = idempotency::sweep(&mut store, idempotency::DEFAULT_TTL_COMPLETED_SECONDS + 2);
    assert_eq!(touched, vec!["done-1".to_string()]);

    // The row is gone, so the same key is free to be reserved again.
    let reservation = idempotency::reserve(&mut store, "done-1", "execute_draw", &json!({"b": 2}), idempotency::DEFAULT_TTL_COMPLETED_SECONDS + 3).unwrap();
    assert!(matches!(reservation, Reservation::Fresh));
}
