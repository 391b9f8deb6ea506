//! Tests for the pagination state machine.

use super::*;
use crate::source::BatchGenerator;

// ===== Test Helpers =====

fn run_fetch(controller: &mut PaginationController, generator: &BatchGenerator) -> Completion {
    let ticket = controller
        .fetch_more()
        .ticket()
        .expect("fetch should start");
    controller.complete(ticket, Ok(generator.generate(ticket.page_index())))
}

fn unavailable(page_index: u32) -> FetchError {
    FetchError::SourceUnavailable {
        page_index,
        reason: "offline".to_string(),
    }
}

// ===== fetch_more =====

#[test]
fn new_controller_is_idle_and_empty() {
    let controller = PaginationController::new(18);
    assert_eq!(controller.phase(), FetchPhase::Idle);
    assert!(controller.items().is_empty());
    assert_eq!(controller.state().next_page_index(), 0);
    assert!(controller.state().has_more());
}

#[test]
fn fetch_more_sets_loading_for_next_page() {
    let mut controller = PaginationController::new(18);

    let outcome = controller.fetch_more();

    let ticket = outcome.ticket().expect("should start");
    assert_eq!(ticket.page_index(), 0);
    assert!(controller.state().is_loading());
    assert_eq!(controller.phase(), FetchPhase::Loading);
}

#[test]
fn fetch_more_while_loading_is_dropped() {
    let mut controller = PaginationController::new(18);
    let first = controller.fetch_more();

    let second = controller.fetch_more();
    let third = controller.fetch_more();

    assert!(matches!(first, FetchOutcome::Started(_)));
    assert_eq!(second, FetchOutcome::Skipped(SkipReason::InFlight));
    assert_eq!(third, FetchOutcome::Skipped(SkipReason::InFlight));
    assert_eq!(controller.in_flight(), first.ticket());
}

#[test]
fn redundant_calls_do_not_duplicate_appends() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    let ticket = controller.fetch_more().ticket().unwrap();
    for _ in 0..5 {
        controller.fetch_more();
    }

    controller.complete(ticket, Ok(generator.generate(0)));

    assert_eq!(controller.items().len(), 6);
    assert_eq!(controller.state().next_page_index(), 1);
}

// ===== complete =====

#[test]
fn completion_appends_and_advances_page() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);

    let completion = run_fetch(&mut controller, &generator);

    assert_eq!(
        completion,
        Completion::Appended {
            added: 6,
            total: 6,
            exhausted: false
        }
    );
    assert!(!controller.state().is_loading());
    assert_eq!(controller.state().next_page_index(), 1);
    assert_eq!(controller.phase(), FetchPhase::Idle);
}

#[test]
fn n_fetches_yield_n_pages_of_items() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(1000);

    for _ in 0..7 {
        run_fetch(&mut controller, &generator);
    }

    assert_eq!(controller.items().len(), 42);
    assert_eq!(controller.state().next_page_index(), 7);
}

#[test]
fn batches_are_appended_in_page_order() {
    let generator = BatchGenerator::new(3);
    let mut controller = PaginationController::new(1000);

    for _ in 0..4 {
        run_fetch(&mut controller, &generator);
    }

    let ids: Vec<u64> = controller.items().iter().map(|item| item.id()).collect();
    assert_eq!(ids, (0..12).collect::<Vec<_>>());
}

#[test]
fn ceiling_scenario_page_size_6_max_18() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(18);

    for _ in 0..3 {
        run_fetch(&mut controller, &generator);
    }

    assert_eq!(controller.items().len(), 18);
    assert!(!controller.state().has_more());
    assert_eq!(controller.phase(), FetchPhase::Exhausted);

    let fourth = controller.fetch_more();
    assert_eq!(fourth, FetchOutcome::Skipped(SkipReason::Exhausted));
    assert_eq!(controller.items().len(), 18);
    assert!(!controller.state().is_loading());
}

#[test]
fn last_batch_is_not_truncated_at_ceiling() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(10);

    run_fetch(&mut controller, &generator);
    let completion = run_fetch(&mut controller, &generator);

    assert_eq!(
        completion,
        Completion::Appended {
            added: 6,
            total: 12,
            exhausted: true
        }
    );
}

#[test]
fn zero_ceiling_starts_exhausted() {
    let mut controller = PaginationController::new(0);
    assert_eq!(controller.phase(), FetchPhase::Exhausted);
    assert_eq!(
        controller.fetch_more(),
        FetchOutcome::Skipped(SkipReason::Exhausted)
    );
}

// ===== failure =====

#[test]
fn failed_fetch_clears_loading_and_keeps_state() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    run_fetch(&mut controller, &generator);

    let ticket = controller.fetch_more().ticket().unwrap();
    let completion = controller.complete(ticket, Err(unavailable(1)));

    assert_eq!(completion, Completion::Failed(unavailable(1)));
    assert!(!controller.state().is_loading());
    assert!(controller.state().has_more(), "failure must not exhaust the feed");
    assert_eq!(controller.items().len(), 6);
    assert_eq!(controller.state().next_page_index(), 1);
}

#[test]
fn failed_fetch_allows_retry_of_same_page() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    let ticket = controller.fetch_more().ticket().unwrap();
    controller.complete(ticket, Err(unavailable(0)));

    let retry = controller.fetch_more().ticket().expect("retry should start");

    assert_eq!(retry.page_index(), 0);
    controller.complete(retry, Ok(generator.generate(0)));
    assert_eq!(controller.items().len(), 6);
}

// ===== cancellation =====

#[test]
fn cancel_clears_loading_without_advancing() {
    let mut controller = PaginationController::new(60);
    let ticket = controller.fetch_more().ticket().unwrap();

    let cancelled = controller.cancel();

    assert_eq!(cancelled, Some(ticket));
    assert!(!controller.state().is_loading());
    assert_eq!(controller.state().next_page_index(), 0);
}

#[test]
fn completion_after_cancel_is_stale() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    let ticket = controller.fetch_more().ticket().unwrap();
    controller.cancel();

    let completion = controller.complete(ticket, Ok(generator.generate(0)));

    assert_eq!(completion, Completion::Stale);
    assert!(controller.items().is_empty());
}

#[test]
fn stale_completion_does_not_touch_newer_fetch() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    let old = controller.fetch_more().ticket().unwrap();
    controller.cancel();
    let fresh = controller.fetch_more().ticket().unwrap();

    assert_eq!(old.page_index(), fresh.page_index());
    assert_ne!(old, fresh);

    assert_eq!(
        controller.complete(old, Ok(generator.generate(0))),
        Completion::Stale
    );
    assert!(controller.state().is_loading(), "newer fetch still in flight");

    controller.complete(fresh, Ok(generator.generate(0)));
    assert_eq!(controller.items().len(), 6);
}

#[test]
fn cancel_when_idle_is_noop() {
    let mut controller = PaginationController::new(60);
    assert_eq!(controller.cancel(), None);
    assert_eq!(controller.phase(), FetchPhase::Idle);
}

#[test]
fn duplicate_completion_is_stale() {
    let generator = BatchGenerator::new(6);
    let mut controller = PaginationController::new(60);
    let ticket = controller.fetch_more().ticket().unwrap();
    controller.complete(ticket, Ok(generator.generate(0)));

    let again = controller.complete(ticket, Ok(generator.generate(0)));

    assert_eq!(again, Completion::Stale);
    assert_eq!(controller.items().len(), 6);
}
