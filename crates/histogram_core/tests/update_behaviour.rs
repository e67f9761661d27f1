use std::sync::Once;

use histogram_core::{
    update, AppState, Effect, Msg, RankedEntry, RequestId, Status, DEFAULT_SOURCE_URL,
    DEFAULT_TOP_K,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(histogram_logging::initialize_for_tests);
}

fn submit(state: AppState) -> (AppState, RequestId) {
    let (state, effects) = update(state, Msg::SubmitClicked);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchText { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("fetch effect");
    (state, request_id)
}

fn deliver(state: AppState, request_id: RequestId, text: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::FetchSucceeded {
            request_id,
            text: text.to_string(),
            fetched_utc: "2024-01-01T00:00:00Z".to_string(),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn new_state_uses_defaults() {
    let view = AppState::new().view();
    assert_eq!(view.source_url, DEFAULT_SOURCE_URL);
    assert_eq!(view.top_k, DEFAULT_TOP_K);
    assert_eq!(view.status, Status::Idle);
    assert!(view.rows.is_empty());
    assert!(!view.can_export);
    assert!(!view.in_flight);
}

#[test]
fn submit_emits_fetch_for_current_url() {
    init_logging();
    let state = AppState::with_source("https://example.com/doc.txt", 5);
    let (mut next, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::FetchText {
            request_id: 1,
            url: "https://example.com/doc.txt".to_string(),
        }]
    );
    let view = next.view();
    assert_eq!(view.status, Status::Fetching);
    assert!(view.in_flight);
    assert!(next.consume_dirty());
    assert!(!next.consume_dirty());
}

#[test]
fn url_changes_are_trimmed_and_used_on_submit() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::UrlChanged("  http://localhost:9000/words  ".to_string()),
    );
    assert_eq!(state.view().source_url, "http://localhost:9000/words");

    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchText {
            request_id: 1,
            url: "http://localhost:9000/words".to_string(),
        }]
    );
}

#[test]
fn invalid_url_is_rejected_without_effects() {
    init_logging();
    let state = AppState::with_source("not a url", DEFAULT_TOP_K);
    let (next, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(
        next.view().status,
        Status::InvalidUrl {
            input: "not a url".to_string()
        }
    );
    assert!(!next.view().in_flight);
}

#[test]
fn successful_fetch_builds_ranked_rows() {
    init_logging();
    let (state, request_id) = submit(AppState::new());
    let state = deliver(state, request_id, "x y x y z");

    let view = state.view();
    assert_eq!(view.status, Status::Ready);
    assert_eq!(
        view.rows,
        vec![
            RankedEntry::new("x", 2),
            RankedEntry::new("y", 2),
            RankedEntry::new("z", 1),
        ]
    );
    assert_eq!(view.total_tokens, 5);
    assert_eq!(view.distinct_tokens, 3);
    assert_eq!(view.max_count(), 2);
    assert_eq!(view.fetched_utc.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert!(view.can_export);
    assert!(!view.in_flight);
}

#[test]
fn top_k_applies_to_next_fetch() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::TopKChanged(1));
    let (state, request_id) = submit(state);
    let state = deliver(state, request_id, "a b c a");

    assert_eq!(state.view().rows, vec![RankedEntry::new("a", 2)]);
}

#[test]
fn empty_document_is_not_an_error() {
    init_logging();
    let (state, request_id) = submit(AppState::new());
    let state = deliver(state, request_id, "  \n\t ");

    let view = state.view();
    assert_eq!(view.status, Status::Ready);
    assert!(view.rows.is_empty());
    assert_eq!(view.max_count(), 0);
    assert!(view.can_export);
}

#[test]
fn progress_is_tracked_for_current_request_only() {
    init_logging();
    let (state, first) = submit(AppState::new());
    let (mut state, second) = submit(state);
    assert_eq!(state.view().received_bytes, None);
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::FetchProgress {
            request_id: first,
            received_bytes: 999,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().received_bytes, None);
    assert!(!state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::FetchProgress {
            request_id: second,
            received_bytes: 65_536,
        },
    );
    assert_eq!(state.view().received_bytes, Some(65_536));
    assert!(state.consume_dirty());

    let state = deliver(state, second, "done");
    let view = state.view();
    assert!(!view.in_flight);
    assert_eq!(view.received_bytes, None);
}

#[test]
fn failed_fetch_keeps_previous_histogram() {
    init_logging();
    let (state, first) = submit(AppState::new());
    let state = deliver(state, first, "a a b");
    let before = state.view().rows;

    let (state, second) = submit(state);
    let (state, effects) = update(
        state,
        Msg::FetchFailed {
            request_id: second,
            reason: "http status 503".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.rows, before);
    assert_eq!(
        view.status,
        Status::FetchFailed {
            reason: "http status 503".to_string()
        }
    );
    assert!(view.can_export);
    assert!(!view.in_flight);
}

#[test]
fn stale_responses_are_ignored() {
    init_logging();
    let (state, first) = submit(AppState::new());
    let (state, second) = submit(state);
    assert_ne!(first, second);

    let state = deliver(state, second, "new new old");
    let state = deliver(state, first, "old old old new");

    assert_eq!(
        state.view().rows,
        vec![RankedEntry::new("new", 2), RankedEntry::new("old", 1)]
    );

    let (state, _) = update(
        state,
        Msg::FetchFailed {
            request_id: first,
            reason: "late timeout".to_string(),
        },
    );
    assert_eq!(state.view().status, Status::Ready);
}

#[test]
fn export_without_histogram_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ExportClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn export_emits_csv_of_current_rows() {
    init_logging();
    let (state, request_id) = submit(AppState::new());
    let state = deliver(state, request_id, "a b a");

    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::ExportCsv {
            csv: "Word,Count\na,2\nb,1".to_string()
        }]
    );

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            result: Ok("output/histogram_data.csv".to_string()),
        },
    );
    assert_eq!(
        state.view().status,
        Status::Exported {
            path: "output/histogram_data.csv".to_string()
        }
    );

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            result: Err("disk full".to_string()),
        },
    );
    assert_eq!(
        state.view().status,
        Status::ExportFailed {
            reason: "disk full".to_string()
        }
    );
    assert_eq!(state.view().rows.len(), 2);
}
