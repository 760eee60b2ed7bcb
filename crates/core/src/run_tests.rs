// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn processing() -> RunState {
    RunState::processing(RunEpoch(1), Selection::for_file("legacy.py"))
}

fn run(events: impl IntoIterator<Item = RunEvent>) -> RunState {
    events
        .into_iter()
        .fold(processing(), |state, event| state.transition(&event))
}

fn update(stage: Stage) -> Update {
    Update::new(stage)
}

#[test]
fn new_run_starts_processing_with_empty_fields() {
    let state = processing();
    assert_eq!(state.status, RunStatus::Processing);
    assert_eq!(state.active_stage, None);
    assert_eq!(state.diagnostics, None);
    assert!(state.target.is_empty());
    assert!(state.latest_code.is_empty());
    assert_eq!(state.verdicts, 0);
}

#[test]
fn successful_run() {
    let state = run([
        RunEvent::update(update(Stage::Auditor)),
        RunEvent::update(update(Stage::Engineer).with_code("X")),
        RunEvent::update(update(Stage::Tester).with_code("Y").with_error_logs("")),
    ]);

    assert_eq!(state.status, RunStatus::Success);
    assert_eq!(state.active_stage, Some(Stage::Tester));
    assert_eq!(state.latest_code, "Y");
    assert_eq!(state.diagnostics, None);
    assert_eq!(state.verdicts, 1);
}

#[test]
fn failed_run() {
    let state = run([
        RunEvent::update(update(Stage::Auditor)),
        RunEvent::update(update(Stage::Engineer).with_code("X")),
        RunEvent::update(
            update(Stage::Tester)
                .with_code("Y")
                .with_error_logs("SyntaxError: line 4"),
        ),
    ]);

    assert_eq!(state.status, RunStatus::Fail);
    assert_eq!(state.active_stage, Some(Stage::Tester));
    assert_eq!(state.diagnostics.as_deref(), Some("SyntaxError: line 4"));
}

#[parameterized(
    absent = { None, RunStatus::Success, None },
    empty = { Some(""), RunStatus::Success, None },
    timeout = { Some(TIMEOUT_SENTINEL), RunStatus::Success, Some(TIMEOUT_SENTINEL) },
    error = { Some("NameError: x"), RunStatus::Fail, Some("NameError: x") },
    timeout_lookalike = { Some("Execution timed out"), RunStatus::Fail, Some("Execution timed out") },
)]
fn verdict_outcome(logs: Option<&str>, status: RunStatus, diagnostics: Option<&str>) {
    let mut tester = update(Stage::Tester);
    tester.error_logs = logs.map(str::to_string);

    let state = processing().transition(&RunEvent::update(tester));

    assert_eq!(state.status, status);
    assert_eq!(state.diagnostics.as_deref(), diagnostics);
}

#[test]
fn timeout_is_a_qualified_success() {
    let state = run([RunEvent::update(
        update(Stage::Tester).with_error_logs(TIMEOUT_SENTINEL),
    )]);
    assert!(state.timed_out());
    assert!(state.is_settled());
}

#[parameterized(
    auditor = { Stage::Auditor },
    engineer = { Stage::Engineer },
    optimizer = { Stage::Optimizer },
)]
fn non_verdict_stages_never_settle(stage: Stage) {
    let state = run([RunEvent::update(
        update(stage).with_error_logs("Traceback (most recent call last)"),
    )]);

    assert_eq!(state.status, RunStatus::Processing);
    assert_eq!(state.active_stage, Some(stage));
    assert_eq!(state.diagnostics, None);
}

#[test]
fn empty_code_never_overwrites_latest() {
    let state = run([
        RunEvent::update(update(Stage::Engineer).with_code("v1")),
        RunEvent::update(update(Stage::Optimizer).with_code("")),
        RunEvent::update(update(Stage::Auditor)),
    ]);
    assert_eq!(state.latest_code, "v1");
}

#[test]
fn earlier_stage_arriving_late_still_merges_shared_fields() {
    let state = run([
        RunEvent::update(update(Stage::Optimizer).with_code("v1")),
        RunEvent::update(
            update(Stage::Engineer)
                .with_code("v2")
                .with_language(Some("rust"))
                .with_language_version(Some("1.80")),
        ),
    ]);

    assert_eq!(state.active_stage, Some(Stage::Engineer));
    assert_eq!(state.latest_code, "v2");
    assert_eq!(state.target.language.as_deref(), Some("rust"));
    assert_eq!(state.target.language_version.as_deref(), Some("1.80"));
}

#[test]
fn target_fields_accumulate() {
    let state = run([
        RunEvent::update(
            update(Stage::Auditor)
                .with_language(Some("python"))
                .with_language_version(Some("3.12"))
                .with_framework(Some("flask"))
                .with_framework_version(Some("3.0")),
        ),
        RunEvent::update(update(Stage::Engineer).with_framework_version(Some("3.1"))),
        RunEvent::update(update(Stage::Tester).with_framework(None)),
    ]);

    assert_eq!(state.target.language.as_deref(), Some("python"));
    assert_eq!(state.target.language_version.as_deref(), Some("3.12"));
    assert_eq!(state.target.framework, None);
    assert_eq!(state.target.framework_version.as_deref(), Some("3.1"));
}

#[test]
fn failed_verdict_freezes_until_next_verdict() {
    let failed = run([
        RunEvent::update(update(Stage::Auditor)),
        RunEvent::update(update(Stage::Engineer).with_code("v1")),
        RunEvent::update(update(Stage::Tester).with_error_logs("AssertionError")),
    ]);
    assert_eq!(failed.status, RunStatus::Fail);

    let retrying = failed.transition(&RunEvent::update(
        update(Stage::Optimizer)
            .with_code("v2")
            .with_language_version(Some("3.13")),
    ));
    assert_eq!(retrying.status, RunStatus::Fail);
    assert_eq!(retrying.active_stage, Some(Stage::Tester));
    assert_eq!(retrying.diagnostics.as_deref(), Some("AssertionError"));
    assert_eq!(retrying.latest_code, "v2");
    assert_eq!(retrying.target.language_version.as_deref(), Some("3.13"));

    let done = retrying.transition(&RunEvent::update(update(Stage::Tester).with_code("v2")));
    assert_eq!(done.status, RunStatus::Success);
    assert_eq!(done.diagnostics, None);
    assert_eq!(done.latest_code, "v2");
    assert_eq!(done.verdicts, 2);
}

#[test]
fn success_freezes_stage_but_keeps_merging() {
    let state = run([
        RunEvent::update(update(Stage::Tester).with_code("v1")),
        RunEvent::update(
            update(Stage::Optimizer)
                .with_code("v2")
                .with_language_version(Some("3.13")),
        ),
    ]);

    assert_eq!(state.status, RunStatus::Success);
    assert_eq!(state.active_stage, Some(Stage::Tester));
    assert_eq!(state.latest_code, "v2");
    assert_eq!(state.target.language_version.as_deref(), Some("3.13"));
}

#[test]
fn transport_failure_bypasses_update_logic() {
    let state = run([
        RunEvent::update(update(Stage::Engineer).with_code("v1")),
        RunEvent::failed(FailureKind::Transport, "connection reset by peer"),
        RunEvent::update(update(Stage::Tester).with_code("v2")),
    ]);

    assert_eq!(state.status, RunStatus::Fail);
    assert_eq!(state.diagnostics.as_deref(), Some("connection reset by peer"));
    assert_eq!(state.active_stage, Some(Stage::Engineer));
    assert_eq!(state.latest_code, "v1");
}

#[test]
fn last_failure_message_wins() {
    let state = run([
        RunEvent::reported("first"),
        RunEvent::reported("second"),
    ]);
    assert_eq!(state.status, RunStatus::Fail);
    assert_eq!(state.diagnostics.as_deref(), Some("second"));
}

#[parameterized(
    transport = { FailureKind::Transport },
    unreachable = { FailureKind::Unreachable },
    reported = { FailureKind::Reported },
)]
fn failure_from_idle_settles_as_fail(kind: FailureKind) {
    let state = RunState::idle(RunEpoch(3), None).transition(&RunEvent::failed(kind, "refused"));
    assert_eq!(state.status, RunStatus::Fail);
    assert_eq!(state.diagnostics.as_deref(), Some("refused"));
    assert_eq!(state.epoch, RunEpoch(3));
}

#[test]
fn transition_does_not_mutate_original() {
    let state = processing();
    let _ = state.transition(&RunEvent::update(update(Stage::Tester)));
    assert_eq!(state.status, RunStatus::Processing);
}

fn arb_stage() -> impl Strategy<Value = Stage> {
    prop::sample::select(Stage::ALL.to_vec())
}

fn arb_update() -> impl Strategy<Value = Update> {
    (
        arb_stage(),
        proptest::option::of("[a-z]{0,3}"),
        proptest::option::of(prop_oneof![Just(""), Just("boom"), Just(TIMEOUT_SENTINEL)].prop_map(str::to_string)),
    )
        .prop_map(|(stage, code, logs)| {
            let mut update = Update::new(stage);
            update.current_code = code;
            update.error_logs = logs;
            update
        })
}

proptest! {
    #[test]
    fn latest_code_is_last_non_empty_code(updates in proptest::collection::vec(arb_update(), 0..20)) {
        let expected = updates
            .iter()
            .filter_map(|u| u.code())
            .last()
            .unwrap_or("")
            .to_string();

        let state = run(updates.into_iter().map(RunEvent::update));
        prop_assert_eq!(state.latest_code, expected);
    }

    #[test]
    fn status_only_settles_on_verdict(updates in proptest::collection::vec(arb_update(), 0..20)) {
        let saw_verdict = updates.iter().any(|u| u.node.is_verdict());
        let state = run(updates.into_iter().map(RunEvent::update));
        if !saw_verdict {
            prop_assert_eq!(state.status, RunStatus::Processing);
        }
        if state.is_settled() {
            prop_assert_eq!(state.active_stage, Some(Stage::VERDICT));
        }
    }
}
