// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn stages_are_listed_in_pipeline_order() {
    let names: Vec<_> = Stage::ALL.iter().map(Stage::name).collect();
    assert_eq!(names, ["auditor", "engineer", "tester", "optimizer"]);

    for (i, stage) in Stage::ALL.iter().enumerate() {
        assert_eq!(stage.index(), i);
    }
}

#[test]
fn tester_is_the_only_verdict_stage() {
    let verdicts: Vec<_> = Stage::ALL.into_iter().filter(Stage::is_verdict).collect();
    assert_eq!(verdicts, [Stage::Tester]);
}

#[test]
fn serde_uses_wire_names() {
    let json = serde_json::to_string(&Stage::Optimizer).unwrap();
    assert_eq!(json, "\"optimizer\"");

    let stage: Stage = serde_json::from_str("\"optimiser\"").unwrap();
    assert_eq!(stage, Stage::Optimizer);

    assert!(serde_json::from_str::<Stage>("\"planner\"").is_err());
}

#[test]
fn precedes_follows_pipeline_order() {
    assert!(Stage::Auditor.precedes(Stage::Engineer));
    assert!(Stage::Engineer.precedes(Stage::Optimizer));
    assert!(!Stage::Tester.precedes(Stage::Tester));
    assert!(!Stage::Optimizer.precedes(Stage::Auditor));
}
