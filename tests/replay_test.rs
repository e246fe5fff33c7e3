//! End-to-end replay of recorded traces into episode logs.

mod common;

use common::{busy_state, ScriptedChat};
use std::io::Write;
use std::sync::Arc;

use tsc_agent::application::{run_replay, AgentBuilder};
use tsc_agent::domain::models::{
    AgentKind, Dataset, LaneGroup, LaneGroupState, LlmConfig, Phase, PhaseCatalog, StateSnapshot,
};
use tsc_agent::infrastructure::state::{StateTrace, TraceRecord};
use tsc_agent::services::LlmAgentSettings;

fn write_trace(dir: &std::path::Path, records: &[TraceRecord]) -> std::path::PathBuf {
    let path = dir.join("trace.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for record in records {
        writeln!(file, "{}", serde_json::to_string(record).unwrap()).unwrap();
    }
    writeln!(file).unwrap();
    path
}

fn record(step: u64, intersection: &str, state: StateSnapshot) -> TraceRecord {
    TraceRecord {
        step,
        intersection: intersection.to_string(),
        state,
    }
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_rule_replay_writes_logs_in_step_order() {
    let dir = common::temp_dir();
    let queue = common::state_with(&[(
        LaneGroup::WestLeft,
        LaneGroupState::new(7, [1, 0, 0, 0], 20.0),
    )]);
    // Steps deliberately out of order in the file
    let trace_path = write_trace(
        dir.path(),
        &[
            record(1, "intersection_1_1", queue),
            record(0, "intersection_1_1", StateSnapshot::empty()),
        ],
    );

    let trace = StateTrace::load(&trace_path).unwrap();
    let builder = AgentBuilder::new(
        AgentKind::Rule,
        PhaseCatalog::FourPhase,
        LlmAgentSettings::from(&LlmConfig::default()),
    );
    let log_dir = dir.path().join("run");
    let report = run_replay(trace, &builder, Dataset::Hangzhou, &log_dir, None)
        .await
        .unwrap();

    assert_eq!(report.total_decisions(), 2);
    assert_eq!(report.intersections[0].actions[&Phase::Elwl], 1);

    let log = read_json(&log_dir.join("hangzhou-intersection_1_1-rulebased-4_state_action.json"));
    assert_eq!(log[0]["action_reason"], "Zero flow");
    assert_eq!(log[1]["action"], "ELWL");
    assert_eq!(log[1]["action_reason"], "Max queue phase");
    assert_eq!(log[1]["state"]["WL"]["queue_len"], 7);
}

#[tokio::test]
async fn test_llm_replay_writes_transcripts_and_errors() {
    let dir = common::temp_dir();
    let trace_path = write_trace(
        dir.path(),
        &[
            record(0, "intersection_1_1", busy_state()),
            record(1, "intersection_1_1", StateSnapshot::empty()),
        ],
    );

    let chat = Arc::new(ScriptedChat::new([Ok("no idea"), Ok("\\boxed{STSL}")]));
    let builder = AgentBuilder::new(
        AgentKind::Llm,
        PhaseCatalog::EightPhase,
        LlmAgentSettings::from(&LlmConfig {
            model: "org/tsc-model".to_string(),
            ..LlmConfig::default()
        }),
    )
    .with_client(chat.clone());

    let log_dir = dir.path().join("run");
    let trace = StateTrace::load(&trace_path).unwrap();
    let report = run_replay(trace, &builder, Dataset::Jinan, &log_dir, None)
        .await
        .unwrap();

    assert_eq!(report.failures(), 0);
    assert_eq!(chat.request_count(), 2, "zero-flow step sends nothing");

    let stem = "jinan-intersection_1_1-org_tsc-model-8";
    let decisions = read_json(&log_dir.join(format!("{stem}_state_action_prompt.json")));
    assert_eq!(decisions[0]["action"], "STSL");
    assert_eq!(decisions[0]["attempts"], 2);
    assert_eq!(decisions[0]["messages"][2]["role"], "assistant");
    assert_eq!(decisions[1]["attempts"], 0);

    let errors = read_json(&log_dir.join(format!("{stem}_error_prompts.json")));
    assert_eq!(errors.as_array().unwrap().len(), 1);
    assert_eq!(errors[0]["response"], "no idea");
}

#[test]
fn test_malformed_trace_line_is_reported() {
    let dir = common::temp_dir();
    let path = dir.path().join("trace.jsonl");
    std::fs::write(
        &path,
        "{\"step\": 0, \"intersection\": \"intersection_1_1\", \"state\": {\"NT\": {}}}\n",
    )
    .unwrap();

    let err = StateTrace::load(&path).unwrap_err();
    assert!(err.to_string().contains("trace line 1"));
}
