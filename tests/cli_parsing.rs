#![allow(clippy::needless_borrows_for_generic_args)]

use clap::Parser;
use std::path::PathBuf;
use tsc_agent::cli::{Cli, Commands};

#[test]
fn test_parse_decide() {
    let cli = Cli::try_parse_from(vec![
        "tsc-agent",
        "decide",
        "state.json",
        "--intersection",
        "intersection_2_3",
        "--agent",
        "llm",
        "--phases",
        "8",
    ])
    .unwrap();

    match cli.command {
        Commands::Decide(args) => {
            assert_eq!(args.state, PathBuf::from("state.json"));
            assert_eq!(args.intersection, "intersection_2_3");
            assert_eq!(args.overrides.agent.as_deref(), Some("llm"));
            assert_eq!(args.overrides.phases, Some(8));
            assert_eq!(args.overrides.model, None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_decide_defaults() {
    let cli = Cli::try_parse_from(vec!["tsc-agent", "decide", "state.json"]).unwrap();

    assert!(!cli.json);
    match cli.command {
        Commands::Decide(args) => {
            assert_eq!(args.intersection, "intersection_1_1");
            assert!(args.overrides.agent.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_replay() {
    let cli = Cli::try_parse_from(vec![
        "tsc-agent",
        "replay",
        "trace.jsonl",
        "--dataset",
        "hangzhou",
        "--log-dir",
        "out/run1",
        "--model",
        "qwen-7b",
        "--json",
    ])
    .unwrap();

    assert!(cli.json, "global flag accepted after the subcommand");
    match cli.command {
        Commands::Replay(args) => {
            assert_eq!(args.trace, PathBuf::from("trace.jsonl"));
            assert_eq!(args.dataset, "hangzhou");
            assert_eq!(args.log_dir, Some(PathBuf::from("out/run1")));
            assert_eq!(args.overrides.model.as_deref(), Some("qwen-7b"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_plan_with_config() {
    let cli = Cli::try_parse_from(vec![
        "tsc-agent",
        "--config",
        "custom.yaml",
        "plan",
        "--dataset",
        "newyork_28x7",
        "--list-files",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    match cli.command {
        Commands::Plan(args) => {
            assert_eq!(args.dataset, "newyork_28x7");
            assert!(args.list_files);
            assert!(args.traffic_file.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_missing_state_argument_fails() {
    assert!(Cli::try_parse_from(vec!["tsc-agent", "decide"]).is_err());
}

#[test]
fn test_unknown_command_fails() {
    assert!(Cli::try_parse_from(vec!["tsc-agent", "simulate"]).is_err());
}
