//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use tsc_agent::domain::models::{LaneGroup, LaneGroupState, StateSnapshot};
use tsc_agent::domain::ports::{ChatCompletion, ChatRequest, ChatResponse};

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Snapshot with every lane group empty except the given ones.
pub fn state_with(lanes: &[(LaneGroup, LaneGroupState)]) -> StateSnapshot {
    let mut state = StateSnapshot::empty();
    for (group, lane) in lanes {
        state.insert(*group, *lane);
    }
    state
}

/// Snapshot with one busy lane group, so zero flow never applies.
pub fn busy_state() -> StateSnapshot {
    state_with(&[(
        LaneGroup::NorthThrough,
        LaneGroupState::new(4, [1, 0, 0, 0], 12.0),
    )])
}

/// Chat backend that plays back a fixed script of replies and remembers
/// every request it received.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<S, S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(Into::into).map_err(Into::into))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()));

        match next {
            Ok(content) => Ok(ChatResponse {
                content,
                model: Some("scripted".to_string()),
            }),
            Err(message) => Err(anyhow!(message)),
        }
    }
}
