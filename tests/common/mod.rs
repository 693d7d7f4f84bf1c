//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use filterpipe_rs::filter::{CancelToken, ExecuteResult, Message, MessageHandler, PreflightResult};
use filterpipe_rs::{Arguments, DataPath, DataStructure, Filter};
use std::sync::{Arc, Mutex};

/// Preflight with no message sink and a fresh token.
pub fn preflight(filter: &dyn Filter, data: &DataStructure, args: &Arguments) -> PreflightResult {
    filter.preflight(data, args, &MessageHandler::noop(), &CancelToken::new())
}

/// Execute outside a pipeline with no message sink and a fresh token.
pub fn execute(filter: &dyn Filter, data: &mut DataStructure, args: &Arguments) -> ExecuteResult {
    filter.execute(data, args, None, &MessageHandler::noop(), &CancelToken::new())
}

/// A handler recording every message it receives.
pub fn recording_handler() -> (MessageHandler, Arc<Mutex<Vec<Message>>>) {
    let seen: Arc<Mutex<Vec<Message>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let handler = MessageHandler::new(move |m| sink.lock().unwrap().push(m.clone()));
    (handler, seen)
}

/// Shorthand for a path from `/`-separated text.
pub fn path(text: &str) -> DataPath {
    DataPath::parse(text).unwrap()
}

/// Sorted textual paths of every object in the store.
pub fn all_paths(data: &DataStructure) -> Vec<String> {
    let mut paths: Vec<String> = data.paths().iter().map(ToString::to_string).collect();
    paths.sort();
    paths
}
