//! Integration tests for pipelines built from registered filters
//!
//! Run with: cargo test --test pipeline_integration

mod common;

use common::builders::{FlakyFilter, StoreBuilder};
use common::{all_paths, path, recording_handler};
use filterpipe_rs::filter::{codes, CancelToken, FilterState, MessageHandler, MessageKind};
use filterpipe_rs::filters::{
    CopyDataObjectFilter, CreateDataArrayFilter, CreateImageGeometryFilter, FillArrayFilter,
    RenameDataObjectFilter, CORE_PLUGIN_ID,
};
use filterpipe_rs::pipeline::NodeId;
use filterpipe_rs::{Arguments, DataStructure, DataType, FilterHandle, Pipeline, Runtime, RuntimeConfig};
use uuid::Uuid;

fn runtime() -> Runtime {
    Runtime::new(RuntimeConfig {
        plugin_dirs: Vec::new(),
        ..RuntimeConfig::default()
    })
    .unwrap()
}

fn core(filter: Uuid) -> FilterHandle {
    FilterHandle::new(CORE_PLUGIN_ID, filter)
}

/// Image geometry -> array in its cell data -> fill -> rename -> copy.
fn image_pipeline(runtime: &Runtime) -> Pipeline {
    let mut pipeline = runtime.pipeline("image");
    let filters = runtime.filters();
    pipeline
        .push_handle(
            filters,
            core(CreateImageGeometryFilter::UUID),
            Arguments::new()
                .with(CreateImageGeometryFilter::GEOMETRY_PATH, path("Volume"))
                .with(CreateImageGeometryFilter::DIMENSIONS, vec![4i64, 3, 2])
                .with(CreateImageGeometryFilter::SPACING, vec![0.5, 0.5, 2.0]),
        )
        .unwrap();
    pipeline
        .push_handle(
            filters,
            core(CreateDataArrayFilter::UUID),
            Arguments::new()
                .with(CreateDataArrayFilter::OUTPUT_ARRAY_PATH, path("Volume/Cell Data/Phases"))
                .with(CreateDataArrayFilter::NUMERIC_TYPE, DataType::Int32),
        )
        .unwrap();
    pipeline
        .push_handle(
            filters,
            core(FillArrayFilter::UUID),
            Arguments::new()
                .with(FillArrayFilter::ARRAY_PATH, path("Volume/Cell Data/Phases"))
                .with(FillArrayFilter::VALUE, "3"),
        )
        .unwrap();
    pipeline
        .push_handle(
            filters,
            core(RenameDataObjectFilter::UUID),
            Arguments::new()
                .with(RenameDataObjectFilter::DATA_OBJECT, path("Volume/Cell Data/Phases"))
                .with(RenameDataObjectFilter::NEW_NAME, "Grains"),
        )
        .unwrap();
    pipeline
        .push_handle(
            filters,
            core(CopyDataObjectFilter::UUID),
            Arguments::new().with(CopyDataObjectFilter::SOURCE_PATH, path("Volume")),
        )
        .unwrap();
    pipeline
}

// ============================================================================
// Core Filter Chains
// ============================================================================

#[test]
fn test_preflight_chain_sees_earlier_nodes() {
    let runtime = runtime();
    let mut pipeline = image_pipeline(&runtime);
    let data = DataStructure::new();

    let report = pipeline.preflight(&data, &MessageHandler::noop(), &CancelToken::new());

    assert!(report.is_ok(), "{:?}", report.errors().collect::<Vec<_>>());
    assert_eq!(report.nodes.len(), 5);
    assert!(data.is_empty());
    assert!(pipeline
        .nodes()
        .iter()
        .all(|node| node.state() == FilterState::PreflightSucceeded));
}

#[test]
fn test_execute_chain() {
    let runtime = runtime();
    let mut pipeline = image_pipeline(&runtime);
    let mut data = DataStructure::new();

    let report = pipeline.execute(&mut data, &MessageHandler::noop(), &CancelToken::new());

    assert!(report.is_ok(), "{:?}", report.errors().collect::<Vec<_>>());
    assert_eq!(
        all_paths(&data),
        vec![
            "Volume",
            "Volume/Cell Data",
            "Volume/Cell Data/Grains",
            "Volume_COPY",
            "Volume_COPY/Cell Data",
            "Volume_COPY/Cell Data/Grains",
        ]
    );
    for root in ["Volume", "Volume_COPY"] {
        let grains = data.array(&path(&format!("{}/Cell Data/Grains", root))).unwrap();
        assert_eq!(grains.tuple_shape(), &[2, 3, 4]);
        assert!(grains.as_slice::<i32>().unwrap().iter().all(|&v| v == 3));
    }
    assert!(data.validate_structure().is_empty());
    assert!(pipeline
        .nodes()
        .iter()
        .all(|node| node.state() == FilterState::ExecuteSucceeded));
}

#[test]
fn test_progress_reaches_handler() {
    let runtime = runtime();
    let mut pipeline = image_pipeline(&runtime);
    let mut data = DataStructure::new();
    let (handler, seen) = recording_handler();

    assert!(pipeline.execute(&mut data, &handler, &CancelToken::new()).is_ok());

    let seen = seen.lock().unwrap();
    assert!(seen
        .iter()
        .any(|m| matches!(m.kind, MessageKind::Progress { percent: 100 })));
}

#[test]
fn test_unknown_handle_is_rejected() {
    let runtime = runtime();
    let mut pipeline = runtime.pipeline("bad");
    let result = pipeline.push_handle(
        runtime.filters(),
        FilterHandle::new(Uuid::nil(), FillArrayFilter::UUID),
        Arguments::new(),
    );
    assert!(result.is_err());
    assert!(pipeline.is_empty());
}

// ============================================================================
// Error Policy
// ============================================================================

fn flaky_pipeline(halt_on_error: bool) -> Pipeline {
    let mut pipeline = Pipeline::new("flaky").with_halt_on_error(halt_on_error);
    pipeline.push_filter(Box::new(FlakyFilter), Arguments::new());
    pipeline.push_filter(
        Box::new(FlakyFilter),
        Arguments::new().with(FlakyFilter::FAIL, true),
    );
    pipeline.push_filter(Box::new(FlakyFilter), Arguments::new());
    pipeline
}

#[test]
fn test_halt_on_first_failure() {
    let mut pipeline = flaky_pipeline(true);
    let mut data = StoreBuilder::new().build();
    let report = pipeline.execute(&mut data, &MessageHandler::noop(), &CancelToken::new());

    assert_eq!(report.failed_node, Some(NodeId(1)));
    assert_eq!(report.nodes.len(), 2);
    assert_eq!(report.errors().next().unwrap().code(), codes::EXECUTION_FAILED);
    assert_eq!(pipeline.nodes()[2].state(), FilterState::Declared);
}

#[test]
fn test_continue_after_failure() {
    let mut pipeline = flaky_pipeline(false);
    let mut data = StoreBuilder::new().build();
    let report = pipeline.execute(&mut data, &MessageHandler::noop(), &CancelToken::new());

    assert_eq!(report.failed_node, Some(NodeId(1)));
    assert_eq!(report.nodes.len(), 3);
    assert!(report.nodes[2].is_ok());
    assert_eq!(pipeline.nodes()[2].state(), FilterState::ExecuteSucceeded);
}

#[test]
fn test_disabled_node_is_skipped() {
    let mut pipeline = flaky_pipeline(true);
    pipeline.set_enabled(NodeId(1), false).unwrap();
    let mut data = StoreBuilder::new().build();
    let report = pipeline.execute(&mut data, &MessageHandler::noop(), &CancelToken::new());

    assert!(report.is_ok());
    assert!(report.nodes[1].skipped);
    assert_eq!(pipeline.nodes()[1].state(), FilterState::Declared);
    assert!(pipeline.set_enabled(NodeId(9), false).is_err());
}

#[test]
fn test_cancelled_pipeline_stops() {
    let mut pipeline = flaky_pipeline(false);
    let mut data = StoreBuilder::new().build();
    let cancel = CancelToken::new();
    cancel.cancel();
    let report = pipeline.execute(&mut data, &MessageHandler::noop(), &cancel);

    assert_eq!(report.nodes.len(), 1);
    assert!(report.nodes[0].is_cancelled());
}

#[test]
fn test_pipeline_json_lists_arguments() {
    let runtime = runtime();
    let pipeline = image_pipeline(&runtime);
    let json = pipeline.to_json();

    assert_eq!(json["name"], "image");
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["filter"], "CreateImageGeometry");
    assert_eq!(nodes[0]["args"][CreateImageGeometryFilter::GEOMETRY_PATH], "Volume");
    assert_eq!(
        nodes[3]["args"][RenameDataObjectFilter::NEW_NAME],
        "Grains"
    );
}
