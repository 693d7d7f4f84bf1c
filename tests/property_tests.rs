//! Property-based tests for argument encoding and staged actions
//!
//! Run with: cargo test --test property_tests

mod common;

use common::{all_paths, preflight};
use filterpipe_rs::filter::Outcome;
use filterpipe_rs::filters::CreateImageGeometryFilter;
use filterpipe_rs::{
    ActionMode, Arguments, DataAction, DataPath, DataStructure, Filter, OutputActions,
};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}"
}

fn geometry_args() -> impl Strategy<Value = Arguments> {
    (
        prop::collection::vec(name_strategy(), 1..4),
        prop::collection::vec(1i64..64, 3),
        prop::collection::vec(-1.0e6f64..1.0e6, 3),
        prop::collection::vec(1.0e-3f64..1.0e3, 3),
        name_strategy(),
    )
        .prop_map(|(segments, dims, origin, spacing, cell_data)| {
            Arguments::new()
                .with(CreateImageGeometryFilter::GEOMETRY_PATH, DataPath::new(segments))
                .with(CreateImageGeometryFilter::DIMENSIONS, dims)
                .with(CreateImageGeometryFilter::ORIGIN, origin)
                .with(CreateImageGeometryFilter::SPACING, spacing)
                .with(CreateImageGeometryFilter::CELL_DATA_NAME, cell_data)
        })
}

/// Unique group paths where every parent precedes its children.
fn group_tree() -> impl Strategy<Value = Vec<DataPath>> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 1..24).prop_map(
        |picks| {
            let mut paths: Vec<DataPath> = Vec::new();
            for (i, (parent, nested)) in picks.into_iter().enumerate() {
                let name = format!("G{}", i);
                let path = if nested && !paths.is_empty() {
                    parent.get(&paths).child(name)
                } else {
                    DataPath::new([name])
                };
                paths.push(path);
            }
            paths
        },
    )
}

fn create_groups(paths: &[DataPath]) -> OutputActions {
    paths
        .iter()
        .map(|path| DataAction::CreateGroup { path: path.clone() })
        .collect()
}

proptest! {
    #[test]
    fn prop_arguments_json_round_trip(args in geometry_args()) {
        let filter = CreateImageGeometryFilter;
        let json = filter.to_json(&args);
        let decoded: Outcome<Arguments> = filter.from_json(&json);

        prop_assert!(decoded.warnings.is_empty());
        prop_assert_eq!(decoded.value(), Some(&args));
    }

    #[test]
    fn prop_valid_geometry_args_preflight(args in geometry_args()) {
        let data = DataStructure::new();
        let result = preflight(&CreateImageGeometryFilter, &data, &args);
        // Nested geometry paths need their parents to exist first.
        let nested = args.value::<DataPath>(CreateImageGeometryFilter::GEOMETRY_PATH).len() > 1;
        prop_assert_eq!(result.is_ok(), !nested);
    }

    #[test]
    fn prop_action_application_is_deterministic(paths in group_tree()) {
        let actions = create_groups(&paths);

        let mut first = DataStructure::new();
        let mut second = DataStructure::new();
        prop_assert!(actions.apply_all(&mut first, ActionMode::Commit).is_ok());
        prop_assert!(actions.apply_all(&mut second, ActionMode::Commit).is_ok());
        prop_assert_eq!(first.paths(), second.paths());
        prop_assert_eq!(first.len(), paths.len());
    }

    #[test]
    fn prop_preview_matches_commit(paths in group_tree()) {
        let actions = create_groups(&paths);

        let mut preview = DataStructure::new();
        let mut commit = DataStructure::new();
        prop_assert!(actions.apply_all(&mut preview, ActionMode::Preview).is_ok());
        prop_assert!(actions.apply_all(&mut commit, ActionMode::Commit).is_ok());
        prop_assert_eq!(all_paths(&preview), all_paths(&commit));
    }

    #[test]
    fn prop_deleting_everything_empties_store(paths in group_tree()) {
        let mut data = DataStructure::new();
        prop_assert!(create_groups(&paths).apply_all(&mut data, ActionMode::Commit).is_ok());

        let deletes: OutputActions = data
            .roots()
            .iter()
            .filter_map(|&id| data.path_of(id))
            .map(|path| DataAction::Delete { path })
            .collect();
        prop_assert!(deletes.apply_all(&mut data, ActionMode::Commit).is_ok());
        prop_assert!(data.is_empty());
    }
}
