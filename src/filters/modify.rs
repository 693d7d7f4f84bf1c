//! Filters that restructure existing objects.

use super::{rejected, single_action};
use crate::actions::DataAction;
use crate::data::{is_valid_name, DataPath, DataStructure};
use crate::filter::{codes, CancelToken, Filter, FilterError, MessageHandler, PreflightResult};
use crate::parameters::{
    Arguments, BoolParameter, DataGroupSelectionParameter, DataPathSelectionParameter,
    Parameters, StringParameter,
};
use uuid::Uuid;

// ─── DeleteData ──────────────────────────────────────────────────────────────

/// Remove an object and everything it owns.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteDataFilter;

impl DeleteDataFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a05);
    pub const DATA_PATH: &'static str = "DataPath";
}

impl Filter for DeleteDataFilter {
    fn name(&self) -> &str {
        "DeleteData"
    }

    fn human_name(&self) -> &str {
        "Delete Data"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Memory Management".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataPathSelectionParameter::new(
            Self::DATA_PATH,
            "Object to Delete",
            "The object and all of its children are removed",
            DataPath::root(),
        ));
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        single_action(DataAction::Delete {
            path: args.value(Self::DATA_PATH),
        })
    }
}

// ─── RenameDataObject ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameDataObjectFilter;

impl RenameDataObjectFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a06);
    pub const DATA_OBJECT: &'static str = "DataObject";
    pub const NEW_NAME: &'static str = "NewName";
}

impl Filter for RenameDataObjectFilter {
    fn name(&self) -> &str {
        "RenameDataObject"
    }

    fn human_name(&self) -> &str {
        "Rename Data Object"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Memory Management".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataPathSelectionParameter::new(
            Self::DATA_OBJECT,
            "Object to Rename",
            "",
            DataPath::root(),
        ));
        params.insert(
            StringParameter::new(Self::NEW_NAME, "New Name", "Must be unique among siblings", "")
                .non_empty(),
        );
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let new_name: String = args.value(Self::NEW_NAME);
        if !is_valid_name(&new_name) {
            return rejected(FilterError::validation(
                codes::INVALID_VALUE,
                format!("'{}' is not a valid object name", new_name),
            ));
        }
        single_action(DataAction::Rename {
            path: args.value(Self::DATA_OBJECT),
            new_name,
        })
    }
}

// ─── MoveData ────────────────────────────────────────────────────────────────

/// Move an object under another container, keeping its name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveDataFilter;

impl MoveDataFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a07);
    pub const SOURCE_PATH: &'static str = "SourcePath";
    pub const NEW_PARENT: &'static str = "NewParent";
}

impl Filter for MoveDataFilter {
    fn name(&self) -> &str {
        "MoveData"
    }

    fn human_name(&self) -> &str {
        "Move Data"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Memory Management".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataPathSelectionParameter::new(
            Self::SOURCE_PATH,
            "Object to Move",
            "",
            DataPath::root(),
        ));
        params.insert(DataGroupSelectionParameter::new(
            Self::NEW_PARENT,
            "New Parent",
            "Container that will own the object",
            DataPath::root(),
        ));
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        single_action(DataAction::Move {
            source: args.value(Self::SOURCE_PATH),
            new_parent: args.value(Self::NEW_PARENT),
        })
    }
}

// ─── CopyDataObject ──────────────────────────────────────────────────────────

/// Deep copy an object next to the original, or under another container.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyDataObjectFilter;

impl CopyDataObjectFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a08);
    pub const SOURCE_PATH: &'static str = "SourcePath";
    pub const USE_NEW_PARENT: &'static str = "UseNewParent";
    pub const NEW_PARENT: &'static str = "NewParent";
    pub const NEW_PATH_SUFFIX: &'static str = "NewPathSuffix";
}

impl Filter for CopyDataObjectFilter {
    fn name(&self) -> &str {
        "CopyDataObject"
    }

    fn human_name(&self) -> &str {
        "Copy Data Object"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Memory Management".into(), "Duplicate".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataPathSelectionParameter::new(
            Self::SOURCE_PATH,
            "Object to Copy",
            "",
            DataPath::root(),
        ));
        params.insert_linkable(BoolParameter::new(
            Self::USE_NEW_PARENT,
            "Copy to New Parent",
            "Place the copy under another container instead of next to the source",
            false,
        ));
        params.insert(DataGroupSelectionParameter::new(
            Self::NEW_PARENT,
            "New Parent",
            "",
            DataPath::root(),
        ));
        params.insert(
            StringParameter::new(
                Self::NEW_PATH_SUFFIX,
                "Copy Suffix",
                "Appended to the source name",
                "_COPY",
            )
            .non_empty(),
        );
        params.link_parameters(Self::USE_NEW_PARENT, Self::NEW_PARENT, true);
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let source: DataPath = args.value(Self::SOURCE_PATH);
        let suffix: String = args.value(Self::NEW_PATH_SUFFIX);
        let Some(source_name) = source.target_name() else {
            return rejected(FilterError::validation(
                codes::PATH_NOT_FOUND,
                "No object selected",
            ));
        };
        let name = format!("{}{}", source_name, suffix);
        if !is_valid_name(&name) {
            return rejected(FilterError::validation(
                codes::INVALID_VALUE,
                format!("'{}' is not a valid object name", name),
            ));
        }

        let parent = if args.value(Self::USE_NEW_PARENT) {
            args.value(Self::NEW_PARENT)
        } else {
            source.parent().unwrap_or_default()
        };
        single_action(DataAction::Copy {
            destination: parent.child(name),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataArray, Payload};
    use crate::types::DataType;

    fn sample() -> DataStructure {
        let mut data = DataStructure::new();
        data.insert_at(&DataPath::new(["A"]), Payload::Group).unwrap();
        data.insert_at(&DataPath::new(["B"]), Payload::Group).unwrap();
        let array = DataArray::filled(DataType::Int32, vec![3], vec![1], "1").unwrap();
        data.insert_at(&DataPath::new(["A", "X"]), Payload::Array(array))
            .unwrap();
        data
    }

    fn run(filter: &dyn Filter, data: &mut DataStructure, args: Arguments) -> Vec<FilterError> {
        filter
            .execute(data, &args, None, &MessageHandler::noop(), &CancelToken::new())
            .errors()
            .to_vec()
    }

    #[test]
    fn test_delete_removes_subtree() {
        let mut data = sample();
        let args = Arguments::new().with(DeleteDataFilter::DATA_PATH, DataPath::new(["A"]));
        assert!(run(&DeleteDataFilter, &mut data, args).is_empty());
        assert!(!data.contains(&DataPath::new(["A", "X"])));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_delete_without_selection_fails() {
        let mut data = sample();
        let errors = run(&DeleteDataFilter, &mut data, Arguments::new());
        assert_eq!(errors[0].code(), codes::PATH_NOT_FOUND);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_rename_conflict_caught_in_preview() {
        let mut data = sample();
        let args = Arguments::new()
            .with(RenameDataObjectFilter::DATA_OBJECT, DataPath::new(["A"]))
            .with(RenameDataObjectFilter::NEW_NAME, "B");
        let errors = run(&RenameDataObjectFilter, &mut data, args);
        assert_eq!(errors[0].code(), codes::ACTION_FAILED);
        assert!(data.contains(&DataPath::new(["A"])));
    }

    #[test]
    fn test_rename_rejects_separator() {
        let mut data = sample();
        let args = Arguments::new()
            .with(RenameDataObjectFilter::DATA_OBJECT, DataPath::new(["A"]))
            .with(RenameDataObjectFilter::NEW_NAME, "C/D");
        let errors = run(&RenameDataObjectFilter, &mut data, args);
        assert_eq!(errors[0].code(), codes::INVALID_VALUE);
    }

    #[test]
    fn test_move_keeps_name() {
        let mut data = sample();
        let args = Arguments::new()
            .with(MoveDataFilter::SOURCE_PATH, DataPath::new(["A", "X"]))
            .with(MoveDataFilter::NEW_PARENT, DataPath::new(["B"]));
        assert!(run(&MoveDataFilter, &mut data, args).is_empty());
        assert!(data.contains(&DataPath::new(["B", "X"])));
        assert!(!data.contains(&DataPath::new(["A", "X"])));
    }

    #[test]
    fn test_copy_next_to_source() {
        let mut data = sample();
        let args = Arguments::new().with(CopyDataObjectFilter::SOURCE_PATH, DataPath::new(["A", "X"]));
        assert!(run(&CopyDataObjectFilter, &mut data, args).is_empty());
        let copy = data.array(&DataPath::new(["A", "X_COPY"])).unwrap();
        assert_eq!(copy.as_slice::<i32>().unwrap(), &[1, 1, 1]);
    }

    #[test]
    fn test_copy_new_parent_ignored_unless_enabled() {
        let mut data = sample();
        // NewParent is invalid but inactive.
        let args = Arguments::new()
            .with(CopyDataObjectFilter::SOURCE_PATH, DataPath::new(["A"]))
            .with(CopyDataObjectFilter::NEW_PARENT, DataPath::new(["Missing"]));
        assert!(run(&CopyDataObjectFilter, &mut data, args).is_empty());
        assert!(data.contains(&DataPath::new(["A_COPY", "X"])));

        let args = Arguments::new()
            .with(CopyDataObjectFilter::SOURCE_PATH, DataPath::new(["A"]))
            .with(CopyDataObjectFilter::USE_NEW_PARENT, true)
            .with(CopyDataObjectFilter::NEW_PARENT, DataPath::new(["B"]));
        assert!(run(&CopyDataObjectFilter, &mut data, args).is_empty());
        assert!(data.contains(&DataPath::new(["B", "A_COPY", "X"])));
    }
}
