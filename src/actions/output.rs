//! Ordered list of staged actions a filter intends to apply.

use crate::actions::action::{ActionMode, DataAction};
use crate::data::DataStructure;
use crate::filter::{codes, FilterError, Warning};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Regular actions run before the filter body, deferred ones after it.
/// Warnings noticed while staging travel with the list and are reported by
/// preflight alongside the argument warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputActions {
    #[serde(default)]
    pub actions: Vec<DataAction>,
    #[serde(default)]
    pub deferred: Vec<DataAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl OutputActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: DataAction) {
        self.actions.push(action);
    }

    pub fn push_deferred(&mut self, action: DataAction) {
        self.deferred.push(action);
    }

    pub fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Append another list, keeping regular and deferred partitions and
    /// every warning from both sides.
    pub fn append(&mut self, mut other: OutputActions) {
        self.actions.append(&mut other.actions);
        self.deferred.append(&mut other.deferred);
        self.warnings.append(&mut other.warnings);
    }

    /// Number of staged actions. Warnings are not counted.
    pub fn len(&self) -> usize {
        self.actions.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.deferred.is_empty()
    }

    /// Move the staged warnings out, leaving the actions in place.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Apply the regular actions in order, stopping at the first failure.
    pub fn apply_regular(&self, data: &mut DataStructure, mode: ActionMode) -> Result<(), FilterError> {
        apply_list(&self.actions, "action", codes::ACTION_FAILED, data, mode)
    }

    /// Apply the deferred actions in order, stopping at the first failure.
    pub fn apply_deferred(&self, data: &mut DataStructure, mode: ActionMode) -> Result<(), FilterError> {
        apply_list(
            &self.deferred,
            "deferred action",
            codes::DEFERRED_ACTION_FAILED,
            data,
            mode,
        )
    }

    /// Regular then deferred. Nothing already applied is undone on failure.
    pub fn apply_all(&self, data: &mut DataStructure, mode: ActionMode) -> Result<(), FilterError> {
        self.apply_regular(data, mode)?;
        self.apply_deferred(data, mode)
    }
}

fn apply_list(
    actions: &[DataAction],
    label: &str,
    code: i32,
    data: &mut DataStructure,
    mode: ActionMode,
) -> Result<(), FilterError> {
    for (index, action) in actions.iter().enumerate() {
        debug!("{:?} {} #{}: {}", mode, label, index, action);
        if let Err(e) = action.apply(data, mode) {
            return Err(FilterError::structural(
                code,
                format!("{} #{} ({}) failed: {}", label, index, action, e),
            ));
        }
    }
    Ok(())
}

impl FromIterator<DataAction> for OutputActions {
    fn from_iter<I: IntoIterator<Item = DataAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataPath;

    fn group(name: &str) -> DataAction {
        DataAction::CreateGroup {
            path: DataPath::new([name]),
        }
    }

    #[test]
    fn test_conflicting_actions_caught_in_preview() {
        let actions: OutputActions = [group("A"), group("B"), group("A")].into_iter().collect();
        let mut preview = DataStructure::new();
        let err = actions.apply_all(&mut preview, ActionMode::Preview).unwrap_err();
        assert_eq!(err.code(), codes::ACTION_FAILED);
        assert!(err.message().starts_with("action #2 (CreateGroup A)"));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let mut actions = OutputActions::new();
        actions.push(group("A"));
        actions.push(DataAction::Delete {
            path: DataPath::new(["Missing"]),
        });
        actions.push(group("C"));
        let mut ds = DataStructure::new();
        assert!(actions.apply_all(&mut ds, ActionMode::Commit).is_err());
        assert!(ds.contains(&DataPath::new(["A"])));
        assert!(!ds.contains(&DataPath::new(["C"])));
    }

    #[test]
    fn test_deferred_runs_after_regular() {
        let mut actions = OutputActions::new();
        actions.push_deferred(DataAction::Rename {
            path: DataPath::new(["Temp"]),
            new_name: "Final".to_string(),
        });
        actions.push(group("Temp"));
        let mut ds = DataStructure::new();
        actions.apply_all(&mut ds, ActionMode::Commit).unwrap();
        assert!(ds.contains(&DataPath::new(["Final"])));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_append_keeps_warnings() {
        let mut first: OutputActions = [group("A")].into_iter().collect();
        first.push_warning(Warning::new(-1, "first"));
        let mut second = OutputActions::new().with_warning(Warning::new(-2, "second"));
        second.push_deferred(group("B"));

        first.append(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.deferred.len(), 1);
        let codes: Vec<i32> = first.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![-1, -2]);

        let taken = first.take_warnings();
        assert_eq!(taken.len(), 2);
        assert!(first.warnings.is_empty());
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_warnings_are_not_actions() {
        let actions = OutputActions::new().with_warning(Warning::new(-3, "nothing to do"));
        assert!(actions.is_empty());
        assert!(actions
            .apply_all(&mut DataStructure::new(), ActionMode::Commit)
            .is_ok());
    }

    #[test]
    fn test_deferred_failure_code() {
        let mut actions = OutputActions::new();
        actions.push_deferred(DataAction::Delete {
            path: DataPath::new(["Missing"]),
        });
        let err = actions
            .apply_deferred(&mut DataStructure::new(), ActionMode::Commit)
            .unwrap_err();
        assert_eq!(err.code(), codes::DEFERRED_ACTION_FAILED);
    }
}
