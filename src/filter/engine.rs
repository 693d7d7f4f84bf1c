//! Preflight and execute drivers shared by every filter.

use super::{
    codes, CancelToken, ExecuteResult, Filter, FilterError, FilterState, MessageHandler, Outcome,
    PreflightResult, PreflightValue, Warning,
};
use crate::actions::ActionMode;
use crate::data::DataStructure;
use crate::parameters::Arguments;
use crate::pipeline::PipelineNode;
use tracing::{debug, info, warn};

/// Run preflight and hand back the resolved arguments for execute.
pub(super) fn preflight<F: Filter + ?Sized>(
    filter: &F,
    data: &DataStructure,
    args: &Arguments,
    messages: &MessageHandler,
    cancel: &CancelToken,
) -> (PreflightResult, Arguments) {
    debug!("Preflighting '{}'", filter.human_name());
    let parameters = filter.parameters();
    let (resolved, warnings) = parameters.resolve(args);

    let errors = parameters.validate(data, &resolved);
    if !errors.is_empty() {
        warn!(
            "'{}' failed parameter validation with {} error(s)",
            filter.human_name(),
            errors.len()
        );
        let outcome = Outcome::err(errors).with_warnings(warnings);
        return (PreflightResult::new(outcome), resolved);
    }

    let mut result = filter.preflight_impl(data, &resolved, messages, cancel);
    result.output_actions = result.output_actions.prepend_warnings(warnings);
    if let Ok(actions) = &mut result.output_actions.result {
        let staged = actions.take_warnings();
        result.output_actions.warnings.extend(staged);
    }

    // Catch conflicts between actions before anything is committed.
    if let Ok(actions) = &result.output_actions.result {
        let mut preview = data.preview_copy();
        if let Err(e) = actions.apply_all(&mut preview, ActionMode::Preview) {
            warn!("'{}' preview failed: {}", filter.human_name(), e);
            result.output_actions.result = Err(vec![e]);
        }
    }
    (result, resolved)
}

pub(super) fn execute<F: Filter + ?Sized>(
    filter: &F,
    data: &mut DataStructure,
    args: &Arguments,
    node: Option<&PipelineNode>,
    messages: &MessageHandler,
    cancel: &CancelToken,
) -> ExecuteResult {
    info!("Executing '{}'", filter.human_name());
    let (preflight, resolved) = preflight(filter, data, args, messages, cancel);
    let PreflightResult {
        output_actions,
        preflight_values,
    } = preflight;
    let (actions, mut warnings) = output_actions.into_parts();
    let actions = match actions {
        Ok(actions) => actions,
        Err(errors) => {
            return finish(
                FilterState::PreflightFailed,
                Err(errors),
                warnings,
                preflight_values,
            )
        }
    };

    if cancel.is_cancelled() {
        info!("'{}' cancelled before committing actions", filter.human_name());
        return finish(
            FilterState::ExecuteFailed,
            Err(vec![FilterError::Cancelled]),
            warnings,
            preflight_values,
        );
    }
    if let Err(e) = actions.apply_regular(data, ActionMode::Commit) {
        return finish(FilterState::ExecuteFailed, Err(vec![e]), warnings, preflight_values);
    }
    if cancel.is_cancelled() {
        info!("'{}' cancelled after committing actions", filter.human_name());
        return finish(
            FilterState::ExecuteFailed,
            Err(vec![FilterError::Cancelled]),
            warnings,
            preflight_values,
        );
    }

    let body = filter.execute_impl(data, &resolved, node, messages, cancel);
    let mut output_values = preflight_values;
    output_values.extend(body.output_values);
    let (body_result, body_warnings) = body.result.into_parts();
    warnings.extend(body_warnings);
    if let Err(errors) = body_result {
        return finish(FilterState::ExecuteFailed, Err(errors), warnings, output_values);
    }

    if let Err(e) = actions.apply_deferred(data, ActionMode::Commit) {
        return finish(FilterState::ExecuteFailed, Err(vec![e]), warnings, output_values);
    }

    let issues = data.validate_structure();
    if !issues.is_empty() {
        let errors = issues
            .into_iter()
            .map(|issue| FilterError::structural(codes::STRUCTURE_INVALID, issue.to_string()))
            .collect();
        return finish(FilterState::ExecuteFailed, Err(errors), warnings, output_values);
    }

    finish(FilterState::ExecuteSucceeded, Ok(()), warnings, output_values)
}

fn finish(
    state: FilterState,
    result: Result<(), Vec<FilterError>>,
    warnings: Vec<Warning>,
    output_values: Vec<PreflightValue>,
) -> ExecuteResult {
    if let Err(errors) = &result {
        for error in errors {
            warn!("{}", error);
        }
    }
    ExecuteResult {
        result: Outcome { result, warnings },
        output_values,
        state,
    }
}
