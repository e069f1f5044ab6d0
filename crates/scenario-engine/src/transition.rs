// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition resolution (§4.I): given the `action_result` a step's action
//! envelope came back with, picks the matching transition row and turns its
//! `action`/`value` pair into a concrete instruction for the executor's step
//! loop.

use scenario_core::Value;
use scenario_store::Transition;

pub struct ResolvedTransition {
    pub action: String,
    pub value: Option<Value>,
}

/// Exact `action_result` match wins; a row declared against `"any"` is the
/// fallback; absent either, the step loop just continues.
pub fn resolve_transition(action_result: &str, transitions: &[Transition]) -> ResolvedTransition {
    let exact = transitions.iter().find(|t| t.action_result == action_result);
    let any = transitions.iter().find(|t| t.action_result == "any");

    match exact.or(any) {
        Some(row) => ResolvedTransition {
            action: row.action.clone(),
            value: row.value.clone(),
        },
        None => ResolvedTransition {
            action: "continue".to_string(),
            value: None,
        },
    }
}

/// What the executor's step loop should do next, after a transition row has
/// been resolved and — for the step-relative kinds — run against the current
/// position in the step list.
pub enum StepControl {
    Continue,
    MoveTo(usize),
    TerminateSuccess,
    Stop,
    Abort,
    Break,
    JumpToScenario(JumpTarget),
}

pub enum JumpTarget {
    Name(String),
    Names(Vec<String>),
    None,
}

/// `move_steps`: `value` is an offset applied to the current index (default
/// `1`). A negative result clamps to the first step rather than underflowing;
/// an offset that runs past the end of the step list terminates the scenario
/// successfully instead of indexing out of bounds.
pub fn handle_move_steps(current_index: usize, steps_len: usize, value: Option<&Value>) -> StepControl {
    let offset = value.and_then(Value::as_i64).unwrap_or(1);
    let target = current_index as i64 + offset;

    if target >= steps_len as i64 {
        StepControl::TerminateSuccess
    } else {
        StepControl::MoveTo(target.max(0) as usize)
    }
}

/// `jump_to_step`: `value` names an absolute step index. A value that isn't
/// a valid integer is treated as "no instruction" and the loop just
/// continues to the next step in order; a valid index past the end of the
/// step list terminates the scenario successfully.
pub fn handle_jump_to_step(steps_len: usize, value: Option<&Value>) -> StepControl {
    match value.and_then(Value::as_i64) {
        None => StepControl::Continue,
        Some(index) if index < 0 => StepControl::TerminateSuccess,
        Some(index) if (index as usize) < steps_len => StepControl::MoveTo(index as usize),
        Some(_) => StepControl::TerminateSuccess,
    }
}

/// `jump_to_scenario`: `value` names one scenario (string) or an ordered
/// list of scenarios to try in turn; anything else carries no instruction.
pub fn handle_jump_to_scenario(value: Option<&Value>) -> JumpTarget {
    match value {
        Some(Value::String(name)) => JumpTarget::Name(name.clone()),
        Some(Value::List(items)) => {
            let names = items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
            JumpTarget::Names(names)
        }
        _ => JumpTarget::None,
    }
}

/// Turns a resolved transition's `action` into a [`StepControl`] instruction.
/// `current_index`/`steps_len` are only consulted for the step-relative
/// actions; `continue` and anything unrecognized just advance normally.
pub fn step_control(resolved: &ResolvedTransition, current_index: usize, steps_len: usize) -> StepControl {
    match resolved.action.as_str() {
        "stop" => StepControl::Stop,
        "abort" => StepControl::Abort,
        "break" => StepControl::Break,
        "jump_to_scenario" => StepControl::JumpToScenario(handle_jump_to_scenario(resolved.value.as_ref())),
        "move_steps" => handle_move_steps(current_index, steps_len, resolved.value.as_ref()),
        "jump_to_step" => handle_jump_to_step(steps_len, resolved.value.as_ref()),
        _ => StepControl::Continue,
    }
}
