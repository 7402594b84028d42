// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [14.7.5 The for-in, for-of Statements](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements)

use oxc_ast::ast;
use oxc_ecmascript::BoundNames;

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    get_iterator, iterator_close_normal, iterator_close_with_error, iterator_step, iterator_value,
    IteratorRecord,
};
use crate::ecmascript::abstract_operations::type_conversion::to_object;
use crate::ecmascript::execution::environments::declarative_environment::new_declarative_environment;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{HeapString, InternalMethods, Object, PropertyKey, Value};
use crate::engine::coroutine::PathSegment;

use super::destructuring;
use super::expression::evaluate_expression;
use super::{evaluate_statement, BindingTarget, Completion};

/// Per-iteration binding of the loop head: fresh lexical bindings for
/// let/const heads, assignment otherwise.
fn bind_loop_target(
    agent: &mut Agent,
    left: &ast::ForStatementLeft,
    value: Value,
    outer_env: EnvironmentIndex,
) -> JsResult<()> {
    match left {
        ast::ForStatementLeft::VariableDeclaration(declaration) => {
            let declarator = declaration
                .declarations
                .first()
                .expect("loop head declares one binding");
            if declaration.kind.is_var() {
                destructuring::binding_initialization(
                    agent,
                    &declarator.id,
                    value,
                    BindingTarget::Put,
                )?;
            } else {
                // A fresh environment per iteration.
                let iteration_env = new_declarative_environment(agent, Some(outer_env));
                let iteration_env = EnvironmentIndex::Declarative(iteration_env);
                let mut names = Vec::new();
                declarator
                    .id
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
                let is_const = declaration.kind.is_const();
                for name in &names {
                    let name = HeapString::from_str(agent, name);
                    if is_const {
                        iteration_env.create_immutable_binding(agent, name, true)?;
                    } else {
                        iteration_env.create_mutable_binding(agent, name, false)?;
                    }
                }
                agent.set_lexical_environment(iteration_env);
                destructuring::binding_initialization(
                    agent,
                    &declarator.id,
                    value,
                    BindingTarget::Initialize,
                )?;
            }
            Ok(())
        }
        left => {
            let target = left
                .as_assignment_target()
                .expect("loop head is an assignment target");
            match target {
                ast::AssignmentTarget::AssignmentTargetIdentifier(identifier) => {
                    let reference = super::expression::resolve_identifier(
                        agent,
                        identifier.name.as_str(),
                    )?;
                    crate::ecmascript::types::spec::reference::put_value(
                        agent, &reference, value,
                    )
                }
                ast::AssignmentTarget::StaticMemberExpression(member) => {
                    let reference =
                        super::expression::evaluate_static_member_reference(agent, member)?;
                    crate::ecmascript::types::spec::reference::put_value(
                        agent, &reference, value,
                    )
                }
                ast::AssignmentTarget::ComputedMemberExpression(member) => {
                    let reference =
                        super::expression::evaluate_computed_member_reference(agent, member)?;
                    crate::ecmascript::types::spec::reference::put_value(
                        agent, &reference, value,
                    )
                }
                ast::AssignmentTarget::ArrayAssignmentTarget(pattern) => {
                    destructuring::destructuring_assignment_array(agent, pattern, value)
                }
                ast::AssignmentTarget::ObjectAssignmentTarget(pattern) => {
                    destructuring::destructuring_assignment_object(agent, pattern, value)
                }
                _ => Err(agent.throw_exception(
                    crate::ecmascript::execution::ExceptionType::SyntaxError,
                    "Invalid loop target",
                )),
            }
        }
    }
}

fn loop_continues(completion: &Completion, labels: &[HeapString]) -> LoopFlow {
    match completion {
        Completion::Normal(_) => LoopFlow::Continue,
        Completion::Continue { label: None, .. } => LoopFlow::Continue,
        Completion::Continue {
            label: Some(label), ..
        } if labels.contains(label) => LoopFlow::Continue,
        Completion::Break { label: None, .. } => LoopFlow::Break,
        Completion::Break {
            label: Some(label),
            ..
        } if labels.contains(label) => LoopFlow::Break,
        _ => LoopFlow::Propagate,
    }
}

enum LoopFlow {
    Continue,
    Break,
    Propagate,
}

/// ### [14.7.5.6 ForIn/OfHeadEvaluation, enumerate mode](https://tc39.es/ecma262/#sec-runtime-semantics-forinofheadevaluation)
///
/// EnumerateObjectProperties: own and inherited enumerable string keys,
/// each name at most once, shadowed names skipped.
fn enumerate_object_properties(agent: &mut Agent, object: Object) -> JsResult<Vec<PropertyKey>> {
    let mut visited: Vec<PropertyKey> = Vec::new();
    let mut keys: Vec<PropertyKey> = Vec::new();
    let mut current = Some(object);
    while let Some(target) = current {
        let own_keys = target.internal_own_property_keys(agent)?;
        for key in own_keys {
            if matches!(key, PropertyKey::Symbol(_)) {
                continue;
            }
            if visited.contains(&key) {
                continue;
            }
            visited.push(key);
            let descriptor = target.internal_get_own_property(agent, key)?;
            if let Some(descriptor) = descriptor {
                if descriptor.enumerable.unwrap_or(false) {
                    keys.push(key);
                }
            }
        }
        current = target.internal_get_prototype_of(agent)?;
    }
    Ok(keys)
}

/// ### [14.7.5 for-in evaluation](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements-runtime-semantics-evaluation)
pub(crate) fn evaluate_for_in(
    agent: &mut Agent,
    statement: &ast::ForInStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    let mut outer_env = agent.current_lexical_environment();
    let mut keys: Vec<PropertyKey>;
    let mut position = 0u32;
    let mut resuming_body = false;

    if agent.generator_is_resuming() {
        let Some(PathSegment::ForInBody {
            outer_env: saved_outer,
            keys: saved_keys,
            position: saved_position,
        }) = agent.generator_pop_segment()
        else {
            unreachable!("resume path disagrees with for-in structure");
        };
        outer_env = saved_outer;
        keys = saved_keys;
        position = saved_position;
        resuming_body = true;
    } else {
        // 1-6. Evaluate the object expression; null and undefined make
        //    the loop a no-op.
        let right = evaluate_expression(agent, &statement.right)?;
        if right.is_nullish() {
            return Ok(Completion::Normal(None));
        }
        let object = to_object(agent, right)?;
        keys = enumerate_object_properties(agent, object)?;
    }

    let mut last_value: Option<Value> = None;
    loop {
        if !resuming_body {
            if position as usize >= keys.len() {
                agent.set_lexical_environment(outer_env);
                return Ok(Completion::Normal(last_value));
            }
            let key = keys[position as usize];
            position += 1;
            let key_value = key.into_value(agent);
            agent.generator_reset_replay();
            bind_loop_target(agent, &statement.left, key_value, outer_env)?;
        }
        resuming_body = false;
        let result = evaluate_statement(agent, &statement.body);
        agent.set_lexical_environment(outer_env);
        let completion = match result {
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::ForInBody {
                    outer_env,
                    keys: core::mem::take(&mut keys),
                    position,
                });
                return Err(JsError::Suspend(value));
            }
            other => other?,
        };
        if let Some(value) = completion.value() {
            last_value = Some(value);
        }
        match loop_continues(&completion, labels) {
            LoopFlow::Continue => {}
            LoopFlow::Break => return Ok(Completion::Normal(last_value)),
            LoopFlow::Propagate => return Ok(completion),
        }
    }
}

/// ### [14.7.5 for-of evaluation](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements-runtime-semantics-evaluation)
pub(crate) fn evaluate_for_of(
    agent: &mut Agent,
    statement: &ast::ForOfStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    if statement.r#await {
        return Err(agent.throw_exception(
            crate::ecmascript::execution::ExceptionType::SyntaxError,
            "for await is not supported",
        ));
    }
    let mut outer_env = agent.current_lexical_environment();
    let iterator: IteratorRecord;
    let mut resuming_body = false;

    if agent.generator_is_resuming() {
        let Some(PathSegment::ForOfBody {
            outer_env: saved_outer,
            iterator: saved_iterator,
        }) = agent.generator_pop_segment()
        else {
            unreachable!("resume path disagrees with for-of structure");
        };
        outer_env = saved_outer;
        iterator = saved_iterator;
        resuming_body = true;
    } else {
        // 1-2. Evaluate the iterable and get its iterator.
        let right = evaluate_expression(agent, &statement.right)?;
        iterator = get_iterator(agent, right)?;
    }

    let mut last_value: Option<Value> = None;
    loop {
        if !resuming_body {
            // a-c. Step the iterator; done ends the loop.
            let step = iterator_step(agent, &iterator)?;
            let Some(step) = step else {
                agent.set_lexical_environment(outer_env);
                return Ok(Completion::Normal(last_value));
            };
            let next_value = iterator_value(agent, step)?;
            agent.generator_reset_replay();
            // d-g. Bind the loop target; binding errors close the
            //    iterator.
            let binding = bind_loop_target(agent, &statement.left, next_value, outer_env);
            if let Err(error) = binding {
                agent.set_lexical_environment(outer_env);
                return Err(iterator_close_with_error(agent, &iterator, error));
            }
        }
        resuming_body = false;
        let result = evaluate_statement(agent, &statement.body);
        agent.set_lexical_environment(outer_env);
        let completion = match result {
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::ForOfBody {
                    outer_env,
                    iterator,
                });
                return Err(JsError::Suspend(value));
            }
            Err(error) if error.is_catchable() => {
                // h-i. An abrupt body completion closes the iterator.
                return Err(iterator_close_with_error(agent, &iterator, error));
            }
            other => other?,
        };
        if let Some(value) = completion.value() {
            last_value = Some(value);
        }
        match loop_continues(&completion, labels) {
            LoopFlow::Continue => {}
            LoopFlow::Break => {
                iterator_close_normal(agent, &iterator)?;
                return Ok(Completion::Normal(last_value));
            }
            LoopFlow::Propagate => {
                iterator_close_normal(agent, &iterator)?;
                return Ok(completion);
            }
        }
    }
}
