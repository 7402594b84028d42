// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BindingInitialization and DestructuringAssignmentEvaluation over
//! binding and assignment patterns.

use oxc_ast::ast;

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    get_iterator, iterator_step, iterator_value,
};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    copy_data_properties, get_v,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible;
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::spec::reference::put_value;
use crate::ecmascript::types::{HeapString, PropertyKey, Value};

use super::expression::{
    evaluate_computed_member_reference, evaluate_expression, evaluate_property_key,
    evaluate_static_member_reference, evaluate_with_name, resolve_identifier,
};
use super::BindingTarget;

/// ### [8.6.2 BindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-bindinginitialization)
///
/// Defaults carried by AssignmentPattern nodes are applied here when the
/// incoming value is undefined.
pub(crate) fn binding_initialization(
    agent: &mut Agent,
    pattern: &ast::BindingPattern,
    value: Value,
    target: BindingTarget,
) -> JsResult<()> {
    match &pattern.kind {
        ast::BindingPatternKind::BindingIdentifier(identifier) => {
            let name = HeapString::from_str(agent, identifier.name.as_str());
            bind_name(agent, name, value, target)
        }
        ast::BindingPatternKind::AssignmentPattern(assignment) => {
            let value = if value.is_undefined() {
                let name = match &assignment.left.kind {
                    ast::BindingPatternKind::BindingIdentifier(identifier) => {
                        Some(HeapString::from_str(agent, identifier.name.as_str()))
                    }
                    _ => None,
                };
                evaluate_with_name(agent, &assignment.right, name)?
            } else {
                value
            };
            binding_initialization(agent, &assignment.left, value, target)
        }
        ast::BindingPatternKind::ObjectPattern(pattern) => {
            object_binding_initialization(agent, pattern, value, target)
        }
        ast::BindingPatternKind::ArrayPattern(pattern) => {
            array_binding_initialization(agent, pattern, value, target)
        }
    }
}

fn bind_name(
    agent: &mut Agent,
    name: HeapString,
    value: Value,
    target: BindingTarget,
) -> JsResult<()> {
    let strict = agent.is_strict_code();
    match target {
        BindingTarget::Initialize => {
            let reference =
                crate::ecmascript::execution::agent::resolve_binding(agent, name, strict, None)?;
            crate::ecmascript::types::spec::reference::initialize_referenced_binding(
                agent, &reference, value,
            )
        }
        BindingTarget::InitializeOrSet => {
            // Duplicate parameter names overwrite: try the assignment
            // first, and fall back to initialization while the binding is
            // still in its dead zone.
            let env = agent.current_lexical_environment();
            match env.set_mutable_binding(agent, name, value, false) {
                Ok(()) => Ok(()),
                Err(_) => env.initialize_binding(agent, name, value),
            }
        }
        BindingTarget::Put => {
            let reference =
                crate::ecmascript::execution::agent::resolve_binding(agent, name, strict, None)?;
            put_value(agent, &reference, value)
        }
    }
}

/// ### [14.3.3.1 ObjectBindingPattern initialization](https://tc39.es/ecma262/#sec-destructuring-binding-patterns)
fn object_binding_initialization(
    agent: &mut Agent,
    pattern: &ast::ObjectPattern,
    value: Value,
    target: BindingTarget,
) -> JsResult<()> {
    // 1. Perform ? RequireObjectCoercible(value).
    require_object_coercible(agent, value)?;
    let mut seen_keys: Vec<PropertyKey> = Vec::new();
    for property in pattern.properties.iter() {
        let key = evaluate_property_key(agent, &property.key, property.computed)?;
        seen_keys.push(key);
        let property_value = get_v(agent, value, key)?;
        binding_initialization(agent, &property.value, property_value, target)?;
    }
    // Rest element: the remaining own enumerable properties.
    if let Some(rest) = &pattern.rest {
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let rest_object = crate::ecmascript::builtins::ordinary::ordinary_object_create(
            agent,
            Some(object_prototype.into()),
        );
        copy_data_properties(agent, rest_object.into(), value, &seen_keys)?;
        binding_initialization(agent, &rest.argument, rest_object.into(), target)?;
    }
    Ok(())
}

/// ### [8.6.3 IteratorBindingInitialization](https://tc39.es/ecma262/#sec-runtime-semantics-iteratorbindinginitialization)
fn array_binding_initialization(
    agent: &mut Agent,
    pattern: &ast::ArrayPattern,
    value: Value,
    target: BindingTarget,
) -> JsResult<()> {
    let iterator = get_iterator(agent, value)?;
    let mut done = false;
    for element in pattern.elements.iter() {
        let next_value = if done {
            Value::Undefined
        } else {
            match iterator_step(agent, &iterator)? {
                Some(result) => iterator_value(agent, result)?,
                None => {
                    done = true;
                    Value::Undefined
                }
            }
        };
        if let Some(element) = element {
            binding_initialization(agent, element, next_value, target)?;
        }
    }
    if let Some(rest) = &pattern.rest {
        let mut rest_values = Vec::new();
        if !done {
            while let Some(result) = iterator_step(agent, &iterator)? {
                rest_values.push(iterator_value(agent, result)?);
            }
        }
        let rest_array =
            crate::ecmascript::builtins::array::create_array_from_list(agent, &rest_values);
        binding_initialization(agent, &rest.argument, rest_array.into(), target)?;
    }
    Ok(())
}

/// ### [13.15.5 Destructuring Assignment: ObjectAssignmentPattern](https://tc39.es/ecma262/#sec-runtime-semantics-destructuringassignmentevaluation)
pub(crate) fn destructuring_assignment_object(
    agent: &mut Agent,
    pattern: &ast::ObjectAssignmentTarget,
    value: Value,
) -> JsResult<()> {
    require_object_coercible(agent, value)?;
    let mut seen_keys: Vec<PropertyKey> = Vec::new();
    for property in pattern.properties.iter() {
        match property {
            ast::AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(property) => {
                let key = PropertyKey::from_str(agent, property.binding.name.as_str());
                seen_keys.push(key);
                let mut property_value = get_v(agent, value, key)?;
                if let Some(init) = &property.init {
                    if property_value.is_undefined() {
                        property_value = evaluate_expression(agent, init)?;
                    }
                }
                let reference = resolve_identifier(agent, property.binding.name.as_str())?;
                put_value(agent, &reference, property_value)?;
            }
            ast::AssignmentTargetProperty::AssignmentTargetPropertyProperty(property) => {
                let key = match &property.name {
                    ast::PropertyKey::StaticIdentifier(identifier) => {
                        PropertyKey::from_str(agent, identifier.name.as_str())
                    }
                    ast::PropertyKey::StringLiteral(literal) => {
                        PropertyKey::from_str(agent, literal.value.as_str())
                    }
                    name => {
                        let expression = name
                            .as_expression()
                            .expect("computed assignment key is an expression");
                        let computed = evaluate_expression(agent, expression)?;
                        to_property_key(agent, computed)?
                    }
                };
                seen_keys.push(key);
                let property_value = get_v(agent, value, key)?;
                assignment_target_maybe_default(agent, &property.binding, property_value)?;
            }
        }
    }
    if let Some(rest) = &pattern.rest {
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let rest_object = crate::ecmascript::builtins::ordinary::ordinary_object_create(
            agent,
            Some(object_prototype.into()),
        );
        copy_data_properties(agent, rest_object.into(), value, &seen_keys)?;
        assign_to_target(agent, &rest.target, rest_object.into())?;
    }
    Ok(())
}

/// ### [13.15.5 Destructuring Assignment: ArrayAssignmentPattern](https://tc39.es/ecma262/#sec-runtime-semantics-destructuringassignmentevaluation)
pub(crate) fn destructuring_assignment_array(
    agent: &mut Agent,
    pattern: &ast::ArrayAssignmentTarget,
    value: Value,
) -> JsResult<()> {
    let iterator = get_iterator(agent, value)?;
    let mut done = false;
    for element in pattern.elements.iter() {
        let next_value = if done {
            Value::Undefined
        } else {
            match iterator_step(agent, &iterator)? {
                Some(result) => iterator_value(agent, result)?,
                None => {
                    done = true;
                    Value::Undefined
                }
            }
        };
        if let Some(element) = element {
            assignment_target_maybe_default(agent, element, next_value)?;
        }
    }
    if let Some(rest) = &pattern.rest {
        let mut rest_values = Vec::new();
        if !done {
            while let Some(result) = iterator_step(agent, &iterator)? {
                rest_values.push(iterator_value(agent, result)?);
            }
        }
        let rest_array =
            crate::ecmascript::builtins::array::create_array_from_list(agent, &rest_values);
        assign_to_target(agent, &rest.target, rest_array.into())?;
    }
    Ok(())
}

/// An assignment target element, possibly wrapped with a default value.
fn assignment_target_maybe_default(
    agent: &mut Agent,
    target: &ast::AssignmentTargetMaybeDefault,
    value: Value,
) -> JsResult<()> {
    match target {
        ast::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(with_default) => {
            let value = if value.is_undefined() {
                evaluate_expression(agent, &with_default.init)?
            } else {
                value
            };
            assign_to_target(agent, &with_default.binding, value)
        }
        target => {
            let target = target
                .as_assignment_target()
                .expect("non-default element is an assignment target");
            assign_to_target(agent, target, value)
        }
    }
}

fn assign_to_target(
    agent: &mut Agent,
    target: &ast::AssignmentTarget,
    value: Value,
) -> JsResult<()> {
    match target {
        ast::AssignmentTarget::AssignmentTargetIdentifier(identifier) => {
            let reference = resolve_identifier(agent, identifier.name.as_str())?;
            put_value(agent, &reference, value)
        }
        ast::AssignmentTarget::StaticMemberExpression(member) => {
            let reference = evaluate_static_member_reference(agent, member)?;
            put_value(agent, &reference, value)
        }
        ast::AssignmentTarget::ComputedMemberExpression(member) => {
            let reference = evaluate_computed_member_reference(agent, member)?;
            put_value(agent, &reference, value)
        }
        ast::AssignmentTarget::ArrayAssignmentTarget(pattern) => {
            destructuring_assignment_array(agent, pattern, value)
        }
        ast::AssignmentTarget::ObjectAssignmentTarget(pattern) => {
            destructuring_assignment_object(agent, pattern, value)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Invalid assignment target",
        )),
    }
}
