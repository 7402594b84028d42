// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Expression evaluation, keyed by oxc AST node kind.

use oxc_ast::ast::{self, Expression};
use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    get_iterator, iterator_step, iterator_value,
};
use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, construct, copy_data_properties, create_data_property_or_throw, get,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    instanceof_operator, is_constructor, is_less_than, is_loosely_equal, is_strictly_equal,
};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_boolean, to_number, to_numeric, to_object, to_primitive, to_property_key, to_string,
};
use crate::ecmascript::builtins::array::array_create;
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::{get_this_environment, EnvironmentIndex};
use crate::ecmascript::execution::{resolve_binding, Agent, JsError, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::{
    instantiate_arrow_function_expression, instantiate_ordinary_function_expression,
};
use crate::ecmascript::types::language::number::{f64_to_int32, f64_to_uint32};
use crate::ecmascript::types::spec::reference::{
    call_reference, get_value, initialize_referenced_binding, put_value,
};
use crate::ecmascript::types::{
    Base, Function, HeapBigInt, HeapString, InternalMethods, Numeric, Object, PreferredType,
    PropertyKey, Reference, Value,
};

use super::class_evaluation;
use super::destructuring;

/// Evaluate an expression to a value.
pub(crate) fn evaluate_expression(agent: &mut Agent, expression: &Expression) -> JsResult<Value> {
    evaluate_with_name(agent, expression, None)
}

/// NamedEvaluation: anonymous functions and classes pick up the name of
/// the binding they initialize.
pub(crate) fn evaluate_with_name(
    agent: &mut Agent,
    expression: &Expression,
    name: Option<HeapString>,
) -> JsResult<Value> {
    match expression {
        Expression::BooleanLiteral(literal) => Ok(Value::Boolean(literal.value)),
        Expression::NullLiteral(_) => Ok(Value::Null),
        Expression::NumericLiteral(literal) => Ok(Value::from_f64(literal.value)),
        Expression::StringLiteral(literal) => Ok(Value::from_str(agent, literal.value.as_str())),
        Expression::BigIntLiteral(literal) => evaluate_bigint_literal(agent, literal),
        Expression::RegExpLiteral(literal) => evaluate_regexp_literal(agent, literal),
        Expression::TemplateLiteral(literal) => evaluate_template_literal(agent, literal),
        Expression::TaggedTemplateExpression(expression) => {
            evaluate_tagged_template(agent, expression)
        }
        Expression::Identifier(identifier) => {
            let reference = resolve_identifier(agent, identifier.name.as_str())?;
            get_value(agent, &reference)
        }
        Expression::ThisExpression(_) => resolve_this_binding(agent),
        Expression::MetaProperty(meta) => evaluate_meta_property(agent, meta),
        Expression::ArrayExpression(expression) => evaluate_array_expression(agent, expression),
        Expression::ObjectExpression(expression) => evaluate_object_expression(agent, expression),
        Expression::FunctionExpression(function) => {
            let f = instantiate_ordinary_function_expression(agent, function, name);
            Ok(f.into())
        }
        Expression::ArrowFunctionExpression(function) => {
            let f = instantiate_arrow_function_expression(agent, function, name);
            Ok(f.into())
        }
        Expression::ClassExpression(class) => class_evaluation::evaluate_class(agent, class, name),
        Expression::ParenthesizedExpression(expression) => {
            evaluate_with_name(agent, &expression.expression, name)
        }
        Expression::SequenceExpression(expression) => {
            let mut value = Value::Undefined;
            for expression in expression.expressions.iter() {
                value = evaluate_expression(agent, expression)?;
            }
            Ok(value)
        }
        Expression::ConditionalExpression(expression) => {
            let test = evaluate_expression(agent, &expression.test)?;
            if to_boolean(agent, test) {
                evaluate_expression(agent, &expression.consequent)
            } else {
                evaluate_expression(agent, &expression.alternate)
            }
        }
        Expression::UnaryExpression(expression) => evaluate_unary(agent, expression),
        Expression::UpdateExpression(expression) => evaluate_update(agent, expression),
        Expression::BinaryExpression(expression) => evaluate_binary(agent, expression),
        Expression::LogicalExpression(expression) => evaluate_logical(agent, expression),
        Expression::AssignmentExpression(expression) => evaluate_assignment(agent, expression),
        Expression::CallExpression(expression) => evaluate_call_expression(agent, expression),
        Expression::NewExpression(expression) => evaluate_new_expression(agent, expression),
        Expression::ChainExpression(expression) => {
            evaluate_chain_element(agent, &expression.expression)
        }
        Expression::StaticMemberExpression(expression) => {
            let reference = evaluate_static_member_reference(agent, expression)?;
            get_value(agent, &reference)
        }
        Expression::ComputedMemberExpression(expression) => {
            let reference = evaluate_computed_member_reference(agent, expression)?;
            get_value(agent, &reference)
        }
        Expression::PrivateFieldExpression(_) | Expression::PrivateInExpression(_) => Err(agent
            .throw_exception(
                ExceptionType::SyntaxError,
                "Private class members are not supported",
            )),
        Expression::AwaitExpression(expression) => evaluate_await(agent, expression),
        Expression::YieldExpression(expression) => evaluate_yield(agent, expression),
        Expression::ImportExpression(expression) => evaluate_import_call(agent, expression),
        Expression::Super(_) => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "'super' keyword unexpected here",
        )),
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Unsupported expression kind",
        )),
    }
}

pub(crate) fn resolve_identifier(agent: &mut Agent, name: &str) -> JsResult<Reference> {
    let strict = agent.is_strict_code();
    let name = HeapString::from_str(agent, name);
    resolve_binding(agent, name, strict, None)
}

/// ### [13.2.2 The this Keyword](https://tc39.es/ecma262/#sec-this-keyword)
pub(crate) fn resolve_this_binding(agent: &mut Agent) -> JsResult<Value> {
    // GetThisEnvironment and ask it for the this binding.
    let env = get_this_environment(agent);
    match env {
        EnvironmentIndex::Function(env) => env.get_this_binding(agent),
        EnvironmentIndex::Global(env) => Ok(env.get_this_binding(agent).into()),
        EnvironmentIndex::Module(_) => Ok(Value::Undefined),
        _ => Ok(Value::Undefined),
    }
}

fn evaluate_bigint_literal(agent: &mut Agent, literal: &ast::BigIntLiteral) -> JsResult<Value> {
    // Drop the trailing 'n' and parse in the literal's radix.
    let raw = literal.raw.as_str();
    let last_index = raw.len() - 1;
    let (body, radix) = match raw.as_bytes().get(1) {
        Some(b'x') | Some(b'X') => (&raw[2..last_index], 16),
        Some(b'o') | Some(b'O') => (&raw[2..last_index], 8),
        Some(b'b') | Some(b'B') => (&raw[2..last_index], 2),
        _ => (&raw[..last_index], 10),
    };
    match HeapBigInt::parse(agent, body, radix) {
        Some(value) => Ok(Value::BigInt(value)),
        None => Err(agent.throw_exception(ExceptionType::SyntaxError, "Invalid BigInt literal")),
    }
}

fn evaluate_regexp_literal(agent: &mut Agent, literal: &ast::RegExpLiteral) -> JsResult<Value> {
    let pattern = literal.regex.pattern.to_string();
    let flags = literal.regex.flags.to_string();
    let pattern = HeapString::from_string(agent, pattern);
    let regexp = crate::ecmascript::builtins::regexp::reg_exp_create(agent, pattern, &flags)?;
    Ok(regexp.into())
}

/// ### [13.2.8 Template Literals](https://tc39.es/ecma262/#sec-template-literals)
fn evaluate_template_literal(
    agent: &mut Agent,
    literal: &ast::TemplateLiteral,
) -> JsResult<Value> {
    let mut parts: Vec<HeapString> = Vec::new();
    for (index, quasi) in literal.quasis.iter().enumerate() {
        let cooked = quasi
            .value
            .cooked
            .as_ref()
            .map(|cooked| cooked.as_str())
            .unwrap_or("");
        parts.push(HeapString::from_str(agent, cooked));
        if let Some(expression) = literal.expressions.get(index) {
            let value = evaluate_expression(agent, expression)?;
            let value = to_string(agent, value)?;
            parts.push(value);
        }
    }
    Ok(Value::String(HeapString::concat(agent, &parts)))
}

/// ### [13.2.8.3 GetTemplateObject ( templateLiteral )](https://tc39.es/ecma262/#sec-gettemplateobject)
fn evaluate_tagged_template(
    agent: &mut Agent,
    expression: &ast::TaggedTemplateExpression,
) -> JsResult<Value> {
    let literal = &expression.quasi;
    // The template object is cached per call site in the realm's
    // template map.
    let site = literal.span.start;
    let template_object = match agent.current_realm().template_map.get(&site) {
        Some(cached) => *cached,
        None => {
            let count = literal.quasis.len();
            let strings = array_create(agent, count, None)?;
            let raw_strings = array_create(agent, count, None)?;
            for (index, quasi) in literal.quasis.iter().enumerate() {
                let cooked = match &quasi.value.cooked {
                    Some(cooked) => Value::from_str(agent, cooked.as_str()),
                    None => Value::Undefined,
                };
                let raw = Value::from_str(agent, quasi.value.raw.as_str());
                agent[strings].elements[index] = Some(cooked);
                agent[raw_strings].elements[index] = Some(raw);
            }
            let raw_key = PropertyKey::from_static_str(agent, "raw");
            create_data_property_or_throw(agent, strings, raw_key, raw_strings.into())?;
            crate::ecmascript::abstract_operations::operations_on_objects::set_integrity_level(
                agent,
                strings.into(),
                crate::ecmascript::abstract_operations::operations_on_objects::IntegrityLevel::Frozen,
            )?;
            let template_object = Object::Array(strings);
            agent
                .current_realm_mut()
                .template_map
                .insert(site, template_object);
            template_object
        }
    };
    // Evaluate the tag and call it with the template object and the
    // substitution values.
    let (tag, this_value) = match &expression.tag {
        Expression::StaticMemberExpression(member) => {
            let reference = evaluate_static_member_reference(agent, member)?;
            let this_value = reference.get_this_value();
            (get_value(agent, &reference)?, this_value)
        }
        Expression::ComputedMemberExpression(member) => {
            let reference = evaluate_computed_member_reference(agent, member)?;
            let this_value = reference.get_this_value();
            (get_value(agent, &reference)?, this_value)
        }
        tag => (evaluate_expression(agent, tag)?, Value::Undefined),
    };
    let mut arguments = vec![template_object.into()];
    for expression in literal.expressions.iter() {
        arguments.push(evaluate_expression(agent, expression)?);
    }
    call_function(agent, tag, this_value, &arguments)
}

fn evaluate_meta_property(agent: &mut Agent, meta: &ast::MetaProperty) -> JsResult<Value> {
    let meta_name = meta.meta.name.as_str();
    let property_name = meta.property.name.as_str();
    if meta_name == "new" && property_name == "target" {
        // GetNewTarget.
        let env = get_this_environment(agent);
        if let EnvironmentIndex::Function(env) = env {
            return Ok(env
                .get_new_target(agent)
                .map_or(Value::Undefined, Value::Object));
        }
        return Ok(Value::Undefined);
    }
    // import.meta: an empty ordinary object per module; minimal form.
    let object_prototype = agent.current_realm().intrinsics().object_prototype();
    Ok(ordinary_object_create(agent, Some(object_prototype.into())).into())
}

/// ### [13.2.4 Array Initializer](https://tc39.es/ecma262/#sec-array-initializer)
fn evaluate_array_expression(
    agent: &mut Agent,
    expression: &ast::ArrayExpression,
) -> JsResult<Value> {
    let array = array_create(agent, 0, None)?;
    let mut next_index = 0usize;
    for element in expression.elements.iter() {
        match element {
            ast::ArrayExpressionElement::Elision(_) => {
                // A hole extends the length without creating an element.
                next_index += 1;
                let data = &mut agent[array];
                data.elements.resize(next_index, None);
            }
            ast::ArrayExpressionElement::SpreadElement(spread) => {
                let spread_value = evaluate_expression(agent, &spread.argument)?;
                let iterator = get_iterator(agent, spread_value)?;
                while let Some(result) = iterator_step(agent, &iterator)? {
                    let value = iterator_value(agent, result)?;
                    let data = &mut agent[array];
                    data.elements.resize(next_index, None);
                    data.elements.push(Some(value));
                    next_index += 1;
                }
            }
            element => {
                let expression = element
                    .as_expression()
                    .expect("non-spread array element is an expression");
                let value = evaluate_expression(agent, expression)?;
                let data = &mut agent[array];
                data.elements.resize(next_index, None);
                data.elements.push(Some(value));
                next_index += 1;
            }
        }
    }
    let data = &mut agent[array];
    if data.elements.len() < next_index {
        data.elements.resize(next_index, None);
    }
    Ok(array.into())
}

/// ### [13.2.5 Object Initializer](https://tc39.es/ecma262/#sec-object-initializer)
fn evaluate_object_expression(
    agent: &mut Agent,
    expression: &ast::ObjectExpression,
) -> JsResult<Value> {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let object_prototype = agent.current_realm().intrinsics().object_prototype();
    let object = ordinary_object_create(agent, Some(object_prototype.into()));
    for property in expression.properties.iter() {
        match property {
            ast::ObjectPropertyKind::SpreadProperty(spread) => {
                let source = evaluate_expression(agent, &spread.argument)?;
                copy_data_properties(agent, object.into(), source, &[])?;
            }
            ast::ObjectPropertyKind::ObjectProperty(property) => {
                let key = evaluate_property_key(agent, &property.key, property.computed)?;
                match property.kind {
                    ast::PropertyKind::Init => {
                        let name = key.as_string(agent);
                        // __proto__ in literal position sets the prototype.
                        if !property.computed {
                            if let Some(name) = name {
                                if name.to_string_lossy(agent) == "__proto__" {
                                    let value = evaluate_expression(agent, &property.value)?;
                                    match value {
                                        Value::Object(proto) => {
                                            use crate::ecmascript::types::InternalSlots;
                                            object.internal_set_prototype(agent, Some(proto));
                                        }
                                        Value::Null => {
                                            use crate::ecmascript::types::InternalSlots;
                                            object.internal_set_prototype(agent, None);
                                        }
                                        _ => {}
                                    }
                                    continue;
                                }
                            }
                        }
                        let value =
                            evaluate_property_value(agent, &property.value, name)?;
                        create_data_property_or_throw(agent, object, key, value)?;
                    }
                    ast::PropertyKind::Get | ast::PropertyKind::Set => {
                        class_evaluation::define_method_property(
                            agent,
                            object.into(),
                            key,
                            &property.value,
                            property.kind,
                        )?;
                    }
                }
            }
        }
    }
    Ok(object.into())
}

pub(crate) fn evaluate_property_key(
    agent: &mut Agent,
    key: &ast::PropertyKey,
    computed: bool,
) -> JsResult<PropertyKey> {
    match key {
        ast::PropertyKey::StaticIdentifier(identifier) => {
            Ok(PropertyKey::from_str(agent, identifier.name.as_str()))
        }
        ast::PropertyKey::StringLiteral(literal) => {
            Ok(PropertyKey::from_str(agent, literal.value.as_str()))
        }
        ast::PropertyKey::NumericLiteral(literal) => {
            let as_string =
                crate::ecmascript::types::language::number::f64_to_js_string(literal.value);
            Ok(PropertyKey::from_str(agent, &as_string))
        }
        ast::PropertyKey::PrivateIdentifier(_) => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Private class members are not supported",
        )),
        key => {
            debug_assert!(computed);
            let expression = key
                .as_expression()
                .expect("computed property key is an expression");
            let value = evaluate_expression(agent, expression)?;
            to_property_key(agent, value)
        }
    }
}

fn evaluate_property_value(
    agent: &mut Agent,
    value: &Expression,
    name: Option<HeapString>,
) -> JsResult<Value> {
    match value {
        Expression::FunctionExpression(function) if function.id.is_none() => {
            let f = instantiate_ordinary_function_expression(agent, function, name);
            Ok(f.into())
        }
        Expression::ArrowFunctionExpression(function) => {
            let f = instantiate_arrow_function_expression(agent, function, name);
            Ok(f.into())
        }
        value => evaluate_expression(agent, value),
    }
}

/// ### [13.5 Unary Operators](https://tc39.es/ecma262/#sec-unary-operators)
fn evaluate_unary(agent: &mut Agent, expression: &ast::UnaryExpression) -> JsResult<Value> {
    match expression.operator {
        // 13.5.1 The delete Operator.
        UnaryOperator::Delete => evaluate_delete(agent, &expression.argument),
        // 13.5.2 The void Operator.
        UnaryOperator::Void => {
            evaluate_expression(agent, &expression.argument)?;
            Ok(Value::Undefined)
        }
        // 13.5.3 The typeof Operator: an unresolvable reference yields
        //    "undefined" instead of throwing.
        UnaryOperator::Typeof => {
            let value = match &expression.argument {
                Expression::Identifier(identifier) => {
                    let reference = resolve_identifier(agent, identifier.name.as_str())?;
                    if reference.is_unresolvable_reference() {
                        return Ok(Value::from_static_str(agent, "undefined"));
                    }
                    get_value(agent, &reference)?
                }
                argument => evaluate_expression(agent, argument)?,
            };
            Ok(Value::from_static_str(agent, value.type_of(agent)))
        }
        // 13.5.4 Unary + Operator.
        UnaryOperator::UnaryPlus => {
            let value = evaluate_expression(agent, &expression.argument)?;
            Ok(Value::from_f64(to_number(agent, value)?))
        }
        // 13.5.5 Unary - Operator.
        UnaryOperator::UnaryNegation => {
            let value = evaluate_expression(agent, &expression.argument)?;
            match to_numeric(agent, value)? {
                Numeric::Number(n) => Ok(Value::from_f64(-n)),
                Numeric::BigInt(b) => Ok(Value::BigInt(b.unary_minus(agent))),
            }
        }
        // 13.5.6 Bitwise NOT Operator ( ~ ).
        UnaryOperator::BitwiseNot => {
            let value = evaluate_expression(agent, &expression.argument)?;
            match to_numeric(agent, value)? {
                Numeric::Number(n) => Ok(Value::from(!f64_to_int32(n))),
                Numeric::BigInt(b) => Ok(Value::BigInt(b.bitwise_not(agent))),
            }
        }
        // 13.5.7 Logical NOT Operator ( ! ).
        UnaryOperator::LogicalNot => {
            let value = evaluate_expression(agent, &expression.argument)?;
            Ok(Value::Boolean(!to_boolean(agent, value)))
        }
    }
}

/// ### [13.5.1 The delete Operator](https://tc39.es/ecma262/#sec-delete-operator)
fn evaluate_delete(agent: &mut Agent, argument: &Expression) -> JsResult<Value> {
    let strict = agent.is_strict_code();
    let reference = match argument {
        Expression::StaticMemberExpression(member) => {
            evaluate_static_member_reference(agent, member)?
        }
        Expression::ComputedMemberExpression(member) => {
            evaluate_computed_member_reference(agent, member)?
        }
        Expression::Identifier(identifier) => {
            if strict {
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    "Delete of an unqualified identifier in strict mode",
                ));
            }
            let reference = resolve_identifier(agent, identifier.name.as_str())?;
            if reference.is_unresolvable_reference() {
                return Ok(Value::Boolean(true));
            }
            let Base::Environment(env) = reference.base else {
                return Ok(Value::Boolean(true));
            };
            let name = match reference.referenced_name {
                PropertyKey::String(name) => name,
                _ => return Ok(Value::Boolean(true)),
            };
            return Ok(Value::Boolean(env.delete_binding(agent, name)?));
        }
        argument => {
            // delete on a non-reference evaluates the operand and yields
            // true.
            evaluate_expression(agent, argument)?;
            return Ok(Value::Boolean(true));
        }
    };
    let Base::Value(base) = reference.base else {
        return Ok(Value::Boolean(true));
    };
    let base_object = to_object(agent, base)?;
    let deleted = base_object.internal_delete(agent, reference.referenced_name)?;
    if !deleted && strict {
        let name = reference.referenced_name.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Cannot delete property '{name}'"),
        ));
    }
    Ok(Value::Boolean(deleted))
}

/// ### [13.4 Update Expressions](https://tc39.es/ecma262/#sec-update-expressions)
fn evaluate_update(agent: &mut Agent, expression: &ast::UpdateExpression) -> JsResult<Value> {
    let reference = evaluate_assignment_target_reference(agent, &expression.argument)?;
    let old_value = get_value(agent, &reference)?;
    let old_value = to_numeric(agent, old_value)?;
    let new_value = match old_value {
        Numeric::Number(n) => match expression.operator {
            UpdateOperator::Increment => Value::from_f64(n + 1.0),
            UpdateOperator::Decrement => Value::from_f64(n - 1.0),
        },
        Numeric::BigInt(b) => {
            let one = HeapBigInt::from_i64(agent, 1);
            let op = match expression.operator {
                UpdateOperator::Increment => {
                    crate::ecmascript::types::language::bigint::BigIntBinaryOp::Add
                }
                UpdateOperator::Decrement => {
                    crate::ecmascript::types::language::bigint::BigIntBinaryOp::Subtract
                }
            };
            HeapBigInt::binary_op(agent, op, b, one)?
        }
    };
    let old_value = old_value.into_value(agent);
    put_value(agent, &reference, new_value)?;
    if expression.prefix {
        Ok(new_value)
    } else {
        Ok(old_value)
    }
}

fn evaluate_assignment_target_reference(
    agent: &mut Agent,
    target: &ast::SimpleAssignmentTarget,
) -> JsResult<Reference> {
    match target {
        ast::SimpleAssignmentTarget::AssignmentTargetIdentifier(identifier) => {
            resolve_identifier(agent, identifier.name.as_str())
        }
        ast::SimpleAssignmentTarget::StaticMemberExpression(member) => {
            evaluate_static_member_reference(agent, member)
        }
        ast::SimpleAssignmentTarget::ComputedMemberExpression(member) => {
            evaluate_computed_member_reference(agent, member)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Invalid assignment target",
        )),
    }
}

/// ### [13.10 Relational Operators / 13.8 Additive Operators / ...](https://tc39.es/ecma262/#sec-binary-operators)
fn evaluate_binary(agent: &mut Agent, expression: &ast::BinaryExpression) -> JsResult<Value> {
    // `in` and `instanceof` evaluate their operands in order but bypass
    // the numeric machinery.
    match expression.operator {
        BinaryOperator::In => {
            let left = evaluate_expression(agent, &expression.left)?;
            let right = evaluate_expression(agent, &expression.right)?;
            let Value::Object(object) = right else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Cannot use 'in' operator to search in a non-object",
                ));
            };
            let key = to_property_key(agent, left)?;
            return Ok(Value::Boolean(object.internal_has_property(agent, key)?));
        }
        BinaryOperator::Instanceof => {
            let left = evaluate_expression(agent, &expression.left)?;
            let right = evaluate_expression(agent, &expression.right)?;
            return Ok(Value::Boolean(instanceof_operator(agent, left, right)?));
        }
        _ => {}
    }
    let left = evaluate_expression(agent, &expression.left)?;
    let right = evaluate_expression(agent, &expression.right)?;
    apply_binary_operator(agent, expression.operator, left, right)
}

pub(crate) fn apply_binary_operator(
    agent: &mut Agent,
    operator: BinaryOperator,
    left: Value,
    right: Value,
) -> JsResult<Value> {
    use crate::ecmascript::types::language::bigint::BigIntBinaryOp;
    match operator {
        // 13.8.1 The Addition Operator ( + ).
        BinaryOperator::Addition => {
            let left_prim = to_primitive(agent, left, PreferredType::Default)?;
            let right_prim = to_primitive(agent, right, PreferredType::Default)?;
            if left_prim.is_string() || right_prim.is_string() {
                let left_string = to_string(agent, left_prim)?;
                let right_string = to_string(agent, right_prim)?;
                return Ok(Value::String(HeapString::concat(
                    agent,
                    &[left_string, right_string],
                )));
            }
            numeric_binary_op(agent, left_prim, right_prim, BigIntBinaryOp::Add, |a, b| {
                a + b
            })
        }
        BinaryOperator::Subtraction => {
            numeric_binary_op(agent, left, right, BigIntBinaryOp::Subtract, |a, b| a - b)
        }
        BinaryOperator::Multiplication => {
            numeric_binary_op(agent, left, right, BigIntBinaryOp::Multiply, |a, b| a * b)
        }
        BinaryOperator::Division => {
            numeric_binary_op(agent, left, right, BigIntBinaryOp::Divide, |a, b| a / b)
        }
        BinaryOperator::Remainder => {
            numeric_binary_op(agent, left, right, BigIntBinaryOp::Remainder, |a, b| a % b)
        }
        BinaryOperator::Exponential => {
            numeric_binary_op(agent, left, right, BigIntBinaryOp::Exponentiate, |a, b| {
                a.powf(b)
            })
        }
        // 13.10 Relational Operators.
        BinaryOperator::LessThan => {
            let result = is_less_than::<true>(agent, left, right)?;
            Ok(Value::Boolean(result.unwrap_or(false)))
        }
        BinaryOperator::GreaterThan => {
            let result = is_less_than::<false>(agent, right, left)?;
            Ok(Value::Boolean(result.unwrap_or(false)))
        }
        BinaryOperator::LessEqualThan => {
            let result = is_less_than::<false>(agent, right, left)?;
            Ok(Value::Boolean(!result.unwrap_or(true)))
        }
        BinaryOperator::GreaterEqualThan => {
            let result = is_less_than::<true>(agent, left, right)?;
            Ok(Value::Boolean(!result.unwrap_or(true)))
        }
        // 13.11 Equality Operators.
        BinaryOperator::Equality => Ok(Value::Boolean(is_loosely_equal(agent, left, right)?)),
        BinaryOperator::Inequality => {
            Ok(Value::Boolean(!is_loosely_equal(agent, left, right)?))
        }
        BinaryOperator::StrictEquality => {
            Ok(Value::Boolean(is_strictly_equal(agent, left, right)))
        }
        BinaryOperator::StrictInequality => {
            Ok(Value::Boolean(!is_strictly_equal(agent, left, right)))
        }
        // 13.9 Bitwise Shift Operators and 13.12 Binary Bitwise Operators.
        BinaryOperator::ShiftLeft => {
            bitwise_op(agent, left, right, BigIntBinaryOp::ShiftLeft, |a, b| {
                a.wrapping_shl(b)
            })
        }
        BinaryOperator::ShiftRight => {
            bitwise_op(agent, left, right, BigIntBinaryOp::ShiftRight, |a, b| {
                a.wrapping_shr(b)
            })
        }
        BinaryOperator::ShiftRightZeroFill => {
            // The unsigned shift works on Uint32 and has no BigInt form.
            let left = to_numeric(agent, left)?;
            let right = to_numeric(agent, right)?;
            match (left, right) {
                (Numeric::Number(l), Numeric::Number(r)) => {
                    let l = f64_to_uint32(l);
                    let shift = f64_to_uint32(r) % 32;
                    Ok(Value::from_f64((l.wrapping_shr(shift)) as f64))
                }
                _ => Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "BigInts have no unsigned right shift, use >> instead",
                )),
            }
        }
        BinaryOperator::BitwiseOR => {
            bitwise_op(agent, left, right, BigIntBinaryOp::BitwiseOr, |a, b| {
                a | (b as i32)
            })
        }
        BinaryOperator::BitwiseXOR => {
            bitwise_op(agent, left, right, BigIntBinaryOp::BitwiseXor, |a, b| {
                a ^ (b as i32)
            })
        }
        BinaryOperator::BitwiseAnd => {
            bitwise_op(agent, left, right, BigIntBinaryOp::BitwiseAnd, |a, b| {
                a & (b as i32)
            })
        }
        BinaryOperator::In | BinaryOperator::Instanceof => {
            unreachable!("handled before operand evaluation")
        }
    }
}

fn numeric_binary_op(
    agent: &mut Agent,
    left: Value,
    right: Value,
    bigint_op: crate::ecmascript::types::language::bigint::BigIntBinaryOp,
    number_op: fn(f64, f64) -> f64,
) -> JsResult<Value> {
    let left = to_numeric(agent, left)?;
    let right = to_numeric(agent, right)?;
    match (left, right) {
        (Numeric::Number(l), Numeric::Number(r)) => Ok(Value::from_f64(number_op(l, r))),
        (Numeric::BigInt(l), Numeric::BigInt(r)) => {
            HeapBigInt::binary_op(agent, bigint_op, l, r)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot mix BigInt and other types, use explicit conversions",
        )),
    }
}

fn bitwise_op(
    agent: &mut Agent,
    left: Value,
    right: Value,
    bigint_op: crate::ecmascript::types::language::bigint::BigIntBinaryOp,
    int_op: fn(i32, u32) -> i32,
) -> JsResult<Value> {
    let left = to_numeric(agent, left)?;
    let right = to_numeric(agent, right)?;
    match (left, right) {
        (Numeric::Number(l), Numeric::Number(r)) => {
            let l = f64_to_int32(l);
            let shift = f64_to_uint32(r) % 32;
            Ok(Value::from(int_op(l, shift)))
        }
        (Numeric::BigInt(l), Numeric::BigInt(r)) => {
            HeapBigInt::binary_op(agent, bigint_op, l, r)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot mix BigInt and other types, use explicit conversions",
        )),
    }
}

/// ### [13.13 Binary Logical Operators](https://tc39.es/ecma262/#sec-binary-logical-operators)
fn evaluate_logical(agent: &mut Agent, expression: &ast::LogicalExpression) -> JsResult<Value> {
    let left = evaluate_expression(agent, &expression.left)?;
    match expression.operator {
        LogicalOperator::And => {
            if !to_boolean(agent, left) {
                Ok(left)
            } else {
                evaluate_expression(agent, &expression.right)
            }
        }
        LogicalOperator::Or => {
            if to_boolean(agent, left) {
                Ok(left)
            } else {
                evaluate_expression(agent, &expression.right)
            }
        }
        LogicalOperator::Coalesce => {
            if !left.is_nullish() {
                Ok(left)
            } else {
                evaluate_expression(agent, &expression.right)
            }
        }
    }
}

/// ### [13.15 Assignment Operators](https://tc39.es/ecma262/#sec-assignment-operators)
fn evaluate_assignment(
    agent: &mut Agent,
    expression: &ast::AssignmentExpression,
) -> JsResult<Value> {
    match expression.operator {
        AssignmentOperator::Assign => match &expression.left {
            ast::AssignmentTarget::AssignmentTargetIdentifier(identifier) => {
                let name = HeapString::from_str(agent, identifier.name.as_str());
                let value = evaluate_with_name(agent, &expression.right, Some(name))?;
                let reference = resolve_identifier(agent, identifier.name.as_str())?;
                put_value(agent, &reference, value)?;
                Ok(value)
            }
            ast::AssignmentTarget::StaticMemberExpression(member) => {
                let reference = evaluate_static_member_reference(agent, member)?;
                let value = evaluate_expression(agent, &expression.right)?;
                put_value(agent, &reference, value)?;
                Ok(value)
            }
            ast::AssignmentTarget::ComputedMemberExpression(member) => {
                let reference = evaluate_computed_member_reference(agent, member)?;
                let value = evaluate_expression(agent, &expression.right)?;
                put_value(agent, &reference, value)?;
                Ok(value)
            }
            ast::AssignmentTarget::ArrayAssignmentTarget(pattern) => {
                let value = evaluate_expression(agent, &expression.right)?;
                destructuring::destructuring_assignment_array(agent, pattern, value)?;
                Ok(value)
            }
            ast::AssignmentTarget::ObjectAssignmentTarget(pattern) => {
                let value = evaluate_expression(agent, &expression.right)?;
                destructuring::destructuring_assignment_object(agent, pattern, value)?;
                Ok(value)
            }
            _ => Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                "Invalid assignment target",
            )),
        },
        // Logical assignment short-circuits before evaluating the right
        // side.
        AssignmentOperator::LogicalAnd
        | AssignmentOperator::LogicalOr
        | AssignmentOperator::LogicalNullish => {
            let reference = assignment_target_reference(agent, &expression.left)?;
            let left = get_value(agent, &reference)?;
            let should_assign = match expression.operator {
                AssignmentOperator::LogicalAnd => to_boolean(agent, left),
                AssignmentOperator::LogicalOr => !to_boolean(agent, left),
                _ => left.is_nullish(),
            };
            if !should_assign {
                return Ok(left);
            }
            let value = evaluate_expression(agent, &expression.right)?;
            put_value(agent, &reference, value)?;
            Ok(value)
        }
        operator => {
            // Compound assignment: read, apply, write.
            let reference = assignment_target_reference(agent, &expression.left)?;
            let left = get_value(agent, &reference)?;
            let right = evaluate_expression(agent, &expression.right)?;
            let binary_operator = match operator {
                AssignmentOperator::Addition => BinaryOperator::Addition,
                AssignmentOperator::Subtraction => BinaryOperator::Subtraction,
                AssignmentOperator::Multiplication => BinaryOperator::Multiplication,
                AssignmentOperator::Division => BinaryOperator::Division,
                AssignmentOperator::Remainder => BinaryOperator::Remainder,
                AssignmentOperator::Exponential => BinaryOperator::Exponential,
                AssignmentOperator::ShiftLeft => BinaryOperator::ShiftLeft,
                AssignmentOperator::ShiftRight => BinaryOperator::ShiftRight,
                AssignmentOperator::ShiftRightZeroFill => BinaryOperator::ShiftRightZeroFill,
                AssignmentOperator::BitwiseOR => BinaryOperator::BitwiseOR,
                AssignmentOperator::BitwiseXOR => BinaryOperator::BitwiseXOR,
                AssignmentOperator::BitwiseAnd => BinaryOperator::BitwiseAnd,
                _ => unreachable!(),
            };
            let value = apply_binary_operator(agent, binary_operator, left, right)?;
            put_value(agent, &reference, value)?;
            Ok(value)
        }
    }
}

/// The compound and logical assignment operators only admit simple
/// targets.
fn assignment_target_reference(
    agent: &mut Agent,
    target: &ast::AssignmentTarget,
) -> JsResult<Reference> {
    match target {
        ast::AssignmentTarget::AssignmentTargetIdentifier(identifier) => {
            resolve_identifier(agent, identifier.name.as_str())
        }
        ast::AssignmentTarget::StaticMemberExpression(member) => {
            evaluate_static_member_reference(agent, member)
        }
        ast::AssignmentTarget::ComputedMemberExpression(member) => {
            evaluate_computed_member_reference(agent, member)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Invalid assignment target",
        )),
    }
}

/// ### [13.3.2 Property Accessors](https://tc39.es/ecma262/#sec-property-accessors)
pub(crate) fn evaluate_static_member_reference(
    agent: &mut Agent,
    member: &ast::StaticMemberExpression,
) -> JsResult<Reference> {
    // super.name consults the home object's prototype.
    if matches!(member.object, Expression::Super(_)) {
        let key = PropertyKey::from_str(agent, member.property.name.as_str());
        return make_super_reference(agent, key);
    }
    let base = evaluate_expression(agent, &member.object)?;
    if member.optional && base.is_nullish() {
        return Ok(optional_void_reference(agent));
    }
    crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible(
        agent, base,
    )?;
    let strict = agent.is_strict_code();
    Ok(Reference {
        base: Base::Value(base),
        referenced_name: PropertyKey::from_str(agent, member.property.name.as_str()),
        strict,
        this_value: None,
    })
}

pub(crate) fn evaluate_computed_member_reference(
    agent: &mut Agent,
    member: &ast::ComputedMemberExpression,
) -> JsResult<Reference> {
    if matches!(member.object, Expression::Super(_)) {
        let key = evaluate_expression(agent, &member.expression)?;
        let key = to_property_key(agent, key)?;
        return make_super_reference(agent, key);
    }
    let base = evaluate_expression(agent, &member.object)?;
    if member.optional && base.is_nullish() {
        return Ok(optional_void_reference(agent));
    }
    crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible(
        agent, base,
    )?;
    let key = evaluate_expression(agent, &member.expression)?;
    let key = to_property_key(agent, key)?;
    let strict = agent.is_strict_code();
    Ok(Reference {
        base: Base::Value(base),
        referenced_name: key,
        strict,
        this_value: None,
    })
}

fn optional_void_reference(agent: &mut Agent) -> Reference {
    Reference {
        base: Base::Value(Value::Undefined),
        referenced_name: PropertyKey::from_static_str(agent, ""),
        strict: false,
        this_value: None,
    }
}

/// ### [13.3.7.3 MakeSuperPropertyReference ( actualThis, propertyKey, strict )](https://tc39.es/ecma262/#sec-makesuperpropertyreference)
fn make_super_reference(agent: &mut Agent, key: PropertyKey) -> JsResult<Reference> {
    let env = get_this_environment(agent);
    let EnvironmentIndex::Function(env) = env else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "'super' keyword unexpected here",
        ));
    };
    let actual_this = env.get_this_binding(agent)?;
    let base = env.get_super_base(agent)?;
    let strict = agent.is_strict_code();
    Ok(Reference {
        base: Base::Value(base),
        referenced_name: key,
        strict,
        this_value: Some(actual_this),
    })
}

/// ### [13.3.6 Function Calls](https://tc39.es/ecma262/#sec-function-calls)
fn evaluate_call_expression(
    agent: &mut Agent,
    expression: &ast::CallExpression,
) -> JsResult<Value> {
    // SuperCall: evaluate the parent constructor with the current
    // arguments and bind this.
    if matches!(expression.callee, Expression::Super(_)) {
        return evaluate_super_call(agent, expression);
    }
    // Evaluate the callee as a reference to keep the this value.
    let (func, reference) = match &expression.callee {
        Expression::StaticMemberExpression(member) => {
            let reference = evaluate_static_member_reference(agent, member)?;
            if member.optional && matches!(reference.base, Base::Value(Value::Undefined)) {
                return Ok(Value::Undefined);
            }
            (get_value(agent, &reference)?, Some(reference))
        }
        Expression::ComputedMemberExpression(member) => {
            let reference = evaluate_computed_member_reference(agent, member)?;
            (get_value(agent, &reference)?, Some(reference))
        }
        Expression::Identifier(identifier) => {
            let reference = resolve_identifier(agent, identifier.name.as_str())?;
            (get_value(agent, &reference)?, Some(reference))
        }
        callee => (evaluate_expression(agent, callee)?, None),
    };
    if expression.optional && func.is_nullish() {
        return Ok(Value::Undefined);
    }
    let arguments = evaluate_arguments(agent, &expression.arguments)?;
    // A direct eval call runs in the caller's environment.
    if let Some(reference) = &reference {
        if is_direct_eval(agent, reference, func) {
            return crate::ecmascript::builtins::global_object::perform_direct_eval(
                agent, &arguments,
            );
        }
    }
    match reference {
        Some(reference) => call_reference(agent, &reference, func, &arguments),
        None => call_function(agent, func, Value::Undefined, &arguments),
    }
}

fn is_direct_eval(agent: &Agent, reference: &Reference, func: Value) -> bool {
    let eval_fn = agent.current_realm().intrinsics().eval();
    if func != Value::Object(Object::BuiltinFunction(eval_fn)) {
        return false;
    }
    matches!(reference.base, Base::Environment(_))
}

/// ### [13.3.7.1 SuperCall Evaluation](https://tc39.es/ecma262/#sec-super-keyword-runtime-semantics-evaluation)
fn evaluate_super_call(agent: &mut Agent, expression: &ast::CallExpression) -> JsResult<Value> {
    // 1-3. Resolve the active function and its prototype.
    let env = get_this_environment(agent);
    let EnvironmentIndex::Function(env) = env else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "'super' keyword unexpected here",
        ));
    };
    let active_function = env.get_function_object(agent);
    let new_target = env.get_new_target(agent);
    let super_constructor = active_function
        .into_object()
        .internal_get_prototype_of(agent)?;
    let Some(super_constructor) = super_constructor else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    };
    if !super_constructor.is_constructor(agent) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    }
    let arguments = evaluate_arguments(agent, &expression.arguments)?;
    let new_target = new_target.unwrap_or_else(|| active_function.into_object());
    let result = construct(agent, super_constructor, &arguments, Some(new_target))?;
    // 6-10. Bind this and run the field initializers.
    env.bind_this_value(agent, result.into())?;
    if let Function::ECMAScriptFunction(constructor) = active_function {
        crate::ecmascript::builtins::ecmascript_function::initialize_instance_elements(
            agent,
            result,
            constructor,
        )?;
    }
    Ok(result.into())
}

pub(crate) fn evaluate_arguments(
    agent: &mut Agent,
    arguments: &[ast::Argument],
) -> JsResult<Vec<Value>> {
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match argument {
            ast::Argument::SpreadElement(spread) => {
                let spread_value = evaluate_expression(agent, &spread.argument)?;
                let iterator = get_iterator(agent, spread_value)?;
                while let Some(result) = iterator_step(agent, &iterator)? {
                    values.push(iterator_value(agent, result)?);
                }
            }
            argument => {
                let expression = argument
                    .as_expression()
                    .expect("non-spread argument is an expression");
                values.push(evaluate_expression(agent, expression)?);
            }
        }
    }
    Ok(values)
}

/// ### [13.3.5 The new Operator](https://tc39.es/ecma262/#sec-new-operator)
fn evaluate_new_expression(
    agent: &mut Agent,
    expression: &ast::NewExpression,
) -> JsResult<Value> {
    let constructor = evaluate_expression(agent, &expression.callee)?;
    let arguments = evaluate_arguments(agent, &expression.arguments)?;
    let Some(constructor) = is_constructor(agent, constructor) else {
        let repr = constructor.string_repr(agent);
        let repr = repr.to_string_lossy(agent).into_owned();
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("{repr} is not a constructor"),
        ));
    };
    let result = construct(agent, constructor, &arguments, None)?;
    Ok(result.into())
}

/// ### [13.3.9 Optional Chains](https://tc39.es/ecma262/#sec-optional-chains)
fn evaluate_chain_element(
    agent: &mut Agent,
    element: &ast::ChainElement,
) -> JsResult<Value> {
    match element {
        ast::ChainElement::CallExpression(call) => {
            // Short-circuit on a nullish callee or base.
            let result = evaluate_call_expression(agent, call);
            result
        }
        ast::ChainElement::StaticMemberExpression(member) => {
            let base = evaluate_expression(agent, &member.object)?;
            if base.is_nullish() {
                return Ok(Value::Undefined);
            }
            let key = PropertyKey::from_str(agent, member.property.name.as_str());
            let base_object = to_object(agent, base)?;
            base_object.internal_get(agent, key, base)
        }
        ast::ChainElement::ComputedMemberExpression(member) => {
            let base = evaluate_expression(agent, &member.object)?;
            if base.is_nullish() {
                return Ok(Value::Undefined);
            }
            let key = evaluate_expression(agent, &member.expression)?;
            let key = to_property_key(agent, key)?;
            let base_object = to_object(agent, base)?;
            base_object.internal_get(agent, key, base)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Unsupported optional chain element",
        )),
    }
}

/// ### Await, in the cooperative inline model: resolve the operand to a
/// promise and drain the microtask queue until it settles.
fn evaluate_await(agent: &mut Agent, expression: &ast::AwaitExpression) -> JsResult<Value> {
    let value = evaluate_expression(agent, &expression.argument)?;
    let promise =
        crate::ecmascript::builtins::promise_objects::promise_abstract_operations::promise_resolve(
            agent, value,
        )?;
    use crate::ecmascript::builtins::promise::PromiseState;
    loop {
        match promise.state(agent) {
            PromiseState::Fulfilled => {
                return Ok(promise.result(agent).unwrap());
            }
            PromiseState::Rejected => {
                agent[promise].is_handled = true;
                return Err(JsError::Thrown(promise.result(agent).unwrap()));
            }
            PromiseState::Pending => {
                // Run one queued microtask; a drained queue with a still
                // pending promise can never settle within this turn.
                let Some(job) = agent.microtask_queue.pop_front() else {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "Awaited promise cannot settle within this turn",
                    ));
                };
                job.run(agent)?;
            }
        }
    }
}

/// ### [15.5.5 Yield Evaluation](https://tc39.es/ecma262/#sec-generator-function-definitions-runtime-semantics-evaluation)
fn evaluate_yield(agent: &mut Agent, expression: &ast::YieldExpression) -> JsResult<Value> {
    if expression.delegate {
        return evaluate_yield_star(agent, expression);
    }
    // Evaluate the operand before consulting the replay cache so that the
    // ordinal bookkeeping below stays aligned with evaluation order.
    let value = match &expression.argument {
        Some(argument) => evaluate_expression(agent, argument)?,
        None => Value::Undefined,
    };
    let Some(frame) = agent.active_generator_frame() else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "yield outside of a generator body",
        ));
    };
    let ordinal = frame.yield_ordinal;
    frame.yield_ordinal += 1;
    // A yield already passed in this statement's re-evaluation replays
    // its delivered value.
    if (ordinal as usize) < frame.cached_yields.len() {
        return Ok(frame.cached_yields[ordinal as usize]);
    }
    // The active suspension site: consume the pending resume.
    if let Some(pending) = frame.pending.take() {
        use crate::engine::coroutine::ResumeKind;
        match pending {
            ResumeKind::Next(sent) => {
                frame.cached_yields.push(sent);
                return Ok(sent);
            }
            ResumeKind::Throw(thrown) => return Err(JsError::Thrown(thrown)),
            ResumeKind::Return(value) => return Err(JsError::GeneratorReturn(value)),
        }
    }
    // Fresh yield: suspend with the operand value.
    Err(JsError::Suspend(value))
}

/// ### [27.5.3.7 Yield* delegation](https://tc39.es/ecma262/#sec-generatoryield)
fn evaluate_yield_star(
    agent: &mut Agent,
    expression: &ast::YieldExpression,
) -> JsResult<Value> {
    use crate::engine::coroutine::ResumeKind;
    let Some(frame) = agent.active_generator_frame() else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "yield outside of a generator body",
        ));
    };
    let ordinal = frame.yield_star_ordinal;
    frame.yield_star_ordinal += 1;
    let cached_iterator = frame.yield_star_iterators.get(&ordinal).copied();
    let pending = frame.pending.take();

    let iterator = match cached_iterator {
        Some(iterator) => iterator,
        None => {
            let argument = expression
                .argument
                .as_ref()
                .expect("yield* requires an operand");
            let iterable = evaluate_expression(agent, argument)?;
            let iterator = get_iterator(agent, iterable)?;
            if let Some(frame) = agent.active_generator_frame() {
                frame.yield_star_iterators.insert(ordinal, iterator);
            }
            iterator
        }
    };

    // Drive the inner iterator; each yielded value suspends this
    // generator, and the pending resume feeds the next send.
    let mut send: Option<ResumeKind> = pending;
    loop {
        let step = match send.take() {
            None | Some(ResumeKind::Next(_)) => {
                let sent_value = match send {
                    Some(ResumeKind::Next(value)) => Some(value),
                    _ => None,
                };
                crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterator_next(
                    agent,
                    &iterator,
                    sent_value,
                )?
            }
            Some(ResumeKind::Throw(thrown)) => {
                // Forward to the inner throw method if present.
                let throw_key = PropertyKey::from_static_str(agent, "throw");
                let throw_method = crate::ecmascript::abstract_operations::operations_on_objects::get_method(
                    agent,
                    iterator.iterator.into(),
                    throw_key,
                )?;
                match throw_method {
                    Some(throw_method) => {
                        let result = call_function(
                            agent,
                            throw_method.into(),
                            iterator.iterator.into(),
                            &[thrown],
                        )?;
                        let Value::Object(result) = result else {
                            return Err(agent.throw_exception(
                                ExceptionType::TypeError,
                                "The iterator.throw() method did not return an object",
                            ));
                        };
                        result
                    }
                    None => {
                        crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterator_close_normal(agent, &iterator)?;
                        return Err(agent.throw_exception(
                            ExceptionType::TypeError,
                            "The iterator does not provide a 'throw' method",
                        ));
                    }
                }
            }
            Some(ResumeKind::Return(value)) => {
                // Forward return to the inner iterator, then finish.
                let return_key = PropertyKey::from_static_str(agent, "return");
                let return_method = crate::ecmascript::abstract_operations::operations_on_objects::get_method(
                    agent,
                    iterator.iterator.into(),
                    return_key,
                )?;
                match return_method {
                    None => return Err(JsError::GeneratorReturn(value)),
                    Some(return_method) => {
                        let result = call_function(
                            agent,
                            return_method.into(),
                            iterator.iterator.into(),
                            &[value],
                        )?;
                        let Value::Object(result) = result else {
                            return Err(agent.throw_exception(
                                ExceptionType::TypeError,
                                "The iterator.return() method did not return an object",
                            ));
                        };
                        let done = crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterator_complete(agent, result)?;
                        if done {
                            let value = iterator_value(agent, result)?;
                            return Err(JsError::GeneratorReturn(value));
                        }
                        result
                    }
                }
            }
        };
        let done =
            crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterator_complete(
                agent, step,
            )?;
        if done {
            // Delegation finished: clean the cache entry and produce the
            // final value.
            if let Some(frame) = agent.active_generator_frame() {
                frame.yield_star_iterators.remove(&ordinal);
            }
            return iterator_value(agent, step);
        }
        let yielded = iterator_value(agent, step)?;
        // Suspend this generator with the inner iterator's value; the
        // resume feeds back through the pending slot on replay.
        let Some(frame) = agent.active_generator_frame() else {
            unreachable!();
        };
        if let Some(pending) = frame.pending.take() {
            send = Some(pending);
            continue;
        }
        return Err(JsError::Suspend(yielded));
    }
}

/// ### Dynamic import, resolved synchronously through the module loader;
/// the promise it returns is already settled.
fn evaluate_import_call(
    agent: &mut Agent,
    expression: &ast::ImportExpression,
) -> JsResult<Value> {
    use crate::ecmascript::builtins::promise::Promise;
    use crate::ecmascript::builtins::promise_objects::promise_abstract_operations::{
        reject_promise, resolve_promise,
    };
    let specifier = evaluate_expression(agent, &expression.source)?;
    let specifier = to_string(agent, specifier)?;
    let promise = Promise::new_pending(agent);
    agent[promise].already_resolved = true;
    let namespace = crate::ecmascript::scripts_and_modules::module::load_module(
        agent, None, specifier,
    )
    .and_then(|module| {
        crate::ecmascript::scripts_and_modules::module::link_module(agent, module)?;
        crate::ecmascript::scripts_and_modules::module::evaluate_module(agent, module)?;
        Ok(crate::ecmascript::scripts_and_modules::module::get_module_namespace(agent, module))
    });
    match namespace {
        Ok(namespace) => {
            resolve_promise(agent, promise, namespace.into())?;
        }
        Err(JsError::Thrown(reason)) => {
            reject_promise(agent, promise, reason);
        }
        Err(fatal) => return Err(fatal),
    }
    Ok(promise.into())
}
