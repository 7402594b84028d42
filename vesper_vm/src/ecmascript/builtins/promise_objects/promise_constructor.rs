// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.4 Properties of the Promise Constructor](https://tc39.es/ecma262/#sec-properties-of-the-promise-constructor)

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{
    create_stateful_builtin_function, ArgumentsList, Behaviour, Builtin, BuiltinFunction,
};
use crate::ecmascript::builtins::promise::{Promise, PromiseReaction, PromiseReactionType};
use crate::ecmascript::builtins::promise_objects::promise_abstract_operations::{
    create_resolving_functions, perform_promise_then, promise_resolve, reject_promise,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{InternalMethods, Object, PropertyKey, Value};

pub(crate) struct PromiseConstructor;

impl Builtin for PromiseConstructor {
    const NAME: &'static str = "Promise";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(PromiseConstructor::construct);
}

struct PromiseResolveBuiltin;
impl Builtin for PromiseResolveBuiltin {
    const NAME: &'static str = "resolve";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::resolve);
}

struct PromiseRejectBuiltin;
impl Builtin for PromiseRejectBuiltin {
    const NAME: &'static str = "reject";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::reject);
}

struct PromiseAllBuiltin;
impl Builtin for PromiseAllBuiltin {
    const NAME: &'static str = "all";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::all);
}

struct PromiseAllSettledBuiltin;
impl Builtin for PromiseAllSettledBuiltin {
    const NAME: &'static str = "allSettled";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::all_settled);
}

struct PromiseRaceBuiltin;
impl Builtin for PromiseRaceBuiltin {
    const NAME: &'static str = "race";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromiseConstructor::race);
}

impl PromiseConstructor {
    /// ### [27.2.3.1 Promise ( executor )](https://tc39.es/ecma262/#sec-promise-executor)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Promise constructor requires 'new'",
            ));
        }
        // 2. If IsCallable(executor) is false, throw a TypeError exception.
        let executor = arguments.get(0);
        if crate::ecmascript::abstract_operations::testing_and_comparison::is_callable(
            agent, executor,
        )
        .is_none()
        {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Promise resolver is not a function",
            ));
        }
        // 3-7. Create the promise and its resolving functions.
        let promise = Promise::new_pending(agent);
        let (resolve, reject) = create_resolving_functions(agent, promise);
        // 8-10. Call executor(resolve, reject); an abrupt completion
        //    rejects the promise.
        let completion = call_function(
            agent,
            executor,
            Value::Undefined,
            &[resolve.into(), reject.into()],
        );
        match completion {
            Ok(_) => {}
            Err(JsError::Thrown(reason)) => {
                Object::BuiltinFunction(reject).internal_call(
                    agent,
                    Value::Undefined,
                    &[reason],
                )?;
            }
            Err(fatal) => return Err(fatal),
        }
        // 11. Return promise.
        Ok(promise.into())
    }

    /// ### [27.2.4.7 Promise.resolve ( x )](https://tc39.es/ecma262/#sec-promise.resolve)
    fn resolve(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let promise = promise_resolve(agent, arguments.get(0))?;
        Ok(promise.into())
    }

    /// ### [27.2.4.6 Promise.reject ( r )](https://tc39.es/ecma262/#sec-promise.reject)
    fn reject(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let promise = Promise::new_pending(agent);
        agent[promise].already_resolved = true;
        reject_promise(agent, promise, arguments.get(0));
        Ok(promise.into())
    }

    /// ### [27.2.4.1 Promise.all ( iterable )](https://tc39.es/ecma262/#sec-promise.all)
    fn all(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let values = iterable_to_list(agent, arguments.get(0))?;
        let result_promise = Promise::new_pending(agent);
        if values.is_empty() {
            agent[result_promise].already_resolved = true;
            let empty_value = {
                let empty = create_array_from_list(agent, &[]);
                empty.into()
            };
            crate::ecmascript::builtins::promise_objects::promise_abstract_operations::fulfill_promise(
                agent,
                result_promise,
                empty_value,
            );
            return Ok(result_promise.into());
        }
        // The collector shares state through a results array plus a
        // remaining-count cell captured by each element handler.
        let results = create_array_from_list(
            agent,
            &vec![Value::Undefined; values.len()],
        );
        let remaining_cell = create_array_from_list(agent, &[Value::from(values.len())]);
        for (index, value) in values.iter().enumerate() {
            let element_promise = promise_resolve(agent, *value)?;
            let on_fulfilled = create_stateful_builtin_function(
                agent,
                promise_all_element,
                1,
                "",
                Box::new([
                    results.into(),
                    remaining_cell.into(),
                    Value::from(index),
                    result_promise.into(),
                ]),
            );
            let on_rejected = create_stateful_builtin_function(
                agent,
                promise_all_reject,
                1,
                "",
                Box::new([result_promise.into()]),
            );
            perform_promise_then(
                agent,
                element_promise,
                on_fulfilled.into(),
                on_rejected.into(),
                None,
            );
        }
        Ok(result_promise.into())
    }

    /// ### [27.2.4.3 Promise.allSettled ( iterable )](https://tc39.es/ecma262/#sec-promise.allsettled)
    fn all_settled(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let values = iterable_to_list(agent, arguments.get(0))?;
        let result_promise = Promise::new_pending(agent);
        if values.is_empty() {
            agent[result_promise].already_resolved = true;
            let empty = create_array_from_list(agent, &[]);
            crate::ecmascript::builtins::promise_objects::promise_abstract_operations::fulfill_promise(
                agent,
                result_promise,
                empty.into(),
            );
            return Ok(result_promise.into());
        }
        let results = create_array_from_list(agent, &vec![Value::Undefined; values.len()]);
        let remaining_cell = create_array_from_list(agent, &[Value::from(values.len())]);
        for (index, value) in values.iter().enumerate() {
            let element_promise = promise_resolve(agent, *value)?;
            let on_fulfilled = create_stateful_builtin_function(
                agent,
                promise_all_settled_element::<true>,
                1,
                "",
                Box::new([
                    results.into(),
                    remaining_cell.into(),
                    Value::from(index),
                    result_promise.into(),
                ]),
            );
            let on_rejected = create_stateful_builtin_function(
                agent,
                promise_all_settled_element::<false>,
                1,
                "",
                Box::new([
                    results.into(),
                    remaining_cell.into(),
                    Value::from(index),
                    result_promise.into(),
                ]),
            );
            perform_promise_then(
                agent,
                element_promise,
                on_fulfilled.into(),
                on_rejected.into(),
                None,
            );
        }
        Ok(result_promise.into())
    }

    /// ### [27.2.4.5 Promise.race ( iterable )](https://tc39.es/ecma262/#sec-promise.race)
    fn race(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let values = iterable_to_list(agent, arguments.get(0))?;
        let result_promise = Promise::new_pending(agent);
        for value in values {
            let element_promise = promise_resolve(agent, value)?;
            // Each settlement races to settle the result promise; the
            // first one wins through [[AlreadyResolved]].
            let reaction_fulfill = PromiseReaction {
                capability: Some(result_promise),
                reaction_type: PromiseReactionType::Fulfill,
                handler: None,
            };
            let reaction_reject = PromiseReaction {
                capability: Some(result_promise),
                reaction_type: PromiseReactionType::Reject,
                handler: None,
            };
            match agent[element_promise].state {
                crate::ecmascript::builtins::promise::PromiseStateSlot::Pending => {
                    agent[element_promise].fulfill_reactions.push(reaction_fulfill);
                    agent[element_promise].reject_reactions.push(reaction_reject);
                    agent[element_promise].is_handled = true;
                }
                crate::ecmascript::builtins::promise::PromiseStateSlot::Fulfilled(value) => {
                    agent.enqueue_microtask(
                        crate::ecmascript::builtins::promise_objects::promise_jobs::Job::PromiseReaction {
                            reaction: reaction_fulfill,
                            argument: value,
                        },
                    );
                }
                crate::ecmascript::builtins::promise::PromiseStateSlot::Rejected(reason) => {
                    agent.enqueue_microtask(
                        crate::ecmascript::builtins::promise_objects::promise_jobs::Job::PromiseReaction {
                            reaction: reaction_reject,
                            argument: reason,
                        },
                    );
                }
            }
        }
        Ok(result_promise.into())
    }
}

/// Element handler of `Promise.all`.
fn promise_all_element(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Array(results)) = function.capture(agent, 0) else {
        unreachable!()
    };
    let Value::Object(Object::Array(remaining_cell)) = function.capture(agent, 1) else {
        unreachable!()
    };
    let Value::Integer(index) = function.capture(agent, 2) else {
        unreachable!()
    };
    let Value::Object(Object::Promise(result_promise)) = function.capture(agent, 3) else {
        unreachable!()
    };
    agent[results].elements[index as usize] = Some(arguments.get(0));
    let Some(Value::Integer(remaining)) = agent[remaining_cell].elements[0] else {
        unreachable!()
    };
    let remaining = remaining - 1;
    agent[remaining_cell].elements[0] = Some(Value::Integer(remaining));
    if remaining == 0 {
        agent[result_promise].already_resolved = true;
        crate::ecmascript::builtins::promise_objects::promise_abstract_operations::fulfill_promise(
            agent,
            result_promise,
            results.into(),
        );
    }
    Ok(Value::Undefined)
}

/// Rejection handler of `Promise.all`: the first rejection wins.
fn promise_all_reject(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Promise(result_promise)) = function.capture(agent, 0) else {
        unreachable!()
    };
    if !agent[result_promise].already_resolved {
        agent[result_promise].already_resolved = true;
        reject_promise(agent, result_promise, arguments.get(0));
    }
    Ok(Value::Undefined)
}

/// Element handler of `Promise.allSettled`, parameterized on settlement
/// direction.
fn promise_all_settled_element<const FULFILLED: bool>(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Array(results)) = function.capture(agent, 0) else {
        unreachable!()
    };
    let Value::Object(Object::Array(remaining_cell)) = function.capture(agent, 1) else {
        unreachable!()
    };
    let Value::Integer(index) = function.capture(agent, 2) else {
        unreachable!()
    };
    let Value::Object(Object::Promise(result_promise)) = function.capture(agent, 3) else {
        unreachable!()
    };
    // Build the { status, value/reason } descriptor object.
    let object_prototype = agent.current_realm().intrinsics().object_prototype();
    let descriptor =
        crate::ecmascript::builtins::ordinary::ordinary_object_create(agent, Some(object_prototype.into()));
    let status_key = PropertyKey::from_static_str(agent, "status");
    let status = if FULFILLED {
        Value::from_static_str(agent, "fulfilled")
    } else {
        Value::from_static_str(agent, "rejected")
    };
    crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
        agent, descriptor, status_key, status,
    )?;
    let payload_key = if FULFILLED {
        PropertyKey::from_static_str(agent, "value")
    } else {
        PropertyKey::from_static_str(agent, "reason")
    };
    crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
        agent,
        descriptor,
        payload_key,
        arguments.get(0),
    )?;
    agent[results].elements[index as usize] = Some(descriptor.into());
    let Some(Value::Integer(remaining)) = agent[remaining_cell].elements[0] else {
        unreachable!()
    };
    let remaining = remaining - 1;
    agent[remaining_cell].elements[0] = Some(Value::Integer(remaining));
    if remaining == 0 {
        agent[result_promise].already_resolved = true;
        crate::ecmascript::builtins::promise_objects::promise_abstract_operations::fulfill_promise(
            agent,
            result_promise,
            results.into(),
        );
    }
    Ok(Value::Undefined)
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let promise_prototype = intrinsics.promise_prototype();
    let promise_constructor = intrinsics.promise();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, promise_constructor)
        .with_prototype_property(promise_prototype.into())
        .with_builtin_function_property::<PromiseResolveBuiltin>()
        .with_builtin_function_property::<PromiseRejectBuiltin>()
        .with_builtin_function_property::<PromiseAllBuiltin>()
        .with_builtin_function_property::<PromiseAllSettledBuiltin>()
        .with_builtin_function_property::<PromiseRaceBuiltin>()
        .build();

    super::promise_prototype::create_intrinsic(agent, realm);
}
