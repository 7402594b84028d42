// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.5 Properties of the Promise Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-promise-prototype-object)

use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{
    create_stateful_builtin_function, ArgumentsList, Behaviour, Builtin, BuiltinFunction,
};
use crate::ecmascript::builtins::promise::Promise;
use crate::ecmascript::builtins::promise_objects::promise_abstract_operations::perform_promise_then;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, Value};

pub(crate) struct PromisePrototype;

struct PromisePrototypeThen;
impl Builtin for PromisePrototypeThen {
    const NAME: &'static str = "then";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::then);
}

struct PromisePrototypeCatch;
impl Builtin for PromisePrototypeCatch {
    const NAME: &'static str = "catch";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::catch);
}

struct PromisePrototypeFinally;
impl Builtin for PromisePrototypeFinally {
    const NAME: &'static str = "finally";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(PromisePrototype::finally);
}

fn this_promise(agent: &mut Agent, this_value: Value) -> JsResult<Promise> {
    match this_value {
        Value::Object(Object::Promise(promise)) => Ok(promise),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a Promise",
        )),
    }
}

impl PromisePrototype {
    /// ### [27.2.5.4 Promise.prototype.then ( onFulfilled, onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.then)
    fn then(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let promise = this_promise(agent, this_value)?;
        // 3-4. Let resultCapability be a new derived promise.
        let result_capability = Promise::new_pending(agent);
        // 5. Return PerformPromiseThen(promise, onFulfilled, onRejected,
        //    resultCapability).
        perform_promise_then(
            agent,
            promise,
            arguments.get(0),
            arguments.get(1),
            Some(result_capability),
        );
        Ok(result_capability.into())
    }

    /// ### [27.2.5.1 Promise.prototype.catch ( onRejected )](https://tc39.es/ecma262/#sec-promise.prototype.catch)
    fn catch(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? Invoke(promise, "then", « undefined, onRejected »).
        let promise = this_promise(agent, this_value)?;
        let result_capability = Promise::new_pending(agent);
        perform_promise_then(
            agent,
            promise,
            Value::Undefined,
            arguments.get(0),
            Some(result_capability),
        );
        Ok(result_capability.into())
    }

    /// ### [27.2.5.3 Promise.prototype.finally ( onFinally )](https://tc39.es/ecma262/#sec-promise.prototype.finally)
    fn finally(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let promise = this_promise(agent, this_value)?;
        let on_finally = arguments.get(0);
        let result_capability = Promise::new_pending(agent);
        let is_callable = crate::ecmascript::abstract_operations::testing_and_comparison::is_callable(
            agent, on_finally,
        )
        .is_some();
        if !is_callable {
            // 5. If IsCallable(onFinally) is false, the handlers pass the
            //    settlement through untouched.
            perform_promise_then(
                agent,
                promise,
                Value::Undefined,
                Value::Undefined,
                Some(result_capability),
            );
            return Ok(result_capability.into());
        }
        // 6. Wrap onFinally so its return value is ignored but its throw
        //    replaces the settlement.
        let then_finally = create_stateful_builtin_function(
            agent,
            finally_passthrough::<true>,
            1,
            "",
            Box::new([on_finally]),
        );
        let catch_finally = create_stateful_builtin_function(
            agent,
            finally_passthrough::<false>,
            1,
            "",
            Box::new([on_finally]),
        );
        perform_promise_then(
            agent,
            promise,
            then_finally.into(),
            catch_finally.into(),
            Some(result_capability),
        );
        Ok(result_capability.into())
    }
}

/// The fulfilled/rejected wrappers of `finally`: call the callback, then
/// pass the original settlement through.
fn finally_passthrough<const FULFILLED: bool>(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let on_finally = function.capture(agent, 0);
    call_function(agent, on_finally, Value::Undefined, &[])?;
    if FULFILLED {
        Ok(arguments.get(0))
    } else {
        Err(crate::ecmascript::execution::JsError::Thrown(
            arguments.get(0),
        ))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let promise_prototype = intrinsics.promise_prototype();
    let promise_constructor = intrinsics.promise();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, promise_prototype)
        .with_constructor_property(promise_constructor)
        .with_builtin_function_property::<PromisePrototypeThen>()
        .with_builtin_function_property::<PromisePrototypeCatch>()
        .with_builtin_function_property::<PromisePrototypeFinally>()
        .with_to_string_tag("Promise")
        .build();
}
