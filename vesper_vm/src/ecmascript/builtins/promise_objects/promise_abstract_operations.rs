// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.1 Promise Abstract Operations](https://tc39.es/ecma262/#sec-promise-abstract-operations)

use crate::ecmascript::abstract_operations::operations_on_objects::get_method;
use crate::ecmascript::abstract_operations::testing_and_comparison::callable_function;
use crate::ecmascript::builtins::builtin_function::{
    create_stateful_builtin_function, ArgumentsList, BuiltinFunction,
};
use crate::ecmascript::builtins::promise::{
    Promise, PromiseReaction, PromiseReactionType, PromiseStateSlot,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{Function, Object, PropertyKey, Value};

use super::promise_jobs::Job;

/// ### [27.2.1.3 CreateResolvingFunctions ( promise )](https://tc39.es/ecma262/#sec-createresolvingfunctions)
///
/// The resolving pair is represented by two stateful builtins that capture
/// the promise; the shared `[[AlreadyResolved]]` record lives on the
/// promise itself.
pub(crate) fn create_resolving_functions(
    agent: &mut Agent,
    promise: Promise,
) -> (BuiltinFunction, BuiltinFunction) {
    let captures: Box<[Value]> = Box::new([promise.into()]);
    let resolve = create_stateful_builtin_function(
        agent,
        promise_resolve_function,
        1,
        "resolve",
        captures.clone(),
    );
    let reject =
        create_stateful_builtin_function(agent, promise_reject_function, 1, "reject", captures);
    (resolve, reject)
}

/// ### [27.2.1.3.2 Promise Resolve Functions](https://tc39.es/ecma262/#sec-promise-resolve-functions)
fn promise_resolve_function(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Promise(promise)) = function.capture(agent, 0) else {
        unreachable!()
    };
    // 3-4. If promise.[[AlreadyResolved]] is true, return undefined.
    if agent[promise].already_resolved {
        return Ok(Value::Undefined);
    }
    agent[promise].already_resolved = true;
    resolve_promise(agent, promise, arguments.get(0))?;
    Ok(Value::Undefined)
}

/// ### [27.2.1.3.1 Promise Reject Functions](https://tc39.es/ecma262/#sec-promise-reject-functions)
fn promise_reject_function(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Promise(promise)) = function.capture(agent, 0) else {
        unreachable!()
    };
    if agent[promise].already_resolved {
        return Ok(Value::Undefined);
    }
    agent[promise].already_resolved = true;
    reject_promise(agent, promise, arguments.get(0));
    Ok(Value::Undefined)
}

/// The body of the resolve function: fulfill directly, reject on self
/// resolution, or chain a thenable through a microtask.
pub(crate) fn resolve_promise(
    agent: &mut Agent,
    promise: Promise,
    resolution: Value,
) -> JsResult<()> {
    // 6. If SameValue(resolution, promise) is true, reject with a
    //    TypeError.
    if resolution == Value::Object(Object::Promise(promise)) {
        let error = agent.throw_exception(
            ExceptionType::TypeError,
            "Chaining cycle detected for promise",
        );
        let JsError::Thrown(reason) = error else {
            unreachable!()
        };
        reject_promise(agent, promise, reason);
        return Ok(());
    }
    // 7. If resolution is not an Object, fulfill.
    let Value::Object(resolution_object) = resolution else {
        fulfill_promise(agent, promise, resolution);
        return Ok(());
    };
    // 8-9. Let then be Get(resolution, "then"); a throw rejects.
    let then_key = PropertyKey::from_static_str(agent, "then");
    let then = match get_method(agent, resolution, then_key) {
        Ok(then) => then,
        Err(JsError::Thrown(reason)) => {
            reject_promise(agent, promise, reason);
            return Ok(());
        }
        Err(fatal) => return Err(fatal),
    };
    // 11. If IsCallable(thenAction) is false, fulfill.
    let Some(then_action) = then.and_then(|t| Value::from(t).try_into().ok()) else {
        fulfill_promise(agent, promise, resolution);
        return Ok(());
    };
    // 12-15. Enqueue a PromiseResolveThenableJob.
    agent.enqueue_microtask(Job::PromiseResolveThenable {
        promise_to_resolve: promise,
        thenable: resolution_object,
        then: then_action,
    });
    Ok(())
}

/// ### [27.2.1.4 FulfillPromise ( promise, value )](https://tc39.es/ecma262/#sec-fulfillpromise)
pub(crate) fn fulfill_promise(agent: &mut Agent, promise: Promise, value: Value) {
    // 1. Assert: The value of promise.[[PromiseState]] is PENDING.
    // 2. Let reactions be promise.[[PromiseFulfillReactions]].
    let reactions = core::mem::take(&mut agent[promise].fulfill_reactions);
    agent[promise].reject_reactions.clear();
    // 3-6. Transition to fulfilled.
    agent[promise].state = PromiseStateSlot::Fulfilled(value);
    // 7. Perform TriggerPromiseReactions(reactions, value).
    trigger_promise_reactions(agent, reactions, value);
}

/// ### [27.2.1.7 RejectPromise ( promise, reason )](https://tc39.es/ecma262/#sec-rejectpromise)
pub(crate) fn reject_promise(agent: &mut Agent, promise: Promise, reason: Value) {
    let reactions = core::mem::take(&mut agent[promise].reject_reactions);
    agent[promise].fulfill_reactions.clear();
    agent[promise].state = PromiseStateSlot::Rejected(reason);
    trigger_promise_reactions(agent, reactions, reason);
}

/// ### [27.2.1.8 TriggerPromiseReactions ( reactions, argument )](https://tc39.es/ecma262/#sec-triggerpromisereactions)
pub(crate) fn trigger_promise_reactions(
    agent: &mut Agent,
    reactions: Vec<PromiseReaction>,
    argument: Value,
) {
    // 1. For each element reaction of reactions, enqueue a
    //    PromiseReactionJob in order.
    for reaction in reactions {
        agent.enqueue_microtask(Job::PromiseReaction { reaction, argument });
    }
}

/// ### [27.2.4.7.1 PromiseResolve ( C, x )](https://tc39.es/ecma262/#sec-promise-resolve)
///
/// The capability always derives from the intrinsic %Promise%.
pub(crate) fn promise_resolve(agent: &mut Agent, x: Value) -> JsResult<Promise> {
    // 1. If IsPromise(x) is true, return x.
    if let Value::Object(Object::Promise(promise)) = x {
        return Ok(promise);
    }
    // 2-3. Create a new promise and resolve it with x.
    let promise = Promise::new_pending(agent);
    agent[promise].already_resolved = true;
    resolve_promise(agent, promise, x)?;
    Ok(promise)
}

/// ### [27.2.5.4.1 PerformPromiseThen ( promise, onFulfilled, onRejected \[ , resultCapability \] )](https://tc39.es/ecma262/#sec-performpromisethen)
pub(crate) fn perform_promise_then(
    agent: &mut Agent,
    promise: Promise,
    on_fulfilled: Value,
    on_rejected: Value,
    result_capability: Option<Promise>,
) -> Option<Promise> {
    // 3-4. Non-callable handlers become empty.
    let on_fulfilled_job = callable_function(agent, on_fulfilled);
    let on_rejected_job = callable_function(agent, on_rejected);
    // 5-6. Build the two reaction records.
    let fulfill_reaction = PromiseReaction {
        capability: result_capability,
        reaction_type: PromiseReactionType::Fulfill,
        handler: on_fulfilled_job,
    };
    let reject_reaction = PromiseReaction {
        capability: result_capability,
        reaction_type: PromiseReactionType::Reject,
        handler: on_rejected_job,
    };
    match agent[promise].state {
        // 9. If promise.[[PromiseState]] is PENDING, append the reactions.
        PromiseStateSlot::Pending => {
            agent[promise].fulfill_reactions.push(fulfill_reaction);
            agent[promise].reject_reactions.push(reject_reaction);
        }
        // 10. Else if fulfilled, enqueue the fulfill reaction.
        PromiseStateSlot::Fulfilled(value) => {
            agent.enqueue_microtask(Job::PromiseReaction {
                reaction: fulfill_reaction,
                argument: value,
            });
        }
        // 11. Else, enqueue the reject reaction.
        PromiseStateSlot::Rejected(reason) => {
            agent.enqueue_microtask(Job::PromiseReaction {
                reaction: reject_reaction,
                argument: reason,
            });
        }
    }
    // 12. Set promise.[[PromiseIsHandled]] to true.
    agent[promise].is_handled = true;
    result_capability
}

/// Settle `derived` from the outcome of calling `handler(argument)`; the
/// body of PromiseReactionJob.
pub(crate) fn settle_from_handler_result(
    agent: &mut Agent,
    capability: Option<Promise>,
    result: JsResult<Value>,
) -> JsResult<()> {
    let Some(derived) = capability else {
        // Reactions without a capability (await, finally bookkeeping)
        // surface fatal errors only.
        return match result {
            Err(JsError::Fatal(fatal)) => Err(JsError::Fatal(fatal)),
            _ => Ok(()),
        };
    };
    match result {
        Ok(value) => {
            agent[derived].already_resolved = true;
            resolve_promise(agent, derived, value)?;
        }
        Err(JsError::Thrown(reason)) => {
            agent[derived].already_resolved = true;
            reject_promise(agent, derived, reason);
        }
        Err(fatal) => return Err(fatal),
    }
    Ok(())
}

/// Reaction handlers may also be native continuations; this is the
/// JavaScript-function path shared by then/catch/finally.
pub(crate) fn call_reaction_handler(
    agent: &mut Agent,
    handler: Option<Function>,
    reaction_type: PromiseReactionType,
    argument: Value,
) -> JsResult<Value> {
    match handler {
        // Identity and thrower fallbacks for absent handlers.
        None => match reaction_type {
            PromiseReactionType::Fulfill => Ok(argument),
            PromiseReactionType::Reject => Err(JsError::Thrown(argument)),
        },
        Some(handler) => handler.internal_call(agent, Value::Undefined, &[argument]),
    }
}
