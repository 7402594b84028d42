// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.2 Promise Jobs](https://tc39.es/ecma262/#sec-promise-jobs)
//!
//! Microtasks queued on the agent. Jobs run in FIFO order when the host
//! drains the queue between turns.

use crate::ecmascript::builtins::promise::{Promise, PromiseReaction};
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{Function, InternalMethods, Object, Value};

use super::promise_abstract_operations::{
    call_reaction_handler, create_resolving_functions, settle_from_handler_result,
};

#[derive(Debug)]
pub enum Job {
    /// ### [27.2.2.1 NewPromiseReactionJob ( reaction, argument )](https://tc39.es/ecma262/#sec-newpromisereactionjob)
    PromiseReaction {
        reaction: PromiseReaction,
        argument: Value,
    },
    /// ### [27.2.2.2 NewPromiseResolveThenableJob ( promiseToResolve, thenable, then )](https://tc39.es/ecma262/#sec-newpromiseresolvethenablejob)
    PromiseResolveThenable {
        promise_to_resolve: Promise,
        thenable: Object,
        then: Function,
    },
}

impl Job {
    pub(crate) fn run(self, agent: &mut Agent) -> JsResult<()> {
        match self {
            Job::PromiseReaction { reaction, argument } => {
                // 1.a-e. Run the handler (or the identity/thrower default)
                //    and settle the derived promise with the outcome.
                let result = call_reaction_handler(
                    agent,
                    reaction.handler,
                    reaction.reaction_type,
                    argument,
                );
                settle_from_handler_result(agent, reaction.capability, result)
            }
            Job::PromiseResolveThenable {
                promise_to_resolve,
                thenable,
                then,
            } => {
                // 1.a. Let resolvingFunctions be
                //    CreateResolvingFunctions(promiseToResolve).
                agent[promise_to_resolve].already_resolved = false;
                let (resolve, reject) = create_resolving_functions(agent, promise_to_resolve);
                // 1.b. Let thenCallResult be
                //    Call(then, thenable, « resolve, reject »).
                let then_call_result = then.internal_call(
                    agent,
                    thenable.into(),
                    &[resolve.into(), reject.into()],
                );
                // 1.c. On abrupt completion, call reject with the error.
                match then_call_result {
                    Ok(_) => Ok(()),
                    Err(JsError::Thrown(reason)) => {
                        Object::BuiltinFunction(reject)
                            .internal_call(agent, Value::Undefined, &[reason])?;
                        Ok(())
                    }
                    Err(fatal) => Err(fatal),
                }
            }
        }
    }
}
