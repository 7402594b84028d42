// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::builtins::ecmascript_function::ECMAScriptFunction;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Function, HeapString, Object, Value};

use super::declarative_environment::DeclarativeEnvironmentRecord;
use super::{EnvironmentIndex, FunctionEnvironmentIndex};

/// ### \[\[ThisBindingStatus]]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    /// The function is an ArrowFunction and does not have a local `this`
    /// value.
    Lexical,
    /// The function is a normal function and the `this` binding has not yet
    /// been initialized (a derived class constructor before `super()`).
    Uninitialized,
    /// The `this` binding has been initialized.
    Initialized,
}

/// #### [9.1.1.3 Function Environment Records](https://tc39.es/ecma262/#sec-function-environment-records)
///
/// A Function Environment Record is a Declarative Environment Record that is
/// used to represent the top-level scope of a function and, if the function
/// is not an ArrowFunction, provides a `this` binding.
#[derive(Debug, Clone)]
pub struct FunctionEnvironment {
    pub(crate) declarative: DeclarativeEnvironmentRecord,

    /// ### \[\[ThisValue]]
    pub(crate) this_value: Option<Value>,

    /// ### \[\[ThisBindingStatus]]
    pub(crate) this_binding_status: ThisBindingStatus,

    /// ### \[\[FunctionObject]]
    pub(crate) function_object: Function,

    /// ### \[\[NewTarget]]
    pub(crate) new_target: Option<Object>,
}

impl FunctionEnvironment {
    pub(crate) fn has_this_binding(&self) -> bool {
        // 1. If envRec.[[ThisBindingStatus]] is LEXICAL, return false;
        //    otherwise, return true.
        self.this_binding_status != ThisBindingStatus::Lexical
    }

    pub(crate) fn has_super_binding(&self, agent: &Agent) -> bool {
        // 1. If envRec.[[ThisBindingStatus]] is LEXICAL, return false.
        if self.this_binding_status == ThisBindingStatus::Lexical {
            return false;
        }
        // 2. If envRec.[[FunctionObject]].[[HomeObject]] is undefined,
        //    return false; otherwise, return true.
        match self.function_object {
            Function::ECMAScriptFunction(f) => agent[f].home_object.is_some(),
            _ => false,
        }
    }
}

impl FunctionEnvironmentIndex {
    /// ##### [9.1.1.3.1 BindThisValue ( V )](https://tc39.es/ecma262/#sec-bindthisvalue)
    pub(crate) fn bind_this_value(self, agent: &mut Agent, value: Value) -> JsResult<()> {
        let env = &mut agent[self];
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert!(env.this_binding_status != ThisBindingStatus::Lexical);
        // 2. If envRec.[[ThisBindingStatus]] is INITIALIZED, throw a
        //    ReferenceError exception.
        if env.this_binding_status == ThisBindingStatus::Initialized {
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                "Super constructor may only be called once",
            ));
        }
        // 3. Set envRec.[[ThisValue]] to V.
        env.this_value = Some(value);
        // 4. Set envRec.[[ThisBindingStatus]] to INITIALIZED.
        env.this_binding_status = ThisBindingStatus::Initialized;
        // 5. Return V.
        Ok(())
    }

    /// ##### [9.1.1.3.4 GetThisBinding ( )](https://tc39.es/ecma262/#sec-function-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(self, agent: &mut Agent) -> JsResult<Value> {
        let env = &agent[self];
        // 1. Assert: envRec.[[ThisBindingStatus]] is not LEXICAL.
        debug_assert!(env.this_binding_status != ThisBindingStatus::Lexical);
        // 2. If envRec.[[ThisBindingStatus]] is UNINITIALIZED, throw a
        //    ReferenceError exception.
        if env.this_binding_status == ThisBindingStatus::Uninitialized {
            return Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                "Must call super constructor before accessing 'this'",
            ));
        }
        // 3. Return envRec.[[ThisValue]].
        Ok(agent[self].this_value.unwrap())
    }

    /// ##### [9.1.1.3.5 GetSuperBase ( )](https://tc39.es/ecma262/#sec-getsuperbase)
    pub(crate) fn get_super_base(self, agent: &mut Agent) -> JsResult<Value> {
        // 1. Let home be envRec.[[FunctionObject]].[[HomeObject]].
        let home = match agent[self].function_object {
            Function::ECMAScriptFunction(f) => agent[f].home_object,
            _ => None,
        };
        // 2. If home is undefined, return undefined.
        let Some(home) = home else {
            return Ok(Value::Undefined);
        };
        // 3. Return ? home.[[GetPrototypeOf]]().
        use crate::ecmascript::types::InternalMethods;
        let proto = home.internal_get_prototype_of(agent)?;
        Ok(proto.map_or(Value::Null, Value::Object))
    }

    pub(crate) fn get_function_object(self, agent: &Agent) -> Function {
        agent[self].function_object
    }

    pub(crate) fn get_new_target(self, agent: &Agent) -> Option<Object> {
        agent[self].new_target
    }

    /// ##### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let outcome = agent[self]
            .declarative
            .set_mutable_binding_inner(name, value, is_strict);
        outcome.into_result(agent, name)
    }

    /// ##### [9.1.1.1.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        let binding = agent[self].declarative.get_binding(name).unwrap();
        match binding.value {
            Some(value) => Ok(value),
            None => Err(super::declarative_environment::throw_uninitialized(
                agent, name,
            )),
        }
    }
}

/// ### [9.1.2.4 NewFunctionEnvironment ( F, newTarget )](https://tc39.es/ecma262/#sec-newfunctionenvironment)
pub(crate) fn new_function_environment(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    new_target: Option<Object>,
) -> FunctionEnvironmentIndex {
    use crate::ecmascript::builtins::ecmascript_function::ThisMode;
    // 2. Let env be a new Function Environment Record containing no
    //    bindings.
    let this_mode = agent[function].this_mode;
    // 6. Set env.[[OuterEnv]] to F.[[Environment]].
    let outer_env = Some(agent[function].environment);
    let env = FunctionEnvironment {
        declarative: DeclarativeEnvironmentRecord::new(outer_env),
        this_value: None,
        // 4. If F.[[ThisMode]] is LEXICAL, set env.[[ThisBindingStatus]] to
        //    LEXICAL; otherwise, set it to UNINITIALIZED.
        this_binding_status: if this_mode == ThisMode::Lexical {
            ThisBindingStatus::Lexical
        } else {
            ThisBindingStatus::Uninitialized
        },
        // 3. Set env.[[FunctionObject]] to F.
        function_object: Function::ECMAScriptFunction(function),
        // 5. Set env.[[NewTarget]] to newTarget.
        new_target,
    };
    agent.heap.alloc_counter += core::mem::size_of::<Option<FunctionEnvironment>>();
    agent.heap.environments.function.push(Some(env));
    FunctionEnvironmentIndex::last(&agent.heap.environments.function)
}

pub(crate) fn new_function_environment_index(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    new_target: Option<Object>,
) -> EnvironmentIndex {
    EnvironmentIndex::Function(new_function_environment(agent, function, new_target))
}
