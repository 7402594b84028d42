// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Value};

use super::{DeclarativeEnvironmentIndex, EnvironmentIndex, OuterEnv};

/// #### [9.1.1.1 Declarative Environment Records](https://tc39.es/ecma262/#sec-declarative-environment-records)
///
/// A Declarative Environment Record is used to define the effect of
/// ECMAScript language syntactic elements such as FunctionDeclarations,
/// VariableDeclarations, and Catch clauses that directly associate
/// identifier bindings with ECMAScript language values.
pub type DeclarativeEnvironment = DeclarativeEnvironmentRecord;

#[derive(Debug, Clone, Default)]
pub struct DeclarativeEnvironmentRecord {
    /// ### \[\[OuterEnv]]
    outer_env: OuterEnv,

    /// The environment's bindings.
    bindings: AHashMap<HeapString, Binding>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    /// None while the binding is uninitialized (in its temporal dead zone).
    pub(crate) value: Option<Value>,
    pub(crate) strict: bool,
    pub(crate) mutable: bool,
    pub(crate) deletable: bool,
}

impl DeclarativeEnvironmentRecord {
    /// #### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
    pub(crate) fn new(outer_env: OuterEnv) -> Self {
        // 1. Let env be a new Declarative Environment Record containing no
        //    bindings.
        // 2. Set env.[[OuterEnv]] to E.
        // 3. Return env.
        DeclarativeEnvironmentRecord {
            outer_env,
            bindings: AHashMap::default(),
        }
    }

    pub(crate) fn outer_env(&self) -> OuterEnv {
        self.outer_env
    }

    /// ##### [9.1.1.1.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-hasbinding-n)
    pub(crate) fn has_binding(&self, name: HeapString) -> bool {
        // 1. If envRec has a binding for N, return true.
        // 2. Return false.
        self.bindings.contains_key(&name)
    }

    /// ##### [9.1.1.1.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-declarative-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(&mut self, name: HeapString, is_deletable: bool) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(name));
        // 2. Create a mutable binding in envRec for N and record that it is
        //    uninitialized.
        self.bindings.insert(
            name,
            Binding {
                value: None,
                // Strictness only matters for immutable bindings.
                strict: false,
                mutable: true,
                deletable: is_deletable,
            },
        );
    }

    /// ##### [9.1.1.1.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(&mut self, name: HeapString, is_strict: bool) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(name));
        // 2. Create an immutable binding in envRec for N and record that it
        //    is uninitialized.
        self.bindings.insert(
            name,
            Binding {
                value: None,
                strict: is_strict,
                mutable: false,
                deletable: false,
            },
        );
    }

    /// ##### [9.1.1.1.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-declarative-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(&mut self, name: HeapString, value: Value) {
        // 1. Assert: envRec must have an uninitialized binding for N.
        let binding = self.bindings.get_mut(&name).unwrap();
        debug_assert!(binding.value.is_none());
        // 2. Set the bound value for N in envRec to V.
        // 3. Record that the binding for N in envRec has been initialized.
        // Note: initialization status is tracked by the Some/None.
        binding.value = Some(value);
    }

    pub(crate) fn get_binding(&self, name: HeapString) -> Option<&Binding> {
        self.bindings.get(&name)
    }

    pub(crate) fn binding_names(&self) -> impl Iterator<Item = (HeapString, bool)> + '_ {
        self.bindings
            .iter()
            .map(|(name, binding)| (*name, binding.mutable))
    }

    /// ##### [9.1.1.1.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-declarative-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(&mut self, name: HeapString) -> bool {
        // 1. Assert: envRec has a binding for N.
        let binding = self.bindings.get(&name).unwrap();
        // 2. If the binding for N in envRec cannot be deleted, return false.
        if !binding.deletable {
            return false;
        }
        // 3. Remove the binding for N from envRec.
        self.bindings.remove(&name);
        // 4. Return true.
        true
    }

    /// ##### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    ///
    /// Shared by every record kind that embeds a declarative record. The
    /// error paths are reported through the returned enum so that callers
    /// can build the exception against the agent.
    pub(crate) fn set_mutable_binding_inner(
        &mut self,
        name: HeapString,
        value: Value,
        mut is_strict: bool,
    ) -> SetMutableBindingOutcome {
        // 1. If envRec does not have a binding for N, then
        let Some(binding) = self.bindings.get_mut(&name) else {
            // a. If S is true, throw a ReferenceError exception.
            if is_strict {
                return SetMutableBindingOutcome::MissingBinding;
            }
            // b. Perform ! envRec.CreateMutableBinding(N, true).
            self.create_mutable_binding(name, true);
            // c. Perform ! envRec.InitializeBinding(N, V).
            self.initialize_binding(name, value);
            // d. Return UNUSED.
            return SetMutableBindingOutcome::Ok;
        };

        // 2. If the binding for N in envRec is a strict binding, set S to
        //    true.
        if binding.strict {
            is_strict = true;
        }

        // 3. If the binding for N in envRec has not yet been initialized,
        //    throw a ReferenceError exception.
        if binding.value.is_none() {
            return SetMutableBindingOutcome::Uninitialized;
        }

        // 4. Else if the binding for N in envRec is a mutable binding,
        //    change its bound value to V.
        if binding.mutable {
            binding.value = Some(value);
            return SetMutableBindingOutcome::Ok;
        }

        // 5. Else this is an attempt to change the value of an immutable
        //    binding; if S is true, throw a TypeError exception.
        if is_strict {
            SetMutableBindingOutcome::ImmutableAssignment
        } else {
            SetMutableBindingOutcome::Ok
        }
    }
}

pub(crate) enum SetMutableBindingOutcome {
    Ok,
    MissingBinding,
    Uninitialized,
    ImmutableAssignment,
}

impl SetMutableBindingOutcome {
    pub(crate) fn into_result(
        self,
        agent: &mut Agent,
        name: HeapString,
    ) -> JsResult<()> {
        match self {
            SetMutableBindingOutcome::Ok => Ok(()),
            SetMutableBindingOutcome::MissingBinding => {
                let message = format!("{} is not defined", name.to_string_lossy(agent));
                Err(agent.throw_exception(ExceptionType::ReferenceError, &message))
            }
            SetMutableBindingOutcome::Uninitialized => {
                let message = format!(
                    "Cannot access '{}' before initialization",
                    name.to_string_lossy(agent)
                );
                Err(agent.throw_exception(ExceptionType::ReferenceError, &message))
            }
            SetMutableBindingOutcome::ImmutableAssignment => {
                let message = format!(
                    "Assignment to constant variable '{}'",
                    name.to_string_lossy(agent)
                );
                Err(agent.throw_exception(ExceptionType::TypeError, &message))
            }
        }
    }
}

/// Throw the TDZ ReferenceError for reading `name` before initialization.
pub(crate) fn throw_uninitialized(agent: &mut Agent, name: HeapString) -> crate::ecmascript::execution::JsError {
    let message = format!(
        "Cannot access '{}' before initialization",
        name.to_string_lossy(agent)
    );
    agent.throw_exception(ExceptionType::ReferenceError, &message)
}

impl DeclarativeEnvironmentIndex {
    /// ##### [9.1.1.1.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let outcome = agent[self].set_mutable_binding_inner(name, value, is_strict);
        outcome.into_result(agent, name)
    }

    /// ##### [9.1.1.1.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-declarative-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Assert: envRec has a binding for N.
        let binding = agent[self].get_binding(name).unwrap();
        // 2. If the binding for N in envRec is an uninitialized binding,
        //    throw a ReferenceError exception.
        match binding.value {
            Some(value) => {
                // 3. Return the value currently bound to N in envRec.
                Ok(value)
            }
            None => Err(throw_uninitialized(agent, name)),
        }
    }
}

/// #### [9.1.2.2 NewDeclarativeEnvironment ( E )](https://tc39.es/ecma262/#sec-newdeclarativeenvironment)
pub(crate) fn new_declarative_environment(
    agent: &mut Agent,
    outer_env: OuterEnv,
) -> DeclarativeEnvironmentIndex {
    agent.heap.alloc_counter += core::mem::size_of::<Option<DeclarativeEnvironmentRecord>>();
    agent
        .heap
        .environments
        .declarative
        .push(Some(DeclarativeEnvironmentRecord::new(outer_env)));
    DeclarativeEnvironmentIndex::last(&agent.heap.environments.declarative)
}

/// Convenience wrapper returning the generic environment enum.
pub(crate) fn new_declarative_environment_index(
    agent: &mut Agent,
    outer_env: OuterEnv,
) -> EnvironmentIndex {
    EnvironmentIndex::Declarative(new_declarative_environment(agent, outer_env))
}
