// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::scripts_and_modules::module::Module;
use crate::ecmascript::types::{HeapString, Value};

use super::declarative_environment::DeclarativeEnvironmentRecord;
use super::{ModuleEnvironmentIndex, OuterEnv};

/// An import binding that forwards to another module's binding. Resolution
/// happens lazily on first read and the resolved environment is cached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndirectBinding {
    pub(crate) module: Module,
    pub(crate) name: HeapString,
    /// Filled on first read.
    pub(crate) resolved_env: Option<ModuleEnvironmentIndex>,
}

/// #### [9.1.1.5 Module Environment Records](https://tc39.es/ecma262/#sec-module-environment-records)
///
/// A Module Environment Record is a Declarative Environment Record used to
/// represent the outer scope of a Module; in addition to mutable and
/// immutable bindings it provides immutable import bindings that give
/// indirect access to a target binding in another environment.
#[derive(Debug)]
pub struct ModuleEnvironment {
    pub(crate) declarative: DeclarativeEnvironmentRecord,
    pub(crate) indirect_bindings: AHashMap<HeapString, IndirectBinding>,
}

impl ModuleEnvironmentIndex {
    pub(crate) fn has_binding(self, agent: &Agent, name: HeapString) -> bool {
        agent[self].declarative.has_binding(name)
            || agent[self].indirect_bindings.contains_key(&name)
    }

    /// ##### [9.1.1.5.5 CreateImportBinding ( N, M, N2 )](https://tc39.es/ecma262/#sec-createimportbinding)
    pub(crate) fn create_import_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        module: Module,
        target_name: HeapString,
    ) {
        // 1. Assert: envRec does not already have a binding for N.
        debug_assert!(!self.has_binding(agent, name));
        // 2-3. Create an immutable indirect binding for N referencing M's
        //    binding for N2.
        agent[self].indirect_bindings.insert(
            name,
            IndirectBinding {
                module,
                name: target_name,
                resolved_env: None,
            },
        );
    }

    /// ##### [9.1.1.5.1 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-module-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        _is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Assert: S is true.
        // 2. Assert: envRec has a binding for N.
        // 3. If the binding for N is an indirect binding, then
        if let Some(binding) = agent[self].indirect_bindings.get(&name).copied() {
            // a. Let M and N2 be the indirection target.
            let target_env = match binding.resolved_env {
                Some(env) => env,
                None => {
                    // b. If M.[[Environment]] is EMPTY, throw a
                    //    ReferenceError exception.
                    let Some(env) = agent[binding.module].environment else {
                        return Err(agent.throw_exception(
                            crate::ecmascript::execution::ExceptionType::ReferenceError,
                            "Cannot access binding of an unlinked module",
                        ));
                    };
                    // Cache the resolution for subsequent reads.
                    agent[self]
                        .indirect_bindings
                        .get_mut(&name)
                        .unwrap()
                        .resolved_env = Some(env);
                    env
                }
            };
            // c. Return ? targetEnv.GetBindingValue(N2, true).
            let target_name = binding.name;
            let target_binding = agent[target_env].declarative.get_binding(target_name);
            return match target_binding.and_then(|b| b.value) {
                Some(value) => Ok(value),
                None => Err(super::declarative_environment::throw_uninitialized(
                    agent,
                    target_name,
                )),
            };
        }
        // 4. If the binding for N in envRec is an uninitialized binding,
        //    throw a ReferenceError exception.
        let binding = agent[self].declarative.get_binding(name).unwrap();
        match binding.value {
            Some(value) => Ok(value),
            None => Err(super::declarative_environment::throw_uninitialized(
                agent, name,
            )),
        }
    }

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
}

/// Create a module environment over the module's realm global environment.
pub(crate) fn new_module_environment(
    agent: &mut Agent,
    outer_env: OuterEnv,
) -> ModuleEnvironmentIndex {
    let env = ModuleEnvironment {
        declarative: DeclarativeEnvironmentRecord::new(outer_env),
        indirect_bindings: AHashMap::default(),
    };
    agent.heap.alloc_counter += core::mem::size_of::<Option<ModuleEnvironment>>();
    agent.heap.environments.module.push(Some(env));
    ModuleEnvironmentIndex::last(&agent.heap.environments.module)
}
