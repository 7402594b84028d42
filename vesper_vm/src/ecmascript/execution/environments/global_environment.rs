// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashSet;

use crate::ecmascript::abstract_operations::operations_on_objects::{
    define_property_or_throw, has_own_property, set,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value,
};

use super::declarative_environment::DeclarativeEnvironmentRecord;
use super::object_environment::ObjectEnvironment;
use super::GlobalEnvironmentIndex;

/// #### [9.1.1.4 Global Environment Records](https://tc39.es/ecma262/#sec-global-environment-records)
///
/// A Global Environment Record is logically a single record but is a
/// composite encapsulating an Object Environment Record bound to the global
/// object and a Declarative Environment Record for declarations made
/// directly at script level. Lookups consult the declarative record first.
#[derive(Debug)]
pub struct GlobalEnvironment {
    /// ### \[\[ObjectRecord]]
    pub(crate) object_record: ObjectEnvironment,

    /// ### \[\[GlobalThisValue]]
    pub(crate) global_this_value: Object,

    /// ### \[\[DeclarativeRecord]]
    pub(crate) declarative_record: DeclarativeEnvironmentRecord,

    /// ### \[\[VarNames]]
    ///
    /// The string names bound by FunctionDeclarations and
    /// VariableDeclarations in the realm's scripts.
    pub(crate) var_names: AHashSet<HeapString>,
}

/// Typed introspection snapshot of the global record, exposed for
/// debugger-style tooling instead of the raw composite records.
#[derive(Debug, Clone)]
pub struct GlobalBindingsSnapshot {
    /// Names bound in the declarative record, with their mutability.
    pub lexical: Vec<(String, bool)>,
    /// Names registered through var and function declarations.
    pub var_names: Vec<String>,
}

fn already_declared(agent: &mut Agent, name: HeapString) -> crate::ecmascript::execution::JsError {
    let message = format!("{} has already been declared", name.to_string_lossy(agent));
    agent.throw_exception(ExceptionType::TypeError, &message)
}

impl GlobalEnvironmentIndex {
    /// ##### [9.1.1.4.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, return true.
        if agent[self].declarative_record.has_binding(name) {
            return Ok(true);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.HasBinding(N).
        let binding_object = agent[self].object_record.binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        crate::ecmascript::abstract_operations::operations_on_objects::has_property(
            agent,
            binding_object,
            key,
        )
    }

    /// ##### [9.1.1.4.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-global-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if agent[self].declarative_record.has_binding(name) {
            return Err(already_declared(agent, name));
        }
        // 3. Return ! DclRec.CreateMutableBinding(N, D).
        agent[self]
            .declarative_record
            .create_mutable_binding(name, is_deletable);
        Ok(())
    }

    /// ##### [9.1.1.4.3 CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-createimmutablebinding-n-s)
    pub(crate) fn create_immutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, throw a TypeError exception.
        if agent[self].declarative_record.has_binding(name) {
            return Err(already_declared(agent, name));
        }
        // 3. Return ! DclRec.CreateImmutableBinding(N, S).
        agent[self]
            .declarative_record
            .create_immutable_binding(name, is_strict);
        Ok(())
    }

    /// ##### [9.1.1.4.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-global-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if let Some(binding) = agent[self].declarative_record.get_binding(name) {
            if binding.value.is_none() {
                // a. Return ! DclRec.InitializeBinding(N, V).
                agent[self].declarative_record.initialize_binding(name, value);
                return Ok(());
            }
        }
        // 3. Assert: If the binding exists, it must be in the Object
        //    Environment Record.
        // 4. Let ObjRec be envRec.[[ObjectRecord]].
        // 5. Return ? ObjRec.InitializeBinding(N, V).
        let binding_object = agent[self].object_record.binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        set(agent, binding_object, key, value, false)
    }

    /// ##### [9.1.1.4.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-global-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if agent[self].declarative_record.has_binding(name) {
            // a. Return ? DclRec.SetMutableBinding(N, V, S).
            let outcome = agent[self]
                .declarative_record
                .set_mutable_binding_inner(name, value, is_strict);
            return outcome.into_result(agent, name);
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.SetMutableBinding(N, V, S).
        let env = agent[self].object_record;
        let key = PropertyKey::from_heap_string(agent, name);
        let still_exists = crate::ecmascript::abstract_operations::operations_on_objects::has_property(
            agent,
            env.binding_object,
            key,
        )?;
        if !still_exists && is_strict {
            let message = format!("{} is not defined", name.to_string_lossy(agent));
            return Err(agent.throw_exception(ExceptionType::ReferenceError, &message));
        }
        set(agent, env.binding_object, key, value, is_strict)
    }

    /// ##### [9.1.1.4.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-global-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, then
        if agent[self].declarative_record.has_binding(name) {
            // a. Return ? DclRec.GetBindingValue(N, S).
            let binding = agent[self].declarative_record.get_binding(name).unwrap();
            return match binding.value {
                Some(value) => Ok(value),
                None => Err(super::declarative_environment::throw_uninitialized(
                    agent, name,
                )),
            };
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Return ? ObjRec.GetBindingValue(N, S).
        let binding_object = agent[self].object_record.binding_object;
        let key = PropertyKey::from_heap_string(agent, name);
        let exists = crate::ecmascript::abstract_operations::operations_on_objects::has_property(
            agent,
            binding_object,
            key,
        )?;
        if !exists {
            if !is_strict {
                return Ok(Value::Undefined);
            }
            let message = format!("{} is not defined", name.to_string_lossy(agent));
            return Err(agent.throw_exception(ExceptionType::ReferenceError, &message));
        }
        crate::ecmascript::abstract_operations::operations_on_objects::get(
            agent,
            binding_object,
            key,
        )
    }

    /// ##### [9.1.1.4.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-global-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        // 1. Let DclRec be envRec.[[DeclarativeRecord]].
        // 2. If ! DclRec.HasBinding(N) is true, return
        //    ! DclRec.DeleteBinding(N).
        if agent[self].declarative_record.has_binding(name) {
            return Ok(agent[self].declarative_record.delete_binding(name));
        }
        // 3. Let ObjRec be envRec.[[ObjectRecord]].
        // 4. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = agent[self].object_record.binding_object;
        // 5. Let existingProp be ? HasOwnProperty(globalObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let existing_prop = has_own_property(agent, global_object, key)?;
        // 6. If existingProp is true, then
        if existing_prop {
            // a. Let status be ? ObjRec.DeleteBinding(N).
            let status = global_object.internal_delete(agent, key)?;
            // b. If status is true and envRec.[[VarNames]] contains N,
            //    remove N from envRec.[[VarNames]].
            if status {
                agent[self].var_names.remove(&name);
            }
            // c. Return status.
            return Ok(status);
        }
        // 7. Return true.
        Ok(true)
    }

    /// ##### [9.1.1.4.11 GetThisBinding ( )](https://tc39.es/ecma262/#sec-global-environment-records-getthisbinding)
    pub(crate) fn get_this_binding(self, agent: &Agent) -> Object {
        // 1. Return envRec.[[GlobalThisValue]].
        agent[self].global_this_value
    }

    /// ##### [9.1.1.4.12 HasVarDeclaration ( N )](https://tc39.es/ecma262/#sec-hasvardeclaration)
    pub(crate) fn has_var_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Return true if envRec.[[VarNames]] contains N; otherwise false.
        agent[self].var_names.contains(&name)
    }

    /// ##### [9.1.1.4.13 HasLexicalDeclaration ( N )](https://tc39.es/ecma262/#sec-haslexicaldeclaration)
    pub(crate) fn has_lexical_declaration(self, agent: &Agent, name: HeapString) -> bool {
        // 1. Return ! DclRec.HasBinding(N).
        agent[self].declarative_record.has_binding(name)
    }

    /// ##### [9.1.1.4.14 HasRestrictedGlobalProperty ( N )](https://tc39.es/ecma262/#sec-hasrestrictedglobalproperty)
    pub(crate) fn has_restricted_global_property(
        self,
        agent: &mut Agent,
        name: HeapString,
    ) -> JsResult<bool> {
        // 1. Let ObjRec be envRec.[[ObjectRecord]].
        // 2. Let globalObject be ObjRec.[[BindingObject]].
        let global_object = agent[self].object_record.binding_object;
        // 3. Let existingProp be
        //    ? globalObject.[[GetOwnProperty]](N).
        let key = PropertyKey::from_heap_string(agent, name);
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return false.
        let Some(existing_prop) = existing_prop else {
            return Ok(false);
        };
        // 5. If existingProp.[[Configurable]] is true, return false.
        // 6. Return true.
        Ok(!existing_prop.configurable.unwrap_or(false))
    }

    /// ##### [9.1.1.4.15 CanDeclareGlobalVar ( N )](https://tc39.es/ecma262/#sec-candeclareglobalvar)
    pub(crate) fn can_declare_global_var(
        self,
        agent: &mut Agent,
        name: HeapString,
    ) -> JsResult<bool> {
        let global_object = agent[self].object_record.binding_object;
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let has_property = has_own_property(agent, global_object, key)?;
        // 4. If hasProperty is true, return true.
        if has_property {
            return Ok(true);
        }
        // 5. Return ? IsExtensible(globalObject).
        global_object.internal_is_extensible(agent)
    }

    /// ##### [9.1.1.4.16 CanDeclareGlobalFunction ( N )](https://tc39.es/ecma262/#sec-candeclareglobalfunction)
    pub(crate) fn can_declare_global_function(
        self,
        agent: &mut Agent,
        name: HeapString,
    ) -> JsResult<bool> {
        let global_object = agent[self].object_record.binding_object;
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let key = PropertyKey::from_heap_string(agent, name);
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined, return ? IsExtensible(globalObject).
        let Some(existing_prop) = existing_prop else {
            return global_object.internal_is_extensible(agent);
        };
        // 5. If existingProp.[[Configurable]] is true, return true.
        if existing_prop.configurable.unwrap_or(false) {
            return Ok(true);
        }
        // 6. If IsDataDescriptor(existingProp) is true and existingProp has
        //    attribute values { [[Writable]]: true, [[Enumerable]]: true },
        //    return true.
        if existing_prop.is_data_descriptor()
            && existing_prop.writable.unwrap_or(false)
            && existing_prop.enumerable.unwrap_or(false)
        {
            return Ok(true);
        }
        // 7. Return false.
        Ok(false)
    }

    /// ##### [9.1.1.4.17 CreateGlobalVarBinding ( N, D )](https://tc39.es/ecma262/#sec-createglobalvarbinding)
    pub(crate) fn create_global_var_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let global_object = agent[self].object_record.binding_object;
        // 3. Let hasProperty be ? HasOwnProperty(globalObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let has_property = has_own_property(agent, global_object, key)?;
        // 4. Let extensible be ? IsExtensible(globalObject).
        let extensible = global_object.internal_is_extensible(agent)?;
        // 5. If hasProperty is false and extensible is true, then
        if !has_property && extensible {
            // a. Perform ? ObjRec.CreateMutableBinding(N, D).
            // b. Perform ? ObjRec.InitializeBinding(N, undefined).
            define_property_or_throw(
                agent,
                global_object,
                key,
                PropertyDescriptor {
                    value: Some(Value::Undefined),
                    writable: Some(true),
                    enumerable: Some(true),
                    configurable: Some(is_deletable),
                    ..Default::default()
                },
            )?;
        }
        // 6-7. If envRec.[[VarNames]] does not contain N, append N.
        agent[self].var_names.insert(name);
        // 8. Return UNUSED.
        Ok(())
    }

    /// ##### [9.1.1.4.18 CreateGlobalFunctionBinding ( N, V, D )](https://tc39.es/ecma262/#sec-createglobalfunctionbinding)
    pub(crate) fn create_global_function_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_deletable: bool,
    ) -> JsResult<()> {
        let global_object = agent[self].object_record.binding_object;
        // 3. Let existingProp be ? globalObject.[[GetOwnProperty]](N).
        let key = PropertyKey::from_heap_string(agent, name);
        let existing_prop = global_object.internal_get_own_property(agent, key)?;
        // 4. If existingProp is undefined or existingProp.[[Configurable]]
        //    is true, then
        let desc = if existing_prop
            .as_ref()
            .is_none_or(|p| p.configurable.unwrap_or(false))
        {
            // a. Let desc be the PropertyDescriptor { [[Value]]: V,
            //    [[Writable]]: true, [[Enumerable]]: true,
            //    [[Configurable]]: D }.
            PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            }
        } else {
            // 5. Else, let desc be the PropertyDescriptor { [[Value]]: V }.
            PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            }
        };
        // 6. Perform ? DefinePropertyOrThrow(globalObject, N, desc).
        define_property_or_throw(agent, global_object, key, desc)?;
        // 7. Perform ? Set(globalObject, N, V, false).
        set(agent, global_object, key, value, false)?;
        // 8-9. If envRec.[[VarNames]] does not contain N, append N.
        agent[self].var_names.insert(name);
        // 10. Return UNUSED.
        Ok(())
    }

    /// Typed introspection of the global bindings for tooling.
    pub fn snapshot(self, agent: &Agent) -> GlobalBindingsSnapshot {
        let record = &agent[self];
        let mut lexical: Vec<(String, bool)> = record
            .declarative_record
            .binding_names()
            .map(|(name, mutable)| {
                (name.to_string_lossy(agent).into_owned(), mutable)
            })
            .collect();
        lexical.sort();
        let mut var_names: Vec<String> = record
            .var_names
            .iter()
            .map(|name| name.to_string_lossy(agent).into_owned())
            .collect();
        var_names.sort();
        GlobalBindingsSnapshot { lexical, var_names }
    }
}

/// ### [9.1.2.5 NewGlobalEnvironment ( G, thisValue )](https://tc39.es/ecma262/#sec-newglobalenvironment)
pub(crate) fn new_global_environment(
    agent: &mut Agent,
    global: Object,
    this_value: Object,
) -> GlobalEnvironmentIndex {
    // 1. Let objRec be NewObjectEnvironment(G, false, null).
    let object_record = ObjectEnvironment {
        outer_env: None,
        binding_object: global,
        is_with_environment: false,
    };
    // 2. Let dclRec be NewDeclarativeEnvironment(null).
    let declarative_record = DeclarativeEnvironmentRecord::new(None);
    // 3-8. Compose the global record.
    let env = GlobalEnvironment {
        object_record,
        global_this_value: this_value,
        declarative_record,
        var_names: AHashSet::default(),
    };
    agent.heap.alloc_counter += core::mem::size_of::<Option<GlobalEnvironment>>();
    agent.heap.environments.global.push(Some(env));
    GlobalEnvironmentIndex::last(&agent.heap.environments.global)
}
