// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::abstract_operations::operations_on_objects::{
    define_property_or_throw, get, has_property, set,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, InternalMethods, Object, PropertyDescriptor, PropertyKey, Symbol, Value,
};
use crate::heap::WellKnownSymbolIndexes;

use super::{EnvironmentIndex, ObjectEnvironmentIndex, OuterEnv};

/// #### [9.1.1.2 Object Environment Records](https://tc39.es/ecma262/#sec-object-environment-records)
///
/// An Object Environment Record is associated with an object called its
/// binding object: the string property names of the binding object are its
/// bindings. Object Environment Records created for `with` statements
/// observe the prototype chain; the global object record does too.
#[derive(Debug, Clone, Copy)]
pub struct ObjectEnvironment {
    /// ### \[\[OuterEnv]]
    pub(crate) outer_env: OuterEnv,

    /// ### \[\[BindingObject]]
    pub(crate) binding_object: Object,

    /// ### \[\[IsWithEnvironment]]
    pub(crate) is_with_environment: bool,
}

impl ObjectEnvironmentIndex {
    /// ##### [9.1.1.2.1 HasBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-hasbinding-n)
    pub(crate) fn has_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        let env = agent[self];
        let binding_object = env.binding_object;
        // 2. Let foundBinding be ? HasProperty(bindingObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let found_binding = has_property(agent, binding_object, key)?;
        // 3. If foundBinding is false, return false.
        if !found_binding {
            return Ok(false);
        }
        // 4. If envRec.[[IsWithEnvironment]] is false, return true.
        if !env.is_with_environment {
            return Ok(true);
        }
        // 5. Let unscopables be ? Get(bindingObject, %Symbol.unscopables%).
        let unscopables_key = PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::Unscopables));
        let unscopables = get(agent, binding_object, unscopables_key)?;
        // 6. If unscopables is an Object, then
        if let Value::Object(unscopables) = unscopables {
            // a. Let blocked be ToBoolean(? Get(unscopables, N)).
            let blocked = get(agent, unscopables, key)?;
            let blocked =
                crate::ecmascript::abstract_operations::type_conversion::to_boolean(agent, blocked);
            // b. If blocked is true, return false.
            if blocked {
                return Ok(false);
            }
        }
        // 7. Return true.
        Ok(true)
    }

    /// ##### [9.1.1.2.2 CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#sec-object-environment-records-createmutablebinding-n-d)
    pub(crate) fn create_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        let binding_object = agent[self].binding_object;
        // 1. Perform ? DefinePropertyOrThrow(bindingObject, N,
        //    PropertyDescriptor { [[Value]]: undefined, [[Writable]]: true,
        //    [[Enumerable]]: true, [[Configurable]]: D }).
        let key = PropertyKey::from_heap_string(agent, name);
        define_property_or_throw(
            agent,
            binding_object,
            key,
            PropertyDescriptor {
                value: Some(Value::Undefined),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(is_deletable),
                ..Default::default()
            },
        )
    }

    /// ##### [9.1.1.2.4 InitializeBinding ( N, V )](https://tc39.es/ecma262/#sec-object-environment-records-initializebinding-n-v)
    pub(crate) fn initialize_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        // 1. Perform ? envRec.SetMutableBinding(N, V, false).
        self.set_mutable_binding(agent, name, value, false)
    }

    /// ##### [9.1.1.2.5 SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#sec-object-environment-records-setmutablebinding-n-v-s)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        let binding_object = agent[self].binding_object;
        // 1. Let stillExists be ? HasProperty(bindingObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let still_exists = has_property(agent, binding_object, key)?;
        // 2. If stillExists is false and S is true, throw a ReferenceError
        //    exception.
        if !still_exists && is_strict {
            let message = format!("{} is not defined", name.to_string_lossy(agent));
            return Err(agent.throw_exception(ExceptionType::ReferenceError, &message));
        }
        // 3. Perform ? Set(bindingObject, N, V, S).
        set(agent, binding_object, key, value, is_strict)
    }

    /// ##### [9.1.1.2.6 GetBindingValue ( N, S )](https://tc39.es/ecma262/#sec-object-environment-records-getbindingvalue-n-s)
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        let binding_object = agent[self].binding_object;
        // 1. Let value be ? HasProperty(bindingObject, N).
        let key = PropertyKey::from_heap_string(agent, name);
        let value = has_property(agent, binding_object, key)?;
        // 2. If value is false, then
        if !value {
            // a. If S is false, return undefined; otherwise throw a
            //    ReferenceError exception.
            if !is_strict {
                return Ok(Value::Undefined);
            }
            let message = format!("{} is not defined", name.to_string_lossy(agent));
            return Err(agent.throw_exception(ExceptionType::ReferenceError, &message));
        }
        // 3. Return ? Get(bindingObject, N).
        get(agent, binding_object, key)
    }

    /// ##### [9.1.1.2.7 DeleteBinding ( N )](https://tc39.es/ecma262/#sec-object-environment-records-deletebinding-n)
    pub(crate) fn delete_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        let binding_object = agent[self].binding_object;
        // 1. Return ? bindingObject.[[Delete]](N).
        let key = PropertyKey::from_heap_string(agent, name);
        binding_object.internal_delete(agent, key)
    }
}

/// ### [9.1.2.3 NewObjectEnvironment ( O, W, E )](https://tc39.es/ecma262/#sec-newobjectenvironment)
pub(crate) fn new_object_environment(
    agent: &mut Agent,
    binding_object: Object,
    is_with_environment: bool,
    outer_env: OuterEnv,
) -> EnvironmentIndex {
    agent.heap.alloc_counter += core::mem::size_of::<Option<ObjectEnvironment>>();
    agent.heap.environments.object.push(Some(ObjectEnvironment {
        outer_env,
        binding_object,
        is_with_environment,
    }));
    EnvironmentIndex::Object(ObjectEnvironmentIndex::last(
        &agent.heap.environments.object,
    ))
}
