// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)

use crate::ecmascript::abstract_operations::operations_on_objects::{create_data_property, get};
use crate::ecmascript::abstract_operations::testing_and_comparison::callable_function;
use crate::ecmascript::abstract_operations::type_conversion::to_boolean;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::function::Function;
use crate::ecmascript::types::language::object::PropertyKey;
use crate::ecmascript::types::language::value::Value;

/// A partially filled property descriptor. `get`/`set` are doubly optional:
/// the outer `Option` tracks presence of the field, the inner one is the
/// function or undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// \[\[Value]]
    pub value: Option<Value>,

    /// \[\[Writable]]
    pub writable: Option<bool>,

    /// \[\[Get]]
    pub get: Option<Option<Function>>,

    /// \[\[Set]]
    pub set: Option<Option<Function>>,

    /// \[\[Enumerable]]
    pub enumerable: Option<bool>,

    /// \[\[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn new_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            get: None,
            set: None,
            enumerable: Some(true),
            configurable: Some(true),
        }
    }

    /// ### [6.2.6.1 IsAccessorDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isaccessordescriptor)
    pub fn is_accessor_descriptor(&self) -> bool {
        // 1. If Desc has a [[Get]] field, return true.
        // 2. If Desc has a [[Set]] field, return true.
        // 3. Return false.
        self.get.is_some() || self.set.is_some()
    }

    /// ### [6.2.6.2 IsDataDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isdatadescriptor)
    pub fn is_data_descriptor(&self) -> bool {
        // 1. If Desc has a [[Value]] field, return true.
        // 2. If Desc has a [[Writable]] field, return true.
        // 3. Return false.
        self.value.is_some() || self.writable.is_some()
    }

    /// ### [6.2.6.3 IsGenericDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isgenericdescriptor)
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    pub fn is_fully_populated(&self) -> bool {
        if self.enumerable.is_none() || self.configurable.is_none() {
            return false;
        }
        if self.is_accessor_descriptor() {
            self.get.is_some() && self.set.is_some()
        } else {
            self.value.is_some() && self.writable.is_some()
        }
    }

    /// ### [6.2.6.6 CompletePropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-completepropertydescriptor)
    pub fn complete(&mut self) {
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            self.value.get_or_insert(Value::Undefined);
            self.writable.get_or_insert(false);
        } else {
            self.get.get_or_insert(None);
            self.set.get_or_insert(None);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
    }

    /// ### [6.2.6.4 FromPropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-frompropertydescriptor)
    pub fn into_object(self, agent: &mut Agent) -> JsResult<Value> {
        use crate::ecmascript::builtins::ordinary::ordinary_object_create;
        // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%).
        let object_prototype = agent
            .current_realm()
            .intrinsics()
            .object_prototype()
            .into();
        let obj = ordinary_object_create(agent, Some(object_prototype));
        // 4. Populate the fields that are present.
        if let Some(value) = self.value {
            let key = PropertyKey::from_static_str(agent, "value");
            create_data_property(agent, obj, key, value)?;
        }
        if let Some(writable) = self.writable {
            let key = PropertyKey::from_static_str(agent, "writable");
            create_data_property(agent, obj, key, writable.into())?;
        }
        if let Some(get) = self.get {
            let key = PropertyKey::from_static_str(agent, "get");
            let value = get.map_or(Value::Undefined, |f| f.into_value());
            create_data_property(agent, obj, key, value)?;
        }
        if let Some(set) = self.set {
            let key = PropertyKey::from_static_str(agent, "set");
            let value = set.map_or(Value::Undefined, |f| f.into_value());
            create_data_property(agent, obj, key, value)?;
        }
        if let Some(enumerable) = self.enumerable {
            let key = PropertyKey::from_static_str(agent, "enumerable");
            create_data_property(agent, obj, key, enumerable.into())?;
        }
        if let Some(configurable) = self.configurable {
            let key = PropertyKey::from_static_str(agent, "configurable");
            create_data_property(agent, obj, key, configurable.into())?;
        }
        // 5. Return obj.
        Ok(obj.into())
    }

    /// ### [6.2.6.5 ToPropertyDescriptor ( Obj )](https://tc39.es/ecma262/#sec-topropertydescriptor)
    pub fn from_object(agent: &mut Agent, obj: Value) -> JsResult<Self> {
        // 1. If Obj is not an Object, throw a TypeError exception.
        let Value::Object(obj) = obj else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Property descriptor must be an object",
            ));
        };
        use crate::ecmascript::abstract_operations::operations_on_objects::has_property;
        // 2. Let desc be a new Property Descriptor that initially has no fields.
        let mut desc = PropertyDescriptor::default();
        // 3-4. [[Enumerable]]
        let key = PropertyKey::from_static_str(agent, "enumerable");
        if has_property(agent, obj, key)? {
            let value = get(agent, obj, key)?;
            desc.enumerable = Some(to_boolean(agent, value));
        }
        // 5-6. [[Configurable]]
        let key = PropertyKey::from_static_str(agent, "configurable");
        if has_property(agent, obj, key)? {
            let value = get(agent, obj, key)?;
            desc.configurable = Some(to_boolean(agent, value));
        }
        // 7-8. [[Value]]
        let key = PropertyKey::from_static_str(agent, "value");
        if has_property(agent, obj, key)? {
            desc.value = Some(get(agent, obj, key)?);
        }
        // 9-10. [[Writable]]
        let key = PropertyKey::from_static_str(agent, "writable");
        if has_property(agent, obj, key)? {
            let value = get(agent, obj, key)?;
            desc.writable = Some(to_boolean(agent, value));
        }
        // 11-12. [[Get]]
        let key = PropertyKey::from_static_str(agent, "get");
        if has_property(agent, obj, key)? {
            let getter = get(agent, obj, key)?;
            if getter.is_undefined() {
                desc.get = Some(None);
            } else if let Some(f) = callable_function(agent, getter) {
                desc.get = Some(Some(f));
            } else {
                return Err(
                    agent.throw_exception(ExceptionType::TypeError, "Getter must be callable")
                );
            }
        }
        // 13-14. [[Set]]
        let key = PropertyKey::from_static_str(agent, "set");
        if has_property(agent, obj, key)? {
            let setter = get(agent, obj, key)?;
            if setter.is_undefined() {
                desc.set = Some(None);
            } else if let Some(f) = callable_function(agent, setter) {
                desc.set = Some(Some(f));
            } else {
                return Err(
                    agent.throw_exception(ExceptionType::TypeError, "Setter must be callable")
                );
            }
        }
        // 15. If desc has a [[Get]] or [[Set]] field and a [[Value]] or
        //     [[Writable]] field, throw a TypeError exception.
        if (desc.get.is_some() || desc.set.is_some())
            && (desc.value.is_some() || desc.writable.is_some())
        {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Property descriptor cannot be both a data and an accessor descriptor",
            ));
        }
        // 16. Return desc.
        Ok(desc)
    }
}
