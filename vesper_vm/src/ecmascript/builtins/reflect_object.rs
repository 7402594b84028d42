// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [28.1 The Reflect Object](https://tc39.es/ecma262/#sec-reflect-object)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    create_list_from_array_like,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{is_callable, is_constructor};
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, Object, PropertyDescriptor, Value,
};

pub(crate) struct ReflectObject;

macro_rules! reflect_method {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(ReflectObject::$method);
        }
    };
}

reflect_method!(ReflectApply, "apply", 3, apply);
reflect_method!(ReflectConstruct, "construct", 2, construct);
reflect_method!(ReflectDefineProperty, "defineProperty", 3, define_property);
reflect_method!(ReflectDeleteProperty, "deleteProperty", 2, delete_property);
reflect_method!(ReflectGet, "get", 2, get_method);
reflect_method!(
    ReflectGetOwnPropertyDescriptor,
    "getOwnPropertyDescriptor",
    2,
    get_own_property_descriptor
);
reflect_method!(ReflectGetPrototypeOf, "getPrototypeOf", 1, get_prototype_of);
reflect_method!(ReflectHas, "has", 2, has);
reflect_method!(ReflectIsExtensible, "isExtensible", 1, is_extensible);
reflect_method!(ReflectOwnKeys, "ownKeys", 1, own_keys);
reflect_method!(
    ReflectPreventExtensions,
    "preventExtensions",
    1,
    prevent_extensions
);
reflect_method!(ReflectSet, "set", 3, set_method);
reflect_method!(ReflectSetPrototypeOf, "setPrototypeOf", 2, set_prototype_of);

fn require_target(agent: &mut Agent, value: Value, method: &str) -> JsResult<Object> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Reflect.{method} called on non-object"),
        )),
    }
}

impl ReflectObject {
    /// ### [28.1.1 Reflect.apply ( target, thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-reflect.apply)
    fn apply(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = arguments.get(0);
        if is_callable(agent, target).is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Reflect.apply target is not callable",
            ));
        }
        let args = create_list_from_array_like(agent, arguments.get(2))?;
        crate::ecmascript::abstract_operations::operations_on_objects::call_function(
            agent,
            target,
            arguments.get(1),
            &args,
        )
    }

    /// ### [28.1.2 Reflect.construct ( target, argumentsList \[ , newTarget \] )](https://tc39.es/ecma262/#sec-reflect.construct)
    fn construct(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Some(target) = is_constructor(agent, arguments.get(0)) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Reflect.construct target is not a constructor",
            ));
        };
        let new_target = if arguments.len() > 2 {
            match is_constructor(agent, arguments.get(2)) {
                Some(new_target) => new_target,
                None => {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "Reflect.construct newTarget is not a constructor",
                    ))
                }
            }
        } else {
            target
        };
        let args = create_list_from_array_like(agent, arguments.get(1))?;
        let result = crate::ecmascript::abstract_operations::operations_on_objects::construct(
            agent,
            target,
            &args,
            Some(new_target),
        )?;
        Ok(result.into())
    }

    /// ### [28.1.3 Reflect.defineProperty ( target, propertyKey, attributes )](https://tc39.es/ecma262/#sec-reflect.defineproperty)
    fn define_property(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "defineProperty")?;
        let key = to_property_key(agent, arguments.get(1))?;
        let descriptor = PropertyDescriptor::from_object(agent, arguments.get(2))?;
        Ok(Value::Boolean(target.internal_define_own_property(
            agent, key, descriptor,
        )?))
    }

    /// ### [28.1.4 Reflect.deleteProperty ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.deleteproperty)
    fn delete_property(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "deleteProperty")?;
        let key = to_property_key(agent, arguments.get(1))?;
        Ok(Value::Boolean(target.internal_delete(agent, key)?))
    }

    /// ### [28.1.5 Reflect.get ( target, propertyKey \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.get)
    fn get_method(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "get")?;
        let key = to_property_key(agent, arguments.get(1))?;
        let receiver = if arguments.len() > 2 {
            arguments.get(2)
        } else {
            target.into()
        };
        target.internal_get(agent, key, receiver)
    }

    /// ### [28.1.6 Reflect.getOwnPropertyDescriptor ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "getOwnPropertyDescriptor")?;
        let key = to_property_key(agent, arguments.get(1))?;
        match target.internal_get_own_property(agent, key)? {
            Some(descriptor) => descriptor.into_object(agent),
            None => Ok(Value::Undefined),
        }
    }

    /// ### [28.1.7 Reflect.getPrototypeOf ( target )](https://tc39.es/ecma262/#sec-reflect.getprototypeof)
    fn get_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "getPrototypeOf")?;
        Ok(target
            .internal_get_prototype_of(agent)?
            .map_or(Value::Null, Value::Object))
    }

    /// ### [28.1.8 Reflect.has ( target, propertyKey )](https://tc39.es/ecma262/#sec-reflect.has)
    fn has(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "has")?;
        let key = to_property_key(agent, arguments.get(1))?;
        Ok(Value::Boolean(target.internal_has_property(agent, key)?))
    }

    /// ### [28.1.9 Reflect.isExtensible ( target )](https://tc39.es/ecma262/#sec-reflect.isextensible)
    fn is_extensible(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "isExtensible")?;
        Ok(Value::Boolean(target.internal_is_extensible(agent)?))
    }

    /// ### [28.1.10 Reflect.ownKeys ( target )](https://tc39.es/ecma262/#sec-reflect.ownkeys)
    fn own_keys(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "ownKeys")?;
        let keys = target.internal_own_property_keys(agent)?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(key.into_value(agent));
        }
        Ok(create_array_from_list(agent, &values).into())
    }

    /// ### [28.1.11 Reflect.preventExtensions ( target )](https://tc39.es/ecma262/#sec-reflect.preventextensions)
    fn prevent_extensions(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "preventExtensions")?;
        Ok(Value::Boolean(target.internal_prevent_extensions(agent)?))
    }

    /// ### [28.1.12 Reflect.set ( target, propertyKey, V \[ , receiver \] )](https://tc39.es/ecma262/#sec-reflect.set)
    fn set_method(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "set")?;
        let key = to_property_key(agent, arguments.get(1))?;
        let receiver = if arguments.len() > 3 {
            arguments.get(3)
        } else {
            target.into()
        };
        Ok(Value::Boolean(target.internal_set(
            agent,
            key,
            arguments.get(2),
            receiver,
        )?))
    }

    /// ### [28.1.13 Reflect.setPrototypeOf ( target, proto )](https://tc39.es/ecma262/#sec-reflect.setprototypeof)
    fn set_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let target = require_target(agent, arguments.get(0), "setPrototypeOf")?;
        let prototype = match arguments.get(1) {
            Value::Null => None,
            Value::Object(prototype) => Some(prototype),
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ))
            }
        };
        Ok(Value::Boolean(
            target.internal_set_prototype_of(agent, prototype)?,
        ))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let reflect = agent.get_realm(realm).intrinsics().reflect();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, reflect)
        .with_builtin_function_property::<ReflectApply>()
        .with_builtin_function_property::<ReflectConstruct>()
        .with_builtin_function_property::<ReflectDefineProperty>()
        .with_builtin_function_property::<ReflectDeleteProperty>()
        .with_builtin_function_property::<ReflectGet>()
        .with_builtin_function_property::<ReflectGetOwnPropertyDescriptor>()
        .with_builtin_function_property::<ReflectGetPrototypeOf>()
        .with_builtin_function_property::<ReflectHas>()
        .with_builtin_function_property::<ReflectIsExtensible>()
        .with_builtin_function_property::<ReflectOwnKeys>()
        .with_builtin_function_property::<ReflectPreventExtensions>()
        .with_builtin_function_property::<ReflectSet>()
        .with_builtin_function_property::<ReflectSetPrototypeOf>()
        .with_to_string_tag("Reflect")
        .build();
}
