// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.1 Object Objects](https://tc39.es/ecma262/#sec-object-objects)

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{
    copy_data_properties, create_data_property_or_throw, define_property_or_throw, get,
    has_own_property, set_integrity_level, test_integrity_level, EnumerablePropertiesKind,
    IntegrityLevel,
};
use crate::ecmascript::abstract_operations::operations_on_objects::enumerable_own_properties;
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    require_object_coercible, same_value,
};
use crate::ecmascript::abstract_operations::type_conversion::{to_object, to_property_key};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::builtins::primitive_objects::PrimitiveObjectData;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, PropertyDescriptor, PropertyKey, Symbol, Value,
};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct ObjectConstructor;

impl Builtin for ObjectConstructor {
    const NAME: &'static str = "Object";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ObjectConstructor::construct);
}

macro_rules! object_builtin {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectConstructor::$method);
        }
    };
}

object_builtin!(ObjectAssign, "assign", 2, assign);
object_builtin!(ObjectCreate, "create", 2, create);
object_builtin!(ObjectDefineProperties, "defineProperties", 2, define_properties);
object_builtin!(ObjectDefineProperty, "defineProperty", 3, define_property);
object_builtin!(ObjectEntries, "entries", 1, entries);
object_builtin!(ObjectFreeze, "freeze", 1, freeze);
object_builtin!(ObjectFromEntries, "fromEntries", 1, from_entries);
object_builtin!(
    ObjectGetOwnPropertyDescriptor,
    "getOwnPropertyDescriptor",
    2,
    get_own_property_descriptor
);
object_builtin!(
    ObjectGetOwnPropertyDescriptors,
    "getOwnPropertyDescriptors",
    1,
    get_own_property_descriptors
);
object_builtin!(
    ObjectGetOwnPropertyNames,
    "getOwnPropertyNames",
    1,
    get_own_property_names
);
object_builtin!(
    ObjectGetOwnPropertySymbols,
    "getOwnPropertySymbols",
    1,
    get_own_property_symbols
);
object_builtin!(ObjectGetPrototypeOf, "getPrototypeOf", 1, get_prototype_of);
object_builtin!(ObjectIs, "is", 2, is);
object_builtin!(ObjectIsExtensible, "isExtensible", 1, is_extensible);
object_builtin!(ObjectIsFrozen, "isFrozen", 1, is_frozen);
object_builtin!(ObjectIsSealed, "isSealed", 1, is_sealed);
object_builtin!(ObjectKeys, "keys", 1, keys);
object_builtin!(ObjectPreventExtensions, "preventExtensions", 1, prevent_extensions);
object_builtin!(ObjectSeal, "seal", 1, seal);
object_builtin!(ObjectSetPrototypeOf, "setPrototypeOf", 2, set_prototype_of);
object_builtin!(ObjectValues, "values", 1, values);

impl ObjectConstructor {
    /// ### [20.1.1.1 Object ( \[ value \] )](https://tc39.es/ecma262/#sec-object-value)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        let value = arguments.get(0);
        // 2. If value is either undefined or null, return
        //    OrdinaryObjectCreate(%Object.prototype%).
        if value.is_nullish() {
            let object_prototype = agent.current_realm().intrinsics().object_prototype();
            return Ok(ordinary_object_create(agent, Some(object_prototype.into())).into());
        }
        // 3. Return ! ToObject(value).
        Ok(to_object(agent, value)?.into())
    }

    /// ### [20.1.2.1 Object.assign ( target, ...sources )](https://tc39.es/ecma262/#sec-object.assign)
    fn assign(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let to = to_object(agent, arguments.get(0))?;
        for source in arguments.iter().skip(1) {
            copy_data_properties(agent, to, *source, &[])?;
        }
        Ok(to.into())
    }

    /// ### [20.1.2.2 Object.create ( O, Properties )](https://tc39.es/ecma262/#sec-object.create)
    fn create(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let prototype = match arguments.get(0) {
            Value::Null => None,
            Value::Object(object) => Some(object),
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Object prototype may only be an Object or null",
                ))
            }
        };
        let object = ordinary_object_create(agent, prototype);
        let properties = arguments.get(1);
        if !properties.is_undefined() {
            object_define_properties(agent, object.into(), properties)?;
        }
        Ok(object.into())
    }

    /// ### [20.1.2.3 Object.defineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-object.defineproperties)
    fn define_properties(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Object.defineProperties called on non-object",
            ));
        };
        object_define_properties(agent, object, arguments.get(1))?;
        Ok(object.into())
    }

    /// ### [20.1.2.4 Object.defineProperty ( O, P, Attributes )](https://tc39.es/ecma262/#sec-object.defineproperty)
    fn define_property(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Object.defineProperty called on non-object",
            ));
        };
        let key = to_property_key(agent, arguments.get(1))?;
        let descriptor = PropertyDescriptor::from_object(agent, arguments.get(2))?;
        define_property_or_throw(agent, object, key, descriptor)?;
        Ok(object.into())
    }

    /// ### [20.1.2.5 Object.entries ( O )](https://tc39.es/ecma262/#sec-object.entries)
    fn entries(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let entries =
            enumerable_own_properties(agent, object, EnumerablePropertiesKind::KeyValue)?;
        Ok(create_array_from_list(agent, &entries).into())
    }

    /// ### [20.1.2.6 Object.freeze ( O )](https://tc39.es/ecma262/#sec-object.freeze)
    fn freeze(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        let status = set_integrity_level(agent, object, IntegrityLevel::Frozen)?;
        if !status {
            return Err(
                agent.throw_exception(ExceptionType::TypeError, "Could not freeze object")
            );
        }
        Ok(object.into())
    }

    /// ### [20.1.2.7 Object.fromEntries ( iterable )](https://tc39.es/ecma262/#sec-object.fromentries)
    fn from_entries(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let iterable = require_object_coercible(agent, arguments.get(0))?;
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let object = ordinary_object_create(agent, Some(object_prototype.into()));
        let entries = iterable_to_list(agent, iterable)?;
        for entry in entries {
            let Value::Object(entry) = entry else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Iterator value is not an entry object",
                ));
            };
            let key = get(agent, entry, PropertyKey::Integer(0))?;
            let value = get(agent, entry, PropertyKey::Integer(1))?;
            let key = to_property_key(agent, key)?;
            create_data_property_or_throw(agent, object, key, value)?;
        }
        Ok(object.into())
    }

    /// ### [20.1.2.8 Object.getOwnPropertyDescriptor ( O, P )](https://tc39.es/ecma262/#sec-object.getownpropertydescriptor)
    fn get_own_property_descriptor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let key = to_property_key(agent, arguments.get(1))?;
        let descriptor = object.internal_get_own_property(agent, key)?;
        match descriptor {
            Some(descriptor) => descriptor.into_object(agent),
            None => Ok(Value::Undefined),
        }
    }

    /// ### [20.1.2.9 Object.getOwnPropertyDescriptors ( O )](https://tc39.es/ecma262/#sec-object.getownpropertydescriptors)
    fn get_own_property_descriptors(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let own_keys = object.internal_own_property_keys(agent)?;
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let descriptors = ordinary_object_create(agent, Some(object_prototype.into()));
        for key in own_keys {
            let descriptor = object.internal_get_own_property(agent, key)?;
            if let Some(descriptor) = descriptor {
                let descriptor_object = descriptor.into_object(agent)?;
                create_data_property_or_throw(agent, descriptors, key, descriptor_object)?;
            }
        }
        Ok(descriptors.into())
    }

    /// ### [20.1.2.10 Object.getOwnPropertyNames ( O )](https://tc39.es/ecma262/#sec-object.getownpropertynames)
    fn get_own_property_names(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let own_keys = object.internal_own_property_keys(agent)?;
        let mut names = Vec::with_capacity(own_keys.len());
        for key in own_keys {
            if !matches!(key, PropertyKey::Symbol(_)) {
                names.push(key.into_value(agent));
            }
        }
        Ok(create_array_from_list(agent, &names).into())
    }

    /// ### [20.1.2.11 Object.getOwnPropertySymbols ( O )](https://tc39.es/ecma262/#sec-object.getownpropertysymbols)
    fn get_own_property_symbols(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let own_keys = object.internal_own_property_keys(agent)?;
        let mut symbols = Vec::new();
        for key in own_keys {
            if let PropertyKey::Symbol(symbol) = key {
                symbols.push(Value::Symbol(symbol));
            }
        }
        Ok(create_array_from_list(agent, &symbols).into())
    }

    /// ### [20.1.2.12 Object.getPrototypeOf ( O )](https://tc39.es/ecma262/#sec-object.getprototypeof)
    fn get_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let prototype = object.internal_get_prototype_of(agent)?;
        Ok(prototype.map_or(Value::Null, Value::Object))
    }

    /// ### [20.1.2.14 Object.is ( value1, value2 )](https://tc39.es/ecma262/#sec-object.is)
    fn is(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(same_value(
            agent,
            arguments.get(0),
            arguments.get(1),
        )))
    }

    /// ### [20.1.2.15 Object.isExtensible ( O )](https://tc39.es/ecma262/#sec-object.isextensible)
    fn is_extensible(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(object.internal_is_extensible(agent)?))
    }

    /// ### [20.1.2.16 Object.isFrozen ( O )](https://tc39.es/ecma262/#sec-object.isfrozen)
    fn is_frozen(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        Ok(Value::Boolean(test_integrity_level(
            agent,
            object,
            IntegrityLevel::Frozen,
        )?))
    }

    /// ### [20.1.2.17 Object.isSealed ( O )](https://tc39.es/ecma262/#sec-object.issealed)
    fn is_sealed(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(true));
        };
        Ok(Value::Boolean(test_integrity_level(
            agent,
            object,
            IntegrityLevel::Sealed,
        )?))
    }

    /// ### [20.1.2.18 Object.keys ( O )](https://tc39.es/ecma262/#sec-object.keys)
    fn keys(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let keys = enumerable_own_properties(agent, object, EnumerablePropertiesKind::Key)?;
        Ok(create_array_from_list(agent, &keys).into())
    }

    /// ### [20.1.2.19 Object.preventExtensions ( O )](https://tc39.es/ecma262/#sec-object.preventextensions)
    fn prevent_extensions(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        let status = object.internal_prevent_extensions(agent)?;
        if !status {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Could not prevent extensions",
            ));
        }
        Ok(object.into())
    }

    /// ### [20.1.2.20 Object.seal ( O )](https://tc39.es/ecma262/#sec-object.seal)
    fn seal(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(object) = arguments.get(0) else {
            return Ok(arguments.get(0));
        };
        let status = set_integrity_level(agent, object, IntegrityLevel::Sealed)?;
        if !status {
            return Err(agent.throw_exception(ExceptionType::TypeError, "Could not seal object"));
        }
        Ok(object.into())
    }

    /// ### [20.1.2.21 Object.setPrototypeOf ( O, proto )](https://tc39.es/ecma262/#sec-object.setprototypeof)
    fn set_prototype_of(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = require_object_coercible(agent, arguments.get(0))?;
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
        let Value::Object(object) = object else {
            return Ok(object);
        };
        let status = object.internal_set_prototype_of(agent, prototype)?;
        if !status {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Could not set prototype of object",
            ));
        }
        Ok(object.into())
    }

    /// ### [20.1.2.23 Object.values ( O )](https://tc39.es/ecma262/#sec-object.values)
    fn values(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, arguments.get(0))?;
        let values = enumerable_own_properties(agent, object, EnumerablePropertiesKind::Value)?;
        Ok(create_array_from_list(agent, &values).into())
    }
}

/// ### [20.1.2.3.1 ObjectDefineProperties ( O, Properties )](https://tc39.es/ecma262/#sec-objectdefineproperties)
fn object_define_properties(
    agent: &mut Agent,
    object: Object,
    properties: Value,
) -> JsResult<()> {
    let props = to_object(agent, properties)?;
    let keys = props.internal_own_property_keys(agent)?;
    let mut descriptors = Vec::new();
    for key in keys {
        let descriptor = props.internal_get_own_property(agent, key)?;
        if let Some(descriptor) = descriptor {
            if descriptor.enumerable.unwrap_or(false) {
                let descriptor_value = get(agent, props, key)?;
                let descriptor = PropertyDescriptor::from_object(agent, descriptor_value)?;
                descriptors.push((key, descriptor));
            }
        }
    }
    for (key, descriptor) in descriptors {
        define_property_or_throw(agent, object, key, descriptor)?;
    }
    Ok(())
}

pub(crate) struct ObjectPrototype;

macro_rules! object_prototype_builtin {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(ObjectPrototype::$method);
        }
    };
}

object_prototype_builtin!(ObjectPrototypeHasOwnProperty, "hasOwnProperty", 1, has_own_property);
object_prototype_builtin!(ObjectPrototypeIsPrototypeOf, "isPrototypeOf", 1, is_prototype_of);
object_prototype_builtin!(
    ObjectPrototypePropertyIsEnumerable,
    "propertyIsEnumerable",
    1,
    property_is_enumerable
);
object_prototype_builtin!(ObjectPrototypeToLocaleString, "toLocaleString", 0, to_locale_string);
object_prototype_builtin!(ObjectPrototypeToString, "toString", 0, to_string_method);
object_prototype_builtin!(ObjectPrototypeValueOf, "valueOf", 0, value_of);

impl ObjectPrototype {
    /// ### [20.1.3.2 Object.prototype.hasOwnProperty ( V )](https://tc39.es/ecma262/#sec-object.prototype.hasownproperty)
    fn has_own_property(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let key = to_property_key(agent, arguments.get(0))?;
        let object = to_object(agent, this_value)?;
        Ok(Value::Boolean(has_own_property(agent, object, key)?))
    }

    /// ### [20.1.3.3 Object.prototype.isPrototypeOf ( V )](https://tc39.es/ecma262/#sec-object.prototype.isprototypeof)
    fn is_prototype_of(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(mut v) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        let object = to_object(agent, this_value)?;
        loop {
            let proto = v.internal_get_prototype_of(agent)?;
            let Some(proto) = proto else {
                return Ok(Value::Boolean(false));
            };
            if proto == object {
                return Ok(Value::Boolean(true));
            }
            v = proto;
        }
    }

    /// ### [20.1.3.4 Object.prototype.propertyIsEnumerable ( V )](https://tc39.es/ecma262/#sec-object.prototype.propertyisenumerable)
    fn property_is_enumerable(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let key = to_property_key(agent, arguments.get(0))?;
        let object = to_object(agent, this_value)?;
        let descriptor = object.internal_get_own_property(agent, key)?;
        Ok(Value::Boolean(
            descriptor.is_some_and(|descriptor| descriptor.enumerable.unwrap_or(false)),
        ))
    }

    /// ### [20.1.3.5 Object.prototype.toLocaleString ( )](https://tc39.es/ecma262/#sec-object.prototype.tolocalestring)
    fn to_locale_string(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let to_string_key = PropertyKey::from_static_str(agent, "toString");
        crate::ecmascript::abstract_operations::operations_on_objects::invoke(
            agent, this_value, to_string_key, &[],
        )
    }

    /// ### [20.1.3.6 Object.prototype.toString ( )](https://tc39.es/ecma262/#sec-object.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1-2. undefined and null have fixed spellings.
        match this_value {
            Value::Undefined => {
                return Ok(Value::from_static_str(agent, "[object Undefined]"))
            }
            Value::Null => return Ok(Value::from_static_str(agent, "[object Null]")),
            _ => {}
        }
        let object = to_object(agent, this_value)?;
        // 4-14. The builtin tag by object kind.
        let builtin_tag = match object {
            Object::Array(_) => "Array",
            Object::BoundFunction(_)
            | Object::BuiltinFunction(_)
            | Object::ECMAScriptFunction(_) => "Function",
            Object::Error(_) => "Error",
            Object::RegExp(_) => "RegExp",
            Object::Date(_) => "Date",
            Object::PrimitiveObject(primitive) => match primitive.data(agent) {
                PrimitiveObjectData::Boolean(_) => "Boolean",
                PrimitiveObjectData::Number(_) | PrimitiveObjectData::Integer(_) => "Number",
                PrimitiveObjectData::String(_) => "String",
                _ => "Object",
            },
            _ => "Object",
        };
        // 15. Let tag be ? Get(O, %Symbol.toStringTag%).
        let tag_key = PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::ToStringTag));
        let tag = get(agent, object, tag_key)?;
        let tag_text = match tag {
            Value::String(tag) => tag.to_string_lossy(agent).into_owned(),
            _ => builtin_tag.to_string(),
        };
        Ok(Value::from_string(agent, format!("[object {tag_text}]")))
    }

    /// ### [20.1.3.7 Object.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-object.prototype.valueof)
    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Ok(to_object(agent, this_value)?.into())
    }
}

/// The default `Object.prototype.toString` behaviour, shared with
/// `Array.prototype.toString`'s fallback path.
pub(crate) fn object_prototype_to_string(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    ObjectPrototype::to_string_method(agent, this_value, ArgumentsList(&[]))
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let object_prototype = intrinsics.object_prototype();
    let object_constructor = intrinsics.object();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, object_constructor)
        .with_prototype_property(object_prototype.into())
        .with_builtin_function_property::<ObjectAssign>()
        .with_builtin_function_property::<ObjectCreate>()
        .with_builtin_function_property::<ObjectDefineProperties>()
        .with_builtin_function_property::<ObjectDefineProperty>()
        .with_builtin_function_property::<ObjectEntries>()
        .with_builtin_function_property::<ObjectFreeze>()
        .with_builtin_function_property::<ObjectFromEntries>()
        .with_builtin_function_property::<ObjectGetOwnPropertyDescriptor>()
        .with_builtin_function_property::<ObjectGetOwnPropertyDescriptors>()
        .with_builtin_function_property::<ObjectGetOwnPropertyNames>()
        .with_builtin_function_property::<ObjectGetOwnPropertySymbols>()
        .with_builtin_function_property::<ObjectGetPrototypeOf>()
        .with_builtin_function_property::<ObjectIs>()
        .with_builtin_function_property::<ObjectIsExtensible>()
        .with_builtin_function_property::<ObjectIsFrozen>()
        .with_builtin_function_property::<ObjectIsSealed>()
        .with_builtin_function_property::<ObjectKeys>()
        .with_builtin_function_property::<ObjectPreventExtensions>()
        .with_builtin_function_property::<ObjectSeal>()
        .with_builtin_function_property::<ObjectSetPrototypeOf>()
        .with_builtin_function_property::<ObjectValues>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, object_prototype)
        .with_constructor_property(object_constructor)
        .with_builtin_function_property::<ObjectPrototypeHasOwnProperty>()
        .with_builtin_function_property::<ObjectPrototypeIsPrototypeOf>()
        .with_builtin_function_property::<ObjectPrototypePropertyIsEnumerable>()
        .with_builtin_function_property::<ObjectPrototypeToLocaleString>()
        .with_builtin_function_property::<ObjectPrototypeToString>()
        .with_builtin_function_property::<ObjectPrototypeValueOf>()
        .build();
}
