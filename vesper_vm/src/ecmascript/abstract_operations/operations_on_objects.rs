// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    Function, InternalMethods, Object, PropertyDescriptor, PropertyKey, Value,
};

use super::testing_and_comparison::{is_callable, is_constructor};
use super::type_conversion::{to_length, to_object};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
pub(crate) fn get(agent: &mut Agent, o: impl Into<Object>, p: PropertyKey) -> JsResult<Value> {
    let o = o.into();
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, o.into())
}

/// ### [7.3.3 GetV ( V, P )](https://tc39.es/ecma262/#sec-getv)
pub(crate) fn get_v(agent: &mut Agent, v: Value, p: PropertyKey) -> JsResult<Value> {
    // 1. Let O be ? ToObject(V).
    let o = to_object(agent, v)?;
    // 2. Return ? O.[[Get]](P, V).
    o.internal_get(agent, p, v)
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
pub(crate) fn set(
    agent: &mut Agent,
    o: impl Into<Object>,
    p: PropertyKey,
    v: Value,
    throw: bool,
) -> JsResult<()> {
    let o = o.into();
    // 1. Let success be ? O.[[Set]](P, V, O).
    let success = o.internal_set(agent, p, v, o.into())?;
    // 2. If success is false and Throw is true, throw a TypeError
    //    exception.
    if !success && throw {
        let name = p.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Cannot assign to read only property '{name}'"),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.5 CreateDataProperty ( O, P, V )](https://tc39.es/ecma262/#sec-createdataproperty)
pub(crate) fn create_data_property(
    agent: &mut Agent,
    object: impl Into<Object>,
    property_key: PropertyKey,
    value: Value,
) -> JsResult<bool> {
    // 1. Let newDesc be the PropertyDescriptor { [[Value]]: V,
    //    [[Writable]]: true, [[Enumerable]]: true, [[Configurable]]: true }.
    let new_desc = PropertyDescriptor::new_data_descriptor(value);
    // 2. Return ? O.[[DefineOwnProperty]](P, newDesc).
    object
        .into()
        .internal_define_own_property(agent, property_key, new_desc)
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub(crate) fn create_data_property_or_throw(
    agent: &mut Agent,
    object: impl Into<Object>,
    property_key: PropertyKey,
    value: Value,
) -> JsResult<()> {
    let success = create_data_property(agent, object, property_key, value)?;
    if !success {
        let name = property_key.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Cannot define property '{name}'"),
        ));
    }
    Ok(())
}

/// ### [7.3.8 DefinePropertyOrThrow ( O, P, desc )](https://tc39.es/ecma262/#sec-definepropertyorthrow)
pub(crate) fn define_property_or_throw(
    agent: &mut Agent,
    object: impl Into<Object>,
    property_key: PropertyKey,
    desc: PropertyDescriptor,
) -> JsResult<()> {
    // 1. Let success be ? O.[[DefineOwnProperty]](P, desc).
    let success = object
        .into()
        .internal_define_own_property(agent, property_key, desc)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        let name = property_key.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Cannot redefine property '{name}'"),
        ));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.9 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub(crate) fn delete_property_or_throw(
    agent: &mut Agent,
    object: impl Into<Object>,
    property_key: PropertyKey,
) -> JsResult<()> {
    // 1. Let success be ? O.[[Delete]](P).
    let success = object.into().internal_delete(agent, property_key)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        let name = property_key.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Cannot delete property '{name}'"),
        ));
    }
    Ok(())
}

/// ### [7.3.11 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub(crate) fn has_property(
    agent: &mut Agent,
    o: impl Into<Object>,
    p: PropertyKey,
) -> JsResult<bool> {
    // 1. Return ? O.[[HasProperty]](P).
    o.into().internal_has_property(agent, p)
}

/// ### [7.3.12 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub(crate) fn has_own_property(
    agent: &mut Agent,
    o: impl Into<Object>,
    p: PropertyKey,
) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let desc = o.into().internal_get_own_property(agent, p)?;
    // 2. If desc is undefined, return false; otherwise return true.
    Ok(desc.is_some())
}

/// ### [7.3.10 GetMethod ( V, P )](https://tc39.es/ecma262/#sec-getmethod)
pub(crate) fn get_method(
    agent: &mut Agent,
    v: Value,
    p: PropertyKey,
) -> JsResult<Option<Object>> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 2. If func is either undefined or null, return undefined.
    if func.is_nullish() {
        return Ok(None);
    }
    // 3. If IsCallable(func) is false, throw a TypeError exception.
    let Some(func) = is_callable(agent, func) else {
        let name = p.as_display_string(agent);
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("'{name}' is not a function"),
        ));
    };
    // 4. Return func.
    Ok(Some(func))
}

/// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
pub(crate) fn call_function(
    agent: &mut Agent,
    f: Value,
    v: Value,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. If IsCallable(F) is false, throw a TypeError exception.
    let Some(f) = is_callable(agent, f) else {
        let repr = f.string_repr(agent);
        let repr = repr.to_string_lossy(agent).into_owned();
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("{repr} is not a function"),
        ));
    };
    // 2. Return ? F.[[Call]](V, argumentsList).
    f.internal_call(agent, v, arguments_list)
}

/// ### [7.3.15 Construct ( F \[ , argumentsList \[ , newTarget \] \] )](https://tc39.es/ecma262/#sec-construct)
pub(crate) fn construct(
    agent: &mut Agent,
    f: Object,
    arguments_list: &[Value],
    new_target: Option<Object>,
) -> JsResult<Object> {
    // 1. If newTarget is not present, set newTarget to F.
    let new_target = new_target.unwrap_or(f);
    // 2. Return ? F.[[Construct]](argumentsList, newTarget).
    f.internal_construct(agent, arguments_list, new_target)
}

/// ### [7.3.20 Invoke ( V, P \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-invoke)
pub(crate) fn invoke(
    agent: &mut Agent,
    v: Value,
    p: PropertyKey,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Let func be ? GetV(V, P).
    let func = get_v(agent, v, p)?;
    // 2. Return ? Call(func, V, argumentsList).
    call_function(agent, func, v, arguments_list)
}

/// ### [7.3.18 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub(crate) fn length_of_array_like(agent: &mut Agent, obj: Object) -> JsResult<i64> {
    // Fast path: array lengths are known exactly.
    if let Object::Array(array) = obj {
        return Ok(agent[array].elements.len() as i64);
    }
    // 1. Return ℝ(? ToLength(? Get(obj, "length"))).
    let length_key = PropertyKey::from_static_str(agent, "length");
    let length = get(agent, obj, length_key)?;
    to_length(agent, length)
}

/// ### [7.3.19 CreateListFromArrayLike ( obj )](https://tc39.es/ecma262/#sec-createlistfromarraylike)
pub(crate) fn create_list_from_array_like(agent: &mut Agent, obj: Value) -> JsResult<Vec<Value>> {
    // 1. If obj is not an Object, throw a TypeError exception.
    let Value::Object(obj) = obj else {
        return Err(
            agent.throw_exception(ExceptionType::TypeError, "Argument is not an object")
        );
    };
    // 2. Let len be ? LengthOfArrayLike(obj).
    let len = length_of_array_like(agent, obj)?;
    // 3-4. Walk the indexes in order.
    let mut list = Vec::with_capacity(len.min(4096) as usize);
    for index in 0..len {
        let key = PropertyKey::Integer(index as u32);
        let next = get(agent, obj, key)?;
        list.push(next);
    }
    // 5. Return list.
    Ok(list)
}

/// ### [7.3.25 GetFunctionRealm ( obj )](https://tc39.es/ecma262/#sec-getfunctionrealm)
pub(crate) fn get_function_realm(agent: &mut Agent, obj: Object) -> JsResult<RealmIdentifier> {
    match obj {
        // 2. If obj has a [[Realm]] internal slot, return obj.[[Realm]].
        Object::BuiltinFunction(f) => Ok(agent[f].realm),
        Object::ECMAScriptFunction(f) => Ok(agent[f].realm),
        // 3. If obj is a bound function exotic object, recurse into the
        //    target.
        Object::BoundFunction(f) => {
            let target = agent[f].bound_target_function;
            get_function_realm(agent, target.into_object())
        }
        // 4. If obj is a Proxy exotic object, recurse into its target; a
        //    revoked proxy throws.
        Object::Proxy(proxy) => {
            let Some(target) = agent[proxy].target else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Cannot perform operation on a revoked proxy",
                ));
            };
            get_function_realm(agent, target)
        }
        // 5. Return the current Realm Record.
        _ => Ok(agent.current_realm_id()),
    }
}

/// ### [10.1.13 OrdinaryCreateFromConstructor ( constructor, intrinsicDefaultProto )](https://tc39.es/ecma262/#sec-ordinarycreatefromconstructor)
pub(crate) fn ordinary_create_from_constructor(
    agent: &mut Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
) -> JsResult<crate::ecmascript::types::OrdinaryObject> {
    // 1. Let proto be
    //    ? GetPrototypeFromConstructor(constructor, intrinsicDefaultProto).
    let proto = get_prototype_from_constructor(agent, constructor, intrinsic_default_proto)?;
    // 2. Return OrdinaryObjectCreate(proto).
    Ok(ordinary_object_create(agent, Some(proto)))
}

/// ### [10.1.14 GetPrototypeFromConstructor ( constructor, intrinsicDefaultProto )](https://tc39.es/ecma262/#sec-getprototypefromconstructor)
pub(crate) fn get_prototype_from_constructor(
    agent: &mut Agent,
    constructor: Object,
    intrinsic_default_proto: ProtoIntrinsics,
) -> JsResult<Object> {
    // 1. Let proto be ? Get(constructor, "prototype").
    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
    let proto = get(agent, constructor, prototype_key)?;
    match proto {
        Value::Object(proto) => Ok(proto),
        // 2. If proto is not an Object, use the constructor realm's
        //    intrinsic default prototype.
        _ => {
            let realm = get_function_realm(agent, constructor)?;
            Ok(agent
                .get_realm(realm)
                .intrinsics()
                .get_proto_intrinsic(intrinsic_default_proto))
        }
    }
}

/// ### [7.3.23 EnumerableOwnProperties ( O, kind )](https://tc39.es/ecma262/#sec-enumerableownproperties)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumerablePropertiesKind {
    Key,
    Value,
    KeyValue,
}

pub(crate) fn enumerable_own_properties(
    agent: &mut Agent,
    o: Object,
    kind: EnumerablePropertiesKind,
) -> JsResult<Vec<Value>> {
    // 1. Let ownKeys be ? O.[[OwnPropertyKeys]]().
    let own_keys = o.internal_own_property_keys(agent)?;
    // 2. Let results be a new empty List.
    let mut results = Vec::with_capacity(own_keys.len());
    // 3. For each element key of ownKeys, do
    for key in own_keys {
        // a. If key is a Symbol, continue.
        if matches!(key, PropertyKey::Symbol(_)) {
            continue;
        }
        // b. Let desc be ? O.[[GetOwnProperty]](key).
        let desc = o.internal_get_own_property(agent, key)?;
        // c. If desc is not undefined and desc.[[Enumerable]] is true, then
        let Some(desc) = desc else { continue };
        if !desc.enumerable.unwrap_or(false) {
            continue;
        }
        match kind {
            // i. If kind is KEY, append key.
            EnumerablePropertiesKind::Key => {
                results.push(key.into_value(agent));
            }
            // ii. Else fetch the value.
            EnumerablePropertiesKind::Value => {
                let value = get(agent, o, key)?;
                results.push(value);
            }
            EnumerablePropertiesKind::KeyValue => {
                let value = get(agent, o, key)?;
                let key_value = key.into_value(agent);
                let entry = crate::ecmascript::builtins::array::create_array_from_list(
                    agent,
                    &[key_value, value],
                );
                results.push(entry.into());
            }
        }
    }
    // 4. Return results.
    Ok(results)
}

/// ### [7.3.16 SetIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-setintegritylevel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntegrityLevel {
    Sealed,
    Frozen,
}

pub(crate) fn set_integrity_level(
    agent: &mut Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let status be ? O.[[PreventExtensions]]().
    let status = o.internal_prevent_extensions(agent)?;
    // 2. If status is false, return false.
    if !status {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    for k in keys {
        match level {
            // 4. If level is SEALED, set [[Configurable]] to false.
            IntegrityLevel::Sealed => {
                define_property_or_throw(
                    agent,
                    o,
                    k,
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    },
                )?;
            }
            // 5. Else, also clear [[Writable]] on data descriptors.
            IntegrityLevel::Frozen => {
                let current_desc = o.internal_get_own_property(agent, k)?;
                let Some(current_desc) = current_desc else {
                    continue;
                };
                let desc = if current_desc.is_accessor_descriptor() {
                    PropertyDescriptor {
                        configurable: Some(false),
                        ..Default::default()
                    }
                } else {
                    PropertyDescriptor {
                        configurable: Some(false),
                        writable: Some(false),
                        ..Default::default()
                    }
                };
                define_property_or_throw(agent, o, k, desc)?;
            }
        }
    }
    // 6. Return true.
    Ok(true)
}

/// ### [7.3.17 TestIntegrityLevel ( O, level )](https://tc39.es/ecma262/#sec-testintegritylevel)
pub(crate) fn test_integrity_level(
    agent: &mut Agent,
    o: Object,
    level: IntegrityLevel,
) -> JsResult<bool> {
    // 1. Let extensible be ? IsExtensible(O).
    // 2. If extensible is true, return false.
    if o.internal_is_extensible(agent)? {
        return Ok(false);
    }
    // 3. Let keys be ? O.[[OwnPropertyKeys]]().
    let keys = o.internal_own_property_keys(agent)?;
    for k in keys {
        // a. Let currentDesc be ? O.[[GetOwnProperty]](k).
        let Some(current_desc) = o.internal_get_own_property(agent, k)? else {
            continue;
        };
        // b. If currentDesc.[[Configurable]] is true, return false.
        if current_desc.configurable.unwrap_or(false) {
            return Ok(false);
        }
        // c. If level is FROZEN and IsDataDescriptor(currentDesc) is true
        //    with [[Writable]]: true, return false.
        if level == IntegrityLevel::Frozen
            && current_desc.is_data_descriptor()
            && current_desc.writable.unwrap_or(false)
        {
            return Ok(false);
        }
    }
    // 4. Return true.
    Ok(true)
}

/// ### [7.3.21 SpeciesConstructor ( O, defaultConstructor )](https://tc39.es/ecma262/#sec-speciesconstructor)
pub(crate) fn species_constructor(
    agent: &mut Agent,
    o: Object,
    default_constructor: Object,
) -> JsResult<Object> {
    use crate::ecmascript::types::Symbol;
    use crate::heap::WellKnownSymbolIndexes;
    // 1. Let C be ? Get(O, "constructor").
    let constructor_key = PropertyKey::from_static_str(agent, "constructor");
    let c = get(agent, o, constructor_key)?;
    // 2. If C is undefined, return defaultConstructor.
    if c.is_undefined() {
        return Ok(default_constructor);
    }
    // 3. If C is not an Object, throw a TypeError exception.
    let Value::Object(c) = c else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Constructor property is not an object",
        ));
    };
    // 4. Let S be ? Get(C, %Symbol.species%).
    let species_key = PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::Species));
    let s = get(agent, c, species_key)?;
    // 5. If S is either undefined or null, return defaultConstructor.
    if s.is_nullish() {
        return Ok(default_constructor);
    }
    // 6. If IsConstructor(S) is true, return S.
    if let Some(s) = is_constructor(agent, s) {
        return Ok(s);
    }
    // 7. Throw a TypeError exception.
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        "Species constructor is not a constructor",
    ))
}

/// Copy the data properties of `source` onto `target`, excluding
/// `excluded_items` keys; used by `Object.assign` and object spread.
pub(crate) fn copy_data_properties(
    agent: &mut Agent,
    target: Object,
    source: Value,
    excluded_items: &[PropertyKey],
) -> JsResult<()> {
    // 1. If source is either undefined or null, return unused.
    if source.is_nullish() {
        return Ok(());
    }
    // 2. Let from be ! ToObject(source).
    let from = to_object(agent, source)?;
    // 3. Let keys be ? from.[[OwnPropertyKeys]]().
    let keys = from.internal_own_property_keys(agent)?;
    for next_key in keys {
        if excluded_items.contains(&next_key) {
            continue;
        }
        let desc = from.internal_get_own_property(agent, next_key)?;
        if let Some(desc) = desc {
            if desc.enumerable.unwrap_or(false) {
                let prop_value = get(agent, from, next_key)?;
                create_data_property_or_throw(agent, target, next_key, prop_value)?;
            }
        }
    }
    Ok(())
}
