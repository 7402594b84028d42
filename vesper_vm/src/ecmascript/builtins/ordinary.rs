// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [10.1 Ordinary Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots)
//!
//! The ordinary algorithms. Exotic object kinds call back into these for
//! the parts of their behaviour they do not override.

use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::abstract_operations::testing_and_comparison::same_value;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::object::data::PropertyEntry;
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor, PropertyKey, Value,
};

/// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
pub(crate) fn ordinary_set_prototype_of(
    agent: &mut Agent,
    object: Object,
    prototype: Option<Object>,
) -> bool {
    // 1. Let current be O.[[Prototype]].
    let current = object.internal_prototype(agent);

    // 2. If SameValue(V, current) is true, return true.
    if prototype == current {
        return true;
    }

    // 3. Let extensible be O.[[Extensible]].
    // 4. If extensible is false, return false.
    if !object.internal_extensible(agent) {
        return false;
    }

    // 5. Let p be V. 6. Let done be false. 7. Repeat, while done is false,
    let mut p = prototype;
    while let Some(p_inner) = p {
        // b. If SameValue(p, O) is true, return false: a prototype cycle
        //    would be created.
        if p_inner == object {
            return false;
        }
        // c.i. If p.[[GetPrototypeOf]] is not the ordinary internal method,
        //      set done to true. Proxies and module namespaces define their
        //      own.
        if matches!(p_inner, Object::Proxy(_) | Object::Module(_)) {
            break;
        }
        // c.ii. Set p to p.[[Prototype]].
        p = p_inner.internal_prototype(agent);
    }

    // 8. Set O.[[Prototype]] to V.
    object.internal_set_prototype(agent, prototype);

    // 9. Return true.
    true
}

/// ### [10.1.5.1 OrdinaryGetOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinarygetownproperty)
pub(crate) fn ordinary_get_own_property(
    agent: &Agent,
    backing_object: OrdinaryObject,
    property_key: PropertyKey,
) -> Option<PropertyDescriptor> {
    // 1. If O does not have an own property with key P, return undefined.
    // 2-8. Expand the slot back into a descriptor.
    agent[backing_object]
        .property_storage
        .get(property_key)
        .map(|entry| entry.to_descriptor())
}

/// ### [10.1.6.1 OrdinaryDefineOwnProperty ( O, P, Desc )](https://tc39.es/ecma262/#sec-ordinarydefineownproperty)
pub(crate) fn ordinary_define_own_property(
    agent: &mut Agent,
    backing_object: OrdinaryObject,
    property_key: PropertyKey,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    // 1. Let current be ! O.[[GetOwnProperty]](P).
    let current = ordinary_get_own_property(agent, backing_object, property_key);
    // 2. Let extensible be ! IsExtensible(O).
    let extensible = backing_object.internal_extensible(agent);
    // 3. Return ValidateAndApplyPropertyDescriptor(O, P, extensible, Desc,
    //    current).
    Ok(validate_and_apply_property_descriptor(
        agent,
        Some(backing_object),
        property_key,
        extensible,
        descriptor,
        current,
    ))
}

/// ### [10.1.6.2 IsCompatiblePropertyDescriptor ( Extensible, Desc, Current )](https://tc39.es/ecma262/#sec-iscompatiblepropertydescriptor)
pub(crate) fn is_compatible_property_descriptor(
    agent: &mut Agent,
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    let property_key = PropertyKey::from_static_str(agent, "");
    validate_and_apply_property_descriptor(
        agent,
        None,
        property_key,
        extensible,
        descriptor,
        current,
    )
}

/// ### [10.1.6.3 ValidateAndApplyPropertyDescriptor ( O, P, extensible, Desc, current )](https://tc39.es/ecma262/#sec-validateandapplypropertydescriptor)
fn validate_and_apply_property_descriptor(
    agent: &mut Agent,
    object: Option<OrdinaryObject>,
    property_key: PropertyKey,
    extensible: bool,
    descriptor: PropertyDescriptor,
    current: Option<PropertyDescriptor>,
) -> bool {
    // 2. If current is undefined, then
    let Some(current) = current else {
        // a. If extensible is false, return false.
        if !extensible {
            return false;
        }
        // b. If O is undefined, return true.
        let Some(object) = object else {
            return true;
        };
        // c-d. Create the property with defaulted fields.
        let entry = if descriptor.is_accessor_descriptor() {
            PropertyEntry::from_descriptor(
                property_key,
                &PropertyDescriptor {
                    get: Some(descriptor.get.unwrap_or(None)),
                    set: Some(descriptor.set.unwrap_or(None)),
                    enumerable: Some(descriptor.enumerable.unwrap_or(false)),
                    configurable: Some(descriptor.configurable.unwrap_or(false)),
                    ..Default::default()
                },
            )
        } else {
            PropertyEntry::from_descriptor(
                property_key,
                &PropertyDescriptor {
                    value: Some(descriptor.value.unwrap_or(Value::Undefined)),
                    writable: Some(descriptor.writable.unwrap_or(false)),
                    enumerable: Some(descriptor.enumerable.unwrap_or(false)),
                    configurable: Some(descriptor.configurable.unwrap_or(false)),
                    ..Default::default()
                },
            )
        };
        agent[object].property_storage.set(entry);
        // e. Return true.
        return true;
    };

    // 3. Assert: current is a fully populated Property Descriptor.
    debug_assert!(current.is_fully_populated());

    // 4. If Desc does not have any fields, return true.
    if descriptor.value.is_none()
        && descriptor.writable.is_none()
        && descriptor.get.is_none()
        && descriptor.set.is_none()
        && descriptor.enumerable.is_none()
        && descriptor.configurable.is_none()
    {
        return true;
    }

    let current_configurable = current.configurable.unwrap_or(false);
    let current_enumerable = current.enumerable.unwrap_or(false);

    // 5. If current.[[Configurable]] is false, then
    if !current_configurable {
        // a. If Desc has a [[Configurable]] field and
        //    Desc.[[Configurable]] is true, return false.
        if descriptor.configurable == Some(true) {
            return false;
        }
        // b. If Desc has an [[Enumerable]] field and the fields differ,
        //    return false.
        if let Some(enumerable) = descriptor.enumerable {
            if enumerable != current_enumerable {
                return false;
            }
        }
        // c. If IsGenericDescriptor(Desc) is false and the descriptor
        //    kinds differ, return false.
        if !descriptor.is_generic_descriptor()
            && descriptor.is_accessor_descriptor() != current.is_accessor_descriptor()
        {
            return false;
        }
        // d. If current is an accessor descriptor, the functions must
        //    match.
        if current.is_accessor_descriptor() {
            if let Some(get) = descriptor.get {
                if get != current.get.unwrap_or(None) {
                    return false;
                }
            }
            if let Some(set) = descriptor.set {
                if set != current.set.unwrap_or(None) {
                    return false;
                }
            }
        } else if current.writable == Some(false) {
            // e. Else if current.[[Writable]] is false, then
            // i. If Desc has a [[Writable]] field and Desc.[[Writable]] is
            //    true, return false.
            if descriptor.writable == Some(true) {
                return false;
            }
            // ii. The values must agree.
            if let Some(value) = descriptor.value {
                if !same_value(agent, value, current.value.unwrap_or(Value::Undefined)) {
                    return false;
                }
            }
        }
    }

    // 6. If O is not undefined, apply the changes.
    if let Some(object) = object {
        let mut merged = current;
        if descriptor.is_data_descriptor() && merged.is_accessor_descriptor() {
            // Converting an accessor to a data property.
            merged = PropertyDescriptor {
                value: Some(descriptor.value.unwrap_or(Value::Undefined)),
                writable: Some(descriptor.writable.unwrap_or(false)),
                enumerable: Some(descriptor.enumerable.unwrap_or(current_enumerable)),
                configurable: Some(descriptor.configurable.unwrap_or(current_configurable)),
                ..Default::default()
            };
        } else if descriptor.is_accessor_descriptor() && merged.is_data_descriptor() {
            // Converting a data property to an accessor.
            merged = PropertyDescriptor {
                get: Some(descriptor.get.unwrap_or(None)),
                set: Some(descriptor.set.unwrap_or(None)),
                enumerable: Some(descriptor.enumerable.unwrap_or(current_enumerable)),
                configurable: Some(descriptor.configurable.unwrap_or(current_configurable)),
                ..Default::default()
            };
        } else {
            // Same-kind update.
            if let Some(value) = descriptor.value {
                merged.value = Some(value);
            }
            if let Some(writable) = descriptor.writable {
                merged.writable = Some(writable);
            }
            if let Some(get) = descriptor.get {
                merged.get = Some(get);
            }
            if let Some(set) = descriptor.set {
                merged.set = Some(set);
            }
            if let Some(enumerable) = descriptor.enumerable {
                merged.enumerable = Some(enumerable);
            }
            if let Some(configurable) = descriptor.configurable {
                merged.configurable = Some(configurable);
            }
        }
        let entry = PropertyEntry::from_descriptor(property_key, &merged);
        agent[object].property_storage.set(entry);
    }

    // 7. Return true.
    true
}

/// ### [10.1.7.1 OrdinaryHasProperty ( O, P )](https://tc39.es/ecma262/#sec-ordinaryhasproperty)
pub(crate) fn ordinary_has_property(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
    let has_own = object.internal_get_own_property(agent, property_key)?;
    // 2. If hasOwn is not undefined, return true.
    if has_own.is_some() {
        return Ok(true);
    }
    // 3. Let parent be ? O.[[GetPrototypeOf]]().
    let parent = object.internal_get_prototype_of(agent)?;
    // 4. If parent is not null, return ? parent.[[HasProperty]](P).
    if let Some(parent) = parent {
        return parent.internal_has_property(agent, property_key);
    }
    // 5. Return false.
    Ok(false)
}

/// ### [10.1.8.1 OrdinaryGet ( O, P, Receiver )](https://tc39.es/ecma262/#sec-ordinaryget)
pub(crate) fn ordinary_get(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    receiver: Value,
) -> JsResult<Value> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let desc = object.internal_get_own_property(agent, property_key)?;
    // 2. If desc is undefined, then
    let Some(desc) = desc else {
        // a. Let parent be ? O.[[GetPrototypeOf]]().
        let parent = object.internal_get_prototype_of(agent)?;
        // b. If parent is null, return undefined.
        let Some(parent) = parent else {
            return Ok(Value::Undefined);
        };
        // c. Return ? parent.[[Get]](P, Receiver).
        return parent.internal_get(agent, property_key, receiver);
    };
    // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
    if desc.is_data_descriptor() {
        return Ok(desc.value.unwrap_or(Value::Undefined));
    }
    // 4. Assert: IsAccessorDescriptor(desc) is true.
    // 5. Let getter be desc.[[Get]].
    // 6. If getter is undefined, return undefined.
    let Some(Some(getter)) = desc.get else {
        return Ok(Value::Undefined);
    };
    // 7. Return ? Call(getter, Receiver).
    call_function(agent, getter.into_value(), receiver, &[])
}

/// ### [10.1.9.2 OrdinarySetWithOwnDescriptor ( O, P, V, Receiver, ownDesc )](https://tc39.es/ecma262/#sec-ordinarysetwithowndescriptor)
pub(crate) fn ordinary_set(
    agent: &mut Agent,
    object: Object,
    property_key: PropertyKey,
    value: Value,
    receiver: Value,
) -> JsResult<bool> {
    // 1. Let ownDesc be ? O.[[GetOwnProperty]](P).
    let own_desc = object.internal_get_own_property(agent, property_key)?;
    // 2. If ownDesc is undefined, then
    let own_desc = match own_desc {
        None => {
            // a. Let parent be ? O.[[GetPrototypeOf]]().
            let parent = object.internal_get_prototype_of(agent)?;
            // b. If parent is not null, return
            //    ? parent.[[Set]](P, V, Receiver).
            if let Some(parent) = parent {
                return parent.internal_set(agent, property_key, value, receiver);
            }
            // c. Else, let ownDesc be the default data descriptor.
            PropertyDescriptor::new_data_descriptor(Value::Undefined)
        }
        Some(own_desc) => own_desc,
    };
    // 3. If IsDataDescriptor(ownDesc) is true, then
    if own_desc.is_data_descriptor() {
        // a. If ownDesc.[[Writable]] is false, return false.
        if !own_desc.writable.unwrap_or(false) {
            return Ok(false);
        }
        // b. If Receiver is not an Object, return false.
        let Value::Object(receiver_object) = receiver else {
            return Ok(false);
        };
        // c. Let existingDescriptor be
        //    ? Receiver.[[GetOwnProperty]](P).
        let existing_descriptor =
            receiver_object.internal_get_own_property(agent, property_key)?;
        // d. If existingDescriptor is not undefined, then
        if let Some(existing_descriptor) = existing_descriptor {
            // i. If IsAccessorDescriptor(existingDescriptor) is true,
            //    return false.
            if existing_descriptor.is_accessor_descriptor() {
                return Ok(false);
            }
            // ii. If existingDescriptor.[[Writable]] is false, return
            //     false.
            if !existing_descriptor.writable.unwrap_or(false) {
                return Ok(false);
            }
            // iii-iv. Define the value on the receiver.
            let value_desc = PropertyDescriptor {
                value: Some(value),
                ..Default::default()
            };
            return receiver_object.internal_define_own_property(agent, property_key, value_desc);
        }
        // e. Else, perform ? CreateDataProperty(Receiver, P, V).
        return crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
            agent,
            receiver_object,
            property_key,
            value,
        );
    }
    // 4. Assert: IsAccessorDescriptor(ownDesc) is true.
    // 5. Let setter be ownDesc.[[Set]].
    // 6. If setter is undefined, return false.
    let Some(Some(setter)) = own_desc.set else {
        return Ok(false);
    };
    // 7. Perform ? Call(setter, Receiver, « V »).
    call_function(agent, setter.into_value(), receiver, &[value])?;
    // 8. Return true.
    Ok(true)
}

/// ### [10.1.10.1 OrdinaryDelete ( O, P )](https://tc39.es/ecma262/#sec-ordinarydelete)
pub(crate) fn ordinary_delete(
    agent: &mut Agent,
    backing_object: OrdinaryObject,
    property_key: PropertyKey,
) -> JsResult<bool> {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    let Some(entry) = agent[backing_object].property_storage.get(property_key) else {
        // 2. If desc is undefined, return true.
        return Ok(true);
    };
    // 3. If desc.[[Configurable]] is true, remove the property and return
    //    true.
    if entry.is_configurable() {
        agent[backing_object].property_storage.remove(property_key);
        return Ok(true);
    }
    // 4. Return false.
    Ok(false)
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
pub(crate) fn ordinary_own_property_keys(
    agent: &Agent,
    backing_object: OrdinaryObject,
) -> Vec<PropertyKey> {
    agent[backing_object].property_storage.keys_ordered()
}

/// ### [10.1.12 OrdinaryObjectCreate ( proto \[ , additionalInternalSlotsList \] )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
pub(crate) fn ordinary_object_create(
    agent: &mut Agent,
    prototype: Option<Object>,
) -> OrdinaryObject {
    OrdinaryObject::create_object(agent, prototype, true)
}
