// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
//!
//! An Array is an exotic object that gives special treatment to array index
//! property keys and to its `length` property. Elements live in a dense
//! vector with `None` holes; element descriptors are split off to the side
//! for the rare properties with non-default attributes.

use core::ops::{Index, IndexMut};

use ahash::AHashMap;

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::object::data::{ElementDescriptor, PropertyEntry};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::indexes::{ArrayIndex, ObjectIndex};
use crate::heap::CreateHeapData;

use super::ordinary::{ordinary_define_own_property, ordinary_get_own_property};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Array(pub(crate) ArrayIndex);

#[derive(Debug, Clone, Default)]
pub struct ArrayHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// The elements; `None` is a hole.
    pub(crate) elements: Vec<Option<Value>>,
    /// Attributes for elements that have been reconfigured away from the
    /// default data descriptor.
    pub(crate) element_descriptors: Option<AHashMap<u32, ElementDescriptor>>,
    /// Whether the `length` property is still writable.
    pub(crate) length_writable: bool,
}

impl Index<Array> for Agent {
    type Output = ArrayHeapData;

    fn index(&self, index: Array) -> &Self::Output {
        self.heap
            .arrays
            .get(index.0.into_index())
            .expect("Array out of bounds")
            .as_ref()
            .expect("Array slot empty")
    }
}

impl IndexMut<Array> for Agent {
    fn index_mut(&mut self, index: Array) -> &mut Self::Output {
        self.heap
            .arrays
            .get_mut(index.0.into_index())
            .expect("Array out of bounds")
            .as_mut()
            .expect("Array slot empty")
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        Object::Array(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Object(Object::Array(value))
    }
}

impl Array {
    pub(crate) fn len(self, agent: &Agent) -> u32 {
        agent[self].elements.len() as u32
    }

    /// The element at `index`, seen through any accessor descriptor.
    pub(crate) fn element_descriptor(
        self,
        agent: &Agent,
        index: u32,
    ) -> Option<&ElementDescriptor> {
        agent[self]
            .element_descriptors
            .as_ref()
            .and_then(|descriptors| descriptors.get(&index))
    }
}

/// ### [10.4.2.2 ArrayCreate ( length \[ , proto \] )](https://tc39.es/ecma262/#sec-arraycreate)
pub(crate) fn array_create(
    agent: &mut Agent,
    length: usize,
    proto: Option<Object>,
) -> JsResult<Array> {
    // 1. If length > 2^32 - 1, throw a RangeError exception.
    if length > (u32::MAX - 1) as usize {
        return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid array length"));
    }
    // 2-5. Create the exotic object with length elements, all holes.
    let mut elements = Vec::new();
    elements.resize(length, None);
    let array = Array(agent.heap.create(ArrayHeapData {
        object_index: None,
        elements,
        element_descriptors: None,
        length_writable: true,
    }));
    if let Some(proto) = proto {
        if proto
            != agent
                .current_realm()
                .intrinsics()
                .get_proto_intrinsic(ProtoIntrinsics::Array)
        {
            let backing_object = OrdinaryObject::create_object(agent, Some(proto), true);
            array.set_backing_object(agent, backing_object);
        }
    }
    // 6. Return A.
    Ok(array)
}

/// ### [7.3.17 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub(crate) fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Array {
    let array = Array(agent.heap.create(ArrayHeapData {
        object_index: None,
        elements: elements.iter().map(|element| Some(*element)).collect(),
        element_descriptors: None,
        length_writable: true,
    }));
    array
}

impl InternalSlots for Array {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Array;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Array {
    /// ### [10.4.2.1 \[\[GetOwnProperty\]\] and \[\[DefineOwnProperty\]\]](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        if is_length_key(agent, property_key) {
            let data = &agent[self];
            return Ok(Some(PropertyDescriptor {
                value: Some(Value::from(data.elements.len() as u32)),
                writable: Some(data.length_writable),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            }));
        }
        if let PropertyKey::Integer(index) = property_key {
            let data = &agent[self];
            let Some(slot) = data.elements.get(index as usize) else {
                return Ok(None);
            };
            let descriptor = self.element_descriptor(agent, index).copied();
            let value = *slot;
            if value.is_none() && descriptor.is_none() {
                // A hole.
                return Ok(None);
            }
            let entry = PropertyEntry {
                key: property_key,
                value,
                descriptor,
            };
            return Ok(Some(entry.to_descriptor()));
        }
        Ok(self
            .get_backing_object(agent)
            .and_then(|backing_object| ordinary_get_own_property(agent, backing_object, property_key)))
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 2. If P is "length", then ArraySetLength(A, Desc).
        if is_length_key(agent, property_key) {
            return array_set_length(agent, self, property_descriptor);
        }
        // 3. Else if P is an array index, then
        if let PropertyKey::Integer(index) = property_key {
            return array_define_element(agent, self, index, property_descriptor);
        }
        // 4. Return ? OrdinaryDefineOwnProperty(A, P, Desc).
        let backing_object = self.get_or_create_backing_object(agent);
        ordinary_define_own_property(agent, backing_object, property_key, property_descriptor)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        if is_length_key(agent, property_key) {
            return Ok(false);
        }
        if let PropertyKey::Integer(index) = property_key {
            let configurable = agent[self]
                .element_descriptors
                .as_ref()
                .and_then(|descriptors| descriptors.get(&index))
                .is_none_or(|descriptor| descriptor.is_configurable());
            if !configurable {
                return Ok(false);
            }
            let data = &mut agent[self];
            if let Some(slot) = data.elements.get_mut(index as usize) {
                *slot = None;
            }
            if let Some(descriptors) = data.element_descriptors.as_mut() {
                descriptors.remove(&index);
            }
            return Ok(true);
        }
        match self.get_backing_object(agent) {
            Some(backing_object) => {
                super::ordinary::ordinary_delete(agent, backing_object, property_key)
            }
            None => Ok(true),
        }
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let data = &agent[self];
        let mut keys = Vec::with_capacity(data.elements.len() + 1);
        for (index, slot) in data.elements.iter().enumerate() {
            let index = index as u32;
            if slot.is_some()
                || data
                    .element_descriptors
                    .as_ref()
                    .is_some_and(|descriptors| descriptors.contains_key(&index))
            {
                keys.push(PropertyKey::Integer(index));
            }
        }
        let length_key = PropertyKey::from_static_str(agent, "length");
        keys.push(length_key);
        if let Some(backing_object) = self.get_backing_object(agent) {
            keys.extend(super::ordinary::ordinary_own_property_keys(
                agent,
                backing_object,
            ));
        }
        Ok(keys)
    }
}

fn is_length_key(agent: &mut Agent, property_key: PropertyKey) -> bool {
    let length_key = PropertyKey::from_static_str(agent, "length");
    property_key == length_key
}

/// Element branch of the Array `[[DefineOwnProperty]]` algorithm.
fn array_define_element(
    agent: &mut Agent,
    array: Array,
    index: u32,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    let old_len = agent[array].elements.len() as u32;
    let length_writable = agent[array].length_writable;
    // 3.c-e. If index ≥ oldLen and oldLenDesc.[[Writable]] is false,
    //    return false.
    if index >= old_len && !length_writable {
        return Ok(false);
    }
    // Validate against the current element, if any.
    let current = array
        .internal_get_own_property(agent, PropertyKey::Integer(index))
        .unwrap();
    let extensible = array.internal_extensible(agent);
    if let Some(current) = &current {
        if !current.configurable.unwrap_or(false) {
            // Non-configurable elements only admit compatible updates.
            if !super::ordinary::is_compatible_property_descriptor(
                agent,
                extensible,
                descriptor,
                Some(*current),
            ) {
                return Ok(false);
            }
        }
    } else if !extensible && index >= old_len {
        return Ok(false);
    }

    // Merge with the current descriptor the way ValidateAndApply would.
    let mut merged = current.unwrap_or(PropertyDescriptor {
        value: Some(Value::Undefined),
        writable: Some(true),
        enumerable: Some(true),
        configurable: Some(true),
        ..Default::default()
    });
    if descriptor.is_accessor_descriptor() {
        merged = PropertyDescriptor {
            get: Some(descriptor.get.unwrap_or(None)),
            set: Some(descriptor.set.unwrap_or(None)),
            enumerable: Some(
                descriptor
                    .enumerable
                    .unwrap_or(merged.enumerable.unwrap_or(false)),
            ),
            configurable: Some(
                descriptor
                    .configurable
                    .unwrap_or(merged.configurable.unwrap_or(false)),
            ),
            ..Default::default()
        };
    } else {
        if let Some(value) = descriptor.value {
            merged.value = Some(value);
            merged.get = None;
            merged.set = None;
        }
        if let Some(writable) = descriptor.writable {
            merged.writable = Some(writable);
        }
        if let Some(enumerable) = descriptor.enumerable {
            merged.enumerable = Some(enumerable);
        }
        if let Some(configurable) = descriptor.configurable {
            merged.configurable = Some(configurable);
        }
        if merged.get.is_some() || merged.set.is_some() {
            // Converting an accessor element back to data.
            merged.get = None;
            merged.set = None;
            merged.value = Some(descriptor.value.unwrap_or(Value::Undefined));
            merged.writable = Some(descriptor.writable.unwrap_or(false));
        }
    }

    // 3.f-i. Grow the elements vector when writing past the end.
    let data = &mut agent[array];
    if index >= data.elements.len() as u32 {
        data.elements.resize(index as usize + 1, None);
    }
    let entry = PropertyEntry::from_descriptor(PropertyKey::Integer(index), &merged);
    data.elements[index as usize] = entry.value;
    match entry.descriptor {
        Some(element_descriptor) => {
            data.element_descriptors
                .get_or_insert_with(AHashMap::default)
                .insert(index, element_descriptor);
        }
        None => {
            if let Some(descriptors) = data.element_descriptors.as_mut() {
                descriptors.remove(&index);
            }
        }
    }
    Ok(true)
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
pub(crate) fn array_set_length(
    agent: &mut Agent,
    array: Array,
    descriptor: PropertyDescriptor,
) -> JsResult<bool> {
    use crate::ecmascript::abstract_operations::type_conversion::{to_number, to_uint32};
    // 1. If Desc does not have a [[Value]] field, only the attributes are
    //    being touched.
    let Some(value) = descriptor.value else {
        if descriptor.writable == Some(false) {
            agent[array].length_writable = false;
        }
        return Ok(true);
    };
    // 3. Let newLen be ? ToUint32(Desc.[[Value]]).
    let new_len = to_uint32(agent, value)?;
    // 4. Let numberLen be ? ToNumber(Desc.[[Value]]).
    let number_len = to_number(agent, value)?;
    // 5. If SameValueZero(newLen, numberLen) is false, throw a RangeError
    //    exception.
    if new_len as f64 != number_len {
        return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid array length"));
    }
    let old_len = agent[array].elements.len() as u32;
    let length_writable = agent[array].length_writable;
    // 12. If oldLenDesc.[[Writable]] is false, return false.
    if new_len != old_len && !length_writable {
        return Ok(false);
    }
    if new_len >= old_len {
        let data = &mut agent[array];
        data.elements.resize(new_len as usize, None);
        if descriptor.writable == Some(false) {
            data.length_writable = false;
        }
        return Ok(true);
    }
    // 19. Deleting elements from the top; a non-configurable element stops
    //    the truncation there.
    let mut stop = new_len;
    for index in (new_len..old_len).rev() {
        let non_configurable = agent[array]
            .element_descriptors
            .as_ref()
            .and_then(|descriptors| descriptors.get(&index))
            .is_some_and(|descriptor| !descriptor.is_configurable());
        if non_configurable {
            stop = index + 1;
            break;
        }
    }
    let data = &mut agent[array];
    data.elements.truncate(stop as usize);
    if let Some(descriptors) = data.element_descriptors.as_mut() {
        descriptors.retain(|index, _| *index < stop);
    }
    if descriptor.writable == Some(false) {
        data.length_writable = false;
    }
    // 19.d. If the truncation stopped early, set length to that index plus
    //    one and return false.
    Ok(stop == new_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::agent::Options;
    use crate::ecmascript::execution::Realm;

    fn test_agent() -> Agent {
        let mut agent = Agent::new(Options::default());
        let realm = Realm::create(&mut agent);
        let context = crate::ecmascript::execution::ExecutionContext {
            function: None,
            realm,
            script_or_module: None,
            ecmascript_code: None,
            current_span: oxc_span::Span::default(),
        };
        agent.execution_context_stack.push(context);
        agent
    }

    #[test]
    fn length_truncation_deletes_from_the_top() {
        let mut agent = test_agent();
        let array = create_array_from_list(
            &mut agent,
            &[Value::Integer(1), Value::Integer(2), Value::Integer(3)],
        );
        let ok = array_set_length(
            &mut agent,
            array,
            PropertyDescriptor {
                value: Some(Value::Integer(1)),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(ok);
        assert_eq!(array.len(&agent), 1);
        assert_eq!(agent[array].elements[0], Some(Value::Integer(1)));
    }

    #[test]
    fn writing_past_length_extends_with_holes() {
        let mut agent = test_agent();
        let array = create_array_from_list(&mut agent, &[Value::Integer(1)]);
        array
            .internal_define_own_property(
                &mut agent,
                PropertyKey::Integer(3),
                PropertyDescriptor::new_data_descriptor(Value::Integer(9)),
            )
            .unwrap();
        assert_eq!(array.len(&agent), 4);
        assert_eq!(agent[array].elements[1], None);
        assert_eq!(agent[array].elements[3], Some(Value::Integer(9)));
    }

    #[test]
    fn non_writable_length_rejects_growth() {
        let mut agent = test_agent();
        let array = create_array_from_list(&mut agent, &[Value::Integer(1)]);
        agent[array].length_writable = false;
        let ok = array
            .internal_define_own_property(
                &mut agent,
                PropertyKey::Integer(5),
                PropertyDescriptor::new_data_descriptor(Value::Integer(9)),
            )
            .unwrap();
        assert!(!ok);
    }
}
