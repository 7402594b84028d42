// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wrapper objects for primitive values: Boolean, Number, String, Symbol
//! and BigInt objects. String wrappers are exotic: integer-indexed keys
//! read the string's code units ([10.4.3 String Exotic Objects](https://tc39.es/ecma262/#sec-string-exotic-objects)).

use core::ops::{Index, IndexMut};

use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapBigInt, HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject,
    PropertyDescriptor, PropertyKey, Symbol, Value,
};
use crate::heap::indexes::{ObjectIndex, PrimitiveObjectIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PrimitiveObject(pub(crate) PrimitiveObjectIndex);

#[derive(Debug, Clone, Copy)]
pub enum PrimitiveObjectData {
    Boolean(bool),
    String(HeapString),
    Symbol(Symbol),
    Number(f64),
    Integer(i32),
    BigInt(HeapBigInt),
}

#[derive(Debug, Clone, Copy)]
pub struct PrimitiveObjectHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) data: PrimitiveObjectData,
}

impl Index<PrimitiveObject> for Agent {
    type Output = PrimitiveObjectHeapData;

    fn index(&self, index: PrimitiveObject) -> &Self::Output {
        self.heap
            .primitive_objects
            .get(index.0.into_index())
            .expect("PrimitiveObject out of bounds")
            .as_ref()
            .expect("PrimitiveObject slot empty")
    }
}

impl IndexMut<PrimitiveObject> for Agent {
    fn index_mut(&mut self, index: PrimitiveObject) -> &mut Self::Output {
        self.heap
            .primitive_objects
            .get_mut(index.0.into_index())
            .expect("PrimitiveObject out of bounds")
            .as_mut()
            .expect("PrimitiveObject slot empty")
    }
}

impl From<PrimitiveObject> for Object {
    fn from(value: PrimitiveObject) -> Self {
        Object::PrimitiveObject(value)
    }
}

impl From<PrimitiveObject> for Value {
    fn from(value: PrimitiveObject) -> Self {
        Value::Object(Object::PrimitiveObject(value))
    }
}

impl PrimitiveObject {
    pub(crate) fn create(agent: &mut Agent, data: PrimitiveObjectData) -> Self {
        PrimitiveObject(agent.heap.create(PrimitiveObjectHeapData {
            object_index: None,
            data,
        }))
    }

    pub(crate) fn create_with_prototype(
        agent: &mut Agent,
        data: PrimitiveObjectData,
        prototype: Object,
    ) -> Self {
        let primitive_object = Self::create(agent, data);
        let backing_object = OrdinaryObject::create_object(agent, Some(prototype), true);
        primitive_object.set_backing_object(agent, backing_object);
        primitive_object
    }

    pub(crate) fn data(self, agent: &Agent) -> PrimitiveObjectData {
        agent[self].data
    }

    /// The wrapped string for String exotic objects.
    pub(crate) fn string_data(self, agent: &Agent) -> Option<HeapString> {
        match agent[self].data {
            PrimitiveObjectData::String(string) => Some(string),
            _ => None,
        }
    }
}

impl InternalSlots for PrimitiveObject {
    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }

    fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        match self.get_backing_object(agent) {
            Some(backing_object) => backing_object.internal_prototype(agent),
            None => {
                let intrinsic = match agent[self].data {
                    PrimitiveObjectData::Boolean(_) => ProtoIntrinsics::Boolean,
                    PrimitiveObjectData::String(_) => ProtoIntrinsics::String,
                    PrimitiveObjectData::Symbol(_) => ProtoIntrinsics::Object,
                    PrimitiveObjectData::Number(_) | PrimitiveObjectData::Integer(_) => {
                        ProtoIntrinsics::Number
                    }
                    PrimitiveObjectData::BigInt(_) => ProtoIntrinsics::BigInt,
                };
                Some(
                    agent
                        .current_realm()
                        .intrinsics()
                        .get_proto_intrinsic(intrinsic),
                )
            }
        }
    }
}

/// ### [10.4.3.5 StringGetOwnProperty ( S, P )](https://tc39.es/ecma262/#sec-stringgetownproperty)
fn string_get_own_property(
    agent: &mut Agent,
    string: HeapString,
    property_key: PropertyKey,
) -> Option<PropertyDescriptor> {
    let length_key = PropertyKey::from_static_str(agent, "length");
    if property_key == length_key {
        return Some(PropertyDescriptor {
            value: Some(Value::from(string.utf16_len(agent) as u32)),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        });
    }
    let PropertyKey::Integer(index) = property_key else {
        return None;
    };
    // 6-9. A one-code-unit substring, non-writable and non-configurable.
    let result_str = string.char_at(agent, index as usize)?;
    Some(PropertyDescriptor {
        value: Some(result_str.into()),
        writable: Some(false),
        enumerable: Some(true),
        configurable: Some(false),
        ..Default::default()
    })
}

impl InternalMethods for PrimitiveObject {
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. Let desc be OrdinaryGetOwnProperty(S, P).
        if let Some(backing_object) = self.get_backing_object(agent) {
            if let Some(descriptor) =
                super::ordinary::ordinary_get_own_property(agent, backing_object, property_key)
            {
                return Ok(Some(descriptor));
            }
        }
        // 2-3. String exotic objects expose their code units.
        if let Some(string) = self.string_data(agent) {
            return Ok(string_get_own_property(agent, string, property_key));
        }
        Ok(None)
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        if let Some(string) = self.string_data(agent) {
            // 1-2. Indexed properties of a String wrapper admit only
            //    compatible redefinitions.
            if let Some(string_desc) = string_get_own_property(agent, string, property_key) {
                let extensible = self.internal_extensible(agent);
                return Ok(super::ordinary::is_compatible_property_descriptor(
                    agent,
                    extensible,
                    property_descriptor,
                    Some(string_desc),
                ));
            }
        }
        let backing_object = self.get_or_create_backing_object(agent);
        super::ordinary::ordinary_define_own_property(
            agent,
            backing_object,
            property_key,
            property_descriptor,
        )
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let mut keys = Vec::new();
        if let Some(string) = self.string_data(agent) {
            let len = string.utf16_len(agent) as u32;
            keys.extend((0..len).map(PropertyKey::Integer));
            keys.push(PropertyKey::from_static_str(agent, "length"));
        }
        if let Some(backing_object) = self.get_backing_object(agent) {
            keys.extend(super::ordinary::ordinary_own_property_keys(
                agent,
                backing_object,
            ));
        }
        Ok(keys)
    }
}
