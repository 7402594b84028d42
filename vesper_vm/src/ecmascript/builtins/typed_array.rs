// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.5 TypedArray Exotic Objects](https://tc39.es/ecma262/#sec-typedarray-exotic-objects)
//!
//! Integer-indexed exotic objects over a shared ArrayBuffer. Detached
//! buffers make every indexed read undefined and indexed writes no-ops,
//! while the prototype methods throw.

use core::ops::{Index, IndexMut};

use crate::ecmascript::abstract_operations::type_conversion::{
    canonical_numeric_index_string, to_big_int, to_number,
};
use crate::ecmascript::builtins::array_buffer::ArrayBuffer;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapBigInt, InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor,
    PropertyKey, Value,
};
use crate::heap::indexes::{ObjectIndex, TypedArrayIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TypedArray(pub(crate) TypedArrayIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    BigInt64,
    BigUint64,
    Float32,
    Float64,
}

impl TypedArrayKind {
    pub(crate) fn element_size(self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 | TypedArrayKind::Float64 => 8,
        }
    }

    pub(crate) fn is_big_int_kind(self) -> bool {
        matches!(self, TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64)
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypedArrayHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[ContentType]] and element layout.
    pub(crate) kind: TypedArrayKind,
    /// \[\[ViewedArrayBuffer]]
    pub(crate) buffer: ArrayBuffer,
    /// \[\[ByteOffset]]
    pub(crate) byte_offset: usize,
    /// \[\[ArrayLength]] in elements.
    pub(crate) length: usize,
}

impl Index<TypedArray> for Agent {
    type Output = TypedArrayHeapData;

    fn index(&self, index: TypedArray) -> &Self::Output {
        self.heap
            .typed_arrays
            .get(index.0.into_index())
            .expect("TypedArray out of bounds")
            .as_ref()
            .expect("TypedArray slot empty")
    }
}

impl IndexMut<TypedArray> for Agent {
    fn index_mut(&mut self, index: TypedArray) -> &mut Self::Output {
        self.heap
            .typed_arrays
            .get_mut(index.0.into_index())
            .expect("TypedArray out of bounds")
            .as_mut()
            .expect("TypedArray slot empty")
    }
}

impl From<TypedArray> for Object {
    fn from(value: TypedArray) -> Self {
        Object::TypedArray(value)
    }
}

impl From<TypedArray> for Value {
    fn from(value: TypedArray) -> Self {
        Value::Object(Object::TypedArray(value))
    }
}

impl TypedArray {
    pub(crate) fn create(
        agent: &mut Agent,
        kind: TypedArrayKind,
        buffer: ArrayBuffer,
        byte_offset: usize,
        length: usize,
    ) -> Self {
        TypedArray(agent.heap.create(TypedArrayHeapData {
            object_index: None,
            kind,
            buffer,
            byte_offset,
            length,
        }))
    }

    pub(crate) fn is_detached(self, agent: &Agent) -> bool {
        agent[self].buffer.is_detached(agent)
    }

    pub(crate) fn length(self, agent: &Agent) -> usize {
        if self.is_detached(agent) {
            0
        } else {
            agent[self].length
        }
    }

    /// ### [10.4.5.15 TypedArrayGetElement ( O, index )](https://tc39.es/ecma262/#sec-typedarraygetelement)
    pub(crate) fn get_element(self, agent: &mut Agent, index: i64) -> Option<Value> {
        let data = agent[self];
        if data.buffer.is_detached(agent) || index < 0 || index as usize >= data.length {
            return None;
        }
        let size = data.kind.element_size();
        let offset = data.byte_offset + index as usize * size;
        let buffer = agent[data.buffer].data.as_ref().unwrap();
        let bytes = &buffer[offset..offset + size];
        Some(match data.kind {
            TypedArrayKind::Int8 => Value::from(bytes[0] as i8),
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => Value::from(bytes[0]),
            TypedArrayKind::Int16 => {
                Value::from(i16::from_le_bytes([bytes[0], bytes[1]]))
            }
            TypedArrayKind::Uint16 => {
                Value::from(u16::from_le_bytes([bytes[0], bytes[1]]))
            }
            TypedArrayKind::Int32 => {
                Value::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            TypedArrayKind::Uint32 => {
                Value::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            TypedArrayKind::Float32 => Value::from_f64(f32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]) as f64),
            TypedArrayKind::Float64 => Value::from_f64(f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ])),
            TypedArrayKind::BigInt64 => {
                let value = i64::from_le_bytes(bytes.try_into().unwrap());
                Value::BigInt(HeapBigInt::from_i64(agent, value))
            }
            TypedArrayKind::BigUint64 => {
                let value = u64::from_le_bytes(bytes.try_into().unwrap());
                let big = num_bigint::BigInt::from(value);
                Value::BigInt(HeapBigInt::from_num(agent, big))
            }
        })
    }

    /// ### [10.4.5.16 TypedArraySetElement ( O, index, value )](https://tc39.es/ecma262/#sec-typedarraysetelement)
    pub(crate) fn set_element(self, agent: &mut Agent, index: i64, value: Value) -> JsResult<()> {
        let kind = agent[self].kind;
        // 1-2. Convert first: conversion is observable even when the write
        //    is out of bounds.
        enum Raw {
            Num(f64),
            Big(i128),
        }
        let raw = if kind.is_big_int_kind() {
            let big = to_big_int(agent, value)?;
            let data = &agent[big].data;
            use num_traits::ToPrimitive;
            // Modular wrap into 64 bits.
            let wrapped = data.to_i128().map(|v| v as i128).unwrap_or_else(|| {
                let modulus = num_bigint::BigInt::from(1u128 << 64);
                let m = ((data % &modulus) + &modulus) % &modulus;
                m.to_i128().unwrap_or(0)
            });
            Raw::Big(wrapped)
        } else {
            Raw::Num(to_number(agent, value)?)
        };
        let data = agent[self];
        if data.buffer.is_detached(agent) || index < 0 || index as usize >= data.length {
            return Ok(());
        }
        let size = kind.element_size();
        let offset = data.byte_offset + index as usize * size;
        let buffer_handle = data.buffer;
        let bytes: Vec<u8> = match (kind, raw) {
            (TypedArrayKind::Int8, Raw::Num(n)) => {
                vec![crate::ecmascript::types::language::number::f64_to_int32(n) as i8 as u8]
            }
            (TypedArrayKind::Uint8, Raw::Num(n)) => {
                vec![(crate::ecmascript::types::language::number::f64_to_uint32(n) & 0xFF) as u8]
            }
            (TypedArrayKind::Uint8Clamped, Raw::Num(n)) => {
                let clamped = if n.is_nan() {
                    0.0
                } else {
                    n.clamp(0.0, 255.0).round_ties_even()
                };
                vec![clamped as u8]
            }
            (TypedArrayKind::Int16, Raw::Num(n)) => {
                (crate::ecmascript::types::language::number::f64_to_int32(n) as i16)
                    .to_le_bytes()
                    .to_vec()
            }
            (TypedArrayKind::Uint16, Raw::Num(n)) => {
                crate::ecmascript::types::language::number::f64_to_uint16(n)
                    .to_le_bytes()
                    .to_vec()
            }
            (TypedArrayKind::Int32, Raw::Num(n)) => {
                crate::ecmascript::types::language::number::f64_to_int32(n)
                    .to_le_bytes()
                    .to_vec()
            }
            (TypedArrayKind::Uint32, Raw::Num(n)) => {
                crate::ecmascript::types::language::number::f64_to_uint32(n)
                    .to_le_bytes()
                    .to_vec()
            }
            (TypedArrayKind::Float32, Raw::Num(n)) => (n as f32).to_le_bytes().to_vec(),
            (TypedArrayKind::Float64, Raw::Num(n)) => n.to_le_bytes().to_vec(),
            (TypedArrayKind::BigInt64, Raw::Big(v)) => (v as i64).to_le_bytes().to_vec(),
            (TypedArrayKind::BigUint64, Raw::Big(v)) => (v as u64).to_le_bytes().to_vec(),
            _ => unreachable!(),
        };
        let buffer = agent[buffer_handle].data.as_mut().unwrap();
        buffer[offset..offset + size].copy_from_slice(&bytes);
        Ok(())
    }
}

impl InternalSlots for TypedArray {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::TypedArray;

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
                let intrinsics = agent.current_realm().intrinsics();
                Some(
                    match agent[self].kind {
                        TypedArrayKind::Int8 => intrinsics.int8_array_prototype,
                        TypedArrayKind::Uint8 => intrinsics.uint8_array_prototype,
                        TypedArrayKind::Uint8Clamped => intrinsics.uint8_clamped_array_prototype,
                        TypedArrayKind::Int16 => intrinsics.int16_array_prototype,
                        TypedArrayKind::Uint16 => intrinsics.uint16_array_prototype,
                        TypedArrayKind::Int32 => intrinsics.int32_array_prototype,
                        TypedArrayKind::Uint32 => intrinsics.uint32_array_prototype,
                        TypedArrayKind::BigInt64 => intrinsics.big_int64_array_prototype,
                        TypedArrayKind::BigUint64 => intrinsics.big_uint64_array_prototype,
                        TypedArrayKind::Float32 => intrinsics.float32_array_prototype,
                        TypedArrayKind::Float64 => intrinsics.float64_array_prototype,
                    }
                    .into(),
                )
            }
        }
    }
}

/// Whether the key is a canonical numeric index, per the integer-indexed
/// exotic object algorithms.
fn numeric_index(agent: &mut Agent, property_key: PropertyKey) -> Option<i64> {
    match property_key {
        PropertyKey::Integer(index) => Some(index as i64),
        PropertyKey::String(string) => {
            canonical_numeric_index_string(agent, string).map(|n| n as i64)
        }
        PropertyKey::Symbol(_) => None,
    }
}

impl InternalMethods for TypedArray {
    /// ### [10.4.5.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-getownproperty)
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        if let Some(index) = numeric_index(agent, property_key) {
            return Ok(self.get_element(agent, index).map(|value| PropertyDescriptor {
                value: Some(value),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            }));
        }
        let length_key = PropertyKey::from_static_str(agent, "length");
        if property_key == length_key {
            return Ok(Some(PropertyDescriptor {
                value: Some(Value::from(self.length(agent))),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            }));
        }
        Ok(self.get_backing_object(agent).and_then(|backing_object| {
            super::ordinary::ordinary_get_own_property(agent, backing_object, property_key)
        }))
    }

    /// ### [10.4.5.3 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-typedarray-defineownproperty)
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        if let Some(index) = numeric_index(agent, property_key) {
            if property_descriptor.is_accessor_descriptor()
                || property_descriptor.configurable == Some(false)
                || property_descriptor.enumerable == Some(false)
                || property_descriptor.writable == Some(false)
            {
                return Ok(false);
            }
            if let Some(value) = property_descriptor.value {
                self.set_element(agent, index, value)?;
            }
            return Ok(true);
        }
        let backing_object = self.get_or_create_backing_object(agent);
        super::ordinary::ordinary_define_own_property(
            agent,
            backing_object,
            property_key,
            property_descriptor,
        )
    }

    /// ### [10.4.5.4 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-typedarray-get)
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        if let Some(index) = numeric_index(agent, property_key) {
            return Ok(self.get_element(agent, index).unwrap_or(Value::Undefined));
        }
        super::ordinary::ordinary_get(agent, self.into(), property_key, receiver)
    }

    /// ### [10.4.5.5 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-typedarray-set)
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        if let Some(index) = numeric_index(agent, property_key) {
            self.set_element(agent, index, value)?;
            return Ok(true);
        }
        super::ordinary::ordinary_set(agent, self.into(), property_key, value, receiver)
    }

    /// ### [10.4.5.2 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-hasproperty)
    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        if let Some(index) = numeric_index(agent, property_key) {
            return Ok(self.get_element(agent, index).is_some());
        }
        super::ordinary::ordinary_has_property(agent, self.into(), property_key)
    }

    /// ### [10.4.5.6 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-typedarray-delete)
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        if let Some(index) = numeric_index(agent, property_key) {
            return Ok(self.get_element(agent, index).is_none());
        }
        match self.get_backing_object(agent) {
            Some(backing_object) => {
                super::ordinary::ordinary_delete(agent, backing_object, property_key)
            }
            None => Ok(true),
        }
    }

    /// ### [10.4.5.7 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-typedarray-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let length = self.length(agent) as u32;
        let mut keys: Vec<PropertyKey> = (0..length).map(PropertyKey::Integer).collect();
        if let Some(backing_object) = self.get_backing_object(agent) {
            keys.extend(super::ordinary::ordinary_own_property_keys(
                agent,
                backing_object,
            ));
        }
        Ok(keys)
    }
}
