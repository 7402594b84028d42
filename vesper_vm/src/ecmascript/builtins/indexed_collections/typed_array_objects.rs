// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.2 TypedArray Objects](https://tc39.es/ecma262/#sec-typedarray-objects)
//!
//! %TypedArray% is an abstract constructor; the eleven concrete view
//! constructors share its prototype chain and differ only in element kind.

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{
    get, length_of_array_like,
};
use crate::ecmascript::abstract_operations::type_conversion::{to_index, to_integer_or_infinity};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array_buffer::ArrayBuffer;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{BuiltinIterator, IteratorKind};
use crate::ecmascript::builtins::typed_array::{TypedArray, TypedArrayKind};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct TypedArrayIntrinsicConstructor;

impl Builtin for TypedArrayIntrinsicConstructor {
    const NAME: &'static str = "TypedArray";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(TypedArrayIntrinsicConstructor::construct);
}

impl TypedArrayIntrinsicConstructor {
    /// ### [23.2.1.1 %TypedArray% ( )](https://tc39.es/ecma262/#sec-%typedarray%)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Throw a TypeError exception: the abstract constructor cannot
        //    be instantiated directly.
        Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Abstract class TypedArray not directly constructable",
        ))
    }
}

/// The shared constructor behaviour of the concrete view kinds.
fn construct_typed_array(
    agent: &mut Agent,
    kind: TypedArrayKind,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    if new_target.is_none() {
        let name = kind.name();
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("Constructor {name} requires 'new'"),
        ));
    }
    let first = arguments.get(0);
    let element_size = kind.element_size();
    match first {
        // 23.2.5.1 with a buffer argument: view an existing buffer.
        Value::Object(Object::ArrayBuffer(buffer)) => {
            let byte_offset = to_index(agent, arguments.get(1))? as usize;
            if byte_offset % element_size != 0 {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    "Start offset is not aligned to the element size",
                ));
            }
            let buffer_length = buffer.byte_length(agent);
            let length = if arguments.get(2).is_undefined() {
                if (buffer_length - byte_offset.min(buffer_length)) % element_size != 0 {
                    return Err(agent.throw_exception(
                        ExceptionType::RangeError,
                        "Buffer length is not aligned to the element size",
                    ));
                }
                (buffer_length - byte_offset.min(buffer_length)) / element_size
            } else {
                to_index(agent, arguments.get(2))? as usize
            };
            if byte_offset + length * element_size > buffer_length {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    "Invalid typed array length",
                ));
            }
            Ok(TypedArray::create(agent, kind, buffer, byte_offset, length).into())
        }
        // With an object argument: an iterable or array-like source.
        Value::Object(source) => {
            let values = match iterable_to_list(agent, source.into()) {
                Ok(values) => values,
                Err(_) => {
                    let len = length_of_array_like(agent, source)?;
                    let mut values = Vec::with_capacity(len as usize);
                    for index in 0..len {
                        values.push(get(agent, source, PropertyKey::Integer(index as u32))?);
                    }
                    values
                }
            };
            let buffer = ArrayBuffer::allocate(agent, values.len() * element_size);
            let typed_array = TypedArray::create(agent, kind, buffer, 0, values.len());
            for (index, value) in values.into_iter().enumerate() {
                typed_array.set_element(agent, index as i64, value)?;
            }
            Ok(typed_array.into())
        }
        // With a length argument: a zeroed buffer.
        _ => {
            let length = to_index(agent, first)? as usize;
            let buffer = ArrayBuffer::allocate(agent, length * element_size);
            Ok(TypedArray::create(agent, kind, buffer, 0, length).into())
        }
    }
}

macro_rules! typed_array_constructor {
    ($constructor: ident, $name: literal, $kind: expr) => {
        pub(crate) struct $constructor;

        impl Builtin for $constructor {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 3;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor($constructor::construct);
        }

        impl $constructor {
            fn construct(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
                new_target: Option<Object>,
            ) -> JsResult<Value> {
                construct_typed_array(agent, $kind, arguments, new_target)
            }
        }
    };
}

typed_array_constructor!(Int8ArrayConstructor, "Int8Array", TypedArrayKind::Int8);
typed_array_constructor!(Uint8ArrayConstructor, "Uint8Array", TypedArrayKind::Uint8);
typed_array_constructor!(
    Uint8ClampedArrayConstructor,
    "Uint8ClampedArray",
    TypedArrayKind::Uint8Clamped
);
typed_array_constructor!(Int16ArrayConstructor, "Int16Array", TypedArrayKind::Int16);
typed_array_constructor!(Uint16ArrayConstructor, "Uint16Array", TypedArrayKind::Uint16);
typed_array_constructor!(Int32ArrayConstructor, "Int32Array", TypedArrayKind::Int32);
typed_array_constructor!(Uint32ArrayConstructor, "Uint32Array", TypedArrayKind::Uint32);
typed_array_constructor!(
    BigInt64ArrayConstructor,
    "BigInt64Array",
    TypedArrayKind::BigInt64
);
typed_array_constructor!(
    BigUint64ArrayConstructor,
    "BigUint64Array",
    TypedArrayKind::BigUint64
);
typed_array_constructor!(
    Float32ArrayConstructor,
    "Float32Array",
    TypedArrayKind::Float32
);
typed_array_constructor!(
    Float64ArrayConstructor,
    "Float64Array",
    TypedArrayKind::Float64
);

pub(crate) struct TypedArrayPrototype;

fn this_typed_array(agent: &mut Agent, this_value: Value) -> JsResult<TypedArray> {
    match this_value {
        Value::Object(Object::TypedArray(typed_array)) => Ok(typed_array),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a TypedArray",
        )),
    }
}

struct TypedArrayPrototypeGetBuffer;
impl Builtin for TypedArrayPrototypeGetBuffer {
    const NAME: &'static str = "buffer";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::get_buffer);
}

struct TypedArrayPrototypeGetByteLength;
impl Builtin for TypedArrayPrototypeGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::get_byte_length);
}

struct TypedArrayPrototypeGetByteOffset;
impl Builtin for TypedArrayPrototypeGetByteOffset {
    const NAME: &'static str = "byteOffset";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::get_byte_offset);
}

struct TypedArrayPrototypeGetLength;
impl Builtin for TypedArrayPrototypeGetLength {
    const NAME: &'static str = "length";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::get_length);
}

struct TypedArrayPrototypeAt;
impl Builtin for TypedArrayPrototypeAt {
    const NAME: &'static str = "at";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::at);
}

struct TypedArrayPrototypeFill;
impl Builtin for TypedArrayPrototypeFill {
    const NAME: &'static str = "fill";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::fill);
}

struct TypedArrayPrototypeSet;
impl Builtin for TypedArrayPrototypeSet {
    const NAME: &'static str = "set";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::set_method);
}

struct TypedArrayPrototypeSubarray;
impl Builtin for TypedArrayPrototypeSubarray {
    const NAME: &'static str = "subarray";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::subarray);
}

struct TypedArrayPrototypeSlice;
impl Builtin for TypedArrayPrototypeSlice {
    const NAME: &'static str = "slice";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::slice);
}

struct TypedArrayPrototypeValues;
impl Builtin for TypedArrayPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::values);
}

struct TypedArrayPrototypeIterator;
impl Builtin for TypedArrayPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(TypedArrayPrototype::values);
}

impl TypedArrayPrototype {
    fn get_buffer(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        Ok(agent[typed_array].buffer.into())
    }

    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        if typed_array.is_detached(agent) {
            return Ok(Value::from(0));
        }
        let data = agent[typed_array];
        Ok(Value::from(data.length * data.kind.element_size()))
    }

    fn get_byte_offset(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        Ok(Value::from(agent[typed_array].byte_offset))
    }

    fn get_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        Ok(Value::from(typed_array.length(agent)))
    }

    /// ### [23.2.3.1 %TypedArray%.prototype.at ( index )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.at)
    fn at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        let len = typed_array.length(agent) as i64;
        let relative = to_integer_or_infinity(agent, arguments.get(0))?;
        let index = if relative < 0.0 {
            len + relative as i64
        } else {
            relative as i64
        };
        Ok(typed_array
            .get_element(agent, index)
            .unwrap_or(Value::Undefined))
    }

    /// ### [23.2.3.8 %TypedArray%.prototype.fill ( value \[ , start \[ , end \] \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.fill)
    fn fill(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        if typed_array.is_detached(agent) {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Cannot perform operation on a detached ArrayBuffer",
            ));
        }
        let len = typed_array.length(agent) as i64;
        let value = arguments.get(0);
        let start = to_integer_or_infinity(agent, arguments.get(1))?;
        let from = clamp(start, len);
        let end = arguments.get(2);
        let to = if end.is_undefined() {
            len
        } else {
            clamp(to_integer_or_infinity(agent, end)?, len)
        };
        for index in from..to {
            typed_array.set_element(agent, index, value)?;
        }
        Ok(this_value)
    }

    /// ### [23.2.3.26 %TypedArray%.prototype.set ( source \[ , offset \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.set)
    fn set_method(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        let offset = to_integer_or_infinity(agent, arguments.get(1))?;
        if offset < 0.0 {
            return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid offset"));
        }
        let offset = offset as i64;
        let Value::Object(source) = arguments.get(0) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Argument to set() must be an object",
            ));
        };
        let source_len = length_of_array_like(agent, source)?;
        if offset + source_len > typed_array.length(agent) as i64 {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "Source is too large for the target typed array",
            ));
        }
        for index in 0..source_len {
            let value = get(agent, source, PropertyKey::Integer(index as u32))?;
            typed_array.set_element(agent, offset + index, value)?;
        }
        Ok(Value::Undefined)
    }

    /// ### [23.2.3.28 %TypedArray%.prototype.subarray ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.subarray)
    fn subarray(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        let data = agent[typed_array];
        let len = data.length as i64;
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let from = clamp(start, len);
        let end = arguments.get(1);
        let to = if end.is_undefined() {
            len
        } else {
            clamp(to_integer_or_infinity(agent, end)?, len)
        };
        let new_len = (to - from).max(0) as usize;
        // The subarray shares the buffer.
        Ok(TypedArray::create(
            agent,
            data.kind,
            data.buffer,
            data.byte_offset + from as usize * data.kind.element_size(),
            new_len,
        )
        .into())
    }

    /// ### [23.2.3.27 %TypedArray%.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.slice)
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        let data = agent[typed_array];
        let len = typed_array.length(agent) as i64;
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let from = clamp(start, len);
        let end = arguments.get(1);
        let to = if end.is_undefined() {
            len
        } else {
            clamp(to_integer_or_infinity(agent, end)?, len)
        };
        let new_len = (to - from).max(0) as usize;
        let element_size = data.kind.element_size();
        let buffer = ArrayBuffer::allocate(agent, new_len * element_size);
        let copy = TypedArray::create(agent, data.kind, buffer, 0, new_len);
        for index in 0..new_len as i64 {
            if let Some(value) = typed_array.get_element(agent, from + index) {
                copy.set_element(agent, index, value)?;
            }
        }
        Ok(copy.into())
    }

    /// ### [23.2.3.33 %TypedArray%.prototype.values ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.values)
    fn values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let typed_array = this_typed_array(agent, this_value)?;
        Ok(BuiltinIterator::create(
            agent,
            IteratorKind::ArrayValues,
            typed_array.into(),
        )
        .into())
    }
}

fn clamp(relative: f64, len: i64) -> i64 {
    if relative < 0.0 {
        ((len as f64 + relative).max(0.0)) as i64
    } else {
        (relative as i64).min(len)
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let typed_array_prototype = intrinsics.typed_array_prototype();
    let typed_array_constructor = intrinsics.typed_array();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, typed_array_constructor)
        .with_prototype_property(typed_array_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, typed_array_prototype)
        .with_constructor_property(typed_array_constructor)
        .with_builtin_getter_property::<TypedArrayPrototypeGetBuffer>()
        .with_builtin_getter_property::<TypedArrayPrototypeGetByteLength>()
        .with_builtin_getter_property::<TypedArrayPrototypeGetByteOffset>()
        .with_builtin_getter_property::<TypedArrayPrototypeGetLength>()
        .with_builtin_function_property::<TypedArrayPrototypeAt>()
        .with_builtin_function_property::<TypedArrayPrototypeFill>()
        .with_builtin_function_property::<TypedArrayPrototypeSet>()
        .with_builtin_function_property::<TypedArrayPrototypeSubarray>()
        .with_builtin_function_property::<TypedArrayPrototypeSlice>()
        .with_builtin_function_property::<TypedArrayPrototypeValues>()
        .with_builtin_function_property::<TypedArrayPrototypeIterator>()
        .build();

    // The concrete constructors carry their element sizes and prototype
    // links.
    macro_rules! concrete {
        ($constructor_field: ident, $prototype_field: ident, $size: literal) => {
            let intrinsics = agent.get_realm(realm).intrinsics();
            let constructor = intrinsics.$constructor_field;
            let prototype = intrinsics.$prototype_field;
            OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, constructor)
                .with_prototype_property(prototype.into())
                .with_frozen_property("BYTES_PER_ELEMENT", Value::from($size))
                .build();
            OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, prototype)
                .with_constructor_property(constructor)
                .with_frozen_property("BYTES_PER_ELEMENT", Value::from($size))
                .build();
        };
    }

    concrete!(int8_array, int8_array_prototype, 1);
    concrete!(uint8_array, uint8_array_prototype, 1);
    concrete!(uint8_clamped_array, uint8_clamped_array_prototype, 1);
    concrete!(int16_array, int16_array_prototype, 2);
    concrete!(uint16_array, uint16_array_prototype, 2);
    concrete!(int32_array, int32_array_prototype, 4);
    concrete!(uint32_array, uint32_array_prototype, 4);
    concrete!(big_int64_array, big_int64_array_prototype, 8);
    concrete!(big_uint64_array, big_uint64_array_prototype, 8);
    concrete!(float32_array, float32_array_prototype, 4);
    concrete!(float64_array, float64_array_prototype, 8);
}
