// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [25.3 DataView Objects](https://tc39.es/ecma262/#sec-dataview-objects)

use core::ops::{Index, IndexMut};

use crate::ecmascript::abstract_operations::type_conversion::{to_boolean, to_index, to_number};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array_buffer::ArrayBuffer;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{DataViewIndex, ObjectIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DataView(pub(crate) DataViewIndex);

#[derive(Debug, Clone, Copy)]
pub struct DataViewHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[ViewedArrayBuffer]]
    pub(crate) buffer: ArrayBuffer,
    /// \[\[ByteOffset]]
    pub(crate) byte_offset: usize,
    /// \[\[ByteLength]]
    pub(crate) byte_length: usize,
}

impl Index<DataView> for Agent {
    type Output = DataViewHeapData;

    fn index(&self, index: DataView) -> &Self::Output {
        self.heap
            .data_views
            .get(index.0.into_index())
            .expect("DataView out of bounds")
            .as_ref()
            .expect("DataView slot empty")
    }
}

impl IndexMut<DataView> for Agent {
    fn index_mut(&mut self, index: DataView) -> &mut Self::Output {
        self.heap
            .data_views
            .get_mut(index.0.into_index())
            .expect("DataView out of bounds")
            .as_mut()
            .expect("DataView slot empty")
    }
}

impl From<DataView> for Object {
    fn from(value: DataView) -> Self {
        Object::DataView(value)
    }
}

impl From<DataView> for Value {
    fn from(value: DataView) -> Self {
        Value::Object(Object::DataView(value))
    }
}

impl InternalSlots for DataView {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::DataView;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for DataView {}

pub(crate) struct DataViewConstructor;

impl Builtin for DataViewConstructor {
    const NAME: &'static str = "DataView";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(DataViewConstructor::construct);
}

impl DataViewConstructor {
    /// ### [25.3.2.1 DataView ( buffer \[ , byteOffset \[ , byteLength \] \] )](https://tc39.es/ecma262/#sec-dataview-buffer-byteoffset-bytelength)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor DataView requires 'new'",
            ));
        }
        let Value::Object(Object::ArrayBuffer(buffer)) = arguments.get(0) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "First argument to DataView constructor must be an ArrayBuffer",
            ));
        };
        let offset = to_index(agent, arguments.get(1))? as usize;
        let buffer_byte_length = buffer.byte_length(agent);
        if offset > buffer_byte_length {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "Start offset is outside the bounds of the buffer",
            ));
        }
        let view_byte_length = if arguments.get(2).is_undefined() {
            buffer_byte_length - offset
        } else {
            let view_byte_length = to_index(agent, arguments.get(2))? as usize;
            if offset + view_byte_length > buffer_byte_length {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    "Invalid DataView length",
                ));
            }
            view_byte_length
        };
        let data_view = DataView(agent.heap.create(DataViewHeapData {
            object_index: None,
            buffer,
            byte_offset: offset,
            byte_length: view_byte_length,
        }));
        Ok(data_view.into())
    }
}

fn this_data_view(agent: &mut Agent, this_value: Value) -> JsResult<DataView> {
    match this_value {
        Value::Object(Object::DataView(data_view)) => Ok(data_view),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a DataView",
        )),
    }
}

/// ### [25.3.1.1 GetViewValue ( view, requestIndex, isLittleEndian, type )](https://tc39.es/ecma262/#sec-getviewvalue)
fn get_view_bytes<const N: usize>(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<[u8; N]> {
    let view = this_data_view(agent, this_value)?;
    let index = to_index(agent, arguments.get(0))? as usize;
    let little_endian = to_boolean(agent, arguments.get(1));
    let data = agent[view];
    if data.buffer.is_detached(agent) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot perform operation on a detached ArrayBuffer",
        ));
    }
    if index + N > data.byte_length {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            "Offset is outside the bounds of the DataView",
        ));
    }
    let offset = data.byte_offset + index;
    let buffer = agent[data.buffer].data.as_ref().unwrap();
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&buffer[offset..offset + N]);
    // Normalize to big-endian for the decoders.
    if little_endian {
        bytes.reverse();
    }
    Ok(bytes)
}

/// ### [25.3.1.2 SetViewValue ( view, requestIndex, isLittleEndian, type, value )](https://tc39.es/ecma262/#sec-setviewvalue)
fn set_view_bytes<const N: usize>(
    agent: &mut Agent,
    this_value: Value,
    index_arg: Value,
    little_endian_arg: Value,
    mut bytes: [u8; N],
) -> JsResult<()> {
    let view = this_data_view(agent, this_value)?;
    let index = to_index(agent, index_arg)? as usize;
    let little_endian = to_boolean(agent, little_endian_arg);
    let data = agent[view];
    if data.buffer.is_detached(agent) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot perform operation on a detached ArrayBuffer",
        ));
    }
    if index + N > data.byte_length {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            "Offset is outside the bounds of the DataView",
        ));
    }
    // The encoders produce big-endian bytes.
    if little_endian {
        bytes.reverse();
    }
    let offset = data.byte_offset + index;
    let buffer = agent[data.buffer].data.as_mut().unwrap();
    buffer[offset..offset + N].copy_from_slice(&bytes);
    Ok(())
}

macro_rules! data_view_get {
    ($marker: ident, $name: literal, $method: ident, $width: literal, $decode: expr) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::$method);
        }
        impl DataViewPrototype {
            fn $method(
                agent: &mut Agent,
                this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                let bytes = get_view_bytes::<$width>(agent, this_value, arguments)?;
                let decode: fn(&mut Agent, [u8; $width]) -> Value = $decode;
                Ok(decode(agent, bytes))
            }
        }
    };
}

macro_rules! data_view_set {
    ($marker: ident, $name: literal, $method: ident, $width: literal, $encode: expr) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 2;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::$method);
        }
        impl DataViewPrototype {
            fn $method(
                agent: &mut Agent,
                this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                let number = to_number(agent, arguments.get(1))?;
                let encode: fn(f64) -> [u8; $width] = $encode;
                let bytes = encode(number);
                set_view_bytes::<$width>(
                    agent,
                    this_value,
                    arguments.get(0),
                    arguments.get(2),
                    bytes,
                )?;
                Ok(Value::Undefined)
            }
        }
    };
}

pub(crate) struct DataViewPrototype;

data_view_get!(DataViewGetInt8, "getInt8", get_int8, 1, |_, b| Value::from(
    b[0] as i8
));
data_view_get!(DataViewGetUint8, "getUint8", get_uint8, 1, |_, b| {
    Value::from(b[0])
});
data_view_get!(DataViewGetInt16, "getInt16", get_int16, 2, |_, b| {
    Value::from(i16::from_be_bytes(b))
});
data_view_get!(DataViewGetUint16, "getUint16", get_uint16, 2, |_, b| {
    Value::from(u16::from_be_bytes(b))
});
data_view_get!(DataViewGetInt32, "getInt32", get_int32, 4, |_, b| {
    Value::from(i32::from_be_bytes(b))
});
data_view_get!(DataViewGetUint32, "getUint32", get_uint32, 4, |_, b| {
    Value::from(u32::from_be_bytes(b))
});
data_view_get!(DataViewGetFloat32, "getFloat32", get_float32, 4, |_, b| {
    Value::from_f64(f32::from_be_bytes(b) as f64)
});
data_view_get!(DataViewGetFloat64, "getFloat64", get_float64, 8, |_, b| {
    Value::from_f64(f64::from_be_bytes(b))
});

data_view_set!(DataViewSetInt8, "setInt8", set_int8, 1, |n| {
    [crate::ecmascript::types::language::number::f64_to_int32(n) as i8 as u8]
});
data_view_set!(DataViewSetUint8, "setUint8", set_uint8, 1, |n| {
    [(crate::ecmascript::types::language::number::f64_to_uint32(n) & 0xFF) as u8]
});
data_view_set!(DataViewSetInt16, "setInt16", set_int16, 2, |n| {
    (crate::ecmascript::types::language::number::f64_to_int32(n) as i16).to_be_bytes()
});
data_view_set!(DataViewSetUint16, "setUint16", set_uint16, 2, |n| {
    crate::ecmascript::types::language::number::f64_to_uint16(n).to_be_bytes()
});
data_view_set!(DataViewSetInt32, "setInt32", set_int32, 4, |n| {
    crate::ecmascript::types::language::number::f64_to_int32(n).to_be_bytes()
});
data_view_set!(DataViewSetUint32, "setUint32", set_uint32, 4, |n| {
    crate::ecmascript::types::language::number::f64_to_uint32(n).to_be_bytes()
});
data_view_set!(DataViewSetFloat32, "setFloat32", set_float32, 4, |n| {
    (n as f32).to_be_bytes()
});
data_view_set!(DataViewSetFloat64, "setFloat64", set_float64, 8, |n| {
    n.to_be_bytes()
});

struct DataViewGetBuffer;
impl Builtin for DataViewGetBuffer {
    const NAME: &'static str = "buffer";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_buffer);
}

struct DataViewGetByteLength;
impl Builtin for DataViewGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_byte_length);
}

struct DataViewGetByteOffset;
impl Builtin for DataViewGetByteOffset {
    const NAME: &'static str = "byteOffset";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DataViewPrototype::get_byte_offset);
}

impl DataViewPrototype {
    fn get_buffer(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let view = this_data_view(agent, this_value)?;
        Ok(agent[view].buffer.into())
    }

    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let view = this_data_view(agent, this_value)?;
        Ok(Value::from(agent[view].byte_length))
    }

    fn get_byte_offset(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let view = this_data_view(agent, this_value)?;
        Ok(Value::from(agent[view].byte_offset))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let data_view_prototype = intrinsics.data_view_prototype();
    let data_view_constructor = intrinsics.data_view();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, data_view_constructor)
        .with_prototype_property(data_view_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, data_view_prototype)
        .with_constructor_property(data_view_constructor)
        .with_builtin_getter_property::<DataViewGetBuffer>()
        .with_builtin_getter_property::<DataViewGetByteLength>()
        .with_builtin_getter_property::<DataViewGetByteOffset>()
        .with_builtin_function_property::<DataViewGetInt8>()
        .with_builtin_function_property::<DataViewGetUint8>()
        .with_builtin_function_property::<DataViewGetInt16>()
        .with_builtin_function_property::<DataViewGetUint16>()
        .with_builtin_function_property::<DataViewGetInt32>()
        .with_builtin_function_property::<DataViewGetUint32>()
        .with_builtin_function_property::<DataViewGetFloat32>()
        .with_builtin_function_property::<DataViewGetFloat64>()
        .with_builtin_function_property::<DataViewSetInt8>()
        .with_builtin_function_property::<DataViewSetUint8>()
        .with_builtin_function_property::<DataViewSetInt16>()
        .with_builtin_function_property::<DataViewSetUint16>()
        .with_builtin_function_property::<DataViewSetInt32>()
        .with_builtin_function_property::<DataViewSetUint32>()
        .with_builtin_function_property::<DataViewSetFloat32>()
        .with_builtin_function_property::<DataViewSetFloat64>()
        .with_to_string_tag("DataView")
        .build();
}
