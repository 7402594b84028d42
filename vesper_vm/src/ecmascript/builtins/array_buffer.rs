// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [25.1 ArrayBuffer Objects](https://tc39.es/ecma262/#sec-arraybuffer-objects)

use core::ops::{Index, IndexMut};

use crate::ecmascript::abstract_operations::type_conversion::to_index;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{ArrayBufferIndex, ObjectIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ArrayBuffer(pub(crate) ArrayBufferIndex);

#[derive(Debug, Clone, Default)]
pub struct ArrayBufferHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[ArrayBufferData]]; `None` once detached.
    pub(crate) data: Option<Vec<u8>>,
}

impl Index<ArrayBuffer> for Agent {
    type Output = ArrayBufferHeapData;

    fn index(&self, index: ArrayBuffer) -> &Self::Output {
        self.heap
            .array_buffers
            .get(index.0.into_index())
            .expect("ArrayBuffer out of bounds")
            .as_ref()
            .expect("ArrayBuffer slot empty")
    }
}

impl IndexMut<ArrayBuffer> for Agent {
    fn index_mut(&mut self, index: ArrayBuffer) -> &mut Self::Output {
        self.heap
            .array_buffers
            .get_mut(index.0.into_index())
            .expect("ArrayBuffer out of bounds")
            .as_mut()
            .expect("ArrayBuffer slot empty")
    }
}

impl From<ArrayBuffer> for Object {
    fn from(value: ArrayBuffer) -> Self {
        Object::ArrayBuffer(value)
    }
}

impl From<ArrayBuffer> for Value {
    fn from(value: ArrayBuffer) -> Self {
        Value::Object(Object::ArrayBuffer(value))
    }
}

impl ArrayBuffer {
    /// ### [25.1.3.1 AllocateArrayBuffer ( constructor, byteLength )](https://tc39.es/ecma262/#sec-allocatearraybuffer)
    pub(crate) fn allocate(agent: &mut Agent, byte_length: usize) -> Self {
        agent.heap.alloc_counter += byte_length;
        ArrayBuffer(agent.heap.create(ArrayBufferHeapData {
            object_index: None,
            data: Some(vec![0; byte_length]),
        }))
    }

    /// ### [25.1.3.4 IsDetachedBuffer ( arrayBuffer )](https://tc39.es/ecma262/#sec-isdetachedbuffer)
    pub(crate) fn is_detached(self, agent: &Agent) -> bool {
        agent[self].data.is_none()
    }

    pub(crate) fn byte_length(self, agent: &Agent) -> usize {
        agent[self].data.as_ref().map_or(0, |data| data.len())
    }

    /// ### [25.1.3.3 DetachArrayBuffer ( arrayBuffer )](https://tc39.es/ecma262/#sec-detacharraybuffer)
    pub(crate) fn detach(self, agent: &mut Agent) {
        agent[self].data = None;
    }
}

impl InternalSlots for ArrayBuffer {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::ArrayBuffer;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for ArrayBuffer {}

pub(crate) struct ArrayBufferConstructor;

impl Builtin for ArrayBufferConstructor {
    const NAME: &'static str = "ArrayBuffer";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ArrayBufferConstructor::construct);
}

struct ArrayBufferIsView;
impl Builtin for ArrayBufferIsView {
    const NAME: &'static str = "isView";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferConstructor::is_view);
}

impl ArrayBufferConstructor {
    /// ### [25.1.4.1 ArrayBuffer ( length )](https://tc39.es/ecma262/#sec-arraybuffer-length)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor ArrayBuffer requires 'new'",
            ));
        }
        let byte_length = to_index(agent, arguments.get(0))? as usize;
        Ok(ArrayBuffer::allocate(agent, byte_length).into())
    }

    /// ### [25.1.5.1 ArrayBuffer.isView ( arg )](https://tc39.es/ecma262/#sec-arraybuffer.isview)
    fn is_view(_agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Object(Object::TypedArray(_)) | Value::Object(Object::DataView(_))
        )))
    }
}

pub(crate) struct ArrayBufferPrototype;

struct ArrayBufferPrototypeGetByteLength;
impl Builtin for ArrayBufferPrototypeGetByteLength {
    const NAME: &'static str = "byteLength";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::get_byte_length);
}

struct ArrayBufferPrototypeSlice;
impl Builtin for ArrayBufferPrototypeSlice {
    const NAME: &'static str = "slice";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayBufferPrototype::slice);
}

fn this_array_buffer(agent: &mut Agent, this_value: Value) -> JsResult<ArrayBuffer> {
    match this_value {
        Value::Object(Object::ArrayBuffer(buffer)) => Ok(buffer),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected an ArrayBuffer",
        )),
    }
}

impl ArrayBufferPrototype {
    /// ### [get ArrayBuffer.prototype.byteLength](https://tc39.es/ecma262/#sec-get-arraybuffer.prototype.bytelength)
    fn get_byte_length(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let buffer = this_array_buffer(agent, this_value)?;
        Ok(Value::from(buffer.byte_length(agent)))
    }

    /// ### [25.1.6.7 ArrayBuffer.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-arraybuffer.prototype.slice)
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        use crate::ecmascript::abstract_operations::type_conversion::to_integer_or_infinity;
        let buffer = this_array_buffer(agent, this_value)?;
        if buffer.is_detached(agent) {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Cannot perform operation on a detached ArrayBuffer",
            ));
        }
        let len = buffer.byte_length(agent) as f64;
        let relative_start = to_integer_or_infinity(agent, arguments.get(0))?;
        let first = if relative_start < 0.0 {
            (len + relative_start).max(0.0)
        } else {
            relative_start.min(len)
        };
        let relative_end = if arguments.get(1).is_undefined() {
            len
        } else {
            to_integer_or_infinity(agent, arguments.get(1))?
        };
        let end = if relative_end < 0.0 {
            (len + relative_end).max(0.0)
        } else {
            relative_end.min(len)
        };
        let new_len = (end - first).max(0.0) as usize;
        let new_buffer = ArrayBuffer::allocate(agent, new_len);
        let source = agent[buffer].data.as_ref().unwrap()[first as usize..first as usize + new_len]
            .to_vec();
        agent[new_buffer].data = Some(source);
        Ok(new_buffer.into())
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let array_buffer_prototype = intrinsics.array_buffer_prototype();
    let array_buffer_constructor = intrinsics.array_buffer();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, array_buffer_constructor)
        .with_prototype_property(array_buffer_prototype.into())
        .with_builtin_function_property::<ArrayBufferIsView>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, array_buffer_prototype)
        .with_constructor_property(array_buffer_constructor)
        .with_builtin_getter_property::<ArrayBufferPrototypeGetByteLength>()
        .with_builtin_function_property::<ArrayBufferPrototypeSlice>()
        .with_to_string_tag("ArrayBuffer")
        .build();
}
