// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)

pub mod data;
pub mod internal_methods;
pub mod internal_slots;
pub mod property_key;

use core::ops::{Index, IndexMut};

pub use internal_methods::InternalMethods;
pub use internal_slots::InternalSlots;
pub use property_key::PropertyKey;

use crate::ecmascript::builtins::array::Array;
use crate::ecmascript::builtins::array_buffer::ArrayBuffer;
use crate::ecmascript::builtins::bound_function::BoundFunction;
use crate::ecmascript::builtins::builtin_function::{Behaviour, BuiltinFunction};
use crate::ecmascript::builtins::data_view::DataView;
use crate::ecmascript::builtins::date::Date;
use crate::ecmascript::builtins::ecmascript_function::ECMAScriptFunction;
use crate::ecmascript::builtins::error::Error;
use crate::ecmascript::builtins::generator_objects::Generator;
use crate::ecmascript::builtins::host_object::HostObject;
use crate::ecmascript::builtins::iterator_objects::BuiltinIterator;
use crate::ecmascript::builtins::keyed_collections::map_objects::Map;
use crate::ecmascript::builtins::keyed_collections::set_objects::Set;
use crate::ecmascript::builtins::keyed_collections::weak_map_objects::WeakMap;
use crate::ecmascript::builtins::keyed_collections::weak_set_objects::WeakSet;
use crate::ecmascript::builtins::primitive_objects::PrimitiveObject;
use crate::ecmascript::builtins::promise::Promise;
use crate::ecmascript::builtins::proxy::Proxy;
use crate::ecmascript::builtins::regexp::RegExp;
use crate::ecmascript::builtins::typed_array::TypedArray;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::scripts_and_modules::module::Module;
use crate::ecmascript::types::spec::property_descriptor::PropertyDescriptor;
use crate::heap::indexes::ObjectIndex;
use crate::heap::CreateHeapData;

use data::ObjectHeapData;

use super::function::Function;
use super::value::Value;

/// An object handle: a tagged typed index into one of the object heap
/// vectors. The variant tells which exotic (or ordinary) kind the object is,
/// which is what selects its internal method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    Object(OrdinaryObject),
    Array(Array),
    ArrayBuffer(ArrayBuffer),
    BoundFunction(BoundFunction),
    BuiltinFunction(BuiltinFunction),
    BuiltinIterator(BuiltinIterator),
    DataView(DataView),
    Date(Date),
    ECMAScriptFunction(ECMAScriptFunction),
    Error(Error),
    Generator(Generator),
    HostObject(HostObject),
    Map(Map),
    Module(Module),
    PrimitiveObject(PrimitiveObject),
    Promise(Promise),
    Proxy(Proxy),
    RegExp(RegExp),
    Set(Set),
    TypedArray(TypedArray),
    WeakMap(WeakMap),
    WeakSet(WeakSet),
}

/// An ordinary object: nothing but a prototype, an extensible flag and a
/// property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OrdinaryObject(pub(crate) ObjectIndex);

impl Index<OrdinaryObject> for Agent {
    type Output = ObjectHeapData;

    fn index(&self, index: OrdinaryObject) -> &Self::Output {
        self.heap
            .objects
            .get(index.0.into_index())
            .expect("OrdinaryObject out of bounds")
            .as_ref()
            .expect("OrdinaryObject slot empty")
    }
}

impl IndexMut<OrdinaryObject> for Agent {
    fn index_mut(&mut self, index: OrdinaryObject) -> &mut Self::Output {
        self.heap
            .objects
            .get_mut(index.0.into_index())
            .expect("OrdinaryObject out of bounds")
            .as_mut()
            .expect("OrdinaryObject slot empty")
    }
}

impl OrdinaryObject {
    pub(crate) fn create_object(
        agent: &mut Agent,
        prototype: Option<Object>,
        extensible: bool,
    ) -> Self {
        OrdinaryObject(agent.heap.create(ObjectHeapData::new(extensible, prototype)))
    }
}

impl InternalSlots for OrdinaryObject {
    fn get_backing_object(self, _agent: &Agent) -> Option<OrdinaryObject> {
        Some(self)
    }

    fn set_backing_object(self, _agent: &mut Agent, _backing_object: OrdinaryObject) {
        unreachable!("ordinary objects are their own backing object");
    }

    fn create_backing_object(self, _agent: &mut Agent) -> OrdinaryObject {
        unreachable!("ordinary objects are their own backing object");
    }

    fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        agent[self].prototype
    }

    fn internal_set_prototype(self, agent: &mut Agent, prototype: Option<Object>) {
        agent[self].prototype = prototype;
    }

    fn internal_extensible(self, agent: &Agent) -> bool {
        agent[self].extensible
    }

    fn internal_set_extensible(self, agent: &mut Agent, extensible: bool) {
        agent[self].extensible = extensible;
    }
}

impl InternalMethods for OrdinaryObject {}

impl From<OrdinaryObject> for Object {
    fn from(value: OrdinaryObject) -> Self {
        Object::Object(value)
    }
}

impl From<OrdinaryObject> for Value {
    fn from(value: OrdinaryObject) -> Self {
        Value::Object(Object::Object(value))
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl TryFrom<Value> for Object {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, ()> {
        match value {
            Value::Object(object) => Ok(object),
            _ => Err(()),
        }
    }
}

/// Dispatch an internal method to the variant's implementation.
macro_rules! object_dispatch {
    ($value: expr, $object: ident => $call: expr) => {
        match $value {
            Object::Object($object) => $call,
            Object::Array($object) => $call,
            Object::ArrayBuffer($object) => $call,
            Object::BoundFunction($object) => $call,
            Object::BuiltinFunction($object) => $call,
            Object::BuiltinIterator($object) => $call,
            Object::DataView($object) => $call,
            Object::Date($object) => $call,
            Object::ECMAScriptFunction($object) => $call,
            Object::Error($object) => $call,
            Object::Generator($object) => $call,
            Object::HostObject($object) => $call,
            Object::Map($object) => $call,
            Object::Module($object) => $call,
            Object::PrimitiveObject($object) => $call,
            Object::Promise($object) => $call,
            Object::Proxy($object) => $call,
            Object::RegExp($object) => $call,
            Object::Set($object) => $call,
            Object::TypedArray($object) => $call,
            Object::WeakMap($object) => $call,
            Object::WeakSet($object) => $call,
        }
    };
}

impl InternalSlots for Object {
    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        object_dispatch!(self, o => o.get_backing_object(agent))
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        object_dispatch!(self, o => o.set_backing_object(agent, backing_object))
    }

    fn create_backing_object(self, agent: &mut Agent) -> OrdinaryObject {
        object_dispatch!(self, o => o.create_backing_object(agent))
    }

    fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        object_dispatch!(self, o => o.internal_prototype(agent))
    }

    fn internal_set_prototype(self, agent: &mut Agent, prototype: Option<Object>) {
        object_dispatch!(self, o => o.internal_set_prototype(agent, prototype))
    }

    fn internal_extensible(self, agent: &Agent) -> bool {
        object_dispatch!(self, o => o.internal_extensible(agent))
    }

    fn internal_set_extensible(self, agent: &mut Agent, extensible: bool) {
        object_dispatch!(self, o => o.internal_set_extensible(agent, extensible))
    }
}

impl InternalMethods for Object {
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        object_dispatch!(self, o => o.internal_get_prototype_of(agent))
    }

    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_set_prototype_of(agent, prototype))
    }

    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_is_extensible(agent))
    }

    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_prevent_extensions(agent))
    }

    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        object_dispatch!(self, o => o.internal_get_own_property(agent, property_key))
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_define_own_property(agent, property_key, property_descriptor))
    }

    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_has_property(agent, property_key))
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        object_dispatch!(self, o => o.internal_get(agent, property_key, receiver))
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_set(agent, property_key, value, receiver))
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        object_dispatch!(self, o => o.internal_delete(agent, property_key))
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        object_dispatch!(self, o => o.internal_own_property_keys(agent))
    }

    fn internal_call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        object_dispatch!(self, o => o.internal_call(agent, this_value, arguments_list))
    }

    fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        object_dispatch!(self, o => o.internal_construct(agent, arguments_list, new_target))
    }
}

impl Object {
    /// Whether the object has a `[[Call]]` internal method.
    pub fn is_callable(self, agent: &Agent) -> bool {
        match self {
            Object::BoundFunction(_)
            | Object::BuiltinFunction(_)
            | Object::ECMAScriptFunction(_) => true,
            Object::Proxy(proxy) => proxy.is_callable(agent),
            Object::HostObject(host_object) => host_object.is_callable(agent),
            _ => false,
        }
    }

    /// Whether the object has a `[[Construct]]` internal method.
    pub fn is_constructor(self, agent: &Agent) -> bool {
        match self {
            Object::BoundFunction(f) => f.is_constructor(agent),
            Object::BuiltinFunction(f) => {
                matches!(agent[f].behaviour, Behaviour::Constructor(_))
            }
            Object::ECMAScriptFunction(f) => f.is_constructor(agent),
            Object::Proxy(proxy) => proxy.is_constructor_proxy(agent),
            _ => false,
        }
    }

    pub(crate) fn into_function(self) -> Option<Function> {
        match self {
            Object::BoundFunction(f) => Some(Function::BoundFunction(f)),
            Object::BuiltinFunction(f) => Some(Function::BuiltinFunction(f)),
            Object::ECMAScriptFunction(f) => Some(Function::ECMAScriptFunction(f)),
            _ => None,
        }
    }
}
