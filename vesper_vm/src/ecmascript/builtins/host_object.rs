// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host object exotic kind: the engine-side face of an
//! [`ObjectWrapper`](crate::ecmascript::host_interop::ObjectWrapper).
//!
//! Member reads consult, in order: the member accessor callback, the
//! reflection sandbox, structural methods (which take precedence over
//! dictionary entries on name collisions), wrapped members and dictionary
//! entries, and finally the ordinary lookup.

use core::ops::{Index, IndexMut};

use crate::ecmascript::builtins::builtin_function::{
    create_stateful_builtin_function, ArgumentsList, BuiltinFunction,
};
use crate::ecmascript::execution::agent::{FatalKind, JsError};
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::host_interop::{
    coerce_argument, resolve_overload, MemberAccess, MemberKind, SharedObjectWrapper,
    REFLECTION_ESCAPE_MEMBERS,
};
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor,
    PropertyKey, Value,
};
use crate::heap::indexes::{HostObjectIndex, ObjectIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HostObject(pub(crate) HostObjectIndex);

/// Wrapped plain host objects behave differently from wrapped host types:
/// type objects are the reflection boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostObjectKind {
    Plain,
    Type,
}

#[derive(Debug, Clone)]
pub struct HostObjectHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) wrapper: SharedObjectWrapper,
    pub(crate) kind: HostObjectKind,
}

impl Index<HostObject> for Agent {
    type Output = HostObjectHeapData;

    fn index(&self, index: HostObject) -> &Self::Output {
        self.heap
            .host_objects
            .get(index.0.into_index())
            .expect("HostObject out of bounds")
            .as_ref()
            .expect("HostObject slot empty")
    }
}

impl IndexMut<HostObject> for Agent {
    fn index_mut(&mut self, index: HostObject) -> &mut Self::Output {
        self.heap
            .host_objects
            .get_mut(index.0.into_index())
            .expect("HostObject out of bounds")
            .as_mut()
            .expect("HostObject slot empty")
    }
}

impl From<HostObject> for Object {
    fn from(value: HostObject) -> Self {
        Object::HostObject(value)
    }
}

impl From<HostObject> for Value {
    fn from(value: HostObject) -> Self {
        Value::Object(Object::HostObject(value))
    }
}

impl HostObject {
    pub fn create(agent: &mut Agent, wrapper: SharedObjectWrapper, kind: HostObjectKind) -> Self {
        HostObject(agent.heap.create(HostObjectHeapData {
            object_index: None,
            wrapper,
            kind,
        }))
    }

    pub(crate) fn is_callable(self, agent: &Agent) -> bool {
        agent[self].wrapper.is_invocable()
    }

    fn wrapper(self, agent: &Agent) -> SharedObjectWrapper {
        agent[self].wrapper.clone()
    }

    /// The reflection sandbox: property chains that would escape into the
    /// host's reflection namespaces abort with a host-fatal condition.
    fn check_reflection(self, agent: &mut Agent, name: &str) -> JsResult<ReflectionGate> {
        match agent[self].kind {
            HostObjectKind::Type => {
                if REFLECTION_ESCAPE_MEMBERS.contains(&name)
                    && !agent.options.interop_allow_system_reflection
                {
                    return Err(JsError::Fatal(FatalKind::HostReflectionForbidden));
                }
                Ok(ReflectionGate::Allowed)
            }
            HostObjectKind::Plain => {
                if name == "GetType" && !agent.options.interop_allow_get_type {
                    return Ok(ReflectionGate::Hidden);
                }
                Ok(ReflectionGate::Allowed)
            }
        }
    }
}

enum ReflectionGate {
    Allowed,
    Hidden,
}

impl InternalSlots for HostObject {
    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

/// The callable produced for a method group: captures the host object and
/// the member name, resolves the overload at call time and coerces the
/// arguments accordingly.
fn host_method_group_call(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::HostObject(host_object)) = function.capture(agent, 0) else {
        unreachable!()
    };
    let Value::String(name) = function.capture(agent, 1) else {
        unreachable!()
    };
    let name = name.to_string_lossy(agent).into_owned();
    let wrapper = host_object.wrapper(agent);
    let signatures = wrapper.method_signatures(&name);
    let args: Vec<Value> = arguments.to_vec();
    let coerced = match resolve_overload(agent, &signatures, &args) {
        Some(winner) => {
            let signature = &signatures[winner];
            let mut coerced = Vec::with_capacity(args.len());
            for (arg, parameter) in args.iter().zip(signature.parameters.iter()) {
                coerced.push(coerce_argument(agent, *arg, *parameter)?);
            }
            coerced
        }
        // With no signature information the arguments pass through.
        None => args,
    };
    wrapper.invoke(agent, &name, &coerced)
}

impl InternalMethods for HostObject {
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        let name = match property_key {
            PropertyKey::String(name) => Some(name),
            PropertyKey::Integer(_) | PropertyKey::Symbol(_) => None,
        };
        if let Some(name) = name {
            let name_text = name.to_string_lossy(agent).into_owned();
            // 1. The member accessor callback is consulted before the
            //    default lookup.
            if let Some(accessor) = agent.member_accessor.clone() {
                match accessor.access(agent, self.into(), &name_text) {
                    MemberAccess::NoOpinion => {}
                    MemberAccess::Hide => return Ok(Value::Undefined),
                    MemberAccess::Use(value) => return Ok(value),
                }
            }
            // 2. The reflection sandbox.
            match self.check_reflection(agent, &name_text)? {
                ReflectionGate::Hidden => return Ok(Value::Undefined),
                ReflectionGate::Allowed => {}
            }
            let wrapper = self.wrapper(agent);
            // 3. Structural methods take precedence over dictionary
            //    entries when names collide, and are returned as
            //    callables.
            if wrapper.member_kind(&name_text) == Some(MemberKind::Method) {
                let method = create_stateful_builtin_function(
                    agent,
                    host_method_group_call,
                    0,
                    "",
                    Box::new([self.into(), Value::String(name)]),
                );
                return Ok(method.into());
            }
            // 4. Fields, properties and dictionary entries.
            if let Some(value) = wrapper.try_get(agent, &name_text) {
                return Ok(value);
            }
        }
        // 5. Ordinary lookup through the backing object and prototype.
        super::ordinary::ordinary_get(agent, self.into(), property_key, receiver)
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        if let PropertyKey::String(name) = property_key {
            let name_text = name.to_string_lossy(agent).into_owned();
            let wrapper = self.wrapper(agent);
            if wrapper.try_set(agent, &name_text, value) {
                return Ok(true);
            }
        }
        super::ordinary::ordinary_set(agent, self.into(), property_key, value, receiver)
    }

    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        if let PropertyKey::String(name) = property_key {
            let name_text = name.to_string_lossy(agent).into_owned();
            let wrapper = self.wrapper(agent);
            if wrapper.member_kind(&name_text).is_some() {
                return Ok(true);
            }
            if wrapper.keys().iter().any(|key| key == &name_text) {
                return Ok(true);
            }
        }
        super::ordinary::ordinary_has_property(agent, self.into(), property_key)
    }

    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        if let PropertyKey::String(name) = property_key {
            let name_text = name.to_string_lossy(agent).into_owned();
            let wrapper = self.wrapper(agent);
            if let Some(value) = wrapper.try_get(agent, &name_text) {
                return Ok(Some(PropertyDescriptor {
                    value: Some(value),
                    writable: Some(true),
                    enumerable: Some(true),
                    configurable: Some(true),
                    ..Default::default()
                }));
            }
        }
        Ok(self.get_backing_object(agent).and_then(|backing_object| {
            super::ordinary::ordinary_get_own_property(agent, backing_object, property_key)
        }))
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let wrapper = self.wrapper(agent);
        let mut keys: Vec<PropertyKey> = Vec::new();
        for name in wrapper.keys() {
            keys.push(PropertyKey::from_str(agent, &name));
        }
        if let Some(backing_object) = self.get_backing_object(agent) {
            for key in super::ordinary::ordinary_own_property_keys(agent, backing_object) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }

    fn internal_call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        let wrapper = self.wrapper(agent);
        wrapper.invoke_self(agent, this_value, arguments_list)
    }
}

/// Resolve a host type by name and wrap it as a reflection-gated type
/// object. Used by the facade to surface `resolveType` results.
pub fn wrap_host_type(
    agent: &mut Agent,
    wrapper: SharedObjectWrapper,
) -> HostObject {
    HostObject::create(agent, wrapper, HostObjectKind::Type)
}

/// Wrap a plain host object.
pub fn wrap_host_object(agent: &mut Agent, wrapper: SharedObjectWrapper) -> HostObject {
    HostObject::create(agent, wrapper, HostObjectKind::Plain)
}
