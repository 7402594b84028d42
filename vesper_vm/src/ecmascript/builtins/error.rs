// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)

use core::ops::{Index, IndexMut};

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::execution::JsResult;
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor,
    PropertyKey, Value,
};
use crate::heap::indexes::{ErrorIndex, ObjectIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Error(pub(crate) ErrorIndex);

#[derive(Debug, Clone)]
pub struct ErrorHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[ErrorData]]
    pub(crate) kind: ExceptionType,
    pub(crate) message: Option<HeapString>,
    /// Synthesized call stack snapshot taken at creation.
    pub(crate) stack: Option<HeapString>,
}

impl ErrorHeapData {
    pub(crate) fn new(
        kind: ExceptionType,
        message: Option<HeapString>,
        stack: Option<HeapString>,
    ) -> Self {
        Self {
            object_index: None,
            kind,
            message,
            stack,
        }
    }
}

impl Index<Error> for Agent {
    type Output = ErrorHeapData;

    fn index(&self, index: Error) -> &Self::Output {
        self.heap
            .errors
            .get(index.0.into_index())
            .expect("Error out of bounds")
            .as_ref()
            .expect("Error slot empty")
    }
}

impl IndexMut<Error> for Agent {
    fn index_mut(&mut self, index: Error) -> &mut Self::Output {
        self.heap
            .errors
            .get_mut(index.0.into_index())
            .expect("Error out of bounds")
            .as_mut()
            .expect("Error slot empty")
    }
}

impl From<Error> for Object {
    fn from(value: Error) -> Self {
        Object::Error(value)
    }
}

impl From<Error> for Value {
    fn from(value: Error) -> Self {
        Value::Object(Object::Error(value))
    }
}

impl InternalSlots for Error {
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
                let kind = agent[self].kind;
                Some(
                    agent
                        .current_realm()
                        .intrinsics()
                        .error_prototype_for(kind)
                        .into(),
                )
            }
        }
    }
}

impl InternalMethods for Error {
    /// The `message` and `stack` slots surface as own properties without
    /// materializing a backing object for every error.
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        if let Some(backing_object) = self.get_backing_object(agent) {
            if let Some(descriptor) =
                super::ordinary::ordinary_get_own_property(agent, backing_object, property_key)
            {
                return Ok(Some(descriptor));
            }
        }
        let message_key = PropertyKey::from_static_str(agent, "message");
        if property_key == message_key {
            if let Some(message) = agent[self].message {
                return Ok(Some(PropertyDescriptor {
                    value: Some(message.into()),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(true),
                    ..Default::default()
                }));
            }
            return Ok(None);
        }
        let stack_key = PropertyKey::from_static_str(agent, "stack");
        if property_key == stack_key {
            if let Some(stack) = agent[self].stack {
                return Ok(Some(PropertyDescriptor {
                    value: Some(stack.into()),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(true),
                    ..Default::default()
                }));
            }
            return Ok(None);
        }
        Ok(None)
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let mut keys = Vec::new();
        if agent[self].message.is_some() {
            keys.push(PropertyKey::from_static_str(agent, "message"));
        }
        if agent[self].stack.is_some() {
            keys.push(PropertyKey::from_static_str(agent, "stack"));
        }
        if let Some(backing_object) = self.get_backing_object(agent) {
            let backing_keys =
                super::ordinary::ordinary_own_property_keys(agent, backing_object);
            for key in backing_keys {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        let message_key = PropertyKey::from_static_str(agent, "message");
        if property_key == message_key {
            agent[self].message = None;
            return Ok(true);
        }
        let stack_key = PropertyKey::from_static_str(agent, "stack");
        if property_key == stack_key {
            agent[self].stack = None;
            return Ok(true);
        }
        match self.get_backing_object(agent) {
            Some(backing_object) => {
                super::ordinary::ordinary_delete(agent, backing_object, property_key)
            }
            None => Ok(true),
        }
    }
}
