// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.7.2 Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-object-internal-methods-and-internal-slots)
//!
//! The default method bodies are the ordinary algorithms, routed through the
//! backing object of [`InternalSlots`]. Exotic object kinds override only
//! the methods whose behaviour they change; the remainder delegate here.

use crate::ecmascript::builtins::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_has_property, ordinary_own_property_keys, ordinary_set, ordinary_set_prototype_of,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::spec::property_descriptor::PropertyDescriptor;
use crate::ecmascript::types::Value;

use super::internal_slots::InternalSlots;
use super::{Object, PropertyKey};

pub trait InternalMethods: InternalSlots {
    /// \[\[GetPrototypeOf]]
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        Ok(self.internal_prototype(agent))
    }

    /// \[\[SetPrototypeOf]]
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        Ok(ordinary_set_prototype_of(
            agent,
            self.into(),
            prototype,
        ))
    }

    /// \[\[IsExtensible]]
    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        // 1. Return OrdinaryIsExtensible(O).
        Ok(self.internal_extensible(agent))
    }

    /// \[\[PreventExtensions]]
    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        // 1. Return OrdinaryPreventExtensions(O).
        self.internal_set_extensible(agent, false);
        Ok(true)
    }

    /// \[\[GetOwnProperty]]
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. Return OrdinaryGetOwnProperty(O, P).
        Ok(self
            .get_backing_object(agent)
            .and_then(|backing_object| ordinary_get_own_property(agent, backing_object, property_key)))
    }

    /// \[\[DefineOwnProperty]]
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        let backing_object = self.get_or_create_backing_object(agent);
        ordinary_define_own_property(agent, backing_object, property_key, property_descriptor)
    }

    /// \[\[HasProperty]]
    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. Return ? OrdinaryHasProperty(O, P).
        ordinary_has_property(agent, self.into(), property_key)
    }

    /// \[\[Get]]
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. Return ? OrdinaryGet(O, P, Receiver).
        ordinary_get(agent, self.into(), property_key, receiver)
    }

    /// \[\[Set]]
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        // 1. Return ? OrdinarySet(O, P, V, Receiver).
        ordinary_set(agent, self.into(), property_key, value, receiver)
    }

    /// \[\[Delete]]
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. Return ? OrdinaryDelete(O, P).
        match self.get_backing_object(agent) {
            Some(backing_object) => ordinary_delete(agent, backing_object, property_key),
            None => Ok(true),
        }
    }

    /// \[\[OwnPropertyKeys]]
    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        // 1. Return OrdinaryOwnPropertyKeys(O).
        Ok(match self.get_backing_object(agent) {
            Some(backing_object) => ordinary_own_property_keys(agent, backing_object),
            None => Vec::new(),
        })
    }

    /// \[\[Call]]
    fn internal_call(
        self,
        agent: &mut Agent,
        _this_value: Value,
        _arguments_list: &[Value],
    ) -> JsResult<Value> {
        Err(agent.throw_exception(ExceptionType::TypeError, "Value is not callable"))
    }

    /// \[\[Construct]]
    fn internal_construct(
        self,
        agent: &mut Agent,
        _arguments_list: &[Value],
        _new_target: Object,
    ) -> JsResult<Object> {
        Err(agent.throw_exception(ExceptionType::TypeError, "Value is not a constructor"))
    }
}
