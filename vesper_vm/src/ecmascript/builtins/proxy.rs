// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.5 Proxy Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots)
//!
//! Every internal method forwards to the matching handler trap when one is
//! present and enforces the invariants the specification imposes on the
//! result; missing traps fall through to the target.

use core::ops::{Index, IndexMut};

use crate::ecmascript::abstract_operations::operations_on_objects::{call_function, get_method};
use crate::ecmascript::abstract_operations::testing_and_comparison::same_value;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::abstract_operations::type_conversion::to_boolean;
use crate::ecmascript::builtins::builtin_function::{
    create_stateful_builtin_function, ArgumentsList, Behaviour, Builtin, BuiltinFunction,
};
use crate::ecmascript::builtins::ordinary::is_compatible_property_descriptor;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::indexes::ProxyIndex;
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Proxy(pub(crate) ProxyIndex);

#[derive(Debug, Clone, Copy)]
pub struct ProxyHeapData {
    /// \[\[ProxyTarget]]; None once revoked.
    pub(crate) target: Option<Object>,
    /// \[\[ProxyHandler]]; None once revoked.
    pub(crate) handler: Option<Object>,
    /// Captured at creation: whether the target was callable and/or a
    /// constructor.
    pub(crate) is_callable: bool,
    pub(crate) is_constructor: bool,
}

impl Index<Proxy> for Agent {
    type Output = ProxyHeapData;

    fn index(&self, index: Proxy) -> &Self::Output {
        self.heap
            .proxies
            .get(index.0.into_index())
            .expect("Proxy out of bounds")
            .as_ref()
            .expect("Proxy slot empty")
    }
}

impl IndexMut<Proxy> for Agent {
    fn index_mut(&mut self, index: Proxy) -> &mut Self::Output {
        self.heap
            .proxies
            .get_mut(index.0.into_index())
            .expect("Proxy out of bounds")
            .as_mut()
            .expect("Proxy slot empty")
    }
}

impl From<Proxy> for Object {
    fn from(value: Proxy) -> Self {
        Object::Proxy(value)
    }
}

impl From<Proxy> for Value {
    fn from(value: Proxy) -> Self {
        Value::Object(Object::Proxy(value))
    }
}

impl Proxy {
    pub(crate) fn is_callable(self, agent: &Agent) -> bool {
        agent[self].is_callable
    }

    pub(crate) fn is_constructor_proxy(self, agent: &Agent) -> bool {
        agent[self].is_constructor
    }

    /// Validate that the proxy has not been revoked and return
    /// (target, handler).
    fn validate(self, agent: &mut Agent) -> JsResult<(Object, Object)> {
        let data = agent[self];
        match (data.target, data.handler) {
            (Some(target), Some(handler)) => Ok((target, handler)),
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Cannot perform operation on a revoked proxy",
            )),
        }
    }

    /// GetMethod(handler, trapName).
    fn get_trap(
        self,
        agent: &mut Agent,
        handler: Object,
        name: &'static str,
    ) -> JsResult<Option<Object>> {
        let key = PropertyKey::from_static_str(agent, name);
        get_method(agent, handler.into(), key)
    }
}

/// ### [10.5.14 ProxyCreate ( target, handler )](https://tc39.es/ecma262/#sec-proxycreate)
pub(crate) fn proxy_create(agent: &mut Agent, target: Value, handler: Value) -> JsResult<Proxy> {
    // 1. If target is not an Object, throw a TypeError exception.
    let Value::Object(target) = target else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as target",
        ));
    };
    // 2. If handler is not an Object, throw a TypeError exception.
    let Value::Object(handler) = handler else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot create proxy with a non-object as handler",
        ));
    };
    // 3-7. The callability of the proxy is that of its target.
    Ok(Proxy(agent.heap.create(ProxyHeapData {
        target: Some(target),
        handler: Some(handler),
        is_callable: target.is_callable(agent),
        is_constructor: target.is_constructor(agent),
    })))
}

impl InternalSlots for Proxy {
    fn get_backing_object(self, _agent: &Agent) -> Option<OrdinaryObject> {
        None
    }

    fn set_backing_object(self, _agent: &mut Agent, _backing_object: OrdinaryObject) {
        unreachable!("proxies have no backing object");
    }

    fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        // Only reachable through non-trap paths; the real work happens in
        // internal_get_prototype_of.
        agent[self]
            .target
            .and_then(|target| target.internal_prototype(agent))
    }

    fn internal_set_prototype(self, _agent: &mut Agent, _prototype: Option<Object>) {
        unreachable!("proxy prototype mutation goes through the internal method");
    }

    fn internal_extensible(self, _agent: &Agent) -> bool {
        true
    }

    fn internal_set_extensible(self, _agent: &mut Agent, _extensible: bool) {
        unreachable!("proxy extensibility goes through the internal method");
    }
}

impl InternalMethods for Proxy {
    /// ### [10.5.1 \[\[GetPrototypeOf\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getprototypeof)
    fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "getPrototypeOf")? else {
            return target.internal_get_prototype_of(agent);
        };
        let handler_result = call_function(agent, trap.into(), handler.into(), &[target.into()])?;
        let handler_proto = match handler_result {
            Value::Null => None,
            Value::Object(object) => Some(object),
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'getPrototypeOf' on proxy: trap returned neither object nor null",
                ))
            }
        };
        // 8. If IsExtensible(target) is true, return handlerProto.
        if target.internal_is_extensible(agent)? {
            return Ok(handler_proto);
        }
        // 9-11. A non-extensible target pins the prototype.
        let target_proto = target.internal_get_prototype_of(agent)?;
        if handler_proto != target_proto {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'getPrototypeOf' on proxy: proxy target is non-extensible but the trap did not return its actual prototype",
            ));
        }
        Ok(handler_proto)
    }

    /// ### [10.5.2 \[\[SetPrototypeOf\]\] ( V )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-setprototypeof-v)
    fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "setPrototypeOf")? else {
            return target.internal_set_prototype_of(agent, prototype);
        };
        let proto_value = prototype.map_or(Value::Null, Value::Object);
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), proto_value],
        )?;
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        if target.internal_is_extensible(agent)? {
            return Ok(true);
        }
        let target_proto = target.internal_get_prototype_of(agent)?;
        if prototype != target_proto {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'setPrototypeOf' on proxy: trap returned truish for setting a new prototype on the non-extensible proxy target",
            ));
        }
        Ok(true)
    }

    /// ### [10.5.3 \[\[IsExtensible\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-isextensible)
    fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "isExtensible")? else {
            return target.internal_is_extensible(agent);
        };
        let result = call_function(agent, trap.into(), handler.into(), &[target.into()])?;
        let result = to_boolean(agent, result);
        let target_result = target.internal_is_extensible(agent)?;
        if result != target_result {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'isExtensible' on proxy: trap result does not reflect extensibility of proxy target",
            ));
        }
        Ok(result)
    }

    /// ### [10.5.4 \[\[PreventExtensions\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-preventextensions)
    fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "preventExtensions")? else {
            return target.internal_prevent_extensions(agent);
        };
        let result = call_function(agent, trap.into(), handler.into(), &[target.into()])?;
        let result = to_boolean(agent, result);
        if result && target.internal_is_extensible(agent)? {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'preventExtensions' on proxy: trap returned truish but the proxy target is extensible",
            ));
        }
        Ok(result)
    }

    /// ### [10.5.5 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "getOwnPropertyDescriptor")? else {
            return target.internal_get_own_property(agent, property_key);
        };
        let key_value = property_key.into_value(agent);
        let trap_result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value],
        )?;
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        if trap_result.is_undefined() {
            let Some(target_desc) = target_desc else {
                return Ok(None);
            };
            if !target_desc.configurable.unwrap_or(false) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'getOwnPropertyDescriptor' on proxy: trap returned undefined for a non-configurable property",
                ));
            }
            if !target.internal_is_extensible(agent)? {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'getOwnPropertyDescriptor' on proxy: trap returned undefined for a property of a non-extensible target",
                ));
            }
            return Ok(None);
        }
        let mut result_desc = PropertyDescriptor::from_object(agent, trap_result)?;
        result_desc.complete();
        let extensible = target.internal_is_extensible(agent)?;
        let valid = is_compatible_property_descriptor(agent, extensible, result_desc, target_desc);
        if !valid {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'getOwnPropertyDescriptor' on proxy: trap returned descriptor incompatible with the target property",
            ));
        }
        Ok(Some(result_desc))
    }

    /// ### [10.5.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "defineProperty")? else {
            return target.internal_define_own_property(agent, property_key, property_descriptor);
        };
        let key_value = property_key.into_value(agent);
        let desc_object = property_descriptor.into_object(agent)?;
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value, desc_object],
        )?;
        Ok(to_boolean(agent, result))
    }

    /// ### [10.5.7 \[\[HasProperty\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-hasproperty-p)
    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "has")? else {
            return target.internal_has_property(agent, property_key);
        };
        let key_value = property_key.into_value(agent);
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value],
        )?;
        let result = to_boolean(agent, result);
        if !result {
            // 9. A false answer must not hide a non-configurable property
            //    or any property of a non-extensible target.
            let target_desc = target.internal_get_own_property(agent, property_key)?;
            if let Some(target_desc) = target_desc {
                if !target_desc.configurable.unwrap_or(false) {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "'has' on proxy: trap returned falsish for a non-configurable property",
                    ));
                }
                if !target.internal_is_extensible(agent)? {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "'has' on proxy: trap returned falsish for a property of a non-extensible target",
                    ));
                }
            }
        }
        Ok(result)
    }

    /// ### [10.5.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-get-p-receiver)
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "get")? else {
            return target.internal_get(agent, property_key, receiver);
        };
        let key_value = property_key.into_value(agent);
        let trap_result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value, receiver],
        )?;
        // 9-10. A non-configurable, non-writable data property pins the
        //    value; a non-configurable accessor without a getter pins
        //    undefined.
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        if let Some(target_desc) = target_desc {
            if !target_desc.configurable.unwrap_or(false) {
                if target_desc.is_data_descriptor() && !target_desc.writable.unwrap_or(false) {
                    let expected = target_desc.value.unwrap_or(Value::Undefined);
                    if !same_value(agent, trap_result, expected) {
                        return Err(agent.throw_exception(
                            ExceptionType::TypeError,
                            "'get' on proxy: property is a read-only and non-configurable data property on the proxy target but the proxy did not return its actual value",
                        ));
                    }
                }
                if target_desc.is_accessor_descriptor()
                    && target_desc.get == Some(None)
                    && !trap_result.is_undefined()
                {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "'get' on proxy: property is a non-configurable accessor property without a getter but the trap did not return undefined",
                    ));
                }
            }
        }
        Ok(trap_result)
    }

    /// ### [10.5.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-set-p-v-receiver)
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "set")? else {
            return target.internal_set(agent, property_key, value, receiver);
        };
        let key_value = property_key.into_value(agent);
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value, value, receiver],
        )?;
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        if let Some(target_desc) = target_desc {
            if !target_desc.configurable.unwrap_or(false) {
                if target_desc.is_data_descriptor() && !target_desc.writable.unwrap_or(false) {
                    let expected = target_desc.value.unwrap_or(Value::Undefined);
                    if !same_value(agent, value, expected) {
                        return Err(agent.throw_exception(
                            ExceptionType::TypeError,
                            "'set' on proxy: trap returned truish for a non-writable, non-configurable property",
                        ));
                    }
                }
                if target_desc.is_accessor_descriptor() && target_desc.set == Some(None) {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "'set' on proxy: trap returned truish for a non-configurable accessor property without a setter",
                    ));
                }
            }
        }
        Ok(true)
    }

    /// ### [10.5.10 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-delete-p)
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "deleteProperty")? else {
            return target.internal_delete(agent, property_key);
        };
        let key_value = property_key.into_value(agent);
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), key_value],
        )?;
        if !to_boolean(agent, result) {
            return Ok(false);
        }
        let target_desc = target.internal_get_own_property(agent, property_key)?;
        if let Some(target_desc) = target_desc {
            if !target_desc.configurable.unwrap_or(false) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'deleteProperty' on proxy: trap returned truish for a non-configurable property",
                ));
            }
        }
        Ok(true)
    }

    /// ### [10.5.11 \[\[OwnPropertyKeys\]\] ( )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        use crate::ecmascript::abstract_operations::operations_on_objects::create_list_from_array_like;
        use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "ownKeys")? else {
            return target.internal_own_property_keys(agent);
        };
        let trap_result = call_function(agent, trap.into(), handler.into(), &[target.into()])?;
        let trap_values = create_list_from_array_like(agent, trap_result)?;
        let mut keys = Vec::with_capacity(trap_values.len());
        for value in trap_values {
            if !value.is_string() && !value.is_symbol() {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'ownKeys' on proxy: trap result must contain only strings and symbols",
                ));
            }
            let key = to_property_key(agent, value)?;
            if keys.contains(&key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'ownKeys' on proxy: trap returned duplicate entries",
                ));
            }
            keys.push(key);
        }
        // 15-23. Every non-configurable key of the target must appear, and
        //    a non-extensible target admits exactly its own keys.
        let target_keys = target.internal_own_property_keys(agent)?;
        let extensible = target.internal_is_extensible(agent)?;
        for target_key in &target_keys {
            let target_desc = target.internal_get_own_property(agent, *target_key)?;
            let non_configurable = target_desc
                .as_ref()
                .is_some_and(|desc| !desc.configurable.unwrap_or(false));
            if non_configurable && !keys.contains(target_key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'ownKeys' on proxy: trap result did not include a non-configurable property",
                ));
            }
            if !extensible && !keys.contains(target_key) {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "'ownKeys' on proxy: trap result must include all keys of a non-extensible target",
                ));
            }
        }
        Ok(keys)
    }

    /// ### [10.5.12 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-call-thisargument-argumentslist)
    fn internal_call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "apply")? else {
            return target.internal_call(agent, this_value, arguments_list);
        };
        let args_array: Value = create_array_from_list(agent, arguments_list).into();
        call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), this_value, args_array],
        )
    }

    /// ### [10.5.13 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-proxy-object-internal-methods-and-internal-slots-construct-argumentslist-newtarget)
    fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        let (target, handler) = self.validate(agent)?;
        let Some(trap) = self.get_trap(agent, handler, "construct")? else {
            return target.internal_construct(agent, arguments_list, new_target);
        };
        let args_array: Value = create_array_from_list(agent, arguments_list).into();
        let result = call_function(
            agent,
            trap.into(),
            handler.into(),
            &[target.into(), args_array, new_target.into()],
        )?;
        match result {
            Value::Object(object) => Ok(object),
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "'construct' on proxy: trap returned a non-object",
            )),
        }
    }
}

pub(crate) struct ProxyConstructor;

impl Builtin for ProxyConstructor {
    const NAME: &'static str = "Proxy";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ProxyConstructor::construct);
}

struct ProxyRevocable;
impl Builtin for ProxyRevocable {
    const NAME: &'static str = "revocable";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ProxyConstructor::revocable);
}

impl ProxyConstructor {
    /// ### [28.2.1.1 Proxy ( target, handler )](https://tc39.es/ecma262/#sec-proxy-target-handler)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor Proxy requires 'new'",
            ));
        }
        let proxy = proxy_create(agent, arguments.get(0), arguments.get(1))?;
        Ok(proxy.into())
    }

    /// ### [28.2.2.1 Proxy.revocable ( target, handler )](https://tc39.es/ecma262/#sec-proxy.revocable)
    fn revocable(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let proxy = proxy_create(agent, arguments.get(0), arguments.get(1))?;
        // 3-5. The revoker clears the proxy's target and handler.
        let revoker = create_stateful_builtin_function(
            agent,
            proxy_revoke,
            0,
            "",
            Box::new([proxy.into()]),
        );
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let result =
            super::ordinary::ordinary_object_create(agent, Some(object_prototype.into()));
        let proxy_key = PropertyKey::from_static_str(agent, "proxy");
        crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
            agent,
            result,
            proxy_key,
            proxy.into(),
        )?;
        let revoke_key = PropertyKey::from_static_str(agent, "revoke");
        crate::ecmascript::abstract_operations::operations_on_objects::create_data_property(
            agent,
            result,
            revoke_key,
            revoker.into(),
        )?;
        Ok(result.into())
    }
}

fn proxy_revoke(
    agent: &mut Agent,
    function: BuiltinFunction,
    _this_value: Value,
    _arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::Proxy(proxy)) = function.capture(agent, 0) else {
        unreachable!()
    };
    agent[proxy].target = None;
    agent[proxy].handler = None;
    Ok(Value::Undefined)
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
    let proxy_constructor = agent.get_realm(realm).intrinsics().proxy();
    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, proxy_constructor)
        .with_builtin_function_property::<ProxyRevocable>()
        .build();
}
