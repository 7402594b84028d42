// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24.3 WeakMap Objects](https://tc39.es/ecma262/#sec-weakmap-objects)
//!
//! Keys must be objects (or registered symbols are rejected as in the
//! pre-symbols-as-weakmap-keys language). The heap is an arena reclaimed
//! with the agent, so entries live until the agent is dropped; this is
//! observationally within the language's non-guarantees about promptness.

use core::ops::{Index, IndexMut};

use ahash::AHashMap;

use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{ObjectIndex, WeakMapIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WeakMap(pub(crate) WeakMapIndex);

#[derive(Debug, Clone, Default)]
pub struct WeakMapHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[WeakMapData]], keyed by object identity.
    pub(crate) entries: AHashMap<Object, Value>,
}

impl Index<WeakMap> for Agent {
    type Output = WeakMapHeapData;

    fn index(&self, index: WeakMap) -> &Self::Output {
        self.heap
            .weak_maps
            .get(index.0.into_index())
            .expect("WeakMap out of bounds")
            .as_ref()
            .expect("WeakMap slot empty")
    }
}

impl IndexMut<WeakMap> for Agent {
    fn index_mut(&mut self, index: WeakMap) -> &mut Self::Output {
        self.heap
            .weak_maps
            .get_mut(index.0.into_index())
            .expect("WeakMap out of bounds")
            .as_mut()
            .expect("WeakMap slot empty")
    }
}

impl From<WeakMap> for Object {
    fn from(value: WeakMap) -> Self {
        Object::WeakMap(value)
    }
}

impl From<WeakMap> for Value {
    fn from(value: WeakMap) -> Self {
        Value::Object(Object::WeakMap(value))
    }
}

impl InternalSlots for WeakMap {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::WeakMap;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for WeakMap {}

fn this_weak_map(agent: &mut Agent, this_value: Value) -> JsResult<WeakMap> {
    match this_value {
        Value::Object(Object::WeakMap(weak_map)) => Ok(weak_map),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a WeakMap",
        )),
    }
}

fn require_object_key(agent: &mut Agent, key: Value) -> JsResult<Object> {
    match key {
        Value::Object(object) => Ok(object),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Invalid value used as weak map key",
        )),
    }
}

pub(crate) struct WeakMapConstructor;

impl Builtin for WeakMapConstructor {
    const NAME: &'static str = "WeakMap";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(WeakMapConstructor::construct);
}

impl WeakMapConstructor {
    /// ### [24.3.1.1 WeakMap ( \[ iterable \] )](https://tc39.es/ecma262/#sec-weakmap-iterable)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
        use crate::ecmascript::abstract_operations::operations_on_objects::get;
        use crate::ecmascript::types::PropertyKey;
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor WeakMap requires 'new'",
            ));
        }
        let weak_map = WeakMap(agent.heap.create(WeakMapHeapData::default()));
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(weak_map.into());
        }
        let entries = iterable_to_list(agent, iterable)?;
        for entry in entries {
            let Value::Object(entry) = entry else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Iterator value is not an entry object",
                ));
            };
            let key = get(agent, entry, PropertyKey::Integer(0))?;
            let value = get(agent, entry, PropertyKey::Integer(1))?;
            let key = require_object_key(agent, key)?;
            agent[weak_map].entries.insert(key, value);
        }
        Ok(weak_map.into())
    }
}

pub(crate) struct WeakMapPrototype;

struct WeakMapPrototypeGet;
impl Builtin for WeakMapPrototypeGet {
    const NAME: &'static str = "get";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakMapPrototype::get);
}

struct WeakMapPrototypeSet;
impl Builtin for WeakMapPrototypeSet {
    const NAME: &'static str = "set";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakMapPrototype::set);
}

struct WeakMapPrototypeHas;
impl Builtin for WeakMapPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakMapPrototype::has);
}

struct WeakMapPrototypeDelete;
impl Builtin for WeakMapPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakMapPrototype::delete);
}

impl WeakMapPrototype {
    /// ### [24.3.3.3 WeakMap.prototype.get ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.get)
    fn get(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_map = this_weak_map(agent, this_value)?;
        let Value::Object(key) = arguments.get(0) else {
            return Ok(Value::Undefined);
        };
        Ok(agent[weak_map]
            .entries
            .get(&key)
            .copied()
            .unwrap_or(Value::Undefined))
    }

    /// ### [24.3.3.5 WeakMap.prototype.set ( key, value )](https://tc39.es/ecma262/#sec-weakmap.prototype.set)
    fn set(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_map = this_weak_map(agent, this_value)?;
        let key = require_object_key(agent, arguments.get(0))?;
        agent[weak_map].entries.insert(key, arguments.get(1));
        Ok(this_value)
    }

    /// ### [24.3.3.4 WeakMap.prototype.has ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.has)
    fn has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_map = this_weak_map(agent, this_value)?;
        let Value::Object(key) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(agent[weak_map].entries.contains_key(&key)))
    }

    /// ### [24.3.3.2 WeakMap.prototype.delete ( key )](https://tc39.es/ecma262/#sec-weakmap.prototype.delete)
    fn delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_map = this_weak_map(agent, this_value)?;
        let Value::Object(key) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(agent[weak_map].entries.remove(&key).is_some()))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let weak_map_prototype = intrinsics.weak_map_prototype();
    let weak_map_constructor = intrinsics.weak_map();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, weak_map_constructor)
        .with_prototype_property(weak_map_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, weak_map_prototype)
        .with_constructor_property(weak_map_constructor)
        .with_builtin_function_property::<WeakMapPrototypeGet>()
        .with_builtin_function_property::<WeakMapPrototypeSet>()
        .with_builtin_function_property::<WeakMapPrototypeHas>()
        .with_builtin_function_property::<WeakMapPrototypeDelete>()
        .with_to_string_tag("WeakMap")
        .build();
}
