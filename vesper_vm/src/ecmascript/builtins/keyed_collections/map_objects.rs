// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24.1 Map Objects](https://tc39.es/ecma262/#sec-map-objects)
//!
//! Entries live in an insertion-ordered vector with tombstones, so that
//! live iterators observe deletions and later insertions correctly, plus a
//! SameValueZero-keyed index map.

use core::ops::{Index, IndexMut};

use ahash::AHashMap;

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{call_function, get};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{BuiltinIterator, IteratorKind};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyKey, Value,
};
use crate::heap::indexes::{MapIndex, ObjectIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

use super::ValueKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Map(pub(crate) MapIndex);

#[derive(Debug, Clone, Default)]
pub struct MapHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[MapData]]: insertion-ordered entries; `None` marks a deleted
    /// entry kept for iterator stability.
    pub(crate) entries: Vec<Option<(Value, Value)>>,
    pub(crate) index: AHashMap<ValueKey, u32>,
    pub(crate) size: u32,
}

impl Index<Map> for Agent {
    type Output = MapHeapData;

    fn index(&self, index: Map) -> &Self::Output {
        self.heap
            .maps
            .get(index.0.into_index())
            .expect("Map out of bounds")
            .as_ref()
            .expect("Map slot empty")
    }
}

impl IndexMut<Map> for Agent {
    fn index_mut(&mut self, index: Map) -> &mut Self::Output {
        self.heap
            .maps
            .get_mut(index.0.into_index())
            .expect("Map out of bounds")
            .as_mut()
            .expect("Map slot empty")
    }
}

impl From<Map> for Object {
    fn from(value: Map) -> Self {
        Object::Map(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(Object::Map(value))
    }
}

impl InternalSlots for Map {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Map;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Map {}

impl Map {
    pub(crate) fn get_entry(self, agent: &Agent, key: Value) -> Option<Value> {
        let key = ValueKey::new(key);
        let slot = *agent[self].index.get(&key)?;
        agent[self].entries[slot as usize].map(|(_, value)| value)
    }

    pub(crate) fn set_entry(self, agent: &mut Agent, key: Value, value: Value) {
        let key = ValueKey::new(key);
        let data = &mut agent[self];
        match data.index.get(&key) {
            Some(slot) => {
                data.entries[*slot as usize] = Some((key.value(), value));
            }
            None => {
                data.index.insert(key, data.entries.len() as u32);
                data.entries.push(Some((key.value(), value)));
                data.size += 1;
            }
        }
    }

    pub(crate) fn delete_entry(self, agent: &mut Agent, key: Value) -> bool {
        let key = ValueKey::new(key);
        let data = &mut agent[self];
        match data.index.remove(&key) {
            Some(slot) => {
                data.entries[slot as usize] = None;
                data.size -= 1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_entries(self, agent: &mut Agent) {
        let data = &mut agent[self];
        for entry in data.entries.iter_mut() {
            *entry = None;
        }
        data.index.clear();
        data.size = 0;
    }
}

fn this_map(agent: &mut Agent, this_value: Value) -> JsResult<Map> {
    match this_value {
        Value::Object(Object::Map(map)) => Ok(map),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a Map",
        )),
    }
}

pub(crate) struct MapConstructor;

impl Builtin for MapConstructor {
    const NAME: &'static str = "Map";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(MapConstructor::construct);
}

impl MapConstructor {
    /// ### [24.1.1.1 Map ( \[ iterable \] )](https://tc39.es/ecma262/#sec-map-iterable)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, throw a TypeError exception.
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor Map requires 'new'",
            ));
        }
        // 2-3. Create the map.
        let map = Map(agent.heap.create(MapHeapData::default()));
        // 4-5. If iterable is either undefined or null, return map.
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(map.into());
        }
        // 6. Add every [key, value] pair of the iterable.
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
            map.set_entry(agent, key, value);
        }
        Ok(map.into())
    }
}

pub(crate) struct MapPrototype;

struct MapPrototypeGet;
impl Builtin for MapPrototypeGet {
    const NAME: &'static str = "get";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::get);
}

struct MapPrototypeSet;
impl Builtin for MapPrototypeSet {
    const NAME: &'static str = "set";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::set);
}

struct MapPrototypeHas;
impl Builtin for MapPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::has);
}

struct MapPrototypeDelete;
impl Builtin for MapPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::delete);
}

struct MapPrototypeClear;
impl Builtin for MapPrototypeClear {
    const NAME: &'static str = "clear";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::clear);
}

struct MapPrototypeGetSize;
impl Builtin for MapPrototypeGetSize {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::get_size);
}

struct MapPrototypeForEach;
impl Builtin for MapPrototypeForEach {
    const NAME: &'static str = "forEach";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::for_each);
}

struct MapPrototypeEntries;
impl Builtin for MapPrototypeEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::entries);
}

struct MapPrototypeKeys;
impl Builtin for MapPrototypeKeys {
    const NAME: &'static str = "keys";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::keys);
}

struct MapPrototypeValues;
impl Builtin for MapPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::values);
}

struct MapPrototypeIterator;
impl Builtin for MapPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MapPrototype::entries);
}

impl MapPrototype {
    /// ### [24.1.3.6 Map.prototype.get ( key )](https://tc39.es/ecma262/#sec-map.prototype.get)
    fn get(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(map
            .get_entry(agent, arguments.get(0))
            .unwrap_or(Value::Undefined))
    }

    /// ### [24.1.3.9 Map.prototype.set ( key, value )](https://tc39.es/ecma262/#sec-map.prototype.set)
    fn set(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        map.set_entry(agent, arguments.get(0), arguments.get(1));
        Ok(this_value)
    }

    /// ### [24.1.3.7 Map.prototype.has ( key )](https://tc39.es/ecma262/#sec-map.prototype.has)
    fn has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(Value::Boolean(map.get_entry(agent, arguments.get(0)).is_some()))
    }

    /// ### [24.1.3.3 Map.prototype.delete ( key )](https://tc39.es/ecma262/#sec-map.prototype.delete)
    fn delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(Value::Boolean(map.delete_entry(agent, arguments.get(0))))
    }

    /// ### [24.1.3.1 Map.prototype.clear ( )](https://tc39.es/ecma262/#sec-map.prototype.clear)
    fn clear(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        map.clear_entries(agent);
        Ok(Value::Undefined)
    }

    /// ### [get Map.prototype.size](https://tc39.es/ecma262/#sec-get-map.prototype.size)
    fn get_size(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(Value::from(agent[map].size))
    }

    /// ### [24.1.3.5 Map.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-map.prototype.foreach)
    fn for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        // 5. Iterate over live entries in insertion order, observing
        //    mutations made by the callback.
        let mut slot = 0usize;
        while slot < agent[map].entries.len() {
            if let Some((key, value)) = agent[map].entries[slot] {
                call_function(agent, callback, this_arg, &[value, key, this_value])?;
            }
            slot += 1;
        }
        Ok(Value::Undefined)
    }

    /// ### [24.1.3.4 Map.prototype.entries ( )](https://tc39.es/ecma262/#sec-map.prototype.entries)
    fn entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::MapEntries, map.into()).into())
    }

    /// ### [24.1.3.8 Map.prototype.keys ( )](https://tc39.es/ecma262/#sec-map.prototype.keys)
    fn keys(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::MapKeys, map.into()).into())
    }

    /// ### [24.1.3.10 Map.prototype.values ( )](https://tc39.es/ecma262/#sec-map.prototype.values)
    fn values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let map = this_map(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::MapValues, map.into()).into())
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let map_prototype = intrinsics.map_prototype();
    let map_constructor = intrinsics.map();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, map_constructor)
        .with_prototype_property(map_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, map_prototype)
        .with_constructor_property(map_constructor)
        .with_builtin_function_property::<MapPrototypeGet>()
        .with_builtin_function_property::<MapPrototypeSet>()
        .with_builtin_function_property::<MapPrototypeHas>()
        .with_builtin_function_property::<MapPrototypeDelete>()
        .with_builtin_function_property::<MapPrototypeClear>()
        .with_builtin_getter_property::<MapPrototypeGetSize>()
        .with_builtin_function_property::<MapPrototypeForEach>()
        .with_builtin_function_property::<MapPrototypeEntries>()
        .with_builtin_function_property::<MapPrototypeKeys>()
        .with_builtin_function_property::<MapPrototypeValues>()
        .with_builtin_function_property::<MapPrototypeIterator>()
        .with_to_string_tag("Map")
        .build();
}
