// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24.2 Set Objects](https://tc39.es/ecma262/#sec-set-objects)

use core::ops::{Index, IndexMut};

use ahash::AHashMap;

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{BuiltinIterator, IteratorKind};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{ObjectIndex, SetIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

use super::ValueKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Set(pub(crate) SetIndex);

#[derive(Debug, Clone, Default)]
pub struct SetHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[SetData]]
    pub(crate) entries: Vec<Option<Value>>,
    pub(crate) index: AHashMap<ValueKey, u32>,
    pub(crate) size: u32,
}

impl Index<Set> for Agent {
    type Output = SetHeapData;

    fn index(&self, index: Set) -> &Self::Output {
        self.heap
            .sets
            .get(index.0.into_index())
            .expect("Set out of bounds")
            .as_ref()
            .expect("Set slot empty")
    }
}

impl IndexMut<Set> for Agent {
    fn index_mut(&mut self, index: Set) -> &mut Self::Output {
        self.heap
            .sets
            .get_mut(index.0.into_index())
            .expect("Set out of bounds")
            .as_mut()
            .expect("Set slot empty")
    }
}

impl From<Set> for Object {
    fn from(value: Set) -> Self {
        Object::Set(value)
    }
}

impl From<Set> for Value {
    fn from(value: Set) -> Self {
        Value::Object(Object::Set(value))
    }
}

impl InternalSlots for Set {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Set;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Set {}

impl Set {
    pub(crate) fn has_value(self, agent: &Agent, value: Value) -> bool {
        agent[self].index.contains_key(&ValueKey::new(value))
    }

    pub(crate) fn add_value(self, agent: &mut Agent, value: Value) {
        let key = ValueKey::new(value);
        let data = &mut agent[self];
        if !data.index.contains_key(&key) {
            data.index.insert(key, data.entries.len() as u32);
            data.entries.push(Some(key.value()));
            data.size += 1;
        }
    }

    pub(crate) fn delete_value(self, agent: &mut Agent, value: Value) -> bool {
        let key = ValueKey::new(value);
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
}

fn this_set(agent: &mut Agent, this_value: Value) -> JsResult<Set> {
    match this_value {
        Value::Object(Object::Set(set)) => Ok(set),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a Set",
        )),
    }
}

pub(crate) struct SetConstructor;

impl Builtin for SetConstructor {
    const NAME: &'static str = "Set";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(SetConstructor::construct);
}

impl SetConstructor {
    /// ### [24.2.2.1 Set ( \[ iterable \] )](https://tc39.es/ecma262/#sec-set-iterable)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor Set requires 'new'",
            ));
        }
        let set = Set(agent.heap.create(SetHeapData::default()));
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(set.into());
        }
        let values = iterable_to_list(agent, iterable)?;
        for value in values {
            set.add_value(agent, value);
        }
        Ok(set.into())
    }
}

pub(crate) struct SetPrototype;

struct SetPrototypeAdd;
impl Builtin for SetPrototypeAdd {
    const NAME: &'static str = "add";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::add);
}

struct SetPrototypeHas;
impl Builtin for SetPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::has);
}

struct SetPrototypeDelete;
impl Builtin for SetPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::delete);
}

struct SetPrototypeClear;
impl Builtin for SetPrototypeClear {
    const NAME: &'static str = "clear";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::clear);
}

struct SetPrototypeGetSize;
impl Builtin for SetPrototypeGetSize {
    const NAME: &'static str = "size";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::get_size);
}

struct SetPrototypeForEach;
impl Builtin for SetPrototypeForEach {
    const NAME: &'static str = "forEach";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::for_each);
}

struct SetPrototypeValues;
impl Builtin for SetPrototypeValues {
    const NAME: &'static str = "values";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::values);
}

struct SetPrototypeKeys;
impl Builtin for SetPrototypeKeys {
    const NAME: &'static str = "keys";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::values);
}

struct SetPrototypeEntries;
impl Builtin for SetPrototypeEntries {
    const NAME: &'static str = "entries";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::entries);
}

struct SetPrototypeIterator;
impl Builtin for SetPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SetPrototype::values);
}

impl SetPrototype {
    /// ### [24.2.4.1 Set.prototype.add ( value )](https://tc39.es/ecma262/#sec-set.prototype.add)
    fn add(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        set.add_value(agent, arguments.get(0));
        Ok(this_value)
    }

    /// ### [24.2.4.8 Set.prototype.has ( value )](https://tc39.es/ecma262/#sec-set.prototype.has)
    fn has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        Ok(Value::Boolean(set.has_value(agent, arguments.get(0))))
    }

    /// ### [24.2.4.4 Set.prototype.delete ( value )](https://tc39.es/ecma262/#sec-set.prototype.delete)
    fn delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        Ok(Value::Boolean(set.delete_value(agent, arguments.get(0))))
    }

    /// ### [24.2.4.2 Set.prototype.clear ( )](https://tc39.es/ecma262/#sec-set.prototype.clear)
    fn clear(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        let data = &mut agent[set];
        for entry in data.entries.iter_mut() {
            *entry = None;
        }
        data.index.clear();
        data.size = 0;
        Ok(Value::Undefined)
    }

    /// ### [get Set.prototype.size](https://tc39.es/ecma262/#sec-get-set.prototype.size)
    fn get_size(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        Ok(Value::from(agent[set].size))
    }

    /// ### [24.2.4.6 Set.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-set.prototype.foreach)
    fn for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        let mut slot = 0usize;
        while slot < agent[set].entries.len() {
            if let Some(value) = agent[set].entries[slot] {
                call_function(agent, callback, this_arg, &[value, value, this_value])?;
            }
            slot += 1;
        }
        Ok(Value::Undefined)
    }

    /// ### [24.2.4.11 Set.prototype.values ( )](https://tc39.es/ecma262/#sec-set.prototype.values)
    fn values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::SetValues, set.into()).into())
    }

    /// ### [24.2.4.5 Set.prototype.entries ( )](https://tc39.es/ecma262/#sec-set.prototype.entries)
    fn entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let set = this_set(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::SetEntries, set.into()).into())
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let set_prototype = intrinsics.set_prototype();
    let set_constructor = intrinsics.set();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, set_constructor)
        .with_prototype_property(set_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, set_prototype)
        .with_constructor_property(set_constructor)
        .with_builtin_function_property::<SetPrototypeAdd>()
        .with_builtin_function_property::<SetPrototypeHas>()
        .with_builtin_function_property::<SetPrototypeDelete>()
        .with_builtin_function_property::<SetPrototypeClear>()
        .with_builtin_getter_property::<SetPrototypeGetSize>()
        .with_builtin_function_property::<SetPrototypeForEach>()
        .with_builtin_function_property::<SetPrototypeValues>()
        .with_builtin_function_property::<SetPrototypeKeys>()
        .with_builtin_function_property::<SetPrototypeEntries>()
        .with_builtin_function_property::<SetPrototypeIterator>()
        .with_to_string_tag("Set")
        .build();
}
