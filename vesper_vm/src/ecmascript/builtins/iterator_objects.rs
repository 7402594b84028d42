// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.1 Iteration](https://tc39.es/ecma262/#sec-iteration)
//!
//! %IteratorPrototype% and the built-in iterator objects over arrays,
//! strings, maps and sets. One heap kind serves them all, tagged with the
//! collection flavour and a cursor.

use core::ops::{Index, IndexMut};

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::create_iter_result_object;
use crate::ecmascript::abstract_operations::operations_on_objects::get;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyKey, Value,
};
use crate::heap::indexes::{BuiltinIteratorIndex, ObjectIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BuiltinIterator(pub(crate) BuiltinIteratorIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorKind {
    ArrayKeys,
    ArrayValues,
    ArrayEntries,
    StringCodePoints,
    MapKeys,
    MapValues,
    MapEntries,
    SetValues,
    SetEntries,
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinIteratorHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) kind: IteratorKind,
    /// The iterated collection (or string).
    pub(crate) target: Value,
    /// Next position: an element index, entry slot or code unit offset.
    pub(crate) position: u32,
    pub(crate) done: bool,
}

impl Index<BuiltinIterator> for Agent {
    type Output = BuiltinIteratorHeapData;

    fn index(&self, index: BuiltinIterator) -> &Self::Output {
        self.heap
            .builtin_iterators
            .get(index.0.into_index())
            .expect("BuiltinIterator out of bounds")
            .as_ref()
            .expect("BuiltinIterator slot empty")
    }
}

impl IndexMut<BuiltinIterator> for Agent {
    fn index_mut(&mut self, index: BuiltinIterator) -> &mut Self::Output {
        self.heap
            .builtin_iterators
            .get_mut(index.0.into_index())
            .expect("BuiltinIterator out of bounds")
            .as_mut()
            .expect("BuiltinIterator slot empty")
    }
}

impl From<BuiltinIterator> for Object {
    fn from(value: BuiltinIterator) -> Self {
        Object::BuiltinIterator(value)
    }
}

impl From<BuiltinIterator> for Value {
    fn from(value: BuiltinIterator) -> Self {
        Value::Object(Object::BuiltinIterator(value))
    }
}

impl BuiltinIterator {
    pub(crate) fn create(agent: &mut Agent, kind: IteratorKind, target: Value) -> Self {
        BuiltinIterator(agent.heap.create(BuiltinIteratorHeapData {
            object_index: None,
            kind,
            target,
            position: 0,
            done: false,
        }))
    }
}

impl InternalSlots for BuiltinIterator {
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
                let intrinsic = match agent[self].kind {
                    IteratorKind::ArrayKeys
                    | IteratorKind::ArrayValues
                    | IteratorKind::ArrayEntries => ProtoIntrinsics::ArrayIterator,
                    IteratorKind::StringCodePoints => ProtoIntrinsics::StringIterator,
                    IteratorKind::MapKeys | IteratorKind::MapValues | IteratorKind::MapEntries => {
                        ProtoIntrinsics::MapIterator
                    }
                    IteratorKind::SetValues | IteratorKind::SetEntries => {
                        ProtoIntrinsics::SetIterator
                    }
                };
                Some(
                    agent
                        .current_realm()
                        .intrinsics()
                        .get_proto_intrinsic(intrinsic),
                )
            }
        }
    }
}

impl InternalMethods for BuiltinIterator {}

/// The shared `next` of the built-in collection iterators.
fn builtin_iterator_next(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList,
) -> JsResult<Value> {
    let Value::Object(Object::BuiltinIterator(iterator)) = this_value else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "next method called on incompatible receiver",
        ));
    };
    if agent[iterator].done {
        let result = create_iter_result_object(agent, Value::Undefined, true);
        return Ok(result.into());
    }
    let kind = agent[iterator].kind;
    let target = agent[iterator].target;
    let step = match kind {
        IteratorKind::ArrayKeys | IteratorKind::ArrayValues | IteratorKind::ArrayEntries => {
            array_iterator_step(agent, iterator, kind, target)?
        }
        IteratorKind::StringCodePoints => string_iterator_step(agent, iterator, target)?,
        IteratorKind::MapKeys | IteratorKind::MapValues | IteratorKind::MapEntries => {
            map_iterator_step(agent, iterator, kind, target)
        }
        IteratorKind::SetValues | IteratorKind::SetEntries => {
            set_iterator_step(agent, iterator, kind, target)
        }
    };
    let result = match step {
        Some(value) => create_iter_result_object(agent, value, false),
        None => {
            agent[iterator].done = true;
            create_iter_result_object(agent, Value::Undefined, true)
        }
    };
    Ok(result.into())
}

fn array_iterator_step(
    agent: &mut Agent,
    iterator: BuiltinIterator,
    kind: IteratorKind,
    target: Value,
) -> JsResult<Option<Value>> {
    let Value::Object(target) = target else {
        return Ok(None);
    };
    // Array iterators also serve generic array-likes through Get.
    let length =
        crate::ecmascript::abstract_operations::operations_on_objects::length_of_array_like(
            agent, target,
        )? as u32;
    let index = agent[iterator].position;
    if index >= length {
        return Ok(None);
    }
    agent[iterator].position = index + 1;
    match kind {
        IteratorKind::ArrayKeys => Ok(Some(Value::from(index))),
        IteratorKind::ArrayValues => {
            let value = get(agent, target, PropertyKey::Integer(index))?;
            Ok(Some(value))
        }
        _ => {
            let value = get(agent, target, PropertyKey::Integer(index))?;
            let entry = create_array_from_list(agent, &[Value::from(index), value]);
            Ok(Some(entry.into()))
        }
    }
}

fn string_iterator_step(
    agent: &mut Agent,
    iterator: BuiltinIterator,
    target: Value,
) -> JsResult<Option<Value>> {
    let Value::String(string) = target else {
        return Ok(None);
    };
    let position = agent[iterator].position as usize;
    let units = string.code_units(agent);
    if position >= units.len() {
        return Ok(None);
    }
    // Step by whole code points, yielding surrogate pairs together.
    let first = units[position];
    let pair = if (0xD800..0xDC00).contains(&first)
        && position + 1 < units.len()
        && (0xDC00..0xE000).contains(&units[position + 1])
    {
        2
    } else {
        1
    };
    agent[iterator].position = (position + pair) as u32;
    let result = crate::ecmascript::types::HeapString::from_code_units(
        agent,
        &units[position..position + pair],
    );
    Ok(Some(result.into()))
}

fn map_iterator_step(
    agent: &mut Agent,
    iterator: BuiltinIterator,
    kind: IteratorKind,
    target: Value,
) -> Option<Value> {
    let Value::Object(Object::Map(map)) = target else {
        return None;
    };
    loop {
        let slot = agent[iterator].position as usize;
        if slot >= agent[map].entries.len() {
            return None;
        }
        agent[iterator].position += 1;
        if let Some((key, value)) = agent[map].entries[slot] {
            return Some(match kind {
                IteratorKind::MapKeys => key,
                IteratorKind::MapValues => value,
                _ => create_array_from_list(agent, &[key, value]).into(),
            });
        }
    }
}

fn set_iterator_step(
    agent: &mut Agent,
    iterator: BuiltinIterator,
    kind: IteratorKind,
    target: Value,
) -> Option<Value> {
    let Value::Object(Object::Set(set)) = target else {
        return None;
    };
    loop {
        let slot = agent[iterator].position as usize;
        if slot >= agent[set].entries.len() {
            return None;
        }
        agent[iterator].position += 1;
        if let Some(value) = agent[set].entries[slot] {
            return Some(match kind {
                IteratorKind::SetEntries => create_array_from_list(agent, &[value, value]).into(),
                _ => value,
            });
        }
    }
}

struct IteratorPrototypeIterator;
impl Builtin for IteratorPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(iterator_prototype_iterator);
}

/// ### [27.1.2.1 %IteratorPrototype% \[ %Symbol.iterator% \] ( )](https://tc39.es/ecma262/#sec-%iteratorprototype%-%symbol.iterator%)
fn iterator_prototype_iterator(
    _agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList,
) -> JsResult<Value> {
    // 1. Return the this value.
    Ok(this_value)
}

struct BuiltinIteratorNext;
impl Builtin for BuiltinIteratorNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(builtin_iterator_next);
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let iterator_prototype = intrinsics.iterator_prototype();
    let array_iterator_prototype = intrinsics.array_iterator_prototype();
    let string_iterator_prototype = intrinsics.string_iterator_prototype();
    let map_iterator_prototype = intrinsics.map_iterator_prototype();
    let set_iterator_prototype = intrinsics.set_iterator_prototype();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, iterator_prototype)
        .with_builtin_function_property::<IteratorPrototypeIterator>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, array_iterator_prototype)
        .with_builtin_function_property::<BuiltinIteratorNext>()
        .with_to_string_tag("Array Iterator")
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, string_iterator_prototype)
        .with_builtin_function_property::<BuiltinIteratorNext>()
        .with_to_string_tag("String Iterator")
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, map_iterator_prototype)
        .with_builtin_function_property::<BuiltinIteratorNext>()
        .with_to_string_tag("Map Iterator")
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, set_iterator_prototype)
        .with_builtin_function_property::<BuiltinIteratorNext>()
        .with_to_string_tag("Set Iterator")
        .build();
}
