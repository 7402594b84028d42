// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [24.4 WeakSet Objects](https://tc39.es/ecma262/#sec-weakset-objects)

use core::ops::{Index, IndexMut};

use ahash::AHashSet;

use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{ObjectIndex, WeakSetIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WeakSet(pub(crate) WeakSetIndex);

#[derive(Debug, Clone, Default)]
pub struct WeakSetHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[WeakSetData]], by object identity.
    pub(crate) entries: AHashSet<Object>,
}

impl Index<WeakSet> for Agent {
    type Output = WeakSetHeapData;

    fn index(&self, index: WeakSet) -> &Self::Output {
        self.heap
            .weak_sets
            .get(index.0.into_index())
            .expect("WeakSet out of bounds")
            .as_ref()
            .expect("WeakSet slot empty")
    }
}

impl IndexMut<WeakSet> for Agent {
    fn index_mut(&mut self, index: WeakSet) -> &mut Self::Output {
        self.heap
            .weak_sets
            .get_mut(index.0.into_index())
            .expect("WeakSet out of bounds")
            .as_mut()
            .expect("WeakSet slot empty")
    }
}

impl From<WeakSet> for Object {
    fn from(value: WeakSet) -> Self {
        Object::WeakSet(value)
    }
}

impl From<WeakSet> for Value {
    fn from(value: WeakSet) -> Self {
        Value::Object(Object::WeakSet(value))
    }
}

impl InternalSlots for WeakSet {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::WeakSet;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for WeakSet {}

fn this_weak_set(agent: &mut Agent, this_value: Value) -> JsResult<WeakSet> {
    match this_value {
        Value::Object(Object::WeakSet(weak_set)) => Ok(weak_set),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a WeakSet",
        )),
    }
}

pub(crate) struct WeakSetConstructor;

impl Builtin for WeakSetConstructor {
    const NAME: &'static str = "WeakSet";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(WeakSetConstructor::construct);
}

impl WeakSetConstructor {
    /// ### [24.4.1.1 WeakSet ( \[ iterable \] )](https://tc39.es/ecma262/#sec-weakset-iterable)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
        if new_target.is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Constructor WeakSet requires 'new'",
            ));
        }
        let weak_set = WeakSet(agent.heap.create(WeakSetHeapData::default()));
        let iterable = arguments.get(0);
        if iterable.is_nullish() {
            return Ok(weak_set.into());
        }
        let values = iterable_to_list(agent, iterable)?;
        for value in values {
            let Value::Object(object) = value else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Invalid value used in weak set",
                ));
            };
            agent[weak_set].entries.insert(object);
        }
        Ok(weak_set.into())
    }
}

pub(crate) struct WeakSetPrototype;

struct WeakSetPrototypeAdd;
impl Builtin for WeakSetPrototypeAdd {
    const NAME: &'static str = "add";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakSetPrototype::add);
}

struct WeakSetPrototypeHas;
impl Builtin for WeakSetPrototypeHas {
    const NAME: &'static str = "has";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakSetPrototype::has);
}

struct WeakSetPrototypeDelete;
impl Builtin for WeakSetPrototypeDelete {
    const NAME: &'static str = "delete";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(WeakSetPrototype::delete);
}

impl WeakSetPrototype {
    /// ### [24.4.3.1 WeakSet.prototype.add ( value )](https://tc39.es/ecma262/#sec-weakset.prototype.add)
    fn add(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_set = this_weak_set(agent, this_value)?;
        let Value::Object(object) = arguments.get(0) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Invalid value used in weak set",
            ));
        };
        agent[weak_set].entries.insert(object);
        Ok(this_value)
    }

    /// ### [24.4.3.4 WeakSet.prototype.has ( value )](https://tc39.es/ecma262/#sec-weakset.prototype.has)
    fn has(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_set = this_weak_set(agent, this_value)?;
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(agent[weak_set].entries.contains(&object)))
    }

    /// ### [24.4.3.3 WeakSet.prototype.delete ( value )](https://tc39.es/ecma262/#sec-weakset.prototype.delete)
    fn delete(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let weak_set = this_weak_set(agent, this_value)?;
        let Value::Object(object) = arguments.get(0) else {
            return Ok(Value::Boolean(false));
        };
        Ok(Value::Boolean(agent[weak_set].entries.remove(&object)))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let weak_set_prototype = intrinsics.weak_set_prototype();
    let weak_set_constructor = intrinsics.weak_set();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, weak_set_constructor)
        .with_prototype_property(weak_set_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, weak_set_prototype)
        .with_constructor_property(weak_set_constructor)
        .with_builtin_function_property::<WeakSetPrototypeAdd>()
        .with_builtin_function_property::<WeakSetPrototypeHas>()
        .with_builtin_function_property::<WeakSetPrototypeDelete>()
        .with_to_string_tag("WeakSet")
        .build();
}
