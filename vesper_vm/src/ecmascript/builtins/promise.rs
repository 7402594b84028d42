// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2 Promise Objects](https://tc39.es/ecma262/#sec-promise-objects)

use core::ops::{Index, IndexMut};

use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{
    Function, InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{ObjectIndex, PromiseIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Promise(pub(crate) PromiseIndex);

/// ### \[\[PromiseState]]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

/// Whether a reaction runs on fulfillment or rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromiseReactionType {
    Fulfill,
    Reject,
}

/// ### [27.2.1.2 PromiseReaction Records](https://tc39.es/ecma262/#sec-promisereaction-records)
#[derive(Debug, Clone, Copy)]
pub(crate) struct PromiseReaction {
    /// \[\[Capability]]: the derived promise to settle with the handler's
    /// result.
    pub(crate) capability: Option<Promise>,
    /// \[\[Type]]
    pub(crate) reaction_type: PromiseReactionType,
    /// \[\[Handler]]
    pub(crate) handler: Option<Function>,
}

#[derive(Debug, Clone, Default)]
pub struct PromiseHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[PromiseState]]
    pub(crate) state: PromiseStateSlot,
    /// \[\[PromiseFulfillReactions]] and \[\[PromiseRejectReactions]]
    pub(crate) fulfill_reactions: Vec<PromiseReaction>,
    pub(crate) reject_reactions: Vec<PromiseReaction>,
    /// \[\[PromiseIsHandled]]
    pub(crate) is_handled: bool,
    /// Guards against a resolve/reject pair being used twice.
    pub(crate) already_resolved: bool,
}

/// \[\[PromiseState]] plus \[\[PromiseResult]].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum PromiseStateSlot {
    #[default]
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

impl PromiseStateSlot {
    pub(crate) fn state(&self) -> PromiseState {
        match self {
            PromiseStateSlot::Pending => PromiseState::Pending,
            PromiseStateSlot::Fulfilled(_) => PromiseState::Fulfilled,
            PromiseStateSlot::Rejected(_) => PromiseState::Rejected,
        }
    }
}

impl Index<Promise> for Agent {
    type Output = PromiseHeapData;

    fn index(&self, index: Promise) -> &Self::Output {
        self.heap
            .promises
            .get(index.0.into_index())
            .expect("Promise out of bounds")
            .as_ref()
            .expect("Promise slot empty")
    }
}

impl IndexMut<Promise> for Agent {
    fn index_mut(&mut self, index: Promise) -> &mut Self::Output {
        self.heap
            .promises
            .get_mut(index.0.into_index())
            .expect("Promise out of bounds")
            .as_mut()
            .expect("Promise slot empty")
    }
}

impl From<Promise> for Object {
    fn from(value: Promise) -> Self {
        Object::Promise(value)
    }
}

impl From<Promise> for Value {
    fn from(value: Promise) -> Self {
        Value::Object(Object::Promise(value))
    }
}

impl Promise {
    pub(crate) fn new_pending(agent: &mut Agent) -> Self {
        Promise(agent.heap.create(PromiseHeapData::default()))
    }

    pub fn state(self, agent: &Agent) -> PromiseState {
        agent[self].state.state()
    }

    pub fn result(self, agent: &Agent) -> Option<Value> {
        match agent[self].state {
            PromiseStateSlot::Pending => None,
            PromiseStateSlot::Fulfilled(value) | PromiseStateSlot::Rejected(value) => Some(value),
        }
    }
}

impl InternalSlots for Promise {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Promise;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Promise {}
