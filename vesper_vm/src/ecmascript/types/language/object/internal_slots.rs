// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::Agent;

use super::{Object, OrdinaryObject};

/// Access to the internal slots every object carries: `[[Prototype]]`,
/// `[[Extensible]]` and the backing property storage.
///
/// Exotic objects store their ordinary properties in a lazily created
/// backing object; until one exists, the prototype is the kind's default
/// intrinsic and the object is extensible.
pub trait InternalSlots: Sized + Clone + Copy + Into<Object> {
    /// The intrinsic used as `[[Prototype]]` before a backing object
    /// exists.
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Object;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject>;

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject);

    fn create_backing_object(self, agent: &mut Agent) -> OrdinaryObject {
        debug_assert!(self.get_backing_object(agent).is_none());
        let prototype = self.internal_prototype(agent);
        let backing_object = OrdinaryObject::create_object(agent, prototype, true);
        self.set_backing_object(agent, backing_object);
        backing_object
    }

    fn get_or_create_backing_object(self, agent: &mut Agent) -> OrdinaryObject {
        match self.get_backing_object(agent) {
            Some(backing_object) => backing_object,
            None => self.create_backing_object(agent),
        }
    }

    /// \[\[Prototype]]
    fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        match self.get_backing_object(agent) {
            Some(backing_object) => backing_object.internal_prototype(agent),
            None => Some(
                agent
                    .current_realm()
                    .intrinsics()
                    .get_proto_intrinsic(Self::DEFAULT_PROTOTYPE),
            ),
        }
    }

    fn internal_set_prototype(self, agent: &mut Agent, prototype: Option<Object>) {
        let backing_object = self.get_or_create_backing_object(agent);
        backing_object.internal_set_prototype(agent, prototype);
    }

    /// \[\[Extensible]]
    fn internal_extensible(self, agent: &Agent) -> bool {
        match self.get_backing_object(agent) {
            Some(backing_object) => backing_object.internal_extensible(agent),
            None => true,
        }
    }

    fn internal_set_extensible(self, agent: &mut Agent, extensible: bool) {
        let backing_object = self.get_or_create_backing_object(agent);
        backing_object.internal_set_extensible(agent, extensible);
    }
}
