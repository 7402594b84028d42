// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.1 Bound Function Exotic Objects](https://tc39.es/ecma262/#sec-bound-function-exotic-objects)

use core::ops::{Index, IndexMut};

use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    Function, HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{BoundFunctionIndex, ObjectIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BoundFunction(pub(crate) BoundFunctionIndex);

#[derive(Debug, Clone)]
pub struct BoundFunctionHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[BoundTargetFunction]]
    pub(crate) bound_target_function: Function,
    /// \[\[BoundThis]]
    pub(crate) bound_this: Value,
    /// \[\[BoundArguments]]
    pub(crate) bound_arguments: Box<[Value]>,
    pub(crate) name: Option<HeapString>,
}

impl Index<BoundFunction> for Agent {
    type Output = BoundFunctionHeapData;

    fn index(&self, index: BoundFunction) -> &Self::Output {
        self.heap
            .bound_functions
            .get(index.0.into_index())
            .expect("BoundFunction out of bounds")
            .as_ref()
            .expect("BoundFunction slot empty")
    }
}

impl IndexMut<BoundFunction> for Agent {
    fn index_mut(&mut self, index: BoundFunction) -> &mut Self::Output {
        self.heap
            .bound_functions
            .get_mut(index.0.into_index())
            .expect("BoundFunction out of bounds")
            .as_mut()
            .expect("BoundFunction slot empty")
    }
}

impl From<BoundFunction> for Object {
    fn from(value: BoundFunction) -> Self {
        Object::BoundFunction(value)
    }
}

impl From<BoundFunction> for Value {
    fn from(value: BoundFunction) -> Self {
        Value::Object(Object::BoundFunction(value))
    }
}

impl BoundFunction {
    pub(crate) fn is_constructor(self, agent: &Agent) -> bool {
        agent[self]
            .bound_target_function
            .into_object()
            .is_constructor(agent)
    }
}

/// ### [10.4.1.3 BoundFunctionCreate ( targetFunction, boundThis, boundArgs )](https://tc39.es/ecma262/#sec-boundfunctioncreate)
pub(crate) fn bound_function_create(
    agent: &mut Agent,
    target_function: Function,
    bound_this: Value,
    bound_args: &[Value],
) -> JsResult<BoundFunction> {
    // 1. Let proto be ? targetFunction.[[GetPrototypeOf]]().
    let proto = target_function
        .into_object()
        .internal_get_prototype_of(agent)?;
    // 2-5. Create the exotic object.
    let name = {
        let target_name = target_function.name(agent);
        let text = match target_name {
            Some(name) => format!("bound {}", name.to_string_lossy(agent)),
            None => "bound".to_string(),
        };
        Some(HeapString::from_string(agent, text))
    };
    let bound_function = BoundFunction(agent.heap.create(BoundFunctionHeapData {
        object_index: None,
        bound_target_function: target_function,
        bound_this,
        bound_arguments: bound_args.into(),
        name,
    }));
    // 6. Set obj.[[Prototype]] to proto.
    let backing_object = OrdinaryObject::create_object(agent, proto, true);
    bound_function.set_backing_object(agent, backing_object);
    // 7. Return obj.
    Ok(bound_function)
}

impl InternalSlots for BoundFunction {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Function;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for BoundFunction {
    /// ### [10.4.1.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-call-thisargument-argumentslist)
    fn internal_call(
        self,
        agent: &mut Agent,
        _this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        // 1. Let target be F.[[BoundTargetFunction]].
        let data = &agent[self];
        let target = data.bound_target_function;
        // 2. Let boundThis be F.[[BoundThis]].
        let bound_this = data.bound_this;
        // 3-4. Let args be the list-concatenation of F.[[BoundArguments]]
        //    and argumentsList.
        let mut args = Vec::with_capacity(data.bound_arguments.len() + arguments_list.len());
        args.extend_from_slice(&data.bound_arguments);
        args.extend_from_slice(arguments_list);
        // 5. Return ? Call(target, boundThis, args).
        target.internal_call(agent, bound_this, &args)
    }

    /// ### [10.4.1.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-construct-argumentslist-newtarget)
    fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        let data = &agent[self];
        // 1. Let target be F.[[BoundTargetFunction]].
        let target = data.bound_target_function;
        // 2. Assert: IsConstructor(target) is true.
        // 3-4. Concatenate the bound arguments.
        let mut args = Vec::with_capacity(data.bound_arguments.len() + arguments_list.len());
        args.extend_from_slice(&data.bound_arguments);
        args.extend_from_slice(arguments_list);
        // 5. If SameValue(F, newTarget) is true, set newTarget to target.
        let new_target = if new_target == Object::BoundFunction(self) {
            target.into_object()
        } else {
            new_target
        };
        // 6. Return ? Construct(target, args, newTarget).
        target.internal_construct(agent, &args, new_target)
    }
}
