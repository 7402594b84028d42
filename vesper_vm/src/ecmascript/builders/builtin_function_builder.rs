// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::builtins::builtin_function::{
    install_function_name_and_length, Builtin, BuiltinFunction, BuiltinFunctionHeapData,
};
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{HeapString, InternalSlots, Object, OrdinaryObject};
use crate::heap::CreateHeapData;

/// Create a built-in function from its [`Builtin`] description, with a
/// fresh backing object and the `name`/`length` own properties installed.
pub(crate) fn create_builtin_function<T: Builtin>(
    agent: &mut Agent,
    realm: RealmIdentifier,
    function_prototype: Object,
) -> BuiltinFunction {
    let initial_name = Some(HeapString::from_static_str(agent, T::NAME));
    let function = BuiltinFunction(agent.heap.create(BuiltinFunctionHeapData {
        object_index: None,
        length: T::LENGTH,
        realm,
        initial_name,
        behaviour: T::BEHAVIOUR,
        captures: Box::new([]),
    }));
    let backing_object =
        OrdinaryObject::create_object(agent, Some(function_prototype), true);
    function.set_backing_object(agent, backing_object);
    install_function_name_and_length(agent, function, T::NAME, T::LENGTH);
    function
}
