// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
//!
//! Arguments objects are carried as ordinary objects: the parameter-mapped
//! flavour is not implemented, so sloppy-mode functions see an unmapped
//! snapshot of their call arguments.

use crate::ecmascript::abstract_operations::operations_on_objects::get;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::object::data::{ElementDescriptor, PropertyEntry};
use crate::ecmascript::types::{
    Function, InternalSlots, Object, OrdinaryObject, PropertyKey, Symbol, Value,
};
use crate::heap::WellKnownSymbolIndexes;

use super::ordinary::ordinary_object_create;

/// ### [10.4.4.6 CreateUnmappedArgumentsObject ( argumentsList )](https://tc39.es/ecma262/#sec-createunmappedargumentsobject)
pub(crate) fn create_unmapped_arguments_object(
    agent: &mut Agent,
    arguments_list: &[Value],
    callee: Option<Function>,
) -> JsResult<Object> {
    // 1-3. Let obj be OrdinaryObjectCreate(%Object.prototype%) carrying a
    //    "length" property.
    let object_prototype = agent.current_realm().intrinsics().object_prototype();
    let obj = ordinary_object_create(agent, Some(object_prototype.into()));
    let length_key = PropertyKey::from_static_str(agent, "length");
    agent[obj].property_storage.set(PropertyEntry {
        key: length_key,
        value: Some(Value::from(arguments_list.len())),
        descriptor: Some(ElementDescriptor::Data {
            writable: true,
            enumerable: false,
            configurable: true,
        }),
    });
    // 4-5. Index properties for each argument.
    for (index, argument) in arguments_list.iter().enumerate() {
        agent[obj].property_storage.set(PropertyEntry {
            key: PropertyKey::Integer(index as u32),
            value: Some(*argument),
            descriptor: None,
        });
    }
    // 6. Install @@iterator as %Array.prototype.values%.
    let array_prototype = agent.current_realm().intrinsics().array_prototype();
    let values_key = PropertyKey::from_static_str(agent, "values");
    let array_values = get(agent, array_prototype, values_key)?;
    agent[obj].property_storage.set(PropertyEntry {
        key: PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::Iterator)),
        value: Some(array_values),
        descriptor: Some(ElementDescriptor::Data {
            writable: true,
            enumerable: false,
            configurable: true,
        }),
    });
    // 7. "callee": the calling function in sloppy mode, a poison-pill
    //    accessor in strict mode.
    let callee_key = PropertyKey::from_static_str(agent, "callee");
    match callee {
        Some(callee) => {
            agent[obj].property_storage.set(PropertyEntry {
                key: callee_key,
                value: Some(callee.into_value()),
                descriptor: Some(ElementDescriptor::Data {
                    writable: true,
                    enumerable: false,
                    configurable: true,
                }),
            });
        }
        None => {
            let throw_type_error = agent.current_realm().intrinsics().throw_type_error();
            agent[obj].property_storage.set(PropertyEntry {
                key: callee_key,
                value: None,
                descriptor: Some(ElementDescriptor::Accessor {
                    get: Some(Function::BuiltinFunction(throw_type_error)),
                    set: Some(Function::BuiltinFunction(throw_type_error)),
                    enumerable: false,
                    configurable: false,
                }),
            });
        }
    }
    // 8. Return obj.
    Ok(obj.into())
}
