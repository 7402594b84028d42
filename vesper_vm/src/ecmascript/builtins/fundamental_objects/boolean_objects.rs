// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.3 Boolean Objects](https://tc39.es/ecma262/#sec-boolean-objects)

use crate::ecmascript::abstract_operations::type_conversion::to_boolean;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::primitive_objects::{PrimitiveObject, PrimitiveObjectData};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, Value};

pub(crate) struct BooleanConstructor;

impl Builtin for BooleanConstructor {
    const NAME: &'static str = "Boolean";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(BooleanConstructor::construct);
}

impl BooleanConstructor {
    /// ### [20.3.1.1 Boolean ( value )](https://tc39.es/ecma262/#sec-boolean-constructor-boolean-value)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. Let b be ToBoolean(value).
        let b = to_boolean(agent, arguments.get(0));
        // 2. If NewTarget is undefined, return b.
        if new_target.is_none() {
            return Ok(Value::Boolean(b));
        }
        // 3-5. Wrap into a Boolean object.
        let boolean_prototype = agent.current_realm().intrinsics().boolean_prototype();
        Ok(PrimitiveObject::create_with_prototype(
            agent,
            PrimitiveObjectData::Boolean(b),
            boolean_prototype.into(),
        )
        .into())
    }
}

pub(crate) struct BooleanPrototype;

struct BooleanPrototypeToString;
impl Builtin for BooleanPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::to_string);
}

struct BooleanPrototypeValueOf;
impl Builtin for BooleanPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BooleanPrototype::value_of);
}

impl BooleanPrototype {
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let b = this_boolean_value(agent, this_value)?;
        Ok(Value::from_static_str(agent, if b { "true" } else { "false" }))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_boolean_value(agent, this_value).map(Value::Boolean)
    }
}

/// ### [20.3.3.3.1 ThisBooleanValue ( value )](https://tc39.es/ecma262/#sec-thisbooleanvalue)
fn this_boolean_value(agent: &mut Agent, value: Value) -> JsResult<bool> {
    // 1. If value is a Boolean, return value.
    if let Value::Boolean(value) = value {
        return Ok(value);
    }
    // 2. If value is an Object with a [[BooleanData]] internal slot,
    //    return it.
    if let Value::Object(Object::PrimitiveObject(value)) = value {
        if let PrimitiveObjectData::Boolean(b) = value.data(agent) {
            return Ok(b);
        }
    }
    // 3. Throw a TypeError exception.
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        "Not a Boolean or Boolean object",
    ))
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let boolean_prototype = intrinsics.boolean_prototype();
    let boolean_constructor = intrinsics.boolean();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, boolean_constructor)
        .with_prototype_property(boolean_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, boolean_prototype)
        .with_constructor_property(boolean_constructor)
        .with_builtin_function_property::<BooleanPrototypeToString>()
        .with_builtin_function_property::<BooleanPrototypeValueOf>()
        .build();
}
