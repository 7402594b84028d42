// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.2 BigInt Objects](https://tc39.es/ecma262/#sec-bigint-objects)

use crate::ecmascript::abstract_operations::type_conversion::{
    to_big_int, to_integer_or_infinity, to_primitive,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::primitive_objects::PrimitiveObjectData;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapBigInt, Object, PreferredType, Value};

pub(crate) struct BigIntConstructor;

impl Builtin for BigIntConstructor {
    const NAME: &'static str = "BigInt";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(BigIntConstructor::construct);
}

impl BigIntConstructor {
    /// ### [21.2.1.1 BigInt ( value )](https://tc39.es/ecma262/#sec-bigint-constructor-number-value)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is not undefined, throw a TypeError exception.
        if new_target.is_some() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "BigInt is not a constructor",
            ));
        }
        // 2. Let prim be ? ToPrimitive(value, NUMBER).
        let prim = to_primitive(agent, arguments.get(0), PreferredType::Number)?;
        // 3. If prim is a Number, return ? NumberToBigInt(prim).
        if let Some(n) = prim.as_f64() {
            if n.trunc() != n || !n.is_finite() {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    "The number is not a safe integer",
                ));
            }
            return Ok(Value::BigInt(HeapBigInt::from_i64(agent, n as i64)));
        }
        // 4. Otherwise, return ? ToBigInt(prim).
        Ok(Value::BigInt(to_big_int(agent, prim)?))
    }
}

pub(crate) struct BigIntPrototype;

struct BigIntPrototypeToString;
impl Builtin for BigIntPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::to_string_method);
}

struct BigIntPrototypeValueOf;
impl Builtin for BigIntPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::value_of);
}

/// ### [21.2.3.4.1 ThisBigIntValue ( value )](https://tc39.es/ecma262/#sec-thisbigintvalue)
fn this_bigint_value(agent: &mut Agent, value: Value) -> JsResult<HeapBigInt> {
    match value {
        Value::BigInt(b) => Ok(b),
        Value::Object(Object::PrimitiveObject(object)) => match object.data(agent) {
            PrimitiveObjectData::BigInt(b) => Ok(b),
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Not a BigInt or BigInt object",
            )),
        },
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Not a BigInt or BigInt object",
        )),
    }
}

impl BigIntPrototype {
    /// ### [21.2.3.3 BigInt.prototype.toString ( \[ radix \] )](https://tc39.es/ecma262/#sec-bigint.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let b = this_bigint_value(agent, this_value)?;
        let radix = arguments.get(0);
        let radix = if radix.is_undefined() {
            10.0
        } else {
            to_integer_or_infinity(agent, radix)?
        };
        if !(2.0..=36.0).contains(&radix) {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "toString() radix must be between 2 and 36",
            ));
        }
        Ok(Value::String(b.to_string_radix(agent, radix as u32)))
    }

    /// ### [21.2.3.4 BigInt.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-bigint.prototype.valueof)
    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_bigint_value(agent, this_value).map(Value::BigInt)
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let big_int_prototype = intrinsics.big_int_prototype();
    let big_int_constructor = intrinsics.big_int();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, big_int_constructor)
        .with_prototype_property(big_int_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, big_int_prototype)
        .with_constructor_property(big_int_constructor)
        .with_builtin_function_property::<BigIntPrototypeToString>()
        .with_builtin_function_property::<BigIntPrototypeValueOf>()
        .with_to_string_tag("BigInt")
        .build();
}
