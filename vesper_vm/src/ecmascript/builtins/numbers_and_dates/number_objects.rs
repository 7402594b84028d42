// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.1 Number Objects](https://tc39.es/ecma262/#sec-number-objects)

use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_numeric,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::primitive_objects::{PrimitiveObject, PrimitiveObjectData};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::number::{f64_to_js_string, f64_to_js_string_radix};
use crate::ecmascript::types::{Numeric, Object, Value};

pub(crate) struct NumberConstructor;

impl Builtin for NumberConstructor {
    const NAME: &'static str = "Number";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(NumberConstructor::construct);
}

macro_rules! number_static {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberConstructor::$method);
        }
    };
}

number_static!(NumberIsFinite, "isFinite", 1, is_finite);
number_static!(NumberIsInteger, "isInteger", 1, is_integer);
number_static!(NumberIsNaN, "isNaN", 1, is_nan);
number_static!(NumberIsSafeInteger, "isSafeInteger", 1, is_safe_integer);

impl NumberConstructor {
    /// ### [21.1.1.1 Number ( value )](https://tc39.es/ecma262/#sec-number-constructor-number-value)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1-3. Let n be 0 or ToNumeric(value) converted to a Number.
        let value = arguments.get(0);
        let n = if value.is_undefined() {
            0.0
        } else {
            match to_numeric(agent, value)? {
                Numeric::Number(n) => n,
                Numeric::BigInt(b) => b.to_f64(agent),
            }
        };
        // 4. If NewTarget is undefined, return n.
        if new_target.is_none() {
            return Ok(Value::from_f64(n));
        }
        // 5-7. Wrap into a Number object.
        let number_prototype = agent.current_realm().intrinsics().number_prototype();
        Ok(PrimitiveObject::create_with_prototype(
            agent,
            PrimitiveObjectData::Number(n),
            number_prototype.into(),
        )
        .into())
    }

    /// ### [21.1.2.2 Number.isFinite ( number )](https://tc39.es/ecma262/#sec-number.isfinite)
    fn is_finite(_agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(matches!(
            arguments.get(0),
            Value::Integer(_)
        ) || matches!(arguments.get(0), Value::Number(n) if n.is_finite())))
    }

    /// ### [21.1.2.3 Number.isInteger ( number )](https://tc39.es/ecma262/#sec-number.isinteger)
    fn is_integer(_agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let result = match arguments.get(0) {
            Value::Integer(_) => true,
            Value::Number(n) => n.is_finite() && n.trunc() == n,
            _ => false,
        };
        Ok(Value::Boolean(result))
    }

    /// ### [21.1.2.4 Number.isNaN ( number )](https://tc39.es/ecma262/#sec-number.isnan)
    fn is_nan(_agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::Boolean(arguments.get(0).is_nan()))
    }

    /// ### [21.1.2.5 Number.isSafeInteger ( number )](https://tc39.es/ecma262/#sec-number.issafeinteger)
    fn is_safe_integer(
        _agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let result = match arguments.get(0) {
            Value::Integer(_) => true,
            Value::Number(n) => n.is_finite() && n.trunc() == n && n.abs() <= 2f64.powi(53) - 1.0,
            _ => false,
        };
        Ok(Value::Boolean(result))
    }
}

pub(crate) struct NumberPrototype;

struct NumberPrototypeToFixed;
impl Builtin for NumberPrototypeToFixed {
    const NAME: &'static str = "toFixed";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_fixed);
}

struct NumberPrototypeToString;
impl Builtin for NumberPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::to_string_method);
}

struct NumberPrototypeValueOf;
impl Builtin for NumberPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(NumberPrototype::value_of);
}

/// ### [21.1.3.7.1 ThisNumberValue ( value )](https://tc39.es/ecma262/#sec-thisnumbervalue)
fn this_number_value(agent: &mut Agent, value: Value) -> JsResult<f64> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Integer(i) => Ok(i as f64),
        Value::Object(Object::PrimitiveObject(object)) => match object.data(agent) {
            PrimitiveObjectData::Number(n) => Ok(n),
            PrimitiveObjectData::Integer(i) => Ok(i as f64),
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Not a Number or Number object",
            )),
        },
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Not a Number or Number object",
        )),
    }
}

impl NumberPrototype {
    /// ### [21.1.3.3 Number.prototype.toFixed ( fractionDigits )](https://tc39.es/ecma262/#sec-number.prototype.tofixed)
    fn to_fixed(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = this_number_value(agent, this_value)?;
        let digits = to_integer_or_infinity(agent, arguments.get(0))?;
        if !(0.0..=100.0).contains(&digits) {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "toFixed() digits argument must be between 0 and 100",
            ));
        }
        if !x.is_finite() || x.abs() >= 1e21 {
            return Ok(Value::from_string(agent, f64_to_js_string(x)));
        }
        Ok(Value::from_string(
            agent,
            format!("{:.*}", digits as usize, x),
        ))
    }

    /// ### [21.1.3.6 Number.prototype.toString ( \[ radix \] )](https://tc39.es/ecma262/#sec-number.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let x = this_number_value(agent, this_value)?;
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
        Ok(Value::from_string(
            agent,
            f64_to_js_string_radix(x, radix as u32),
        ))
    }

    /// ### [21.1.3.7 Number.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-number.prototype.valueof)
    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_number_value(agent, this_value).map(Value::from_f64)
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let number_prototype = intrinsics.number_prototype();
    let number_constructor = intrinsics.number();
    let parse_int = intrinsics.parse_int();
    let parse_float = intrinsics.parse_float();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, number_constructor)
        .with_prototype_property(number_prototype.into())
        .with_builtin_function_property::<NumberIsFinite>()
        .with_builtin_function_property::<NumberIsInteger>()
        .with_builtin_function_property::<NumberIsNaN>()
        .with_builtin_function_property::<NumberIsSafeInteger>()
        .with_frozen_property("EPSILON", Value::Number(f64::EPSILON))
        .with_frozen_property("MAX_SAFE_INTEGER", Value::Number(9007199254740991.0))
        .with_frozen_property("MAX_VALUE", Value::Number(f64::MAX))
        .with_frozen_property("MIN_SAFE_INTEGER", Value::Number(-9007199254740991.0))
        .with_frozen_property("MIN_VALUE", Value::Number(5e-324))
        .with_frozen_property("NaN", Value::nan())
        .with_frozen_property("NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY))
        .with_frozen_property("POSITIVE_INFINITY", Value::Number(f64::INFINITY))
        // Number.parseInt and Number.parseFloat are the global functions.
        .with_property("parseInt", parse_int.into())
        .with_property("parseFloat", parse_float.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, number_prototype)
        .with_constructor_property(number_constructor)
        .with_builtin_function_property::<NumberPrototypeToFixed>()
        .with_builtin_function_property::<NumberPrototypeToString>()
        .with_builtin_function_property::<NumberPrototypeValueOf>()
        .build();
}
