// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The ECMAScript language implicitly performs automatic type conversion as
//! needed. The conversion abstract operations are polymorphic; they can
//! accept a value of any ECMAScript language type.

use crate::ecmascript::builtins::primitive_objects::{PrimitiveObject, PrimitiveObjectData};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::number::{
    f64_to_int32, f64_to_integer_or_infinity, f64_to_js_string, f64_to_uint16, f64_to_uint32,
    string_to_number,
};
use crate::ecmascript::types::{
    HeapString, Numeric, Object, PreferredType, PropertyKey, Symbol, Value,
};
use crate::heap::WellKnownSymbolIndexes;

use super::operations_on_objects::{call_function, get, get_method};
use super::testing_and_comparison::is_callable;

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
pub(crate) fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: PreferredType,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    let Value::Object(object) = input else {
        // 2. Return input.
        return Ok(input);
    };
    // a. Let exoticToPrim be ? GetMethod(input, %Symbol.toPrimitive%).
    let to_primitive_key = PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::ToPrimitive));
    let exotic_to_prim = get_method(agent, input, to_primitive_key)?;
    // b. If exoticToPrim is not undefined, then
    if let Some(exotic_to_prim) = exotic_to_prim {
        // i-iii. Derive the hint string.
        let hint = match preferred_type {
            PreferredType::Default => "default",
            PreferredType::String => "string",
            PreferredType::Number => "number",
        };
        let hint = Value::from_static_str(agent, hint);
        // iv. Let result be ? Call(exoticToPrim, input, « hint »).
        let result = call_function(agent, exotic_to_prim.into(), input, &[hint])?;
        // v. If result is not an Object, return result.
        if !result.is_object() {
            return Ok(result);
        }
        // vi. Throw a TypeError exception.
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert object to primitive value",
        ));
    }
    // c. If preferredType is not present, let preferredType be NUMBER.
    // d. Return ? OrdinaryToPrimitive(input, preferredType).
    ordinary_to_primitive(
        agent,
        object,
        match preferred_type {
            PreferredType::String => PreferredType::String,
            _ => PreferredType::Number,
        },
    )
}

/// ### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
pub(crate) fn ordinary_to_primitive(
    agent: &mut Agent,
    object: Object,
    hint: PreferredType,
) -> JsResult<Value> {
    // 1-2. Order the method names by the hint.
    let to_string_key = PropertyKey::from_static_str(agent, "toString");
    let value_of_key = PropertyKey::from_static_str(agent, "valueOf");
    let method_names = if hint == PreferredType::String {
        [to_string_key, value_of_key]
    } else {
        [value_of_key, to_string_key]
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let method = get(agent, object, name)?;
        // b. If IsCallable(method) is true, then
        if is_callable(agent, method).is_some() {
            // i. Let result be ? Call(method, O).
            let result = call_function(agent, method, object.into(), &[])?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(b) => b,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or
        //    the empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Integer(i) => i != 0,
        Value::Number(n) => !(n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty_string(agent),
        Value::BigInt(b) => !b.is_zero(agent),
        // 4. Return true.
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// ### [7.1.3 ToNumeric ( value )](https://tc39.es/ecma262/#sec-tonumeric)
pub(crate) fn to_numeric(agent: &mut Agent, value: Value) -> JsResult<Numeric> {
    // 1. Let primValue be ? ToPrimitive(value, NUMBER).
    let prim_value = to_primitive(agent, value, PreferredType::Number)?;
    // 2. If primValue is a BigInt, return primValue.
    if let Value::BigInt(b) = prim_value {
        return Ok(Numeric::BigInt(b));
    }
    // 3. Return ? ToNumber(primValue).
    Ok(Numeric::Number(to_number(agent, prim_value)?))
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub(crate) fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        Value::Integer(i) => Ok(i as f64),
        // 2-3. Symbols and BigInts throw.
        Value::Symbol(_) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a number",
        )),
        Value::BigInt(_) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert a BigInt value to a number",
        )),
        // 4. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 5. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 6. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 7. If argument is a String, return StringToNumber(argument).
        Value::String(s) => {
            let text = s.to_string_lossy(agent).into_owned();
            Ok(string_to_number(&text))
        }
        // 8-10. Convert to primitive and retry.
        Value::Object(_) => {
            let prim_value = to_primitive(agent, argument, PreferredType::Number)?;
            debug_assert!(!prim_value.is_object());
            to_number(agent, prim_value)
        }
    }
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub(crate) fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    let number = to_number(agent, argument)?;
    Ok(f64_to_integer_or_infinity(number))
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub(crate) fn to_int32(agent: &mut Agent, argument: Value) -> JsResult<i32> {
    if let Value::Integer(i) = argument {
        return Ok(i);
    }
    let number = to_number(agent, argument)?;
    Ok(f64_to_int32(number))
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub(crate) fn to_uint32(agent: &mut Agent, argument: Value) -> JsResult<u32> {
    let number = to_number(agent, argument)?;
    Ok(f64_to_uint32(number))
}

/// ### [7.1.10 ToUint16 ( argument )](https://tc39.es/ecma262/#sec-touint16)
pub(crate) fn to_uint16(agent: &mut Agent, argument: Value) -> JsResult<u16> {
    let number = to_number(agent, argument)?;
    Ok(f64_to_uint16(number))
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub(crate) fn to_string(agent: &mut Agent, argument: Value) -> JsResult<HeapString> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => Ok(s),
        // 2. If argument is a Symbol, throw a TypeError exception.
        Value::Symbol(_) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert a Symbol value to a string",
        )),
        // 3-6. Spelled-out primitives.
        Value::Undefined => Ok(HeapString::from_static_str(agent, "undefined")),
        Value::Null => Ok(HeapString::from_static_str(agent, "null")),
        Value::Boolean(true) => Ok(HeapString::from_static_str(agent, "true")),
        Value::Boolean(false) => Ok(HeapString::from_static_str(agent, "false")),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => {
            let text = f64_to_js_string(n);
            Ok(HeapString::from_string(agent, text))
        }
        Value::Integer(i) => {
            let text = i.to_string();
            Ok(HeapString::from_string(agent, text))
        }
        // 8. If argument is a BigInt, return BigInt::toString(argument, 10).
        Value::BigInt(b) => Ok(b.to_string_radix(agent, 10)),
        // 9-10. Convert to primitive and retry.
        Value::Object(_) => {
            let prim_value = to_primitive(agent, argument, PreferredType::String)?;
            debug_assert!(!prim_value.is_object());
            to_string(agent, prim_value)
        }
    }
}

/// ### [7.1.18 ToObject ( argument )](https://tc39.es/ecma262/#sec-toobject)
///
/// Primitive values get a fresh wrapper object of the corresponding kind.
pub(crate) fn to_object(agent: &mut Agent, argument: Value) -> JsResult<Object> {
    match argument {
        Value::Undefined | Value::Null => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to object",
        )),
        Value::Boolean(b) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::Boolean(b),
        ))),
        Value::String(s) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::String(s),
        ))),
        Value::Symbol(s) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::Symbol(s),
        ))),
        Value::Number(n) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::Number(n),
        ))),
        Value::Integer(i) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::Integer(i),
        ))),
        Value::BigInt(b) => Ok(Object::PrimitiveObject(PrimitiveObject::create(
            agent,
            PrimitiveObjectData::BigInt(b),
        ))),
        Value::Object(object) => Ok(object),
    }
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub(crate) fn to_property_key(agent: &mut Agent, argument: Value) -> JsResult<PropertyKey> {
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, PreferredType::String)?;
    // 2. If key is a Symbol, return key.
    if let Value::Symbol(symbol) = key {
        return Ok(PropertyKey::Symbol(symbol));
    }
    if let Some(key) = PropertyKey::try_from_primitive(agent, key) {
        return Ok(key);
    }
    // 3. Return ! ToString(key).
    let string = to_string(agent, key)?;
    Ok(PropertyKey::from_heap_string(agent, string))
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub(crate) fn to_length(agent: &mut Agent, argument: Value) -> JsResult<i64> {
    // 1. Let len be ? ToIntegerOrInfinity(argument).
    let len = to_integer_or_infinity(agent, argument)?;
    // 2. If len ≤ 0, return +0𝔽.
    if len <= 0.0 {
        return Ok(0);
    }
    // 3. Return 𝔽(min(len, 2^53 - 1)).
    Ok(len.min(2f64.powi(53) - 1.0) as i64)
}

/// ### [7.1.21 CanonicalNumericIndexString ( argument )](https://tc39.es/ecma262/#sec-canonicalnumericindexstring)
pub(crate) fn canonical_numeric_index_string(agent: &Agent, argument: HeapString) -> Option<f64> {
    let text = argument.to_string_lossy(agent);
    // 1. If argument is "-0", return -0𝔽.
    if &*text == "-0" {
        return Some(-0.0);
    }
    // 2. Let n be ! ToNumber(argument).
    let n = string_to_number(&text);
    // 3. If ! ToString(n) is argument, return n.
    if f64_to_js_string(n) == &*text {
        Some(n)
    } else {
        // 4. Return undefined.
        None
    }
}

/// ### [7.1.22 ToIndex ( value )](https://tc39.es/ecma262/#sec-toindex)
pub(crate) fn to_index(agent: &mut Agent, value: Value) -> JsResult<i64> {
    // 1. Let integer be ? ToIntegerOrInfinity(value).
    let integer = to_integer_or_infinity(agent, value)?;
    // 2. If integer is not in the inclusive interval from 0 to 2^53 - 1,
    //    throw a RangeError exception.
    if integer < 0.0 || integer > 2f64.powi(53) - 1.0 {
        return Err(agent.throw_exception(
            ExceptionType::RangeError,
            "Index out of range",
        ));
    }
    // 3. Return integer.
    Ok(integer as i64)
}

/// ### [7.1.9 ToBigInt ( argument )](https://tc39.es/ecma262/#sec-tobigint)
pub(crate) fn to_big_int(
    agent: &mut Agent,
    argument: Value,
) -> JsResult<crate::ecmascript::types::HeapBigInt> {
    use crate::ecmascript::types::HeapBigInt;
    // 1. Let prim be ? ToPrimitive(argument, NUMBER).
    let prim = to_primitive(agent, argument, PreferredType::Number)?;
    // 2. Convert by type.
    match prim {
        Value::BigInt(b) => Ok(b),
        Value::Boolean(b) => Ok(HeapBigInt::from_i64(agent, b as i64)),
        Value::String(s) => {
            let text = s.to_string_lossy(agent).into_owned();
            HeapBigInt::from_str(agent, &text).ok_or_else(|| {
                agent.throw_exception(
                    ExceptionType::SyntaxError,
                    "Cannot convert string to a BigInt",
                )
            })
        }
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert value to a BigInt",
        )),
    }
}
