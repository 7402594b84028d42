// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::number::number_less_than;
use crate::ecmascript::types::{
    Function, HeapBigInt, InternalMethods, Object, PreferredType, PropertyKey, Value,
};
use crate::heap::WellKnownSymbolIndexes;

use super::operations_on_objects::{call_function, get_method, has_property};
use super::type_conversion::{to_boolean, to_number, to_numeric, to_primitive};

/// ### [7.2.1 RequireObjectCoercible ( argument )](https://tc39.es/ecma262/#sec-requireobjectcoercible)
pub(crate) fn require_object_coercible(agent: &mut Agent, argument: Value) -> JsResult<Value> {
    if argument.is_nullish() {
        Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to object",
        ))
    } else {
        Ok(argument)
    }
}

/// ### [7.2.2 IsArray ( argument )](https://tc39.es/ecma262/#sec-isarray)
pub(crate) fn is_array(agent: &mut Agent, argument: Value) -> JsResult<bool> {
    match argument {
        // 1. If argument is not an Object, return false.
        // 2. If argument is an Array exotic object, return true.
        Value::Object(Object::Array(_)) => Ok(true),
        // 3. If argument is a Proxy exotic object, apply IsArray to its
        //    target; a revoked proxy throws.
        Value::Object(Object::Proxy(proxy)) => {
            let Some(target) = agent[proxy].target else {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Cannot perform operation on a revoked proxy",
                ));
            };
            is_array(agent, target.into())
        }
        // 4. Return false.
        _ => Ok(false),
    }
}

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
///
/// Returns the callable object, letting `?` style call sites pattern-match
/// on the result.
pub(crate) fn is_callable(agent: &Agent, argument: Value) -> Option<Object> {
    match argument {
        Value::Object(object) if object.is_callable(agent) => Some(object),
        _ => None,
    }
}

/// IsCallable narrowed to the plain function union.
pub(crate) fn callable_function(agent: &Agent, argument: Value) -> Option<Function> {
    match argument {
        Value::Object(object) if object.is_callable(agent) => object.into_function(),
        _ => None,
    }
}

/// ### [7.2.4 IsConstructor ( argument )](https://tc39.es/ecma262/#sec-isconstructor)
pub(crate) fn is_constructor(agent: &Agent, argument: Value) -> Option<Object> {
    match argument {
        Value::Object(object) if object.is_constructor(agent) => Some(object),
        _ => None,
    }
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
pub(crate) fn same_value(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        // 1. If Type(x) is not Type(y), return false.
        // 2. If x is a Number, return Number::sameValue(x, y): NaN equals
        //    NaN and +0𝔽 is distinct from -0𝔽.
        (Value::Number(a), Value::Number(b)) => {
            (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
        }
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Number(a), Value::Integer(b)) => a.to_bits() == (b as f64).to_bits(),
        (Value::Integer(a), Value::Number(b)) => (a as f64).to_bits() == b.to_bits(),
        (Value::BigInt(a), Value::BigInt(b)) => HeapBigInt::equal(agent, a, b),
        // 3. Return SameValueNonNumber(x, y).
        _ => same_value_non_number(x, y),
    }
}

/// ### [7.2.11 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
///
/// Like SameValue except that +0𝔽 and -0𝔽 compare equal.
pub(crate) fn same_value_zero(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Number(a), Value::Integer(b)) => a == b as f64,
        (Value::Integer(a), Value::Number(b)) => a as f64 == b,
        (Value::BigInt(a), Value::BigInt(b)) => HeapBigInt::equal(agent, a, b),
        _ => same_value_non_number(x, y),
    }
}

/// ### [7.2.12 SameValueNonNumber ( x, y )](https://tc39.es/ecma262/#sec-samevaluenonnumber)
pub(crate) fn same_value_non_number(x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        // Strings are interned, so handle equality is value equality.
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => a == b,
        _ => false,
    }
}

/// ### [7.2.13 IsLessThan ( x, y, LeftFirst )](https://tc39.es/ecma262/#sec-islessthan)
///
/// None encodes the *undefined* result (a NaN was involved).
pub(crate) fn is_less_than<const LEFT_FIRST: bool>(
    agent: &mut Agent,
    x: Value,
    y: Value,
) -> JsResult<Option<bool>> {
    // 1-2. Convert to primitives in evaluation order.
    let (px, py) = if LEFT_FIRST {
        let px = to_primitive(agent, x, PreferredType::Number)?;
        let py = to_primitive(agent, y, PreferredType::Number)?;
        (px, py)
    } else {
        let py = to_primitive(agent, y, PreferredType::Number)?;
        let px = to_primitive(agent, x, PreferredType::Number)?;
        (px, py)
    };

    // 3. If px is a String and py is a String, compare code units.
    if let (Value::String(sx), Value::String(sy)) = (px, py) {
        return Ok(Some(sx.lt(agent, sy)));
    }

    // 4. BigInt/String and BigInt/Number mixed comparisons.
    match (px, py) {
        (Value::BigInt(bx), Value::String(sy)) => {
            let text = sy.to_string_lossy(agent).into_owned();
            let Some(by) = HeapBigInt::from_str(agent, &text) else {
                return Ok(None);
            };
            Ok(Some(HeapBigInt::less_than(agent, bx, by)))
        }
        (Value::String(sx), Value::BigInt(by)) => {
            let text = sx.to_string_lossy(agent).into_owned();
            let Some(bx) = HeapBigInt::from_str(agent, &text) else {
                return Ok(None);
            };
            Ok(Some(HeapBigInt::less_than(agent, bx, by)))
        }
        _ => {
            // c. Let nx be ? ToNumeric(px); let ny be ? ToNumeric(py).
            let nx = to_numeric(agent, px)?;
            let ny = to_numeric(agent, py)?;
            use crate::ecmascript::types::Numeric;
            match (nx, ny) {
                (Numeric::Number(a), Numeric::Number(b)) => Ok(number_less_than(a, b)),
                (Numeric::BigInt(a), Numeric::BigInt(b)) => {
                    Ok(Some(HeapBigInt::less_than(agent, a, b)))
                }
                (Numeric::BigInt(a), Numeric::Number(b)) => {
                    if b.is_nan() {
                        return Ok(None);
                    }
                    Ok(Some(a.to_f64(agent) < b))
                }
                (Numeric::Number(a), Numeric::BigInt(b)) => {
                    if a.is_nan() {
                        return Ok(None);
                    }
                    Ok(Some(a < b.to_f64(agent)))
                }
            }
        }
    }
}

/// ### [7.2.14 IsLooselyEqual ( x, y )](https://tc39.es/ecma262/#sec-islooselyequal)
pub(crate) fn is_loosely_equal(agent: &mut Agent, x: Value, y: Value) -> JsResult<bool> {
    // 1. If Type(x) is Type(y), return IsStrictlyEqual(x, y).
    if same_type(x, y) {
        return Ok(is_strictly_equal(agent, x, y));
    }
    match (x, y) {
        // 2-3. null == undefined.
        (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => Ok(true),
        // 5-6. Number and String: convert the string.
        (Value::Number(_) | Value::Integer(_), Value::String(_)) => {
            let ny = to_number(agent, y)?;
            is_loosely_equal(agent, x, Value::from_f64(ny))
        }
        (Value::String(_), Value::Number(_) | Value::Integer(_)) => {
            let nx = to_number(agent, x)?;
            is_loosely_equal(agent, Value::from_f64(nx), y)
        }
        // 7. BigInt and String: StringToBigInt.
        (Value::BigInt(bx), Value::String(sy)) => {
            let text = sy.to_string_lossy(agent).into_owned();
            match HeapBigInt::from_str(agent, &text) {
                Some(by) => Ok(HeapBigInt::equal(agent, bx, by)),
                None => Ok(false),
            }
        }
        (Value::String(_), Value::BigInt(_)) => is_loosely_equal(agent, y, x),
        // 9-10. Booleans convert to numbers.
        (Value::Boolean(bx), _) => {
            let nx = Value::Integer(bx as i32);
            is_loosely_equal(agent, nx, y)
        }
        (_, Value::Boolean(by)) => {
            let ny = Value::Integer(by as i32);
            is_loosely_equal(agent, x, ny)
        }
        // 11. BigInt and Number compare mathematically.
        (Value::BigInt(bx), Value::Number(ny)) => Ok(bx.equal_f64(agent, ny)),
        (Value::BigInt(bx), Value::Integer(ny)) => Ok(bx.equal_f64(agent, ny as f64)),
        (Value::Number(nx), Value::BigInt(by)) => Ok(by.equal_f64(agent, nx)),
        (Value::Integer(nx), Value::BigInt(by)) => Ok(by.equal_f64(agent, nx as f64)),
        // 12-13. Object compared with a primitive: convert the object.
        (
            Value::Number(_)
            | Value::Integer(_)
            | Value::String(_)
            | Value::BigInt(_)
            | Value::Symbol(_),
            Value::Object(_),
        ) => {
            let py = to_primitive(agent, y, PreferredType::Default)?;
            is_loosely_equal(agent, x, py)
        }
        (
            Value::Object(_),
            Value::Number(_)
            | Value::Integer(_)
            | Value::String(_)
            | Value::BigInt(_)
            | Value::Symbol(_),
        ) => {
            let px = to_primitive(agent, x, PreferredType::Default)?;
            is_loosely_equal(agent, px, y)
        }
        // 14. Return false.
        _ => Ok(false),
    }
}

fn same_type(x: Value, y: Value) -> bool {
    matches!(
        (x, y),
        (Value::Undefined, Value::Undefined)
            | (Value::Null, Value::Null)
            | (Value::Boolean(_), Value::Boolean(_))
            | (Value::String(_), Value::String(_))
            | (Value::Symbol(_), Value::Symbol(_))
            | (
                Value::Number(_) | Value::Integer(_),
                Value::Number(_) | Value::Integer(_)
            )
            | (Value::BigInt(_), Value::BigInt(_))
            | (Value::Object(_), Value::Object(_))
    )
}

/// ### [7.2.15 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
pub(crate) fn is_strictly_equal(agent: &Agent, x: Value, y: Value) -> bool {
    if !same_type(x, y) {
        return false;
    }
    match (x, y) {
        // 2. If x is a Number, return Number::equal(x, y): NaN is unequal
        //    to everything, zeroes compare equal.
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Number(a), Value::Integer(b)) => a == b as f64,
        (Value::Integer(a), Value::Number(b)) => a as f64 == b,
        (Value::BigInt(a), Value::BigInt(b)) => HeapBigInt::equal(agent, a, b),
        // 3. Return SameValueNonNumber(x, y).
        _ => same_value_non_number(x, y),
    }
}

/// ### [7.3.22 OrdinaryHasInstance ( C, O )](https://tc39.es/ecma262/#sec-ordinaryhasinstance)
pub(crate) fn ordinary_has_instance(agent: &mut Agent, c: Value, o: Value) -> JsResult<bool> {
    // 1. If IsCallable(C) is false, return false.
    let Some(c) = is_callable(agent, c) else {
        return Ok(false);
    };
    // 2. If C has a [[BoundTargetFunction]] internal slot, apply instanceof
    //    to the target.
    if let Object::BoundFunction(bound) = c {
        let target = agent[bound].bound_target_function;
        return instanceof_operator(agent, o, target.into_value());
    }
    // 3. If O is not an Object, return false.
    let Value::Object(mut object) = o else {
        return Ok(false);
    };
    // 4. Let P be ? Get(C, "prototype").
    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
    let p = super::operations_on_objects::get(agent, c, prototype_key)?;
    // 5. If P is not an Object, throw a TypeError exception.
    let Value::Object(p) = p else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Function has non-object prototype in instanceof check",
        ));
    };
    // 6. Repeat,
    loop {
        // a. Set O to ? O.[[GetPrototypeOf]]().
        let proto = object.internal_get_prototype_of(agent)?;
        // b. If O is null, return false.
        let Some(proto) = proto else {
            return Ok(false);
        };
        // c. If SameValue(P, O) is true, return true.
        if proto == p {
            return Ok(true);
        }
        object = proto;
    }
}

/// ### [13.10.2 InstanceofOperator ( V, target )](https://tc39.es/ecma262/#sec-instanceofoperator)
pub(crate) fn instanceof_operator(agent: &mut Agent, v: Value, target: Value) -> JsResult<bool> {
    // 1. If target is not an Object, throw a TypeError exception.
    if !target.is_object() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Right-hand side of 'instanceof' is not an object",
        ));
    }
    // 2. Let instOfHandler be ? GetMethod(target, %Symbol.hasInstance%).
    let has_instance_key = PropertyKey::Symbol(crate::ecmascript::types::Symbol::from(
        WellKnownSymbolIndexes::HasInstance,
    ));
    let inst_of_handler = get_method(agent, target, has_instance_key)?;
    // 3. If instOfHandler is not undefined, return
    //    ToBoolean(? Call(instOfHandler, target, « V »)).
    if let Some(inst_of_handler) = inst_of_handler {
        let result = call_function(agent, inst_of_handler.into(), target, &[v])?;
        return Ok(to_boolean(agent, result));
    }
    // 4. If IsCallable(target) is false, throw a TypeError exception.
    if is_callable(agent, target).is_none() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Right-hand side of 'instanceof' is not callable",
        ));
    }
    // 5. Return ? OrdinaryHasInstance(target, V).
    ordinary_has_instance(agent, target, v)
}

/// ### [7.3.14 HasOwnProperty-adjacent helper](https://tc39.es/ecma262/#sec-isextensible-o)
pub(crate) fn is_extensible(agent: &mut Agent, o: Object) -> JsResult<bool> {
    // 1. Return ? O.[[IsExtensible]]().
    o.internal_is_extensible(agent)
}

pub(crate) fn has_property_check(
    agent: &mut Agent,
    o: Object,
    key: PropertyKey,
) -> JsResult<bool> {
    has_property(agent, o, key)
}
