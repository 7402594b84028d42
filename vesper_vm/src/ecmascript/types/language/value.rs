// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)

use core::mem::size_of;

use crate::ecmascript::execution::{Agent, JsResult};

use super::bigint::HeapBigInt;
use super::object::Object;
use super::string::HeapString;
use super::symbol::Symbol;

/// ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)
///
/// A copyable tagged union. Numbers exactly representable as an `i32` (other
/// than negative zero) are canonically stored in the `Integer` variant, so
/// the derived equality is identity for every variant and value equality for
/// interned strings and canonical numbers; NaN and signed-zero rules live in
/// the comparison abstract operations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// ### [6.1.1 The Undefined Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-undefined-type)
    #[default]
    Undefined,

    /// ### [6.1.2 The Null Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-null-type)
    Null,

    /// ### [6.1.3 The Boolean Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-boolean-type)
    Boolean(bool),

    /// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
    String(HeapString),

    /// ### [6.1.5 The Symbol Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-symbol-type)
    Symbol(Symbol),

    /// ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
    Number(f64),
    /// i32 fast path of the Number type.
    Integer(i32),

    /// ### [6.1.6.2 The BigInt Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-bigint-type)
    BigInt(HeapBigInt),

    /// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
    Object(Object),
}

/// Handles must stay within a 128-bit footprint. This assert must never be
/// removed or broken.
const _VALUE_SIZE_IS_TWO_WORDS: () = assert!(size_of::<Value>() <= 2 * size_of::<usize>());

/// A Number or a BigInt, as returned by ToNumeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Number(f64),
    BigInt(HeapBigInt),
}

impl Numeric {
    pub(crate) fn into_value(self, _agent: &Agent) -> Value {
        match self {
            Numeric::Number(n) => Value::from_f64(n),
            Numeric::BigInt(b) => Value::BigInt(b),
        }
    }
}

/// Hint parameter of ToPrimitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    Default,
    String,
    Number,
}

impl Value {
    /// Canonicalizing Number constructor: integral doubles that fit an `i32`
    /// (and are not negative zero) become `Integer`.
    pub fn from_f64(value: f64) -> Value {
        if value.trunc() == value
            && value >= i32::MIN as f64
            && value <= i32::MAX as f64
            && !(value == 0.0 && value.is_sign_negative())
        {
            Value::Integer(value as i32)
        } else {
            Value::Number(value)
        }
    }

    pub fn from_str(agent: &mut Agent, message: &str) -> Value {
        Value::String(HeapString::from_str(agent, message))
    }

    pub fn from_string(agent: &mut Agent, message: String) -> Value {
        Value::String(HeapString::from_string(agent, message))
    }

    pub fn from_static_str(agent: &mut Agent, message: &'static str) -> Value {
        Value::String(HeapString::from_static_str(agent, message))
    }

    pub fn nan() -> Self {
        Value::Number(f64::NAN)
    }

    pub fn is_true(self) -> bool {
        matches!(self, Value::Boolean(true))
    }

    pub fn is_false(self) -> bool {
        matches!(self, Value::Boolean(false))
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_nullish(self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_string(self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_symbol(self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_number(self) -> bool {
        matches!(self, Value::Number(_) | Value::Integer(_))
    }

    pub fn is_bigint(self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    pub fn is_object(self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_primitive(self) -> bool {
        !self.is_object()
    }

    pub(crate) fn is_nan(self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    pub(crate) fn is_pos_zero(self) -> bool {
        matches!(self, Value::Integer(0))
            || matches!(self, Value::Number(n) if n == 0.0 && n.is_sign_positive())
    }

    pub(crate) fn is_neg_zero(self) -> bool {
        matches!(self, Value::Number(n) if n == 0.0 && n.is_sign_negative())
    }

    /// The `f64` behind a Number value. Panics on non-numbers.
    pub(crate) fn unwrap_f64(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Integer(i) => i as f64,
            _ => unreachable!("unwrap_f64 on a non-number"),
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    /// A string conversion that will never throw, meant for things like
    /// displaying exceptions.
    pub fn string_repr(self, agent: &mut Agent) -> HeapString {
        use crate::ecmascript::abstract_operations::type_conversion::to_string;
        if let Value::Symbol(symbol) = self {
            // ToString of a symbol always throws; use the descriptive string
            // instead, matching `String(symbol)`.
            return symbol.descriptive_string(agent);
        }
        match to_string(agent, self) {
            Ok(result) => result,
            Err(_) => HeapString::from_static_str(agent, "Object"),
        }
    }

    pub fn to_number(self, agent: &mut Agent) -> JsResult<f64> {
        crate::ecmascript::abstract_operations::type_conversion::to_number(agent, self)
    }

    pub fn to_string(self, agent: &mut Agent) -> JsResult<HeapString> {
        crate::ecmascript::abstract_operations::type_conversion::to_string(agent, self)
    }

    /// The `typeof` tag for this value.
    pub(crate) fn type_of(self, agent: &Agent) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Number(_) | Value::Integer(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Object(object) => {
                if object.is_callable(agent) {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<HeapString> for Value {
    fn from(value: HeapString) -> Self {
        Value::String(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl From<HeapBigInt> for Value {
    fn from(value: HeapBigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from_f64(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, |v| v.into())
    }
}

macro_rules! impl_value_from_n {
    ($size: ty) => {
        impl From<$size> for Value {
            fn from(value: $size) -> Self {
                Value::Integer(value as i32)
            }
        }
    };
}

impl_value_from_n!(u8);
impl_value_from_n!(i8);
impl_value_from_n!(u16);
impl_value_from_n!(i16);
impl_value_from_n!(i32);

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        if let Ok(value) = i32::try_from(value) {
            Value::Integer(value)
        } else {
            Value::Number(value as f64)
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        if let Ok(value) = i32::try_from(value) {
            Value::Integer(value)
        } else {
            Value::Number(value as f64)
        }
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        if let Ok(value) = i32::try_from(value) {
            Value::Integer(value)
        } else {
            Value::Number(value as f64)
        }
    }
}
