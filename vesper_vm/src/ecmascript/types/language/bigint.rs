// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.6.2 The BigInt Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-bigint-type)

use core::ops::{Index, IndexMut};

use num_bigint::BigInt as NumBigInt;
use num_traits::{Num, Signed, ToPrimitive, Zero};

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::heap::indexes::BigIntIndex;
use crate::heap::CreateHeapData;

use super::string::HeapString;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HeapBigInt(pub(crate) BigIntIndex);

pub type BigInt = HeapBigInt;

#[derive(Debug, Clone)]
pub struct BigIntHeapData {
    pub(crate) data: NumBigInt,
}

impl Index<HeapBigInt> for Agent {
    type Output = BigIntHeapData;

    fn index(&self, index: HeapBigInt) -> &Self::Output {
        self.heap
            .bigints
            .get(index.0.into_index())
            .expect("HeapBigInt out of bounds")
            .as_ref()
            .expect("HeapBigInt slot empty")
    }
}

impl IndexMut<HeapBigInt> for Agent {
    fn index_mut(&mut self, index: HeapBigInt) -> &mut Self::Output {
        self.heap
            .bigints
            .get_mut(index.0.into_index())
            .expect("HeapBigInt out of bounds")
            .as_mut()
            .expect("HeapBigInt slot empty")
    }
}

impl HeapBigInt {
    pub(crate) fn from_num(agent: &mut Agent, data: NumBigInt) -> Self {
        HeapBigInt(agent.heap.create(BigIntHeapData { data }))
    }

    pub(crate) fn from_i64(agent: &mut Agent, value: i64) -> Self {
        Self::from_num(agent, NumBigInt::from(value))
    }

    /// Parse a BigInt literal body in the given radix, without the trailing
    /// `n` suffix.
    pub(crate) fn parse(agent: &mut Agent, literal: &str, radix: u32) -> Option<Self> {
        let data = NumBigInt::from_str_radix(literal, radix).ok()?;
        Some(Self::from_num(agent, data))
    }

    /// ### [StringToBigInt ( str )](https://tc39.es/ecma262/#sec-stringtobigint)
    pub(crate) fn from_str(agent: &mut Agent, text: &str) -> Option<Self> {
        let trimmed = text.trim_matches(is_trimmable_whitespace);
        if trimmed.is_empty() {
            return Some(Self::from_num(agent, NumBigInt::zero()));
        }
        let (body, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(body) => (body, 16),
            None => match trimmed
                .strip_prefix("0o")
                .or_else(|| trimmed.strip_prefix("0O"))
            {
                Some(body) => (body, 8),
                None => match trimmed
                    .strip_prefix("0b")
                    .or_else(|| trimmed.strip_prefix("0B"))
                {
                    Some(body) => (body, 2),
                    None => (trimmed, 10),
                },
            },
        };
        if radix != 10 && (body.starts_with('+') || body.starts_with('-')) {
            return None;
        }
        Self::parse(agent, body, radix)
    }

    pub(crate) fn is_zero(self, agent: &Agent) -> bool {
        agent[self].data.is_zero()
    }

    pub(crate) fn is_negative(self, agent: &Agent) -> bool {
        agent[self].data.is_negative()
    }

    pub(crate) fn to_f64(self, agent: &Agent) -> f64 {
        agent[self].data.to_f64().unwrap_or(f64::NAN)
    }

    /// ### [6.1.6.2.21 BigInt::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-bigint-tostring)
    pub(crate) fn to_string_radix(self, agent: &mut Agent, radix: u32) -> HeapString {
        let text = agent[self].data.to_str_radix(radix);
        HeapString::from_string(agent, text)
    }

    /// ### [6.1.6.2.20 BigInt::equal ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-bigint-equal)
    pub(crate) fn equal(agent: &Agent, x: HeapBigInt, y: HeapBigInt) -> bool {
        x == y || agent[x].data == agent[y].data
    }

    /// Numeric comparison against a Number value, used by loose equality and
    /// the relational operators.
    pub(crate) fn equal_f64(self, agent: &Agent, y: f64) -> bool {
        if !y.is_finite() || y.fract() != 0.0 {
            return false;
        }
        self.to_f64(agent) == y
    }

    pub(crate) fn binary_op(
        agent: &mut Agent,
        op: BigIntBinaryOp,
        x: HeapBigInt,
        y: HeapBigInt,
    ) -> JsResult<Value> {
        let a = &agent[x].data;
        let b = &agent[y].data;
        let result = match op {
            BigIntBinaryOp::Add => a + b,
            BigIntBinaryOp::Subtract => a - b,
            BigIntBinaryOp::Multiply => a * b,
            BigIntBinaryOp::Divide => {
                if b.is_zero() {
                    return Err(
                        agent.throw_exception(ExceptionType::RangeError, "Division by zero")
                    );
                }
                a / b
            }
            BigIntBinaryOp::Remainder => {
                if b.is_zero() {
                    return Err(
                        agent.throw_exception(ExceptionType::RangeError, "Division by zero")
                    );
                }
                a % b
            }
            BigIntBinaryOp::Exponentiate => {
                let Some(exponent) = b.to_u32() else {
                    return Err(agent.throw_exception(
                        ExceptionType::RangeError,
                        "Exponent must be a non-negative safe integer",
                    ));
                };
                a.pow(exponent)
            }
            BigIntBinaryOp::BitwiseAnd => a & b,
            BigIntBinaryOp::BitwiseOr => a | b,
            BigIntBinaryOp::BitwiseXor => a ^ b,
            BigIntBinaryOp::ShiftLeft => {
                let Some(shift) = b.to_i64() else {
                    return Err(agent
                        .throw_exception(ExceptionType::RangeError, "BigInt shift out of range"));
                };
                if shift >= 0 {
                    a << shift as u64
                } else {
                    a >> (-shift) as u64
                }
            }
            BigIntBinaryOp::ShiftRight => {
                let Some(shift) = b.to_i64() else {
                    return Err(agent
                        .throw_exception(ExceptionType::RangeError, "BigInt shift out of range"));
                };
                if shift >= 0 {
                    a >> shift as u64
                } else {
                    a << (-shift) as u64
                }
            }
        };
        Ok(Value::BigInt(HeapBigInt::from_num(agent, result)))
    }

    pub(crate) fn unary_minus(self, agent: &mut Agent) -> HeapBigInt {
        let result = -&agent[self].data;
        HeapBigInt::from_num(agent, result)
    }

    pub(crate) fn bitwise_not(self, agent: &mut Agent) -> HeapBigInt {
        let result = !&agent[self].data;
        HeapBigInt::from_num(agent, result)
    }

    pub(crate) fn less_than(agent: &Agent, x: HeapBigInt, y: HeapBigInt) -> bool {
        agent[x].data < agent[y].data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BigIntBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponentiate,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

/// White space and line terminators trimmed by the string-to-number and
/// string-to-bigint grammars.
pub(crate) fn is_trimmable_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{000A}'
            | '\u{000D}'
            | '\u{2028}'
            | '\u{2029}'
    ) || c.is_whitespace()
}
