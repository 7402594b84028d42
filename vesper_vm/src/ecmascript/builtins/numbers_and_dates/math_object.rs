// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.3 The Math Object](https://tc39.es/ecma262/#sec-math-object)

use crate::ecmascript::abstract_operations::type_conversion::to_number;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::Value;

pub(crate) struct MathObject;

macro_rules! math_unary {
    ($marker: ident, $name: literal, $method: ident, $op: expr) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::$method);
        }
        impl MathObject {
            fn $method(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
            ) -> JsResult<Value> {
                let x = to_number(agent, arguments.get(0))?;
                let op: fn(f64) -> f64 = $op;
                Ok(Value::from_f64(op(x)))
            }
        }
    };
}

math_unary!(MathAbs, "abs", abs, f64::abs);
math_unary!(MathAcos, "acos", acos, f64::acos);
math_unary!(MathAcosh, "acosh", acosh, f64::acosh);
math_unary!(MathAsin, "asin", asin, f64::asin);
math_unary!(MathAsinh, "asinh", asinh, f64::asinh);
math_unary!(MathAtan, "atan", atan, f64::atan);
math_unary!(MathAtanh, "atanh", atanh, f64::atanh);
math_unary!(MathCbrt, "cbrt", cbrt, f64::cbrt);
math_unary!(MathCeil, "ceil", ceil, f64::ceil);
math_unary!(MathCos, "cos", cos, f64::cos);
math_unary!(MathCosh, "cosh", cosh, f64::cosh);
math_unary!(MathExp, "exp", exp, f64::exp);
math_unary!(MathExpm1, "expm1", expm1, f64::exp_m1);
math_unary!(MathFloor, "floor", floor, f64::floor);
math_unary!(MathFround, "fround", fround, |x| x as f32 as f64);
math_unary!(MathLog, "log", log, f64::ln);
math_unary!(MathLog1p, "log1p", log1p, f64::ln_1p);
math_unary!(MathLog10, "log10", log10, f64::log10);
math_unary!(MathLog2, "log2", log2, f64::log2);
math_unary!(MathSign, "sign", sign, |x: f64| {
    if x.is_nan() || x == 0.0 {
        x
    } else if x < 0.0 {
        -1.0
    } else {
        1.0
    }
});
math_unary!(MathSin, "sin", sin, f64::sin);
math_unary!(MathSinh, "sinh", sinh, f64::sinh);
math_unary!(MathSqrt, "sqrt", sqrt, f64::sqrt);
math_unary!(MathTan, "tan", tan, f64::tan);
math_unary!(MathTanh, "tanh", tanh, f64::tanh);
math_unary!(MathTrunc, "trunc", trunc, f64::trunc);

struct MathRound;
impl Builtin for MathRound {
    const NAME: &'static str = "round";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::round);
}

struct MathClz32;
impl Builtin for MathClz32 {
    const NAME: &'static str = "clz32";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::clz32);
}

struct MathAtan2;
impl Builtin for MathAtan2 {
    const NAME: &'static str = "atan2";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::atan2);
}

struct MathImul;
impl Builtin for MathImul {
    const NAME: &'static str = "imul";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::imul);
}

struct MathPow;
impl Builtin for MathPow {
    const NAME: &'static str = "pow";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::pow);
}

struct MathHypot;
impl Builtin for MathHypot {
    const NAME: &'static str = "hypot";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::hypot);
}

struct MathMax;
impl Builtin for MathMax {
    const NAME: &'static str = "max";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::max);
}

struct MathMin;
impl Builtin for MathMin {
    const NAME: &'static str = "min";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::min);
}

struct MathRandom;
impl Builtin for MathRandom {
    const NAME: &'static str = "random";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::random);
}

impl MathObject {
    /// ### [21.3.2.28 Math.round ( x )](https://tc39.es/ecma262/#sec-math.round)
    fn round(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = to_number(agent, arguments.get(0))?;
        // Halfway cases round toward +∞.
        let rounded = if x.fract() == 0.5 { x.ceil() } else { x.round() };
        let rounded = if x.fract() == -0.5 { x.ceil() } else { rounded };
        Ok(Value::from_f64(rounded))
    }

    /// ### [21.3.2.11 Math.clz32 ( x )](https://tc39.es/ecma262/#sec-math.clz32)
    fn clz32(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = to_number(agent, arguments.get(0))?;
        let n = crate::ecmascript::types::language::number::f64_to_uint32(x);
        Ok(Value::from(n.leading_zeros()))
    }

    /// ### [21.3.2.6 Math.atan2 ( y, x )](https://tc39.es/ecma262/#sec-math.atan2)
    fn atan2(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let y = to_number(agent, arguments.get(0))?;
        let x = to_number(agent, arguments.get(1))?;
        Ok(Value::from_f64(y.atan2(x)))
    }

    /// ### [21.3.2.19 Math.imul ( x, y )](https://tc39.es/ecma262/#sec-math.imul)
    fn imul(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = to_number(agent, arguments.get(0))?;
        let y = to_number(agent, arguments.get(1))?;
        let a = crate::ecmascript::types::language::number::f64_to_int32(x);
        let b = crate::ecmascript::types::language::number::f64_to_int32(y);
        Ok(Value::from(a.wrapping_mul(b)))
    }

    /// ### [21.3.2.26 Math.pow ( base, exponent )](https://tc39.es/ecma262/#sec-math.pow)
    fn pow(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let base = to_number(agent, arguments.get(0))?;
        let exponent = to_number(agent, arguments.get(1))?;
        Ok(Value::from_f64(base.powf(exponent)))
    }

    /// ### [21.3.2.18 Math.hypot ( ...args )](https://tc39.es/ecma262/#sec-math.hypot)
    fn hypot(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut sum = 0.0f64;
        let mut saw_nan = false;
        let mut saw_inf = false;
        for argument in arguments.iter() {
            let n = to_number(agent, *argument)?;
            if n.is_infinite() {
                saw_inf = true;
            } else if n.is_nan() {
                saw_nan = true;
            }
            sum += n * n;
        }
        if saw_inf {
            return Ok(Value::Number(f64::INFINITY));
        }
        if saw_nan {
            return Ok(Value::nan());
        }
        Ok(Value::from_f64(sum.sqrt()))
    }

    /// ### [21.3.2.24 Math.max ( ...args )](https://tc39.es/ecma262/#sec-math.max)
    fn max(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut highest = f64::NEG_INFINITY;
        let mut saw_nan = false;
        for argument in arguments.iter() {
            let n = to_number(agent, *argument)?;
            if n.is_nan() {
                saw_nan = true;
            }
            // +0 beats -0.
            if n > highest || (n == 0.0 && highest == 0.0 && n.is_sign_positive()) {
                highest = n;
            }
        }
        if saw_nan {
            return Ok(Value::nan());
        }
        Ok(Value::from_f64(highest))
    }

    /// ### [21.3.2.25 Math.min ( ...args )](https://tc39.es/ecma262/#sec-math.min)
    fn min(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut lowest = f64::INFINITY;
        let mut saw_nan = false;
        for argument in arguments.iter() {
            let n = to_number(agent, *argument)?;
            if n.is_nan() {
                saw_nan = true;
            }
            if n < lowest || (n == 0.0 && lowest == 0.0 && n.is_sign_negative()) {
                lowest = n;
            }
        }
        if saw_nan {
            return Ok(Value::nan());
        }
        Ok(Value::from_f64(lowest))
    }

    /// ### [21.3.2.27 Math.random ( )](https://tc39.es/ecma262/#sec-math.random)
    fn random(_agent: &mut Agent, _this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // A simple xorshift seeded from the system clock; the spec only
        // asks for an implementation-defined distribution over [0, 1).
        use std::time::{SystemTime, UNIX_EPOCH};
        use core::cell::Cell;
        thread_local! {
            static STATE: Cell<u64> = Cell::new(0);
        }
        let value = STATE.with(|state| {
            let mut x = state.get();
            if x == 0 {
                x = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0x9E3779B97F4A7C15)
                    | 1;
            }
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            state.set(x);
            x
        });
        Ok(Value::Number((value >> 11) as f64 / (1u64 << 53) as f64))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let math = agent.get_realm(realm).intrinsics().math();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, math)
        .with_frozen_property("E", Value::Number(core::f64::consts::E))
        .with_frozen_property("LN10", Value::Number(core::f64::consts::LN_10))
        .with_frozen_property("LN2", Value::Number(core::f64::consts::LN_2))
        .with_frozen_property("LOG10E", Value::Number(core::f64::consts::LOG10_E))
        .with_frozen_property("LOG2E", Value::Number(core::f64::consts::LOG2_E))
        .with_frozen_property("PI", Value::Number(core::f64::consts::PI))
        .with_frozen_property("SQRT1_2", Value::Number(core::f64::consts::FRAC_1_SQRT_2))
        .with_frozen_property("SQRT2", Value::Number(core::f64::consts::SQRT_2))
        .with_builtin_function_property::<MathAbs>()
        .with_builtin_function_property::<MathAcos>()
        .with_builtin_function_property::<MathAcosh>()
        .with_builtin_function_property::<MathAsin>()
        .with_builtin_function_property::<MathAsinh>()
        .with_builtin_function_property::<MathAtan>()
        .with_builtin_function_property::<MathAtanh>()
        .with_builtin_function_property::<MathAtan2>()
        .with_builtin_function_property::<MathCbrt>()
        .with_builtin_function_property::<MathCeil>()
        .with_builtin_function_property::<MathClz32>()
        .with_builtin_function_property::<MathCos>()
        .with_builtin_function_property::<MathCosh>()
        .with_builtin_function_property::<MathExp>()
        .with_builtin_function_property::<MathExpm1>()
        .with_builtin_function_property::<MathFloor>()
        .with_builtin_function_property::<MathFround>()
        .with_builtin_function_property::<MathHypot>()
        .with_builtin_function_property::<MathImul>()
        .with_builtin_function_property::<MathLog>()
        .with_builtin_function_property::<MathLog1p>()
        .with_builtin_function_property::<MathLog10>()
        .with_builtin_function_property::<MathLog2>()
        .with_builtin_function_property::<MathMax>()
        .with_builtin_function_property::<MathMin>()
        .with_builtin_function_property::<MathPow>()
        .with_builtin_function_property::<MathRandom>()
        .with_builtin_function_property::<MathRound>()
        .with_builtin_function_property::<MathSign>()
        .with_builtin_function_property::<MathSin>()
        .with_builtin_function_property::<MathSinh>()
        .with_builtin_function_property::<MathSqrt>()
        .with_builtin_function_property::<MathTan>()
        .with_builtin_function_property::<MathTanh>()
        .with_builtin_function_property::<MathTrunc>()
        .with_to_string_tag("Math")
        .build();
}
