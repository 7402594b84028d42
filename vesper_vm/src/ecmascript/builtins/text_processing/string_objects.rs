// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.1 String Objects](https://tc39.es/ecma262/#sec-string-objects)
//!
//! String semantics are UTF-16 code units: lengths and indexes count code
//! units, and one-unit reads can split surrogate pairs.

use crate::ecmascript::abstract_operations::operations_on_objects::call_function;
use crate::ecmascript::abstract_operations::testing_and_comparison::require_object_coercible;
use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_number, to_string, to_uint16,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{BuiltinIterator, IteratorKind};
use crate::ecmascript::builtins::primitive_objects::{PrimitiveObject, PrimitiveObjectData};
use crate::ecmascript::builtins::regexp::{regexp_builtin_exec, RegExp};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{HeapString, Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct StringConstructor;

impl Builtin for StringConstructor {
    const NAME: &'static str = "String";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(StringConstructor::construct);
}

struct StringFromCharCode;
impl Builtin for StringFromCharCode {
    const NAME: &'static str = "fromCharCode";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_char_code);
}

struct StringFromCodePoint;
impl Builtin for StringFromCodePoint {
    const NAME: &'static str = "fromCodePoint";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringConstructor::from_code_point);
}

impl StringConstructor {
    /// ### [22.1.1.1 String ( value )](https://tc39.es/ecma262/#sec-string-constructor-string-value)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let value = arguments.get(0);
        // 1-2. With no argument the string is empty; a Symbol without new
        //    gets its descriptive string.
        let s = if arguments.is_empty() {
            HeapString::from_static_str(agent, "")
        } else if let (Value::Symbol(symbol), None) = (value, new_target) {
            symbol.descriptive_string(agent)
        } else {
            to_string(agent, value)?
        };
        // 4. If NewTarget is undefined, return s.
        if new_target.is_none() {
            return Ok(Value::String(s));
        }
        // 5. Return StringCreate(s, prototype).
        let string_prototype = agent.current_realm().intrinsics().string_prototype();
        Ok(PrimitiveObject::create_with_prototype(
            agent,
            PrimitiveObjectData::String(s),
            string_prototype.into(),
        )
        .into())
    }

    /// ### [22.1.2.1 String.fromCharCode ( ...codeUnits )](https://tc39.es/ecma262/#sec-string.fromcharcode)
    fn from_char_code(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let mut units = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            units.push(to_uint16(agent, *argument)?);
        }
        Ok(Value::String(HeapString::from_code_units(agent, &units)))
    }

    /// ### [22.1.2.2 String.fromCodePoint ( ...codePoints )](https://tc39.es/ecma262/#sec-string.fromcodepoint)
    fn from_code_point(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let mut units: Vec<u16> = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            let next = to_number(agent, *argument)?;
            if next.trunc() != next || !(0.0..=1114111.0).contains(&next) {
                return Err(agent.throw_exception(
                    ExceptionType::RangeError,
                    "Invalid code point",
                ));
            }
            let cp = next as u32;
            if cp <= 0xFFFF {
                units.push(cp as u16);
            } else {
                let cp = cp - 0x10000;
                units.push(0xD800 + (cp >> 10) as u16);
                units.push(0xDC00 + (cp & 0x3FF) as u16);
            }
        }
        Ok(Value::String(HeapString::from_code_units(agent, &units)))
    }
}

/// The receiver coercion shared by the String.prototype methods.
fn this_string_value(agent: &mut Agent, this_value: Value) -> JsResult<HeapString> {
    match this_value {
        Value::String(s) => Ok(s),
        Value::Object(Object::PrimitiveObject(object)) => {
            if let PrimitiveObjectData::String(s) = object.data(agent) {
                Ok(s)
            } else {
                Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Not a String or String object",
                ))
            }
        }
        _ => {
            require_object_coercible(agent, this_value)?;
            to_string(agent, this_value)
        }
    }
}

/// Clamp a relative index into [0, len].
fn clamp_relative(relative: f64, len: usize) -> usize {
    if relative < 0.0 {
        (len as f64 + relative).max(0.0) as usize
    } else {
        (relative as usize).min(len)
    }
}

pub(crate) struct StringPrototype;

macro_rules! string_method {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(StringPrototype::$method);
        }
    };
}

string_method!(StringPrototypeAt, "at", 1, at);
string_method!(StringPrototypeCharAt, "charAt", 1, char_at);
string_method!(StringPrototypeCharCodeAt, "charCodeAt", 1, char_code_at);
string_method!(StringPrototypeCodePointAt, "codePointAt", 1, code_point_at);
string_method!(StringPrototypeConcat, "concat", 1, concat);
string_method!(StringPrototypeEndsWith, "endsWith", 1, ends_with);
string_method!(StringPrototypeIncludes, "includes", 1, includes);
string_method!(StringPrototypeIndexOf, "indexOf", 1, index_of);
string_method!(StringPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of);
string_method!(StringPrototypeLocaleCompare, "localeCompare", 1, locale_compare);
string_method!(StringPrototypeMatch, "match", 1, r#match);
string_method!(StringPrototypePadEnd, "padEnd", 1, pad_end);
string_method!(StringPrototypePadStart, "padStart", 1, pad_start);
string_method!(StringPrototypeRepeat, "repeat", 1, repeat);
string_method!(StringPrototypeReplace, "replace", 2, replace);
string_method!(StringPrototypeReplaceAll, "replaceAll", 2, replace_all);
string_method!(StringPrototypeSearch, "search", 1, search);
string_method!(StringPrototypeSlice, "slice", 2, slice);
string_method!(StringPrototypeSplit, "split", 2, split);
string_method!(StringPrototypeStartsWith, "startsWith", 1, starts_with);
string_method!(StringPrototypeSubstring, "substring", 2, substring);
string_method!(StringPrototypeToLowerCase, "toLowerCase", 0, to_lower_case);
string_method!(StringPrototypeToString, "toString", 0, to_string_method);
string_method!(StringPrototypeToUpperCase, "toUpperCase", 0, to_upper_case);
string_method!(StringPrototypeTrim, "trim", 0, trim);
string_method!(StringPrototypeTrimEnd, "trimEnd", 0, trim_end);
string_method!(StringPrototypeTrimStart, "trimStart", 0, trim_start);
string_method!(StringPrototypeValueOf, "valueOf", 0, value_of);

struct StringPrototypeIterator;
impl Builtin for StringPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(StringPrototype::iterator);
}

impl StringPrototype {
    /// ### [22.1.3.1 String.prototype.at ( index )](https://tc39.es/ecma262/#sec-string.prototype.at)
    fn at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let len = s.utf16_len(agent) as i64;
        let relative = to_integer_or_infinity(agent, arguments.get(0))?;
        let index = if relative < 0.0 {
            len + relative as i64
        } else {
            relative as i64
        };
        if index < 0 || index >= len {
            return Ok(Value::Undefined);
        }
        Ok(s.char_at(agent, index as usize)
            .map_or(Value::Undefined, Value::String))
    }

    /// ### [22.1.3.2 String.prototype.charAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.charat)
    fn char_at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        if position < 0.0 {
            return Ok(Value::from_static_str(agent, ""));
        }
        match s.char_at(agent, position as usize) {
            Some(unit) => Ok(Value::String(unit)),
            None => Ok(Value::from_static_str(agent, "")),
        }
    }

    /// ### [22.1.3.3 String.prototype.charCodeAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.charcodeat)
    fn char_code_at(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        if position < 0.0 {
            return Ok(Value::nan());
        }
        match s.code_unit_at(agent, position as usize) {
            Some(unit) => Ok(Value::from(unit)),
            None => Ok(Value::nan()),
        }
    }

    /// ### [22.1.3.4 String.prototype.codePointAt ( pos )](https://tc39.es/ecma262/#sec-string.prototype.codepointat)
    fn code_point_at(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let position = to_integer_or_infinity(agent, arguments.get(0))?;
        let units = s.code_units(agent);
        if position < 0.0 || position as usize >= units.len() {
            return Ok(Value::Undefined);
        }
        let position = position as usize;
        let first = units[position];
        let code_point = if (0xD800..0xDC00).contains(&first)
            && position + 1 < units.len()
            && (0xDC00..0xE000).contains(&units[position + 1])
        {
            0x10000 + ((first as u32 - 0xD800) << 10) + (units[position + 1] as u32 - 0xDC00)
        } else {
            first as u32
        };
        Ok(Value::from(code_point))
    }

    /// ### [22.1.3.5 String.prototype.concat ( ...args )](https://tc39.es/ecma262/#sec-string.prototype.concat)
    fn concat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let mut parts = vec![this_string_value(agent, this_value)?];
        for argument in arguments.iter() {
            parts.push(to_string(agent, *argument)?);
        }
        Ok(Value::String(HeapString::concat(agent, &parts)))
    }

    /// ### [22.1.3.7 String.prototype.endsWith ( searchString \[ , endPosition \] )](https://tc39.es/ecma262/#sec-string.prototype.endswith)
    fn ends_with(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let search = to_string(agent, arguments.get(0))?;
        let units = s.code_units(agent);
        let search_units = search.code_units(agent);
        let end = if arguments.get(1).is_undefined() {
            units.len()
        } else {
            let position = to_integer_or_infinity(agent, arguments.get(1))?;
            clamp_relative(position.max(0.0), units.len())
        };
        if search_units.len() > end {
            return Ok(Value::Boolean(false));
        }
        Ok(Value::Boolean(
            units[end - search_units.len()..end] == search_units[..],
        ))
    }

    /// ### [22.1.3.8 String.prototype.includes ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.includes)
    fn includes(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let index = Self::index_of_impl(agent, this_value, arguments)?;
        Ok(Value::Boolean(index >= 0))
    }

    /// ### [22.1.3.9 String.prototype.indexOf ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.indexof)
    fn index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let index = Self::index_of_impl(agent, this_value, arguments)?;
        Ok(Value::from(index))
    }

    fn index_of_impl(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<i64> {
        let s = this_string_value(agent, this_value)?;
        let search = to_string(agent, arguments.get(0))?;
        let position = to_integer_or_infinity(agent, arguments.get(1))?;
        let units = s.code_units(agent);
        let search_units = search.code_units(agent);
        let start = clamp_relative(position.max(0.0), units.len());
        if search_units.is_empty() {
            return Ok(start as i64);
        }
        if search_units.len() > units.len() {
            return Ok(-1);
        }
        for index in start..=(units.len() - search_units.len()) {
            if units[index..index + search_units.len()] == search_units[..] {
                return Ok(index as i64);
            }
        }
        Ok(-1)
    }

    /// ### [22.1.3.10 String.prototype.lastIndexOf ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.lastindexof)
    fn last_index_of(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let search = to_string(agent, arguments.get(0))?;
        let units = s.code_units(agent);
        let search_units = search.code_units(agent);
        if search_units.len() > units.len() {
            return Ok(Value::from(-1));
        }
        let last_start = units.len() - search_units.len();
        for index in (0..=last_start).rev() {
            if units[index..index + search_units.len()] == search_units[..] {
                return Ok(Value::from(index as i64));
            }
        }
        Ok(Value::from(-1))
    }

    /// ### [22.1.3.12 String.prototype.localeCompare ( that )](https://tc39.es/ecma262/#sec-string.prototype.localecompare)
    fn locale_compare(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let that = to_string(agent, arguments.get(0))?;
        // Code unit ordering stands in for locale collation.
        let result = if s == that {
            0
        } else if s.lt(agent, that) {
            -1
        } else {
            1
        };
        Ok(Value::from(result))
    }

    /// ### [22.1.3.13 String.prototype.match ( regexp )](https://tc39.es/ecma262/#sec-string.prototype.match)
    fn r#match(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let regexp = coerce_to_regexp(agent, arguments.get(0), "")?;
        if !agent[regexp].flags.global {
            return regexp_builtin_exec(agent, regexp, s);
        }
        // Global matches collect every matched string.
        agent[regexp].last_index = 0.0;
        let mut results = Vec::new();
        loop {
            let result = regexp_builtin_exec(agent, regexp, s)?;
            let Value::Object(result) = result else {
                break;
            };
            let matched = crate::ecmascript::abstract_operations::operations_on_objects::get(
                agent,
                result,
                PropertyKey::Integer(0),
            )?;
            let matched = to_string(agent, matched)?;
            results.push(Value::String(matched));
            if matched.is_empty_string(agent) {
                agent[regexp].last_index += 1.0;
            }
        }
        if results.is_empty() {
            return Ok(Value::Null);
        }
        Ok(create_array_from_list(agent, &results).into())
    }

    /// ### [22.1.3.16 String.prototype.padEnd ( maxLength \[ , fillString \] )](https://tc39.es/ecma262/#sec-string.prototype.padend)
    fn pad_end(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Self::pad(agent, this_value, arguments, false)
    }

    /// ### [22.1.3.17 String.prototype.padStart ( maxLength \[ , fillString \] )](https://tc39.es/ecma262/#sec-string.prototype.padstart)
    fn pad_start(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Self::pad(agent, this_value, arguments, true)
    }

    fn pad(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
        at_start: bool,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let max_length = to_integer_or_infinity(agent, arguments.get(0))?;
        let units = s.code_units(agent);
        if max_length <= units.len() as f64 {
            return Ok(Value::String(s));
        }
        let fill = arguments.get(1);
        let fill_units = if fill.is_undefined() {
            vec![0x20]
        } else {
            let fill = to_string(agent, fill)?;
            fill.code_units(agent)
        };
        if fill_units.is_empty() {
            return Ok(Value::String(s));
        }
        let pad_len = max_length as usize - units.len();
        let mut padding = Vec::with_capacity(pad_len);
        while padding.len() < pad_len {
            let take = (pad_len - padding.len()).min(fill_units.len());
            padding.extend_from_slice(&fill_units[..take]);
        }
        let mut combined = Vec::with_capacity(max_length as usize);
        if at_start {
            combined.extend_from_slice(&padding);
            combined.extend_from_slice(&units);
        } else {
            combined.extend_from_slice(&units);
            combined.extend_from_slice(&padding);
        }
        Ok(Value::String(HeapString::from_code_units(agent, &combined)))
    }

    /// ### [22.1.3.18 String.prototype.repeat ( count )](https://tc39.es/ecma262/#sec-string.prototype.repeat)
    fn repeat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let count = to_integer_or_infinity(agent, arguments.get(0))?;
        if count < 0.0 || count.is_infinite() {
            return Err(agent.throw_exception(
                ExceptionType::RangeError,
                "Invalid count value",
            ));
        }
        let text = s.to_string_lossy(agent).into_owned();
        Ok(Value::from_string(agent, text.repeat(count as usize)))
    }

    /// ### [22.1.3.19 String.prototype.replace ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replace)
    fn replace(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        replace_impl(agent, this_value, arguments.get(0), arguments.get(1), false)
    }

    /// ### [22.1.3.20 String.prototype.replaceAll ( searchValue, replaceValue )](https://tc39.es/ecma262/#sec-string.prototype.replaceall)
    fn replace_all(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        replace_impl(agent, this_value, arguments.get(0), arguments.get(1), true)
    }

    /// ### [22.1.3.21 String.prototype.search ( regexp )](https://tc39.es/ecma262/#sec-string.prototype.search)
    fn search(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let regexp = coerce_to_regexp(agent, arguments.get(0), "")?;
        // search ignores and restores lastIndex.
        let previous_last_index = agent[regexp].last_index;
        agent[regexp].last_index = 0.0;
        let result = regexp_builtin_exec(agent, regexp, s)?;
        agent[regexp].last_index = previous_last_index;
        match result {
            Value::Object(result) => {
                let key = PropertyKey::from_static_str(agent, "index");
                crate::ecmascript::abstract_operations::operations_on_objects::get(agent, result, key)
            }
            _ => Ok(Value::from(-1)),
        }
    }

    /// ### [22.1.3.22 String.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.slice)
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let units = s.code_units(agent);
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let from = clamp_relative(start, units.len());
        let to = if arguments.get(1).is_undefined() {
            units.len()
        } else {
            let end = to_integer_or_infinity(agent, arguments.get(1))?;
            clamp_relative(end, units.len())
        };
        if from >= to {
            return Ok(Value::from_static_str(agent, ""));
        }
        Ok(Value::String(HeapString::from_code_units(
            agent,
            &units[from..to],
        )))
    }

    /// ### [22.1.3.23 String.prototype.split ( separator, limit )](https://tc39.es/ecma262/#sec-string.prototype.split)
    fn split(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let separator = arguments.get(0);
        let limit = arguments.get(1);
        let limit = if limit.is_undefined() {
            u32::MAX
        } else {
            crate::ecmascript::abstract_operations::type_conversion::to_uint32(agent, limit)?
        };
        if limit == 0 {
            let empty: &[Value] = &[];
            return Ok(create_array_from_list(agent, empty).into());
        }
        // A regexp separator splits by match positions.
        if let Value::Object(Object::RegExp(regexp)) = separator {
            return split_with_regexp(agent, s, regexp, limit);
        }
        if separator.is_undefined() {
            let list = [Value::String(s)];
            return Ok(create_array_from_list(agent, &list).into());
        }
        let separator = to_string(agent, separator)?;
        let units = s.code_units(agent);
        let separator_units = separator.code_units(agent);
        let mut parts: Vec<Value> = Vec::new();
        if separator_units.is_empty() {
            for unit in units.iter().take(limit as usize) {
                let unit_string = HeapString::from_code_units(agent, &[*unit]);
                parts.push(Value::String(unit_string));
            }
            return Ok(create_array_from_list(agent, &parts).into());
        }
        let mut segment_start = 0usize;
        let mut index = 0usize;
        while index + separator_units.len() <= units.len() {
            if units[index..index + separator_units.len()] == separator_units[..] {
                let segment =
                    HeapString::from_code_units(agent, &units[segment_start..index]);
                parts.push(Value::String(segment));
                if parts.len() as u32 >= limit {
                    return Ok(create_array_from_list(agent, &parts).into());
                }
                index += separator_units.len();
                segment_start = index;
            } else {
                index += 1;
            }
        }
        let segment = HeapString::from_code_units(agent, &units[segment_start..]);
        parts.push(Value::String(segment));
        Ok(create_array_from_list(agent, &parts).into())
    }

    /// ### [22.1.3.24 String.prototype.startsWith ( searchString \[ , position \] )](https://tc39.es/ecma262/#sec-string.prototype.startswith)
    fn starts_with(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let search = to_string(agent, arguments.get(0))?;
        let position = to_integer_or_infinity(agent, arguments.get(1))?;
        let units = s.code_units(agent);
        let search_units = search.code_units(agent);
        let start = clamp_relative(position.max(0.0), units.len());
        if start + search_units.len() > units.len() {
            return Ok(Value::Boolean(false));
        }
        Ok(Value::Boolean(
            units[start..start + search_units.len()] == search_units[..],
        ))
    }

    /// ### [22.1.3.25 String.prototype.substring ( start, end )](https://tc39.es/ecma262/#sec-string.prototype.substring)
    fn substring(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let units = s.code_units(agent);
        let len = units.len() as f64;
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let end = if arguments.get(1).is_undefined() {
            len
        } else {
            to_integer_or_infinity(agent, arguments.get(1))?
        };
        let final_start = start.clamp(0.0, len) as usize;
        let final_end = end.clamp(0.0, len) as usize;
        let (from, to) = if final_start <= final_end {
            (final_start, final_end)
        } else {
            (final_end, final_start)
        };
        Ok(Value::String(HeapString::from_code_units(
            agent,
            &units[from..to],
        )))
    }

    /// ### [22.1.3.28 String.prototype.toLowerCase ( )](https://tc39.es/ecma262/#sec-string.prototype.tolowercase)
    fn to_lower_case(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let text = s.to_string_lossy(agent).to_lowercase();
        Ok(Value::from_string(agent, text))
    }

    /// ### [22.1.3.29 String.prototype.toString ( )](https://tc39.es/ecma262/#sec-string.prototype.tostring)
    fn to_string_method(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_string_value(agent, this_value).map(Value::String)
    }

    /// ### [22.1.3.30 String.prototype.toUpperCase ( )](https://tc39.es/ecma262/#sec-string.prototype.touppercase)
    fn to_upper_case(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let text = s.to_string_lossy(agent).to_uppercase();
        Ok(Value::from_string(agent, text))
    }

    /// ### [22.1.3.32 String.prototype.trim ( )](https://tc39.es/ecma262/#sec-string.prototype.trim)
    fn trim(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let text = s.to_string_lossy(agent);
        let trimmed = text
            .trim_matches(crate::ecmascript::types::language::bigint::is_trimmable_whitespace)
            .to_string();
        Ok(Value::from_string(agent, trimmed))
    }

    /// ### [22.1.3.34 String.prototype.trimStart ( )](https://tc39.es/ecma262/#sec-string.prototype.trimstart)
    fn trim_start(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let text = s.to_string_lossy(agent);
        let trimmed = text
            .trim_start_matches(
                crate::ecmascript::types::language::bigint::is_trimmable_whitespace,
            )
            .to_string();
        Ok(Value::from_string(agent, trimmed))
    }

    /// ### [22.1.3.33 String.prototype.trimEnd ( )](https://tc39.es/ecma262/#sec-string.prototype.trimend)
    fn trim_end(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        let text = s.to_string_lossy(agent);
        let trimmed = text
            .trim_end_matches(
                crate::ecmascript::types::language::bigint::is_trimmable_whitespace,
            )
            .to_string();
        Ok(Value::from_string(agent, trimmed))
    }

    /// ### [22.1.3.35 String.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-string.prototype.valueof)
    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_string_value(agent, this_value).map(Value::String)
    }

    /// ### [22.1.3.36 String.prototype \[ %Symbol.iterator% \] ( )](https://tc39.es/ecma262/#sec-string.prototype-%symbol.iterator%)
    fn iterator(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let s = this_string_value(agent, this_value)?;
        Ok(BuiltinIterator::create(
            agent,
            IteratorKind::StringCodePoints,
            Value::String(s),
        )
        .into())
    }
}

/// Coerce a match/search operand into a RegExp object.
fn coerce_to_regexp(agent: &mut Agent, value: Value, flags: &str) -> JsResult<RegExp> {
    match value {
        Value::Object(Object::RegExp(regexp)) => Ok(regexp),
        _ => {
            let pattern = if value.is_undefined() {
                HeapString::from_static_str(agent, "(?:)")
            } else {
                to_string(agent, value)?
            };
            crate::ecmascript::builtins::regexp::reg_exp_create(agent, pattern, flags)
        }
    }
}

/// ### [22.1.3.19.1 GetSubstitution](https://tc39.es/ecma262/#sec-getsubstitution)
///
/// `$$`, `$&`, `` $` ``, `$'` and `$n` replacement patterns.
fn get_substitution(
    matched: &str,
    text: &str,
    position: usize,
    captures: &[Option<String>],
    replacement: &str,
) -> String {
    let mut out = String::with_capacity(replacement.len());
    let bytes = replacement.as_bytes();
    let mut index = 0usize;
    while index < bytes.len() {
        if bytes[index] == b'$' && index + 1 < bytes.len() {
            match bytes[index + 1] {
                b'$' => {
                    out.push('$');
                    index += 2;
                }
                b'&' => {
                    out.push_str(matched);
                    index += 2;
                }
                b'`' => {
                    out.push_str(&text[..position]);
                    index += 2;
                }
                b'\'' => {
                    out.push_str(&text[position + matched.len()..]);
                    index += 2;
                }
                digit @ b'0'..=b'9' => {
                    // Two-digit references take precedence when valid.
                    let mut capture_index = (digit - b'0') as usize;
                    let mut consumed = 2;
                    if index + 2 < bytes.len() && bytes[index + 2].is_ascii_digit() {
                        let two = capture_index * 10 + (bytes[index + 2] - b'0') as usize;
                        if two >= 1 && two <= captures.len() {
                            capture_index = two;
                            consumed = 3;
                        }
                    }
                    if capture_index >= 1 && capture_index <= captures.len() {
                        if let Some(capture) = &captures[capture_index - 1] {
                            out.push_str(capture);
                        }
                        index += consumed;
                    } else {
                        out.push('$');
                        index += 1;
                    }
                }
                _ => {
                    out.push('$');
                    index += 1;
                }
            }
        } else {
            let c = text_char_at(replacement, index);
            out.push(c);
            index += c.len_utf8();
        }
    }
    out
}

fn text_char_at(text: &str, index: usize) -> char {
    text[index..].chars().next().unwrap_or('\u{FFFD}')
}

fn replace_impl(
    agent: &mut Agent,
    this_value: Value,
    search_value: Value,
    replace_value: Value,
    replace_all: bool,
) -> JsResult<Value> {
    let s = this_string_value(agent, this_value)?;
    // A regexp search delegates to the matcher, honoring its global flag.
    if let Value::Object(Object::RegExp(regexp)) = search_value {
        return replace_regexp(agent, s, regexp, replace_value, replace_all);
    }
    let search = to_string(agent, search_value)?;
    let text = s.to_string_lossy(agent).into_owned();
    let search_text = search.to_string_lossy(agent).into_owned();
    let functional =
        crate::ecmascript::abstract_operations::testing_and_comparison::is_callable(
            agent,
            replace_value,
        )
        .is_some();
    let mut result = String::with_capacity(text.len());
    let mut position = 0usize;
    loop {
        let Some(found) = text[position..].find(&search_text) else {
            result.push_str(&text[position..]);
            break;
        };
        let found = position + found;
        result.push_str(&text[position..found]);
        if functional {
            let matched_value = Value::from_str(agent, &search_text);
            let position_value = Value::from(found);
            let string_value = Value::String(s);
            let replacement = call_function(
                agent,
                replace_value,
                Value::Undefined,
                &[matched_value, position_value, string_value],
            )?;
            let replacement = to_string(agent, replacement)?;
            result.push_str(&replacement.to_string_lossy(agent));
        } else {
            let replacement = to_string(agent, replace_value)?;
            let replacement_text = replacement.to_string_lossy(agent).into_owned();
            result.push_str(&get_substitution(
                &search_text,
                &text,
                found,
                &[],
                &replacement_text,
            ));
        }
        position = found + search_text.len().max(1);
        if !replace_all {
            result.push_str(&text[found + search_text.len()..]);
            break;
        }
        if search_text.is_empty() && position > text.len() {
            break;
        }
        if position >= text.len() {
            break;
        }
    }
    Ok(Value::from_string(agent, result))
}

fn replace_regexp(
    agent: &mut Agent,
    s: HeapString,
    regexp: RegExp,
    replace_value: Value,
    replace_all: bool,
) -> JsResult<Value> {
    let global = agent[regexp].flags.global || replace_all;
    let text = s.to_string_lossy(agent).into_owned();
    let functional =
        crate::ecmascript::abstract_operations::testing_and_comparison::is_callable(
            agent,
            replace_value,
        )
        .is_some();
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0usize;
    let mut search_from = 0usize;
    loop {
        let matched =
            crate::ecmascript::builtins::regexp::regexp_match_at(agent, regexp, &text, search_from, false);
        let Some(matched) = matched else { break };
        // Code-unit indexes align with byte indexes for the replacement
        // bookkeeping through re-derivation below.
        let match_start = utf16_to_byte(&text, matched.index);
        let match_end = utf16_to_byte(&text, matched.end);
        let matched_text = &text[match_start..match_end];
        result.push_str(&text[last_end..match_start]);
        if functional {
            let mut call_arguments: Vec<Value> =
                vec![Value::from_str(agent, matched_text)];
            for capture in matched.captures.iter().skip(1) {
                call_arguments.push(match capture {
                    Some(capture) => Value::from_str(agent, capture),
                    None => Value::Undefined,
                });
            }
            call_arguments.push(Value::from(matched.index));
            call_arguments.push(Value::String(s));
            let replacement =
                call_function(agent, replace_value, Value::Undefined, &call_arguments)?;
            let replacement = to_string(agent, replacement)?;
            result.push_str(&replacement.to_string_lossy(agent));
        } else {
            let replacement = to_string(agent, replace_value)?;
            let replacement_text = replacement.to_string_lossy(agent).into_owned();
            let captures: Vec<Option<String>> =
                matched.captures.iter().skip(1).cloned().collect();
            result.push_str(&get_substitution(
                matched_text,
                &text,
                match_start,
                &captures,
                &replacement_text,
            ));
        }
        last_end = match_end;
        search_from = if matched.end == matched.index {
            matched.end + 1
        } else {
            matched.end
        };
        if !global || search_from > s.utf16_len(agent) {
            break;
        }
    }
    result.push_str(&text[last_end..]);
    if global {
        agent[regexp].last_index = 0.0;
    }
    Ok(Value::from_string(agent, result))
}

fn utf16_to_byte(text: &str, utf16_index: usize) -> usize {
    let mut units = 0usize;
    for (byte_index, c) in text.char_indices() {
        if units >= utf16_index {
            return byte_index;
        }
        units += c.len_utf16();
    }
    text.len()
}

fn split_with_regexp(
    agent: &mut Agent,
    s: HeapString,
    regexp: RegExp,
    limit: u32,
) -> JsResult<Value> {
    let text = s.to_string_lossy(agent).into_owned();
    let mut parts: Vec<Value> = Vec::new();
    let mut segment_start = 0usize;
    let mut search_from = 0usize;
    let utf16_len = s.utf16_len(agent);
    while search_from <= utf16_len {
        let matched = crate::ecmascript::builtins::regexp::regexp_match_at(
            agent, regexp, &text, search_from, false,
        );
        let Some(matched) = matched else { break };
        if matched.end == matched.index {
            search_from = matched.end + 1;
            continue;
        }
        let match_start = utf16_to_byte(&text, matched.index);
        let match_end = utf16_to_byte(&text, matched.end);
        let segment = Value::from_str(agent, &text[segment_start..match_start]);
        parts.push(segment);
        if parts.len() as u32 >= limit {
            return Ok(create_array_from_list(agent, &parts).into());
        }
        // Captures participate in the split result.
        for capture in matched.captures.iter().skip(1) {
            parts.push(match capture {
                Some(capture) => Value::from_str(agent, capture),
                None => Value::Undefined,
            });
            if parts.len() as u32 >= limit {
                return Ok(create_array_from_list(agent, &parts).into());
            }
        }
        segment_start = match_end;
        search_from = matched.end;
    }
    let tail = Value::from_str(agent, &text[segment_start..]);
    parts.push(tail);
    Ok(create_array_from_list(agent, &parts).into())
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let string_prototype = intrinsics.string_prototype();
    let string_constructor = intrinsics.string();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, string_constructor)
        .with_prototype_property(string_prototype.into())
        .with_builtin_function_property::<StringFromCharCode>()
        .with_builtin_function_property::<StringFromCodePoint>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, string_prototype)
        .with_constructor_property(string_constructor)
        .with_builtin_function_property::<StringPrototypeAt>()
        .with_builtin_function_property::<StringPrototypeCharAt>()
        .with_builtin_function_property::<StringPrototypeCharCodeAt>()
        .with_builtin_function_property::<StringPrototypeCodePointAt>()
        .with_builtin_function_property::<StringPrototypeConcat>()
        .with_builtin_function_property::<StringPrototypeEndsWith>()
        .with_builtin_function_property::<StringPrototypeIncludes>()
        .with_builtin_function_property::<StringPrototypeIndexOf>()
        .with_builtin_function_property::<StringPrototypeLastIndexOf>()
        .with_builtin_function_property::<StringPrototypeLocaleCompare>()
        .with_builtin_function_property::<StringPrototypeMatch>()
        .with_builtin_function_property::<StringPrototypePadEnd>()
        .with_builtin_function_property::<StringPrototypePadStart>()
        .with_builtin_function_property::<StringPrototypeRepeat>()
        .with_builtin_function_property::<StringPrototypeReplace>()
        .with_builtin_function_property::<StringPrototypeReplaceAll>()
        .with_builtin_function_property::<StringPrototypeSearch>()
        .with_builtin_function_property::<StringPrototypeSlice>()
        .with_builtin_function_property::<StringPrototypeSplit>()
        .with_builtin_function_property::<StringPrototypeStartsWith>()
        .with_builtin_function_property::<StringPrototypeSubstring>()
        .with_builtin_function_property::<StringPrototypeToLowerCase>()
        .with_builtin_function_property::<StringPrototypeToString>()
        .with_builtin_function_property::<StringPrototypeToUpperCase>()
        .with_builtin_function_property::<StringPrototypeTrim>()
        .with_builtin_function_property::<StringPrototypeTrimEnd>()
        .with_builtin_function_property::<StringPrototypeTrimStart>()
        .with_builtin_function_property::<StringPrototypeValueOf>()
        .with_builtin_function_property::<StringPrototypeIterator>()
        .build();
}
