// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.1 Array Objects](https://tc39.es/ecma262/#sec-array-objects)

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, create_data_property_or_throw, delete_property_or_throw, get, has_property,
    length_of_array_like, set,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    is_array, is_callable, is_strictly_equal, same_value_zero,
};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_boolean, to_integer_or_infinity, to_object, to_string,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::{array_create, create_array_from_list};
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::iterator_objects::{BuiltinIterator, IteratorKind};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct ArrayConstructor;

impl Builtin for ArrayConstructor {
    const NAME: &'static str = "Array";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(ArrayConstructor::construct);
}

struct ArrayFrom;
impl Builtin for ArrayFrom {
    const NAME: &'static str = "from";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::from);
}

struct ArrayIsArray;
impl Builtin for ArrayIsArray {
    const NAME: &'static str = "isArray";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::is_array_method);
}

struct ArrayOf;
impl Builtin for ArrayOf {
    const NAME: &'static str = "of";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayConstructor::of);
}

impl ArrayConstructor {
    /// ### [23.1.1.1 Array ( ...values )](https://tc39.es/ecma262/#sec-array)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 2-4. A single numeric argument is a length, anything else is an
        //    element list.
        if arguments.len() == 1 {
            if let Some(len) = arguments.get(0).as_f64() {
                let int_len = len as u32;
                if int_len as f64 != len {
                    return Err(agent
                        .throw_exception(ExceptionType::RangeError, "Invalid array length"));
                }
                return Ok(array_create(agent, int_len as usize, None)?.into());
            }
        }
        Ok(create_array_from_list(agent, &arguments).into())
    }

    /// ### [23.1.2.1 Array.from ( items \[ , mapper \[ , thisArg \] \] )](https://tc39.es/ecma262/#sec-array.from)
    fn from(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let items = arguments.get(0);
        let mapper = arguments.get(1);
        let this_arg = arguments.get(2);
        let use_mapper = if mapper.is_undefined() {
            false
        } else if is_callable(agent, mapper).is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "The mapper function is not callable",
            ));
        } else {
            true
        };
        // Iterables iterate; array-likes read by index.
        let values = if items.is_object()
            || matches!(items, Value::String(_))
        {
            match iterable_to_list(agent, items) {
                Ok(values) => values,
                Err(_) => {
                    let object = to_object(agent, items)?;
                    let len = length_of_array_like(agent, object)?;
                    let mut values = Vec::with_capacity(len as usize);
                    for index in 0..len {
                        values.push(get(agent, object, PropertyKey::Integer(index as u32))?);
                    }
                    values
                }
            }
        } else {
            let object = to_object(agent, items)?;
            let len = length_of_array_like(agent, object)?;
            let mut values = Vec::with_capacity(len as usize);
            for index in 0..len {
                values.push(get(agent, object, PropertyKey::Integer(index as u32))?);
            }
            values
        };
        let mut mapped = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            if use_mapper {
                let index_value = Value::from(index);
                mapped.push(call_function(
                    agent,
                    mapper,
                    this_arg,
                    &[value, index_value],
                )?);
            } else {
                mapped.push(value);
            }
        }
        Ok(create_array_from_list(agent, &mapped).into())
    }

    /// ### [23.1.2.2 Array.isArray ( arg )](https://tc39.es/ecma262/#sec-array.isarray)
    fn is_array_method(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        Ok(Value::Boolean(is_array(agent, arguments.get(0))?))
    }

    /// ### [23.1.2.3 Array.of ( ...items )](https://tc39.es/ecma262/#sec-array.of)
    fn of(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(create_array_from_list(agent, &arguments).into())
    }
}

pub(crate) struct ArrayPrototype;

macro_rules! array_method {
    ($marker: ident, $name: literal, $length: literal, $method: ident) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = $length;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::$method);
        }
    };
}

array_method!(ArrayPrototypeAt, "at", 1, at);
array_method!(ArrayPrototypeConcat, "concat", 1, concat);
array_method!(ArrayPrototypeEntries, "entries", 0, entries);
array_method!(ArrayPrototypeEvery, "every", 1, every);
array_method!(ArrayPrototypeFill, "fill", 1, fill);
array_method!(ArrayPrototypeFilter, "filter", 1, filter);
array_method!(ArrayPrototypeFind, "find", 1, find);
array_method!(ArrayPrototypeFindIndex, "findIndex", 1, find_index);
array_method!(ArrayPrototypeFlat, "flat", 0, flat);
array_method!(ArrayPrototypeFlatMap, "flatMap", 1, flat_map);
array_method!(ArrayPrototypeForEach, "forEach", 1, for_each);
array_method!(ArrayPrototypeIncludes, "includes", 1, includes);
array_method!(ArrayPrototypeIndexOf, "indexOf", 1, index_of);
array_method!(ArrayPrototypeJoin, "join", 1, join);
array_method!(ArrayPrototypeKeys, "keys", 0, keys);
array_method!(ArrayPrototypeLastIndexOf, "lastIndexOf", 1, last_index_of);
array_method!(ArrayPrototypeMap, "map", 1, map);
array_method!(ArrayPrototypePop, "pop", 0, pop);
array_method!(ArrayPrototypePush, "push", 1, push);
array_method!(ArrayPrototypeReduce, "reduce", 1, reduce);
array_method!(ArrayPrototypeReduceRight, "reduceRight", 1, reduce_right);
array_method!(ArrayPrototypeReverse, "reverse", 0, reverse);
array_method!(ArrayPrototypeShift, "shift", 0, shift);
array_method!(ArrayPrototypeSlice, "slice", 2, slice);
array_method!(ArrayPrototypeSome, "some", 1, some);
array_method!(ArrayPrototypeSort, "sort", 1, sort);
array_method!(ArrayPrototypeSplice, "splice", 2, splice);
array_method!(ArrayPrototypeToString, "toString", 0, to_string_method);
array_method!(ArrayPrototypeUnshift, "unshift", 1, unshift);
array_method!(ArrayPrototypeValues, "values", 0, values);

struct ArrayPrototypeIterator;
impl Builtin for ArrayPrototypeIterator {
    const NAME: &'static str = "[Symbol.iterator]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::Iterator);
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ArrayPrototype::values);
}

impl ArrayPrototype {
    /// ### [23.1.3.1 Array.prototype.at ( index )](https://tc39.es/ecma262/#sec-array.prototype.at)
    fn at(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let relative = to_integer_or_infinity(agent, arguments.get(0))?;
        let index = if relative < 0.0 {
            len + relative as i64
        } else {
            relative as i64
        };
        if index < 0 || index >= len {
            return Ok(Value::Undefined);
        }
        get(agent, object, PropertyKey::Integer(index as u32))
    }

    /// ### [23.1.3.2 Array.prototype.concat ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.concat)
    fn concat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let mut elements: Vec<Option<Value>> = Vec::new();
        let mut append = |agent: &mut Agent,
                          elements: &mut Vec<Option<Value>>,
                          item: Value|
         -> JsResult<()> {
            // Array arguments are spread; holes stay holes.
            if is_array(agent, item)? {
                let Value::Object(item) = item else {
                    unreachable!()
                };
                let len = length_of_array_like(agent, item)?;
                for index in 0..len {
                    let key = PropertyKey::Integer(index as u32);
                    if has_property(agent, item, key)? {
                        elements.push(Some(get(agent, item, key)?));
                    } else {
                        elements.push(None);
                    }
                }
            } else {
                elements.push(Some(item));
            }
            Ok(())
        };
        append(agent, &mut elements, object.into())?;
        for item in arguments.iter() {
            append(agent, &mut elements, *item)?;
        }
        let array = array_create(agent, 0, None)?;
        agent[array].elements = elements;
        Ok(array.into())
    }

    /// ### [23.1.3.5 Array.prototype.entries ( )](https://tc39.es/ecma262/#sec-array.prototype.entries)
    fn entries(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::ArrayEntries, object.into()).into())
    }

    /// ### [23.1.3.6 Array.prototype.every ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.every)
    fn every(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                let index_value = Value::from(index);
                let result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, index_value, object.into()],
                )?;
                if !to_boolean(agent, result) {
                    return Ok(Value::Boolean(false));
                }
            }
        }
        Ok(Value::Boolean(true))
    }

    /// ### [23.1.3.7 Array.prototype.fill ( value \[ , start \[ , end \] \] )](https://tc39.es/ecma262/#sec-array.prototype.fill)
    fn fill(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let value = arguments.get(0);
        let start = to_integer_or_infinity(agent, arguments.get(1))?;
        let from = clamp_index(start, len);
        let end = arguments.get(2);
        let to = if end.is_undefined() {
            len
        } else {
            clamp_index(to_integer_or_infinity(agent, end)?, len)
        };
        for index in from..to {
            set(agent, object, PropertyKey::Integer(index as u32), value, true)?;
        }
        Ok(object.into())
    }

    /// ### [23.1.3.8 Array.prototype.filter ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.filter)
    fn filter(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        let mut kept = Vec::new();
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                let index_value = Value::from(index);
                let selected = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, index_value, object.into()],
                )?;
                if to_boolean(agent, selected) {
                    kept.push(value);
                }
            }
        }
        Ok(create_array_from_list(agent, &kept).into())
    }

    /// ### [23.1.3.9 Array.prototype.find ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.find)
    fn find(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (_, value) = find_impl(agent, this_value, arguments)?;
        Ok(value)
    }

    /// ### [23.1.3.10 Array.prototype.findIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findindex)
    fn find_index(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let (index, _) = find_impl(agent, this_value, arguments)?;
        Ok(Value::from(index))
    }

    /// ### [23.1.3.13 Array.prototype.flat ( \[ depth \] )](https://tc39.es/ecma262/#sec-array.prototype.flat)
    fn flat(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let depth = arguments.get(0);
        let depth = if depth.is_undefined() {
            1.0
        } else {
            to_integer_or_infinity(agent, depth)?
        };
        let mut out = Vec::new();
        flatten_into(agent, object, depth, &mut out, None, Value::Undefined)?;
        Ok(create_array_from_list(agent, &out).into())
    }

    /// ### [23.1.3.14 Array.prototype.flatMap ( mapper \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.flatmap)
    fn flat_map(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let mapper = arguments.get(0);
        if is_callable(agent, mapper).is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "The mapper function is not callable",
            ));
        }
        let mut out = Vec::new();
        flatten_into(agent, object, 1.0, &mut out, Some(mapper), arguments.get(1))?;
        Ok(create_array_from_list(agent, &out).into())
    }

    /// ### [23.1.3.15 Array.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.foreach)
    fn for_each(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                let index_value = Value::from(index);
                call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, index_value, object.into()],
                )?;
            }
        }
        Ok(Value::Undefined)
    }

    /// ### [23.1.3.16 Array.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.includes)
    fn includes(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let search = arguments.get(0);
        let from = clamp_index(to_integer_or_infinity(agent, arguments.get(1))?, len);
        for index in from..len {
            let value = get(agent, object, PropertyKey::Integer(index as u32))?;
            if same_value_zero(agent, value, search) {
                return Ok(Value::Boolean(true));
            }
        }
        Ok(Value::Boolean(false))
    }

    /// ### [23.1.3.17 Array.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.indexof)
    fn index_of(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let search = arguments.get(0);
        let from = clamp_index(to_integer_or_infinity(agent, arguments.get(1))?, len);
        for index in from..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                if is_strictly_equal(agent, value, search) {
                    return Ok(Value::from(index));
                }
            }
        }
        Ok(Value::from(-1))
    }

    /// ### [23.1.3.18 Array.prototype.join ( separator )](https://tc39.es/ecma262/#sec-array.prototype.join)
    fn join(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let separator = arguments.get(0);
        let separator = if separator.is_undefined() {
            ",".to_string()
        } else {
            let separator = to_string(agent, separator)?;
            separator.to_string_lossy(agent).into_owned()
        };
        let mut out = String::new();
        for index in 0..len {
            if index > 0 {
                out.push_str(&separator);
            }
            let value = get(agent, object, PropertyKey::Integer(index as u32))?;
            if !value.is_nullish() {
                let text = to_string(agent, value)?;
                out.push_str(&text.to_string_lossy(agent));
            }
        }
        Ok(Value::from_string(agent, out))
    }

    /// ### [23.1.3.19 Array.prototype.keys ( )](https://tc39.es/ecma262/#sec-array.prototype.keys)
    fn keys(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::ArrayKeys, object.into()).into())
    }

    /// ### [23.1.3.20 Array.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.lastindexof)
    fn last_index_of(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let search = arguments.get(0);
        for index in (0..len).rev() {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                if is_strictly_equal(agent, value, search) {
                    return Ok(Value::from(index));
                }
            }
        }
        Ok(Value::from(-1))
    }

    /// ### [23.1.3.21 Array.prototype.map ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.map)
    fn map(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let callback = arguments.get(0);
        if is_callable(agent, callback).is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "The map callback is not callable",
            ));
        }
        let this_arg = arguments.get(1);
        let array = array_create(agent, len as usize, None)?;
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                let index_value = Value::from(index);
                let mapped = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, index_value, object.into()],
                )?;
                agent[array].elements[index as usize] = Some(mapped);
            }
        }
        Ok(array.into())
    }

    /// ### [23.1.3.22 Array.prototype.pop ( )](https://tc39.es/ecma262/#sec-array.prototype.pop)
    fn pop(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // The dense-array fast path operates on the element vector.
        if let Value::Object(Object::Array(array)) = this_value {
            let data = &mut agent[array];
            return Ok(match data.elements.pop() {
                Some(Some(value)) => value,
                _ => Value::Undefined,
            });
        }
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        if len == 0 {
            let length_key = PropertyKey::from_static_str(agent, "length");
            set(agent, object, length_key, Value::from(0), true)?;
            return Ok(Value::Undefined);
        }
        let key = PropertyKey::Integer((len - 1) as u32);
        let element = get(agent, object, key)?;
        delete_property_or_throw(agent, object, key)?;
        let length_key = PropertyKey::from_static_str(agent, "length");
        set(agent, object, length_key, Value::from(len - 1), true)?;
        Ok(element)
    }

    /// ### [23.1.3.23 Array.prototype.push ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.push)
    fn push(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        if let Value::Object(Object::Array(array)) = this_value {
            for item in arguments.iter() {
                agent[array].elements.push(Some(*item));
            }
            return Ok(Value::from(agent[array].elements.len()));
        }
        let object = to_object(agent, this_value)?;
        let mut len = length_of_array_like(agent, object)?;
        for item in arguments.iter() {
            set(agent, object, PropertyKey::Integer(len as u32), *item, true)?;
            len += 1;
        }
        let length_key = PropertyKey::from_static_str(agent, "length");
        set(agent, object, length_key, Value::from(len), true)?;
        Ok(Value::from(len))
    }

    /// ### [23.1.3.24 Array.prototype.reduce ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduce)
    fn reduce(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        reduce_impl(agent, this_value, arguments, false)
    }

    /// ### [23.1.3.25 Array.prototype.reduceRight ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduceright)
    fn reduce_right(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        reduce_impl(agent, this_value, arguments, true)
    }

    /// ### [23.1.3.26 Array.prototype.reverse ( )](https://tc39.es/ecma262/#sec-array.prototype.reverse)
    fn reverse(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        if let Value::Object(Object::Array(array)) = this_value {
            agent[array].elements.reverse();
            return Ok(this_value);
        }
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let mut lower = 0i64;
        let mut upper = len - 1;
        while lower < upper {
            let lower_key = PropertyKey::Integer(lower as u32);
            let upper_key = PropertyKey::Integer(upper as u32);
            let lower_value = get(agent, object, lower_key)?;
            let upper_value = get(agent, object, upper_key)?;
            set(agent, object, lower_key, upper_value, true)?;
            set(agent, object, upper_key, lower_value, true)?;
            lower += 1;
            upper -= 1;
        }
        Ok(object.into())
    }

    /// ### [23.1.3.27 Array.prototype.shift ( )](https://tc39.es/ecma262/#sec-array.prototype.shift)
    fn shift(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        if let Value::Object(Object::Array(array)) = this_value {
            let data = &mut agent[array];
            if data.elements.is_empty() {
                return Ok(Value::Undefined);
            }
            return Ok(data.elements.remove(0).unwrap_or(Value::Undefined));
        }
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        if len == 0 {
            return Ok(Value::Undefined);
        }
        let first = get(agent, object, PropertyKey::Integer(0))?;
        for index in 1..len {
            let from = PropertyKey::Integer(index as u32);
            let to = PropertyKey::Integer((index - 1) as u32);
            if has_property(agent, object, from)? {
                let value = get(agent, object, from)?;
                set(agent, object, to, value, true)?;
            } else {
                delete_property_or_throw(agent, object, to)?;
            }
        }
        delete_property_or_throw(agent, object, PropertyKey::Integer((len - 1) as u32))?;
        let length_key = PropertyKey::from_static_str(agent, "length");
        set(agent, object, length_key, Value::from(len - 1), true)?;
        Ok(first)
    }

    /// ### [23.1.3.28 Array.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-array.prototype.slice)
    fn slice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let from = clamp_index(start, len);
        let end = arguments.get(1);
        let to = if end.is_undefined() {
            len
        } else {
            clamp_index(to_integer_or_infinity(agent, end)?, len)
        };
        let mut out = Vec::new();
        for index in from..to {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                out.push(Some(get(agent, object, key)?));
            } else {
                out.push(None);
            }
        }
        let array = array_create(agent, 0, None)?;
        agent[array].elements = out;
        Ok(array.into())
    }

    /// ### [23.1.3.29 Array.prototype.some ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.some)
    fn some(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let callback = arguments.get(0);
        let this_arg = arguments.get(1);
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                let value = get(agent, object, key)?;
                let index_value = Value::from(index);
                let result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, index_value, object.into()],
                )?;
                if to_boolean(agent, result) {
                    return Ok(Value::Boolean(true));
                }
            }
        }
        Ok(Value::Boolean(false))
    }

    /// ### [23.1.3.30 Array.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.sort)
    ///
    /// The sort is stable; holes sort to the end and undefined just before
    /// them.
    fn sort(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let comparator = arguments.get(0);
        if !comparator.is_undefined() && is_callable(agent, comparator).is_none() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "The comparison function must be either a function or undefined",
            ));
        }
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        // Collect the present elements.
        let mut present: Vec<Value> = Vec::with_capacity(len as usize);
        let mut holes = 0i64;
        for index in 0..len {
            let key = PropertyKey::Integer(index as u32);
            if has_property(agent, object, key)? {
                present.push(get(agent, object, key)?);
            } else {
                holes += 1;
            }
        }
        // Merge sort keeps the order of equal elements.
        let sorted = merge_sort(agent, present, comparator)?;
        for (index, value) in sorted.iter().enumerate() {
            set(agent, object, PropertyKey::Integer(index as u32), *value, true)?;
        }
        for index in (len - holes)..len {
            delete_property_or_throw(agent, object, PropertyKey::Integer(index as u32))?;
        }
        Ok(object.into())
    }

    /// ### [23.1.3.31 Array.prototype.splice ( start, deleteCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.splice)
    ///
    /// Holes in the removed and shifted ranges are preserved.
    fn splice(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let start = to_integer_or_infinity(agent, arguments.get(0))?;
        let actual_start = clamp_index(start, len);
        let insert_count = arguments.len().saturating_sub(2) as i64;
        let actual_delete_count = if arguments.is_empty() {
            0
        } else if arguments.len() == 1 {
            len - actual_start
        } else {
            let delete_count = to_integer_or_infinity(agent, arguments.get(1))?;
            (delete_count.max(0.0) as i64).min(len - actual_start)
        };
        // The dense-array fast path splices the element vector directly,
        // which keeps holes intact.
        if let Value::Object(Object::Array(array)) = this_value {
            let items: Vec<Option<Value>> =
                arguments.iter().skip(2).map(|item| Some(*item)).collect();
            let removed: Vec<Option<Value>> = agent[array]
                .elements
                .splice(
                    actual_start as usize..(actual_start + actual_delete_count) as usize,
                    items,
                )
                .collect();
            let removed_array = array_create(agent, 0, None)?;
            agent[removed_array].elements = removed;
            return Ok(removed_array.into());
        }
        // Generic path over Get/Set/Delete.
        let mut removed: Vec<Option<Value>> = Vec::new();
        for offset in 0..actual_delete_count {
            let key = PropertyKey::Integer((actual_start + offset) as u32);
            if has_property(agent, object, key)? {
                removed.push(Some(get(agent, object, key)?));
            } else {
                removed.push(None);
            }
        }
        let items: Vec<Value> = arguments.iter().skip(2).copied().collect();
        let new_len = len - actual_delete_count + insert_count;
        if insert_count < actual_delete_count {
            for index in actual_start..(len - actual_delete_count) {
                let from = PropertyKey::Integer((index + actual_delete_count) as u32);
                let to = PropertyKey::Integer((index + insert_count) as u32);
                if has_property(agent, object, from)? {
                    let value = get(agent, object, from)?;
                    set(agent, object, to, value, true)?;
                } else {
                    delete_property_or_throw(agent, object, to)?;
                }
            }
            for index in (new_len..len).rev() {
                delete_property_or_throw(agent, object, PropertyKey::Integer(index as u32))?;
            }
        } else if insert_count > actual_delete_count {
            for index in (actual_start..(len - actual_delete_count)).rev() {
                let from = PropertyKey::Integer((index + actual_delete_count) as u32);
                let to = PropertyKey::Integer((index + insert_count) as u32);
                if has_property(agent, object, from)? {
                    let value = get(agent, object, from)?;
                    set(agent, object, to, value, true)?;
                } else {
                    delete_property_or_throw(agent, object, to)?;
                }
            }
        }
        for (offset, item) in items.iter().enumerate() {
            set(
                agent,
                object,
                PropertyKey::Integer((actual_start + offset as i64) as u32),
                *item,
                true,
            )?;
        }
        let length_key = PropertyKey::from_static_str(agent, "length");
        set(agent, object, length_key, Value::from(new_len), true)?;
        let removed_array = array_create(agent, 0, None)?;
        agent[removed_array].elements = removed;
        Ok(removed_array.into())
    }

    /// ### [23.1.3.36 Array.prototype.toString ( )](https://tc39.es/ecma262/#sec-array.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        let join_key = PropertyKey::from_static_str(agent, "join");
        let join = get(agent, object, join_key)?;
        if is_callable(agent, join).is_some() {
            call_function(agent, join, object.into(), &[])
        } else {
            crate::ecmascript::builtins::fundamental_objects::object_objects::object_prototype_to_string(
                agent,
                object.into(),
            )
        }
    }

    /// ### [23.1.3.38 Array.prototype.unshift ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.unshift)
    fn unshift(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        if let Value::Object(Object::Array(array)) = this_value {
            for (offset, item) in arguments.iter().enumerate() {
                agent[array].elements.insert(offset, Some(*item));
            }
            return Ok(Value::from(agent[array].elements.len()));
        }
        let object = to_object(agent, this_value)?;
        let len = length_of_array_like(agent, object)?;
        let argument_count = arguments.len() as i64;
        for index in (0..len).rev() {
            let from = PropertyKey::Integer(index as u32);
            let to = PropertyKey::Integer((index + argument_count) as u32);
            if has_property(agent, object, from)? {
                let value = get(agent, object, from)?;
                set(agent, object, to, value, true)?;
            } else {
                delete_property_or_throw(agent, object, to)?;
            }
        }
        for (offset, item) in arguments.iter().enumerate() {
            set(agent, object, PropertyKey::Integer(offset as u32), *item, true)?;
        }
        let length_key = PropertyKey::from_static_str(agent, "length");
        set(
            agent,
            object,
            length_key,
            Value::from(len + argument_count),
            true,
        )?;
        Ok(Value::from(len + argument_count))
    }

    /// ### [23.1.3.39 Array.prototype.values ( )](https://tc39.es/ecma262/#sec-array.prototype.values)
    fn values(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let object = to_object(agent, this_value)?;
        Ok(BuiltinIterator::create(agent, IteratorKind::ArrayValues, object.into()).into())
    }
}

fn clamp_index(relative: f64, len: i64) -> i64 {
    if relative < 0.0 {
        ((len as f64 + relative).max(0.0)) as i64
    } else {
        (relative as i64).min(len)
    }
}

fn find_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
) -> JsResult<(i64, Value)> {
    let object = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, object)?;
    let predicate = arguments.get(0);
    if is_callable(agent, predicate).is_none() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "The predicate is not callable",
        ));
    }
    let this_arg = arguments.get(1);
    for index in 0..len {
        let value = get(agent, object, PropertyKey::Integer(index as u32))?;
        let index_value = Value::from(index);
        let result = call_function(
            agent,
            predicate,
            this_arg,
            &[value, index_value, object.into()],
        )?;
        if to_boolean(agent, result) {
            return Ok((index, value));
        }
    }
    Ok((-1, Value::Undefined))
}

fn reduce_impl(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList,
    from_right: bool,
) -> JsResult<Value> {
    let object = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, object)?;
    let callback = arguments.get(0);
    if is_callable(agent, callback).is_none() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "The reduce callback is not callable",
        ));
    }
    let mut accumulator = None;
    if arguments.len() > 1 {
        accumulator = Some(arguments.get(1));
    }
    let indexes: Vec<i64> = if from_right {
        (0..len).rev().collect()
    } else {
        (0..len).collect()
    };
    for index in indexes {
        let key = PropertyKey::Integer(index as u32);
        if !has_property(agent, object, key)? {
            continue;
        }
        let value = get(agent, object, key)?;
        accumulator = Some(match accumulator {
            None => value,
            Some(accumulator) => {
                let index_value = Value::from(index);
                call_function(
                    agent,
                    callback,
                    Value::Undefined,
                    &[accumulator, value, index_value, object.into()],
                )?
            }
        });
    }
    match accumulator {
        Some(accumulator) => Ok(accumulator),
        None => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Reduce of empty array with no initial value",
        )),
    }
}

fn flatten_into(
    agent: &mut Agent,
    source: Object,
    depth: f64,
    out: &mut Vec<Value>,
    mapper: Option<Value>,
    this_arg: Value,
) -> JsResult<()> {
    let len = length_of_array_like(agent, source)?;
    for index in 0..len {
        let key = PropertyKey::Integer(index as u32);
        if !has_property(agent, source, key)? {
            continue;
        }
        let mut value = get(agent, source, key)?;
        if let Some(mapper) = mapper {
            let index_value = Value::from(index);
            value = call_function(
                agent,
                mapper,
                this_arg,
                &[value, index_value, source.into()],
            )?;
        }
        if depth > 0.0 && is_array(agent, value)? {
            let Value::Object(inner) = value else {
                unreachable!()
            };
            flatten_into(agent, inner, depth - 1.0, out, None, Value::Undefined)?;
        } else {
            out.push(value);
        }
    }
    Ok(())
}

/// Stable merge sort over the collected elements, calling out through
/// SortCompare.
fn merge_sort(agent: &mut Agent, items: Vec<Value>, comparator: Value) -> JsResult<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mid = items.len() / 2;
    let mut right = items;
    let left = right.drain(..mid).collect::<Vec<_>>();
    let left = merge_sort(agent, left, comparator)?;
    let right = merge_sort(agent, right, comparator)?;
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left_iter = left.into_iter().peekable();
    let mut right_iter = right.into_iter().peekable();
    while let (Some(&l), Some(&r)) = (left_iter.peek(), right_iter.peek()) {
        if sort_compare(agent, l, r, comparator)? <= 0.0 {
            merged.push(left_iter.next().unwrap());
        } else {
            merged.push(right_iter.next().unwrap());
        }
    }
    merged.extend(left_iter);
    merged.extend(right_iter);
    Ok(merged)
}

/// ### [23.1.3.30.2 CompareArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparearrayelements)
fn sort_compare(agent: &mut Agent, x: Value, y: Value, comparator: Value) -> JsResult<f64> {
    // undefined sorts last.
    if x.is_undefined() && y.is_undefined() {
        return Ok(0.0);
    }
    if x.is_undefined() {
        return Ok(1.0);
    }
    if y.is_undefined() {
        return Ok(-1.0);
    }
    if !comparator.is_undefined() {
        let result = call_function(agent, comparator, Value::Undefined, &[x, y])?;
        let result = crate::ecmascript::abstract_operations::type_conversion::to_number(
            agent, result,
        )?;
        if result.is_nan() {
            return Ok(0.0);
        }
        return Ok(result);
    }
    let x_string = to_string(agent, x)?;
    let y_string = to_string(agent, y)?;
    if x_string.lt(agent, y_string) {
        Ok(-1.0)
    } else if y_string.lt(agent, x_string) {
        Ok(1.0)
    } else {
        Ok(0.0)
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let array_prototype = intrinsics.array_prototype();
    let array_constructor = intrinsics.array();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, array_constructor)
        .with_prototype_property(array_prototype.into())
        .with_builtin_function_property::<ArrayFrom>()
        .with_builtin_function_property::<ArrayIsArray>()
        .with_builtin_function_property::<ArrayOf>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, array_prototype)
        .with_constructor_property(array_constructor)
        .with_builtin_function_property::<ArrayPrototypeAt>()
        .with_builtin_function_property::<ArrayPrototypeConcat>()
        .with_builtin_function_property::<ArrayPrototypeEntries>()
        .with_builtin_function_property::<ArrayPrototypeEvery>()
        .with_builtin_function_property::<ArrayPrototypeFill>()
        .with_builtin_function_property::<ArrayPrototypeFilter>()
        .with_builtin_function_property::<ArrayPrototypeFind>()
        .with_builtin_function_property::<ArrayPrototypeFindIndex>()
        .with_builtin_function_property::<ArrayPrototypeFlat>()
        .with_builtin_function_property::<ArrayPrototypeFlatMap>()
        .with_builtin_function_property::<ArrayPrototypeForEach>()
        .with_builtin_function_property::<ArrayPrototypeIncludes>()
        .with_builtin_function_property::<ArrayPrototypeIndexOf>()
        .with_builtin_function_property::<ArrayPrototypeJoin>()
        .with_builtin_function_property::<ArrayPrototypeKeys>()
        .with_builtin_function_property::<ArrayPrototypeLastIndexOf>()
        .with_builtin_function_property::<ArrayPrototypeMap>()
        .with_builtin_function_property::<ArrayPrototypePop>()
        .with_builtin_function_property::<ArrayPrototypePush>()
        .with_builtin_function_property::<ArrayPrototypeReduce>()
        .with_builtin_function_property::<ArrayPrototypeReduceRight>()
        .with_builtin_function_property::<ArrayPrototypeReverse>()
        .with_builtin_function_property::<ArrayPrototypeShift>()
        .with_builtin_function_property::<ArrayPrototypeSlice>()
        .with_builtin_function_property::<ArrayPrototypeSome>()
        .with_builtin_function_property::<ArrayPrototypeSort>()
        .with_builtin_function_property::<ArrayPrototypeSplice>()
        .with_builtin_function_property::<ArrayPrototypeToString>()
        .with_builtin_function_property::<ArrayPrototypeUnshift>()
        .with_builtin_function_property::<ArrayPrototypeValues>()
        .with_builtin_function_property::<ArrayPrototypeIterator>()
        .build();
}
