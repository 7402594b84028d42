// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.4 Operations on Iterator Objects](https://tc39.es/ecma262/#sec-operations-on-iterator-objects)

use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{
    InternalMethods, Object, PropertyKey, Symbol, Value,
};
use crate::heap::WellKnownSymbolIndexes;

use super::operations_on_objects::{call_function, create_data_property_or_throw, get, get_method};
use super::type_conversion::to_boolean;

/// ### [7.4.1 Iterator Records](https://tc39.es/ecma262/#sec-iterator-records)
#[derive(Debug, Clone, Copy)]
pub(crate) struct IteratorRecord {
    /// \[\[Iterator]]
    pub(crate) iterator: Object,
    /// \[\[NextMethod]]
    pub(crate) next_method: Value,
    /// \[\[Done]]
    pub(crate) done: bool,
}

/// ### [7.4.3 GetIteratorFromMethod ( obj, method )](https://tc39.es/ecma262/#sec-getiteratorfrommethod)
pub(crate) fn get_iterator_from_method(
    agent: &mut Agent,
    obj: Value,
    method: Object,
) -> JsResult<IteratorRecord> {
    // 1. Let iterator be ? Call(method, obj).
    let iterator = call_function(agent, method.into(), obj, &[])?;
    // 2. If iterator is not an Object, throw a TypeError exception.
    let Value::Object(iterator) = iterator else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "The iterator method did not return an object",
        ));
    };
    // 3. Let nextMethod be ? Get(iterator, "next").
    let next_key = PropertyKey::from_static_str(agent, "next");
    let next_method = get(agent, iterator, next_key)?;
    // 4-5. Return the Iterator Record.
    Ok(IteratorRecord {
        iterator,
        next_method,
        done: false,
    })
}

/// ### [7.4.4 GetIterator ( obj, kind )](https://tc39.es/ecma262/#sec-getiterator)
///
/// Only the sync iterator protocol is carried.
pub(crate) fn get_iterator(agent: &mut Agent, obj: Value) -> JsResult<IteratorRecord> {
    // 1. Let method be ? GetMethod(obj, %Symbol.iterator%).
    let iterator_key = PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::Iterator));
    let method = get_method(agent, obj, iterator_key)?;
    // 2. If method is undefined, throw a TypeError exception.
    let Some(method) = method else {
        let repr = obj.string_repr(agent);
        let repr = repr.to_string_lossy(agent).into_owned();
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            &format!("{repr} is not iterable"),
        ));
    };
    // 3. Return ? GetIteratorFromMethod(obj, method).
    get_iterator_from_method(agent, obj, method)
}

/// ### [7.4.6 IteratorNext ( iteratorRecord \[ , value \] )](https://tc39.es/ecma262/#sec-iteratornext)
pub(crate) fn iterator_next(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
    value: Option<Value>,
) -> JsResult<Object> {
    // 1-2. Call the next method, with the resume value when present.
    let result = match value {
        None => call_function(
            agent,
            iterator_record.next_method,
            iterator_record.iterator.into(),
            &[],
        )?,
        Some(value) => call_function(
            agent,
            iterator_record.next_method,
            iterator_record.iterator.into(),
            &[value],
        )?,
    };
    // 3. If result is not an Object, throw a TypeError exception.
    match result {
        Value::Object(result) => Ok(result),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "The iterator.next() method did not return an object",
        )),
    }
}

/// ### [7.4.7 IteratorComplete ( iteratorResult )](https://tc39.es/ecma262/#sec-iteratorcomplete)
pub(crate) fn iterator_complete(agent: &mut Agent, iterator_result: Object) -> JsResult<bool> {
    // 1. Return ToBoolean(? Get(iteratorResult, "done")).
    let done_key = PropertyKey::from_static_str(agent, "done");
    let done = get(agent, iterator_result, done_key)?;
    Ok(to_boolean(agent, done))
}

/// ### [7.4.8 IteratorValue ( iteratorResult )](https://tc39.es/ecma262/#sec-iteratorvalue)
pub(crate) fn iterator_value(agent: &mut Agent, iterator_result: Object) -> JsResult<Value> {
    // 1. Return ? Get(iteratorResult, "value").
    let value_key = PropertyKey::from_static_str(agent, "value");
    get(agent, iterator_result, value_key)
}

/// ### [7.4.9 IteratorStep ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstep)
///
/// Returns None when the iterator is exhausted.
pub(crate) fn iterator_step(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
) -> JsResult<Option<Object>> {
    // 1. Let result be ? IteratorNext(iteratorRecord).
    let result = iterator_next(agent, iterator_record, None)?;
    // 2. Let done be ? IteratorComplete(result).
    let done = iterator_complete(agent, result)?;
    // 3. If done is true, return DONE.
    if done {
        return Ok(None);
    }
    // 4. Return result.
    Ok(Some(result))
}

/// ### [7.4.11 IteratorClose ( iteratorRecord, completion )](https://tc39.es/ecma262/#sec-iteratorclose)
///
/// The completion is threaded through as a result: closing after an error
/// re-raises the original error even if `return` itself throws.
pub(crate) fn iterator_close<T>(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
    completion: JsResult<T>,
) -> JsResult<T> {
    // 1-3. Let innerResult be GetMethod(iterator, "return").
    let return_key = PropertyKey::from_static_str(agent, "return");
    let inner_result = get_method(agent, iterator_record.iterator.into(), return_key);
    let inner_result = match inner_result {
        Ok(None) => return completion,
        // b. Let innerResult be Call(return, iterator).
        Ok(Some(return_method)) => call_function(
            agent,
            return_method.into(),
            iterator_record.iterator.into(),
            &[],
        ),
        Err(error) => Err(error),
    };
    // 4. If completion is a throw completion, return ? completion.
    let value = completion?;
    // 5. If innerResult is a throw completion, return ? innerResult.
    let inner_value = inner_result?;
    // 6. If innerResult.[[Value]] is not an Object, throw a TypeError
    //    exception.
    if !inner_value.is_object() {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "The iterator.return() method did not return an object",
        ));
    }
    // 7. Return ? completion.
    Ok(value)
}

/// Close the iterator while unwinding a non-throw abrupt completion (break
/// or return): errors from `return` are surfaced.
pub(crate) fn iterator_close_normal(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
) -> JsResult<()> {
    iterator_close(agent, iterator_record, Ok(()))
}

/// Close the iterator discarding any inner error, keeping `error` as the
/// result.
pub(crate) fn iterator_close_with_error(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
    error: JsError,
) -> JsError {
    match iterator_close::<()>(agent, iterator_record, Err(error)) {
        Err(error) => error,
        Ok(()) => unreachable!(),
    }
}

/// ### [7.4.12 CreateIterResultObject ( value, done )](https://tc39.es/ecma262/#sec-createiterresultobject)
pub(crate) fn create_iter_result_object(agent: &mut Agent, value: Value, done: bool) -> Object {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let object_prototype = agent.current_realm().intrinsics().object_prototype();
    let obj = ordinary_object_create(agent, Some(object_prototype.into()));
    // 2. Perform ! CreateDataPropertyOrThrow(obj, "value", value).
    let value_key = PropertyKey::from_static_str(agent, "value");
    create_data_property_or_throw(agent, obj, value_key, value).unwrap();
    // 3. Perform ! CreateDataPropertyOrThrow(obj, "done", done).
    let done_key = PropertyKey::from_static_str(agent, "done");
    create_data_property_or_throw(agent, obj, done_key, done.into()).unwrap();
    // 4. Return obj.
    obj.into()
}

/// ### [7.4.14 IteratorToList ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratortolist)
pub(crate) fn iterator_to_list(
    agent: &mut Agent,
    iterator_record: &IteratorRecord,
) -> JsResult<Vec<Value>> {
    // 1-2. Drive the iterator to completion, collecting values.
    let mut values = Vec::new();
    while let Some(result) = iterator_step(agent, iterator_record)? {
        let value = iterator_value(agent, result)?;
        values.push(value);
    }
    // 3. Return values.
    Ok(values)
}

/// Iterate an iterable to a list; the common `new Map(iterable)` shape.
pub(crate) fn iterable_to_list(agent: &mut Agent, iterable: Value) -> JsResult<Vec<Value>> {
    let iterator_record = get_iterator(agent, iterable)?;
    iterator_to_list(agent, &iterator_record)
}
