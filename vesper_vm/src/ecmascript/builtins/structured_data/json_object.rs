// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [25.5 The JSON Object](https://tc39.es/ecma262/#sec-json-object)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, create_data_property_or_throw, enumerable_own_properties, get,
    length_of_array_like, EnumerablePropertiesKind,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{is_array, is_callable};
use crate::ecmascript::abstract_operations::type_conversion::{
    to_integer_or_infinity, to_number, to_string,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::builtins::primitive_objects::PrimitiveObjectData;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, PropertyKey, Value};

use super::json::parse_json;

pub(crate) struct JsonObject;

struct JsonParse;
impl Builtin for JsonParse {
    const NAME: &'static str = "parse";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(JsonObject::parse);
}

struct JsonStringify;
impl Builtin for JsonStringify {
    const NAME: &'static str = "stringify";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(JsonObject::stringify);
}

impl JsonObject {
    /// ### [25.5.1 JSON.parse ( text \[ , reviver \] )](https://tc39.es/ecma262/#sec-json.parse)
    fn parse(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let jsonString be ? ToString(text).
        let text = to_string(agent, arguments.get(0))?;
        let text = text.to_string_lossy(agent).into_owned();
        // 2-8. Parse with the engine's own scanner and parser.
        let unfiltered = parse_json(agent, &text)?;
        // 9-11. A callable reviver walks the result bottom-up.
        let reviver = arguments.get(1);
        if is_callable(agent, reviver).is_some() {
            let object_prototype = agent.current_realm().intrinsics().object_prototype();
            let root = ordinary_object_create(agent, Some(object_prototype.into()));
            let empty_key = PropertyKey::from_static_str(agent, "");
            create_data_property_or_throw(agent, root, empty_key, unfiltered)?;
            return internalize_json_property(agent, root.into(), empty_key, reviver);
        }
        Ok(unfiltered)
    }

    /// ### [25.5.2 JSON.stringify ( value \[ , replacer \[ , space \] \] )](https://tc39.es/ecma262/#sec-json.stringify)
    fn stringify(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let value = arguments.get(0);
        let replacer = arguments.get(1);
        let space = arguments.get(2);

        // 3-4. A function replacer filters values; an array replacer
        //    selects the serialized keys.
        let mut state = SerializeState {
            replacer_function: None,
            property_list: None,
            indent: String::new(),
            gap: String::new(),
            stack: Vec::new(),
        };
        if is_callable(agent, replacer).is_some() {
            state.replacer_function = Some(replacer);
        } else if is_array(agent, replacer)? {
            let Value::Object(replacer) = replacer else {
                unreachable!()
            };
            let len = length_of_array_like(agent, replacer)?;
            let mut property_list: Vec<String> = Vec::new();
            for index in 0..len {
                let item = get(agent, replacer, PropertyKey::Integer(index as u32))?;
                let item = match item {
                    Value::String(s) => Some(s.to_string_lossy(agent).into_owned()),
                    Value::Number(_) | Value::Integer(_) => {
                        let s = to_string(agent, item)?;
                        Some(s.to_string_lossy(agent).into_owned())
                    }
                    Value::Object(Object::PrimitiveObject(primitive)) => {
                        match primitive.data(agent) {
                            PrimitiveObjectData::String(_)
                            | PrimitiveObjectData::Number(_)
                            | PrimitiveObjectData::Integer(_) => {
                                let s = to_string(agent, item)?;
                                Some(s.to_string_lossy(agent).into_owned())
                            }
                            _ => None,
                        }
                    }
                    _ => None,
                };
                if let Some(item) = item {
                    if !property_list.contains(&item) {
                        property_list.push(item);
                    }
                }
            }
            state.property_list = Some(property_list);
        }

        // 5-8. The gap derives from space: a count of spaces or a string
        //    prefix, capped at ten.
        let space = match space {
            Value::Object(Object::PrimitiveObject(primitive)) => match primitive.data(agent) {
                PrimitiveObjectData::Number(_) | PrimitiveObjectData::Integer(_) => {
                    Value::from_f64(to_number(agent, space)?)
                }
                PrimitiveObjectData::String(s) => Value::String(s),
                _ => space,
            },
            _ => space,
        };
        match space {
            Value::Number(_) | Value::Integer(_) => {
                let count = to_integer_or_infinity(agent, space)?.clamp(0.0, 10.0) as usize;
                state.gap = " ".repeat(count);
            }
            Value::String(s) => {
                let text = s.to_string_lossy(agent).into_owned();
                state.gap = text.chars().take(10).collect();
            }
            _ => {}
        }

        // 9-12. Serialize under a synthetic wrapper for the replacer
        //    protocol.
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let wrapper = ordinary_object_create(agent, Some(object_prototype.into()));
        let empty_key = PropertyKey::from_static_str(agent, "");
        create_data_property_or_throw(agent, wrapper, empty_key, value)?;
        let result =
            serialize_json_property(agent, &mut state, empty_key, wrapper.into())?;
        match result {
            Some(text) => Ok(Value::from_string(agent, text)),
            None => Ok(Value::Undefined),
        }
    }
}

/// ### [25.5.1.1 InternalizeJSONProperty ( holder, name, reviver )](https://tc39.es/ecma262/#sec-internalizejsonproperty)
fn internalize_json_property(
    agent: &mut Agent,
    holder: Object,
    name: PropertyKey,
    reviver: Value,
) -> JsResult<Value> {
    use crate::ecmascript::types::InternalMethods;
    let value = get(agent, holder, name)?;
    if let Value::Object(object) = value {
        if is_array(agent, value)? {
            let len = length_of_array_like(agent, object)?;
            for index in 0..len {
                let key = PropertyKey::Integer(index as u32);
                let new_element = internalize_json_property(agent, object, key, reviver)?;
                if new_element.is_undefined() {
                    object.internal_delete(agent, key)?;
                } else {
                    create_data_property_or_throw(agent, object, key, new_element)?;
                }
            }
        } else {
            let keys = enumerable_own_properties(agent, object, EnumerablePropertiesKind::Key)?;
            for key in keys {
                let key = crate::ecmascript::abstract_operations::type_conversion::to_property_key(
                    agent, key,
                )?;
                let new_element = internalize_json_property(agent, object, key, reviver)?;
                if new_element.is_undefined() {
                    object.internal_delete(agent, key)?;
                } else {
                    create_data_property_or_throw(agent, object, key, new_element)?;
                }
            }
        }
    }
    let name_value = name.into_value(agent);
    call_function(agent, reviver, holder.into(), &[name_value, value])
}

struct SerializeState {
    replacer_function: Option<Value>,
    property_list: Option<Vec<String>>,
    indent: String,
    gap: String,
    /// Cycle detection: the objects on the serialization path.
    stack: Vec<Object>,
}

/// ### [25.5.2.1 SerializeJSONProperty ( state, key, holder )](https://tc39.es/ecma262/#sec-serializejsonproperty)
fn serialize_json_property(
    agent: &mut Agent,
    state: &mut SerializeState,
    key: PropertyKey,
    holder: Object,
) -> JsResult<Option<String>> {
    let mut value = get(agent, holder, key)?;
    // 2. A toJSON method takes precedence.
    if let Value::Object(object) = value {
        let to_json_key = PropertyKey::from_static_str(agent, "toJSON");
        let to_json = get(agent, object, to_json_key)?;
        if is_callable(agent, to_json).is_some() {
            let key_value = key.into_value(agent);
            value = call_function(agent, to_json, value, &[key_value])?;
        }
    }
    // 3. The replacer function filters every value.
    if let Some(replacer) = state.replacer_function {
        let key_value = key.into_value(agent);
        value = call_function(agent, replacer, holder.into(), &[key_value, value])?;
    }
    // 4. Unwrap primitive wrapper objects.
    if let Value::Object(Object::PrimitiveObject(primitive)) = value {
        value = match primitive.data(agent) {
            PrimitiveObjectData::Number(n) => Value::from_f64(n),
            PrimitiveObjectData::Integer(i) => Value::Integer(i),
            PrimitiveObjectData::String(s) => Value::String(s),
            PrimitiveObjectData::Boolean(b) => Value::Boolean(b),
            _ => value,
        };
    }
    match value {
        Value::Null => Ok(Some("null".to_string())),
        Value::Boolean(true) => Ok(Some("true".to_string())),
        Value::Boolean(false) => Ok(Some("false".to_string())),
        Value::String(s) => {
            let text = s.to_string_lossy(agent).into_owned();
            Ok(Some(quote_json_string(&text)))
        }
        Value::Integer(i) => Ok(Some(i.to_string())),
        Value::Number(n) => {
            // 10. Non-finite numbers serialize as null.
            if n.is_finite() {
                Ok(Some(
                    crate::ecmascript::types::language::number::f64_to_js_string(n),
                ))
            } else {
                Ok(Some("null".to_string()))
            }
        }
        Value::BigInt(_) => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Do not know how to serialize a BigInt",
        )),
        Value::Object(object) if !object.is_callable(agent) => {
            if is_array(agent, value)? {
                serialize_json_array(agent, state, object).map(Some)
            } else {
                serialize_json_object(agent, state, object).map(Some)
            }
        }
        _ => Ok(None),
    }
}

/// ### [25.5.2.2 QuoteJSONString ( value )](https://tc39.es/ecma262/#sec-quotejsonstring)
fn quote_json_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// ### [25.5.2.4 SerializeJSONObject ( state, value )](https://tc39.es/ecma262/#sec-serializejsonobject)
fn serialize_json_object(
    agent: &mut Agent,
    state: &mut SerializeState,
    object: Object,
) -> JsResult<String> {
    // 1. A revisited object is a cycle.
    if state.stack.contains(&object) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Converting circular structure to JSON",
        ));
    }
    state.stack.push(object);
    let step_back = state.indent.clone();
    state.indent = format!("{}{}", state.indent, state.gap);

    let keys: Vec<PropertyKey> = match &state.property_list {
        Some(property_list) => {
            let property_list = property_list.clone();
            property_list
                .iter()
                .map(|name| PropertyKey::from_str(agent, name))
                .collect()
        }
        None => {
            let keys =
                enumerable_own_properties(agent, object, EnumerablePropertiesKind::Key)?;
            let mut property_keys = Vec::with_capacity(keys.len());
            for key in keys {
                property_keys.push(
                    crate::ecmascript::abstract_operations::type_conversion::to_property_key(
                        agent, key,
                    )?,
                );
            }
            property_keys
        }
    };

    let mut partial: Vec<String> = Vec::new();
    for key in keys {
        let serialized = serialize_json_property(agent, state, key, object)?;
        if let Some(serialized) = serialized {
            let key_text = key.as_display_string(agent);
            let separator = if state.gap.is_empty() { ":" } else { ": " };
            partial.push(format!(
                "{}{}{}",
                quote_json_string(&key_text),
                separator,
                serialized
            ));
        }
    }

    let result = wrap_braces(&partial, &state.indent, &step_back, &state.gap, '{', '}');
    state.stack.pop();
    state.indent = step_back;
    Ok(result)
}

/// ### [25.5.2.5 SerializeJSONArray ( state, value )](https://tc39.es/ecma262/#sec-serializejsonarray)
fn serialize_json_array(
    agent: &mut Agent,
    state: &mut SerializeState,
    object: Object,
) -> JsResult<String> {
    if state.stack.contains(&object) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Converting circular structure to JSON",
        ));
    }
    state.stack.push(object);
    let step_back = state.indent.clone();
    state.indent = format!("{}{}", state.indent, state.gap);

    let len = length_of_array_like(agent, object)?;
    let mut partial: Vec<String> = Vec::new();
    for index in 0..len {
        let key = PropertyKey::Integer(index as u32);
        let serialized = serialize_json_property(agent, state, key, object)?;
        // Holes and unserializable entries become null.
        partial.push(serialized.unwrap_or_else(|| "null".to_string()));
    }

    let result = wrap_braces(&partial, &state.indent, &step_back, &state.gap, '[', ']');
    state.stack.pop();
    state.indent = step_back;
    Ok(result)
}

fn wrap_braces(
    partial: &[String],
    indent: &str,
    step_back: &str,
    gap: &str,
    open: char,
    close: char,
) -> String {
    if partial.is_empty() {
        return format!("{open}{close}");
    }
    if gap.is_empty() {
        format!("{open}{}{close}", partial.join(","))
    } else {
        format!(
            "{open}\n{indent}{}\n{step_back}{close}",
            partial.join(&format!(",\n{indent}"))
        )
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let json = agent.get_realm(realm).intrinsics().json();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, json)
        .with_builtin_function_property::<JsonParse>()
        .with_builtin_function_property::<JsonStringify>()
        .with_to_string_tag("JSON")
        .build();
}
