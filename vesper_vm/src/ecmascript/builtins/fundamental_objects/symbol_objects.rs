// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.4 Symbol Objects](https://tc39.es/ecma262/#sec-symbol-objects)

use crate::ecmascript::abstract_operations::type_conversion::to_string;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::primitive_objects::PrimitiveObjectData;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, Symbol, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct SymbolConstructor;

impl Builtin for SymbolConstructor {
    const NAME: &'static str = "Symbol";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(SymbolConstructor::construct);
}

struct SymbolFor;
impl Builtin for SymbolFor {
    const NAME: &'static str = "for";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::r#for);
}

struct SymbolKeyFor;
impl Builtin for SymbolKeyFor {
    const NAME: &'static str = "keyFor";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolConstructor::key_for);
}

impl SymbolConstructor {
    /// ### [20.4.1.1 Symbol ( \[ description \] )](https://tc39.es/ecma262/#sec-symbol-description)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is not undefined, throw a TypeError exception.
        if new_target.is_some() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Symbol is not a constructor",
            ));
        }
        // 2-3. Let descString be undefined or ? ToString(description).
        let description = arguments.get(0);
        let description = if description.is_undefined() {
            None
        } else {
            Some(to_string(agent, description)?)
        };
        // 4. Return a new Symbol whose [[Description]] is descString.
        Ok(Value::Symbol(Symbol::new(agent, description)))
    }

    /// ### [20.4.2.2 Symbol.for ( key )](https://tc39.es/ecma262/#sec-symbol.for)
    fn r#for(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let stringKey be ? ToString(key).
        let string_key = to_string(agent, arguments.get(0))?;
        // 2-3. A registry hit returns the registered symbol.
        if let Some(symbol) = agent.global_symbol_registry.get(&string_key) {
            return Ok(Value::Symbol(*symbol));
        }
        // 4-6. Mint and register a new one.
        let symbol = Symbol::new(agent, Some(string_key));
        agent.global_symbol_registry.insert(string_key, symbol);
        Ok(Value::Symbol(symbol))
    }

    /// ### [20.4.2.6 Symbol.keyFor ( sym )](https://tc39.es/ecma262/#sec-symbol.keyfor)
    fn key_for(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Symbol(symbol) = arguments.get(0) else {
            return Err(
                agent.throw_exception(ExceptionType::TypeError, "Not a Symbol value")
            );
        };
        let registered = agent
            .global_symbol_registry
            .iter()
            .find(|(_, registered)| **registered == symbol)
            .map(|(key, _)| *key);
        Ok(registered.map_or(Value::Undefined, Value::String))
    }
}

pub(crate) struct SymbolPrototype;

struct SymbolPrototypeToString;
impl Builtin for SymbolPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::to_string_method);
}

struct SymbolPrototypeValueOf;
impl Builtin for SymbolPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::value_of);
}

struct SymbolPrototypeGetDescription;
impl Builtin for SymbolPrototypeGetDescription {
    const NAME: &'static str = "description";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(SymbolPrototype::get_description);
}

/// ### [20.4.3.3.1 ThisSymbolValue ( value )](https://tc39.es/ecma262/#sec-thissymbolvalue)
fn this_symbol_value(agent: &mut Agent, value: Value) -> JsResult<Symbol> {
    if let Value::Symbol(symbol) = value {
        return Ok(symbol);
    }
    if let Value::Object(Object::PrimitiveObject(object)) = value {
        if let PrimitiveObjectData::Symbol(symbol) = object.data(agent) {
            return Ok(symbol);
        }
    }
    Err(agent.throw_exception(ExceptionType::TypeError, "Not a Symbol or Symbol object"))
}

impl SymbolPrototype {
    fn to_string_method(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let symbol = this_symbol_value(agent, this_value)?;
        Ok(Value::String(symbol.descriptive_string(agent)))
    }

    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        this_symbol_value(agent, this_value).map(Value::Symbol)
    }

    fn get_description(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let symbol = this_symbol_value(agent, this_value)?;
        Ok(symbol
            .description(agent)
            .map_or(Value::Undefined, Value::String))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let symbol_prototype = intrinsics.symbol_prototype();
    let symbol_constructor = intrinsics.symbol();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, symbol_constructor)
        .with_prototype_property(symbol_prototype.into())
        .with_builtin_function_property::<SymbolFor>()
        .with_builtin_function_property::<SymbolKeyFor>()
        .with_frozen_property("asyncIterator", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::AsyncIterator)))
        .with_frozen_property("hasInstance", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::HasInstance)))
        .with_frozen_property("isConcatSpreadable", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::IsConcatSpreadable)))
        .with_frozen_property("iterator", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Iterator)))
        .with_frozen_property("match", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Match)))
        .with_frozen_property("matchAll", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::MatchAll)))
        .with_frozen_property("replace", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Replace)))
        .with_frozen_property("search", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Search)))
        .with_frozen_property("species", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Species)))
        .with_frozen_property("split", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Split)))
        .with_frozen_property("toPrimitive", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::ToPrimitive)))
        .with_frozen_property("toStringTag", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::ToStringTag)))
        .with_frozen_property("unscopables", Value::Symbol(Symbol::from(WellKnownSymbolIndexes::Unscopables)))
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, symbol_prototype)
        .with_constructor_property(symbol_constructor)
        .with_builtin_function_property::<SymbolPrototypeToString>()
        .with_builtin_function_property::<SymbolPrototypeValueOf>()
        .with_builtin_getter_property::<SymbolPrototypeGetDescription>()
        .with_to_string_tag("Symbol")
        .build();
}
