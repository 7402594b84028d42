// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.2 Function Objects](https://tc39.es/ecma262/#sec-function-objects)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, create_list_from_array_like,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::{
    callable_function, ordinary_has_instance,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::bound_function::bound_function_create;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct FunctionConstructor;

impl Builtin for FunctionConstructor {
    const NAME: &'static str = "Function";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(FunctionConstructor::construct);
}

impl FunctionConstructor {
    /// ### [20.2.1.1 Function ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-function-p1-p2-pn-body)
    ///
    /// CreateDynamicFunction: the pieces are assembled into source text
    /// and evaluated through the global eval machinery.
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        use crate::ecmascript::abstract_operations::type_conversion::to_string;
        let mut parameters: Vec<String> = Vec::new();
        let mut body = String::new();
        for (index, argument) in arguments.iter().enumerate() {
            let text = to_string(agent, *argument)?;
            let text = text.to_string_lossy(agent).into_owned();
            if index + 1 == arguments.len() {
                body = text;
            } else {
                parameters.push(text);
            }
        }
        let source = format!(
            "(function anonymous({}\n) {{\n{}\n}})",
            parameters.join(","),
            body
        );
        crate::ecmascript::builtins::global_object::perform_eval(agent, source)
    }
}

pub(crate) struct FunctionPrototype;

struct FunctionPrototypeApply;
impl Builtin for FunctionPrototypeApply {
    const NAME: &'static str = "apply";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::apply);
}

struct FunctionPrototypeBind;
impl Builtin for FunctionPrototypeBind {
    const NAME: &'static str = "bind";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::bind);
}

struct FunctionPrototypeCall;
impl Builtin for FunctionPrototypeCall {
    const NAME: &'static str = "call";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::call);
}

struct FunctionPrototypeToString;
impl Builtin for FunctionPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::to_string_method);
}

struct FunctionPrototypeHasInstance;
impl Builtin for FunctionPrototypeHasInstance {
    const NAME: &'static str = "[Symbol.hasInstance]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::HasInstance);
    const LENGTH: u8 = 1;
    const WRITABLE: bool = false;
    const CONFIGURABLE: bool = false;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::has_instance);
}

impl FunctionPrototype {
    /// ### [20.2.3.1 Function.prototype.apply ( thisArg, argArray )](https://tc39.es/ecma262/#sec-function.prototype.apply)
    fn apply(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let this_arg = arguments.get(0);
        let arg_array = arguments.get(1);
        if arg_array.is_nullish() {
            return call_function(agent, this_value, this_arg, &[]);
        }
        let args = create_list_from_array_like(agent, arg_array)?;
        call_function(agent, this_value, this_arg, &args)
    }

    /// ### [20.2.3.2 Function.prototype.bind ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.bind)
    fn bind(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Some(target) = callable_function(agent, this_value) else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Bind must be called on a function",
            ));
        };
        let this_arg = arguments.get(0);
        let bound_args: Vec<Value> = arguments.iter().skip(1).copied().collect();
        let bound = bound_function_create(agent, target, this_arg, &bound_args)?;
        Ok(bound.into())
    }

    /// ### [20.2.3.3 Function.prototype.call ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.call)
    fn call(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let this_arg = arguments.get(0);
        let args: Vec<Value> = arguments.iter().skip(1).copied().collect();
        call_function(agent, this_value, this_arg, &args)
    }

    /// ### [20.2.3.5 Function.prototype.toString ( )](https://tc39.es/ecma262/#sec-function.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        match this_value {
            Value::Object(Object::ECMAScriptFunction(function)) => {
                // The source text slice the function was created from.
                let data = &agent[function];
                let span = data.source_text;
                let source_code = data.source_code;
                let source = source_code.source_text(agent);
                let start = (span.start as usize).min(source.len());
                let end = (span.end as usize).min(source.len());
                let text = source[start..end].to_string();
                if text.is_empty() {
                    Ok(Value::from_static_str(
                        agent,
                        "function () { [native code] }",
                    ))
                } else {
                    Ok(Value::from_string(agent, text))
                }
            }
            Value::Object(Object::BuiltinFunction(function)) => {
                let name = agent[function]
                    .initial_name
                    .map(|name| name.to_string_lossy(agent).into_owned())
                    .unwrap_or_default();
                Ok(Value::from_string(
                    agent,
                    format!("function {name}() {{ [native code] }}"),
                ))
            }
            Value::Object(Object::BoundFunction(function)) => {
                let name = agent[function]
                    .name
                    .map(|name| name.to_string_lossy(agent).into_owned())
                    .unwrap_or_default();
                Ok(Value::from_string(
                    agent,
                    format!("function {name}() {{ [native code] }}"),
                ))
            }
            _ => Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Function.prototype.toString requires that 'this' be a function",
            )),
        }
    }

    /// ### [20.2.3.6 Function.prototype \[ %Symbol.hasInstance% \] ( V )](https://tc39.es/ecma262/#sec-function.prototype-%symbol.hasinstance%)
    fn has_instance(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        Ok(Value::Boolean(ordinary_has_instance(
            agent,
            this_value,
            arguments.get(0),
        )?))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let function_prototype = intrinsics.function_prototype();
    let function_constructor = intrinsics.function();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, function_constructor)
        .with_prototype_property(function_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, function_prototype)
        .with_constructor_property(function_constructor)
        .with_builtin_function_property::<FunctionPrototypeApply>()
        .with_builtin_function_property::<FunctionPrototypeBind>()
        .with_builtin_function_property::<FunctionPrototypeCall>()
        .with_builtin_function_property::<FunctionPrototypeToString>()
        .with_builtin_function_property::<FunctionPrototypeHasInstance>()
        .build();
}
