// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [15 ECMAScript Language: Functions and Classes — Runtime Semantics](https://tc39.es/ecma262/#sec-ecmascript-language-functions-and-classes)

use oxc_ast::ast;

use crate::ecmascript::builtins::ecmascript_function::{
    make_constructor, ordinary_function_create, set_ecmascript_function_name, ECMAScriptFunction,
    FunctionAstRef, OrdinaryFunctionCreateParams,
};
use crate::ecmascript::builtins::generator_objects::{
    Generator, GeneratorState, SavedGeneratorContext,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::builtins::promise::Promise;
use crate::ecmascript::builtins::promise_objects::promise_abstract_operations::{
    reject_promise, resolve_promise,
};
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::scripts_and_modules::source_code::SourceCode;
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, PropertyDescriptor, PropertyKey, Value,
};
use crate::engine::evaluator::{evaluate_statements, Completion};
use crate::heap::CreateHeapData;

/// The SourceCode record backing the running execution context's code.
pub(crate) fn active_source_code(agent: &Agent) -> SourceCode {
    let script_or_module = agent
        .execution_context_stack
        .iter()
        .rev()
        .find_map(|context| context.script_or_module);
    match script_or_module {
        Some(ScriptOrModule::Script(script)) => agent[script].source_code,
        Some(ScriptOrModule::Module(module)) => agent[module].source_code,
        None => unreachable!("function instantiation without active code"),
    }
}

/// ### [15.2.4 InstantiateOrdinaryFunctionObject](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionobject)
///
/// Also covers generator and async function declarations.
pub(crate) fn instantiate_function_object(
    agent: &mut Agent,
    function: &ast::Function,
    env: EnvironmentIndex,
) -> ECMAScriptFunction {
    let source_code = active_source_code(agent);
    // 1-3. Let F be OrdinaryFunctionCreate(...).
    let f = ordinary_function_create(
        agent,
        OrdinaryFunctionCreateParams {
            function_prototype: None,
            source_code,
            source_text: function.span,
            ast: FunctionAstRef::Function(function),
            is_async: function.r#async,
            is_generator: function.generator,
            lexical_this: false,
            env,
        },
    );
    // 4. Perform SetFunctionName(F, name).
    let name = function
        .id
        .as_ref()
        .map(|id| id.name.as_str())
        .unwrap_or("default");
    let name = HeapString::from_str(agent, name);
    set_ecmascript_function_name(agent, f, name);
    if function.generator {
        // Generator functions carry a "prototype" object inheriting from
        // %GeneratorPrototype%; they are not constructors.
        let generator_prototype = agent.current_realm().intrinsics().generator_prototype();
        let prototype = ordinary_object_create(agent, Some(generator_prototype.into()));
        let backing_object = f.get_or_create_backing_object(agent);
        let prototype_key = PropertyKey::from_static_str(agent, "prototype");
        backing_object
            .internal_define_own_property(
                agent,
                prototype_key,
                PropertyDescriptor {
                    value: Some(prototype.into()),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
    } else if !function.r#async {
        // 5. Perform MakeConstructor(F).
        make_constructor(agent, f, None, None);
    }
    f
}

/// ### [15.2.5 InstantiateOrdinaryFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiateordinaryfunctionexpression)
pub(crate) fn instantiate_ordinary_function_expression(
    agent: &mut Agent,
    function: &ast::Function,
    name: Option<HeapString>,
) -> ECMAScriptFunction {
    let source_code = active_source_code(agent);
    let outer_env = agent.current_lexical_environment();
    // Named function expressions bind their own name in a dedicated
    // environment so the function can refer to itself.
    let (env, self_name) = match &function.id {
        Some(id) => {
            let name = HeapString::from_str(agent, id.name.as_str());
            let func_env = crate::ecmascript::execution::environments::declarative_environment::new_declarative_environment(
                agent,
                Some(outer_env),
            );
            agent[func_env].create_immutable_binding(name, false);
            (EnvironmentIndex::Declarative(func_env), Some(name))
        }
        None => (outer_env, None),
    };
    let f = ordinary_function_create(
        agent,
        OrdinaryFunctionCreateParams {
            function_prototype: None,
            source_code,
            source_text: function.span,
            ast: FunctionAstRef::Function(function),
            is_async: function.r#async,
            is_generator: function.generator,
            lexical_this: false,
            env,
        },
    );
    let function_name = match self_name {
        Some(name) => name,
        None => name.unwrap_or_else(|| HeapString::from_static_str(agent, "")),
    };
    set_ecmascript_function_name(agent, f, function_name);
    if function.generator {
        let generator_prototype = agent.current_realm().intrinsics().generator_prototype();
        let prototype = ordinary_object_create(agent, Some(generator_prototype.into()));
        let backing_object = f.get_or_create_backing_object(agent);
        let prototype_key = PropertyKey::from_static_str(agent, "prototype");
        backing_object
            .internal_define_own_property(
                agent,
                prototype_key,
                PropertyDescriptor {
                    value: Some(prototype.into()),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
    } else if !function.r#async {
        make_constructor(agent, f, None, None);
    }
    if let (Some(self_name), EnvironmentIndex::Declarative(func_env)) = (self_name, env) {
        agent[func_env].initialize_binding(self_name, f.into());
    }
    f
}

/// ### [15.3.4 InstantiateArrowFunctionExpression](https://tc39.es/ecma262/#sec-runtime-semantics-instantiatearrowfunctionexpression)
pub(crate) fn instantiate_arrow_function_expression(
    agent: &mut Agent,
    function: &ast::ArrowFunctionExpression,
    name: Option<HeapString>,
) -> ECMAScriptFunction {
    let source_code = active_source_code(agent);
    let env = agent.current_lexical_environment();
    let f = ordinary_function_create(
        agent,
        OrdinaryFunctionCreateParams {
            function_prototype: None,
            source_code,
            source_text: function.span,
            ast: FunctionAstRef::Arrow(function),
            is_async: function.r#async,
            is_generator: false,
            lexical_this: true,
            env,
        },
    );
    let function_name = name.unwrap_or_else(|| HeapString::from_static_str(agent, ""));
    set_ecmascript_function_name(agent, f, function_name);
    f
}

/// ### [15.2.3 Runtime Semantics: EvaluateFunctionBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluatefunctionbody)
pub(crate) fn evaluate_function_body(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject,
    //    argumentsList).
    crate::engine::evaluator::function_declaration_instantiation(
        agent,
        function,
        arguments_list,
    )?;
    let ast = function.ast(agent);
    let body = ast.ecmascript_code();
    // 2. Return ? Evaluation of FunctionStatementList.
    if ast.is_concise_body() {
        let ast::Statement::ExpressionStatement(statement) = &body.statements[0] else {
            unreachable!("concise body is a single expression statement");
        };
        return crate::engine::evaluator::expression::evaluate_expression(
            agent,
            &statement.expression,
        );
    }
    match evaluate_statements(agent, &body.statements)? {
        Completion::Return(value) => Ok(value),
        Completion::Normal(_) => Ok(Value::Undefined),
        _ => unreachable!("break or continue escaped a function body"),
    }
}

/// ### [15.5.2 Runtime Semantics: EvaluateGeneratorBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluategeneratorbody)
pub(crate) fn evaluate_generator_body(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject,
    //    argumentsList).
    crate::engine::evaluator::function_declaration_instantiation(
        agent,
        function,
        arguments_list,
    )?;
    // 2-3. Create the generator, suspended at the start of the body, with
    //    the prototype from the function's "prototype" property.
    let context = agent.running_execution_context();
    let code = context.ecmascript_code.as_ref().unwrap();
    let saved_context = SavedGeneratorContext {
        realm: context.realm,
        script_or_module: context.script_or_module,
        lexical_environment: code.lexical_environment,
        variable_environment: code.variable_environment,
        is_strict_mode: code.is_strict_mode,
    };
    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
    let prototype = crate::ecmascript::abstract_operations::operations_on_objects::get(
        agent,
        function,
        prototype_key,
    )?;
    let generator = Generator(
        agent
            .heap
            .create(crate::ecmascript::builtins::generator_objects::GeneratorHeapData {
                object_index: None,
                state: GeneratorState::SuspendedStart {
                    function,
                    context: saved_context,
                },
            }),
    );
    if let Value::Object(prototype) = prototype {
        let backing_object =
            crate::ecmascript::types::OrdinaryObject::create_object(agent, Some(prototype), true);
        generator.set_backing_object(agent, backing_object);
    }
    // 4. Return the generator.
    Ok(generator.into())
}

/// ### [15.8.4 Runtime Semantics: EvaluateAsyncFunctionBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateasyncfunctionbody)
///
/// The cooperative model: the body runs to completion within the current
/// turn, draining the microtask queue at each await; the result promise is
/// settled before control returns to the caller.
pub(crate) fn evaluate_async_function_body(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    // 1. Let promiseCapability be ! NewPromiseCapability(%Promise%).
    let promise = Promise::new_pending(agent);
    // 2. Perform FunctionDeclarationInstantiation; an abrupt completion
    //    rejects the promise.
    let instantiation = crate::engine::evaluator::function_declaration_instantiation(
        agent,
        function,
        arguments_list,
    );
    let outcome = match instantiation {
        Ok(()) => {
            let ast = function.ast(agent);
            let body = ast.ecmascript_code();
            if ast.is_concise_body() {
                let ast::Statement::ExpressionStatement(statement) = &body.statements[0] else {
                    unreachable!("concise body is a single expression statement");
                };
                crate::engine::evaluator::expression::evaluate_expression(
                    agent,
                    &statement.expression,
                )
            } else {
                evaluate_statements(agent, &body.statements).map(|completion| match completion {
                    Completion::Return(value) => value,
                    Completion::Normal(_) => Value::Undefined,
                    _ => unreachable!("break or continue escaped a function body"),
                })
            }
        }
        Err(error) => Err(error),
    };
    // 3. Settle the result promise from the body's completion.
    match outcome {
        Ok(value) => {
            agent[promise].already_resolved = true;
            resolve_promise(agent, promise, value)?;
        }
        Err(JsError::Thrown(reason)) => {
            agent[promise].already_resolved = true;
            reject_promise(agent, promise, reason);
        }
        Err(fatal) => return Err(fatal),
    }
    Ok(promise.into())
}
