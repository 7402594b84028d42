// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.2 ECMAScript Function Objects](https://tc39.es/ecma262/#sec-ecmascript-function-objects)

use core::ops::{Index, IndexMut};
use core::ptr::NonNull;

use oxc_ast::ast::{FormalParameters, FunctionBody};
use oxc_span::Span;

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::function_environment::{
    new_function_environment, ThisBindingStatus,
};
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::execution_context::{ECMAScriptCode, ExecutionContext};
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::scripts_and_modules::source_code::SourceCode;
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::syntax_directed_operations::function_definitions::{
    evaluate_async_function_body, evaluate_function_body, evaluate_generator_body,
};
use crate::ecmascript::types::{
    Function, HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject,
    PropertyDescriptor, PropertyKey, Value,
};
use crate::heap::indexes::{ECMAScriptFunctionIndex, ObjectIndex};
use crate::heap::CreateHeapData;

use super::ordinary::ordinary_object_create;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ECMAScriptFunction(pub(crate) ECMAScriptFunctionIndex);

/// ### \[\[ThisMode]]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisMode {
    Lexical,
    Strict,
    Global,
}

/// ### \[\[ConstructorKind]] and \[\[IsClassConstructor]] folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorStatus {
    NonConstructor,
    ConstructorFunction,
    BaseClass,
    DerivedClass,
}

impl ConstructorStatus {
    pub fn is_constructor(self) -> bool {
        self != ConstructorStatus::NonConstructor
    }

    pub fn is_class_constructor(self) -> bool {
        matches!(
            self,
            ConstructorStatus::BaseClass | ConstructorStatus::DerivedClass
        )
    }

    pub fn is_derived_class(self) -> bool {
        self == ConstructorStatus::DerivedClass
    }
}

/// \[\[FormalParameters]] and \[\[ECMAScriptCode]] as a pointer into the
/// AST arena kept alive by \[\[SourceCode]].
#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionAstPtr {
    Function(NonNull<oxc_ast::ast::Function<'static>>),
    Arrow(NonNull<oxc_ast::ast::ArrowFunctionExpression<'static>>),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionAstRef<'ast> {
    Function(&'ast oxc_ast::ast::Function<'ast>),
    Arrow(&'ast oxc_ast::ast::ArrowFunctionExpression<'ast>),
}

impl FunctionAstPtr {
    /// # Safety
    ///
    /// The SourceCode that owns the AST allocation must still be live.
    pub(crate) unsafe fn as_ref<'ast>(self) -> FunctionAstRef<'ast> {
        match self {
            FunctionAstPtr::Function(ptr) => {
                FunctionAstRef::Function(unsafe { &*(ptr.as_ptr() as *const _) })
            }
            FunctionAstPtr::Arrow(ptr) => {
                FunctionAstRef::Arrow(unsafe { &*(ptr.as_ptr() as *const _) })
            }
        }
    }
}

impl<'ast> FunctionAstRef<'ast> {
    /// \[\[FormalParameters]]
    #[inline]
    pub(crate) fn formal_parameters(&self) -> &'ast FormalParameters<'ast> {
        match self {
            FunctionAstRef::Function(f) => f.params.as_ref(),
            FunctionAstRef::Arrow(f) => f.params.as_ref(),
        }
    }

    /// \[\[ECMAScriptCode]]
    #[inline]
    pub(crate) fn ecmascript_code(&self) -> &'ast FunctionBody<'ast> {
        match self {
            FunctionAstRef::Function(f) => f.body.as_ref().unwrap(),
            FunctionAstRef::Arrow(f) => f.body.as_ref(),
        }
    }

    /// Whether the body is an arrow function expression body.
    #[inline]
    pub(crate) fn is_concise_body(&self) -> bool {
        match self {
            FunctionAstRef::Arrow(f) => f.expression,
            FunctionAstRef::Function(_) => false,
        }
    }
}

#[derive(Debug)]
pub struct ECMAScriptFunctionHeapData {
    pub(crate) object_index: Option<ObjectIndex>,

    /// \[\[Environment]]
    pub(crate) environment: EnvironmentIndex,

    /// \[\[FormalParameters]] and \[\[ECMAScriptCode]]; None for the
    /// synthesized default class constructor.
    pub(crate) ast: Option<FunctionAstPtr>,

    /// \[\[ConstructorKind]] / \[\[IsClassConstructor]]
    pub(crate) constructor_status: ConstructorStatus,

    /// \[\[Realm]]
    pub(crate) realm: RealmIdentifier,

    /// \[\[ScriptOrModule]]
    pub(crate) script_or_module: Option<ScriptOrModule>,

    /// \[\[ThisMode]]
    pub(crate) this_mode: ThisMode,

    /// \[\[Strict]]
    pub(crate) strict: bool,

    /// \[\[HomeObject]]
    pub(crate) home_object: Option<Object>,

    /// \[\[SourceText]]
    pub(crate) source_text: Span,

    /// \[\[SourceCode]]: keeps the AST arena alive.
    pub(crate) source_code: SourceCode,

    /// Whether the function is async and/or a generator.
    pub(crate) is_async: bool,
    pub(crate) is_generator: bool,

    /// \[\[Fields]]: class field initializers run at construction.
    pub(crate) fields: Box<[NonNull<oxc_ast::ast::PropertyDefinition<'static>>]>,

    pub(crate) name: Option<HeapString>,
}

impl Index<ECMAScriptFunction> for Agent {
    type Output = ECMAScriptFunctionHeapData;

    fn index(&self, index: ECMAScriptFunction) -> &Self::Output {
        self.heap
            .ecmascript_functions
            .get(index.0.into_index())
            .expect("ECMAScriptFunction out of bounds")
            .as_ref()
            .expect("ECMAScriptFunction slot empty")
    }
}

impl IndexMut<ECMAScriptFunction> for Agent {
    fn index_mut(&mut self, index: ECMAScriptFunction) -> &mut Self::Output {
        self.heap
            .ecmascript_functions
            .get_mut(index.0.into_index())
            .expect("ECMAScriptFunction out of bounds")
            .as_mut()
            .expect("ECMAScriptFunction slot empty")
    }
}

impl From<ECMAScriptFunction> for Object {
    fn from(value: ECMAScriptFunction) -> Self {
        Object::ECMAScriptFunction(value)
    }
}

impl From<ECMAScriptFunction> for Value {
    fn from(value: ECMAScriptFunction) -> Self {
        Value::Object(Object::ECMAScriptFunction(value))
    }
}

impl ECMAScriptFunction {
    pub(crate) fn is_constructor(self, agent: &Agent) -> bool {
        agent[self].constructor_status.is_constructor()
    }

    /// # Safety of the returned AST reference: the function's SourceCode
    /// keeps the arena alive for as long as the function exists.
    pub(crate) fn ast<'ast>(self, agent: &Agent) -> FunctionAstRef<'ast> {
        unsafe {
            agent[self]
                .ast
                .expect("default constructors have no source body")
                .as_ref()
        }
    }

    pub(crate) fn is_default_constructor(self, agent: &Agent) -> bool {
        agent[self].ast.is_none()
    }
}

pub(crate) struct OrdinaryFunctionCreateParams<'ast> {
    pub function_prototype: Option<Object>,
    pub source_code: SourceCode,
    pub source_text: Span,
    pub ast: FunctionAstRef<'ast>,
    pub is_async: bool,
    pub is_generator: bool,
    pub lexical_this: bool,
    pub env: EnvironmentIndex,
}

/// ### [10.2.3 OrdinaryFunctionCreate ( functionPrototype, sourceText, ParameterList, Body, thisMode, env, privateEnv )](https://tc39.es/ecma262/#sec-ordinaryfunctioncreate)
pub(crate) fn ordinary_function_create(
    agent: &mut Agent,
    params: OrdinaryFunctionCreateParams,
) -> ECMAScriptFunction {
    let ast_ptr = match params.ast {
        FunctionAstRef::Function(f) => FunctionAstPtr::Function(NonNull::from(f).cast()),
        FunctionAstRef::Arrow(f) => FunctionAstPtr::Arrow(NonNull::from(f).cast()),
    };
    // 5-8. Strictness: inherited from the enclosing code or opted in by a
    //    directive prologue.
    let outer_strict = agent.is_strict_code();
    let strict = outer_strict || params.ast.ecmascript_code().has_use_strict_directive();
    // 9-11. [[ThisMode]].
    let this_mode = if params.lexical_this {
        ThisMode::Lexical
    } else if strict {
        ThisMode::Strict
    } else {
        ThisMode::Global
    };
    let script_or_module = crate::ecmascript::execution::agent::get_active_script_or_module(agent);
    let realm = agent.current_realm_id();
    let function = ECMAScriptFunction(agent.heap.create(ECMAScriptFunctionHeapData {
        object_index: None,
        environment: params.env,
        ast: Some(ast_ptr),
        constructor_status: ConstructorStatus::NonConstructor,
        realm,
        script_or_module,
        this_mode,
        strict,
        home_object: None,
        source_text: params.source_text,
        source_code: params.source_code,
        is_async: params.is_async,
        is_generator: params.is_generator,
        fields: Box::new([]),
        name: None,
    }));
    // 1. Let internalSlotsList be the internal slots listed in Table 30;
    //    the backing object carries [[Prototype]] and [[Extensible]].
    let prototype = params.function_prototype.unwrap_or_else(|| {
        agent
            .current_realm()
            .intrinsics()
            .function_prototype()
            .into()
    });
    let backing_object = OrdinaryObject::create_object(agent, Some(prototype), true);
    function.set_backing_object(agent, backing_object);
    // 13-15. Perform SetFunctionLength(F, len).
    let length = expected_argument_count(params.ast.formal_parameters());
    set_function_length(agent, function, length);
    function
}

/// ### [10.2.5 MakeConstructor ( F \[ , writablePrototype \[ , prototype \] \] )](https://tc39.es/ecma262/#sec-makeconstructor)
pub(crate) fn make_constructor(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    writable_prototype: Option<bool>,
    prototype: Option<OrdinaryObject>,
) {
    let writable_prototype = writable_prototype.unwrap_or(true);
    // 2-3. Set F.[[ConstructorKind]] to BASE.
    if !agent[function].constructor_status.is_class_constructor() {
        agent[function].constructor_status = ConstructorStatus::ConstructorFunction;
    }
    // 5. If prototype is not present, then create one with a constructor
    //    back-reference.
    let prototype = match prototype {
        Some(prototype) => prototype,
        None => {
            let object_prototype = agent.current_realm().intrinsics().object_prototype();
            let prototype = ordinary_object_create(agent, Some(object_prototype.into()));
            // b. Perform ! DefinePropertyOrThrow(prototype, "constructor", ...).
            let constructor_key = PropertyKey::from_static_str(agent, "constructor");
            prototype
                .internal_define_own_property(
                    agent,
                    constructor_key,
                    PropertyDescriptor {
                        value: Some(function.into()),
                        writable: Some(writable_prototype),
                        enumerable: Some(false),
                        configurable: Some(true),
                        ..Default::default()
                    },
                )
                .unwrap();
            prototype
        }
    };
    // 6. Perform ! DefinePropertyOrThrow(F, "prototype", ...).
    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
    let backing_object = function.get_or_create_backing_object(agent);
    backing_object
        .internal_define_own_property(
            agent,
            prototype_key,
            PropertyDescriptor {
                value: Some(prototype.into()),
                writable: Some(writable_prototype),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
}

/// ### [10.2.7 MakeMethod ( F, homeObject )](https://tc39.es/ecma262/#sec-makemethod)
pub(crate) fn make_method(agent: &mut Agent, function: ECMAScriptFunction, home_object: Object) {
    // 1. Set F.[[HomeObject]] to homeObject.
    agent[function].home_object = Some(home_object);
}

/// ### [10.2.9 SetFunctionName ( F, name \[ , prefix \] )](https://tc39.es/ecma262/#sec-setfunctionname)
pub(crate) fn set_ecmascript_function_name(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    name: HeapString,
) {
    agent[function].name = Some(name);
    let backing_object = function.get_or_create_backing_object(agent);
    let name_key = PropertyKey::from_static_str(agent, "name");
    backing_object
        .internal_define_own_property(
            agent,
            name_key,
            PropertyDescriptor {
                value: Some(name.into()),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
}

/// ### [10.2.10 SetFunctionLength ( F, length )](https://tc39.es/ecma262/#sec-setfunctionlength)
fn set_function_length(agent: &mut Agent, function: ECMAScriptFunction, length: usize) {
    let backing_object = function.get_or_create_backing_object(agent);
    let length_key = PropertyKey::from_static_str(agent, "length");
    backing_object
        .internal_define_own_property(
            agent,
            length_key,
            PropertyDescriptor {
                value: Some(Value::from(length)),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
}

/// ExpectedArgumentCount: formal parameters before the first default or
/// rest parameter.
fn expected_argument_count(params: &FormalParameters) -> usize {
    let mut count = 0;
    for param in params.items.iter() {
        if matches!(
            param.pattern.kind,
            oxc_ast::ast::BindingPatternKind::AssignmentPattern(_)
        ) {
            break;
        }
        count += 1;
    }
    count
}

impl InternalSlots for ECMAScriptFunction {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Function;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for ECMAScriptFunction {
    /// ### [10.2.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-call-thisargument-argumentslist)
    fn internal_call(
        self,
        agent: &mut Agent,
        this_argument: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        // 2. If F.[[IsClassConstructor]] is true, throw a TypeError
        //    exception.
        if agent[self].constructor_status.is_class_constructor() {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Class constructor cannot be invoked without 'new'",
            ));
        }
        // 3-4. Prepare for ordinary call and bind this.
        let callee_context = prepare_for_ordinary_call(agent, self, None)?;
        ordinary_call_bind_this(agent, self, callee_context, this_argument);
        // 6. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
        let result = evaluate_body(agent, self, arguments_list);
        // 7. Remove calleeContext from the execution context stack.
        agent.execution_context_stack.pop();
        // 8-10. Return ? result.
        result
    }

    /// ### [10.2.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-ecmascript-function-objects-construct-argumentslist-newtarget)
    fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        // 2. Let kind be F.[[ConstructorKind]].
        let is_derived = agent[self].constructor_status.is_derived_class();
        // 3. If kind is BASE, let thisArgument be
        //    ? OrdinaryCreateFromConstructor(newTarget, "%Object.prototype%").
        let this_argument = if !is_derived {
            Some(
                crate::ecmascript::abstract_operations::operations_on_objects::ordinary_create_from_constructor(
                    agent,
                    new_target,
                    ProtoIntrinsics::Object,
                )?,
            )
        } else {
            None
        };
        // 4-5. Prepare for ordinary call with newTarget.
        let callee_context = prepare_for_ordinary_call(agent, self, Some(new_target))?;
        // 6. If kind is BASE, then OrdinaryCallBindThis and initialize the
        //    instance elements.
        if let Some(this_argument) = this_argument {
            ordinary_call_bind_this(agent, self, callee_context, this_argument.into());
            let result = initialize_instance_elements(agent, this_argument.into(), self);
            if let Err(error) = result {
                agent.execution_context_stack.pop();
                return Err(error);
            }
        }
        // 7. Let constructorEnv be the LexicalEnvironment of calleeContext.
        let constructor_env = agent.current_lexical_environment();
        // 8. Let result be Completion(OrdinaryCallEvaluateBody(F, argumentsList)).
        let result = evaluate_body(agent, self, arguments_list);
        // 9. Remove calleeContext from the execution context stack.
        agent.execution_context_stack.pop();
        match result {
            Ok(value) => {
                // 10. If result is a return completion carrying an Object,
                //     return it.
                if let Value::Object(object) = value {
                    return Ok(object);
                }
                // 11. If kind is BASE, return thisArgument.
                if let Some(this_argument) = this_argument {
                    return Ok(this_argument.into());
                }
                // 12. If result.[[Value]] is not undefined, throw a
                //     TypeError exception.
                if !value.is_undefined() {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "Derived constructors may only return object or undefined",
                    ));
                }
                // 13-15. Return the this binding of the constructor env.
                let EnvironmentIndex::Function(env) = constructor_env else {
                    unreachable!()
                };
                let this_binding = env.get_this_binding(agent)?;
                let Value::Object(this_binding) = this_binding else {
                    unreachable!()
                };
                Ok(this_binding)
            }
            Err(error) => Err(error),
        }
    }
}

/// ### [10.2.1.1 PrepareForOrdinaryCall ( F, newTarget )](https://tc39.es/ecma262/#sec-prepareforordinarycall)
pub(crate) fn prepare_for_ordinary_call(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    new_target: Option<Object>,
) -> JsResult<()> {
    agent.check_recursion_depth()?;
    let data = &agent[function];
    let realm = data.realm;
    let script_or_module = data.script_or_module;
    let strict = data.strict;
    // 4. Let localEnv be NewFunctionEnvironment(F, newTarget).
    let local_env = new_function_environment(agent, function, new_target);
    // 1-9. Push the callee context with the function environment as both
    //    the lexical and variable environment.
    let callee_context = ExecutionContext {
        function: Some(Function::ECMAScriptFunction(function)),
        realm,
        script_or_module,
        ecmascript_code: Some(ECMAScriptCode {
            variable_environment: EnvironmentIndex::Function(local_env),
            lexical_environment: EnvironmentIndex::Function(local_env),
            is_strict_mode: strict,
        }),
        current_span: agent[function].source_text,
    };
    agent.execution_context_stack.push(callee_context);
    Ok(())
}

/// ### [10.2.1.2 OrdinaryCallBindThis ( F, calleeContext, thisArgument )](https://tc39.es/ecma262/#sec-ordinarycallbindthis)
pub(crate) fn ordinary_call_bind_this(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    _callee_context: (),
    this_argument: Value,
) {
    let this_mode = agent[function].this_mode;
    // 1. If thisMode is LEXICAL, return UNUSED.
    if this_mode == ThisMode::Lexical {
        return;
    }
    // 2-4. Select the this value.
    let this_value = if this_mode == ThisMode::Strict {
        // 5. If thisMode is STRICT, let thisValue be thisArgument.
        this_argument
    } else if this_argument.is_nullish() {
        // 6.a. If thisArgument is undefined or null, use the global this
        //    value.
        let global_env = agent.current_realm().global_env();
        global_env.get_this_binding(agent).into()
    } else {
        // 6.b. Let thisValue be ! ToObject(thisArgument).
        let object =
            crate::ecmascript::abstract_operations::type_conversion::to_object(agent, this_argument)
                .unwrap();
        object.into()
    };
    // 7-9. Perform localEnv.BindThisValue(thisValue).
    let EnvironmentIndex::Function(local_env) = agent.current_lexical_environment() else {
        unreachable!()
    };
    local_env.bind_this_value(agent, this_value).unwrap();
}

/// ### [10.2.1.3 OrdinaryCallEvaluateBody ( F, argumentsList )](https://tc39.es/ecma262/#sec-ordinarycallevaluatebody)
fn evaluate_body(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    if function.is_default_constructor(agent) {
        return evaluate_default_constructor_body(agent, function, arguments_list);
    }
    let data = &agent[function];
    if data.is_generator && data.is_async {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Async generator functions are not supported",
        ));
    }
    if data.is_generator {
        // GeneratorBody: return a new Generator object.
        evaluate_generator_body(agent, function, arguments_list)
    } else if data.is_async {
        // AsyncFunctionBody: return a Promise for the body's completion.
        evaluate_async_function_body(agent, function, arguments_list)
    } else {
        // FunctionBody: EvaluateFunctionBody.
        evaluate_function_body(agent, function, arguments_list)
    }
}

/// ### [7.3.33 InitializeInstanceElements ( O, constructor )](https://tc39.es/ecma262/#sec-initializeinstanceelements)
pub(crate) fn initialize_instance_elements(
    agent: &mut Agent,
    this_object: Object,
    constructor: ECMAScriptFunction,
) -> JsResult<()> {
    let fields = agent[constructor].fields.clone();
    for field in fields.iter() {
        // SAFETY: the constructor's SourceCode keeps the class AST alive.
        let field_ref: &oxc_ast::ast::PropertyDefinition =
            unsafe { &*(field.as_ptr() as *const _) };
        crate::engine::evaluator::class_evaluation::define_field(agent, this_object, field_ref)?;
    }
    Ok(())
}

/// The synthesized constructor of a class without one: the base flavour
/// does nothing, the derived flavour forwards its arguments to the super
/// constructor.
pub(crate) fn create_default_constructor(
    agent: &mut Agent,
    source_code: SourceCode,
    source_text: Span,
    function_prototype: Object,
    env: EnvironmentIndex,
) -> ECMAScriptFunction {
    let script_or_module = crate::ecmascript::execution::agent::get_active_script_or_module(agent);
    let realm = agent.current_realm_id();
    let function = ECMAScriptFunction(agent.heap.create(ECMAScriptFunctionHeapData {
        object_index: None,
        environment: env,
        ast: None,
        constructor_status: ConstructorStatus::BaseClass,
        realm,
        script_or_module,
        this_mode: ThisMode::Strict,
        strict: true,
        home_object: None,
        source_text,
        source_code,
        is_async: false,
        is_generator: false,
        fields: Box::new([]),
        name: None,
    }));
    let backing_object = OrdinaryObject::create_object(agent, Some(function_prototype), true);
    function.set_backing_object(agent, backing_object);
    function
}

fn evaluate_default_constructor_body(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<Value> {
    if !agent[function].constructor_status.is_derived_class() {
        return Ok(Value::Undefined);
    }
    // constructor(...args) { super(...args); }
    use crate::ecmascript::execution::environments::EnvironmentIndex as Env;
    let Env::Function(env) = agent.current_lexical_environment() else {
        unreachable!()
    };
    let super_constructor = function
        .get_backing_object(agent)
        .and_then(|backing_object| backing_object.internal_prototype(agent));
    let Some(super_constructor) = super_constructor else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    };
    if !super_constructor.is_constructor(agent) {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Super constructor is not a constructor",
        ));
    }
    let new_target = env
        .get_new_target(agent)
        .unwrap_or(Object::ECMAScriptFunction(function));
    let result = crate::ecmascript::abstract_operations::operations_on_objects::construct(
        agent,
        super_constructor,
        arguments_list,
        Some(new_target),
    )?;
    env.bind_this_value(agent, result.into())?;
    initialize_instance_elements(agent, result, function)?;
    Ok(Value::Undefined)
}
