// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [15.7 Class Definitions](https://tc39.es/ecma262/#sec-class-definitions)

use core::ptr::NonNull;

use oxc_ast::ast;

use crate::ecmascript::builtins::ecmascript_function::{
    make_method, ordinary_function_create, set_ecmascript_function_name, ConstructorStatus,
    ECMAScriptFunction, FunctionAstRef, OrdinaryFunctionCreateParams,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::declarative_environment::new_declarative_environment;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::active_source_code;
use crate::ecmascript::types::language::object::data::{ElementDescriptor, PropertyEntry};
use crate::ecmascript::types::{
    Function, HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject,
    PropertyDescriptor, PropertyKey, Value,
};

use super::expression::{evaluate_expression, evaluate_property_key};

/// ### [15.7.14 Runtime Semantics: ClassDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classdefinitionevaluation)
pub(crate) fn evaluate_class(
    agent: &mut Agent,
    class: &ast::Class,
    name_hint: Option<HeapString>,
) -> JsResult<Value> {
    let outer_env = agent.current_lexical_environment();
    // 2-4. A class binds its own name in a dedicated environment.
    let class_env = new_declarative_environment(agent, Some(outer_env));
    let class_env = EnvironmentIndex::Declarative(class_env);
    let binding_name = match &class.id {
        Some(id) => {
            let name = HeapString::from_str(agent, id.name.as_str());
            let EnvironmentIndex::Declarative(env) = class_env else {
                unreachable!()
            };
            agent[env].create_immutable_binding(name, true);
            Some(name)
        }
        None => None,
    };
    agent.set_lexical_environment(class_env);

    let result = evaluate_class_body(agent, class, name_hint, binding_name, class_env);

    agent.set_lexical_environment(outer_env);
    result
}

fn evaluate_class_body(
    agent: &mut Agent,
    class: &ast::Class,
    name_hint: Option<HeapString>,
    binding_name: Option<HeapString>,
    class_env: EnvironmentIndex,
) -> JsResult<Value> {
    // 5-7. ClassHeritage: derive the prototype pair.
    let (proto_parent, constructor_parent, is_derived) = match &class.super_class {
        None => (
            Some(
                agent
                    .current_realm()
                    .intrinsics()
                    .object_prototype()
                    .into(),
            ),
            Object::from(agent.current_realm().intrinsics().function_prototype()),
            false,
        ),
        Some(super_class) => {
            let super_class = evaluate_expression(agent, super_class)?;
            match super_class {
                Value::Null => (
                    None,
                    Object::from(agent.current_realm().intrinsics().function_prototype()),
                    true,
                ),
                Value::Object(super_object) if super_object.is_constructor(agent) => {
                    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
                    let proto =
                        crate::ecmascript::abstract_operations::operations_on_objects::get(
                            agent,
                            super_object,
                            prototype_key,
                        )?;
                    let proto_parent = match proto {
                        Value::Null => None,
                        Value::Object(proto) => Some(proto),
                        _ => {
                            return Err(agent.throw_exception(
                                ExceptionType::TypeError,
                                "Class extends value does not have valid prototype property",
                            ))
                        }
                    };
                    (proto_parent, super_object, true)
                }
                _ => {
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        "Class extends value is not a constructor",
                    ))
                }
            }
        }
    };

    // 8. Let proto be OrdinaryObjectCreate(protoParent).
    let proto = ordinary_object_create(agent, proto_parent);

    // 10-12. Find the explicit constructor, if any.
    let mut constructor_method: Option<&ast::MethodDefinition> = None;
    for element in class.body.body.iter() {
        if let ast::ClassElement::MethodDefinition(method) = element {
            if method.kind == ast::MethodDefinitionKind::Constructor {
                constructor_method = Some(method);
            }
        }
    }

    let class_name = binding_name
        .or(name_hint)
        .unwrap_or_else(|| HeapString::from_static_str(agent, ""));

    // 14. Constructor creation, explicit or default.
    let source_code = active_source_code(agent);
    let constructor = match constructor_method {
        Some(method) => {
            let function = ordinary_function_create(
                agent,
                OrdinaryFunctionCreateParams {
                    function_prototype: Some(constructor_parent),
                    source_code,
                    source_text: method.value.span,
                    ast: FunctionAstRef::Function(&method.value),
                    is_async: false,
                    is_generator: false,
                    lexical_this: false,
                    env: class_env,
                },
            );
            function
        }
        None => crate::ecmascript::builtins::ecmascript_function::create_default_constructor(
            agent,
            source_code,
            class.span,
            constructor_parent,
            class_env,
        ),
    };
    // 15. Shape the constructor: kind, home object, name and prototype.
    agent[constructor].constructor_status = if is_derived {
        ConstructorStatus::DerivedClass
    } else {
        ConstructorStatus::BaseClass
    };
    agent[constructor].home_object = Some(proto.into());
    set_ecmascript_function_name(agent, constructor, class_name);
    let backing_object = constructor.get_or_create_backing_object(agent);
    let prototype_key = PropertyKey::from_static_str(agent, "prototype");
    backing_object.internal_define_own_property(
        agent,
        prototype_key,
        PropertyDescriptor {
            value: Some(proto.into()),
            writable: Some(false),
            enumerable: Some(false),
            configurable: Some(false),
            ..Default::default()
        },
    )?;
    // proto.constructor back-reference, non-enumerable.
    let constructor_key = PropertyKey::from_static_str(agent, "constructor");
    agent[proto].property_storage.set(PropertyEntry {
        key: constructor_key,
        value: Some(constructor.into()),
        descriptor: Some(ElementDescriptor::Data {
            writable: true,
            enumerable: false,
            configurable: true,
        }),
    });

    // 25. Methods and fields.
    let mut instance_fields: Vec<NonNull<ast::PropertyDefinition<'static>>> = Vec::new();
    for element in class.body.body.iter() {
        match element {
            ast::ClassElement::MethodDefinition(method) => {
                if method.kind == ast::MethodDefinitionKind::Constructor {
                    continue;
                }
                let target: Object = if method.r#static {
                    Object::ECMAScriptFunction(constructor)
                } else {
                    proto.into()
                };
                define_class_method(agent, target, method, class_env)?;
            }
            ast::ClassElement::PropertyDefinition(property) => {
                if property.r#static {
                    // Static fields evaluate now, against the constructor.
                    define_static_field(agent, constructor, property)?;
                } else {
                    // Instance fields run at construction time.
                    let pointer = NonNull::from(&**property).cast();
                    instance_fields.push(pointer);
                }
            }
            ast::ClassElement::StaticBlock(_) => {
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    "Class static initialization blocks are not supported",
                ));
            }
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    "Unsupported class element",
                ));
            }
        }
    }
    agent[constructor].fields = instance_fields.into_boxed_slice();

    // 26-28. Initialize the class binding.
    if let Some(binding_name) = binding_name {
        if let EnvironmentIndex::Declarative(env) = class_env {
            agent[env].initialize_binding(binding_name, constructor.into());
        }
    }
    Ok(constructor.into())
}

/// ### [15.7.15 BindingClassDeclarationEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-bindingclassdeclarationevaluation)
pub(crate) fn evaluate_class_declaration(agent: &mut Agent, class: &ast::Class) -> JsResult<()> {
    let value = evaluate_class(agent, class, None)?;
    bind_class_declaration(agent, class, value)
}

pub(crate) fn bind_class_declaration(
    agent: &mut Agent,
    class: &ast::Class,
    value: Value,
) -> JsResult<()> {
    let Some(id) = &class.id else {
        return Ok(());
    };
    let name = HeapString::from_str(agent, id.name.as_str());
    let env = agent.current_lexical_environment();
    env.initialize_binding(agent, name, value)
}

fn define_class_method(
    agent: &mut Agent,
    target: Object,
    method: &ast::MethodDefinition,
    class_env: EnvironmentIndex,
) -> JsResult<()> {
    let key = evaluate_property_key(agent, &method.key, method.computed)?;
    let source_code = active_source_code(agent);
    let function = ordinary_function_create(
        agent,
        OrdinaryFunctionCreateParams {
            function_prototype: None,
            source_code,
            source_text: method.value.span,
            ast: FunctionAstRef::Function(&method.value),
            is_async: method.value.r#async,
            is_generator: method.value.generator,
            lexical_this: false,
            env: class_env,
        },
    );
    make_method(agent, function, target);
    let name = {
        let prefix = match method.kind {
            ast::MethodDefinitionKind::Get => "get ",
            ast::MethodDefinitionKind::Set => "set ",
            _ => "",
        };
        let display = key.as_display_string(agent);
        HeapString::from_string(agent, format!("{prefix}{display}"))
    };
    set_ecmascript_function_name(agent, function, name);
    match method.kind {
        ast::MethodDefinitionKind::Method => {
            target.internal_define_own_property(
                agent,
                key,
                PropertyDescriptor {
                    value: Some(function.into()),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(true),
                    ..Default::default()
                },
            )?;
        }
        ast::MethodDefinitionKind::Get => {
            merge_accessor(agent, target, key, Some(function), None)?;
        }
        ast::MethodDefinitionKind::Set => {
            merge_accessor(agent, target, key, None, Some(function))?;
        }
        ast::MethodDefinitionKind::Constructor => unreachable!(),
    }
    Ok(())
}

/// Install a getter or setter, merging with an existing accessor pair.
fn merge_accessor(
    agent: &mut Agent,
    target: Object,
    key: PropertyKey,
    get: Option<ECMAScriptFunction>,
    set: Option<ECMAScriptFunction>,
) -> JsResult<()> {
    let descriptor = PropertyDescriptor {
        get: get.map(|f| Some(Function::ECMAScriptFunction(f))),
        set: set.map(|f| Some(Function::ECMAScriptFunction(f))),
        enumerable: Some(false),
        configurable: Some(true),
        ..Default::default()
    };
    target.internal_define_own_property(agent, key, descriptor)?;
    Ok(())
}

/// ### [7.3.32 DefineField ( receiver, fieldRecord )](https://tc39.es/ecma262/#sec-definefield)
pub(crate) fn define_field(
    agent: &mut Agent,
    receiver: Object,
    field: &ast::PropertyDefinition,
) -> JsResult<()> {
    let key = evaluate_property_key(agent, &field.key, field.computed)?;
    let value = match &field.value {
        Some(initializer) => {
            let name = key.as_string(agent);
            super::expression::evaluate_with_name(agent, initializer, name)?
        }
        None => Value::Undefined,
    };
    crate::ecmascript::abstract_operations::operations_on_objects::create_data_property_or_throw(
        agent, receiver, key, value,
    )
}

fn define_static_field(
    agent: &mut Agent,
    constructor: ECMAScriptFunction,
    field: &ast::PropertyDefinition,
) -> JsResult<()> {
    define_field(agent, Object::ECMAScriptFunction(constructor), field)
}

/// Getter and setter properties of object literals.
pub(crate) fn define_method_property(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    value: &ast::Expression,
    kind: ast::PropertyKind,
) -> JsResult<()> {
    let ast::Expression::FunctionExpression(function) = value else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Accessor property value must be a function",
        ));
    };
    let source_code = active_source_code(agent);
    let env = agent.current_lexical_environment();
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
    make_method(agent, f, object);
    let name = {
        let prefix = match kind {
            ast::PropertyKind::Get => "get ",
            ast::PropertyKind::Set => "set ",
            ast::PropertyKind::Init => "",
        };
        let display = key.as_display_string(agent);
        HeapString::from_string(agent, format!("{prefix}{display}"))
    };
    set_ecmascript_function_name(agent, f, name);
    match kind {
        ast::PropertyKind::Get => merge_accessor(agent, object, key, Some(f), None),
        ast::PropertyKind::Set => merge_accessor(agent, object, key, None, Some(f)),
        ast::PropertyKind::Init => {
            object.internal_define_own_property(
                agent,
                key,
                PropertyDescriptor {
                    value: Some(f.into()),
                    writable: Some(true),
                    enumerable: Some(true),
                    configurable: Some(true),
                    ..Default::default()
                },
            )?;
            Ok(())
        }
    }
}
