// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)
//!
//! The full hierarchy: %Error% plus the native error constructors sharing
//! its shape, and %AggregateError%.

use crate::ecmascript::abstract_operations::operations_on_objects::{get, has_property};
use crate::ecmascript::abstract_operations::type_conversion::to_string;
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::builtins::error::{Error, ErrorHeapData};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, InternalSlots, Object, OrdinaryObject, PropertyKey, Value,
};
use crate::heap::CreateHeapData;

/// The shared constructor body: allocate an error of the given kind with
/// an optional message and a captured stack.
fn construct_error(
    agent: &mut Agent,
    kind: ExceptionType,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    // 2. Let msg be message, converted unless absent.
    let message = arguments.get(0);
    let message = if message.is_undefined() {
        None
    } else {
        Some(to_string(agent, message)?)
    };
    let stack = agent.capture_stack_trace(kind, message);
    let stack = HeapString::from_string(agent, stack);
    let error = Error(agent.heap.create(ErrorHeapData::new(
        kind,
        message,
        Some(stack),
    )));
    // 1, 3. OrdinaryCreateFromConstructor(newTarget, prototype).
    if let Some(new_target) = new_target {
        let prototype_key = PropertyKey::from_static_str(agent, "prototype");
        let prototype = get(agent, new_target, prototype_key)?;
        if let Value::Object(prototype) = prototype {
            let backing_object = OrdinaryObject::create_object(agent, Some(prototype), true);
            error.set_backing_object(agent, backing_object);
        }
    }
    // 4. Perform ? InstallErrorCause(O, options).
    let options = arguments.get(1);
    if let Value::Object(options) = options {
        let cause_key = PropertyKey::from_static_str(agent, "cause");
        if has_property(agent, options, cause_key)? {
            let cause = get(agent, options, cause_key)?;
            use crate::ecmascript::types::InternalMethods;
            error.internal_define_own_property(
                agent,
                cause_key,
                crate::ecmascript::types::PropertyDescriptor {
                    value: Some(cause),
                    writable: Some(true),
                    enumerable: Some(false),
                    configurable: Some(true),
                    ..Default::default()
                },
            )?;
        }
    }
    // 5. Return O.
    Ok(error.into())
}

macro_rules! error_constructor {
    ($constructor: ident, $name: literal, $kind: expr, $method: ident) => {
        pub(crate) struct $constructor;

        impl Builtin for $constructor {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor($constructor::$method);
        }

        impl $constructor {
            fn $method(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
                new_target: Option<Object>,
            ) -> JsResult<Value> {
                construct_error(agent, $kind, arguments, new_target)
            }
        }
    };
}

error_constructor!(ErrorConstructor, "Error", ExceptionType::Error, construct);
error_constructor!(
    EvalErrorConstructor,
    "EvalError",
    ExceptionType::EvalError,
    construct
);
error_constructor!(
    RangeErrorConstructor,
    "RangeError",
    ExceptionType::RangeError,
    construct
);
error_constructor!(
    ReferenceErrorConstructor,
    "ReferenceError",
    ExceptionType::ReferenceError,
    construct
);
error_constructor!(
    SyntaxErrorConstructor,
    "SyntaxError",
    ExceptionType::SyntaxError,
    construct
);
error_constructor!(
    TypeErrorConstructor,
    "TypeError",
    ExceptionType::TypeError,
    construct
);
error_constructor!(
    UriErrorConstructor,
    "URIError",
    ExceptionType::UriError,
    construct
);

pub(crate) struct AggregateErrorConstructor;

impl Builtin for AggregateErrorConstructor {
    const NAME: &'static str = "AggregateError";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(AggregateErrorConstructor::construct);
}

impl AggregateErrorConstructor {
    /// ### [20.5.7.1.1 AggregateError ( errors, message \[ , options \] )](https://tc39.es/ecma262/#sec-aggregate-error)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        use crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list;
        use crate::ecmascript::builtins::array::create_array_from_list;
        use crate::ecmascript::types::InternalMethods;
        let message_args = [arguments.get(1), arguments.get(2)];
        let error_value = construct_error(
            agent,
            ExceptionType::AggregateError,
            ArgumentsList(&message_args),
            new_target,
        )?;
        let Value::Object(error) = error_value else {
            unreachable!()
        };
        // 4. Let errorsList be ? IteratorToList(errors).
        let errors = iterable_to_list(agent, arguments.get(0))?;
        let errors_array = create_array_from_list(agent, &errors);
        let errors_key = PropertyKey::from_static_str(agent, "errors");
        error.internal_define_own_property(
            agent,
            errors_key,
            crate::ecmascript::types::PropertyDescriptor {
                value: Some(errors_array.into()),
                writable: Some(true),
                enumerable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
        )?;
        Ok(error_value)
    }
}

pub(crate) struct ErrorPrototype;

struct ErrorPrototypeToString;
impl Builtin for ErrorPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ErrorPrototype::to_string_method);
}

impl ErrorPrototype {
    /// ### [20.5.3.4 Error.prototype.toString ( )](https://tc39.es/ecma262/#sec-error.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1-2. The receiver must be an object.
        let Value::Object(object) = this_value else {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Error.prototype.toString requires that 'this' be an Object",
            ));
        };
        // 3-5. name defaults to "Error", message to "".
        let name_key = PropertyKey::from_static_str(agent, "name");
        let name = get(agent, object, name_key)?;
        let name = if name.is_undefined() {
            "Error".to_string()
        } else {
            let name = to_string(agent, name)?;
            name.to_string_lossy(agent).into_owned()
        };
        let message_key = PropertyKey::from_static_str(agent, "message");
        let message = get(agent, object, message_key)?;
        let message = if message.is_undefined() {
            String::new()
        } else {
            let message = to_string(agent, message)?;
            message.to_string_lossy(agent).into_owned()
        };
        // 6-8. Join with ": " when both parts are present.
        let text = if name.is_empty() {
            message
        } else if message.is_empty() {
            name
        } else {
            format!("{name}: {message}")
        };
        Ok(Value::from_string(agent, text))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let error_prototype = intrinsics.error_prototype();
    let error_constructor = intrinsics.error();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, error_constructor)
        .with_prototype_property(error_prototype.into())
        .build();

    let empty_message = Value::from_static_str(agent, "");
    let error_name = Value::from_static_str(agent, "Error");
    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, error_prototype)
        .with_constructor_property(error_constructor)
        .with_property("message", empty_message)
        .with_property("name", error_name)
        .with_builtin_function_property::<ErrorPrototypeToString>()
        .build();

    // The native error constructors and prototypes share one shape.
    macro_rules! native_error {
        ($constructor_field: ident, $prototype_field: ident, $name: literal) => {
            let intrinsics = agent.get_realm(realm).intrinsics();
            let constructor = intrinsics.$constructor_field();
            let prototype = intrinsics.$prototype_field();
            OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, constructor)
                .with_prototype_property(prototype.into())
                .build();
            let empty_message = Value::from_static_str(agent, "");
            let name_value = Value::from_static_str(agent, $name);
            OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, prototype)
                .with_constructor_property(constructor)
                .with_property("message", empty_message)
                .with_property("name", name_value)
                .build();
        };
    }

    native_error!(aggregate_error, aggregate_error_prototype, "AggregateError");
    native_error!(eval_error, eval_error_prototype, "EvalError");
    native_error!(range_error, range_error_prototype, "RangeError");
    native_error!(reference_error, reference_error_prototype, "ReferenceError");
    native_error!(syntax_error, syntax_error_prototype, "SyntaxError");
    native_error!(type_error, type_error_prototype, "TypeError");
    native_error!(uri_error, uri_error_prototype, "URIError");
}
