// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.5 The Reference Record Specification Type](https://tc39.es/ecma262/#sec-reference-record-specification-type)
//!
//! The Reference Record type is used to explain the behaviour of such
//! operators as delete, typeof, the assignment operators, the super keyword
//! and other language features. For example, the left-hand operand of an
//! assignment is expected to produce a Reference Record.

use crate::ecmascript::abstract_operations::operations_on_objects::{call_function, set};
use crate::ecmascript::abstract_operations::type_conversion::to_object;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::object::{InternalMethods, PropertyKey};
use crate::ecmascript::types::language::string::HeapString;
use crate::ecmascript::types::language::value::Value;

/// ### \[\[Base]]
#[derive(Debug, Clone, Copy)]
pub enum Base {
    /// The value which holds the binding.
    Value(Value),
    /// The Environment Record which holds the binding.
    Environment(EnvironmentIndex),
    /// An unresolvable identifier reference.
    Unresolvable,
}

#[derive(Debug, Clone, Copy)]
pub struct Reference {
    /// ### \[\[Base]]
    pub base: Base,

    /// ### \[\[ReferencedName]]
    pub referenced_name: PropertyKey,

    /// ### \[\[Strict]]
    pub strict: bool,

    /// ### \[\[ThisValue]]
    ///
    /// Only present for super references.
    pub this_value: Option<Value>,
}

impl Reference {
    /// ### [6.2.5.1 IsPropertyReference ( V )](https://tc39.es/ecma262/#sec-ispropertyreference)
    pub(crate) fn is_property_reference(&self) -> bool {
        matches!(self.base, Base::Value(_))
    }

    /// ### [6.2.5.2 IsUnresolvableReference ( V )](https://tc39.es/ecma262/#sec-isunresolvablereference)
    pub(crate) fn is_unresolvable_reference(&self) -> bool {
        matches!(self.base, Base::Unresolvable)
    }

    /// ### [6.2.5.3 IsSuperReference ( V )](https://tc39.es/ecma262/#sec-issuperreference)
    pub(crate) fn is_super_reference(&self) -> bool {
        self.this_value.is_some()
    }

    /// ### [6.2.5.7 GetThisValue ( V )](https://tc39.es/ecma262/#sec-getthisvalue)
    pub(crate) fn get_this_value(&self) -> Value {
        // 1. Assert: IsPropertyReference(V) is true.
        debug_assert!(self.is_property_reference());
        // 2. If IsSuperReference(V) is true, return V.[[ThisValue]];
        //    otherwise return V.[[Base]].
        self.this_value.unwrap_or(match self.base {
            Base::Value(value) => value,
            _ => unreachable!(),
        })
    }

    fn name_for_diagnostic(&self, agent: &mut Agent) -> String {
        self.referenced_name.as_display_string(agent)
    }
}

/// ### [6.2.5.5 GetValue ( V )](https://tc39.es/ecma262/#sec-getvalue)
pub(crate) fn get_value(agent: &mut Agent, reference: &Reference) -> JsResult<Value> {
    match reference.base {
        // 2. If IsUnresolvableReference(V) is true, throw a ReferenceError
        //    exception.
        Base::Unresolvable => {
            let name = reference.referenced_name.as_display_string(agent);
            Err(agent.throw_exception(
                ExceptionType::ReferenceError,
                &format!("{name} is not defined"),
            ))
        }
        // 3. If IsPropertyReference(V) is true, then
        Base::Value(base) => {
            // a. Let baseObj be ? ToObject(V.[[Base]]).
            // NOTE: primitive bases read through the wrapper prototype
            // without allocating when possible.
            let base_obj = to_object(agent, base)?;
            // c. Return ? baseObj.[[Get]](V.[[ReferencedName]], GetThisValue(V)).
            let this_value = reference.get_this_value();
            base_obj.internal_get(agent, reference.referenced_name, this_value)
        }
        // 4. Else,
        Base::Environment(env) => {
            // a. Assert: base is an Environment Record.
            // b. Return ? base.GetBindingValue(V.[[ReferencedName]], V.[[Strict]]).
            let name = referenced_name_string(agent, reference);
            env.get_binding_value(agent, name, reference.strict)
        }
    }
}

/// ### [6.2.5.6 PutValue ( V, W )](https://tc39.es/ecma262/#sec-putvalue)
pub(crate) fn put_value(agent: &mut Agent, reference: &Reference, value: Value) -> JsResult<()> {
    match reference.base {
        // 2. If IsUnresolvableReference(V) is true, then
        Base::Unresolvable => {
            // a. If V.[[Strict]] is true, throw a ReferenceError exception.
            if reference.strict {
                let name = reference.name_for_diagnostic(agent);
                return Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    &format!("{name} is not defined"),
                ));
            }
            // b. Let globalObj be GetGlobalObject().
            let global_obj = agent.current_global_object();
            // c. Perform ? Set(globalObj, V.[[ReferencedName]], W, false).
            set(agent, global_obj, reference.referenced_name, value, false)
        }
        // 3. If IsPropertyReference(V) is true, then
        Base::Value(base) => {
            // a. Let baseObj be ? ToObject(V.[[Base]]).
            let base_obj = to_object(agent, base)?;
            // b. Let succeeded be ? baseObj.[[Set]](V.[[ReferencedName]], W, GetThisValue(V)).
            let this_value = reference.get_this_value();
            let succeeded =
                base_obj.internal_set(agent, reference.referenced_name, value, this_value)?;
            // c. If succeeded is false and V.[[Strict]] is true, throw a
            //    TypeError exception.
            if !succeeded && reference.strict {
                let name = reference.name_for_diagnostic(agent);
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    &format!("Cannot assign to read only property '{name}'"),
                ));
            }
            Ok(())
        }
        // 4. Else,
        Base::Environment(env) => {
            // a. Return ? base.SetMutableBinding(V.[[ReferencedName]], W, V.[[Strict]]).
            let name = referenced_name_string(agent, reference);
            env.set_mutable_binding(agent, name, value, reference.strict)
        }
    }
}

/// ### [6.2.5.8 InitializeReferencedBinding ( V, W )](https://tc39.es/ecma262/#sec-initializereferencedbinding)
pub(crate) fn initialize_referenced_binding(
    agent: &mut Agent,
    reference: &Reference,
    value: Value,
) -> JsResult<()> {
    // 1. Assert: IsUnresolvableReference(V) is false.
    let Base::Environment(env) = reference.base else {
        unreachable!("InitializeReferencedBinding on a non-environment reference");
    };
    // 2. Return ? base.InitializeBinding(V.[[ReferencedName]], W).
    let name = referenced_name_string(agent, reference);
    env.initialize_binding(agent, name, value)
}

/// Invoke a reference as a call target, passing the correct `this` value.
pub(crate) fn call_reference(
    agent: &mut Agent,
    reference: &Reference,
    func: Value,
    args: &[Value],
) -> JsResult<Value> {
    let this_value = if reference.is_property_reference() {
        reference.get_this_value()
    } else {
        match reference.base {
            Base::Environment(env) => env
                .with_base_object(agent)
                .map_or(Value::Undefined, |o| o.into()),
            _ => Value::Undefined,
        }
    };
    call_function(agent, func, this_value, args)
}

fn referenced_name_string(agent: &mut Agent, reference: &Reference) -> HeapString {
    match reference.referenced_name {
        PropertyKey::String(name) => name,
        PropertyKey::Integer(index) => HeapString::from_string(agent, index.to_string()),
        PropertyKey::Symbol(_) => unreachable!("environment binding named by a symbol"),
    }
}
