// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The function union: every object kind with a `[[Call]]` internal method
//! of its own (proxies and host objects forward to one of these).

use crate::ecmascript::builtins::bound_function::BoundFunction;
use crate::ecmascript::builtins::builtin_function::BuiltinFunction;
use crate::ecmascript::builtins::ecmascript_function::ECMAScriptFunction;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::language::object::{InternalMethods, Object};
use crate::ecmascript::types::language::string::HeapString;
use crate::ecmascript::types::language::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    BoundFunction(BoundFunction),
    BuiltinFunction(BuiltinFunction),
    ECMAScriptFunction(ECMAScriptFunction),
}

impl Function {
    pub fn into_object(self) -> Object {
        match self {
            Function::BoundFunction(f) => Object::BoundFunction(f),
            Function::BuiltinFunction(f) => Object::BuiltinFunction(f),
            Function::ECMAScriptFunction(f) => Object::ECMAScriptFunction(f),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into_object())
    }

    pub(crate) fn internal_call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        self.into_object()
            .internal_call(agent, this_value, arguments_list)
    }

    pub(crate) fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        self.into_object()
            .internal_construct(agent, arguments_list, new_target)
    }

    /// The function's `name` property value, for stack traces.
    pub(crate) fn name(self, agent: &mut Agent) -> Option<HeapString> {
        match self {
            Function::BoundFunction(f) => agent[f].name,
            Function::BuiltinFunction(f) => agent[f].initial_name,
            Function::ECMAScriptFunction(f) => agent[f].name,
        }
    }
}

impl From<Function> for Object {
    fn from(value: Function) -> Self {
        value.into_object()
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        value.into_value()
    }
}

impl TryFrom<Object> for Function {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, ()> {
        value.into_function().ok_or(())
    }
}

impl TryFrom<Value> for Function {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, ()> {
        match value {
            Value::Object(object) => object.into_function().ok_or(()),
            _ => Err(()),
        }
    }
}

impl From<BuiltinFunction> for Function {
    fn from(value: BuiltinFunction) -> Self {
        Function::BuiltinFunction(value)
    }
}

impl From<ECMAScriptFunction> for Function {
    fn from(value: ECMAScriptFunction) -> Self {
        Function::ECMAScriptFunction(value)
    }
}

impl From<BoundFunction> for Function {
    fn from(value: BoundFunction) -> Self {
        Function::BoundFunction(value)
    }
}
