// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.3 Built-in Function Objects](https://tc39.es/ecma262/#sec-built-in-function-objects)

use core::ops::{Deref, Index, IndexMut};

use oxc_span::Span;

use crate::ecmascript::execution::execution_context::ExecutionContext;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::indexes::{BuiltinFunctionIndex, ObjectIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

/// The arguments of a function call; indexing past the end reads
/// `undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ArgumentsList<'_> {
    #[inline]
    pub fn get(&self, index: usize) -> Value {
        *self.0.get(index).unwrap_or(&Value::Undefined)
    }
}

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;
pub type ConstructorFn =
    fn(&mut Agent, Value, ArgumentsList<'_>, Option<Object>) -> JsResult<Value>;
/// A builtin that reads captured values off its own function object, used
/// for the closure-like builtins (promise resolving functions, host method
/// groups, revocation functions).
pub type StatefulFn = fn(&mut Agent, BuiltinFunction, Value, ArgumentsList<'_>) -> JsResult<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Regular(RegularFn),
    Constructor(ConstructorFn),
    Stateful(StatefulFn),
}

impl Behaviour {
    pub(crate) fn is_constructor(&self) -> bool {
        matches!(self, Behaviour::Constructor(_))
    }
}

/// A static description of a built-in function: its name, length and
/// behaviour. Implemented by zero-sized marker types next to the behaviour
/// functions themselves.
pub trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;

    /// Set when the property key is a well-known symbol instead of `NAME`.
    const KEY: Option<WellKnownSymbolIndexes> = None;

    /// `[[Writable]]` of the installed property.
    const WRITABLE: bool = true;
    /// `[[Enumerable]]` of the installed property.
    const ENUMERABLE: bool = false;
    /// `[[Configurable]]` of the installed property.
    const CONFIGURABLE: bool = true;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BuiltinFunction(pub(crate) BuiltinFunctionIndex);

#[derive(Debug, Clone)]
pub struct BuiltinFunctionHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) length: u8,
    /// ### \[\[Realm]]
    pub(crate) realm: RealmIdentifier,
    /// ### \[\[InitialName]]
    pub(crate) initial_name: Option<HeapString>,
    pub(crate) behaviour: Behaviour,
    /// Captured values readable by `Behaviour::Stateful` bodies.
    pub(crate) captures: Box<[Value]>,
}

impl Index<BuiltinFunction> for Agent {
    type Output = BuiltinFunctionHeapData;

    fn index(&self, index: BuiltinFunction) -> &Self::Output {
        self.heap
            .builtin_functions
            .get(index.0.into_index())
            .expect("BuiltinFunction out of bounds")
            .as_ref()
            .expect("BuiltinFunction slot empty")
    }
}

impl IndexMut<BuiltinFunction> for Agent {
    fn index_mut(&mut self, index: BuiltinFunction) -> &mut Self::Output {
        self.heap
            .builtin_functions
            .get_mut(index.0.into_index())
            .expect("BuiltinFunction out of bounds")
            .as_mut()
            .expect("BuiltinFunction slot empty")
    }
}

impl From<BuiltinFunction> for Object {
    fn from(value: BuiltinFunction) -> Self {
        Object::BuiltinFunction(value)
    }
}

impl From<BuiltinFunction> for Value {
    fn from(value: BuiltinFunction) -> Self {
        Value::Object(Object::BuiltinFunction(value))
    }
}

impl InternalSlots for BuiltinFunction {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Function;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for BuiltinFunction {
    /// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
    fn internal_call(
        self,
        agent: &mut Agent,
        this_value: Value,
        arguments_list: &[Value],
    ) -> JsResult<Value> {
        builtin_call_or_construct(agent, self, this_value, arguments_list, None)
    }

    /// ### [10.3.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-built-in-function-objects-construct-argumentslist-newtarget)
    fn internal_construct(
        self,
        agent: &mut Agent,
        arguments_list: &[Value],
        new_target: Object,
    ) -> JsResult<Object> {
        let result = builtin_call_or_construct(
            agent,
            self,
            Value::Undefined,
            arguments_list,
            Some(new_target),
        )?;
        match result {
            Value::Object(object) => Ok(object),
            _ => Err(agent.throw_exception(
                crate::ecmascript::execution::ExceptionType::TypeError,
                "Constructor did not return an object",
            )),
        }
    }
}

fn builtin_call_or_construct(
    agent: &mut Agent,
    function: BuiltinFunction,
    this_value: Value,
    arguments_list: &[Value],
    new_target: Option<Object>,
) -> JsResult<Value> {
    agent.check_recursion_depth()?;
    let data = &agent[function];
    let behaviour = data.behaviour;
    let realm = data.realm;
    // 1-6. Prepare a new execution context for the builtin call and push
    //    it onto the execution context stack.
    let callee_context = ExecutionContext {
        function: Some(crate::ecmascript::types::Function::BuiltinFunction(function)),
        realm,
        script_or_module: None,
        ecmascript_code: None,
        current_span: Span::default(),
    };
    agent.execution_context_stack.push(callee_context);
    // 7. Let result be the Completion Record that is the result of
    //    evaluating F in a manner that conforms to the specification of F.
    let result = match behaviour {
        Behaviour::Regular(f) => f(agent, this_value, ArgumentsList(arguments_list)),
        Behaviour::Constructor(f) => f(
            agent,
            this_value,
            ArgumentsList(arguments_list),
            new_target,
        ),
        Behaviour::Stateful(f) => f(agent, function, this_value, ArgumentsList(arguments_list)),
    };
    // 8-9. Remove calleeContext from the execution context stack.
    agent.execution_context_stack.pop();
    // 10. Return ? result.
    result
}

impl BuiltinFunction {
    pub(crate) fn capture(self, agent: &Agent, index: usize) -> Value {
        agent[self].captures[index]
    }

    pub(crate) fn set_capture(self, agent: &mut Agent, index: usize, value: Value) {
        agent[self].captures[index] = value;
    }
}

/// Create a bare builtin function outside the builder path, used for
/// closure-like builtins created at runtime.
pub(crate) fn create_stateful_builtin_function(
    agent: &mut Agent,
    behaviour: StatefulFn,
    length: u8,
    name: &'static str,
    captures: Box<[Value]>,
) -> BuiltinFunction {
    let realm = agent.current_realm_id();
    let initial_name = Some(HeapString::from_static_str(agent, name));
    let function = BuiltinFunction(agent.heap.create(BuiltinFunctionHeapData {
        object_index: None,
        length,
        realm,
        initial_name,
        behaviour: Behaviour::Stateful(behaviour),
        captures,
    }));
    let function_prototype = agent
        .get_realm(realm)
        .intrinsics()
        .function_prototype()
        .into();
    let backing_object = OrdinaryObject::create_object(agent, Some(function_prototype), true);
    function.set_backing_object(agent, backing_object);
    install_function_name_and_length(agent, function, name, length);
    function
}

/// Install the `length` and `name` own properties every function carries.
pub(crate) fn install_function_name_and_length(
    agent: &mut Agent,
    function: BuiltinFunction,
    name: &str,
    length: u8,
) {
    use crate::ecmascript::types::{PropertyDescriptor, PropertyKey};
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
    let name_value = Value::from_str(agent, name);
    let name_key = PropertyKey::from_static_str(agent, "name");
    backing_object
        .internal_define_own_property(
            agent,
            name_key,
            PropertyDescriptor {
                value: Some(name_value),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
}
