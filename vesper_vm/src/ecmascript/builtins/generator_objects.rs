// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.5 Generator Objects](https://tc39.es/ecma262/#sec-generator-objects)
//!
//! A generator's locals live in its function environment, which persists in
//! the heap across suspensions; the saved frame records the resumption
//! path back to the yield site.

use core::ops::{Index, IndexMut};

use crate::ecmascript::builtins::ecmascript_function::ECMAScriptFunction;
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::engine::coroutine::GeneratorFrame;
use crate::heap::indexes::{GeneratorIndex, ObjectIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Generator(pub(crate) GeneratorIndex);

/// The environment half of the generator's suspended execution context.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedGeneratorContext {
    pub(crate) realm: RealmIdentifier,
    pub(crate) script_or_module: Option<ScriptOrModule>,
    pub(crate) lexical_environment: EnvironmentIndex,
    pub(crate) variable_environment: EnvironmentIndex,
    pub(crate) is_strict_mode: bool,
}

/// ### \[\[GeneratorState]]
#[derive(Debug, Default)]
pub(crate) enum GeneratorState {
    SuspendedStart {
        function: ECMAScriptFunction,
        context: SavedGeneratorContext,
    },
    SuspendedYield {
        function: ECMAScriptFunction,
        context: SavedGeneratorContext,
        frame: GeneratorFrame,
    },
    Executing,
    #[default]
    Completed,
}

#[derive(Debug, Default)]
pub struct GeneratorHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) state: GeneratorState,
}

impl Index<Generator> for Agent {
    type Output = GeneratorHeapData;

    fn index(&self, index: Generator) -> &Self::Output {
        self.heap
            .generators
            .get(index.0.into_index())
            .expect("Generator out of bounds")
            .as_ref()
            .expect("Generator slot empty")
    }
}

impl IndexMut<Generator> for Agent {
    fn index_mut(&mut self, index: Generator) -> &mut Self::Output {
        self.heap
            .generators
            .get_mut(index.0.into_index())
            .expect("Generator out of bounds")
            .as_mut()
            .expect("Generator slot empty")
    }
}

impl From<Generator> for Object {
    fn from(value: Generator) -> Self {
        Object::Generator(value)
    }
}

impl From<Generator> for Value {
    fn from(value: Generator) -> Self {
        Value::Object(Object::Generator(value))
    }
}

impl InternalSlots for Generator {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Generator;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Generator {}

pub(crate) struct GeneratorPrototype;

use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};

struct GeneratorPrototypeNext;
impl Builtin for GeneratorPrototypeNext {
    const NAME: &'static str = "next";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::next);
}

struct GeneratorPrototypeReturn;
impl Builtin for GeneratorPrototypeReturn {
    const NAME: &'static str = "return";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::r#return);
}

struct GeneratorPrototypeThrow;
impl Builtin for GeneratorPrototypeThrow {
    const NAME: &'static str = "throw";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(GeneratorPrototype::throw);
}

fn this_generator(agent: &mut Agent, this_value: Value) -> JsResult<Generator> {
    match this_value {
        Value::Object(Object::Generator(generator)) => Ok(generator),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a generator",
        )),
    }
}

impl GeneratorPrototype {
    /// ### [27.5.1.2 %GeneratorPrototype%.next ( value )](https://tc39.es/ecma262/#sec-generator.prototype.next)
    fn next(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let generator = this_generator(agent, this_value)?;
        crate::engine::coroutine::generator_resume(
            agent,
            generator,
            crate::engine::coroutine::ResumeKind::Next(arguments.get(0)),
        )
    }

    /// ### [27.5.1.4 %GeneratorPrototype%.return ( value )](https://tc39.es/ecma262/#sec-generator.prototype.return)
    fn r#return(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let generator = this_generator(agent, this_value)?;
        crate::engine::coroutine::generator_resume(
            agent,
            generator,
            crate::engine::coroutine::ResumeKind::Return(arguments.get(0)),
        )
    }

    /// ### [27.5.1.3 %GeneratorPrototype%.throw ( exception )](https://tc39.es/ecma262/#sec-generator.prototype.throw)
    fn throw(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let generator = this_generator(agent, this_value)?;
        crate::engine::coroutine::generator_resume(
            agent,
            generator,
            crate::engine::coroutine::ResumeKind::Throw(arguments.get(0)),
        )
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let generator_prototype = intrinsics.generator_prototype();
    let generator_function_prototype = intrinsics.generator_function_prototype();

    // %GeneratorFunction.prototype%: the [[Prototype]] of generator
    // function objects; its "prototype" property is %GeneratorPrototype%.
    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, generator_function_prototype)
        .with_property("prototype", generator_prototype.into())
        .with_to_string_tag("GeneratorFunction")
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, generator_prototype)
        .with_builtin_function_property::<GeneratorPrototypeNext>()
        .with_builtin_function_property::<GeneratorPrototypeReturn>()
        .with_builtin_function_property::<GeneratorPrototypeThrow>()
        .with_to_string_tag("Generator")
        .build();
}
