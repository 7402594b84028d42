// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.1 Environment Records](https://tc39.es/ecma262/#sec-environment-records)
//!
//! Environment Record is a specification type used to define the association
//! of Identifiers to specific variables and functions, based upon the
//! lexical nesting structure of ECMAScript code. Every Environment Record
//! has an \[\[OuterEnv]] field, which is either null or a reference to an
//! outer Environment Record; lookup walks the outer chain.

pub mod declarative_environment;
pub mod function_environment;
pub mod global_environment;
pub mod module_environment;
pub mod object_environment;

use core::marker::PhantomData;
use core::num::NonZeroU32;

pub(crate) use declarative_environment::{
    new_declarative_environment, Binding, DeclarativeEnvironment, DeclarativeEnvironmentRecord,
};
pub(crate) use function_environment::{
    new_function_environment, FunctionEnvironment, ThisBindingStatus,
};
pub(crate) use global_environment::GlobalEnvironment;
pub(crate) use module_environment::{new_module_environment, ModuleEnvironment};
pub(crate) use object_environment::{new_object_environment, ObjectEnvironment};

use crate::ecmascript::types::{Base, HeapString, Object, PropertyKey, Reference, Value};

use super::agent::{Agent, JsResult};

/// ### [\[\[OuterEnv]]](https://tc39.es/ecma262/#sec-environment-records)
pub(crate) type OuterEnv = Option<EnvironmentIndex>;

macro_rules! create_environment_index {
    ($name: ident, $index: ident, $entry: ident) => {
        /// An index used to access an environment from [`Environments`].
        /// Internally the index is stored plus one in a [`NonZeroU32`] so
        /// that `Option<$index>` fits the same four bytes.
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $index(NonZeroU32, PhantomData<$name>);

        impl core::fmt::Debug for $index {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!(stringify!($index), "({:?})"), self.0)
            }
        }

        impl $index {
            pub(crate) const fn from_u32(value: u32) -> Self {
                assert!(value != 0);
                // SAFETY: Checked to be non-zero above.
                Self(unsafe { NonZeroU32::new_unchecked(value) }, PhantomData)
            }

            pub(crate) const fn into_index(self) -> usize {
                self.0.get() as usize - 1
            }

            pub(crate) fn last(vec: &[Option<$name>]) -> Self {
                Self::from_u32(vec.len() as u32)
            }
        }

        impl core::ops::Index<$index> for Agent {
            type Output = $name;

            fn index(&self, index: $index) -> &Self::Output {
                self.heap.environments.$entry[index.into_index()]
                    .as_ref()
                    .expect("Environment slot empty")
            }
        }

        impl core::ops::IndexMut<$index> for Agent {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                self.heap.environments.$entry[index.into_index()]
                    .as_mut()
                    .expect("Environment slot empty")
            }
        }
    };
}

create_environment_index!(
    DeclarativeEnvironment,
    DeclarativeEnvironmentIndex,
    declarative
);
create_environment_index!(FunctionEnvironment, FunctionEnvironmentIndex, function);
create_environment_index!(GlobalEnvironment, GlobalEnvironmentIndex, global);
create_environment_index!(ModuleEnvironment, ModuleEnvironmentIndex, module);
create_environment_index!(ObjectEnvironment, ObjectEnvironmentIndex, object);

/// ### [9.1.1 The Environment Record Type Hierarchy](https://tc39.es/ecma262/#sec-the-environment-record-type-hierarchy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentIndex {
    Declarative(DeclarativeEnvironmentIndex),
    Function(FunctionEnvironmentIndex),
    Global(GlobalEnvironmentIndex),
    Module(ModuleEnvironmentIndex),
    Object(ObjectEnvironmentIndex),
}

#[derive(Debug, Default)]
pub struct Environments {
    pub(crate) declarative: Vec<Option<DeclarativeEnvironment>>,
    pub(crate) function: Vec<Option<FunctionEnvironment>>,
    pub(crate) global: Vec<Option<GlobalEnvironment>>,
    pub(crate) module: Vec<Option<ModuleEnvironment>>,
    pub(crate) object: Vec<Option<ObjectEnvironment>>,
}

impl EnvironmentIndex {
    pub(crate) fn get_outer_env(self, agent: &Agent) -> OuterEnv {
        match self {
            EnvironmentIndex::Declarative(index) => agent[index].outer_env(),
            EnvironmentIndex::Function(index) => agent[index].declarative.outer_env(),
            EnvironmentIndex::Global(_) => None,
            EnvironmentIndex::Module(index) => agent[index].declarative.outer_env(),
            EnvironmentIndex::Object(index) => agent[index].outer_env,
        }
    }

    /// ### [HasBinding ( N )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// Determine if an Environment Record has a binding for the String
    /// value N.
    pub(crate) fn has_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(index) => Ok(agent[index].has_binding(name)),
            EnvironmentIndex::Function(index) => Ok(agent[index].declarative.has_binding(name)),
            EnvironmentIndex::Global(index) => index.has_binding(agent, name),
            EnvironmentIndex::Module(index) => Ok(index.has_binding(agent, name)),
            EnvironmentIndex::Object(index) => index.has_binding(agent, name),
        }
    }

    /// ### [CreateMutableBinding ( N, D )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// Create a new but uninitialized mutable binding. If D is true the
    /// binding may be subsequently deleted.
    pub(crate) fn create_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_deletable: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent[index].create_mutable_binding(name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent[index]
                    .declarative
                    .create_mutable_binding(name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Global(index) => {
                index.create_mutable_binding(agent, name, is_deletable)
            }
            EnvironmentIndex::Module(index) => {
                agent[index]
                    .declarative
                    .create_mutable_binding(name, is_deletable);
                Ok(())
            }
            EnvironmentIndex::Object(index) => {
                index.create_mutable_binding(agent, name, is_deletable)
            }
        }
    }

    /// ### [CreateImmutableBinding ( N, S )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn create_immutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent[index].create_immutable_binding(name, is_strict);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent[index]
                    .declarative
                    .create_immutable_binding(name, is_strict);
                Ok(())
            }
            EnvironmentIndex::Global(index) => {
                index.create_immutable_binding(agent, name, is_strict)
            }
            EnvironmentIndex::Module(index) => {
                agent[index]
                    .declarative
                    .create_immutable_binding(name, is_strict);
                Ok(())
            }
            EnvironmentIndex::Object(_) => unreachable!(),
        }
    }

    /// ### [InitializeBinding ( N, V )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn initialize_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                agent[index].initialize_binding(name, value);
                Ok(())
            }
            EnvironmentIndex::Function(index) => {
                agent[index].declarative.initialize_binding(name, value);
                Ok(())
            }
            EnvironmentIndex::Global(index) => index.initialize_binding(agent, name, value),
            EnvironmentIndex::Module(index) => {
                agent[index].declarative.initialize_binding(name, value);
                Ok(())
            }
            EnvironmentIndex::Object(index) => index.initialize_binding(agent, name, value),
        }
    }

    /// ### [SetMutableBinding ( N, V, S )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn set_mutable_binding(
        self,
        agent: &mut Agent,
        name: HeapString,
        value: Value,
        is_strict: bool,
    ) -> JsResult<()> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                index.set_mutable_binding(agent, name, value, is_strict)
            }
            EnvironmentIndex::Function(index) => {
                index.set_mutable_binding(agent, name, value, is_strict)
            }
            EnvironmentIndex::Global(index) => {
                index.set_mutable_binding(agent, name, value, is_strict)
            }
            EnvironmentIndex::Module(index) => {
                index.set_mutable_binding(agent, name, value, is_strict)
            }
            EnvironmentIndex::Object(index) => {
                index.set_mutable_binding(agent, name, value, is_strict)
            }
        }
    }

    /// ### [GetBindingValue ( N, S )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    ///
    /// If the binding exists but is uninitialized a ReferenceError is
    /// thrown, regardless of the value of S.
    pub(crate) fn get_binding_value(
        self,
        agent: &mut Agent,
        name: HeapString,
        is_strict: bool,
    ) -> JsResult<Value> {
        match self {
            EnvironmentIndex::Declarative(index) => {
                index.get_binding_value(agent, name, is_strict)
            }
            EnvironmentIndex::Function(index) => index.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Global(index) => index.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Module(index) => index.get_binding_value(agent, name, is_strict),
            EnvironmentIndex::Object(index) => index.get_binding_value(agent, name, is_strict),
        }
    }

    /// ### [DeleteBinding ( N )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn delete_binding(self, agent: &mut Agent, name: HeapString) -> JsResult<bool> {
        match self {
            EnvironmentIndex::Declarative(index) => Ok(agent[index].delete_binding(name)),
            EnvironmentIndex::Function(index) => Ok(agent[index].declarative.delete_binding(name)),
            EnvironmentIndex::Global(index) => index.delete_binding(agent, name),
            EnvironmentIndex::Module(_) => unreachable!(),
            EnvironmentIndex::Object(index) => index.delete_binding(agent, name),
        }
    }

    /// ### [HasThisBinding ( )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn has_this_binding(self, agent: &Agent) -> bool {
        match self {
            EnvironmentIndex::Declarative(_) => false,
            EnvironmentIndex::Function(index) => agent[index].has_this_binding(),
            EnvironmentIndex::Global(_) => true,
            EnvironmentIndex::Module(_) => true,
            EnvironmentIndex::Object(_) => false,
        }
    }

    /// ### [HasSuperBinding ( )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn has_super_binding(self, agent: &Agent) -> bool {
        match self {
            EnvironmentIndex::Function(index) => agent[index].has_super_binding(agent),
            _ => false,
        }
    }

    /// ### [WithBaseObject ( )](https://tc39.es/ecma262/#table-abstract-methods-of-environment-records)
    pub(crate) fn with_base_object(self, agent: &Agent) -> Option<Object> {
        match self {
            EnvironmentIndex::Object(index) => {
                let env = &agent[index];
                if env.is_with_environment {
                    Some(env.binding_object)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// ### [9.1.2.1 GetIdentifierReference ( env, name, strict )](https://tc39.es/ecma262/#sec-getidentifierreference)
pub(crate) fn get_identifier_reference(
    agent: &mut Agent,
    env: Option<EnvironmentIndex>,
    name: HeapString,
    strict: bool,
) -> JsResult<Reference> {
    // 1. If env is null, then
    let Some(env) = env else {
        // a. Return the Reference Record { [[Base]]: UNRESOLVABLE,
        //    [[ReferencedName]]: name, [[Strict]]: strict,
        //    [[ThisValue]]: EMPTY }.
        return Ok(Reference {
            base: Base::Unresolvable,
            referenced_name: PropertyKey::String(name),
            strict,
            this_value: None,
        });
    };

    // 2. Let exists be ? env.HasBinding(name).
    let exists = env.has_binding(agent, name)?;

    // 3. If exists is true, then
    if exists {
        // a. Return the Reference Record { [[Base]]: env,
        //    [[ReferencedName]]: name, [[Strict]]: strict,
        //    [[ThisValue]]: EMPTY }.
        Ok(Reference {
            base: Base::Environment(env),
            referenced_name: PropertyKey::String(name),
            strict,
            this_value: None,
        })
    } else {
        // 4. Else,
        // a. Let outer be env.[[OuterEnv]].
        let outer = env.get_outer_env(agent);
        // b. Return ? GetIdentifierReference(outer, name, strict).
        get_identifier_reference(agent, outer, name, strict)
    }
}

/// ### [9.4.3 GetThisEnvironment ( )](https://tc39.es/ecma262/#sec-getthisenvironment)
///
/// Finds the Environment Record that currently supplies the binding of the
/// keyword `this`.
pub(crate) fn get_this_environment(agent: &Agent) -> EnvironmentIndex {
    // 1. Let env be the running execution context's LexicalEnvironment.
    let mut env = agent.current_lexical_environment();
    // 2. Repeat,
    loop {
        // a. Let exists be env.HasThisBinding().
        // b. If exists is true, return env.
        if env.has_this_binding(agent) {
            return env;
        }
        // c. Let outer be env.[[OuterEnv]]. d. Assert: outer is not null.
        // e. Set env to outer.
        env = env.get_outer_env(agent).unwrap();
    }
}
