// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host interop: the bridge from a host-language object graph into the
//! engine's object model.
//!
//! The host supplies [`ObjectWrapper`] adapters for its objects, an
//! optional [`TypeResolver`] for type lookup and an optional
//! [`MemberAccessor`] consulted before the default member lookup. Method
//! groups surface as a single callable performing arity-then-assignability
//! overload resolution against the supplied values.

use std::rc::Rc;

use crate::ecmascript::abstract_operations::type_conversion::{to_boolean, to_number, to_string};
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, Value};

/// Opaque handle to a host type, as minted by the host's type resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
    Method,
}

/// A member of a host type as reported by [`TypeResolver::list_members`].
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: MemberKind,
    /// Parameter shapes of each overload for methods.
    pub signatures: Vec<MethodSignature>,
}

#[derive(Debug, Clone, Default)]
pub struct MethodSignature {
    pub parameters: Vec<ParameterKind>,
}

/// The coercion classes of the interop boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// number <-> numeric
    Numeric,
    /// string <-> text
    Text,
    /// boolean <-> bool
    Bool,
    /// JS array <-> sequence
    Sequence,
    /// object <-> dictionary
    Dictionary,
    /// Accepts any value.
    Any,
}

/// `resolveType(name)` and member listing for wrapped types.
pub trait TypeResolver: std::fmt::Debug {
    fn resolve_type(&self, name: &str) -> Option<TypeHandle>;
    fn list_members(&self, handle: TypeHandle) -> Vec<MemberDescriptor>;
    /// Filter applied to every listed member; rejected members are hidden.
    fn member_filter(&self, member: &MemberDescriptor) -> bool {
        let _ = member;
        true
    }
}

/// Answer of a [`MemberAccessor`] consultation.
#[derive(Debug, Clone, Copy)]
pub enum MemberAccess {
    /// Fall through to the default lookup.
    NoOpinion,
    /// Hide the member: the read produces undefined.
    Hide,
    /// Produce this value.
    Use(Value),
}

/// A callback consulted before the default member lookup on wrapped host
/// objects.
pub trait MemberAccessor: std::fmt::Debug {
    fn access(&self, agent: &mut Agent, target: Value, name: &str) -> MemberAccess;
}

/// Adapter interface a host object must satisfy to be wrapped.
pub trait ObjectWrapper: std::fmt::Debug {
    /// Read a member; None falls through to dictionary entries and the
    /// prototype chain.
    fn try_get(&self, agent: &mut Agent, name: &str) -> Option<Value>;

    /// Write a member; false falls through to ordinary assignment.
    fn try_set(&self, agent: &mut Agent, name: &str, value: Value) -> bool;

    /// The enumerable member names, including dictionary entries.
    fn keys(&self) -> Vec<String>;

    /// Invoke a method group member by name.
    fn invoke(&self, agent: &mut Agent, name: &str, args: &[Value]) -> JsResult<Value>;

    /// The host type of the wrapped object, if the host exposes one.
    fn type_handle(&self) -> Option<TypeHandle> {
        None
    }

    /// Which kind of member `name` is, used to unify method groups into
    /// callables and to let structural methods win over dictionary entries.
    fn member_kind(&self, name: &str) -> Option<MemberKind>;

    /// Overload signatures for a method-group member.
    fn method_signatures(&self, name: &str) -> Vec<MethodSignature> {
        let _ = name;
        Vec::new()
    }

    /// Whether the wrapped object is itself invocable (a delegate).
    fn is_invocable(&self) -> bool {
        false
    }

    /// Invoke the wrapped object itself.
    fn invoke_self(&self, agent: &mut Agent, this: Value, args: &[Value]) -> JsResult<Value> {
        let _ = (this, args);
        Err(agent.throw_exception(
            crate::ecmascript::execution::ExceptionType::TypeError,
            "Host object is not invocable",
        ))
    }
}

pub type SharedObjectWrapper = Rc<dyn ObjectWrapper>;

/// How well a value matches a parameter kind: 2 exact, 1 coercible, 0
/// incompatible.
fn assignability_score(_agent: &Agent, value: Value, parameter: ParameterKind) -> u8 {
    match parameter {
        ParameterKind::Any => 1,
        ParameterKind::Numeric => match value {
            Value::Number(_) | Value::Integer(_) => 2,
            Value::String(_) | Value::Boolean(_) => 1,
            _ => 0,
        },
        ParameterKind::Text => match value {
            Value::String(_) => 2,
            Value::Number(_) | Value::Integer(_) | Value::Boolean(_) => 1,
            _ => 0,
        },
        ParameterKind::Bool => match value {
            Value::Boolean(_) => 2,
            // Everything coerces to boolean.
            _ => 1,
        },
        ParameterKind::Sequence => match value {
            Value::Object(Object::Array(_)) => 2,
            Value::Object(_) => 1,
            _ => 0,
        },
        ParameterKind::Dictionary => match value {
            Value::Object(Object::Array(_)) => 1,
            Value::Object(_) => 2,
            _ => 0,
        },
    }
}

/// Pick the best overload by arity first, then total assignability score.
/// Returns the index of the winning signature.
pub(crate) fn resolve_overload(
    agent: &Agent,
    signatures: &[MethodSignature],
    args: &[Value],
) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, signature) in signatures.iter().enumerate() {
        // Arity gate first.
        if signature.parameters.len() != args.len() {
            continue;
        }
        let mut total = 0u32;
        let mut compatible = true;
        for (arg, parameter) in args.iter().zip(signature.parameters.iter()) {
            let score = assignability_score(agent, *arg, *parameter);
            if score == 0 {
                compatible = false;
                break;
            }
            total += score as u32;
        }
        if !compatible {
            continue;
        }
        if best.is_none_or(|(_, best_total)| total > best_total) {
            best = Some((index, total));
        }
    }
    best.map(|(index, _)| index)
}

/// Coerce a call argument to the parameter class of the selected overload.
pub(crate) fn coerce_argument(
    agent: &mut Agent,
    value: Value,
    parameter: ParameterKind,
) -> JsResult<Value> {
    Ok(match parameter {
        ParameterKind::Any | ParameterKind::Sequence | ParameterKind::Dictionary => value,
        ParameterKind::Numeric => Value::from_f64(to_number(agent, value)?),
        ParameterKind::Text => Value::String(to_string(agent, value)?),
        ParameterKind::Bool => Value::Boolean(to_boolean(agent, value)),
    })
}

/// Member names on wrapped type objects that escape into the host's deep
/// reflection namespaces.
pub(crate) const REFLECTION_ESCAPE_MEMBERS: [&str; 4] =
    ["Module", "Assembly", "DeclaringType", "ReflectedType"];
