// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host interop scenarios: wrapped objects, method groups with overload
//! resolution, the member accessor hook and the reflection sandbox.

use std::rc::Rc;

use vesper_vm::ecmascript::execution::{Agent, JsResult};
use vesper_vm::embedding::{
    Engine, EngineError, EngineOptions, MemberKind, MethodSignature, ObjectWrapper, ParameterKind,
};
use vesper_vm::ecmascript::types::Value;

/// A host "point" object with fields and one overloaded method group.
#[derive(Debug)]
struct PointWrapper;

impl ObjectWrapper for PointWrapper {
    fn try_get(&self, _agent: &mut Agent, name: &str) -> Option<Value> {
        match name {
            "X" => Some(Value::Integer(3)),
            "Y" => Some(Value::Integer(4)),
            _ => None,
        }
    }

    fn try_set(&self, _agent: &mut Agent, _name: &str, _value: Value) -> bool {
        false
    }

    fn keys(&self) -> Vec<String> {
        vec!["X".to_string(), "Y".to_string()]
    }

    fn invoke(&self, agent: &mut Agent, name: &str, args: &[Value]) -> JsResult<Value> {
        match (name, args) {
            // Scale() -> 1; Scale(n) -> n; the overload with the matching
            // arity wins.
            ("Scale", []) => Ok(Value::Integer(1)),
            ("Scale", [factor]) => Ok(*factor),
            _ => Err(agent.throw_exception(
                vesper_vm::ecmascript::execution::ExceptionType::TypeError,
                "No matching overload",
            )),
        }
    }

    fn member_kind(&self, name: &str) -> Option<MemberKind> {
        match name {
            "X" | "Y" => Some(MemberKind::Property),
            "Scale" => Some(MemberKind::Method),
            _ => None,
        }
    }

    fn method_signatures(&self, name: &str) -> Vec<MethodSignature> {
        match name {
            "Scale" => vec![
                MethodSignature { parameters: vec![] },
                MethodSignature {
                    parameters: vec![ParameterKind::Numeric],
                },
            ],
            _ => Vec::new(),
        }
    }
}

#[test]
fn wrapped_members_and_method_groups() {
    let mut engine = Engine::new(EngineOptions {
        allow_host_interop: true,
        ..Default::default()
    });
    let point = engine.wrap_host_object(Rc::new(PointWrapper));
    engine.set_value("point", point).unwrap();

    let result = engine.execute("point.X + point.Y").unwrap();
    assert_eq!(result, Value::Integer(7));

    // The method group is a single callable; overloads resolve by arity
    // and the numeric argument is coerced.
    let result = engine.execute("point.Scale() + point.Scale('41')").unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn dictionary_keys_enumerate() {
    let mut engine = Engine::new(EngineOptions {
        allow_host_interop: true,
        ..Default::default()
    });
    let point = engine.wrap_host_object(Rc::new(PointWrapper));
    engine.set_value("point", point).unwrap();
    let result = engine.execute("Object.keys(point).join(',')").unwrap();
    assert_eq!(engine.display(result), "X,Y");
}

/// A wrapped host type; reads of its reflection members are the sandbox
/// boundary.
#[derive(Debug)]
struct HostTypeWrapper;

impl ObjectWrapper for HostTypeWrapper {
    fn try_get(&self, _agent: &mut Agent, name: &str) -> Option<Value> {
        match name {
            "Name" => None,
            _ => None,
        }
    }

    fn try_set(&self, _agent: &mut Agent, _name: &str, _value: Value) -> bool {
        false
    }

    fn keys(&self) -> Vec<String> {
        vec!["Name".to_string()]
    }

    fn invoke(&self, _agent: &mut Agent, _name: &str, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::Undefined)
    }

    fn member_kind(&self, _name: &str) -> Option<MemberKind> {
        None
    }
}

#[test]
fn reflection_sandbox_trips_with_verbatim_message() {
    let mut engine = Engine::new(EngineOptions {
        allow_host_interop: true,
        ..Default::default()
    });
    let host_type = engine.wrap_host_type(Rc::new(HostTypeWrapper));
    let holder = engine.execute("var m = {}; m").unwrap();
    let _ = holder;
    engine.set_value("hostType", host_type).unwrap();
    engine.execute("m.Type = hostType;").unwrap();

    let error = engine
        .execute("m.Type.Module.GetType('System.DateTime')")
        .unwrap_err();
    assert_eq!(
        error,
        EngineError::HostReflectionForbidden(
            "Cannot access System.Reflection namespace, check Engine's interop options"
        )
    );
}

#[test]
fn reflection_allowed_when_opted_in() {
    let mut engine = Engine::new(EngineOptions {
        allow_host_interop: true,
        interop_allow_system_reflection: true,
        ..Default::default()
    });
    let host_type = engine.wrap_host_type(Rc::new(HostTypeWrapper));
    engine.set_value("hostType", host_type).unwrap();
    // With the gate open the read falls through to an undefined member
    // rather than a fatal condition.
    let result = engine.execute("hostType.Module").unwrap();
    assert_eq!(result, Value::Undefined);
}

#[test]
fn get_type_is_hidden_by_default() {
    let mut engine = Engine::new(EngineOptions {
        allow_host_interop: true,
        ..Default::default()
    });
    let point = engine.wrap_host_object(Rc::new(PointWrapper));
    engine.set_value("point", point).unwrap();
    let result = engine.execute("point.GetType").unwrap();
    assert_eq!(result, Value::Undefined);
}
