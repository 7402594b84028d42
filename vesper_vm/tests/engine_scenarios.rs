// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios driven through the engine facade.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use vesper_vm::ecmascript::scripts_and_modules::module::ModuleLoader;
use vesper_vm::embedding::{Engine, EngineError, EngineOptions};
use vesper_vm::ecmascript::types::Value;
use vesper_vm::ecmascript::execution::QuotaKind;

fn engine() -> Engine {
    Engine::new(EngineOptions::default())
}

#[test]
fn iife_arithmetic() {
    let mut engine = engine();
    let result = engine
        .execute("(function(){ var x=1; return x+2; })()")
        .unwrap();
    assert_eq!(result, Value::Integer(3));
}

#[test]
fn json_parse_map_reduce() {
    let mut engine = engine();
    let result = engine
        .execute("JSON.parse('[1,2,3]').map(x=>x*x).reduce((a,b)=>a+b,0)")
        .unwrap();
    assert_eq!(result, Value::Integer(14));
}

#[test]
fn lexical_redeclaration_is_rejected_before_evaluation() {
    let mut engine = engine();
    let result = engine.execute("let x; let x;");
    assert!(matches!(result, Err(EngineError::Parse(_))));
}

#[test]
fn global_redeclaration_message_is_verbatim() {
    let mut engine = engine();
    engine.execute("let y = 1;").unwrap();
    let error = engine.execute("let y = 2;").unwrap_err();
    let EngineError::Uncaught(message) = error else {
        panic!("expected an uncaught error");
    };
    assert!(message.contains("y has already been declared"));
}

#[test]
fn async_await_logs_through_microtasks() {
    let mut engine = engine();
    thread_local! {
        static LOGGED: RefCell<Vec<f64>> = const { RefCell::new(Vec::new()) };
    }
    LOGGED.with(|logged| logged.borrow_mut().clear());
    engine.set_function("hostLog", |_agent, _this, arguments| {
        let value = arguments.get(0);
        if let Some(n) = value.as_f64() {
            LOGGED.with(|logged| logged.borrow_mut().push(n));
        }
        Ok(Value::Undefined)
    });
    engine
        .execute("async function f(){ return 1 + await 2 } f().then(v=>hostLog(v))")
        .unwrap();
    engine.drain_microtasks();
    LOGGED.with(|logged| assert_eq!(*logged.borrow(), vec![3.0]));
}

#[test]
fn microtasks_run_in_fifo_order() {
    let mut engine = engine();
    engine
        .execute(
            "var order = [];\n\
             Promise.resolve(1).then(v => order.push(v));\n\
             Promise.resolve(2).then(v => order.push(v));",
        )
        .unwrap();
    engine.drain_microtasks();
    let result = engine.execute("order.join(',')").unwrap();
    assert_eq!(engine.display(result), "1,2");
}

#[test]
fn tdz_read_throws_reference_error() {
    let mut engine = engine();
    let error = engine
        .execute("(function(){ try { a; } catch (e) { return e.name; } let a; })()")
        .unwrap();
    assert_eq!(engine.display(error), "ReferenceError");
}

#[test]
fn strict_equality_is_reflexive_except_nan() {
    let mut engine = engine();
    let result = engine
        .execute("[1, 'x', null, undefined, {}, NaN].map(v => v === v).join(',')")
        .unwrap();
    assert_eq!(engine.display(result), "true,true,true,true,true,false");
}

#[test]
fn own_key_ordering_is_integers_then_insertion() {
    let mut engine = engine();
    let result = engine
        .execute("Object.keys({ b: 1, 2: 2, a: 3, 0: 4 }).join(',')")
        .unwrap();
    assert_eq!(engine.display(result), "0,2,b,a");
}

#[test]
fn descriptor_round_trip() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var o = {};\n\
             Object.defineProperty(o, 'p', { value: 7, enumerable: true });\n\
             var d = Object.getOwnPropertyDescriptor(o, 'p');\n\
             [d.value, d.writable, d.enumerable, d.configurable].join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "7,false,true,false");
}

#[test]
fn statement_quota_aborts_uncatchably_but_runs_finally() {
    let mut engine = Engine::new(EngineOptions {
        max_statements: Some(10_000),
        ..Default::default()
    });
    engine
        .execute("var cleanedUp = false;")
        .unwrap();
    let error = engine
        .execute(
            "try {\n\
               while (true) {}\n\
             } catch (e) {\n\
               cleanedUp = 'caught';\n\
             } finally {\n\
               cleanedUp = true;\n\
             }",
        )
        .unwrap_err();
    assert!(matches!(
        error,
        EngineError::QuotaExceeded(QuotaKind::Statements, _)
    ));
    // The catch clause must not observe the abort; the finally must run.
    let cleaned_up = engine.get_value("cleanedUp").unwrap();
    assert_eq!(cleaned_up, Value::Boolean(true));
}

#[test]
fn timeout_quota_fires() {
    let mut engine = Engine::new(EngineOptions {
        timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    });
    let error = engine.execute("while (true) {}").unwrap_err();
    assert!(matches!(
        error,
        EngineError::QuotaExceeded(QuotaKind::Time, _)
    ));
}

#[test]
fn generators_suspend_and_resume() {
    let mut engine = engine();
    let result = engine
        .execute(
            "function* counter() {\n\
               var total = 0;\n\
               for (var i = 1; i <= 3; i++) {\n\
                 total += yield i;\n\
               }\n\
               return total;\n\
             }\n\
             var it = counter();\n\
             var a = it.next().value;\n\
             var b = it.next(10).value;\n\
             var c = it.next(20).value;\n\
             var done = it.next(30);\n\
             [a, b, c, done.value, done.done].join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "1,2,3,60,true");
}

#[test]
fn generator_for_of_and_spread() {
    let mut engine = engine();
    let result = engine
        .execute(
            "function* pair() { yield 1; yield 2; }\n\
             var out = [];\n\
             for (const v of pair()) out.push(v * 2);\n\
             out.concat([...pair()]).join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "2,4,1,2");
}

#[test]
fn classes_with_inheritance_and_super() {
    let mut engine = engine();
    let result = engine
        .execute(
            "class Animal {\n\
               constructor(name) { this.name = name; }\n\
               speak() { return this.name + ' makes a sound'; }\n\
             }\n\
             class Dog extends Animal {\n\
               constructor(name) { super(name); }\n\
               speak() { return super.speak() + ': woof'; }\n\
             }\n\
             new Dog('Rex').speak()",
        )
        .unwrap();
    assert_eq!(engine.display(result), "Rex makes a sound: woof");
}

#[test]
fn closures_capture_per_iteration_bindings() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var fns = [];\n\
             for (let i = 0; i < 3; i++) fns.push(() => i);\n\
             fns.map(f => f()).join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "0,1,2");
}

#[test]
fn try_finally_overrides_completion() {
    let mut engine = engine();
    let result = engine
        .execute("(function(){ try { return 1; } finally { return 2; } })()")
        .unwrap();
    assert_eq!(result, Value::Integer(2));
}

#[test]
fn stack_traces_name_frames() {
    let mut engine = engine();
    let result = engine
        .execute(
            "function inner() { throw new Error('boom'); }\n\
             function outer() { inner(); }\n\
             try { outer(); } catch (e) { e.stack }",
        )
        .unwrap();
    let stack = engine.display(result);
    assert!(stack.contains("Error: boom"));
    assert!(stack.contains("inner"));
    assert!(stack.contains("outer"));
}

#[derive(Debug)]
struct FixtureLoader {
    modules: Vec<(&'static str, &'static str)>,
}

impl ModuleLoader for FixtureLoader {
    fn load(&self, specifier: &str) -> Result<String, String> {
        self.modules
            .iter()
            .find(|(name, _)| *name == specifier)
            .map(|(_, source)| source.to_string())
            .ok_or_else(|| format!("Cannot find module '{specifier}'"))
    }
}

#[test]
fn module_graph_links_and_evaluates() {
    let loader = FixtureLoader {
        modules: vec![
            ("main", "import { double } from 'lib'; export const result = double(21);"),
            ("lib", "export function double(x) { return x * 2; }"),
        ],
    };
    let mut engine = Engine::new(EngineOptions {
        module_loader: Some(Rc::new(loader)),
        ..Default::default()
    });
    let namespace = engine.import_module("main").unwrap();
    engine.set_value("ns", namespace).unwrap();
    let result = engine.execute("ns.result").unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn ambiguous_star_export_is_a_syntax_error() {
    let loader = FixtureLoader {
        modules: vec![
            ("entry", "import * as ns from 'm'; ns.a"),
            ("m", "export const a = 1; export * from 'n';"),
            ("n", "export const a = 2; export const b = 3;"),
        ],
    };
    let mut engine = Engine::new(EngineOptions {
        module_loader: Some(Rc::new(loader)),
        ..Default::default()
    });
    // `a` resolves locally in m; `b` flows through the star export.
    let namespace = engine.import_module("m").unwrap();
    engine.set_value("m", namespace).unwrap();
    let result = engine.execute("[m.a, m.b].join(',')").unwrap();
    assert_eq!(engine.display(result), "1,3");

    // Two star exports of the same name with distinct targets are
    // ambiguous.
    let loader = FixtureLoader {
        modules: vec![
            ("m", "export * from 'n1'; export * from 'n2';"),
            ("n1", "export const a = 1;"),
            ("n2", "export const a = 2;"),
        ],
    };
    let mut engine = Engine::new(EngineOptions {
        module_loader: Some(Rc::new(loader)),
        ..Default::default()
    });
    let namespace = engine.import_module("m").unwrap();
    engine.set_value("m", namespace).unwrap();
    // The ambiguous name is absent from the namespace.
    let result = engine.execute("'a' in m").unwrap();
    assert_eq!(result, Value::Boolean(false));
}

#[test]
fn json_round_trip() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var v = { a: [1, 2.5, 'x'], b: { c: null, d: true } };\n\
             JSON.stringify(JSON.parse(JSON.stringify(v))) === JSON.stringify(v)",
        )
        .unwrap();
    assert_eq!(result, Value::Boolean(true));
}

#[test]
fn json_stringify_cycles_throw_type_error() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var a = {}; a.self = a;\n\
             try { JSON.stringify(a); 'no throw' } catch (e) { e.name }",
        )
        .unwrap();
    assert_eq!(engine.display(result), "TypeError");
}

#[test]
fn proxy_traps_and_invariants() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var log = [];\n\
             var p = new Proxy({ x: 1 }, {\n\
               get(target, key, receiver) { log.push('get:' + String(key)); return target[key]; }\n\
             });\n\
             p.x; p.y;\n\
             log.join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "get:x,get:y");
}

#[test]
fn symbols_and_well_knowns() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var obj = { [Symbol.iterator]() { var i = 0; return { next() {\n\
               return i < 2 ? { value: i++, done: false } : { value: undefined, done: true };\n\
             } }; } };\n\
             [...obj].join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "0,1");
}

#[test]
fn array_length_truncation_and_holes() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var a = [1, 2, 3, 4];\n\
             a.length = 2;\n\
             a[5] = 9;\n\
             [a.length, a.join('-'), 3 in a].join('|')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "6|1-2----9|false");
}

#[test]
fn destructuring_defaults_and_rest() {
    let mut engine = engine();
    let result = engine
        .execute(
            "function f({ a = 10, ...rest }, [x, , z = 7, ...ys]) {\n\
               return [a, JSON.stringify(rest), x, z, ys.join('+')].join(',');\n\
             }\n\
             f({ b: 2 }, [1, 2])",
        )
        .unwrap();
    assert_eq!(engine.display(result), "10,{\"b\":2},1,7,");
}

#[test]
fn getters_setters_and_accessors() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var backing = 0;\n\
             var o = { get v() { return backing; }, set v(n) { backing = n * 2; } };\n\
             o.v = 21;\n\
             o.v",
        )
        .unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn labelled_break_and_continue() {
    let mut engine = engine();
    let result = engine
        .execute(
            "var out = [];\n\
             outer: for (var i = 0; i < 3; i++) {\n\
               for (var j = 0; j < 3; j++) {\n\
                 if (j === 2) continue outer;\n\
                 if (i === 2) break outer;\n\
                 out.push(i + ':' + j);\n\
               }\n\
             }\n\
             out.join(',')",
        )
        .unwrap();
    assert_eq!(engine.display(result), "0:0,0:1,1:0,1:1");
}

#[test]
fn recursion_quota_trips() {
    let mut engine = Engine::new(EngineOptions {
        max_recursion_depth: Some(64),
        ..Default::default()
    });
    let error = engine
        .execute("function f() { return f(); } f()")
        .unwrap_err();
    assert!(matches!(
        error,
        EngineError::QuotaExceeded(QuotaKind::RecursionDepth, _)
    ));
}

#[test]
fn invoke_calls_back_into_js() {
    let mut engine = engine();
    engine.execute("function add(a, b) { return a + b; }").unwrap();
    let add = engine.get_value("add").unwrap();
    let result = engine
        .invoke(add, Value::Undefined, &[Value::Integer(2), Value::Integer(40)])
        .unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn set_and_get_values_round_trip() {
    let mut engine = engine();
    let greeting = engine.alloc_string("hello");
    engine.set_value("greeting", greeting).unwrap();
    let result = engine.execute("greeting + ' world'").unwrap();
    assert_eq!(engine.display(result), "hello world");
}
