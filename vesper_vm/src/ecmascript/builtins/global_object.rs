// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [19.2 Function Properties of the Global Object](https://tc39.es/ecma262/#sec-function-properties-of-the-global-object)
//!
//! `eval`, the numeric parsers, the URI coders and %ThrowTypeError%.

use oxc_ecmascript::BoundNames;
use oxc_span::SourceType;

use crate::ecmascript::abstract_operations::type_conversion::{to_number, to_string};
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::declarative_environment::new_declarative_environment;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::execution_context::{ECMAScriptCode, ExecutionContext};
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::scripts_and_modules::script::{Script, ScriptRecord};
use crate::ecmascript::scripts_and_modules::source_code::SourceCode;
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    var_scoped_declarations, VarScopedDeclaration,
};
use crate::ecmascript::types::{HeapString, Value};
use crate::engine::evaluator::{evaluate_statements, Completion};
use crate::heap::CreateHeapData;

pub(crate) struct EvalFunction;
impl Builtin for EvalFunction {
    const NAME: &'static str = "eval";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(EvalFunction::behaviour);
}

impl EvalFunction {
    /// ### [19.2.1 eval ( x )](https://tc39.es/ecma262/#sec-eval-x)
    ///
    /// The indirect form: evaluated in the realm's global scope.
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let x = arguments.get(0);
        let Value::String(source) = x else {
            return Ok(x);
        };
        let source = source.to_string_lossy(agent).into_owned();
        perform_eval(agent, source)
    }
}

/// PerformEval in the global scope: parse as a script of the current realm
/// and run it.
pub(crate) fn perform_eval(agent: &mut Agent, source: String) -> JsResult<Value> {
    let realm = agent.current_realm_id();
    let script = match Script::parse(agent, source, realm) {
        Ok(script) => script,
        Err(errors) => {
            let message = errors
                .first()
                .map(|error| error.to_string())
                .unwrap_or_else(|| "Failed to parse eval source".to_string());
            return Err(agent.throw_exception(ExceptionType::SyntaxError, &message));
        }
    };
    script.evaluate(agent)
}

/// ### [19.2.1.1 PerformEval ( x, strictCaller, direct )](https://tc39.es/ecma262/#sec-performeval), direct flavour
///
/// Direct eval runs in the caller's environment: a fresh lexical scope
/// over the caller's lexical environment, with var declarations landing in
/// the caller's variable environment.
pub(crate) fn perform_direct_eval(agent: &mut Agent, arguments: &[Value]) -> JsResult<Value> {
    let x = arguments.first().copied().unwrap_or(Value::Undefined);
    let Value::String(source) = x else {
        return Ok(x);
    };
    let source = source.to_string_lossy(agent).into_owned();
    let source_code = match SourceCode::parse_source(agent, source, SourceType::cjs()) {
        Ok(source_code) => source_code,
        Err(errors) => {
            let message = errors
                .first()
                .map(|error| error.to_string())
                .unwrap_or_else(|| "Failed to parse eval source".to_string());
            return Err(agent.throw_exception(ExceptionType::SyntaxError, &message));
        }
    };
    let realm = agent.current_realm_id();
    let script = agent.heap.create(ScriptRecord { realm, source_code });

    let strict_caller = agent.is_strict_code();
    let variable_environment = agent.current_variable_environment();
    let lexical_outer = agent.current_lexical_environment();
    let eval_env = new_declarative_environment(agent, Some(lexical_outer));
    let eval_env = EnvironmentIndex::Declarative(eval_env);
    // Strict eval keeps its var declarations to itself.
    let variable_environment = if strict_caller {
        eval_env
    } else {
        variable_environment
    };

    let eval_context = ExecutionContext {
        function: None,
        realm,
        script_or_module: Some(ScriptOrModule::Script(script)),
        ecmascript_code: Some(ECMAScriptCode {
            variable_environment,
            lexical_environment: eval_env,
            is_strict_mode: strict_caller,
        }),
        current_span: oxc_span::Span::default(),
    };
    agent.execution_context_stack.push(eval_context);

    let result = eval_declaration_instantiation(agent, script).and_then(|()| {
        let program = source_code.program(agent);
        evaluate_statements(agent, &program.body).map(|completion| match completion {
            Completion::Normal(value) => value.unwrap_or(Value::Undefined),
            Completion::Return(value) => value,
            _ => Value::Undefined,
        })
    });

    agent.execution_context_stack.pop();
    result
}

/// ### [19.2.1.3 EvalDeclarationInstantiation](https://tc39.es/ecma262/#sec-evaldeclarationinstantiation)
fn eval_declaration_instantiation(agent: &mut Agent, script: Script) -> JsResult<()> {
    use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_function_object;
    let source_code = agent[script].source_code;
    let program = source_code.program(agent);
    let variable_environment = agent.current_variable_environment();
    let lexical_environment = agent.current_lexical_environment();

    let mut var_declarations = Vec::new();
    var_scoped_declarations(&program.body, &mut var_declarations);
    let mut declared: Vec<String> = Vec::new();
    let mut functions = Vec::new();
    for declaration in &var_declarations {
        match declaration {
            VarScopedDeclaration::Variable(declarator) => {
                declarator.id.bound_names(&mut |identifier| {
                    declared.push(identifier.name.as_str().to_string());
                });
            }
            VarScopedDeclaration::Function(function) => functions.push(*function),
        }
    }
    for name in declared {
        let name = HeapString::from_str(agent, &name);
        if !variable_environment.has_binding(agent, name)? {
            variable_environment.create_mutable_binding(agent, name, true)?;
            variable_environment.initialize_binding(agent, name, Value::Undefined)?;
        }
    }
    // Lexical declarations live in the fresh eval scope.
    let mut lex_declarations = Vec::new();
    crate::ecmascript::syntax_directed_operations::scope_analysis::lexically_scoped_declarations(
        &program.body,
        true,
        &mut lex_declarations,
    );
    for declaration in &lex_declarations {
        let is_const = declaration.is_constant_declaration();
        let mut names = Vec::new();
        declaration.bound_names(&mut |identifier| {
            names.push(identifier.name.as_str().to_string());
        });
        for name in names {
            let name = HeapString::from_str(agent, &name);
            if is_const {
                lexical_environment.create_immutable_binding(agent, name, true)?;
            } else {
                lexical_environment.create_mutable_binding(agent, name, false)?;
            }
        }
    }
    for function in functions {
        let mut name = None;
        function.bound_names(&mut |identifier| {
            name.get_or_insert_with(|| identifier.name.as_str().to_string());
        });
        let function_object = instantiate_function_object(agent, function, lexical_environment);
        if let Some(name) = name {
            let name = HeapString::from_str(agent, &name);
            if variable_environment.has_binding(agent, name)? {
                variable_environment.set_mutable_binding(
                    agent,
                    name,
                    function_object.into(),
                    false,
                )?;
            } else {
                variable_environment.create_mutable_binding(agent, name, true)?;
                variable_environment.initialize_binding(agent, name, function_object.into())?;
            }
        }
    }
    Ok(())
}

pub(crate) struct ThrowTypeError;
impl Builtin for ThrowTypeError {
    const NAME: &'static str = "";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ThrowTypeError::behaviour);
}

impl ThrowTypeError {
    /// ### [10.2.4.1 %ThrowTypeError% ( )](https://tc39.es/ecma262/#sec-%throwtypeerror%)
    fn behaviour(agent: &mut Agent, _this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        Err(agent.throw_exception(
            ExceptionType::TypeError,
            "'caller', 'callee', and 'arguments' properties may not be accessed on strict mode functions",
        ))
    }
}

pub(crate) struct ParseIntFunction;
impl Builtin for ParseIntFunction {
    const NAME: &'static str = "parseInt";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ParseIntFunction::behaviour);
}

impl ParseIntFunction {
    /// ### [19.2.5 parseInt ( string, radix )](https://tc39.es/ecma262/#sec-parseint-string-radix)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let input = to_string(agent, arguments.get(0))?;
        let input = input.to_string_lossy(agent).into_owned();
        let radix = crate::ecmascript::abstract_operations::type_conversion::to_int32(
            agent,
            arguments.get(1),
        )?;
        let trimmed = input.trim_start_matches(
            crate::ecmascript::types::language::bigint::is_trimmable_whitespace,
        );
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let mut radix = radix;
        let mut rest = rest;
        let mut strip_prefix = true;
        if radix != 0 {
            if !(2..=36).contains(&radix) {
                return Ok(Value::nan());
            }
            if radix != 16 {
                strip_prefix = false;
            }
        } else {
            radix = 10;
        }
        if strip_prefix {
            if let Some(stripped) = rest
                .strip_prefix("0x")
                .or_else(|| rest.strip_prefix("0X"))
            {
                rest = stripped;
                radix = 16;
            }
        }
        // The longest prefix of valid digits.
        let digits: String = rest
            .chars()
            .take_while(|c| c.to_digit(radix as u32).is_some())
            .collect();
        if digits.is_empty() {
            return Ok(Value::nan());
        }
        let mut value = 0.0f64;
        for c in digits.chars() {
            value = value * radix as f64 + c.to_digit(radix as u32).unwrap() as f64;
        }
        Ok(Value::from_f64(sign * value))
    }
}

pub(crate) struct ParseFloatFunction;
impl Builtin for ParseFloatFunction {
    const NAME: &'static str = "parseFloat";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ParseFloatFunction::behaviour);
}

impl ParseFloatFunction {
    /// ### [19.2.4 parseFloat ( string )](https://tc39.es/ecma262/#sec-parsefloat-string)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let input = to_string(agent, arguments.get(0))?;
        let input = input.to_string_lossy(agent).into_owned();
        let trimmed = input.trim_start_matches(
            crate::ecmascript::types::language::bigint::is_trimmable_whitespace,
        );
        // The longest prefix satisfying StrDecimalLiteral.
        let mut end = 0usize;
        let bytes = trimmed.as_bytes();
        let mut position = 0usize;
        if matches!(bytes.get(position), Some(b'+') | Some(b'-')) {
            position += 1;
        }
        if trimmed[position..].starts_with("Infinity") {
            end = position + "Infinity".len();
        } else {
            let mut seen_digit = false;
            while matches!(bytes.get(position), Some(b'0'..=b'9')) {
                position += 1;
                seen_digit = true;
            }
            if bytes.get(position) == Some(&b'.') {
                position += 1;
                while matches!(bytes.get(position), Some(b'0'..=b'9')) {
                    position += 1;
                    seen_digit = true;
                }
            }
            if seen_digit {
                end = position;
                if matches!(bytes.get(position), Some(b'e') | Some(b'E')) {
                    let mut exponent_position = position + 1;
                    if matches!(bytes.get(exponent_position), Some(b'+') | Some(b'-')) {
                        exponent_position += 1;
                    }
                    if matches!(bytes.get(exponent_position), Some(b'0'..=b'9')) {
                        while matches!(bytes.get(exponent_position), Some(b'0'..=b'9')) {
                            exponent_position += 1;
                        }
                        end = exponent_position;
                    }
                }
            }
        }
        if end == 0 {
            return Ok(Value::nan());
        }
        let text = &trimmed[..end];
        let value = if text.ends_with("Infinity") {
            if text.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            text.parse::<f64>().unwrap_or(f64::NAN)
        };
        Ok(Value::from_f64(value))
    }
}

pub(crate) struct IsNaNFunction;
impl Builtin for IsNaNFunction {
    const NAME: &'static str = "isNaN";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(IsNaNFunction::behaviour);
}

impl IsNaNFunction {
    /// ### [19.2.3 isNaN ( number )](https://tc39.es/ecma262/#sec-isnan-number)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let number = to_number(agent, arguments.get(0))?;
        Ok(Value::Boolean(number.is_nan()))
    }
}

pub(crate) struct IsFiniteFunction;
impl Builtin for IsFiniteFunction {
    const NAME: &'static str = "isFinite";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(IsFiniteFunction::behaviour);
}

impl IsFiniteFunction {
    /// ### [19.2.2 isFinite ( number )](https://tc39.es/ecma262/#sec-isfinite-number)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let number = to_number(agent, arguments.get(0))?;
        Ok(Value::Boolean(number.is_finite()))
    }
}

/// Characters left intact by encodeURI.
fn is_uri_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c)
}

fn is_uri_reserved(c: char) -> bool {
    ";/?:@&=+$,#".contains(c)
}

fn encode_uri_impl(agent: &mut Agent, value: Value, preserve_reserved: bool) -> JsResult<Value> {
    let input = to_string(agent, value)?;
    let input = input.to_string_lossy(agent).into_owned();
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if is_uri_unreserved(c) || (preserve_reserved && is_uri_reserved(c)) {
            out.push(c);
        } else {
            let mut buffer = [0u8; 4];
            for byte in c.encode_utf8(&mut buffer).as_bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    Ok(Value::from_string(agent, out))
}

fn decode_uri_impl(agent: &mut Agent, value: Value, preserve_reserved: bool) -> JsResult<Value> {
    let input = to_string(agent, value)?;
    let input = input.to_string_lossy(agent).into_owned();
    let bytes = input.as_bytes();
    let mut decoded: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut position = 0usize;
    while position < bytes.len() {
        if bytes[position] == b'%' {
            let hex = bytes
                .get(position + 1..position + 3)
                .and_then(|pair| core::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok());
            let Some(byte) = hex else {
                return Err(agent.throw_exception(ExceptionType::UriError, "URI malformed"));
            };
            if preserve_reserved && is_uri_reserved(byte as char) {
                decoded.extend_from_slice(&bytes[position..position + 3]);
            } else {
                decoded.push(byte);
            }
            position += 3;
        } else {
            decoded.push(bytes[position]);
            position += 1;
        }
    }
    match String::from_utf8(decoded) {
        Ok(text) => Ok(Value::from_string(agent, text)),
        Err(_) => Err(agent.throw_exception(ExceptionType::UriError, "URI malformed")),
    }
}

pub(crate) struct EncodeUriFunction;
impl Builtin for EncodeUriFunction {
    const NAME: &'static str = "encodeURI";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(EncodeUriFunction::behaviour);
}

impl EncodeUriFunction {
    /// ### [19.2.6.4 encodeURI ( uri )](https://tc39.es/ecma262/#sec-encodeuri-uri)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        encode_uri_impl(agent, arguments.get(0), true)
    }
}

pub(crate) struct EncodeUriComponentFunction;
impl Builtin for EncodeUriComponentFunction {
    const NAME: &'static str = "encodeURIComponent";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(EncodeUriComponentFunction::behaviour);
}

impl EncodeUriComponentFunction {
    /// ### [19.2.6.5 encodeURIComponent ( uriComponent )](https://tc39.es/ecma262/#sec-encodeuricomponent-uricomponent)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        encode_uri_impl(agent, arguments.get(0), false)
    }
}

pub(crate) struct DecodeUriFunction;
impl Builtin for DecodeUriFunction {
    const NAME: &'static str = "decodeURI";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DecodeUriFunction::behaviour);
}

impl DecodeUriFunction {
    /// ### [19.2.6.2 decodeURI ( encodedURI )](https://tc39.es/ecma262/#sec-decodeuri-encodeduri)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        decode_uri_impl(agent, arguments.get(0), true)
    }
}

pub(crate) struct DecodeUriComponentFunction;
impl Builtin for DecodeUriComponentFunction {
    const NAME: &'static str = "decodeURIComponent";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DecodeUriComponentFunction::behaviour);
}

impl DecodeUriComponentFunction {
    /// ### [19.2.6.3 decodeURIComponent ( encodedURIComponent )](https://tc39.es/ecma262/#sec-decodeuricomponent-encodeduricomponent)
    fn behaviour(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        decode_uri_impl(agent, arguments.get(0), false)
    }
}
