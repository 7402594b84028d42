// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.4 Execution Contexts](https://tc39.es/ecma262/#sec-execution-contexts)

use oxc_span::Span;

use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::types::{Function, HeapString};

use super::environments::EnvironmentIndex;
use super::realm::RealmIdentifier;
use super::Agent;

/// The code evaluation state of an execution context running ECMAScript
/// code.
#[derive(Debug, Clone, Copy)]
pub struct ECMAScriptCode {
    /// VariableEnvironment
    pub variable_environment: EnvironmentIndex,

    /// LexicalEnvironment
    pub lexical_environment: EnvironmentIndex,

    /// Whether the code unit this context runs is strict mode code.
    pub is_strict_mode: bool,
}

#[derive(Debug)]
pub struct ExecutionContext {
    /// Function
    ///
    /// The function object being evaluated, or None for script and module
    /// evaluation contexts.
    pub function: Option<Function>,

    /// Realm
    pub realm: RealmIdentifier,

    /// ScriptOrModule
    pub script_or_module: Option<ScriptOrModule>,

    pub ecmascript_code: Option<ECMAScriptCode>,

    /// Source span of the construct currently being evaluated, for
    /// diagnostics.
    pub current_span: Span,
}

impl ExecutionContext {
    pub(crate) fn function_name(&self, agent: &Agent) -> Option<HeapString> {
        match self.function? {
            Function::BoundFunction(f) => agent[f].name,
            Function::BuiltinFunction(f) => agent[f].initial_name,
            Function::ECMAScriptFunction(f) => agent[f].name,
        }
    }

    /// Line and column of the current span inside the active source text.
    pub(crate) fn source_position(&self, agent: &Agent) -> Option<(u32, u32)> {
        let source_code = match self.script_or_module? {
            ScriptOrModule::Script(script) => agent[script].source_code,
            ScriptOrModule::Module(module) => agent[module].source_code,
        };
        let source = source_code.source_text(agent);
        let offset = (self.current_span.start as usize).min(source.len());
        let mut line = 1u32;
        let mut column = 1u32;
        for byte in source.as_bytes()[..offset].iter() {
            if *byte == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Some((line, column))
    }
}
