// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [16.1 Scripts](https://tc39.es/ecma262/#sec-scripts)

use core::ops::{Index, IndexMut};

use oxc_diagnostics::OxcDiagnostic;
use oxc_span::{SourceType, Span};

use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::execution_context::{ECMAScriptCode, ExecutionContext};
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_function_object;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    lexically_scoped_declarations, var_scoped_declarations, LexicallyScopedDeclaration,
    VarScopedDeclaration,
};
use crate::ecmascript::types::{HeapString, Value};
use crate::engine::evaluator::{evaluate_statements, Completion};
use crate::heap::indexes::ScriptIndex;
use crate::heap::CreateHeapData;
use oxc_ecmascript::BoundNames;

use super::source_code::SourceCode;
use super::ScriptOrModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Script(pub(crate) ScriptIndex);

/// ### [16.1.4 Script Records](https://tc39.es/ecma262/#sec-script-records)
#[derive(Debug)]
pub struct ScriptRecord {
    /// \[\[Realm]]
    pub(crate) realm: RealmIdentifier,
    /// \[\[ECMAScriptCode]], through the heap-owned source record.
    pub(crate) source_code: SourceCode,
}

impl Index<Script> for Agent {
    type Output = ScriptRecord;

    fn index(&self, index: Script) -> &Self::Output {
        self.heap
            .scripts
            .get(index.0.into_index())
            .expect("Script out of bounds")
            .as_ref()
            .expect("Script slot empty")
    }
}

impl IndexMut<Script> for Agent {
    fn index_mut(&mut self, index: Script) -> &mut Self::Output {
        self.heap
            .scripts
            .get_mut(index.0.into_index())
            .expect("Script out of bounds")
            .as_mut()
            .expect("Script slot empty")
    }
}

impl CreateHeapData<ScriptRecord, Script> for crate::Heap {
    fn create(&mut self, data: ScriptRecord) -> Script {
        self.scripts.push(Some(data));
        self.alloc_counter += core::mem::size_of::<Option<ScriptRecord>>();
        Script(ScriptIndex::last(&self.scripts))
    }
}

impl Script {
    /// ### [16.1.5 ParseScript ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parse-script)
    pub fn parse(
        agent: &mut Agent,
        source_text: String,
        realm: RealmIdentifier,
    ) -> Result<Script, Vec<OxcDiagnostic>> {
        // 1. Let script be ParseText(sourceText, Script).
        // 2. If script is a List of errors, return script.
        let source_code = SourceCode::parse_source(agent, source_text, SourceType::cjs())?;
        // 3. Return Script Record { [[Realm]]: realm, [[ECMAScriptCode]]:
        //    script, ... }.
        Ok(agent.heap.create(ScriptRecord { realm, source_code }))
    }

    /// ### [16.1.6 ScriptEvaluation ( scriptRecord )](https://tc39.es/ecma262/#sec-runtime-semantics-scriptevaluation)
    pub fn evaluate(self, agent: &mut Agent) -> JsResult<Value> {
        let realm_id = agent[self].realm;
        let source_code = agent[self].source_code;
        // 1. Let globalEnv be scriptRecord.[[Realm]].[[GlobalEnv]].
        let global_env = agent.get_realm(realm_id).global_env();
        let program = source_code.program(agent);
        let is_strict_mode = agent.options.strict
            || program
                .directives
                .iter()
                .any(|directive| directive.directive == "use strict");

        // 2-9. Push a new script execution context with the global
        //    environment as both the lexical and variable environment.
        let script_context = ExecutionContext {
            function: None,
            realm: realm_id,
            script_or_module: Some(ScriptOrModule::Script(self)),
            ecmascript_code: Some(ECMAScriptCode {
                variable_environment: EnvironmentIndex::Global(global_env),
                lexical_environment: EnvironmentIndex::Global(global_env),
                is_strict_mode,
            }),
            current_span: Span::default(),
        };
        agent.execution_context_stack.push(script_context);

        // 12. Let result be Completion(GlobalDeclarationInstantiation(script, globalEnv)).
        let result = global_declaration_instantiation(agent, self);

        // 13. If result.[[Type]] is normal, set result to Completion(Evaluation of script).
        let result = match result {
            Ok(()) => {
                let program = source_code.program(agent);
                evaluate_statements(agent, &program.body).map(|completion| match completion {
                    // b. If result is normal and result.[[Value]] is
                    //    empty, set result to NormalCompletion(undefined).
                    Completion::Normal(value) => value.unwrap_or(Value::Undefined),
                    Completion::Return(value) => value,
                    _ => Value::Undefined,
                })
            }
            Err(error) => Err(error),
        };

        // 14. Suspend scriptContext and remove it from the execution
        //    context stack.
        agent.execution_context_stack.pop();

        // 17. Return ? result.
        result
    }
}

/// ### [16.1.7 GlobalDeclarationInstantiation ( script, env )](https://tc39.es/ecma262/#sec-globaldeclarationinstantiation)
fn global_declaration_instantiation(agent: &mut Agent, script: Script) -> JsResult<()> {
    let source_code = agent[script].source_code;
    let global_env = agent.get_realm(agent[script].realm).global_env();
    let program = source_code.program(agent);

    // 1. Let lexNames be the LexicallyDeclaredNames of script.
    let mut lex_declarations = Vec::new();
    lexically_scoped_declarations(&program.body, true, &mut lex_declarations);
    // 2. Let varNames be the VarDeclaredNames of script.
    let mut var_declarations = Vec::new();
    var_scoped_declarations(&program.body, &mut var_declarations);

    // 3. For each element name of lexNames, redeclaration of an existing
    //    binding or restricted global property is a TypeError.
    let mut lex_names: Vec<HeapString> = Vec::new();
    {
        let mut collected: Vec<&str> = Vec::new();
        for declaration in &lex_declarations {
            declaration.bound_names(&mut |identifier| collected.push(identifier.name.as_str()));
        }
        let collected: Vec<String> = collected.iter().map(|s| s.to_string()).collect();
        for name in collected {
            let name = HeapString::from_str(agent, &name);
            lex_names.push(name);
        }
    }
    for name in &lex_names {
        let name = *name;
        // a. If env.HasVarDeclaration(name) is true, throw a TypeError
        //    exception.
        if global_env.has_var_declaration(agent, name)
            // b. If env.HasLexicalDeclaration(name) is true, throw a
            //    TypeError exception.
            || global_env.has_lexical_declaration(agent, name)
            // c. Let hasRestrictedGlobal be
            //    ? env.HasRestrictedGlobalProperty(name).
            || global_env.has_restricted_global_property(agent, name)?
        {
            let message = format!(
                "{} has already been declared",
                name.to_string_lossy(agent)
            );
            return Err(agent.throw_exception(
                crate::ecmascript::execution::ExceptionType::TypeError,
                &message,
            ));
        }
    }

    // 4. For each element name of varNames: a lexical declaration with
    //    the same name is a TypeError.
    let var_names: Vec<String> = {
        let mut collected: Vec<&str> = Vec::new();
        for declaration in &var_declarations {
            match declaration {
                VarScopedDeclaration::Variable(declarator) => declarator
                    .id
                    .bound_names(&mut |identifier| collected.push(identifier.name.as_str())),
                VarScopedDeclaration::Function(function) => {
                    function.bound_names(&mut |identifier| collected.push(identifier.name.as_str()))
                }
            }
        }
        collected.iter().map(|s| s.to_string()).collect()
    };
    for name in &var_names {
        let name = HeapString::from_str(agent, name);
        if global_env.has_lexical_declaration(agent, name) {
            let message = format!(
                "{} has already been declared",
                name.to_string_lossy(agent)
            );
            return Err(agent.throw_exception(
                crate::ecmascript::execution::ExceptionType::TypeError,
                &message,
            ));
        }
    }

    // 5-10. Collect functions to initialize (last declaration of a name
    //    wins) and var names, validating declarability.
    let mut declared_function_names: Vec<String> = Vec::new();
    let mut functions_to_initialize: Vec<&oxc_ast::ast::Function> = Vec::new();
    for declaration in var_declarations.iter().rev() {
        if let VarScopedDeclaration::Function(function) = declaration {
            let mut name = None;
            function.bound_names(&mut |identifier| {
                name.get_or_insert_with(|| identifier.name.as_str().to_string());
            });
            let Some(name) = name else { continue };
            if declared_function_names.contains(&name) {
                continue;
            }
            let name_string = HeapString::from_str(agent, &name);
            // a.ii.2. If fnDefinable is false, throw a TypeError exception.
            if !global_env.can_declare_global_function(agent, name_string)? {
                let message = format!("Cannot declare global function {name}");
                return Err(agent.throw_exception(
                    crate::ecmascript::execution::ExceptionType::TypeError,
                    &message,
                ));
            }
            declared_function_names.push(name);
            functions_to_initialize.insert(0, function);
        }
    }
    let mut declared_var_names: Vec<String> = Vec::new();
    for declaration in &var_declarations {
        if let VarScopedDeclaration::Variable(declarator) = declaration {
            let mut names = Vec::new();
            declarator
                .id
                .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
            for name in names {
                if declared_function_names.contains(&name) || declared_var_names.contains(&name) {
                    continue;
                }
                let name_string = HeapString::from_str(agent, &name);
                if !global_env.can_declare_global_var(agent, name_string)? {
                    let message = format!("Cannot declare global variable {name}");
                    return Err(agent.throw_exception(
                        crate::ecmascript::execution::ExceptionType::TypeError,
                        &message,
                    ));
                }
                declared_var_names.push(name);
            }
        }
    }

    // 15-16. Create the lexical bindings; const gets immutable bindings.
    for (declaration, _) in lex_declarations.iter().zip(0..) {
        let mut names: Vec<String> = Vec::new();
        declaration.bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
        let is_const = declaration.is_constant_declaration();
        for name in names {
            let name = HeapString::from_str(agent, &name);
            if is_const {
                global_env.create_immutable_binding(agent, name, true)?;
            } else {
                global_env.create_mutable_binding(agent, name, false)?;
            }
        }
    }

    // 17. For each function, instantiate it and create the global
    //    function binding.
    for function in functions_to_initialize {
        let mut name = None;
        function.bound_names(&mut |identifier| {
            name.get_or_insert_with(|| identifier.name.as_str().to_string());
        });
        let Some(name) = name else { continue };
        let env = EnvironmentIndex::Global(global_env);
        let function_object = instantiate_function_object(agent, function, env);
        let name = HeapString::from_str(agent, &name);
        global_env.create_global_function_binding(
            agent,
            name,
            function_object.into(),
            false,
        )?;
    }

    // 18. For each var name, create the global var binding.
    for name in declared_var_names {
        let name = HeapString::from_str(agent, &name);
        global_env.create_global_var_binding(agent, name, false)?;
    }

    // 19. Return UNUSED.
    Ok(())
}
