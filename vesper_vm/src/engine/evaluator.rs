// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The tree-walking evaluator: statements and completions.
//!
//! Every statement evaluator returns a [`Completion`]; `throw` travels the
//! `Err` channel of [`JsResult`] as a completion value, never a host
//! panic. Generator suspensions unwind through the same channel and are
//! intercepted at each statement level to record the resume path.

pub(crate) mod class_evaluation;
pub(crate) mod destructuring;
pub(crate) mod expression;
pub(crate) mod for_in_of;

use oxc_ast::ast::{self, Statement};
use oxc_ecmascript::BoundNames;

use crate::ecmascript::builtins::arguments::create_unmapped_arguments_object;
use crate::ecmascript::builtins::ecmascript_function::{ECMAScriptFunction, ThisMode};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::declarative_environment::new_declarative_environment;
use crate::ecmascript::execution::environments::object_environment::new_object_environment;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_function_object;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    lexically_scoped_declarations, var_scoped_declarations, LexicallyScopedDeclaration,
    VarScopedDeclaration,
};
use crate::ecmascript::types::{Function, HeapString, Value};
use crate::engine::coroutine::{AbruptKind, FinallyPrior, PathSegment};

use expression::evaluate_expression;

/// ### [6.2.4 The Completion Record Specification Type](https://tc39.es/ecma262/#sec-completion-record-specification-type)
///
/// The non-throw completions; throw completions travel as `Err`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Completion {
    Normal(Option<Value>),
    Break {
        label: Option<HeapString>,
        value: Option<Value>,
    },
    Continue {
        label: Option<HeapString>,
        value: Option<Value>,
    },
    Return(Value),
}

impl Completion {
    pub(crate) fn value(self) -> Option<Value> {
        match self {
            Completion::Normal(value) => value,
            Completion::Break { value, .. } | Completion::Continue { value, .. } => value,
            Completion::Return(value) => Some(value),
        }
    }

    fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }
}

/// Evaluate a statement list, tracking the list's completion value.
pub(crate) fn evaluate_statements(
    agent: &mut Agent,
    statements: &[Statement],
) -> JsResult<Completion> {
    let mut index = 0usize;
    let mut last_value: Option<Value> = None;

    // Resuming a generator: jump to the recorded statement index.
    if agent.generator_is_resuming() {
        if let Some(PathSegment::Index(resume_index)) = agent.generator_pop_segment() {
            index = resume_index as usize;
        }
    }

    while index < statements.len() {
        let statement = &statements[index];
        let result = evaluate_statement(agent, statement);
        match result {
            Ok(Completion::Normal(value)) => {
                if value.is_some() {
                    last_value = value;
                }
                agent.generator_reset_replay();
            }
            Ok(abrupt) => {
                // UpdateEmpty: an abrupt completion with no value carries
                // the list's value so far.
                agent.generator_reset_replay();
                return Ok(match abrupt {
                    Completion::Break { label, value } => Completion::Break {
                        label,
                        value: value.or(last_value),
                    },
                    Completion::Continue { label, value } => Completion::Continue {
                        label,
                        value: value.or(last_value),
                    },
                    other => other,
                });
            }
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::Index(index as u32));
                return Err(JsError::Suspend(value));
            }
            Err(error) => return Err(error),
        }
        index += 1;
    }
    Ok(Completion::Normal(last_value))
}

/// Dispatch on statement kind.
pub(crate) fn evaluate_statement(
    agent: &mut Agent,
    statement: &Statement,
) -> JsResult<Completion> {
    agent.note_statement(statement_span(statement))?;
    agent.generator_begin_statement();
    match statement {
        Statement::ExpressionStatement(statement) => {
            let value = evaluate_expression(agent, &statement.expression)?;
            Ok(Completion::Normal(Some(value)))
        }
        Statement::VariableDeclaration(declaration) => {
            evaluate_variable_declaration(agent, declaration)?;
            Ok(Completion::Normal(None))
        }
        // Function declarations were instantiated during hoisting.
        Statement::FunctionDeclaration(_) => Ok(Completion::Normal(None)),
        Statement::ClassDeclaration(class) => {
            class_evaluation::evaluate_class_declaration(agent, class)?;
            Ok(Completion::Normal(None))
        }
        Statement::EmptyStatement(_) => Ok(Completion::Normal(None)),
        Statement::DebuggerStatement(_) => Ok(Completion::Normal(None)),
        Statement::BlockStatement(block) => evaluate_block(agent, &block.body),
        Statement::IfStatement(statement) => evaluate_if(agent, statement),
        Statement::ReturnStatement(statement) => {
            // 14.10.1: evaluate the argument, then unwind to the function.
            let value = match &statement.argument {
                Some(argument) => evaluate_expression(agent, argument)?,
                None => Value::Undefined,
            };
            Ok(Completion::Return(value))
        }
        Statement::ThrowStatement(statement) => {
            let value = evaluate_expression(agent, &statement.argument)?;
            Err(JsError::Thrown(value))
        }
        Statement::BreakStatement(statement) => Ok(Completion::Break {
            label: statement
                .label
                .as_ref()
                .map(|label| HeapString::from_str(agent, label.name.as_str())),
            value: None,
        }),
        Statement::ContinueStatement(statement) => Ok(Completion::Continue {
            label: statement
                .label
                .as_ref()
                .map(|label| HeapString::from_str(agent, label.name.as_str())),
            value: None,
        }),
        Statement::WhileStatement(statement) => evaluate_while(agent, statement, &[]),
        Statement::DoWhileStatement(statement) => evaluate_do_while(agent, statement, &[]),
        Statement::ForStatement(statement) => evaluate_for(agent, statement, &[]),
        Statement::ForInStatement(statement) => {
            for_in_of::evaluate_for_in(agent, statement, &[])
        }
        Statement::ForOfStatement(statement) => {
            for_in_of::evaluate_for_of(agent, statement, &[])
        }
        Statement::LabeledStatement(statement) => evaluate_labelled(agent, statement, Vec::new()),
        Statement::SwitchStatement(statement) => evaluate_switch(agent, statement, &[]),
        Statement::TryStatement(statement) => evaluate_try(agent, statement),
        Statement::WithStatement(statement) => evaluate_with(agent, statement),
        // Imports were wired during linking.
        Statement::ImportDeclaration(_) | Statement::ExportAllDeclaration(_) => {
            Ok(Completion::Normal(None))
        }
        // An export with an inline declaration still evaluates it.
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(declaration) => evaluate_exported_declaration(agent, declaration),
            None => Ok(Completion::Normal(None)),
        },
        Statement::ExportDefaultDeclaration(export) => {
            evaluate_export_default(agent, export)
        }
        _ => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Unsupported statement kind",
        )),
    }
}

fn statement_span(statement: &Statement) -> oxc_span::Span {
    use oxc_span::GetSpan;
    statement.span()
}

fn evaluate_exported_declaration(
    agent: &mut Agent,
    declaration: &ast::Declaration,
) -> JsResult<Completion> {
    match declaration {
        ast::Declaration::VariableDeclaration(decl) => {
            evaluate_variable_declaration(agent, decl)?;
        }
        // Function declarations are hoisted; classes evaluate in place.
        ast::Declaration::FunctionDeclaration(_) => {}
        ast::Declaration::ClassDeclaration(class) => {
            class_evaluation::evaluate_class_declaration(agent, class)?;
        }
        _ => {}
    }
    Ok(Completion::Normal(None))
}

fn evaluate_export_default(
    agent: &mut Agent,
    export: &ast::ExportDefaultDeclaration,
) -> JsResult<Completion> {
    let default_name = HeapString::from_static_str(agent, "*default*");
    let env = agent.current_lexical_environment();
    match &export.declaration {
        ast::ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
            if function.id.is_some() {
                // Named default functions were hoisted under their own
                // name; alias the *default* binding.
                let mut name = None;
                function.bound_names(&mut |identifier| {
                    name.get_or_insert_with(|| identifier.name.as_str().to_string());
                });
                let name = HeapString::from_str(agent, &name.unwrap());
                let value = env.get_binding_value(agent, name, true)?;
                initialize_hoisted_default(agent, env, default_name, value)?;
            } else {
                let function_object = instantiate_function_object(agent, function, env);
                initialize_hoisted_default(agent, env, default_name, function_object.into())?;
            }
        }
        ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            let value = class_evaluation::evaluate_class(agent, class, Some(default_name))?;
            match &class.id {
                Some(_) => {
                    class_evaluation::bind_class_declaration(agent, class, value)?;
                    initialize_hoisted_default(agent, env, default_name, value)?;
                }
                None => initialize_hoisted_default(agent, env, default_name, value)?,
            }
        }
        declaration => {
            // export default <expression>
            let expression = declaration
                .as_expression()
                .expect("default export is an expression");
            let value = evaluate_expression(agent, expression)?;
            initialize_hoisted_default(agent, env, default_name, value)?;
        }
    }
    Ok(Completion::Normal(None))
}

fn initialize_hoisted_default(
    agent: &mut Agent,
    env: EnvironmentIndex,
    name: HeapString,
    value: Value,
) -> JsResult<()> {
    if !env.has_binding(agent, name)? {
        env.create_mutable_binding(agent, name, false)?;
    }
    // The binding may still be uninitialized (hoisted lexical) or already
    // carry a value; assignment first, initialization as the fallback.
    match env.set_mutable_binding(agent, name, value, false) {
        Ok(()) => Ok(()),
        Err(_) => env.initialize_binding(agent, name, value),
    }
}

/// ### [14.3.2 Variable Statement / 14.3.1 Let and Const Declarations](https://tc39.es/ecma262/#sec-variable-statement)
fn evaluate_variable_declaration(
    agent: &mut Agent,
    declaration: &ast::VariableDeclaration,
) -> JsResult<()> {
    let is_lexical = !declaration.kind.is_var();
    for declarator in declaration.declarations.iter() {
        match &declarator.init {
            Some(init) => {
                let value = if let ast::BindingPatternKind::BindingIdentifier(identifier) =
                    &declarator.id.kind
                {
                    let name = Some(HeapString::from_str(agent, identifier.name.as_str()));
                    expression::evaluate_with_name(agent, init, name)?
                } else {
                    evaluate_expression(agent, init)?
                };
                if is_lexical {
                    destructuring::binding_initialization(
                        agent,
                        &declarator.id,
                        value,
                        BindingTarget::Initialize,
                    )?;
                } else {
                    destructuring::binding_initialization(
                        agent,
                        &declarator.id,
                        value,
                        BindingTarget::Put,
                    )?;
                }
            }
            None => {
                // let x; initializes to undefined; var x; does nothing.
                if is_lexical {
                    if let ast::BindingPatternKind::BindingIdentifier(identifier) =
                        &declarator.id.kind
                    {
                        let name = HeapString::from_str(agent, identifier.name.as_str());
                        let env = agent.current_lexical_environment();
                        env.initialize_binding(agent, name, Value::Undefined)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// How a binding pattern writes its names: initializing pre-created
/// bindings or assigning through references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingTarget {
    /// Initialize a pre-created, uninitialized binding.
    Initialize,
    /// Initialize when uninitialized, otherwise overwrite (parameters
    /// with duplicate names).
    InitializeOrSet,
    /// Resolve the name and assign through the reference.
    Put,
}

/// ### [14.2.2 Block Evaluation](https://tc39.es/ecma262/#sec-block-runtime-semantics-evaluation)
fn evaluate_block(agent: &mut Agent, body: &[Statement]) -> JsResult<Completion> {
    if agent.generator_is_resuming() {
        let Some(PathSegment::Block { outer_env }) = agent.generator_pop_segment() else {
            unreachable!("resume path disagrees with block structure");
        };
        let result = evaluate_statements(agent, body);
        return finish_block(agent, result, outer_env);
    }
    // 1. Let oldEnv be the running execution context's LexicalEnvironment.
    let old_env = agent.current_lexical_environment();
    // 2. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
    let block_env = new_declarative_environment(agent, Some(old_env));
    let block_env = EnvironmentIndex::Declarative(block_env);
    // 3. Perform BlockDeclarationInstantiation(StatementList, blockEnv).
    block_declaration_instantiation(agent, body, block_env)?;
    // 4. Set the running execution context's LexicalEnvironment to
    //    blockEnv.
    agent.set_lexical_environment(block_env);
    // 5. Let blockValue be Completion(Evaluation of StatementList).
    let result = evaluate_statements(agent, body);
    // 6. Restore the LexicalEnvironment.
    finish_block(agent, result, old_env)
}

fn finish_block(
    agent: &mut Agent,
    result: JsResult<Completion>,
    old_env: EnvironmentIndex,
) -> JsResult<Completion> {
    if let Err(JsError::Suspend(value)) = result {
        agent.generator_record_segment(PathSegment::Block { outer_env: old_env });
        return Err(JsError::Suspend(value));
    }
    agent.set_lexical_environment(old_env);
    result
}

/// ### [14.2.3 BlockDeclarationInstantiation ( code, env )](https://tc39.es/ecma262/#sec-blockdeclarationinstantiation)
pub(crate) fn block_declaration_instantiation(
    agent: &mut Agent,
    body: &[Statement],
    env: EnvironmentIndex,
) -> JsResult<()> {
    let mut declarations = Vec::new();
    lexically_scoped_declarations(body, false, &mut declarations);
    // Create the bindings first; block-scoped functions initialize
    // immediately after.
    let mut function_declarations = Vec::new();
    for declaration in &declarations {
        let is_const = declaration.is_constant_declaration();
        let mut names = Vec::new();
        declaration.bound_names(&mut |identifier| {
            names.push(identifier.name.as_str().to_string());
        });
        for name in names {
            let name = HeapString::from_str(agent, &name);
            if is_const {
                env.create_immutable_binding(agent, name, true)?;
            } else {
                env.create_mutable_binding(agent, name, false)?;
            }
        }
        if let LexicallyScopedDeclaration::Function(function) = declaration {
            function_declarations.push(*function);
        }
    }
    for function in function_declarations {
        let function_object = instantiate_function_object(agent, function, env);
        let mut name = None;
        function.bound_names(&mut |identifier| {
            name.get_or_insert_with(|| identifier.name.as_str().to_string());
        });
        if let Some(name) = name {
            let name = HeapString::from_str(agent, &name);
            env.initialize_binding(agent, name, function_object.into())?;
        }
    }
    Ok(())
}

/// ### [14.6.2 If Statement Evaluation](https://tc39.es/ecma262/#sec-if-statement-runtime-semantics-evaluation)
fn evaluate_if(agent: &mut Agent, statement: &ast::IfStatement) -> JsResult<Completion> {
    if agent.generator_is_resuming() {
        match agent.generator_pop_segment() {
            Some(PathSegment::IfConsequent) => {
                let result = evaluate_statement(agent, &statement.consequent);
                return intercept_branch(agent, result, PathSegment::IfConsequent);
            }
            Some(PathSegment::IfAlternate) => {
                let alternate = statement.alternate.as_ref().unwrap();
                let result = evaluate_statement(agent, alternate);
                return intercept_branch(agent, result, PathSegment::IfAlternate);
            }
            _ => unreachable!("resume path disagrees with if structure"),
        }
    }
    // 1-2. Evaluate the test and branch.
    let test = evaluate_expression(agent, &statement.test)?;
    let test = crate::ecmascript::abstract_operations::type_conversion::to_boolean(agent, test);
    if test {
        let result = evaluate_statement(agent, &statement.consequent);
        intercept_branch(agent, result, PathSegment::IfConsequent)
    } else if let Some(alternate) = &statement.alternate {
        let result = evaluate_statement(agent, alternate);
        intercept_branch(agent, result, PathSegment::IfAlternate)
    } else {
        // 3. Return NormalCompletion(undefined) for a missing branch.
        Ok(Completion::Normal(Some(Value::Undefined)))
    }
}

fn intercept_branch(
    agent: &mut Agent,
    result: JsResult<Completion>,
    segment: PathSegment,
) -> JsResult<Completion> {
    if let Err(JsError::Suspend(value)) = result {
        agent.generator_record_segment(segment);
        return Err(JsError::Suspend(value));
    }
    result
}

/// Whether a loop should absorb this completion: continue with a matching
/// (or no) label continues iteration, break ends the loop.
fn loop_continues(completion: &Completion, labels: &[HeapString]) -> LoopFlow {
    match completion {
        Completion::Normal(_) => LoopFlow::Continue,
        Completion::Continue { label: None, .. } => LoopFlow::Continue,
        Completion::Continue {
            label: Some(label), ..
        } if labels.contains(label) => LoopFlow::Continue,
        Completion::Break { label: None, .. } => LoopFlow::Break,
        Completion::Break {
            label: Some(label),
            ..
        } if labels.contains(label) => LoopFlow::Break,
        _ => LoopFlow::Propagate,
    }
}

enum LoopFlow {
    Continue,
    Break,
    Propagate,
}

/// ### [14.7.3 The while Statement](https://tc39.es/ecma262/#sec-while-statement)
fn evaluate_while(
    agent: &mut Agent,
    statement: &ast::WhileStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    let mut last_value: Option<Value> = None;
    let mut resuming_body = false;
    let mut resuming_test = false;
    if agent.generator_is_resuming() {
        match agent.generator_pop_segment() {
            Some(PathSegment::LoopBody) => resuming_body = true,
            Some(PathSegment::ForTest) => resuming_test = true,
            _ => unreachable!("resume path disagrees with while structure"),
        }
    }
    loop {
        if !resuming_body {
            if !resuming_test {
                agent.generator_reset_replay();
            }
            resuming_test = false;
            let test = match evaluate_expression(agent, &statement.test) {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::ForTest);
                    return Err(JsError::Suspend(value));
                }
                other => other?,
            };
            let test =
                crate::ecmascript::abstract_operations::type_conversion::to_boolean(agent, test);
            if !test {
                return Ok(Completion::Normal(last_value));
            }
            agent.generator_reset_replay();
        }
        resuming_body = false;
        let result = evaluate_statement(agent, &statement.body);
        let completion = match result {
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::LoopBody);
                return Err(JsError::Suspend(value));
            }
            other => other?,
        };
        if let Some(value) = completion.value() {
            last_value = Some(value);
        }
        match loop_continues(&completion, labels) {
            LoopFlow::Continue => {}
            LoopFlow::Break => return Ok(Completion::Normal(last_value)),
            LoopFlow::Propagate => return Ok(completion),
        }
    }
}

/// ### [14.7.2 The do-while Statement](https://tc39.es/ecma262/#sec-do-while-statement)
fn evaluate_do_while(
    agent: &mut Agent,
    statement: &ast::DoWhileStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    let mut last_value: Option<Value> = None;
    let mut resuming_body = false;
    let mut resuming_test = false;
    if agent.generator_is_resuming() {
        match agent.generator_pop_segment() {
            Some(PathSegment::LoopBody) => resuming_body = true,
            Some(PathSegment::ForTest) => resuming_test = true,
            _ => unreachable!("resume path disagrees with do-while structure"),
        }
    }
    loop {
        if !resuming_test {
            if !resuming_body {
                agent.generator_reset_replay();
            }
            resuming_body = false;
            let result = evaluate_statement(agent, &statement.body);
            let completion = match result {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::LoopBody);
                    return Err(JsError::Suspend(value));
                }
                other => other?,
            };
            if let Some(value) = completion.value() {
                last_value = Some(value);
            }
            match loop_continues(&completion, labels) {
                LoopFlow::Continue => {}
                LoopFlow::Break => return Ok(Completion::Normal(last_value)),
                LoopFlow::Propagate => return Ok(completion),
            }
            agent.generator_reset_replay();
        }
        resuming_test = false;
        let test = match evaluate_expression(agent, &statement.test) {
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::ForTest);
                return Err(JsError::Suspend(value));
            }
            other => other?,
        };
        let test = crate::ecmascript::abstract_operations::type_conversion::to_boolean(agent, test);
        if !test {
            return Ok(Completion::Normal(last_value));
        }
    }
}

/// ### [14.7.4 The for Statement](https://tc39.es/ecma262/#sec-for-statement)
fn evaluate_for(
    agent: &mut Agent,
    statement: &ast::ForStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    let old_env = agent.current_lexical_environment();
    let mut per_iteration_names: Vec<HeapString> = Vec::new();

    if agent.generator_is_resuming() {
        // Re-enter the loop mid-iteration; the environments live on
        // through the restored context.
        per_iteration_names = collect_per_iteration_names(agent, statement);
        let (resume, outer_env) = match agent.generator_pop_segment() {
            Some(PathSegment::ForBody { outer_env, .. }) => (ForResume::Body, outer_env),
            Some(PathSegment::ForTest) => (ForResume::Test, old_env),
            Some(PathSegment::ForUpdate) => (ForResume::Update, old_env),
            _ => unreachable!("resume path disagrees with for structure"),
        };
        return for_loop_iterations(
            agent,
            statement,
            labels,
            outer_env,
            per_iteration_names,
            resume,
        );
    }

    // 1. Run the initializer, in a fresh loop environment for lexical
    //    declarations.
    match &statement.init {
        Some(ast::ForStatementInit::VariableDeclaration(declaration)) => {
            if declaration.kind.is_var() {
                evaluate_variable_declaration(agent, declaration)?;
            } else {
                let loop_env = new_declarative_environment(agent, Some(old_env));
                let loop_env = EnvironmentIndex::Declarative(loop_env);
                let is_const = declaration.kind.is_const();
                let mut names = Vec::new();
                declaration
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
                for name in &names {
                    let name = HeapString::from_str(agent, name);
                    if is_const {
                        loop_env.create_immutable_binding(agent, name, true)?;
                    } else {
                        loop_env.create_mutable_binding(agent, name, false)?;
                        per_iteration_names.push(name);
                    }
                }
                agent.set_lexical_environment(loop_env);
                let init_result = evaluate_variable_declaration(agent, declaration);
                if let Err(error) = init_result {
                    agent.set_lexical_environment(old_env);
                    return Err(error);
                }
            }
        }
        Some(init) => {
            let init = init.as_expression().expect("non-declaration for-init");
            evaluate_expression(agent, init)?;
        }
        None => {}
    }

    // 2. Per-iteration copies of the let bindings.
    if !per_iteration_names.is_empty() {
        create_per_iteration_environment(agent, &per_iteration_names)?;
    }

    for_loop_iterations(
        agent,
        statement,
        labels,
        old_env,
        per_iteration_names,
        ForResume::None,
    )
}

/// Which phase of a for statement a generator resumption re-enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForResume {
    None,
    Body,
    Test,
    Update,
}

fn per_iteration_declaration<'a>(
    statement: &'a ast::ForStatement<'a>,
) -> Option<&'a ast::VariableDeclaration<'a>> {
    match &statement.init {
        Some(ast::ForStatementInit::VariableDeclaration(declaration))
            if declaration.kind.is_lexical() && !declaration.kind.is_const() =>
        {
            Some(declaration)
        }
        _ => None,
    }
}

fn collect_per_iteration_names(
    agent: &mut Agent,
    statement: &ast::ForStatement,
) -> Vec<HeapString> {
    let mut names = Vec::new();
    if let Some(declaration) = per_iteration_declaration(statement) {
        let mut raw = Vec::new();
        declaration.bound_names(&mut |identifier| raw.push(identifier.name.as_str().to_string()));
        for name in raw {
            names.push(HeapString::from_str(agent, &name));
        }
    }
    names
}

fn for_loop_iterations(
    agent: &mut Agent,
    statement: &ast::ForStatement,
    labels: &[HeapString],
    outer_env: EnvironmentIndex,
    per_iteration_names: Vec<HeapString>,
    mut resume: ForResume,
) -> JsResult<Completion> {
    let mut last_value: Option<Value> = None;
    loop {
        // Update phase resumption falls through to the update at the end
        // of the previous iteration first.
        if resume == ForResume::Update {
            resume = ForResume::None;
            if let Some(update) = &statement.update {
                match evaluate_expression(agent, update) {
                    Err(JsError::Suspend(value)) => {
                        agent.generator_record_segment(PathSegment::ForUpdate);
                        return Err(JsError::Suspend(value));
                    }
                    Err(error) => {
                        agent.set_lexical_environment(outer_env);
                        return Err(error);
                    }
                    Ok(_) => {}
                }
            }
        }
        // Test.
        if resume != ForResume::Body {
            if resume != ForResume::Test {
                agent.generator_reset_replay();
            }
            resume = ForResume::None;
            if let Some(test) = &statement.test {
                let test_result = evaluate_expression(agent, test);
                let value = match test_result {
                    Err(JsError::Suspend(value)) => {
                        agent.generator_record_segment(PathSegment::ForTest);
                        return Err(JsError::Suspend(value));
                    }
                    other => other,
                };
                let value = match value {
                    Ok(value) => value,
                    Err(error) => {
                        agent.set_lexical_environment(outer_env);
                        return Err(error);
                    }
                };
                let keep_going =
                    crate::ecmascript::abstract_operations::type_conversion::to_boolean(
                        agent, value,
                    );
                if !keep_going {
                    agent.set_lexical_environment(outer_env);
                    return Ok(Completion::Normal(last_value));
                }
            }
            agent.generator_reset_replay();
        }

        // Body.
        resume = ForResume::None;
        let body_result = evaluate_statement(agent, &statement.body);
        let completion = match body_result {
            Err(JsError::Suspend(value)) => {
                let iteration_env = agent.current_lexical_environment();
                agent.generator_record_segment(PathSegment::ForBody {
                    outer_env,
                    iteration_env,
                });
                return Err(JsError::Suspend(value));
            }
            Err(error) => {
                agent.set_lexical_environment(outer_env);
                return Err(error);
            }
            Ok(completion) => completion,
        };
        if let Some(value) = completion.value() {
            last_value = Some(value);
        }
        match loop_continues(&completion, labels) {
            LoopFlow::Continue => {}
            LoopFlow::Break => {
                agent.set_lexical_environment(outer_env);
                return Ok(Completion::Normal(last_value));
            }
            LoopFlow::Propagate => {
                agent.set_lexical_environment(outer_env);
                return Ok(completion);
            }
        }

        // Per-iteration environment copy, then the update expression.
        if !per_iteration_names.is_empty() {
            create_per_iteration_environment(agent, &per_iteration_names)?;
        }
        if let Some(update) = &statement.update {
            agent.generator_reset_replay();
            let update_result = evaluate_expression(agent, update);
            match update_result {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::ForUpdate);
                    return Err(JsError::Suspend(value));
                }
                Err(error) => {
                    agent.set_lexical_environment(outer_env);
                    return Err(error);
                }
                Ok(_) => {}
            }
        }
    }
}

/// ### [14.7.4.3 CreatePerIterationEnvironment ( perIterationBindings )](https://tc39.es/ecma262/#sec-createperiterationenvironment)
fn create_per_iteration_environment(
    agent: &mut Agent,
    per_iteration_names: &[HeapString],
) -> JsResult<()> {
    // 1.a-e. Copy the bindings from the last iteration's environment into
    //    a fresh one.
    let last_env = agent.current_lexical_environment();
    let outer = last_env.get_outer_env(agent);
    let new_env = new_declarative_environment(agent, outer);
    let new_env = EnvironmentIndex::Declarative(new_env);
    for name in per_iteration_names {
        let value = last_env.get_binding_value(agent, *name, true)?;
        new_env.create_mutable_binding(agent, *name, false)?;
        new_env.initialize_binding(agent, *name, value)?;
    }
    agent.set_lexical_environment(new_env);
    Ok(())
}

/// ### [14.13 Labelled Statements](https://tc39.es/ecma262/#sec-labelled-statements)
fn evaluate_labelled(
    agent: &mut Agent,
    statement: &ast::LabeledStatement,
    mut labels: Vec<HeapString>,
) -> JsResult<Completion> {
    let label = HeapString::from_str(agent, statement.label.name.as_str());
    labels.push(label);
    if agent.generator_is_resuming() {
        let Some(PathSegment::LabelledBody) = agent.generator_pop_segment() else {
            unreachable!("resume path disagrees with label structure");
        };
    }
    let result = match &statement.body {
        Statement::WhileStatement(inner) => evaluate_while(agent, inner, &labels),
        Statement::DoWhileStatement(inner) => evaluate_do_while(agent, inner, &labels),
        Statement::ForStatement(inner) => evaluate_for(agent, inner, &labels),
        Statement::ForInStatement(inner) => for_in_of::evaluate_for_in(agent, inner, &labels),
        Statement::ForOfStatement(inner) => for_in_of::evaluate_for_of(agent, inner, &labels),
        Statement::SwitchStatement(inner) => evaluate_switch(agent, inner, &labels),
        Statement::LabeledStatement(inner) => evaluate_labelled(agent, inner, labels.clone()),
        other => evaluate_statement(agent, other),
    };
    match result {
        Err(JsError::Suspend(value)) => {
            agent.generator_record_segment(PathSegment::LabelledBody);
            Err(JsError::Suspend(value))
        }
        Ok(Completion::Break {
            label: Some(break_label),
            value,
        }) if break_label == label => Ok(Completion::Normal(value)),
        other => other,
    }
}

/// ### [14.12.4 Switch Statement Evaluation](https://tc39.es/ecma262/#sec-switch-statement-runtime-semantics-evaluation)
fn evaluate_switch(
    agent: &mut Agent,
    statement: &ast::SwitchStatement,
    labels: &[HeapString],
) -> JsResult<Completion> {
    let mut old_env = agent.current_lexical_environment();
    let mut start_case: Option<usize> = None;
    let mut resuming = false;

    if agent.generator_is_resuming() {
        let Some(PathSegment::SwitchCase {
            outer_env,
            case_index,
        }) = agent.generator_pop_segment()
        else {
            unreachable!("resume path disagrees with switch structure");
        };
        // The environment restore target recorded at suspension time.
        old_env = outer_env;
        start_case = Some(case_index as usize);
        resuming = true;
    }

    if !resuming {
        // 1. Evaluate the discriminant.
        let discriminant = evaluate_expression(agent, &statement.discriminant)?;
        // 3-5. A fresh block environment covers the case block.
        let block_env = new_declarative_environment(agent, Some(old_env));
        let block_env = EnvironmentIndex::Declarative(block_env);
        // BlockDeclarationInstantiation over the whole case block.
        {
            let mut declarations = Vec::new();
            for case in statement.cases.iter() {
                lexically_scoped_declarations(&case.consequent, false, &mut declarations);
            }
            let mut function_declarations = Vec::new();
            for declaration in &declarations {
                let is_const = declaration.is_constant_declaration();
                let mut names = Vec::new();
                declaration.bound_names(&mut |identifier| {
                    names.push(identifier.name.as_str().to_string());
                });
                for name in names {
                    let name = HeapString::from_str(agent, &name);
                    if is_const {
                        block_env.create_immutable_binding(agent, name, true)?;
                    } else {
                        block_env.create_mutable_binding(agent, name, false)?;
                    }
                }
                if let LexicallyScopedDeclaration::Function(function) = declaration {
                    function_declarations.push(*function);
                }
            }
            for function in function_declarations {
                let function_object = instantiate_function_object(agent, function, block_env);
                let mut name = None;
                function.bound_names(&mut |identifier| {
                    name.get_or_insert_with(|| identifier.name.as_str().to_string());
                });
                if let Some(name) = name {
                    let name = HeapString::from_str(agent, &name);
                    block_env.initialize_binding(agent, name, function_object.into())?;
                }
            }
        }
        agent.set_lexical_environment(block_env);

        // 6. CaseBlockEvaluation: find the matching case, else default.
        let mut matched = None;
        for (index, case) in statement.cases.iter().enumerate() {
            let Some(test) = &case.test else { continue };
            let test_result = evaluate_expression(agent, test);
            let test_value = match test_result {
                Ok(value) => value,
                Err(error) => {
                    agent.set_lexical_environment(old_env);
                    return Err(error);
                }
            };
            if crate::ecmascript::abstract_operations::testing_and_comparison::is_strictly_equal(
                agent,
                discriminant,
                test_value,
            ) {
                matched = Some(index);
                break;
            }
        }
        if matched.is_none() {
            matched = statement
                .cases
                .iter()
                .position(|case| case.test.is_none());
        }
        let Some(matched) = matched else {
            agent.set_lexical_environment(old_env);
            return Ok(Completion::Normal(None));
        };
        start_case = Some(matched);
    }

    // 7. Execute consequents from the matched case onward (fall-through).
    let mut last_value: Option<Value> = None;
    for (index, case) in statement.cases.iter().enumerate() {
        if index < start_case.unwrap() {
            continue;
        }
        let resume_this_case = resuming && index == start_case.unwrap();
        if !resume_this_case {
            agent.generator_reset_replay();
        }
        let result = evaluate_statements(agent, &case.consequent);
        let completion = match result {
            Err(JsError::Suspend(value)) => {
                agent.generator_record_segment(PathSegment::SwitchCase {
                    outer_env: old_env,
                    case_index: index as u32,
                });
                return Err(JsError::Suspend(value));
            }
            Err(error) => {
                agent.set_lexical_environment(old_env);
                return Err(error);
            }
            Ok(completion) => completion,
        };
        if let Some(value) = completion.value() {
            last_value = Some(value);
        }
        match completion {
            Completion::Normal(_) => {}
            Completion::Break { label: None, .. } => {
                agent.set_lexical_environment(old_env);
                return Ok(Completion::Normal(last_value));
            }
            Completion::Break {
                label: Some(label),
                value,
            } if labels.contains(&label) => {
                agent.set_lexical_environment(old_env);
                return Ok(Completion::Normal(value.or(last_value)));
            }
            abrupt => {
                agent.set_lexical_environment(old_env);
                return Ok(abrupt);
            }
        }
    }
    agent.set_lexical_environment(old_env);
    Ok(Completion::Normal(last_value))
}

/// ### [14.11.2 With Statement Evaluation](https://tc39.es/ecma262/#sec-with-statement-runtime-semantics-evaluation)
fn evaluate_with(agent: &mut Agent, statement: &ast::WithStatement) -> JsResult<Completion> {
    if agent.is_strict_code() {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Strict mode code may not include a with statement",
        ));
    }
    if agent.generator_is_resuming() {
        let Some(PathSegment::WithBody { outer_env }) = agent.generator_pop_segment() else {
            unreachable!("resume path disagrees with with structure");
        };
        let result = evaluate_statement(agent, &statement.body);
        return finish_with(agent, result, outer_env);
    }
    // 1-2. Let obj be ? ToObject(? Evaluation of Expression).
    let object = evaluate_expression(agent, &statement.object)?;
    let object = crate::ecmascript::abstract_operations::type_conversion::to_object(agent, object)?;
    // 3-5. Push an object environment with withEnvironment true.
    let old_env = agent.current_lexical_environment();
    let with_env = new_object_environment(agent, object, true, Some(old_env));
    agent.set_lexical_environment(with_env);
    let result = evaluate_statement(agent, &statement.body);
    finish_with(agent, result, old_env)
}

fn finish_with(
    agent: &mut Agent,
    result: JsResult<Completion>,
    old_env: EnvironmentIndex,
) -> JsResult<Completion> {
    if let Err(JsError::Suspend(value)) = result {
        agent.generator_record_segment(PathSegment::WithBody { outer_env: old_env });
        return Err(JsError::Suspend(value));
    }
    agent.set_lexical_environment(old_env);
    result
}

/// ### [14.15.3 Try Statement Evaluation](https://tc39.es/ecma262/#sec-try-statement-runtime-semantics-evaluation)
fn evaluate_try(agent: &mut Agent, statement: &ast::TryStatement) -> JsResult<Completion> {
    let old_env = agent.current_lexical_environment();
    let mut resume_region: Option<PathSegment> = None;
    if agent.generator_is_resuming() {
        resume_region = agent.generator_pop_segment();
    }

    // Block (or resumed block/catch).
    let block_result = match &resume_region {
        Some(PathSegment::TryBlock) | None => {
            let result = evaluate_block(agent, &statement.block.body);
            match result {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::TryBlock);
                    return Err(JsError::Suspend(value));
                }
                other => other,
            }
        }
        Some(PathSegment::CatchBlock { outer_env }) => {
            // Straight back into the handler; the catch environment is
            // restored through the suspended context.
            let handler = statement.handler.as_ref().unwrap();
            let result = evaluate_statements(agent, &handler.body.body);
            match result {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::CatchBlock {
                        outer_env: *outer_env,
                    });
                    return Err(JsError::Suspend(value));
                }
                other => {
                    agent.set_lexical_environment(*outer_env);
                    other
                }
            }
        }
        Some(PathSegment::FinallyBlock { prior }) => {
            // Straight into the finalizer with the recorded prior
            // completion.
            let prior = *prior;
            let finalizer = statement.finalizer.as_ref().unwrap();
            return run_finally(agent, statement, finalizer, prior_to_result(prior), true);
        }
        _ => unreachable!("resume path disagrees with try structure"),
    };

    // CatchClauseEvaluation on a catchable throw.
    let handled = match block_result {
        Err(JsError::Thrown(thrown)) if statement.handler.is_some() => {
            let handler = statement.handler.as_ref().unwrap();
            let catch_env = new_declarative_environment(agent, Some(old_env));
            let catch_env = EnvironmentIndex::Declarative(catch_env);
            if let Some(param) = &handler.param {
                let mut names = Vec::new();
                param
                    .pattern
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
                for name in &names {
                    let name = HeapString::from_str(agent, name);
                    catch_env.create_mutable_binding(agent, name, false)?;
                }
                agent.set_lexical_environment(catch_env);
                let binding = destructuring::binding_initialization(
                    agent,
                    &param.pattern,
                    thrown,
                    BindingTarget::Initialize,
                );
                if let Err(error) = binding {
                    agent.set_lexical_environment(old_env);
                    return Err(error);
                }
            } else {
                agent.set_lexical_environment(catch_env);
            }
            let result = evaluate_statements(agent, &handler.body.body);
            match result {
                Err(JsError::Suspend(value)) => {
                    agent.generator_record_segment(PathSegment::CatchBlock { outer_env: old_env });
                    return Err(JsError::Suspend(value));
                }
                other => {
                    agent.set_lexical_environment(old_env);
                    other
                }
            }
        }
        other => other,
    };

    // Finally runs on every path and can override the completion.
    match &statement.finalizer {
        Some(finalizer) => run_finally(agent, statement, finalizer, handled, false),
        None => handled,
    }
}

fn prior_to_result(prior: FinallyPrior) -> JsResult<Completion> {
    match prior {
        FinallyPrior::Normal => Ok(Completion::Normal(None)),
        FinallyPrior::Abrupt(AbruptKind::Thrown(value)) => Err(JsError::Thrown(value)),
        FinallyPrior::Abrupt(AbruptKind::Return(value)) => Ok(Completion::Return(value)),
        FinallyPrior::Abrupt(AbruptKind::Break(label, value)) => {
            Ok(Completion::Break { label, value })
        }
        FinallyPrior::Abrupt(AbruptKind::Continue(label, value)) => {
            Ok(Completion::Continue { label, value })
        }
    }
}

fn result_to_prior(result: &JsResult<Completion>) -> FinallyPrior {
    match result {
        Ok(Completion::Normal(_)) => FinallyPrior::Normal,
        Ok(Completion::Return(value)) => FinallyPrior::Abrupt(AbruptKind::Return(*value)),
        Ok(Completion::Break { label, value }) => {
            FinallyPrior::Abrupt(AbruptKind::Break(*label, *value))
        }
        Ok(Completion::Continue { label, value }) => {
            FinallyPrior::Abrupt(AbruptKind::Continue(*label, *value))
        }
        Err(JsError::Thrown(value)) => FinallyPrior::Abrupt(AbruptKind::Thrown(*value)),
        // Fatal and generator unwinds never reach the finalizer override
        // bookkeeping with a storable payload.
        Err(_) => FinallyPrior::Normal,
    }
}

fn run_finally(
    agent: &mut Agent,
    _statement: &ast::TryStatement,
    finalizer: &ast::BlockStatement,
    prior: JsResult<Completion>,
    _resumed: bool,
) -> JsResult<Completion> {
    let prior_repr = result_to_prior(&prior);
    let finally_result = evaluate_block(agent, &finalizer.body);
    match finally_result {
        Err(JsError::Suspend(value)) => {
            agent.generator_record_segment(PathSegment::FinallyBlock { prior: prior_repr });
            Err(JsError::Suspend(value))
        }
        // 14.15.3: an abrupt finally completion overrides the prior one.
        Ok(Completion::Normal(_)) => prior,
        Ok(abrupt) => Ok(abrupt),
        Err(error) => Err(error),
    }
}

/// ### [10.2.11 FunctionDeclarationInstantiation ( func, argumentsList )](https://tc39.es/ecma262/#sec-functiondeclarationinstantiation)
pub(crate) fn function_declaration_instantiation(
    agent: &mut Agent,
    function: ECMAScriptFunction,
    arguments_list: &[Value],
) -> JsResult<()> {
    let ast = function.ast(agent);
    let params = ast.formal_parameters();
    let env = agent.current_lexical_environment();
    let this_mode = agent[function].this_mode;
    let strict = agent[function].strict;

    // 5. Let parameterNames be the BoundNames of formals.
    let mut parameter_names: Vec<String> = Vec::new();
    for param in params.items.iter() {
        param
            .pattern
            .bound_names(&mut |identifier| parameter_names.push(identifier.name.as_str().to_string()));
    }
    if let Some(rest) = &params.rest {
        rest.argument
            .bound_names(&mut |identifier| parameter_names.push(identifier.name.as_str().to_string()));
    }

    // 15-22. The arguments object, for non-arrow functions that do not
    //    shadow the name.
    let arguments_object_needed = this_mode != ThisMode::Lexical
        && !parameter_names.iter().any(|name| name == "arguments");

    // 21-27. Create and initialize the parameter bindings.
    let mut seen: Vec<&String> = Vec::new();
    for name in &parameter_names {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let name = HeapString::from_str(agent, name);
        env.create_mutable_binding(agent, name, false)?;
    }

    if arguments_object_needed {
        let callee = if strict {
            None
        } else {
            Some(Function::ECMAScriptFunction(function))
        };
        let arguments_object = create_unmapped_arguments_object(agent, arguments_list, callee)?;
        let arguments_name = HeapString::from_static_str(agent, "arguments");
        env.create_mutable_binding(agent, arguments_name, false)?;
        env.initialize_binding(agent, arguments_name, arguments_object.into())?;
    }

    // 28. IteratorBindingInitialization over the formals.
    for (index, param) in params.items.iter().enumerate() {
        let value = arguments_list
            .get(index)
            .copied()
            .unwrap_or(Value::Undefined);
        destructuring::binding_initialization(
            agent,
            &param.pattern,
            value,
            BindingTarget::InitializeOrSet,
        )?;
    }
    if let Some(rest) = &params.rest {
        let rest_values: Vec<Value> = arguments_list
            .iter()
            .skip(params.items.len())
            .copied()
            .collect();
        let rest_array =
            crate::ecmascript::builtins::array::create_array_from_list(agent, &rest_values);
        destructuring::binding_initialization(
            agent,
            &rest.argument,
            rest_array.into(),
            BindingTarget::InitializeOrSet,
        )?;
    }

    // 29-36. Var-scoped declarations: bindings initialized to undefined
    //    (or the parameter value of the same name).
    let body = ast.ecmascript_code();
    let mut var_declarations = Vec::new();
    if !ast.is_concise_body() {
        var_scoped_declarations(&body.statements, &mut var_declarations);
    }
    let mut instantiated: Vec<String> = Vec::new();
    let mut function_declarations: Vec<&ast::Function> = Vec::new();
    for declaration in &var_declarations {
        match declaration {
            VarScopedDeclaration::Variable(declarator) => {
                let mut names = Vec::new();
                declarator
                    .id
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
                for name in names {
                    if parameter_names.contains(&name) || instantiated.contains(&name) {
                        continue;
                    }
                    let name_string = HeapString::from_str(agent, &name);
                    env.create_mutable_binding(agent, name_string, false)?;
                    env.initialize_binding(agent, name_string, Value::Undefined)?;
                    instantiated.push(name);
                }
            }
            VarScopedDeclaration::Function(declaration) => {
                function_declarations.push(declaration);
            }
        }
    }

    // 33-34. Lexically scoped declarations get uninitialized bindings.
    if !ast.is_concise_body() {
        let mut lex_declarations = Vec::new();
        lexically_scoped_declarations(&body.statements, true, &mut lex_declarations);
        for declaration in &lex_declarations {
            let is_const = declaration.is_constant_declaration();
            let mut names = Vec::new();
            declaration.bound_names(&mut |identifier| {
                names.push(identifier.name.as_str().to_string());
            });
            for name in names {
                let name = HeapString::from_str(agent, &name);
                if is_const {
                    env.create_immutable_binding(agent, name, true)?;
                } else {
                    env.create_mutable_binding(agent, name, false)?;
                }
            }
        }
    }

    // 36. Hoisted function declarations, instantiated last so they see
    //    every binding.
    let mut declared_functions: Vec<String> = Vec::new();
    for declaration in function_declarations.into_iter().rev() {
        let mut name = None;
        declaration.bound_names(&mut |identifier| {
            name.get_or_insert_with(|| identifier.name.as_str().to_string());
        });
        let Some(name) = name else { continue };
        if declared_functions.contains(&name) {
            continue;
        }
        declared_functions.push(name.clone());
        let function_object = instantiate_function_object(agent, declaration, env);
        let name = HeapString::from_str(agent, &name);
        if !env.has_binding(agent, name)? {
            env.create_mutable_binding(agent, name, false)?;
            env.initialize_binding(agent, name, function_object.into())?;
        } else {
            // The binding exists from the var scan; overwrite it.
            match env.set_mutable_binding(agent, name, function_object.into(), false) {
                Ok(()) => {}
                Err(_) => {
                    env.initialize_binding(agent, name, function_object.into())?;
                }
            }
        }
    }

    Ok(())
}
