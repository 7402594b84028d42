// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [8.2 Scope Analysis](https://tc39.es/ecma262/#sec-syntax-directed-operations-scope-analysis)
//!
//! VarScopedDeclarations, LexicallyScopedDeclarations and the bound-name
//! collections, walked over the oxc AST. Var collection descends into
//! blocks and control flow but never across function boundaries; function
//! declarations are var-scoped at the top level of a script or function
//! body and lexically scoped inside blocks.

use oxc_ast::ast::{self, Statement};
use oxc_ecmascript::BoundNames;

/// A var-scoped declaration: a `var` declarator or a top-level function
/// declaration.
#[derive(Debug, Clone, Copy)]
pub(crate) enum VarScopedDeclaration<'a> {
    Variable(&'a ast::VariableDeclarator<'a>),
    Function(&'a ast::Function<'a>),
}

/// A lexically scoped declaration: `let`, `const`, `class`, or a function
/// declaration in block position.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LexicallyScopedDeclaration<'a> {
    Variable {
        declarator: &'a ast::VariableDeclarator<'a>,
        is_const: bool,
    },
    Function(&'a ast::Function<'a>),
    Class(&'a ast::Class<'a>),
}

impl<'a> LexicallyScopedDeclaration<'a> {
    pub(crate) fn is_constant_declaration(&self) -> bool {
        matches!(self, LexicallyScopedDeclaration::Variable { is_const: true, .. })
    }

    pub(crate) fn bound_names(&self, f: &mut impl FnMut(&ast::BindingIdentifier<'a>)) {
        match self {
            LexicallyScopedDeclaration::Variable { declarator, .. } => {
                declarator.id.bound_names(f)
            }
            LexicallyScopedDeclaration::Function(function) => function.bound_names(f),
            LexicallyScopedDeclaration::Class(class) => class.bound_names(f),
        }
    }
}

/// ### [8.2.6 VarScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-varscopeddeclarations)
///
/// `top_level` controls whether directly contained function declarations
/// are var-scoped (script and function bodies) or not (blocks).
pub(crate) fn var_scoped_declarations<'a>(
    statements: &'a [Statement<'a>],
    out: &mut Vec<VarScopedDeclaration<'a>>,
) {
    for statement in statements {
        collect_var_scoped(statement, true, out);
    }
}

fn collect_var_scoped<'a>(
    statement: &'a Statement<'a>,
    top_level: bool,
    out: &mut Vec<VarScopedDeclaration<'a>>,
) {
    match statement {
        Statement::VariableDeclaration(decl) => {
            if decl.kind.is_var() {
                for declarator in decl.declarations.iter() {
                    out.push(VarScopedDeclaration::Variable(declarator));
                }
            }
        }
        Statement::FunctionDeclaration(function) => {
            if top_level {
                out.push(VarScopedDeclaration::Function(function));
            }
        }
        Statement::BlockStatement(block) => {
            for statement in block.body.iter() {
                collect_var_scoped(statement, false, out);
            }
        }
        Statement::IfStatement(if_statement) => {
            collect_var_scoped(&if_statement.consequent, false, out);
            if let Some(alternate) = &if_statement.alternate {
                collect_var_scoped(alternate, false, out);
            }
        }
        Statement::DoWhileStatement(do_while) => {
            collect_var_scoped(&do_while.body, false, out);
        }
        Statement::WhileStatement(while_statement) => {
            collect_var_scoped(&while_statement.body, false, out);
        }
        Statement::ForStatement(for_statement) => {
            if let Some(ast::ForStatementInit::VariableDeclaration(decl)) = &for_statement.init {
                if decl.kind.is_var() {
                    for declarator in decl.declarations.iter() {
                        out.push(VarScopedDeclaration::Variable(declarator));
                    }
                }
            }
            collect_var_scoped(&for_statement.body, false, out);
        }
        Statement::ForInStatement(for_in) => {
            if let ast::ForStatementLeft::VariableDeclaration(decl) = &for_in.left {
                if decl.kind.is_var() {
                    for declarator in decl.declarations.iter() {
                        out.push(VarScopedDeclaration::Variable(declarator));
                    }
                }
            }
            collect_var_scoped(&for_in.body, false, out);
        }
        Statement::ForOfStatement(for_of) => {
            if let ast::ForStatementLeft::VariableDeclaration(decl) = &for_of.left {
                if decl.kind.is_var() {
                    for declarator in decl.declarations.iter() {
                        out.push(VarScopedDeclaration::Variable(declarator));
                    }
                }
            }
            collect_var_scoped(&for_of.body, false, out);
        }
        Statement::WithStatement(with_statement) => {
            collect_var_scoped(&with_statement.body, false, out);
        }
        Statement::SwitchStatement(switch_statement) => {
            for case in switch_statement.cases.iter() {
                for statement in case.consequent.iter() {
                    collect_var_scoped(statement, false, out);
                }
            }
        }
        Statement::LabeledStatement(labeled) => {
            collect_var_scoped(&labeled.body, top_level, out);
        }
        Statement::TryStatement(try_statement) => {
            for statement in try_statement.block.body.iter() {
                collect_var_scoped(statement, false, out);
            }
            if let Some(handler) = &try_statement.handler {
                for statement in handler.body.body.iter() {
                    collect_var_scoped(statement, false, out);
                }
            }
            if let Some(finalizer) = &try_statement.finalizer {
                for statement in finalizer.body.iter() {
                    collect_var_scoped(statement, false, out);
                }
            }
        }
        _ => {}
    }
}

/// ### [8.2.5 LexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-lexicallyscopeddeclarations)
///
/// Only declarations directly contained in the statement list; function
/// declarations are lexically scoped except at the top level of a script
/// or function body.
pub(crate) fn lexically_scoped_declarations<'a>(
    statements: &'a [Statement<'a>],
    top_level: bool,
    out: &mut Vec<LexicallyScopedDeclaration<'a>>,
) {
    for statement in statements {
        match statement {
            Statement::VariableDeclaration(decl) => match decl.kind {
                ast::VariableDeclarationKind::Var => {}
                ast::VariableDeclarationKind::Const => {
                    for declarator in decl.declarations.iter() {
                        out.push(LexicallyScopedDeclaration::Variable {
                            declarator,
                            is_const: true,
                        });
                    }
                }
                _ => {
                    for declarator in decl.declarations.iter() {
                        out.push(LexicallyScopedDeclaration::Variable {
                            declarator,
                            is_const: false,
                        });
                    }
                }
            },
            Statement::FunctionDeclaration(function) => {
                if !top_level {
                    out.push(LexicallyScopedDeclaration::Function(function));
                }
            }
            Statement::ClassDeclaration(class) => {
                out.push(LexicallyScopedDeclaration::Class(class));
            }
            Statement::LabeledStatement(labeled) => {
                // A labelled function declaration is still var-scoped at
                // the top level.
                if let Statement::FunctionDeclaration(function) = &labeled.body {
                    if !top_level {
                        out.push(LexicallyScopedDeclaration::Function(function));
                    }
                }
            }
            _ => {}
        }
    }
}

/// ### [8.2.4 LexicallyDeclaredNames](https://tc39.es/ecma262/#sec-static-semantics-lexicallydeclarednames)
pub(crate) fn lexically_declared_names<'a>(
    statements: &'a [Statement<'a>],
    top_level: bool,
) -> Vec<&'a str> {
    let mut declarations = Vec::new();
    lexically_scoped_declarations(statements, top_level, &mut declarations);
    let mut names = Vec::new();
    for declaration in declarations {
        declaration.bound_names(&mut |identifier| names.push(identifier.name.as_str()));
    }
    names
}

/// ### [8.2.7 VarDeclaredNames](https://tc39.es/ecma262/#sec-static-semantics-vardeclarednames)
pub(crate) fn var_declared_names<'a>(statements: &'a [Statement<'a>]) -> Vec<&'a str> {
    let mut declarations = Vec::new();
    var_scoped_declarations(statements, &mut declarations);
    let mut names = Vec::new();
    for declaration in declarations {
        match declaration {
            VarScopedDeclaration::Variable(declarator) => {
                declarator
                    .id
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str()));
            }
            VarScopedDeclaration::Function(function) => {
                function.bound_names(&mut |identifier| names.push(identifier.name.as_str()));
            }
        }
    }
    names
}
