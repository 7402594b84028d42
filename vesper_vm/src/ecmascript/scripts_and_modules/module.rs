// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [16.2 Modules](https://tc39.es/ecma262/#sec-modules)
//!
//! Source text module records over the oxc module AST: import/export entry
//! extraction, two-phase Tarjan-style linking and evaluation with cycle
//! handling, lazy indirect bindings and namespace exotic objects. Module
//! loading delegates to a host-provided resolver; records are cached per
//! realm by canonical specifier.

use core::ops::{Index, IndexMut};

use oxc_ast::ast::{self, Statement};
use oxc_ecmascript::BoundNames;
use oxc_span::SourceType;

use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::module_environment::new_module_environment;
use crate::ecmascript::execution::environments::{EnvironmentIndex, ModuleEnvironmentIndex};
use crate::ecmascript::execution::execution_context::{ECMAScriptCode, ExecutionContext};
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_function_object;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    lexically_scoped_declarations, var_scoped_declarations, LexicallyScopedDeclaration,
    VarScopedDeclaration,
};
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor,
    PropertyKey, Symbol, Value,
};
use crate::heap::indexes::{ModuleIndex, ObjectIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

use super::source_code::SourceCode;
use super::ScriptOrModule;

/// Host-provided module loader: canonicalizes specifiers and produces
/// module source text.
pub trait ModuleLoader: std::fmt::Debug {
    /// Map `(referrer, specifier)` to the canonical specifier used as the
    /// realm cache key.
    fn resolve(&self, referrer: Option<&str>, specifier: &str) -> String {
        let _ = referrer;
        specifier.to_string()
    }

    /// Produce the module source text for a canonical specifier.
    fn load(&self, specifier: &str) -> Result<String, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Module(pub(crate) ModuleIndex);

/// ### \[\[Status]]
///
/// Transitions are monotonic except for the rollback to `New` on a linking
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleStatus {
    New,
    Linking,
    Linked,
    Evaluating,
    Evaluated,
}

/// ### [16.2.1.8 ImportEntry Records](https://tc39.es/ecma262/#importentry-record)
#[derive(Debug, Clone, Copy)]
pub(crate) struct ImportEntry {
    pub(crate) module_request: HeapString,
    pub(crate) import_name: ImportName,
    pub(crate) local_name: HeapString,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ImportName {
    Name(HeapString),
    Namespace,
}

/// ### [16.2.1.9 ExportEntry Records](https://tc39.es/ecma262/#exportentry-record)
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExportEntry {
    pub(crate) export_name: Option<HeapString>,
    pub(crate) module_request: Option<HeapString>,
    pub(crate) import_name: Option<ImportName>,
    pub(crate) local_name: Option<HeapString>,
}

#[derive(Debug)]
pub struct ModuleHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    pub(crate) realm: RealmIdentifier,
    pub(crate) specifier: HeapString,
    pub(crate) source_code: SourceCode,
    /// \[\[Status]]
    pub(crate) status: ModuleStatus,
    /// \[\[Environment]]
    pub(crate) environment: Option<ModuleEnvironmentIndex>,
    /// \[\[DFSIndex]] and \[\[DFSAncestorIndex]]
    pub(crate) dfs_index: Option<u32>,
    pub(crate) dfs_ancestor_index: Option<u32>,
    /// \[\[EvaluationError]]
    pub(crate) evaluation_error: Option<Value>,
    /// \[\[RequestedModules]]
    pub(crate) requested_modules: Vec<HeapString>,
    /// \[\[ImportEntries]]
    pub(crate) import_entries: Vec<ImportEntry>,
    /// \[\[LocalExportEntries]]
    pub(crate) local_export_entries: Vec<ExportEntry>,
    /// \[\[IndirectExportEntries]]
    pub(crate) indirect_export_entries: Vec<ExportEntry>,
    /// \[\[StarExportEntries]]
    pub(crate) star_export_entries: Vec<HeapString>,
    /// Sorted export names of the namespace object, filled lazily.
    pub(crate) namespace_exports: Option<Vec<HeapString>>,
}

impl Index<Module> for Agent {
    type Output = ModuleHeapData;

    fn index(&self, index: Module) -> &Self::Output {
        self.heap
            .modules
            .get(index.0.into_index())
            .expect("Module out of bounds")
            .as_ref()
            .expect("Module slot empty")
    }
}

impl IndexMut<Module> for Agent {
    fn index_mut(&mut self, index: Module) -> &mut Self::Output {
        self.heap
            .modules
            .get_mut(index.0.into_index())
            .expect("Module out of bounds")
            .as_mut()
            .expect("Module slot empty")
    }
}

impl From<Module> for Object {
    fn from(value: Module) -> Self {
        Object::Module(value)
    }
}

impl From<Module> for Value {
    fn from(value: Module) -> Self {
        Value::Object(Object::Module(value))
    }
}

fn module_export_name<'a>(name: &'a ast::ModuleExportName<'a>) -> &'a str {
    match name {
        ast::ModuleExportName::IdentifierName(identifier) => identifier.name.as_str(),
        ast::ModuleExportName::IdentifierReference(identifier) => identifier.name.as_str(),
        ast::ModuleExportName::StringLiteral(literal) => literal.value.as_str(),
    }
}

/// ### [16.2.1.7.1 ParseModule ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parsemodule)
pub(crate) fn parse_module(
    agent: &mut Agent,
    source_text: String,
    realm: RealmIdentifier,
    specifier: HeapString,
) -> JsResult<Module> {
    // 1-2. Parse as a Module; early errors become a SyntaxError.
    let source_code = match SourceCode::parse_source(agent, source_text, SourceType::mjs()) {
        Ok(source_code) => source_code,
        Err(errors) => {
            let message = errors
                .first()
                .map(|error| error.to_string())
                .unwrap_or_else(|| "Failed to parse module".to_string());
            return Err(agent.throw_exception(ExceptionType::SyntaxError, &message));
        }
    };
    let program = source_code.program(agent);

    // 3-10. Collect the import and export entries.
    let mut requested_modules: Vec<String> = Vec::new();
    let mut import_entries_raw: Vec<(String, Option<String>, bool, String)> = Vec::new();
    let mut local_export_entries_raw: Vec<(String, String)> = Vec::new();
    let mut indirect_export_entries_raw: Vec<(String, String, Option<String>, bool)> = Vec::new();
    let mut star_export_entries_raw: Vec<String> = Vec::new();
    let mut default_export = false;

    for statement in program.body.iter() {
        match statement {
            Statement::ImportDeclaration(import) => {
                let request = import.source.value.as_str().to_string();
                if !requested_modules.contains(&request) {
                    requested_modules.push(request.clone());
                }
                if let Some(specifiers) = &import.specifiers {
                    for specifier in specifiers.iter() {
                        match specifier {
                            ast::ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                                import_entries_raw.push((
                                    request.clone(),
                                    Some(module_export_name(&spec.imported).to_string()),
                                    false,
                                    spec.local.name.as_str().to_string(),
                                ));
                            }
                            ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                                import_entries_raw.push((
                                    request.clone(),
                                    Some("default".to_string()),
                                    false,
                                    spec.local.name.as_str().to_string(),
                                ));
                            }
                            ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                                import_entries_raw.push((
                                    request.clone(),
                                    None,
                                    true,
                                    spec.local.name.as_str().to_string(),
                                ));
                            }
                        }
                    }
                }
            }
            Statement::ExportNamedDeclaration(export) => {
                match &export.source {
                    Some(source) => {
                        let request = source.value.as_str().to_string();
                        if !requested_modules.contains(&request) {
                            requested_modules.push(request.clone());
                        }
                        for spec in export.specifiers.iter() {
                            indirect_export_entries_raw.push((
                                module_export_name(&spec.exported).to_string(),
                                request.clone(),
                                Some(module_export_name(&spec.local).to_string()),
                                false,
                            ));
                        }
                    }
                    None => {
                        for spec in export.specifiers.iter() {
                            local_export_entries_raw.push((
                                module_export_name(&spec.exported).to_string(),
                                module_export_name(&spec.local).to_string(),
                            ));
                        }
                        if let Some(declaration) = &export.declaration {
                            let mut names = Vec::new();
                            match declaration {
                                ast::Declaration::VariableDeclaration(decl) => {
                                    decl.bound_names(&mut |identifier| {
                                        names.push(identifier.name.as_str().to_string())
                                    });
                                }
                                ast::Declaration::FunctionDeclaration(function) => {
                                    function.bound_names(&mut |identifier| {
                                        names.push(identifier.name.as_str().to_string())
                                    });
                                }
                                ast::Declaration::ClassDeclaration(class) => {
                                    class.bound_names(&mut |identifier| {
                                        names.push(identifier.name.as_str().to_string())
                                    });
                                }
                                _ => {}
                            }
                            for name in names {
                                local_export_entries_raw.push((name.clone(), name));
                            }
                        }
                    }
                }
            }
            Statement::ExportDefaultDeclaration(_) => {
                default_export = true;
                local_export_entries_raw
                    .push(("default".to_string(), "*default*".to_string()));
            }
            Statement::ExportAllDeclaration(export) => {
                let request = export.source.value.as_str().to_string();
                if !requested_modules.contains(&request) {
                    requested_modules.push(request.clone());
                }
                match &export.exported {
                    // export * as ns from 'm' re-exports the namespace.
                    Some(exported) => {
                        indirect_export_entries_raw.push((
                            module_export_name(exported).to_string(),
                            request.clone(),
                            None,
                            true,
                        ));
                    }
                    None => star_export_entries_raw.push(request),
                }
            }
            _ => {}
        }
    }
    let _ = default_export;

    // Intern the collected names.
    let requested_modules = requested_modules
        .into_iter()
        .map(|request| HeapString::from_str(agent, &request))
        .collect();
    let import_entries = import_entries_raw
        .into_iter()
        .map(|(request, import_name, is_namespace, local)| {
            let module_request = HeapString::from_str(agent, &request);
            let local_name = HeapString::from_str(agent, &local);
            let import_name = if is_namespace {
                ImportName::Namespace
            } else {
                let name = import_name.unwrap();
                ImportName::Name(HeapString::from_str(agent, &name))
            };
            ImportEntry {
                module_request,
                import_name,
                local_name,
            }
        })
        .collect();
    let local_export_entries = local_export_entries_raw
        .into_iter()
        .map(|(export_name, local_name)| {
            let export_name = HeapString::from_str(agent, &export_name);
            let local_name = HeapString::from_str(agent, &local_name);
            ExportEntry {
                export_name: Some(export_name),
                module_request: None,
                import_name: None,
                local_name: Some(local_name),
            }
        })
        .collect();
    let indirect_export_entries = indirect_export_entries_raw
        .into_iter()
        .map(|(export_name, request, import_name, is_namespace)| {
            let export_name = HeapString::from_str(agent, &export_name);
            let module_request = HeapString::from_str(agent, &request);
            let import_name = if is_namespace {
                ImportName::Namespace
            } else {
                let name = import_name.unwrap();
                ImportName::Name(HeapString::from_str(agent, &name))
            };
            ExportEntry {
                export_name: Some(export_name),
                module_request: Some(module_request),
                import_name: Some(import_name),
                local_name: None,
            }
        })
        .collect();
    let star_export_entries = star_export_entries_raw
        .into_iter()
        .map(|request| HeapString::from_str(agent, &request))
        .collect();

    Ok(Module(agent.heap.create(ModuleHeapData {
        object_index: None,
        realm,
        specifier,
        source_code,
        status: ModuleStatus::New,
        environment: None,
        dfs_index: None,
        dfs_ancestor_index: None,
        evaluation_error: None,
        requested_modules,
        import_entries,
        local_export_entries,
        indirect_export_entries,
        star_export_entries,
        namespace_exports: None,
    })))
}

/// Load a module by specifier through the host loader, caching per realm
/// by canonical specifier, and eagerly load its dependency graph.
pub(crate) fn load_module(
    agent: &mut Agent,
    referrer: Option<HeapString>,
    specifier: HeapString,
) -> JsResult<Module> {
    let Some(loader) = agent.module_loader.clone() else {
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            "No module loader has been configured",
        ));
    };
    let referrer_text = referrer.map(|r| r.to_string_lossy(agent).into_owned());
    let specifier_text = specifier.to_string_lossy(agent).into_owned();
    let canonical = loader.resolve(referrer_text.as_deref(), &specifier_text);
    let canonical = HeapString::from_str(agent, &canonical);
    // Cache hit: one record per canonical specifier per realm.
    if let Some(module) = agent.current_realm().loaded_modules.get(&canonical) {
        return Ok(*module);
    }
    let canonical_text = canonical.to_string_lossy(agent).into_owned();
    let source = match loader.load(&canonical_text) {
        Ok(source) => source,
        Err(message) => {
            return Err(agent.throw_exception(ExceptionType::SyntaxError, &message));
        }
    };
    let realm = agent.current_realm_id();
    let module = parse_module(agent, source, realm, canonical)?;
    agent
        .current_realm_mut()
        .loaded_modules
        .insert(canonical, module);
    // Eagerly load the requested modules so linking is synchronous.
    let requested = agent[module].requested_modules.clone();
    for request in requested {
        load_module(agent, Some(canonical), request)?;
    }
    Ok(module)
}

fn get_imported_module(agent: &mut Agent, module: Module, request: HeapString) -> Module {
    let referrer = agent[module].specifier;
    // The graph was eagerly loaded; this lookup cannot miss.
    load_module(agent, Some(referrer), request)
        .expect("requested module disappeared from the cache")
}

/// ### [16.2.1.6.2 Link ( )](https://tc39.es/ecma262/#sec-moduledeclarationlinking)
pub(crate) fn link_module(agent: &mut Agent, module: Module) -> JsResult<()> {
    // 1. Assert: status is not LINKING or EVALUATING.
    debug_assert!(!matches!(
        agent[module].status,
        ModuleStatus::Linking | ModuleStatus::Evaluating
    ));
    // 2-3. Let result be InnerModuleLinking(module, stack, 0).
    let mut stack = Vec::new();
    let result = inner_module_linking(agent, module, &mut stack, 0);
    match result {
        Ok(_) => Ok(()),
        Err(error) => {
            // 4. On failure, roll every module on the stack back to NEW.
            for member in stack {
                agent[member].status = ModuleStatus::New;
                agent[member].dfs_index = None;
                agent[member].dfs_ancestor_index = None;
            }
            Err(error)
        }
    }
}

/// ### [16.2.1.6.1.1 InnerModuleLinking ( module, stack, index )](https://tc39.es/ecma262/#sec-InnerModuleLinking)
fn inner_module_linking(
    agent: &mut Agent,
    module: Module,
    stack: &mut Vec<Module>,
    mut index: u32,
) -> JsResult<u32> {
    // 2. If module.[[Status]] is LINKING, LINKED or EVALUATED, return
    //    index.
    match agent[module].status {
        ModuleStatus::Linking
        | ModuleStatus::Linked
        | ModuleStatus::Evaluating
        | ModuleStatus::Evaluated => return Ok(index),
        ModuleStatus::New => {}
    }
    // 4-8. Set the status and DFS indices, push onto the stack.
    agent[module].status = ModuleStatus::Linking;
    agent[module].dfs_index = Some(index);
    agent[module].dfs_ancestor_index = Some(index);
    index += 1;
    stack.push(module);
    // 9. For each required module, link recursively and fold ancestor
    //    indices across the cycle.
    let requested = agent[module].requested_modules.clone();
    for request in requested {
        let required_module = get_imported_module(agent, module, request);
        index = inner_module_linking(agent, required_module, stack, index)?;
        if agent[required_module].status == ModuleStatus::Linking {
            let required_ancestor = agent[required_module].dfs_ancestor_index.unwrap();
            let ancestor = agent[module].dfs_ancestor_index.unwrap();
            agent[module].dfs_ancestor_index = Some(ancestor.min(required_ancestor));
        }
    }
    // 10. Perform ? module.InitializeEnvironment().
    initialize_environment(agent, module)?;
    // 12-16. If this module is the root of a strongly connected
    //    component, mark the whole component LINKED.
    if agent[module].dfs_ancestor_index == agent[module].dfs_index {
        loop {
            let required_module = stack.pop().unwrap();
            agent[required_module].status = ModuleStatus::Linked;
            if required_module == module {
                break;
            }
        }
    }
    Ok(index)
}

/// ### [16.2.1.7.3.1 GetExportedNames ( \[ exportStarSet \] )](https://tc39.es/ecma262/#sec-getexportednames)
fn get_exported_names(
    agent: &mut Agent,
    module: Module,
    export_star_set: &mut Vec<Module>,
) -> Vec<HeapString> {
    // 2-3. A circular `export *` chain contributes nothing new.
    if export_star_set.contains(&module) {
        return Vec::new();
    }
    export_star_set.push(module);
    let mut exported_names = Vec::new();
    // 5. Local and indirect exports by their export names.
    for entry in agent[module]
        .local_export_entries
        .iter()
        .chain(agent[module].indirect_export_entries.iter())
    {
        if let Some(export_name) = entry.export_name {
            if !exported_names.contains(&export_name) {
                exported_names.push(export_name);
            }
        }
    }
    // 7. Star exports contribute the requested module's names sans
    //    "default".
    let star_requests = agent[module].star_export_entries.clone();
    let default_name = HeapString::from_static_str(agent, "default");
    for request in star_requests {
        let requested_module = get_imported_module(agent, module, request);
        let star_names = get_exported_names(agent, requested_module, export_star_set);
        for name in star_names {
            if name != default_name && !exported_names.contains(&name) {
                exported_names.push(name);
            }
        }
    }
    exported_names
}

/// The resolution of an export name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolvedBinding {
    Binding { module: Module, binding_name: HeapString },
    Namespace { module: Module },
    Ambiguous,
}

/// ### [16.2.1.7.3.2 ResolveExport ( exportName \[ , resolveSet \] )](https://tc39.es/ecma262/#sec-resolveexport)
pub(crate) fn resolve_export(
    agent: &mut Agent,
    module: Module,
    export_name: HeapString,
    resolve_set: &mut Vec<(Module, HeapString)>,
) -> Option<ResolvedBinding> {
    // 2-3. Detect circular resolution.
    if resolve_set.contains(&(module, export_name)) {
        return None;
    }
    resolve_set.push((module, export_name));
    // 4. Local exports resolve to this module's bindings.
    let local = agent[module]
        .local_export_entries
        .iter()
        .find(|entry| entry.export_name == Some(export_name))
        .copied();
    if let Some(entry) = local {
        return Some(ResolvedBinding::Binding {
            module,
            binding_name: entry.local_name.unwrap(),
        });
    }
    // 5. Indirect exports re-resolve through the requested module.
    let indirect = agent[module]
        .indirect_export_entries
        .iter()
        .find(|entry| entry.export_name == Some(export_name))
        .copied();
    if let Some(entry) = indirect {
        let requested_module = get_imported_module(agent, module, entry.module_request.unwrap());
        return match entry.import_name.unwrap() {
            ImportName::Namespace => Some(ResolvedBinding::Namespace {
                module: requested_module,
            }),
            ImportName::Name(import_name) => {
                resolve_export(agent, requested_module, import_name, resolve_set)
            }
        };
    }
    // 6. "default" is never found through star exports.
    let default_name = HeapString::from_static_str(agent, "default");
    if export_name == default_name {
        return None;
    }
    // 8. Star exports: a single unambiguous resolution wins; two distinct
    //    resolutions are ambiguous.
    let mut star_resolution: Option<ResolvedBinding> = None;
    let star_requests = agent[module].star_export_entries.clone();
    for request in star_requests {
        let requested_module = get_imported_module(agent, module, request);
        let resolution = resolve_export(agent, requested_module, export_name, resolve_set);
        match resolution {
            Some(ResolvedBinding::Ambiguous) => return Some(ResolvedBinding::Ambiguous),
            Some(resolution) => match star_resolution {
                None => star_resolution = Some(resolution),
                Some(existing) => {
                    if existing != resolution {
                        return Some(ResolvedBinding::Ambiguous);
                    }
                }
            },
            None => {}
        }
    }
    star_resolution
}

/// ### [16.2.1.7.3.3 InitializeEnvironment ( )](https://tc39.es/ecma262/#sec-source-text-module-record-initialize-environment)
fn initialize_environment(agent: &mut Agent, module: Module) -> JsResult<()> {
    // 1. Indirect exports must resolve, unambiguously.
    let indirect_names: Vec<HeapString> = agent[module]
        .indirect_export_entries
        .iter()
        .filter_map(|entry| entry.export_name)
        .collect();
    for export_name in indirect_names {
        let mut resolve_set = Vec::new();
        let resolution = resolve_export(agent, module, export_name, &mut resolve_set);
        match resolution {
            None => {
                let name = export_name.to_string_lossy(agent).into_owned();
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    &format!("The requested module does not provide an export named '{name}'"),
                ));
            }
            Some(ResolvedBinding::Ambiguous) => {
                let name = export_name.to_string_lossy(agent).into_owned();
                return Err(agent.throw_exception(
                    ExceptionType::SyntaxError,
                    &format!("The requested module contains conflicting star exports for name '{name}'"),
                ));
            }
            Some(_) => {}
        }
    }

    // 2-7. Create the module environment over the realm's global
    //    environment.
    let global_env = agent.get_realm(agent[module].realm).global_env();
    let env = new_module_environment(
        agent,
        Some(EnvironmentIndex::Global(global_env)),
    );
    agent[module].environment = Some(env);

    // 8. Create the import bindings.
    let import_entries = agent[module].import_entries.clone();
    for entry in import_entries {
        let imported_module = get_imported_module(agent, module, entry.module_request);
        match entry.import_name {
            ImportName::Namespace => {
                // i-iii. Namespace imports bind the namespace object
                //    directly, immutably.
                let namespace = get_module_namespace(agent, imported_module);
                agent[env]
                    .declarative
                    .create_immutable_binding(entry.local_name, true);
                agent[env]
                    .declarative
                    .initialize_binding(entry.local_name, namespace.into());
            }
            ImportName::Name(import_name) => {
                let mut resolve_set = Vec::new();
                let resolution =
                    resolve_export(agent, imported_module, import_name, &mut resolve_set);
                match resolution {
                    None => {
                        let name = import_name.to_string_lossy(agent).into_owned();
                        return Err(agent.throw_exception(
                            ExceptionType::SyntaxError,
                            &format!(
                                "The requested module does not provide an export named '{name}'"
                            ),
                        ));
                    }
                    Some(ResolvedBinding::Ambiguous) => {
                        let name = import_name.to_string_lossy(agent).into_owned();
                        return Err(agent.throw_exception(
                            ExceptionType::SyntaxError,
                            &format!(
                                "The requested module contains conflicting star exports for name '{name}'"
                            ),
                        ));
                    }
                    Some(ResolvedBinding::Namespace { module: target }) => {
                        let namespace = get_module_namespace(agent, target);
                        agent[env]
                            .declarative
                            .create_immutable_binding(entry.local_name, true);
                        agent[env]
                            .declarative
                            .initialize_binding(entry.local_name, namespace.into());
                    }
                    Some(ResolvedBinding::Binding {
                        module: target,
                        binding_name,
                    }) => {
                        // Indirect binding, resolved lazily on first read.
                        env.create_import_binding(agent, entry.local_name, target, binding_name);
                    }
                }
            }
        }
    }

    // 9-21. Hoist the module's own declarations into its environment.
    let source_code = agent[module].source_code;
    let program = source_code.program(agent);
    let mut var_declarations = Vec::new();
    var_scoped_declarations(&program.body, &mut var_declarations);
    let mut declared: Vec<String> = Vec::new();
    let mut function_declarations: Vec<&ast::Function> = Vec::new();
    for declaration in &var_declarations {
        match declaration {
            VarScopedDeclaration::Variable(declarator) => {
                let mut names = Vec::new();
                declarator
                    .id
                    .bound_names(&mut |identifier| names.push(identifier.name.as_str().to_string()));
                for name in names {
                    if !declared.contains(&name) {
                        declared.push(name);
                    }
                }
            }
            VarScopedDeclaration::Function(function) => {
                function_declarations.push(function);
            }
        }
    }
    for name in &declared {
        let name = HeapString::from_str(agent, name);
        agent[env].declarative.create_mutable_binding(name, false);
        agent[env]
            .declarative
            .initialize_binding(name, Value::Undefined);
    }
    let mut lex_declarations = Vec::new();
    lexically_scoped_declarations(&program.body, true, &mut lex_declarations);
    let mut lexical_names: Vec<(String, bool)> = Vec::new();
    for declaration in &lex_declarations {
        let is_const = declaration.is_constant_declaration();
        declaration.bound_names(&mut |identifier| {
            lexical_names.push((identifier.name.as_str().to_string(), is_const));
        });
    }
    for (name, is_const) in lexical_names {
        let name = HeapString::from_str(agent, &name);
        if is_const {
            agent[env].declarative.create_immutable_binding(name, true);
        } else {
            agent[env].declarative.create_mutable_binding(name, false);
        }
    }

    // Function declarations are instantiated eagerly in the module
    // environment; they need an execution context naming this module.
    let realm = agent[module].realm;
    let module_context = ExecutionContext {
        function: None,
        realm,
        script_or_module: Some(ScriptOrModule::Module(module)),
        ecmascript_code: Some(ECMAScriptCode {
            variable_environment: EnvironmentIndex::Module(env),
            lexical_environment: EnvironmentIndex::Module(env),
            is_strict_mode: true,
        }),
        current_span: oxc_span::Span::default(),
    };
    agent.execution_context_stack.push(module_context);
    for function in function_declarations {
        let mut name = None;
        function.bound_names(&mut |identifier| {
            name.get_or_insert_with(|| identifier.name.as_str().to_string());
        });
        let function_object =
            instantiate_function_object(agent, function, EnvironmentIndex::Module(env));
        if let Some(name) = name {
            let name = HeapString::from_str(agent, &name);
            if !env.has_binding(agent, name) {
                agent[env].declarative.create_mutable_binding(name, false);
                agent[env]
                    .declarative
                    .initialize_binding(name, function_object.into());
            } else {
                let _ = env.set_mutable_binding(agent, name, function_object.into(), true);
            }
        }
    }
    agent.execution_context_stack.pop();

    Ok(())
}

/// ### [16.2.1.6.3 Evaluate ( )](https://tc39.es/ecma262/#sec-moduleevaluation)
///
/// Synchronous evaluation; each node runs its body at most once and an
/// error is memoized for future requesters.
pub(crate) fn evaluate_module(agent: &mut Agent, module: Module) -> JsResult<()> {
    debug_assert!(matches!(
        agent[module].status,
        ModuleStatus::Linked | ModuleStatus::Evaluated
    ));
    let mut stack = Vec::new();
    let result = inner_module_evaluation(agent, module, &mut stack, 0);
    match result {
        Ok(_) => Ok(()),
        Err(error) => {
            // Mark every module on the stack evaluated-with-error.
            let error_value = match error {
                JsError::Thrown(value) => Some(value),
                JsError::Fatal(_) => None,
                JsError::Suspend(_) | JsError::GeneratorReturn(_) => {
                    unreachable!("module evaluation never suspends or is generator-returned")
                }
            };
            for member in stack {
                agent[member].status = ModuleStatus::Evaluated;
                agent[member].evaluation_error = error_value;
            }
            Err(error)
        }
    }
}

/// ### [16.2.1.6.1.2 InnerModuleEvaluation ( module, stack, index )](https://tc39.es/ecma262/#sec-innermoduleevaluation)
fn inner_module_evaluation(
    agent: &mut Agent,
    module: Module,
    stack: &mut Vec<Module>,
    mut index: u32,
) -> JsResult<u32> {
    match agent[module].status {
        ModuleStatus::Evaluated => {
            // 2-3. A previous evaluation error propagates to every new
            //    requester.
            return match agent[module].evaluation_error {
                Some(error) => Err(JsError::Thrown(error)),
                None => Ok(index),
            };
        }
        ModuleStatus::Evaluating => return Ok(index),
        ModuleStatus::Linked => {}
        _ => unreachable!("evaluating an unlinked module"),
    }
    // 5-9. Mark evaluating, record DFS indices, push.
    agent[module].status = ModuleStatus::Evaluating;
    agent[module].dfs_index = Some(index);
    agent[module].dfs_ancestor_index = Some(index);
    index += 1;
    stack.push(module);
    // 10. Evaluate requested modules first.
    let requested = agent[module].requested_modules.clone();
    for request in requested {
        let required_module = get_imported_module(agent, module, request);
        index = inner_module_evaluation(agent, required_module, stack, index)?;
        if agent[required_module].status == ModuleStatus::Evaluating {
            let required_ancestor = agent[required_module].dfs_ancestor_index.unwrap();
            let ancestor = agent[module].dfs_ancestor_index.unwrap();
            agent[module].dfs_ancestor_index = Some(ancestor.min(required_ancestor));
        }
    }
    // 11. Perform ? module.ExecuteModule().
    execute_module(agent, module)?;
    // 14-16. Close out the strongly connected component.
    if agent[module].dfs_ancestor_index == agent[module].dfs_index {
        loop {
            let required_module = stack.pop().unwrap();
            agent[required_module].status = ModuleStatus::Evaluated;
            if required_module == module {
                break;
            }
        }
    }
    Ok(index)
}

/// ### [16.2.1.7.3.4 ExecuteModule ( \[ capability \] )](https://tc39.es/ecma262/#sec-source-text-module-record-execute-module)
fn execute_module(agent: &mut Agent, module: Module) -> JsResult<()> {
    let realm = agent[module].realm;
    let env = agent[module].environment.unwrap();
    let source_code = agent[module].source_code;
    // 1-9. Push a module execution context; module code is always strict.
    let module_context = ExecutionContext {
        function: None,
        realm,
        script_or_module: Some(ScriptOrModule::Module(module)),
        ecmascript_code: Some(ECMAScriptCode {
            variable_environment: EnvironmentIndex::Module(env),
            lexical_environment: EnvironmentIndex::Module(env),
            is_strict_mode: true,
        }),
        current_span: oxc_span::Span::default(),
    };
    agent.execution_context_stack.push(module_context);
    let program = source_code.program(agent);
    let result = crate::engine::evaluator::evaluate_statements(agent, &program.body);
    agent.execution_context_stack.pop();
    result.map(|_| ())
}

/// ### [16.2.1.10 GetModuleNamespace ( module )](https://tc39.es/ecma262/#sec-getmodulenamespace)
pub(crate) fn get_module_namespace(agent: &mut Agent, module: Module) -> Module {
    if agent[module].namespace_exports.is_none() {
        // 3.a. Let exportedNames be module.GetExportedNames().
        let mut export_star_set = Vec::new();
        let exported_names = get_exported_names(agent, module, &mut export_star_set);
        // 3.b. Keep the names that resolve unambiguously, sorted.
        let mut unambiguous = Vec::new();
        for name in exported_names {
            let mut resolve_set = Vec::new();
            match resolve_export(agent, module, name, &mut resolve_set) {
                Some(ResolvedBinding::Binding { .. }) | Some(ResolvedBinding::Namespace { .. }) => {
                    unambiguous.push(name);
                }
                _ => {}
            }
        }
        unambiguous.sort_by(|a, b| {
            let a = a.to_string_lossy(agent).into_owned();
            let b = b.to_string_lossy(agent).into_owned();
            a.cmp(&b)
        });
        agent[module].namespace_exports = Some(unambiguous);
    }
    module
}

/// The sorted own keys of the namespace exotic object.
fn namespace_exports(agent: &mut Agent, module: Module) -> Vec<HeapString> {
    get_module_namespace(agent, module);
    agent[module].namespace_exports.clone().unwrap()
}

/// Read an export's current value through its resolved binding.
fn namespace_export_value(
    agent: &mut Agent,
    module: Module,
    export_name: HeapString,
) -> JsResult<Value> {
    let mut resolve_set = Vec::new();
    let resolution = resolve_export(agent, module, export_name, &mut resolve_set);
    match resolution {
        Some(ResolvedBinding::Binding {
            module: target,
            binding_name,
        }) => {
            let Some(env) = agent[target].environment else {
                return Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    "Cannot access binding of an unlinked module",
                ));
            };
            env.get_binding_value(agent, binding_name, true)
        }
        Some(ResolvedBinding::Namespace { module: target }) => {
            Ok(get_module_namespace(agent, target).into())
        }
        Some(ResolvedBinding::Ambiguous) => {
            let name = export_name.to_string_lossy(agent).into_owned();
            Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                &format!("The requested module contains conflicting star exports for name '{name}'"),
            ))
        }
        None => Ok(Value::Undefined),
    }
}

/// ### [10.4.6 Module Namespace Exotic Objects](https://tc39.es/ecma262/#sec-module-namespace-exotic-objects)
impl InternalSlots for Module {
    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }

    /// 10.4.6.1: the prototype is null.
    fn internal_prototype(self, _agent: &Agent) -> Option<Object> {
        None
    }

    fn internal_set_prototype(self, _agent: &mut Agent, _prototype: Option<Object>) {}

    fn internal_extensible(self, _agent: &Agent) -> bool {
        false
    }

    fn internal_set_extensible(self, _agent: &mut Agent, _extensible: bool) {}
}

impl InternalMethods for Module {
    fn internal_set_prototype_of(
        self,
        _agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        // 10.4.6.2 SetImmutablePrototype.
        Ok(prototype.is_none())
    }

    fn internal_is_extensible(self, _agent: &mut Agent) -> JsResult<bool> {
        Ok(false)
    }

    fn internal_prevent_extensions(self, _agent: &mut Agent) -> JsResult<bool> {
        Ok(true)
    }

    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // @@toStringTag is the only symbol key.
        if property_key == PropertyKey::Symbol(Symbol::from(WellKnownSymbolIndexes::ToStringTag)) {
            return Ok(Some(PropertyDescriptor {
                value: Some(Value::from_static_str(agent, "Module")),
                writable: Some(false),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            }));
        }
        let PropertyKey::String(name) = property_key else {
            return Ok(None);
        };
        if !namespace_exports(agent, self).contains(&name) {
            return Ok(None);
        }
        let value = namespace_export_value(agent, self, name)?;
        Ok(Some(PropertyDescriptor {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(false),
            ..Default::default()
        }))
    }

    fn internal_define_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 10.4.6.6: only compatible redefinitions of existing exports
        //    succeed.
        let current = self.internal_get_own_property(agent, property_key)?;
        let Some(current) = current else {
            return Ok(false);
        };
        if property_descriptor.is_accessor_descriptor()
            || property_descriptor.configurable == Some(true)
            || property_descriptor.enumerable == Some(false)
            || property_descriptor.writable == Some(false)
        {
            return Ok(false);
        }
        if let Some(value) = property_descriptor.value {
            let current_value = current.value.unwrap_or(Value::Undefined);
            return Ok(
                crate::ecmascript::abstract_operations::testing_and_comparison::same_value(
                    agent,
                    value,
                    current_value,
                ),
            );
        }
        Ok(true)
    }

    fn internal_has_property(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        Ok(self.internal_get_own_property(agent, property_key)?.is_some())
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        _receiver: Value,
    ) -> JsResult<Value> {
        match self.internal_get_own_property(agent, property_key)? {
            Some(descriptor) => Ok(descriptor.value.unwrap_or(Value::Undefined)),
            None => Ok(Value::Undefined),
        }
    }

    fn internal_set(
        self,
        _agent: &mut Agent,
        _property_key: PropertyKey,
        _value: Value,
        _receiver: Value,
    ) -> JsResult<bool> {
        // 10.4.6.9: writes always fail.
        Ok(false)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 10.4.6.10: exports cannot be deleted.
        Ok(self.internal_get_own_property(agent, property_key)?.is_none())
    }

    fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        let mut keys: Vec<PropertyKey> = namespace_exports(agent, self)
            .into_iter()
            .map(PropertyKey::String)
            .collect();
        keys.push(PropertyKey::Symbol(Symbol::from(
            WellKnownSymbolIndexes::ToStringTag,
        )));
        Ok(keys)
    }
}
