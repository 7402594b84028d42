// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The host-facing engine facade.
//!
//! An [`Engine`] owns one agent and one realm. The host feeds it source
//! text, manipulates globals, invokes callables and drives the microtask
//! queue; quota budgets are armed per entry and abort with host-fatal
//! errors that bypass user `catch`.

use std::rc::Rc;
use std::time::Duration;

use crate::ecmascript::abstract_operations::operations_on_objects::{get, set};
use crate::ecmascript::builders::builtin_function_builder::create_builtin_function;
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin, RegularFn};
use crate::ecmascript::execution::agent::{FatalKind, Options, QuotaKind};
use crate::ecmascript::execution::execution_context::ExecutionContext;
use crate::ecmascript::execution::{Agent, JsError, Realm, RealmIdentifier};
use crate::ecmascript::host_interop::{MemberAccessor, SharedObjectWrapper, TypeResolver};
use crate::ecmascript::scripts_and_modules::module::{
    evaluate_module, get_module_namespace, link_module, load_module, ModuleLoader,
};
use crate::ecmascript::scripts_and_modules::script::Script;
use crate::ecmascript::types::{HeapString, PropertyKey, Value};

pub use crate::ecmascript::builtins::builtin_function::ArgumentsList;
pub use crate::ecmascript::host_interop::{
    MemberAccess, MemberDescriptor, MemberKind, MethodSignature, ObjectWrapper, ParameterKind,
    TypeHandle,
};

/// Configuration of a single engine instance.
#[derive(Default)]
pub struct EngineOptions {
    /// Force strict mode for every evaluated script.
    pub strict: bool,
    /// Cap on executed statements per host entry.
    pub max_statements: Option<u64>,
    /// Wall-clock budget per host entry.
    pub timeout: Option<Duration>,
    /// Execution context stack depth cap.
    pub max_recursion_depth: Option<usize>,
    /// Heap allocation estimate cap, in bytes.
    pub memory_limit_bytes: Option<usize>,
    /// Enable host interop wrappers.
    pub allow_host_interop: bool,
    /// Expose `GetType`-style reflection members on wrapped values.
    pub interop_allow_get_type: bool,
    /// Allow property chains into host reflection namespaces.
    pub interop_allow_system_reflection: bool,
    /// Host callbacks.
    pub type_resolver: Option<Rc<dyn TypeResolver>>,
    pub member_accessor: Option<Rc<dyn MemberAccessor>>,
    pub module_loader: Option<Rc<dyn ModuleLoader>>,
}

impl core::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("strict", &self.strict)
            .field("max_statements", &self.max_statements)
            .field("timeout", &self.timeout)
            .field("max_recursion_depth", &self.max_recursion_depth)
            .field("memory_limit_bytes", &self.memory_limit_bytes)
            .field("allow_host_interop", &self.allow_host_interop)
            .field("interop_allow_get_type", &self.interop_allow_get_type)
            .field(
                "interop_allow_system_reflection",
                &self.interop_allow_system_reflection,
            )
            .finish()
    }
}

/// Errors surfaced to the host. JavaScript exceptions that user code did
/// not catch arrive as `Uncaught`; quota and sandbox trips arrive as the
/// dedicated host-fatal variants that no user `catch` can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Source text failed to parse; one message per diagnostic.
    Parse(Vec<String>),
    /// An uncaught JavaScript exception, rendered.
    Uncaught(String),
    /// A quota cap tripped.
    QuotaExceeded(QuotaKind, &'static str),
    /// The reflection sandbox tripped.
    HostReflectionForbidden(&'static str),
    /// An engine invariant failed.
    Internal(&'static str),
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::Parse(messages) => {
                write!(f, "Parse error: {}", messages.join("; "))
            }
            EngineError::Uncaught(message) => write!(f, "Uncaught {message}"),
            EngineError::QuotaExceeded(_, message)
            | EngineError::HostReflectionForbidden(message)
            | EngineError::Internal(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for EngineError {}

pub struct Engine {
    agent: Agent,
    realm: RealmIdentifier,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        let agent_options = Options {
            strict: options.strict,
            max_statements: options.max_statements,
            timeout: options.timeout,
            max_recursion_depth: options.max_recursion_depth,
            memory_limit_bytes: options.memory_limit_bytes,
            allow_host_interop: options.allow_host_interop,
            interop_allow_get_type: options.interop_allow_get_type,
            interop_allow_system_reflection: options.interop_allow_system_reflection,
        };
        let mut agent = Agent::new(agent_options);
        agent.module_loader = options.module_loader;
        agent.type_resolver = options.type_resolver;
        agent.member_accessor = options.member_accessor;
        let realm = Realm::create(&mut agent);
        Engine { agent, realm }
    }

    /// Parse the source text as a script, hoist its declarations and run
    /// its top level; the completion value comes back as a JS value.
    pub fn execute(&mut self, source: &str) -> Result<Value, EngineError> {
        let script = Script::parse(&mut self.agent, source.to_string(), self.realm)
            .map_err(|errors| {
                EngineError::Parse(errors.iter().map(|error| error.to_string()).collect())
            })?;
        self.agent.start_quota_clock();
        script
            .evaluate(&mut self.agent)
            .map_err(|error| self.convert_error(error))
    }

    /// Evaluate a single expression.
    pub fn evaluate(&mut self, expression: &str) -> Result<Value, EngineError> {
        self.execute(&format!("({expression}\n);"))
    }

    /// Resolve, link and evaluate a module graph; returns its namespace
    /// object.
    pub fn import_module(&mut self, specifier: &str) -> Result<Value, EngineError> {
        self.agent.start_quota_clock();
        self.enter_host_context();
        let result = (|| {
            let specifier = HeapString::from_str(&mut self.agent, specifier);
            let module = load_module(&mut self.agent, None, specifier)?;
            link_module(&mut self.agent, module)?;
            evaluate_module(&mut self.agent, module)?;
            Ok(get_module_namespace(&mut self.agent, module).into())
        })();
        self.exit_host_context();
        result.map_err(|error| self.convert_error(error))
    }

    /// Read a global binding.
    pub fn get_value(&mut self, name: &str) -> Result<Value, EngineError> {
        self.enter_host_context();
        let global = self.agent.get_realm(self.realm).global_object();
        let key = PropertyKey::from_str(&mut self.agent, name);
        let result = get(&mut self.agent, global, key);
        self.exit_host_context();
        result.map_err(|error| self.convert_error(error))
    }

    /// Write a global binding.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), EngineError> {
        self.enter_host_context();
        let global = self.agent.get_realm(self.realm).global_object();
        let key = PropertyKey::from_str(&mut self.agent, name);
        let result = set(&mut self.agent, global, key, value, true);
        self.exit_host_context();
        result.map_err(|error| self.convert_error(error))
    }

    /// Call a JS function from the host, with quotas armed.
    pub fn invoke(
        &mut self,
        callable: Value,
        this_value: Value,
        arguments: &[Value],
    ) -> Result<Value, EngineError> {
        self.agent.start_quota_clock();
        self.enter_host_context();
        let result = crate::ecmascript::abstract_operations::operations_on_objects::call_function(
            &mut self.agent,
            callable,
            this_value,
            arguments,
        );
        self.exit_host_context();
        result.map_err(|error| self.convert_error(error))
    }

    /// Run queued microtasks to completion in FIFO order.
    pub fn drain_microtasks(&mut self) {
        self.enter_host_context();
        self.agent.drain_microtasks();
        self.exit_host_context();
    }

    /// Install a native function as a global.
    pub fn set_function(&mut self, name: &'static str, behaviour: RegularFn) {
        struct HostFunction;
        impl Builtin for HostFunction {
            const NAME: &'static str = "";
            const LENGTH: u8 = 0;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(|_, _, _| Ok(Value::Undefined));
        }
        self.enter_host_context();
        let function_prototype = self
            .agent
            .get_realm(self.realm)
            .intrinsics()
            .function_prototype()
            .into();
        let function =
            create_builtin_function::<HostFunction>(&mut self.agent, self.realm, function_prototype);
        let function_name = HeapString::from_static_str(&mut self.agent, name);
        self.agent[function].behaviour = Behaviour::Regular(behaviour);
        self.agent[function].initial_name = Some(function_name);
        let value = function.into();
        self.exit_host_context();
        let _ = self.set_value(name, value);
    }

    /// Wrap a host object and hand the engine value back, for the host to
    /// install wherever it wants.
    pub fn wrap_host_object(&mut self, wrapper: SharedObjectWrapper) -> Value {
        self.enter_host_context();
        let object =
            crate::ecmascript::builtins::host_object::wrap_host_object(&mut self.agent, wrapper);
        self.exit_host_context();
        object.into()
    }

    /// Wrap a host type object; member reads on it are subject to the
    /// reflection sandbox.
    pub fn wrap_host_type(&mut self, wrapper: SharedObjectWrapper) -> Value {
        self.enter_host_context();
        let object =
            crate::ecmascript::builtins::host_object::wrap_host_type(&mut self.agent, wrapper);
        self.exit_host_context();
        object.into()
    }

    /// Resolve a host type by name through the configured type resolver.
    pub fn resolve_type(&mut self, name: &str) -> Option<TypeHandle> {
        let resolver = self.agent.type_resolver.clone()?;
        resolver.resolve_type(name)
    }

    /// Render a value the way an embedder console would.
    pub fn display(&mut self, value: Value) -> String {
        self.enter_host_context();
        let text = value.string_repr(&mut self.agent);
        let text = text.to_string_lossy(&self.agent).into_owned();
        self.exit_host_context();
        text
    }

    /// Allocate a JS string.
    pub fn alloc_string(&mut self, text: &str) -> Value {
        Value::from_str(&mut self.agent, text)
    }

    /// Typed introspection of the realm's global bindings.
    pub fn global_bindings(
        &self,
    ) -> crate::ecmascript::execution::environments::global_environment::GlobalBindingsSnapshot
    {
        let env = self.agent.get_realm(self.realm).global_env();
        env.snapshot(&self.agent)
    }

    pub fn agent(&mut self) -> &mut Agent {
        &mut self.agent
    }

    /// Operations outside script evaluation still need a running context
    /// naming the realm.
    fn enter_host_context(&mut self) {
        self.agent.execution_context_stack.push(ExecutionContext {
            function: None,
            realm: self.realm,
            script_or_module: None,
            ecmascript_code: None,
            current_span: oxc_span::Span::default(),
        });
    }

    fn exit_host_context(&mut self) {
        self.agent.execution_context_stack.pop();
    }

    fn convert_error(&mut self, error: JsError) -> EngineError {
        match error {
            JsError::Thrown(_) => {
                // Rendering may call back into the object model, which
                // needs a running context.
                self.enter_host_context();
                let rendered = error.to_display_string(&mut self.agent);
                self.exit_host_context();
                EngineError::Uncaught(rendered)
            }
            JsError::Fatal(kind) => match kind {
                FatalKind::QuotaExceeded(quota) => {
                    EngineError::QuotaExceeded(quota, kind.message())
                }
                FatalKind::HostReflectionForbidden => {
                    EngineError::HostReflectionForbidden(kind.message())
                }
                FatalKind::InternalInvariantFailure => EngineError::Internal(kind.message()),
            },
            JsError::Suspend(_) | JsError::GeneratorReturn(_) => {
                EngineError::Internal("Internal invariant failure")
            }
        }
    }
}
