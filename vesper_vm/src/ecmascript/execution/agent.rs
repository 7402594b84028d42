// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
//!
//! A single-threaded execution agent: the heap, the execution context stack
//! and the microtask queue. One agent must not be entered concurrently from
//! multiple threads; re-entrancy from a host callback on the same thread
//! shares the context stack.

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use oxc_span::Span;

use crate::ecmascript::builtins::error::ErrorHeapData;
use crate::ecmascript::builtins::promise_objects::promise_jobs::Job;
use crate::ecmascript::host_interop::{MemberAccessor, TypeResolver};
use crate::ecmascript::scripts_and_modules::module::ModuleLoader;
use crate::ecmascript::scripts_and_modules::ScriptOrModule;
use crate::ecmascript::types::{HeapString, Symbol, Value};
use crate::heap::indexes::ErrorIndex;
use crate::heap::CreateHeapData;
use crate::Heap;

use super::environments::{get_identifier_reference, EnvironmentIndex};
use super::execution_context::ExecutionContext;
use super::realm::{Realm, RealmIdentifier};
use crate::ecmascript::types::Reference;

/// Engine-wide configuration, including the quota budget.
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Force strict mode for all evaluated code.
    pub strict: bool,
    /// Abort evaluation after this many statements.
    pub max_statements: Option<u64>,
    /// Abort evaluation after this much wall-clock time.
    pub timeout: Option<Duration>,
    /// Abort when the execution context stack grows past this depth.
    pub max_recursion_depth: Option<usize>,
    /// Abort when the heap allocation estimate passes this many bytes.
    pub memory_limit_bytes: Option<usize>,
    /// Expose host interop wrappers to scripts.
    pub allow_host_interop: bool,
    /// Expose type-reflection members on wrapped host values.
    pub interop_allow_get_type: bool,
    /// Allow property chains to reach into host reflection namespaces.
    pub interop_allow_system_reflection: bool,
}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// Which quota tripped a [`FatalKind::QuotaExceeded`] abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    Statements,
    Time,
    RecursionDepth,
    Memory,
}

/// Host-fatal conditions. These unwind through `finally` blocks but cannot
/// be observed by user `catch` clauses; they surface from the engine facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    QuotaExceeded(QuotaKind),
    HostReflectionForbidden,
    InternalInvariantFailure,
}

impl FatalKind {
    pub fn message(self) -> &'static str {
        match self {
            FatalKind::QuotaExceeded(QuotaKind::Statements) => {
                "The maximum number of statements executed has been reached"
            }
            FatalKind::QuotaExceeded(QuotaKind::Time) => {
                "The timeout has been exceeded"
            }
            FatalKind::QuotaExceeded(QuotaKind::RecursionDepth) => {
                "The recursion depth limit has been reached"
            }
            FatalKind::QuotaExceeded(QuotaKind::Memory) => {
                "The memory limit has been exceeded"
            }
            FatalKind::HostReflectionForbidden => {
                "Cannot access System.Reflection namespace, check Engine's interop options"
            }
            FatalKind::InternalInvariantFailure => "Internal invariant failure",
        }
    }
}

/// A throw completion: either a thrown JavaScript value or a host-fatal
/// condition passing through user code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsError {
    Thrown(Value),
    Fatal(FatalKind),
    /// A generator suspension in flight. Unwinds the evaluator frames of
    /// the suspending generator body only; never observable by user code.
    #[doc(hidden)]
    Suspend(Value),
    /// A `return` injected at a yield site by `Generator.prototype.return`;
    /// runs `finally` blocks on the way out but is not catchable.
    #[doc(hidden)]
    GeneratorReturn(Value),
}

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        JsError::Thrown(value)
    }

    /// The thrown JavaScript value. Fatal conditions carry none.
    pub fn value(self) -> Option<Value> {
        match self {
            JsError::Thrown(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a user-level `catch` clause may observe this error.
    pub(crate) fn is_catchable(self) -> bool {
        matches!(self, JsError::Thrown(_))
    }

    pub fn to_display_string(self, agent: &mut Agent) -> String {
        match self {
            JsError::Thrown(value) => {
                let repr = value.string_repr(agent);
                repr.to_string_lossy(agent).into_owned()
            }
            JsError::Fatal(kind) => kind.message().to_string(),
            JsError::Suspend(_) | JsError::GeneratorReturn(_) => {
                unreachable!("generator unwind escaped the evaluator")
            }
        }
    }
}

/// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    AggregateError,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ExceptionType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::AggregateError => "AggregateError",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }
}

/// Quota accounting, polled at statement boundaries with a bounded
/// frequency.
#[derive(Debug, Default)]
pub(crate) struct QuotaState {
    pub(crate) statements_executed: u64,
    pub(crate) deadline: Option<Instant>,
    /// Effective statement limit; bumped once by the unwind grace.
    statement_limit: Option<u64>,
    memory_limit: Option<usize>,
    /// Set when a quota has tripped: the grace budget is armed and will
    /// not be granted again.
    unwinding: bool,
    poll_countdown: u32,
}

const QUOTA_POLL_INTERVAL: u32 = 512;
/// Extra budget granted once after a quota trips, so that `finally`
/// blocks on the unwind path can run.
const UNWIND_GRACE_STATEMENTS: u64 = 4096;
const UNWIND_GRACE_TIME: Duration = Duration::from_millis(100);
const UNWIND_GRACE_MEMORY: usize = 1 << 20;

#[derive(Debug)]
pub struct Agent {
    pub(crate) heap: Heap,
    pub(crate) options: Options,
    pub(crate) execution_context_stack: Vec<ExecutionContext>,
    pub(crate) microtask_queue: VecDeque<Job>,
    pub(crate) global_symbol_registry: AHashMap<HeapString, Symbol>,
    pub(crate) quota: QuotaState,
    pub(crate) module_loader: Option<Rc<dyn ModuleLoader>>,
    pub(crate) type_resolver: Option<Rc<dyn TypeResolver>>,
    pub(crate) member_accessor: Option<Rc<dyn MemberAccessor>>,
    /// Frames of generator bodies currently executing, innermost last.
    pub(crate) coroutine_stack: Vec<crate::engine::coroutine::GeneratorFrame>,
}

impl Agent {
    pub fn new(options: Options) -> Self {
        Self {
            heap: Heap::new(),
            options,
            execution_context_stack: Vec::new(),
            microtask_queue: VecDeque::new(),
            global_symbol_registry: AHashMap::new(),
            quota: QuotaState::default(),
            module_loader: None,
            type_resolver: None,
            member_accessor: None,
            coroutine_stack: Vec::new(),
        }
    }

    pub fn current_realm_id(&self) -> RealmIdentifier {
        self.execution_context_stack.last().unwrap().realm
    }

    pub fn current_realm(&self) -> &Realm {
        self.get_realm(self.current_realm_id())
    }

    pub fn current_realm_mut(&mut self) -> &mut Realm {
        self.get_realm_mut(self.current_realm_id())
    }

    pub fn get_realm(&self, id: RealmIdentifier) -> &Realm {
        self.heap
            .realms
            .get(id.into_index())
            .expect("RealmIdentifier out of bounds")
            .as_ref()
            .expect("RealmIdentifier slot empty")
    }

    pub fn get_realm_mut(&mut self, id: RealmIdentifier) -> &mut Realm {
        self.heap
            .realms
            .get_mut(id.into_index())
            .expect("RealmIdentifier out of bounds")
            .as_mut()
            .expect("RealmIdentifier slot empty")
    }

    /// ### [9.4.6 GetGlobalObject ( )](https://tc39.es/ecma262/#sec-getglobalobject)
    pub(crate) fn current_global_object(&self) -> crate::ecmascript::types::Object {
        self.current_realm().global_object
    }

    pub(crate) fn running_execution_context(&self) -> &ExecutionContext {
        self.execution_context_stack.last().unwrap()
    }

    pub(crate) fn running_execution_context_mut(&mut self) -> &mut ExecutionContext {
        self.execution_context_stack.last_mut().unwrap()
    }

    pub(crate) fn current_lexical_environment(&self) -> EnvironmentIndex {
        self.running_execution_context()
            .ecmascript_code
            .as_ref()
            .unwrap()
            .lexical_environment
    }

    pub(crate) fn current_variable_environment(&self) -> EnvironmentIndex {
        self.running_execution_context()
            .ecmascript_code
            .as_ref()
            .unwrap()
            .variable_environment
    }

    pub(crate) fn set_lexical_environment(&mut self, env: EnvironmentIndex) {
        self.running_execution_context_mut()
            .ecmascript_code
            .as_mut()
            .unwrap()
            .lexical_environment = env;
    }

    pub(crate) fn set_variable_environment(&mut self, env: EnvironmentIndex) {
        self.running_execution_context_mut()
            .ecmascript_code
            .as_mut()
            .unwrap()
            .variable_environment = env;
    }

    pub(crate) fn is_strict_code(&self) -> bool {
        self.options.strict
            || self
                .running_execution_context()
                .ecmascript_code
                .as_ref()
                .is_some_and(|code| code.is_strict_mode)
    }

    /// Allocate an error value carrying a snapshot of the current call
    /// stack, and wrap it into a throw completion.
    pub fn throw_exception(&mut self, kind: ExceptionType, message: &str) -> JsError {
        let message = HeapString::from_str(self, message);
        self.throw_exception_with_message(kind, message)
    }

    pub(crate) fn throw_exception_with_message(
        &mut self,
        kind: ExceptionType,
        message: HeapString,
    ) -> JsError {
        let stack = self.capture_stack_trace(kind, Some(message));
        let stack = HeapString::from_string(self, stack);
        let error: ErrorIndex = self.heap.create(ErrorHeapData::new(
            kind,
            Some(message),
            Some(stack),
        ));
        JsError::Thrown(Value::Object(crate::ecmascript::types::Object::Error(
            crate::ecmascript::builtins::error::Error(error),
        )))
    }

    /// Synthesize the `stack` string by walking the execution context chain.
    pub(crate) fn capture_stack_trace(
        &mut self,
        kind: ExceptionType,
        message: Option<HeapString>,
    ) -> String {
        let mut out = String::new();
        out.push_str(kind.as_str());
        if let Some(message) = message {
            out.push_str(": ");
            out.push_str(&message.to_string_lossy(self));
        }
        let frames: Vec<(Option<HeapString>, Option<(u32, u32)>)> = self
            .execution_context_stack
            .iter()
            .rev()
            .map(|context| (context.function_name(self), context.source_position(self)))
            .collect();
        for (name, position) in frames {
            out.push_str("\n    at ");
            match name {
                Some(name) => {
                    let name = name.to_string_lossy(self).into_owned();
                    out.push_str(if name.is_empty() { "<anonymous>" } else { &name });
                }
                None => out.push_str("<anonymous>"),
            }
            if let Some((line, column)) = position {
                out.push_str(&format!(" ({line}:{column})"));
            }
        }
        out
    }

    /// Record a statement executed, enforcing the statement, time and
    /// memory quotas. Time and memory are polled with a bounded frequency.
    /// The first trip of a quota arms a bounded grace budget so that
    /// `finally` blocks on the unwind path still run; a second trip aborts
    /// them too.
    pub(crate) fn note_statement(&mut self, span: Span) -> JsResult<()> {
        if let Some(context) = self.execution_context_stack.last_mut() {
            context.current_span = span;
        }
        self.quota.statements_executed += 1;
        if let Some(limit) = self.quota.statement_limit {
            if self.quota.statements_executed > limit {
                if !self.quota.unwinding {
                    self.quota.unwinding = true;
                    self.quota.statement_limit = Some(limit + UNWIND_GRACE_STATEMENTS);
                    self.quota.deadline = self.quota.deadline.map(|d| d + UNWIND_GRACE_TIME);
                    self.quota.memory_limit =
                        self.quota.memory_limit.map(|m| m + UNWIND_GRACE_MEMORY);
                }
                return Err(JsError::Fatal(FatalKind::QuotaExceeded(
                    QuotaKind::Statements,
                )));
            }
        }
        if self.quota.poll_countdown == 0 {
            self.quota.poll_countdown = QUOTA_POLL_INTERVAL;
            if let Some(deadline) = self.quota.deadline {
                if Instant::now() > deadline {
                    if !self.quota.unwinding {
                        self.quota.unwinding = true;
                        self.quota.deadline = Some(deadline + UNWIND_GRACE_TIME);
                        self.quota.statement_limit =
                            self.quota.statement_limit.map(|l| l + UNWIND_GRACE_STATEMENTS);
                    }
                    return Err(JsError::Fatal(FatalKind::QuotaExceeded(QuotaKind::Time)));
                }
            }
            if let Some(limit) = self.quota.memory_limit {
                if self.heap.alloc_counter > limit {
                    if !self.quota.unwinding {
                        self.quota.unwinding = true;
                        self.quota.memory_limit = Some(limit + UNWIND_GRACE_MEMORY);
                    }
                    return Err(JsError::Fatal(FatalKind::QuotaExceeded(QuotaKind::Memory)));
                }
            }
        } else {
            self.quota.poll_countdown -= 1;
        }
        Ok(())
    }

    /// Enforce the call-depth quota; called on function entry.
    pub(crate) fn check_recursion_depth(&mut self) -> JsResult<()> {
        if let Some(max_depth) = self.options.max_recursion_depth {
            if self.execution_context_stack.len() > max_depth {
                return Err(JsError::Fatal(FatalKind::QuotaExceeded(
                    QuotaKind::RecursionDepth,
                )));
            }
        }
        Ok(())
    }

    /// Arm the quota budgets for a fresh host entry.
    pub(crate) fn start_quota_clock(&mut self) {
        self.quota.deadline = self.options.timeout.map(|timeout| Instant::now() + timeout);
        self.quota.statements_executed = 0;
        self.quota.statement_limit = self.options.max_statements;
        self.quota.memory_limit = self.options.memory_limit_bytes;
        self.quota.unwinding = false;
    }

    /// Run queued microtasks to completion in FIFO order.
    pub fn drain_microtasks(&mut self) {
        while let Some(job) = self.microtask_queue.pop_front() {
            // A job failing leaves the rest of the queue intact.
            let _ = job.run(self);
        }
    }

    pub(crate) fn enqueue_microtask(&mut self, job: Job) {
        self.microtask_queue.push_back(job);
    }
}

/// ### [9.4.1 GetActiveScriptOrModule ( )](https://tc39.es/ecma262/#sec-getactivescriptormodule)
pub(crate) fn get_active_script_or_module(agent: &Agent) -> Option<ScriptOrModule> {
    let ec = agent
        .execution_context_stack
        .iter()
        .rev()
        .find(|context| context.script_or_module.is_some());
    ec.and_then(|context| context.script_or_module)
}

/// ### [9.4.2 ResolveBinding ( name \[ , env \] )](https://tc39.es/ecma262/#sec-resolvebinding)
///
/// The abstract operation ResolveBinding takes argument name (a String) and
/// optional argument env (an Environment Record or undefined) and returns
/// either a normal completion containing a Reference Record or a throw
/// completion. It is used to determine the binding of name.
pub(crate) fn resolve_binding(
    agent: &mut Agent,
    name: HeapString,
    strict: bool,
    env: Option<EnvironmentIndex>,
) -> JsResult<Reference> {
    // 1. If env is not present or env is undefined, set env to the running
    //    execution context's LexicalEnvironment.
    let env = env.unwrap_or_else(|| agent.current_lexical_environment());
    // 2. Assert: env is an Environment Record.
    // 3. Return ? GetIdentifierReference(env, name, strict).
    get_identifier_reference(agent, Some(env), name, strict)
}
