// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generator suspension and resumption.
//!
//! Each suspension site is captured as an explicit continuation object: the
//! resume path records the statement-level route from the body root to the
//! suspended statement (with the environments and iterators live at each
//! level), and the innermost statement re-evaluates on resume with the
//! already-delivered yield values replayed from a per-statement cache.
//! Locals survive suspension in the function environment, which lives in
//! the heap.

use ahash::AHashMap;

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::IteratorRecord;
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::create_iter_result_object;
use crate::ecmascript::builtins::generator_objects::{
    Generator, GeneratorState, SavedGeneratorContext,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::environments::EnvironmentIndex;
use crate::ecmascript::execution::execution_context::{ECMAScriptCode, ExecutionContext};
use crate::ecmascript::execution::{Agent, JsError, JsResult};
use crate::ecmascript::types::{PropertyKey, Value};
use crate::engine::evaluator::Completion;

/// How a suspended generator is being re-entered.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ResumeKind {
    Next(Value),
    Throw(Value),
    Return(Value),
}

/// One step of the route from the body root to the suspension point.
#[derive(Debug)]
pub(crate) enum PathSegment {
    /// Statement index within a statement list.
    Index(u32),
    /// The consequent or alternate branch of an if statement.
    IfConsequent,
    IfAlternate,
    /// A block statement, with the environments needed to finish it.
    Block {
        outer_env: EnvironmentIndex,
    },
    /// The body of a while or do-while loop.
    LoopBody,
    /// The body of a classic for loop, or one of its header expressions.
    ForTest,
    ForUpdate,
    ForBody {
        outer_env: EnvironmentIndex,
        iteration_env: EnvironmentIndex,
    },
    /// The body of a for-of loop, carrying the live iterator.
    ForOfBody {
        outer_env: EnvironmentIndex,
        iterator: IteratorRecord,
    },
    /// The body of a for-in loop, carrying the remaining keys.
    ForInBody {
        outer_env: EnvironmentIndex,
        keys: Vec<PropertyKey>,
        position: u32,
    },
    /// The consequent list of a switch case.
    SwitchCase {
        outer_env: EnvironmentIndex,
        case_index: u32,
    },
    /// A labelled statement's body.
    LabelledBody,
    /// The body of a with statement.
    WithBody {
        outer_env: EnvironmentIndex,
    },
    /// The regions of a try statement.
    TryBlock,
    CatchBlock {
        outer_env: EnvironmentIndex,
    },
    FinallyBlock {
        prior: FinallyPrior,
    },
}

/// The completion a finally block was entered with, restored when a
/// suspension inside the finally resumes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FinallyPrior {
    Normal,
    Abrupt(AbruptKind),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum AbruptKind {
    Thrown(Value),
    Return(Value),
    Break(Option<crate::ecmascript::types::HeapString>, Option<Value>),
    Continue(Option<crate::ecmascript::types::HeapString>, Option<Value>),
}

/// The continuation record of a suspended (or executing) generator body.
#[derive(Debug, Default)]
pub struct GeneratorFrame {
    /// Expected execution-context depth while the body runs; the frame is
    /// active only for evaluator code at exactly this depth.
    pub(crate) context_depth: usize,
    /// Statement route to the suspension point, innermost first; consumed
    /// root-first (from the back) during resumption.
    pub(crate) resume_path: Vec<PathSegment>,
    /// Yield values already delivered within the statement being
    /// re-evaluated, in yield order.
    pub(crate) cached_yields: Vec<Value>,
    /// Yields executed so far in the current statement evaluation.
    pub(crate) yield_ordinal: u32,
    /// The resume value waiting to be consumed at the active yield site.
    pub(crate) pending: Option<ResumeKind>,
    /// Live delegation iterators of `yield*` sites, by delegation ordinal.
    pub(crate) yield_star_iterators: AHashMap<u32, IteratorRecord>,
    pub(crate) yield_star_ordinal: u32,
}

impl GeneratorFrame {
    fn new(context_depth: usize) -> Self {
        GeneratorFrame {
            context_depth,
            ..Default::default()
        }
    }

    pub(crate) fn is_resuming(&self) -> bool {
        !self.resume_path.is_empty()
    }
}

impl Agent {
    /// The generator frame governing the current evaluator code, if any.
    /// Nested ordinary function calls push execution contexts, taking the
    /// evaluator out of the frame's depth.
    pub(crate) fn active_generator_frame(&mut self) -> Option<&mut GeneratorFrame> {
        let depth = self.execution_context_stack.len();
        self.coroutine_stack
            .last_mut()
            .filter(|frame| frame.context_depth == depth)
    }

    pub(crate) fn generator_is_resuming(&self) -> bool {
        let depth = self.execution_context_stack.len();
        self.coroutine_stack
            .last()
            .is_some_and(|frame| frame.context_depth == depth && frame.is_resuming())
    }

    /// Pop the next (root-most) path segment while resuming.
    pub(crate) fn generator_pop_segment(&mut self) -> Option<PathSegment> {
        let frame = self.active_generator_frame()?;
        frame.resume_path.pop()
    }

    /// Record a path segment while a suspension unwinds.
    pub(crate) fn generator_record_segment(&mut self, segment: PathSegment) {
        if let Some(frame) = self.active_generator_frame() {
            frame.resume_path.push(segment);
        }
    }

    /// Reset the per-statement yield replay state; called when a statement
    /// completes and at loop back-edges.
    pub(crate) fn generator_reset_replay(&mut self) {
        if let Some(frame) = self.active_generator_frame() {
            frame.cached_yields.clear();
            frame.yield_ordinal = 0;
            frame.yield_star_iterators.clear();
            frame.yield_star_ordinal = 0;
        }
    }

    /// Begin a statement evaluation: ordinals restart. The replay cache is
    /// kept only while the resume point is still ahead (the path is being
    /// descended or the resume value is unconsumed); once execution is
    /// fresh again, a new statement starts with an empty cache.
    pub(crate) fn generator_begin_statement(&mut self) {
        if let Some(frame) = self.active_generator_frame() {
            if frame.resume_path.is_empty() && frame.pending.is_none() {
                frame.cached_yields.clear();
                frame.yield_star_iterators.clear();
            }
            frame.yield_ordinal = 0;
            frame.yield_star_ordinal = 0;
        }
    }
}

/// ### [27.5.3.3 GeneratorResume ( generator, value, generatorBrand )](https://tc39.es/ecma262/#sec-generatorresume)
/// and [27.5.3.4 GeneratorResumeAbrupt](https://tc39.es/ecma262/#sec-generatorresumeabrupt).
///
/// Returns the iterator result object.
pub(crate) fn generator_resume(
    agent: &mut Agent,
    generator: Generator,
    resume_kind: ResumeKind,
) -> JsResult<Value> {
    // 1-3. Validate the generator state.
    let state = core::mem::take(&mut agent[generator].state);
    let (function, context, frame) = match state {
        GeneratorState::Executing => {
            return Err(agent.throw_exception(
                ExceptionType::TypeError,
                "Generator is already running",
            ));
        }
        GeneratorState::Completed => {
            // 27.5.3.3 step 4: resuming a completed generator is done;
            //    throw and return feed straight through.
            agent[generator].state = GeneratorState::Completed;
            return match resume_kind {
                ResumeKind::Next(_) => {
                    Ok(create_iter_result_object(agent, Value::Undefined, true).into())
                }
                ResumeKind::Return(value) => {
                    Ok(create_iter_result_object(agent, value, true).into())
                }
                ResumeKind::Throw(value) => Err(JsError::Thrown(value)),
            };
        }
        GeneratorState::SuspendedStart { function, context } => {
            // An abrupt resume before the first next() completes the
            // generator without running the body.
            match resume_kind {
                ResumeKind::Next(_) => {}
                ResumeKind::Return(value) => {
                    agent[generator].state = GeneratorState::Completed;
                    return Ok(create_iter_result_object(agent, value, true).into());
                }
                ResumeKind::Throw(value) => {
                    agent[generator].state = GeneratorState::Completed;
                    return Err(JsError::Thrown(value));
                }
            }
            let depth = agent.execution_context_stack.len() + 1;
            (function, context, GeneratorFrame::new(depth))
        }
        GeneratorState::SuspendedYield {
            function,
            context,
            mut frame,
        } => {
            frame.context_depth = agent.execution_context_stack.len() + 1;
            frame.pending = Some(resume_kind);
            (function, context, frame)
        }
    };
    agent[generator].state = GeneratorState::Executing;

    // 4-7. Restore the suspended execution context and re-enter the body.
    let generator_context = ExecutionContext {
        function: Some(crate::ecmascript::types::Function::ECMAScriptFunction(
            function,
        )),
        realm: context.realm,
        script_or_module: context.script_or_module,
        ecmascript_code: Some(ECMAScriptCode {
            variable_environment: context.variable_environment,
            lexical_environment: context.lexical_environment,
            is_strict_mode: context.is_strict_mode,
        }),
        current_span: agent[function].source_text,
    };
    agent.execution_context_stack.push(generator_context);
    agent.coroutine_stack.push(frame);

    let ast = function.ast(agent);
    let body = ast.ecmascript_code();
    let result = crate::engine::evaluator::evaluate_statements(agent, &body.statements);

    let mut frame = agent.coroutine_stack.pop().unwrap();
    // Capture the environments live at the suspension point before the
    // context is popped.
    let code = agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap();
    let suspended_context = SavedGeneratorContext {
        realm: context.realm,
        script_or_module: context.script_or_module,
        lexical_environment: code.lexical_environment,
        variable_environment: code.variable_environment,
        is_strict_mode: code.is_strict_mode,
    };
    agent.execution_context_stack.pop();

    match result {
        // A suspension reached the body root: park the frame and hand the
        // yielded value out.
        Err(JsError::Suspend(value)) => {
            frame.pending = None;
            agent[generator].state = GeneratorState::SuspendedYield {
                function,
                context: suspended_context,
                frame,
            };
            Ok(create_iter_result_object(agent, value, false).into())
        }
        // The body returned or an injected return unwound the body.
        Ok(completion) => {
            agent[generator].state = GeneratorState::Completed;
            let value = match completion {
                Completion::Return(value) => value,
                Completion::Normal(_) => Value::Undefined,
                _ => Value::Undefined,
            };
            Ok(create_iter_result_object(agent, value, true).into())
        }
        Err(JsError::GeneratorReturn(value)) => {
            agent[generator].state = GeneratorState::Completed;
            Ok(create_iter_result_object(agent, value, true).into())
        }
        // A thrown error or fatal condition completes the generator.
        Err(error) => {
            agent[generator].state = GeneratorState::Completed;
            Err(error)
        }
    }
}
