// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SourceCode captures a parsed program together with the arena and source
//! string backing it. Functions created during evaluation keep references
//! into the AST; the heap record keeps the allocation alive for as long as
//! any of them exists (which, with an arena heap, is the agent's
//! lifetime).

use core::fmt::Debug;
use core::ops::{Index, IndexMut};
use core::ptr::NonNull;

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::{SemanticBuilder, SemanticBuilderReturn};
use oxc_span::SourceType;

use crate::ecmascript::execution::Agent;
use crate::heap::indexes::SourceCodeIndex;
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SourceCode(pub(crate) SourceCodeIndex);

pub struct SourceCodeHeapData {
    /// The source text. Boxed so that the parsed program's internal
    /// references into it stay valid while the record lives.
    source: Box<str>,
    /// The parsed AST of the source code.
    ///
    /// ## Safety
    ///
    /// Contains self-referential pointers into the source and the
    /// allocator; must be dropped before the allocator.
    program: NonNull<Program<'static>>,
    /// The arena that owns the parsed data.
    allocator: NonNull<Allocator>,
}

// SAFETY: The agent owning the heap is single-threaded; the pointers are
// never shared across threads.
unsafe impl Send for SourceCodeHeapData {}

impl Debug for SourceCodeHeapData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceCodeHeapData")
            .field("source", &self.source)
            .field("allocator", &"[arena]")
            .finish()
    }
}

impl Drop for SourceCodeHeapData {
    fn drop(&mut self) {
        // SAFETY: Drop order matters; the program refers into the
        // allocator.
        unsafe {
            drop(Box::from_raw(self.program.as_ptr()));
            drop(Box::from_raw(self.allocator.as_ptr()));
        }
    }
}

impl Index<SourceCode> for Agent {
    type Output = SourceCodeHeapData;

    fn index(&self, index: SourceCode) -> &Self::Output {
        self.heap
            .source_codes
            .get(index.0.into_index())
            .expect("SourceCode out of bounds")
            .as_ref()
            .expect("SourceCode slot empty")
    }
}

impl IndexMut<SourceCode> for Agent {
    fn index_mut(&mut self, index: SourceCode) -> &mut Self::Output {
        self.heap
            .source_codes
            .get_mut(index.0.into_index())
            .expect("SourceCode out of bounds")
            .as_mut()
            .expect("SourceCode slot empty")
    }
}

impl SourceCode {
    /// Parse the given source text and move the parse results into the
    /// heap. A byte-order mark at position 0 is ignored.
    pub(crate) fn parse_source(
        agent: &mut Agent,
        source: String,
        source_type: SourceType,
    ) -> Result<SourceCode, Vec<OxcDiagnostic>> {
        let source = source
            .strip_prefix('\u{FEFF}')
            .map(str::to_string)
            .unwrap_or(source);
        let source: Box<str> = source.into_boxed_str();
        // SAFETY: The returned reference is used only while the boxed
        // source is alive; it moves into the heap record below and is
        // dropped with it.
        let source_text =
            unsafe { core::mem::transmute::<&str, &'static str>(source.as_ref()) };

        let allocator = NonNull::from(Box::leak(Box::new(Allocator::default())));
        // SAFETY: The parser borrows the allocator; both stay alive until
        // the record is dropped.
        let parser = Parser::new(unsafe { allocator.as_ref() }, source_text, source_type);
        let ParserReturn {
            errors, program, ..
        } = parser.parse();

        if !errors.is_empty() {
            #[allow(clippy::drop_non_drop)]
            drop(program);
            // SAFETY: No references into the allocator remain.
            drop(unsafe { Box::from_raw(allocator.as_ptr()) });
            return Err(errors);
        }

        // Early errors (duplicate lexical declarations and the like) are
        // detected by the semantic pass; the analysis itself is discarded.
        let SemanticBuilderReturn { errors, semantic } = SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(&program);
        drop(semantic);
        if !errors.is_empty() {
            #[allow(clippy::drop_non_drop)]
            drop(program);
            // SAFETY: No references into the allocator remain.
            drop(unsafe { Box::from_raw(allocator.as_ptr()) });
            return Err(errors);
        }

        // SAFETY: The program is moved behind a stable pointer; its
        // references into the allocator stay valid until the record drops.
        let program = unsafe {
            core::mem::transmute::<NonNull<Program>, NonNull<Program<'static>>>(NonNull::from(
                Box::leak(Box::new(program)),
            ))
        };

        Ok(agent.heap.create(SourceCodeHeapData {
            source,
            program,
            allocator,
        }))
    }

    pub(crate) fn source_text(self, agent: &Agent) -> &str {
        &agent[self].source
    }

    /// The parsed program.
    ///
    /// ## Safety of the returned reference
    ///
    /// Valid until the SourceCode record is dropped, which with an arena
    /// heap means the agent's lifetime.
    pub(crate) fn program<'a>(self, agent: &Agent) -> &'a Program<'a> {
        // SAFETY: See above.
        unsafe {
            core::mem::transmute::<&Program<'static>, &'a Program<'a>>(
                agent[self].program.as_ref(),
            )
        }
    }
}

impl CreateHeapData<SourceCodeHeapData, SourceCode> for crate::Heap {
    fn create(&mut self, data: SourceCodeHeapData) -> SourceCode {
        self.source_codes.push(Some(data));
        self.alloc_counter += core::mem::size_of::<Option<SourceCodeHeapData>>();
        SourceCode(SourceCodeIndex::last(&self.source_codes))
    }
}
