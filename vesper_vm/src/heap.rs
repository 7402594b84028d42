// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The slotted value heap.
//!
//! Every JavaScript value that does not fit on the stack lives in one of the
//! per-kind vectors below and is addressed by a typed index from
//! [`indexes`]. The heap is an arena owned by the [`Agent`]: slots are
//! reclaimed when the agent is dropped. All allocation funnels through the
//! heap so that the memory quota can observe an allocation estimate.

pub mod indexes;

use ahash::AHashMap;
use wtf8::{Wtf8, Wtf8Buf};

use crate::ecmascript::builtins::array::ArrayHeapData;
use crate::ecmascript::builtins::array_buffer::ArrayBufferHeapData;
use crate::ecmascript::builtins::bound_function::BoundFunctionHeapData;
use crate::ecmascript::builtins::builtin_function::BuiltinFunctionHeapData;
use crate::ecmascript::builtins::data_view::DataViewHeapData;
use crate::ecmascript::builtins::date::DateHeapData;
use crate::ecmascript::builtins::ecmascript_function::ECMAScriptFunctionHeapData;
use crate::ecmascript::builtins::error::ErrorHeapData;
use crate::ecmascript::builtins::generator_objects::GeneratorHeapData;
use crate::ecmascript::builtins::host_object::HostObjectHeapData;
use crate::ecmascript::builtins::iterator_objects::BuiltinIteratorHeapData;
use crate::ecmascript::builtins::keyed_collections::map_objects::MapHeapData;
use crate::ecmascript::builtins::keyed_collections::set_objects::SetHeapData;
use crate::ecmascript::builtins::keyed_collections::weak_map_objects::WeakMapHeapData;
use crate::ecmascript::builtins::keyed_collections::weak_set_objects::WeakSetHeapData;
use crate::ecmascript::builtins::primitive_objects::PrimitiveObjectHeapData;
use crate::ecmascript::builtins::promise::PromiseHeapData;
use crate::ecmascript::builtins::proxy::ProxyHeapData;
use crate::ecmascript::builtins::regexp::RegExpHeapData;
use crate::ecmascript::builtins::typed_array::TypedArrayHeapData;
use crate::ecmascript::execution::environments::Environments;
use crate::ecmascript::execution::realm::Realm;
use crate::ecmascript::scripts_and_modules::module::ModuleHeapData;
use crate::ecmascript::scripts_and_modules::script::ScriptRecord;
use crate::ecmascript::scripts_and_modules::source_code::SourceCodeHeapData;
use crate::ecmascript::types::language::bigint::BigIntHeapData;
use crate::ecmascript::types::language::object::data::ObjectHeapData;
use crate::ecmascript::types::language::string::StringHeapData;
use crate::ecmascript::types::language::symbol::SymbolHeapData;

use indexes::{StringIndex, SymbolIndex};

/// Allocate heap data of type `T`, returning a handle of type `F`.
pub(crate) trait CreateHeapData<T, F> {
    fn create(&mut self, data: T) -> F;
}

#[derive(Debug)]
pub struct Heap {
    pub(crate) array_buffers: Vec<Option<ArrayBufferHeapData>>,
    pub(crate) arrays: Vec<Option<ArrayHeapData>>,
    pub(crate) bigints: Vec<Option<BigIntHeapData>>,
    pub(crate) bound_functions: Vec<Option<BoundFunctionHeapData>>,
    pub(crate) builtin_functions: Vec<Option<BuiltinFunctionHeapData>>,
    pub(crate) builtin_iterators: Vec<Option<BuiltinIteratorHeapData>>,
    pub(crate) data_views: Vec<Option<DataViewHeapData>>,
    pub(crate) dates: Vec<Option<DateHeapData>>,
    pub(crate) ecmascript_functions: Vec<Option<ECMAScriptFunctionHeapData>>,
    pub(crate) environments: Environments,
    pub(crate) errors: Vec<Option<ErrorHeapData>>,
    pub(crate) generators: Vec<Option<GeneratorHeapData>>,
    pub(crate) host_objects: Vec<Option<HostObjectHeapData>>,
    pub(crate) maps: Vec<Option<MapHeapData>>,
    pub(crate) modules: Vec<Option<ModuleHeapData>>,
    pub(crate) objects: Vec<Option<ObjectHeapData>>,
    pub(crate) primitive_objects: Vec<Option<PrimitiveObjectHeapData>>,
    pub(crate) promises: Vec<Option<PromiseHeapData>>,
    pub(crate) proxies: Vec<Option<ProxyHeapData>>,
    pub(crate) realms: Vec<Option<Realm>>,
    pub(crate) regexps: Vec<Option<RegExpHeapData>>,
    pub(crate) scripts: Vec<Option<ScriptRecord>>,
    pub(crate) sets: Vec<Option<SetHeapData>>,
    pub(crate) source_codes: Vec<Option<SourceCodeHeapData>>,
    pub(crate) strings: Vec<Option<StringHeapData>>,
    /// Interning table: every heap string is unique, which makes string
    /// handles comparable and hashable without consulting the heap.
    pub(crate) string_lookup: AHashMap<Wtf8Buf, StringIndex>,
    pub(crate) symbols: Vec<Option<SymbolHeapData>>,
    pub(crate) typed_arrays: Vec<Option<TypedArrayHeapData>>,
    pub(crate) weak_maps: Vec<Option<WeakMapHeapData>>,
    pub(crate) weak_sets: Vec<Option<WeakSetHeapData>>,
    /// Running estimate of bytes allocated into the heap, consulted by the
    /// memory quota.
    pub(crate) alloc_counter: usize,
}

/// Indexes of the well-known symbols, allocated eagerly at heap creation so
/// they can be referred to as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum WellKnownSymbolIndexes {
    AsyncIterator = 1,
    HasInstance,
    IsConcatSpreadable,
    Iterator,
    Match,
    MatchAll,
    Replace,
    Search,
    Species,
    Split,
    ToPrimitive,
    ToStringTag,
    Unscopables,
}

pub(crate) const LAST_WELL_KNOWN_SYMBOL_INDEX: u32 = WellKnownSymbolIndexes::Unscopables as u32;

impl From<WellKnownSymbolIndexes> for SymbolIndex {
    fn from(value: WellKnownSymbolIndexes) -> Self {
        SymbolIndex::from_u32(value as u32)
    }
}

const WELL_KNOWN_SYMBOL_DESCRIPTIONS: [&str; LAST_WELL_KNOWN_SYMBOL_INDEX as usize] = [
    "Symbol.asyncIterator",
    "Symbol.hasInstance",
    "Symbol.isConcatSpreadable",
    "Symbol.iterator",
    "Symbol.match",
    "Symbol.matchAll",
    "Symbol.replace",
    "Symbol.search",
    "Symbol.species",
    "Symbol.split",
    "Symbol.toPrimitive",
    "Symbol.toStringTag",
    "Symbol.unscopables",
];

impl Heap {
    pub(crate) fn new() -> Self {
        let mut heap = Self {
            array_buffers: Vec::new(),
            arrays: Vec::with_capacity(256),
            bigints: Vec::new(),
            bound_functions: Vec::new(),
            builtin_functions: Vec::with_capacity(512),
            builtin_iterators: Vec::new(),
            data_views: Vec::new(),
            dates: Vec::new(),
            ecmascript_functions: Vec::with_capacity(256),
            environments: Environments::default(),
            errors: Vec::new(),
            generators: Vec::new(),
            host_objects: Vec::new(),
            maps: Vec::new(),
            modules: Vec::new(),
            objects: Vec::with_capacity(1024),
            primitive_objects: Vec::new(),
            promises: Vec::new(),
            proxies: Vec::new(),
            realms: Vec::with_capacity(1),
            regexps: Vec::new(),
            scripts: Vec::new(),
            sets: Vec::new(),
            source_codes: Vec::new(),
            strings: Vec::with_capacity(1024),
            string_lookup: AHashMap::with_capacity(1024),
            symbols: Vec::with_capacity(32),
            typed_arrays: Vec::new(),
            weak_maps: Vec::new(),
            weak_sets: Vec::new(),
            alloc_counter: 0,
        };
        for description in WELL_KNOWN_SYMBOL_DESCRIPTIONS {
            let description = heap.alloc_static_str(description);
            heap.symbols.push(Some(SymbolHeapData {
                descriptor: Some(crate::ecmascript::types::HeapString(description)),
            }));
        }
        heap
    }

    /// Allocate a string, deduplicating against previously allocated strings.
    pub(crate) fn alloc_str(&mut self, message: &str) -> StringIndex {
        self.alloc_wtf8(Wtf8::from_str(message))
    }

    pub(crate) fn alloc_static_str(&mut self, message: &'static str) -> StringIndex {
        self.alloc_str(message)
    }

    pub(crate) fn alloc_wtf8(&mut self, data: &Wtf8) -> StringIndex {
        let mut buf = Wtf8Buf::with_capacity(data.len());
        buf.push_wtf8(data);
        self.alloc_wtf8_buf(buf)
    }

    pub(crate) fn alloc_wtf8_buf(&mut self, data: Wtf8Buf) -> StringIndex {
        if let Some(index) = self.string_lookup.get(&data) {
            return *index;
        }
        self.alloc_counter += core::mem::size_of::<Option<StringHeapData>>() + data.len();
        self.strings.push(Some(StringHeapData::from_wtf8(data.clone())));
        let index = StringIndex::last(&self.strings);
        self.string_lookup.insert(data, index);
        index
    }
}

macro_rules! impl_heap_create {
    ($data: ty, $handle: ty, $entry: ident) => {
        impl CreateHeapData<$data, $handle> for Heap {
            fn create(&mut self, data: $data) -> $handle {
                self.$entry.push(Some(data));
                self.alloc_counter += core::mem::size_of::<Option<$data>>();
                <$handle>::last(&self.$entry)
            }
        }
    };
}

impl_heap_create!(ArrayBufferHeapData, indexes::ArrayBufferIndex, array_buffers);
impl_heap_create!(ArrayHeapData, indexes::ArrayIndex, arrays);
impl_heap_create!(BigIntHeapData, indexes::BigIntIndex, bigints);
impl_heap_create!(
    BoundFunctionHeapData,
    indexes::BoundFunctionIndex,
    bound_functions
);
impl_heap_create!(
    BuiltinFunctionHeapData,
    indexes::BuiltinFunctionIndex,
    builtin_functions
);
impl_heap_create!(
    BuiltinIteratorHeapData,
    indexes::BuiltinIteratorIndex,
    builtin_iterators
);
impl_heap_create!(DataViewHeapData, indexes::DataViewIndex, data_views);
impl_heap_create!(DateHeapData, indexes::DateIndex, dates);
impl_heap_create!(
    ECMAScriptFunctionHeapData,
    indexes::ECMAScriptFunctionIndex,
    ecmascript_functions
);
impl_heap_create!(ErrorHeapData, indexes::ErrorIndex, errors);
impl_heap_create!(GeneratorHeapData, indexes::GeneratorIndex, generators);
impl_heap_create!(HostObjectHeapData, indexes::HostObjectIndex, host_objects);
impl_heap_create!(MapHeapData, indexes::MapIndex, maps);
impl_heap_create!(ModuleHeapData, indexes::ModuleIndex, modules);
impl_heap_create!(ObjectHeapData, indexes::ObjectIndex, objects);
impl_heap_create!(
    PrimitiveObjectHeapData,
    indexes::PrimitiveObjectIndex,
    primitive_objects
);
impl_heap_create!(PromiseHeapData, indexes::PromiseIndex, promises);
impl_heap_create!(ProxyHeapData, indexes::ProxyIndex, proxies);
impl_heap_create!(RegExpHeapData, indexes::RegExpIndex, regexps);
impl_heap_create!(SetHeapData, indexes::SetIndex, sets);
impl_heap_create!(SymbolHeapData, indexes::SymbolIndex, symbols);
impl_heap_create!(TypedArrayHeapData, indexes::TypedArrayIndex, typed_arrays);
impl_heap_create!(WeakMapHeapData, indexes::WeakMapIndex, weak_maps);
impl_heap_create!(WeakSetHeapData, indexes::WeakSetIndex, weak_sets);
