// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::RandomState;
use hashbrown::HashMap;

use crate::ecmascript::types::language::function::Function;
use crate::ecmascript::types::language::value::Value;
use crate::ecmascript::types::spec::property_descriptor::PropertyDescriptor;

use super::{Object, PropertyKey};

/// Heap data of an ordinary object: prototype, extensibility and the
/// property table.
#[derive(Debug, Clone, Default)]
pub struct ObjectHeapData {
    pub extensible: bool,
    pub prototype: Option<Object>,
    pub(crate) property_storage: PropertyStorage,
}

impl ObjectHeapData {
    pub fn new(extensible: bool, prototype: Option<Object>) -> Self {
        Self {
            extensible,
            prototype,
            property_storage: PropertyStorage::default(),
        }
    }
}

/// Flags-and-accessor part of a property slot. `None` in a
/// [`PropertyEntry`] means the default data descriptor (writable,
/// enumerable and configurable all true), collapsing the common case into
/// the value slot alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ElementDescriptor {
    Data {
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Function>,
        set: Option<Function>,
        enumerable: bool,
        configurable: bool,
    },
}

impl ElementDescriptor {
    pub(crate) fn is_accessor(&self) -> bool {
        matches!(self, ElementDescriptor::Accessor { .. })
    }

    pub(crate) fn is_writable(&self) -> Option<bool> {
        match self {
            ElementDescriptor::Data { writable, .. } => Some(*writable),
            ElementDescriptor::Accessor { .. } => None,
        }
    }

    pub(crate) fn is_enumerable(&self) -> bool {
        match self {
            ElementDescriptor::Data { enumerable, .. }
            | ElementDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub(crate) fn is_configurable(&self) -> bool {
        match self {
            ElementDescriptor::Data { configurable, .. }
            | ElementDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    pub(crate) fn getter(&self) -> Option<Function> {
        match self {
            ElementDescriptor::Accessor { get, .. } => *get,
            ElementDescriptor::Data { .. } => None,
        }
    }

    pub(crate) fn setter(&self) -> Option<Function> {
        match self {
            ElementDescriptor::Accessor { set, .. } => *set,
            ElementDescriptor::Data { .. } => None,
        }
    }
}

/// One own property. The descriptor is collapsed away when all flags have
/// their creation defaults.
#[derive(Debug, Clone)]
pub(crate) struct PropertyEntry {
    pub(crate) key: PropertyKey,
    pub(crate) value: Option<Value>,
    pub(crate) descriptor: Option<ElementDescriptor>,
}

impl PropertyEntry {
    pub(crate) fn is_enumerable(&self) -> bool {
        self.descriptor.as_ref().is_none_or(|d| d.is_enumerable())
    }

    pub(crate) fn is_configurable(&self) -> bool {
        self.descriptor.as_ref().is_none_or(|d| d.is_configurable())
    }

    pub(crate) fn is_writable_data(&self) -> bool {
        match &self.descriptor {
            None => true,
            Some(d) => d.is_writable().unwrap_or(false),
        }
    }

    /// Expand the slot back into a full property descriptor.
    pub(crate) fn to_descriptor(&self) -> PropertyDescriptor {
        match &self.descriptor {
            None => PropertyDescriptor {
                value: self.value,
                writable: Some(true),
                get: None,
                set: None,
                enumerable: Some(true),
                configurable: Some(true),
            },
            Some(ElementDescriptor::Data {
                writable,
                enumerable,
                configurable,
            }) => PropertyDescriptor {
                value: self.value,
                writable: Some(*writable),
                get: None,
                set: None,
                enumerable: Some(*enumerable),
                configurable: Some(*configurable),
            },
            Some(ElementDescriptor::Accessor {
                get,
                set,
                enumerable,
                configurable,
            }) => PropertyDescriptor {
                value: None,
                writable: None,
                get: Some(*get),
                set: Some(*set),
                enumerable: Some(*enumerable),
                configurable: Some(*configurable),
            },
        }
    }

    /// Collapse a fully populated descriptor into a slot.
    pub(crate) fn from_descriptor(key: PropertyKey, descriptor: &PropertyDescriptor) -> Self {
        if descriptor.is_accessor_descriptor() {
            PropertyEntry {
                key,
                value: None,
                descriptor: Some(ElementDescriptor::Accessor {
                    get: descriptor.get.flatten(),
                    set: descriptor.set.flatten(),
                    enumerable: descriptor.enumerable.unwrap_or(false),
                    configurable: descriptor.configurable.unwrap_or(false),
                }),
            }
        } else {
            let writable = descriptor.writable.unwrap_or(false);
            let enumerable = descriptor.enumerable.unwrap_or(false);
            let configurable = descriptor.configurable.unwrap_or(false);
            let flags = if writable && enumerable && configurable {
                None
            } else {
                Some(ElementDescriptor::Data {
                    writable,
                    enumerable,
                    configurable,
                })
            };
            PropertyEntry {
                key,
                value: Some(descriptor.value.unwrap_or(Value::Undefined)),
                descriptor: flags,
            }
        }
    }
}

/// Insertion-ordered property table with a hashed key index. Integer keys
/// iterate in ascending numeric order ahead of string keys, then symbols,
/// per OrdinaryOwnPropertyKeys.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropertyStorage {
    entries: Vec<PropertyEntry>,
    lookup: HashMap<PropertyKey, u32, RandomState>,
}

impl PropertyStorage {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains_key(&self, key: PropertyKey) -> bool {
        self.lookup.contains_key(&key)
    }

    pub(crate) fn get(&self, key: PropertyKey) -> Option<&PropertyEntry> {
        let slot = *self.lookup.get(&key)?;
        Some(&self.entries[slot as usize])
    }

    pub(crate) fn get_mut(&mut self, key: PropertyKey) -> Option<&mut PropertyEntry> {
        let slot = *self.lookup.get(&key)?;
        Some(&mut self.entries[slot as usize])
    }

    /// Insert or overwrite the slot for the entry's key, preserving
    /// insertion order for existing keys.
    pub(crate) fn set(&mut self, entry: PropertyEntry) {
        match self.lookup.get(&entry.key) {
            Some(slot) => {
                self.entries[*slot as usize] = entry;
            }
            None => {
                self.lookup.insert(entry.key, self.entries.len() as u32);
                self.entries.push(entry);
            }
        }
    }

    pub(crate) fn remove(&mut self, key: PropertyKey) -> bool {
        let Some(slot) = self.lookup.remove(&key) else {
            return false;
        };
        self.entries.remove(slot as usize);
        // Later entries shifted down by one.
        for value in self.lookup.values_mut() {
            if *value > slot {
                *value -= 1;
            }
        }
        true
    }

    pub(crate) fn entries(&self) -> &[PropertyEntry] {
        &self.entries
    }

    /// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
    pub(crate) fn keys_ordered(&self) -> Vec<PropertyKey> {
        let mut integers: Vec<u32> = Vec::new();
        let mut strings: Vec<PropertyKey> = Vec::new();
        let mut symbols: Vec<PropertyKey> = Vec::new();
        for entry in &self.entries {
            match entry.key {
                PropertyKey::Integer(index) => integers.push(index),
                PropertyKey::String(_) => strings.push(entry.key),
                PropertyKey::Symbol(_) => symbols.push(entry.key),
            }
        }
        integers.sort_unstable();
        let mut keys = Vec::with_capacity(self.entries.len());
        keys.extend(integers.into_iter().map(PropertyKey::Integer));
        keys.append(&mut strings);
        keys.append(&mut symbols);
        keys
    }
}
