// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder used by realm initialization to populate intrinsic objects.
//! It writes property slots directly, so it can only be used on ordinary
//! backing storage (prototypes, namespaces and function backing objects).

use crate::ecmascript::builders::builtin_function_builder::create_builtin_function;
use crate::ecmascript::builtins::builtin_function::{Builtin, BuiltinFunction};
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::language::object::data::{ElementDescriptor, PropertyEntry};
use crate::ecmascript::types::{
    Function, HeapString, InternalSlots, Object, OrdinaryObject, PropertyKey, Symbol, Value,
};

pub(crate) struct OrdinaryObjectBuilder<'agent> {
    agent: &'agent mut Agent,
    realm: RealmIdentifier,
    object: OrdinaryObject,
}

impl<'agent> OrdinaryObjectBuilder<'agent> {
    /// Populate an already-created intrinsic object.
    pub(crate) fn new_intrinsic_object(
        agent: &'agent mut Agent,
        realm: RealmIdentifier,
        object: OrdinaryObject,
    ) -> Self {
        Self {
            agent,
            realm,
            object,
        }
    }

    /// Populate the backing object of an intrinsic function.
    pub(crate) fn new_intrinsic_function(
        agent: &'agent mut Agent,
        realm: RealmIdentifier,
        function: BuiltinFunction,
    ) -> Self {
        let object = function.get_or_create_backing_object(agent);
        Self {
            agent,
            realm,
            object,
        }
    }

    pub(crate) fn with_prototype(self, prototype: Object) -> Self {
        self.agent[self.object].prototype = Some(prototype);
        self
    }

    fn set_entry(&mut self, key: PropertyKey, value: Value, enumerable: bool) {
        // Intrinsic properties default to writable and configurable but not
        // enumerable.
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: Some(value),
            descriptor: Some(ElementDescriptor::Data {
                writable: true,
                enumerable,
                configurable: true,
            }),
        });
    }

    /// Install a writable, non-enumerable, configurable data property.
    pub(crate) fn with_property(mut self, key: &'static str, value: Value) -> Self {
        let key = PropertyKey::from_static_str(self.agent, key);
        self.set_entry(key, value, false);
        self
    }

    /// Install a non-writable, non-enumerable, non-configurable value
    /// property (the `Math.PI` kind).
    pub(crate) fn with_frozen_property(mut self, key: &'static str, value: Value) -> Self {
        let key = PropertyKey::from_static_str(self.agent, key);
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: Some(value),
            descriptor: Some(ElementDescriptor::Data {
                writable: false,
                enumerable: false,
                configurable: false,
            }),
        });
        self
    }

    /// Install the `constructor` back-reference.
    pub(crate) fn with_constructor_property(mut self, constructor: BuiltinFunction) -> Self {
        let key = PropertyKey::from_static_str(self.agent, "constructor");
        self.set_entry(key, constructor.into(), false);
        self
    }

    /// Create the builtin described by `T` and install it under its name
    /// (or well-known symbol key).
    pub(crate) fn with_builtin_function_property<T: Builtin>(mut self) -> Self {
        let function_prototype = self
            .agent
            .get_realm(self.realm)
            .intrinsics()
            .function_prototype()
            .into();
        let function = create_builtin_function::<T>(self.agent, self.realm, function_prototype);
        let key = match T::KEY {
            Some(symbol) => PropertyKey::Symbol(Symbol::from(symbol)),
            None => PropertyKey::from_static_str(self.agent, T::NAME),
        };
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: Some(function.into()),
            descriptor: Some(ElementDescriptor::Data {
                writable: T::WRITABLE,
                enumerable: T::ENUMERABLE,
                configurable: T::CONFIGURABLE,
            }),
        });
        self
    }

    /// Create the builtin described by `T` and install it as a getter.
    pub(crate) fn with_builtin_getter_property<T: Builtin>(mut self) -> Self {
        let function_prototype = self
            .agent
            .get_realm(self.realm)
            .intrinsics()
            .function_prototype()
            .into();
        let function = create_builtin_function::<T>(self.agent, self.realm, function_prototype);
        let key = match T::KEY {
            Some(symbol) => PropertyKey::Symbol(Symbol::from(symbol)),
            None => PropertyKey::from_static_str(self.agent, T::NAME),
        };
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: None,
            descriptor: Some(ElementDescriptor::Accessor {
                get: Some(Function::BuiltinFunction(function)),
                set: None,
                enumerable: false,
                configurable: true,
            }),
        });
        self
    }

    /// Install a `@@toStringTag` string property.
    pub(crate) fn with_to_string_tag(mut self, tag: &'static str) -> Self {
        let key = PropertyKey::Symbol(Symbol::from(
            crate::heap::WellKnownSymbolIndexes::ToStringTag,
        ));
        let value = Value::from_static_str(self.agent, tag);
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: Some(value),
            descriptor: Some(ElementDescriptor::Data {
                writable: false,
                enumerable: false,
                configurable: true,
            }),
        });
        self
    }

    /// Install an arbitrary symbol-keyed data property.
    pub(crate) fn with_symbol_property(mut self, symbol: Symbol, value: Value) -> Self {
        let key = PropertyKey::Symbol(symbol);
        self.set_entry(key, value, false);
        self
    }

    /// Install the non-writable, non-configurable `prototype` property of a
    /// constructor.
    pub(crate) fn with_prototype_property(mut self, prototype: Object) -> Self {
        let key = PropertyKey::from_static_str(self.agent, "prototype");
        self.agent[self.object].property_storage.set(PropertyEntry {
            key,
            value: Some(prototype.into()),
            descriptor: Some(ElementDescriptor::Data {
                writable: false,
                enumerable: false,
                configurable: false,
            }),
        });
        self
    }

    /// Install a `name` -> heap string property, used where the key is not
    /// a static string.
    pub(crate) fn with_string_keyed_property(mut self, key: HeapString, value: Value) -> Self {
        let key = PropertyKey::from_heap_string(self.agent, key);
        self.set_entry(key, value, false);
        self
    }

    pub(crate) fn build(self) -> OrdinaryObject {
        self.object
    }
}
