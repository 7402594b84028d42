// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod language;
pub mod spec;

pub use language::bigint::{BigInt, HeapBigInt};
pub use language::function::Function;
pub use language::object::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyKey,
};
pub use language::string::HeapString;
pub use language::symbol::Symbol;
pub use language::value::{Numeric, PreferredType, Value};
pub use spec::property_descriptor::PropertyDescriptor;
pub use spec::reference::{Base, Reference};
