// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
//!
//! Before it is evaluated, all ECMAScript code must be associated with a
//! realm. Conceptually, a realm consists of a set of intrinsic objects, an
//! ECMAScript global environment, all of the ECMAScript code that is loaded
//! within the scope of that global environment, and other associated state
//! and resources.

pub mod intrinsics;

use ahash::AHashMap;

use crate::ecmascript::execution::environments::global_environment::new_global_environment;
use crate::ecmascript::execution::environments::GlobalEnvironmentIndex;
use crate::ecmascript::scripts_and_modules::module::Module;
use crate::ecmascript::types::{HeapString, Object, OrdinaryObject, Value};
use crate::heap::indexes::BaseIndex;

use intrinsics::{create_intrinsics, Intrinsics};

use super::Agent;

pub type RealmIdentifier = BaseIndex<Realm>;

#[derive(Debug)]
pub struct Realm {
    /// \[\[Intrinsics]]
    pub(crate) intrinsics: Intrinsics,

    /// \[\[GlobalObject]]
    pub(crate) global_object: Object,

    /// \[\[GlobalEnv]]
    pub(crate) global_env: GlobalEnvironmentIndex,

    /// \[\[TemplateMap]]
    ///
    /// Tagged template call sites map to their cached template object,
    /// keyed by the source span start of the template literal.
    pub(crate) template_map: AHashMap<u32, Object>,

    /// \[\[LoadedModules]]
    ///
    /// Canonical specifier to module record cache.
    pub(crate) loaded_modules: AHashMap<HeapString, Module>,
}

impl Realm {
    pub(crate) fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn global_object(&self) -> Object {
        self.global_object
    }

    pub(crate) fn global_env(&self) -> GlobalEnvironmentIndex {
        self.global_env
    }
}

impl Realm {
    /// ### [9.3.1 InitializeHostDefinedRealm ( )](https://tc39.es/ecma262/#sec-initializehostdefinedrealm)
    ///
    /// Create a realm with its intrinsics, global object and global
    /// environment, and populate the default global bindings.
    pub fn create(agent: &mut Agent) -> RealmIdentifier {
        // 1. Let realm be a new Realm Record; reserve its slot so intrinsic
        //    functions can carry the realm identifier.
        agent.heap.realms.push(None);
        let realm = RealmIdentifier::last(&agent.heap.realms);

        // 2. Perform CreateIntrinsics(realm).
        let intrinsics = create_intrinsics(agent, realm);

        // 3-5. The host does not provide an exotic global object: create an
        //    ordinary object with %Object.prototype% as its prototype.
        let global_object =
            OrdinaryObject::create_object(agent, Some(intrinsics.object_prototype().into()), true);
        let global_object = Object::Object(global_object);

        // 6-10. Set realm.[[GlobalObject]] and realm.[[GlobalEnv]].
        let global_env = new_global_environment(agent, global_object, global_object);

        agent.heap.realms[realm.into_index()] = Some(Realm {
            intrinsics,
            global_object,
            global_env,
            template_map: AHashMap::default(),
            loaded_modules: AHashMap::default(),
        });

        // Populate the intrinsic method tables now that the realm record
        // resolves.
        populate_intrinsics(agent, realm);

        // 11. Perform SetDefaultGlobalBindings(realm).
        set_default_global_bindings(agent, realm);

        realm
    }
}

/// Phase two of intrinsic creation: every builtin module installs its
/// methods onto the objects allocated by `create_intrinsics`.
fn populate_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    use crate::ecmascript::builtins;

    builtins::fundamental_objects::object_objects::create_intrinsic(agent, realm);
    builtins::fundamental_objects::function_objects::create_intrinsic(agent, realm);
    builtins::fundamental_objects::boolean_objects::create_intrinsic(agent, realm);
    builtins::fundamental_objects::symbol_objects::create_intrinsic(agent, realm);
    builtins::fundamental_objects::error_objects::create_intrinsic(agent, realm);
    builtins::numbers_and_dates::number_objects::create_intrinsic(agent, realm);
    builtins::numbers_and_dates::bigint_objects::create_intrinsic(agent, realm);
    builtins::numbers_and_dates::math_object::create_intrinsic(agent, realm);
    builtins::date::create_intrinsic(agent, realm);
    builtins::text_processing::string_objects::create_intrinsic(agent, realm);
    builtins::regexp::create_intrinsic(agent, realm);
    builtins::indexed_collections::array_objects::create_intrinsic(agent, realm);
    builtins::indexed_collections::typed_array_objects::create_intrinsic(agent, realm);
    builtins::array_buffer::create_intrinsic(agent, realm);
    builtins::data_view::create_intrinsic(agent, realm);
    builtins::keyed_collections::map_objects::create_intrinsic(agent, realm);
    builtins::keyed_collections::set_objects::create_intrinsic(agent, realm);
    builtins::keyed_collections::weak_map_objects::create_intrinsic(agent, realm);
    builtins::keyed_collections::weak_set_objects::create_intrinsic(agent, realm);
    builtins::structured_data::json_object::create_intrinsic(agent, realm);
    builtins::iterator_objects::create_intrinsic(agent, realm);
    builtins::generator_objects::create_intrinsic(agent, realm);
    builtins::promise_objects::promise_constructor::create_intrinsic(agent, realm);
    builtins::proxy::create_intrinsic(agent, realm);
    builtins::reflect_object::create_intrinsic(agent, realm);
}

/// ### [9.3.3 SetDefaultGlobalBindings ( realmRec )](https://tc39.es/ecma262/#sec-setdefaultglobalbindings)
fn set_default_global_bindings(agent: &mut Agent, realm: RealmIdentifier) {
    use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;

    let realm_record = agent.get_realm(realm);
    let intrinsics = realm_record.intrinsics().clone();
    let global_this: Value = realm_record.global_object.into();
    let Object::Object(global) = realm_record.global_object else {
        unreachable!()
    };

    // 19.1 Value Properties of the Global Object.
    let builder = OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, global)
        .with_frozen_property("undefined", Value::Undefined)
        .with_frozen_property("NaN", Value::nan())
        .with_frozen_property("Infinity", Value::Number(f64::INFINITY))
        .with_property("globalThis", global_this);

    // 19.2 Function Properties of the Global Object.
    let builder = builder
        .with_property("eval", intrinsics.eval().into())
        .with_property("parseInt", intrinsics.parse_int().into())
        .with_property("parseFloat", intrinsics.parse_float().into())
        .with_property("isNaN", intrinsics.is_nan().into())
        .with_property("isFinite", intrinsics.is_finite().into())
        .with_property("decodeURI", intrinsics.decode_uri().into())
        .with_property(
            "decodeURIComponent",
            intrinsics.decode_uri_component().into(),
        )
        .with_property("encodeURI", intrinsics.encode_uri().into())
        .with_property(
            "encodeURIComponent",
            intrinsics.encode_uri_component().into(),
        );

    // 19.3 Constructor Properties of the Global Object.
    let builder = builder
        .with_property("Object", intrinsics.object().into())
        .with_property("Function", intrinsics.function().into())
        .with_property("Boolean", intrinsics.boolean().into())
        .with_property("Symbol", intrinsics.symbol().into())
        .with_property("Error", intrinsics.error().into())
        .with_property("AggregateError", intrinsics.aggregate_error().into())
        .with_property("EvalError", intrinsics.eval_error().into())
        .with_property("RangeError", intrinsics.range_error().into())
        .with_property("ReferenceError", intrinsics.reference_error().into())
        .with_property("SyntaxError", intrinsics.syntax_error().into())
        .with_property("TypeError", intrinsics.type_error().into())
        .with_property("URIError", intrinsics.uri_error().into())
        .with_property("Number", intrinsics.number().into())
        .with_property("BigInt", intrinsics.big_int().into())
        .with_property("Date", intrinsics.date().into())
        .with_property("String", intrinsics.string().into())
        .with_property("RegExp", intrinsics.regexp().into())
        .with_property("Array", intrinsics.array().into())
        .with_property("ArrayBuffer", intrinsics.array_buffer().into())
        .with_property("DataView", intrinsics.data_view().into())
        .with_property("Int8Array", intrinsics.int8_array.into())
        .with_property("Uint8Array", intrinsics.uint8_array.into())
        .with_property("Uint8ClampedArray", intrinsics.uint8_clamped_array.into())
        .with_property("Int16Array", intrinsics.int16_array.into())
        .with_property("Uint16Array", intrinsics.uint16_array.into())
        .with_property("Int32Array", intrinsics.int32_array.into())
        .with_property("Uint32Array", intrinsics.uint32_array.into())
        .with_property("BigInt64Array", intrinsics.big_int64_array.into())
        .with_property("BigUint64Array", intrinsics.big_uint64_array.into())
        .with_property("Float32Array", intrinsics.float32_array.into())
        .with_property("Float64Array", intrinsics.float64_array.into())
        .with_property("Map", intrinsics.map().into())
        .with_property("Set", intrinsics.set().into())
        .with_property("WeakMap", intrinsics.weak_map().into())
        .with_property("WeakSet", intrinsics.weak_set().into())
        .with_property("Promise", intrinsics.promise().into())
        .with_property("Proxy", intrinsics.proxy().into());

    // 19.4 Other Properties of the Global Object.
    builder
        .with_property("Math", intrinsics.math().into())
        .with_property("JSON", intrinsics.json().into())
        .with_property("Reflect", intrinsics.reflect().into())
        .build();
}
