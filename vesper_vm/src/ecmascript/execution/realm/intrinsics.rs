// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Realm-scoped intrinsic objects.
//!
//! Creation happens in two phases: first the canonical prototype graph is
//! wired (`Object.prototype`, then `Function.prototype`, then everything
//! else), together with bare constructor functions; afterwards each builtin
//! module populates its prototype and constructor with method properties.

use crate::ecmascript::builders::builtin_function_builder::create_builtin_function;
use crate::ecmascript::builtins::builtin_function::{
    Behaviour, Builtin, BuiltinFunction, BuiltinFunctionHeapData,
};
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{
    HeapString, InternalSlots, Object, OrdinaryObject, Value,
};
use crate::heap::CreateHeapData;

use super::RealmIdentifier;

/// Enumeration of intrinsics intended to be used as the \[\[Prototype]]
/// value of an object. Used in GetPrototypeFromConstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoIntrinsics {
    AggregateError,
    Array,
    ArrayBuffer,
    ArrayIterator,
    BigInt,
    Boolean,
    DataView,
    Date,
    Error,
    EvalError,
    Function,
    Generator,
    Iterator,
    Map,
    MapIterator,
    Number,
    Object,
    Promise,
    RangeError,
    ReferenceError,
    RegExp,
    Set,
    SetIterator,
    String,
    StringIterator,
    SyntaxError,
    TypeError,
    TypedArray,
    UriError,
    WeakMap,
    WeakSet,
}

#[derive(Debug, Clone)]
pub struct Intrinsics {
    /// %Object% and %Object.prototype%
    pub(crate) object: BuiltinFunction,
    pub(crate) object_prototype: OrdinaryObject,
    /// %Function% and %Function.prototype%; the prototype is itself a
    /// function that accepts any arguments and returns undefined.
    pub(crate) function: BuiltinFunction,
    pub(crate) function_prototype: BuiltinFunction,
    /// %ThrowTypeError%
    pub(crate) throw_type_error: BuiltinFunction,
    /// %Boolean% and %Boolean.prototype%
    pub(crate) boolean: BuiltinFunction,
    pub(crate) boolean_prototype: OrdinaryObject,
    /// %Symbol% and %Symbol.prototype%
    pub(crate) symbol: BuiltinFunction,
    pub(crate) symbol_prototype: OrdinaryObject,
    /// The %Error% hierarchy.
    pub(crate) error: BuiltinFunction,
    pub(crate) error_prototype: OrdinaryObject,
    pub(crate) aggregate_error: BuiltinFunction,
    pub(crate) aggregate_error_prototype: OrdinaryObject,
    pub(crate) eval_error: BuiltinFunction,
    pub(crate) eval_error_prototype: OrdinaryObject,
    pub(crate) range_error: BuiltinFunction,
    pub(crate) range_error_prototype: OrdinaryObject,
    pub(crate) reference_error: BuiltinFunction,
    pub(crate) reference_error_prototype: OrdinaryObject,
    pub(crate) syntax_error: BuiltinFunction,
    pub(crate) syntax_error_prototype: OrdinaryObject,
    pub(crate) type_error: BuiltinFunction,
    pub(crate) type_error_prototype: OrdinaryObject,
    pub(crate) uri_error: BuiltinFunction,
    pub(crate) uri_error_prototype: OrdinaryObject,
    /// %Number% and %Number.prototype%
    pub(crate) number: BuiltinFunction,
    pub(crate) number_prototype: OrdinaryObject,
    /// %BigInt% and %BigInt.prototype%
    pub(crate) big_int: BuiltinFunction,
    pub(crate) big_int_prototype: OrdinaryObject,
    /// %Math%
    pub(crate) math: OrdinaryObject,
    /// %Date% and %Date.prototype%
    pub(crate) date: BuiltinFunction,
    pub(crate) date_prototype: OrdinaryObject,
    /// %String% and %String.prototype%
    pub(crate) string: BuiltinFunction,
    pub(crate) string_prototype: OrdinaryObject,
    /// %RegExp% and %RegExp.prototype%
    pub(crate) regexp: BuiltinFunction,
    pub(crate) regexp_prototype: OrdinaryObject,
    /// %Array% and %Array.prototype%
    pub(crate) array: BuiltinFunction,
    pub(crate) array_prototype: OrdinaryObject,
    /// %ArrayBuffer% and %ArrayBuffer.prototype%
    pub(crate) array_buffer: BuiltinFunction,
    pub(crate) array_buffer_prototype: OrdinaryObject,
    /// %DataView% and %DataView.prototype%
    pub(crate) data_view: BuiltinFunction,
    pub(crate) data_view_prototype: OrdinaryObject,
    /// %TypedArray% and %TypedArray.prototype%, plus the eleven concrete
    /// view constructors sharing them.
    pub(crate) typed_array: BuiltinFunction,
    pub(crate) typed_array_prototype: OrdinaryObject,
    pub(crate) int8_array: BuiltinFunction,
    pub(crate) uint8_array: BuiltinFunction,
    pub(crate) uint8_clamped_array: BuiltinFunction,
    pub(crate) int16_array: BuiltinFunction,
    pub(crate) uint16_array: BuiltinFunction,
    pub(crate) int32_array: BuiltinFunction,
    pub(crate) uint32_array: BuiltinFunction,
    pub(crate) big_int64_array: BuiltinFunction,
    pub(crate) big_uint64_array: BuiltinFunction,
    pub(crate) float32_array: BuiltinFunction,
    pub(crate) float64_array: BuiltinFunction,
    pub(crate) int8_array_prototype: OrdinaryObject,
    pub(crate) uint8_array_prototype: OrdinaryObject,
    pub(crate) uint8_clamped_array_prototype: OrdinaryObject,
    pub(crate) int16_array_prototype: OrdinaryObject,
    pub(crate) uint16_array_prototype: OrdinaryObject,
    pub(crate) int32_array_prototype: OrdinaryObject,
    pub(crate) uint32_array_prototype: OrdinaryObject,
    pub(crate) big_int64_array_prototype: OrdinaryObject,
    pub(crate) big_uint64_array_prototype: OrdinaryObject,
    pub(crate) float32_array_prototype: OrdinaryObject,
    pub(crate) float64_array_prototype: OrdinaryObject,
    /// Keyed collections.
    pub(crate) map: BuiltinFunction,
    pub(crate) map_prototype: OrdinaryObject,
    pub(crate) set: BuiltinFunction,
    pub(crate) set_prototype: OrdinaryObject,
    pub(crate) weak_map: BuiltinFunction,
    pub(crate) weak_map_prototype: OrdinaryObject,
    pub(crate) weak_set: BuiltinFunction,
    pub(crate) weak_set_prototype: OrdinaryObject,
    /// %JSON%
    pub(crate) json: OrdinaryObject,
    /// %Promise% and %Promise.prototype%
    pub(crate) promise: BuiltinFunction,
    pub(crate) promise_prototype: OrdinaryObject,
    /// %Proxy% (has no prototype object)
    pub(crate) proxy: BuiltinFunction,
    /// %Reflect%
    pub(crate) reflect: OrdinaryObject,
    /// Iteration protocol prototypes.
    pub(crate) iterator_prototype: OrdinaryObject,
    pub(crate) array_iterator_prototype: OrdinaryObject,
    pub(crate) string_iterator_prototype: OrdinaryObject,
    pub(crate) map_iterator_prototype: OrdinaryObject,
    pub(crate) set_iterator_prototype: OrdinaryObject,
    /// %GeneratorFunction.prototype% and
    /// %GeneratorFunction.prototype.prototype%.
    pub(crate) generator_function_prototype: OrdinaryObject,
    pub(crate) generator_prototype: OrdinaryObject,
    /// Global function properties.
    pub(crate) eval: BuiltinFunction,
    pub(crate) parse_int: BuiltinFunction,
    pub(crate) parse_float: BuiltinFunction,
    pub(crate) is_nan: BuiltinFunction,
    pub(crate) is_finite: BuiltinFunction,
    pub(crate) decode_uri: BuiltinFunction,
    pub(crate) decode_uri_component: BuiltinFunction,
    pub(crate) encode_uri: BuiltinFunction,
    pub(crate) encode_uri_component: BuiltinFunction,
}

macro_rules! intrinsic_function_accessors {
    ($($name: ident),* $(,)?) => {
        $(
            pub(crate) fn $name(&self) -> BuiltinFunction {
                self.$name
            }
        )*
    };
}

macro_rules! intrinsic_object_accessors {
    ($($name: ident),* $(,)?) => {
        $(
            pub(crate) fn $name(&self) -> OrdinaryObject {
                self.$name
            }
        )*
    };
}

impl Intrinsics {
    intrinsic_function_accessors!(
        object,
        function,
        function_prototype,
        throw_type_error,
        boolean,
        symbol,
        error,
        aggregate_error,
        eval_error,
        range_error,
        reference_error,
        syntax_error,
        type_error,
        uri_error,
        number,
        big_int,
        date,
        string,
        regexp,
        array,
        array_buffer,
        data_view,
        typed_array,
        map,
        set,
        weak_map,
        weak_set,
        promise,
        proxy,
        eval,
        parse_int,
        parse_float,
        is_nan,
        is_finite,
        decode_uri,
        decode_uri_component,
        encode_uri,
        encode_uri_component,
    );

    intrinsic_object_accessors!(
        object_prototype,
        boolean_prototype,
        symbol_prototype,
        error_prototype,
        aggregate_error_prototype,
        eval_error_prototype,
        range_error_prototype,
        reference_error_prototype,
        syntax_error_prototype,
        type_error_prototype,
        uri_error_prototype,
        number_prototype,
        big_int_prototype,
        math,
        date_prototype,
        string_prototype,
        regexp_prototype,
        array_prototype,
        array_buffer_prototype,
        data_view_prototype,
        typed_array_prototype,
        map_prototype,
        set_prototype,
        weak_map_prototype,
        weak_set_prototype,
        json,
        promise_prototype,
        reflect,
        iterator_prototype,
        array_iterator_prototype,
        string_iterator_prototype,
        map_iterator_prototype,
        set_iterator_prototype,
        generator_function_prototype,
        generator_prototype,
    );

    /// The error prototype for an exception type.
    pub(crate) fn error_prototype_for(
        &self,
        kind: crate::ecmascript::execution::ExceptionType,
    ) -> OrdinaryObject {
        use crate::ecmascript::execution::ExceptionType;
        match kind {
            ExceptionType::Error => self.error_prototype,
            ExceptionType::AggregateError => self.aggregate_error_prototype,
            ExceptionType::EvalError => self.eval_error_prototype,
            ExceptionType::RangeError => self.range_error_prototype,
            ExceptionType::ReferenceError => self.reference_error_prototype,
            ExceptionType::SyntaxError => self.syntax_error_prototype,
            ExceptionType::TypeError => self.type_error_prototype,
            ExceptionType::UriError => self.uri_error_prototype,
        }
    }

    pub(crate) fn get_proto_intrinsic(&self, intrinsic: ProtoIntrinsics) -> Object {
        match intrinsic {
            ProtoIntrinsics::AggregateError => self.aggregate_error_prototype.into(),
            ProtoIntrinsics::Array => self.array_prototype.into(),
            ProtoIntrinsics::ArrayBuffer => self.array_buffer_prototype.into(),
            ProtoIntrinsics::ArrayIterator => self.array_iterator_prototype.into(),
            ProtoIntrinsics::BigInt => self.big_int_prototype.into(),
            ProtoIntrinsics::Boolean => self.boolean_prototype.into(),
            ProtoIntrinsics::DataView => self.data_view_prototype.into(),
            ProtoIntrinsics::Date => self.date_prototype.into(),
            ProtoIntrinsics::Error => self.error_prototype.into(),
            ProtoIntrinsics::EvalError => self.eval_error_prototype.into(),
            ProtoIntrinsics::Function => self.function_prototype.into(),
            ProtoIntrinsics::Generator => self.generator_prototype.into(),
            ProtoIntrinsics::Iterator => self.iterator_prototype.into(),
            ProtoIntrinsics::Map => self.map_prototype.into(),
            ProtoIntrinsics::MapIterator => self.map_iterator_prototype.into(),
            ProtoIntrinsics::Number => self.number_prototype.into(),
            ProtoIntrinsics::Object => self.object_prototype.into(),
            ProtoIntrinsics::Promise => self.promise_prototype.into(),
            ProtoIntrinsics::RangeError => self.range_error_prototype.into(),
            ProtoIntrinsics::ReferenceError => self.reference_error_prototype.into(),
            ProtoIntrinsics::RegExp => self.regexp_prototype.into(),
            ProtoIntrinsics::Set => self.set_prototype.into(),
            ProtoIntrinsics::SetIterator => self.set_iterator_prototype.into(),
            ProtoIntrinsics::String => self.string_prototype.into(),
            ProtoIntrinsics::StringIterator => self.string_iterator_prototype.into(),
            ProtoIntrinsics::SyntaxError => self.syntax_error_prototype.into(),
            ProtoIntrinsics::TypeError => self.type_error_prototype.into(),
            ProtoIntrinsics::TypedArray => self.typed_array_prototype.into(),
            ProtoIntrinsics::UriError => self.uri_error_prototype.into(),
            ProtoIntrinsics::WeakMap => self.weak_map_prototype.into(),
            ProtoIntrinsics::WeakSet => self.weak_set_prototype.into(),
        }
    }
}

/// `%Function.prototype%` accepts any arguments and returns undefined when
/// invoked.
fn function_prototype_behaviour(
    _agent: &mut Agent,
    _this_value: Value,
    _arguments: crate::ecmascript::builtins::builtin_function::ArgumentsList,
) -> crate::ecmascript::execution::JsResult<Value> {
    Ok(Value::Undefined)
}

/// ### [9.3.2 CreateIntrinsics ( realmRec )](https://tc39.es/ecma262/#sec-createintrinsics)
///
/// Phase one: allocate every intrinsic object and wire the prototype graph.
pub(crate) fn create_intrinsics(agent: &mut Agent, realm: RealmIdentifier) -> Intrinsics {
    use crate::ecmascript::builtins::array_buffer::ArrayBufferConstructor;
    use crate::ecmascript::builtins::data_view::DataViewConstructor;
    use crate::ecmascript::builtins::date::DateConstructor;
    use crate::ecmascript::builtins::fundamental_objects::boolean_objects::BooleanConstructor;
    use crate::ecmascript::builtins::fundamental_objects::error_objects::{
        AggregateErrorConstructor, ErrorConstructor, EvalErrorConstructor, RangeErrorConstructor,
        ReferenceErrorConstructor, SyntaxErrorConstructor, TypeErrorConstructor,
        UriErrorConstructor,
    };
    use crate::ecmascript::builtins::fundamental_objects::function_objects::FunctionConstructor;
    use crate::ecmascript::builtins::fundamental_objects::object_objects::ObjectConstructor;
    use crate::ecmascript::builtins::fundamental_objects::symbol_objects::SymbolConstructor;
    use crate::ecmascript::builtins::global_object::{
        DecodeUriComponentFunction, DecodeUriFunction, EncodeUriComponentFunction,
        EncodeUriFunction, EvalFunction, IsFiniteFunction, IsNaNFunction, ParseFloatFunction,
        ParseIntFunction, ThrowTypeError,
    };
    use crate::ecmascript::builtins::indexed_collections::array_objects::ArrayConstructor;
    use crate::ecmascript::builtins::indexed_collections::typed_array_objects::{
        BigInt64ArrayConstructor, BigUint64ArrayConstructor, Float32ArrayConstructor,
        Float64ArrayConstructor, Int16ArrayConstructor, Int32ArrayConstructor,
        Int8ArrayConstructor, TypedArrayIntrinsicConstructor, Uint16ArrayConstructor,
        Uint32ArrayConstructor, Uint8ArrayConstructor, Uint8ClampedArrayConstructor,
    };
    use crate::ecmascript::builtins::keyed_collections::map_objects::MapConstructor;
    use crate::ecmascript::builtins::keyed_collections::set_objects::SetConstructor;
    use crate::ecmascript::builtins::keyed_collections::weak_map_objects::WeakMapConstructor;
    use crate::ecmascript::builtins::keyed_collections::weak_set_objects::WeakSetConstructor;
    use crate::ecmascript::builtins::numbers_and_dates::bigint_objects::BigIntConstructor;
    use crate::ecmascript::builtins::numbers_and_dates::number_objects::NumberConstructor;
    use crate::ecmascript::builtins::promise_objects::promise_constructor::PromiseConstructor;
    use crate::ecmascript::builtins::proxy::ProxyConstructor;
    use crate::ecmascript::builtins::regexp::RegExpConstructor;
    use crate::ecmascript::builtins::text_processing::string_objects::StringConstructor;

    // The canonical prototype graph comes first: %Object.prototype% has a
    // null prototype, %Function.prototype% is a function under it, and
    // every other intrinsic hangs off one of the two.
    let object_prototype = OrdinaryObject::create_object(agent, None, true);

    let function_prototype_name = HeapString::from_static_str(agent, "");
    let function_prototype = BuiltinFunction(agent.heap.create(BuiltinFunctionHeapData {
        object_index: None,
        length: 0,
        realm,
        initial_name: Some(function_prototype_name),
        behaviour: Behaviour::Regular(function_prototype_behaviour),
        captures: Box::new([]),
    }));
    let function_prototype_backing =
        OrdinaryObject::create_object(agent, Some(object_prototype.into()), true);
    function_prototype.set_backing_object(agent, function_prototype_backing);

    let fp: Object = function_prototype.into();

    let mut proto =
        |agent: &mut Agent, parent: Object| OrdinaryObject::create_object(agent, Some(parent), true);

    let op: Object = object_prototype.into();
    let boolean_prototype = proto(agent, op);
    let symbol_prototype = proto(agent, op);
    let error_prototype = proto(agent, op);
    let ep: Object = error_prototype.into();
    let aggregate_error_prototype = proto(agent, ep);
    let eval_error_prototype = proto(agent, ep);
    let range_error_prototype = proto(agent, ep);
    let reference_error_prototype = proto(agent, ep);
    let syntax_error_prototype = proto(agent, ep);
    let type_error_prototype = proto(agent, ep);
    let uri_error_prototype = proto(agent, ep);
    let number_prototype = proto(agent, op);
    let big_int_prototype = proto(agent, op);
    let math = proto(agent, op);
    let date_prototype = proto(agent, op);
    let string_prototype = proto(agent, op);
    let regexp_prototype = proto(agent, op);
    let array_prototype = proto(agent, op);
    let array_buffer_prototype = proto(agent, op);
    let data_view_prototype = proto(agent, op);
    let typed_array_prototype = proto(agent, op);
    let tap: Object = typed_array_prototype.into();
    let int8_array_prototype = proto(agent, tap);
    let uint8_array_prototype = proto(agent, tap);
    let uint8_clamped_array_prototype = proto(agent, tap);
    let int16_array_prototype = proto(agent, tap);
    let uint16_array_prototype = proto(agent, tap);
    let int32_array_prototype = proto(agent, tap);
    let uint32_array_prototype = proto(agent, tap);
    let big_int64_array_prototype = proto(agent, tap);
    let big_uint64_array_prototype = proto(agent, tap);
    let float32_array_prototype = proto(agent, tap);
    let float64_array_prototype = proto(agent, tap);
    let map_prototype = proto(agent, op);
    let set_prototype = proto(agent, op);
    let weak_map_prototype = proto(agent, op);
    let weak_set_prototype = proto(agent, op);
    let json = proto(agent, op);
    let promise_prototype = proto(agent, op);
    let reflect = proto(agent, op);
    let iterator_prototype = proto(agent, op);
    let ip: Object = iterator_prototype.into();
    let array_iterator_prototype = proto(agent, ip);
    let string_iterator_prototype = proto(agent, ip);
    let map_iterator_prototype = proto(agent, ip);
    let set_iterator_prototype = proto(agent, ip);
    let generator_function_prototype = proto(agent, fp);
    let generator_prototype = proto(agent, ip);

    // Bare constructors; their prototype cross-pointers and method tables
    // are installed by the population phase.
    let object = create_builtin_function::<ObjectConstructor>(agent, realm, fp);
    let function = create_builtin_function::<FunctionConstructor>(agent, realm, fp);
    let throw_type_error = create_builtin_function::<ThrowTypeError>(agent, realm, fp);
    let boolean = create_builtin_function::<BooleanConstructor>(agent, realm, fp);
    let symbol = create_builtin_function::<SymbolConstructor>(agent, realm, fp);
    let error = create_builtin_function::<ErrorConstructor>(agent, realm, fp);
    let e: Object = error.into();
    let aggregate_error = create_builtin_function::<AggregateErrorConstructor>(agent, realm, e);
    let eval_error = create_builtin_function::<EvalErrorConstructor>(agent, realm, e);
    let range_error = create_builtin_function::<RangeErrorConstructor>(agent, realm, e);
    let reference_error = create_builtin_function::<ReferenceErrorConstructor>(agent, realm, e);
    let syntax_error = create_builtin_function::<SyntaxErrorConstructor>(agent, realm, e);
    let type_error = create_builtin_function::<TypeErrorConstructor>(agent, realm, e);
    let uri_error = create_builtin_function::<UriErrorConstructor>(agent, realm, e);
    let number = create_builtin_function::<NumberConstructor>(agent, realm, fp);
    let big_int = create_builtin_function::<BigIntConstructor>(agent, realm, fp);
    let date = create_builtin_function::<DateConstructor>(agent, realm, fp);
    let string = create_builtin_function::<StringConstructor>(agent, realm, fp);
    let regexp = create_builtin_function::<RegExpConstructor>(agent, realm, fp);
    let array = create_builtin_function::<ArrayConstructor>(agent, realm, fp);
    let array_buffer = create_builtin_function::<ArrayBufferConstructor>(agent, realm, fp);
    let data_view = create_builtin_function::<DataViewConstructor>(agent, realm, fp);
    let typed_array = create_builtin_function::<TypedArrayIntrinsicConstructor>(agent, realm, fp);
    let ta: Object = typed_array.into();
    let int8_array = create_builtin_function::<Int8ArrayConstructor>(agent, realm, ta);
    let uint8_array = create_builtin_function::<Uint8ArrayConstructor>(agent, realm, ta);
    let uint8_clamped_array =
        create_builtin_function::<Uint8ClampedArrayConstructor>(agent, realm, ta);
    let int16_array = create_builtin_function::<Int16ArrayConstructor>(agent, realm, ta);
    let uint16_array = create_builtin_function::<Uint16ArrayConstructor>(agent, realm, ta);
    let int32_array = create_builtin_function::<Int32ArrayConstructor>(agent, realm, ta);
    let uint32_array = create_builtin_function::<Uint32ArrayConstructor>(agent, realm, ta);
    let big_int64_array = create_builtin_function::<BigInt64ArrayConstructor>(agent, realm, ta);
    let big_uint64_array = create_builtin_function::<BigUint64ArrayConstructor>(agent, realm, ta);
    let float32_array = create_builtin_function::<Float32ArrayConstructor>(agent, realm, ta);
    let float64_array = create_builtin_function::<Float64ArrayConstructor>(agent, realm, ta);
    let map = create_builtin_function::<MapConstructor>(agent, realm, fp);
    let set = create_builtin_function::<SetConstructor>(agent, realm, fp);
    let weak_map = create_builtin_function::<WeakMapConstructor>(agent, realm, fp);
    let weak_set = create_builtin_function::<WeakSetConstructor>(agent, realm, fp);
    let promise = create_builtin_function::<PromiseConstructor>(agent, realm, fp);
    let proxy = create_builtin_function::<ProxyConstructor>(agent, realm, fp);
    let eval = create_builtin_function::<EvalFunction>(agent, realm, fp);
    let parse_int = create_builtin_function::<ParseIntFunction>(agent, realm, fp);
    let parse_float = create_builtin_function::<ParseFloatFunction>(agent, realm, fp);
    let is_nan = create_builtin_function::<IsNaNFunction>(agent, realm, fp);
    let is_finite = create_builtin_function::<IsFiniteFunction>(agent, realm, fp);
    let decode_uri = create_builtin_function::<DecodeUriFunction>(agent, realm, fp);
    let decode_uri_component =
        create_builtin_function::<DecodeUriComponentFunction>(agent, realm, fp);
    let encode_uri = create_builtin_function::<EncodeUriFunction>(agent, realm, fp);
    let encode_uri_component =
        create_builtin_function::<EncodeUriComponentFunction>(agent, realm, fp);

    Intrinsics {
        object,
        object_prototype,
        function,
        function_prototype,
        throw_type_error,
        boolean,
        boolean_prototype,
        symbol,
        symbol_prototype,
        error,
        error_prototype,
        aggregate_error,
        aggregate_error_prototype,
        eval_error,
        eval_error_prototype,
        range_error,
        range_error_prototype,
        reference_error,
        reference_error_prototype,
        syntax_error,
        syntax_error_prototype,
        type_error,
        type_error_prototype,
        uri_error,
        uri_error_prototype,
        number,
        number_prototype,
        big_int,
        big_int_prototype,
        math,
        date,
        date_prototype,
        string,
        string_prototype,
        regexp,
        regexp_prototype,
        array,
        array_prototype,
        array_buffer,
        array_buffer_prototype,
        data_view,
        data_view_prototype,
        typed_array,
        typed_array_prototype,
        int8_array,
        uint8_array,
        uint8_clamped_array,
        int16_array,
        uint16_array,
        int32_array,
        uint32_array,
        big_int64_array,
        big_uint64_array,
        float32_array,
        float64_array,
        int8_array_prototype,
        uint8_array_prototype,
        uint8_clamped_array_prototype,
        int16_array_prototype,
        uint16_array_prototype,
        int32_array_prototype,
        uint32_array_prototype,
        big_int64_array_prototype,
        big_uint64_array_prototype,
        float32_array_prototype,
        float64_array_prototype,
        map,
        map_prototype,
        set,
        set_prototype,
        weak_map,
        weak_map_prototype,
        weak_set,
        weak_set_prototype,
        json,
        promise,
        promise_prototype,
        proxy,
        reflect,
        iterator_prototype,
        array_iterator_prototype,
        string_iterator_prototype,
        map_iterator_prototype,
        set_iterator_prototype,
        generator_function_prototype,
        generator_prototype,
        eval,
        parse_int,
        parse_float,
        is_nan,
        is_finite,
        decode_uri,
        decode_uri_component,
        encode_uri,
        encode_uri_component,
    }
}
