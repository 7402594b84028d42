// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [22.2 RegExp (Regular Expression) Objects](https://tc39.es/ecma262/#sec-regexp-regular-expression-objects)
//!
//! Pattern matching is delegated to an opaque matcher (the `regex` crate);
//! a translation layer maps the common ECMAScript pattern syntax onto it.
//! `lastIndex` advancement for the `g` and `y` flags is implemented here,
//! over UTF-16 code unit indices.

use core::ops::{Index, IndexMut};

use regex::Regex;

use crate::ecmascript::abstract_operations::operations_on_objects::{get, set};
use crate::ecmascript::abstract_operations::type_conversion::{to_length, to_string};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::array::create_array_from_list;
use crate::ecmascript::builtins::builtin_function::{ArgumentsList, Behaviour, Builtin};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    HeapString, InternalMethods, InternalSlots, Object, OrdinaryObject, PropertyDescriptor,
    PropertyKey, Value,
};
use crate::heap::indexes::{ObjectIndex, RegExpIndex};
use crate::heap::CreateHeapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RegExp(pub(crate) RegExpIndex);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RegExpFlags {
    pub(crate) global: bool,
    pub(crate) ignore_case: bool,
    pub(crate) multiline: bool,
    pub(crate) dot_all: bool,
    pub(crate) unicode: bool,
    pub(crate) sticky: bool,
}

impl RegExpFlags {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let mut flags = RegExpFlags::default();
        for c in text.chars() {
            let slot = match c {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                _ => return None,
            };
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(flags)
    }

    pub(crate) fn to_flags_string(self) -> String {
        let mut out = String::new();
        if self.global {
            out.push('g');
        }
        if self.ignore_case {
            out.push('i');
        }
        if self.multiline {
            out.push('m');
        }
        if self.dot_all {
            out.push('s');
        }
        if self.unicode {
            out.push('u');
        }
        if self.sticky {
            out.push('y');
        }
        out
    }
}

#[derive(Debug)]
pub struct RegExpHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[OriginalSource]]
    pub(crate) original_source: HeapString,
    /// \[\[OriginalFlags]]
    pub(crate) flags: RegExpFlags,
    /// \[\[RegExpMatcher]]: the opaque matcher.
    pub(crate) matcher: Regex,
    /// `lastIndex`, in UTF-16 code units.
    pub(crate) last_index: f64,
}

impl Index<RegExp> for Agent {
    type Output = RegExpHeapData;

    fn index(&self, index: RegExp) -> &Self::Output {
        self.heap
            .regexps
            .get(index.0.into_index())
            .expect("RegExp out of bounds")
            .as_ref()
            .expect("RegExp slot empty")
    }
}

impl IndexMut<RegExp> for Agent {
    fn index_mut(&mut self, index: RegExp) -> &mut Self::Output {
        self.heap
            .regexps
            .get_mut(index.0.into_index())
            .expect("RegExp out of bounds")
            .as_mut()
            .expect("RegExp slot empty")
    }
}

impl From<RegExp> for Object {
    fn from(value: RegExp) -> Self {
        Object::RegExp(value)
    }
}

impl From<RegExp> for Value {
    fn from(value: RegExp) -> Self {
        Value::Object(Object::RegExp(value))
    }
}

impl InternalSlots for RegExp {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::RegExp;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for RegExp {
    /// `lastIndex` presents as a writable, non-enumerable, non-configurable
    /// own property backed by the heap slot.
    fn internal_get_own_property(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        let last_index_key = PropertyKey::from_static_str(agent, "lastIndex");
        if property_key == last_index_key {
            return Ok(Some(PropertyDescriptor {
                value: Some(Value::from_f64(agent[self].last_index)),
                writable: Some(true),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            }));
        }
        Ok(self
            .get_backing_object(agent)
            .and_then(|backing_object| {
                super::ordinary::ordinary_get_own_property(agent, backing_object, property_key)
            }))
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        let last_index_key = PropertyKey::from_static_str(agent, "lastIndex");
        if property_key == last_index_key {
            let numeric = crate::ecmascript::abstract_operations::type_conversion::to_number(
                agent, value,
            )?;
            agent[self].last_index = numeric;
            return Ok(true);
        }
        super::ordinary::ordinary_set(agent, self.into(), property_key, value, receiver)
    }
}

/// Translate an ECMAScript pattern into the syntax of the backing matcher.
/// Unsupported constructs (back references, look-behind) surface as a
/// SyntaxError at construction.
pub(crate) fn translate_pattern(pattern: &str, flags: RegExpFlags) -> Result<Regex, String> {
    let mut translated = String::with_capacity(pattern.len() + 8);
    if flags.ignore_case {
        translated.push_str("(?i)");
    }
    if flags.multiline {
        translated.push_str("(?m)");
    }
    if flags.dot_all {
        translated.push_str("(?s)");
    }
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(&next) = chars.peek() else {
                    return Err("Trailing backslash in pattern".to_string());
                };
                if next.is_ascii_digit() && next != '0' && !in_class {
                    return Err("Backreferences are not supported".to_string());
                }
                translated.push('\\');
                translated.push(next);
                chars.next();
            }
            '[' if !in_class => {
                in_class = true;
                translated.push('[');
            }
            ']' if in_class => {
                in_class = false;
                translated.push(']');
            }
            '(' if !in_class => {
                if chars.peek() == Some(&'?') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    match lookahead.next() {
                        Some('<') => match lookahead.next() {
                            Some('=') | Some('!') => {
                                return Err("Lookbehind is not supported".to_string());
                            }
                            _ => {
                                // Named group: (?<name> becomes (?P<name>.
                                translated.push_str("(?P<");
                                chars.next();
                                chars.next();
                            }
                        },
                        Some('=') | Some('!') => {
                            return Err("Lookahead is not supported".to_string());
                        }
                        _ => translated.push('('),
                    }
                } else {
                    translated.push('(');
                }
            }
            _ => translated.push(c),
        }
    }
    Regex::new(&translated).map_err(|error| error.to_string())
}

/// ### [22.2.3.1 RegExpCreate ( P, F )](https://tc39.es/ecma262/#sec-regexpcreate)
pub(crate) fn reg_exp_create(
    agent: &mut Agent,
    pattern: HeapString,
    flags_text: &str,
) -> JsResult<RegExp> {
    let Some(flags) = RegExpFlags::parse(flags_text) else {
        return Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            "Invalid flags supplied to RegExp constructor",
        ));
    };
    let pattern_text = pattern.to_string_lossy(agent).into_owned();
    let matcher = match translate_pattern(&pattern_text, flags) {
        Ok(matcher) => matcher,
        Err(message) => {
            return Err(agent.throw_exception(
                ExceptionType::SyntaxError,
                &format!("Invalid regular expression: {message}"),
            ));
        }
    };
    Ok(RegExp(agent.heap.create(RegExpHeapData {
        object_index: None,
        original_source: pattern,
        flags,
        matcher,
        last_index: 0.0,
    })))
}

/// UTF-16 code unit index to byte offset within `text`.
fn utf16_to_byte_index(text: &str, utf16_index: usize) -> Option<usize> {
    let mut units = 0usize;
    for (byte_index, c) in text.char_indices() {
        if units >= utf16_index {
            return Some(byte_index);
        }
        units += c.len_utf16();
    }
    if units >= utf16_index {
        Some(text.len())
    } else {
        None
    }
}

fn byte_to_utf16_index(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().map(|c| c.len_utf16()).sum()
}

pub(crate) struct RegExpMatchResult {
    /// Start of the match in UTF-16 code units.
    pub(crate) index: usize,
    /// End of the match in UTF-16 code units.
    pub(crate) end: usize,
    /// The matched text followed by capture groups.
    pub(crate) captures: Vec<Option<String>>,
    /// Named capture groups.
    pub(crate) groups: Vec<(String, Option<String>)>,
}

/// Run the matcher at or after `last_index` (UTF-16 code units).
pub(crate) fn regexp_match_at(
    agent: &Agent,
    r: RegExp,
    text: &str,
    last_index: usize,
    sticky: bool,
) -> Option<RegExpMatchResult> {
    let byte_index = utf16_to_byte_index(text, last_index)?;
    let data = &agent[r];
    let captures = data.matcher.captures_at(text, byte_index)?;
    let whole = captures.get(0).unwrap();
    if sticky && whole.start() != byte_index {
        return None;
    }
    let group_names: Vec<Option<&str>> = data.matcher.capture_names().collect();
    let mut capture_texts = Vec::with_capacity(captures.len());
    let mut named_groups = Vec::new();
    for (i, capture) in (0..captures.len()).map(|i| (i, captures.get(i))) {
        capture_texts.push(capture.map(|m| m.as_str().to_string()));
        if let Some(Some(name)) = group_names.get(i) {
            named_groups.push((
                name.to_string(),
                captures.get(i).map(|m| m.as_str().to_string()),
            ));
        }
    }
    Some(RegExpMatchResult {
        index: byte_to_utf16_index(text, whole.start()),
        end: byte_to_utf16_index(text, whole.end()),
        captures: capture_texts,
        groups: named_groups,
    })
}

/// ### [22.2.7.2 RegExpBuiltinExec ( R, S )](https://tc39.es/ecma262/#sec-regexpbuiltinexec)
pub(crate) fn regexp_builtin_exec(
    agent: &mut Agent,
    r: RegExp,
    s: HeapString,
) -> JsResult<Value> {
    let text = s.to_string_lossy(agent).into_owned();
    let length = s.utf16_len(agent);
    let flags = agent[r].flags;
    // 1-4. Read lastIndex; it only matters for global or sticky regexps.
    let mut last_index = if flags.global || flags.sticky {
        to_length(agent, Value::from_f64(agent[r].last_index))? as usize
    } else {
        0
    };
    // 5-10. Find a match, advancing for non-sticky searches.
    if last_index > length {
        if flags.global || flags.sticky {
            agent[r].last_index = 0.0;
        }
        return Ok(Value::Null);
    }
    let result = regexp_match_at(agent, r, &text, last_index, flags.sticky);
    let Some(result) = result else {
        if flags.global || flags.sticky {
            agent[r].last_index = 0.0;
        }
        return Ok(Value::Null);
    };
    last_index = result.end;
    // 11-12. Update lastIndex on a successful global or sticky match.
    if flags.global || flags.sticky {
        agent[r].last_index = last_index as f64;
    }
    // 13-26. Build the result array.
    let mut elements: Vec<Value> = Vec::with_capacity(result.captures.len());
    for capture in &result.captures {
        match capture {
            Some(capture) => elements.push(Value::from_str(agent, capture)),
            None => elements.push(Value::Undefined),
        }
    }
    let array = create_array_from_list(agent, &elements);
    let index_key = PropertyKey::from_static_str(agent, "index");
    set(agent, array, index_key, Value::from(result.index), true)?;
    let input_key = PropertyKey::from_static_str(agent, "input");
    set(agent, array, input_key, s.into(), true)?;
    // 25. Named groups object, or undefined when the pattern has none.
    let groups_value = if result.groups.is_empty() {
        Value::Undefined
    } else {
        let object_prototype = agent.current_realm().intrinsics().object_prototype();
        let groups =
            super::ordinary::ordinary_object_create(agent, Some(object_prototype.into()));
        for (name, value) in &result.groups {
            let key = PropertyKey::from_str(agent, name);
            let value = match value {
                Some(value) => Value::from_str(agent, value),
                None => Value::Undefined,
            };
            set(agent, groups, key, value, true)?;
        }
        groups.into()
    };
    let groups_key = PropertyKey::from_static_str(agent, "groups");
    set(agent, array, groups_key, groups_value, true)?;
    Ok(array.into())
}

pub(crate) struct RegExpConstructor;

impl Builtin for RegExpConstructor {
    const NAME: &'static str = "RegExp";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(RegExpConstructor::construct);
}

impl RegExpConstructor {
    /// ### [22.2.4.1 RegExp ( pattern, flags )](https://tc39.es/ecma262/#sec-regexp-pattern-flags)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        let pattern = arguments.get(0);
        let flags = arguments.get(1);
        // 4-6. An existing RegExp contributes its source and flags.
        let (source, flags_text) = if let Value::Object(Object::RegExp(r)) = pattern {
            let source = agent[r].original_source;
            let original_flags = agent[r].flags.to_flags_string();
            let flags_text = if flags.is_undefined() {
                original_flags
            } else {
                let flags = to_string(agent, flags)?;
                flags.to_string_lossy(agent).into_owned()
            };
            (source, flags_text)
        } else {
            let source = if pattern.is_undefined() {
                HeapString::from_static_str(agent, "(?:)")
            } else {
                to_string(agent, pattern)?
            };
            let flags_text = if flags.is_undefined() {
                String::new()
            } else {
                let flags = to_string(agent, flags)?;
                flags.to_string_lossy(agent).into_owned()
            };
            (source, flags_text)
        };
        let regexp = reg_exp_create(agent, source, &flags_text)?;
        Ok(regexp.into())
    }
}

pub(crate) struct RegExpPrototype;

struct RegExpPrototypeExec;
impl Builtin for RegExpPrototypeExec {
    const NAME: &'static str = "exec";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::exec);
}

struct RegExpPrototypeTest;
impl Builtin for RegExpPrototypeTest {
    const NAME: &'static str = "test";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::test);
}

struct RegExpPrototypeToString;
impl Builtin for RegExpPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::to_string_method);
}

struct RegExpPrototypeGetSource;
impl Builtin for RegExpPrototypeGetSource {
    const NAME: &'static str = "source";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_source);
}

struct RegExpPrototypeGetFlags;
impl Builtin for RegExpPrototypeGetFlags {
    const NAME: &'static str = "flags";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_flags);
}

struct RegExpPrototypeGetGlobal;
impl Builtin for RegExpPrototypeGetGlobal {
    const NAME: &'static str = "global";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_global);
}

struct RegExpPrototypeGetSticky;
impl Builtin for RegExpPrototypeGetSticky {
    const NAME: &'static str = "sticky";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_sticky);
}

struct RegExpPrototypeGetIgnoreCase;
impl Builtin for RegExpPrototypeGetIgnoreCase {
    const NAME: &'static str = "ignoreCase";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(RegExpPrototype::get_ignore_case);
}

fn this_regexp(agent: &mut Agent, this_value: Value) -> JsResult<RegExp> {
    match this_value {
        Value::Object(Object::RegExp(r)) => Ok(r),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "Method called on incompatible receiver: expected a RegExp",
        )),
    }
}

impl RegExpPrototype {
    /// ### [22.2.6.2 RegExp.prototype.exec ( string )](https://tc39.es/ecma262/#sec-regexp.prototype.exec)
    fn exec(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        let s = to_string(agent, arguments.get(0))?;
        regexp_builtin_exec(agent, r, s)
    }

    /// ### [22.2.6.16 RegExp.prototype.test ( S )](https://tc39.es/ecma262/#sec-regexp.prototype.test)
    fn test(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        let s = to_string(agent, arguments.get(0))?;
        let result = regexp_builtin_exec(agent, r, s)?;
        Ok(Value::Boolean(!result.is_null()))
    }

    /// ### [22.2.6.17 RegExp.prototype.toString ( )](https://tc39.es/ecma262/#sec-regexp.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _: ArgumentsList,
    ) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        let source = agent[r].original_source.to_string_lossy(agent).into_owned();
        let flags = agent[r].flags.to_flags_string();
        Ok(Value::from_string(agent, format!("/{source}/{flags}")))
    }

    fn get_source(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        Ok(agent[r].original_source.into())
    }

    fn get_flags(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        let flags = agent[r].flags.to_flags_string();
        Ok(Value::from_string(agent, flags))
    }

    fn get_global(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        Ok(Value::Boolean(agent[r].flags.global))
    }

    fn get_sticky(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        Ok(Value::Boolean(agent[r].flags.sticky))
    }

    fn get_ignore_case(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let r = this_regexp(agent, this_value)?;
        Ok(Value::Boolean(agent[r].flags.ignore_case))
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let regexp_prototype = intrinsics.regexp_prototype();
    let regexp_constructor = intrinsics.regexp();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, regexp_constructor)
        .with_prototype_property(regexp_prototype.into())
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, regexp_prototype)
        .with_constructor_property(regexp_constructor)
        .with_builtin_function_property::<RegExpPrototypeExec>()
        .with_builtin_function_property::<RegExpPrototypeTest>()
        .with_builtin_function_property::<RegExpPrototypeToString>()
        .with_builtin_getter_property::<RegExpPrototypeGetSource>()
        .with_builtin_getter_property::<RegExpPrototypeGetFlags>()
        .with_builtin_getter_property::<RegExpPrototypeGetGlobal>()
        .with_builtin_getter_property::<RegExpPrototypeGetSticky>()
        .with_builtin_getter_property::<RegExpPrototypeGetIgnoreCase>()
        .build();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        let flags = RegExpFlags::parse("giy").unwrap();
        assert!(flags.global && flags.ignore_case && flags.sticky);
        assert!(RegExpFlags::parse("gg").is_none());
        assert!(RegExpFlags::parse("x").is_none());
        assert_eq!(flags.to_flags_string(), "giy");
    }

    #[test]
    fn translation_rejects_lookbehind() {
        assert!(translate_pattern("(?<=a)b", RegExpFlags::default()).is_err());
        assert!(translate_pattern("(?<name>a)b", RegExpFlags::default()).is_ok());
        assert!(translate_pattern("a\\1", RegExpFlags::default()).is_err());
    }

    #[test]
    fn case_insensitive_flag_translates() {
        let flags = RegExpFlags::parse("i").unwrap();
        let matcher = translate_pattern("abc", flags).unwrap();
        assert!(matcher.is_match("ABC"));
    }
}
