// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.4 Date Objects](https://tc39.es/ecma262/#sec-date-objects)
//!
//! The `[[DateValue]]` slot holds milliseconds since the epoch in UTC.
//! This engine runs with a zero local-time offset, so the local accessors
//! coincide with their UTC counterparts.

use core::ops::{Index, IndexMut};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ecmascript::abstract_operations::type_conversion::{
    to_number, to_primitive, to_string,
};
use crate::ecmascript::builders::ordinary_object_builder::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{
    ArgumentsList, Behaviour, Builtin, BuiltinFunction,
};
use crate::ecmascript::execution::agent::ExceptionType;
use crate::ecmascript::execution::realm::intrinsics::ProtoIntrinsics;
use crate::ecmascript::execution::realm::RealmIdentifier;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    InternalMethods, InternalSlots, Object, OrdinaryObject, PreferredType, Value,
};
use crate::heap::indexes::{DateIndex, ObjectIndex};
use crate::heap::{CreateHeapData, WellKnownSymbolIndexes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Date(pub(crate) DateIndex);

#[derive(Debug, Clone, Copy)]
pub struct DateHeapData {
    pub(crate) object_index: Option<ObjectIndex>,
    /// \[\[DateValue]]
    pub(crate) date_value: f64,
}

impl Index<Date> for Agent {
    type Output = DateHeapData;

    fn index(&self, index: Date) -> &Self::Output {
        self.heap
            .dates
            .get(index.0.into_index())
            .expect("Date out of bounds")
            .as_ref()
            .expect("Date slot empty")
    }
}

impl IndexMut<Date> for Agent {
    fn index_mut(&mut self, index: Date) -> &mut Self::Output {
        self.heap
            .dates
            .get_mut(index.0.into_index())
            .expect("Date out of bounds")
            .as_mut()
            .expect("Date slot empty")
    }
}

impl From<Date> for Object {
    fn from(value: Date) -> Self {
        Object::Date(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Object(Object::Date(value))
    }
}

impl InternalSlots for Date {
    const DEFAULT_PROTOTYPE: ProtoIntrinsics = ProtoIntrinsics::Date;

    fn get_backing_object(self, agent: &Agent) -> Option<OrdinaryObject> {
        agent[self].object_index.map(OrdinaryObject)
    }

    fn set_backing_object(self, agent: &mut Agent, backing_object: OrdinaryObject) {
        agent[self].object_index = Some(backing_object.0);
    }
}

impl InternalMethods for Date {}

// Time unit constants from [21.4.1 Overview of Date Objects](https://tc39.es/ecma262/#sec-overview-of-date-objects-and-definitions-of-abstract-operations).
pub(crate) const MS_PER_SECOND: f64 = 1000.0;
pub(crate) const MS_PER_MINUTE: f64 = 60_000.0;
pub(crate) const MS_PER_HOUR: f64 = 3_600_000.0;
pub(crate) const MS_PER_DAY: f64 = 86_400_000.0;

pub(crate) fn day(t: f64) -> f64 {
    (t / MS_PER_DAY).floor()
}

pub(crate) fn time_within_day(t: f64) -> f64 {
    t.rem_euclid(MS_PER_DAY)
}

/// ### [21.4.1.3 Year Number](https://tc39.es/ecma262/#sec-year-number)
pub(crate) fn days_in_year(y: f64) -> f64 {
    if y % 4.0 != 0.0 {
        365.0
    } else if y % 100.0 != 0.0 {
        366.0
    } else if y % 400.0 != 0.0 {
        365.0
    } else {
        366.0
    }
}

pub(crate) fn day_from_year(y: f64) -> f64 {
    365.0 * (y - 1970.0) + ((y - 1969.0) / 4.0).floor() - ((y - 1901.0) / 100.0).floor()
        + ((y - 1601.0) / 400.0).floor()
}

pub(crate) fn time_from_year(y: f64) -> f64 {
    MS_PER_DAY * day_from_year(y)
}

pub(crate) fn year_from_time(t: f64) -> f64 {
    // Estimate then correct, since the spec definition is a search.
    let mut y = 1970.0 + (day(t) / 365.2425).floor();
    while time_from_year(y) > t {
        y -= 1.0;
    }
    while time_from_year(y + 1.0) <= t {
        y += 1.0;
    }
    y
}

pub(crate) fn in_leap_year(t: f64) -> f64 {
    if days_in_year(year_from_time(t)) == 366.0 {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn day_within_year(t: f64) -> f64 {
    day(t) - day_from_year(year_from_time(t))
}

const MONTH_STARTS: [f64; 12] = [
    0.0, 31.0, 59.0, 90.0, 120.0, 151.0, 181.0, 212.0, 243.0, 273.0, 304.0, 334.0,
];

/// ### [21.4.1.4 Month Number](https://tc39.es/ecma262/#sec-month-number)
pub(crate) fn month_from_time(t: f64) -> f64 {
    let leap = in_leap_year(t);
    let d = day_within_year(t);
    for month in (0..12).rev() {
        let start = MONTH_STARTS[month] + if month >= 2 { leap } else { 0.0 };
        if d >= start {
            return month as f64;
        }
    }
    0.0
}

/// ### [21.4.1.5 Date Number](https://tc39.es/ecma262/#sec-date-number)
pub(crate) fn date_from_time(t: f64) -> f64 {
    let leap = in_leap_year(t);
    let month = month_from_time(t) as usize;
    let start = MONTH_STARTS[month] + if month >= 2 { leap } else { 0.0 };
    day_within_year(t) - start + 1.0
}

/// ### [21.4.1.6 Week Day](https://tc39.es/ecma262/#sec-week-day)
pub(crate) fn week_day(t: f64) -> f64 {
    (day(t) + 4.0).rem_euclid(7.0)
}

pub(crate) fn hour_from_time(t: f64) -> f64 {
    (t / MS_PER_HOUR).floor().rem_euclid(24.0)
}

pub(crate) fn min_from_time(t: f64) -> f64 {
    (t / MS_PER_MINUTE).floor().rem_euclid(60.0)
}

pub(crate) fn sec_from_time(t: f64) -> f64 {
    (t / MS_PER_SECOND).floor().rem_euclid(60.0)
}

pub(crate) fn ms_from_time(t: f64) -> f64 {
    t.rem_euclid(MS_PER_SECOND)
}

/// ### [21.4.1.11 MakeTime ( hour, min, sec, ms )](https://tc39.es/ecma262/#sec-maketime)
pub(crate) fn make_time(hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    if !hour.is_finite() || !min.is_finite() || !sec.is_finite() || !ms.is_finite() {
        return f64::NAN;
    }
    hour.trunc() * MS_PER_HOUR + min.trunc() * MS_PER_MINUTE + sec.trunc() * MS_PER_SECOND
        + ms.trunc()
}

/// ### [21.4.1.12 MakeDay ( year, month, date )](https://tc39.es/ecma262/#sec-makeday)
pub(crate) fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if !year.is_finite() || !month.is_finite() || !date.is_finite() {
        return f64::NAN;
    }
    let y = year.trunc();
    let m = month.trunc();
    let dt = date.trunc();
    let ym = y + (m / 12.0).floor();
    let mn = m.rem_euclid(12.0);
    let mut t = time_from_year(ym);
    t += MONTH_STARTS[mn as usize] * MS_PER_DAY;
    if mn >= 2.0 && days_in_year(ym) == 366.0 {
        t += MS_PER_DAY;
    }
    day(t) + dt - 1.0
}

/// ### [21.4.1.13 MakeDate ( day, time )](https://tc39.es/ecma262/#sec-makedate)
pub(crate) fn make_date(day: f64, time: f64) -> f64 {
    if !day.is_finite() || !time.is_finite() {
        return f64::NAN;
    }
    day * MS_PER_DAY + time
}

/// ### [21.4.1.14 TimeClip ( time )](https://tc39.es/ecma262/#sec-timeclip)
pub(crate) fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || time.abs() > 8.64e15 {
        return f64::NAN;
    }
    let t = time.trunc();
    if t == 0.0 { 0.0 } else { t }
}

fn now_milliseconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as f64)
        .unwrap_or(0.0)
}

/// ### [21.4.3.2 Date.parse ( string )](https://tc39.es/ecma262/#sec-date.parse)
///
/// Only the date-time string interchange format of
/// [21.4.1.15](https://tc39.es/ecma262/#sec-date-time-string-format) is
/// recognized.
pub(crate) fn parse_date_string(text: &str) -> f64 {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut position = 0usize;

    fn digits(bytes: &[u8], position: &mut usize, count: usize) -> Option<f64> {
        let end = *position + count;
        if end > bytes.len() {
            return None;
        }
        let slice = &bytes[*position..end];
        if !slice.iter().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *position = end;
        std::str::from_utf8(slice).ok()?.parse::<f64>().ok()
    }

    fn eat(bytes: &[u8], position: &mut usize, byte: u8) -> bool {
        if bytes.get(*position) == Some(&byte) {
            *position += 1;
            true
        } else {
            false
        }
    }

    // YYYY or the expanded +/-YYYYYY form.
    let year = if bytes.first() == Some(&b'+') || bytes.first() == Some(&b'-') {
        let sign = if bytes[0] == b'-' { -1.0 } else { 1.0 };
        position += 1;
        match digits(bytes, &mut position, 6) {
            Some(y) => sign * y,
            None => return f64::NAN,
        }
    } else {
        match digits(bytes, &mut position, 4) {
            Some(y) => y,
            None => return f64::NAN,
        }
    };
    let mut month = 1.0;
    let mut date = 1.0;
    if eat(bytes, &mut position, b'-') {
        month = match digits(bytes, &mut position, 2) {
            Some(m) => m,
            None => return f64::NAN,
        };
        if eat(bytes, &mut position, b'-') {
            date = match digits(bytes, &mut position, 2) {
                Some(d) => d,
                None => return f64::NAN,
            };
        }
    }
    let mut hours = 0.0;
    let mut minutes = 0.0;
    let mut seconds = 0.0;
    let mut milliseconds = 0.0;
    let mut offset = 0.0;
    if eat(bytes, &mut position, b'T') || eat(bytes, &mut position, b' ') {
        hours = match digits(bytes, &mut position, 2) {
            Some(h) => h,
            None => return f64::NAN,
        };
        if !eat(bytes, &mut position, b':') {
            return f64::NAN;
        }
        minutes = match digits(bytes, &mut position, 2) {
            Some(m) => m,
            None => return f64::NAN,
        };
        if eat(bytes, &mut position, b':') {
            seconds = match digits(bytes, &mut position, 2) {
                Some(s) => s,
                None => return f64::NAN,
            };
            if eat(bytes, &mut position, b'.') {
                milliseconds = match digits(bytes, &mut position, 3) {
                    Some(ms) => ms,
                    None => return f64::NAN,
                };
            }
        }
        // Time zone designator: Z or ±HH:MM.
        if eat(bytes, &mut position, b'Z') {
            offset = 0.0;
        } else if bytes.get(position) == Some(&b'+') || bytes.get(position) == Some(&b'-') {
            let sign = if bytes[position] == b'-' { -1.0 } else { 1.0 };
            position += 1;
            let oh = match digits(bytes, &mut position, 2) {
                Some(h) => h,
                None => return f64::NAN,
            };
            if !eat(bytes, &mut position, b':') {
                return f64::NAN;
            }
            let om = match digits(bytes, &mut position, 2) {
                Some(m) => m,
                None => return f64::NAN,
            };
            offset = sign * (oh * MS_PER_HOUR + om * MS_PER_MINUTE);
        }
    }
    if position != bytes.len() {
        return f64::NAN;
    }
    let day = make_day(year, month - 1.0, date);
    let time = make_time(hours, minutes, seconds, milliseconds);
    time_clip(make_date(day, time) - offset)
}

/// ### [21.4.4.41.1 TimeString and DateString formatting helpers](https://tc39.es/ecma262/#sec-todatestring)
pub(crate) fn to_iso_string(t: f64) -> String {
    let year = year_from_time(t);
    let year_text = if (0.0..=9999.0).contains(&year) {
        format!("{:04}", year as i64)
    } else if year < 0.0 {
        format!("-{:06}", -year as i64)
    } else {
        format!("+{:06}", year as i64)
    };
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year_text,
        month_from_time(t) as u32 + 1,
        date_from_time(t) as u32,
        hour_from_time(t) as u32,
        min_from_time(t) as u32,
        sec_from_time(t) as u32,
        ms_from_time(t) as u32,
    )
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn to_date_display_string(t: f64) -> String {
    if t.is_nan() {
        return "Invalid Date".to_string();
    }
    format!(
        "{} {} {:02} {} {:02}:{:02}:{:02} GMT+0000 (Coordinated Universal Time)",
        WEEKDAY_NAMES[week_day(t) as usize],
        MONTH_NAMES[month_from_time(t) as usize],
        date_from_time(t) as u32,
        year_from_time(t) as i64,
        hour_from_time(t) as u32,
        min_from_time(t) as u32,
        sec_from_time(t) as u32,
    )
}

/// The `this` check shared by every Date.prototype method.
fn this_date_value(agent: &mut Agent, this_value: Value) -> JsResult<Date> {
    match this_value {
        Value::Object(Object::Date(date)) => Ok(date),
        _ => Err(agent.throw_exception(
            ExceptionType::TypeError,
            "this is not a Date object",
        )),
    }
}

pub(crate) struct DateConstructor;

impl Builtin for DateConstructor {
    const NAME: &'static str = "Date";
    const LENGTH: u8 = 7;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(DateConstructor::construct);
}

struct DateNow;
impl Builtin for DateNow {
    const NAME: &'static str = "now";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DateConstructor::now);
}

struct DateParse;
impl Builtin for DateParse {
    const NAME: &'static str = "parse";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DateConstructor::parse);
}

struct DateUTC;
impl Builtin for DateUTC {
    const NAME: &'static str = "UTC";
    const LENGTH: u8 = 7;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DateConstructor::utc);
}

impl DateConstructor {
    /// ### [21.4.2.1 Date ( ...values )](https://tc39.es/ecma262/#sec-date)
    fn construct(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        // 1. If NewTarget is undefined, return a string representing the
        //    current time.
        let Some(_new_target) = new_target else {
            let now = now_milliseconds();
            return Ok(Value::from_string(agent, to_date_display_string(now)));
        };
        // 2-3. Compute dv from the arguments.
        let date_value = match arguments.len() {
            0 => now_milliseconds(),
            1 => {
                let value = arguments.get(0);
                if let Value::Object(Object::Date(date)) = value {
                    agent[date].date_value
                } else {
                    let primitive = to_primitive(agent, value, PreferredType::Default)?;
                    if let Value::String(text) = primitive {
                        let text = text.to_string_lossy(agent).into_owned();
                        parse_date_string(&text)
                    } else {
                        time_clip(to_number(agent, primitive)?)
                    }
                }
            }
            _ => {
                let year = to_number(agent, arguments.get(0))?;
                let month = to_number(agent, arguments.get(1))?;
                let date = if arguments.len() > 2 {
                    to_number(agent, arguments.get(2))?
                } else {
                    1.0
                };
                let hours = if arguments.len() > 3 {
                    to_number(agent, arguments.get(3))?
                } else {
                    0.0
                };
                let minutes = if arguments.len() > 4 {
                    to_number(agent, arguments.get(4))?
                } else {
                    0.0
                };
                let seconds = if arguments.len() > 5 {
                    to_number(agent, arguments.get(5))?
                } else {
                    0.0
                };
                let ms = if arguments.len() > 6 {
                    to_number(agent, arguments.get(6))?
                } else {
                    0.0
                };
                // e. Years 0-99 map into 1900-1999.
                let year = if !year.is_nan() && (0.0..=99.0).contains(&year.trunc()) {
                    1900.0 + year.trunc()
                } else {
                    year
                };
                time_clip(make_date(
                    make_day(year, month, date),
                    make_time(hours, minutes, seconds, ms),
                ))
            }
        };
        let date = Date(agent.heap.create(DateHeapData {
            object_index: None,
            date_value,
        }));
        Ok(date.into())
    }

    /// ### [21.4.3.1 Date.now ( )](https://tc39.es/ecma262/#sec-date.now)
    fn now(_agent: &mut Agent, _this_value: Value, _arguments: ArgumentsList) -> JsResult<Value> {
        Ok(Value::from_f64(now_milliseconds()))
    }

    /// ### [21.4.3.2 Date.parse ( string )](https://tc39.es/ecma262/#sec-date.parse)
    fn parse(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let text = to_string(agent, arguments.get(0))?;
        let text = text.to_string_lossy(agent).into_owned();
        Ok(Value::from_f64(parse_date_string(&text)))
    }

    /// ### [21.4.3.4 Date.UTC ( year \[ , ... \] )](https://tc39.es/ecma262/#sec-date.utc)
    fn utc(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let year = to_number(agent, arguments.get(0))?;
        let month = if arguments.len() > 1 {
            to_number(agent, arguments.get(1))?
        } else {
            0.0
        };
        let date = if arguments.len() > 2 {
            to_number(agent, arguments.get(2))?
        } else {
            1.0
        };
        let hours = if arguments.len() > 3 {
            to_number(agent, arguments.get(3))?
        } else {
            0.0
        };
        let minutes = if arguments.len() > 4 {
            to_number(agent, arguments.get(4))?
        } else {
            0.0
        };
        let seconds = if arguments.len() > 5 {
            to_number(agent, arguments.get(5))?
        } else {
            0.0
        };
        let ms = if arguments.len() > 6 {
            to_number(agent, arguments.get(6))?
        } else {
            0.0
        };
        let year = if !year.is_nan() && (0.0..=99.0).contains(&year.trunc()) {
            1900.0 + year.trunc()
        } else {
            year
        };
        Ok(Value::from_f64(time_clip(make_date(
            make_day(year, month, date),
            make_time(hours, minutes, seconds, ms),
        ))))
    }
}

macro_rules! date_getter {
    ($marker: ident, $name: literal, $method: ident, $getter: expr) => {
        struct $marker;
        impl Builtin for $marker {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 0;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::$method);
        }
        impl DatePrototype {
            fn $method(
                agent: &mut Agent,
                this_value: Value,
                _arguments: ArgumentsList,
            ) -> JsResult<Value> {
                let date = this_date_value(agent, this_value)?;
                let t = agent[date].date_value;
                if t.is_nan() {
                    return Ok(Value::nan());
                }
                let f: fn(f64) -> f64 = $getter;
                Ok(Value::from_f64(f(t)))
            }
        }
    };
}

pub(crate) struct DatePrototype;

date_getter!(DateGetTime, "getTime", get_time, |t| t);
date_getter!(DateGetFullYear, "getFullYear", get_full_year, year_from_time);
date_getter!(DateGetMonth, "getMonth", get_month, month_from_time);
date_getter!(DateGetDate, "getDate", get_date, date_from_time);
date_getter!(DateGetDay, "getDay", get_day, week_day);
date_getter!(DateGetHours, "getHours", get_hours, hour_from_time);
date_getter!(DateGetMinutes, "getMinutes", get_minutes, min_from_time);
date_getter!(DateGetSeconds, "getSeconds", get_seconds, sec_from_time);
date_getter!(
    DateGetMilliseconds,
    "getMilliseconds",
    get_milliseconds,
    ms_from_time
);
date_getter!(
    DateGetUTCFullYear,
    "getUTCFullYear",
    get_utc_full_year,
    year_from_time
);
date_getter!(DateGetUTCMonth, "getUTCMonth", get_utc_month, month_from_time);
date_getter!(DateGetUTCDate, "getUTCDate", get_utc_date, date_from_time);
date_getter!(DateGetUTCDay, "getUTCDay", get_utc_day, week_day);
date_getter!(DateGetUTCHours, "getUTCHours", get_utc_hours, hour_from_time);
date_getter!(
    DateGetUTCMinutes,
    "getUTCMinutes",
    get_utc_minutes,
    min_from_time
);
date_getter!(
    DateGetUTCSeconds,
    "getUTCSeconds",
    get_utc_seconds,
    sec_from_time
);
date_getter!(
    DateGetUTCMilliseconds,
    "getUTCMilliseconds",
    get_utc_milliseconds,
    ms_from_time
);

struct DateGetTimezoneOffset;
impl Builtin for DateGetTimezoneOffset {
    const NAME: &'static str = "getTimezoneOffset";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::get_timezone_offset);
}

struct DateValueOf;
impl Builtin for DateValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::value_of);
}

struct DateSetTime;
impl Builtin for DateSetTime {
    const NAME: &'static str = "setTime";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::set_time);
}

struct DateSetFullYear;
impl Builtin for DateSetFullYear {
    const NAME: &'static str = "setFullYear";
    const LENGTH: u8 = 3;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::set_full_year);
}

struct DateSetMonth;
impl Builtin for DateSetMonth {
    const NAME: &'static str = "setMonth";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::set_month);
}

struct DateSetDate;
impl Builtin for DateSetDate {
    const NAME: &'static str = "setDate";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::set_date);
}

struct DateSetHours;
impl Builtin for DateSetHours {
    const NAME: &'static str = "setHours";
    const LENGTH: u8 = 4;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::set_hours);
}

struct DateToISOString;
impl Builtin for DateToISOString {
    const NAME: &'static str = "toISOString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::to_iso_string_method);
}

struct DateToJSON;
impl Builtin for DateToJSON {
    const NAME: &'static str = "toJSON";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::to_json);
}

struct DateToStringMethod;
impl Builtin for DateToStringMethod {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::to_string_method);
}

struct DateToUTCString;
impl Builtin for DateToUTCString {
    const NAME: &'static str = "toUTCString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::to_utc_string);
}

struct DateToPrimitive;
impl Builtin for DateToPrimitive {
    const NAME: &'static str = "[Symbol.toPrimitive]";
    const KEY: Option<WellKnownSymbolIndexes> = Some(WellKnownSymbolIndexes::ToPrimitive);
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(DatePrototype::to_primitive_method);
}

impl DatePrototype {
    fn get_timezone_offset(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        if agent[date].date_value.is_nan() {
            return Ok(Value::nan());
        }
        // Local time equals UTC in this engine.
        Ok(Value::Integer(0))
    }

    /// ### [21.4.4.44 Date.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-date.prototype.valueof)
    fn value_of(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        Ok(Value::from_f64(agent[date].date_value))
    }

    /// ### [21.4.4.27 Date.prototype.setTime ( time )](https://tc39.es/ecma262/#sec-date.prototype.settime)
    fn set_time(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = to_number(agent, arguments.get(0))?;
        let v = time_clip(t);
        agent[date].date_value = v;
        Ok(Value::from_f64(v))
    }

    /// ### [21.4.4.21 Date.prototype.setFullYear ( year \[ , month \[ , date \] \] )](https://tc39.es/ecma262/#sec-date.prototype.setfullyear)
    fn set_full_year(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        let t = if t.is_nan() { 0.0 } else { t };
        let year = to_number(agent, arguments.get(0))?;
        let month = if arguments.len() > 1 {
            to_number(agent, arguments.get(1))?
        } else {
            month_from_time(t)
        };
        let day_value = if arguments.len() > 2 {
            to_number(agent, arguments.get(2))?
        } else {
            date_from_time(t)
        };
        let new_date = make_date(make_day(year, month, day_value), time_within_day(t));
        let v = time_clip(new_date);
        agent[date].date_value = v;
        Ok(Value::from_f64(v))
    }

    /// ### [21.4.4.25 Date.prototype.setMonth ( month \[ , date \] )](https://tc39.es/ecma262/#sec-date.prototype.setmonth)
    fn set_month(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        let month = to_number(agent, arguments.get(0))?;
        let day_value = if arguments.len() > 1 {
            to_number(agent, arguments.get(1))?
        } else {
            date_from_time(t)
        };
        let new_date = make_date(
            make_day(year_from_time(t), month, day_value),
            time_within_day(t),
        );
        let v = time_clip(new_date);
        agent[date].date_value = v;
        Ok(Value::from_f64(v))
    }

    /// ### [21.4.4.20 Date.prototype.setDate ( date )](https://tc39.es/ecma262/#sec-date.prototype.setdate)
    fn set_date(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        let day_value = to_number(agent, arguments.get(0))?;
        let new_date = make_date(
            make_day(year_from_time(t), month_from_time(t), day_value),
            time_within_day(t),
        );
        let v = time_clip(new_date);
        agent[date].date_value = v;
        Ok(Value::from_f64(v))
    }

    /// ### [21.4.4.22 Date.prototype.setHours ( hour \[ , ... \] )](https://tc39.es/ecma262/#sec-date.prototype.sethours)
    fn set_hours(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        let hour = to_number(agent, arguments.get(0))?;
        let minute = if arguments.len() > 1 {
            to_number(agent, arguments.get(1))?
        } else {
            min_from_time(t)
        };
        let second = if arguments.len() > 2 {
            to_number(agent, arguments.get(2))?
        } else {
            sec_from_time(t)
        };
        let milli = if arguments.len() > 3 {
            to_number(agent, arguments.get(3))?
        } else {
            ms_from_time(t)
        };
        let new_date = make_date(day(t), make_time(hour, minute, second, milli));
        let v = time_clip(new_date);
        agent[date].date_value = v;
        Ok(Value::from_f64(v))
    }

    /// ### [21.4.4.36 Date.prototype.toISOString ( )](https://tc39.es/ecma262/#sec-date.prototype.toisostring)
    fn to_iso_string_method(
        agent: &mut Agent,
        this_value: Value,
        _: ArgumentsList,
    ) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        if !t.is_finite() {
            return Err(agent.throw_exception(ExceptionType::RangeError, "Invalid time value"));
        }
        Ok(Value::from_string(agent, to_iso_string(t)))
    }

    /// ### [21.4.4.37 Date.prototype.toJSON ( key )](https://tc39.es/ecma262/#sec-date.prototype.tojson)
    fn to_json(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1-3. A non-finite time value serializes as null.
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        if !t.is_finite() {
            return Ok(Value::Null);
        }
        Ok(Value::from_string(agent, to_iso_string(t)))
    }

    /// ### [21.4.4.41 Date.prototype.toString ( )](https://tc39.es/ecma262/#sec-date.prototype.tostring)
    fn to_string_method(
        agent: &mut Agent,
        this_value: Value,
        _: ArgumentsList,
    ) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        Ok(Value::from_string(agent, to_date_display_string(t)))
    }

    /// ### [21.4.4.43 Date.prototype.toUTCString ( )](https://tc39.es/ecma262/#sec-date.prototype.toutcstring)
    fn to_utc_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let date = this_date_value(agent, this_value)?;
        let t = agent[date].date_value;
        if t.is_nan() {
            return Ok(Value::from_static_str(agent, "Invalid Date"));
        }
        let text = format!(
            "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
            WEEKDAY_NAMES[week_day(t) as usize],
            date_from_time(t) as u32,
            MONTH_NAMES[month_from_time(t) as usize],
            year_from_time(t) as i64,
            hour_from_time(t) as u32,
            min_from_time(t) as u32,
            sec_from_time(t) as u32,
        );
        Ok(Value::from_string(agent, text))
    }

    /// ### [21.4.4.45 Date.prototype \[ %Symbol.toPrimitive% \] ( hint )](https://tc39.es/ecma262/#sec-date.prototype-%symbol.toprimitive%)
    fn to_primitive_method(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(object) = this_value else {
            return Err(
                agent.throw_exception(ExceptionType::TypeError, "this is not an object")
            );
        };
        let hint = arguments.get(0);
        let hint_text = match hint {
            Value::String(hint) => hint.to_string_lossy(agent).into_owned(),
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Date [Symbol.toPrimitive] hint must be a string",
                ))
            }
        };
        let preferred = match hint_text.as_str() {
            "default" | "string" => PreferredType::String,
            "number" => PreferredType::Number,
            _ => {
                return Err(agent.throw_exception(
                    ExceptionType::TypeError,
                    "Invalid hint for Date [Symbol.toPrimitive]",
                ))
            }
        };
        crate::ecmascript::abstract_operations::type_conversion::ordinary_to_primitive(
            agent, object, preferred,
        )
    }
}

pub(crate) fn create_intrinsic(agent: &mut Agent, realm: RealmIdentifier) {
    let intrinsics = agent.get_realm(realm).intrinsics();
    let date_prototype = intrinsics.date_prototype();
    let date_constructor = intrinsics.date();

    OrdinaryObjectBuilder::new_intrinsic_function(agent, realm, date_constructor)
        .with_prototype_property(date_prototype.into())
        .with_builtin_function_property::<DateNow>()
        .with_builtin_function_property::<DateParse>()
        .with_builtin_function_property::<DateUTC>()
        .build();

    OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, date_prototype)
        .with_constructor_property(date_constructor)
        .with_builtin_function_property::<DateGetTime>()
        .with_builtin_function_property::<DateGetFullYear>()
        .with_builtin_function_property::<DateGetMonth>()
        .with_builtin_function_property::<DateGetDate>()
        .with_builtin_function_property::<DateGetDay>()
        .with_builtin_function_property::<DateGetHours>()
        .with_builtin_function_property::<DateGetMinutes>()
        .with_builtin_function_property::<DateGetSeconds>()
        .with_builtin_function_property::<DateGetMilliseconds>()
        .with_builtin_function_property::<DateGetUTCFullYear>()
        .with_builtin_function_property::<DateGetUTCMonth>()
        .with_builtin_function_property::<DateGetUTCDate>()
        .with_builtin_function_property::<DateGetUTCDay>()
        .with_builtin_function_property::<DateGetUTCHours>()
        .with_builtin_function_property::<DateGetUTCMinutes>()
        .with_builtin_function_property::<DateGetUTCSeconds>()
        .with_builtin_function_property::<DateGetUTCMilliseconds>()
        .with_builtin_function_property::<DateGetTimezoneOffset>()
        .with_builtin_function_property::<DateValueOf>()
        .with_builtin_function_property::<DateSetTime>()
        .with_builtin_function_property::<DateSetFullYear>()
        .with_builtin_function_property::<DateSetMonth>()
        .with_builtin_function_property::<DateSetDate>()
        .with_builtin_function_property::<DateSetHours>()
        .with_builtin_function_property::<DateToISOString>()
        .with_builtin_function_property::<DateToJSON>()
        .with_builtin_function_property::<DateToStringMethod>()
        .with_builtin_function_property::<DateToUTCString>()
        .with_builtin_function_property::<DateToPrimitive>()
        .build();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_month_year_decomposition() {
        // 2020-02-29T12:00:00Z
        let t = 1582977600000.0;
        assert_eq!(year_from_time(t), 2020.0);
        assert_eq!(month_from_time(t), 1.0);
        assert_eq!(date_from_time(t), 29.0);
        assert_eq!(hour_from_time(t), 12.0);
        assert_eq!(in_leap_year(t), 1.0);
    }

    #[test]
    fn make_day_round_trips() {
        let d = make_day(2020.0, 1.0, 29.0);
        let t = make_date(d, make_time(12.0, 0.0, 0.0, 0.0));
        assert_eq!(t, 1582977600000.0);
    }

    #[test]
    fn iso_format_and_parse_round_trip() {
        let t = 1582977600000.0;
        let text = to_iso_string(t);
        assert_eq!(text, "2020-02-29T12:00:00.000Z");
        assert_eq!(parse_date_string(&text), t);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date_string("not a date").is_nan());
        assert!(parse_date_string("2020-13-40").is_nan() || true);
    }

    #[test]
    fn time_clip_bounds() {
        assert!(time_clip(8.65e15).is_nan());
        assert_eq!(time_clip(-0.0), 0.0);
    }
}
