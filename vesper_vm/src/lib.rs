// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

pub mod ecmascript;
pub mod embedding;
pub mod engine;
pub mod heap;

pub use ecmascript::execution::{Agent, JsResult};
pub use ecmascript::types::Value;
pub use embedding::{Engine, EngineError, EngineOptions};
use heap::Heap;
