// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod module;
pub mod script;
pub mod source_code;

use module::Module;
use script::Script;

/// ### [ScriptOrModule](https://tc39.es/ecma262/#sec-execution-contexts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOrModule {
    Script(Script),
    Module(Module),
}
