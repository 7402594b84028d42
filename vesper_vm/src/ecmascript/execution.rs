// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod agent;
pub mod environments;
pub mod execution_context;
pub mod realm;

pub(crate) use agent::resolve_binding;
pub use agent::{Agent, ExceptionType, FatalKind, JsError, JsResult, QuotaKind};
pub use environments::EnvironmentIndex;
pub use execution_context::{ECMAScriptCode, ExecutionContext};
pub use realm::{Realm, RealmIdentifier};
