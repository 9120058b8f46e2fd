// Copyright 2021-Present Datadog, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host-runtime adapter for the lambda-udf bridge.
//!
//! Adapts the invocation client to the three-phase extension contract of a
//! SQL host runtime - prepare once, invoke per row, release - with a bounded,
//! context-owned output buffer.
//!
//! The host registers two entry points distinguished only by invocation
//! mode: a synchronous one returning the function's JSON result, and a
//! fire-and-forget one returning a bare "triggered" signal. Both are served
//! by the same [`CallContext::invoke`] operation.
//!
//! The host runtime guarantees the prepare/invoke/release ordering and never
//! drives one context from two threads at once; distinct contexts are fully
//! independent and share no mutable state.

mod config;
mod context;
mod error;
mod runtime;

pub use config::ExtensionConfig;
pub use context::{ArgumentKind, CallContext};
pub use error::{CallError, ValidationError};
pub use runtime::bridge_runtime;
