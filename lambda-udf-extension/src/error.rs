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

use lambda_udf_client::InvocationError;
use thiserror::Error;

/// Rejection of a registration at prepare time.
///
/// Raised before any remote call is attempted: malformed usage costs no
/// network round trip.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("expected two string arguments (function_name, payload_json), got {0}")]
    WrongArity(usize),
    #[error("expected two string arguments (function_name, payload_json), argument {position} is not a string")]
    NotAString { position: usize },
}

/// Failure of a single invocation on a prepared context.
///
/// The host surfaces every variant as a call failure with no usable result;
/// the taxonomy is preserved here for diagnostics.
#[derive(Debug, Error)]
pub enum CallError {
    /// The function result does not fit the context's output buffer. The
    /// call fails as a whole; the result is never truncated.
    #[error(
        "result of function `{function_name}` is {len} bytes, which exceeds the output buffer \
         capacity of {max} bytes"
    )]
    ResultTooLarge {
        function_name: String,
        len: usize,
        max: usize,
    },

    /// Transport, remote-execution or malformed-response failure reported
    /// by the invocation client.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}
