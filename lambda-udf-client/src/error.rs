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

use thiserror::Error;

/// Result type for invocation operations.
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Errors that can occur while invoking a remote function.
///
/// `Transport` and `Function` are deliberately distinct: a remote function
/// can fault and still produce a transport-successful response carrying a
/// function-error indicator. Classification inspects that indicator, never
/// the shape of the payload.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The invocation itself could not complete: connectivity, auth,
    /// throttling, or any SDK-reported non-success before a response body
    /// was available. Never retried at this layer.
    #[error("failed to invoke function `{function_name}`: {message}")]
    Transport {
        function_name: String,
        message: String,
    },

    /// The remote function executed and reported an error. `payload` is the
    /// raw response body, kept for diagnostics whether or not it is
    /// well-formed JSON.
    #[error("function `{function_name}` returned error `{error_type}`: {payload}")]
    Function {
        function_name: String,
        error_type: String,
        payload: String,
    },

    /// A transport-successful, non-faulted synchronous response whose body
    /// was absent or not parseable as JSON.
    #[error("malformed response payload from function `{function_name}`: {message}")]
    MalformedResponse {
        function_name: String,
        message: String,
    },

    /// Client construction or validation error.
    #[error("Lambda configuration error: {0}")]
    Configuration(String),
}
