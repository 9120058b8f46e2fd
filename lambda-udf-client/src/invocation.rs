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

use aws_sdk_lambda::types::InvocationType;

/// Whether the caller waits for the function's result (`Sync`) or merely
/// triggers its execution (`Async`).
///
/// "Asynchronous" refers to the remote function's execution, not to this
/// client's calling convention: in both modes the acceptance of the request
/// by the platform is awaited.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvocationMode {
    /// Wait for the function to complete and return its result payload.
    Sync,
    /// Fire-and-forget: the platform queues the event and returns
    /// immediately, without a result payload.
    Async,
}

impl InvocationMode {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationMode::Sync => "sync",
            InvocationMode::Async => "async",
        }
    }
}

impl From<InvocationMode> for InvocationType {
    fn from(mode: InvocationMode) -> InvocationType {
        match mode {
            InvocationMode::Sync => InvocationType::RequestResponse,
            InvocationMode::Async => InvocationType::Event,
        }
    }
}

/// A single remote invocation, immutable once constructed and owned by the
/// call that creates it.
///
/// `function_name` must be non-empty. `payload_json` is opaque to this
/// layer: whether it is valid JSON is the remote platform's concern.
#[derive(Clone, Debug)]
pub struct InvocationRequest {
    pub function_name: String,
    pub payload_json: String,
    pub mode: InvocationMode,
}

impl InvocationRequest {
    pub fn new(
        function_name: impl Into<String>,
        payload_json: impl Into<String>,
        mode: InvocationMode,
    ) -> InvocationRequest {
        InvocationRequest {
            function_name: function_name.into(),
            payload_json: payload_json.into(),
            mode,
        }
    }
}

/// The successful outcome of an invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvocationResponse {
    /// Canonicalized JSON result of a `Sync` invocation, or `None` for an
    /// accepted `Async` trigger. A `Sync` result is never empty: the
    /// canonical form of any JSON document is at least one byte.
    pub result_json: Option<String>,
}

impl InvocationResponse {
    /// Response carrying a synchronous result payload.
    pub fn with_result(result_json: impl Into<String>) -> InvocationResponse {
        InvocationResponse {
            result_json: Some(result_json.into()),
        }
    }

    /// Response for an accepted fire-and-forget trigger.
    pub fn triggered() -> InvocationResponse {
        InvocationResponse { result_json: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_maps_to_invocation_type() {
        assert_eq!(
            InvocationType::from(InvocationMode::Sync),
            InvocationType::RequestResponse
        );
        assert_eq!(
            InvocationType::from(InvocationMode::Async),
            InvocationType::Event
        );
    }

    #[test]
    fn test_triggered_response_carries_no_payload() {
        assert_eq!(InvocationResponse::triggered().result_json, None);
        assert_eq!(
            InvocationResponse::with_result("{}").result_json.as_deref(),
            Some("{}")
        );
    }
}
