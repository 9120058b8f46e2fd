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

use std::time::Instant;

use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use tracing::{debug, instrument};

use crate::error::{InvocationError, InvocationResult};
use crate::invocation::{InvocationMode, InvocationRequest, InvocationResponse};
use crate::metrics::INVOCATION_METRICS;

/// Trait for invoking remote serverless functions by name.
///
/// The AWS implementation is [`AwsLambdaInvoker`]; the seam exists so the
/// extension adapter can be exercised against a mock platform.
#[cfg_attr(any(test, feature = "testsuite"), mockall::automock)]
#[async_trait]
pub trait FunctionInvoker: Send + Sync + 'static {
    /// Invoke `request.function_name` with `request.payload_json` as the
    /// request body.
    ///
    /// Completes once the platform reports the outcome: completion of the
    /// function in `Sync` mode, acceptance of the trigger in `Async` mode.
    /// No state is retained between invocations.
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult<InvocationResponse>;
}

/// AWS Lambda implementation of [`FunctionInvoker`].
pub struct AwsLambdaInvoker {
    client: LambdaClient,
    /// Version or alias appended to every invocation when set.
    qualifier: Option<String>,
}

impl AwsLambdaInvoker {
    /// Create an invoker resolving credentials, region and endpoint through
    /// the ambient AWS configuration.
    pub async fn new() -> AwsLambdaInvoker {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        AwsLambdaInvoker::with_client(LambdaClient::new(&aws_config))
    }

    /// Create an invoker from a custom SDK client.
    pub fn with_client(client: LambdaClient) -> AwsLambdaInvoker {
        AwsLambdaInvoker {
            client,
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> AwsLambdaInvoker {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Validate that `function_name` exists and is invocable.
    /// Uses the DryRun invocation type - validates without executing.
    pub async fn validate(&self, function_name: &str) -> InvocationResult<()> {
        let mut request = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::DryRun);

        if let Some(qualifier) = &self.qualifier {
            request = request.qualifier(qualifier);
        }

        request.send().await.map_err(|error| {
            InvocationError::Configuration(format!(
                "failed to validate function `{function_name}`: {error}"
            ))
        })?;

        Ok(())
    }

    async fn invoke_inner(
        &self,
        request: InvocationRequest,
    ) -> InvocationResult<InvocationResponse> {
        let InvocationRequest {
            function_name,
            payload_json,
            mode,
        } = request;

        INVOCATION_METRICS
            .request_payload_size_bytes
            .observe(payload_json.len() as f64);

        debug!(
            function_name = %function_name,
            payload_size = payload_json.len(),
            mode = mode.as_str(),
            "invoking remote function"
        );

        let mut invoke_builder = self
            .client
            .invoke()
            .function_name(&function_name)
            .invocation_type(InvocationType::from(mode))
            .payload(Blob::new(payload_json.into_bytes()));

        if let Some(qualifier) = &self.qualifier {
            invoke_builder = invoke_builder.qualifier(qualifier);
        }

        let response = invoke_builder
            .send()
            .await
            .map_err(|error| InvocationError::Transport {
                function_name: function_name.clone(),
                message: error.to_string(),
            })?;

        if mode == InvocationMode::Async {
            debug!(function_name = %function_name, "invocation accepted");
            return Ok(InvocationResponse::triggered());
        }

        // A faulted function still yields a transport-successful response;
        // the function-error indicator is authoritative, not the payload.
        if let Some(error_type) = response.function_error() {
            let payload = response
                .payload()
                .map(|blob| String::from_utf8_lossy(blob.as_ref()).to_string())
                .unwrap_or_default();
            return Err(InvocationError::Function {
                function_name,
                error_type: error_type.to_string(),
                payload,
            });
        }

        let payload = response
            .payload()
            .ok_or_else(|| InvocationError::MalformedResponse {
                function_name: function_name.clone(),
                message: "no response payload".to_string(),
            })?;

        INVOCATION_METRICS
            .response_payload_size_bytes
            .observe(payload.as_ref().len() as f64);

        let json_value: serde_json::Value = serde_json::from_slice(payload.as_ref()).map_err(
            |error| InvocationError::MalformedResponse {
                function_name: function_name.clone(),
                message: error.to_string(),
            },
        )?;
        let result_json =
            serde_json::to_string(&json_value).map_err(|error| {
                InvocationError::MalformedResponse {
                    function_name: function_name.clone(),
                    message: error.to_string(),
                }
            })?;

        debug!(
            function_name = %function_name,
            result_size = result_json.len(),
            "invocation completed"
        );

        Ok(InvocationResponse::with_result(result_json))
    }
}

#[async_trait]
impl FunctionInvoker for AwsLambdaInvoker {
    #[instrument(skip(self, request), fields(function_name = %request.function_name))]
    async fn invoke(&self, request: InvocationRequest) -> InvocationResult<InvocationResponse> {
        let mode = request.mode;
        let start = Instant::now();

        let result = self.invoke_inner(request).await;

        let elapsed = start.elapsed().as_secs_f64();
        let status = if result.is_ok() { "success" } else { "error" };
        INVOCATION_METRICS
            .invocations_total
            .with_label_values(&[mode.as_str(), status])
            .inc();
        INVOCATION_METRICS
            .invocation_duration_seconds
            .with_label_values(&[mode.as_str(), status])
            .observe(elapsed);

        result
    }
}
