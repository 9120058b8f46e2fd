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

use std::sync::Arc;

use lambda_udf_client::{AwsLambdaInvoker, FunctionInvoker, InvocationMode, InvocationRequest};
use tracing::debug;

use crate::config::ExtensionConfig;
use crate::error::{CallError, ValidationError};
use crate::runtime::bridge_runtime;

/// Host-side type tag of an argument, as presented at registration time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArgumentKind {
    String,
    Integer,
    Real,
    Decimal,
}

/// Per-registration state of the bridge, reused across many sequential
/// invocations between prepare and release.
///
/// A context owns its output buffer: the slice returned by
/// [`CallContext::invoke`] points into adapter-owned memory and stays valid
/// until the next invocation on the same context, which overwrites it. The
/// buffer capacity is fixed at prepare time and never resized.
///
/// Lifecycle: `prepare` -> (`invoke`)* -> `release`. The release transition
/// is terminal; `release` consumes the context, so invoking a released
/// context does not compile. Invocations on one context are serialized by
/// `&mut self`; distinct contexts share no mutable state.
pub struct CallContext {
    invoker: Arc<dyn FunctionInvoker>,
    mode: InvocationMode,
    output_buffer: String,
    max_result_len: usize,
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("mode", &self.mode)
            .field("output_buffer", &self.output_buffer)
            .field("max_result_len", &self.max_result_len)
            .finish_non_exhaustive()
    }
}

impl CallContext {
    /// Validate the registration and allocate the context.
    ///
    /// Exactly two string arguments are accepted: the function name and the
    /// JSON argument payload. Anything else is rejected here, before any
    /// remote call is ever attempted.
    pub fn prepare(
        invoker: Arc<dyn FunctionInvoker>,
        mode: InvocationMode,
        argument_kinds: &[ArgumentKind],
        config: &ExtensionConfig,
    ) -> Result<CallContext, ValidationError> {
        validate_arguments(argument_kinds)?;
        let max_result_len = config.max_result_len.as_u64() as usize;
        debug!(mode = mode.as_str(), max_result_len, "preparing call context");
        Ok(CallContext {
            invoker,
            mode,
            output_buffer: String::with_capacity(max_result_len),
            max_result_len,
        })
    }

    /// [`CallContext::prepare`] against the real platform: builds an AWS
    /// Lambda client from the ambient AWS configuration.
    pub fn prepare_default(
        mode: InvocationMode,
        argument_kinds: &[ArgumentKind],
        config: &ExtensionConfig,
    ) -> anyhow::Result<CallContext> {
        validate_arguments(argument_kinds)?;
        let invoker = Arc::new(bridge_runtime().block_on(AwsLambdaInvoker::new()));
        let ctx = CallContext::prepare(invoker, mode, argument_kinds, config)?;
        Ok(ctx)
    }

    /// Invoke the remote function, blocking until the platform reports the
    /// outcome.
    ///
    /// On a synchronous success the canonicalized JSON result is copied into
    /// the context's output buffer and returned as `Ok(Some(_))`. An accepted
    /// asynchronous trigger returns `Ok(None)`: triggered, no result payload,
    /// never ambiguous with a real JSON result. On any failure no usable
    /// result is returned and the buffer content from the previous call is
    /// left as is.
    pub fn invoke(
        &mut self,
        function_name: &str,
        payload_json: &str,
    ) -> Result<Option<&str>, CallError> {
        let request = InvocationRequest::new(function_name, payload_json, self.mode);
        let response = bridge_runtime().block_on(self.invoker.invoke(request))?;

        let Some(result_json) = response.result_json else {
            return Ok(None);
        };
        if result_json.len() > self.max_result_len {
            return Err(CallError::ResultTooLarge {
                function_name: function_name.to_string(),
                len: result_json.len(),
                max: self.max_result_len,
            });
        }
        self.output_buffer.clear();
        self.output_buffer.push_str(&result_json);
        Ok(Some(&self.output_buffer))
    }

    /// Consume the context and free its buffer.
    pub fn release(self) {}

    /// Mode this context was registered with.
    pub fn mode(&self) -> InvocationMode {
        self.mode
    }
}

fn validate_arguments(argument_kinds: &[ArgumentKind]) -> Result<(), ValidationError> {
    if argument_kinds.len() != 2 {
        return Err(ValidationError::WrongArity(argument_kinds.len()));
    }
    if let Some(position) = argument_kinds
        .iter()
        .position(|kind| *kind != ArgumentKind::String)
    {
        return Err(ValidationError::NotAString { position });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bytesize::ByteSize;
    use lambda_udf_client::{InvocationError, InvocationResponse, MockFunctionInvoker};

    use super::*;

    const STRING_ARGS: [ArgumentKind; 2] = [ArgumentKind::String, ArgumentKind::String];

    #[test]
    fn test_prepare_rejects_wrong_arity() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker.expect_invoke().never();

        let error = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &[ArgumentKind::String],
            &ExtensionConfig::default(),
        )
        .unwrap_err();
        assert_eq!(error, ValidationError::WrongArity(1));
    }

    #[test]
    fn test_prepare_rejects_non_string_argument() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker.expect_invoke().never();

        let error = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &[ArgumentKind::String, ArgumentKind::Integer],
            &ExtensionConfig::default(),
        )
        .unwrap_err();
        assert_eq!(error, ValidationError::NotAString { position: 1 });
    }

    #[test]
    fn test_invoke_sync_copies_result_into_buffer() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker
            .expect_invoke()
            .withf(|request| {
                request.function_name == "greet"
                    && request.payload_json == r#"{"name":"bob"}"#
                    && request.mode == InvocationMode::Sync
            })
            .returning(|_| {
                Ok(InvocationResponse::with_result(
                    r#"{"greeting":"hello bob"}"#,
                ))
            });

        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &ExtensionConfig::default(),
        )
        .unwrap();
        let result = ctx.invoke("greet", r#"{"name":"bob"}"#).unwrap();
        assert_eq!(result, Some(r#"{"greeting":"hello bob"}"#));
    }

    #[test]
    fn test_sequential_invocations_reuse_the_buffer() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker.expect_invoke().times(3).returning(|request| {
            Ok(InvocationResponse::with_result(format!(
                r#"{{"echo":{}}}"#,
                request.payload_json
            )))
        });

        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &ExtensionConfig::default(),
        )
        .unwrap();
        assert_eq!(ctx.invoke("echo", "1").unwrap(), Some(r#"{"echo":1}"#));
        assert_eq!(ctx.invoke("echo", "2").unwrap(), Some(r#"{"echo":2}"#));
        assert_eq!(ctx.invoke("echo", "3").unwrap(), Some(r#"{"echo":3}"#));
        ctx.release();
    }

    #[test]
    fn test_result_exactly_at_capacity_succeeds() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker
            .expect_invoke()
            // 10 bytes, as long as the buffer.
            .returning(|_| Ok(InvocationResponse::with_result(r#"{"k":1234}"#)));

        let config = ExtensionConfig {
            max_result_len: ByteSize::b(10),
        };
        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &config,
        )
        .unwrap();
        assert_eq!(ctx.invoke("greet", "{}").unwrap(), Some(r#"{"k":1234}"#));
    }

    #[test]
    fn test_result_over_capacity_fails_without_truncation() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker
            .expect_invoke()
            // 11 bytes, one over the buffer capacity.
            .returning(|_| Ok(InvocationResponse::with_result(r#"{"k":12345}"#)));

        let config = ExtensionConfig {
            max_result_len: ByteSize::b(10),
        };
        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &config,
        )
        .unwrap();
        let error = ctx.invoke("greet", "{}").unwrap_err();
        assert!(matches!(
            error,
            CallError::ResultTooLarge { len: 11, max: 10, .. }
        ));
    }

    #[test]
    fn test_invoke_async_returns_no_payload() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker
            .expect_invoke()
            .withf(|request| request.mode == InvocationMode::Async)
            .returning(|_| Ok(InvocationResponse::triggered()));

        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Async,
            &STRING_ARGS,
            &ExtensionConfig::default(),
        )
        .unwrap();
        assert_eq!(ctx.invoke("greet", r#"{"name":"bob"}"#).unwrap(), None);
    }

    #[test]
    fn test_remote_execution_failure_is_preserved() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker.expect_invoke().returning(|request| {
            Err(InvocationError::Function {
                function_name: request.function_name,
                error_type: "Unhandled".to_string(),
                payload: r#"{"msg":"boom"}"#.to_string(),
            })
        });

        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &ExtensionConfig::default(),
        )
        .unwrap();
        let error = ctx.invoke("greet", "{}").unwrap_err();
        match error {
            CallError::Invocation(InvocationError::Function { error_type, .. }) => {
                assert_eq!(error_type, "Unhandled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transport_failure_is_preserved() {
        let mut mock_invoker = MockFunctionInvoker::new();
        mock_invoker.expect_invoke().returning(|request| {
            Err(InvocationError::Transport {
                function_name: request.function_name,
                message: "connection refused".to_string(),
            })
        });

        let mut ctx = CallContext::prepare(
            Arc::new(mock_invoker),
            InvocationMode::Sync,
            &STRING_ARGS,
            &ExtensionConfig::default(),
        )
        .unwrap();
        let error = ctx.invoke("greet", "{}").unwrap_err();
        assert!(matches!(
            error,
            CallError::Invocation(InvocationError::Transport { .. })
        ));
    }
}
