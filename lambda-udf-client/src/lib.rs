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

//! AWS Lambda invocation client for the lambda-udf bridge.
//!
//! This crate owns the outbound half of the bridge: building an invocation
//! request from a function name and an opaque JSON argument payload,
//! dispatching it through the AWS SDK, and classifying the outcome as a
//! normalized JSON result, a transport failure, or a remote-side execution
//! failure.
//!
//! Credential, region and endpoint resolution is entirely delegated to
//! `aws-config`; retry and timeout policy, when desired, belongs to the SDK
//! configuration, never to this layer.

mod error;
mod invocation;
mod invoker;
mod metrics;

pub use error::{InvocationError, InvocationResult};
pub use invocation::{InvocationMode, InvocationRequest, InvocationResponse};
#[cfg(any(test, feature = "testsuite"))]
pub use invoker::MockFunctionInvoker;
pub use invoker::{AwsLambdaInvoker, FunctionInvoker};
pub use metrics::INVOCATION_METRICS;
