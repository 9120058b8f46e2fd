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

use std::str::FromStr;

use bytesize::ByteSize;
use tracing::{info, warn};

/// Environment variable overriding the output buffer capacity.
const MAX_RESULT_LEN_ENV_KEY: &str = "LAMBDA_UDF_MAX_RESULT_LEN";

/// Capacity of a call context's output buffer when not overridden.
const DEFAULT_MAX_RESULT_LEN: ByteSize = ByteSize::kib(8);

/// Extension-side settings, resolved once at context preparation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtensionConfig {
    /// Fixed capacity of the per-context output buffer. A successful result
    /// longer than this fails the call; the buffer is never resized.
    pub max_result_len: ByteSize,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            max_result_len: DEFAULT_MAX_RESULT_LEN,
        }
    }
}

impl ExtensionConfig {
    /// Resolve the configuration from the environment, falling back to the
    /// defaults for absent or unparseable values.
    pub fn from_env() -> ExtensionConfig {
        ExtensionConfig {
            max_result_len: max_result_len_from_env(),
        }
    }
}

fn max_result_len_from_env() -> ByteSize {
    let Ok(value_str) = std::env::var(MAX_RESULT_LEN_ENV_KEY) else {
        return DEFAULT_MAX_RESULT_LEN;
    };
    match ByteSize::from_str(&value_str) {
        Ok(max_result_len) => {
            info!(
                value = %max_result_len,
                "setting `{MAX_RESULT_LEN_ENV_KEY}` from environment"
            );
            max_result_len
        }
        Err(error) => {
            warn!(
                value_str = %value_str,
                error = %error,
                "failed to parse `{MAX_RESULT_LEN_ENV_KEY}` from environment, using default"
            );
            DEFAULT_MAX_RESULT_LEN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        std::env::remove_var(MAX_RESULT_LEN_ENV_KEY);
        assert_eq!(
            ExtensionConfig::from_env().max_result_len,
            ByteSize::kib(8)
        );

        std::env::set_var(MAX_RESULT_LEN_ENV_KEY, "64kb");
        assert_eq!(ExtensionConfig::from_env().max_result_len, ByteSize::kb(64));

        std::env::set_var(MAX_RESULT_LEN_ENV_KEY, "not-a-size");
        assert_eq!(
            ExtensionConfig::from_env().max_result_len,
            ByteSize::kib(8)
        );

        std::env::remove_var(MAX_RESULT_LEN_ENV_KEY);
    }
}
