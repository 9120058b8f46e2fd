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

use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;

/// Worker threads of the bridge runtime. The bridge only ever awaits one
/// network round trip per host thread; a small pool is enough.
const NUM_WORKER_THREADS: usize = 2;

/// Returns the process-wide runtime the synchronous extension entry points
/// block on.
///
/// The host runtime drives the bridge from its own non-async threads; this
/// runtime exists solely to execute the client's network round trip, the
/// bridge's only suspension point.
pub fn bridge_runtime() -> &'static Runtime {
    static RUNTIME: OnceCell<Runtime> = OnceCell::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(NUM_WORKER_THREADS)
            .thread_name_fn(|| {
                static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
                let id = ATOMIC_ID.fetch_add(1, Ordering::AcqRel);
                format!("lambda-udf-{id}")
            })
            .enable_all()
            .build()
            .expect("failed to start the lambda-udf bridge runtime")
    })
}
