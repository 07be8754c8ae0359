/*
 *   Copyright (c) 2024-2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::try_create_layers;

/// - `Display`: write formatted events to stdout or stderr.
/// - `File`: write to a rolling file at `tracing_log_file_path_and_prefix`, e.g.
///   `/tmp/condrv_core` or `condrv_core`.
/// - `DisplayAndFile`: both at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

/// Configure tracing logging: where to write (stdout/stderr/file/both) and at
/// what level.
///
/// # Methods
/// - [`Self::install_global()`]: installs the global tracing subscriber. There
///   can only be one, and it can't be unset once installed.
/// - [`Self::install_thread_local()`]: installs the subscriber for the current
///   thread only (useful for tests, where each test wants its own log target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

impl TracingConfig {
    /// Thread-local installation, typically used by tests. Returns a guard that
    /// resets the thread's subscriber when dropped.
    ///
    /// # Errors
    /// Returns an error if the file writer cannot be created or the layer chain
    /// cannot be built.
    pub fn install_thread_local(self) -> miette::Result<dispatcher::DefaultGuard> {
        try_create_layers(&self).map(|layers| tracing_subscriber::registry().with(layers).set_default())
    }

    /// Global installation, used in production. Can't be unset or changed once set.
    ///
    /// # Errors
    /// Returns an error if the file writer cannot be created, the layer chain
    /// cannot be built, or a global subscriber has already been installed.
    pub fn install_global(self) -> miette::Result<()> {
        try_create_layers(&self).map(|layers| tracing_subscriber::registry().with(layers).init())
    }
}

impl TracingConfig {
    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}
