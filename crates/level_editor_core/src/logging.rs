// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tracing subscriber setup for hosts that embed the editor core.

use crate::config::EditorConfig;
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a global `fmt` subscriber filtered by `RUST_LOG` plus the
/// config's `log_filter` directives. Returns `false` if a global subscriber
/// was already set.
pub fn try_init(config: &EditorConfig) -> bool {
    let mut env_filter = EnvFilter::from_default_env();
    let mut invalid = Vec::new();
    for directive in config.log_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.parse::<Directive>() {
            Ok(parsed) => env_filter = env_filter.add_directive(parsed),
            Err(_) => invalid.push(directive),
        }
    }

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    for directive in invalid {
        tracing::warn!("Ignoring invalid log directive '{directive}'");
    }
    installed
}

/// Like [`try_init`], but an existing subscriber is left in place silently
pub fn init(config: &EditorConfig) {
    if !try_init(config) {
        tracing::debug!("Global subscriber already installed");
    }
}
