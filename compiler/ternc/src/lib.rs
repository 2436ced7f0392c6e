//! Tern compile driver.
//!
//! [`compile`] runs the whole front end over a [`SourceMap`]:
//!
//! 1. Every non-blank file is handed to the [`Parser`] collaborator. A file
//!    whose parse fails contributes its messages but no declarations.
//! 2. The parsed files are checked as one program by [`tern_check`].
//! 3. If nothing reported an error, the checked [`Program`] is handed to the
//!    [`Backend`] collaborator.
//!
//! The driver itself never reads the environment. [`init_tracing`] is an
//! opt-in helper for embedders that want checker traces on stderr.

mod collaborator;
mod driver;

use std::sync::Once;

pub use collaborator::{Backend, ParseOutput, Parser};
pub use driver::{compile, CompileOptions, CompileOutput};
pub use tern_check::{CheckConfig, MatchPolicy, Program};
pub use tern_diagnostic::{ColorMode, Message};
pub use tern_ir::{SourceError, SourceMap};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tern_check=debug` or `RUST_LOG=tern_check=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
