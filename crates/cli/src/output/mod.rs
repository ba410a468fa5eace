//! Output formatting

mod formatter;

pub use formatter::Formatter;

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Strict JSON output, no colors
    pub json: bool,
    pub no_color: bool,
    /// Only errors are printed
    pub quiet: bool,
}
