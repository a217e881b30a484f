//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - The end-of-job report
//! - The interactive operator prompt

pub mod console;
pub mod progress;
pub mod prompt;
pub mod stats;

pub use console::{
    config_hint, print_banner, print_error, print_info, print_job_overview, print_success,
    print_warning,
};
pub use progress::create_download_bar;
pub use prompt::{is_affirmative, ConsolePrompt};
pub use stats::print_job_report;
