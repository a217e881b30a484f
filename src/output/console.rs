//! Console output utilities.

use std::path::Path;

use console::style;

use crate::download::DownloadJob;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Remediation hint shown after a configuration error.
pub fn config_hint(config_path: &Path) -> String {
    format!(
        "Check {} or the matching command-line flag to fix this error (see --help)",
        config_path.display()
    )
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     SGX Historical Data Downloader                    ║
║     Derivatives tick and trade files                  ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print what a job is about to download.
pub fn print_job_overview(job: &DownloadJob) {
    println!();
    println!("{}", style("Download job:").bold());
    println!("  Data:      {}", job.kind);
    match job.range {
        Some(range) => {
            println!("  Dates:     {}", range.dates);
            println!("  Indices:   {}", range.indices);
        }
        None => println!("  Dates:     (structure files only)"),
    }
    println!("  Files:     {}", job.expected_file_count());
    println!("  Directory: {}", job.destination.display());
    println!();
}
