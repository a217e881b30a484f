//! Job report.

use console::style;

use crate::download::{JobPhase, JobState};

/// Print the end-of-job summary.
pub fn print_job_report(state: &JobState) {
    if state.phase == JobPhase::Aborted {
        println!("{}", style("Download job not started.").dim());
        return;
    }

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Download Summary:").bold());
    println!("  Expected:   {}", state.total);
    println!("  Attempted:  {}", state.attempted());
    println!("  Downloaded: {}", state.downloaded);
    println!("  Skipped:    {} (already present)", state.already_present);
    if state.recovered > 0 {
        println!("  Recovered:  {} (on retry)", state.recovered);
    }
    println!(
        "  Succeeded:  {} ({:.1}%)",
        style(state.succeeded()).green(),
        state.completion()
    );

    if !state.ledger.is_empty() {
        println!("  Failed:     {}", style(state.still_failed()).red());
        for url in state.ledger.urls() {
            println!("    {}", style(url).red());
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}
