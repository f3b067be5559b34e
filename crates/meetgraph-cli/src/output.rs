//! Terminal output formatting.

use colored::Colorize;
use meetgraph_graph::{GraphCounts, SyncReport};

/// Print the summary of a finished import.
pub fn print_report(report: &SyncReport, counts: Option<&GraphCounts>) {
    println!("\n{}", "Import complete:".green().bold());

    let event = report.event_name.as_deref().unwrap_or("(unnamed)");
    println!("  {}: {} {}", "Event".bold(), event.cyan(), format!("({})", report.event_id).dimmed());
    if let Some(group_id) = report.group_id {
        println!("  {}: {}", "Group".bold(), group_id);
    }

    println!("  Members:      {}", report.members);
    println!("  Groups:       {}", report.groups);
    println!("  Memberships:  {}", report.memberships);
    println!(
        "  RSVPs:        {} accepted, {} declined",
        report.rsvps_accepted.to_string().green(),
        report.rsvps_declined.to_string().red()
    );
    if report.rsvps_skipped > 0 {
        println!(
            "  {}",
            format!("{} RSVP(s) from non-members skipped", report.rsvps_skipped).yellow()
        );
    }
    if report.rsvps_ignored > 0 {
        println!("  {}", format!("{} RSVP(s) with other answers ignored", report.rsvps_ignored).dimmed());
    }

    println!();
    println!(
        "  Merge operations: {} ({} nodes, {} relationships)",
        report.operations(),
        report.nodes_merged,
        report.relationships_merged
    );
    if let Some(counts) = counts {
        println!(
            "  Graph size:       {} nodes, {} relationships",
            counts.nodes, counts.relationships
        );
    }
    if let Some(finished) = report.finished_at {
        let elapsed = finished - report.started_at;
        println!("  {}", format!("Took {} ms (run {})", elapsed.num_milliseconds(), report.run_id).dimmed());
    }
}
