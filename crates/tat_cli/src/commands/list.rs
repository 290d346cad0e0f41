//! Suite listing command.

use anyhow::Result;
use console::style;
use tat_core::{cac_tat_suite, SuiteOptions};

/// Print the scenarios the suite would run.
pub fn run(filter: Option<String>) -> Result<()> {
    let options = SuiteOptions {
        filter,
        offline: false,
    };

    let mut shown = 0;
    for scenario in cac_tat_suite().iter().filter(|s| options.selects(s)) {
        shown += 1;
        let network = if scenario.needs_network() {
            style(" [network]").yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {}{} {}",
            style("•").cyan(),
            scenario.name(),
            network,
            style(format!("({} steps)", scenario.steps().len())).dim()
        );
    }

    if shown == 0 {
        println!("{} No scenarios match the filter.", style("ℹ").blue());
    }
    Ok(())
}
