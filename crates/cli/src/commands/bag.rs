use caddie_core::{Bag, CheckoutSummary, GapReport, VariantId};
use serde::Serialize;
use tracing::debug;

use crate::commands::{load_config, load_snapshot, runtime, CommandResult};

#[derive(Debug, Serialize)]
struct RejectedClub {
    variant_id: i64,
    reason: String,
}

#[derive(Debug, Serialize)]
struct BagOutput {
    report: GapReport,
    rejected: Vec<RejectedClub>,
    checkout: CheckoutSummary,
}

pub fn run(variant_ids: &[i64]) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(failure) => return CommandResult::from_failure("bag", failure),
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return CommandResult::from_failure("bag", failure),
    };
    let snapshot = match runtime.block_on(load_snapshot(&config)) {
        Ok(snapshot) => snapshot,
        Err(failure) => return CommandResult::from_failure("bag", failure),
    };

    let mut bag = Bag::new();
    let mut rejected = Vec::new();
    for &id in variant_ids {
        match bag.add_from_catalog(&snapshot, VariantId(id)) {
            Ok(()) => {}
            Err(error) if error.is_silent() => {
                debug!(event_name = "cli.bag.duplicate_ignored", variant_id = id, "already in bag");
            }
            Err(error) => {
                rejected.push(RejectedClub { variant_id: id, reason: error.to_string() });
            }
        }
    }

    let report = bag.gap_report(&snapshot);
    let message = format!(
        "{} clubs in bag, {} loft gaps, {} rejected",
        bag.len(),
        report.gaps.len(),
        rejected.len()
    );
    let output = BagOutput { report, rejected, checkout: bag.checkout_summary() };
    CommandResult::success_with_data("bag", message, output)
}
