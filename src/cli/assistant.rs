//! Assistant CLI command
//!
//! Accepts an intent in its JSON form, e.g.
//! `walletbook ask '{"action":"add","amount":12000,"category":"groc","wallet":"cash"}'`.

use tracing::info;

use crate::display::transaction::{format_register, format_transaction_details};
use crate::error::LedgerResult;
use crate::reports::RegisterReport;
use crate::services::AssistantIntent;
use crate::tracker::{AssistantOutcome, Tracker};

use super::today;

/// Handle the `ask` command
pub fn handle_ask_command(tracker: &mut Tracker, json: &str) -> LedgerResult<()> {
    let intent = AssistantIntent::from_json(json)?;
    info!(?intent, "Executing assistant intent");

    match tracker.execute_intent(&intent, today())? {
        AssistantOutcome::Added(txn) => {
            println!("Added:");
            print!("{}", format_transaction_details(&txn, tracker.data()));
        }
        AssistantOutcome::Found(found) => {
            let report = RegisterReport::from_transactions(tracker.data(), &found);
            print!("{}", format_register(&report));
        }
    }

    Ok(())
}
