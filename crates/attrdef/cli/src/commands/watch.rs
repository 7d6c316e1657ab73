//! Following a definitions file as it changes

use super::definitions::rows_of;
use super::Session;
use crate::error::CliResult;
use crate::output::{self, print_info};
use colored::*;
use std::time::Duration;

/// Shortest accepted polling interval
const MIN_POLL: Duration = Duration::from_millis(1);

/// Keep a watching store open, printing the definitions whenever keys change.
///
/// Runs until Ctrl-C is received.
pub async fn execute(session: &Session, poll: Duration) -> CliResult<()> {
    let store = session.open_store(true)?;
    if !store.is_watching() {
        tracing::warn!("Definitions file is not being watched; changes will not be picked up");
    }

    let mut known = store.keys();
    output::print_output(rows_of(&store), session.output)?;
    print_info("Watching for new attribute definitions (Ctrl-C to stop)");

    let mut ticker = tokio::time::interval(poll.max(MIN_POLL));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down definitions watch");
                break;
            }
            _ = ticker.tick() => {
                let keys = store.keys();
                if keys != known {
                    println!(
                        "{}",
                        format!("{} attribute definition(s) registered", keys.len()).bold()
                    );
                    output::print_output(rows_of(&store), session.output)?;
                    known = keys;
                }
            }
        }
    }

    store.close();
    Ok(())
}
