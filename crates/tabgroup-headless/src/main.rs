//! Tabgroup demo
//!
//! Drives a tab group through a full open/select/close cycle against the
//! headless host and prints every command the host received.

use std::sync::Arc;

use anyhow::Result;
use tabgroup_core::{
    OpenOptions, TabEntry, TabGroup, TabGroupEvent, TabGroupOptions, LAUNCH_RETRY_DELAY,
};
use tabgroup_headless::{init_logging, HeadlessHost, TokioScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    tracing::info!("Starting Tabgroup demo v{}", env!("CARGO_PKG_VERSION"));

    let host = HeadlessHost::new();
    let context = host.context(Arc::new(TokioScheduler::current()));

    let tabs: Vec<_> = ["Inbox", "Drafts", "Sent"]
        .into_iter()
        .map(TabEntry::new)
        .collect();

    let mut options = TabGroupOptions::with_tabs(tabs.clone());
    options.config.title = Some("Mail".to_string());
    options.active_tab = Some(1usize.into());
    let group = TabGroup::with_options(context, options);

    group.events().on_any(|event: &TabGroupEvent| {
        tracing::info!(event = %serde_json::to_string(event).unwrap_or_default(), "Tab group event");
    });

    // The first launch fails so the retry path runs
    if let Some(top) = host.top() {
        top.fail_next_launches(1);
    }

    group.open(OpenOptions::default())?;
    tokio::time::sleep(LAUNCH_RETRY_DELAY * 2).await;

    let created = host.complete_launches();
    tracing::info!(created, state = %group.state(), "Launches completed");

    group.set_active_tab(&tabs[2]);
    if let Some(window) = host.window_for(&group) {
        window.pause();
        window.resume();
    }

    group.close();
    host.confirm_finished();

    println!("{}", serde_json::to_string_pretty(&host.log().snapshot())?);

    Ok(())
}
