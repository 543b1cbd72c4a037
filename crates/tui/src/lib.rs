//! # Triptest terminal dashboard
//!
//! Interactive wizard that walks through configuring and executing a
//! travel-booking UI test, then displays step-by-step results. The wizard has
//! four stages: select a booking mode, fill the mode's test-data form, fire
//! one execution attempt against the automation service, and browse the
//! resulting report.
//!
//! ## Architecture
//!
//! State management is pure: [`app::App::update`] consumes `Msg`s and returns
//! `Effect`s, and the runtime turns effects into spawned tasks. Only one
//! execution attempt can be in flight at a time; its classified outcome comes
//! back as a single `Msg::ExecCompleted`.

pub mod app;
mod runtime;
mod theme;
mod ui;

use anyhow::Result;
use triptest_api::AutomationClient;

/// Run the dashboard until the user quits.
///
/// Owns the terminal lifecycle (raw mode, alternate screen) and the event
/// loop. The client is constructed once and shared by every attempt.
pub async fn run(client: AutomationClient) -> Result<()> {
    runtime::run_app(client).await
}
