pub mod compose;
pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use log::info;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;

use crate::api::MailApi;
use crate::domain::email::Mailbox;
use crate::terminal::events::handle_key;
use crate::terminal::state::AppState;
use crate::worker::Worker;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the interactive client until the user quits.
pub fn run_tui(api: Box<dyn MailApi>, initial: Mailbox) -> Result<()> {
    let worker = Worker::spawn(api)?;
    let mut state = AppState::new();
    state.load_mailbox(initial);

    let terminal = ratatui::init();
    let result = run(terminal, &mut state, &worker);
    ratatui::restore();

    info!("client closed");
    result
}

fn run(mut terminal: DefaultTerminal, state: &mut AppState, worker: &Worker) -> Result<()> {
    loop {
        for ticket in state.take_outbox() {
            worker.submit(ticket)?;
        }
        // applying a reply may queue more work; it goes out next turn
        while let Some(reply) = worker.try_recv()? {
            state.apply(reply);
        }

        terminal.draw(|f| ui::render(f, state))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && handle_key(key, state) {
                break;
            }
        }
    }
    Ok(())
}
