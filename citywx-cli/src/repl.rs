//! Interactive prompt.
//!
//! Each committed line starts a fetch on its own task; results come back over
//! a channel, so the prompt stays responsive and a newer search simply
//! supersedes an older one.

use citywx_core::{Applied, CompletedFetch, LastCityStore, PendingFetch, WeatherApp};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::render;

const HELP: &str = "Type a city and press Enter. :u toggles °C/°F, :r resets, :q quits.";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Search(String),
    ToggleUnit,
    Reset,
    Help,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            ":u" | ":unit" => Input::ToggleUnit,
            ":r" | ":reset" => Input::Reset,
            ":h" | ":help" => Input::Help,
            ":q" | ":quit" => Input::Quit,
            _ => Input::Search(line.to_string()),
        }
    }
}

fn spawn_fetch(pending: PendingFetch, tx: &mpsc::UnboundedSender<CompletedFetch>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let done = pending.run().await;
        // Receiver gone means the prompt exited.
        let _ = tx.send(done);
    });
}

fn draw<S: LastCityStore>(app: &WeatherApp<S>) {
    let view = app.view();
    print!("{}", render::render_screen(app.session(), view.as_ref()));
}

pub async fn run<S: LastCityStore>(mut app: WeatherApp<S>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<CompletedFetch>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");

    if let Some(pending) = app.startup() {
        spawn_fetch(pending, &tx);
    }
    draw(&app);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Input::ToggleUnit => {
                        app.toggle_unit();
                    }
                    Input::Reset => app.reset(),
                    Input::Search(text) => {
                        app.set_query(text);
                        match app.submit() {
                            Some(pending) => spawn_fetch(pending, &tx),
                            None => continue,
                        }
                    }
                }
                draw(&app);
            }
            Some(done) = rx.recv() => {
                let token = done.ticket.token();
                match app.complete(done) {
                    Applied::Stale => debug!(token, "ignored superseded result"),
                    _ => draw(&app),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recognised() {
        assert_eq!(Input::parse(":u"), Input::ToggleUnit);
        assert_eq!(Input::parse(" :unit "), Input::ToggleUnit);
        assert_eq!(Input::parse(":r"), Input::Reset);
        assert_eq!(Input::parse(":q"), Input::Quit);
        assert_eq!(Input::parse(":help"), Input::Help);
    }

    #[test]
    fn everything_else_is_a_search() {
        assert_eq!(Input::parse("Paris"), Input::Search("Paris".into()));
        assert_eq!(Input::parse("   "), Input::Search("   ".into()));
        assert_eq!(Input::parse(":x"), Input::Search(":x".into()));
    }
}
