//! Line-oriented terminal front-end over a [`Session`].
//!
//! Thin presentation layer: parse a line into a command, dispatch it, print
//! the resulting screen. Exports are the only IO besides the terminal.

use std::io::{BufRead, Write};
use std::path::Path;

use chrono::Local;
use thiserror::Error;

use stocktake_core::{ItemId, StateMachine};

use crate::session::{Session, SessionCommand, Tab};

const HELP: &str = "\
commands:
  tab <n>|overview     switch to location tab n (1-based) or the overview
  set <item-id> <qty>  enter a counted quantity
  focus <item-id>      select an item field
  count <qty>          enter a quantity for the selected item and move to the next
  next                 move to the next item
  filter               toggle 'only items to reorder' on the overview
  detail <name>        show per-location counts of a product
  close                close the detail view
  rounds               show counts per round
  export               write the overview as CSV
  reset                clear all counts (asks for confirmation)
  show | help | quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid tab: {0}")]
    InvalidTab(String),

    #[error("no item selected; use `focus <item-id>` or `next` first")]
    NoFocus,
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(SessionCommand),
    /// Enter a quantity for the focused item, then advance focus.
    CountFocused(String),
    Show,
    Rounds,
    Export,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str, session: &Session) -> Result<Input, ShellError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let arg = |name: &'static str| {
        if rest.is_empty() {
            Err(ShellError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Input::Empty),
        "show" => return Ok(Input::Show),
        "rounds" => return Ok(Input::Rounds),
        "export" => return Ok(Input::Export),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        "count" => return Ok(Input::CountFocused(rest.to_string())),
        "tab" => SessionCommand::SelectTab(parse_tab(&arg("tab")?, session)?),
        "set" => {
            let (item, qty) = match rest.split_once(char::is_whitespace) {
                Some((item, qty)) => (item, qty.trim()),
                None => (rest, ""),
            };
            if item.is_empty() {
                return Err(ShellError::MissingArgument("item-id"));
            }
            SessionCommand::EnterQuantity {
                item_id: ItemId::new(item),
                input: qty.to_string(),
            }
        }
        "focus" => SessionCommand::Focus {
            item_id: ItemId::new(arg("item-id")?),
        },
        "next" => SessionCommand::AdvanceFocus,
        "filter" => SessionCommand::ToggleReorderFilter,
        "detail" => SessionCommand::OpenDetail { name: arg("name")? },
        "close" => SessionCommand::CloseDetail,
        "reset" => SessionCommand::RequestReset,
        "yes" | "y" if session.reset_pending() => SessionCommand::ConfirmReset,
        "no" | "n" if session.reset_pending() => SessionCommand::CancelReset,
        _ => return Err(ShellError::UnknownCommand(word.to_string())),
    };

    Ok(Input::Command(command))
}

fn parse_tab(raw: &str, session: &Session) -> Result<Tab, ShellError> {
    if raw.eq_ignore_ascii_case("overview") || raw.eq_ignore_ascii_case("o") {
        return Ok(Tab::Overview);
    }
    if let Ok(n) = raw.parse::<usize>() {
        if n >= 1 {
            return Ok(Tab::Location(n - 1));
        }
    }
    session
        .locations()
        .iter()
        .position(|l| l.id.as_str().eq_ignore_ascii_case(raw) || l.name.eq_ignore_ascii_case(raw))
        .map(Tab::Location)
        .ok_or_else(|| ShellError::InvalidTab(raw.to_string()))
}

/// Render the current screen (entry list or overview, plus any modal).
pub fn render(session: &Session, out: &mut impl Write) -> std::io::Result<()> {
    let tabs: Vec<String> = session
        .locations()
        .iter()
        .enumerate()
        .map(|(idx, l)| {
            if session.tab() == Tab::Location(idx) {
                format!("[{}]", l.name)
            } else {
                l.name.clone()
            }
        })
        .chain(std::iter::once(if session.tab() == Tab::Overview {
            "[Overview]".to_string()
        } else {
            "Overview".to_string()
        }))
        .collect();
    writeln!(out, "{}", tabs.join(" | "))?;

    match session.active_location() {
        Some((location, round)) => {
            writeln!(out, "{} (round {round})", location.name)?;
            let sections = session.entry_sections();
            if sections.is_empty() {
                writeln!(out, "  no items")?;
            }
            for (category, items) in sections {
                writeln!(out, "-- {category}")?;
                for item in items {
                    let marker = if session.focus() == Some(&item.id) { '>' } else { ' ' };
                    let value = session
                        .displayed_quantity(&item.id)
                        .map(|q| q.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    writeln!(out, "{marker} {:<28} {:>6} {}  ({})", item.name, value, item.unit, item.id)?;
                }
            }
        }
        None => {
            let filter = if session.only_reorder() { " (only to reorder)" } else { "" };
            writeln!(out, "Overview{filter}")?;
            writeln!(out, "  {:<28} {:>6} {:>6} {:>6}", "Item", "#", "Min", "Order")?;
            for (category, rows) in session.overview() {
                writeln!(out, "-- {category}")?;
                for row in rows {
                    let flag = if row.needs_reorder() { '!' } else { ' ' };
                    writeln!(
                        out,
                        "{flag} {:<28} {:>6} {:>6} {:>6}",
                        row.name, row.total_counted, row.minimum_stock, row.reorder_quantity
                    )?;
                }
            }
        }
    }

    if let Some((name, rows)) = session.detail_breakdown() {
        writeln!(out, "== {name}: counts per location")?;
        for row in rows {
            writeln!(out, "   {:<16} {:>6}", row.location_name, row.quantity)?;
        }
    }

    if session.reset_pending() {
        writeln!(out, "Reset all counts? This cannot be undone. [yes/no]")?;
    }

    Ok(())
}

fn render_rounds(session: &Session, out: &mut impl Write) -> std::io::Result<()> {
    for view in session.round_views() {
        writeln!(out, "round {} ({}): {} counted", view.round, view.location_id, view.counted.len())?;
        for count in &view.counted {
            writeln!(out, "   {:<28} {:>6}  (round {})", count.item_id, count.quantity, count.round)?;
        }
    }
    Ok(())
}

/// Run the read-dispatch-render loop until `quit` or end of input.
pub fn run(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    export_dir: &Path,
) -> anyhow::Result<()> {
    render(session, out)?;

    for line in input.lines() {
        let line = line?;

        let parsed = match parse_line(&line, session) {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        match parsed {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Show => render(session, out)?,
            Input::Rounds => render_rounds(session, out)?,
            Input::Export => {
                let today = Local::now().date_naive();
                let written = session
                    .export(today)
                    .map_err(anyhow::Error::from)
                    .and_then(|file| Ok(file.write_to(export_dir)?));
                match written {
                    Ok(path) => writeln!(out, "exported to {}", path.display())?,
                    Err(err) => {
                        tracing::error!("export failed: {err:#}");
                        writeln!(out, "error: export failed: {err:#}")?;
                    }
                }
            }
            Input::CountFocused(qty) => {
                let Some(item_id) = session.focus().cloned() else {
                    writeln!(out, "error: {}", ShellError::NoFocus)?;
                    continue;
                };
                let entered = session
                    .dispatch(&SessionCommand::EnterQuantity { item_id, input: qty })
                    .and_then(|_| session.dispatch(&SessionCommand::AdvanceFocus));
                match entered {
                    Ok(_) => render(session, out)?,
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
            Input::Command(command) => match session.dispatch(&command) {
                Ok(events) => {
                    tracing::debug!(?command, ?events, "command handled");
                    render(session, out)?;
                }
                Err(err) => {
                    tracing::debug!(?command, %err, "command rejected");
                    writeln!(out, "error: {err}")?;
                }
            },
        }
    }

    out.flush()?;
    Ok(())
}
