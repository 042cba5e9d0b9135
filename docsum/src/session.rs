//! Line-oriented interactive front end.
//!
//! Each input line is one named action on the [`WorkflowController`]; the
//! prompt shows the current phase. The loop runs until `quit` or end of input,
//! so Idle can be re-entered as often as the user likes.

use anyhow::{bail, Result};
use docsum_core::contract::{DownloadSink, Exporter, SummaryLength, Summarizer};
use docsum_core::present::{
    controls, present, DOWNLOAD_LABEL, RESET_LABEL, SUBMITTING_LABEL, SUBMIT_LABEL,
};
use docsum_core::selector::{Document, FileSource, ACCEPT_HINT};
use docsum_core::workflow::{ActionOutcome, WorkflowController};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Select(PathBuf),
    Remove,
    Length(SummaryLength),
    Submit,
    Export,
    Reset,
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        if verb.is_empty() {
            bail!("Empty command");
        }
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "select" | "open" => {
                let path = unquote(rest);
                if path.is_empty() {
                    bail!("Usage: select <file>");
                }
                SessionCommand::Select(PathBuf::from(path))
            }
            "remove" | "clear" => SessionCommand::Remove,
            "length" => match args.as_slice() {
                [name] => SessionCommand::Length(name.parse()?),
                _ => bail!("Usage: length <short|medium|detailed>"),
            },
            "submit" | "generate" => SessionCommand::Submit,
            "export" | "download" => SessionCommand::Export,
            "reset" | "new" => SessionCommand::Reset,
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => bail!("Unknown command `{other}`; type `help`"),
        };
        Ok(command)
    }
}

/// The rest of a `select` line is one path; surrounding quotes are optional.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|a| a.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

fn help_text() -> String {
    let lengths: Vec<String> = SummaryLength::ALL.iter().map(|l| l.label()).collect();
    format!(
        "Commands:\n\
         \x20 select <file>     choose a document ({ACCEPT_HINT}); the rest of the line is the path\n\
         \x20 remove            drop the selected document\n\
         \x20 length <name>     {}\n\
         \x20 submit            {SUBMIT_LABEL}\n\
         \x20 export            {DOWNLOAD_LABEL}\n\
         \x20 reset             {RESET_LABEL}\n\
         \x20 status            show the current state\n\
         \x20 quit",
        lengths.join(", ")
    )
}

/// Drive `controller` from `input` until `quit` or end of input.
pub async fn run_session<S, E, D, R, W>(
    controller: &mut WorkflowController<S, E, D>,
    input: R,
    mut out: W,
) -> Result<()>
where
    S: Summarizer + ?Sized,
    E: Exporter + ?Sized,
    D: DownloadSink + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", help_text())?;
    let mut lines = input.lines();

    loop {
        write!(out, "[{}] > ", controller.phase())?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        tracing::debug!(?command, "Session command");

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => writeln!(out, "{}", help_text())?,
            SessionCommand::Status => write_status(controller, &mut out)?,
            SessionCommand::Select(path) => {
                match Document::load(&path).await {
                    Ok(document) => {
                        let name = document.filename.clone();
                        let outcome = controller.select_file(FileSource::Picked(vec![document]));
                        if outcome.is_applied() {
                            writeln!(out, "Selected {name}")?;
                        }
                        write_outcome(&outcome, &mut out)?;
                    }
                    Err(e) => writeln!(out, "Could not read {}: {e}", path.display())?,
                }
            }
            SessionCommand::Remove => {
                let outcome = controller.clear_file();
                write_outcome(&outcome, &mut out)?;
            }
            SessionCommand::Length(length) => {
                let outcome = controller.set_length(length);
                if outcome.is_applied() {
                    writeln!(out, "Length: {}", length.label())?;
                }
                write_outcome(&outcome, &mut out)?;
            }
            SessionCommand::Submit => {
                if controls(controller.state()).submit_enabled {
                    writeln!(out, "{SUBMITTING_LABEL}")?;
                }
                let outcome = controller.submit().await;
                if outcome.is_applied() {
                    if let Some(result) = controller.state().result() {
                        writeln!(out, "{}", present(result))?;
                    }
                }
                write_outcome(&outcome, &mut out)?;
            }
            SessionCommand::Export => {
                let outcome = controller.export().await;
                if let ActionOutcome::Delivered(path) = &outcome {
                    writeln!(out, "Saved {}", path.display())?;
                }
                write_outcome(&outcome, &mut out)?;
            }
            SessionCommand::Reset => {
                controller.reset();
            }
        }
    }

    writeln!(out)?;
    Ok(())
}

fn write_status<S, E, D, W>(controller: &WorkflowController<S, E, D>, out: &mut W) -> Result<()>
where
    S: Summarizer + ?Sized,
    E: Exporter + ?Sized,
    D: DownloadSink + ?Sized,
    W: Write,
{
    let state = controller.state();
    let enabled = controls(state);
    writeln!(out, "State:  {}", controller.phase())?;
    writeln!(out, "Length: {}", controller.length().label())?;
    if let Some(document) = state.document() {
        writeln!(out, "File:   {} ({} bytes)", document.filename, document.size())?;
    }
    if let Some(notice) = controller.notice() {
        writeln!(out, "Notice: {notice}")?;
    }
    let mut available = Vec::new();
    if enabled.submit_enabled {
        available.push("submit");
    }
    if enabled.remove_enabled {
        available.push("remove");
    }
    if enabled.length_enabled {
        available.push("length");
    }
    if enabled.download_enabled {
        available.push("export");
    }
    if enabled.reset_enabled {
        available.push("reset");
    }
    writeln!(out, "Actions: {}", available.join(", "))?;
    Ok(())
}

fn write_outcome<W: Write>(outcome: &ActionOutcome, out: &mut W) -> Result<()> {
    match outcome {
        ActionOutcome::Applied | ActionOutcome::Delivered(_) => {}
        ActionOutcome::Ignored => writeln!(out, "Not available right now.")?,
        ActionOutcome::Discarded => writeln!(out, "A superseded response was dropped.")?,
        ActionOutcome::Failed(e) => writeln!(out, "! {e}")?,
    }
    Ok(())
}
