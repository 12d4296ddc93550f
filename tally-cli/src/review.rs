//! Interactive review of a loaded statement: show expenses, fix categories,
//! add categories, and watch the summary update.

use anyhow::Result;
use std::io::{BufRead, Write};
use tally_core::{CorrectionError, Direction, Recategorized};
use tally_finance::{Statement, Workbench};

use crate::render::{self, Style};

const HELP: &str = "\
Commands:
  table                         show expenses (debits)
  credits                       show payments (credits)
  set <row> <category>          change an expense row's category and learn its description
  add <name>                    create a category
  learn <category> = <keyword>  teach a category a description directly
  categories                    list categories and their keywords
  summary                       expense totals per category
  help                          this text
  quit                          leave review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    Table,
    Credits,
    Set { row: usize, category: String },
    Add(String),
    Learn { category: String, keyword: String },
    Categories,
    Summary,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ReviewCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb.to_lowercase().as_str() {
        "table" | "t" => Ok(ReviewCommand::Table),
        "credits" => Ok(ReviewCommand::Credits),
        "categories" | "cats" => Ok(ReviewCommand::Categories),
        "summary" | "s" => Ok(ReviewCommand::Summary),
        "help" | "?" => Ok(ReviewCommand::Help),
        "quit" | "q" | "exit" => Ok(ReviewCommand::Quit),
        "set" => {
            let (row, category) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: set <row> <category>")?;
            let row = row
                .parse()
                .map_err(|_| format!("not a row number: {row}"))?;
            Ok(ReviewCommand::Set {
                row,
                category: category.trim().to_string(),
            })
        }
        "add" if !rest.is_empty() => Ok(ReviewCommand::Add(rest.to_string())),
        "add" => Err("usage: add <name>".to_string()),
        "learn" => {
            let (category, keyword) = rest
                .split_once('=')
                .ok_or("usage: learn <category> = <keyword>")?;
            Ok(ReviewCommand::Learn {
                category: category.trim().to_string(),
                keyword: keyword.trim().to_string(),
            })
        }
        other => Err(format!("unknown command '{other}' (try help)")),
    }
}

/// Run the review loop until `quit` or end of input.
pub fn run_review<R: BufRead, W: Write>(
    wb: &mut Workbench,
    stmt: &mut Statement,
    style: &Style,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}", render::transactions(stmt.rows(Direction::Debit), style))?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };

        match cmd {
            ReviewCommand::Quit => break,
            ReviewCommand::Help => writeln!(out, "{HELP}")?,
            ReviewCommand::Table => {
                writeln!(out, "{}", render::transactions(stmt.rows(Direction::Debit), style))?
            }
            ReviewCommand::Credits => {
                writeln!(out, "{}", render::transactions(stmt.rows(Direction::Credit), style))?
            }
            ReviewCommand::Categories => {
                writeln!(out, "{}", render::categories(wb.store().categories()))?
            }
            ReviewCommand::Summary => {
                writeln!(out, "{}", render::summary(&stmt.summary(Direction::Debit), style))?
            }
            ReviewCommand::Add(name) => match wb.create_category(&name) {
                Ok(true) => writeln!(out, "added category '{}'", name.trim())?,
                Ok(false) => {}
                Err(e) => writeln!(out, "warning: category added for this session only: {e}")?,
            },
            ReviewCommand::Learn { category, keyword } => {
                match wb.apply_correction(&category, &keyword) {
                    Ok(true) => writeln!(out, "{category} now matches '{keyword}'")?,
                    Ok(false) => {}
                    Err(e) => writeln!(out, "warning: keyword kept for this session only: {e}")?,
                }
            }
            ReviewCommand::Set { row, category } => {
                // payments are listed for reference only
                if stmt.transactions.get(row).is_some_and(|t| !t.is_debit()) {
                    writeln!(out, "row {row} is a payment (read-only)")?;
                    continue;
                }
                match wb.recategorize(stmt, row, &category) {
                    Ok(Recategorized::Unchanged) => {
                        writeln!(out, "row {row} is already {category}")?
                    }
                    Ok(Recategorized::Changed { previous, learned }) => {
                        write!(out, "row {row}: {previous} -> {category}")?;
                        if learned {
                            write!(out, " (learned '{}')", stmt.transactions[row].details.trim())?;
                        }
                        writeln!(out)?;
                    }
                    Err(CorrectionError::Persistence(e)) => {
                        writeln!(out, "row {row} updated, but the keyword was not saved: {e}")?
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
        }
    }

    Ok(())
}
