//! Interactive course planner menu
//!
//! Reads whitespace-separated tokens from `input` and writes plain text to
//! `output`, so the loop can be driven from tests.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::infrastructure::{InfraError, InfraResult};

const MENU: &str = "Select an option:\n\
1. Load Courses\n\
2. Print Course List\n\
3. Search Course Number\n\
9. Exit\n";

/// Whitespace tokenizer over line-based input.
struct Tokens<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    /// Next token, `None` at end of input.
    fn next_token(&mut self) -> InfraResult<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| InfraError::io("read menu input", e))?;
            if read == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

/// Run the menu loop until option 9 or end of input.
///
/// Load failures are reported and the loop continues with the index as it was.
#[instrument(level = "debug", skip_all)]
pub fn run_menu<R: BufRead, W: Write>(
    service: &mut CatalogService,
    input: R,
    mut output: W,
) -> InfraResult<()> {
    let mut tokens = Tokens::new(input);
    let out = &mut output;

    say(out, "Reminder: input is case sensitive.\n")?;

    loop {
        say(out, MENU)?;

        let Some(selection) = tokens.next_token()? else {
            break;
        };
        debug!("menu: selection {:?}", selection);

        match selection.parse::<u32>() {
            Ok(1) => {
                say(out, "Enter file name:")?;
                let Some(name) = tokens.next_token()? else {
                    break;
                };
                load_catalog(service, Path::new(&name), out)?;
            }
            Ok(2) => {
                say(out, "")?;
                for line in service.list() {
                    say(out, &line)?;
                }
            }
            Ok(3) => {
                say(out, "Enter course number:")?;
                let Some(number) = tokens.next_token()? else {
                    break;
                };
                say(out, "")?;
                for line in service.search_lines(&number) {
                    say(out, &line)?;
                }
                say(out, "")?;
            }
            Ok(9) => break,
            _ => say(out, &format!("{} is not a valid option.\n", selection))?,
        }
    }

    say(out, "\nThank you for using the course planner!")?;
    output.flush().map_err(|e| InfraError::io("flush menu output", e))
}

/// Load `path` into the service before the menu starts.
///
/// Reports exactly like menu option 1: malformed rows become warnings and an
/// unreadable source becomes an error line, leaving the index as it was.
pub fn preload_catalog<W: Write>(
    service: &mut CatalogService,
    path: &Path,
    mut output: W,
) -> InfraResult<()> {
    load_catalog(service, path, &mut output)?;
    output.flush().map_err(|e| InfraError::io("flush menu output", e))
}

fn load_catalog<W: Write>(
    service: &mut CatalogService,
    path: &Path,
    out: &mut W,
) -> InfraResult<()> {
    say(out, &format!("Loading CSV file {}\n", path.display()))?;
    match service.load_path(path) {
        Ok(report) => {
            for err in &report.errors {
                say(out, &format!("Warning: {}", err))?;
            }
            say(out, &format!("Loaded {} courses.\n", report.inserted))
        }
        Err(e) => say(out, &format!("Error: {}\n", e)),
    }
}

fn say<W: Write>(out: &mut W, text: &str) -> InfraResult<()> {
    writeln!(out, "{}", text).map_err(|e| InfraError::io("write menu output", e))
}
