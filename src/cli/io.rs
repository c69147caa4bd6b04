//! Line I/O loop for the interactive menu
//!
//! - Input: one command per line, UTF-8
//! - Output: line-oriented text
//! - End of input ends the session like the exit choice

use std::io::{BufRead, Write};

use super::errors::CliResult;
use super::menu::{Flow, MenuSession};
use crate::storage::RecordStore;

/// Drives `session` until exit, end of input, or a fatal error.
pub fn run_session<S, R, W>(session: &mut MenuSession<S>, input: R, out: &mut W) -> CliResult<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        session.prompt(out)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        if session.handle_line(&line?, out)? == Flow::Exit {
            break;
        }
    }

    out.flush()?;
    Ok(())
}
