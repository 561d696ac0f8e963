//! `apply` command: rewrite inputs with one context of a configuration.
//!
//! Inputs come from the positional arguments or, when there are none, from
//! stdin one line at a time. Each result goes to stdout as a plain line or a
//! JSON object. The exit code reflects the first input that did not rewrite
//! cleanly.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::io::{self, BufRead, Write};

use rewrite_core::config::RewriteConfig;
use rewrite_core::{ChainOutcome, Rewriter, DEFAULT_CONTEXT};

use super::{EXIT_ERROR, EXIT_SUCCESS, EXIT_UNWILLING};
use crate::cli::ApplyCommand;
use crate::ui::output_format::{error_msg, info_msg, warn_msg};

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct ApplyRecord<'a> {
    context: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a ChainOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Maps a chain outcome to a process exit code.
///
/// User codes are truncated to a byte; one that truncates to zero is reported
/// as a plain error so it is never mistaken for success.
pub fn exit_code_for(outcome: &ChainOutcome) -> i32 {
    match outcome {
        ChainOutcome::Unchanged | ChainOutcome::Rewritten(_) => EXIT_SUCCESS,
        ChainOutcome::Unwilling => EXIT_UNWILLING,
        ChainOutcome::UserCode(code) => match *code as u8 {
            0 => EXIT_ERROR,
            c => i32::from(c),
        },
    }
}

pub fn run_apply(cmd: &ApplyCommand, quiet: bool) -> Result<i32> {
    info!("Starting rewrite apply operation.");

    let config = RewriteConfig::load_from_file(&cmd.config)
        .with_context(|| format!("Failed to load configuration {}", cmd.config.display()))?;
    let rewriter = Rewriter::from_config(&config)?;

    if rewriter.context(&cmd.context).is_none() && !quiet {
        if rewriter.context(DEFAULT_CONTEXT).is_some() {
            warn_msg(format!("Context '{}' not found, using '{}'.", cmd.context, DEFAULT_CONTEXT));
        } else {
            warn_msg(format!("Context '{}' not found; inputs are passed through unchanged.", cmd.context));
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut exit_code = EXIT_SUCCESS;
    let mut count = 0usize;

    if cmd.inputs.is_empty() {
        debug!("No positional inputs, reading stdin line by line.");
        for (n, chunk) in io::stdin().lock().split(b'\n').enumerate() {
            let mut bytes = chunk.context("Failed to read from stdin")?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let code = match String::from_utf8(bytes) {
                Ok(line) => apply_one(&rewriter, cmd, &line, quiet, &mut out)?,
                Err(e) => {
                    if !quiet {
                        error_msg(format!("Skipping stdin line {}: invalid UTF-8 ({})", n + 1, e));
                    }
                    EXIT_ERROR
                }
            };
            exit_code = merge_exit_code(exit_code, code);
            count += 1;
        }
    } else {
        for input in &cmd.inputs {
            let code = apply_one(&rewriter, cmd, input, quiet, &mut out)?;
            exit_code = merge_exit_code(exit_code, code);
            count += 1;
        }
    }
    out.flush().context("Failed to flush stdout")?;

    if !quiet {
        info_msg(format!("Processed {} input(s) with context '{}'.", count, cmd.context));
    }
    info!("Rewrite apply operation completed with exit code {}.", exit_code);
    Ok(exit_code)
}

fn merge_exit_code(current: i32, next: i32) -> i32 {
    if current == EXIT_SUCCESS { next } else { current }
}

/// Rewrites one input, writes its result and returns the exit code it implies.
fn apply_one<W: Write>(
    rewriter: &Rewriter,
    cmd: &ApplyCommand,
    input: &str,
    quiet: bool,
    out: &mut W,
) -> Result<i32> {
    let result = rewriter.rewrite(&cmd.context, input);

    let (outcome, error) = match &result {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let code = outcome.map(exit_code_for).unwrap_or(EXIT_ERROR);
    let output = outcome.and_then(|o| o.clone().into_string(input));

    if cmd.json {
        let record = ApplyRecord {
            context: &cmd.context,
            input,
            output: output.clone(),
            outcome,
            error: error.clone(),
        };
        let line = serde_json::to_string(&record).context("Failed to serialize result")?;
        writeln!(out, "{}", line).context("Failed to write to stdout")?;
    } else if let Some(output) = &output {
        writeln!(out, "{}", output).context("Failed to write to stdout")?;
    }

    if !quiet && !cmd.json {
        match (outcome, &error) {
            (Some(ChainOutcome::Unwilling), _) => warn_msg(format!("'{}' refused (unwilling to perform).", input)),
            (Some(ChainOutcome::UserCode(c)), _) => warn_msg(format!("'{}' aborted with code {}.", input, c)),
            (_, Some(e)) => error_msg(format!("Failed to rewrite '{}': {}", input, e)),
            _ => {}
        }
    }

    Ok(code)
}
