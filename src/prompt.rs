// 💬 Interactive prompts
//
// Generic over reader/writer so the CLIs use stdin/stdout and tests use buffers.
// Invalid answers re-prompt; end of input is an error.

use crate::invoice::{parse_tags, TagSet};
use crate::stats::Percentile;
use anyhow::{bail, Result};
use std::io::{BufRead, Write};

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No input provided");
    }
    Ok(line.trim().to_string())
}

/// Ask for a positive number of invoices to generate
pub fn prompt_entries<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    loop {
        let answer = read_answer(input, output, "Enter the number of invoices to generate: ")?;
        match answer.parse::<i64>() {
            Ok(n) if n > 0 => return Ok(n as usize),
            Ok(_) => writeln!(output, "Please enter a positive number")?,
            Err(_) => writeln!(output, "Please enter a valid number")?,
        }
    }
}

/// Ask for a percentile until one in [0, 100] is given
pub fn prompt_percentile<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Percentile> {
    loop {
        let answer = read_answer(input, output, "\nEnter the percentile value (0-100): ")?;
        match answer.parse::<f64>() {
            Ok(value) => match Percentile::new(value) {
                Ok(percentile) => return Ok(percentile),
                Err(_) => writeln!(output, "Error: Percentile must be between 0 and 100")?,
            },
            Err(_) => writeln!(output, "Error: Please enter a valid number")?,
        }
    }
}

/// Show the available tags and ask for an optional comma-separated filter
pub fn prompt_tags<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    available: &[String],
) -> Result<Option<TagSet>> {
    writeln!(output, "\nAvailable tags: {}", available.join(", "))?;
    let answer = read_answer(
        input,
        output,
        "Enter tags to filter by (comma-separated), or press Enter to skip: ",
    )?;

    let tags = parse_tags(&answer);
    Ok(if tags.is_empty() { None } else { Some(tags) })
}
