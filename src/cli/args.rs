//! Positional and `--flag` argument helpers shared by the command handlers.

use chrono::NaiveDate;

use feebook_domain::EntityId;

use crate::cli::context::CommandError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Command arguments split into positionals and `--name [value]` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positionals: Vec<&'a str>,
    options: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> ParsedArgs<'a> {
    /// `value_flags` consume the following token; `switches` stand alone.
    pub fn parse(
        args: &[&'a str],
        value_flags: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg);
                continue;
            };
            if value_flags.contains(&name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{name}` expects a value"))
                })?;
                parsed.options.push((name, Some(value)));
            } else if switches.contains(&name) {
                parsed.options.push((name, None));
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{name}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| *value)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.options.iter().any(|(key, _)| *key == name)
    }

    pub fn positional(&self, index: usize, what: &str) -> Result<&'a str, CommandError> {
        self.positionals
            .get(index)
            .copied()
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing {what}")))
    }
}

pub(crate) fn require<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("missing {what}")))
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<EntityId, CommandError> {
    raw.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("{what} must be a positive whole number, got `{raw}`"))
    })
}

pub(crate) fn parse_amount(raw: &str, what: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("{what} must be a number, got `{raw}`")))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("dates use YYYY-MM-DD, got `{raw}`"))
    })
}

/// Parses a calendar month `1..=12` into the stored zero-based month.
pub(crate) fn parse_month(raw: &str) -> Result<u32, CommandError> {
    match raw.trim().parse::<u32>() {
        Ok(month @ 1..=12) => Ok(month - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "month must be between 1 and 12, got `{raw}`"
        ))),
    }
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("year must be a number, got `{raw}`")))
}

/// Joins trailing positionals into one free-text field.
pub(crate) fn rest(args: &[&str], from: usize) -> String {
    args.iter().skip(from).copied().collect::<Vec<_>>().join(" ")
}
