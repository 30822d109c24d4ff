use feebook_core::CoreError;
use feebook_domain::MonthKey;

use crate::cli::args::{parse_id, parse_month, parse_year, require, rest};
use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "skips",
            "List a student's skipped months, most recent first",
            "skips <student-id>",
            cmd_skips,
        ),
        CommandDefinition::new(
            "skip",
            "Excuse a month from fee accrual",
            "skip <student-id> <month 1-12> <year> [reason]",
            cmd_skip,
        ),
        CommandDefinition::new(
            "unskip",
            "Remove a skipped month",
            "unskip <skipped-month-id>",
            cmd_unskip,
        ),
    ]
}

fn cmd_skips(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let student_id = parse_id(require(args, 0, "student id")?, "student id")?;
    if context.store.get_student(student_id).is_none() {
        return Err(CoreError::StudentNotFound(student_id).into());
    }
    let entries = context.store.skipped_history(student_id);
    if entries.is_empty() {
        output::info("No skipped months.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                entry.month_key().label(),
                entry.reason.clone(),
            ]
        })
        .collect();
    output::render_table(&["ID", "Month", "Reason"], &rows);
    Ok(())
}

fn cmd_skip(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let student_id = parse_id(require(args, 0, "student id")?, "student id")?;
    let month = parse_month(require(args, 1, "month")?)?;
    let year = parse_year(require(args, 2, "year")?)?;
    let entry = context
        .store
        .add_skipped_month(student_id, month, year, rest(args, 3))?;
    output::success(format!(
        "{} skipped for student {} (entry {}).",
        MonthKey { year, month }.label(),
        student_id,
        entry.id
    ));
    Ok(())
}

fn cmd_unskip(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(require(args, 0, "skipped month id")?, "skipped month id")?;
    let entry = context.store.delete_skipped_month(id)?;
    output::success(format!(
        "{} is billable again for student {}.",
        entry.month_key().label(),
        entry.student_id
    ));
    Ok(())
}
