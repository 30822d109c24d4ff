use std::{fs, path::PathBuf};

use feebook_core::{CoreError, ExportService};

use crate::cli::args::{parse_id, ParsedArgs};
use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "export",
        "Export students or payments as CSV (stdout unless --out is given)",
        "export students|payments [student-id] [--out path] [--as-of YYYY-MM-DD]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["out", "as-of"], &[])?;
    let target = parsed.positional(0, "export target (students or payments)")?;

    let (csv, file_name) = match target.to_lowercase().as_str() {
        "students" => {
            let as_of = context.as_of(&parsed)?;
            (
                context.store.students_csv(as_of),
                ExportService::file_name("students", None),
            )
        }
        "payments" => {
            let student = match parsed.positionals.get(1) {
                Some(raw) => {
                    let id = parse_id(raw, "student id")?;
                    let student = context
                        .store
                        .get_student(id)
                        .ok_or(CoreError::StudentNotFound(id))?;
                    Some(student)
                }
                None => None,
            };
            (
                context.store.payments_csv(student.map(|student| student.id)),
                ExportService::file_name("payments", student),
            )
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "cannot export `{other}`; choose students or payments"
            )))
        }
    };

    let Some(out) = parsed.value("out") else {
        println!("{csv}");
        return Ok(());
    };
    let mut path = PathBuf::from(out);
    if path.is_dir() {
        path.push(&file_name);
    }
    fs::write(&path, &csv)?;
    let rows = csv.lines().count().saturating_sub(1);
    output::success(format!("Exported {rows} row(s) to {}.", path.display()));
    Ok(())
}
