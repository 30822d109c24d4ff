use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "check",
            "Report orphaned records and drifted payment totals",
            "check",
            cmd_check,
        ),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("shell", "Start the interactive shell", "shell", cmd_shell),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_check(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = context.store.warnings();
    if warnings.is_empty() {
        let ledger = context.store.ledger();
        output::success(format!(
            "Ledger is consistent: {} student(s), {} payment(s), {} skipped month(s).",
            ledger.students.len(),
            ledger.payments.len(),
            ledger.skipped_months.len()
        ));
        return Ok(());
    }
    for warning in &warnings {
        output::warning(warning);
    }
    output::hint(format!("{} integrity issue(s) found.", warnings.len()));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&command) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_shell(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::OneShot {
        return Err(CommandError::InvalidArguments(
            "`shell` cannot be combined with other arguments".into(),
        ));
    }
    output::info("Already in the shell.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
