use feebook_core::{CoreError, SortDirection, SortField, StudentQuery};
use feebook_domain::StudentDraft;

use crate::cli::args::{parse_amount, parse_date, parse_id, require, ParsedArgs};
use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "students",
            "List students with their balances",
            "students [--search text] [--course name] [--sort name|course|fee|paid|joined] [--desc] [--as-of YYYY-MM-DD]",
            cmd_students,
        ),
        CommandDefinition::new(
            "show",
            "Show a student with payment and skipped-month history",
            "show <student-id> [--as-of YYYY-MM-DD]",
            cmd_show,
        ),
        CommandDefinition::new(
            "add-student",
            "Register a student",
            "add-student <name> <course> <fee-per-month> <join-date>",
            cmd_add_student,
        ),
        CommandDefinition::new(
            "edit-student",
            "Change a student's details",
            "edit-student <student-id> <name> <course> <fee-per-month> <join-date>",
            cmd_edit_student,
        ),
        CommandDefinition::new(
            "delete-student",
            "Delete a student with all payments and skipped months",
            "delete-student <student-id>",
            cmd_delete_student,
        ),
        CommandDefinition::new(
            "balance",
            "Explain how a student's remaining balance is derived",
            "balance <student-id> [--as-of YYYY-MM-DD]",
            cmd_balance,
        ),
        CommandDefinition::new("courses", "List distinct courses", "courses", cmd_courses),
    ]
}

fn cmd_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["search", "course", "sort", "as-of"], &["desc"])?;
    let query = StudentQuery {
        search: parsed.value("search").map(str::to_string),
        course: parsed.value("course").map(str::to_string),
        sort: parsed
            .value("sort")
            .map(str::parse::<SortField>)
            .transpose()?
            .unwrap_or_default(),
        direction: if parsed.flag("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    };
    let as_of = context.as_of(&parsed)?;

    let students = context.store.query_students(&query);
    if students.is_empty() {
        output::info("No students found.");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(students.len());
    for student in students {
        let balance = context.store.remaining_balance(student.id, as_of)?;
        rows.push(vec![
            student.id.to_string(),
            student.name.clone(),
            student.course.clone(),
            context.money(student.fee_per_month),
            context.money(student.total_paid),
            context.date(student.join_date),
            context.money(balance),
        ]);
    }
    output::render_table(
        &["ID", "Name", "Course", "Fee/Month", "Paid", "Joined", "Balance"],
        &rows,
    );
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["as-of"], &[])?;
    let id = parse_id(parsed.positional(0, "student id")?, "student id")?;
    let as_of = context.as_of(&parsed)?;
    let summary = context.store.accrual_summary(id, as_of)?;
    let Some(student) = context.store.get_student(id) else {
        return Err(CoreError::StudentNotFound(id).into());
    };

    output::section(format!("{} (#{})", student.name, student.id));
    output::info(format!("  Course      : {}", student.course));
    output::info(format!("  Fee / month : {}", context.money(student.fee_per_month)));
    output::info(format!("  Joined      : {}", context.date(student.join_date)));
    output::info(format!("  Total paid  : {}", context.money(student.total_paid)));
    output::info(format!(
        "  Balance     : {} as of {}",
        context.money(summary.remaining_balance),
        context.date(as_of)
    ));

    output::section("Payments");
    let payments = context.store.payment_history(id);
    if payments.is_empty() {
        output::info("No payments recorded.");
    } else {
        let rows: Vec<Vec<String>> = payments
            .iter()
            .map(|payment| {
                vec![
                    payment.id.to_string(),
                    context.date(payment.date),
                    context.money(payment.amount),
                    payment.method.to_string(),
                    payment.notes.clone(),
                ]
            })
            .collect();
        output::render_table(&["ID", "Date", "Amount", "Method", "Notes"], &rows);
    }

    output::section("Skipped months");
    let skipped = context.store.skipped_history(id);
    if skipped.is_empty() {
        output::info("No skipped months.");
    } else {
        let rows: Vec<Vec<String>> = skipped
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
    }
    Ok(())
}

fn student_draft(args: &[&str], offset: usize) -> Result<StudentDraft, CommandError> {
    let name = require(args, offset, "name")?;
    let course = require(args, offset + 1, "course")?;
    let fee = parse_amount(require(args, offset + 2, "fee per month")?, "fee per month")?;
    let join_date = parse_date(require(args, offset + 3, "join date")?)?;
    Ok(StudentDraft::new(name, course, fee, join_date))
}

fn cmd_add_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = student_draft(args, 0)?;
    let student = context.store.add_student(draft)?;
    output::success(format!(
        "Student {} added with id {}.",
        student.name, student.id
    ));
    Ok(())
}

fn cmd_edit_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(require(args, 0, "student id")?, "student id")?;
    let draft = student_draft(args, 1)?;
    let student = context.store.update_student(id, draft)?;
    output::success(format!("Student {} updated.", student.id));
    Ok(())
}

fn cmd_delete_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(require(args, 0, "student id")?, "student id")?;
    let removed = context.store.delete_student(id)?;
    output::success(format!(
        "Student {} deleted along with {} payment(s) and {} skipped month(s).",
        removed.student.name, removed.payments_removed, removed.skipped_months_removed
    ));
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["as-of"], &[])?;
    let id = parse_id(parsed.positional(0, "student id")?, "student id")?;
    let as_of = context.as_of(&parsed)?;
    let summary = context.store.accrual_summary(id, as_of)?;
    let Some(student) = context.store.get_student(id) else {
        return Err(CoreError::StudentNotFound(id).into());
    };

    output::section(format!(
        "Balance for {} as of {}",
        student.name,
        context.date(as_of)
    ));
    output::info(format!(
        "  Months since {:<10}: {}",
        student.join_month().label(),
        summary.months_elapsed
    ));
    output::info(format!("  Skipped months         : {}", summary.skipped_count));
    output::info(format!(
        "  Billable months        : {} x {}",
        summary.billable_months,
        context.money(student.fee_per_month)
    ));
    output::info(format!("  Total due              : {}", context.money(summary.total_due)));
    output::info(format!("  Total paid             : {}", context.money(summary.total_paid)));
    output::success(format!(
        "Remaining balance: {}",
        context.money(summary.remaining_balance)
    ));
    if summary.remaining_balance == 0.0 && summary.total_paid > summary.total_due {
        output::hint(format!(
            "Paid ahead by {}.",
            context.money(summary.total_paid - summary.total_due)
        ));
    }
    Ok(())
}

fn cmd_courses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let courses = context.store.courses();
    if courses.is_empty() {
        output::info("No courses yet.");
        return Ok(());
    }
    for course in courses {
        output::info(format!("  {course}"));
    }
    Ok(())
}
