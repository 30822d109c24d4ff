use feebook_core::CoreError;
use feebook_domain::{PaymentDraft, PaymentMethod};

use crate::cli::args::{parse_amount, parse_date, parse_id, require, rest};
use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "payments",
            "List payments, optionally for one student",
            "payments [student-id]",
            cmd_payments,
        ),
        CommandDefinition::new(
            "pay",
            "Record a payment",
            "pay <student-id> <amount> <date> <cash|upi> [notes]",
            cmd_pay,
        ),
        CommandDefinition::new(
            "delete-payment",
            "Delete a payment and reverse it from the student's total",
            "delete-payment <payment-id>",
            cmd_delete_payment,
        ),
    ]
}

fn cmd_payments(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let student_id = args
        .first()
        .map(|raw| parse_id(raw, "student id"))
        .transpose()?;
    let payments = match student_id {
        Some(id) => {
            if context.store.get_student(id).is_none() {
                return Err(CoreError::StudentNotFound(id).into());
            }
            context.store.payment_history(id)
        }
        None => context.store.list_payments(None),
    };
    if payments.is_empty() {
        output::info("No payments recorded.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = payments
        .iter()
        .map(|payment| {
            let student = context
                .store
                .get_student(payment.student_id)
                .map(|student| student.name.clone())
                .unwrap_or_else(|| "Unknown".into());
            vec![
                payment.id.to_string(),
                student,
                context.date(payment.date),
                context.money(payment.amount),
                payment.method.to_string(),
                payment.notes.clone(),
            ]
        })
        .collect();
    output::render_table(
        &["ID", "Student", "Date", "Amount", "Method", "Notes"],
        &rows,
    );
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let student_id = parse_id(require(args, 0, "student id")?, "student id")?;
    let amount = parse_amount(require(args, 1, "amount")?, "amount")?;
    let date = parse_date(require(args, 2, "payment date")?)?;
    let method: PaymentMethod = require(args, 3, "payment method")?
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
    let draft = PaymentDraft::new(student_id, amount, date, method).with_notes(rest(args, 4));

    let payment = context.store.add_payment(draft)?;
    let total = context
        .store
        .get_student(student_id)
        .map(|student| student.total_paid)
        .unwrap_or_default();
    output::success(format!(
        "Payment {} of {} recorded. Total paid: {}.",
        payment.id,
        context.money(payment.amount),
        context.money(total)
    ));
    Ok(())
}

fn cmd_delete_payment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(require(args, 0, "payment id")?, "payment id")?;
    let payment = context.store.delete_payment(id)?;
    output::success(format!(
        "Payment {} of {} deleted.",
        payment.id,
        context.money(payment.amount)
    ));
    Ok(())
}
