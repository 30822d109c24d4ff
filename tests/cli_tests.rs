mod common;

use predicates::prelude::*;
use std::{error::Error, fs};

use common::{cli, script, setup_home};

#[test]
fn first_run_seeds_sample_students() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    script(&home, "students\nexit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("John Doe")
                .and(predicate::str::contains("Jane Smith"))
                .and(predicate::str::contains("Michael Johnson")),
        );
    assert!(home.join("ledger").join("students.json").exists());
    Ok(())
}

#[test]
fn payments_raise_total_paid() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    script(
        &home,
        "pay 1 500 2023-11-01 cash \"Late fee\"\nshow 1 --as-of 2023-12-01\n",
    )
    .assert()
    .success()
    .stdout(
        predicate::str::contains("Payment 6 of ₹500.00 recorded")
            .and(predicate::str::contains("Total paid  : ₹3,500.00"))
            .and(predicate::str::contains("Late fee")),
    );
    Ok(())
}

#[test]
fn skipping_a_month_clears_the_balance() -> Result<(), Box<dyn Error>> {
    let home = setup_home(false);
    let input = "\
add-student \"John Doe\" \"Computer Science\" 1500 2023-09-01
pay 1 1500 2023-09-05 upi
balance 1 --as-of 2023-11-01
skip 1 9 2023 Holiday
balance 1 --as-of 2023-11-01
";
    let output = script(&home, input).assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output)?;

    let balances: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("Remaining balance"))
        .collect();
    assert_eq!(balances.len(), 2);
    assert!(balances[0].ends_with("₹1,500.00"));
    assert!(balances[1].ends_with("₹0.00"));
    assert!(stdout.contains("September 2023 skipped for student 1"));
    Ok(())
}

#[test]
fn duplicate_skip_is_rejected_without_stopping_the_script() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    script(&home, "skip 2 10 2023\nskip 2 10 2023\nskips 2\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("already marked as skipped")
                .and(predicate::str::contains("October 2023")),
        );
    Ok(())
}

#[test]
fn deleting_a_student_removes_their_payments() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    script(&home, "delete-student 1\npayments 1\npayments\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("along with 2 payment(s)")
                .and(predicate::str::contains("Student 1 not found."))
                .and(predicate::str::contains("Jane Smith")),
        );
    Ok(())
}

#[test]
fn data_persists_between_runs() -> Result<(), Box<dyn Error>> {
    let home = setup_home(false);
    cli(&home)
        .args(["add-student", "Asha Rao", "Chemistry", "900", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added with id 1"));

    cli(&home)
        .args(["students", "--course", "Chemistry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Asha Rao"));
    Ok(())
}

#[test]
fn payment_export_writes_named_csv() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    let out_dir = home.join("exports");
    fs::create_dir_all(&out_dir)?;

    cli(&home)
        .args(["export", "payments", "1", "--out"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 row(s)"));

    let exported = out_dir.join("payments_John_Doe.csv");
    let mut reader = csv::Reader::from_path(&exported)?;
    let headers = reader.headers()?.clone();
    assert_eq!(&headers[2], "Student Name");
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][6], "First month payment");
    Ok(())
}

#[test]
fn student_export_prints_to_stdout() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    cli(&home)
        .args(["export", "students", "--as-of", "2023-11-01"])
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with(
                "ID,Name,Course,Fee Per Month,Total Paid,Join Date,Remaining Balance",
            )
            .and(predicate::str::contains(
                "1,\"John Doe\",\"Computer Science\",1500,3000,2023-09-01,0",
            )),
        );
    Ok(())
}

#[test]
fn unknown_command_gets_a_suggestion() -> Result<(), Box<dyn Error>> {
    let home = setup_home(false);
    script(&home, "studnets\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Did you mean `students`?"));
    Ok(())
}

#[test]
fn failing_one_shot_command_exits_non_zero() -> Result<(), Box<dyn Error>> {
    let home = setup_home(false);
    cli(&home)
        .args(["delete-payment", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Payment not found: 42"));
    Ok(())
}

#[test]
fn check_reports_a_consistent_ledger() -> Result<(), Box<dyn Error>> {
    let home = setup_home(true);
    cli(&home)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Ledger is consistent: 3 student(s), 5 payment(s), 0 skipped month(s).",
        ));
    Ok(())
}
