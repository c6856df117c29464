//! Login command - interactive account session
//!
//! Runs the menu loop for a logged in holder. A failed operation prints its
//! message and returns to the menu; only logout and deactivation end the
//! session.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use rust_decimal::Decimal;
use teller_core::services::AuditEvent;
use teller_core::{ProfileUpdate, Session, TellerContext};

use super::{get_context, password_or_prompt, record_audit};
use crate::output;

const MENU: &[&str] = &[
    "Show balance",
    "Show transactions",
    "Credit",
    "Debit",
    "Transfer",
    "Update profile",
    "Change password",
    "Deactivate account",
    "Logout",
];

fn audit_op(ctx: &TellerContext, account: &str, event: &str) {
    record_audit(
        ctx,
        AuditEvent::new(event)
            .with_account(account)
            .with_command("login"),
    );
}

fn audit_err(ctx: &TellerContext, account: &str, event: &str, err: &teller_core::Error) {
    record_audit(
        ctx,
        AuditEvent::new(event)
            .with_account(account)
            .with_command("login")
            .with_error(err.to_string()),
    );
}

pub fn run(account: Option<String>, password: Option<String>) -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("login needs an interactive terminal");
    }

    let ctx = get_context()?;

    let account_number = match account {
        Some(a) => a,
        None => Input::new()
            .with_prompt("Account number")
            .interact_text()?,
    };
    let password = password_or_prompt(password, "Password")?;

    let session = match ctx.account_service.login(&account_number, &password) {
        Ok(session) => session,
        Err(e) => {
            audit_err(&ctx, &account_number, "login_failed", &e);
            return Err(e.into());
        }
    };
    audit_op(&ctx, session.account_number(), "login");

    let holder = ctx
        .account_service
        .find_account(session.account_number())?
        .map(|a| a.name)
        .unwrap_or_default();
    output::info(&format!("Welcome, {}", holder));

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Choose an operation")
            .items(MENU)
            .default(0)
            .interact()?;

        match choice {
            0 => show_balance(&ctx, &session),
            1 => show_transactions(&ctx, &session)?,
            2 => credit(&ctx, &session)?,
            3 => debit(&ctx, &session)?,
            4 => transfer(&ctx, &session)?,
            5 => update_profile(&ctx, &session)?,
            6 => change_password(&ctx, &session)?,
            7 => {
                let confirmed = Confirm::new()
                    .with_prompt("Deactivate this account? This ends the session")
                    .default(false)
                    .interact()?;
                if confirmed {
                    let number = session.account_number().to_string();
                    match ctx.ledger_service.toggle_active(session) {
                        Ok(_) => {
                            audit_op(&ctx, &number, "account_deactivated");
                            output::success("Account deactivated. Session ended.");
                        }
                        Err(e) => {
                            audit_err(&ctx, &number, "deactivate_failed", &e);
                            output::error(&e.to_string());
                        }
                    }
                    break;
                }
            }
            _ => {
                audit_op(&ctx, session.account_number(), "logout");
                session.logout();
                println!("Goodbye.");
                break;
            }
        }
    }

    Ok(())
}

fn show_balance(ctx: &TellerContext, session: &Session) {
    match ctx.ledger_service.balance(session) {
        Ok(balance) => println!("Balance: {}", output::format_money(&balance)),
        Err(e) => output::error(&e.to_string()),
    }
}

fn show_transactions(ctx: &TellerContext, session: &Session) -> Result<()> {
    let history = match ctx.ledger_service.history(session) {
        Ok(history) => history,
        Err(e) => {
            output::error(&e.to_string());
            return Ok(());
        }
    };

    if history.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Kind", "Amount"]);
    for record in &history {
        table.add_row(vec![
            output::format_timestamp(&record.timestamp),
            record.kind.to_string(),
            output::format_money(&record.amount),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn prompt_amount(prompt: &str) -> Result<Option<Decimal>> {
    let raw: String = Input::new().with_prompt(prompt).interact_text()?;
    match raw.parse::<Decimal>() {
        Ok(amount) => Ok(Some(amount)),
        Err(_) => {
            output::error("Invalid amount");
            Ok(None)
        }
    }
}

fn credit(ctx: &TellerContext, session: &Session) -> Result<()> {
    let Some(amount) = prompt_amount("Amount to credit")? else {
        return Ok(());
    };

    match ctx.ledger_service.credit(session, amount) {
        Ok(receipt) => {
            audit_op(ctx, session.account_number(), "credit_posted");
            output::success(&format!(
                "Credited {}. Balance: {}",
                output::format_money(&receipt.amount),
                output::format_money(&receipt.balance_after)
            ));
        }
        Err(e) => {
            audit_err(ctx, session.account_number(), "credit_failed", &e);
            output::error(&e.to_string());
        }
    }
    Ok(())
}

fn debit(ctx: &TellerContext, session: &Session) -> Result<()> {
    let Some(amount) = prompt_amount("Amount to debit")? else {
        return Ok(());
    };

    match ctx.ledger_service.debit(session, amount) {
        Ok(receipt) => {
            audit_op(ctx, session.account_number(), "debit_posted");
            output::success(&format!(
                "Debited {}. Balance: {}",
                output::format_money(&receipt.amount),
                output::format_money(&receipt.balance_after)
            ));
        }
        Err(e) => {
            audit_err(ctx, session.account_number(), "debit_failed", &e);
            output::error(&e.to_string());
        }
    }
    Ok(())
}

fn transfer(ctx: &TellerContext, session: &Session) -> Result<()> {
    let target: String = Input::new()
        .with_prompt("Target account number")
        .interact_text()?;
    let Some(amount) = prompt_amount("Amount to transfer")? else {
        return Ok(());
    };

    match ctx.ledger_service.transfer(session, &target, amount) {
        Ok(receipt) => {
            audit_op(ctx, session.account_number(), "transfer_posted");
            output::success(&format!(
                "Transferred {} to {}. Balance: {}",
                output::format_money(&receipt.amount),
                receipt.target_account,
                output::format_money(&receipt.source_balance_after)
            ));
        }
        Err(e) => {
            audit_err(ctx, session.account_number(), "transfer_failed", &e);
            output::error(&e.to_string());
        }
    }
    Ok(())
}

fn update_profile(ctx: &TellerContext, session: &Session) -> Result<()> {
    let Some(current) = ctx.account_service.find_account(session.account_number())? else {
        output::error("Account is missing from the store");
        return Ok(());
    };

    let city: String = Input::new()
        .with_prompt("City")
        .default(current.city.clone())
        .interact_text()?;
    let address: String = Input::new()
        .with_prompt("Street address")
        .default(current.address.clone())
        .interact_text()?;
    let contact_number: String = Input::new()
        .with_prompt("Contact number (10 digits)")
        .default(current.contact_number.clone())
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("Email address")
        .default(current.email.clone())
        .interact_text()?;

    let update = ProfileUpdate {
        city,
        address,
        contact_number,
        email,
    };

    match ctx.ledger_service.update_profile(session, update) {
        Ok(()) => {
            audit_op(ctx, session.account_number(), "profile_updated");
            output::success("Profile updated");
        }
        Err(e) => {
            audit_err(ctx, session.account_number(), "profile_update_failed", &e);
            output::error(&e.to_string());
        }
    }
    Ok(())
}

fn change_password(ctx: &TellerContext, session: &Session) -> Result<()> {
    let p1 = Password::new().with_prompt("New password").interact()?;
    let p2 = Password::new().with_prompt("Confirm new password").interact()?;
    if p1 != p2 {
        output::error("Passwords do not match");
        return Ok(());
    }

    match ctx.ledger_service.change_password(session, &p1) {
        Ok(()) => {
            audit_op(ctx, session.account_number(), "password_changed");
            output::success("Password changed");
        }
        Err(e) => {
            audit_err(ctx, session.account_number(), "password_change_failed", &e);
            output::error(&e.to_string());
        }
    }
    Ok(())
}
