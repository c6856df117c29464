//! Open command - create a new account

use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Input;
use rust_decimal::Decimal;
use teller_core::services::AuditEvent;
use teller_core::AccountProfile;

use super::{get_context, password_with_confirm, record_audit};
use crate::output;

fn prompt_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    name: Option<String>,
    date_of_birth: Option<String>,
    city: Option<String>,
    address: Option<String>,
    contact: Option<String>,
    email: Option<String>,
    deposit: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let name = prompt_missing(name, "Account holder name")?;
    let date_of_birth_str = prompt_missing(date_of_birth, "Date of birth (YYYY-MM-DD)")?;
    let date_of_birth = NaiveDate::parse_from_str(&date_of_birth_str, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD"))?;
    let city = prompt_missing(city, "City")?;
    let address = prompt_missing(address, "Street address")?;
    let contact = prompt_missing(contact, "Contact number (10 digits)")?;
    let email = prompt_missing(email, "Email address")?;

    let deposit_str = prompt_missing(deposit, "Opening deposit")?;
    let deposit: Decimal = deposit_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid deposit amount"))?;

    let password = password_with_confirm(password)?;

    let profile = AccountProfile {
        name,
        date_of_birth,
        city,
        address,
        contact_number: contact,
        email,
    };

    match ctx.account_service.open_account(profile, &password, deposit) {
        Ok(opened) => {
            record_audit(
                &ctx,
                AuditEvent::new("account_opened")
                    .with_account(&opened.account_number)
                    .with_command("open"),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&opened)?);
            } else {
                output::success("Account opened");
                println!("  Account number: {}", opened.account_number);
                println!("  Holder: {}", opened.name);
                println!("  Balance: {}", output::format_money(&opened.balance));
            }
            Ok(())
        }
        Err(e) => {
            record_audit(
                &ctx,
                AuditEvent::new("account_open_failed")
                    .with_command("open")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}
