//! Accounts command - list all accounts

use anyhow::Result;
use comfy_table::{Cell, Color};

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let accounts = ctx.account_service.list_accounts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts yet. Run 'teller open' to create one.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Account", "Holder", "City", "Contact", "Balance", "Status"]);

    for account in &accounts {
        let status_cell = if account.active {
            Cell::new("active").fg(Color::Green)
        } else {
            Cell::new("inactive").fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(&account.account_number),
            Cell::new(&account.name),
            Cell::new(&account.city),
            Cell::new(&account.contact_number),
            Cell::new(output::format_money(&account.balance)),
            status_cell,
        ]);
    }

    println!("{}", table);
    println!();
    println!("{} account(s)", accounts.len());

    Ok(())
}
