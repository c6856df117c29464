//! Status command - show store status and summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summary = ctx.account_service.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Teller Store Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Accounts", &summary.accounts.to_string()]);
    table.add_row(vec!["Active accounts", &summary.active_accounts.to_string()]);
    table.add_row(vec!["Transactions", &summary.transactions.to_string()]);
    table.add_row(vec![
        "Total balance",
        &output::format_money(&summary.total_balance),
    ]);
    table.add_row(vec!["Store size", &output::format_size(summary.db_size_bytes)]);

    println!("{}", table);

    Ok(())
}
