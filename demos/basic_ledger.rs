//! Basic multi-company ledger usage example

use bigdecimal::BigDecimal;
use businessfin_core::{patterns, Ledger, LineInput, MemoryStore};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 BusinessFin Core - Basic Ledger Example\n");

    // Create a new ledger with in-memory storage
    let mut ledger = Ledger::new(MemoryStore::new());

    // 1. Set up two companies with the standard chart of accounts
    println!("🏢 Setting up companies...");
    let tech = ledger
        .create_company("Tech Solutions Ltd", "GBP", true)
        .await?;
    let consulting = ledger
        .create_company("Consulting Partners Ltd", "GBP", true)
        .await?;

    for company_id in [tech.id, consulting.id] {
        let chart = ledger.install_standard_chart(company_id).await?;
        println!("  ✓ Installed {} accounts", chart.len());
    }
    println!();

    // 2. Record some business transactions
    println!("💰 Recording Business Transactions...\n");

    ledger
        .post(
            tech.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Initial owner investment",
            patterns::owner_investment("1000", "3000", BigDecimal::from(50000)),
        )
        .await?;
    println!("  ✓ Recorded: Owner investment of £50,000");

    ledger
        .post(
            tech.id,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "Purchase of office equipment",
            vec![
                LineInput::debit("1500", BigDecimal::from(15000)),
                LineInput::credit("1000", BigDecimal::from(15000)),
            ],
        )
        .await?;
    println!("  ✓ Recorded: Equipment purchase of £15,000");

    let disputed = ledger
        .post(
            tech.id,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "Consulting engagement",
            patterns::sales_receipt("1100", "4200", BigDecimal::from(12000)),
        )
        .await?;
    println!("  ✓ Recorded: Consulting sale of £12,000");

    // The client disputed the invoice: corrections are reversing entries,
    // never edits
    ledger
        .reverse(disputed, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap())
        .await?;
    println!("  ✓ Reversed: disputed consulting sale");

    ledger
        .post(
            tech.id,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "Monthly rent payment",
            patterns::expense_payment("5200", "1000", BigDecimal::from(8000)),
        )
        .await?;
    println!("  ✓ Recorded: Rent payment of £8,000");

    ledger
        .post(
            consulting.id,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            "Advisory retainer",
            patterns::sales_receipt("1000", "4200", BigDecimal::from(9000)),
        )
        .await?;
    println!("  ✓ Recorded: Consulting Partners retainer of £9,000");

    // 3. Generate financial reports
    println!("\n📈 Generating Financial Reports...\n");

    let trial = ledger
        .trial_balance(tech.id, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        .await?;
    println!("🔍 Trial Balance as of January 31, 2024:");
    println!("  Total Debits:  £{}", trial.total_debits);
    println!("  Total Credits: £{}", trial.total_credits);
    println!(
        "  Balanced: {}",
        if trial.is_balanced { "✅ Yes" } else { "❌ No" }
    );
    println!();

    let sheet = ledger
        .balance_sheet(tech.id, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        .await?;
    println!("📊 Balance Sheet as of January 31, 2024:");
    println!("  Assets:");
    for line in &sheet.assets {
        println!("    {}: £{}", line.name, line.amount);
    }
    println!("  Total Assets: £{}", sheet.total_assets);
    println!("  Liabilities: £{}", sheet.total_liabilities);
    println!("  Equity: £{}", sheet.total_equity);
    println!();

    let statement = ledger
        .income_statement(
            tech.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .await?;
    println!("💹 Income Statement for January 2024:");
    println!("  Total Revenue:  £{}", statement.total_revenue);
    println!("  Total Expenses: £{}", statement.total_expenses);
    println!("  Net Income:     £{}", statement.net_income);

    // 4. Consolidated view across both companies
    let group = ledger
        .consolidated(
            &[tech.id, consulting.id],
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            None,
        )
        .await?;
    println!("\n🏦 Consolidated Group Position:");
    println!("  Combined Assets: £{}", group.total_assets);
    println!("  Combined Equity: £{}", group.total_equity);

    // 5. Integrity audit
    let report = ledger
        .verify_integrity(tech.id, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        .await?;
    if report.is_valid {
        println!("\n✅ Ledger integrity check passed!");
    } else {
        println!("\n❌ Ledger integrity check failed:");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
