//! VAT tracking example: invoices, bills, and the quarterly VAT position

use bigdecimal::BigDecimal;
use businessfin_core::{patterns, Ledger, LineInput, MemoryStore};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 BusinessFin Core - VAT Return Example\n");

    let mut ledger = Ledger::new(MemoryStore::new());
    let company = ledger
        .create_company("Tech Solutions Ltd", "GBP", true)
        .await?;
    ledger.install_standard_chart(company.id).await?;

    // Standard-rated sales invoice: £4,000 net + 20% VAT
    let invoice = patterns::vat_invoice(
        patterns::VatInvoiceParams {
            receivables_account: "1100".to_string(),
            revenue_account: "4100".to_string(),
            vat_payable_account: "2100".to_string(),
            net_amount: BigDecimal::from(4000),
            vat_code: "S".to_string(),
        },
        ledger.vat_table(),
    )?;
    ledger
        .post(
            company.id,
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            "Invoice 0001 - managed services",
            invoice,
        )
        .await?;
    println!("  ✓ Invoice 0001: £4,000 net, £800 output VAT");

    // Reduced-rate supplier bill: £600 net + 5% VAT
    let bill = patterns::vat_bill(
        patterns::VatBillParams {
            expense_account: "5300".to_string(),
            vat_recoverable_account: "1400".to_string(),
            cash_or_payables_account: "1000".to_string(),
            net_amount: BigDecimal::from(600),
            vat_code: "R".to_string(),
        },
        ledger.vat_table(),
    )?;
    ledger
        .post(
            company.id,
            NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            "Energy bill Q1",
            bill,
        )
        .await?;
    println!("  ✓ Energy bill: £600 net, £30 input VAT at the reduced rate");

    // Zero-rated export - no VAT, but still part of the return
    ledger
        .post(
            company.id,
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            "Export order",
            vec![
                LineInput::debit("1000", BigDecimal::from(2500)),
                LineInput::credit("4000", BigDecimal::from(2500)).with_vat("Z"),
            ],
        )
        .await?;
    println!("  ✓ Zero-rated export of £2,500");

    // Exempt income - reported separately from zero-rated
    ledger
        .post(
            company.id,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            "Insurance commission",
            vec![
                LineInput::debit("1000", BigDecimal::from(300)),
                LineInput::credit("4200", BigDecimal::from(300)).with_vat("E"),
            ],
        )
        .await?;
    println!("  ✓ Exempt commission of £300");

    // Quarterly VAT position
    let position = ledger
        .vat_position(
            company.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .await?;

    println!("\n📋 VAT Position for Q1 2024:");
    println!("  Output VAT:         £{}", position.output_vat);
    println!("  Input VAT:          £{}", position.input_vat);
    println!("  Zero-rated outputs: £{}", position.zero_rated_outputs);
    println!("  Exempt outputs:     £{}", position.exempt_outputs);
    println!(
        "  Net position:       £{} ({})",
        position.net(),
        if position.is_payable() {
            "payable to HMRC"
        } else {
            "receivable"
        }
    );

    Ok(())
}
