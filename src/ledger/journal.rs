//! The journal engine: the only mutation path in the system

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::info;

use crate::tax::VatRateTable;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Validates and appends balanced double-entry transactions to per-company
/// journals. Posting and reversing are the only operations anywhere that
/// change ledger state; everything else is a projection of what this engine
/// has appended.
pub struct JournalEngine<S: LedgerStorage> {
    storage: S,
    vat_table: VatRateTable,
}

impl<S: LedgerStorage> JournalEngine<S> {
    /// Create a new journal engine with the standard UK VAT table
    pub fn new(storage: S) -> Self {
        Self::with_vat_table(storage, VatRateTable::uk())
    }

    /// Create a new journal engine with an injected VAT rate table
    pub fn with_vat_table(storage: S, vat_table: VatRateTable) -> Self {
        Self { storage, vat_table }
    }

    /// The VAT rate table this engine prices lines with
    pub fn vat_table(&self) -> &VatRateTable {
        &self.vat_table
    }

    /// Validate and append a transaction.
    ///
    /// All checks run before any mutation; the append itself is atomic, so a
    /// failed post leaves the journal exactly as it was. VAT amounts are
    /// computed here, per line, from the injected rate table.
    pub async fn post(
        &mut self,
        company_id: CompanyId,
        date: NaiveDate,
        description: String,
        lines: Vec<LineInput>,
    ) -> LedgerResult<TransactionId> {
        validation::validate_description(&description)?;

        let company = self
            .storage
            .get_company(company_id)
            .await?
            .ok_or(LedgerError::CompanyNotFound(company_id))?;

        if lines.len() < 2 {
            return Err(LedgerError::InsufficientLines(lines.len()));
        }

        let mut posted_lines = Vec::with_capacity(lines.len());
        for input in lines {
            validation::validate_amount(&input.amount)?;

            let account = self
                .storage
                .get_account(company_id, &input.account)
                .await?
                .ok_or_else(|| LedgerError::AccountNotFound {
                    company: company_id,
                    code: input.account.clone(),
                })?;
            if !account.active {
                return Err(LedgerError::AccountInactive {
                    company: company_id,
                    code: input.account.clone(),
                });
            }

            let vat = match input.vat_code {
                Some(code) => {
                    if !company.vat_registered {
                        return Err(LedgerError::VatNotRegistered(company_id));
                    }
                    let amount = self.vat_table.compute_vat(&input.amount, &code)?;
                    Some(VatCharge { code, amount })
                }
                None => None,
            };

            posted_lines.push(Line {
                account: input.account,
                side: input.side,
                amount: input.amount,
                vat,
            });
        }

        let transaction = Transaction {
            id: TransactionId::new(),
            company_id,
            date,
            description,
            lines: posted_lines,
            posted_at: chrono::Utc::now().naive_utc(),
            reverses: None,
        };
        transaction.validate()?;

        self.storage.append_transaction(&transaction).await?;

        info!(
            company = %company_id,
            transaction = %transaction.id,
            date = %date,
            total = %transaction.total_debits(),
            "transaction posted"
        );
        Ok(transaction.id)
    }

    /// Reverse a posted transaction by appending a new one with every line's
    /// side flipped, dated `date`. At most one reversal may exist per
    /// original; the storage append enforces that atomically.
    pub async fn reverse(
        &mut self,
        transaction_id: TransactionId,
        date: NaiveDate,
    ) -> LedgerResult<TransactionId> {
        let original = self.get_transaction_required(transaction_id).await?;

        if let Some(existing) = self.storage.reversal_of(transaction_id).await? {
            return Err(LedgerError::AlreadyReversed {
                original: transaction_id,
                reversal: existing,
            });
        }

        let lines = original
            .lines
            .iter()
            .map(|line| Line {
                account: line.account.clone(),
                side: line.side.opposite(),
                amount: line.amount.clone(),
                vat: line.vat.clone(),
            })
            .collect();

        let reversal = Transaction {
            id: TransactionId::new(),
            company_id: original.company_id,
            date,
            description: format!("Reversal of {}", original.description),
            lines,
            posted_at: chrono::Utc::now().naive_utc(),
            reverses: Some(transaction_id),
        };

        self.storage.append_transaction(&reversal).await?;

        info!(
            company = %original.company_id,
            original = %transaction_id,
            reversal = %reversal.id,
            "transaction reversed"
        );
        Ok(reversal.id)
    }

    /// Get a transaction by id
    pub async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<Transaction>> {
        self.storage.get_transaction(transaction_id).await
    }

    /// Get a transaction by id, returning an error if not found
    pub async fn get_transaction_required(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Transaction> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))
    }

    /// List a company's transactions in posting order
    pub async fn get_transactions(
        &self,
        company_id: CompanyId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.storage
            .get_company(company_id)
            .await?
            .ok_or(LedgerError::CompanyNotFound(company_id))?;
        self.storage
            .get_transactions(company_id, start_date, end_date)
            .await
    }
}

/// Common posting patterns
pub mod patterns {
    use super::*;

    /// Parameters for a VAT invoice posting
    pub struct VatInvoiceParams {
        pub receivables_account: String,
        pub revenue_account: String,
        pub vat_payable_account: String,
        pub net_amount: BigDecimal,
        pub vat_code: String,
    }

    /// Parameters for a VAT bill payment posting
    pub struct VatBillParams {
        pub expense_account: String,
        pub vat_recoverable_account: String,
        pub cash_or_payables_account: String,
        pub net_amount: BigDecimal,
        pub vat_code: String,
    }

    /// Cash sale: debit cash/receivables, credit revenue
    pub fn sales_receipt(
        cash_account: impl Into<String>,
        revenue_account: impl Into<String>,
        amount: BigDecimal,
    ) -> Vec<LineInput> {
        vec![
            LineInput::debit(cash_account, amount.clone()),
            LineInput::credit(revenue_account, amount),
        ]
    }

    /// Expense paid from cash: debit expense, credit cash
    pub fn expense_payment(
        expense_account: impl Into<String>,
        cash_account: impl Into<String>,
        amount: BigDecimal,
    ) -> Vec<LineInput> {
        vec![
            LineInput::debit(expense_account, amount.clone()),
            LineInput::credit(cash_account, amount),
        ]
    }

    /// Owner investment: debit cash, credit equity
    pub fn owner_investment(
        cash_account: impl Into<String>,
        equity_account: impl Into<String>,
        amount: BigDecimal,
    ) -> Vec<LineInput> {
        vec![
            LineInput::debit(cash_account, amount.clone()),
            LineInput::credit(equity_account, amount),
        ]
    }

    /// Loan received: debit cash, credit loan payable
    pub fn loan_received(
        cash_account: impl Into<String>,
        loan_account: impl Into<String>,
        amount: BigDecimal,
    ) -> Vec<LineInput> {
        vec![
            LineInput::debit(cash_account, amount.clone()),
            LineInput::credit(loan_account, amount),
        ]
    }

    /// Sales invoice with VAT: debit receivables gross, credit revenue net
    /// (VAT-tagged), credit VAT payable. The VAT line is omitted for
    /// zero-yield codes so no zero-amount line is posted.
    pub fn vat_invoice(
        params: VatInvoiceParams,
        table: &VatRateTable,
    ) -> LedgerResult<Vec<LineInput>> {
        let vat = table.compute_vat(&params.net_amount, &params.vat_code)?;
        let gross = &params.net_amount + &vat;

        let mut lines = vec![
            LineInput::debit(params.receivables_account, gross),
            LineInput::credit(params.revenue_account, params.net_amount)
                .with_vat(params.vat_code),
        ];
        if vat > BigDecimal::from(0) {
            lines.push(LineInput::credit(params.vat_payable_account, vat));
        }
        Ok(lines)
    }

    /// Bill payment with VAT: debit expense net (VAT-tagged), debit VAT
    /// recoverable, credit cash/payables gross
    pub fn vat_bill(params: VatBillParams, table: &VatRateTable) -> LedgerResult<Vec<LineInput>> {
        let vat = table.compute_vat(&params.net_amount, &params.vat_code)?;
        let gross = &params.net_amount + &vat;

        let mut lines = vec![LineInput::debit(params.expense_account, params.net_amount)
            .with_vat(params.vat_code)];
        if vat > BigDecimal::from(0) {
            lines.push(LineInput::debit(params.vat_recoverable_account, vat));
        }
        lines.push(LineInput::credit(params.cash_or_payables_account, gross));
        Ok(lines)
    }
}
