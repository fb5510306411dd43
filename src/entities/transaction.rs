// 🔁 Transaction Entity - one debit/credit pair with an amount
//
// The amount is added to the debit account and subtracted from the
// credit account. Sign checks are left to the caller.

use super::account::Account;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub debit: Account,
    pub credit: Account,
    pub amount: f64,
}

impl Transaction {
    pub fn new(debit: &Account, credit: &Account, amount: f64) -> Self {
        Transaction {
            debit: debit.clone(),
            credit: credit.clone(),
            amount,
        }
    }

    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            debit_code: self.debit.code().to_string(),
            credit_code: self.credit.code().to_string(),
            amount: self.amount,
        }
    }
}

/// On-disk shape of a journal entry: `{debit_code, credit_code, amount}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub debit_code: String,
    pub credit_code: String,
    pub amount: f64,
}
