//! 应收账款

use super::common::flexible_date;
use super::payment::PaymentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReceivable {
    pub id: String,
    #[serde(default, with = "flexible_date::option")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub student_id: Option<String>,
    pub total_amount: f64,
    pub pending_balance: f64,
    #[serde(default, with = "flexible_date::option")]
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub concept: String,
}

impl AccountReceivable {
    pub fn is_settled(&self) -> bool {
        self.pending_balance <= 0.0 || self.status == PaymentStatus::Pagado
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountReceivable {
    #[serde(with = "flexible_date")]
    pub payment_date: NaiveDate,
    pub student_id: String,
    pub total_amount: f64,
    pub pending_balance: f64,
    #[serde(with = "flexible_date")]
    pub due_date: NaiveDate,
    pub concept: String,
    pub status: PaymentStatus,
}
