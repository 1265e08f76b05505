//! 付款

use super::common::flexible_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pendiente,
    Pagado,
    Vencido,
    Anulado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Efectivo,
    TransferenciaBancaria,
    Tarjeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub account_receivable_id: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub due_date: Option<NaiveDate>,
    pub amount_paid: f64,
    #[serde(default, with = "flexible_date::option")]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn is_cancelled(&self) -> bool {
        self.status == PaymentStatus::Anulado
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub account_receivable_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    pub amount_paid: f64,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
