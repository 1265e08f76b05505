/// 付款服务
use crate::clients::ApiClient;
use crate::error::{AppResult, ApiResult, WorkflowError};
use crate::models::{CreatePayment, ListEnvelope, OperationResult, Payment};
use tracing::{info, warn};

const BASE: &str = "/payments";

#[derive(Clone, Debug)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Payment>> {
        let envelope: ListEnvelope<Payment> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<Payment> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    pub async fn list_by_student(&self, student_id: &str) -> ApiResult<Vec<Payment>> {
        let envelope: ListEnvelope<Payment> = self
            .client
            .get(&format!("{}/student/{}", BASE, student_id))
            .await?;
        Ok(envelope.into_items())
    }

    pub async fn create(&self, payload: &CreatePayment) -> ApiResult<Payment> {
        let payment: Payment = self.client.post(BASE, payload).await?;
        info!(
            "💰 已登记付款 {}：{:.2} (应收 {})",
            payment.id, payment.amount_paid, payment.account_receivable_id
        );
        Ok(payment)
    }

    pub async fn update(&self, id: &str, payload: &CreatePayment) -> ApiResult<Payment> {
        self.client.put(&format!("{}/{}", BASE, id), payload).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Option<OperationResult>> {
        self.client.delete(&format!("{}/{}", BASE, id)).await
    }

    /// 作废付款
    ///
    /// 已作废的付款直接返回 `PaymentAlreadyCancelled`，不发请求
    pub async fn cancel(&self, payment: &Payment) -> AppResult<Option<OperationResult>> {
        if payment.is_cancelled() {
            warn!("⚠️ 付款 {} 已作废，忽略重复操作", payment.id);
            return Err(WorkflowError::PaymentAlreadyCancelled {
                id: payment.id.clone(),
            }
            .into());
        }
        let result = self
            .client
            .patch_empty(&format!("{}/cancel/{}", BASE, payment.id))
            .await?;
        info!("🚫 已作废付款 {}", payment.id);
        Ok(result)
    }
}
