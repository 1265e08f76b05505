/// 应收账款服务
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{AccountReceivable, CreateAccountReceivable, ListEnvelope};

const BASE: &str = "/account-receivables";

#[derive(Clone, Debug)]
pub struct AccountReceivableService {
    client: ApiClient,
}

impl AccountReceivableService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<AccountReceivable>> {
        let envelope: ListEnvelope<AccountReceivable> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    pub async fn list_by_student(&self, student_id: &str) -> ApiResult<Vec<AccountReceivable>> {
        let envelope: ListEnvelope<AccountReceivable> = self
            .client
            .get(&format!("{}/student/{}", BASE, student_id))
            .await?;
        Ok(envelope.into_items())
    }

    pub async fn create(&self, payload: &CreateAccountReceivable) -> ApiResult<AccountReceivable> {
        self.client.post(BASE, payload).await
    }
}
