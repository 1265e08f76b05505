/// 意向学员服务
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{Interested, InterestedDraft, ListEnvelope, OperationResult, Paginated};
use tracing::info;

const BASE: &str = "/interested";

#[derive(Clone, Debug)]
pub struct InterestedService {
    client: ApiClient,
}

impl InterestedService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<Interested>> {
        let envelope: ListEnvelope<Interested> = self
            .client
            .get_with(
                BASE,
                &[
                    ("page", Some(page.to_string())),
                    ("limit", Some(limit.to_string())),
                ],
            )
            .await?;
        Ok(envelope.into_page())
    }

    pub async fn list_all(&self) -> ApiResult<Vec<Interested>> {
        let envelope: ListEnvelope<Interested> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<Interested> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    pub async fn create(&self, draft: &InterestedDraft) -> ApiResult<Interested> {
        let created: Interested = self.client.post(BASE, draft).await?;
        info!("🙋 已登记意向学员 {} ({})", created.full_name(), created.id);
        Ok(created)
    }

    pub async fn update(&self, id: &str, draft: &InterestedDraft) -> ApiResult<Interested> {
        self.client.patch(&format!("{}/{}", BASE, id), draft).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Option<OperationResult>> {
        self.client.delete(&format!("{}/{}", BASE, id)).await
    }

    /// 批量清理过期的意向学员
    pub async fn delete_old(&self) -> ApiResult<Option<OperationResult>> {
        let result = self
            .client
            .delete::<OperationResult>(&format!("{}/old", BASE))
            .await?;
        info!("🧹 已清理过期意向学员");
        Ok(result)
    }
}
