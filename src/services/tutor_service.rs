/// 监护人服务
///
/// 负责 `/tutors` 相关接口；不关心报名流程的先后顺序
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    DniCheck, ListEnvelope, OperationResult, Paginated, Tutor, TutorDraft, TutorUpdate,
};
use tracing::{info, warn};

const BASE: &str = "/tutors";

#[derive(Clone, Debug)]
pub struct TutorService {
    client: ApiClient,
}

impl TutorService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 按姓名或 DNI 模糊搜索
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Tutor>> {
        self.client
            .get_with(
                &format!("{}/tutorSearch", BASE),
                &[("query", Some(query.to_string()))],
            )
            .await
    }

    pub async fn create(&self, draft: &TutorDraft) -> ApiResult<Tutor> {
        let tutor: Tutor = self.client.post(BASE, draft).await?;
        info!("👤 已创建监护人 {} ({})", tutor.full_name(), tutor.id);
        Ok(tutor)
    }

    /// 更新监护人；请求体不包含 id 和 dni
    pub async fn update(&self, id: &str, update: &TutorUpdate) -> ApiResult<Tutor> {
        let tutor = self
            .client
            .patch(&format!("{}/{}", BASE, id), update)
            .await?;
        info!("👤 已更新监护人 {}", id);
        Ok(tutor)
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<Tutor> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    /// 检查 DNI 是否已被占用
    ///
    /// 查询失败时按"未找到"处理并记录警告，不向上抛错
    pub async fn check_dni(&self, dni: &str) -> DniCheck {
        match self
            .client
            .get::<DniCheck>(&format!("{}/check-dni/{}", BASE, dni))
            .await
        {
            Ok(check) => check,
            Err(e) => {
                warn!("⚠️ DNI 查询失败，按未注册处理 ({}): {}", dni, e.message());
                DniCheck::not_found()
            }
        }
    }

    pub async fn list_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<Tutor>> {
        let envelope: ListEnvelope<Tutor> = self
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

    pub async fn list_all(&self) -> ApiResult<Vec<Tutor>> {
        let envelope: ListEnvelope<Tutor> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Option<OperationResult>> {
        self.client.delete(&format!("{}/{}", BASE, id)).await
    }
}
