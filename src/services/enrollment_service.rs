/// 报名服务
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    ActiveEnrollment, ActiveFilter, CreateEnrollment, Enrollment, ListEnvelope, Paginated,
};
use tracing::info;

const BASE: &str = "/enrollments";

#[derive(Clone, Debug)]
pub struct EnrollmentService {
    client: ApiClient,
}

impl EnrollmentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<Enrollment>> {
        let envelope: ListEnvelope<Enrollment> = self
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

    pub async fn list_all(&self) -> ApiResult<Vec<Enrollment>> {
        let envelope: ListEnvelope<Enrollment> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    /// 在读学生（考试候选名单的来源）
    pub async fn list_actives(&self, filter: &ActiveFilter) -> ApiResult<Vec<ActiveEnrollment>> {
        let envelope: Option<ListEnvelope<ActiveEnrollment>> = self
            .client
            .send(
                reqwest::Method::GET,
                &format!("{}/actives", BASE),
                &filter.to_query(),
                None::<&()>,
            )
            .await?;
        Ok(envelope.map(ListEnvelope::into_items).unwrap_or_default())
    }

    pub async fn create(&self, payload: &CreateEnrollment) -> ApiResult<Enrollment> {
        let enrollment: Enrollment = self.client.post(BASE, payload).await?;
        info!(
            "📝 已创建报名 {} (学生 {})",
            enrollment.id, payload.student_id
        );
        Ok(enrollment)
    }

    /// 物理删除
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete::<serde_json::Value>(&format!("{}/{}", BASE, id))
            .await?;
        info!("🗑️ 已删除报名 {}", id);
        Ok(())
    }
}
