/// 学生服务
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{ListEnvelope, OperationResult, Paginated, Student, StudentDraft};
use tracing::info;

const BASE: &str = "/students";

#[derive(Clone, Debug)]
pub struct StudentService {
    client: ApiClient,
}

impl StudentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search(&self, query: &str) -> ApiResult<Vec<Student>> {
        self.client
            .get_with(
                &format!("{}/findStudentByName", BASE),
                &[("query", Some(query.to_string()))],
            )
            .await
    }

    pub async fn create(&self, draft: &StudentDraft) -> ApiResult<Student> {
        let student: Student = self.client.post(BASE, draft).await?;
        info!("🎓 已创建学生 {} ({})", student.full_name(), student.id);
        Ok(student)
    }

    /// `StudentDraft` 序列化时不带 id，直接作为 PATCH 请求体
    pub async fn update(&self, id: &str, draft: &StudentDraft) -> ApiResult<Student> {
        let student = self
            .client
            .patch(&format!("{}/{}", BASE, id), draft)
            .await?;
        info!("🎓 已更新学生 {}", id);
        Ok(student)
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<Student> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    pub async fn list_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<Student>> {
        let envelope: ListEnvelope<Student> = self
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

    pub async fn list_all(&self) -> ApiResult<Vec<Student>> {
        let envelope: ListEnvelope<Student> = self.client.get(BASE).await?;
        Ok(envelope.into_items())
    }

    /// 软删除，服务端返回 `{message, state}`
    pub async fn delete(&self, id: &str) -> ApiResult<OperationResult> {
        let result = self
            .client
            .delete::<OperationResult>(&format!("{}/{}", BASE, id))
            .await?;
        Ok(result.unwrap_or_default())
    }
}
