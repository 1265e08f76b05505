/// 考试服务
///
/// 包括名单（roster）、参与者增删/同步、成绩提交
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    CreateExamWithDetails, CreatedExam, Exam, ExamSummary, ExamUpdate, NewExam, ParticipantIds,
    RosterEntry, ScoreRow,
};
use reqwest::Method;
use serde::Serialize;
use tracing::info;

const BASE: &str = "/exam";

#[derive(Serialize)]
struct ScoresBody<'a> {
    rows: &'a [ScoreRow],
}

#[derive(Clone, Debug)]
pub struct ExamService {
    client: ApiClient,
}

impl ExamService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, exam: &NewExam) -> ApiResult<Exam> {
        let created: Exam = self.client.post(BASE, exam).await?;
        info!("🧾 已创建考试 {} ({})", created.title, created.id);
        Ok(created)
    }

    pub async fn list(&self) -> ApiResult<Vec<Exam>> {
        self.client.get(BASE).await
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<Exam> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    /// 已分配的参与者及其成绩
    pub async fn roster(&self, id: &str) -> ApiResult<Vec<RosterEntry>> {
        let roster: Option<Vec<RosterEntry>> = self
            .client
            .send(Method::GET, &format!("{}/{}/roster", BASE, id), &[], None::<&()>)
            .await?;
        Ok(roster.unwrap_or_default())
    }

    pub async fn update(&self, id: &str, update: &ExamUpdate) -> ApiResult<()> {
        self.client
            .execute(Method::PATCH, &format!("{}/{}", BASE, id), Some(update))
            .await
    }

    pub async fn update_title(&self, id: &str, title: &str) -> ApiResult<()> {
        self.update(id, &ExamUpdate::title(title)).await?;
        info!("🧾 考试 {} 已改名为 {}", id, title);
        Ok(())
    }

    /// 用给定集合整体替换名单
    pub async fn sync_participants(&self, id: &str, ids: &ParticipantIds) -> ApiResult<()> {
        self.client
            .execute(Method::PUT, &format!("{}/{}/participants", BASE, id), Some(ids))
            .await?;
        info!(
            "🔄 考试 {} 名单已同步：{} 名学生，{} 名意向学员",
            id,
            ids.student_ids.len(),
            ids.interested_ids.len()
        );
        Ok(())
    }

    pub async fn add_participants(&self, id: &str, ids: &ParticipantIds) -> ApiResult<()> {
        self.client
            .execute(
                Method::POST,
                &format!("{}/{}/participants/add", BASE, id),
                Some(ids),
            )
            .await?;
        info!("➕ 考试 {} 新增 {} 名参与者", id, ids.len());
        Ok(())
    }

    pub async fn remove_participants(&self, id: &str, ids: &ParticipantIds) -> ApiResult<()> {
        self.client
            .execute(
                Method::POST,
                &format!("{}/{}/participants/remove", BASE, id),
                Some(ids),
            )
            .await?;
        info!("➖ 考试 {} 移除 {} 名参与者", id, ids.len());
        Ok(())
    }

    pub async fn update_scores(&self, id: &str, rows: &[ScoreRow]) -> ApiResult<()> {
        self.client
            .execute(
                Method::PATCH,
                &format!("{}/{}/scores", BASE, id),
                Some(&ScoresBody { rows }),
            )
            .await?;
        info!("✏️ 考试 {} 已提交 {} 条成绩", id, rows.len());
        Ok(())
    }

    pub async fn create_with_details(
        &self,
        payload: &CreateExamWithDetails,
    ) -> ApiResult<CreatedExam> {
        let created: CreatedExam = self
            .client
            .post(&format!("{}/create-with-details", BASE), payload)
            .await?;
        info!(
            "🧾 已创建考试 {}：{} 名学生，{} 名意向学员",
            created.exam.id, created.created_students, created.created_interested
        );
        Ok(created)
    }

    pub async fn summary(&self) -> ApiResult<Vec<ExamSummary>> {
        self.client.get(&format!("{}/summary", BASE)).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .execute(Method::DELETE, &format!("{}/{}", BASE, id), None::<&()>)
            .await
    }
}
