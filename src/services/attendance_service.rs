/// 考勤服务
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{Attendance, SeedResult, TardyFilter};
use reqwest::Method;
use tracing::info;

const BASE: &str = "/attendance";

#[derive(Clone, Debug)]
pub struct AttendanceService {
    client: ApiClient,
}

impl AttendanceService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, attendance: &Attendance) -> ApiResult<Attendance> {
        self.client.post(BASE, attendance).await
    }

    /// 为今天生成默认考勤记录
    pub async fn seed_today(&self) -> ApiResult<SeedResult> {
        let result: SeedResult = self
            .client
            .post_empty(&format!("{}/seed-today", BASE))
            .await?
            .unwrap_or_default();
        info!("📅 今日考勤已生成 {} 条", result.created);
        Ok(result)
    }

    pub async fn list_tardies(&self, filter: &TardyFilter) -> ApiResult<Vec<Attendance>> {
        let rows: Option<Vec<Attendance>> = self
            .client
            .send(
                Method::GET,
                &format!("{}/tardies", BASE),
                &filter.to_query(),
                None::<&()>,
            )
            .await?;
        Ok(rows.unwrap_or_default())
    }

    pub async fn justify_tardiness(&self, attendance_id: &str) -> ApiResult<()> {
        self.client
            .execute(
                Method::PATCH,
                &format!("{}/{}/justify-tardiness", BASE, attendance_id),
                None::<&()>,
            )
            .await
    }
}
