/// 基础数据服务：区域、专业、周期、招生批次
use crate::clients::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    Admission, AdmissionInput, Area, Career, CareerInput, Cycle, ListEnvelope, OperationResult,
};

#[derive(Clone, Debug)]
pub struct CatalogService {
    client: ApiClient,
}

impl CatalogService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // ========== 区域 ==========

    pub async fn areas(&self) -> ApiResult<Vec<Area>> {
        let envelope: ListEnvelope<Area> = self.client.get("/areas").await?;
        Ok(envelope.into_items())
    }

    /// `/areas/:id` 返回区域本身，专业在 `careers` 字段里
    pub async fn careers_by_area(&self, area_id: &str) -> ApiResult<Vec<Career>> {
        let area: Area = self.client.get(&format!("/areas/{}", area_id)).await?;
        Ok(area
            .careers
            .into_iter()
            .map(|mut career| {
                if career.effective_area_id().is_none() {
                    career.area_id = Some(area.id.clone());
                }
                career
            })
            .collect())
    }

    // ========== 专业 ==========

    pub async fn careers(&self) -> ApiResult<Vec<Career>> {
        let envelope: ListEnvelope<Career> = self.client.get("/careers").await?;
        Ok(envelope.into_items())
    }

    pub async fn create_career(&self, input: &CareerInput) -> ApiResult<Career> {
        self.client.post("/careers", input).await
    }

    pub async fn update_career(&self, id: &str, input: &CareerInput) -> ApiResult<Career> {
        self.client.patch(&format!("/careers/{}", id), input).await
    }

    /// 软删除
    pub async fn remove_career(&self, id: &str) -> ApiResult<Option<OperationResult>> {
        self.client.delete(&format!("/careers/{}", id)).await
    }

    // ========== 周期 ==========

    pub async fn cycles(&self) -> ApiResult<Vec<Cycle>> {
        let envelope: ListEnvelope<Cycle> = self.client.get("/cycles").await?;
        Ok(envelope.into_items())
    }

    pub async fn cycle_by_id(&self, id: &str) -> ApiResult<Cycle> {
        self.client.get(&format!("/cycles/{}", id)).await
    }

    // ========== 招生批次 ==========

    pub async fn admissions(&self) -> ApiResult<Vec<Admission>> {
        let envelope: ListEnvelope<Admission> = self.client.get("/admissions").await?;
        Ok(envelope.into_items())
    }

    pub async fn create_admission(&self, input: &AdmissionInput) -> ApiResult<Admission> {
        self.client.post("/admissions", input).await
    }

    pub async fn update_admission(&self, id: &str, input: &AdmissionInput) -> ApiResult<Admission> {
        self.client.patch(&format!("/admissions/{}", id), input).await
    }

    pub async fn remove_admission(&self, id: &str) -> ApiResult<Option<OperationResult>> {
        self.client.delete(&format!("/admissions/{}", id)).await
    }
}
