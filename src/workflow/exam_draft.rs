//! 新建考试草稿 - 流程层
//!
//! 新建考试分两页：先填考试信息，再勾选参加人。
//! 两页之间的考试信息存成 TOML 草稿文件，创建成功或取消后删除。

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{AppResult, FileError, WorkflowError};
use crate::models::{CreateExamWithDetails, CreatedExam, ExamType, Modality, NewExam};
use crate::services::{CatalogService, ExamService};
use crate::validation::ExamForm;
use crate::workflow::roster::{CandidateRow, RosterReconciler, Selection};

const DRAFT_FILE: &str = "exam_draft.toml";

/// 尚未创建的考试
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDraft {
    pub title: String,
    pub modality: Modality,
    pub exam_type: ExamType,
    pub cycle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_name: Option<String>,
}

impl From<&ExamForm> for ExamDraft {
    fn from(form: &ExamForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            modality: form.modality,
            exam_type: form.exam_type,
            cycle_id: form.cycle_id.clone(),
            cycle_name: form.cycle_name.clone().filter(|n| !n.trim().is_empty()),
        }
    }
}

impl ExamDraft {
    pub fn to_new_exam(&self) -> NewExam {
        NewExam {
            title: self.title.clone(),
            modality: self.modality,
            exam_type: self.exam_type,
            cycle_id: self.cycle_id.clone(),
        }
    }
}

/// 草稿文件读写
#[derive(Clone, Debug)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(DRAFT_FILE)
    }

    pub async fn save(&self, draft: &ExamDraft) -> AppResult<()> {
        let path = self.path();
        let content = toml::to_string(draft).map_err(|e| FileError::TomlParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| write_failed(&self.dir, source))?;
        fs::write(&path, content)
            .await
            .map_err(|source| write_failed(&path, source))?;

        debug!("💾 考试草稿已保存: {}", path.display());
        Ok(())
    }

    /// 没有草稿时返回 `None`
    pub async fn load(&self) -> AppResult<Option<ExamDraft>> {
        let path = self.path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FileError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };

        let draft = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(draft))
    }

    pub async fn clear(&self) -> AppResult<()> {
        let path = self.path();
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(write_failed(&path, source).into()),
        }
    }
}

fn write_failed(path: &Path, source: std::io::Error) -> FileError {
    FileError::WriteFailed {
        path: path.display().to_string(),
        source,
    }
}

/// 新建考试流程
#[derive(Clone, Debug)]
pub struct ExamCreation {
    exams: ExamService,
    catalog: CatalogService,
    roster: RosterReconciler,
    store: DraftStore,
}

impl ExamCreation {
    pub fn new(
        exams: ExamService,
        catalog: CatalogService,
        roster: RosterReconciler,
        store: DraftStore,
    ) -> Self {
        Self {
            exams,
            catalog,
            roster,
            store,
        }
    }

    /// 第一页：校验考试信息并保存草稿
    pub async fn start(&self, form: &ExamForm) -> AppResult<ExamDraft> {
        form.check()?;
        let draft = ExamDraft::from(form);
        self.store.save(&draft).await?;
        info!("📝 考试草稿: {} ({:?})", draft.title, draft.exam_type);
        Ok(draft)
    }

    pub async fn draft(&self) -> AppResult<Option<ExamDraft>> {
        self.store.load().await
    }

    /// 草稿里没有周期名时按 ID 查询，查不到显示为空
    pub async fn cycle_name(&self, draft: &ExamDraft) -> String {
        if let Some(name) = &draft.cycle_name {
            return name.clone();
        }
        match self.catalog.cycle_by_id(&draft.cycle_id).await {
            Ok(cycle) => cycle.name,
            Err(e) => {
                warn!("⚠️ 无法获取周期 {}: {}", draft.cycle_id, e);
                String::new()
            }
        }
    }

    /// 第二页的候选人
    pub async fn candidates(&self, draft: &ExamDraft) -> AppResult<Vec<CandidateRow>> {
        self.roster
            .load_pool(
                &draft.cycle_id,
                draft.modality,
                draft.exam_type,
                &BTreeSet::new(),
            )
            .await
    }

    /// 第二页：连同勾选的参加人一起创建考试，成功后删除草稿
    pub async fn create_with_participants(&self, selection: &Selection) -> AppResult<CreatedExam> {
        let draft = self
            .store
            .load()
            .await?
            .ok_or(WorkflowError::MissingDraft)?;

        let payload = CreateExamWithDetails {
            exam: draft.to_new_exam(),
            participants: selection.to_ids(),
        };
        let created = self.exams.create_with_details(&payload).await?;
        self.store.clear().await?;
        Ok(created)
    }

    pub async fn cancel(&self) -> AppResult<()> {
        info!("↩️ 已取消新建考试");
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn temp_store() -> DraftStore {
        let suffix: u32 = rand::thread_rng().gen();
        DraftStore::new(std::env::temp_dir().join(format!("academy_draft_test_{}", suffix)))
    }

    fn draft() -> ExamDraft {
        ExamDraft {
            title: "Simulacro de admisión".into(),
            modality: Modality::Hibrido,
            exam_type: ExamType::Simulacro,
            cycle_id: "cy-2025".into(),
            cycle_name: Some("Ciclo Verano".into()),
        }
    }

    #[tokio::test]
    async fn test_draft_store_save_load_clear() {
        let store = temp_store();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&draft()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(draft()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        // 重复删除不报错
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_reported() {
        let store = temp_store();
        fs::create_dir_all(&store.dir).await.unwrap();
        fs::write(store.path(), "title = ").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::File(FileError::TomlParseFailed { .. })
        ));
        store.clear().await.unwrap();
    }

    #[test]
    fn test_draft_from_form_trims_title() {
        let form = ExamForm {
            title: "  Semanal 3 ".into(),
            modality: Modality::Virtual,
            exam_type: ExamType::Semanal,
            cycle_id: "cy1".into(),
            cycle_name: Some(" ".into()),
        };
        let draft = ExamDraft::from(&form);
        assert_eq!(draft.title, "Semanal 3");
        assert_eq!(draft.cycle_name, None);
        assert_eq!(draft.to_new_exam().exam_type, ExamType::Semanal);
    }
}
