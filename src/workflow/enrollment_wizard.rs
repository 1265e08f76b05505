//! 报名向导 - 流程层
//!
//! 两步向导：学生信息 → 学业信息。
//!
//! 流程顺序：
//! 1. 保存监护人（新建或更新）
//! 2. 用监护人 ID 保存学生
//! 3. 去掉 areaId，附上学生 ID，创建报名
//!
//! 三步之间没有服务端事务：报名失败时已保存的监护人和学生不会回滚。
//! 向导会记住已经拿到的 ID，重试时只做更新而不会重复新建。

use tracing::{error, info};

use crate::error::{AppError, AppResult, WorkflowError};
use crate::models::{Enrollment, StudentDraft, TutorDraft};
use crate::services::EnrollmentService;
use crate::validation::{EnrollmentForm, TutorStudentForm};
use crate::workflow::tutor_lookup::TutorResolver;

/// 向导步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Student,
    Academic,
}

/// 尚未（或部分）保存的监护人 + 学生
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TutorStudentDraft {
    pub tutor: TutorDraft,
    pub student: StudentDraft,
}

/// 向导上下文：只在一次报名过程中存在，提交成功或取消后清空
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardContext {
    pub draft: Option<TutorStudentDraft>,
    pub student_id: Option<String>,
    pub step: WizardStep,
}

impl WizardContext {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 报名向导
pub struct EnrollmentWizard {
    resolver: TutorResolver,
    enrollments: EnrollmentService,
    ctx: WizardContext,
}

impl EnrollmentWizard {
    pub fn new(resolver: TutorResolver, enrollments: EnrollmentService) -> Self {
        Self {
            resolver,
            enrollments,
            ctx: WizardContext::default(),
        }
    }

    pub fn context(&self) -> &WizardContext {
        &self.ctx
    }

    pub fn step(&self) -> WizardStep {
        self.ctx.step
    }

    /// 切换步骤；学生 ID 未确定时不能进入学业信息
    pub fn go_to(&mut self, step: WizardStep) -> Result<(), WorkflowError> {
        if step == WizardStep::Academic && self.ctx.student_id.is_none() {
            return Err(WorkflowError::StepLocked);
        }
        self.ctx.step = step;
        Ok(())
    }

    /// 第一步：校验表单，保存监护人和学生，进入学业信息
    ///
    /// 上一次保存已经拿到的 ID 会沿用（同一 DNI 的监护人、同一 DNI 的学生），
    /// 重复点击保存只做更新。返回学生 ID
    pub async fn save_student_step(&mut self, form: TutorStudentForm) -> AppResult<String> {
        form.check()?;
        let (tutor, student) = form.into_drafts();
        let mut draft = TutorStudentDraft { tutor, student };
        if let Some(previous) = &self.ctx.draft {
            carry_over_ids(previous, &mut draft);
        }
        self.ctx.draft = Some(draft);
        self.ctx.student_id = None;

        match self.resolve_student().await {
            Ok(student_id) => {
                self.ctx.step = WizardStep::Academic;
                Ok(student_id)
            }
            Err(e) => {
                error!("❌ 保存监护人/学生失败: {}", e);
                Err(e)
            }
        }
    }

    /// 第二步：提交报名
    ///
    /// 成功后清空向导；失败时保留上下文，便于重试
    pub async fn submit(&mut self, form: &EnrollmentForm) -> AppResult<Enrollment> {
        form.check()?;

        let result = self.create_enrollment(form).await;
        match &result {
            Ok(enrollment) => {
                info!("✅ 报名完成: {}", enrollment.id);
                self.ctx.reset();
            }
            Err(e) => error!("❌ 报名提交失败: {}", e),
        }
        result
    }

    /// 取消向导，丢弃所有未提交的数据
    pub fn cancel(&mut self) {
        info!("↩️ 已取消报名");
        self.ctx.reset();
    }

    async fn create_enrollment(&mut self, form: &EnrollmentForm) -> AppResult<Enrollment> {
        let student_id = self.ensure_student().await?;
        let payload = form.to_payload(&student_id);
        Ok(self.enrollments.create(&payload).await?)
    }

    /// 已有学生 ID 时直接复用，否则按草稿保存监护人和学生
    async fn ensure_student(&mut self) -> AppResult<String> {
        if let (Some(id), Some(_)) = (&self.ctx.student_id, &self.ctx.draft) {
            return Ok(id.clone());
        }
        self.resolve_student().await
    }

    async fn resolve_student(&mut self) -> AppResult<String> {
        let draft = self
            .ctx
            .draft
            .as_mut()
            .ok_or(AppError::Workflow(WorkflowError::MissingDraft))?;

        let tutor = self.resolver.upsert_tutor(&draft.tutor).await?;
        // 记住 ID：之后重试只做更新
        draft.tutor.id = Some(tutor.id.clone());

        let student = self
            .resolver
            .upsert_student(&draft.student, &tutor.id)
            .await?;
        draft.student.id = Some(student.id.clone());
        draft.student.tutor_id = tutor.id;

        info!("🎓 学生已就绪: {} ({})", student.full_name(), student.id);
        self.ctx.student_id = Some(student.id.clone());
        Ok(student.id)
    }
}

/// 表单没有带 ID 时，沿用上一次保存得到的 ID
fn carry_over_ids(previous: &TutorStudentDraft, draft: &mut TutorStudentDraft) {
    let same_tutor = previous.tutor.dni == draft.tutor.dni;
    if draft.tutor.id.is_none() && same_tutor {
        draft.tutor.id = previous.tutor.id.clone();
    }
    if draft.student.id.is_none() && same_tutor && previous.student.dni == draft.student.dni {
        draft.student.id = previous.student.id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ApiClient;
    use crate::services::{StudentService, TutorService};
    use std::time::Duration;

    fn wizard() -> EnrollmentWizard {
        let client = ApiClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        EnrollmentWizard::new(
            TutorResolver::new(
                TutorService::new(client.clone()),
                StudentService::new(client.clone()),
            ),
            EnrollmentService::new(client),
        )
    }

    #[test]
    fn test_academic_step_locked_without_student() {
        let mut wizard = wizard();
        assert_eq!(wizard.go_to(WizardStep::Academic), Err(WorkflowError::StepLocked));
        assert_eq!(wizard.step(), WizardStep::Student);
        assert!(wizard.go_to(WizardStep::Student).is_ok());
    }

    #[test]
    fn test_cancel_resets_context() {
        let mut wizard = wizard();
        wizard.ctx.student_id = Some("s-1".into());
        wizard.ctx.draft = Some(TutorStudentDraft::default());
        wizard.go_to(WizardStep::Academic).unwrap();

        wizard.cancel();
        assert_eq!(wizard.context(), &WizardContext::default());
    }

    fn saved_draft(tutor_dni: &str, student_dni: &str) -> TutorStudentDraft {
        let mut draft = TutorStudentDraft::default();
        draft.tutor.id = Some("t-1".into());
        draft.tutor.dni = Some(tutor_dni.into());
        draft.student.id = Some("s-1".into());
        draft.student.dni = Some(student_dni.into());
        draft
    }

    #[test]
    fn test_carry_over_keeps_ids_for_same_people() {
        let previous = saved_draft("45678912", "78912345");
        let mut draft = saved_draft("45678912", "78912345");
        draft.tutor.id = None;
        draft.student.id = None;

        carry_over_ids(&previous, &mut draft);
        assert_eq!(draft.tutor.id.as_deref(), Some("t-1"));
        assert_eq!(draft.student.id.as_deref(), Some("s-1"));
    }

    /// 测试换了监护人 DNI 后不沿用旧 ID
    #[test]
    fn test_carry_over_skips_different_tutor() {
        let previous = saved_draft("45678912", "78912345");
        let mut draft = saved_draft("11112222", "78912345");
        draft.tutor.id = None;
        draft.student.id = None;

        carry_over_ids(&previous, &mut draft);
        assert_eq!(draft.tutor.id, None);
        assert_eq!(draft.student.id, None);
    }

    /// 测试没有草稿时提交直接失败，不发请求
    #[tokio::test]
    async fn test_submit_without_draft_fails() {
        let mut wizard = wizard();
        let form = EnrollmentForm {
            area_id: "a".into(),
            career_id: "c".into(),
            admission_id: "ad".into(),
            cycle_id: "cy".into(),
            total_cost: 500.0,
            ..EnrollmentForm::new(
                chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            )
        };
        let err = wizard.submit(&form).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Workflow(WorkflowError::MissingDraft)
        ));
    }
}
