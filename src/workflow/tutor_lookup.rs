//! 监护人/学生解析 - 流程层
//!
//! 根据 DNI 查找监护人，决定新建还是更新，并处理 DNI 冲突。
//! 学生必须在监护人 ID 确定之后才能保存（tutorId 外键）。

use rand::Rng;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{AppResult, WorkflowError};
use crate::models::{Student, StudentDraft, Tutor, TutorDraft, TutorUpdate};
use crate::services::{StudentService, TutorService};
use crate::utils::text::nil_if_empty;
use crate::validation::is_valid_dni;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 4;

/// 学生下拉框的一项
#[derive(Debug, Clone, PartialEq)]
pub enum StudentOption {
    Existing(Student),
    /// 固定在列表末尾的"新增学生"
    AddNew,
}

impl StudentOption {
    pub fn label(&self) -> String {
        match self {
            StudentOption::Existing(student) => student.full_name(),
            StudentOption::AddNew => "+ Agregar nuevo estudiante".to_string(),
        }
    }

    pub fn student(&self) -> Option<&Student> {
        match self {
            StudentOption::Existing(student) => Some(student),
            StudentOption::AddNew => None,
        }
    }
}

/// DNI 查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum TutorLookup {
    /// 走新建监护人路径，表单清空
    NotFound,
    Found {
        tutor: Tutor,
        students: Vec<StudentOption>,
    },
}

/// DNI 冲突的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// 在 DNI 后追加随机后缀，作为另一个监护人新建
    Create,
    /// 用新数据覆盖已有监护人
    Edit,
    Cancel,
}

impl FromStr for ConflictAction {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ConflictAction::Create),
            "edit" => Ok(ConflictAction::Edit),
            "cancel" => Ok(ConflictAction::Cancel),
            other => Err(WorkflowError::InvalidConflictAction(other.to_string())),
        }
    }
}

impl fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictAction::Create => "create",
            ConflictAction::Edit => "edit",
            ConflictAction::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

/// 一次 DNI 冲突：已存在的监护人 + 用户刚填写的数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TutorConflict {
    pub existing_tutor: Option<Tutor>,
    pub new_tutor_data: Option<TutorDraft>,
}

/// 4 位小写 36 进制随机串
pub fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// 新数据中非空的字段覆盖已有监护人
pub fn merge_tutor(existing: &Tutor, incoming: &TutorDraft) -> TutorDraft {
    let pick = |new: Option<&str>, old: Option<&String>| {
        nil_if_empty(new).or_else(|| old.cloned())
    };
    TutorDraft {
        id: Some(existing.id.clone()),
        dni: existing.dni.clone(),
        first_name: nil_if_empty(Some(incoming.first_name.as_str()))
            .unwrap_or_else(|| existing.first_name.clone()),
        last_name: nil_if_empty(Some(incoming.last_name.as_str()))
            .unwrap_or_else(|| existing.last_name.clone()),
        email: pick(incoming.email.as_deref(), existing.email.as_ref()),
        phone1: pick(incoming.phone1.as_deref(), existing.phone1.as_ref()),
        phone2: pick(incoming.phone2.as_deref(), existing.phone2.as_ref()),
        tutor_type: incoming.tutor_type,
        observation: pick(incoming.observation.as_deref(), existing.observation.as_ref()),
    }
}

/// 监护人/学生解析器
#[derive(Clone, Debug)]
pub struct TutorResolver {
    tutors: TutorService,
    students: StudentService,
}

impl TutorResolver {
    pub fn new(tutors: TutorService, students: StudentService) -> Self {
        Self { tutors, students }
    }

    /// 按 DNI 查找监护人
    ///
    /// DNI 不是 8 位数字时不发请求；查询接口出错按"未找到"处理
    pub async fn lookup(&self, dni: &str) -> AppResult<TutorLookup> {
        let dni = dni.trim();
        if !is_valid_dni(dni) {
            return Err(WorkflowError::InvalidDni(dni.to_string()).into());
        }

        let check = self.tutors.check_dni(dni).await;
        let tutor = match (check.available, check.tutor) {
            (false, Some(tutor)) => tutor,
            _ => {
                info!("🔍 DNI {} 未注册，可新建监护人", dni);
                return Ok(TutorLookup::NotFound);
            }
        };

        info!(
            "🔍 找到监护人 {}，名下 {} 名学生",
            tutor.full_name(),
            tutor.students.len()
        );
        let mut students: Vec<StudentOption> = tutor
            .students
            .iter()
            .cloned()
            .map(StudentOption::Existing)
            .collect();
        students.push(StudentOption::AddNew);

        Ok(TutorLookup::Found { tutor, students })
    }

    /// 处理 DNI 冲突
    ///
    /// - `Create`：DNI 追加 `-xxxx` 后新建
    /// - `Edit`：合并后更新已有监护人
    /// - `Cancel`：不发请求，返回 `None`
    pub async fn resolve_conflict(
        &self,
        conflict: &TutorConflict,
        action: ConflictAction,
    ) -> AppResult<Option<Tutor>> {
        let (Some(existing), Some(incoming)) = (&conflict.existing_tutor, &conflict.new_tutor_data)
        else {
            return Err(WorkflowError::IncompleteConflict.into());
        };

        match action {
            ConflictAction::Create => {
                let base = incoming.dni.as_deref().unwrap_or_default();
                let mut draft = incoming.clone();
                draft.id = None;
                draft.dni = Some(format!("{}-{}", base, random_suffix()));
                warn!(
                    "⚠️ DNI {} 已存在，以 {} 新建监护人",
                    base,
                    draft.dni.as_deref().unwrap_or_default()
                );
                Ok(Some(self.tutors.create(&draft).await?))
            }
            ConflictAction::Edit => {
                let merged = merge_tutor(existing, incoming);
                let tutor = self
                    .tutors
                    .update(&existing.id, &TutorUpdate::from(&merged))
                    .await?;
                Ok(Some(tutor))
            }
            ConflictAction::Cancel => {
                info!("↩️ 已取消 DNI 冲突处理");
                Ok(None)
            }
        }
    }

    /// 与 `resolve_conflict` 相同，动作以字符串给出
    pub async fn resolve_conflict_str(
        &self,
        conflict: &TutorConflict,
        action: &str,
    ) -> AppResult<Option<Tutor>> {
        let action: ConflictAction = action.parse()?;
        self.resolve_conflict(conflict, action).await
    }

    /// 没有 ID 时新建，否则更新；只发一次请求
    pub async fn upsert_tutor(&self, draft: &TutorDraft) -> AppResult<Tutor> {
        let tutor = match draft.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => self.tutors.update(id, &TutorUpdate::from(draft)).await?,
            None => self.tutors.create(draft).await?,
        };
        if tutor.id.is_empty() {
            return Err(WorkflowError::MissingTutorId.into());
        }
        Ok(tutor)
    }

    /// 保存学生，`tutor_id` 必须是已保存的监护人；只发一次请求
    pub async fn upsert_student(&self, draft: &StudentDraft, tutor_id: &str) -> AppResult<Student> {
        let mut draft = draft.clone();
        draft.tutor_id = tutor_id.to_string();

        let student = match draft.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => self.students.update(&id, &draft).await?,
            None => self.students.create(&draft).await?,
        };
        if student.id.is_empty() {
            return Err(WorkflowError::MissingStudentId.into());
        }
        Ok(student)
    }
}
