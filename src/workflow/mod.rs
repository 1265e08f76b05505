//! 流程层（Workflow）
//!
//! 把多个服务调用按固定顺序串起来，并维护流程自己的状态
//! （向导上下文、勾选集合、考试草稿）。

pub mod enrollment_wizard;
pub mod exam_draft;
pub mod notice;
pub mod roster;
pub mod tutor_lookup;

pub use enrollment_wizard::{EnrollmentWizard, TutorStudentDraft, WizardContext, WizardStep};
pub use exam_draft::{DraftStore, ExamCreation, ExamDraft};
pub use notice::{Notice, NoticeLevel};
pub use roster::{
    CandidateRow, EditOutcome, EditView, HeaderState, ManageView, RosterBoard, RosterDiff,
    RosterReconciler, RowFilter, ScoreSheet, Selection,
};
pub use crate::models::ScoreField;
pub use tutor_lookup::{
    ConflictAction, StudentOption, TutorConflict, TutorLookup, TutorResolver,
};
