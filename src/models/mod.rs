//! 数据模型
//!
//! 与远程 API 的 JSON 结构一一对应（camelCase）。每个实体只保留最新的一版结构。

pub mod account_receivable;
pub mod attendance;
pub mod catalog;
pub mod common;
pub mod enrollment;
pub mod exam;
pub mod interested;
pub mod participant;
pub mod payment;
pub mod student;
pub mod tutor;

pub use account_receivable::{AccountReceivable, CreateAccountReceivable};
pub use attendance::{Attendance, AttendanceStatus, SeedResult, TardyFilter};
pub use catalog::{
    Admission, AdmissionInput, Area, AreaRef, Career, CareerInput, Cycle, Modality,
};
pub use common::{ListEnvelope, OperationResult, PageMeta, Paginated};
pub use enrollment::{
    ActiveEnrollment, ActiveFilter, CreateEnrollment, Enrollment, EnrollmentStatus, PersonSummary,
    Shift,
};
pub use exam::{
    CreateExamWithDetails, CreatedExam, Exam, ExamDetail, ExamSummary, ExamType, ExamUpdate,
    NewExam, RosterEntry, ScoreField, ScoreRow,
};
pub use interested::{Interested, InterestedDraft};
pub use participant::{ParticipantIds, ParticipantKind, ParticipantRef};
pub use payment::{CreatePayment, Payment, PaymentMethod, PaymentStatus};
pub use student::{Student, StudentDraft};
pub use tutor::{DniCheck, Tutor, TutorDraft, TutorType, TutorUpdate};
