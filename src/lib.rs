//! # Academy Admin
//!
//! 预科学校管理端的客户端核心：报名、监护人、考试名单、列表。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 唯一的 HTTP 传输，统一超时、错误解析和空响应处理
//! - `ApiClient` - 基础地址 + reqwest 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 每个 REST 资源一个服务，只描述"我能调用什么"
//! - `TutorService` / `StudentService` / `EnrollmentService` / `ExamService` 等
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 多个服务调用的固定顺序
//! - `TutorResolver` - DNI 查找、冲突处理、监护人/学生保存
//! - `EnrollmentWizard` - 两步报名向导
//! - `RosterReconciler` - 考试名单的增删、同步和成绩
//! - `ExamCreation` - 新建考试草稿
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/dashboard` - 装配服务，分发流程和列表
//! - `orchestrator/app` - 启动并加载基础数据
//!
//! 另有 `listing/`（分页 + 搜索外壳）和 `validation`（表单校验，校验失败不发请求）。
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod validation;
pub mod workflow;

// 重新导出常用类型
pub use clients::ApiClient;
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, WorkflowError};
pub use listing::{ListView, ListingShell, ListingState};
pub use orchestrator::{App, Dashboard};
pub use workflow::{
    ConflictAction, EnrollmentWizard, ExamCreation, Notice, RosterReconciler, TutorResolver,
    WizardStep,
};
