//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 持有唯一的 `ApiClient`，把服务组装成各个流程，交给上层使用。
//! 本层不做业务判断，只做装配和启动。
//!
//! ## 层次关系
//!
//! ```text
//! App (启动、加载基础数据)
//!     ↓
//! Dashboard (装配服务，分发流程)
//!     ↓
//! workflow (向导 / 名单 / 新建考试) + listing (列表页)
//!     ↓
//! services (每个 REST 资源一个服务)
//!     ↓
//! clients::ApiClient (HTTP 传输)
//! ```

pub mod app;
pub mod dashboard;

pub use app::{App, Catalogs};
pub use dashboard::Dashboard;
