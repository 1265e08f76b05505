//! 能力层：每个 REST 资源一个服务
//!
//! 服务只知道接口地址和请求/响应结构，不决定调用顺序

pub mod account_receivable_service;
pub mod attendance_service;
pub mod catalog_service;
pub mod enrollment_service;
pub mod exam_service;
pub mod interested_service;
pub mod payment_service;
pub mod student_service;
pub mod tutor_service;

pub use account_receivable_service::AccountReceivableService;
pub use attendance_service::AttendanceService;
pub use catalog_service::CatalogService;
pub use enrollment_service::EnrollmentService;
pub use exam_service::ExamService;
pub use interested_service::InterestedService;
pub use payment_service::PaymentService;
pub use student_service::StudentService;
pub use tutor_service::TutorService;
