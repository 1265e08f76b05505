//! 服务装配
//!
//! 所有服务共用一个 `ApiClient`（内部是 reqwest 连接池，克隆开销很小）。

use crate::clients::ApiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::listing::ListingShell;
use crate::services::{
    AccountReceivableService, AttendanceService, CatalogService, EnrollmentService, ExamService,
    InterestedService, PaymentService, StudentService, TutorService,
};
use crate::workflow::{
    DraftStore, EnrollmentWizard, ExamCreation, RosterReconciler, TutorResolver,
};

#[derive(Clone, Debug)]
pub struct Dashboard {
    config: Config,
    pub tutors: TutorService,
    pub students: StudentService,
    pub enrollments: EnrollmentService,
    pub exams: ExamService,
    pub interested: InterestedService,
    pub receivables: AccountReceivableService,
    pub payments: PaymentService,
    pub catalog: CatalogService,
    pub attendance: AttendanceService,
}

impl Dashboard {
    pub fn new(config: Config) -> AppResult<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: ApiClient) -> Self {
        Self {
            tutors: TutorService::new(client.clone()),
            students: StudentService::new(client.clone()),
            enrollments: EnrollmentService::new(client.clone()),
            exams: ExamService::new(client.clone()),
            interested: InterestedService::new(client.clone()),
            receivables: AccountReceivableService::new(client.clone()),
            payments: PaymentService::new(client.clone()),
            catalog: CatalogService::new(client.clone()),
            attendance: AttendanceService::new(client),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tutor_resolver(&self) -> TutorResolver {
        TutorResolver::new(self.tutors.clone(), self.students.clone())
    }

    /// 每次报名都用一个新的向导
    pub fn enrollment_wizard(&self) -> EnrollmentWizard {
        EnrollmentWizard::new(self.tutor_resolver(), self.enrollments.clone())
    }

    pub fn roster_reconciler(&self) -> RosterReconciler {
        RosterReconciler::new(
            self.exams.clone(),
            self.enrollments.clone(),
            self.interested.clone(),
            self.config.interested_pool_limit as u64,
        )
    }

    pub fn exam_creation(&self) -> ExamCreation {
        ExamCreation::new(
            self.exams.clone(),
            self.catalog.clone(),
            self.roster_reconciler(),
            DraftStore::new(self.config.draft_dir.clone()),
        )
    }

    fn per_page(&self) -> u64 {
        self.config.items_per_page.max(1) as u64
    }

    pub fn student_list(&self) -> ListingShell<StudentService> {
        ListingShell::new(self.students.clone(), self.per_page())
    }

    pub fn tutor_list(&self) -> ListingShell<TutorService> {
        ListingShell::new(self.tutors.clone(), self.per_page())
    }

    pub fn enrollment_list(&self) -> ListingShell<EnrollmentService> {
        ListingShell::new(self.enrollments.clone(), self.per_page())
    }

    pub fn interested_list(&self) -> ListingShell<InterestedService> {
        ListingShell::new(self.interested.clone(), self.per_page())
    }
}
