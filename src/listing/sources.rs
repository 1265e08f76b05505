use super::{PagedSource, Searchable};
use crate::error::ApiResult;
use crate::models::{Enrollment, Interested, Paginated, Student, Tutor};
use crate::services::{EnrollmentService, InterestedService, StudentService, TutorService};
use async_trait::async_trait;

fn join(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Searchable for Student {
    fn search_text(&self) -> String {
        join(&[
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.email.as_deref(),
            self.dni.as_deref(),
        ])
    }
}

impl Searchable for Tutor {
    fn search_text(&self) -> String {
        join(&[
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.dni.as_deref(),
            self.email.as_deref(),
        ])
    }
}

impl Searchable for Interested {
    fn search_text(&self) -> String {
        join(&[
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.email.as_deref(),
        ])
    }
}

impl Searchable for Enrollment {
    fn search_text(&self) -> String {
        let student = self.student.as_ref();
        join(&[
            student.map(|s| s.first_name.as_str()),
            student.map(|s| s.last_name.as_str()),
            self.code_student.as_deref(),
            self.career.as_ref().map(|c| c.name.as_str()),
        ])
    }
}

macro_rules! paged_source {
    ($service:ty, $item:ty) => {
        #[async_trait]
        impl PagedSource for $service {
            type Item = $item;

            async fn fetch_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<$item>> {
                self.list_page(page, limit).await
            }

            async fn fetch_all(&self) -> ApiResult<Vec<$item>> {
                self.list_all().await
            }
        }
    };
}

paged_source!(StudentService, Student);
paged_source!(TutorService, Tutor);
paged_source!(EnrollmentService, Enrollment);
paged_source!(InterestedService, Interested);
