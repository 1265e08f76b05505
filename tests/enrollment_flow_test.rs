mod common;

use academy_admin::models::TutorType;
use academy_admin::services::{EnrollmentService, StudentService, TutorService};
use academy_admin::validation::{EnrollmentForm, TutorStudentForm};
use academy_admin::workflow::{
    ConflictAction, EnrollmentWizard, TutorConflict, TutorLookup, TutorResolver, WizardStep,
};
use academy_admin::{ApiClient, AppError, WorkflowError};
use axum::http::Method;
use chrono::NaiveDate;
use common::MockServer;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn resolver(client: &ApiClient) -> TutorResolver {
    TutorResolver::new(
        TutorService::new(client.clone()),
        StudentService::new(client.clone()),
    )
}

fn wizard(client: &ApiClient) -> EnrollmentWizard {
    EnrollmentWizard::new(resolver(client), EnrollmentService::new(client.clone()))
}

fn tutor_student_form() -> TutorStudentForm {
    TutorStudentForm {
        dni: Some("45678912".into()),
        first_name: "Carmen".into(),
        last_name: "Huamán".into(),
        email: Some("carmen@correo.pe".into()),
        phone1: Some("987654321".into()),
        tutor_type: TutorType::Madre,
        student_first_name: "Luis".into(),
        student_last_name: "Huamán".into(),
        student_dni: Some("78912345".into()),
        ..Default::default()
    }
}

fn enrollment_form() -> EnrollmentForm {
    EnrollmentForm {
        area_id: "area-1".into(),
        career_id: "car-1".into(),
        admission_id: "adm-1".into(),
        cycle_id: "cyc-1".into(),
        total_cost: 1200.0,
        initial_payment: 300.0,
        ..EnrollmentForm::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        )
    }
}

fn tutor_json(id: &str) -> serde_json::Value {
    json!({ "id": id, "firstName": "Carmen", "lastName": "Huamán", "type": "MADRE" })
}

fn student_json(id: &str, tutor_id: &str) -> serde_json::Value {
    json!({ "id": id, "firstName": "Luis", "lastName": "Huamán", "tutorId": tutor_id })
}

/// 测试完整报名：监护人 → 学生 → 报名，顺序固定且各一次
#[tokio::test]
async fn test_wizard_end_to_end_call_order() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-1"))
        .on(Method::POST, "/students", 201, student_json("s-1", "t-1"))
        .on(Method::POST, "/enrollments", 201, json!({ "id": "e-1" }))
        .start()
        .await;
    let mut wizard = wizard(&server.client());

    let student_id = assert_ok!(wizard.save_student_step(tutor_student_form()).await);
    assert_eq!(student_id, "s-1");
    assert_eq!(wizard.step(), WizardStep::Academic);

    let enrollment = assert_ok!(wizard.submit(&enrollment_form()).await);
    assert_eq!(enrollment.id, "e-1");

    assert_eq!(
        server.routes(),
        vec!["POST /tutors", "POST /students", "POST /enrollments"]
    );
    let calls = server.calls();
    let tutor_body = calls[0].body.as_ref().unwrap();
    assert!(tutor_body.get("id").is_none());
    assert_eq!(tutor_body["type"], "MADRE");

    let student_body = calls[1].body.as_ref().unwrap();
    assert_eq!(student_body["tutorId"], "t-1");

    let enrollment_body = calls[2].body.as_ref().unwrap();
    assert_eq!(enrollment_body["studentId"], "s-1");
    assert_eq!(enrollment_body["startDate"], "2025-03-01");
    assert!(enrollment_body.get("areaId").is_none());

    // 成功后向导回到初始状态
    assert_eq!(wizard.step(), WizardStep::Student);
    assert!(wizard.context().draft.is_none());
    assert!(wizard.context().student_id.is_none());
}

/// 测试学生保存失败后重试：监护人改为更新，不重复新建
#[tokio::test]
async fn test_retry_after_student_failure_updates_tutor() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-1"))
        .on(Method::PATCH, "/tutors/t-1", 200, tutor_json("t-1"))
        .once(Method::POST, "/students", 500, json!({ "message": "Error interno" }))
        .on(Method::POST, "/students", 201, student_json("s-1", "t-1"))
        .on(Method::POST, "/enrollments", 201, json!({ "id": "e-1" }))
        .start()
        .await;
    let mut wizard = wizard(&server.client());

    let err = assert_err!(wizard.save_student_step(tutor_student_form()).await);
    assert_eq!(err.user_message(), "Error interno");
    assert_eq!(wizard.step(), WizardStep::Student);
    assert_eq!(
        wizard.go_to(WizardStep::Academic),
        Err(WorkflowError::StepLocked)
    );

    assert_ok!(wizard.submit(&enrollment_form()).await);
    assert_eq!(
        server.routes(),
        vec![
            "POST /tutors",
            "POST /students",
            "PATCH /tutors/t-1",
            "POST /students",
            "POST /enrollments",
        ]
    );
    let patch_body = server.calls()[2].body.clone().unwrap();
    assert!(patch_body.get("id").is_none());
    assert!(patch_body.get("dni").is_none());
}

/// 测试在第一步重新点保存：沿用已建的监护人，只新建一次
#[tokio::test]
async fn test_retry_student_step_reuses_saved_tutor() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-1"))
        .on(Method::PATCH, "/tutors/t-1", 200, tutor_json("t-1"))
        .once(Method::POST, "/students", 500, json!({ "message": "Error interno" }))
        .on(Method::POST, "/students", 201, student_json("s-1", "t-1"))
        .start()
        .await;
    let mut wizard = wizard(&server.client());

    assert_err!(wizard.save_student_step(tutor_student_form()).await);
    assert_eq!(
        wizard.context().draft.as_ref().and_then(|d| d.tutor.id.as_deref()),
        Some("t-1")
    );

    let student_id = assert_ok!(wizard.save_student_step(tutor_student_form()).await);
    assert_eq!(student_id, "s-1");
    assert_eq!(wizard.step(), WizardStep::Academic);

    assert_eq!(server.calls_to("POST", "/tutors").len(), 1);
    assert_eq!(
        server.routes(),
        vec![
            "POST /tutors",
            "POST /students",
            "PATCH /tutors/t-1",
            "POST /students",
        ]
    );
    let student_body = server.calls()[3].body.clone().unwrap();
    assert_eq!(student_body["tutorId"], "t-1");
}

/// 测试换了监护人 DNI 再保存时新建监护人
#[tokio::test]
async fn test_student_step_with_new_tutor_dni_creates_again() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-1"))
        .once(Method::POST, "/students", 500, json!({ "message": "Error interno" }))
        .on(Method::POST, "/students", 201, student_json("s-1", "t-1"))
        .start()
        .await;
    let mut wizard = wizard(&server.client());

    assert_err!(wizard.save_student_step(tutor_student_form()).await);
    let form = TutorStudentForm {
        dni: Some("11223344".into()),
        ..tutor_student_form()
    };
    assert_ok!(wizard.save_student_step(form).await);

    assert_eq!(server.calls_to("POST", "/tutors").len(), 2);
    assert_eq!(server.calls_to("PATCH", "/tutors/t-1").len(), 0);
}

/// 测试报名失败时保留上下文，已保存的学生不会回滚
#[tokio::test]
async fn test_enrollment_failure_keeps_context() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-1"))
        .on(Method::POST, "/students", 201, student_json("s-1", "t-1"))
        .on(
            Method::POST,
            "/enrollments",
            400,
            json!({ "message": ["cycleId must be a UUID"] }),
        )
        .start()
        .await;
    let mut wizard = wizard(&server.client());

    assert_ok!(wizard.save_student_step(tutor_student_form()).await);
    let err = assert_err!(wizard.submit(&enrollment_form()).await);
    assert_eq!(err.api_status(), Some(400));
    assert_eq!(err.user_message(), "cycleId must be a UUID");

    assert_eq!(wizard.context().student_id.as_deref(), Some("s-1"));
    assert_eq!(wizard.step(), WizardStep::Academic);
    assert_eq!(server.calls_to("DELETE", "/students/s-1").len(), 0);
}

/// 测试表单校验失败时不发请求
#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let server = MockServer::builder().start().await;
    let mut wizard = wizard(&server.client());

    let form = TutorStudentForm {
        dni: Some("1234".into()),
        ..tutor_student_form()
    };
    let err = assert_err!(wizard.save_student_step(form).await);
    assert!(matches!(err, AppError::Validation(_)));
    assert!(server.calls().is_empty());
}

/// 测试 DNI 查询接口出错时按未注册处理
#[tokio::test]
async fn test_dni_lookup_fails_open() {
    let server = MockServer::builder()
        .on(
            Method::GET,
            "/tutors/check-dni/45678912",
            500,
            json!({ "message": "boom" }),
        )
        .start()
        .await;
    let resolver = resolver(&server.client());

    let lookup = assert_ok!(resolver.lookup("45678912").await);
    assert_eq!(lookup, TutorLookup::NotFound);
    assert_eq!(server.calls().len(), 1);
}

#[tokio::test]
async fn test_dni_lookup_lists_students_with_add_new_last() {
    let server = MockServer::builder()
        .on(
            Method::GET,
            "/tutors/check-dni/45678912",
            200,
            json!({
                "exists": true,
                "tutor": {
                    "id": "t-9",
                    "firstName": "Carmen",
                    "lastName": "Huamán",
                    "type": "MADRE",
                    "students": [
                        { "id": "s-1", "firstName": "Luis", "lastName": "Huamán" },
                        { "id": "s-2", "firstName": "Ana", "lastName": "Huamán" }
                    ]
                }
            }),
        )
        .start()
        .await;
    let resolver = resolver(&server.client());

    let TutorLookup::Found { tutor, students } = assert_ok!(resolver.lookup(" 45678912 ").await)
    else {
        panic!("expected tutor");
    };
    assert_eq!(tutor.id, "t-9");
    assert_eq!(students.len(), 3);
    assert_eq!(students[0].label(), "Luis Huamán");
    assert!(students[2].student().is_none());
}

#[tokio::test]
async fn test_short_dni_is_rejected_without_call() {
    let server = MockServer::builder().start().await;
    let resolver = resolver(&server.client());

    let err = assert_err!(resolver.lookup("1234567").await);
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::InvalidDni(_))
    ));
    assert!(server.calls().is_empty());
}

fn conflict() -> TutorConflict {
    let (draft, _) = tutor_student_form().into_drafts();
    TutorConflict {
        existing_tutor: Some(
            serde_json::from_value(json!({
                "id": "t-9",
                "dni": "45678912",
                "firstName": "Carmen",
                "lastName": "Rojas",
                "email": "antiguo@correo.pe",
                "type": "MADRE"
            }))
            .unwrap(),
        ),
        new_tutor_data: Some(draft),
    }
}

#[tokio::test]
async fn test_conflict_cancel_sends_nothing() {
    let server = MockServer::builder().start().await;
    let resolver = resolver(&server.client());

    let result = assert_ok!(resolver.resolve_conflict(&conflict(), ConflictAction::Cancel).await);
    assert!(result.is_none());
    assert!(server.calls().is_empty());
}

/// 测试新建冲突监护人时 DNI 追加 4 位随机后缀
#[tokio::test]
async fn test_conflict_create_appends_suffix() {
    let server = MockServer::builder()
        .on(Method::POST, "/tutors", 201, tutor_json("t-10"))
        .start()
        .await;
    let resolver = resolver(&server.client());

    let tutor = assert_ok!(resolver.resolve_conflict_str(&conflict(), "create").await);
    assert_eq!(tutor.map(|t| t.id), Some("t-10".to_string()));

    let body = server.calls()[0].body.clone().unwrap();
    let dni = body["dni"].as_str().unwrap();
    let (base, suffix) = dni.split_once('-').unwrap();
    assert_eq!(base, "45678912");
    assert_eq!(suffix.len(), 4);
    assert!(suffix
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[tokio::test]
async fn test_conflict_edit_patches_existing() {
    let server = MockServer::builder()
        .on(Method::PATCH, "/tutors/t-9", 200, tutor_json("t-9"))
        .start()
        .await;
    let resolver = resolver(&server.client());

    assert_ok!(resolver.resolve_conflict(&conflict(), ConflictAction::Edit).await);
    let calls = server.calls();
    assert_eq!(server.routes(), vec!["PATCH /tutors/t-9"]);
    let body = calls[0].body.as_ref().unwrap();
    assert_eq!(body["lastName"], "Huamán");
    assert_eq!(body["email"], "carmen@correo.pe");
    assert!(body.get("dni").is_none());
}

#[tokio::test]
async fn test_incomplete_conflict_and_bad_action() {
    let server = MockServer::builder().start().await;
    let resolver = resolver(&server.client());

    let err = assert_err!(
        resolver
            .resolve_conflict(&TutorConflict::default(), ConflictAction::Create)
            .await
    );
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::IncompleteConflict)
    ));

    let err = assert_err!(resolver.resolve_conflict_str(&conflict(), "merge").await);
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::InvalidConflictAction(_))
    ));
    assert!(server.calls().is_empty());
}
