//! 表单校验规则
//!
//! 字段级规则用 `validator` 的派生宏声明；跨字段规则（日期先后、金额合计）
//! 在 `check()` 中追加到具体字段上，这样调用方可以把错误显示在对应输入框旁。
//! 所有表单都在发出网络请求之前校验。

use crate::models::{
    CreateEnrollment, CreatePayment, ExamType, InterestedDraft, Modality, NewExam, PaymentMethod,
    PaymentStatus, Shift, StudentDraft, TutorDraft, TutorType,
};
use crate::utils::text::strip_empty;
use chrono::NaiveDate;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static DNI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8}$").expect("valid regex"));
static PHONE9_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9}$").expect("valid regex"));

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// 8 位数字 DNI
pub fn is_valid_dni(value: &str) -> bool {
    DNI_RE.is_match(value)
}

fn validate_dni(value: &str) -> Result<(), ValidationError> {
    if is_valid_dni(value) {
        Ok(())
    } else {
        Err(field_error("dni", "El DNI debe tener 8 dígitos"))
    }
}

fn validate_phone9(value: &str) -> Result<(), ValidationError> {
    if PHONE9_RE.is_match(value) {
        Ok(())
    } else {
        Err(field_error("phone", "Debe tener 9 dígitos"))
    }
}

/// 先跑派生规则，跨字段规则由调用方继续追加
fn field_rules(result: Result<(), ValidationErrors>) -> ValidationErrors {
    result.err().unwrap_or_else(ValidationErrors::new)
}

fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ========== 报名 ==========

/// 报名学业信息表单
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct EnrollmentForm {
    /// 只用于筛选专业，不会发送给服务端
    #[validate(length(min = 1, message = "Seleccione un área"))]
    pub area_id: String,
    #[validate(length(min = 1, message = "Seleccione una carrera"))]
    pub career_id: String,
    #[validate(length(min = 1, message = "Seleccione una admisión"))]
    pub admission_id: String,
    #[validate(length(min = 1, message = "Seleccione un ciclo"))]
    pub cycle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub modality: Modality,
    pub shift: Shift,
    pub credit: bool,
    #[validate(range(min = 1, max = 12, message = "Entre 1 y 12 cuotas"))]
    pub num_installments: u32,
    pub payment_carnet: bool,
    #[validate(range(min = 0.0, message = "El costo no puede ser negativo"))]
    pub carnet_cost: f64,
    #[validate(range(min = 1.0, message = "El costo total es requerido"))]
    pub total_cost: f64,
    #[validate(range(min = 0.0, message = "El pago no puede ser negativo"))]
    pub initial_payment: f64,
    #[validate(range(min = 0.0, message = "El descuento no puede ser negativo"))]
    pub discounts: f64,
    #[validate(length(max = 500, message = "Máximo 500 caracteres"))]
    pub notes: Option<String>,
}

impl EnrollmentForm {
    /// 新表单的默认值：1 期、金额为 0、面授、上午
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            area_id: String::new(),
            career_id: String::new(),
            admission_id: String::new(),
            cycle_id: String::new(),
            start_date,
            end_date,
            modality: Modality::Presencial,
            shift: Shift::Manana,
            credit: false,
            num_installments: 1,
            payment_carnet: false,
            carnet_cost: 0.0,
            total_cost: 0.0,
            initial_payment: 0.0,
            discounts: 0.0,
            notes: None,
        }
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = field_rules(self.validate());
        if self.end_date < self.start_date {
            errors.add(
                "end_date",
                field_error(
                    "date_order",
                    "La fecha de fin debe ser posterior a la fecha de inicio",
                ),
            );
        }
        if self.initial_payment + self.discounts > self.total_cost {
            errors.add(
                "initial_payment",
                field_error(
                    "balance",
                    "La suma del pago inicial y descuentos no puede exceder el costo total",
                ),
            );
        }
        finish(errors)
    }

    /// 待付余额
    pub fn balance(&self) -> f64 {
        self.total_cost - self.initial_payment - self.discounts
    }

    /// 生成请求体：去掉 areaId，附上学生 ID
    pub fn to_payload(&self, student_id: &str) -> CreateEnrollment {
        CreateEnrollment {
            start_date: self.start_date,
            end_date: self.end_date,
            student_id: student_id.to_string(),
            admission_id: self.admission_id.clone(),
            cycle_id: self.cycle_id.clone(),
            career_id: self.career_id.clone(),
            modality: self.modality,
            shift: self.shift,
            credit: self.credit,
            payment_carnet: self.payment_carnet,
            carnet_cost: self.carnet_cost,
            total_cost: self.total_cost,
            num_installments: self.num_installments,
            initial_payment: Some(self.initial_payment),
            discounts: Some(self.discounts),
            notes: self.notes.clone().filter(|n| !n.trim().is_empty()),
            status: None,
        }
    }
}

// ========== 监护人 + 学生 ==========

/// 报名第一步：监护人与学生信息
#[derive(Debug, Clone, PartialEq, Default, Validate)]
pub struct TutorStudentForm {
    pub tutor_id: Option<String>,
    #[validate(custom(function = "validate_dni"))]
    pub dni: Option<String>,
    #[validate(length(min = 2, message = "El nombre es obligatorio"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "El apellido es obligatorio"))]
    pub last_name: String,
    #[validate(email(message = "Correo inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 15, message = "Teléfono inválido"))]
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub tutor_type: TutorType,
    pub observation: Option<String>,

    pub student_id: Option<String>,
    #[validate(length(min = 2, message = "El nombre es obligatorio"))]
    pub student_first_name: String,
    #[validate(length(min = 2, message = "El apellido es obligatorio"))]
    pub student_last_name: String,
    #[validate(email(message = "Correo inválido"))]
    pub student_email: Option<String>,
    #[validate(custom(function = "validate_dni"))]
    pub student_dni: Option<String>,
    pub student_phone: Option<String>,
    pub student_address: Option<String>,
    pub student_school: Option<String>,
    pub student_birthday: Option<NaiveDate>,
}

impl TutorStudentForm {
    /// 空字符串视为未填写
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.tutor_id,
            &mut self.dni,
            &mut self.email,
            &mut self.phone1,
            &mut self.phone2,
            &mut self.observation,
            &mut self.student_id,
            &mut self.student_email,
            &mut self.student_dni,
            &mut self.student_phone,
            &mut self.student_address,
            &mut self.student_school,
        ] {
            strip_empty(field);
        }
        self
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.clone().normalized().validate()
    }

    /// 拆分为监护人草稿和学生草稿。学生的 tutorId 在监护人保存后才确定
    pub fn into_drafts(self) -> (TutorDraft, StudentDraft) {
        let form = self.normalized();
        let tutor = TutorDraft {
            id: form.tutor_id,
            dni: form.dni,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone1: form.phone1,
            phone2: form.phone2,
            tutor_type: form.tutor_type,
            observation: form.observation,
        };
        let student = StudentDraft {
            id: form.student_id,
            first_name: form.student_first_name,
            last_name: form.student_last_name,
            dni: form.student_dni,
            email: form.student_email,
            phone: form.student_phone,
            address: form.student_address,
            school: form.student_school,
            birthday: form.student_birthday,
            tutor_id: String::new(),
        };
        (tutor, student)
    }
}

// ========== 意向学员 ==========

#[derive(Debug, Clone, PartialEq, Default, Validate)]
pub struct InterestedForm {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "El apellido es requerido"))]
    pub last_name: String,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone9"))]
    pub phone1: Option<String>,
    #[validate(custom(function = "validate_phone9"))]
    pub phone2: Option<String>,
    #[validate(length(min = 1, message = "Debe seleccionar una carrera"))]
    pub career_id: String,
    #[validate(length(min = 1, message = "Debe seleccionar un ciclo"))]
    pub cycle_id: String,
}

impl InterestedForm {
    pub fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        strip_empty(&mut self.email);
        strip_empty(&mut self.phone1);
        strip_empty(&mut self.phone2);
        self
    }

    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.clone().normalized().validate()
    }

    pub fn to_draft(&self) -> InterestedDraft {
        let form = self.clone().normalized();
        InterestedDraft {
            id: form.id,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone1: form.phone1,
            phone2: form.phone2,
            career_id: form.career_id,
            cycle_id: form.cycle_id,
        }
    }
}

// ========== 付款 ==========

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PaymentForm {
    #[validate(length(min = 1, message = "ID de Cuenta por cobrar inválida"))]
    pub account_receivable_id: String,
    pub invoice_number: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[validate(range(
        exclusive_min = 0.0,
        max = 10000.0,
        message = "El monto debe ser mayor a 0 y no mayor a 10000"
    ))]
    pub amount_paid: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl PaymentForm {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }

    /// 新付款默认状态为已支付
    pub fn to_payload(&self) -> CreatePayment {
        let mut payload = CreatePayment {
            account_receivable_id: self.account_receivable_id.clone(),
            invoice_number: self.invoice_number.clone(),
            due_date: self.due_date,
            amount_paid: self.amount_paid,
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            status: PaymentStatus::Pagado,
            notes: self.notes.clone(),
        };
        strip_empty(&mut payload.invoice_number);
        strip_empty(&mut payload.notes);
        payload
    }
}

// ========== 考试 ==========

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ExamForm {
    #[validate(length(min = 1, message = "El nombre del examen es obligatorio"))]
    pub title: String,
    pub modality: Modality,
    pub exam_type: ExamType,
    #[validate(length(min = 1, message = "Debe seleccionar un ciclo"))]
    pub cycle_id: String,
    pub cycle_name: Option<String>,
}

impl ExamForm {
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut trimmed = self.clone();
        trimmed.title = trimmed.title.trim().to_string();
        trimmed.validate()
    }

    pub fn to_new_exam(&self) -> NewExam {
        NewExam {
            title: self.title.trim().to_string(),
            modality: self.modality,
            exam_type: self.exam_type,
            cycle_id: self.cycle_id.clone(),
        }
    }
}
