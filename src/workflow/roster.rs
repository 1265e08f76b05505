//! 考试名单 - 流程层
//!
//! 候选人来自两个 ID 空间：在读学生，以及（仅模拟考）同周期的意向学员。
//! 两种视图：
//! - 管理视图：对比已分配集合与勾选集合，分别调用新增/移除接口
//! - 编辑视图：用勾选集合整体同步名单，同时提交改名和成绩

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info};

use crate::error::{AppResult, WorkflowError};
use crate::models::{
    ActiveEnrollment, ActiveFilter, Exam, ExamType, Interested, Modality, ParticipantIds,
    ParticipantKind, ParticipantRef, RosterEntry, ScoreField, ScoreRow,
};
use crate::services::{EnrollmentService, ExamService, InterestedService};

/// 候选名单中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub key: ParticipantRef,
    pub first_name: String,
    pub last_name: String,
    pub kind: ParticipantKind,
    pub career_id: Option<String>,
    pub career_name: Option<String>,
    pub area_id: Option<String>,
    /// 是否已在名单中
    pub assigned: bool,
}

impl CandidateRow {
    pub fn from_enrollment(row: &ActiveEnrollment) -> Self {
        let career = row.career.as_ref();
        Self {
            key: ParticipantRef::Student(row.student.id.clone()),
            first_name: row.student.first_name.clone(),
            last_name: row.student.last_name.clone(),
            kind: ParticipantKind::Matriculado,
            career_id: career.map(|c| c.id.clone()),
            career_name: career.map(|c| c.name.clone()),
            area_id: career.and_then(|c| c.effective_area_id()).map(str::to_string),
            assigned: false,
        }
    }

    pub fn from_interested(person: &Interested) -> Self {
        Self {
            key: ParticipantRef::Interested(person.id.clone()),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            kind: ParticipantKind::Externo,
            career_id: person.effective_career_id().map(str::to_string),
            career_name: person.career_name().map(str::to_string),
            area_id: person.effective_area_id().map(str::to_string),
            assigned: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 区域/专业筛选，空值表示不筛选
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowFilter {
    pub area_id: Option<String>,
    pub career_id: Option<String>,
}

impl RowFilter {
    /// 切换区域时专业筛选随之清空
    pub fn set_area(&mut self, area_id: Option<String>) {
        self.area_id = area_id.filter(|a| !a.is_empty());
        self.career_id = None;
    }

    pub fn set_career(&mut self, career_id: Option<String>) {
        self.career_id = career_id.filter(|c| !c.is_empty());
    }

    pub fn matches(&self, row: &CandidateRow) -> bool {
        let area_ok = self
            .area_id
            .as_ref()
            .map_or(true, |a| row.area_id.as_ref() == Some(a));
        let career_ok = self
            .career_id
            .as_ref()
            .map_or(true, |c| row.career_id.as_ref() == Some(c));
        area_ok && career_ok
    }
}

/// 表头复选框的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unchecked,
    /// 部分可见行已勾选
    Indeterminate,
    Checked,
}

/// 勾选集合
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    keys: BTreeSet<ParticipantRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ParticipantRef) -> bool {
        self.keys.contains(key)
    }

    pub fn toggle(&mut self, key: &ParticipantRef) {
        if !self.keys.remove(key) {
            self.keys.insert(key.clone());
        }
    }

    /// 只影响当前可见的行：可见行全选时全部取消，否则全部勾上。
    /// 被筛选掉的行保持原状
    pub fn toggle_all_visible(&mut self, visible: &[ParticipantRef]) {
        if self.header_state(visible) == HeaderState::Checked {
            for key in visible {
                self.keys.remove(key);
            }
        } else {
            self.keys.extend(visible.iter().cloned());
        }
    }

    pub fn header_state(&self, visible: &[ParticipantRef]) -> HeaderState {
        let selected = visible.iter().filter(|k| self.keys.contains(k)).count();
        match selected {
            0 => HeaderState::Unchecked,
            n if n == visible.len() => HeaderState::Checked,
            _ => HeaderState::Indeterminate,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRef> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn to_ids(&self) -> ParticipantIds {
        ParticipantIds::from_refs(&self.keys)
    }
}

impl FromIterator<ParticipantRef> for Selection {
    fn from_iter<I: IntoIterator<Item = ParticipantRef>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// 管理视图的增删差集：`to_add = S \ A`，`to_remove = A \ S`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterDiff {
    pub to_add: ParticipantIds,
    pub to_remove: ParticipantIds,
}

impl RosterDiff {
    pub fn compute(assigned: &BTreeSet<ParticipantRef>, selected: &Selection) -> Self {
        Self {
            to_add: ParticipantIds::from_refs(selected.keys.difference(assigned)),
            to_remove: ParticipantIds::from_refs(assigned.difference(&selected.keys)),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScoreCell {
    detail_id: Option<String>,
    value: Option<f64>,
}

/// 成绩表：只有已持久化（有 detailId）的行可以录入成绩
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    field: ScoreField,
    cells: BTreeMap<ParticipantRef, ScoreCell>,
}

impl ScoreSheet {
    pub fn from_roster(roster: &[RosterEntry], field: ScoreField) -> Self {
        let cells = roster
            .iter()
            .map(|entry| {
                let cell = ScoreCell {
                    detail_id: entry.detail_id.clone().filter(|d| !d.is_empty()),
                    value: field.read(entry),
                };
                (entry.person_key.clone(), cell)
            })
            .collect();
        Self { field, cells }
    }

    pub fn field(&self) -> ScoreField {
        self.field
    }

    pub fn is_editable(&self, key: &ParticipantRef) -> bool {
        self.cells
            .get(key)
            .is_some_and(|cell| cell.detail_id.is_some())
    }

    pub fn value(&self, key: &ParticipantRef) -> Option<f64> {
        self.cells.get(key).and_then(|cell| cell.value)
    }

    /// 录入成绩，返回截断后的值
    ///
    /// 不在名单中的人返回 `UnknownParticipant`，在名单中但没有 detailId 返回 `ScoreNotEditable`
    pub fn set(&mut self, key: &ParticipantRef, value: Option<f64>) -> Result<Option<f64>, WorkflowError> {
        let field = self.field;
        let cell = self
            .cells
            .get_mut(key)
            .ok_or_else(|| WorkflowError::UnknownParticipant(key.key()))?;
        if cell.detail_id.is_none() {
            return Err(WorkflowError::ScoreNotEditable { key: key.key() });
        }
        cell.value = value.and_then(|v| field.clamp(v));
        Ok(cell.value)
    }

    /// 仍被勾选且有 detailId 的行
    pub fn rows_for(&self, selection: &Selection) -> Vec<ScoreRow> {
        self.cells
            .iter()
            .filter(|(key, _)| selection.contains(key))
            .filter_map(|(_, cell)| {
                cell.detail_id.as_ref().map(|detail_id| ScoreRow {
                    detail_id: detail_id.clone(),
                    field: self.field,
                    value: cell.value,
                })
            })
            .collect()
    }
}

/// 候选行 + 筛选 + 勾选
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterBoard {
    pub rows: Vec<CandidateRow>,
    pub filter: RowFilter,
    pub selection: Selection,
}

impl RosterBoard {
    pub fn visible_rows(&self) -> impl Iterator<Item = &CandidateRow> {
        self.rows.iter().filter(|row| self.filter.matches(row))
    }

    pub fn visible_keys(&self) -> Vec<ParticipantRef> {
        self.visible_rows().map(|row| row.key.clone()).collect()
    }

    pub fn toggle(&mut self, key: &ParticipantRef) {
        self.selection.toggle(key);
    }

    pub fn toggle_all_visible(&mut self) {
        let visible = self.visible_keys();
        self.selection.toggle_all_visible(&visible);
    }

    pub fn header_state(&self) -> HeaderState {
        self.selection.header_state(&self.visible_keys())
    }
}

/// 管理视图
#[derive(Debug, Clone, PartialEq)]
pub struct ManageView {
    pub exam: Exam,
    pub assigned: BTreeSet<ParticipantRef>,
    pub board: RosterBoard,
}

impl ManageView {
    pub fn diff(&self) -> RosterDiff {
        RosterDiff::compute(&self.assigned, &self.board.selection)
    }
}

/// 编辑视图
#[derive(Debug, Clone, PartialEq)]
pub struct EditView {
    pub exam: Exam,
    pub title: String,
    pub board: RosterBoard,
    pub scores: ScoreSheet,
}

/// 编辑保存的结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditOutcome {
    pub title_updated: bool,
    pub synced: ParticipantIds,
    pub scores_sent: usize,
}

/// 名单协调器
#[derive(Clone, Debug)]
pub struct RosterReconciler {
    exams: ExamService,
    enrollments: EnrollmentService,
    interested: InterestedService,
    interested_pool_limit: u64,
}

impl RosterReconciler {
    pub fn new(
        exams: ExamService,
        enrollments: EnrollmentService,
        interested: InterestedService,
        interested_pool_limit: u64,
    ) -> Self {
        Self {
            exams,
            enrollments,
            interested,
            interested_pool_limit,
        }
    }

    /// 候选人：同周期、同授课方式的在读学生；模拟考再加上同周期的意向学员
    pub async fn load_pool(
        &self,
        cycle_id: &str,
        modality: Modality,
        exam_type: ExamType,
        assigned: &BTreeSet<ParticipantRef>,
    ) -> AppResult<Vec<CandidateRow>> {
        let actives = self
            .enrollments
            .list_actives(&ActiveFilter::for_exam(cycle_id, modality))
            .await?;
        let mut rows: Vec<CandidateRow> = actives.iter().map(CandidateRow::from_enrollment).collect();

        if exam_type.admits_interested() {
            let page = self
                .interested
                .list_page(1, self.interested_pool_limit)
                .await?;
            rows.extend(
                page.data
                    .iter()
                    .filter(|person| person.effective_cycle_id() == Some(cycle_id))
                    .map(CandidateRow::from_interested),
            );
        }

        // 同一学生可能有多条在读报名
        let mut seen = HashSet::new();
        rows.retain(|row| seen.insert(row.key.clone()));
        for row in &mut rows {
            row.assigned = assigned.contains(&row.key);
        }

        debug!("👥 候选人 {} 名 (周期 {})", rows.len(), cycle_id);
        Ok(rows)
    }

    async fn load_exam(&self, exam_id: &str) -> AppResult<(Exam, Vec<RosterEntry>)> {
        let exam = self.exams.get_by_id(exam_id).await?;
        let roster = self.exams.roster(exam_id).await?;
        Ok((exam, roster))
    }

    /// 管理视图：勾选集合预置为已分配集合，取消勾选即移除
    pub async fn load_manage(&self, exam_id: &str) -> AppResult<ManageView> {
        let (exam, roster) = self.load_exam(exam_id).await?;
        let assigned: BTreeSet<ParticipantRef> =
            roster.iter().map(|r| r.person_key.clone()).collect();
        let rows = self
            .load_pool(&exam.cycle_id, exam.modality, exam.exam_type, &assigned)
            .await?;

        Ok(ManageView {
            exam,
            board: RosterBoard {
                rows,
                filter: RowFilter::default(),
                selection: assigned.iter().cloned().collect(),
            },
            assigned,
        })
    }

    /// 提交管理视图的增删；两边都为空时不发请求
    pub async fn apply_manage(&self, view: &ManageView) -> AppResult<RosterDiff> {
        let diff = view.diff();
        if diff.is_noop() {
            info!("考试 {} 名单无变化，跳过", view.exam.id);
            return Ok(diff);
        }
        if !diff.to_add.is_empty() {
            self.exams
                .add_participants(&view.exam.id, &diff.to_add)
                .await?;
        }
        if !diff.to_remove.is_empty() {
            self.exams
                .remove_participants(&view.exam.id, &diff.to_remove)
                .await?;
        }
        Ok(diff)
    }

    pub async fn load_edit(&self, exam_id: &str) -> AppResult<EditView> {
        let (exam, roster) = self.load_exam(exam_id).await?;
        let assigned: BTreeSet<ParticipantRef> =
            roster.iter().map(|r| r.person_key.clone()).collect();
        let rows = self
            .load_pool(&exam.cycle_id, exam.modality, exam.exam_type, &assigned)
            .await?;

        Ok(EditView {
            title: exam.title.clone(),
            board: RosterBoard {
                rows,
                filter: RowFilter::default(),
                selection: assigned.into_iter().collect(),
            },
            scores: ScoreSheet::from_roster(&roster, ScoreField::Score),
            exam,
        })
    }

    /// 保存编辑视图：改名 → 整体同步名单 → 提交成绩
    pub async fn save_edit(&self, view: &EditView) -> AppResult<EditOutcome> {
        let exam_id = &view.exam.id;
        let title_updated = self.save_title(&view.exam, &view.title).await?;

        let synced = view.board.selection.to_ids();
        self.exams.sync_participants(exam_id, &synced).await?;

        let rows = view.scores.rows_for(&view.board.selection);
        if !rows.is_empty() {
            self.exams.update_scores(exam_id, &rows).await?;
        }

        Ok(EditOutcome {
            title_updated,
            synced,
            scores_sent: rows.len(),
        })
    }

    /// 标题去空白后非空且有变化才提交
    pub async fn save_title(&self, exam: &Exam, title: &str) -> AppResult<bool> {
        let title = title.trim();
        if title.is_empty() || title == exam.title {
            return Ok(false);
        }
        self.exams.update_title(&exam.id, title).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: &str) -> ParticipantRef {
        ParticipantRef::Student(id.into())
    }

    fn ext(id: &str) -> ParticipantRef {
        ParticipantRef::Interested(id.into())
    }

    fn row(key: ParticipantRef, area: &str, career: &str) -> CandidateRow {
        CandidateRow {
            kind: key.kind(),
            key,
            first_name: "N".into(),
            last_name: "A".into(),
            career_id: Some(career.into()),
            career_name: None,
            area_id: Some(area.into()),
            assigned: false,
        }
    }

    /// 测试差集互不重叠且与集合运算一致
    #[test]
    fn test_diff_is_set_difference() {
        let assigned: BTreeSet<_> = [s("1"), s("2"), ext("9")].into_iter().collect();
        let selected: Selection = [s("2"), s("3"), ext("7")].into_iter().collect();

        let diff = RosterDiff::compute(&assigned, &selected);
        assert_eq!(diff.to_add.student_ids, vec!["3"]);
        assert_eq!(diff.to_add.interested_ids, vec!["7"]);
        assert_eq!(diff.to_remove.student_ids, vec!["1"]);
        assert_eq!(diff.to_remove.interested_ids, vec!["9"]);

        for id in &diff.to_add.student_ids {
            assert!(!diff.to_remove.student_ids.contains(id));
        }
    }

    #[test]
    fn test_diff_noop_when_unchanged() {
        let assigned: BTreeSet<_> = [s("1"), ext("2")].into_iter().collect();
        let selected: Selection = assigned.iter().cloned().collect();
        assert!(RosterDiff::compute(&assigned, &selected).is_noop());
    }

    /// 测试全选只作用于可见行
    #[test]
    fn test_toggle_all_touches_only_visible_rows() {
        let mut board = RosterBoard {
            rows: vec![
                row(s("1"), "a1", "c1"),
                row(s("2"), "a1", "c2"),
                row(ext("3"), "a2", "c3"),
            ],
            ..Default::default()
        };
        board.toggle(&ext("3"));
        board.filter.set_area(Some("a1".into()));

        assert_eq!(board.header_state(), HeaderState::Unchecked);
        board.toggle(&s("1"));
        assert_eq!(board.header_state(), HeaderState::Indeterminate);

        board.toggle_all_visible();
        assert_eq!(board.header_state(), HeaderState::Checked);
        assert!(board.selection.contains(&ext("3")));

        board.toggle_all_visible();
        assert_eq!(board.header_state(), HeaderState::Unchecked);
        assert!(board.selection.contains(&ext("3")));
        assert_eq!(board.selection.len(), 1);
    }

    #[test]
    fn test_header_unchecked_when_nothing_visible() {
        let mut selection = Selection::new();
        assert_eq!(selection.header_state(&[]), HeaderState::Unchecked);
        selection.toggle_all_visible(&[]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_area_change_clears_career_filter() {
        let mut filter = RowFilter::default();
        filter.set_area(Some("a1".into()));
        filter.set_career(Some("c2".into()));
        assert!(!filter.matches(&row(s("1"), "a1", "c1")));
        filter.set_area(Some("a1".into()));
        assert!(filter.matches(&row(s("1"), "a1", "c1")));
        filter.set_area(Some(String::new()));
        assert_eq!(filter, RowFilter::default());
    }

    #[test]
    fn test_score_clamping_ranges() {
        assert_eq!(ScoreField::GoodAnswers.clamp(150.0), Some(100.0));
        assert_eq!(ScoreField::Score.clamp(-3.0), Some(0.0));
        assert_eq!(ScoreField::Score.clamp(17.5), Some(17.5));
        assert_eq!(ScoreField::TotalScore.clamp(401.0), Some(400.0));
        assert_eq!(ScoreField::WrongAnswers.clamp(f64::NAN), None);
    }

    fn roster_entry(key: ParticipantRef, detail: Option<&str>, score: Option<f64>) -> RosterEntry {
        RosterEntry {
            kind: key.kind(),
            person_key: key,
            detail_id: detail.map(str::to_string),
            first_name: "N".into(),
            last_name: "A".into(),
            career_name: None,
            score,
            good_answers: None,
            wrong_answers: None,
            total_score: None,
        }
    }

    /// 测试没有 detailId 的行不能录入成绩
    #[test]
    fn test_score_requires_detail_id() {
        let roster = vec![
            roster_entry(s("1"), Some("d1"), Some(12.0)),
            roster_entry(ext("2"), None, None),
        ];
        let mut sheet = ScoreSheet::from_roster(&roster, ScoreField::Score);

        assert!(sheet.is_editable(&s("1")));
        assert!(!sheet.is_editable(&ext("2")));
        assert!(!sheet.is_editable(&s("new")));

        assert_eq!(sheet.set(&s("1"), Some(35.0)), Ok(Some(20.0)));
        assert_eq!(
            sheet.set(&ext("2"), Some(10.0)),
            Err(WorkflowError::ScoreNotEditable { key: "ext-2".into() })
        );
        assert_eq!(
            sheet.set(&s("new"), Some(10.0)),
            Err(WorkflowError::UnknownParticipant("new".into()))
        );
    }

    /// 测试非 score 字段的成绩表读取并提交对应字段
    #[test]
    fn test_good_answers_sheet_sends_its_own_key() {
        let mut entry = roster_entry(s("1"), Some("d1"), Some(12.0));
        entry.good_answers = Some(40.0);
        let mut sheet = ScoreSheet::from_roster(&[entry], ScoreField::GoodAnswers);
        assert_eq!(sheet.value(&s("1")), Some(40.0));

        assert_eq!(sheet.set(&s("1"), Some(150.0)), Ok(Some(100.0)));
        let selection: Selection = [s("1")].into_iter().collect();
        let json = serde_json::to_value(sheet.rows_for(&selection)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "detailId": "d1", "goodAnswers": 100.0 }])
        );
    }

    #[test]
    fn test_score_rows_follow_selection() {
        let roster = vec![
            roster_entry(s("1"), Some("d1"), Some(12.0)),
            roster_entry(s("2"), Some("d2"), None),
            roster_entry(ext("3"), None, Some(5.0)),
        ];
        let sheet = ScoreSheet::from_roster(&roster, ScoreField::Score);
        let selection: Selection = [s("1"), ext("3"), s("9")].into_iter().collect();

        let rows = sheet.rows_for(&selection);
        assert_eq!(
            rows,
            vec![ScoreRow {
                detail_id: "d1".into(),
                field: ScoreField::Score,
                value: Some(12.0)
            }]
        );
    }
}
