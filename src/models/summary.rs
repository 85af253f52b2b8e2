use serde::{Deserialize, Serialize};

/// 学期成绩汇总文档的提取结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub sgpa: Option<String>,
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<SubjectGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credit_points: Option<f64>,
}

impl SemesterSummary {
    /// 没有提取到任何字段
    pub fn is_empty(&self) -> bool {
        self.sgpa.is_none()
            && self.result.is_none()
            && self.name.is_none()
            && self.roll_no.is_none()
            && self.registration_no.is_none()
            && self.subjects.is_empty()
    }
}

/// 成绩表中的一门课程
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject_code: String,
    pub subject_name: String,
    pub grade: String,
    pub grade_points: String,
    pub credit: String,
    pub credit_points: String,
}
