//! 成绩清洗 - 业务能力层
//!
//! 把一个原始成绩片段转换为 缺考 / 整数 / 小数 / 无法识别 四种之一

use crate::models::Mark;

/// 清洗单个成绩片段
///
/// # 参数
/// - `token`: 原始片段，可能不存在
///
/// # 返回
/// - `Some(Mark::Absent)`：忽略大小写的 "A"
/// - `Some(Mark::Decimal)`：含 `.` 且能解析为小数
/// - `Some(Mark::Integer)`：不含 `.` 且能解析为整数
/// - `None`：空白或无法解析
pub fn sanitize_mark(token: Option<&str>) -> Option<Mark> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }

    if token.eq_ignore_ascii_case("a") {
        return Some(Mark::Absent);
    }

    if token.contains('.') {
        token.parse::<f64>().ok().filter(|v| v.is_finite()).map(Mark::Decimal)
    } else {
        token.parse::<i64>().ok().map(Mark::Integer)
    }
}
