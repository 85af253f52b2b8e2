use serde::{Serialize, Serializer};

/// 单项成绩
///
/// 无法识别的成绩不在这里表示，而是用 `Option<Mark>` 的 `None`（序列化为 `null`）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mark {
    /// 缺考标记 "A"
    Absent,
    /// 整数成绩
    Integer(i64),
    /// 小数成绩
    Decimal(f64),
}

impl Serialize for Mark {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Mark::Absent => serializer.serialize_str("A"),
            Mark::Integer(v) => serializer.serialize_i64(*v),
            Mark::Decimal(v) => serializer.serialize_f64(*v),
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::Absent => write!(f, "A"),
            Mark::Integer(v) => write!(f, "{}", v),
            Mark::Decimal(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_forms() {
        let marks = vec![
            Some(Mark::Absent),
            Some(Mark::Integer(9)),
            Some(Mark::Decimal(7.5)),
            None,
        ];
        assert_eq!(serde_json::to_value(&marks).unwrap(), json!(["A", 9, 7.5, null]));
    }
}
