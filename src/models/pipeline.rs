/// 成绩单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// 平时成绩（CA1–CA4）
    Ca,
    /// 实践平时成绩（PCA1–PCA2）
    Pca,
}

/// 别名表：目录名、旧接口路由名都映射到对应类型
static PIPELINE_ALIASES: phf::Map<&'static str, Pipeline> = phf::phf_map! {
    "ca" => Pipeline::Ca,
    "ca_marks" => Pipeline::Ca,
    "process_ca_marks" => Pipeline::Ca,
    "pca" => Pipeline::Pca,
    "pca_marks" => Pipeline::Pca,
    "process_pca_marks" => Pipeline::Pca,
};

impl Pipeline {
    /// 成绩字段名（按列顺序）
    pub fn mark_fields(self) -> &'static [&'static str] {
        match self {
            Pipeline::Ca => &["ca1", "ca2", "ca3", "ca4"],
            Pipeline::Pca => &["pca1", "pca2"],
        }
    }

    /// 成绩字段个数
    pub fn arity(self) -> usize {
        self.mark_fields().len()
    }

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            Pipeline::Ca => "CA",
            Pipeline::Pca => "PCA",
        }
    }

    /// 从目录名或路由名解析类型（忽略大小写）
    pub fn find(s: &str) -> Option<Self> {
        PIPELINE_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
