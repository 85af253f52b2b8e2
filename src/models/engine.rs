use serde::Deserialize;

/// OCR / 表格识别引擎的单页结果（只保留表格部分）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnginePage {
    #[serde(default)]
    pub table_res_list: Vec<EngineTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineTable {
    #[serde(default)]
    pub pred_html: String,
}

/// 引擎结果文件：单页对象或多页数组
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EngineOutput {
    Pages(Vec<EnginePage>),
    Page(EnginePage),
}

impl EngineOutput {
    /// 第一页的第一张表格 HTML
    pub fn first_table_html(&self) -> Option<&str> {
        let page = match self {
            EngineOutput::Pages(pages) => pages.first()?,
            EngineOutput::Page(page) => page,
        };
        page.table_res_list
            .first()
            .map(|table| table.pred_html.as_str())
            .filter(|html| !html.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_table_from_page_array() {
        let output: EngineOutput = serde_json::from_str(
            r#"[{"table_res_list": [{"pred_html": "<table></table>"}]}, {"table_res_list": []}]"#,
        )
        .unwrap();
        assert_eq!(output.first_table_html(), Some("<table></table>"));
    }

    #[test]
    fn test_missing_table_list() {
        let output: EngineOutput = serde_json::from_str(r#"{"input_path": "a.png"}"#).unwrap();
        assert_eq!(output.first_table_html(), None);

        let output: EngineOutput = serde_json::from_str("[]").unwrap();
        assert_eq!(output.first_table_html(), None);
    }
}
