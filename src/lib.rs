//! # Marksheet Extract
//!
//! 把 OCR 识别出的成绩单文本 / HTML 表格 / 学期汇总 PDF 转成结构化 JSON 记录
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - `Pipeline`、`Mark`、`PaperRecord`、`TableRecord`、`SemesterSummary`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，都是无状态的纯函数或单一能力
//! - `text_normalizer` - 括号 / 逗号纠正、去掉页码噪声
//! - `field_extractor` - 课程代码匹配、CA / PCA 字段切分
//! - `mark_sanitizer` - 分数清洗
//! - `table_parser` - HTML 表格 → 记录
//! - `summary_extractor` - 学期汇总提取
//! - `JsonWriter` / `WarnWriter` - 写结果 / 写 warn.txt
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整处理流程
//! - `parse_marks` - 两状态的逐行解析器
//! - `DocumentCtx` - 上下文封装（索引 + 类型 + 路径）
//! - `DocumentFlow` - 流程编排（读取 → 提取 → 写入）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//! - `orchestrator/document_processor` - 单个文档处理器，负责兜底和清理
//!
//! ## 模块结构

pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Mark, PaperRecord, Pipeline, SemesterSummary, TableRecord};
pub use orchestrator::{App, ProcessingStats};
pub use services::{extract_summary, parse_table, parse_table_rows, sanitize_mark};
pub use workflow::{parse_marks, DocumentCtx, DocumentFlow, DocumentKind, ProcessOutcome};
