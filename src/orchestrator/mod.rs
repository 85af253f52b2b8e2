//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描 `ca/`、`pca/`、`semester/` 子目录（Vec<DocumentCtx>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 调用 DocumentFlow
//! - 失败时写 warn.txt
//! - 清理输入文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<DocumentCtx>)
//!     ↓
//! document_processor (处理单个文档)
//!     ↓
//! workflow::DocumentFlow (读取 → 提取 → 写入)
//!     ↓
//! services (能力层：normalizer / extractor / table / summary / writer)
//! ```

pub mod batch_processor;
pub mod document_processor;

pub use batch_processor::{scan_documents, App, ProcessingStats};
pub use document_processor::process_document;
