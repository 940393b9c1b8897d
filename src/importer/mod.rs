// ==========================================
// 服装生产排产系统 - 导入层
// ==========================================
// 职责: 外部表格数据 -> 待排订单
// ==========================================

pub mod error;
pub mod file_parser;
pub mod order_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{parser_for, CsvParser, ExcelParser, FileParser};
pub use order_importer::{FileOrderSource, OrderImportReport, OrderImporter, OrderSource};
