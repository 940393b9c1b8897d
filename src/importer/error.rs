// ==========================================
// 服装生产排产系统 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入层错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的文件格式: {0}")]
    UnsupportedFormat(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    #[error("字段值错误 (row={row}, field={field}): {message}")]
    FieldValueError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
