// ==========================================
// 服装生产排产系统 - 订单导入器
// ==========================================
// 职责: 把表格行记录映射为待排订单
// 规则:
// - 必需列: PO号 / 件数 / SMV
// - 件数与 SMV 必须为正, 否则整行跳过并记录原因
// - 已带计划起止日期的行视为已预排产, 不进入待排池
// ==========================================

use crate::domain::order::Order;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::parser_for;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

// ===== 列名 (兼容常见别名) =====
const COL_PO_NUMBER: &[&str] = &["PO Number", "PO", "po_number"];
const COL_STYLE: &[&str] = &["Style", "Style Name", "style_name"];
const COL_QUANTITY: &[&str] = &["Quantity", "Order Quantity", "order_quantity"];
const COL_SMV: &[&str] = &["SMV", "smv"];
const COL_MO_COUNT: &[&str] = &["MO Count", "mo_count"];
const COL_CUT_QUANTITY: &[&str] = &["Cut Quantity", "cut_quantity"];
const COL_ISSUE_QUANTITY: &[&str] = &["Issue Quantity", "issue_quantity"];
const COL_PLAN_START: &[&str] = &["Plan Start", "plan_start_date"];
const COL_PLAN_END: &[&str] = &["Plan End", "plan_end_date"];

// ==========================================
// OrderImportReport - 导入结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct OrderImportReport {
    pub orders: Vec<Order>,
    /// (行号 1-based, 跳过原因)
    pub skipped: Vec<(usize, String)>,
}

// ==========================================
// OrderSource - 待排订单来源接口
// ==========================================
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// 拉取待排订单 (已预排产的行不返回)
    async fn fetch_pending_orders(&self) -> ImportResult<OrderImportReport>;
}

// ==========================================
// OrderImporter - 行记录映射
// ==========================================
pub struct OrderImporter {
    // 无状态
}

impl OrderImporter {
    pub fn new() -> Self {
        Self {}
    }

    /// 把原始行记录映射为待排订单
    #[instrument(skip(self, records))]
    pub fn map_records(&self, records: &[HashMap<String, String>]) -> OrderImportReport {
        let mut report = OrderImportReport::default();

        for (idx, row) in records.iter().enumerate() {
            let row_no = idx + 1;
            match self.map_single(row_no, row) {
                Ok(Some(order)) => report.orders.push(order),
                Ok(None) => {
                    report
                        .skipped
                        .push((row_no, "已带计划日期, 视为已预排产".to_string()));
                }
                Err(e) => {
                    warn!(row = row_no, error = %e, "导入行跳过");
                    report.skipped.push((row_no, e.to_string()));
                }
            }
        }

        info!(
            imported = report.orders.len(),
            skipped = report.skipped.len(),
            "订单导入映射完成"
        );
        report
    }

    /// 单行映射; Ok(None) 表示该行已预排产
    fn map_single(&self, row_no: usize, row: &HashMap<String, String>) -> ImportResult<Option<Order>> {
        // 已带计划日期的行不进入待排池
        if pick(row, COL_PLAN_START).is_some() || pick(row, COL_PLAN_END).is_some() {
            return Ok(None);
        }

        let po_number = pick(row, COL_PO_NUMBER)
            .ok_or_else(|| ImportError::MissingColumn("PO Number".to_string()))?;

        let quantity = parse_i64(row_no, row, COL_QUANTITY, "Quantity")?;
        if quantity <= 0 {
            return Err(ImportError::FieldValueError {
                row: row_no,
                field: "Quantity".to_string(),
                message: format!("件数必须为正: {}", quantity),
            });
        }

        let smv = parse_f64(row_no, row, COL_SMV, "SMV")?;
        if smv <= 0.0 {
            return Err(ImportError::FieldValueError {
                row: row_no,
                field: "SMV".to_string(),
                message: format!("SMV 必须为正: {}", smv),
            });
        }

        let mut order = Order::new_pending(&po_number, quantity, smv);
        order.style_name = pick(row, COL_STYLE);
        order.mo_count = pick(row, COL_MO_COUNT)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0);
        // cut/issue 为展示字段, 缺省 0, 不参与排产决策
        order.cut_quantity = pick(row, COL_CUT_QUANTITY)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        order.issue_quantity = pick(row, COL_ISSUE_QUANTITY)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);

        Ok(Some(order))
    }
}

impl Default for OrderImporter {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// FileOrderSource - 文件订单来源
// ==========================================
pub struct FileOrderSource {
    path: PathBuf,
    importer: OrderImporter,
}

impl FileOrderSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            importer: OrderImporter::new(),
        }
    }
}

#[async_trait]
impl OrderSource for FileOrderSource {
    async fn fetch_pending_orders(&self) -> ImportResult<OrderImportReport> {
        let parser = parser_for(&self.path)?;
        let records = parser.parse_to_raw_records(&self.path)?;
        Ok(self.importer.map_records(&records))
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 按别名列表取第一个非空列值
fn pick(row: &HashMap<String, String>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|a| row.get(*a))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_i64(
    row_no: usize,
    row: &HashMap<String, String>,
    aliases: &[&str],
    field: &str,
) -> ImportResult<i64> {
    let raw = pick(row, aliases).ok_or_else(|| ImportError::MissingColumn(field.to_string()))?;
    raw.parse::<i64>().map_err(|_| ImportError::FieldValueError {
        row: row_no,
        field: field.to_string(),
        message: format!("无法解析整数: {}", raw),
    })
}

fn parse_f64(
    row_no: usize,
    row: &HashMap<String, String>,
    aliases: &[&str],
    field: &str,
) -> ImportResult<f64> {
    let raw = pick(row, aliases).ok_or_else(|| ImportError::MissingColumn(field.to_string()))?;
    raw.parse::<f64>().map_err(|_| ImportError::FieldValueError {
        row: row_no,
        field: field.to_string(),
        message: format!("无法解析数值: {}", raw),
    })
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::OrderStatus;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_basic_row() {
        let importer = OrderImporter::new();
        let records = vec![row(&[
            ("PO Number", "PO1001"),
            ("Style", "T-Shirt A"),
            ("Quantity", "500"),
            ("SMV", "12.5"),
            ("MO Count", "3"),
        ])];

        let report = importer.map_records(&records);
        assert_eq!(report.orders.len(), 1);
        assert!(report.skipped.is_empty());

        let order = &report.orders[0];
        assert_eq!(order.po_number, "PO1001");
        assert_eq!(order.order_quantity, 500);
        assert_eq!(order.smv, 12.5);
        assert_eq!(order.mo_count, 3);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.cut_quantity, 0); // 缺省 0
    }

    #[test]
    fn test_pre_scheduled_rows_excluded() {
        let importer = OrderImporter::new();
        let records = vec![
            row(&[("PO Number", "PO1"), ("Quantity", "100"), ("SMV", "10")]),
            row(&[
                ("PO Number", "PO2"),
                ("Quantity", "100"),
                ("SMV", "10"),
                ("Plan Start", "2026-03-02"),
            ]),
        ];

        let report = importer.map_records(&records);
        assert_eq!(report.orders.len(), 1);
        assert_eq!(report.orders[0].po_number, "PO1");
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].1.contains("已预排产"));
    }

    #[test]
    fn test_invalid_quantity_and_smv_skipped() {
        let importer = OrderImporter::new();
        let records = vec![
            row(&[("PO Number", "PO1"), ("Quantity", "0"), ("SMV", "10")]),
            row(&[("PO Number", "PO2"), ("Quantity", "100"), ("SMV", "-1")]),
            row(&[("PO Number", "PO3"), ("Quantity", "abc"), ("SMV", "10")]),
        ];

        let report = importer.map_records(&records);
        assert!(report.orders.is_empty());
        assert_eq!(report.skipped.len(), 3);

        // 跳过原因携带真实行号
        assert_eq!(report.skipped[1].0, 2);
        assert!(report.skipped[1].1.contains("row=2"));
        assert!(report.skipped[2].1.contains("row=3"));
    }

    #[test]
    fn test_missing_required_column_skipped() {
        let importer = OrderImporter::new();
        let records = vec![row(&[("Quantity", "100"), ("SMV", "10")])];

        let report = importer.map_records(&records);
        assert!(report.orders.is_empty());
        assert_eq!(report.skipped.len(), 1);
    }
}
