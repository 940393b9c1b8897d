// ==========================================
// 服装生产排产系统 - 产线领域模型
// ==========================================
// capacity: 100% 效率下的日产件数基准
// seq_no: 看板展示顺序 = 默认落位优先级, 与历史分配无关
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductionLine - 生产线
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLine {
    pub line_id: String,          // 产线ID
    pub name: String,             // 产线名称
    pub capacity: i64,            // 日产能 (件/天, 100% 效率基准)
    pub group_id: Option<String>, // 分组 (仅用于看板分组展示)
    pub seq_no: i32,              // 展示顺序
}

impl ProductionLine {
    pub fn new(line_id: &str, name: &str, capacity: i64, seq_no: i32) -> Self {
        Self {
            line_id: line_id.to_string(),
            name: name.to_string(),
            capacity,
            group_id: None,
            seq_no,
        }
    }
}
