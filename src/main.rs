// ==========================================
// 服装生产排产系统 - 命令行入口
// ==========================================
// 用途: 初始化数据库 / 导入订单文件 / 查看待排池
// 排产交互由看板界面承载, 本入口只做数据准备
// ==========================================

use anyhow::{bail, Context, Result};
use garment_aps::board::{SchedulePersistence, SqlitePersistence};
use garment_aps::importer::{FileOrderSource, OrderSource};
use garment_aps::{db, logging};
use std::sync::{Arc, Mutex};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("用法: garment-aps <db_path> init");
        eprintln!("      garment-aps <db_path> import <orders.csv|orders.xlsx>");
        eprintln!("      garment-aps <db_path> pending");
        bail!("参数不足");
    }

    let db_path = &args[1];
    let command = args[2].as_str();

    let conn = db::open_sqlite_connection(db_path)
        .with_context(|| format!("打开数据库失败: {}", db_path))?;
    db::init_schema(&conn).context("初始化 schema 失败")?;
    let conn = Arc::new(Mutex::new(conn));
    let persistence = SqlitePersistence::from_connection(conn);

    match command {
        "init" => {
            info!(db_path, "数据库初始化完成");
        }
        "import" => {
            let file = args.get(3).context("缺少导入文件路径")?;
            let source = FileOrderSource::new(file);
            let report = source.fetch_pending_orders().await?;

            for order in &report.orders {
                persistence.save_order(order).await?;
            }
            info!(
                imported = report.orders.len(),
                skipped = report.skipped.len(),
                "订单导入完成"
            );
            for (row, reason) in &report.skipped {
                println!("跳过第 {} 行: {}", row, reason);
            }
        }
        "pending" => {
            let orders = persistence.load_orders().await?;
            for order in orders.iter().filter(|o| !o.is_scheduled()) {
                println!(
                    "{}\t{}\t{}件\tSMV={}",
                    order.po_number,
                    order.style_name.as_deref().unwrap_or("-"),
                    order.order_quantity,
                    order.smv
                );
            }
        }
        other => bail!("未知命令: {}", other),
    }

    Ok(())
}
