// ==========================================
// 便利店智能补货系统 - 批次主入口
// ==========================================
// 依据: AutoOrder_Master_Spec.md
// 技术栈: Rust + SQLite
// 系统定位: 每日每店单品订货量决策引擎
// ==========================================

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};

use cvs_auto_order::{logging, OrderApi, APP_NAME, VERSION};

/// 命令行参数: <db_path> <store_id> [target_date] [--items <file>] [--export <csv_path>]
struct CliArgs {
    db_path: String,
    store_id: String,
    target_date: NaiveDate,
    /// 单品清单文件（每行一个代码）;缺省为门店全部单品
    items_path: Option<PathBuf>,
    export_path: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        return Err(
            "用法: cvs-auto-order <db_path> <store_id> [target_date] [--items <file>] [--export <csv_path>]"
                .to_string(),
        );
    }

    let db_path = args[0].clone();
    let store_id = args[1].clone();

    let mut target_date = Local::now().date_naive();
    let mut items_path = None;
    let mut export_path = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--items" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--items 需要路径参数".to_string())?;
                items_path = Some(PathBuf::from(path));
                i += 2;
            }
            "--export" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--export 需要路径参数".to_string())?;
                export_path = Some(PathBuf::from(path));
                i += 2;
            }
            other => {
                target_date = NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .map_err(|_| format!("目标日期格式错误: {other}（期望 YYYY-MM-DD）"))?;
                i += 1;
            }
        }
    }

    Ok(CliArgs {
        db_path,
        store_id,
        target_date,
        items_path,
        export_path,
    })
}

/// 读取单品清单文件（忽略空行与 # 注释行）
fn read_item_list(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("单品清单读取失败 {}: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 订货决策引擎", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("使用数据库: {}", args.db_path);
    tracing::info!("门店: {} / 目标日: {}", args.store_id, args.target_date);

    let api = match OrderApi::new(&args.db_path, &args.store_id) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("初始化失败: {e}");
            return ExitCode::FAILURE;
        }
    };

    let item_codes = match &args.items_path {
        Some(path) => match read_item_list(path) {
            Ok(codes) => {
                tracing::info!("单品清单: {}（{} 个）", path.display(), codes.len());
                Some(codes)
            }
            Err(msg) => {
                tracing::error!("{msg}");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let (summary, results) =
        match api.run_batch(args.target_date, item_codes, HashMap::new(), HashMap::new()) {
            Ok(out) => out,
            Err(e) => {
                tracing::error!("批次执行失败: {e}");
                return ExitCode::FAILURE;
            }
        };

    tracing::info!("==================================================");
    tracing::info!("配置版本: {}", summary.config_version);
    tracing::info!(
        "单品 {} / 决策 {} / 订货行 {} / 订货总量 {}",
        summary.total_items,
        summary.predicted,
        summary.order_lines,
        summary.total_order_qty
    );
    if !summary.failed_items.is_empty() {
        tracing::warn!("失败单品 {} 个:", summary.failed_items.len());
        for (item_code, reason) in &summary.failed_items {
            tracing::warn!("  {item_code}: {reason}");
        }
    }
    tracing::info!("==================================================");

    if let Some(path) = args.export_path {
        match api.export_order_sheet(&results, &path) {
            Ok(lines) => tracing::info!("订货单已导出: {}（{} 行）", path.display(), lines),
            Err(e) => {
                tracing::error!("订货单导出失败: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
