// ==========================================
// 订货预测编排器集成测试
// ==========================================
// 职责: 验证 库存裁决 → 需求估计 → 系数管线 → 品类策略
//       → 订货量求解 的端到端数据流转
// ==========================================


use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;

use cvs_auto_order::{EngineConfig, OrderPredictor, SkipReason, StockSource};
use test_helpers::*;

const STORE: &str = "S001";

/// 目标日 2024-06-05（周三）,销售窗口终点为前一天
fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
}

fn window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()
}

fn predictor_on(db_path: &str) -> OrderPredictor {
    let conn = Connection::open(db_path).unwrap();
    OrderPredictor::new(
        Arc::new(Mutex::new(conn)),
        STORE,
        target_date(),
        EngineConfig::default(),
    )
}

#[test]
fn test_steady_seller_produces_order() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "A1", "乌龙茶 500ml", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "A1", window_end(), 30, 5.0, 10.0).unwrap();
        insert_live_inventory(&conn, STORE, "A1", 3.0, 0.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let result = predictor.predict("A1").unwrap().unwrap();

    // 日销 5、库存 3: 必然产生订货
    assert!(result.order_qty > 0);
    assert_eq!(result.stock_source, StockSource::LiveFresh);
    assert!(!result.stock_is_stale);
    assert_eq!(result.data_days, 30);
    assert!(result.raw_predicted_qty > 4.0 && result.raw_predicted_qty < 6.0);
    assert!(result.skip_reason.is_none());
}

#[test]
fn test_massive_overstock_orders_zero() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "B1", "罐装咖啡", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "B1", window_end(), 30, 2.0, 100.0).unwrap();
        insert_live_inventory(&conn, STORE, "B1", 100.0, 0.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let result = predictor.predict("B1").unwrap().unwrap();
    assert_eq!(result.order_qty, 0);
}

#[test]
fn test_unknown_item_returns_none() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let predictor = predictor_on(&db_path);
    assert!(predictor.predict("NO_SUCH_ITEM").unwrap().is_none());
}

#[test]
fn test_repeat_prediction_is_idempotent() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "A1", "乌龙茶 500ml", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "A1", window_end(), 30, 5.0, 10.0).unwrap();
        insert_live_inventory(&conn, STORE, "A1", 3.0, 0.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let first = predictor.predict("A1").unwrap().unwrap();
    let second = predictor.predict("A1").unwrap().unwrap();

    // 同输入重复执行: 决策一致,仅标识与时刻不同
    assert_eq!(first.order_qty, second.order_qty);
    assert_eq!(first.adjusted_qty, second.adjusted_qty);
    assert_eq!(first.safety_stock, second.safety_stock);
    assert_ne!(first.prediction_id, second.prediction_id);
}

#[test]
fn test_cut_item_is_skipped() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "C1", "下架中商品", 160, 120, 1).unwrap();
        insert_steady_sales(&conn, STORE, "C1", window_end(), 30, 4.0, 2.0).unwrap();
        insert_live_inventory(&conn, STORE, "C1", 1.0, 0.0).unwrap();
        mark_cut_item(&conn, STORE, "C1").unwrap();
    }

    let predictor = predictor_on(&db_path);
    let result = predictor.predict("C1").unwrap().unwrap();
    assert_eq!(result.skip_reason, Some(SkipReason::CutItem));
    assert_eq!(result.order_qty, 0);
}

#[test]
fn test_explicit_stock_override_wins_over_live() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "A1", "乌龙茶 500ml", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "A1", window_end(), 30, 5.0, 10.0).unwrap();
        insert_live_inventory(&conn, STORE, "A1", 50.0, 0.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let mut stock_overrides = HashMap::new();
    stock_overrides.insert("A1".to_string(), 0.0);
    let ctx = predictor
        .build_context(stock_overrides, HashMap::new())
        .unwrap();
    let result = predictor.predict_item("A1", &ctx).unwrap().unwrap();

    assert_eq!(result.stock_source, StockSource::ExplicitCache);
    assert_eq!(result.current_stock, 0.0);
    // 实时快照 50 会抑制订货,显式缓存 0 必然订货
    assert!(result.order_qty > 0);
}

#[test]
fn test_batch_skips_unknown_and_continues() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "A1", "乌龙茶 500ml", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "A1", window_end(), 30, 5.0, 10.0).unwrap();
        insert_live_inventory(&conn, STORE, "A1", 3.0, 0.0).unwrap();

        insert_product(&conn, STORE, "B1", "罐装咖啡", 520, 180, 1).unwrap();
        insert_steady_sales(&conn, STORE, "B1", window_end(), 30, 2.0, 100.0).unwrap();
        insert_live_inventory(&conn, STORE, "B1", 100.0, 0.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let outcome = predictor
        .predict_batch(
            Some(vec![
                "A1".to_string(),
                "NO_SUCH_ITEM".to_string(),
                "B1".to_string(),
            ]),
            HashMap::new(),
            HashMap::new(),
        )
        .unwrap();

    // 主数据缺失只跳过,不算失败
    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.failed_items.is_empty());
    assert_eq!(outcome.results.iter().filter(|r| r.has_order()).count(), 1);
}

#[test]
fn test_tobacco_cap_exceeded_skips() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "T1", "红塔山", 900, 365, 1).unwrap();
        insert_steady_sales(&conn, STORE, "T1", window_end(), 30, 2.0, 28.0).unwrap();
        insert_live_inventory(&conn, STORE, "T1", 28.0, 5.0).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let result = predictor.predict("T1").unwrap().unwrap();
    // 库存 28 + 预定 5 超过硬性上限 30
    assert_eq!(result.skip_reason, Some(SkipReason::StockCapExceeded));
    assert_eq!(result.order_qty, 0);
}

#[test]
fn test_no_sales_history_yields_zero_demand() {
    let (_tmp, db_path) = create_test_db().unwrap();
    {
        let conn = Connection::open(&db_path).unwrap();
        insert_product(&conn, STORE, "N1", "新商品", 520, 180, 1).unwrap();
    }

    let predictor = predictor_on(&db_path);
    let result = predictor.predict("N1").unwrap().unwrap();
    assert_eq!(result.raw_predicted_qty, 0.0);
    assert_eq!(result.data_days, 0);
    assert_eq!(result.order_qty, 0);
}
