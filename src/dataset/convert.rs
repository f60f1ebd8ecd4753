//! フィクスチャ変換
//!
//! 上流のインベントリ調整エクスポートをベンチマーク用の
//! ペアレコード形式へ変換する（1回限りの整形処理）。
//! 値のコピーが中心で、判定ロジックはmatch_statusの導出のみ。

use crate::error::{Result, RoomBenchError};
use serde_json::{json, Value};
use std::path::Path;

/// 上流エクスポート全体をペアレコード配列へ変換
pub fn transform_upstream(input: &Value) -> Vec<Value> {
    let entries = match input.as_array() {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    let mut output = Vec::new();

    for entry in entries {
        let hotel_id = entry.get("hotel_id").cloned().unwrap_or(json!("N/A"));
        // ホテル名は上流データに存在しないためプレースホルダ
        let hotel_name = "N/A";

        let adjustments = entry
            .get("chosen_inventory_adjustment")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for item in adjustments {
            let tvl = build_tvl_side(entry, item);
            let competitor = build_competitor_side(item);
            let match_status = derive_match_status(item, &tvl, &competitor);

            output.push(json!({
                "hotel_id": hotel_id,
                "hotel_name": hotel_name,
                "match_status": match_status,
                "tvl": tvl,
                "competitor": competitor,
                "notes": ""
            }));
        }
    }

    output
}

fn build_tvl_side(entry: &Value, item: &Value) -> Value {
    let pricing = entry.get("pricing_spec");
    let max_occupancy = int_field(pricing, "num_of_adults")
        + int_field(pricing, "num_of_children")
        + int_field(pricing, "num_of_infants");

    json!({
        "hard_metrics": {
            "room_size": item.get("room_size").cloned().unwrap_or(Value::Null)
        },
        "soft_metrics": {
            // 上流データに客室名がないためプレースホルダ
            "room_group_name": "N/A",
            "bed_type": item.get("bed_type").cloned().unwrap_or(Value::Null),
            "max_occupancy": max_occupancy,
            "amenities": {
                "is_with_breakfast": bool_field(item, "is_with_breakfast"),
                "is_refundable": bool_field(item, "is_refundable"),
                "cancellation_policy_code": item
                    .get("cancellation_policy_code")
                    .cloned()
                    .unwrap_or(json!(""))
            },
            "view": ""
        }
    })
}

fn build_competitor_side(item: &Value) -> Value {
    let room_match = item.get("ninja_room_match").cloned().unwrap_or(json!({}));

    json!({
        "hard_metrics": {
            "room_size": room_match.get("room_size").cloned().unwrap_or(Value::Null)
        },
        "soft_metrics": {
            "room_group_name": room_match
                .get("chosen_competitor_room_name")
                .cloned()
                .unwrap_or(Value::Null),
            "bed_type": room_match.get("bed_type").cloned().unwrap_or(Value::Null),
            // 競合側の定員は上流に存在しない
            "max_occupancy": Value::Null,
            "amenities": {
                "is_with_breakfast": bool_field(&room_match, "competitor_is_with_breakfast"),
                "is_refundable": bool_field(&room_match, "competitor_is_refundable"),
                "cancellation_policy_code": room_match
                    .get("competitor_cancellation_policy_code")
                    .cloned()
                    .unwrap_or(json!(""))
            },
            "view": ""
        }
    })
}

/// match_statusの導出
///
/// - room_size_accuracy_check == "NOT_MATCH" → mismatched
/// - 同チェック欠落時は両サイズが取れて値が異なれば mismatched
/// - それ以外は matched
fn derive_match_status(item: &Value, tvl: &Value, competitor: &Value) -> &'static str {
    match item.get("room_size_accuracy_check").and_then(Value::as_str) {
        Some("NOT_MATCH") => "mismatched",
        Some(_) => "matched",
        None => {
            let tvl_size = lenient_f64(&tvl["hard_metrics"]["room_size"]);
            let comp_size = lenient_f64(&competitor["hard_metrics"]["room_size"]);
            match (tvl_size, comp_size) {
                (Some(a), Some(b)) if a != b => "mismatched",
                _ => "matched",
            }
        }
    }
}

/// 数値または数値文字列をf64へ（変換失敗はNone）
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 整数フィールドの取得（数値・数値文字列を許容、欠落は0）
fn int_field(container: Option<&Value>, key: &str) -> i64 {
    container
        .and_then(|c| c.get(key))
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .unwrap_or(0)
}

/// 真偽フィールドの取得（bool または "true"/"True" 文字列を許容）
fn bool_field(container: &Value, key: &str) -> bool {
    match container.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// ファイルを変換して出力（output省略時は標準出力）
pub fn convert_file(input: &Path, output: Option<&Path>) -> Result<usize> {
    if !input.exists() {
        return Err(RoomBenchError::FileNotFound(input.display().to_string()));
    }

    let content = std::fs::read_to_string(input)?;
    let data: Value = serde_json::from_str(&content)?;
    let transformed = transform_upstream(&data);
    let pretty = serde_json::to_string_pretty(&transformed)?;

    match output {
        Some(path) => std::fs::write(path, pretty)?,
        None => println!("{}", pretty),
    }

    Ok(transformed.len())
}
