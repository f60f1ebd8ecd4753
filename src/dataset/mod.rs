//! データセット読み込み・前処理
//!
//! ベンチマーク入力JSONの読み込みから、形状チェック、重複除去、
//! ケースID採番、評価窓の切り出しまでを担当する。
//! 形状チェックを通過したレコードだけがコア（戦略・評価）に渡る。

pub mod convert;

use crate::error::{Result, RoomBenchError};
use room_bench_common::PairRecord;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// ケースIDに使うハッシュ先頭文字数
const CASE_ID_CHARS: usize = 12;

/// JSONファイル群から生レコードを読み込む
///
/// 読めないファイルは警告を出してスキップし、残りを連結する。
/// 1件も読めなかった場合のエラー判定は呼び出し側の責務。
pub fn load_raw_records(paths: &[impl AsRef<Path>]) -> Vec<Value> {
    let mut all_records = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match read_record_file(path) {
            Ok(mut records) => all_records.append(&mut records),
            Err(e) => eprintln!("⚠️ 読み込み失敗 {}: {}", path.display(), e),
        }
    }

    all_records
}

fn read_record_file(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(RoomBenchError::DatasetLoad(format!(
            "JSON配列ではありません: {}",
            path.display()
        ))),
    }
}

/// 必須ブロックを欠くレコードを除外する形状チェック
///
/// 通過条件:
/// - tvl / competitor 両ブロックが存在
/// - tvl.hard_metrics に room_size キーが存在
/// - 両側の soft_metrics.room_group_name が非null
pub fn filter_valid_shape(records: Vec<Value>) -> Vec<Value> {
    records.into_iter().filter(has_valid_shape).collect()
}

fn has_valid_shape(record: &Value) -> bool {
    let tvl = match record.get("tvl").and_then(Value::as_object) {
        Some(tvl) => tvl,
        None => return false,
    };
    let competitor = match record.get("competitor").and_then(Value::as_object) {
        Some(competitor) => competitor,
        None => return false,
    };

    let has_room_size = tvl
        .get("hard_metrics")
        .and_then(Value::as_object)
        .map(|hard| hard.contains_key("room_size"))
        .unwrap_or(false);

    has_room_size && has_room_group_name(tvl) && has_room_group_name(competitor)
}

fn has_room_group_name(side: &serde_json::Map<String, Value>) -> bool {
    side.get("soft_metrics")
        .and_then(|soft| soft.get("room_group_name"))
        .map(|name| !name.is_null())
        .unwrap_or(false)
}

/// 正準シリアライズのSHA-256ハッシュ（重複除去キー兼ケースID）
///
/// serde_jsonのMapはキー順にシリアライズされるため、
/// フィールド順だけが違うレコードは同一ハッシュになる。
pub fn canonical_hash(record: &Value) -> String {
    let canonical = serde_json::to_string(record).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// 重複除去（正準形が一致するレコードは先勝ち）
pub fn deduplicate(records: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(canonical_hash(record)))
        .collect()
}

/// 型付きレコードへ変換し、ケースIDを採番する
pub fn to_pair_records(records: Vec<Value>) -> Vec<PairRecord> {
    records
        .into_iter()
        .filter_map(|raw| {
            let case_id: String = canonical_hash(&raw).chars().take(CASE_ID_CHARS).collect();
            let mut record: PairRecord = serde_json::from_value(raw).ok()?;
            record.case_id = case_id;
            Some(record)
        })
        .collect()
}

/// 評価窓の切り出し（start件目からcount件）
pub fn window(records: Vec<PairRecord>, start: usize, count: Option<usize>) -> Vec<PairRecord> {
    match count {
        Some(count) => records.into_iter().skip(start).take(count).collect(),
        None => records.into_iter().skip(start).collect(),
    }
}
