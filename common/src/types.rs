//! ベンチマーク入出力の型定義
//!
//! CLI全体で共有される型:
//! - PairRecord: 入力データ1件（tvl / competitor の客室ペア）
//! - RoomRecord: 片側客室の正規化ビュー
//! - MatchDecision: 分類器出力のデコード結果
//! - PairResult: 評価エンジンが消費する統一レコード

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 入力データ1件（客室ペア + 既存ラベル）
///
/// 未知フィールドの欠落はすべてデフォルト値に落とす。
/// 形状チェック（必須ブロックの有無）はローダー側の責務。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairRecord {
    pub hotel_id: Value,
    pub hotel_name: String,
    /// 既存ソリューションのラベル（"matched" / "MATCH_..." など）
    pub match_status: String,
    pub tvl: SideRecord,
    pub competitor: SideRecord,
    pub notes: String,
    /// 重複除去後に採番されるケースID（入力JSONには通常含まれない）
    #[serde(skip_serializing_if = "String::is_empty")]
    pub case_id: String,
}

/// 片側（tvl または competitor）の生データ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SideRecord {
    pub hard_metrics: HardMetrics,
    pub soft_metrics: SoftMetrics,
}

/// ハードメトリクス（数値属性）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardMetrics {
    /// 文字列・数値・nullのいずれでも来る
    pub room_size: Value,
}

/// ソフトメトリクス（名称・ベッド・定員・アメニティ）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftMetrics {
    pub room_group_name: Option<String>,
    pub bed_type: Option<String>,
    /// 数値または数値文字列。不正値は抽出時にNoneへ
    pub max_occupancy: Value,
    pub amenities: Amenities,
    pub view: String,
}

/// アメニティ情報
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenities {
    pub is_with_breakfast: Option<bool>,
    pub is_refundable: Option<bool>,
    pub cancellation_policy_code: Option<String>,
}

/// 片側客室の正規化ビュー
///
/// 生データから毎回構築し、以後は不変。sizeは存在すれば必ず正。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomRecord {
    pub name: String,
    pub size: Option<f64>,
    pub bed_type: Option<String>,
    pub occupancy: Option<u32>,
    pub breakfast: Option<bool>,
    pub refundable: Option<bool>,
    pub cancellation_policy_code: Option<String>,
}

impl RoomRecord {
    /// 片側生データから正規化ビューを構築
    ///
    /// 欠落ブロックは空として扱い、不正な数値は欠損（None）に落とす。
    /// エラーは返さない。
    pub fn from_side(side: &SideRecord) -> Self {
        let soft = &side.soft_metrics;
        Self {
            name: soft.room_group_name.clone().unwrap_or_default(),
            size: parse_room_size(&side.hard_metrics.room_size),
            bed_type: soft.bed_type.clone(),
            occupancy: parse_occupancy(&soft.max_occupancy),
            breakfast: soft.amenities.is_with_breakfast,
            refundable: soft.amenities.is_refundable,
            cancellation_policy_code: soft.amenities.cancellation_policy_code.clone(),
        }
    }
}

/// room_sizeの安全パース
///
/// 数値・数値文字列を受け付け、変換失敗と0以下はNoneに落とす。
pub fn parse_room_size(raw: &Value) -> Option<f64> {
    let size = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if size > 0.0 && size.is_finite() {
        Some(size)
    } else {
        None
    }
}

/// max_occupancyの安全パース（非負整数のみ）
pub fn parse_occupancy(raw: &Value) -> Option<u32> {
    match raw {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// マッチ判定ラベル（2値のみ。第3の状態は存在しない）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLabel {
    Matched,
    #[default]
    Mismatched,
}

impl MatchLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Matched => "matched",
            MatchLabel::Mismatched => "mismatched",
        }
    }

    /// 語彙2語への厳密パース（小文字の完全一致のみ）
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "matched" => Some(MatchLabel::Matched),
            "mismatched" => Some(MatchLabel::Mismatched),
            _ => None,
        }
    }

    /// 外部由来のステータス値を2値へ正規化
    ///
    /// - "matched" / "MATCH_..." → Matched
    /// - "mismatched" / "NOT_MATCH..." → Mismatched
    /// - それ以外 → Mismatched（保守的デフォルト）
    pub fn normalize(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("matched") || status.starts_with("MATCH_") {
            MatchLabel::Matched
        } else {
            MatchLabel::Mismatched
        }
    }
}

impl std::fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 分類器出力のデコード結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDecision {
    pub label: MatchLabel,
    /// 常に [0.0, 1.0] にクランプ済み
    pub confidence: f64,
    /// 空にはならない（欠落時はプレースホルダを代入）
    pub reasoning: String,
}

/// 評価エンジンが消費する統一レコード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairResult {
    pub case_id: String,
    pub tvl_name: String,
    pub tvl_size: Option<f64>,
    pub competitor_name: String,
    pub competitor_size: Option<f64>,
    pub decision: MatchLabel,
    pub size_correct: bool,
    pub confidence: f64,
    pub reasoning: String,
}
