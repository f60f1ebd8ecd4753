//! 分類器レスポンスのデコーダー
//!
//! LLMの生テキスト応答を構造化されたMatchDecisionへ変換する。
//! フォーマットは以下の順で試行し、最初に成功したものを採用:
//! 1. JSONオブジェクト（```json ブロック or 生の {...}）
//! 2. <match_result> エンベロープ（XML風タグ。前後の文章は無視）
//! 3. プレーンテキスト（"matched" / "mismatched" の完全一致）
//! 4. キーワードスキャン（最後の砦）
//!
//! どの経路でも必ず有効なMatchDecisionを返す。エラーは投げない。

use crate::error::{Error, Result};
use crate::types::{MatchDecision, MatchLabel};

/// エンベロープのタグ名
const ENVELOPE_TAG: &str = "match_result";

/// デコード失敗・語彙外判定時の信頼度
const INVALID_CONFIDENCE: f64 = 0.1;
/// プレーンテキスト応答の既定信頼度
const PLAIN_TEXT_CONFIDENCE: f64 = 0.8;
/// キーワードスキャン採用時の信頼度
const KEYWORD_CONFIDENCE: f64 = 0.7;
/// 構造化応答でconfidence_score欠落時の既定値
const DEFAULT_CONFIDENCE: f64 = 0.5;
/// reasoning欠落時のプレースホルダ
const NO_REASONING: &str = "No reasoning provided";
/// reasoningに引用する入力の最大文字数
const EXCERPT_CHARS: usize = 120;

/// 分類器が返しうる応答フォーマット（プロンプト側の出力指定に対応）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// JSONオブジェクト形式（decision / confidence_score / reasoning）
    #[default]
    Json,
    /// <match_result>エンベロープ形式
    Xml,
    /// "matched" / "mismatched" のみのプレーン形式
    Plain,
}

impl std::str::FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            "plain" | "text" => Ok(ResponseFormat::Plain),
            _ => Err(format!("Unknown format: {}. Use json, xml, or plain", s)),
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseFormat::Json => write!(f, "json"),
            ResponseFormat::Xml => write!(f, "xml"),
            ResponseFormat::Plain => write!(f, "plain"),
        }
    }
}

/// 生テキスト応答をデコード
///
/// 全フォーマットをフォールバック順に試行する全域関数。
/// どんな入力でもlabelは2値、confidenceは [0.0, 1.0] に収まる。
pub fn decode_response(raw: &str) -> MatchDecision {
    if let Some(decision) = decode_json_object(raw) {
        return decision;
    }
    if let Some(decision) = decode_xml_envelope(raw) {
        return decision;
    }
    if let Some(decision) = decode_plain_text(raw) {
        return decision;
    }
    decode_keyword_fallback(raw)
}

/// レスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
pub fn extract_json_object(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONオブジェクトが見つかりません".into()))
}

/// 形式1: JSONオブジェクトとしてデコード
fn decode_json_object(raw: &str) -> Option<MatchDecision> {
    let json_str = extract_json_object(raw).ok()?;
    let value: serde_json::Value = serde_json::from_str(json_str).ok()?;
    let obj = value.as_object()?;

    let decision_raw = obj
        .get("decision")
        .and_then(|v| v.as_str())
        .unwrap_or("mismatched")
        .trim()
        .to_lowercase();
    let confidence = obj
        .get("confidence_score")
        .and_then(|v| v.as_f64())
        .unwrap_or(DEFAULT_CONFIDENCE);
    let reasoning = obj
        .get("reasoning")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_REASONING)
        .to_string();

    match MatchLabel::parse(&decision_raw) {
        Some(label) => Some(MatchDecision {
            label,
            confidence: clamp_confidence(confidence),
            reasoning,
        }),
        // 語彙外のdecisionはmismatchedへ上書き
        None => Some(MatchDecision {
            label: MatchLabel::Mismatched,
            confidence: INVALID_CONFIDENCE,
            reasoning: format!("Invalid decision value: {}", decision_raw),
        }),
    }
}

/// エンベロープ部分を抽出（マーカーがなければ合成）
fn extract_envelope(raw: &str) -> String {
    let open = format!("<{}>", ENVELOPE_TAG);
    let close = format!("</{}>", ENVELOPE_TAG);

    if let (Some(start), Some(end)) = (raw.find(&open), raw.rfind(&close)) {
        if end >= start {
            return raw[start..end + close.len()].to_string();
        }
    }

    // マーカーなし: 最小エンベロープを合成してタグ抽出を試みる
    format!("{}{}{}", open, raw, close)
}

/// 単純なタグの中身を取り出す（属性なし前提）
fn tag_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end_offset = xml[start..].find(&close)?;
    Some(xml[start..start + end_offset].trim())
}

/// 形式2: XML風エンベロープとしてデコード
///
/// <decision>タグが見つからなければNone（次形式へフォールスルー）。
fn decode_xml_envelope(raw: &str) -> Option<MatchDecision> {
    let envelope = extract_envelope(raw);
    let decision_raw = tag_text(&envelope, "decision")?.to_lowercase();

    let confidence = tag_text(&envelope, "confidence_score")
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_CONFIDENCE);
    let reasoning = tag_text(&envelope, "reasoning")
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_REASONING)
        .to_string();

    match MatchLabel::parse(&decision_raw) {
        Some(label) => Some(MatchDecision {
            label,
            confidence: clamp_confidence(confidence),
            reasoning,
        }),
        None => Some(MatchDecision {
            label: MatchLabel::Mismatched,
            confidence: INVALID_CONFIDENCE,
            reasoning: format!("Invalid decision value in markup: {}", decision_raw),
        }),
    }
}

/// 形式3: プレーンテキスト（語彙2語の完全一致のみ受理）
fn decode_plain_text(raw: &str) -> Option<MatchDecision> {
    let label = MatchLabel::parse(&raw.trim().to_lowercase())?;
    Some(MatchDecision {
        label,
        confidence: PLAIN_TEXT_CONFIDENCE,
        reasoning: "Simple text response without detailed reasoning".to_string(),
    })
}

/// 形式4: キーワードスキャン
///
/// "mismatched"は"matched"を部分文字列に含むため、先に除去してから
/// "matched"単独の出現を判定する。両方出現・どちらも無しは低信頼の
/// mismatchedに落とす。
fn decode_keyword_fallback(raw: &str) -> MatchDecision {
    let lower = raw.to_lowercase();
    let has_mismatched = lower.contains("mismatched");
    let has_matched = lower.replace("mismatched", "").contains("matched");

    match (has_matched, has_mismatched) {
        (true, false) => MatchDecision {
            label: MatchLabel::Matched,
            confidence: KEYWORD_CONFIDENCE,
            reasoning: "Keyword fallback: found 'matched' in response".to_string(),
        },
        (false, true) => MatchDecision {
            label: MatchLabel::Mismatched,
            confidence: KEYWORD_CONFIDENCE,
            reasoning: "Keyword fallback: found 'mismatched' in response".to_string(),
        },
        _ => MatchDecision {
            label: MatchLabel::Mismatched,
            confidence: INVALID_CONFIDENCE,
            reasoning: format!("Unparseable response: {}", excerpt(raw)),
        },
    }
}

/// 入力の先頭部分を文字単位で安全に切り出す
fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    }
}

/// 信頼度を [0.0, 1.0] にクランプ
fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
