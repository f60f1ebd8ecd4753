//! マッチング戦略
//!
//! ベースライン（既存ラベルの転写）と分類器（LLM照合）の2系統。
//! どちらも同じ出力契約（1レコード → 1 PairResult）を持つ。

mod baseline;
mod classifier;

pub use baseline::BaselineStrategy;
pub use classifier::ClassifierStrategy;

use crate::error::Result;
use room_bench_common::{MatchDecision, PairRecord, PairResult, RoomRecord};

/// 戦略共通の出力契約
pub trait MatchStrategy {
    /// レポート表示用の戦略名
    fn name(&self) -> &'static str;

    /// バッチ全件を処理してPairResultを生成
    fn run(&self, records: &[PairRecord]) -> Result<Vec<PairResult>>;
}

/// PairResult組み立ての共通処理
pub(crate) fn pair_result(
    record: &PairRecord,
    tvl: &RoomRecord,
    competitor: &RoomRecord,
    decision: MatchDecision,
    size_correct: bool,
) -> PairResult {
    PairResult {
        case_id: record.case_id.clone(),
        tvl_name: tvl.name.clone(),
        tvl_size: tvl.size,
        competitor_name: competitor.name.clone(),
        competitor_size: competitor.size,
        decision: decision.label,
        size_correct,
        confidence: decision.confidence,
        reasoning: decision.reasoning,
    }
}
