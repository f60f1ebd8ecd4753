//! ベースライン戦略
//!
//! 入力レコードの既存ラベル（match_status）を正規化して転写する。
//! 不確実性を持たないため信頼度は常に1.0。

use super::{pair_result, MatchStrategy};
use crate::error::Result;
use room_bench_common::{
    MatchDecision, MatchLabel, PairRecord, PairResult, RoomRecord, SizePolicy,
};

pub struct BaselineStrategy {
    policy: SizePolicy,
}

impl BaselineStrategy {
    pub fn new(policy: SizePolicy) -> Self {
        Self { policy }
    }
}

impl MatchStrategy for BaselineStrategy {
    fn name(&self) -> &'static str {
        "Original Solution"
    }

    fn run(&self, records: &[PairRecord]) -> Result<Vec<PairResult>> {
        let results = records
            .iter()
            .map(|record| {
                let tvl = RoomRecord::from_side(&record.tvl);
                let competitor = RoomRecord::from_side(&record.competitor);
                let size_correct = self.policy.size_correct(tvl.size, competitor.size);

                let decision = MatchDecision {
                    label: MatchLabel::normalize(&record.match_status),
                    confidence: 1.0,
                    reasoning: "Original rule-based matching".to_string(),
                };

                pair_result(record, &tvl, &competitor, decision, size_correct)
            })
            .collect();

        Ok(results)
    }
}
