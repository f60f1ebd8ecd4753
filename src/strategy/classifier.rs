//! 分類器戦略
//!
//! ペアごとにプロンプトを組み立て、注入されたバックエンド経由で
//! 外部分類器を1回呼び出し、応答をデコードする。
//! バックエンド失敗はそのペアだけを低信頼mismatchedに落とし、
//! バッチ処理は継続する（部分失敗の隔離）。

use super::{pair_result, MatchStrategy};
use crate::backend::TextGenerator;
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use room_bench_common::{
    build_match_prompt, decode_response, MatchDecision, MatchLabel, PairRecord, PairResult,
    ResponseFormat, RoomRecord, SizePolicy,
};

pub struct ClassifierStrategy<'a> {
    backend: &'a dyn TextGenerator,
    format: ResponseFormat,
    policy: SizePolicy,
    verbose: bool,
}

impl<'a> ClassifierStrategy<'a> {
    pub fn new(
        backend: &'a dyn TextGenerator,
        format: ResponseFormat,
        policy: SizePolicy,
        verbose: bool,
    ) -> Self {
        Self {
            backend,
            format,
            policy,
            verbose,
        }
    }

    /// 1ペア分の判定（失敗は低信頼mismatchedに吸収）
    fn classify_pair(&self, tvl: &RoomRecord, competitor: &RoomRecord) -> MatchDecision {
        let prompt = build_match_prompt(tvl, competitor, self.format);

        match self.backend.generate(&prompt) {
            Ok(response) => decode_response(&response),
            Err(e) => MatchDecision {
                label: MatchLabel::Mismatched,
                confidence: 0.0,
                reasoning: format!("Error: {}", e),
            },
        }
    }
}

impl MatchStrategy for ClassifierStrategy<'_> {
    fn name(&self) -> &'static str {
        "LLM Solution"
    }

    fn run(&self, records: &[PairRecord]) -> Result<Vec<PairResult>> {
        let progress = ProgressBar::new(records.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("  {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let tvl = RoomRecord::from_side(&record.tvl);
            let competitor = RoomRecord::from_side(&record.competitor);
            let size_correct = self.policy.size_correct(tvl.size, competitor.size);

            let decision = self.classify_pair(&tvl, &competitor);

            if self.verbose {
                progress.println(format!(
                    "[{}] TVL:({},{:?},{:?},{:?}) VS COMP:({},{:?},{:?},{:?}) => {} (conf:{:.2}, size_ok:{})",
                    record.case_id,
                    tvl.name,
                    tvl.size,
                    tvl.bed_type,
                    tvl.occupancy,
                    competitor.name,
                    competitor.size,
                    competitor.bed_type,
                    competitor.occupancy,
                    decision.label,
                    decision.confidence,
                    size_correct,
                ));
                progress.println(format!("  Reasoning: {}", decision.reasoning));
            }

            results.push(pair_result(record, &tvl, &competitor, decision, size_correct));
            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(results)
    }
}
