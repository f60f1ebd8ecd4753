//! 評価エンジン
//!
//! PairResultのバッチを集計し、size_correctビットを正解として
//! 混同行列と派生指標（precision / recall / F1 / 不正確率 /
//! サイズ誤差 / 信頼度統計）を算出する。
//!
//! すべて純関数。分母0は例外ではなく0.0を返す。

use crate::types::{MatchLabel, PairResult};
use serde::Serialize;

/// 低信頼と見なす閾値
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// 混同行列カウント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    /// 4象限の合計（常にバッチサイズと一致する）
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

/// 1ソリューション分の評価結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub confusion: ConfusionCounts,
    /// 解がmatchedと判定した件数（TP + FP）
    pub matched_by_solution: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// FP / matched判定件数（割合。表示時に%へ）
    pub inaccuracy_rate: f64,
    /// FP / 全評価件数（割合）
    pub overall_inaccuracy_rate: f64,
    /// FPケースの平均サイズ誤差（両サイズが存在するFPのみで平均）
    pub avg_size_error: f64,
    /// 全ケースの平均信頼度
    pub avg_confidence: f64,
    /// 信頼度 < 0.7 のケース数
    pub low_confidence_count: usize,
}

/// バッチを評価
///
/// 分類規則:
/// - matched    ∧ size_correct  → TP
/// - matched    ∧ !size_correct → FP
/// - mismatched ∧ size_correct  → FN
/// - mismatched ∧ !size_correct → TN
pub fn evaluate(results: &[PairResult]) -> EvaluationSummary {
    let mut confusion = ConfusionCounts::default();
    let mut total_size_error = 0.0;
    let mut size_error_count = 0usize;
    let mut confidence_sum = 0.0;
    let mut low_confidence_count = 0usize;

    for result in results {
        match (result.decision, result.size_correct) {
            (MatchLabel::Matched, true) => confusion.true_positive += 1,
            (MatchLabel::Matched, false) => {
                confusion.false_positive += 1;
                if let (Some(a), Some(b)) = (result.tvl_size, result.competitor_size) {
                    total_size_error += (a - b).abs();
                    size_error_count += 1;
                }
            }
            (MatchLabel::Mismatched, true) => confusion.false_negative += 1,
            (MatchLabel::Mismatched, false) => confusion.true_negative += 1,
        }

        confidence_sum += result.confidence;
        if result.confidence < LOW_CONFIDENCE_THRESHOLD {
            low_confidence_count += 1;
        }
    }

    let tp = confusion.true_positive as f64;
    let fp = confusion.false_positive as f64;
    let fn_ = confusion.false_negative as f64;
    let matched_by_solution = confusion.true_positive + confusion.false_positive;

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1_score = ratio(2.0 * precision * recall, precision + recall);

    EvaluationSummary {
        total: results.len(),
        confusion,
        matched_by_solution,
        precision,
        recall,
        f1_score,
        inaccuracy_rate: ratio(fp, matched_by_solution as f64),
        overall_inaccuracy_rate: ratio(fp, results.len() as f64),
        avg_size_error: ratio(total_size_error, size_error_count as f64),
        avg_confidence: ratio(confidence_sum, results.len() as f64),
        low_confidence_count,
    }
}

/// 分母0なら0.0を返す安全な除算
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::SizePolicy;

    fn result(
        decision: MatchLabel,
        size_correct: bool,
        sizes: (Option<f64>, Option<f64>),
        confidence: f64,
    ) -> PairResult {
        PairResult {
            decision,
            size_correct,
            tvl_size: sizes.0,
            competitor_size: sizes.1,
            confidence,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_batch() {
        let summary = evaluate(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.precision, 0.0);
        assert_eq!(summary.recall, 0.0);
        assert_eq!(summary.f1_score, 0.0);
        assert_eq!(summary.inaccuracy_rate, 0.0);
        assert_eq!(summary.overall_inaccuracy_rate, 0.0);
        assert_eq!(summary.avg_size_error, 0.0);
        assert_eq!(summary.avg_confidence, 0.0);
    }

    #[test]
    fn test_no_matched_predictions() {
        // matched判定ゼロでもゼロ除算にならない
        let results = vec![
            result(MatchLabel::Mismatched, true, (Some(10.0), Some(10.0)), 1.0),
            result(MatchLabel::Mismatched, false, (Some(10.0), Some(30.0)), 1.0),
        ];
        let summary = evaluate(&results);
        assert_eq!(summary.matched_by_solution, 0);
        assert_eq!(summary.precision, 0.0);
        assert_eq!(summary.recall, 0.0);
        assert_eq!(summary.f1_score, 0.0);
        assert_eq!(summary.confusion.false_negative, 1);
        assert_eq!(summary.confusion.true_negative, 1);
    }

    #[test]
    fn test_confusion_completeness() {
        let results = vec![
            result(MatchLabel::Matched, true, (Some(20.0), Some(20.0)), 0.9),
            result(MatchLabel::Matched, false, (Some(20.0), Some(40.0)), 0.8),
            result(MatchLabel::Mismatched, true, (Some(15.0), Some(15.0)), 0.6),
            result(MatchLabel::Mismatched, false, (None, Some(15.0)), 0.5),
            result(MatchLabel::Matched, false, (None, None), 0.4),
        ];
        let summary = evaluate(&results);
        // 4象限の合計は常にバッチサイズ
        assert_eq!(summary.confusion.total(), results.len());
    }

    #[test]
    fn test_end_to_end_scenario() {
        // サイズペアからオラクル判定を経由する一気通貫シナリオ
        let policy = SizePolicy::spd();
        let cases = [
            (20.0, 20.5, MatchLabel::Matched),    // SPD≈2.5% → TP
            (30.0, 45.0, MatchLabel::Matched),    // SPD=40%  → FP
            (10.0, 10.0, MatchLabel::Mismatched), // 同寸     → FN
            (5.0, 5.5, MatchLabel::Mismatched),   // SPD≈9.5% → FN
        ];

        let results: Vec<PairResult> = cases
            .iter()
            .map(|&(a, b, decision)| {
                result(
                    decision,
                    policy.size_correct(Some(a), Some(b)),
                    (Some(a), Some(b)),
                    1.0,
                )
            })
            .collect();

        let summary = evaluate(&results);
        assert_eq!(summary.confusion.true_positive, 1);
        assert_eq!(summary.confusion.false_positive, 1);
        assert_eq!(summary.confusion.false_negative, 2);
        assert_eq!(summary.confusion.true_negative, 0);
        assert_eq!(summary.confusion.total(), 4);

        assert_eq!(summary.precision, 0.5);
        assert!((summary.recall - 1.0 / 3.0).abs() < 1e-9);
        assert!((summary.f1_score - 0.4).abs() < 1e-9);

        // FPは(30, 45)の1件のみ → 平均サイズ誤差は15.0
        assert_eq!(summary.avg_size_error, 15.0);
        assert_eq!(summary.matched_by_solution, 2);
        assert_eq!(summary.inaccuracy_rate, 0.5);
        assert_eq!(summary.overall_inaccuracy_rate, 0.25);
    }

    #[test]
    fn test_avg_size_error_skips_missing_sizes() {
        // サイズ欠損のFPは誤差平均から除外される
        let results = vec![
            result(MatchLabel::Matched, false, (Some(20.0), Some(30.0)), 1.0),
            result(MatchLabel::Matched, false, (None, Some(30.0)), 1.0),
        ];
        let summary = evaluate(&results);
        assert_eq!(summary.confusion.false_positive, 2);
        assert_eq!(summary.avg_size_error, 10.0);
    }

    #[test]
    fn test_confidence_statistics() {
        let results = vec![
            result(MatchLabel::Matched, true, (Some(20.0), Some(20.0)), 1.0),
            result(MatchLabel::Mismatched, false, (Some(20.0), Some(40.0)), 0.6),
            result(MatchLabel::Mismatched, false, (Some(20.0), Some(40.0)), 0.1),
        ];
        let summary = evaluate(&results);
        assert!((summary.avg_confidence - 1.7 / 3.0).abs() < 1e-9);
        assert_eq!(summary.low_confidence_count, 2);
    }

    #[test]
    fn test_low_confidence_boundary() {
        // 閾値ちょうどは低信頼に数えない
        let results = vec![result(
            MatchLabel::Matched,
            true,
            (Some(20.0), Some(20.0)),
            0.7,
        )];
        let summary = evaluate(&results);
        assert_eq!(summary.low_confidence_count, 0);
    }
}
