//! レポート出力
//!
//! 評価サマリ・サイズ分布・戦略間の比較表を整形して出力する。
//! すべての行はTeeシンク経由で標準出力とレポートファイルの
//! 両方へ書かれる（表示専用。機械可読な契約ではない）。

use crate::error::Result;
use room_bench_common::{
    EvaluationSummary, PairRecord, PairResult, RoomRecord, LOW_CONFIDENCE_THRESHOLD,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 客室名の表示幅（これを超える分は切り詰め）
const NAME_WIDTH: usize = 45;

/// 標準出力をレポートファイルへ複製するシンク
pub struct Tee {
    file: Option<BufWriter<File>>,
}

impl Tee {
    /// ファイル複製ありで作成
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        let mut tee = Self {
            file: Some(BufWriter::new(file)),
        };
        tee.line(&format!(
            "=== room-bench report ({}) ===",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        Ok(tee)
    }

    /// 標準出力のみ（ファイル複製なし）
    pub fn stdout_only() -> Self {
        Self { file: None }
    }

    /// 1行出力（ファイル側の書き込み失敗は表示を妨げない）
    pub fn line(&mut self, text: &str) {
        println!("{}", text);
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "{}", text);
        }
    }

    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

/// サイズ分布サマリを出力
pub fn print_size_summary(tee: &mut Tee, records: &[PairRecord]) {
    let tvl_sizes: Vec<f64> = records
        .iter()
        .filter_map(|r| RoomRecord::from_side(&r.tvl).size)
        .collect();
    let competitor_sizes: Vec<f64> = records
        .iter()
        .filter_map(|r| RoomRecord::from_side(&r.competitor).size)
        .collect();

    tee.line("");
    tee.line("=== Room Size Distribution Summary ===");
    tee.line(&format!("TVL Sizes: {}", size_stats(&tvl_sizes)));
    tee.line(&format!("Competitor Sizes: {}", size_stats(&competitor_sizes)));
    tee.line("====================================");
}

/// min / max / mean の文字列化（空ならN/A）
fn size_stats(sizes: &[f64]) -> String {
    if sizes.is_empty() {
        return "N/A / N/A / N/A".to_string();
    }
    let min = sizes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sizes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = sizes.iter().sum::<f64>() / sizes.len() as f64;
    format!("{:.1} / {:.1} / {:.2}", min, max, avg)
}

/// 1ソリューション分の評価サマリを出力
pub fn print_evaluation(tee: &mut Tee, name: &str, summary: &EvaluationSummary) {
    let c = &summary.confusion;
    tee.line("");
    tee.line("---");
    tee.line(&format!("Results for '{}':", name));
    tee.line(&format!(
        "Total entries evaluated: {}, total inaccurate entries: {}",
        summary.total, c.false_positive
    ));
    tee.line(&format!(
        "Total matched by solution: {}",
        summary.matched_by_solution
    ));
    tee.line(&format!(
        "Confusion: TP={} FP={} FN={} TN={}",
        c.true_positive, c.false_positive, c.false_negative, c.true_negative
    ));
    tee.line(&format!(
        "Inaccuracy Rate: {:.2}%",
        summary.inaccuracy_rate * 100.0
    ));
    tee.line(&format!(
        "Overall Inaccuracy Rate: {:.2}%",
        summary.overall_inaccuracy_rate * 100.0
    ));
    tee.line(&format!(
        "Average Size Error (inaccurates only): {:.2} sqm",
        summary.avg_size_error
    ));
    tee.line(&format!(
        "Precision: {:.4} / Recall: {:.4} / F1 Score: {:.4}",
        summary.precision, summary.recall, summary.f1_score
    ));
    tee.line(&format!(
        "Average Confidence: {:.2}, low-confidence cases (<{}): {}",
        summary.avg_confidence, LOW_CONFIDENCE_THRESHOLD, summary.low_confidence_count
    ));
    tee.line("---");
}

/// 2戦略の判定を並べた比較表を出力
pub fn print_comparison(tee: &mut Tee, baseline: &[PairResult], llm: &[PairResult]) {
    tee.line("");
    tee.line("=== Cases Table ===");
    tee.line(&format!(
        "{:<12} | {:<45} | {:<8} | {:<45} | {:<8} | {:<14} | {:<10} | {:<7} | {:<5} | {:<6}",
        "Case ID",
        "TVL Room Name",
        "TVL Size",
        "COMP Room Name",
        "COMP Size",
        "Original Match",
        "LLM Match",
        "SizeOK",
        "Conf",
        "equal?"
    ));
    tee.line(&"-".repeat(170));

    for (orig, llm) in baseline.iter().zip(llm.iter()) {
        tee.line(&comparison_row(orig, llm));
    }
    tee.line("====================================");
    tee.line("");
}

fn comparison_row(orig: &PairResult, llm: &PairResult) -> String {
    let equal = if orig.decision == llm.decision {
        "equal"
    } else {
        "DIFF"
    };
    format!(
        "{:<12} | {:<45} | {:<8} | {:<45} | {:<8} | {:<14} | {:<10} | {:<7} | {:<5.2} | {:<6}",
        orig.case_id,
        clip(&orig.tvl_name),
        fmt_size(orig.tvl_size),
        clip(&orig.competitor_name),
        fmt_size(orig.competitor_size),
        orig.decision.to_string(),
        llm.decision.to_string(),
        orig.size_correct,
        llm.confidence,
        equal
    )
}

fn fmt_size(size: Option<f64>) -> String {
    match size {
        Some(size) => format!("{:.1}", size),
        None => String::new(),
    }
}

/// 表示幅を超える名前を文字単位で切り詰める
fn clip(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        name.chars().take(NAME_WIDTH - 1).chain(['…']).collect()
    }
}

/// 判定差分の件数を数える（表の下に出す1行サマリ用）
pub fn count_diffs(baseline: &[PairResult], llm: &[PairResult]) -> usize {
    baseline
        .iter()
        .zip(llm.iter())
        .filter(|(a, b)| a.decision != b.decision)
        .count()
}
