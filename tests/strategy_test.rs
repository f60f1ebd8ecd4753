//! 戦略の結合テスト
//!
//! スタブバックエンドでベンチマーク一式（戦略→評価）を通す

use room_bench_rust::backend::TextGenerator;
use room_bench_rust::error::{Result, RoomBenchError};
use room_bench_rust::strategy::{BaselineStrategy, ClassifierStrategy, MatchStrategy};
use room_bench_common::{evaluate, MatchLabel, PairRecord, ResponseFormat, SizePolicy};
use serde_json::json;

fn record(label: &str, tvl_size: f64, comp_size: f64) -> PairRecord {
    serde_json::from_value(json!({
        "match_status": label,
        "tvl": {
            "hard_metrics": { "room_size": tvl_size },
            "soft_metrics": {
                "room_group_name": "Deluxe King Room",
                "bed_type": "King",
                "max_occupancy": 2
            }
        },
        "competitor": {
            "hard_metrics": { "room_size": comp_size },
            "soft_metrics": {
                "room_group_name": "Deluxe Room",
                "bed_type": "Double",
                "max_occupancy": 2
            }
        }
    }))
    .expect("レコード生成失敗")
}

/// 常にmatchedをJSONで返すスタブ
struct AlwaysMatched;

impl TextGenerator for AlwaysMatched {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(r#"{"decision": "matched", "confidence_score": 0.9, "reasoning": "stub"}"#.to_string())
    }
}

/// 常に失敗するスタブ
struct AlwaysFails;

impl TextGenerator for AlwaysFails {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RoomBenchError::BackendCall("backend unavailable".to_string()))
    }
}

#[test]
fn test_baseline_and_classifier_share_contract() {
    let records = vec![
        record("matched", 20.0, 20.5),
        record("mismatched", 30.0, 45.0),
    ];

    let baseline = BaselineStrategy::new(SizePolicy::spd());
    let backend = AlwaysMatched;
    let classifier = ClassifierStrategy::new(&backend, ResponseFormat::Json, SizePolicy::spd(), false);

    let baseline_results = baseline.run(&records).unwrap();
    let llm_results = classifier.run(&records).unwrap();

    // 両戦略とも1レコード1結果、ケースIDも引き継がれる
    assert_eq!(baseline_results.len(), records.len());
    assert_eq!(llm_results.len(), records.len());
    for (b, l) in baseline_results.iter().zip(llm_results.iter()) {
        assert_eq!(b.case_id, l.case_id);
        assert_eq!(b.size_correct, l.size_correct);
    }
}

#[test]
fn test_full_benchmark_flow_with_stub() {
    // (20, 20.5)はSPD正解、(30, 45)は不正解。
    // 常時matchedのスタブなら TP=1 / FP=1 になる。
    let records = vec![
        record("matched", 20.0, 20.5),
        record("matched", 30.0, 45.0),
    ];

    let backend = AlwaysMatched;
    let classifier = ClassifierStrategy::new(&backend, ResponseFormat::Json, SizePolicy::spd(), false);
    let summary = evaluate(&classifier.run(&records).unwrap());

    assert_eq!(summary.total, 2);
    assert_eq!(summary.confusion.true_positive, 1);
    assert_eq!(summary.confusion.false_positive, 1);
    assert_eq!(summary.precision, 0.5);
    assert_eq!(summary.avg_size_error, 15.0);
}

#[test]
fn test_backend_outage_degrades_but_completes() {
    // 全件バックエンド不通でもバッチは完走し、全件が低信頼mismatchedになる
    let records = vec![
        record("matched", 20.0, 20.5),
        record("matched", 30.0, 45.0),
        record("mismatched", 10.0, 10.0),
    ];

    let backend = AlwaysFails;
    let classifier = ClassifierStrategy::new(&backend, ResponseFormat::Json, SizePolicy::spd(), false);
    let results = classifier.run(&records).unwrap();

    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.decision, MatchLabel::Mismatched);
        assert_eq!(result.confidence, 0.0);
        assert!(result.reasoning.contains("backend unavailable"));
    }

    // 評価エンジンにもそのまま流せる
    let summary = evaluate(&results);
    assert_eq!(summary.confusion.total(), 3);
    assert_eq!(summary.low_confidence_count, 3);
}

#[test]
fn test_prompt_reflects_response_format() {
    // プロンプトの出力指定がフォーマット選択に追従することを
    // バックエンドに渡るプロンプト経由で確認する
    use std::sync::Mutex;

    struct CapturePrompt(Mutex<Vec<String>>);

    impl TextGenerator for CapturePrompt {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.0.lock().unwrap().push(prompt.to_string());
            Ok("matched".to_string())
        }
    }

    let records = vec![record("matched", 20.0, 20.5)];

    let backend = CapturePrompt(Mutex::new(Vec::new()));
    let classifier = ClassifierStrategy::new(&backend, ResponseFormat::Xml, SizePolicy::spd(), false);
    classifier.run(&records).unwrap();

    let prompts = backend.0.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("<match_result>"));
    assert!(prompts[0].contains("Deluxe King Room"));
}
