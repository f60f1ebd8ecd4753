use clap::Parser;
use room_bench_rust::{backend, cli, config, dataset, error, report, strategy};

use cli::{Cli, Commands};
use config::Config;
use error::{Result, RoomBenchError};
use room_bench_common::evaluate;
use std::path::{Path, PathBuf};
use strategy::{BaselineStrategy, ClassifierStrategy, MatchStrategy};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Bench {
            dataset: paths,
            output,
            start,
            count,
            format,
            size_policy,
            skip_llm,
            results_json,
            no_table,
        } => {
            println!("🏨 room-bench - マッチング精度ベンチマーク\n");

            // 1. データ読み込み + 形状チェック
            println!("[1/5] データセットを読み込み中...");
            let raw = dataset::load_raw_records(&paths);
            if raw.is_empty() {
                return Err(RoomBenchError::NoRecordsFound(
                    "入力ファイルから1件も読み込めませんでした".into(),
                ));
            }
            let total_loaded = raw.len();
            let valid = dataset::filter_valid_shape(raw);
            println!(
                "✔ {}件読み込み（形状チェック通過 {}件）\n",
                total_loaded,
                valid.len()
            );

            // 2. 重複除去 + ケースID採番 + 評価窓
            println!("[2/5] 重複除去中...");
            let before = valid.len();
            let deduped = dataset::deduplicate(valid);
            println!(
                "✔ before dedup {}, after dedup {}, removed {}\n",
                before,
                deduped.len(),
                before - deduped.len()
            );

            let count = count.or(Some(config.default_count));
            let records = dataset::window(dataset::to_pair_records(deduped), start, count);
            if records.is_empty() {
                return Err(RoomBenchError::NoRecordsFound(format!(
                    "評価窓が空です (start={}, count={:?})",
                    start, count
                )));
            }

            let output_path =
                output.unwrap_or_else(|| default_output_path(&paths[0], start, records.len()));
            let mut tee = report::Tee::create(&output_path)?;
            report::print_size_summary(&mut tee, &records);

            // 3. ベースライン評価
            println!("[3/5] ベースライン評価中...");
            let baseline = BaselineStrategy::new(size_policy);
            let baseline_results = baseline.run(&records)?;
            report::print_evaluation(&mut tee, baseline.name(), &evaluate(&baseline_results));

            // 4. LLM評価
            let llm_results = if skip_llm {
                println!("[4/5] LLM評価をスキップ\n");
                None
            } else {
                println!(
                    "[4/5] LLM評価中... (provider: {}, format: {})",
                    cli.ai_provider.command_name(),
                    format
                );
                let backend = backend::CliBackend::new(cli.ai_provider, cli.verbose);
                let classifier = ClassifierStrategy::new(&backend, format, size_policy, cli.verbose);
                let results = classifier.run(&records)?;
                report::print_evaluation(&mut tee, classifier.name(), &evaluate(&results));
                Some(results)
            };

            // 5. 比較表 + 保存
            println!("[5/5] レポート生成中...");
            if let Some(llm_results) = &llm_results {
                if !no_table {
                    report::print_comparison(&mut tee, &baseline_results, llm_results);
                }
                tee.line(&format!(
                    "判定差分: {}件 / {}件",
                    report::count_diffs(&baseline_results, llm_results),
                    records.len()
                ));
            }

            if let Some(path) = results_json {
                let all = serde_json::json!({
                    "baseline": baseline_results,
                    "llm": llm_results,
                });
                std::fs::write(&path, serde_json::to_string_pretty(&all)?)?;
                println!("✔ 結果JSONを保存: {}", path.display());
            }

            tee.flush();
            println!("\n✅ 完了 (レポート: {})", output_path.display());
        }

        Commands::Convert { input, output } => {
            eprintln!("🔧 room-bench - フィクスチャ変換\n");
            let count = dataset::convert::convert_file(&input, output.as_deref())?;
            match &output {
                Some(path) => println!("✔ {}件を変換: {}", count, path.display()),
                None => eprintln!("✔ {}件を変換", count),
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  デフォルト評価件数: {}", config.default_count);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    if config.api_key.is_some() {
                        "設定済み"
                    } else {
                        "未設定"
                    }
                );
            }
        }
    }

    Ok(())
}

/// デフォルトのレポートファイル名（<入力名>_output_<start>-<件数>.txt）
fn default_output_path(first_input: &Path, start: usize, count: usize) -> PathBuf {
    let stem = first_input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("benchmark");
    PathBuf::from(format!("{}_output_{}-{}.txt", stem, start, count))
}
