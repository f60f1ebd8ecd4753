use crate::ai_provider::AiProvider;
use clap::{Parser, Subcommand};
use room_bench_common::{ResponseFormat, SizePolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "room-bench")]
#[command(about = "客室マッチング精度ベンチマークツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (gemini/claude/codex)
    #[arg(long, default_value = "gemini", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// データセットを評価して比較レポートを出力
    Bench {
        /// 入力データセットJSON（複数指定可）
        #[arg(required = true)]
        dataset: Vec<PathBuf>,

        /// レポート出力ファイル（デフォルト: <入力名>_output_<start>-<count>.txt）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 評価開始位置
        #[arg(long, default_value = "0")]
        start: usize,

        /// 評価件数（省略時は設定のデフォルト値）
        #[arg(short, long)]
        count: Option<usize>,

        /// 分類器の応答フォーマット (json/xml/plain)
        #[arg(short, long, default_value = "json")]
        format: ResponseFormat,

        /// サイズ正解判定ポリシー (spd/absolute)
        #[arg(long, default_value = "spd")]
        size_policy: SizePolicy,

        /// LLM戦略をスキップしてベースラインのみ評価
        #[arg(long)]
        skip_llm: bool,

        /// PairResultをJSONでも保存
        #[arg(long)]
        results_json: Option<PathBuf>,

        /// 比較表の出力を省略
        #[arg(long)]
        no_table: bool,
    },

    /// 上流エクスポートをベンチマーク形式へ変換
    Convert {
        /// 上流エクスポートJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
