//! Room Bench Common Library
//!
//! CLI全体で共有される型とロジック:
//! - デコーダー（分類器応答 → MatchDecision）
//! - サイズ正解判定（プロキシ正解オラクル）
//! - 評価エンジン（混同行列・派生指標）
//! - プロンプト生成

pub mod error;
pub mod metrics;
pub mod oracle;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use metrics::{evaluate, ConfusionCounts, EvaluationSummary, LOW_CONFIDENCE_THRESHOLD};
pub use oracle::SizePolicy;
pub use parser::{decode_response, extract_json_object, ResponseFormat};
pub use prompts::build_match_prompt;
pub use types::{
    Amenities, HardMetrics, MatchDecision, MatchLabel, PairRecord, PairResult, RoomRecord,
    SideRecord, SoftMetrics,
};
