//! room-bench-rust
//!
//! 客室マッチング精度ベンチマークのCLI実装。
//! 共有ロジック（デコーダー・オラクル・評価エンジン）は
//! room_bench_common クレート側にある。

pub mod ai_provider;
pub mod backend;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod strategy;
