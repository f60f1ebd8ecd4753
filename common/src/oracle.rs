//! サイズ正解判定（プロキシ正解）
//!
//! 2室のsizeだけを根拠に「真に同一とみなすか」を判定する。
//! 閾値ポリシーは2系統を選択式で持つ:
//! - Spd: 対称化パーセント差 2|a-b|/(a+b) <= 0.2（正準）
//! - Absolute: 絶対差 |a-b| <= 1.0（旧方式）

use serde::{Deserialize, Serialize};

/// サイズ正解判定ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum SizePolicy {
    /// 対称化パーセント差（SPD）による判定
    Spd { threshold: f64 },
    /// 絶対差による判定
    Absolute { threshold: f64 },
}

impl SizePolicy {
    pub const DEFAULT_SPD_THRESHOLD: f64 = 0.2;
    pub const DEFAULT_ABSOLUTE_THRESHOLD: f64 = 1.0;

    /// 正準ポリシー（SPD 20%）
    pub fn spd() -> Self {
        SizePolicy::Spd {
            threshold: Self::DEFAULT_SPD_THRESHOLD,
        }
    }

    /// 旧ポリシー（絶対差 1.0）
    pub fn absolute() -> Self {
        SizePolicy::Absolute {
            threshold: Self::DEFAULT_ABSOLUTE_THRESHOLD,
        }
    }

    /// サイズ正解判定
    ///
    /// どちらかが欠損または0以下ならfalse。失敗モードは持たない。
    pub fn size_correct(&self, a: Option<f64>, b: Option<f64>) -> bool {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if a <= 0.0 || b <= 0.0 {
            return false;
        }

        match self {
            SizePolicy::Spd { threshold } => {
                // SPD = 2*|A - B| / (A + B)
                let spd = 2.0 * (a - b).abs() / (a + b);
                spd <= *threshold
            }
            SizePolicy::Absolute { threshold } => (a - b).abs() <= *threshold,
        }
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::spd()
    }
}

impl std::str::FromStr for SizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spd" | "percent" => Ok(Self::spd()),
            "absolute" | "abs" => Ok(Self::absolute()),
            _ => Err(format!("Unknown size policy: {}. Use spd or absolute", s)),
        }
    }
}

impl std::fmt::Display for SizePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizePolicy::Spd { threshold } => write!(f, "spd({})", threshold),
            SizePolicy::Absolute { threshold } => write!(f, "absolute({})", threshold),
        }
    }
}
