//! プロンプト生成モジュール
//!
//! 客室マッチング判定用のプロンプトを生成する。
//! ルール文書は全フォーマット共通で、出力指定だけが
//! ResponseFormat（json / xml / plain）によって切り替わる。

use crate::parser::ResponseFormat;
use crate::types::RoomRecord;

/// マッチング規則文書（全プロンプト共通）
const MATCHING_RULES: &str = r#"## Matching Rules (By Priority)

### 1. Room Type Tier Matching (Highest Priority)
**Standard Room Type Tiers:**
- Basic/Standard/Classic → Standard Room
- Superior/Comfort/Plus → Superior Room
- Deluxe/Premium → Deluxe Room
- Executive/Club → Executive Room
- Suite/Junior Suite → Suite Room
- Villa/Penthouse/Apartment → Special Room Types

**Matching Rules:**
- Same tier → matched
- Adjacent tiers → matched
- Cross-tier (e.g., Standard vs Deluxe) → mismatched

**Ignored Marketing Words:**
Ignore differences in these words: Premier, Grand, Luxury, Social, Corner, City, Garden, Romantic, Modern, Classic, and all view-related words (River View, Mountain View, etc.)

### 2. Occupancy Matching
- Occupancy difference ≤2 people → matched
- Occupancy difference >2 people → mismatched
- When data is missing, infer reasonableness from room name and bed type

### 3. Bed Type Matching (Lowest Priority)
**Compatible Bed Type Combinations:**
- King ↔ Queen ↔ Double → compatible
- 2 Single ↔ Twin → compatible
- 2 Single/Twin ↔ Queen/King → judge by occupancy

**Incompatible:**
- Single vs King/Queen (unless occupancy is 1)

### 4. Mandatory Mismatch Situations
The following differences must be marked as mismatched:
- Private pool (private pool, plunge pool)
- Kitchen facilities (kitchen, kitchenette)
- Beachfront location (beachfront, oceanfront, overwater)
- Special structures (penthouse, loft, duplex)
- Spa/Sauna (onsen, sauna, hot tub)
- Club privileges (club lounge access)
- Dual key configurations (dual key, twin key)
- Different accommodation types (hotel room vs apartment unit vs serviced apartment)

### 5. Missing Data Handling
- Missing bed type: Judge only by room name tier and occupancy
- Missing occupancy: Infer from room name tier and bed type
- Vague room name: Focus on bed type and occupancy compatibility

## Decision Principles
1. **Room type tier is the decisive factor**
2. **Marketing word differences do not affect matching**
3. **When in doubt, lean towards matched**
4. **Mandatory mismatch situations are exceptions**"#;

/// JSON出力指定
const OUTPUT_REQUIREMENTS_JSON: &str = r#"## Output Requirements
Output a JSON object with the following structure, do not add ```:
{
  "decision": "matched" or "mismatched",
  "confidence_score": 0.0 to 1.0,
  "reasoning": "Brief explanation of the decision based on the rules above"
}

**Example:**
{
  "decision": "matched",
  "confidence_score": 0.95,
  "reasoning": "Both are 'Deluxe' tier, bed types are compatible (King vs Double), and mandatory mismatch factors are not present."
}"#;

/// XMLエンベロープ出力指定
const OUTPUT_REQUIREMENTS_XML: &str = r#"## Output Requirements
Output a single <match_result> envelope with the following children, and no other text:
<match_result>
  <decision>matched or mismatched</decision>
  <confidence_score>0.0 to 1.0</confidence_score>
  <reasoning>Brief explanation of the decision based on the rules above</reasoning>
</match_result>"#;

/// プレーンテキスト出力指定
const OUTPUT_REQUIREMENTS_PLAIN: &str = r#"## Output Requirements
Strictly output one of the following:
- `matched`
- `mismatched`

**Do not include any explanations, reasons, or other text.**"#;

/// マッチング判定プロンプトを生成
///
/// # Arguments
/// * `tvl` - 自社側の客室ビュー
/// * `competitor` - 競合側の客室ビュー
/// * `format` - 期待する応答フォーマット（出力指定を切り替える）
pub fn build_match_prompt(
    tvl: &RoomRecord,
    competitor: &RoomRecord,
    format: ResponseFormat,
) -> String {
    let output_requirements = match format {
        ResponseFormat::Json => OUTPUT_REQUIREMENTS_JSON,
        ResponseFormat::Xml => OUTPUT_REQUIREMENTS_XML,
        ResponseFormat::Plain => OUTPUT_REQUIREMENTS_PLAIN,
    };

    format!(
        r#"You are a hotel room matching expert. Judge whether two rooms from different sources should be considered the same room type based on human-friendly understanding.

{rules}

{output_requirements}

---
{tvl_block}

{competitor_block}"#,
        rules = MATCHING_RULES,
        output_requirements = output_requirements,
        tvl_block = room_block("TVL Room", tvl),
        competitor_block = room_block("Competitor Room", competitor),
    )
}

/// 客室1件分の記述ブロックを生成
///
/// sizeは意図的に含めない（sizeは正解判定専用で、分類器には渡さない）
fn room_block(label: &str, room: &RoomRecord) -> String {
    let occupancy = room
        .occupancy
        .map(|o| o.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "{}:\n- Name: {}\n- Bed Type: {}\n- Occupancy: {}",
        label,
        if room.name.is_empty() { "unknown" } else { room.name.as_str() },
        room.bed_type.as_deref().unwrap_or("unknown"),
        occupancy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rooms() -> (RoomRecord, RoomRecord) {
        let tvl = RoomRecord {
            name: "Deluxe King Room".to_string(),
            size: Some(28.0),
            bed_type: Some("King".to_string()),
            occupancy: Some(2),
            ..Default::default()
        };
        let competitor = RoomRecord {
            name: "Deluxe Double".to_string(),
            size: Some(30.0),
            bed_type: Some("Double".to_string()),
            occupancy: Some(2),
            ..Default::default()
        };
        (tvl, competitor)
    }

    #[test]
    fn test_prompt_contains_room_fields() {
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Json);

        assert!(prompt.contains("Deluxe King Room"));
        assert!(prompt.contains("Deluxe Double"));
        assert!(prompt.contains("King"));
        assert!(prompt.contains("- Occupancy: 2"));
    }

    #[test]
    fn test_prompt_excludes_size() {
        // sizeは正解判定専用なのでプロンプトには出さない
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Json);
        assert!(!prompt.contains("28"));
        assert!(!prompt.contains("30"));
    }

    #[test]
    fn test_prompt_contains_rules() {
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Json);

        assert!(prompt.contains("Room Type Tier Matching"));
        assert!(prompt.contains("Mandatory Mismatch Situations"));
        assert!(prompt.contains("private pool"));
        assert!(prompt.contains("dual key"));
        assert!(prompt.contains("club lounge access"));
    }

    #[test]
    fn test_prompt_json_output_section() {
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Json);
        assert!(prompt.contains("\"decision\": \"matched\" or \"mismatched\""));
        assert!(prompt.contains("\"confidence_score\""));
    }

    #[test]
    fn test_prompt_xml_output_section() {
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Xml);
        assert!(prompt.contains("<match_result>"));
        assert!(prompt.contains("<decision>"));
        assert!(!prompt.contains("confidence_score\":"));
    }

    #[test]
    fn test_prompt_plain_output_section() {
        let (tvl, competitor) = sample_rooms();
        let prompt = build_match_prompt(&tvl, &competitor, ResponseFormat::Plain);
        assert!(prompt.contains("Strictly output one of the following"));
        assert!(prompt.contains("Do not include any explanations"));
    }

    #[test]
    fn test_prompt_missing_fields_use_unknown() {
        let empty = RoomRecord::default();
        let prompt = build_match_prompt(&empty, &empty, ResponseFormat::Json);
        assert!(prompt.contains("- Name: unknown"));
        assert!(prompt.contains("- Bed Type: unknown"));
        assert!(prompt.contains("- Occupancy: unknown"));
    }
}
