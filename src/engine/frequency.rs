// ==========================================
// WCM 设备台账 - 频率展开器
// ==========================================
// 职责: 频率代码 → 一年内的周号集合 (1..=52)
// 红线: 固定查表,不做日历推算（3M=1/14/27/40 是约定值）
// ==========================================

use std::collections::BTreeSet;

use crate::domain::schedule::WEEKS_PER_YEAR;

// ==========================================
// FrequencyCode - 频率代码
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyCode {
    Weekly,     // 1W
    BiWeekly,   // 2W
    Monthly,    // M / 1M
    Quarterly,  // 3M
    HalfYearly, // 6M
    Yearly,     // 12M / Y
    Biennial,   // 24M（仅偶数年）
}

impl FrequencyCode {
    /// 解析频率代码（精确匹配，不去空格、不转大小写）
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "1W" => Some(FrequencyCode::Weekly),
            "2W" => Some(FrequencyCode::BiWeekly),
            "M" | "1M" => Some(FrequencyCode::Monthly),
            "3M" => Some(FrequencyCode::Quarterly),
            "6M" => Some(FrequencyCode::HalfYearly),
            "12M" | "Y" => Some(FrequencyCode::Yearly),
            "24M" => Some(FrequencyCode::Biennial),
            _ => None,
        }
    }

    /// 规范写法
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyCode::Weekly => "1W",
            FrequencyCode::BiWeekly => "2W",
            FrequencyCode::Monthly => "M",
            FrequencyCode::Quarterly => "3M",
            FrequencyCode::HalfYearly => "6M",
            FrequencyCode::Yearly => "12M",
            FrequencyCode::Biennial => "24M",
        }
    }

    /// 单年周表（Biennial 不在单年表内,见 `expand_in_year`）
    fn weeks(&self) -> BTreeSet<u32> {
        match self {
            FrequencyCode::Weekly => stepped(1),
            FrequencyCode::BiWeekly => stepped(2),
            FrequencyCode::Monthly => stepped(4),
            FrequencyCode::Quarterly => [1, 14, 27, 40].into_iter().collect(),
            FrequencyCode::HalfYearly => [1, 27].into_iter().collect(),
            FrequencyCode::Yearly => [1].into_iter().collect(),
            FrequencyCode::Biennial => BTreeSet::new(),
        }
    }
}

fn stepped(step: usize) -> BTreeSet<u32> {
    (1..=WEEKS_PER_YEAR).step_by(step).collect()
}

/// 频率代码 → 周号集合
///
/// 未知或空代码返回空集合（不报错）
pub fn expand(code: &str) -> BTreeSet<u32> {
    FrequencyCode::parse(code)
        .map(|freq| freq.weeks())
        .unwrap_or_default()
}

/// 按年份展开: 在 `expand` 基础上支持 24M（偶数年第 1 周）
pub fn expand_in_year(code: &str, year: i32) -> BTreeSet<u32> {
    match FrequencyCode::parse(code) {
        Some(FrequencyCode::Biennial) if year % 2 == 0 => [1].into_iter().collect(),
        Some(freq) => freq.weeks(),
        None => BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks(code: &str) -> Vec<u32> {
        expand(code).into_iter().collect()
    }

    #[test]
    fn test_weekly_covers_every_week() {
        assert_eq!(weeks("1W"), (1..=52).collect::<Vec<_>>());
    }

    #[test]
    fn test_biweekly_odd_weeks() {
        let w = weeks("2W");
        assert_eq!(w.len(), 26);
        assert_eq!(w.first(), Some(&1));
        assert_eq!(w.last(), Some(&51));
        assert!(w.iter().all(|n| n % 2 == 1));
    }

    #[test]
    fn test_monthly_every_fourth_week() {
        let expected: Vec<u32> = vec![1, 5, 9, 13, 17, 21, 25, 29, 33, 37, 41, 45, 49];
        assert_eq!(weeks("M"), expected);
        assert_eq!(weeks("1M"), expected);
    }

    #[test]
    fn test_fixed_tables() {
        assert_eq!(weeks("3M"), vec![1, 14, 27, 40]);
        assert_eq!(weeks("6M"), vec![1, 27]);
        assert_eq!(weeks("12M"), vec![1]);
        assert_eq!(weeks("Y"), vec![1]);
    }

    #[test]
    fn test_unknown_codes_expand_to_nothing() {
        assert!(expand("").is_empty());
        assert!(expand("bogus").is_empty());
        assert!(expand("3m").is_empty());
        assert!(expand(" 3M").is_empty());
        assert!(expand("24M").is_empty());
    }

    #[test]
    fn test_biennial_only_in_even_years() {
        assert_eq!(expand_in_year("24M", 2026).into_iter().collect::<Vec<_>>(), vec![1]);
        assert!(expand_in_year("24M", 2027).is_empty());
        assert_eq!(expand_in_year("6M", 2027), expand("6M"));
        assert!(expand_in_year("bogus", 2026).is_empty());
    }

    #[test]
    fn test_parse_round_trip_for_canonical_codes() {
        for code in ["1W", "2W", "M", "3M", "6M", "12M", "24M"] {
            assert_eq!(FrequencyCode::parse(code).map(|f| f.as_str()), Some(code));
        }
    }
}
