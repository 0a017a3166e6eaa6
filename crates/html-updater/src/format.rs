use chrono::{Datelike, NaiveDate};
use report_core::PriceSnapshot;

/// Headlines without a colon are cut to this many characters.
const HEADLINE_CHARS: usize = 30;

/// `"{name} : ${price} ({change}%)"` with two decimals and an explicit sign.
pub fn title_line(display_name: &str, price: &PriceSnapshot) -> String {
    format!(
        "{} : ${:.2} ({:+.2}%)",
        display_name, price.latest_close, price.daily_change_pct
    )
}

pub fn signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Cell class for a return value. Zero counts as negative.
pub fn performance_class(value: f64) -> &'static str {
    if value > 0.0 {
        "positive"
    } else {
        "negative"
    }
}

/// Emphasis text for a factor line: everything before the first colon, or the
/// first 30 characters when there is none.
pub fn headline(factor: &str) -> String {
    match factor.split_once(':') {
        Some((head, _)) => head.to_string(),
        None => factor.chars().take(HEADLINE_CHARS).collect(),
    }
}

pub fn footer(as_of: NaiveDate, attribution: &str) -> String {
    format!(
        "({:02}월 {:02}일 기준, {})",
        as_of.month(),
        as_of.day(),
        attribution
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_line() {
        let price = PriceSnapshot {
            latest_close: 248.5,
            prior_close: 250.0,
            daily_change_pct: -0.6,
        };
        assert_eq!(title_line("테슬라", &price), "테슬라 : $248.50 (-0.60%)");

        let up = PriceSnapshot {
            latest_close: 1234.567,
            prior_close: 1200.0,
            daily_change_pct: 2.88,
        };
        assert_eq!(title_line("Tesla", &up), "Tesla : $1234.57 (+2.88%)");
    }

    #[test]
    fn test_signed_pct_and_class() {
        assert_eq!(signed_pct(3.14159), "+3.14%");
        assert_eq!(signed_pct(-12.0), "-12.00%");
        assert_eq!(performance_class(0.01), "positive");
        assert_eq!(performance_class(0.0), "negative");
        assert_eq!(performance_class(-4.2), "negative");
    }

    #[test]
    fn test_headline_cuts_at_first_colon() {
        assert_eq!(
            headline("AI 칩 수요 폭증: ChatGPT 등 생성AI 붐: 추가"),
            "AI 칩 수요 폭증"
        );
    }

    #[test]
    fn test_headline_without_colon_keeps_thirty_chars() {
        let long = "가".repeat(45);
        assert_eq!(headline(&long).chars().count(), 30);
        assert_eq!(headline("짧은 문장"), "짧은 문장");
    }

    #[test]
    fn test_footer_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            footer(date, "estimated by Justin Kim Research"),
            "(03월 07일 기준, estimated by Justin Kim Research)"
        );
    }
}
