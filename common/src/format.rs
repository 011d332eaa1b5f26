//! 価格表示
//!
//! 小数点以下2桁、インド式の桁区切り（下3桁、以降2桁ごと）。

/// 数値にならない価格の表示
const UNAVAILABLE: &str = "--";

/// 通貨記号つきで価格を整形する（例: `₹1,200.50`）
///
/// NaN や無限大は `₹--` とする。符号は丸めた後の値で決める（`-0.001` は `₹0.00`）。
pub fn format_price(amount: f64, currency_symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{}{}", currency_symbol, UNAVAILABLE);
    }
    let fixed = format!("{:.2}", amount.abs());
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}{}{}.{}", sign, currency_symbol, group_indian(integer), fraction)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
