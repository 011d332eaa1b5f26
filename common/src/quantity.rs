//! 数量入力
//!
//! 変更イベントのたびに `[min, max]` に丸める。数値でない入力は `min` になる。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityInput {
    min: u32,
    max: u32,
    value: u32,
}

impl QuantityInput {
    /// `min > max` の場合は入れ替える
    pub fn new(min: u32, max: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, max, value: min }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// 入力欄の変更イベント
    pub fn on_change(&mut self, raw: &str) -> u32 {
        self.value = match raw.trim().parse::<i64>() {
            Ok(n) => n.clamp(i64::from(self.min), i64::from(self.max)) as u32,
            Err(_) => self.min,
        };
        self.value
    }

    pub fn increment(&mut self) -> u32 {
        self.value = self.value.saturating_add(1).min(self.max);
        self.value
    }

    pub fn decrement(&mut self) -> u32 {
        self.value = self.value.saturating_sub(1).max(self.min);
        self.value
    }
}
