//! リクエストトークン
//!
//! 論理チャネル（検索、統計など）ごとに単調増加するトークンを発行し、
//! 最新でないトークンのレスポンスを破棄するために使う。

/// 発行済みトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// チャネル単位のトークン発行器
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいトークンを発行する。以前のトークンはすべて古くなる
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// 発行済みトークンをすべて無効にする（表示の取り消し時など）
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}
