//! 管理画面サイドバーの開閉状態（ローカルストアに永続化）

use crate::error::Result;
use crate::store::LocalStore;

const SIDEBAR_KEY: &str = "sidebarCollapsed";

pub struct SidebarState {
    store: LocalStore,
    collapsed: bool,
}

impl SidebarState {
    /// 保存済みの状態を復元する
    pub fn restore(store: LocalStore) -> Self {
        let collapsed = store.get(SIDEBAR_KEY) == Some("true");
        Self { store, collapsed }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) -> Result<()> {
        self.store.set(SIDEBAR_KEY, if collapsed { "true" } else { "false" })?;
        self.collapsed = collapsed;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<bool> {
        self.set_collapsed(!self.collapsed)?;
        Ok(self.collapsed)
    }
}
