//! In-memory tab source with scripted linear histories.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::protocol::{LoadStatus, TabInfo};

use super::source::{NavigationState, TabScope, TabSource};

/// Window id treated as the focused window.
pub(crate) const CURRENT_WINDOW: u32 = 1;

/// Shorthand for a known-valid tab id.
pub(crate) fn tab(id: u32) -> TabId {
    TabId::new(id).expect("non-zero tab id")
}

/// Tab source operation, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Enumerate,
    Activate,
    State,
    Back,
    Forward,
}

struct ScriptedTab {
    id: TabId,
    window: u32,
    history: Vec<String>,
    index: usize,
    pending_polls: u32,
    pending_remaining: u32,
    activates_as: Option<TabId>,
}

#[derive(Default)]
struct ScriptState {
    tabs: Vec<ScriptedTab>,
    calls: Vec<(Op, Option<TabId>)>,
    failures: Vec<(Option<TabId>, Op)>,
    nth_failures: Vec<(TabId, Op, usize)>,
}

impl ScriptState {
    fn record(&mut self, op: Op, tab_id: Option<TabId>) -> Result<()> {
        self.calls.push((op, tab_id));
        let nth = self
            .calls
            .iter()
            .filter(|(o, t)| *o == op && *t == tab_id)
            .count();
        let fails = self
            .failures
            .iter()
            .any(|(t, o)| *o == op && (t.is_none() || *t == tab_id))
            || self
                .nth_failures
                .iter()
                .any(|(t, o, n)| *o == op && Some(*t) == tab_id && *n == nth);
        if fails {
            return Err(Error::protocol(format!("scripted {op:?} failure")));
        }
        Ok(())
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Result<&mut ScriptedTab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id || t.activates_as == Some(tab_id))
            .ok_or_else(|| Error::tab_not_found(tab_id))
    }
}

/// Fake browser whose tabs move through fixed histories.
#[derive(Default)]
pub(crate) struct ScriptedTabs {
    state: Mutex<ScriptState>,
}

impl ScriptedTabs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a tab in the focused window positioned at `index`.
    pub(crate) fn with_tab(self, id: u32, history: &[&str], index: usize) -> Self {
        self.with_tab_in_window(id, CURRENT_WINDOW, history, index)
    }

    pub(crate) fn with_tab_in_window(
        self,
        id: u32,
        window: u32,
        history: &[&str],
        index: usize,
    ) -> Self {
        assert!(index < history.len(), "start index outside history");
        self.state.lock().tabs.push(ScriptedTab {
            id: tab(id),
            window,
            history: history.iter().map(|u| (*u).to_string()).collect(),
            index,
            pending_polls: 0,
            pending_remaining: 0,
            activates_as: None,
        });
        self
    }

    /// Reports `polls` loading polls initially and after every navigation.
    pub(crate) fn with_pending_polls(self, id: u32, polls: u32) -> Self {
        {
            let mut state = self.state.lock();
            let scripted = state.tab_mut(tab(id)).expect("scripted tab");
            scripted.pending_polls = polls;
            scripted.pending_remaining = polls;
        }
        self
    }

    /// Makes the tab report "loading" forever.
    pub(crate) fn stuck_loading(self, id: u32) -> Self {
        self.with_pending_polls(id, u32::MAX)
    }

    /// Loaded now, but every navigation leaves the tab loading forever.
    pub(crate) fn stuck_after_navigation(self, id: u32) -> Self {
        {
            let mut state = self.state.lock();
            let scripted = state.tab_mut(tab(id)).expect("scripted tab");
            scripted.pending_polls = u32::MAX;
            scripted.pending_remaining = 0;
        }
        self
    }

    /// Makes activation report a new id for the tab.
    pub(crate) fn activates_as(self, id: u32, new_id: u32) -> Self {
        {
            let mut state = self.state.lock();
            let scripted = state.tab_mut(tab(id)).expect("scripted tab");
            scripted.activates_as = Some(tab(new_id));
        }
        self
    }

    /// Fails every `op` on the given tab.
    pub(crate) fn fail_on(self, id: u32, op: Op) -> Self {
        self.state.lock().failures.push((Some(tab(id)), op));
        self
    }

    /// Fails only the `n`th call (1-based) of `op` on the given tab.
    pub(crate) fn fail_nth(self, id: u32, op: Op, n: usize) -> Self {
        self.state.lock().nth_failures.push((tab(id), op, n));
        self
    }

    /// Fails `op` regardless of tab.
    pub(crate) fn fail_always(self, op: Op) -> Self {
        self.state.lock().failures.push((None, op));
        self
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.state.lock().calls.iter().filter(|(o, _)| *o == op).count()
    }

    /// Every operation in call order.
    pub(crate) fn ops(&self) -> Vec<Op> {
        self.state.lock().calls.iter().map(|(o, _)| *o).collect()
    }

    /// Calls that touch a tab (everything except enumerate).
    pub(crate) fn tab_calls(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(o, _)| *o != Op::Enumerate)
            .count()
    }

    pub(crate) fn index(&self, id: u32) -> usize {
        self.state.lock().tab_mut(tab(id)).expect("scripted tab").index
    }

    pub(crate) fn current_url(&self, id: u32) -> String {
        let mut state = self.state.lock();
        let scripted = state.tab_mut(tab(id)).expect("scripted tab");
        scripted.history[scripted.index].clone()
    }
}

#[async_trait]
impl TabSource for ScriptedTabs {
    async fn enumerate(&self, scope: TabScope) -> Result<Vec<TabId>> {
        let mut state = self.state.lock();
        state.record(Op::Enumerate, None)?;
        Ok(state
            .tabs
            .iter()
            .filter(|t| scope == TabScope::AllWindows || t.window == CURRENT_WINDOW)
            .map(|t| t.id)
            .collect())
    }

    async fn activate(&self, tab_id: TabId) -> Result<TabInfo> {
        let mut state = self.state.lock();
        state.record(Op::Activate, Some(tab_id))?;
        let scripted = state.tab_mut(tab_id)?;
        let status = if scripted.pending_remaining > 0 {
            LoadStatus::Pending
        } else {
            LoadStatus::Complete
        };
        Ok(TabInfo {
            tab_id: scripted.activates_as.unwrap_or(scripted.id),
            url: scripted.history[scripted.index].clone(),
            title: format!("Tab {}", scripted.id),
            status,
        })
    }

    async fn state(&self, tab_id: TabId) -> Result<NavigationState> {
        let mut state = self.state.lock();
        state.record(Op::State, Some(tab_id))?;
        let scripted = state.tab_mut(tab_id)?;
        let status = if scripted.pending_remaining > 0 {
            scripted.pending_remaining -= 1;
            LoadStatus::Pending
        } else {
            LoadStatus::Complete
        };
        Ok(NavigationState {
            url: scripted.history[scripted.index].clone(),
            status,
        })
    }

    async fn go_back(&self, tab_id: TabId) -> Result<()> {
        let mut state = self.state.lock();
        state.record(Op::Back, Some(tab_id))?;
        let scripted = state.tab_mut(tab_id)?;
        scripted.index = scripted.index.saturating_sub(1);
        scripted.pending_remaining = scripted.pending_polls;
        Ok(())
    }

    async fn go_forward(&self, tab_id: TabId) -> Result<()> {
        let mut state = self.state.lock();
        state.record(Op::Forward, Some(tab_id))?;
        let scripted = state.tab_mut(tab_id)?;
        if scripted.index + 1 < scripted.history.len() {
            scripted.index += 1;
        }
        scripted.pending_remaining = scripted.pending_polls;
        Ok(())
    }
}
