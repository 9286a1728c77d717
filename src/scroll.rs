use crate::search;

pub const DEFAULT_LOOKAHEAD: u16 = 2;
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 50;
pub const DEFAULT_MAX_LOADED_DURING_SEARCH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
    pub content_len: usize,
}

pub fn sentinel_visible(viewport: Viewport, lookahead: u16) -> bool {
    let bottom = viewport.offset + viewport.height + usize::from(lookahead);
    viewport.content_len >= viewport.offset && viewport.content_len < bottom
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub loading: bool,
    pub has_more: bool,
    pub query: String,
    pub filtered: usize,
    pub loaded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub lookahead: u16,
    pub max_search_results: usize,
    pub max_loaded_during_search: usize,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_loaded_during_search: DEFAULT_MAX_LOADED_DURING_SEARCH,
        }
    }
}

impl ScrollPolicy {
    pub fn should_load(&self, ctx: &LoadContext) -> bool {
        if ctx.loading || !ctx.has_more {
            return false;
        }
        if !search::is_active(&ctx.query) {
            return true;
        }
        ctx.filtered < self.max_search_results || ctx.loaded < self.max_loaded_during_search
    }
}

// A load-context change while the sentinel stays visible counts as a new sighting.
#[derive(Debug, Default, Clone)]
pub struct SentinelObserver {
    policy: ScrollPolicy,
    was_visible: bool,
    last_context: Option<LoadContext>,
}

impl SentinelObserver {
    pub fn new(policy: ScrollPolicy) -> Self {
        Self {
            policy,
            was_visible: false,
            last_context: None,
        }
    }

    pub fn policy(&self) -> &ScrollPolicy {
        &self.policy
    }

    pub fn observe(&mut self, visible: bool, ctx: &LoadContext) -> bool {
        let context_changed = self.last_context.as_ref() != Some(ctx);
        let entered = visible && (!self.was_visible || context_changed);
        self.was_visible = visible;
        if context_changed {
            self.last_context = Some(ctx.clone());
        }
        entered && self.policy.should_load(ctx)
    }
}
