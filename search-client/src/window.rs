//! Incrementally growing view of one file around a search hit.
//!
//! A [`CodeWindowLoader`] starts with the hit's own lines and grows the
//! window outward on request. At most one fetch is in flight per window;
//! requests that arrive meanwhile are queued and drained, in arrival order,
//! by whichever call owns the fetch once the file content is available.

use crate::backend::FileContent;
use crate::backend::FileFetcher;
use crate::settings::CodebaseSettings;
use codesearch_protocol::MatchResult;
use codesearch_protocol::SubMatch;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use tokio::sync::watch;
use tracing::debug;
use tracing::warn;

/// Lines added per expansion when the caller has no preference.
pub const DEFAULT_STEP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pending {
    #[default]
    None,
    ExpandUp,
    ExpandDown,
}

impl From<Direction> for Pending {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::ExpandUp,
            Direction::Down => Self::ExpandDown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// The request (and anything queued behind it) was applied.
    Applied { window_from: u32, window_to: u32 },
    /// Another expansion is in flight; this one runs after it.
    Queued,
    /// The window already reaches the start or end of the file.
    AtBoundary,
    /// The fetch failed; the window is unchanged and the error is shown.
    Failed { message: String },
    /// The loader was closed while the request was outstanding.
    Closed,
}

/// Materialized window of a file. Bounds are 1-based and inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeWindow {
    pub lines: Vec<String>,
    pub window_from: u32,
    pub window_to: u32,
    pub file_total_lines: Option<u32>,
}

impl CodeWindow {
    /// Line count implied by the bounds.
    pub fn span(&self) -> usize {
        (self.window_to - self.window_from) as usize + 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    pub number: u32,
    pub text: String,
    pub matched: bool,
}

#[derive(Clone, Copy, Debug)]
struct Expansion {
    direction: Direction,
    step: u32,
}

struct CachedFile {
    codebase_path: Option<String>,
    content: Arc<FileContent>,
}

struct WindowState {
    window: CodeWindow,
    pending: Pending,
    queue: VecDeque<Expansion>,
    error: Option<String>,
    cache: Option<CachedFile>,
    codebase_rx: watch::Receiver<Option<String>>,
    alive: bool,
}

impl WindowState {
    fn at_boundary(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.window.window_from <= 1,
            Direction::Down => self
                .window
                .file_total_lines
                .is_some_and(|total| self.window.window_to >= total),
        }
    }

    fn apply(&mut self, request: Expansion, file: &FileContent) {
        let total = file.total_lines();
        self.window.file_total_lines = Some(total);
        let window = &mut self.window;
        if window.lines.len() != window.span() {
            // Snippet disagreed with its line range; trust the file.
            window.window_to = window.window_to.min(total).max(window.window_from);
            window.lines = file.slice(window.window_from, window.window_to).to_vec();
            debug!(
                "resynced window [{}, {}] from fetched file",
                window.window_from, window.window_to
            );
        }
        match request.direction {
            Direction::Up => {
                let new_from = window
                    .window_from
                    .saturating_sub(request.step)
                    .saturating_sub(1)
                    .max(1);
                if new_from < window.window_from {
                    let mut lines = file.slice(new_from, window.window_from - 1).to_vec();
                    lines.append(&mut window.lines);
                    window.lines = lines;
                    window.window_from = new_from;
                }
            }
            Direction::Down => {
                let new_to = window.window_to.saturating_add(request.step).min(total);
                if new_to > window.window_to {
                    let lines = file.slice(window.window_to + 1, new_to);
                    window.lines.extend_from_slice(lines);
                    window.window_to = new_to;
                }
            }
        }
    }
}

struct WindowTarget {
    file_path: String,
    file_name: String,
    sub_matches: Vec<SubMatch>,
}

/// Grows the visible window of one hit's file. Clones share state.
#[derive(Clone)]
pub struct CodeWindowLoader {
    target: Arc<WindowTarget>,
    fetcher: Arc<dyn FileFetcher>,
    settings: CodebaseSettings,
    state: Arc<Mutex<WindowState>>,
}

impl CodeWindowLoader {
    pub fn new(hit: &MatchResult, fetcher: Arc<dyn FileFetcher>, settings: CodebaseSettings) -> Self {
        let window = CodeWindow {
            lines: hit.snippet().lines().map(str::to_string).collect(),
            window_from: hit.line_from.max(1),
            window_to: hit.line_to.max(hit.line_from.max(1)),
            file_total_lines: None,
        };
        if window.lines.len() != window.span() {
            warn!(
                "snippet for {} has {} lines but covers {}..={}; resyncing on first fetch",
                hit.file_path(),
                window.lines.len(),
                window.window_from,
                window.window_to
            );
        }
        let state = WindowState {
            window,
            pending: Pending::None,
            queue: VecDeque::new(),
            error: None,
            cache: None,
            codebase_rx: settings.subscribe(),
            alive: true,
        };
        Self {
            target: Arc::new(WindowTarget {
                file_path: hit.file_path().to_string(),
                file_name: hit.file_name().to_string(),
                sub_matches: hit.sub_matches.clone(),
            }),
            fetcher,
            settings,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn file_path(&self) -> &str {
        &self.target.file_path
    }

    pub fn window(&self) -> CodeWindow {
        self.lock().window.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Clear the shown error without touching the window.
    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    pub fn pending(&self) -> Pending {
        self.lock().pending
    }

    pub fn loading(&self) -> bool {
        self.pending() != Pending::None
    }

    pub fn can_expand_up(&self) -> bool {
        !self.lock().at_boundary(Direction::Up)
    }

    pub fn can_expand_down(&self) -> bool {
        !self.lock().at_boundary(Direction::Down)
    }

    /// Stop accepting work. Fetches that resolve afterwards are dropped.
    pub fn close(&self) {
        let mut state = self.lock();
        state.alive = false;
        state.queue.clear();
    }

    pub fn is_closed(&self) -> bool {
        !self.lock().alive
    }

    pub async fn expand_up(&self, step: u32) -> ExpandOutcome {
        self.expand(Direction::Up, step).await
    }

    pub async fn expand_down(&self, step: u32) -> ExpandOutcome {
        self.expand(Direction::Down, step).await
    }

    pub async fn expand(&self, direction: Direction, step: u32) -> ExpandOutcome {
        let request = Expansion { direction, step };
        {
            let mut state = self.lock();
            if !state.alive {
                return ExpandOutcome::Closed;
            }
            if state.pending != Pending::None {
                debug!(
                    "queueing {direction:?} expansion of {} behind {:?}",
                    self.target.file_path, state.pending
                );
                state.queue.push_back(request);
                return ExpandOutcome::Queued;
            }
            if state.at_boundary(direction) {
                return ExpandOutcome::AtBoundary;
            }
            state.pending = direction.into();
            state.error = None;
        }

        self.drive(request).await
    }

    // Applies `first`, then every request queued while it was in flight.
    // `pending` is cleared under the same lock that finds the queue empty,
    // so a request queued concurrently is never stranded.
    async fn drive(&self, first: Expansion) -> ExpandOutcome {
        let mut request = first;
        loop {
            let fetched = self.file_content().await;
            let mut state = self.lock();
            let file = match fetched {
                Ok(file) => file,
                Err(message) => {
                    state.pending = Pending::None;
                    if !state.queue.is_empty() {
                        debug!(
                            "dropping {} queued expansions of {} after failure",
                            state.queue.len(),
                            self.target.file_path
                        );
                        state.queue.clear();
                    }
                    if state.alive {
                        state.error = Some(message.clone());
                    }
                    return ExpandOutcome::Failed { message };
                }
            };
            if !state.alive {
                debug!("{} closed before fetch resolved", self.target.file_path);
                state.pending = Pending::None;
                return ExpandOutcome::Closed;
            }
            state.apply(request, &file);
            match state.queue.pop_front() {
                Some(queued) => {
                    debug!(
                        "draining queued {:?} expansion of {}",
                        queued.direction, self.target.file_path
                    );
                    state.pending = queued.direction.into();
                    request = queued;
                }
                None => {
                    state.pending = Pending::None;
                    return ExpandOutcome::Applied {
                        window_from: state.window.window_from,
                        window_to: state.window.window_to,
                    };
                }
            }
        }
    }

    async fn file_content(&self) -> Result<Arc<FileContent>, String> {
        let codebase_path = {
            let mut state = self.lock();
            if state.codebase_rx.has_changed().unwrap_or(false) {
                state.codebase_rx.mark_unchanged();
                state.cache = None;
            }
            let current = self.settings.get();
            if let Some(cached) = &state.cache
                && cached.codebase_path == current
            {
                return Ok(cached.content.clone());
            }
            current
        };

        debug!(
            "fetching {} (codebase {:?})",
            self.target.file_path, codebase_path
        );
        let fetched = self
            .fetcher
            .fetch_file(&self.target.file_path, codebase_path.as_deref())
            .await;
        match fetched {
            Ok(content) => {
                let content = Arc::new(content);
                let mut state = self.lock();
                if state.alive {
                    state.cache = Some(CachedFile {
                        codebase_path,
                        content: content.clone(),
                    });
                }
                Ok(content)
            }
            Err(err) => {
                warn!("failed to fetch {}: {err}", self.target.file_path);
                let message = if err.is_transport() {
                    "Failed to get the file".to_string()
                } else {
                    err.to_string()
                };
                Err(message)
            }
        }
    }

    pub fn is_matched(&self, line: u32) -> bool {
        line_is_matched(&self.target.sub_matches, line)
    }

    pub fn rendered_lines(&self) -> Vec<RenderedLine> {
        let window = self.window();
        window
            .lines
            .into_iter()
            .zip(window.window_from..)
            .map(|(text, number)| RenderedLine {
                matched: self.is_matched(number),
                number,
                text,
            })
            .collect()
    }

    pub fn upper_caption(&self) -> String {
        let state = self.lock();
        if let Some(error) = &state.error {
            return error.clone();
        }
        format!(
            "@@ 1 - {} of {}",
            state.window.window_from.saturating_sub(1),
            self.target.file_name
        )
    }

    pub fn lower_caption(&self) -> String {
        let state = self.lock();
        if let Some(error) = &state.error {
            return error.clone();
        }
        let end = state
            .window
            .file_total_lines
            .map_or_else(|| "end".to_string(), |total| total.to_string());
        format!(
            "@@ {} - {end} of {}",
            state.window.window_to + 1,
            self.target.file_name
        )
    }

    pub fn expand_up_hint(&self, step: u32) -> String {
        let from = self.lock().window.window_from;
        let lower = from.saturating_sub(step).saturating_sub(1).max(1);
        format!("Load {lower} to {}", from.saturating_sub(1))
    }

    pub fn expand_down_hint(&self, step: u32) -> String {
        let state = self.lock();
        let to = state.window.window_to;
        let mut upper = to.saturating_add(step);
        if let Some(total) = state.window.file_total_lines {
            upper = upper.min(total);
        }
        format!("Load {} to {upper}", to + 1)
    }
}

/// Whether absolute line `line` falls inside any sub-match.
pub fn line_is_matched(sub_matches: &[SubMatch], line: u32) -> bool {
    sub_matches.iter().any(|sub| sub.contains(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::error::Result;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    fn numbered(count: u32) -> FileContent {
        FileContent::new("src/lib.rs", (1..=count).map(|n| format!("line {n}")).collect())
    }

    fn hit(from: u32, to: u32) -> MatchResult {
        let snippet: String = (from..=to).map(|n| format!("line {n}\n")).collect();
        MatchResult::new("src/lib.rs", from, to).with_snippet(snippet)
    }

    struct StaticFetcher {
        file: FileContent,
        calls: AtomicUsize,
        codebases: Mutex<Vec<Option<String>>>,
    }

    impl StaticFetcher {
        fn new(count: u32) -> Arc<Self> {
            Arc::new(Self {
                file: numbered(count),
                calls: AtomicUsize::new(0),
                codebases: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl FileFetcher for StaticFetcher {
        async fn fetch_file(&self, _path: &str, codebase_path: Option<&str>) -> Result<FileContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.codebases
                .lock()
                .expect("lock")
                .push(codebase_path.map(str::to_string));
            Ok(self.file.clone())
        }
    }

    /// Holds every fetch until released.
    struct GatedFetcher {
        file: FileContent,
        gate: Notify,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl FileFetcher for GatedFetcher {
        async fn fetch_file(&self, _path: &str, _codebase_path: Option<&str>) -> Result<FileContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            if self.fail {
                return Err(ClientError::Transport("connection reset".to_string()));
            }
            Ok(self.file.clone())
        }
    }

    fn gated(count: u32, fail: bool) -> Arc<GatedFetcher> {
        Arc::new(GatedFetcher {
            file: numbered(count),
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn expected_lines(from: u32, to: u32) -> Vec<String> {
        (from..=to).map(|n| format!("line {n}")).collect()
    }

    async fn wait_for_fetch(fetcher: &GatedFetcher) {
        while fetcher.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn expand_up_prepends_and_moves_lower_bound() {
        let fetcher = StaticFetcher::new(120);
        let loader = CodeWindowLoader::new(&hit(50, 60), fetcher, CodebaseSettings::default());

        let outcome = loader.expand_up(DEFAULT_STEP).await;

        assert_eq!(
            outcome,
            ExpandOutcome::Applied {
                window_from: 39,
                window_to: 60
            }
        );
        let window = loader.window();
        assert_eq!(window.lines, expected_lines(39, 60));
        assert_eq!(window.file_total_lines, Some(120));
        assert_eq!(loader.pending(), Pending::None);
    }

    #[tokio::test]
    async fn expand_up_clamps_at_first_line() {
        let fetcher = StaticFetcher::new(40);
        let loader = CodeWindowLoader::new(&hit(5, 8), fetcher.clone(), CodebaseSettings::default());

        loader.expand_up(DEFAULT_STEP).await;
        let window = loader.window();
        assert_eq!(window.window_from, 1);
        assert_eq!(window.lines, expected_lines(1, 8));
        assert!(!loader.can_expand_up());

        assert_eq!(loader.expand_up(DEFAULT_STEP).await, ExpandOutcome::AtBoundary);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expand_down_clamps_at_file_end() {
        let fetcher = StaticFetcher::new(25);
        let loader = CodeWindowLoader::new(&hit(10, 12), fetcher.clone(), CodebaseSettings::default());
        assert!(loader.can_expand_down());
        assert_eq!(loader.lower_caption(), "@@ 13 - end of lib.rs");

        loader.expand_down(DEFAULT_STEP).await;
        assert_eq!(loader.window().window_to, 22);
        loader.expand_down(DEFAULT_STEP).await;

        let window = loader.window();
        assert_eq!(window.window_to, 25);
        assert_eq!(window.lines, expected_lines(10, 25));
        assert!(!loader.can_expand_down());
        assert_eq!(loader.expand_down(DEFAULT_STEP).await, ExpandOutcome::AtBoundary);
        // the second expansion reused the cached copy
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.lower_caption(), "@@ 26 - 25 of lib.rs");
    }

    #[tokio::test]
    async fn rapid_requests_apply_in_order_with_one_fetch() {
        let fetcher = gated(200, false);
        let loader = CodeWindowLoader::new(&hit(50, 60), fetcher.clone(), CodebaseSettings::default());

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.expand_up(DEFAULT_STEP).await }
        });
        wait_for_fetch(&fetcher).await;
        assert_eq!(loader.pending(), Pending::ExpandUp);

        assert_eq!(loader.expand_up(DEFAULT_STEP).await, ExpandOutcome::Queued);
        assert_eq!(loader.expand_down(5).await, ExpandOutcome::Queued);

        fetcher.gate.notify_one();
        let outcome = first.await.expect("join");

        assert_eq!(
            outcome,
            ExpandOutcome::Applied {
                window_from: 28,
                window_to: 65
            }
        );
        assert_eq!(loader.window().lines, expected_lines(28, 65));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.pending(), Pending::None);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_window_and_reports_error() {
        let fetcher = gated(100, true);
        let loader = CodeWindowLoader::new(&hit(20, 22), fetcher.clone(), CodebaseSettings::default());
        let before = loader.window();

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.expand_down(DEFAULT_STEP).await }
        });
        wait_for_fetch(&fetcher).await;
        assert_eq!(loader.expand_up(DEFAULT_STEP).await, ExpandOutcome::Queued);
        fetcher.gate.notify_one();

        assert_eq!(
            first.await.expect("join"),
            ExpandOutcome::Failed {
                message: "Failed to get the file".to_string()
            }
        );
        assert_eq!(loader.window(), before);
        assert_eq!(loader.pending(), Pending::None);
        assert_eq!(loader.error().as_deref(), Some("Failed to get the file"));
        assert_eq!(loader.upper_caption(), "Failed to get the file");
        assert_eq!(loader.lower_caption(), "Failed to get the file");
    }

    #[tokio::test]
    async fn dismissed_error_restores_captions() {
        let fetcher = gated(100, true);
        let loader = CodeWindowLoader::new(&hit(20, 22), fetcher.clone(), CodebaseSettings::default());

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.expand_down(DEFAULT_STEP).await }
        });
        wait_for_fetch(&fetcher).await;
        fetcher.gate.notify_one();
        assert!(matches!(first.await.expect("join"), ExpandOutcome::Failed { .. }));
        assert_eq!(loader.error().as_deref(), Some("Failed to get the file"));

        loader.dismiss_error();
        assert_eq!(loader.error(), None);
        assert_eq!(loader.upper_caption(), "@@ 1 - 19 of lib.rs");
        assert_eq!(loader.lower_caption(), "@@ 23 - end of lib.rs");
        assert_eq!(loader.window().lines, expected_lines(20, 22));
    }

    #[tokio::test]
    async fn short_snippet_is_resynced_from_file() {
        let fetcher = StaticFetcher::new(20);
        let hit = MatchResult::new("src/lib.rs", 5, 7).with_snippet("line 5");
        let loader = CodeWindowLoader::new(&hit, fetcher, CodebaseSettings::default());

        loader.expand_down(2).await;

        let window = loader.window();
        assert_eq!((window.window_from, window.window_to), (5, 9));
        assert_eq!(window.lines, expected_lines(5, 9));
        let numbers: Vec<u32> = loader.rendered_lines().iter().map(|line| line.number).collect();
        assert_eq!(numbers, (5..=9).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_are_never_stranded() {
        for _ in 0..50 {
            let fetcher = StaticFetcher::new(500);
            let loader = CodeWindowLoader::new(&hit(100, 100), fetcher, CodebaseSettings::default());

            let tasks: Vec<_> = (0..16)
                .map(|_| {
                    let loader = loader.clone();
                    tokio::spawn(async move { loader.expand_down(1).await })
                })
                .collect();
            for task in tasks {
                task.await.expect("join");
            }

            assert_eq!(loader.pending(), Pending::None);
            let window = loader.window();
            assert_eq!(window.window_to, 116);
            assert_eq!(window.lines, expected_lines(100, 116));
        }
    }

    #[tokio::test]
    async fn request_after_drain_runs_immediately() {
        let fetcher = gated(200, false);
        let loader = CodeWindowLoader::new(&hit(50, 60), fetcher.clone(), CodebaseSettings::default());

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.expand_down(5).await }
        });
        wait_for_fetch(&fetcher).await;
        assert_eq!(loader.expand_down(5).await, ExpandOutcome::Queued);
        fetcher.gate.notify_one();
        first.await.expect("join");

        assert_eq!(loader.pending(), Pending::None);
        assert_eq!(
            loader.expand_down(5).await,
            ExpandOutcome::Applied {
                window_from: 50,
                window_to: 75
            }
        );
    }

    #[tokio::test]
    async fn late_fetch_after_close_is_dropped() {
        let fetcher = gated(100, false);
        let loader = CodeWindowLoader::new(&hit(50, 52), fetcher.clone(), CodebaseSettings::default());
        let before = loader.window();

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.expand_up(DEFAULT_STEP).await }
        });
        wait_for_fetch(&fetcher).await;
        loader.close();
        fetcher.gate.notify_one();

        assert_eq!(first.await.expect("join"), ExpandOutcome::Closed);
        assert_eq!(loader.window(), before);
        assert_eq!(loader.expand_down(DEFAULT_STEP).await, ExpandOutcome::Closed);
    }

    #[tokio::test]
    async fn codebase_change_applies_to_next_fetch() {
        let fetcher = StaticFetcher::new(100);
        let settings = CodebaseSettings::new(Some("/srv/one".to_string()));
        let loader = CodeWindowLoader::new(&hit(50, 52), fetcher.clone(), settings.clone());

        loader.expand_up(2).await;
        settings.set("/srv/two").expect("set");
        loader.expand_up(2).await;

        assert_eq!(
            *fetcher.codebases.lock().expect("lock"),
            vec![Some("/srv/one".to_string()), Some("/srv/two".to_string())]
        );
    }

    #[tokio::test]
    async fn rendered_lines_flag_sub_matches() {
        let fetcher = StaticFetcher::new(30);
        let hit = hit(10, 12).with_sub_matches(vec![SubMatch {
            overlap_from: 11,
            overlap_to: 11,
        }]);
        let loader = CodeWindowLoader::new(&hit, fetcher, CodebaseSettings::default());

        let flags: Vec<(u32, bool)> = loader
            .rendered_lines()
            .iter()
            .map(|line| (line.number, line.matched))
            .collect();
        assert_eq!(flags, vec![(10, false), (11, true), (12, false)]);
        assert_eq!(loader.upper_caption(), "@@ 1 - 9 of lib.rs");
        assert_eq!(loader.expand_up_hint(DEFAULT_STEP), "Load 1 to 9");
        assert_eq!(loader.expand_down_hint(DEFAULT_STEP), "Load 13 to 22");
    }

    #[test]
    fn sub_match_bounds_are_inclusive() {
        let subs = [SubMatch {
            overlap_from: 3,
            overlap_to: 5,
        }];
        assert!(!line_is_matched(&subs, 2));
        assert!(line_is_matched(&subs, 3));
        assert!(line_is_matched(&subs, 5));
        assert!(!line_is_matched(&subs, 6));
        assert!(!line_is_matched(&[], 1));
    }
}
