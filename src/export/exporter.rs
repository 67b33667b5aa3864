//! The export run: every tab through the history pipeline, then the sink.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::DISPLAY_NAME;
use crate::error::{Error, Result, Stage};
use crate::history::{
    StepPacing, TabSource, net_displacement, restore_position, scan_backward, scan_forward,
    wait_for_load,
};
use crate::identifiers::TabId;
use crate::storage::{self, EXPORT_DATA_KEY, HAS_VISITED_OPTIONS_KEY, OPTIONS_KEY, SettingsStore};

use super::context::{RunContext, RunPhase};
use super::notify::{Notification, Notifier};
use super::options::RunOptions;
use super::sink::{Delivery, ExportDataset, ExportSink, TabExportRecord, encode, export_file_name};

// ============================================================================
// Messages
// ============================================================================

/// Shown when a run is triggered before the options were ever opened.
pub const OPTIONS_VISIT_REMINDER: &str =
    "Please visit the options (`tabs-hist-export options`) before starting the export process.";

/// Shown when the export could only be left in the settings store.
pub const DOWNLOAD_UNAVAILABLE_MESSAGE: &str = "Cannot start automatic download of data on this platform. Use `tabs-hist-export data` to retrieve it.";

/// Shown for failures outside any pipeline stage.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Something unexpected happened.";

// ============================================================================
// Outcome
// ============================================================================

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Collected records.
    pub dataset: ExportDataset,
    /// Name the export was delivered under.
    pub file_name: String,
    /// Where the export ended up.
    pub delivery: Delivery,
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The options were never visited; only a reminder was shown.
    Skipped,
    /// The dataset was exported.
    Exported(ExportReport),
}

// ============================================================================
// RunGuard
// ============================================================================

/// Holds the running flag for the lifetime of one run.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::RunInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Drives export runs against its collaborators.
///
/// One run at a time: tabs are processed strictly in enumeration order,
/// each through activate, backward scan, forward scan and restore before
/// the next starts. The first failure ends the run and nothing is exported.
#[derive(Debug)]
pub struct Exporter<S, K, N, E> {
    source: S,
    store: K,
    notifier: N,
    sink: E,
    running: AtomicBool,
}

impl<S, K, N, E> Exporter<S, K, N, E>
where
    S: TabSource,
    K: SettingsStore,
    N: Notifier,
    E: ExportSink,
{
    /// Creates an idle exporter.
    pub fn new(source: S, store: K, notifier: N, sink: E) -> Self {
        Self {
            source,
            store,
            notifier,
            sink,
            running: AtomicBool::new(false),
        }
    }

    /// Tab source.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Settings store.
    #[inline]
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Notification sink.
    #[inline]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Export sink.
    #[inline]
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Returns `true` while a run is active.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Performs one export run.
    ///
    /// Failures are reported through the notifier before being returned.
    ///
    /// # Errors
    ///
    /// - [`Error::RunInProgress`] if another run is active; nothing else
    ///   happens in that case.
    /// - [`Error::Aborted`] tagged with the failing [`Stage`].
    /// - Any other error for failures outside the pipeline stages.
    pub async fn run(&self) -> Result<RunOutcome> {
        let _guard = RunGuard::acquire(&self.running)?;

        let mut ctx = RunContext::new(&self.store);
        let result = self.execute(&mut ctx).await;

        if let Err(e) = &result {
            let message = match e.stage() {
                Some(stage) => stage.user_message(),
                None => {
                    ctx.error(e.to_string()).await;
                    UNEXPECTED_FAILURE_MESSAGE
                }
            };
            warn!(error = %e, phase = %ctx.phase(), "Export run failed");
            self.notifier
                .notify(
                    Notification::Error,
                    &format!("{DISPLAY_NAME} | ERROR"),
                    message,
                )
                .await;
        }

        result
    }

    async fn execute(&self, ctx: &mut RunContext<'_>) -> Result<RunOutcome> {
        if !self.options_visited().await? {
            info!("Options never visited, skipping run");
            self.notifier
                .notify(
                    Notification::EnsureOptionsVisit,
                    DISPLAY_NAME,
                    OPTIONS_VISIT_REMINDER,
                )
                .await;
            return Ok(RunOutcome::Skipped);
        }

        ctx.persist_log().await?;
        self.load_options(ctx).await?;

        ctx.enter(RunPhase::EnumeratingTabs);
        let tabs = self.source.enumerate(ctx.options().scope()).await;
        let tabs = ctx.check(Stage::EnumerateTabs, tabs).await?;
        ctx.info(format!("Found {} tabs", tabs.len())).await;

        let mut dataset = ExportDataset::new();
        for (index, tab) in tabs.into_iter().enumerate() {
            ctx.enter(RunPhase::ProcessingTab(index));
            ctx.info(format!("tabId: {tab}")).await;

            let record = if ctx.options().dry_run {
                dry_run_record(ctx, tab).await
            } else {
                self.process_tab(ctx, tab).await?
            };
            dataset.push(record);

            if ctx.options().early_break {
                debug!(tab_id = %tab, "Early break after first tab");
                break;
            }
        }
        ctx.info("Done getting data").await;

        ctx.enter(RunPhase::Exporting);
        let report = self.export(ctx, dataset).await?;
        ctx.enter(RunPhase::Done);

        Ok(RunOutcome::Exported(report))
    }

    async fn options_visited(&self) -> Result<bool> {
        Ok(storage::load(&self.store, HAS_VISITED_OPTIONS_KEY, false)
            .await?
            .value)
    }

    /// Loads options, persisting the defaults when none are stored.
    async fn load_options(&self, ctx: &mut RunContext<'_>) -> Result<()> {
        let loaded = storage::load(&self.store, OPTIONS_KEY, RunOptions::default()).await;
        let loaded = ctx.check(Stage::LoadOptions, loaded).await?;
        ctx.set_options(loaded.value);

        if !loaded.found {
            ctx.info("No stored options, saving defaults").await;
            let saved = storage::save(&self.store, OPTIONS_KEY, ctx.options()).await;
            ctx.check(Stage::SaveOptions, saved).await?;
        }
        Ok(())
    }

    /// Runs one tab through the history pipeline and returns its URLs.
    async fn process_tab(&self, ctx: &mut RunContext<'_>, requested: TabId) -> Result<TabExportRecord> {
        let pacing = ctx.options().pacing();

        let tab = self.activate(ctx, requested, pacing).await?;

        ctx.info(format!("Going back in tabId({tab}) history")).await;
        let backward = scan_backward(&self.source, tab, pacing).await;
        let backward = ctx.check(Stage::ScanBackward, backward).await?;

        ctx.info(format!("Going forward in tabId({tab}) history")).await;
        let forward = scan_forward(&self.source, tab, pacing).await;
        let forward = ctx.check(Stage::ScanForward, forward).await?;

        let steps = net_displacement(&backward, &forward);
        ctx.info(format!("Going back to tabId({tab})'s original page")).await;
        let restored = restore_position(&self.source, tab, steps, pacing.settle_delay).await;
        ctx.check(Stage::RestorePosition, restored).await?;

        Ok(TabExportRecord(forward.urls))
    }

    /// Brings a tab to the foreground and waits for it to load.
    ///
    /// Returns the id to use for the rest of the pipeline.
    async fn activate(
        &self,
        ctx: &mut RunContext<'_>,
        requested: TabId,
        pacing: StepPacing,
    ) -> Result<TabId> {
        ctx.info(format!("Making tabId: {requested} active")).await;
        let info = self.source.activate(requested).await;
        let info = ctx.check(Stage::ActivateTab, info).await?;

        if info.tab_id == requested {
            ctx.info("tabId has been preserved").await;
        } else {
            ctx.warn(format!(
                "tabId has changed | original='{requested}', new='{}'",
                info.tab_id
            ))
            .await;
        }
        ctx.info(format!("tab.title: {}", info.title)).await;

        if !info.status.is_complete() {
            let loaded = wait_for_load(&self.source, info.tab_id, pacing.wait).await;
            ctx.check(Stage::ActivateTab, loaded).await?;
        }

        Ok(info.tab_id)
    }

    /// Serializes, stores and delivers the dataset.
    async fn export(&self, ctx: &mut RunContext<'_>, dataset: ExportDataset) -> Result<ExportReport> {
        ctx.info("Saving tabs data").await;

        let text = encode(&dataset, ctx.options().pretty_json);
        let text = ctx.check(Stage::Export, text).await?;

        let stored = storage::save(&self.store, EXPORT_DATA_KEY, &text).await;
        ctx.check(Stage::Export, stored).await?;

        let file_name = export_file_name(Local::now().naive_local());
        let delivery = self.sink.deliver(&file_name, &text).await;
        let delivery = ctx.check(Stage::Export, delivery).await?;

        match &delivery {
            Delivery::Written(path) => {
                ctx.info(format!("Started downloading: {}", path.display()))
                    .await;
            }
            Delivery::Unavailable => {
                ctx.info("Download unavailable, data left in settings store")
                    .await;
                self.notifier
                    .notify(
                        Notification::DownloadUnavailable,
                        &format!("{DISPLAY_NAME} | DONE"),
                        DOWNLOAD_UNAVAILABLE_MESSAGE,
                    )
                    .await;
            }
        }

        Ok(ExportReport {
            dataset,
            file_name,
            delivery,
        })
    }
}

// ============================================================================
// Dry Run
// ============================================================================

/// Placeholder URLs for a tab in a dry run.
#[must_use]
pub fn dry_run_urls(tab: TabId) -> Vec<String> {
    (1..=4).map(|n| format!("DRY_TAB({tab})_URL_{n}")).collect()
}

async fn dry_run_record(ctx: &mut RunContext<'_>, tab: TabId) -> TabExportRecord {
    ctx.info(format!("[DRY_MOCK]: Making tabId: {tab} active"))
        .await;
    ctx.info(format!("[DRY_MOCK]: Going back in tabId({tab}) history"))
        .await;
    ctx.info(format!("[DRY_MOCK]: Going forward in tabId({tab}) history"))
        .await;
    ctx.info(format!("[DRY_MOCK]: Going back to tabId({tab})'s original page"))
        .await;
    TabExportRecord(dry_run_urls(tab))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;

    use crate::export::notify::testing::RecordingNotifier;
    use crate::history::testing::{Op, ScriptedTabs};
    use crate::storage::{LOGS_KEY, MemoryStore};

    const HISTORY: [&str; 3] = ["https://a.test/", "https://b.test/", "https://c.test/"];

    /// Sink that keeps every delivery in memory.
    #[derive(Debug, Default)]
    struct RecordingSink {
        unavailable: bool,
        delivered: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        fn delivered(&self) -> Vec<(String, String)> {
            self.delivered.lock().clone()
        }
    }

    #[async_trait]
    impl ExportSink for RecordingSink {
        async fn deliver(&self, file_name: &str, text: &str) -> Result<Delivery> {
            self.delivered
                .lock()
                .push((file_name.to_string(), text.to_string()));
            if self.unavailable {
                Ok(Delivery::Unavailable)
            } else {
                Ok(Delivery::Written(file_name.into()))
            }
        }
    }

    /// Sink whose deliveries always fail.
    struct FailingSink;

    #[async_trait]
    impl ExportSink for FailingSink {
        async fn deliver(&self, _file_name: &str, _text: &str) -> Result<Delivery> {
            Err(Error::export("disk full"))
        }
    }

    /// Store whose reads always fail.
    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(Error::storage("disk on fire"))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<()> {
            Err(Error::storage("disk on fire"))
        }
    }

    type TestExporter = Exporter<ScriptedTabs, MemoryStore, RecordingNotifier, RecordingSink>;

    async fn visited_store(options: Option<RunOptions>) -> MemoryStore {
        let store = MemoryStore::new();
        storage::save(&store, HAS_VISITED_OPTIONS_KEY, &true)
            .await
            .expect("save visited");
        if let Some(options) = options {
            storage::save(&store, OPTIONS_KEY, &options)
                .await
                .expect("save options");
        }
        store
    }

    fn fast_options() -> RunOptions {
        RunOptions {
            page_load_wait_ms: 10,
            ..RunOptions::default()
        }
    }

    async fn exporter(tabs: ScriptedTabs, options: RunOptions) -> TestExporter {
        Exporter::new(
            tabs,
            visited_store(Some(options)).await,
            RecordingNotifier::default(),
            RecordingSink::default(),
        )
    }

    fn three_tabs() -> ScriptedTabs {
        ScriptedTabs::new()
            .with_tab(1, &HISTORY, 0)
            .with_tab(2, &HISTORY, 1)
            .with_tab(3, &HISTORY, 2)
    }

    fn exported(outcome: RunOutcome) -> ExportReport {
        match outcome {
            RunOutcome::Exported(report) => report,
            RunOutcome::Skipped => panic!("run was skipped"),
        }
    }

    async fn stored_export(store: &MemoryStore) -> Option<String> {
        let loaded = storage::load(store, EXPORT_DATA_KEY, String::new())
            .await
            .expect("load export");
        loaded.found.then_some(loaded.value)
    }

    async fn stored_log(store: &MemoryStore) -> Vec<String> {
        storage::load(store, LOGS_KEY, Vec::new())
            .await
            .expect("load log")
            .value
    }

    #[tokio::test(start_paused = true)]
    async fn test_exports_every_history_and_restores_tabs() {
        let exporter = exporter(three_tabs(), fast_options()).await;

        let report = exported(exporter.run().await.expect("run"));

        let expected: Vec<String> = HISTORY.iter().map(|u| (*u).to_string()).collect();
        assert_eq!(report.dataset.len(), 3);
        for record in report.dataset.records() {
            assert_eq!(record.urls(), expected.as_slice());
        }

        let tabs = exporter.source();
        assert_eq!(tabs.index(1), 0);
        assert_eq!(tabs.index(2), 1);
        assert_eq!(tabs.index(3), 2);

        let text = stored_export(exporter.store()).await.expect("stored export");
        assert_eq!(exporter.sink().delivered(), [(report.file_name.clone(), text)]);
        assert!(report.file_name.starts_with("tabs_hist_export_"));
        assert!(exporter.notifier().sent().is_empty());
        assert!(!exporter.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_touches_no_tab() {
        let options = RunOptions {
            dry_run: true,
            ..fast_options()
        };
        let exporter = exporter(three_tabs(), options).await;

        let report = exported(exporter.run().await.expect("run"));

        assert_eq!(report.dataset.len(), 3);
        assert_eq!(
            report.dataset.records()[1].urls(),
            [
                "DRY_TAB(2)_URL_1",
                "DRY_TAB(2)_URL_2",
                "DRY_TAB(2)_URL_3",
                "DRY_TAB(2)_URL_4",
            ]
        );
        assert_eq!(exporter.source().count(Op::Enumerate), 1);
        assert_eq!(exporter.source().tab_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_break_processes_one_tab() {
        let tabs = (1..=5).fold(ScriptedTabs::new(), |tabs, id| {
            tabs.with_tab(id, &HISTORY, 1)
        });
        let options = RunOptions {
            early_break: true,
            ..fast_options()
        };
        let exporter = exporter(tabs, options).await;

        let report = exported(exporter.run().await.expect("run"));

        assert_eq!(report.dataset.len(), 1);
        assert_eq!(exporter.source().count(Op::Activate), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_break_applies_to_dry_run() {
        let options = RunOptions {
            early_break: true,
            dry_run: true,
            ..fast_options()
        };
        let exporter = exporter(three_tabs(), options).await;

        let report = exported(exporter.run().await.expect("run"));

        assert_eq!(report.dataset.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_mid_run_exports_nothing() {
        let exporter = exporter(three_tabs().fail_on(2, Op::Forward), fast_options()).await;

        let err = exporter.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::ScanForward));
        assert_eq!(exporter.source().count(Op::Activate), 2);
        assert!(exporter.sink().delivered().is_empty());
        assert_eq!(stored_export(exporter.store()).await, None);
        assert_eq!(
            exporter.notifier().sent(),
            [(
                Notification::Error,
                format!("{DISPLAY_NAME} | ERROR"),
                "Could not go forward in tab history.".to_string(),
            )]
        );
        assert!(!exporter.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_stage_reports_its_message() {
        let cases = [
            (Op::Enumerate, Stage::EnumerateTabs),
            (Op::Activate, Stage::ActivateTab),
            (Op::Back, Stage::ScanBackward),
        ];

        for (op, stage) in cases {
            let exporter = exporter(three_tabs().fail_always(op), fast_options()).await;

            let err = exporter.run().await.unwrap_err();

            assert_eq!(err.stage(), Some(stage));
            assert_eq!(
                exporter.notifier().sent()[0].2,
                stage.user_message(),
                "{op:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_failure_reports_restore_stage() {
        // Tab at entry 0: one back step scanning, two more restoring.
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 0)
            .fail_nth(1, Op::Back, 2);
        let exporter = exporter(tabs, fast_options()).await;

        let err = exporter.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::RestorePosition));
        assert_eq!(exporter.source().count(Op::Forward), 3);
        assert_eq!(
            exporter.notifier().sent(),
            [(
                Notification::Error,
                format!("{DISPLAY_NAME} | ERROR"),
                Stage::RestorePosition.user_message().to_string(),
            )]
        );
        assert_eq!(stored_export(exporter.store()).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delivery_keeps_stored_export() {
        let exporter = Exporter::new(
            three_tabs(),
            visited_store(Some(fast_options())).await,
            RecordingNotifier::default(),
            FailingSink,
        );

        let err = exporter.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Export));
        assert!(err.is_export_error());
        assert_eq!(
            exporter.notifier().sent(),
            [(
                Notification::Error,
                format!("{DISPLAY_NAME} | ERROR"),
                "Could not start download.".to_string(),
            )]
        );
        let text = stored_export(exporter.store()).await.expect("stored export");
        assert!(text.contains("https://c.test/"));
        assert_eq!(exporter.source().index(3), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_waits_for_load_before_scanning() {
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 1)
            .with_pending_polls(1, 2);
        let exporter = exporter(tabs, fast_options()).await;

        let report = exported(exporter.run().await.expect("run"));

        assert_eq!(report.dataset.records()[0].urls().len(), HISTORY.len());
        let ops = exporter.source().ops();
        assert_eq!(
            &ops[..6],
            [Op::Enumerate, Op::Activate, Op::State, Op::State, Op::State, Op::State]
        );
        assert_eq!(ops[6], Op::Back);
        assert_eq!(exporter.source().index(1), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_timeout_after_activation_aborts() {
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 2)
            .stuck_loading(1);
        let options = RunOptions {
            load_timeout_ms: Some(1000),
            ..fast_options()
        };
        let exporter = exporter(tabs, options).await;

        let err = exporter.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::ActivateTab));
        assert_eq!(exporter.source().count(Op::Back), 0);
        match err {
            Error::Aborted { source, .. } => assert!(source.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_timeout_aborts_scan() {
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 2)
            .stuck_after_navigation(1);
        let options = RunOptions {
            load_timeout_ms: Some(1000),
            ..fast_options()
        };
        let exporter = exporter(tabs, options).await;

        let err = exporter.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::ScanBackward));
        match err {
            Error::Aborted { source, .. } => assert!(source.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_defaults_persisted_when_missing() {
        let tabs = ScriptedTabs::new().with_tab(1, &HISTORY, 1);
        let exporter = Exporter::new(
            tabs,
            visited_store(None).await,
            RecordingNotifier::default(),
            RecordingSink::default(),
        );

        exporter.run().await.expect("run");

        let stored = storage::load(exporter.store(), OPTIONS_KEY, fast_options())
            .await
            .expect("load options");
        assert!(stored.found);
        assert_eq!(stored.value, RunOptions::default());
        assert_eq!(exporter.source().index(1), 1);
    }

    #[tokio::test]
    async fn test_unvisited_options_skip_run() {
        let exporter = Exporter::new(
            three_tabs(),
            MemoryStore::new(),
            RecordingNotifier::default(),
            RecordingSink::default(),
        );

        let outcome = exporter.run().await.expect("run");

        assert_eq!(outcome, RunOutcome::Skipped);
        assert_eq!(
            exporter.notifier().kinds(),
            [Notification::EnsureOptionsVisit]
        );
        assert_eq!(exporter.source().count(Op::Enumerate), 0);
        assert!(!exporter.store().contains(LOGS_KEY));
        assert!(!exporter.store().contains(OPTIONS_KEY));
    }

    #[tokio::test]
    async fn test_unexpected_failure_is_reported_generically() {
        let exporter = Exporter::new(
            three_tabs(),
            BrokenStore,
            RecordingNotifier::default(),
            RecordingSink::default(),
        );

        let err = exporter.run().await.unwrap_err();

        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(
            exporter.notifier().sent()[0].2,
            UNEXPECTED_FAILURE_MESSAGE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_trigger_rejected_while_running() {
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 2)
            .stuck_loading(1);
        let exporter = exporter(tabs, fast_options()).await;

        {
            let first = exporter.run();
            tokio::pin!(first);

            tokio::select! {
                _ = &mut first => panic!("stuck run finished"),
                () = tokio::time::sleep(Duration::from_secs(10)) => {}
            }
            assert!(exporter.is_running());

            let notified = exporter.notifier().sent().len();
            let second = exporter.run().await;
            assert!(matches!(second, Err(Error::RunInProgress)));
            assert_eq!(exporter.notifier().sent().len(), notified);
        }

        assert!(!exporter.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_download_notifies() {
        let exporter = Exporter::new(
            three_tabs(),
            visited_store(Some(RunOptions {
                dry_run: true,
                ..fast_options()
            }))
            .await,
            RecordingNotifier::default(),
            RecordingSink::unavailable(),
        );

        let report = exported(exporter.run().await.expect("run"));

        assert_eq!(report.delivery, Delivery::Unavailable);
        assert_eq!(
            exporter.notifier().sent(),
            [(
                Notification::DownloadUnavailable,
                format!("{DISPLAY_NAME} | DONE"),
                DOWNLOAD_UNAVAILABLE_MESSAGE.to_string(),
            )]
        );
        assert!(stored_export(exporter.store()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pretty_json_export() {
        let tabs = ScriptedTabs::new().with_tab(1, &HISTORY, 0);
        let options = RunOptions {
            pretty_json: true,
            dry_run: true,
            ..fast_options()
        };
        let exporter = exporter(tabs, options).await;

        exporter.run().await.expect("run");

        let text = stored_export(exporter.store()).await.expect("stored export");
        assert!(text.starts_with("[\n    [\n        \"DRY_TAB(1)_URL_1\",\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_log_records_pipeline() {
        let tabs = ScriptedTabs::new()
            .with_tab(1, &HISTORY, 1)
            .activates_as(1, 7);
        let options = RunOptions {
            debug: true,
            ..fast_options()
        };
        let exporter = exporter(tabs, options).await;

        let report = exported(exporter.run().await.expect("run"));
        assert_eq!(report.dataset.len(), 1);

        let log = stored_log(exporter.store()).await;
        assert_eq!(
            &log[..6],
            [
                "[INFO]: Found 1 tabs",
                "[INFO]: tabId: 1",
                "[INFO]: Making tabId: 1 active",
                "[WARNING]: tabId has changed | original='1', new='7'",
                "[INFO]: tab.title: Tab 1",
                "[INFO]: Going back in tabId(7) history",
            ]
        );
        assert!(log.contains(&"[INFO]: Done getting data".to_string()));
        assert_eq!(exporter.source().index(1), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_reset_and_silent_without_debug() {
        let exporter = exporter(three_tabs(), fast_options()).await;
        storage::save(exporter.store(), LOGS_KEY, &["[INFO]: old run"])
            .await
            .expect("seed log");

        exporter.run().await.expect("run");

        assert!(stored_log(exporter.store()).await.is_empty());
        assert!(exporter.store().contains(LOGS_KEY));
    }
}
