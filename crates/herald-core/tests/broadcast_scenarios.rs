use herald_channels::{
    BroadcastChannel, ChannelKind, Error as ChannelError, GroupSummary, RecipientTarget,
    Result as ChannelResult,
};
use herald_core::{
    Broadcaster, CleanupOutcome, CleanupPolicy, ContentConfig, ContentResolver, KeepReason,
    LanguageSpec, MediaPipeline, PacingConfig, PreparedMedia, RecordingDelay, ValidationError,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::assert_ok;

/// A channel that fails for a fixed set of recipient names and records
/// every call it receives.
#[derive(Default)]
struct ScriptedChannel {
    fail_for: Vec<String>,
    fail_status: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedChannel {
    fn failing_for(names: &[&str]) -> Self {
        Self {
            fail_for: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BroadcastChannel for ScriptedChannel {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn send_to_recipient(
        &self,
        target: &RecipientTarget,
        media: &Path,
        caption: &str,
    ) -> ChannelResult<String> {
        let file = media.file_name().and_then(|f| f.to_str()).unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", target.display_name, file, caption));
        if self.fail_for.contains(&target.display_name) {
            return Err(ChannelError::WhatsApp("send rejected".to_string()));
        }
        Ok("msg".to_string())
    }

    async fn send_to_status(&self, media: &Path) -> ChannelResult<String> {
        let file = media.file_name().and_then(|f| f.to_str()).unwrap_or_default();
        self.calls.lock().unwrap().push(format!("status:{file}"));
        if self.fail_status {
            return Err(ChannelError::WhatsApp("status rejected".to_string()));
        }
        Ok("status".to_string())
    }

    async fn list_groups(&self) -> ChannelResult<Vec<GroupSummary>> {
        Ok(Vec::new())
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn slot(&self, n: u64) -> PathBuf {
        let path = self.root().join("queue").join(n.to_string());
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn write(&self, rel: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn group_list(&self, name: &str, groups: &[&str]) -> PathBuf {
        let records: Vec<_> = groups
            .iter()
            .map(|g| json!({ "name": g, "id": format!("{g}@g.us") }))
            .collect();
        self.write(
            Path::new("config").join(name),
            &serde_json::to_string(&records).unwrap(),
        )
    }

    fn languages(&self, english: &[&str], tamil: &[&str]) -> Vec<LanguageSpec> {
        vec![
            LanguageSpec::new("english", "e", "english.txt")
                .with_whatsapp_groups(self.group_list("english.json", english)),
            LanguageSpec::new("tamil", "t", "tamil.txt")
                .with_whatsapp_groups(self.group_list("tamil.json", tamil)),
        ]
    }

    fn fill_bundle(&self, dir: &Path) {
        fs::write(dir.join("e.jpg"), "english image").unwrap();
        fs::write(dir.join("t.png"), "tamil image").unwrap();
        fs::write(dir.join("english.txt"), "Good morning\n").unwrap();
        fs::write(dir.join("tamil.txt"), "Vanakkam\n").unwrap();
    }

    fn resolver(&self) -> ContentResolver {
        ContentResolver::new(&ContentConfig {
            work_dir: self.root().to_path_buf(),
            queue_dir: PathBuf::from("queue"),
        })
    }
}

fn broadcaster(languages: Vec<LanguageSpec>, delay: &RecordingDelay) -> Broadcaster {
    Broadcaster::new(languages, PacingConfig::new(15_000, 30_000, 5_000))
        .with_delay(Arc::new(delay.clone()))
}

#[tokio::test]
async fn test_full_success_removes_slot() {
    let ws = Workspace::new();
    let slot = ws.slot(3);
    ws.fill_bundle(&slot);
    // A higher slot must stay untouched
    let later = ws.slot(10);
    ws.fill_bundle(&later);

    let channel = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = assert_ok!(ws.resolver().resolve()).unwrap();
    assert_eq!(bundle.slot, Some(3));

    let report = broadcaster(ws.languages(&["A", "B"], &["C", "D"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, channel.clone())
        .run(&bundle)
        .await;

    assert!(report.success);
    assert!(report.delivered());
    assert!(report.cleaned());
    assert!(!slot.exists());
    assert!(later.join("e.jpg").exists());

    assert_eq!(
        channel.calls(),
        vec![
            "A:e.jpg:Good morning",
            "B:e.jpg:Good morning",
            "C:t.png:Vanakkam",
            "D:t.png:Vanakkam",
        ]
    );
    // One gap inside each language; none across languages
    assert_eq!(delay.recorded().len(), 2);
}

#[tokio::test]
async fn test_single_failure_keeps_bundle() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let channel = Arc::new(ScriptedChannel::failing_for(&["D"]));
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A", "B"], &["C", "D"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, channel.clone())
        .run(&bundle)
        .await;

    assert!(!report.success);
    assert!(report.delivered());
    assert_eq!(
        report.cleanup,
        CleanupOutcome::Kept(KeepReason::IncompleteDelivery)
    );

    let languages = &report.channels[0].languages;
    assert_eq!(languages[0].outcome.to_string(), "2/2");
    assert_eq!(languages[1].outcome.to_string(), "1/2");
    assert_eq!(languages[1].outcome.failures[0].recipient, "D");

    for name in ["e.jpg", "t.png", "english.txt", "tamil.txt"] {
        assert!(slot.join(name).exists(), "{name} was deleted");
    }
}

#[test]
fn test_empty_queue_is_reported_as_nothing_to_do() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.root().join("queue").join("drafts")).unwrap();
    ws.fill_bundle(ws.root());

    assert_eq!(ws.resolver().resolve().unwrap(), None);
    // The root bundle is not used as a fallback
    assert!(ws.root().join("e.jpg").exists());
}

#[tokio::test]
async fn test_empty_recipient_list_counts_as_success() {
    let ws = Workspace::new();
    let slot = ws.slot(2);
    ws.fill_bundle(&slot);

    let channel = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A"], &[]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, channel.clone())
        .run(&bundle)
        .await;

    assert!(report.success);
    assert_eq!(report.channels[0].languages[1].outcome.to_string(), "0/0");
    assert!(report.cleaned());
    assert_eq!(channel.calls(), vec!["A:e.jpg:Good morning"]);
}

#[tokio::test]
async fn test_missing_caption_never_invokes_channels() {
    let ws = Workspace::new();
    let slot = ws.slot(5);
    ws.fill_bundle(&slot);
    fs::remove_file(slot.join("tamil.txt")).unwrap();

    let groups = Arc::new(ScriptedChannel::default());
    let status = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A"], &["B"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, groups.clone())
        .with_channel(ChannelKind::WhatsAppStatus, status.clone())
        .run(&bundle)
        .await;

    assert!(!report.success);
    assert!(!report.delivered());
    assert!(groups.calls().is_empty());
    assert!(status.calls().is_empty());
    assert!(delay.recorded().is_empty());
    assert!(slot.exists());

    for channel in &report.channels {
        assert!(matches!(
            &channel.validation_errors[..],
            [ValidationError::CaptionMissing { language, .. }] if language == "tamil"
        ));
    }
}

#[tokio::test]
async fn test_channels_run_in_fixed_order_with_status_gap() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let whatsapp = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    // Registered out of order on purpose
    let report = broadcaster(ws.languages(&["A"], &["B"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, whatsapp.clone())
        .with_channel(ChannelKind::WhatsAppStatus, whatsapp.clone())
        .run(&bundle)
        .await;

    assert!(report.success);
    let kinds: Vec<_> = report.channels.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ChannelKind::WhatsAppStatus, ChannelKind::WhatsAppGroups]);

    assert_eq!(
        whatsapp.calls(),
        vec![
            "status:e.jpg",
            "status:t.png",
            "A:e.jpg:Good morning",
            "B:t.png:Vanakkam",
        ]
    );
    // Only the fixed gap between the two status posts
    assert_eq!(delay.recorded(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn test_unavailable_channel_does_not_block_cleanup() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let whatsapp = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A"], &["B"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, whatsapp)
        .with_unavailable(ChannelKind::Telegram)
        .run(&bundle)
        .await;

    assert!(report.success);
    assert_eq!(report.skipped, vec![ChannelKind::Telegram]);
    assert!(report.cleaned());
}

#[tokio::test]
async fn test_failed_status_post_keeps_bundle() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let status = Arc::new(ScriptedChannel {
        fail_status: true,
        ..ScriptedChannel::default()
    });
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&[], &[]), &delay)
        .with_channel(ChannelKind::WhatsAppStatus, status.clone())
        .run(&bundle)
        .await;

    assert!(!report.success);
    // Both languages are still attempted
    assert_eq!(status.calls().len(), 2);
    assert!(slot.exists());
}

#[tokio::test]
async fn test_single_channel_policy_never_cleans() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let channel = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A"], &["B"]), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, channel)
        .with_cleanup_policy(CleanupPolicy::Never)
        .run(&bundle)
        .await;

    assert!(report.success);
    assert_eq!(report.cleanup, CleanupOutcome::Kept(KeepReason::PolicyNever));
    assert!(slot.join("e.jpg").exists());
}

#[tokio::test]
async fn test_root_mode_cleanup_leaves_empty_captions() {
    let ws = Workspace::new();
    ws.fill_bundle(ws.root());

    let channel = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();
    assert!(!bundle.is_queued);

    let languages = ws.languages(&["A"], &["B"]);
    let report = broadcaster(languages.clone(), &delay)
        .with_channel(ChannelKind::WhatsAppGroups, channel)
        .run(&bundle)
        .await;

    assert!(report.cleaned());
    assert!(!ws.root().join("e.jpg").exists());
    assert!(!ws.root().join("t.png").exists());
    assert_eq!(fs::read_to_string(ws.root().join("english.txt")).unwrap(), "");
    assert_eq!(fs::read_to_string(ws.root().join("tamil.txt")).unwrap(), "");
    // Recipient lists are never touched
    assert!(ws.root().join("config").join("english.json").exists());

    // The next run sees empty captions, not missing ones
    let errors = herald_core::validate(&bundle, &languages, ChannelKind::WhatsAppGroups);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::CaptionEmpty { .. })));
    assert!(!errors
        .iter()
        .any(|e| matches!(e, ValidationError::CaptionMissing { .. })));
}

/// Writes a `-hd` copy next to the original, like an upscaler would.
struct CopyPipeline;

#[async_trait::async_trait]
impl MediaPipeline for CopyPipeline {
    async fn prepare(&self, path: &Path) -> herald_core::Result<PreparedMedia> {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let derived = path.with_file_name(format!("{stem}-hd.{ext}"));
        fs::copy(path, &derived).map_err(|e| herald_core::Error::Media(e.to_string()))?;
        Ok(PreparedMedia::derived(derived))
    }
}

#[tokio::test]
async fn test_derived_media_is_sent_then_discarded() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let channel = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A"], &["B"]), &delay)
        .with_pipeline(Arc::new(CopyPipeline))
        .with_channel(ChannelKind::WhatsAppGroups, channel.clone())
        .with_cleanup_policy(CleanupPolicy::Never)
        .run(&bundle)
        .await;

    assert!(report.success);
    assert_eq!(
        channel.calls(),
        vec!["A:e-hd.jpg:Good morning", "B:t-hd.png:Vanakkam"]
    );
    assert!(!slot.join("e-hd.jpg").exists());
    assert!(!slot.join("t-hd.png").exists());
    assert!(slot.join("e.jpg").exists());
    assert!(slot.join("t.png").exists());
}

/// Fails every preparation, like an upscaler given a corrupt image.
struct BrokenPipeline;

#[async_trait::async_trait]
impl MediaPipeline for BrokenPipeline {
    async fn prepare(&self, path: &Path) -> herald_core::Result<PreparedMedia> {
        Err(herald_core::Error::Media(format!(
            "cannot decode {}",
            path.display()
        )))
    }
}

#[tokio::test]
async fn test_media_failure_fails_every_recipient_without_sending() {
    let ws = Workspace::new();
    let slot = ws.slot(1);
    ws.fill_bundle(&slot);

    let groups = Arc::new(ScriptedChannel::default());
    let status = Arc::new(ScriptedChannel::default());
    let delay = RecordingDelay::new();
    let bundle = ws.resolver().resolve().unwrap().unwrap();

    let report = broadcaster(ws.languages(&["A", "B"], &["C"]), &delay)
        .with_pipeline(Arc::new(BrokenPipeline))
        .with_channel(ChannelKind::WhatsAppGroups, groups.clone())
        .with_channel(ChannelKind::WhatsAppStatus, status.clone())
        .run(&bundle)
        .await;

    assert!(!report.success);
    assert!(!report.delivered());
    assert_eq!(
        report.cleanup,
        CleanupOutcome::Kept(KeepReason::IncompleteDelivery)
    );
    assert!(groups.calls().is_empty());
    assert!(status.calls().is_empty());

    let status_report = &report.channels[0];
    assert_eq!(status_report.kind, ChannelKind::WhatsAppStatus);
    for lang in &status_report.languages {
        assert_eq!(lang.outcome.to_string(), "0/1");
        assert!(lang.outcome.failures[0].error.contains("cannot decode"));
    }

    let groups_report = &report.channels[1];
    assert_eq!(groups_report.kind, ChannelKind::WhatsAppGroups);
    assert_eq!(groups_report.languages[0].outcome.to_string(), "0/2");
    assert_eq!(groups_report.languages[1].outcome.to_string(), "0/1");
    let failed: Vec<_> = groups_report.languages[0]
        .outcome
        .failures
        .iter()
        .map(|f| f.recipient.as_str())
        .collect();
    assert_eq!(failed, vec!["A", "B"]);

    // The status gap is still kept; no send gaps are taken
    assert_eq!(delay.recorded(), vec![Duration::from_secs(5)]);
    assert!(slot.join("e.jpg").exists());
}
