use crate::support::{asset, FakeImageService, RecordingNotifier, TestClock};
use brief_editor::assets::{
    AssetError, AssetPipeline, AssetPolicy, ImageFile, NotificationKind, UploadStatus,
    UploadTracker,
};
use brief_editor::schema::Block;
use brief_editor::{EditorOptions, EditorProps, RichTextEditor};
use futures::executor::block_on;
use futures::future::join;

type Pipeline = AssetPipeline<FakeImageService, RecordingNotifier>;

fn pipeline(service: FakeImageService) -> Pipeline {
    AssetPipeline::new(service, RecordingNotifier::default(), AssetPolicy::default())
}

fn editor(props: EditorProps) -> RichTextEditor {
    let mut editor = RichTextEditor::new(props, EditorOptions::default());
    editor.mount();
    editor
}

fn png(name: &str, size: usize) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0; size])
}

fn image_sources(editor: &RichTextEditor) -> Vec<String> {
    editor
        .document()
        .map(|doc| {
            doc.blocks
                .iter()
                .filter_map(|block| match block {
                    Block::Image(image) => Some(image.src.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn oversize_file_never_reaches_the_service() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);

    let result = pipeline.begin(&mut tracker, png("scan.png", 10 * 1024 * 1024), None);

    assert!(matches!(result, Err(AssetError::TooLarge { .. })));
    assert_eq!(pipeline.service().optimize_calls.get(), 0);
    assert_eq!(pipeline.service().upload_calls.get(), 0);
    assert!(tracker.entries().is_empty());
    assert_eq!(pipeline.notifier().count(NotificationKind::Error), 1);
}

#[test]
fn wrong_type_is_rejected() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let pdf = ImageFile::new("brief.pdf", "application/pdf", vec![0; 10]);

    assert!(matches!(
        pipeline.begin(&mut tracker, pdf, None),
        Err(AssetError::UnsupportedType { .. })
    ));
    assert!(tracker.entries().is_empty());
}

#[test]
fn successful_upload_inserts_image() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps::default());
    let clock = TestClock::at(5_000);

    let inserted = block_on(pipeline.upload(&mut tracker, &mut editor, png("court.png", 2048), &clock));

    assert_eq!(inserted, Ok(true));
    assert_eq!(
        editor.html().as_deref(),
        Some(r#"<img src="https://cdn.example/blog-images/court.png" alt="court.png"><p></p>"#)
    );
    assert_eq!(tracker.entries()[0].status, UploadStatus::Success);
    assert_eq!(pipeline.service().optimize_calls.get(), 1);
    assert_eq!(pipeline.notifier().count(NotificationKind::Success), 1);
}

#[test]
fn upload_into_disabled_editor_is_not_announced_as_inserted() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps {
        disabled: true,
        ..EditorProps::default()
    });

    let inserted = block_on(pipeline.upload(&mut tracker, &mut editor, png("seal.png", 10), &TestClock::at(0)));

    assert_eq!(inserted, Ok(false));
    assert!(image_sources(&editor).is_empty());
    assert_eq!(tracker.entries()[0].status, UploadStatus::Success);
    assert_eq!(pipeline.notifier().count(NotificationKind::Success), 0);
    assert_eq!(pipeline.notifier().count(NotificationKind::Info), 1);
}

#[test]
fn editor_bucket_overrides_policy() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps {
        asset_bucket: Some("press".to_string()),
        ..EditorProps::default()
    });

    block_on(pipeline.upload(&mut tracker, &mut editor, png("a.png", 10), &TestClock::at(0)))
        .unwrap();
    assert_eq!(image_sources(&editor), vec!["https://cdn.example/press/a.png"]);
}

#[test]
fn concurrent_uploads_settle_independently() {
    let pipeline = pipeline(FakeImageService::failing_for(&["first.png"]));
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps::default());
    let html_before = editor.html();

    let first = pipeline
        .begin(&mut tracker, png("first.png", 1024), None)
        .unwrap();
    let second = pipeline
        .begin(&mut tracker, png("second.png", 1024), None)
        .unwrap();
    assert_eq!(tracker.entries().len(), 2);
    assert!(tracker.is_uploading());

    let (first_outcome, second_outcome) = block_on(join(pipeline.run(first), pipeline.run(second)));

    assert!(!pipeline.finish(&mut tracker, &mut editor, first_outcome, 1_000));
    assert_eq!(editor.html(), html_before);
    assert!(pipeline.finish(&mut tracker, &mut editor, second_outcome, 1_000));

    tracker.prune(1_500);
    assert_eq!(tracker.entries().len(), 2);
    tracker.prune(3_000);

    let entries = tracker.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file_name, "first.png");
    assert_eq!(entries[0].status, UploadStatus::Error);
    assert_eq!(
        entries[0].error.as_deref(),
        Some("upload failed: storage unavailable")
    );
    assert_eq!(
        image_sources(&editor),
        vec!["https://cdn.example/blog-images/second.png"]
    );
    assert_eq!(pipeline.notifier().count(NotificationKind::Error), 1);
}

#[test]
fn dropped_files_upload_together() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps::default());

    let pending = ["one.png", "two.png", "three.png"]
        .into_iter()
        .map(|name| pipeline.begin(&mut tracker, png(name, 10), None).unwrap())
        .collect();
    for outcome in block_on(pipeline.run_all(pending)) {
        pipeline.finish(&mut tracker, &mut editor, outcome, 0);
    }

    assert_eq!(image_sources(&editor).len(), 3);
    assert!(tracker
        .entries()
        .iter()
        .all(|entry| entry.status == UploadStatus::Success));
}

#[test]
fn outcome_after_unmount_is_discarded() {
    let pipeline = pipeline(FakeImageService::default());
    let mut tracker = UploadTracker::new(2000);
    let mut editor = editor(EditorProps::default());

    let pending = pipeline.begin(&mut tracker, png("late.png", 10), None).unwrap();
    editor.unmount();
    let outcome = block_on(pipeline.run(pending));

    assert!(!pipeline.finish(&mut tracker, &mut editor, outcome, 0));
    assert_eq!(editor.html(), None);
    assert!(pipeline.notifier().messages.borrow().is_empty());
    assert!(!tracker.is_uploading());
}

#[test]
fn gallery_lists_and_inserts_existing_assets() {
    let service = FakeImageService {
        library: vec![asset("a.png", "blog-images"), asset("b.png", "blog-images")],
        ..FakeImageService::default()
    };
    let pipeline = pipeline(service);
    let mut editor = editor(EditorProps::default());

    let recent = block_on(pipeline.recent_assets(None, Some(1)));
    assert_eq!(recent.len(), 1);
    assert!(pipeline.insert_existing(&mut editor, &recent[0]));
    assert_eq!(
        image_sources(&editor),
        vec!["https://cdn.example/blog-images/a.png"]
    );
}

#[test]
fn gallery_failure_is_reported() {
    let pipeline = pipeline(FakeImageService::default());
    assert!(block_on(pipeline.recent_assets(None, None)).is_empty());
    assert_eq!(pipeline.notifier().count(NotificationKind::Error), 1);
}
