//! Build orchestration: inline and write destination files.

use mailforge::{BuildConfig, BuildJob, EmailBuilder};

#[tokio::test]
async fn jobs_are_built_and_written() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("newsletter.html");
    std::fs::write(
        &src,
        "<html><head><style>p { color: red; }</style></head><body><p>Hi</p></body></html>",
    )
    .unwrap();

    let dest = dir.path().join("dist").join("newsletter.html");
    let builder = EmailBuilder::new(BuildConfig::default());
    let reports = builder
        .run(&[BuildJob::new(&src, &dest)])
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(reports[0].litmus.is_none());
    assert!(reports[0].dispatch.is_none());

    let written = std::fs::read_to_string(&dest).unwrap();
    assert!(written.contains("color: red"));
    assert!(!written.contains("<style"));
}

#[tokio::test]
async fn failing_job_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.html");
    let builder = EmailBuilder::new(BuildConfig::default());

    let result = builder
        .run(&[BuildJob::new(dir.path().join("missing.html"), &dest)])
        .await;

    assert!(result.is_err());
    assert!(!dest.exists());
}
