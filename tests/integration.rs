// SPDX-License-Identifier: MPL-2.0
use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use folio::app::persisted_state::{FileStore, KeyValueStore};
use folio::app::{App, ResumeFormat};
use folio::config::{self, Config};
use folio::contact::ContactForm;
use folio::download::{trigger_download, DownloadOptions, DownloadOutcome, HttpFrameHost, ResumeStatus};
use folio::i18n::{Direction, EmbeddedBundles, Language, Params};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn file_store(dir: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open_in(Some(dir.to_path_buf())).expect("open store"))
}

#[tokio::test]
async fn language_choice_survives_restart() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let first = App::with_parts(Config::default(), file_store(dir.path()), Arc::new(EmbeddedBundles)).await;
    assert_eq!(first.i18n.language(), Language::En);
    first.i18n.set_language(Language::Ar).await.expect("switch");
    assert_eq!(first.i18n.document().dir(), Direction::Rtl);
    drop(first);

    let second = App::with_parts(Config::default(), file_store(dir.path()), Arc::new(EmbeddedBundles)).await;
    assert_eq!(second.i18n.language(), Language::Ar);
    assert_eq!(second.i18n.document().lang(), Language::Ar);
    assert_eq!(second.i18n.document().dir(), Direction::Rtl);
    assert!(!second.i18n.is_loading());

    let greeting = second.i18n.tr_with("hero.subtitle", &Params::new().with("name", "Ahmed"));
    assert!(greeting.contains("Ahmed"));
    assert!(!greeting.contains("{name}"));
}

#[tokio::test]
async fn config_file_overrides_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.resume.pdf_url = "https://cdn.example.com/cv.pdf".to_string();
    config.download.timeout_ms = 5_000;
    config::save_to_path(&config, &path).expect("save config");

    let loaded = config::load_from_path(&path).expect("load config");
    assert_eq!(loaded, config);

    let app = App::with_parts(loaded, file_store(dir.path()), Arc::new(EmbeddedBundles)).await;
    assert_eq!(ResumeFormat::Pdf.url(&app.config), "https://cdn.example.com/cv.pdf");
    assert_eq!(app.config.download.timeout(), Duration::from_secs(5));
}

#[tokio::test]
async fn contact_form_delivers_through_emailjs() {
    let received: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
    let sink = received.clone();
    let base = spawn_server(Router::new().route(
        "/api/v1.0/email/send",
        post(move |axum::Json(body): axum::Json<serde_json::Value>| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(body);
                "OK"
            }
        }),
    ))
    .await;

    let mut config = Config::default();
    config.contact.endpoint = format!("{base}/api/v1.0/email/send");
    let dir = tempdir().expect("Failed to create temporary directory");
    let app = App::with_parts(config, file_store(dir.path()), Arc::new(EmbeddedBundles)).await;

    let mut state = app.contact_form().expect("contact form");
    state.form = ContactForm::new("Sara", "sara@example.com", "consulting", "Let's talk");
    let status = state.submit(&app.i18n.snapshot()).await;

    assert!(status.is_success());
    assert_eq!(status.message, app.i18n.tr("contact.successMessage"));
    assert_eq!(state.form, ContactForm::default());

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["template_params"]["to_name"], app.config.contact.to_name);
}

#[tokio::test]
async fn contact_failure_keeps_fields() {
    let base = spawn_server(Router::new().route(
        "/api/v1.0/email/send",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let mut config = Config::default();
    config.contact.endpoint = format!("{base}/api/v1.0/email/send");
    let dir = tempdir().expect("Failed to create temporary directory");
    let app = App::with_parts(config, file_store(dir.path()), Arc::new(EmbeddedBundles)).await;

    let mut state = app.contact_form().expect("contact form");
    let fields = ContactForm::new("Sara", "sara@example.com", "consulting", "Let's talk");
    state.form = fields.clone();
    let status = state.submit(&app.i18n.snapshot()).await;

    assert!(!status.is_success());
    assert_eq!(status.message, app.i18n.tr("contact.errorMessage"));
    assert_eq!(status.detail, Some(app.i18n.tr("status.serverError")));
    assert_eq!(state.form, fields);
}

#[tokio::test]
async fn http_host_saves_downloaded_file() {
    let base = spawn_server(Router::new().route(
        "/cv",
        get(|| async {
            (
                [(header::CONTENT_DISPOSITION, "attachment; filename=\"Ahmed Tamer CV.pdf\"")],
                "%PDF-1.4 resume",
            )
        }),
    ))
    .await;

    let dir = tempdir().expect("Failed to create temporary directory");
    let host = Arc::new(HttpFrameHost::new(dir.path()).expect("host"));

    let outcome = trigger_download(
        host.clone(),
        &format!("{base}/cv"),
        DownloadOptions::default().timeout(Duration::from_secs(10)),
    )
    .await;
    assert_eq!(outcome, DownloadOutcome::Done);

    let saved = host.finish_transfers().await;
    assert_eq!(saved, vec![dir.path().join("Ahmed Tamer CV.pdf")]);
    let content = std::fs::read_to_string(&saved[0]).expect("read saved file");
    assert_eq!(content, "%PDF-1.4 resume");
    assert_eq!(host.live_frames(), 0);
    assert!(host.navigations().is_empty());
}

#[tokio::test]
async fn resume_error_falls_back_to_navigation() {
    let base = spawn_server(Router::new().route(
        "/missing.pdf",
        get(|| async { StatusCode::NOT_FOUND }),
    ))
    .await;
    let url = format!("{base}/missing.pdf");

    let dir = tempdir().expect("Failed to create temporary directory");
    let mut config = Config::default();
    config.resume.pdf_url = url.clone();
    let app = App::with_parts(config, file_store(dir.path()), Arc::new(EmbeddedBundles)).await;

    let host = Arc::new(HttpFrameHost::new(dir.path().join("downloads")).expect("host"));
    let downloader = app.resume_downloader(host.clone(), ResumeFormat::Pdf);

    let outcome = downloader.start().expect("url configured").await;

    assert!(matches!(outcome, DownloadOutcome::Error(_)));
    assert_eq!(downloader.status(), ResumeStatus::Error);
    assert_eq!(host.navigations(), vec![url]);
    assert!(host.finish_transfers().await.is_empty());
    assert_eq!(host.live_frames(), 0);
}
