use oasst_engine::{NullProgressSink, PageSource, ReqwestFetcher, FetchSettings, VisibleTextExtractor, load_page};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn scripts_buttons_and_inputs_are_not_page_text() {
    let html = r#"
        <html><head><title>  My   Page </title><style>p { color: red }</style></head>
        <body>
            <script>var secret = 1;</script>
            <div>First
                paragraph</div><div>Second</div>
            <button>Click me</button><input value="typed">
            <noscript>enable js</noscript>
            <p>Tail <em>text</em></p>
        </body></html>
    "#;
    let out = VisibleTextExtractor::new().extract(html);
    assert_eq!(out.title.as_deref(), Some("My Page"));
    assert_eq!(out.text, "First paragraph Second Tail text");
}

#[test]
fn empty_body_gives_empty_text() {
    let out = VisibleTextExtractor::new().extract("<html><body>   </body></html>");
    assert_eq!(out.text, "");
    assert_eq!(out.title, None);
}

#[tokio::test]
async fn file_pages_are_decoded_and_extracted() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("page.html");
    std::fs::write(
        &file,
        b"<html><head><meta charset=\"iso-8859-1\"></head><body><p>caf\xe9 au lait</p></body></html>",
    )
    .unwrap();

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let page = load_page(1, &PageSource::File(file), &fetcher, &NullProgressSink)
        .await
        .unwrap();
    assert_eq!(page.text, "café au lait");
    assert_eq!(page.encoding, "windows-1252");
}

#[tokio::test]
async fn a_stray_byte_does_not_lose_the_page() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("page.html");
    std::fs::write(
        &file,
        b"<html><head><meta charset=\"utf-8\"></head><body><p>caf\xe9 au lait</p><p>with sugar</p></body></html>",
    )
    .unwrap();

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let page = load_page(3, &PageSource::File(file), &fetcher, &NullProgressSink)
        .await
        .unwrap();
    assert_eq!(page.text, "caf\u{FFFD} au lait with sugar");
    assert_eq!(page.encoding, "UTF-8");
}

#[tokio::test]
async fn url_pages_go_through_the_fetcher() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><div>Breaking</div><div>news</div></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let source = PageSource::Url(format!("{}/news", server.uri()));
    let page = load_page(2, &source, &fetcher, &NullProgressSink).await.unwrap();
    assert_eq!(page.text, "Breaking news");
}

#[tokio::test]
async fn missing_files_are_io_failures() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let source = PageSource::File("/definitely/not/here.html".into());
    let err = load_page(3, &source, &fetcher, &NullProgressSink).await.unwrap_err();
    assert_eq!(err.kind, oasst_engine::FailureKind::Io);
}
