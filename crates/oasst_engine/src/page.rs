use oasst_logging::oasst_debug;

use crate::decode::decode_html;
use crate::fetch::{Fetcher, ProgressSink};
use crate::page_text::VisibleTextExtractor;
use crate::{FailureKind, FetchError, PageSource, PageText, RequestId};

/// Reads a page from its source and reduces it to visible text.
pub async fn load_page(
    request_id: RequestId,
    source: &PageSource,
    fetcher: &dyn Fetcher,
    sink: &dyn ProgressSink,
) -> Result<PageText, FetchError> {
    let (bytes, content_type) = match source {
        PageSource::Url(url) => {
            let output = fetcher.fetch(request_id, url, sink).await?;
            (output.bytes, output.metadata.content_type)
        }
        PageSource::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|err| FetchError::new(FailureKind::Io, format!("{}: {err}", path.display())))?;
            (bytes, None)
        }
        PageSource::Html(html) => (html.clone().into_bytes(), Some("text/html; charset=utf-8".to_string())),
    };

    let decoded = decode_html(&bytes, content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    let extracted = VisibleTextExtractor::new().extract(&decoded.html);
    oasst_debug!(
        "Extracted {} chars of visible text from {} ({})",
        extracted.text.chars().count(),
        source,
        decoded.encoding_label
    );
    Ok(PageText {
        title: extracted.title,
        text: extracted.text,
        encoding: decoded.encoding_label,
    })
}
