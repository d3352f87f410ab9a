//! Deduplicate, batch, probe and fan results back out.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, info};

use crate::checker::check_url;
use crate::config::LinkCheckConfig;
use crate::probe::Prober;
use crate::rate_limit::RateLimiter;
use crate::report::{LinkStatus, SourceType, UrlCheck};
use crate::scan::UrlMap;

/// Every (file, context) pair a URL was found at, plus unique URLs in
/// first-seen order.
fn index_occurrences(url_map: &UrlMap) -> (Vec<&str>, HashMap<&str, Vec<(&str, &str)>>) {
    let mut order = Vec::new();
    let mut occurrences: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for (file, urls) in url_map {
        for found in urls {
            let entry = occurrences.entry(found.url.as_str()).or_insert_with(|| {
                order.push(found.url.as_str());
                Vec::new()
            });
            entry.push((file.as_str(), found.context.as_str()));
        }
    }
    (order, occurrences)
}

/// Probe every distinct URL in `url_map` once and report it once per
/// occurrence.
///
/// URLs are checked in batches of `config.batch_size`; a batch runs
/// concurrently and completes before the next one starts. All probes share
/// one rate limiter created for this call.
pub async fn check_all_urls(
    prober: &dyn Prober,
    url_map: &UrlMap,
    config: &LinkCheckConfig,
) -> Vec<UrlCheck> {
    let limiter = RateLimiter::new(config.rate_limit);
    let (unique, occurrences) = index_occurrences(url_map);
    info!(unique = unique.len(), files = url_map.len(), "checking URLs");

    let mut results = Vec::new();
    let mut done = 0;
    for batch in unique.chunks(config.batch_size.max(1)) {
        let outcomes = join_all(
            batch
                .iter()
                .map(|url| check_url(prober, &limiter, url, config.timeout, config.retries)),
        )
        .await;

        for (url, (code, error)) in batch.iter().zip(outcomes) {
            let status = LinkStatus::from_code(code);
            for (file, context) in occurrences.get(url).into_iter().flatten() {
                results.push(UrlCheck {
                    url: url.to_string(),
                    status,
                    status_code: (code != 0).then_some(code),
                    error_message: error.clone(),
                    source_file: file.to_string(),
                    source_type: SourceType::for_path(file),
                    field_name: Some(context.to_string()),
                });
            }
        }
        done += batch.len();
        debug!(done, total = unique.len(), "batch complete");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractedUrl;

    #[test]
    fn occurrences_keep_first_seen_order() {
        let mut map = UrlMap::new();
        map.insert(
            "a.md".to_string(),
            vec![
                ExtractedUrl::new("https://x.dev", "direct"),
                ExtractedUrl::new("https://y.dev", "inline:[y]"),
            ],
        );
        map.insert(
            "b.yml".to_string(),
            vec![ExtractedUrl::new("https://x.dev", "url")],
        );

        let (order, occurrences) = index_occurrences(&map);
        assert_eq!(order, ["https://x.dev", "https://y.dev"]);
        assert_eq!(
            occurrences["https://x.dev"],
            vec![("a.md", "direct"), ("b.yml", "url")]
        );
    }
}
