use arc_swap::ArcSwap;
use lambda_http::tracing;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

pub type HeaderMap = HashMap<String, String>;

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "OPTIONS,GET,PUT,POST,PATCH,DELETE";
const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";

static DEFAULT_HEADERS: OnceLock<ArcSwap<HeaderMap>> = OnceLock::new();
static OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

fn default_store() -> &'static ArcSwap<HeaderMap> {
    DEFAULT_HEADERS.get_or_init(|| ArcSwap::from_pointee(HeaderMap::new()))
}

/// Replaces the headers applied to every response built from the process defaults.
///
/// Responses that were already built keep the headers they were built with.
pub fn set_default_headers(headers: HeaderMap) {
    tracing::debug!("Replacing default response headers: {:?}", headers);
    default_store().store(Arc::new(headers));
}

pub fn default_headers() -> Arc<HeaderMap> {
    default_store().load_full()
}

/// Restores the previous process defaults when dropped.
///
/// Only one override is active at a time; a second call blocks until the
/// first guard is dropped, so tests that touch the process defaults don't
/// observe each other's headers.
pub struct DefaultHeadersGuard {
    previous: Arc<HeaderMap>,
    _lock: MutexGuard<'static, ()>,
}

pub fn override_default_headers(headers: HeaderMap) -> DefaultHeadersGuard {
    let lock = OVERRIDE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = default_store().swap(Arc::new(headers));
    DefaultHeadersGuard {
        previous,
        _lock: lock,
    }
}

impl Drop for DefaultHeadersGuard {
    fn drop(&mut self) {
        default_store().store(self.previous.clone());
    }
}

/// Merges header maps in order. A later map overwrites an earlier one on a shared key.
pub fn merge_headers(maps: &[&HeaderMap]) -> HeaderMap {
    let mut merged = HeaderMap::new();
    for headers in maps {
        for (key, value) in headers.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

pub fn cors_allow_origin() -> &'static str {
    CORS_ALLOW_ORIGIN
}

pub fn cors_allow_methods() -> &'static str {
    CORS_ALLOW_METHODS
}

pub fn cors_allow_headers() -> &'static str {
    CORS_ALLOW_HEADERS
}

/// The `Access-Control-Allow-*` response headers. These are never added to
/// a response unless the caller merges them into its defaults.
pub fn cors_headers() -> HeaderMap {
    HeaderMap::from([
        (
            "Access-Control-Allow-Origin".to_string(),
            CORS_ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            CORS_ALLOW_METHODS.to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        ),
    ])
}

/// CORS headers keyed as API Gateway method response parameters, with the
/// values quoted the way integration response mappings expect them.
pub fn cors_method_response_parameters() -> HeaderMap {
    cors_headers()
        .into_iter()
        .map(|(name, value)| {
            (
                format!("method.response.header.{}", name),
                format!("'{}'", value),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn when_no_maps_are_merged_should_return_empty() {
        assert!(merge_headers(&[]).is_empty());
    }

    #[test]
    fn when_keys_collide_later_map_should_win() {
        let first = headers(&[("Content-Type", "text/plain"), ("X-Trace", "abc")]);
        let second = headers(&[("Content-Type", "application/json")]);

        let merged = merge_headers(&[&first, &second]);

        assert_eq!(merged["Content-Type"], "application/json");
        assert_eq!(merged["X-Trace"], "abc");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn when_merging_should_not_touch_inputs() {
        let first = headers(&[("a", "1")]);
        let second = headers(&[("a", "2"), ("b", "3")]);

        let _ = merge_headers(&[&first, &second]);

        assert_eq!(first, headers(&[("a", "1")]));
        assert_eq!(second, headers(&[("a", "2"), ("b", "3")]));
    }

    #[test]
    fn when_header_names_differ_in_case_should_keep_both() {
        let first = headers(&[("content-type", "text/plain")]);
        let second = headers(&[("Content-Type", "application/json")]);

        let merged = merge_headers(&[&first, &second]);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn when_defaults_are_set_should_be_returned() {
        let _guard = override_default_headers(HeaderMap::new());
        let expected = headers(&[("header", "brand-new")]);

        set_default_headers(expected.clone());

        assert_eq!(*default_headers(), expected);
    }

    #[test]
    fn when_override_is_dropped_should_restore_previous_defaults() {
        let guard = override_default_headers(headers(&[("scoped", "1")]));
        assert_eq!(default_headers()["scoped"], "1");

        drop(guard);

        assert!(!default_headers().contains_key("scoped"));
    }

    #[test]
    fn cors_headers_should_use_gateway_values() {
        let cors = cors_headers();

        assert_eq!(cors["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            cors["Access-Control-Allow-Methods"],
            "OPTIONS,GET,PUT,POST,PATCH,DELETE"
        );
        assert_eq!(
            cors["Access-Control-Allow-Headers"],
            "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent"
        );
    }

    #[test]
    fn cors_method_response_parameters_should_be_quoted() {
        let params = cors_method_response_parameters();

        assert_eq!(params.len(), 3);
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Origin"],
            "'*'"
        );
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Methods"],
            format!("'{}'", cors_allow_methods())
        );
    }
}
