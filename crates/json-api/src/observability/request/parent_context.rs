//! Parent trace context extraction from HTTP headers.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    let extractor = HeaderExtractor::new(headers);

    global::get_text_map_propagator(|propagator| {
        // Use a fresh base context so missing trace headers don't inherit the
        // currently active in-process span chain.
        let context = propagator.extract_with_context(&Context::new(), &extractor);
        let span = context.span();
        let span_context = span.span_context();

        span_context.is_valid().then_some(context)
    })
}

#[derive(Debug)]
struct HeaderExtractor<'a> {
    headers: &'a HeaderMap,
}

impl<'a> HeaderExtractor<'a> {
    fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }
}

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        let value = self.headers.get(key)?;
        value.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.headers.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;

    use super::*;

    #[test]
    fn valid_traceparent_yields_a_remote_parent() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let mut headers = HeaderMap::new();
        headers.insert(
            "traceparent",
            HeaderValue::from_static("00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01"),
        );

        let context = extract_parent_context(&headers);

        assert!(
            context.is_some_and(|context| context.span().span_context().is_remote()),
            "remote parent extracted"
        );
    }

    #[test]
    fn missing_traceparent_yields_nothing() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        assert!(
            extract_parent_context(&HeaderMap::new()).is_none(),
            "no parent without headers"
        );
    }
}
