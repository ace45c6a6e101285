use metrics::describe_counter;
use std::sync::Once;

static REGISTER: Once = Once::new();

pub fn register_metrics() {
    REGISTER.call_once(|| {
        describe_counter!("urls_built_total", "Total number of image URLs built");
        describe_counter!(
            "urls_unavailable_total",
            "Total number of URL requests a provider could not serve"
        );
        describe_counter!(
            "srcset_variants_skipped_total",
            "Total number of srcset widths omitted because no URL was produced"
        );
    });
}

pub fn increment_urls_built(provider: &str) {
    let provider_label = provider.to_owned();
    metrics::counter!("urls_built_total", "provider" => provider_label).increment(1);
}

pub fn increment_urls_unavailable(provider: &str) {
    let provider_label = provider.to_owned();
    metrics::counter!("urls_unavailable_total", "provider" => provider_label).increment(1);
}

pub fn increment_srcset_variants_skipped() {
    metrics::counter!("srcset_variants_skipped_total").increment(1);
}
