//! Product URL helpers: store identity and relative resource resolution

use serde::{Deserialize, Serialize};
use url::Url;

/// Label used when a URL has no usable host or matches no known merchant
pub const GENERIC_STORE_LABEL: &str = "Store";

/// How the `store` label is derived from a product URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreNaming {
    /// Host with a leading `www.` removed, e.g. `amazon.com.br`
    #[default]
    Domain,
    /// Friendly merchant name found by host substring, e.g. `Mercado Livre`
    KnownMerchant,
}

/// Host fragment to display name mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantLabel {
    pub host_fragment: String,
    pub label: String,
}

impl MerchantLabel {
    pub fn new(host_fragment: &str, label: &str) -> Self {
        Self {
            host_fragment: host_fragment.to_string(),
            label: label.to_string(),
        }
    }
}

/// Merchants recognized by the wishlist page
pub fn default_merchant_labels() -> Vec<MerchantLabel> {
    vec![
        MerchantLabel::new("amazon", "Amazon"),
        MerchantLabel::new("mercadolivre", "Mercado Livre"),
        MerchantLabel::new("magazineluiza", "Magalu"),
        MerchantLabel::new("kabum", "KaBuM!"),
        MerchantLabel::new("shopee", "Shopee"),
        MerchantLabel::new("aliexpress", "AliExpress"),
        MerchantLabel::new("americanas", "Americanas"),
        MerchantLabel::new("casasbahia", "Casas Bahia"),
    ]
}

/// Deterministic URL to store label mapping
#[derive(Debug, Clone)]
pub struct StoreResolver {
    naming: StoreNaming,
    merchants: Vec<MerchantLabel>,
}

impl StoreResolver {
    pub fn new(naming: StoreNaming, merchants: Vec<MerchantLabel>) -> Self {
        let merchants = merchants
            .into_iter()
            .map(|m| MerchantLabel {
                host_fragment: m.host_fragment.to_lowercase(),
                label: m.label,
            })
            .collect();
        Self { naming, merchants }
    }

    /// Store label for `url`; never empty
    pub fn store_for(&self, url: &str) -> String {
        let Some(host) = host_of(url) else {
            return GENERIC_STORE_LABEL.to_string();
        };

        match self.naming {
            StoreNaming::Domain => host
                .strip_prefix("www.")
                .unwrap_or(&host)
                .to_string(),
            StoreNaming::KnownMerchant => self
                .merchants
                .iter()
                .find(|m| host.contains(&m.host_fragment))
                .map_or_else(|| GENERIC_STORE_LABEL.to_string(), |m| m.label.clone()),
        }
    }
}

impl Default for StoreResolver {
    fn default() -> Self {
        Self::new(StoreNaming::default(), default_merchant_labels())
    }
}

/// Lowercased host of an absolute URL
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .filter(|h| !h.is_empty())
}

/// Turn a possibly relative resource reference into an absolute http(s) URL
///
/// Already-absolute http(s) references are returned untouched. Anything else,
/// including protocol-relative `//cdn...` forms, is joined onto `page_url`.
/// Returns `None` when the result would not be an http(s) URL.
pub fn resolve_against(page_url: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Ok(absolute) = Url::parse(reference) {
        return is_web_scheme(&absolute).then(|| reference.to_string());
    }

    let base = Url::parse(page_url).ok()?;
    let joined = base.join(reference).ok()?;
    is_web_scheme(&joined).then(|| joined.to_string())
}

fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
