//! Built-in document assets, embedded at compile time.
//!
//! Each asset is a JSON [`DocumentSource`]; the text lives under
//! `assets/` so it can be edited without touching drawing code.

use crate::content::DocumentSource;
use crate::error::Result;

/// Confidential bilingual compliance review (formal theme).
pub fn legal_review_asset() -> &'static str {
    include_str!("../assets/legal_review.json")
}

/// Bilingual terms of use (formal theme).
pub fn terms_of_use_asset() -> &'static str {
    include_str!("../assets/terms_of_use.json")
}

/// Bilingual privacy policy (formal theme).
pub fn privacy_policy_asset() -> &'static str {
    include_str!("../assets/privacy_policy.json")
}

/// Korean/French market-entry guide (guide theme).
pub fn market_guide_asset() -> &'static str {
    include_str!("../assets/market_guide.json")
}

/// Name and raw JSON of every built-in asset, in generation order.
pub fn builtin_assets() -> [(&'static str, &'static str); 4] {
    [
        ("legal_review", legal_review_asset()),
        ("terms_of_use", terms_of_use_asset()),
        ("privacy_policy", privacy_policy_asset()),
        ("market_guide", market_guide_asset()),
    ]
}

/// Parse every built-in asset.
pub fn builtin_documents() -> Result<Vec<DocumentSource>> {
    builtin_assets()
        .iter()
        .map(|(_, json)| DocumentSource::from_json(json))
        .collect()
}
