//! Site data: scenes, hotspots, fallback products and ratings.
//!
//! The site data document (`data.json` by default) is the storefront's
//! bundled content. It is loaded once at startup, image references are
//! resolved, and the result is shared read-only.

mod loader;
mod types;

pub use loader::{SiteDataError, load_site_data};
pub use types::{
    Hotspot, HotspotPosition, ProductReference, Scene, SceneSummary, ShopifySiteConfig, SiteData,
    is_product_handle,
};
