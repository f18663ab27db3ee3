//! Locator generation module
//!
//! Turns one page-source capture into a list of elements with verified,
//! platform-appropriate locators:
//! - strategy: platform and selector-strategy vocabulary
//! - filter: which nodes are worth surfacing
//! - synthesize: per-element candidate construction and uniqueness checks
//! - generate: the tree walk tying it all together

pub mod filter;
pub mod generate;
pub mod strategy;
pub mod synthesize;

pub use filter::{
    has_meaningful_content, is_interactable, is_layout_container, should_include, FilterConfig,
};
pub use generate::{generate_elements, ElementWithLocators, UNKNOWN_VIEWPORT};
pub use strategy::{Platform, Strategy};
pub use synthesize::LocatorSynthesizer;
