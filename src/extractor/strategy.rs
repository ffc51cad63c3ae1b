//! Field fallback chains
//!
//! Each record field is described by an ordered list of `Strategy` values.
//! A strategy names where to look (a CSS selector relative to the record
//! block), what to read (text, an attribute, or mere presence) and how to
//! clean the raw value. The extractor applies them in order and keeps the
//! first one that yields a value.

use chrono::NaiveDate;
use scraper::node::Node;
use scraper::{ElementRef, Selector};

use super::record::LONG_DATE_FORMAT;
use crate::harvest_engine::{HarvestError, HarvestResult};

/// What part of the matched element a strategy reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Visible text, `<br>` rendered as a line break
    Text,
    /// Value of the named attribute
    Attr(&'static str),
    /// Only whether the element exists
    Presence,
}

/// Post-processing applied to a raw value; `None` means "try the next strategy"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trim,
    /// Drop a leading label such as "Date of experience:"
    StripLabel(&'static str),
    /// ISO-8601 timestamp to long calendar form
    IsoDateToLong,
    /// Integer between `stars-` and `.svg` in an asset path
    StarAssetSuffix,
}

/// One way of obtaining a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub name: &'static str,
    pub selector: &'static str,
    pub source: Source,
    pub transform: Transform,
}

impl Strategy {
    const fn text(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector,
            source: Source::Text,
            transform: Transform::Trim,
        }
    }

    const fn presence(name: &'static str, selector: &'static str) -> Self {
        Self {
            name,
            selector,
            source: Source::Presence,
            transform: Transform::Trim,
        }
    }
}

pub const DATE_OF_EXPERIENCE_LABEL: &str = "Date of experience:";

pub static DATE_STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "date-of-experience",
        selector: "p[data-service-review-date-of-experience-typography='true']",
        source: Source::Text,
        transform: Transform::StripLabel(DATE_OF_EXPERIENCE_LABEL),
    },
    Strategy {
        name: "published-time",
        selector: "time[data-service-review-date-time-ago][datetime]",
        source: Source::Attr("datetime"),
        transform: Transform::IsoDateToLong,
    },
    Strategy {
        name: "published-time-class",
        selector: "time.data-service-review-date-time-ago[datetime]",
        source: Source::Attr("datetime"),
        transform: Transform::IsoDateToLong,
    },
];

pub static AUTHOR_STRATEGIES: &[Strategy] = &[
    Strategy::text(
        "heading-name",
        "span.typography_heading-xxs__UmE9o.typography_appearance-default__t8iAq",
    ),
    Strategy::text(
        "consumer-details-name",
        "a.link_internal__Eam_b.link_wrapper__ahpyq.styles_consumerDetails__DW9Hp span.typography_heading-xxs__UmE9o",
    ),
];

pub static PLACE_STRATEGIES: &[Strategy] = &[Strategy::text(
    "details-icon",
    "div.typography_body-m__k2UI7.typography_appearance-subtle__PYOVM.styles_detailsIcon__ch_FY span",
)];

pub static CONTENT_STRATEGIES: &[Strategy] = &[Strategy::text(
    "review-body",
    "p.typography_body-l__v5JLj.typography_appearance-default__t8iAq.typography_color-black__wpn7m",
)];

pub static RATING_STRATEGIES: &[Strategy] = &[Strategy {
    name: "star-image",
    selector: "div.star-rating_starRating__sdbkn.star-rating_medium__Oj7C9 img[alt*='star' i][src]",
    source: Source::Attr("src"),
    transform: Transform::StarAssetSuffix,
}];

pub static VERIFIED_STRATEGIES: &[Strategy] = &[
    Strategy::presence("verified-header", "div.review-content-header__review-verified"),
    Strategy::presence("verified-badge", "span.verified-badge"),
];

/// A strategy list with its selectors parsed
#[derive(Debug)]
pub struct CompiledChain {
    field: &'static str,
    steps: Vec<(Selector, Strategy)>,
}

impl CompiledChain {
    /// Parse every selector of the chain up front
    pub fn compile(field: &'static str, strategies: &[Strategy]) -> HarvestResult<Self> {
        let steps = strategies
            .iter()
            .map(|s| Ok((parse_selector(s.selector)?, *s)))
            .collect::<HarvestResult<Vec<_>>>()?;
        Ok(Self { field, steps })
    }

    /// First value produced by the chain within `block`
    #[must_use]
    pub fn first_value(&self, block: ElementRef<'_>) -> Option<String> {
        self.steps.iter().find_map(|(selector, strategy)| {
            let value = block
                .select(selector)
                .find_map(|el| apply(strategy, el));
            if value.is_some() {
                tracing::trace!("{}: matched strategy '{}'", self.field, strategy.name);
            }
            value
        })
    }
}

/// Parse a CSS selector into `HarvestError::Selector` on failure
pub fn parse_selector(selector: &str) -> HarvestResult<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn apply(strategy: &Strategy, el: ElementRef<'_>) -> Option<String> {
    let raw = match strategy.source {
        Source::Text => element_text(el),
        Source::Attr(name) => el.value().attr(name)?.to_string(),
        Source::Presence => return Some("true".to_string()),
    };
    transform(strategy.transform, &raw)
}

fn transform(transform: Transform, raw: &str) -> Option<String> {
    let value = match transform {
        Transform::Trim => raw.trim().to_string(),
        Transform::StripLabel(label) => raw
            .trim()
            .strip_prefix(label)
            .unwrap_or(raw.trim())
            .trim()
            .to_string(),
        Transform::IsoDateToLong => iso_to_long_date(raw)?,
        Transform::StarAssetSuffix => star_asset_suffix(raw)?.to_string(),
    };
    (!value.is_empty()).then_some(value)
}

/// `2024-01-05T10:00:00.000Z` -> `January 05, 2024`
#[must_use]
pub fn iso_to_long_date(raw: &str) -> Option<String> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.format(LONG_DATE_FORMAT).to_string())
}

/// `https://cdn/.../stars-4.svg` -> `4`
#[must_use]
pub fn star_asset_suffix(src: &str) -> Option<&str> {
    let (_, tail) = src.rsplit_once("stars-")?;
    let digits = tail.split(".svg").next()?.trim();
    (!digits.is_empty()).then_some(digits)
}

/// Visible text of an element with `<br>` kept as line breaks
///
/// Lines are trimmed and blank lines dropped.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut buf = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(e) if e.name() == "br" => buf.push('\n'),
            _ => {}
        }
    }
    buf.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn star_suffix_is_taken_from_last_marker() {
        assert_eq!(
            star_asset_suffix("https://cdn.trustpilot.net/brand-assets/4.1.0/stars/stars-4.svg"),
            Some("4")
        );
        assert_eq!(star_asset_suffix("/img/stars-5.svg?v=2"), Some("5"));
        assert_eq!(star_asset_suffix("/img/rating.svg"), None);
        assert_eq!(star_asset_suffix("/img/stars-.svg"), None);
    }

    #[test]
    fn iso_timestamp_becomes_long_date() {
        assert_eq!(
            iso_to_long_date("2023-11-02T14:31:00.000Z").as_deref(),
            Some("November 02, 2023")
        );
        assert_eq!(iso_to_long_date("yesterday"), None);
    }

    #[test]
    fn label_prefix_is_stripped() {
        assert_eq!(
            transform(
                Transform::StripLabel(DATE_OF_EXPERIENCE_LABEL),
                "  Date of experience: March 03, 2024 "
            )
            .as_deref(),
            Some("March 03, 2024")
        );
        assert_eq!(
            transform(Transform::StripLabel(DATE_OF_EXPERIENCE_LABEL), "Date of experience:"),
            None
        );
    }

    #[test]
    fn every_default_chain_compiles() {
        for (field, chain) in [
            ("date", DATE_STRATEGIES),
            ("author", AUTHOR_STRATEGIES),
            ("place", PLACE_STRATEGIES),
            ("content", CONTENT_STRATEGIES),
            ("rating", RATING_STRATEGIES),
            ("verified", VERIFIED_STRATEGIES),
        ] {
            assert!(CompiledChain::compile(field, chain).is_ok(), "{field} chain");
        }
    }

    #[test]
    fn chain_falls_through_empty_matches() {
        let html = Html::parse_fragment(
            r#"<div class="card">
                <span class="typography_heading-xxs__UmE9o typography_appearance-default__t8iAq">  </span>
                <a class="link_internal__Eam_b link_wrapper__ahpyq styles_consumerDetails__DW9Hp">
                    <span class="typography_heading-xxs__UmE9o">Jane Doe</span>
                </a>
            </div>"#,
        );
        let card = parse_selector("div.card").unwrap();
        let block = html.select(&card).next().unwrap();
        let chain = CompiledChain::compile("author", AUTHOR_STRATEGIES).unwrap();
        assert_eq!(chain.first_value(block).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn star_alt_text_matches_in_any_case() {
        let chain = CompiledChain::compile("rating", RATING_STRATEGIES).unwrap();
        let card = parse_selector("div.card").unwrap();
        let rating_for = |alt: &str| {
            let html = Html::parse_fragment(&format!(
                r#"<div class="card"><div class="star-rating_starRating__sdbkn star-rating_medium__Oj7C9"><img alt="{alt}" src="/img/stars-4.svg"></div></div>"#
            ));
            let block = html.select(&card).next().unwrap();
            chain.first_value(block)
        };

        for alt in ["Rated 4 out of 5 stars", "RATED 4 STARS", "4 Star review"] {
            assert_eq!(rating_for(alt).as_deref(), Some("4"), "{alt}");
        }
        assert_eq!(rating_for("Company logo"), None);
    }

    #[test]
    fn line_breaks_survive_text_extraction() {
        let html = Html::parse_fragment("<p id=\"x\">First line<br>  second line </p>");
        let p = parse_selector("p#x").unwrap();
        let el = html.select(&p).next().unwrap();
        assert_eq!(element_text(el), "First line\nsecond line");
    }
}
