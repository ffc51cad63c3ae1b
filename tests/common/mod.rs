//! Test utilities for the review_harvester test suite
//!
//! `ScriptedDriver` stands in for a browser: every page index maps to a
//! canned document, marker count, height sequence and next-page state.

use async_trait::async_trait;
use review_harvester::{HarvestError, HarvestResult, NextAffordance, PageDriver};
use std::collections::HashMap;
use url::Url;

pub const MARKER_CLASS: &str = "styles_reviewCardInner__UZk1x";

/// Canned behaviour of one listing page
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub html: String,
    pub markers: usize,
    /// Heights reported by successive measurements; the last one repeats
    pub extents: Vec<u64>,
    pub next: NextAffordance,
    /// Markers never show up, so the marker wait times out
    pub never_renders: bool,
    pub fail_navigation: bool,
}

impl ScriptedPage {
    /// A page showing `count` well-formed review cards
    #[allow(dead_code)]
    pub fn with_cards(count: usize, next: NextAffordance) -> Self {
        Self {
            html: listing_document(&(0..count).map(review_card).collect::<Vec<_>>()),
            markers: count,
            extents: vec![4_000],
            next,
            never_renders: false,
            fail_navigation: false,
        }
    }

    /// A page that never renders a record marker
    #[allow(dead_code)]
    pub fn blank(next: NextAffordance) -> Self {
        Self {
            html: listing_document(&[]),
            markers: 0,
            extents: vec![800],
            next,
            never_renders: true,
            fail_navigation: false,
        }
    }
}

/// Fake browser driven by a page script
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    pages: HashMap<u32, ScriptedPage>,
    current: Option<u32>,
    extent_calls: usize,
    /// Page indices in the order they were navigated to
    pub visited: Vec<u32>,
    /// Reveal attempts per page index
    pub reveals: HashMap<u32, u32>,
    pub close_calls: u32,
}

impl ScriptedDriver {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn page(mut self, index: u32, page: ScriptedPage) -> Self {
        self.pages.insert(index, page);
        self
    }

    fn current_page(&self) -> Option<&ScriptedPage> {
        self.current.and_then(|index| self.pages.get(&index))
    }
}

fn page_index(url: &str) -> HarvestResult<u32> {
    let parsed = Url::parse(url).map_err(|e| HarvestError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1))
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        let index = page_index(url)?;
        self.visited.push(index);
        self.current = Some(index);
        self.extent_calls = 0;

        if self.current_page().is_some_and(|page| page.fail_navigation) {
            return Err(HarvestError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        Ok(())
    }

    async fn count_markers(&mut self, _selector: &str) -> HarvestResult<usize> {
        Ok(match self.current_page() {
            Some(page) if !page.never_renders => page.markers,
            _ => 0,
        })
    }

    async fn reveal_more(&mut self) -> HarvestResult<()> {
        if let Some(index) = self.current {
            *self.reveals.entry(index).or_default() += 1;
        }
        Ok(())
    }

    async fn document_extent(&mut self) -> HarvestResult<u64> {
        let call = self.extent_calls;
        self.extent_calls += 1;
        Ok(self
            .current_page()
            .and_then(|page| page.extents.get(call).or(page.extents.last()))
            .copied()
            .unwrap_or(0))
    }

    async fn rendered_document(&mut self) -> HarvestResult<String> {
        Ok(self
            .current_page()
            .map(|page| page.html.clone())
            .unwrap_or_else(|| listing_document(&[])))
    }

    async fn next_affordance(&mut self, _selector: &str) -> HarvestResult<NextAffordance> {
        Ok(self
            .current_page()
            .map_or(NextAffordance::Absent, |page| page.next))
    }

    async fn close(&mut self) -> HarvestResult<()> {
        self.close_calls += 1;
        Ok(())
    }
}

/// Wraps record blocks in a minimal listing document
#[allow(dead_code)]
pub fn listing_document(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Reviews</title></head>
<body>
    <section class="styles_reviewsContainer__3_GQw">
    {}
    </section>
</body>
</html>"#,
        cards.join("\n")
    )
}

/// Fully populated review card; `i` varies author, place, rating and body
#[allow(dead_code)]
pub fn review_card(i: usize) -> String {
    card(CardParts {
        author: Some(format!("Reviewer {i}")),
        place: Some("GB".to_string()),
        date: Some("January 05, 2024".to_string()),
        body: Some(format!("Flight {i} was on time.<br>Crew were friendly.")),
        stars_src: Some(format!(
            "https://cdn.trustpilot.net/brand-assets/4.1.0/stars/stars-{}.svg",
            i % 5 + 1
        )),
        verified: i % 2 == 0,
        ..CardParts::default()
    })
}

/// Pieces of a review card; `None` leaves the markup out entirely
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct CardParts {
    pub author: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
    pub stars_src: Option<String>,
    /// Alt text of the star image; a "Rated N out of 5 stars" label when unset
    pub stars_alt: Option<String>,
    /// Review header marker
    pub verified: bool,
    /// Standalone badge marker
    pub verified_badge: bool,
}

#[allow(dead_code)]
pub fn card(parts: CardParts) -> String {
    let mut inner = String::new();

    if let Some(author) = parts.author {
        inner.push_str(&format!(
            r#"<a class="link_internal__Eam_b link_wrapper__ahpyq styles_consumerDetails__DW9Hp" href="/users/1">
                <span class="typography_heading-xxs__UmE9o typography_appearance-default__t8iAq">{author}</span>
            </a>"#
        ));
    }
    if let Some(place) = parts.place {
        inner.push_str(&format!(
            r#"<div class="typography_body-m__k2UI7 typography_appearance-subtle__PYOVM styles_detailsIcon__ch_FY"><span>{place}</span></div>"#
        ));
    }
    if let Some(src) = parts.stars_src {
        let alt = parts
            .stars_alt
            .unwrap_or_else(|| "Rated 4 out of 5 stars".to_string());
        inner.push_str(&format!(
            r#"<div class="star-rating_starRating__sdbkn star-rating_medium__Oj7C9"><img alt="{alt}" src="{src}"></div>"#
        ));
    }
    if parts.verified {
        inner.push_str(r#"<div class="review-content-header__review-verified">Verified</div>"#);
    }
    if parts.verified_badge {
        inner.push_str(r#"<span class="verified-badge">Verified</span>"#);
    }
    if let Some(body) = parts.body {
        inner.push_str(&format!(
            r#"<p class="typography_body-l__v5JLj typography_appearance-default__t8iAq typography_color-black__wpn7m">{body}</p>"#
        ));
    }
    if let Some(date) = parts.date {
        inner.push_str(&format!(
            r#"<p data-service-review-date-of-experience-typography="true"><b>Date of experience:</b> {date}</p>"#
        ));
    }

    format!(r#"<div class="{MARKER_CLASS}">{inner}</div>"#)
}
