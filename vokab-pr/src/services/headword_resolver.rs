//! Headword / word-type resolver
//!
//! Finds the US pronunciation audio link of the first dictionary entry whose
//! headword equals the requested word (case-insensitive) and whose
//! part-of-speech label maps to the requested word type.
//!
//! Expected entry shape (attributes trimmed):
//!
//! ```html
//! <div class="pos-header">
//!   <div class="di-title"><span class="hw">run</span></div>
//!   <div class="posgram"><span class="pos">verb</span></div>
//!   <span class="uk">...</span>
//!   <span class="us"><audio><source type="audio/mpeg" src="/media/us/run.mp3"/></audio></span>
//! </div>
//! ```
//!
//! Page markup is untrusted. Missing nodes and attributes make an entry a
//! non-match; they never raise errors. So does an audio `src` that is not a
//! valid absolute or site-relative URL.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use vokab_common::{Error, Result, WordType};

use crate::config::MarkupConfig;
use crate::types::{AudioLinkResolver, LinkResolution};

const AUDIO_SOURCE_SELECTOR: &str = r#"source[type="audio/mpeg"]"#;

/// Stand-in origin for checking that relative links resolve
const LINK_CHECK_BASE: &str = "https://dictionary.invalid/";

/// HTML implementation of [`AudioLinkResolver`]
#[derive(Debug)]
pub struct HeadwordResolver {
    headword: Selector,
    pos_label: Selector,
    us_pronunciation: Selector,
    audio_source: Selector,
}

impl HeadwordResolver {
    pub fn new(markup: &MarkupConfig) -> Result<Self> {
        Ok(Self {
            headword: parse_selector(&markup.headword_selector)?,
            pos_label: parse_selector(&markup.pos_selector)?,
            us_pronunciation: parse_selector(&markup.us_pronunciation_selector)?,
            audio_source: parse_selector(AUDIO_SOURCE_SELECTOR)?,
        })
    }

    /// Part-of-speech label from the element right after the headword node
    fn pos_label_of(&self, headword: ElementRef<'_>) -> Option<String> {
        let sibling = headword.next_siblings().find_map(ElementRef::wrap)?;
        let label = match sibling.select(&self.pos_label).next() {
            Some(pos) => element_text(pos),
            None => element_text(sibling),
        };
        (!label.is_empty()).then_some(label)
    }

    /// First `audio/mpeg` source inside a US pronunciation block of `entry`
    fn us_audio_src(&self, entry: ElementRef<'_>) -> Option<String> {
        entry
            .select(&self.us_pronunciation)
            .flat_map(|us| us.select(&self.audio_source))
            .find_map(|source| {
                source
                    .value()
                    .attr("src")
                    .map(str::trim)
                    .filter(|src| !src.is_empty() && is_resolvable_link(src))
                    .map(str::to_string)
            })
    }
}

impl AudioLinkResolver for HeadwordResolver {
    fn resolve(&self, page: &str, word: &str, word_type: WordType) -> LinkResolution {
        let document = Html::parse_document(page);
        let wanted = collapse_whitespace(word).to_lowercase();
        let mut saw_headword = false;

        for headword in document.select(&self.headword) {
            saw_headword = true;

            if element_text(headword).to_lowercase() != wanted {
                continue;
            }

            let Some(label) = self.pos_label_of(headword) else {
                continue;
            };
            let entry_type = WordType::from_label(&label);
            if !entry_type.is_classified() || entry_type != word_type {
                continue;
            }

            let Some(entry) = headword.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if let Some(src) = self.us_audio_src(entry) {
                tracing::debug!(word = %word, word_type = %word_type, src = %src, "Resolved audio link");
                return LinkResolution::Found(src);
            }
        }

        if saw_headword {
            LinkResolution::NotFound
        } else {
            LinkResolution::Malformed
        }
    }
}

fn is_resolvable_link(src: &str) -> bool {
    match Url::parse(LINK_CHECK_BASE).and_then(|base| base.join(src)) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => {
            tracing::debug!(src = %src, "Skipping unparseable audio link");
            false
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Config(format!("Invalid CSS selector '{}': {}", selector, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
