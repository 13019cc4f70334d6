//! Scripted in-memory [`BrowserSession`] for tests.
//!
//! Each [`FakePlace`] is selected when a navigated URL contains its key. Its
//! cards answer clicks according to their flags, and a clicked card's detail
//! markup becomes the page source.

use super::BrowserSession;
use crate::error::SessionError;
use crate::scrapers::details::DETAIL_HEADING;
use crate::scrapers::results::{RESULT_CARD, RESULTS_CONTAINER};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeHandle {
    Container,
    Card(usize),
    Heading,
}

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub detail_html: Option<String>,
    pub pointer_ok: bool,
    pub direct_ok: bool,
}

impl FakeCard {
    pub fn with_detail(html: &str) -> Self {
        Self {
            detail_html: Some(html.to_string()),
            pointer_ok: true,
            direct_ok: true,
        }
    }

    /// Pointer clicks are rejected; the direct click still works.
    pub fn obscured(html: &str) -> Self {
        Self {
            pointer_ok: false,
            ..Self::with_detail(html)
        }
    }

    pub fn unclickable() -> Self {
        Self {
            detail_html: None,
            pointer_ok: false,
            direct_ok: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakePlace {
    pub key: String,
    pub container: bool,
    pub cards: Vec<FakeCard>,
}

impl FakePlace {
    pub fn with_cards(key: &str, cards: Vec<FakeCard>) -> Self {
        Self {
            key: key.to_string(),
            container: true,
            cards,
        }
    }

    pub fn without_container(key: &str) -> Self {
        Self {
            key: key.to_string(),
            container: false,
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    loaded: bool,
    current: Option<usize>,
    active_card: Option<usize>,
    navigations: Vec<String>,
    scrolls: u32,
    lookups: u32,
    direct_clicks: u32,
}

#[derive(Debug)]
pub struct FakeSession {
    places: Vec<FakePlace>,
    state: RefCell<FakeState>,
}

impl FakeSession {
    pub fn new(places: Vec<FakePlace>) -> Self {
        Self {
            places,
            state: RefCell::new(FakeState::default()),
        }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.borrow().navigations.clone()
    }

    pub fn scrolls(&self) -> u32 {
        self.state.borrow().scrolls
    }

    pub fn lookups(&self) -> u32 {
        self.state.borrow().lookups
    }

    pub fn direct_clicks(&self) -> u32 {
        self.state.borrow().direct_clicks
    }

    fn place(&self) -> Option<&FakePlace> {
        self.state.borrow().current.map(|i| &self.places[i])
    }

    fn card(&self, handle: &FakeHandle) -> Result<(usize, &FakeCard), SessionError> {
        match (handle, self.place()) {
            (FakeHandle::Card(i), Some(place)) if *i < place.cards.len() => {
                Ok((*i, &place.cards[*i]))
            }
            _ => Err(SessionError::command("click", "stale element reference")),
        }
    }
}

impl BrowserSession for FakeSession {
    type Handle = FakeHandle;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let current = self.places.iter().position(|p| url.contains(&p.key));
        let mut state = self.state.borrow_mut();
        state.loaded = true;
        state.current = current;
        state.active_card = None;
        state.navigations.push(url.to_string());
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<FakeHandle>, SessionError> {
        let (loaded, active) = {
            let mut state = self.state.borrow_mut();
            state.lookups += 1;
            (state.loaded, state.active_card)
        };
        if !loaded {
            return Err(SessionError::command("find", "no page loaded"));
        }
        let Some(place) = self.place() else {
            return Ok(None);
        };

        let found = match selector {
            RESULTS_CONTAINER => place.container.then_some(FakeHandle::Container),
            RESULT_CARD => (!place.cards.is_empty()).then_some(FakeHandle::Card(0)),
            DETAIL_HEADING => active
                .and_then(|i| place.cards[i].detail_html.as_deref())
                .filter(|html| html.contains("<h1"))
                .map(|_| FakeHandle::Heading),
            _ => None,
        };
        Ok(found)
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeHandle>, SessionError> {
        let Some(place) = self.place() else {
            return Ok(Vec::new());
        };
        if selector == RESULT_CARD {
            Ok((0..place.cards.len()).map(FakeHandle::Card).collect())
        } else {
            Ok(Vec::new())
        }
    }

    async fn scroll_to_bottom(&self, element: &FakeHandle) -> Result<(), SessionError> {
        if *element != FakeHandle::Container {
            return Err(SessionError::command("scroll", "not scrollable"));
        }
        self.state.borrow_mut().scrolls += 1;
        Ok(())
    }

    async fn scroll_into_view(&self, element: &FakeHandle) -> Result<(), SessionError> {
        self.card(element).map(|_| ())
    }

    async fn pointer_click(&self, element: &FakeHandle) -> Result<(), SessionError> {
        let (i, card) = self.card(element)?;
        if !card.pointer_ok {
            return Err(SessionError::command("pointer click", "element is obscured"));
        }
        self.state.borrow_mut().active_card = Some(i);
        Ok(())
    }

    async fn direct_click(&self, element: &FakeHandle) -> Result<(), SessionError> {
        let (i, card) = self.card(element)?;
        self.state.borrow_mut().direct_clicks += 1;
        if !card.direct_ok {
            return Err(SessionError::command("direct click", "element detached"));
        }
        self.state.borrow_mut().active_card = Some(i);
        Ok(())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        let active = self.state.borrow().active_card;
        let html = self
            .place()
            .zip(active)
            .and_then(|(place, i)| place.cards[i].detail_html.clone())
            .unwrap_or_else(|| "<html><body></body></html>".to_string());
        Ok(html)
    }
}
