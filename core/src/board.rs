use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use crate::deck;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

/// Handle to a rendered card. Handles from an earlier render are stale and
/// resolve to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardRef {
    index: usize,
    generation: u64,
}

impl CardRef {
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub index: usize,
    pub image: String,
    pub state: CardState,
}

pub type SelectionHandler = Rc<dyn Fn(CardRef)>;
pub type ActivateFn = Rc<dyn Fn()>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("a {0}x{0} board has an odd number of cells")]
    OddGeometry(usize),
    #[error("deck holds {actual} cards but the board has {expected} cells")]
    DeckLength { expected: usize, actual: usize },
    #[error("board container is not available")]
    MissingContainer,
}

/// Toolkit side of the board: owns the cell widgets.
pub trait CardSurface {
    /// False when there is no container to draw into.
    fn is_available(&self) -> bool {
        true
    }
    /// Drops every cell and prepares an empty `size`x`size` grid.
    fn clear(&self, size: usize);
    /// Appends a hidden cell; `on_activate` runs whenever it is clicked.
    fn add_cell(&self, index: usize, image: &str, on_activate: ActivateFn);
    fn set_state(&self, index: usize, state: CardState);
}

pub struct Board {
    surface: Box<dyn CardSurface>,
    size: usize,
    deck: Vec<String>,
    cards: Vec<Card>,
    generation: u64,
    handler: Rc<RefCell<Option<SelectionHandler>>>,
}

impl Board {
    pub fn new(surface: Box<dyn CardSurface>, size: usize, deck: Vec<String>) -> Result<Self, BoardError> {
        let expected = size * size;
        if expected % 2 != 0 {
            return Err(BoardError::OddGeometry(size));
        }
        if deck.len() != expected {
            return Err(BoardError::DeckLength {
                expected,
                actual: deck.len(),
            });
        }
        Ok(Board {
            surface,
            size,
            deck,
            cards: Vec::new(),
            generation: 0,
            handler: Rc::new(RefCell::new(None)),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn deck(&self) -> &[String] {
        &self.deck
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn render(&mut self) -> Result<(), BoardError> {
        if !self.surface.is_available() {
            tracing::error!("board container missing, skipping render");
            return Err(BoardError::MissingContainer);
        }

        self.generation = self.generation.wrapping_add(1);
        self.surface.clear(self.size);
        self.cards.clear();

        for (index, image) in self.deck.iter().enumerate() {
            let card = CardRef {
                index,
                generation: self.generation,
            };
            let slot = self.handler.clone();
            let on_activate: ActivateFn = Rc::new(move || {
                let handler = slot.borrow().clone();
                if let Some(handler) = handler {
                    handler(card);
                }
            });
            self.surface.add_cell(index, image, on_activate);
            self.cards.push(Card {
                index,
                image: image.clone(),
                state: CardState::Hidden,
            });
        }

        tracing::debug!(cards = self.cards.len(), generation = self.generation, "board rendered");
        Ok(())
    }

    /// Replaces the previous handler, if any.
    pub fn attach_selection_handler(&mut self, handler: SelectionHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }

    pub fn card_ref(&self, index: usize) -> Option<CardRef> {
        (index < self.cards.len()).then_some(CardRef {
            index,
            generation: self.generation,
        })
    }

    fn card(&self, card: CardRef) -> Option<&Card> {
        if card.generation != self.generation {
            return None;
        }
        self.cards.get(card.index)
    }

    fn set_state(&mut self, card: CardRef, state: CardState) {
        if card.generation != self.generation {
            return;
        }
        if let Some(slot) = self.cards.get_mut(card.index) {
            slot.state = state;
            self.surface.set_state(card.index, state);
        }
    }

    pub fn state_of(&self, card: CardRef) -> Option<CardState> {
        self.card(card).map(|card| card.state)
    }

    pub fn image_of(&self, card: CardRef) -> Option<&str> {
        self.card(card).map(|card| card.image.as_str())
    }

    pub fn reveal(&mut self, card: CardRef) {
        if self.state_of(card) == Some(CardState::Hidden) {
            self.set_state(card, CardState::Revealed);
        }
    }

    /// Matched cards stay matched.
    pub fn conceal(&mut self, card: CardRef) {
        if self.state_of(card) == Some(CardState::Revealed) {
            self.set_state(card, CardState::Hidden);
        }
    }

    pub fn mark_matched(&mut self, card: CardRef) {
        if self.state_of(card).is_some() {
            self.set_state(card, CardState::Matched);
        }
    }

    pub fn reset(&mut self) -> Result<(), BoardError> {
        self.reset_with(&mut rand::rng())
    }

    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        deck::shuffle(&mut self.deck, rng);
        self.render()
    }
}
