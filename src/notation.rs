//! Hand and trick notation: parse/print the `/`- and `.`-separated format
//! used at the CLI boundary, distinct from the PBN (`hands::from_pbn`) and
//! space-separated (`hands::from_solver_format`) formats used elsewhere.
//!
//! A hand string is four cardsets separated by `/` in seat order W, N, E, S.
//! Each cardset is four dot-separated rank lists in suit order spades,
//! hearts, diamonds, clubs, e.g. `"A2.../93.../5.2../6.3.."`. Ranks use
//! `23456789TJQKA`; suits accept `CDHS` or the unicode symbols `♣♦♥♠`.
//!
//! A trick string is `"<rank><suit><rank><suit>..."`, up to four plays.

use super::cards::{card_of, rank_of, suit_of, Cards};
use super::error::NotationError;
use super::hands::Hands;
use super::types::*;

/// Parse a `/`-separated W/N/E/S hand string.
pub fn parse_hands(s: &str) -> Result<Hands, NotationError> {
    let parts = split_with_offset(s, '/');
    if parts.len() != 4 {
        return Err(NotationError::parse(
            format!("expected 4 hands separated by '/', found {}", parts.len()),
            0,
        ));
    }

    let mut hands = Hands::new();
    for (&seat, &(offset, part)) in [WEST, NORTH, EAST, SOUTH].iter().zip(parts.iter()) {
        hands[seat] = parse_hand(part, offset)?;
    }
    validate_deal(&hands)?;
    Ok(hands)
}

/// Print a `Hands` in the same `/`-separated notation `parse_hands` accepts.
pub fn hands_to_string(hands: &Hands) -> String {
    [WEST, NORTH, EAST, SOUTH]
        .iter()
        .map(|&seat| hand_to_string(hands.hand(seat)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse a trick string into the card indices played, in order.
pub fn parse_trick(s: &str) -> Result<Vec<usize>, NotationError> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    if chars.len() % 2 != 0 {
        return Err(NotationError::parse(
            "trick notation must have an even number of characters (rank, suit pairs)",
            s.len(),
        ));
    }
    if chars.len() / 2 > NUM_SEATS {
        return Err(NotationError::parse("a trick has at most 4 plays", 0));
    }

    let mut cards = Vec::with_capacity(chars.len() / 2);
    let mut i = 0;
    while i < chars.len() {
        let (rank_pos, rank_char) = chars[i];
        let (suit_pos, suit_char) = chars[i + 1];
        let rank = char_to_rank(rank_char).ok_or_else(|| {
            NotationError::parse(format!("invalid rank character '{rank_char}'"), rank_pos)
        })?;
        let suit = char_to_suit(suit_char)
            .filter(|&suit| suit < NUM_SUITS)
            .ok_or_else(|| {
                NotationError::parse(format!("invalid suit character '{suit_char}'"), suit_pos)
            })?;
        cards.push(card_of(suit, rank));
        i += 2;
    }
    Ok(cards)
}

/// Print a sequence of plays in trick notation.
pub fn trick_to_string(cards: &[usize]) -> String {
    cards
        .iter()
        .map(|&c| format!("{}{}", rank_name(rank_of(c)), suit_letter(suit_of(c))))
        .collect()
}

fn suit_letter(suit: Suit) -> char {
    suit_name(suit).chars().next().unwrap()
}

fn hand_to_string(cards: Cards) -> String {
    (0..NUM_SUITS)
        .map(|suit| {
            cards
                .suit(suit)
                .iter()
                .map(|c| rank_name(rank_of(c)))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn parse_hand(s: &str, base: usize) -> Result<Cards, NotationError> {
    let suit_parts = split_with_offset(s, '.');
    if suit_parts.len() != 4 {
        return Err(NotationError::parse(
            format!(
                "expected 4 suits separated by '.', found {}",
                suit_parts.len()
            ),
            base,
        ));
    }

    let mut cards = Cards::new();
    for (suit, &(local_offset, suit_str)) in suit_parts.iter().enumerate() {
        for (char_offset, c) in suit_str.char_indices() {
            let rank = char_to_rank(c).ok_or_else(|| {
                NotationError::parse(
                    format!("invalid rank character '{c}'"),
                    base + local_offset + char_offset,
                )
            })?;
            cards.add(card_of(suit, rank));
        }
    }
    Ok(cards)
}

pub(crate) fn validate_deal(hands: &Hands) -> Result<(), NotationError> {
    let sizes: Vec<usize> = (0..NUM_SEATS).map(|seat| hands.hand(seat).size()).collect();
    if sizes.iter().any(|&size| size != sizes[0]) {
        return Err(NotationError::InvalidDeal(format!(
            "hands have unequal sizes: {sizes:?}"
        )));
    }
    let mut seen = Cards::new();
    for seat in 0..NUM_SEATS {
        let hand = hands.hand(seat);
        if !seen.intersect(hand).is_empty() {
            return Err(NotationError::InvalidDeal(
                "hands are not pairwise disjoint".to_string(),
            ));
        }
        seen.add_cards(hand);
    }
    Ok(())
}

/// Split `s` on `sep`, returning each segment with its byte offset in `s`.
fn split_with_offset(s: &str, sep: char) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c == sep {
            result.push((start, &s[start..i]));
            start = i + c.len_utf8();
        }
    }
    result.push((start, &s[start..]));
    result
}
